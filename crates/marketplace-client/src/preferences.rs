//! Theme, settings and dismissible alerts persisted in the session store.

use crate::error::ClientError;
use crate::storage::{SessionStore, StorageKey};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Colour scheme preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    /// Follow the operating system
    #[default]
    System,
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Light => "light",
            Self::Dark => "dark",
            Self::System => "system",
        })
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            "system" => Ok(Self::System),
            other => Err(format!("unknown theme '{}'", other)),
        }
    }
}

/// Per-user display settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Show notifications for purchases and payouts
    pub notifications: bool,
    /// ISO currency code used for price display
    pub currency: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self { notifications: true, currency: "USD".to_string() }
    }
}

/// Read/write access to persisted preferences.
#[derive(Clone)]
pub struct Preferences {
    store: Arc<dyn SessionStore>,
}

impl Preferences {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    pub fn theme(&self) -> Theme {
        self.store.get(StorageKey::Theme).unwrap_or_default()
    }

    pub fn set_theme(&self, theme: Theme) -> Result<(), ClientError> {
        self.store.set(StorageKey::Theme, &theme)
    }

    pub fn settings(&self) -> Settings {
        self.store.get(StorageKey::Settings).unwrap_or_default()
    }

    pub fn update_settings<F>(&self, updater: F) -> Result<Settings, ClientError>
    where
        F: FnOnce(&mut Settings),
    {
        let mut settings = self.settings();
        updater(&mut settings);
        self.store.set(StorageKey::Settings, &settings)?;
        Ok(settings)
    }

    /// Whether the Stripe onboarding alert was dismissed.
    pub fn stripe_alert_dismissed(&self) -> bool {
        self.store.get(StorageKey::StripeAlertDismissed).unwrap_or(false)
    }

    pub fn dismiss_stripe_alert(&self) -> Result<(), ClientError> {
        self.store.set(StorageKey::StripeAlertDismissed, &true)
    }
}
