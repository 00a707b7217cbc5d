//! Stage and round badges.

use crate::models::{License, PurchaseType, Stage};
use serde::Serialize;

/// Badge colour; front-ends map these to their own palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeColor {
    /// Fresh product, first round
    Green,
    /// Resale rounds
    Blue,
    /// Long-tail
    Purple,
    /// Retired
    Gray,
    /// Unknown value
    Neutral,
}

/// Label plus colour for a stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageBadge {
    /// Text to display
    pub label: String,
    /// Colour class
    pub color: BadgeColor,
}

impl Stage {
    /// Badge for this stage. Unknown stages get a neutral badge with the raw
    /// value as label.
    pub fn badge(&self) -> StageBadge {
        let (label, color) = match self {
            Self::Newboom => ("Newboom", BadgeColor::Green),
            Self::Blossom => ("Blossom", BadgeColor::Blue),
            Self::Evergreen => ("Evergreen", BadgeColor::Purple),
            Self::Exit => ("Exit", BadgeColor::Gray),
            Self::Other(raw) => {
                return StageBadge { label: raw.clone(), color: BadgeColor::Neutral };
            }
        };
        StageBadge { label: label.to_string(), color }
    }
}

/// Badge for a raw stage string as it arrived from the backend.
pub fn stage_badge(raw: &str) -> StageBadge {
    Stage::from(raw).badge()
}

/// `"Round 3"`
pub fn round_label(round: u32) -> String {
    format!("Round {}", round)
}

/// Resale eligibility text for a license.
pub fn resale_label(license: &License) -> &'static str {
    match license.purchase_type {
        PurchaseType::Use => "Personal use",
        PurchaseType::Resell if license.is_resale_eligible => "Eligible for resale",
        PurchaseType::Resell => "Resale locked",
    }
}
