//! How failures and confirmations reach the user.

use crate::error::ClientError;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToastLevel {
    Success,
    Info,
    Error,
}

/// Transient notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub level: ToastLevel,
    pub message: String,
}

impl Toast {
    pub fn success(message: impl Into<String>) -> Self {
        Self { level: ToastLevel::Success, message: message.into() }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self { level: ToastLevel::Info, message: message.into() }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { level: ToastLevel::Error, message: message.into() }
    }

    /// Error toast carrying [`ClientError::user_friendly_message`].
    pub fn from_error(err: &ClientError) -> Self {
        Self::error(err.user_friendly_message())
    }
}

impl fmt::Display for Toast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Where an error is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorSurface {
    /// Next to the form field
    Inline,
    /// Transient notification
    Toast,
    /// Replaces the page content
    Page,
}

impl ErrorSurface {
    /// Surface for a failed mutation or form submit.
    pub fn for_error(err: &ClientError) -> Self {
        if err.is_validation() {
            Self::Inline
        } else {
            Self::Toast
        }
    }

    /// Surface for a failed read. Nothing useful can render without the data.
    pub const fn for_query_error(_err: &ClientError) -> Self {
        Self::Page
    }
}

/// Shared outbox of toasts, drained by whatever renders them.
#[derive(Debug, Clone, Default)]
pub struct ToastQueue {
    inner: Arc<Mutex<VecDeque<Toast>>>,
}

impl ToastQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, toast: Toast) {
        tracing::debug!("toast ({:?}): {}", toast.level, toast.message);
        self.inner.lock().push_back(toast);
    }

    pub fn drain(&self) -> Vec<Toast> {
        self.inner.lock().drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }
}
