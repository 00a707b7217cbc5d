//! Commercial stage of a product.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stage reported by the backend in `current_stage`.
///
/// Stages advance monotonically (newboom → blossom → evergreen → exit) and
/// are controlled by the backend only. Unknown values are kept verbatim so
/// they can still be rendered.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Stage {
    /// First sale round
    Newboom,
    /// Resale rounds open
    Blossom,
    /// Long-tail royalties
    Evergreen,
    /// Product retired from trading
    Exit,
    /// Anything the client does not know about
    Other(String),
}

impl Stage {
    /// Canonical wire name.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Newboom => "newboom",
            Self::Blossom => "blossom",
            Self::Evergreen => "evergreen",
            Self::Exit => "exit",
            Self::Other(raw) => raw,
        }
    }
}

impl From<&str> for Stage {
    fn from(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "newboom" => Self::Newboom,
            "blossom" => Self::Blossom,
            "evergreen" => Self::Evergreen,
            "exit" => Self::Exit,
            _ => Self::Other(raw.to_string()),
        }
    }
}

impl From<String> for Stage {
    fn from(raw: String) -> Self {
        Self::from(raw.as_str())
    }
}

impl From<Stage> for String {
    fn from(stage: Stage) -> Self {
        stage.as_str().to_string()
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
