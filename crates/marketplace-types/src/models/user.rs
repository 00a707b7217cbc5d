//! User, role and token models.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Role of an account.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    /// Regular buyer/creator
    User,
    /// Moderator with access to the admin area
    Admin,
    /// Any role the client does not know about
    Other(String),
}

impl Role {
    /// Wire name.
    pub fn as_str(&self) -> &str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
            Self::Other(raw) => raw,
        }
    }

    /// Whether the role grants admin access.
    pub const fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl From<String> for Role {
    fn from(raw: String) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "user" => Self::User,
            "admin" => Self::Admin,
            _ => Self::Other(raw),
        }
    }
}

impl From<&str> for Role {
    fn from(raw: &str) -> Self {
        Self::from(raw.to_string())
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.as_str().to_string()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Authenticated user as returned by `/auth/me` and the login endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    /// Unique identifier
    #[serde(alias = "_id")]
    pub id: String,
    /// Login email
    pub email: String,
    /// Display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Role used by route guards
    #[serde(default = "default_role")]
    pub role: Role,
    /// Purchase credits balance
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credits: Option<f64>,
    /// Whether the email has been confirmed
    #[serde(default, alias = "emailVerified", alias = "is_verified")]
    pub email_verified: bool,
}

fn default_role() -> Role {
    Role::User
}

/// Access/refresh token pair issued by the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthTokens {
    /// Bearer token
    #[serde(alias = "accessToken", alias = "access_token")]
    pub token: String,
    /// Refresh token, when issued
    #[serde(default, alias = "refreshToken", skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

/// Payload of a successful login or registration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthPayload {
    /// Signed-in user
    pub user: User,
    /// Issued tokens; registration may omit them until email is verified
    #[serde(flatten)]
    pub tokens: Option<AuthTokens>,
}
