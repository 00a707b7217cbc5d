//! Authentication state derived from the persisted session.
//!
//! ```text
//! Uninitialized ──init()──▶ Checking ──▶ Authenticated(user)
//!                                    └─▶ Unauthenticated
//! Authenticated ──logout()──▶ Unauthenticated (store cleared)
//! ```

use crate::error::ClientError;
use crate::storage::{SessionStore, StorageKey};
use marketplace_types::{AuthTokens, User};
use std::sync::Arc;
use tokio::sync::watch;

/// Route unauthenticated users are sent to.
pub const LOGIN_ROUTE: &str = "/login";

/// Lifecycle of the client-side session.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum AuthState {
    /// `init()` has not run yet
    #[default]
    Uninitialized,
    /// Reading the persisted session
    Checking,
    /// Token and user are both present
    Authenticated(User),
    /// No usable session
    Unauthenticated,
}

impl AuthState {
    pub const fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }

    pub const fn user(&self) -> Option<&User> {
        match self {
            Self::Authenticated(user) => Some(user),
            _ => None,
        }
    }
}

/// The three flags route guards look at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthSnapshot {
    /// `init()` has started
    pub mounted: bool,
    /// Session still being read
    pub is_loading: bool,
    pub is_authenticated: bool,
}

impl From<&AuthState> for AuthSnapshot {
    fn from(state: &AuthState) -> Self {
        Self {
            mounted: !matches!(state, AuthState::Uninitialized),
            is_loading: matches!(state, AuthState::Uninitialized | AuthState::Checking),
            is_authenticated: state.is_authenticated(),
        }
    }
}

/// Session object shared by the API layer and front-ends.
///
/// Cloning is cheap; all clones observe the same state.
#[derive(Clone)]
pub struct AuthSession {
    store: Arc<dyn SessionStore>,
    state: Arc<watch::Sender<AuthState>>,
}

impl AuthSession {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        let (state, _) = watch::channel(AuthState::Uninitialized);
        Self { store, state: Arc::new(state) }
    }

    /// Read token and user from the store and settle the state.
    pub fn init(&self) -> AuthState {
        self.transition(AuthState::Checking);

        let token = self.store.get::<String>(StorageKey::Token).filter(|t| !t.is_empty());
        let user = self.store.get::<User>(StorageKey::User);

        let next = match (token, user) {
            (Some(_), Some(user)) => AuthState::Authenticated(user),
            _ => AuthState::Unauthenticated,
        };
        self.transition(next.clone());
        next
    }

    /// Persist a fresh login and become authenticated.
    pub fn sign_in(&self, tokens: &AuthTokens, user: User) -> Result<(), ClientError> {
        self.store.set(StorageKey::Token, &tokens.token)?;
        match &tokens.refresh_token {
            Some(refresh) => self.store.set(StorageKey::RefreshToken, refresh)?,
            None => self.store.remove(StorageKey::RefreshToken)?,
        }
        self.store.set(StorageKey::User, &user)?;
        tracing::info!("Signed in as {}", user.email);
        self.transition(AuthState::Authenticated(user));
        Ok(())
    }

    /// Replace the stored user, e.g. after `/auth/me` returned fresher data.
    pub fn update_user(&self, user: User) -> Result<(), ClientError> {
        if !self.state().is_authenticated() {
            return Ok(());
        }
        self.store.set(StorageKey::User, &user)?;
        self.transition(AuthState::Authenticated(user));
        Ok(())
    }

    /// Clear the persisted session and return the route to redirect to.
    ///
    /// The state ends up `Unauthenticated` even if the store fails to clear.
    pub fn logout(&self) -> &'static str {
        if let Err(e) = self.store.clear() {
            tracing::warn!("Failed to clear session store on logout: {}", e);
        }
        tracing::info!("Logged out");
        self.transition(AuthState::Unauthenticated);
        LOGIN_ROUTE
    }

    pub fn state(&self) -> AuthState {
        self.state.borrow().clone()
    }

    pub fn snapshot(&self) -> AuthSnapshot {
        AuthSnapshot::from(&*self.state.borrow())
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated()
    }

    /// Stored bearer token.
    pub fn token(&self) -> Option<String> {
        self.store.get(StorageKey::Token)
    }

    /// Stored refresh token.
    pub fn refresh_token(&self) -> Option<String> {
        self.store.get(StorageKey::RefreshToken)
    }

    /// Receiver notified on every transition.
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    fn transition(&self, next: AuthState) {
        self.state.send_if_modified(|current| {
            if *current == next {
                return false;
            }
            tracing::debug!("Auth state: {:?} -> {:?}", discriminant(current), discriminant(&next));
            *current = next;
            true
        });
    }
}

fn discriminant(state: &AuthState) -> &'static str {
    match state {
        AuthState::Uninitialized => "uninitialized",
        AuthState::Checking => "checking",
        AuthState::Authenticated(_) => "authenticated",
        AuthState::Unauthenticated => "unauthenticated",
    }
}
