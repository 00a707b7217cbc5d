use crate::api::{
    AdminApi, AuthApi, BadgesApi, LicensesApi, MarketApi, PayoutsApi, ProductsApi, ReferralApi,
};
use crate::auth::{AuthSession, LOGIN_ROUTE};
use crate::cache::{QueryCache, QueryKey, Resource};
use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::guard::{GuardDecision, RouteGuard};
use crate::http::{ApiClient, UnauthorizedHook};
use crate::preferences::Preferences;
use crate::retry::RetryPolicy;
use crate::storage::SessionStore;
use crate::supabase::SupabaseClient;
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;

/// Application-level client: HTTP wrapper, cache, session and preferences
/// wired together over one session store.
///
/// Construct once and pass it to whatever needs the API; nothing here is
/// global.
#[derive(Clone)]
pub struct Marketplace {
    config: ClientConfig,
    http: ApiClient,
    cache: Arc<QueryCache>,
    session: AuthSession,
    preferences: Preferences,
    supabase: Option<SupabaseClient>,
}

impl Marketplace {
    pub fn new(config: ClientConfig, store: Arc<dyn SessionStore>) -> ClientResult<Self> {
        let session = AuthSession::new(store.clone());
        let cache = Arc::new(QueryCache::new(RetryPolicy::new(config.retry)));

        let hook: UnauthorizedHook = if config.logout_on_unauthorized {
            let session = session.clone();
            let cache = cache.clone();
            Arc::new(move || {
                if session.is_authenticated() {
                    session.logout();
                    cache.clear();
                }
            })
        } else {
            Arc::new(|| {})
        };
        let http = ApiClient::new(&config, store.clone())?.with_unauthorized_hook(hook);

        let supabase = config
            .supabase
            .clone()
            .map(|sb| SupabaseClient::new(sb, config.timeout_secs))
            .transpose()?;

        Ok(Self {
            config,
            http,
            cache,
            session,
            preferences: Preferences::new(store),
            supabase,
        })
    }

    /// Build from `NEXT_PUBLIC_*` environment variables and read the
    /// persisted session.
    pub fn from_env(store: Arc<dyn SessionStore>) -> ClientResult<Self> {
        let client = Self::new(ClientConfig::from_env()?, store)?;
        client.session.init();
        Ok(client)
    }

    pub fn auth(&self) -> AuthApi<'_> {
        AuthApi::new(self)
    }

    pub fn products(&self) -> ProductsApi<'_> {
        ProductsApi::new(self)
    }

    pub fn market(&self) -> MarketApi<'_> {
        MarketApi::new(self)
    }

    pub fn licenses(&self) -> LicensesApi<'_> {
        LicensesApi::new(self)
    }

    pub fn badges(&self) -> BadgesApi<'_> {
        BadgesApi::new(self)
    }

    pub fn referral(&self) -> ReferralApi<'_> {
        ReferralApi::new(self)
    }

    pub fn admin(&self) -> AdminApi<'_> {
        AdminApi::new(self)
    }

    pub fn payouts(&self) -> PayoutsApi<'_> {
        PayoutsApi::new(self)
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn http(&self) -> &ApiClient {
        &self.http
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    pub fn session(&self) -> &AuthSession {
        &self.session
    }

    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    pub fn supabase(&self) -> Option<&SupabaseClient> {
        self.supabase.as_ref()
    }

    pub(crate) fn require_supabase(&self) -> ClientResult<&SupabaseClient> {
        self.supabase
            .as_ref()
            .ok_or_else(|| ClientError::Config("Supabase is not configured".to_string()))
    }

    /// Evaluate a route guard, resolving the current user's role through
    /// the cache when the route is role-restricted.
    pub async fn check_route(&self, guard: &RouteGuard) -> GuardDecision {
        let snapshot = self.session.snapshot();
        let pending = guard.evaluate(snapshot, None);
        if pending != GuardDecision::Pending || !snapshot.is_authenticated {
            return pending;
        }
        match self.auth().current_user().await {
            Ok(user) => guard.evaluate(snapshot, Some(&user.role)),
            Err(e) if e.is_unauthorized() => {
                tracing::warn!("Role query rejected the session: {}", e);
                GuardDecision::Redirect(LOGIN_ROUTE)
            }
            Err(e) => {
                // The route stays blank until the role is known.
                tracing::warn!("Could not resolve role for route guard: {}", e);
                GuardDecision::Pending
            }
        }
    }

    /// Cached GET.
    pub(crate) async fn query<T>(
        &self,
        key: QueryKey,
        resource: Resource,
        path: &str,
    ) -> ClientResult<T>
    where
        T: Serialize + DeserializeOwned,
    {
        self.cache.fetch(key, resource.options(), || self.http.get(path)).await
    }

    /// Cached GET with query-string parameters.
    pub(crate) async fn query_with<Q, T>(
        &self,
        key: QueryKey,
        resource: Resource,
        path: &str,
        params: &Q,
    ) -> ClientResult<T>
    where
        Q: Serialize + ?Sized,
        T: Serialize + DeserializeOwned,
    {
        self.cache.fetch(key, resource.options(), || self.http.get_query(path, params)).await
    }

    /// Mark the given keys (as prefixes) stale after a successful mutation.
    pub(crate) fn invalidate(&self, prefixes: &[QueryKey]) {
        for prefix in prefixes {
            self.cache.invalidate_prefix(prefix);
        }
    }
}
