#![allow(dead_code)]

use marketplace_client::{ClientConfig, Marketplace, MemoryStore, RetryConfig, SessionStore};
use std::sync::Arc;
use wiremock::MockServer;

/// Millisecond backoff so retry scenarios finish quickly.
pub const FAST_RETRY: RetryConfig =
    RetryConfig { max_retries: 3, base_delay_ms: 1, max_delay_ms: 5 };

pub fn config_for(server: &MockServer) -> ClientConfig {
    ClientConfig { retry: FAST_RETRY, ..ClientConfig::new(format!("{}/api", server.uri())) }
}

pub fn client_for(server: &MockServer) -> (Marketplace, Arc<MemoryStore>) {
    client_with(config_for(server))
}

pub fn client_with(config: ClientConfig) -> (Marketplace, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let dyn_store: Arc<dyn SessionStore> = store.clone();
    let client = Marketplace::new(config, dyn_store).expect("client builds");
    client.session().init();
    (client, store)
}

pub fn ok(data: serde_json::Value) -> serde_json::Value {
    serde_json::json!({ "success": true, "data": data })
}

pub fn user_json(role: &str) -> serde_json::Value {
    serde_json::json!({
        "id": "u-1",
        "email": "buyer@example.com",
        "name": "Buyer",
        "role": role,
    })
}

pub fn login_body(role: &str) -> serde_json::Value {
    ok(serde_json::json!({
        "user": user_json(role),
        "token": "tok-1",
        "refreshToken": "rt-1",
    }))
}

pub fn product_json(id: &str, stage: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "title": "Icon pack",
        "price": 19.0,
        "totalLicenses": 100,
        "remainingLicenses": 25,
        "currentStage": stage,
        "currentRound": 2,
        "status": "approved",
    })
}
