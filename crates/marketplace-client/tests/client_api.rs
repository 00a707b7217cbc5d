#![allow(unused_crate_dependencies)]
#![allow(clippy::tests_outside_test_module, reason = "integration tests live in tests/ dir")]
#![allow(clippy::expect_used, reason = "integration test: panics are the assertion mechanism")]

mod common;

use common::{client_for, client_with, config_for, login_body, ok, product_json, user_json};
use marketplace_client::{
    AuthState, ClientError, GuardDecision, RouteGuard, SessionStore, StorageKey, ADMIN_DASHBOARD,
    LOGIN_ROUTE, USER_DASHBOARD,
};
use marketplace_types::models::PageQuery;
use marketplace_types::{PurchaseType, Role, Stage};
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_login_persists_session_and_attaches_bearer() {
    let server = MockServer::start().await;
    let (client, store) = client_for(&server);

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_json(serde_json::json!({"email": "buyer@example.com", "password": "hunter22"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(login_body("user")))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .and(header("authorization", "Bearer tok-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(user_json("user"))))
        .expect(1)
        .mount(&server)
        .await;

    let user = client.auth().login("buyer@example.com", "hunter22").await.expect("login");
    assert_eq!(user.role, Role::User);
    assert!(client.session().is_authenticated());
    assert_eq!(store.get_raw(StorageKey::Token).as_deref(), Some("\"tok-1\""));
    assert_eq!(client.session().refresh_token().as_deref(), Some("rt-1"));

    let me = client.auth().current_user().await.expect("current user");
    assert_eq!(me.email, "buyer@example.com");
}

#[tokio::test]
async fn test_no_bearer_without_token() {
    let server = MockServer::start().await;
    let (client, _store) = client_for(&server);

    Mock::given(method("GET"))
        .and(path("/api/products"))
        .respond_with(move |req: &wiremock::Request| {
            assert!(
                !req.headers.contains_key("authorization"),
                "anonymous request carried a bearer"
            );
            ResponseTemplate::new(200).set_body_json(ok(serde_json::json!({
                "items": [product_json("p-1", "newboom")],
                "pagination": {"page": 1, "limit": 10, "total": 1, "totalPages": 1}
            })))
        })
        .expect(1)
        .mount(&server)
        .await;

    let page = client.products().list(&PageQuery::page(1)).await.expect("list");
    assert_eq!(page.items[0].current_stage, Stage::Newboom);
    assert_eq!(page.pagination.total_pages, 1);
}

#[tokio::test]
async fn test_logout_clears_session_and_cache() {
    let server = MockServer::start().await;
    let (client, store) = client_for(&server);

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(login_body("user")))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/licenses"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(serde_json::json!([]))))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/auth/logout"))
        .and(header("authorization", "Bearer tok-1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"success": true})),
        )
        .expect(1)
        .mount(&server)
        .await;

    client.auth().login("buyer@example.com", "hunter22").await.expect("login");
    client.licenses().list().await.expect("licenses");
    assert!(!client.cache().is_empty());

    let mut rx = client.session().subscribe();
    let route = client.auth().logout().await;

    assert_eq!(route, LOGIN_ROUTE);
    assert!(rx.has_changed().expect("sender alive"));
    assert_eq!(*rx.borrow_and_update(), AuthState::Unauthenticated);
    assert!(client.cache().is_empty());
    for key in StorageKey::ALL {
        assert!(store.get_raw(key).is_none(), "{} survived logout", key.as_str());
    }
}

#[tokio::test]
async fn test_unauthorized_hook_logs_out_when_enabled() {
    let server = MockServer::start().await;
    let config =
        marketplace_client::ClientConfig { logout_on_unauthorized: true, ..config_for(&server) };
    let (client, _store) = client_with(config);

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(login_body("user")))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/badges"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(serde_json::json!({"success": false, "message": "Token expired"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    client.auth().login("buyer@example.com", "hunter22").await.expect("login");
    let err = client.badges().list().await.expect_err("401");

    assert!(err.is_unauthorized());
    assert_eq!(err.user_friendly_message(), "Token expired");
    assert!(!client.session().is_authenticated());
    assert_eq!(client.session().token(), None);
}

#[tokio::test]
async fn test_unauthorized_keeps_session_by_default() {
    let server = MockServer::start().await;
    let (client, _store) = client_for(&server);

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(login_body("user")))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/badges"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    client.auth().login("buyer@example.com", "hunter22").await.expect("login");
    let err = client.badges().list().await.expect_err("401");

    assert_eq!(err.user_friendly_message(), "Your session has expired. Please log in again.");
    assert!(client.session().is_authenticated());
}

#[tokio::test]
async fn test_server_errors_are_retried() {
    let server = MockServer::start().await;
    let (client, _store) = client_for(&server);

    Mock::given(method("GET"))
        .and(path("/api/badges/progress"))
        .respond_with(ResponseTemplate::new(503))
        .expect(4)
        .mount(&server)
        .await;

    let err = client.badges().progress().await.expect_err("503");
    assert!(err.is_server_error());
}

#[tokio::test]
async fn test_client_errors_are_not_retried() {
    let server = MockServer::start().await;
    let (client, _store) = client_for(&server);

    Mock::given(method("GET"))
        .and(path("/api/products/missing"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(
                serde_json::json!({"success": false, "message": "Product not found"}),
            ),
        )
        .expect(1)
        .mount(&server)
        .await;

    let err = client.products().get("missing").await.expect_err("404");
    assert_eq!(err.status(), Some(404));
    assert_eq!(err.user_friendly_message(), "Product not found");
}

#[tokio::test]
async fn test_concurrent_reads_share_one_request() {
    let server = MockServer::start().await;
    let (client, _store) = client_for(&server);

    Mock::given(method("GET"))
        .and(path("/api/products/p-1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(ok(product_json("p-1", "blossom")))
                .set_delay(Duration::from_millis(50)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let products = client.products();
    let (a, b) = tokio::join!(products.get("p-1"), products.get("p-1"));
    assert_eq!(a.expect("first").id, "p-1");
    assert_eq!(b.expect("second").current_stage, Stage::Blossom);

    // Still fresh: served from cache.
    client.products().get("p-1").await.expect("cached");
}

#[tokio::test]
async fn test_purchase_invalidates_product_and_licenses() {
    let server = MockServer::start().await;
    let (client, _store) = client_for(&server);

    Mock::given(method("GET"))
        .and(path("/api/products/p-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(product_json("p-1", "newboom"))))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/licenses"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(serde_json::json!([]))))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/marketplace/purchase"))
        .and(body_json(serde_json::json!({"product_id": "p-1", "purchase_type": "resell"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(serde_json::json!({
            "license": {
                "id": "l-1",
                "productId": "p-1",
                "ownerId": "u-1",
                "purchaseType": "resell",
                "isResaleEligible": true,
                "roundAcquired": 2
            },
            "remainingCredits": 81.0
        }))))
        .expect(1)
        .mount(&server)
        .await;

    client.products().get("p-1").await.expect("product");
    client.licenses().list().await.expect("licenses");

    let receipt = client.market().purchase("p-1", PurchaseType::Resell).await.expect("purchase");
    assert!(receipt.license.can_resell());
    assert_eq!(client.cache().is_fresh(&marketplace_client::api::product_key("p-1")), Some(false));

    client.products().get("p-1").await.expect("refetched product");
    client.licenses().list().await.expect("refetched licenses");
}

#[tokio::test]
async fn test_business_rule_failure_on_200() {
    let server = MockServer::start().await;
    let (client, _store) = client_for(&server);

    Mock::given(method("POST"))
        .and(path("/api/marketplace/purchase"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(
                    serde_json::json!({"success": false, "message": "Insufficient credits"}),
                ),
        )
        .expect(1)
        .mount(&server)
        .await;

    let err = client.market().purchase("p-1", PurchaseType::Use).await.expect_err("rejected");
    assert_eq!(err.user_friendly_message(), "Insufficient credits");
}

#[tokio::test]
async fn test_admin_route_redirects_regular_user() {
    let server = MockServer::start().await;
    let (client, _store) = client_for(&server);

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(login_body("user")))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(user_json("user"))))
        .expect(1)
        .mount(&server)
        .await;

    assert_eq!(
        client.check_route(&RouteGuard::admin_only()).await,
        GuardDecision::Redirect(LOGIN_ROUTE)
    );

    client.auth().login("buyer@example.com", "hunter22").await.expect("login");
    assert_eq!(
        client.check_route(&RouteGuard::admin_only()).await,
        GuardDecision::Redirect(USER_DASHBOARD)
    );
    assert_eq!(client.check_route(&RouteGuard::user_only()).await, GuardDecision::Allow);
    assert_eq!(client.check_route(&RouteGuard::authenticated()).await, GuardDecision::Allow);
}

#[tokio::test]
async fn test_admin_passes_user_routes() {
    let server = MockServer::start().await;
    let (client, _store) = client_for(&server);

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(login_body("admin")))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(user_json("admin"))))
        .mount(&server)
        .await;

    client.auth().login("buyer@example.com", "hunter22").await.expect("login");
    assert_eq!(client.check_route(&RouteGuard::user_only()).await, GuardDecision::Allow);
    assert_eq!(client.check_route(&RouteGuard::admin_only()).await, GuardDecision::Allow);
    assert_eq!(
        client.check_route(&RouteGuard::roles([Role::Other("creator".to_string())])).await,
        GuardDecision::Redirect(ADMIN_DASHBOARD)
    );
}

#[tokio::test]
async fn test_login_without_token_is_rejected() {
    let server = MockServer::start().await;
    let (client, store) = client_for(&server);

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(ok(serde_json::json!({"user": user_json("user")}))),
        )
        .expect(1)
        .mount(&server)
        .await;

    let err = client.auth().login("buyer@example.com", "hunter22").await.expect_err("no token");
    assert!(matches!(err, ClientError::Decode(_)), "got {:?}", err);
    assert!(!client.session().is_authenticated());
    assert_eq!(store.get_raw(StorageKey::Token), None);
    assert_eq!(store.get_raw(StorageKey::User), None);
}

#[tokio::test]
async fn test_failed_role_query_keeps_admin_route_pending() {
    let server = MockServer::start().await;
    let (client, _store) = client_for(&server);

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(login_body("admin")))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    client.auth().login("buyer@example.com", "hunter22").await.expect("login");
    assert_eq!(client.check_route(&RouteGuard::admin_only()).await, GuardDecision::Pending);
    assert_eq!(client.check_route(&RouteGuard::authenticated()).await, GuardDecision::Allow);
}

#[tokio::test]
async fn test_rejected_role_query_redirects_to_login() {
    let server = MockServer::start().await;
    let (client, _store) = client_for(&server);

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(login_body("admin")))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    client.auth().login("buyer@example.com", "hunter22").await.expect("login");
    assert_eq!(
        client.check_route(&RouteGuard::admin_only()).await,
        GuardDecision::Redirect(LOGIN_ROUTE)
    );
}

#[tokio::test]
async fn test_slow_response_times_out() {
    let server = MockServer::start().await;
    let config = marketplace_client::ClientConfig { timeout_secs: 1, ..config_for(&server) };
    let (client, _store) = client_with(config);

    Mock::given(method("POST"))
        .and(path("/api/auth/forgot-password"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"success": true}))
                .set_delay(Duration::from_secs(2)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let err = client.auth().forgot_password("buyer@example.com").await.expect_err("timeout");
    assert!(matches!(err, ClientError::Timeout(1)), "got {:?}", err);
    assert_eq!(err.user_friendly_message(), "The request timed out. Please try again.");
}
