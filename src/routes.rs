//! HTTP router: public routes, session-protected routes and shared layers.

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::{handlers, middleware::auth::auth_middleware, state::AppState};

/// Build the application router around `state`.
///
/// CORS is layered on by the caller since it depends on deployment config.
pub fn build_router(state: AppState) -> Router {
    let authenticated_routes = Router::new()
        .route("/api/v1/auth/logout", post(handlers::auth::logout))
        .route("/api/v1/me", get(handlers::auth::me))
        .route("/api/v1/accounts", get(handlers::accounts::list_accounts))
        .route("/api/v1/banks", post(handlers::accounts::link_bank))
        .route(
            "/api/v1/banks/{id}/transactions",
            get(handlers::accounts::list_bank_transactions),
        )
        .route(
            "/api/v1/transfers",
            post(handlers::transfers::create_transfer),
        )
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/api/v1/auth/sign-up", post(handlers::auth::sign_up))
        .route("/api/v1/auth/login", post(handlers::auth::login))
        .merge(authenticated_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TestHarness;
    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode, header},
    };
    use serde_json::{Value, json};
    use tower::ServiceExt;

    async fn send(router: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    fn get_with_session(uri: &str) -> Request<Body> {
        Request::get(uri)
            .header(header::AUTHORIZATION, "Bearer secret_1")
            .body(Body::empty())
            .unwrap()
    }

    fn post_json(uri: &str, body: Value, session: bool) -> Request<Body> {
        let mut builder = Request::post(uri).header(header::CONTENT_TYPE, "application/json");
        if session {
            builder = builder.header(header::AUTHORIZATION, "Bearer secret_1");
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    #[tokio::test]
    async fn health_reports_connected_database() {
        let harness = TestHarness::new();
        let request = Request::get("/health").body(Body::empty()).unwrap();

        let (status, body) = send(build_router(harness.state), request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["database"], "connected");
    }

    #[tokio::test]
    async fn protected_routes_require_a_session() {
        let harness = TestHarness::with_two_banks();
        let request = Request::get("/api/v1/accounts").body(Body::empty()).unwrap();

        let (status, body) = send(build_router(harness.state), request).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["code"], "unauthorized");
    }

    #[tokio::test]
    async fn expired_session_is_unauthorized() {
        let harness = TestHarness::with_two_banks();

        let (status, _) = send(
            build_router(harness.state),
            get_with_session("/api/v1/me"),
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn me_returns_the_session_profile() {
        let harness = TestHarness::with_two_banks();
        harness.log_in_as("identity_1");

        let (status, body) = send(
            build_router(harness.state),
            get_with_session("/api/v1/me"),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], "user_1");
        assert_eq!(body["identityId"], "identity_1");
    }

    #[tokio::test]
    async fn accounts_list_the_users_banks() {
        let harness = TestHarness::with_two_banks();
        harness.log_in_as("identity_1");

        let (status, body) = send(
            build_router(harness.state),
            get_with_session("/api/v1/accounts"),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["totalBanks"], 1);
        assert_eq!(body["data"][0]["id"], "bank_123");
    }

    #[tokio::test]
    async fn transfer_validation_failure_lists_fields() {
        let harness = TestHarness::with_two_banks();
        harness.log_in_as("identity_1");
        let body = json!({
            "email": "not-an-email",
            "amount": "12.50",
            "transferNote": "hi",
            "senderBank": "bank_123",
            "sharableId": harness.sharable_id("acc_456"),
        });

        let (status, body) = send(
            build_router(harness.state.clone()),
            post_json("/api/v1/transfers", body, true),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "validation_failed");
        assert_eq!(body["error"]["fields"][0]["field"], "email");
        assert_eq!(body["error"]["fields"][0]["message"], "Invalid email address");
        assert_eq!(body["error"]["fields"][1]["field"], "transferNote");
        assert_eq!(harness.transfers.transfer_count(), 0);
    }

    #[tokio::test]
    async fn transfer_is_created_and_listed() {
        let harness = TestHarness::with_two_banks();
        harness.log_in_as("identity_1");
        let body = json!({
            "email": "friend@example.com",
            "amount": "12.50",
            "transferNote": "rent",
            "senderBank": "bank_123",
            "sharableId": harness.sharable_id("acc_456"),
        });

        let (status, created) = send(
            build_router(harness.state.clone()),
            post_json("/api/v1/transfers", body, true),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["amount"], "12.50");
        assert_eq!(created["receiverBankId"], "bank_456");

        let (status, listed) = send(
            build_router(harness.state),
            get_with_session("/api/v1/banks/bank_123/transactions"),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(listed[0]["id"], created["id"]);
    }

    #[tokio::test]
    async fn foreign_bank_transactions_are_not_found() {
        let harness = TestHarness::with_two_banks();
        harness.log_in_as("identity_1");

        let (status, body) = send(
            build_router(harness.state),
            get_with_session("/api/v1/banks/bank_456/transactions"),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "bank_not_found");
    }

    #[tokio::test]
    async fn sign_up_creates_a_session() {
        let harness = TestHarness::new();
        let body = json!({
            "name": "Ada Lovelace",
            "email": "ada@example.com",
            "password": "correct horse battery",
            "taxId": "123456789",
        });

        let (status, body) = send(
            build_router(harness.state),
            post_json("/api/v1/auth/sign-up", body, false),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["session"]["secret"], "secret_1");
        assert_eq!(body["onboardingLink"]["url"], "https://billing.test/onboarding/acct_1");
    }

    #[tokio::test]
    async fn wrong_password_is_invalid_credentials() {
        let harness = TestHarness::new();
        harness
            .auth
            .reject_credentials
            .store(true, std::sync::atomic::Ordering::SeqCst);
        let body = json!({ "email": "ada@example.com", "password": "wrong password" });

        let (status, body) = send(
            build_router(harness.state),
            post_json("/api/v1/auth/login", body, false),
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["code"], "invalid_credentials");
    }
}
