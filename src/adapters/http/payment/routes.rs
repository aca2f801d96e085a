//! Axum router configuration for payment endpoints.

use std::time::Duration;

use axum::{
    routing::{get, post},
    Router,
};
use http::{
    header::{AUTHORIZATION, CONTENT_TYPE},
    HeaderName, Method,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;

use super::handlers::{
    get_subscription, handle_payment_webhook, health, initiate_payment, preflight,
    PaymentAppState,
};

/// Headers browsers may send to the webhook endpoint.
fn webhook_headers() -> [HeaderName; 4] {
    [
        AUTHORIZATION,
        HeaderName::from_static("x-client-info"),
        HeaderName::from_static("apikey"),
        CONTENT_TYPE,
    ]
}

/// CORS policy for the provider callback: any origin, fixed header set.
fn webhook_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers(webhook_headers())
}

/// CORS policy for client endpoints; adds the user header.
fn api_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(
            webhook_headers()
                .into_iter()
                .chain([HeaderName::from_static("x-user-id")])
                .collect::<Vec<_>>(),
        )
}

/// Create the payment webhook router.
///
/// Carries no request timeout: the provider must always receive the
/// acknowledgement, so store latency is bounded inside the handler instead.
///
/// # Routes
/// - `POST /webhooks/payment` - Payment provider callback (signature verified)
/// - `OPTIONS /webhooks/payment` - CORS preflight
pub fn webhook_routes() -> Router<PaymentAppState> {
    Router::new()
        .route(
            "/webhooks/payment",
            post(handle_payment_webhook).options(preflight),
        )
        .layer(webhook_cors())
}

/// Create the client API router.
///
/// # Routes (require `X-User-Id`)
/// - `POST /payments/initiate` - Build a payment request
/// - `GET /subscription` - Get current user's subscription
pub fn api_routes(request_timeout: Duration) -> Router<PaymentAppState> {
    Router::new()
        .route("/payments/initiate", post(initiate_payment))
        .route("/subscription", get(get_subscription))
        .layer(TimeoutLayer::new(request_timeout))
        .layer(api_cors())
}

/// Create the complete application router.
///
/// # Example
///
/// ```ignore
/// let app = app_router(Duration::from_secs(30)).with_state(state);
/// axum::serve(listener, app).await?;
/// ```
pub fn app_router(request_timeout: Duration) -> Router<PaymentAppState> {
    Router::new()
        .nest("/api", webhook_routes().merge(api_routes(request_timeout)))
        .route("/health", get(health))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::Body;
    use http::{Request, StatusCode};
    use secrecy::SecretString;
    use tower::ServiceExt;

    use async_trait::async_trait;

    use crate::adapters::memory::InMemorySubscriptionStore;
    use crate::application::handlers::subscription::{InitiatorSettings, WebhookSettings};
    use crate::domain::foundation::{DomainError, Timestamp, UserId};
    use crate::domain::subscription::{
        callback_signature, PriceTable, RenewalPolicy, SubscriptionRecord,
    };
    use crate::ports::SubscriptionStore;

    const SECRET: &str = "s3cr3t";
    const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

    /// Store whose writes take longer than any request may.
    struct SlowSubscriptionStore {
        delay: Duration,
    }

    #[async_trait]
    impl SubscriptionStore for SlowSubscriptionStore {
        async fn upsert(&self, _record: &SubscriptionRecord) -> Result<(), DomainError> {
            tokio::time::sleep(self.delay).await;
            Ok(())
        }

        async fn find_by_user_id(
            &self,
            _user_id: &UserId,
        ) -> Result<Option<SubscriptionRecord>, DomainError> {
            Ok(None)
        }
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Test Helpers
    // ════════════════════════════════════════════════════════════════════════════

    fn test_state(store: Arc<dyn SubscriptionStore>, secret: Option<&str>) -> PaymentAppState {
        let prices = PriceTable::new(299000, 1490000, 2690000).unwrap();
        PaymentAppState {
            subscription_store: store,
            webhook_settings: WebhookSettings {
                secret_key: secret.map(|s| SecretString::new(s.to_string())),
                renewal_policy: RenewalPolicy::Overwrite,
                prices,
                store_timeout: REQUEST_TIMEOUT,
            },
            initiator_settings: InitiatorSettings {
                merchant_id: Some("M1".to_string()),
                prices,
            },
        }
    }

    fn app(store: Arc<InMemorySubscriptionStore>) -> Router {
        app_router(REQUEST_TIMEOUT).with_state(test_state(store, Some(SECRET)))
    }

    fn signed_callback(result_code: &str) -> String {
        serde_json::json!({
            "resultCode": result_code,
            "resultMsg": "ok",
            "mid": "M1",
            "orderId": "ORDER_123_u-1",
            "amount": 299000,
            "signature": callback_signature("M1", "ORDER_123_u-1", 299000, result_code, SECRET),
            "mallReserved": r#"{"tier":"premium","months":1,"userId":"u-1"}"#,
        })
        .to_string()
    }

    fn post_webhook(body: impl Into<Body>) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri("/api/webhooks/payment")
            .header(CONTENT_TYPE, "application/json")
            .body(body.into())
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Webhook Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn webhook_acknowledges_valid_callback() {
        let store = Arc::new(InMemorySubscriptionStore::new());

        let response = app(store.clone())
            .oneshot(post_webhook(signed_callback("0000")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({"receiveResult": "SUCCESS"})
        );
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn webhook_acknowledges_every_rejection() {
        let store = Arc::new(InMemorySubscriptionStore::new());
        let mut tampered: serde_json::Value =
            serde_json::from_str(&signed_callback("0000")).unwrap();
        tampered["amount"] = serde_json::json!(1);

        for body in [
            tampered.to_string(),
            signed_callback("9999"),
            "not json".to_string(),
            String::new(),
        ] {
            let response = app(store.clone())
                .oneshot(post_webhook(body))
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::OK);
            assert_eq!(body_json(response).await["receiveResult"], "SUCCESS");
        }
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn webhook_without_secret_returns_500() {
        let store = Arc::new(InMemorySubscriptionStore::new());
        let app = app_router(REQUEST_TIMEOUT).with_state(test_state(store.clone(), None));

        let response = app
            .oneshot(post_webhook(signed_callback("0000")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body_json(response).await["error"].is_string());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn webhook_acknowledges_when_store_outlasts_request_timeout() {
        let store = Arc::new(SlowSubscriptionStore {
            delay: Duration::from_secs(2),
        });
        let mut state = test_state(store, Some(SECRET));
        state.webhook_settings.store_timeout = Duration::from_millis(100);
        let app = app_router(Duration::from_millis(200)).with_state(state);

        let response = app
            .oneshot(post_webhook(signed_callback("0000")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({"receiveResult": "SUCCESS"})
        );
    }

    #[tokio::test]
    async fn webhook_rejects_reservation_not_matching_signed_order() {
        let store = Arc::new(InMemorySubscriptionStore::new());
        let mut rewritten: serde_json::Value =
            serde_json::from_str(&signed_callback("0000")).unwrap();
        rewritten["mallReserved"] =
            serde_json::json!(r#"{"tier":"premium","months":12,"userId":"attacker"}"#);

        let response = app(store.clone())
            .oneshot(post_webhook(rewritten.to_string()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn webhook_preflight_advertises_cors_headers() {
        let response = app(Arc::new(InMemorySubscriptionStore::new()))
            .oneshot(
                Request::builder()
                    .method(Method::OPTIONS)
                    .uri("/api/webhooks/payment")
                    .header("origin", "https://app.example.com")
                    .header("access-control-request-method", "POST")
                    .header("access-control-request-headers", "content-type,apikey")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let headers = response.headers();
        assert_eq!(headers["access-control-allow-origin"], "*");
        let allowed = headers["access-control-allow-headers"]
            .to_str()
            .unwrap()
            .to_lowercase();
        for header in ["authorization", "x-client-info", "apikey", "content-type"] {
            assert!(allowed.contains(header), "missing {} in {}", header, allowed);
        }
    }

    #[tokio::test]
    async fn bare_options_returns_empty_200() {
        let response = app(Arc::new(InMemorySubscriptionStore::new()))
            .oneshot(
                Request::builder()
                    .method(Method::OPTIONS)
                    .uri("/api/webhooks/payment")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert!(bytes.is_empty());
    }

    #[tokio::test]
    async fn webhook_response_allows_any_origin() {
        let response = app(Arc::new(InMemorySubscriptionStore::new()))
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/api/webhooks/payment")
                    .header("origin", "https://pay.example.com")
                    .body(Body::from(signed_callback("0000")))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.headers()["access-control-allow-origin"], "*");
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Client API Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn initiate_payment_returns_created_request() {
        let response = app(Arc::new(InMemorySubscriptionStore::new()))
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/api/payments/initiate")
                    .header("X-User-Id", "user-abcdefghij")
                    .header(CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"tier":"premium","months":12}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let json = body_json(response).await;
        assert_eq!(json["merchantId"], "M1");
        assert_eq!(json["amount"], 2690000);
        assert!(json["orderId"]
            .as_str()
            .unwrap()
            .ends_with("_user-abc"));
        assert_eq!(
            json["mallReserved"],
            r#"{"tier":"premium","months":12,"userId":"user-abcdefghij"}"#
        );
    }

    #[tokio::test]
    async fn initiate_payment_rejects_unsupported_months() {
        let response = app(Arc::new(InMemorySubscriptionStore::new()))
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/api/payments/initiate")
                    .header("X-User-Id", "u-1")
                    .header(CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"tier":"premium","months":2}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error_code"], "VALIDATION_FAILED");
    }

    #[tokio::test]
    async fn initiate_payment_requires_user() {
        let response = app(Arc::new(InMemorySubscriptionStore::new()))
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/api/payments/initiate")
                    .header(CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"tier":"premium","months":1}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn get_subscription_returns_stored_record() {
        let store = Arc::new(InMemorySubscriptionStore::new());
        let now = Timestamp::now();
        store
            .upsert(&SubscriptionRecord {
                user_id: UserId::new("u-1").unwrap(),
                plan: "premium".to_string(),
                started_at: now,
                expires_at: now.checked_add_months(1).unwrap(),
                updated_at: now,
            })
            .await
            .unwrap();

        let response = app(store)
            .oneshot(
                Request::builder()
                    .uri("/api/subscription")
                    .header("X-User-Id", "u-1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["plan"], "premium");
        assert_eq!(json["is_active"], true);
    }

    #[tokio::test]
    async fn get_subscription_without_record_is_404() {
        let response = app(Arc::new(InMemorySubscriptionStore::new()))
            .oneshot(
                Request::builder()
                    .uri("/api/subscription")
                    .header("X-User-Id", "u-1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            body_json(response).await["error_code"],
            "SUBSCRIPTION_NOT_FOUND"
        );
    }

    #[tokio::test]
    async fn health_returns_ok() {
        let response = app(Arc::new(InMemorySubscriptionStore::new()))
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
