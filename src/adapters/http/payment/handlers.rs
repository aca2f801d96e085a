//! HTTP handlers for payment endpoints.
//!
//! These handlers connect Axum routes to application layer command/query handlers.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Json, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::application::handlers::subscription::{
    GetSubscriptionHandler, GetSubscriptionQuery, HandlePaymentWebhookCommand,
    HandlePaymentWebhookHandler, InitiatePaymentCommand, InitiatePaymentHandler,
    InitiatorSettings, WebhookSettings,
};
use crate::domain::foundation::{DomainError, ErrorCode, UserId};
use crate::ports::SubscriptionStore;

use super::dto::{
    AckResponse, ErrorResponse, InitiatePaymentRequest, InitiatePaymentResponse,
    SubscriptionResponse, WebhookFailureResponse,
};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared application state containing all dependencies.
#[derive(Clone)]
pub struct PaymentAppState {
    pub subscription_store: Arc<dyn SubscriptionStore>,
    pub webhook_settings: WebhookSettings,
    pub initiator_settings: InitiatorSettings,
}

impl PaymentAppState {
    pub fn webhook_handler(&self) -> HandlePaymentWebhookHandler {
        HandlePaymentWebhookHandler::new(
            self.subscription_store.clone(),
            self.webhook_settings.clone(),
        )
    }

    pub fn initiate_payment_handler(&self) -> InitiatePaymentHandler {
        InitiatePaymentHandler::new(self.initiator_settings.clone())
    }

    pub fn get_subscription_handler(&self) -> GetSubscriptionHandler {
        GetSubscriptionHandler::new(self.subscription_store.clone())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// User Context
// ════════════════════════════════════════════════════════════════════════════════

/// Authenticated user context extracted from the `X-User-Id` header.
///
/// The header is set by the gateway after it validates the user's session.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
}

/// Rejection type for AuthenticatedUser extraction.
pub struct AuthenticationRequired;

impl IntoResponse for AuthenticationRequired {
    fn into_response(self) -> Response {
        let error = ErrorResponse::new("AUTHENTICATION_REQUIRED", "Authentication is required");
        (StatusCode::UNAUTHORIZED, Json(error)).into_response()
    }
}

#[axum::async_trait]
impl<S> axum::extract::FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AuthenticationRequired;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        let user_id = parts
            .headers
            .get("X-User-Id")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| UserId::new(s).ok())
            .ok_or(AuthenticationRequired)?;

        Ok(AuthenticatedUser { user_id })
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Webhook Handler
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/webhooks/payment - Payment provider callback
///
/// Always acknowledges, except when no signing secret is configured.
pub async fn handle_payment_webhook(
    State(state): State<PaymentAppState>,
    body: Bytes,
) -> Response {
    let cmd = HandlePaymentWebhookCommand {
        payload: body.to_vec(),
    };

    match state.webhook_handler().handle(cmd).await {
        Ok(outcome) => {
            tracing::debug!(accepted = outcome.is_accepted(), "Payment callback acknowledged");
            (StatusCode::OK, Json(AckResponse::success())).into_response()
        }
        Err(err) => {
            let body = WebhookFailureResponse {
                error: err.to_string(),
            };
            (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
        }
    }
}

/// OPTIONS /api/webhooks/payment - CORS preflight without CORS request headers
pub async fn preflight() -> StatusCode {
    StatusCode::OK
}

// ════════════════════════════════════════════════════════════════════════════════
// Client Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/payments/initiate - Build a payment request for checkout
pub async fn initiate_payment(
    State(state): State<PaymentAppState>,
    user: AuthenticatedUser,
    Json(request): Json<InitiatePaymentRequest>,
) -> Result<impl IntoResponse, PaymentApiError> {
    let cmd = InitiatePaymentCommand {
        user_id: user.user_id,
        tier: request.tier,
        months: request.months,
    };

    let payment = state.initiate_payment_handler().handle(cmd)?;

    Ok((
        StatusCode::CREATED,
        Json(InitiatePaymentResponse::from(payment)),
    ))
}

/// GET /api/subscription - Get current user's subscription
pub async fn get_subscription(
    State(state): State<PaymentAppState>,
    user: AuthenticatedUser,
) -> Result<impl IntoResponse, PaymentApiError> {
    let query = GetSubscriptionQuery {
        user_id: user.user_id,
    };

    let view = state
        .get_subscription_handler()
        .handle(query)
        .await?
        .ok_or_else(|| {
            DomainError::new(ErrorCode::SubscriptionNotFound, "No subscription found")
        })?;

    Ok(Json(SubscriptionResponse::from(view)))
}

/// GET /health
pub async fn health() -> &'static str {
    "ok"
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error type that converts domain errors to HTTP responses.
#[derive(Debug)]
pub struct PaymentApiError(DomainError);

impl From<DomainError> for PaymentApiError {
    fn from(err: DomainError) -> Self {
        Self(err)
    }
}

impl IntoResponse for PaymentApiError {
    fn into_response(self) -> Response {
        let status = match self.0.code {
            ErrorCode::ValidationFailed => StatusCode::BAD_REQUEST,
            ErrorCode::SubscriptionNotFound => StatusCode::NOT_FOUND,
            ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorCode::ConfigurationMissing
            | ErrorCode::DatabaseError
            | ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!(error = %self.0, "Payment API request failed");
        }

        let body = ErrorResponse::new(self.0.code.to_string(), self.0.message);
        (status, Json(body)).into_response()
    }
}
