//! HTTP adapter for payment endpoints.
//!
//! - `POST /api/webhooks/payment` - Payment provider callback
//! - `OPTIONS /api/webhooks/payment` - CORS preflight
//! - `POST /api/payments/initiate` - Build a payment request for checkout
//! - `GET /api/subscription` - Get current user's subscription
//! - `GET /health` - Liveness check

pub mod dto;
pub mod handlers;
pub mod routes;

pub use handlers::{AuthenticatedUser, PaymentApiError, PaymentAppState};
pub use routes::{api_routes, app_router, webhook_routes};
