//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request span with status and latency)
//! 3. Request ID (add unique ID to each request)
//! 4. Session layer (tower-sessions, signed cookie, memory store)

pub mod auth;
pub mod request_id;
pub mod session;

pub use auth::{AuthContext, OptionalAuth, RequireAuth, sign_in, sign_out, update_current_user};
pub use request_id::request_id_middleware;
pub use session::create_session_layer;
