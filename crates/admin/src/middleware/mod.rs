//! HTTP middleware stack for admin.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request span with status and latency)
//! 3. Request ID (add unique ID to each request)
//! 4. Session layer (tower-sessions, signed cookie, memory store)
//!
//! Authentication is enforced per handler with [`RequireAdminAuth`].

pub mod auth;
pub mod request_id;
pub mod session;

pub use auth::{
    AdminContext, OptionalAdminAuth, RequireAdminAuth, SignInError, sign_in, sign_out,
};
pub use request_id::request_id_middleware;
pub use session::create_session_layer;
