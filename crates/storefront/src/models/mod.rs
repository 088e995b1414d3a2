//! Storefront-side models: what the session remembers about a visitor.

pub mod session;

pub use session::{CurrentUser, keys as session_keys};
