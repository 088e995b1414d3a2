//! End-to-end tests for Emporium.
//!
//! Both routers are driven in-process with `tower::ServiceExt::oneshot`
//! against [`backend::MockBackend`], a small axum server on a random local
//! port that plays the REST backend.
//!
//! ```bash
//! cargo test -p emporium-integration-tests
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::missing_panics_doc)]

pub mod backend;
pub mod harness;
