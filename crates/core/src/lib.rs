//! Emporium Core - Shared types library.
//!
//! This crate provides common types used across all Emporium components:
//! - `storefront` - Public-facing shop
//! - `admin` - Catalog and content administration dashboard
//!
//! # Architecture
//!
//! Everything except the optional [`api`] module is pure: no I/O, no HTTP
//! clients. The `client` feature adds the REST transport both binaries use to
//! talk to the backend.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, emails and statuses
//! - [`models`] - Backend entities, deserialized as delivered
//! - [`reorder`] - Drag-and-drop reorder state machine
//! - [`optimistic`] - Apply-then-confirm helper with rollback
//! - [`toast`] - Transient notifications carried in HTMX triggers
//! - [`sort`] - Sorting and filtering of already-fetched lists

#![cfg_attr(not(test), forbid(unsafe_code))]

#[cfg(feature = "client")]
pub mod api;
pub mod models;
pub mod optimistic;
pub mod reorder;
pub mod sort;
pub mod toast;
pub mod types;

pub use models::*;
pub use types::*;
