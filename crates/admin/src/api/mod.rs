//! REST endpoint wrappers used by the admin panel.
//!
//! One async function per backend endpoint. No retries, no caching: every
//! list is read fresh after every mutation.

pub mod attributes;
pub mod auth;
pub mod catalog;
pub mod dashboard;
pub mod messages;
pub mod orders;
pub mod sliders;
