//! REST endpoint wrappers used by the storefront.
//!
//! One async function per backend endpoint. No retries, no caching: every
//! call goes to the backend and returns what it says.

pub mod auth;
pub mod cart;
pub mod catalog;
pub mod contact;
pub mod profile;
pub mod reviews;
pub mod wishlist;
