//! Reusable pieces of the admin pages.
//!
//! - [`htmx`] - request detection and response header builders
//! - [`crud`] - save, re-read the list, and answer with the right fragment
//! - [`multipart`] - file-carrying forms passed through to the backend

pub mod crud;
pub mod htmx;
pub mod multipart;
