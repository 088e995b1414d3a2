//! HTTP route handlers for admin.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                                   - Health check
//!
//! # Dashboard
//! GET  /                                         - Totals and recent orders
//!
//! # Auth
//! GET  /auth/login                               - Login page
//! POST /auth/login                               - Login (admin role only)
//! POST /auth/logout                              - Logout
//! GET  /auth/expired                             - Forget a rejected token
//!
//! # Attributes
//! GET  /attributes                               - Attribute list
//! GET  /attributes/new                           - Create modal
//! POST /attributes/save                          - Create or update
//! GET  /attributes/{id}/edit                     - Edit modal
//! GET  /attributes/{id}/delete                   - Confirm modal
//! POST /attributes/{id}/delete                   - Delete
//! GET  /attributes/{id}/values                   - Value list
//! GET  /attributes/{id}/values/new               - Value create modal
//! POST /attributes/{id}/values/save              - Value create or update
//! GET  /attributes/{id}/values/{value_id}/edit   - Value edit modal
//! GET  /attributes/{id}/values/{value_id}/delete - Value confirm modal
//! POST /attributes/{id}/values/{value_id}/delete - Value delete
//!
//! # Categories, subcategories, sliders (multipart saves)
//! GET  /{section}                                - List
//! GET  /{section}/new                            - Create modal
//! POST /{section}/save                           - Create or update
//! GET  /{section}/{id}/edit                      - Edit modal
//! GET  /{section}/{id}/delete                    - Confirm modal
//! POST /{section}/{id}/delete                    - Delete
//! POST /sliders/reorder                          - Persist a drag and drop
//!
//! # Messages
//! GET  /messages?page=N                          - Paginated messages
//! POST /messages/{id}/read?page=N                - Mark read
//! GET  /messages/{id}/delete?page=N              - Confirm modal
//! POST /messages/{id}/delete?page=N              - Delete
//!
//! # Orders
//! GET  /orders?page=N&status=S                   - Paginated orders
//! GET  /orders/{id}                              - Order detail
//! ```

pub mod attributes;
pub mod auth;
pub mod categories;
pub mod dashboard;
pub mod messages;
pub mod orders;
pub mod sliders;
pub mod subcategories;

use axum::Router;

use crate::state::AppState;

/// Build the complete router for admin.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(dashboard::router())
        .merge(auth::router())
        .merge(attributes::router())
        .merge(categories::router())
        .merge(subcategories::router())
        .merge(sliders::router())
        .merge(messages::router())
        .merge(orders::router())
}
