//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                            - Home page (hero slider, featured products)
//! GET  /about                       - About page
//! GET  /terms                       - Terms page
//! GET  /unauthorized                - Token rejected by the backend; clears the session
//! GET  /contact                     - Contact form
//! POST /contact                     - Submit contact message
//!
//! # Products
//! GET  /products                    - Listing (?category, ?page, ?sort)
//! GET  /products/{id}               - Product detail with reviews
//! POST /products/{id}/reviews       - Create review (returns reviews fragment)
//! GET  /search                      - Search (?q, ?page, ?sort); HTMX gets the results fragment
//!
//! # Reviews (HTMX fragments)
//! POST /reviews/{id}/update         - Update own review
//! POST /reviews/{id}/delete         - Delete own review
//! POST /reviews/{id}/helpful        - Toggle helpful mark
//!
//! # Cart (requires login)
//! GET  /cart                        - Cart page
//! POST /cart/add                    - Add line (returns count badge, triggers cart-updated)
//! POST /cart/update                 - Change quantity (returns cart_items fragment)
//! POST /cart/remove                 - Remove line (returns cart_items fragment)
//! GET  /cart/count                  - Count badge fragment
//!
//! # Wishlist (requires login)
//! GET  /wishlist                    - Liked products
//! POST /wishlist/toggle             - Like or unlike (returns like button fragment)
//!
//! # Account (requires login)
//! GET  /account                     - Profile page
//! POST /account/profile             - Update details
//! POST /account/password            - Change password
//! POST /account/picture             - Upload profile picture (multipart)
//! POST /account/picture/delete      - Remove profile picture
//!
//! # Auth
//! GET  /auth/login                  - Login page
//! POST /auth/login                  - Login action
//! GET  /auth/register               - Register page
//! POST /auth/register               - Register action
//! POST /auth/logout                 - Logout action
//! ```

pub mod account;
pub mod auth;
pub mod cart;
pub mod contact;
pub mod home;
pub mod pages;
pub mod products;
pub mod reviews;
pub mod search;
pub mod wishlist;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/register", get(auth::register_page).post(auth::register))
        .route("/logout", post(auth::logout))
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{id}", get(products::show))
        .route("/{id}/reviews", post(reviews::create))
}

/// Create the review routes router.
pub fn review_routes() -> Router<AppState> {
    Router::new()
        .route("/{id}/update", post(reviews::update))
        .route("/{id}/delete", post(reviews::delete))
        .route("/{id}/helpful", post(reviews::helpful))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/count", get(cart::count))
}

/// Create the wishlist routes router.
pub fn wishlist_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(wishlist::index))
        .route("/toggle", post(wishlist::toggle))
}

/// Create the account routes router.
pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(account::index))
        .route("/profile", post(account::update_profile))
        .route("/password", post(account::change_password))
        .route("/picture", post(account::upload_picture))
        .route("/picture/delete", post(account::delete_picture))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/about", get(pages::about))
        .route("/terms", get(pages::terms))
        .route("/unauthorized", get(pages::unauthorized))
        .route("/contact", get(contact::show).post(contact::submit))
        .route("/search", get(search::index))
        .nest("/products", product_routes())
        .nest("/reviews", review_routes())
        .nest("/cart", cart_routes())
        .nest("/wishlist", wishlist_routes())
        .nest("/account", account_routes())
        .nest("/auth", auth_routes())
}
