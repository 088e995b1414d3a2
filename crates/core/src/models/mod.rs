//! Backend entities.
//!
//! Records are mirrored 1:1 from the REST backend and arrive with their
//! relations already joined. The front end never patches them in place: after
//! any write the affected list is fetched again.

pub mod catalog;
pub mod commerce;
pub mod content;
pub mod page;
pub mod product;
pub mod user;

pub use catalog::{Attribute, AttributeValue, Brand, Category, Subcategory};
pub use commerce::{Cart, CartItem, Order, OrderItem, WishlistItem};
pub use content::{ContactMessage, DashboardStats, Slider};
pub use page::Page;
pub use product::{Product, ProductVariant, Review};
pub use user::{AuthSession, User};
