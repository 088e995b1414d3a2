//! Orders, carts and wishlists.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::product::{Product, ProductVariant};
use super::user::User;
use crate::types::{CartItemId, OrderId, OrderItemId, OrderStatus, Price, ProductId, WishlistItemId};

/// A placed order. Status transitions are owned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    #[serde(default, alias = "orderNumber")]
    pub order_number: Option<String>,
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    pub total: Price,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default, alias = "createdAt")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Order {
    /// Order number for display, falling back to the numeric ID.
    #[must_use]
    pub fn display_number(&self) -> String {
        self.order_number
            .clone()
            .unwrap_or_else(|| format!("#{}", self.id))
    }

    /// Customer name for display.
    #[must_use]
    pub fn customer_name(&self) -> String {
        self.user
            .as_ref()
            .map_or_else(|| "Guest".to_string(), |u| u.name.clone())
    }
}

/// One line of an order, frozen at purchase time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: OrderItemId,
    #[serde(alias = "productId")]
    pub product_id: ProductId,
    #[serde(alias = "productName")]
    pub product_name: String,
    #[serde(default, alias = "variantLabel")]
    pub variant_label: Option<String>,
    pub quantity: u32,
    pub price: Price,
}

/// The customer's cart, as computed by the backend.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Cart {
    #[serde(default)]
    pub items: Vec<CartItem>,
    /// Backend-computed subtotal; absent for an empty cart.
    #[serde(default)]
    pub subtotal: Option<Price>,
}

impl Cart {
    /// Total quantity across lines, for the header badge.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }

    /// Subtotal for display. Prefers the backend figure.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.subtotal.unwrap_or_else(|| {
            Price::new(self.items.iter().map(|item| item.line_total().amount()).sum())
        })
    }
}

/// One cart line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: CartItemId,
    pub product: Product,
    #[serde(default)]
    pub variant: Option<ProductVariant>,
    pub quantity: u32,
    #[serde(default, alias = "unitPrice")]
    pub unit_price: Option<Price>,
}

impl CartItem {
    /// Unit price: backend figure, then variant price, then product price.
    #[must_use]
    pub fn unit_price(&self) -> Price {
        self.unit_price
            .or_else(|| self.variant.as_ref().and_then(|v| v.price))
            .unwrap_or_else(|| self.product.effective_price())
    }

    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        Price::new(self.unit_price().amount() * rust_decimal::Decimal::from(self.quantity))
    }
}

/// A liked product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WishlistItem {
    pub id: WishlistItemId,
    pub product: Product,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const CART_JSON: &str = r#"{
        "items": [
            {"id": 1, "quantity": 2, "product": {"id": 10, "name": "Tee", "price": "20.00"}},
            {"id": 2, "quantity": 1, "unit_price": 5.5, "product": {"id": 11, "name": "Socks", "price": 8}}
        ]
    }"#;

    #[test]
    fn test_cart_totals_without_backend_subtotal() {
        let cart: Cart = serde_json::from_str(CART_JSON).unwrap();
        assert_eq!(cart.item_count(), 3);
        assert_eq!(cart.subtotal(), Price::from_cents(4550));
    }

    #[test]
    fn test_cart_prefers_backend_subtotal() {
        let mut cart: Cart = serde_json::from_str(CART_JSON).unwrap();
        cart.subtotal = Some(Price::from_cents(100));
        assert_eq!(cart.subtotal(), Price::from_cents(100));
    }

    #[test]
    fn test_order_display_fallbacks() {
        let order: Order = serde_json::from_str(r#"{"id": 9, "total": 10}"#).unwrap();
        assert_eq!(order.display_number(), "#9");
        assert_eq!(order.customer_name(), "Guest");
        assert_eq!(order.status, OrderStatus::Pending);
    }
}
