//! Products, variants and reviews.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::catalog::{AttributeValue, Brand, Category};
use super::user::User;
use crate::types::{Price, ProductId, ReviewId, VariantId};

/// A sellable product with its pre-joined relations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: Price,
    #[serde(default, alias = "discountPrice")]
    pub discount_price: Option<Price>,
    /// Media paths relative to the upload host, primary image first.
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default)]
    pub brand: Option<Brand>,
    #[serde(default)]
    pub variants: Vec<ProductVariant>,
    /// Average review rating computed by the backend.
    #[serde(default)]
    pub rating: f64,
    #[serde(default, alias = "reviewCount")]
    pub review_count: u32,
    #[serde(default)]
    pub status: bool,
    /// Whether the current customer has the product in their wishlist.
    #[serde(default, alias = "isLiked")]
    pub is_liked: bool,
    #[serde(default, alias = "createdAt")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Product {
    /// Price the customer pays: the discount price when it undercuts the list price.
    #[must_use]
    pub fn effective_price(&self) -> Price {
        match self.discount_price {
            Some(discount) if discount < self.price => discount,
            _ => self.price,
        }
    }

    /// Whether a discount is in effect.
    #[must_use]
    pub fn is_discounted(&self) -> bool {
        self.effective_price() < self.price
    }

    /// Primary image path, if any.
    #[must_use]
    pub fn primary_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }
}

/// A purchasable variant of a product (one combination of attribute values).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductVariant {
    pub id: VariantId,
    #[serde(default)]
    pub sku: Option<String>,
    /// Variant-specific price overriding the product price.
    #[serde(default)]
    pub price: Option<Price>,
    #[serde(default)]
    pub stock: i64,
    #[serde(default, alias = "attributeValues")]
    pub attribute_values: Vec<AttributeValue>,
}

impl ProductVariant {
    /// Display label built from the attribute values ("Red / XL").
    #[must_use]
    pub fn label(&self) -> String {
        if self.attribute_values.is_empty() {
            return self.sku.clone().unwrap_or_else(|| "Default".to_string());
        }
        self.attribute_values
            .iter()
            .map(|v| v.value.as_str())
            .collect::<Vec<_>>()
            .join(" / ")
    }

    /// Whether the variant can be added to a cart.
    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.stock > 0
    }
}

/// A customer review of a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    pub id: ReviewId,
    #[serde(alias = "productId")]
    pub product_id: ProductId,
    #[serde(default)]
    pub user: Option<User>,
    pub rating: u8,
    #[serde(default)]
    pub comment: String,
    #[serde(default, alias = "helpfulCount")]
    pub helpful_count: u32,
    /// Whether the current customer marked this review helpful.
    #[serde(default, alias = "isHelpful")]
    pub is_helpful: bool,
    #[serde(default, alias = "createdAt")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Review {
    /// Lowest accepted rating.
    pub const MIN_RATING: u8 = 1;
    /// Highest accepted rating.
    pub const MAX_RATING: u8 = 5;

    /// Filled and empty star counts for a star-rating widget.
    #[must_use]
    pub fn stars(&self) -> (u8, u8) {
        let filled = self.rating.min(Self::MAX_RATING);
        (filled, Self::MAX_RATING - filled)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::{AttributeId, AttributeValueId};

    fn product(price: i64, discount: Option<i64>) -> Product {
        Product {
            id: ProductId::new(1),
            name: "Runner".to_string(),
            description: None,
            price: Price::from_cents(price),
            discount_price: discount.map(Price::from_cents),
            images: vec![],
            category: None,
            brand: None,
            variants: vec![],
            rating: 0.0,
            review_count: 0,
            status: true,
            is_liked: false,
            created_at: None,
        }
    }

    #[test]
    fn test_effective_price_ignores_non_discounts() {
        assert_eq!(product(5000, Some(4000)).effective_price(), Price::from_cents(4000));
        assert_eq!(product(5000, Some(6000)).effective_price(), Price::from_cents(5000));
        assert!(!product(5000, None).is_discounted());
    }

    #[test]
    fn test_variant_label() {
        let variant = ProductVariant {
            id: VariantId::new(1),
            sku: Some("RUN-RED-XL".to_string()),
            price: None,
            stock: 0,
            attribute_values: vec![
                AttributeValue {
                    id: AttributeValueId::new(1),
                    attribute_id: AttributeId::new(7),
                    value: "Red".to_string(),
                    status: true,
                },
                AttributeValue {
                    id: AttributeValueId::new(2),
                    attribute_id: AttributeId::new(8),
                    value: "XL".to_string(),
                    status: true,
                },
            ],
        };
        assert_eq!(variant.label(), "Red / XL");
        assert!(!variant.in_stock());
    }

    #[test]
    fn test_review_stars() {
        let review: Review =
            serde_json::from_str(r#"{"id": 1, "product_id": 2, "rating": 4}"#).unwrap();
        assert_eq!(review.stars(), (4, 1));
    }
}
