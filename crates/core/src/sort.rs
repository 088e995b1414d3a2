//! Sorting and filtering of lists the backend already returned.
//!
//! Nothing here fetches or paginates; it only rearranges one page.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::models::{Order, Product};
use crate::types::OrderStatus;

/// Product ordering selectable on listing and search pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// Backend order, untouched.
    #[default]
    Relevance,
    PriceAsc,
    PriceDesc,
    Name,
    Rating,
    Newest,
}

impl SortKey {
    /// Every option, in the order the sort menu lists them.
    pub const ALL: [Self; 6] = [
        Self::Relevance,
        Self::PriceAsc,
        Self::PriceDesc,
        Self::Name,
        Self::Rating,
        Self::Newest,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Relevance => "relevance",
            Self::PriceAsc => "price_asc",
            Self::PriceDesc => "price_desc",
            Self::Name => "name",
            Self::Rating => "rating",
            Self::Newest => "newest",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Relevance => "Relevance",
            Self::PriceAsc => "Price: low to high",
            Self::PriceDesc => "Price: high to low",
            Self::Name => "Name",
            Self::Rating => "Top rated",
            Self::Newest => "Newest",
        }
    }

    /// Parse a query-string value, falling back to [`SortKey::Relevance`].
    #[must_use]
    pub fn from_query(value: Option<&str>) -> Self {
        value.and_then(|v| v.parse().ok()).unwrap_or_default()
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unrecognized sort key.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown sort key: {0}")]
pub struct UnknownSortKey(pub String);

impl FromStr for SortKey {
    type Err = UnknownSortKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|key| key.as_str() == s.trim())
            .ok_or_else(|| UnknownSortKey(s.to_string()))
    }
}

/// Sort products in place. The sort is stable, so ties keep backend order.
pub fn sort_products(products: &mut [Product], key: SortKey) {
    match key {
        SortKey::Relevance => {}
        SortKey::PriceAsc => products.sort_by_key(Product::effective_price),
        SortKey::PriceDesc => {
            products.sort_by_key(|p| std::cmp::Reverse(p.effective_price()));
        }
        SortKey::Name => products.sort_by_cached_key(|p| p.name.to_lowercase()),
        SortKey::Rating => products.sort_by(|a, b| {
            b.rating
                .partial_cmp(&a.rating)
                .unwrap_or(Ordering::Equal)
                .then_with(|| b.review_count.cmp(&a.review_count))
        }),
        // Undated products sink to the end.
        SortKey::Newest => products.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
    }
}

/// Case-insensitive substring match against `haystack`; an empty needle matches.
#[must_use]
pub fn matches_text(haystack: &str, needle: &str) -> bool {
    let needle = needle.trim();
    needle.is_empty() || haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Orders with the given status, or all orders when `status` is `None`.
#[must_use]
pub fn filter_orders(orders: Vec<Order>, status: Option<OrderStatus>) -> Vec<Order> {
    match status {
        Some(status) => orders.into_iter().filter(|o| o.status == status).collect(),
        None => orders,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::{OrderId, Price, ProductId};

    fn product(id: i64, name: &str, cents: i64, rating: f64, day: u32) -> Product {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "name": name,
            "price": Price::from_cents(cents),
            "rating": rating,
            "created_at": format!("2024-01-{day:02}T00:00:00Z"),
        }))
        .unwrap()
    }

    fn ids(products: &[Product]) -> Vec<i64> {
        products.iter().map(|p| p.id.as_i64()).collect()
    }

    fn catalog() -> Vec<Product> {
        vec![
            product(1, "mug", 1500, 4.0, 3),
            product(2, "Apron", 900, 4.8, 1),
            product(3, "Kettle", 4200, 3.5, 9),
        ]
    }

    #[test]
    fn test_parse_sort_key() {
        assert_eq!("price_desc".parse::<SortKey>().unwrap(), SortKey::PriceDesc);
        assert!("cheapest".parse::<SortKey>().is_err());
        assert_eq!(SortKey::from_query(Some("bogus")), SortKey::Relevance);
        assert_eq!(SortKey::from_query(None), SortKey::Relevance);
    }

    #[test]
    fn test_sort_products() {
        let mut products = catalog();
        sort_products(&mut products, SortKey::PriceAsc);
        assert_eq!(ids(&products), vec![2, 1, 3]);

        sort_products(&mut products, SortKey::PriceDesc);
        assert_eq!(ids(&products), vec![3, 1, 2]);

        sort_products(&mut products, SortKey::Name);
        assert_eq!(ids(&products), vec![2, 3, 1]);

        sort_products(&mut products, SortKey::Rating);
        assert_eq!(ids(&products), vec![2, 1, 3]);

        sort_products(&mut products, SortKey::Newest);
        assert_eq!(ids(&products), vec![3, 1, 2]);
    }

    #[test]
    fn test_relevance_keeps_backend_order() {
        let mut products = catalog();
        sort_products(&mut products, SortKey::Relevance);
        assert_eq!(ids(&products), vec![1, 2, 3]);
        assert_eq!(products[0].id, ProductId::new(1));
    }

    #[test]
    fn test_matches_text() {
        assert!(matches_text("Hello World", "world"));
        assert!(matches_text("anything", "  "));
        assert!(!matches_text("Hello", "bye"));
    }

    #[test]
    fn test_filter_orders() {
        let order = |id: i64, status: &str| -> Order {
            serde_json::from_value(serde_json::json!({"id": id, "total": 1, "status": status}))
                .unwrap()
        };
        let orders = vec![order(1, "shipped"), order(2, "pending"), order(3, "shipped")];

        let shipped = filter_orders(orders.clone(), Some(OrderStatus::Shipped));
        assert_eq!(
            shipped.iter().map(|o| o.id).collect::<Vec<_>>(),
            vec![OrderId::new(1), OrderId::new(3)]
        );
        assert_eq!(filter_orders(orders, None).len(), 3);
    }
}
