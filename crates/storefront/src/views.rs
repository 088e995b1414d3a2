//! Display data handed to templates.
//!
//! Templates only see pre-formatted strings and absolute media URLs.

use emporium_core::{
    Cart, CartItem, CartItemId, Page, Product, ProductId, Review, ReviewId, Slider, UserId,
    VariantId,
};

use crate::state::AppState;

/// Filled and empty stars for a 0-5 rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stars {
    pub filled: u8,
    pub empty: u8,
}

impl Stars {
    /// Round an average rating to whole stars.
    #[must_use]
    pub fn from_average(rating: f64) -> Self {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let filled = rating.round().clamp(0.0, f64::from(Review::MAX_RATING)) as u8;
        Self {
            filled,
            empty: Review::MAX_RATING - filled,
        }
    }

    /// Star glyphs, e.g. "★★★☆☆".
    #[must_use]
    pub fn glyphs(&self) -> String {
        let mut out = "★".repeat(usize::from(self.filled));
        out.push_str(&"☆".repeat(usize::from(self.empty)));
        out
    }
}

/// Product tile used by listings, search and the wishlist.
#[derive(Debug, Clone)]
pub struct ProductCard {
    pub id: ProductId,
    pub name: String,
    pub price: String,
    /// List price, shown struck through when discounted.
    pub original_price: Option<String>,
    pub image: Option<String>,
    pub stars: Stars,
    pub review_count: u32,
    pub is_liked: bool,
}

impl ProductCard {
    #[must_use]
    pub fn new(state: &AppState, product: &Product) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            price: product.effective_price().display(),
            original_price: product.is_discounted().then(|| product.price.display()),
            image: product.primary_image().map(|path| state.media(path)),
            stars: Stars::from_average(product.rating),
            review_count: product.review_count,
            is_liked: product.is_liked,
        }
    }

    #[must_use]
    pub fn list(state: &AppState, products: &[Product]) -> Vec<Self> {
        products.iter().map(|p| Self::new(state, p)).collect()
    }
}

/// One selectable variant on the product page.
#[derive(Debug, Clone)]
pub struct VariantOption {
    pub id: VariantId,
    pub label: String,
    pub price: Option<String>,
    pub in_stock: bool,
}

/// Product detail page data.
#[derive(Debug, Clone)]
pub struct ProductDetail {
    pub card: ProductCard,
    pub description: String,
    pub images: Vec<String>,
    pub category: Option<String>,
    pub brand: Option<String>,
    pub variants: Vec<VariantOption>,
}

impl ProductDetail {
    #[must_use]
    pub fn new(state: &AppState, product: &Product) -> Self {
        Self {
            card: ProductCard::new(state, product),
            description: product.description.clone().unwrap_or_default(),
            images: product.images.iter().map(|path| state.media(path)).collect(),
            category: product.category.as_ref().map(|c| c.name.clone()),
            brand: product.brand.as_ref().map(|b| b.name.clone()),
            variants: product
                .variants
                .iter()
                .map(|v| VariantOption {
                    id: v.id,
                    label: v.label(),
                    price: v.price.map(|p| p.display()),
                    in_stock: v.in_stock(),
                })
                .collect(),
        }
    }
}

/// Hero slide on the home page.
#[derive(Debug, Clone)]
pub struct SlideView {
    pub title: String,
    pub subtitle: Option<String>,
    pub image: Option<String>,
    /// Video slides play this instead of showing the image.
    pub video: Option<String>,
    pub link: Option<String>,
}

impl SlideView {
    #[must_use]
    pub fn new(state: &AppState, slider: &Slider) -> Self {
        Self {
            title: slider.title.clone(),
            subtitle: slider.subtitle.clone(),
            image: slider.image.as_deref().map(|p| state.media(p)),
            video: slider.video.as_deref().map(|p| state.media(p)),
            link: slider.link.clone(),
        }
    }
}

/// A review as shown under a product.
#[derive(Debug, Clone)]
pub struct ReviewView {
    pub id: ReviewId,
    pub author: String,
    pub initials: String,
    pub avatar: Option<String>,
    pub rating: u8,
    pub stars: Stars,
    pub comment: String,
    pub helpful_count: u32,
    pub is_helpful: bool,
    pub date: String,
    /// Written by the current customer, who may edit or delete it.
    pub is_own: bool,
}

impl ReviewView {
    #[must_use]
    pub fn new(state: &AppState, review: &Review, viewer: Option<UserId>) -> Self {
        let (filled, empty) = review.stars();
        let user = review.user.as_ref();
        Self {
            id: review.id,
            author: user.map_or_else(|| "Anonymous".to_string(), |u| u.name.clone()),
            initials: user.map_or_else(|| "?".to_string(), emporium_core::User::initials),
            avatar: user.and_then(|u| u.avatar.as_deref()).map(|p| state.media(p)),
            rating: review.rating,
            stars: Stars { filled, empty },
            comment: review.comment.clone(),
            helpful_count: review.helpful_count,
            is_helpful: review.is_helpful,
            date: review
                .created_at
                .map(|d| d.format("%b %-d, %Y").to_string())
                .unwrap_or_default(),
            is_own: viewer.is_some() && user.map(|u| u.id) == viewer,
        }
    }
}

/// One cart line.
#[derive(Debug, Clone)]
pub struct CartLineView {
    pub id: CartItemId,
    pub product_id: ProductId,
    pub name: String,
    pub variant: Option<String>,
    pub quantity: u32,
    pub unit_price: String,
    pub line_total: String,
    pub image: Option<String>,
}

impl CartLineView {
    fn new(state: &AppState, item: &CartItem) -> Self {
        Self {
            id: item.id,
            product_id: item.product.id,
            name: item.product.name.clone(),
            variant: item.variant.as_ref().map(emporium_core::ProductVariant::label),
            quantity: item.quantity,
            unit_price: item.unit_price().display(),
            line_total: item.line_total().display(),
            image: item.product.primary_image().map(|p| state.media(p)),
        }
    }
}

/// Cart display data.
#[derive(Debug, Clone)]
pub struct CartView {
    pub lines: Vec<CartLineView>,
    pub subtotal: String,
    pub item_count: u32,
}

impl CartView {
    #[must_use]
    pub fn new(state: &AppState, cart: &Cart) -> Self {
        Self {
            lines: cart.items.iter().map(|i| CartLineView::new(state, i)).collect(),
            subtotal: cart.subtotal().display(),
            item_count: cart.item_count(),
        }
    }
}

/// Previous/next links for a backend-paginated list.
#[derive(Debug, Clone, Copy, Default)]
pub struct Pager {
    pub current: u32,
    pub last: u32,
    pub prev: Option<u32>,
    pub next: Option<u32>,
}

impl<T> From<&Page<T>> for Pager {
    fn from(page: &Page<T>) -> Self {
        Self {
            current: page.current_page,
            last: page.last_page,
            prev: page.prev_page(),
            next: page.next_page(),
        }
    }
}

/// Query string prefix that keeps the other filters when paging, e.g.
/// `"q=shirt&sort=name&"`. Blank values are left out.
#[must_use]
pub fn query_prefix(pairs: &[(&str, &str)]) -> String {
    let mut serializer = url::form_urlencoded::Serializer::new(String::new());
    for (key, value) in pairs.iter().filter(|(_, v)| !v.is_empty()) {
        serializer.append_pair(key, value);
    }
    let mut query = serializer.finish();
    if !query.is_empty() {
        query.push('&');
    }
    query
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_prefix() {
        assert_eq!(query_prefix(&[]), "");
        assert_eq!(
            query_prefix(&[("q", "red shirt"), ("category", ""), ("sort", "name")]),
            "q=red+shirt&sort=name&"
        );
    }

    #[test]
    fn test_stars_round_and_clamp() {
        assert_eq!(Stars::from_average(4.6), Stars { filled: 5, empty: 0 });
        assert_eq!(Stars::from_average(3.2), Stars { filled: 3, empty: 2 });
        assert_eq!(Stars::from_average(-1.0), Stars { filled: 0, empty: 5 });
        assert_eq!(Stars::from_average(9.0).glyphs(), "★★★★★");
        assert_eq!(Stars::from_average(2.0).glyphs(), "★★☆☆☆");
    }

    #[test]
    fn test_pager_from_page() {
        let page = Page {
            items: vec![1, 2],
            current_page: 2,
            last_page: 2,
            total: 12,
        };
        let pager = Pager::from(&page);
        assert_eq!(pager.prev, Some(1));
        assert_eq!(pager.next, None);
    }
}
