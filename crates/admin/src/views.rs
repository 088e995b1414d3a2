//! Display rows shared by admin templates.
//!
//! Backend records carry media paths relative to the upload host; rows carry
//! absolute URLs so templates can use them as-is.

use askama::Template;
use askama_web::WebTemplate;
use emporium_core::{
    Attribute, Category, CategoryId, ContactMessage, Order, Page, Slider, SliderId, Subcategory,
    SubcategoryId,
};
use serde::Deserialize;

use crate::state::AppState;

/// Category list row.
#[derive(Debug, Clone)]
pub struct CategoryRow {
    pub id: CategoryId,
    pub name: String,
    pub description: String,
    pub image: Option<String>,
    pub status: bool,
}

impl CategoryRow {
    #[must_use]
    pub fn list(state: &AppState, categories: &[Category]) -> Vec<Self> {
        categories
            .iter()
            .map(|c| Self {
                id: c.id,
                name: c.name.clone(),
                description: c.description.clone().unwrap_or_default(),
                image: c.image.as_deref().map(|p| state.media(p)),
                status: c.status,
            })
            .collect()
    }
}

/// Subcategory list row.
#[derive(Debug, Clone)]
pub struct SubcategoryRow {
    pub id: SubcategoryId,
    pub name: String,
    pub category: String,
    pub attributes: String,
    pub image: Option<String>,
    pub status: bool,
}

impl SubcategoryRow {
    /// Rows with the parent category's name, looked up in `categories` when
    /// the backend did not join it in.
    #[must_use]
    pub fn list(state: &AppState, subcategories: &[Subcategory], categories: &[Category]) -> Vec<Self> {
        subcategories
            .iter()
            .map(|s| Self {
                id: s.id,
                name: s.name.clone(),
                category: s
                    .category
                    .as_ref()
                    .or_else(|| categories.iter().find(|c| c.id == s.category_id))
                    .map_or_else(|| format!("#{}", s.category_id), |c| c.name.clone()),
                attributes: attribute_names(&s.attributes),
                image: s.image.as_deref().map(|p| state.media(p)),
                status: s.status,
            })
            .collect()
    }
}

fn attribute_names(attributes: &[Attribute]) -> String {
    attributes
        .iter()
        .map(|a| a.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Slider list row.
#[derive(Debug, Clone)]
pub struct SliderRow {
    pub id: SliderId,
    pub title: String,
    pub subtitle: String,
    pub image: Option<String>,
    pub video: Option<String>,
    pub link: String,
    pub status: bool,
}

impl SliderRow {
    /// Rows in the order given, which is the display order.
    #[must_use]
    pub fn list(state: &AppState, sliders: &[Slider]) -> Vec<Self> {
        sliders
            .iter()
            .map(|s| Self {
                id: s.id,
                title: s.title.clone(),
                subtitle: s.subtitle.clone().unwrap_or_default(),
                image: s.image.as_deref().map(|p| state.media(p)),
                video: s.video.as_deref().map(|p| state.media(p)),
                link: s.link.clone().unwrap_or_default(),
                status: s.status,
            })
            .collect()
    }
}

/// Order list row.
#[derive(Debug, Clone)]
pub struct OrderRow {
    pub id: String,
    pub number: String,
    pub customer: String,
    pub items: usize,
    pub total: String,
    pub status: &'static str,
    pub placed: String,
}

impl From<&Order> for OrderRow {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id.to_string(),
            number: order.display_number(),
            customer: order.customer_name(),
            items: order.items.len(),
            total: order.total.display(),
            status: order.status.label(),
            placed: format_date(order.created_at.as_ref()),
        }
    }
}

/// Contact message row.
#[derive(Debug, Clone)]
pub struct MessageRow {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub subject: String,
    pub message: String,
    pub is_read: bool,
    pub received: String,
}

impl From<&ContactMessage> for MessageRow {
    fn from(message: &ContactMessage) -> Self {
        Self {
            id: message.id.to_string(),
            name: message.name.clone(),
            email: message.email.clone(),
            phone: message.phone.clone().unwrap_or_default(),
            subject: message.subject.clone(),
            message: message.message.clone(),
            is_read: message.is_read,
            received: format_date(message.created_at.as_ref()),
        }
    }
}

fn format_date(at: Option<&chrono::DateTime<chrono::Utc>>) -> String {
    at.map(|d| d.format("%b %-d, %Y %H:%M").to_string())
        .unwrap_or_default()
}

/// Page navigation state for backend-paginated lists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
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

/// `?page=N` on paginated lists.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageQuery {
    #[serde(default)]
    pub page: Option<u32>,
}

impl PageQuery {
    /// Requested page; missing or zero means the first.
    #[must_use]
    pub fn page(self) -> u32 {
        self.page.filter(|p| *p > 0).unwrap_or(1)
    }
}

/// Confirmation modal shared by every delete action.
#[derive(Template, WebTemplate)]
#[template(path = "partials/confirm_delete.html")]
pub struct ConfirmDeleteTemplate {
    pub title: String,
    pub message: String,
    /// URL the confirm button posts to.
    pub action: String,
    pub error: Option<String>,
}

impl ConfirmDeleteTemplate {
    #[must_use]
    pub fn new(what: &str, action: String) -> Self {
        Self {
            title: format!("Delete {what}"),
            message: format!("Delete this {what}? This cannot be undone."),
            action,
            error: None,
        }
    }

    /// Same modal, explaining why the delete was refused.
    #[must_use]
    pub fn failed(mut self, message: String) -> Self {
        self.error = Some(message);
        self
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_names() {
        let attributes: Vec<Attribute> = serde_json::from_str(
            r#"[{"id": 7, "name": "Color", "status": true}, {"id": 9, "name": "Size"}]"#,
        )
        .unwrap();
        assert_eq!(attribute_names(&attributes), "Color, Size");
        assert_eq!(attribute_names(&[]), "");
    }

    #[test]
    fn test_order_row() {
        let order: Order = serde_json::from_str(
            r#"{"id": 42, "total": "59.90", "status": "shipped",
                "user": {"id": 3, "name": "Jane Doe"},
                "created_at": "2024-03-05T14:30:00Z"}"#,
        )
        .unwrap();
        let row = OrderRow::from(&order);
        assert_eq!(row.number, "#42");
        assert_eq!(row.customer, "Jane Doe");
        assert_eq!(row.status, "Shipped");
        assert_eq!(row.placed, "Mar 5, 2024 14:30");
    }

    #[test]
    fn test_pager_from_page() {
        let page = Page {
            items: vec![1, 2],
            current_page: 2,
            last_page: 3,
            total: 12,
        };
        let pager = Pager::from(&page);
        assert_eq!(pager.prev, Some(1));
        assert_eq!(pager.next, Some(3));
    }

    #[test]
    fn test_page_query_defaults_to_first() {
        assert_eq!(PageQuery::default().page(), 1);
        assert_eq!(PageQuery { page: Some(0) }.page(), 1);
        assert_eq!(PageQuery { page: Some(4) }.page(), 4);
    }

    #[test]
    fn test_confirm_delete_failure() {
        let modal = ConfirmDeleteTemplate::new("category", "/categories/2/delete".to_string())
            .failed("Category has subcategories".to_string());
        assert_eq!(modal.title, "Delete category");
        assert_eq!(modal.error.as_deref(), Some("Category has subcategories"));
    }
}
