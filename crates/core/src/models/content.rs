//! Marketing content and back-office records: sliders, contact messages,
//! dashboard statistics.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::commerce::Order;
use crate::reorder::Identified;
use crate::types::{ContactMessageId, Price, SliderId};

/// A home-page hero slide. Slides with a video play it instead of the image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slider {
    pub id: SliderId,
    pub title: String,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub video: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    /// Display position; lower comes first.
    #[serde(default, alias = "order", alias = "sort_order")]
    pub position: i32,
    #[serde(default)]
    pub status: bool,
}

impl Identified for Slider {
    type Id = SliderId;

    fn id(&self) -> SliderId {
        self.id
    }
}

impl Slider {
    /// Active slides in display order.
    #[must_use]
    pub fn active_in_order(sliders: Vec<Self>) -> Vec<Self> {
        let mut active: Vec<Self> = sliders.into_iter().filter(|s| s.status).collect();
        active.sort_by_key(|s| s.position);
        active
    }
}

/// A message submitted through the storefront contact form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactMessage {
    pub id: ContactMessageId,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub subject: String,
    pub message: String,
    #[serde(default, alias = "isRead")]
    pub is_read: bool,
    #[serde(default, alias = "createdAt")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Headline numbers for the admin dashboard.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardStats {
    #[serde(alias = "totalProducts")]
    pub total_products: u64,
    #[serde(alias = "totalOrders")]
    pub total_orders: u64,
    #[serde(alias = "totalUsers")]
    pub total_users: u64,
    #[serde(alias = "totalRevenue")]
    pub total_revenue: Price,
    #[serde(alias = "unreadMessages")]
    pub unread_messages: u64,
    #[serde(alias = "recentOrders")]
    pub recent_orders: Vec<Order>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn slider(id: i64, position: i32, status: bool) -> Slider {
        Slider {
            id: SliderId::new(id),
            title: format!("Slide {id}"),
            subtitle: None,
            image: None,
            video: None,
            link: None,
            position,
            status,
        }
    }

    #[test]
    fn test_active_in_order() {
        let sliders = vec![slider(1, 3, true), slider(2, 1, false), slider(3, 2, true)];
        let ids: Vec<_> = Slider::active_in_order(sliders)
            .into_iter()
            .map(|s| s.id.as_i64())
            .collect();
        assert_eq!(ids, vec![3, 1]);
    }

    #[test]
    fn test_stats_tolerate_missing_fields() {
        let stats: DashboardStats = serde_json::from_str(r#"{"totalOrders": 12}"#).unwrap();
        assert_eq!(stats.total_orders, 12);
        assert_eq!(stats.total_revenue, Price::ZERO);
        assert!(stats.recent_orders.is_empty());
    }
}
