//! Order browsing. Orders are read-only here; status changes belong to the
//! backend.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Router,
    extract::{Path, Query, State},
    routing::get,
};
use emporium_core::{Order, OrderId, OrderStatus};
use serde::Deserialize;
use tracing::instrument;

use crate::{
    api,
    components::crud,
    error::Result,
    filters,
    middleware::RequireAdminAuth,
    models::CurrentAdmin,
    state::AppState,
    views::{OrderRow, Pager},
};

/// Query parameters for the order list.
#[derive(Debug, Default, Deserialize)]
pub struct OrderQuery {
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub status: Option<String>,
}

impl OrderQuery {
    fn page(&self) -> u32 {
        self.page.filter(|p| *p > 0).unwrap_or(1)
    }

    /// The status filter; blank or unrecognised values mean "all".
    fn status(&self) -> Option<OrderStatus> {
        self.status.as_deref().and_then(|s| s.parse().ok())
    }
}

/// Entry of the status filter dropdown.
#[derive(Debug, Clone)]
pub struct StatusOption {
    pub value: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

/// Order list page.
#[derive(Template, WebTemplate)]
#[template(path = "orders/index.html")]
pub struct OrdersTemplate {
    pub admin_user: CurrentAdmin,
    pub current_path: &'static str,
    pub orders: Vec<OrderRow>,
    pub pager: Pager,
    pub statuses: Vec<StatusOption>,
    /// Appended to pager links so the filter survives paging.
    pub status_query: String,
    pub error: Option<String>,
}

/// One line of the order detail.
#[derive(Debug, Clone)]
pub struct OrderLine {
    pub product: String,
    pub variant: String,
    pub quantity: u32,
    pub price: String,
}

/// Order detail page.
#[derive(Template, WebTemplate)]
#[template(path = "orders/show.html")]
pub struct OrderTemplate {
    pub admin_user: CurrentAdmin,
    pub current_path: &'static str,
    pub order: OrderRow,
    pub email: String,
    pub lines: Vec<OrderLine>,
}

/// Build the orders router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/orders", get(index))
        .route("/orders/{id}", get(show))
}

/// Orders on the current page with the given status. The backend does not
/// filter, so this narrows the page it returned.
pub fn filter_orders(orders: &[Order], status: Option<OrderStatus>) -> Vec<&Order> {
    orders
        .iter()
        .filter(|o| status.is_none_or(|s| o.status == s))
        .collect()
}

fn status_options(selected: Option<OrderStatus>) -> Vec<StatusOption> {
    OrderStatus::FILTERABLE
        .into_iter()
        .map(|s| StatusOption {
            value: s.as_str(),
            label: s.label(),
            selected: selected == Some(s),
        })
        .collect()
}

/// Order listing.
///
/// GET /orders?page=N&status=S
#[instrument(skip(ctx, state))]
async fn index(
    RequireAdminAuth(ctx): RequireAdminAuth,
    State(state): State<AppState>,
    Query(query): Query<OrderQuery>,
) -> Result<OrdersTemplate> {
    let status = query.status();
    let (page, error) = crud::load_or_message(
        api::orders::list(state.api(), &ctx.token, query.page())
            .await
            .map(Some),
        "orders",
    )?;

    let (orders, pager) = page.map_or_else(Default::default, |page| {
        (
            filter_orders(&page.items, status)
                .into_iter()
                .map(OrderRow::from)
                .collect(),
            Pager::from(&page),
        )
    });

    Ok(OrdersTemplate {
        admin_user: ctx.admin,
        current_path: "/orders",
        orders,
        pager,
        statuses: status_options(status),
        status_query: status
            .map(|s| format!("&status={}", s.as_str()))
            .unwrap_or_default(),
        error,
    })
}

/// Order detail.
///
/// GET /orders/{id}
#[instrument(skip(ctx, state))]
async fn show(
    RequireAdminAuth(ctx): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<OrderId>,
) -> Result<OrderTemplate> {
    let order = api::orders::get(state.api(), &ctx.token, id).await?;

    Ok(OrderTemplate {
        admin_user: ctx.admin,
        current_path: "/orders",
        email: order
            .user
            .as_ref()
            .map(|u| u.email.clone())
            .unwrap_or_default(),
        lines: order
            .items
            .iter()
            .map(|item| OrderLine {
                product: item.product_name.clone(),
                variant: item.variant_label.clone().unwrap_or_default(),
                quantity: item.quantity,
                price: item.price.display(),
            })
            .collect(),
        order: OrderRow::from(&order),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn orders() -> Vec<Order> {
        serde_json::from_str(
            r#"[
                {"id": 1, "total": "10.00", "status": "pending"},
                {"id": 2, "total": "20.00", "status": "shipped"},
                {"id": 3, "total": "30.00", "status": "pending"}
            ]"#,
        )
        .unwrap()
    }

    #[test]
    fn test_filter_orders_by_status() {
        let orders = orders();
        let pending = filter_orders(&orders, Some(OrderStatus::Pending));
        let ids: Vec<String> = pending.iter().map(|o| o.id.to_string()).collect();
        assert_eq!(ids, ["1", "3"]);
    }

    #[test]
    fn test_filter_orders_without_status_keeps_all() {
        let orders = orders();
        assert_eq!(filter_orders(&orders, None).len(), 3);
        assert!(filter_orders(&orders, Some(OrderStatus::Refunded)).is_empty());
    }

    #[test]
    fn test_query_status_ignores_unknown_values() {
        let query = OrderQuery {
            page: None,
            status: Some("on_hold".to_string()),
        };
        assert_eq!(query.status(), None);
        assert_eq!(query.page(), 1);

        let query = OrderQuery {
            page: Some(2),
            status: Some("shipped".to_string()),
        };
        assert_eq!(query.status(), Some(OrderStatus::Shipped));
    }

    #[test]
    fn test_status_options_mark_selection() {
        let options = status_options(Some(OrderStatus::Delivered));
        assert_eq!(options.len(), 6);
        assert!(options.iter().any(|o| o.value == "delivered" && o.selected));
        assert_eq!(options.iter().filter(|o| o.selected).count(), 1);
    }
}
