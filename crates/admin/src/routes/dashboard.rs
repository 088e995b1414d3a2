//! Dashboard route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{Router, extract::State, routing::get};
use tracing::instrument;

use crate::{
    api,
    components::crud,
    error::Result,
    filters,
    middleware::RequireAdminAuth,
    models::CurrentAdmin,
    state::AppState,
    views::OrderRow,
};

/// Recent orders shown on the dashboard.
const RECENT_ORDERS: usize = 5;

/// Headline numbers, formatted for display.
#[derive(Debug, Clone, Default)]
pub struct DashboardMetrics {
    pub products: u64,
    pub orders: u64,
    pub users: u64,
    pub revenue: String,
    pub unread_messages: u64,
}

/// Dashboard template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub admin_user: CurrentAdmin,
    pub current_path: &'static str,
    pub metrics: DashboardMetrics,
    pub recent_orders: Vec<OrderRow>,
    pub error: Option<String>,
}

/// Build the dashboard router.
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(dashboard))
}

/// Dashboard page handler.
///
/// A failed stats call renders zeroes with a message, never an error page.
#[instrument(skip(ctx, state))]
async fn dashboard(
    RequireAdminAuth(ctx): RequireAdminAuth,
    State(state): State<AppState>,
) -> Result<DashboardTemplate> {
    let (stats, error) =
        crud::load_or_message(api::dashboard::stats(state.api(), &ctx.token).await, "stats")?;

    Ok(DashboardTemplate {
        admin_user: ctx.admin,
        current_path: "/",
        metrics: DashboardMetrics {
            products: stats.total_products,
            orders: stats.total_orders,
            users: stats.total_users,
            revenue: stats.total_revenue.display(),
            unread_messages: stats.unread_messages,
        },
        recent_orders: stats
            .recent_orders
            .iter()
            .take(RECENT_ORDERS)
            .map(OrderRow::from)
            .collect(),
        error,
    })
}
