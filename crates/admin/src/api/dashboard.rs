//! Dashboard headline numbers.

use emporium_core::DashboardStats;
use emporium_core::api::{ApiClient, ApiError};
use secrecy::SecretString;
use tracing::instrument;

/// `GET /dashboard/stats`
///
/// # Errors
///
/// Returns error if the backend call fails.
#[instrument(skip_all)]
pub async fn stats(api: &ApiClient, token: &SecretString) -> Result<DashboardStats, ApiError> {
    api.get("/dashboard/stats").bearer(token).send_json().await
}
