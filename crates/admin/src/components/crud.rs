//! Save-then-refresh round trips shared by the catalog pages.
//!
//! Every create, update or delete is followed by exactly one re-read of the
//! collection, and the rendered list is only ever replaced by what that read
//! returned. Nothing is patched locally.

use std::future::Future;

use axum::response::{IntoResponse, Response};
use emporium_core::api::ApiError;
use emporium_core::toast::Toast;

use super::htmx::HxResponse;
use crate::error::AppError;

/// Container every modal fragment is swapped into.
pub const MODAL_TARGET: &str = "#modal";

/// How a mutation and its follow-up list read ended.
#[derive(Debug)]
pub enum SaveOutcome<T> {
    /// Saved, and the list was re-read.
    Refreshed(T),
    /// Saved, but the list could not be re-read.
    SavedStale(ApiError),
    /// The backend refused the change; nothing was re-read.
    Rejected(ApiError),
}

/// Run `persist`, then call `refetch` once if and only if it succeeded.
///
/// # Errors
///
/// A rejected token from either call is returned as an error so the session
/// gets cleared; every other failure is reported through [`SaveOutcome`].
pub async fn save_then_refetch<S, T, P, R, RF>(
    persist: P,
    refetch: R,
) -> Result<SaveOutcome<T>, AppError>
where
    P: Future<Output = Result<S, ApiError>>,
    R: FnOnce() -> RF,
    RF: Future<Output = Result<T, ApiError>>,
{
    match persist.await {
        Ok(_) => {}
        Err(e) if e.is_unauthorized() => return Err(e.into()),
        Err(e) => {
            tracing::warn!(error = %e, "Backend rejected save");
            return Ok(SaveOutcome::Rejected(e));
        }
    }

    match refetch().await {
        Ok(list) => Ok(SaveOutcome::Refreshed(list)),
        Err(e) if e.is_unauthorized() => Err(e.into()),
        Err(e) => {
            tracing::warn!(error = %e, "Saved but failed to reload list");
            Ok(SaveOutcome::SavedStale(e))
        }
    }
}

/// Data for a full page, or the message to show in its place.
///
/// # Errors
///
/// A rejected token is returned as an error so the session gets cleared.
pub fn load_or_message<T: Default>(
    result: Result<T, ApiError>,
    what: &str,
) -> Result<(T, Option<String>), AppError> {
    match result {
        Ok(data) => Ok((data, None)),
        Err(e) if e.is_unauthorized() => Err(e.into()),
        Err(e) => {
            tracing::warn!(error = %e, what, "Failed to load");
            Ok((T::default(), Some(e.user_message())))
        }
    }
}

/// Answer a fragment request that could not load its data: keep the page
/// as it is and explain in a toast.
///
/// # Errors
///
/// A rejected token is returned as an error so the session gets cleared.
pub fn toast_failure(error: ApiError) -> Result<Response, AppError> {
    if error.is_unauthorized() {
        return Err(error.into());
    }
    tracing::warn!(error = %error, "Fragment request failed");
    Ok(HxResponse::new("")
        .reswap("none")
        .toast(&Toast::error(error.user_message()))
        .into_response())
}

/// Swap a freshly rendered list over the one on the page.
pub fn list_swap<L: IntoResponse>(list: L, target: &'static str) -> HxResponse<L> {
    HxResponse::new(list).retarget(target).reswap("outerHTML")
}

/// Show `modal` in the modal container, replacing whatever is there.
pub fn modal_swap<M: IntoResponse>(modal: M) -> HxResponse<M> {
    HxResponse::new(modal)
        .retarget(MODAL_TARGET)
        .reswap("innerHTML")
}

/// Answer a save.
///
/// - refreshed: the new list replaces `list_target`, the modal closes and a
///   success toast shows
/// - saved but stale: the current list stays, the modal closes, an error
///   toast explains
/// - rejected: the modal is re-rendered with the backend's reason and stays
///   open, with the same reason in an error toast
pub fn respond<T, L, M>(
    outcome: SaveOutcome<T>,
    list_target: &'static str,
    success: &str,
    render_list: impl FnOnce(T) -> L,
    render_modal: impl FnOnce(&ApiError) -> M,
) -> Response
where
    L: IntoResponse,
    M: IntoResponse,
{
    match outcome {
        SaveOutcome::Refreshed(list) => list_swap(render_list(list), list_target)
            .close_modal()
            .toast(&Toast::success(success))
            .into_response(),
        SaveOutcome::SavedStale(e) => HxResponse::new("")
            .reswap("none")
            .close_modal()
            .toast(&Toast::error(format!(
                "Saved, but the list could not be reloaded: {}",
                e.user_message()
            )))
            .into_response(),
        SaveOutcome::Rejected(e) => modal_swap(render_modal(&e))
            .toast(&Toast::error(e.user_message()))
            .into_response(),
    }
}
