//! Home-page slider pages.
//!
//! Besides the usual modal CRUD, rows can be dragged onto each other. The
//! browser moves the row right away and posts the drop here; the answer is
//! always the list in the order the backend holds.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Router,
    extract::{Multipart, Path, State},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use emporium_core::SliderId;
use emporium_core::api::{ApiError, multipart_form};
use emporium_core::reorder::{ReorderList, ReorderOutcome};
use emporium_core::toast::Toast;
use serde::Deserialize;
use tracing::instrument;
use validator::Validate;

use crate::api;
use crate::components::htmx::HxResponse;
use crate::components::{crud, multipart::MultipartForm};
use crate::error::Result;
use crate::filters;
use crate::forms::{FormErrors, SliderForm};
use crate::middleware::RequireAdminAuth;
use crate::models::CurrentAdmin;
use crate::state::AppState;
use crate::views::{ConfirmDeleteTemplate, SliderRow};

const LIST_TARGET: &str = "#slider-list";
const IMAGE_FIELD: &str = "image";
const VIDEO_FIELD: &str = "video";

/// Slider page.
#[derive(Template, WebTemplate)]
#[template(path = "sliders/index.html")]
pub struct SlidersTemplate {
    pub admin_user: CurrentAdmin,
    pub current_path: &'static str,
    pub sliders: Vec<SliderRow>,
    pub error: Option<String>,
}

/// Slider list fragment, in display order.
#[derive(Template, WebTemplate)]
#[template(path = "sliders/list.html")]
pub struct SliderListTemplate {
    pub sliders: Vec<SliderRow>,
    pub error: Option<String>,
}

/// Slider create/edit modal.
#[derive(Template, WebTemplate)]
#[template(path = "sliders/form.html")]
pub struct SliderFormTemplate {
    pub form: SliderForm,
    pub image: Option<String>,
    pub video: Option<String>,
    pub errors: FormErrors,
    pub error: Option<String>,
}

impl SliderFormTemplate {
    fn new(form: SliderForm) -> Self {
        Self {
            form,
            image: None,
            video: None,
            errors: FormErrors::default(),
            error: None,
        }
    }
}

/// A row released over another row.
#[derive(Debug, Deserialize)]
pub struct ReorderForm {
    pub source_id: SliderId,
    pub target_id: SliderId,
}

/// Build the sliders router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/sliders", get(index))
        .route("/sliders/new", get(new))
        .route("/sliders/save", post(save))
        .route("/sliders/reorder", post(reorder))
        .route("/sliders/{id}/edit", get(edit))
        .route("/sliders/{id}/delete", get(confirm_delete).post(delete))
}

#[instrument(skip(ctx, state))]
async fn index(
    RequireAdminAuth(ctx): RequireAdminAuth,
    State(state): State<AppState>,
) -> Result<SlidersTemplate> {
    let (sliders, error) =
        crud::load_or_message(api::sliders::list(state.api(), &ctx.token).await, "sliders")?;

    Ok(SlidersTemplate {
        admin_user: ctx.admin,
        current_path: "/sliders",
        sliders: SliderRow::list(&state, &sliders),
        error,
    })
}

#[instrument(skip(_ctx))]
async fn new(RequireAdminAuth(_ctx): RequireAdminAuth) -> SliderFormTemplate {
    SliderFormTemplate::new(SliderForm {
        status: true,
        ..SliderForm::default()
    })
}

#[instrument(skip(ctx, state))]
async fn edit(
    RequireAdminAuth(ctx): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<SliderId>,
) -> Result<Response> {
    let slider = match api::sliders::get(state.api(), &ctx.token, id).await {
        Ok(slider) => slider,
        Err(e) => return crud::toast_failure(e),
    };

    let mut modal = SliderFormTemplate::new(SliderForm::from(&slider));
    modal.image = slider.image.as_deref().map(|p| state.media(p));
    modal.video = slider.video.as_deref().map(|p| state.media(p));
    Ok(modal.into_response())
}

/// Create when the form has no `id`, update otherwise. Empty file inputs
/// keep the stored media.
#[instrument(skip_all)]
async fn save(
    RequireAdminAuth(ctx): RequireAdminAuth,
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Response> {
    let body = MultipartForm::read(multipart, &[IMAGE_FIELD, VIDEO_FIELD]).await?;
    let form = SliderForm::from_multipart(&body)?;

    if let Err(e) = form.validate() {
        let mut modal = SliderFormTemplate::new(form);
        modal.errors = FormErrors::from_validation(&e);
        return Ok(crud::modal_swap(modal).into_response());
    }

    let uploads = body.into_uploads();
    let persist = async {
        let parts = multipart_form(form.fields(), uploads)?;
        api::sliders::save(state.api(), &ctx.token, form.id, parts).await
    };
    let outcome =
        crud::save_then_refetch(persist, || api::sliders::list(state.api(), &ctx.token)).await?;

    let success = if form.id.is_some() {
        "Slider updated"
    } else {
        "Slider created"
    };
    Ok(crud::respond(
        outcome,
        LIST_TARGET,
        success,
        |sliders| SliderListTemplate {
            sliders: SliderRow::list(&state, &sliders),
            error: None,
        },
        |e| {
            let mut modal = SliderFormTemplate::new(form.clone());
            modal.errors = FormErrors::from_api(e);
            modal.error = Some(e.user_message());
            modal
        },
    ))
}

#[instrument(skip(_ctx))]
async fn confirm_delete(
    RequireAdminAuth(_ctx): RequireAdminAuth,
    Path(id): Path<SliderId>,
) -> ConfirmDeleteTemplate {
    ConfirmDeleteTemplate::new("slider", format!("/sliders/{id}/delete"))
}

#[instrument(skip(ctx, state))]
async fn delete(
    RequireAdminAuth(ctx): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<SliderId>,
) -> Result<Response> {
    let outcome = crud::save_then_refetch(
        api::sliders::delete(state.api(), &ctx.token, id),
        || api::sliders::list(state.api(), &ctx.token),
    )
    .await?;

    Ok(crud::respond(
        outcome,
        LIST_TARGET,
        "Slider deleted",
        |sliders| SliderListTemplate {
            sliders: SliderRow::list(&state, &sliders),
            error: None,
        },
        |e| {
            ConfirmDeleteTemplate::new("slider", format!("/sliders/{id}/delete"))
                .failed(e.user_message())
        },
    ))
}

/// Persist a drop of `source_id` onto `target_id`.
///
/// The browser has already moved the row, so every answer carries the order
/// the backend holds: the confirmed list, the re-read list after a
/// rejection, the order from before the drop when that read fails too, or a
/// page reload when the list cannot be read at all.
///
/// POST /sliders/reorder
#[instrument(skip(ctx, state))]
async fn reorder(
    RequireAdminAuth(ctx): RequireAdminAuth,
    State(state): State<AppState>,
    Form(form): Form<ReorderForm>,
) -> Result<Response> {
    if form.source_id == form.target_id {
        return Ok(HxResponse::new("").reswap("none").into_response());
    }

    let client = state.api();
    let token = &ctx.token;
    let sliders = match api::sliders::list(client, token).await {
        Ok(sliders) => sliders,
        Err(e) => return reload_page(e),
    };

    let mut list = ReorderList::new(sliders);
    let outcome = match list.begin_drag(form.source_id) {
        Ok(()) => {
            list.drop_and_persist(
                form.target_id,
                |ids| async move { api::sliders::reorder(client, token, &ids).await },
                || api::sliders::list(client, token),
            )
            .await
        }
        Err(e) => Err(e),
    };

    let toast = match outcome {
        Ok(ReorderOutcome::Unchanged) => {
            return Ok(HxResponse::new("").reswap("none").into_response());
        }
        Ok(ReorderOutcome::Confirmed) => {
            tracing::info!("Slider order saved");
            Toast::success("Slider order saved")
        }
        Ok(ReorderOutcome::RolledBack { cause }) => reorder_failed(cause)?,
        Ok(ReorderOutcome::Restored {
            cause,
            refetch_error,
        }) => {
            tracing::warn!(error = %refetch_error, "Could not re-read sliders after failed reorder");
            reorder_failed(cause)?
        }
        Err(e) => {
            tracing::warn!(error = %e, "Reorder names a slider that is no longer listed");
            Toast::error("The slider list changed in the meantime. Please try again.")
        }
    };

    Ok(crud::list_swap(
        SliderListTemplate {
            sliders: SliderRow::list(&state, list.items()),
            error: None,
        },
        LIST_TARGET,
    )
    .toast(&toast)
    .into_response())
}

/// Nothing authoritative to swap in: reload the page so the dragged row
/// does not stay where it was dropped.
fn reload_page(error: ApiError) -> Result<Response> {
    if error.is_unauthorized() {
        return Err(error.into());
    }
    tracing::warn!(error = %error, "Could not read sliders for reorder");
    Ok(HxResponse::new("").refresh().into_response())
}

fn reorder_failed(cause: ApiError) -> Result<Toast> {
    if cause.is_unauthorized() {
        return Err(cause.into());
    }
    tracing::warn!(error = %cause, "Backend rejected slider order");
    Ok(Toast::error(format!(
        "Could not save the new order: {}",
        cause.user_message()
    )))
}
