//! Contact messages left through the storefront.
//!
//! The list is paginated by the backend. Actions keep the current page and
//! swap in a fresh read of it.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Router,
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use emporium_core::ContactMessageId;
use emporium_core::api::ApiError;
use emporium_core::toast::Toast;
use tracing::instrument;

use crate::api;
use crate::components::crud::{self, SaveOutcome};
use crate::components::htmx::HxResponse;
use crate::error::Result;
use crate::filters;
use crate::middleware::{AdminContext, RequireAdminAuth};
use crate::models::CurrentAdmin;
use crate::state::AppState;
use crate::views::{ConfirmDeleteTemplate, MessageRow, PageQuery, Pager};

const LIST_TARGET: &str = "#message-list";

/// Messages page.
#[derive(Template, WebTemplate)]
#[template(path = "messages/index.html")]
pub struct MessagesTemplate {
    pub admin_user: CurrentAdmin,
    pub current_path: &'static str,
    pub messages: Vec<MessageRow>,
    pub pager: Pager,
    pub error: Option<String>,
}

/// Message list fragment.
#[derive(Template, WebTemplate)]
#[template(path = "messages/list.html")]
pub struct MessageListTemplate {
    pub messages: Vec<MessageRow>,
    pub pager: Pager,
    pub error: Option<String>,
}

impl MessageListTemplate {
    fn new((messages, pager): (Vec<MessageRow>, Pager)) -> Self {
        Self {
            messages,
            pager,
            error: None,
        }
    }
}

/// Build the messages router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/messages", get(index))
        .route("/messages/{id}/read", post(mark_read))
        .route("/messages/{id}/delete", get(confirm_delete).post(delete))
}

async fn load_page(
    state: &AppState,
    ctx: &AdminContext,
    page: u32,
) -> Result<(Vec<MessageRow>, Pager), ApiError> {
    let page = api::messages::list(state.api(), &ctx.token, page).await?;
    Ok((
        page.items.iter().map(MessageRow::from).collect(),
        Pager::from(&page),
    ))
}

fn delete_action(id: ContactMessageId, page: u32) -> String {
    format!("/messages/{id}/delete?page={page}")
}

#[instrument(skip(ctx, state))]
async fn index(
    RequireAdminAuth(ctx): RequireAdminAuth,
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<MessagesTemplate> {
    let ((messages, pager), error) =
        crud::load_or_message(load_page(&state, &ctx, query.page()).await, "messages")?;

    Ok(MessagesTemplate {
        admin_user: ctx.admin,
        current_path: "/messages",
        messages,
        pager,
        error,
    })
}

/// POST /messages/{id}/read
#[instrument(skip(ctx, state))]
async fn mark_read(
    RequireAdminAuth(ctx): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<ContactMessageId>,
    Query(query): Query<PageQuery>,
) -> Result<Response> {
    let outcome = crud::save_then_refetch(
        api::messages::mark_read(state.api(), &ctx.token, id),
        || load_page(&state, &ctx, query.page()),
    )
    .await?;

    Ok(match outcome {
        SaveOutcome::Refreshed(page) => crud::list_swap(MessageListTemplate::new(page), LIST_TARGET)
            .toast(&Toast::success("Marked as read"))
            .into_response(),
        SaveOutcome::SavedStale(e) | SaveOutcome::Rejected(e) => HxResponse::new("")
            .reswap("none")
            .toast(&Toast::error(e.user_message()))
            .into_response(),
    })
}

#[instrument(skip(_ctx))]
async fn confirm_delete(
    RequireAdminAuth(_ctx): RequireAdminAuth,
    Path(id): Path<ContactMessageId>,
    Query(query): Query<PageQuery>,
) -> ConfirmDeleteTemplate {
    ConfirmDeleteTemplate::new("message", delete_action(id, query.page()))
}

#[instrument(skip(ctx, state))]
async fn delete(
    RequireAdminAuth(ctx): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<ContactMessageId>,
    Query(query): Query<PageQuery>,
) -> Result<Response> {
    let page = query.page();
    let outcome = crud::save_then_refetch(
        api::messages::delete(state.api(), &ctx.token, id),
        || load_page(&state, &ctx, page),
    )
    .await?;

    Ok(crud::respond(
        outcome,
        LIST_TARGET,
        "Message deleted",
        MessageListTemplate::new,
        |e| ConfirmDeleteTemplate::new("message", delete_action(id, page)).failed(e.user_message()),
    ))
}
