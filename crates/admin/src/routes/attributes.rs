//! Attribute and attribute value pages.
//!
//! Both lists are edited in a modal. A save re-reads the list once and swaps
//! it in; a refused save keeps the modal open with the backend's reason.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Router,
    extract::{Path, State},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use emporium_core::{Attribute, AttributeId, AttributeValue, AttributeValueId};
use tracing::instrument;
use validator::Validate;

use crate::api;
use crate::components::crud;
use crate::error::{AppError, Result};
use crate::filters;
use crate::forms::{AttributeForm, AttributeValueForm, FormErrors};
use crate::middleware::RequireAdminAuth;
use crate::models::CurrentAdmin;
use crate::state::AppState;
use crate::views::ConfirmDeleteTemplate;

const LIST_TARGET: &str = "#attribute-list";
const VALUE_LIST_TARGET: &str = "#value-list";

/// Attribute page.
#[derive(Template, WebTemplate)]
#[template(path = "attributes/index.html")]
pub struct AttributesTemplate {
    pub admin_user: CurrentAdmin,
    pub current_path: &'static str,
    pub attributes: Vec<Attribute>,
    pub error: Option<String>,
}

/// Attribute list fragment.
#[derive(Template, WebTemplate)]
#[template(path = "attributes/list.html")]
pub struct AttributeListTemplate {
    pub attributes: Vec<Attribute>,
    pub error: Option<String>,
}

/// Attribute create/edit modal.
#[derive(Template, WebTemplate)]
#[template(path = "attributes/form.html")]
pub struct AttributeFormTemplate {
    pub form: AttributeForm,
    pub errors: FormErrors,
    pub error: Option<String>,
}

/// Values of one attribute.
#[derive(Template, WebTemplate)]
#[template(path = "attributes/values.html")]
pub struct ValuesTemplate {
    pub admin_user: CurrentAdmin,
    pub current_path: &'static str,
    pub attribute: Attribute,
    pub attribute_id: AttributeId,
    pub values: Vec<AttributeValue>,
    pub error: Option<String>,
}

/// Value list fragment.
#[derive(Template, WebTemplate)]
#[template(path = "attributes/value_list.html")]
pub struct ValueListTemplate {
    pub attribute_id: AttributeId,
    pub values: Vec<AttributeValue>,
    pub error: Option<String>,
}

/// Value create/edit modal.
#[derive(Template, WebTemplate)]
#[template(path = "attributes/value_form.html")]
pub struct ValueFormTemplate {
    pub attribute_id: AttributeId,
    pub form: AttributeValueForm,
    pub errors: FormErrors,
    pub error: Option<String>,
}

/// Build the attributes router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/attributes", get(index))
        .route("/attributes/new", get(new))
        .route("/attributes/save", post(save))
        .route("/attributes/{id}/edit", get(edit))
        .route("/attributes/{id}/delete", get(confirm_delete).post(delete))
        .route("/attributes/{id}/values", get(values))
        .route("/attributes/{id}/values/new", get(new_value))
        .route("/attributes/{id}/values/save", post(save_value))
        .route("/attributes/{id}/values/{value_id}/edit", get(edit_value))
        .route(
            "/attributes/{id}/values/{value_id}/delete",
            get(confirm_delete_value).post(delete_value),
        )
}

#[instrument(skip(ctx, state))]
async fn index(
    RequireAdminAuth(ctx): RequireAdminAuth,
    State(state): State<AppState>,
) -> Result<AttributesTemplate> {
    let (attributes, error) = crud::load_or_message(
        api::attributes::list(state.api(), &ctx.token).await,
        "attributes",
    )?;

    Ok(AttributesTemplate {
        admin_user: ctx.admin,
        current_path: "/attributes",
        attributes,
        error,
    })
}

#[instrument(skip(_ctx))]
async fn new(RequireAdminAuth(_ctx): RequireAdminAuth) -> AttributeFormTemplate {
    AttributeFormTemplate {
        form: AttributeForm {
            status: true,
            ..AttributeForm::default()
        },
        errors: FormErrors::default(),
        error: None,
    }
}

#[instrument(skip(ctx, state))]
async fn edit(
    RequireAdminAuth(ctx): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<AttributeId>,
) -> Result<Response> {
    match api::attributes::get(state.api(), &ctx.token, id).await {
        Ok(attribute) => Ok(AttributeFormTemplate {
            form: AttributeForm::from(&attribute),
            errors: FormErrors::default(),
            error: None,
        }
        .into_response()),
        Err(e) => crud::toast_failure(e),
    }
}

/// Create when the form has no `id`, update otherwise.
#[instrument(skip(ctx, state, form), fields(id = ?form.id))]
async fn save(
    RequireAdminAuth(ctx): RequireAdminAuth,
    State(state): State<AppState>,
    Form(form): Form<AttributeForm>,
) -> Result<Response> {
    if let Err(e) = form.validate() {
        return Ok(crud::modal_swap(AttributeFormTemplate {
            errors: FormErrors::from_validation(&e),
            form,
            error: None,
        })
        .into_response());
    }

    let payload = form.payload();
    let persist = async {
        match form.id {
            Some(id) => api::attributes::update(state.api(), &ctx.token, id, &payload).await,
            None => api::attributes::create(state.api(), &ctx.token, &payload).await,
        }
    };
    let outcome =
        crud::save_then_refetch(persist, || api::attributes::list(state.api(), &ctx.token)).await?;

    let success = if form.id.is_some() {
        "Attribute updated"
    } else {
        "Attribute created"
    };
    Ok(crud::respond(
        outcome,
        LIST_TARGET,
        success,
        |attributes| AttributeListTemplate {
            attributes,
            error: None,
        },
        |e| AttributeFormTemplate {
            form: form.clone(),
            errors: FormErrors::from_api(e),
            error: Some(e.user_message()),
        },
    ))
}

#[instrument(skip(_ctx))]
async fn confirm_delete(
    RequireAdminAuth(_ctx): RequireAdminAuth,
    Path(id): Path<AttributeId>,
) -> ConfirmDeleteTemplate {
    ConfirmDeleteTemplate::new("attribute", format!("/attributes/{id}/delete"))
}

#[instrument(skip(ctx, state))]
async fn delete(
    RequireAdminAuth(ctx): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<AttributeId>,
) -> Result<Response> {
    let outcome = crud::save_then_refetch(
        api::attributes::delete(state.api(), &ctx.token, id),
        || api::attributes::list(state.api(), &ctx.token),
    )
    .await?;

    Ok(crud::respond(
        outcome,
        LIST_TARGET,
        "Attribute deleted",
        |attributes| AttributeListTemplate {
            attributes,
            error: None,
        },
        |e| {
            ConfirmDeleteTemplate::new("attribute", format!("/attributes/{id}/delete"))
                .failed(e.user_message())
        },
    ))
}

#[instrument(skip(ctx, state))]
async fn values(
    RequireAdminAuth(ctx): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<AttributeId>,
) -> Result<ValuesTemplate> {
    let (attribute, values) = tokio::join!(
        api::attributes::get(state.api(), &ctx.token, id),
        api::attributes::values(state.api(), &ctx.token, id),
    );
    let attribute = attribute?;
    let (values, error) = crud::load_or_message(values, "attribute values")?;

    Ok(ValuesTemplate {
        admin_user: ctx.admin,
        current_path: "/attributes",
        attribute,
        attribute_id: id,
        values,
        error,
    })
}

#[instrument(skip(_ctx))]
async fn new_value(
    RequireAdminAuth(_ctx): RequireAdminAuth,
    Path(attribute_id): Path<AttributeId>,
) -> ValueFormTemplate {
    ValueFormTemplate {
        attribute_id,
        form: AttributeValueForm {
            status: true,
            ..AttributeValueForm::default()
        },
        errors: FormErrors::default(),
        error: None,
    }
}

/// There is no single-value endpoint, so the value is picked out of the list.
#[instrument(skip(ctx, state))]
async fn edit_value(
    RequireAdminAuth(ctx): RequireAdminAuth,
    State(state): State<AppState>,
    Path((attribute_id, value_id)): Path<(AttributeId, AttributeValueId)>,
) -> Result<Response> {
    let values = match api::attributes::values(state.api(), &ctx.token, attribute_id).await {
        Ok(values) => values,
        Err(e) => return crud::toast_failure(e),
    };
    let value = values
        .iter()
        .find(|v| v.id == value_id)
        .ok_or_else(|| AppError::NotFound(format!("attribute value {value_id}")))?;

    Ok(ValueFormTemplate {
        attribute_id,
        form: AttributeValueForm::from(value),
        errors: FormErrors::default(),
        error: None,
    }
    .into_response())
}

/// Create when the form has no `id`, update otherwise.
#[instrument(skip(ctx, state, form), fields(id = ?form.id))]
async fn save_value(
    RequireAdminAuth(ctx): RequireAdminAuth,
    State(state): State<AppState>,
    Path(attribute_id): Path<AttributeId>,
    Form(form): Form<AttributeValueForm>,
) -> Result<Response> {
    if let Err(e) = form.validate() {
        return Ok(crud::modal_swap(ValueFormTemplate {
            attribute_id,
            errors: FormErrors::from_validation(&e),
            form,
            error: None,
        })
        .into_response());
    }

    let payload = form.payload();
    let persist = async {
        match form.id {
            Some(id) => api::attributes::update_value(state.api(), &ctx.token, id, &payload).await,
            None => {
                api::attributes::create_value(state.api(), &ctx.token, attribute_id, &payload)
                    .await
            }
        }
    };
    let outcome = crud::save_then_refetch(persist, || {
        api::attributes::values(state.api(), &ctx.token, attribute_id)
    })
    .await?;

    let success = if form.id.is_some() {
        "Value updated"
    } else {
        "Value created"
    };
    Ok(crud::respond(
        outcome,
        VALUE_LIST_TARGET,
        success,
        |values| ValueListTemplate {
            attribute_id,
            values,
            error: None,
        },
        |e| ValueFormTemplate {
            attribute_id,
            form: form.clone(),
            errors: FormErrors::from_api(e),
            error: Some(e.user_message()),
        },
    ))
}

#[instrument(skip(_ctx))]
async fn confirm_delete_value(
    RequireAdminAuth(_ctx): RequireAdminAuth,
    Path((attribute_id, value_id)): Path<(AttributeId, AttributeValueId)>,
) -> ConfirmDeleteTemplate {
    ConfirmDeleteTemplate::new(
        "value",
        format!("/attributes/{attribute_id}/values/{value_id}/delete"),
    )
}

#[instrument(skip(ctx, state))]
async fn delete_value(
    RequireAdminAuth(ctx): RequireAdminAuth,
    State(state): State<AppState>,
    Path((attribute_id, value_id)): Path<(AttributeId, AttributeValueId)>,
) -> Result<Response> {
    let outcome = crud::save_then_refetch(
        api::attributes::delete_value(state.api(), &ctx.token, value_id),
        || api::attributes::values(state.api(), &ctx.token, attribute_id),
    )
    .await?;

    Ok(crud::respond(
        outcome,
        VALUE_LIST_TARGET,
        "Value deleted",
        |values| ValueListTemplate {
            attribute_id,
            values,
            error: None,
        },
        |e| {
            ConfirmDeleteTemplate::new(
                "value",
                format!("/attributes/{attribute_id}/values/{value_id}/delete"),
            )
            .failed(e.user_message())
        },
    ))
}
