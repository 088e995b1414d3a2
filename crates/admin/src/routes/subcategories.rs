//! Subcategory pages. The form picks a parent category and the attributes
//! products in the subcategory use.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Router,
    extract::{Multipart, Path, State},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use emporium_core::api::{ApiError, multipart_form};
use emporium_core::{Attribute, Category, SubcategoryId};
use tracing::instrument;
use validator::Validate;

use crate::api;
use crate::components::{crud, multipart::MultipartForm};
use crate::error::Result;
use crate::filters;
use crate::forms::{FormErrors, SubcategoryForm};
use crate::middleware::{AdminContext, RequireAdminAuth};
use crate::models::CurrentAdmin;
use crate::state::AppState;
use crate::views::{ConfirmDeleteTemplate, SubcategoryRow};

const LIST_TARGET: &str = "#subcategory-list";
const IMAGE_FIELD: &str = "image";

/// Subcategory page.
#[derive(Template, WebTemplate)]
#[template(path = "subcategories/index.html")]
pub struct SubcategoriesTemplate {
    pub admin_user: CurrentAdmin,
    pub current_path: &'static str,
    pub subcategories: Vec<SubcategoryRow>,
    pub error: Option<String>,
}

/// Subcategory list fragment.
#[derive(Template, WebTemplate)]
#[template(path = "subcategories/list.html")]
pub struct SubcategoryListTemplate {
    pub subcategories: Vec<SubcategoryRow>,
    pub error: Option<String>,
}

/// Subcategory create/edit modal.
#[derive(Template, WebTemplate)]
#[template(path = "subcategories/form.html")]
pub struct SubcategoryFormTemplate {
    pub form: SubcategoryForm,
    pub categories: Vec<Category>,
    pub attributes: Vec<Attribute>,
    pub image: Option<String>,
    pub errors: FormErrors,
    pub error: Option<String>,
}

/// Choices offered by the form.
#[derive(Debug, Default)]
struct FormOptions {
    categories: Vec<Category>,
    attributes: Vec<Attribute>,
    error: Option<String>,
}

impl SubcategoryFormTemplate {
    fn new(form: SubcategoryForm, options: FormOptions) -> Self {
        Self {
            form,
            categories: options.categories,
            attributes: options.attributes,
            image: None,
            errors: FormErrors::default(),
            error: options.error,
        }
    }
}

/// Build the subcategories router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/subcategories", get(index))
        .route("/subcategories/new", get(new))
        .route("/subcategories/save", post(save))
        .route("/subcategories/{id}/edit", get(edit))
        .route("/subcategories/{id}/delete", get(confirm_delete).post(delete))
}

/// Load the category and attribute choices. A failure leaves the list
/// empty and explains why in the modal.
async fn load_options(state: &AppState, ctx: &AdminContext) -> Result<FormOptions> {
    let (categories, attributes) = tokio::join!(
        api::catalog::categories(state.api(), &ctx.token),
        api::attributes::list(state.api(), &ctx.token),
    );
    let (categories, categories_error) = crud::load_or_message(categories, "categories")?;
    let (attributes, attributes_error) = crud::load_or_message(attributes, "attributes")?;

    Ok(FormOptions {
        categories,
        attributes,
        error: categories_error.or(attributes_error),
    })
}

/// Rows for the list. Category names come from a second read when the
/// backend does not embed them; only the subcategory read must succeed.
async fn load_rows(state: &AppState, ctx: &AdminContext) -> Result<Vec<SubcategoryRow>, ApiError> {
    let (subcategories, categories) = tokio::join!(
        api::catalog::subcategories(state.api(), &ctx.token),
        api::catalog::categories(state.api(), &ctx.token),
    );
    let categories = categories.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Failed to load category names");
        Vec::new()
    });
    Ok(SubcategoryRow::list(state, &subcategories?, &categories))
}

#[instrument(skip(ctx, state))]
async fn index(
    RequireAdminAuth(ctx): RequireAdminAuth,
    State(state): State<AppState>,
) -> Result<SubcategoriesTemplate> {
    let (subcategories, error) =
        crud::load_or_message(load_rows(&state, &ctx).await, "subcategories")?;

    Ok(SubcategoriesTemplate {
        admin_user: ctx.admin,
        current_path: "/subcategories",
        subcategories,
        error,
    })
}

#[instrument(skip(ctx, state))]
async fn new(
    RequireAdminAuth(ctx): RequireAdminAuth,
    State(state): State<AppState>,
) -> Result<SubcategoryFormTemplate> {
    let options = load_options(&state, &ctx).await?;
    let form = SubcategoryForm {
        status: true,
        ..SubcategoryForm::default()
    };
    Ok(SubcategoryFormTemplate::new(form, options))
}

#[instrument(skip(ctx, state))]
async fn edit(
    RequireAdminAuth(ctx): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<SubcategoryId>,
) -> Result<Response> {
    let (subcategory, options) = tokio::join!(
        api::catalog::subcategory(state.api(), &ctx.token, id),
        load_options(&state, &ctx),
    );
    let subcategory = match subcategory {
        Ok(subcategory) => subcategory,
        Err(e) => return crud::toast_failure(e),
    };

    let mut modal = SubcategoryFormTemplate::new(SubcategoryForm::from(&subcategory), options?);
    modal.image = subcategory.image.as_deref().map(|p| state.media(p));
    Ok(modal.into_response())
}

/// Create when the form has no `id`, update otherwise.
#[instrument(skip_all)]
async fn save(
    RequireAdminAuth(ctx): RequireAdminAuth,
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Response> {
    let body = MultipartForm::read(multipart, &[IMAGE_FIELD]).await?;
    let form = SubcategoryForm::from_multipart(&body)?;

    if let Err(e) = form.validate() {
        let options = load_options(&state, &ctx).await?;
        let mut modal = SubcategoryFormTemplate::new(form, options);
        modal.errors = FormErrors::from_validation(&e);
        return Ok(crud::modal_swap(modal).into_response());
    }

    let uploads = body.into_uploads();
    let persist = async {
        let parts = multipart_form(form.fields(), uploads)?;
        api::catalog::save_subcategory(state.api(), &ctx.token, form.id, parts).await
    };
    let outcome = crud::save_then_refetch(persist, || load_rows(&state, &ctx)).await?;

    // The modal needs its choices again only when it stays open.
    let options = match outcome {
        crud::SaveOutcome::Rejected(_) => load_options(&state, &ctx).await?,
        _ => FormOptions::default(),
    };

    let success = if form.id.is_some() {
        "Subcategory updated"
    } else {
        "Subcategory created"
    };
    Ok(crud::respond(
        outcome,
        LIST_TARGET,
        success,
        |subcategories| SubcategoryListTemplate {
            subcategories,
            error: None,
        },
        |e| {
            let mut modal = SubcategoryFormTemplate::new(form.clone(), options);
            modal.errors = FormErrors::from_api(e);
            modal.error = Some(e.user_message());
            modal
        },
    ))
}

#[instrument(skip(_ctx))]
async fn confirm_delete(
    RequireAdminAuth(_ctx): RequireAdminAuth,
    Path(id): Path<SubcategoryId>,
) -> ConfirmDeleteTemplate {
    ConfirmDeleteTemplate::new("subcategory", format!("/subcategories/{id}/delete"))
}

#[instrument(skip(ctx, state))]
async fn delete(
    RequireAdminAuth(ctx): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<SubcategoryId>,
) -> Result<Response> {
    let outcome = crud::save_then_refetch(
        api::catalog::delete_subcategory(state.api(), &ctx.token, id),
        || load_rows(&state, &ctx),
    )
    .await?;

    Ok(crud::respond(
        outcome,
        LIST_TARGET,
        "Subcategory deleted",
        |subcategories| SubcategoryListTemplate {
            subcategories,
            error: None,
        },
        |e| {
            ConfirmDeleteTemplate::new("subcategory", format!("/subcategories/{id}/delete"))
                .failed(e.user_message())
        },
    ))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use emporium_core::{AttributeId, CategoryId};

    use super::*;

    fn options() -> FormOptions {
        FormOptions {
            categories: serde_json::from_str(
                r#"[{"id": 1, "name": "Lighting"}, {"id": 2, "name": "Seating"}]"#,
            )
            .unwrap(),
            attributes: serde_json::from_str(
                r#"[{"id": 7, "name": "Color"}, {"id": 8, "name": "Size"}]"#,
            )
            .unwrap(),
            error: None,
        }
    }

    #[test]
    fn test_form_marks_chosen_category_and_attributes() {
        let form = SubcategoryForm {
            category_id: Some(CategoryId::new(2)),
            name: "Chairs".to_string(),
            status: true,
            attribute_ids: vec![AttributeId::new(8)],
            ..SubcategoryForm::default()
        };

        let html = SubcategoryFormTemplate::new(form, options()).render().unwrap();

        assert!(html.contains(r#"<option value="2" selected>Seating"#));
        assert!(html.contains(r#"<option value="1" >Lighting"#));
        assert!(html.contains(r#"value="8" checked>"#));
        assert!(html.contains(r#"value="7" >"#));
    }
}
