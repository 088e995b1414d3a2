//! Category pages. Saves are multipart so an image can be attached.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Router,
    extract::{Multipart, Path, State},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use emporium_core::CategoryId;
use emporium_core::api::multipart_form;
use tracing::instrument;
use validator::Validate;

use crate::api;
use crate::components::{crud, multipart::MultipartForm};
use crate::error::Result;
use crate::filters;
use crate::forms::{CategoryForm, FormErrors};
use crate::middleware::RequireAdminAuth;
use crate::models::CurrentAdmin;
use crate::state::AppState;
use crate::views::{CategoryRow, ConfirmDeleteTemplate};

const LIST_TARGET: &str = "#category-list";
const IMAGE_FIELD: &str = "image";

/// Category page.
#[derive(Template, WebTemplate)]
#[template(path = "categories/index.html")]
pub struct CategoriesTemplate {
    pub admin_user: CurrentAdmin,
    pub current_path: &'static str,
    pub categories: Vec<CategoryRow>,
    pub error: Option<String>,
}

/// Category list fragment.
#[derive(Template, WebTemplate)]
#[template(path = "categories/list.html")]
pub struct CategoryListTemplate {
    pub categories: Vec<CategoryRow>,
    pub error: Option<String>,
}

/// Category create/edit modal.
#[derive(Template, WebTemplate)]
#[template(path = "categories/form.html")]
pub struct CategoryFormTemplate {
    pub form: CategoryForm,
    /// Current image, shown above the file input when editing.
    pub image: Option<String>,
    pub errors: FormErrors,
    pub error: Option<String>,
}

/// Build the categories router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/categories", get(index))
        .route("/categories/new", get(new))
        .route("/categories/save", post(save))
        .route("/categories/{id}/edit", get(edit))
        .route("/categories/{id}/delete", get(confirm_delete).post(delete))
}

#[instrument(skip(ctx, state))]
async fn index(
    RequireAdminAuth(ctx): RequireAdminAuth,
    State(state): State<AppState>,
) -> Result<CategoriesTemplate> {
    let (categories, error) = crud::load_or_message(
        api::catalog::categories(state.api(), &ctx.token).await,
        "categories",
    )?;

    Ok(CategoriesTemplate {
        admin_user: ctx.admin,
        current_path: "/categories",
        categories: CategoryRow::list(&state, &categories),
        error,
    })
}

#[instrument(skip(_ctx))]
async fn new(RequireAdminAuth(_ctx): RequireAdminAuth) -> CategoryFormTemplate {
    CategoryFormTemplate {
        form: CategoryForm {
            status: true,
            ..CategoryForm::default()
        },
        image: None,
        errors: FormErrors::default(),
        error: None,
    }
}

#[instrument(skip(ctx, state))]
async fn edit(
    RequireAdminAuth(ctx): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<CategoryId>,
) -> Result<Response> {
    match api::catalog::category(state.api(), &ctx.token, id).await {
        Ok(category) => Ok(CategoryFormTemplate {
            form: CategoryForm::from(&category),
            image: category.image.as_deref().map(|p| state.media(p)),
            errors: FormErrors::default(),
            error: None,
        }
        .into_response()),
        Err(e) => crud::toast_failure(e),
    }
}

/// Create when the form has no `id`, update otherwise. The image part is
/// forwarded as-is; leaving the file input empty keeps the stored image.
#[instrument(skip_all)]
async fn save(
    RequireAdminAuth(ctx): RequireAdminAuth,
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Response> {
    let body = MultipartForm::read(multipart, &[IMAGE_FIELD]).await?;
    let form = CategoryForm::from_multipart(&body)?;

    if let Err(e) = form.validate() {
        return Ok(crud::modal_swap(CategoryFormTemplate {
            form,
            image: None,
            errors: FormErrors::from_validation(&e),
            error: None,
        })
        .into_response());
    }

    let uploads = body.into_uploads();
    let persist = async {
        let parts = multipart_form(form.fields(), uploads)?;
        api::catalog::save_category(state.api(), &ctx.token, form.id, parts).await
    };
    let outcome =
        crud::save_then_refetch(persist, || api::catalog::categories(state.api(), &ctx.token))
            .await?;

    let success = if form.id.is_some() {
        "Category updated"
    } else {
        "Category created"
    };
    Ok(crud::respond(
        outcome,
        LIST_TARGET,
        success,
        |categories| CategoryListTemplate {
            categories: CategoryRow::list(&state, &categories),
            error: None,
        },
        |e| CategoryFormTemplate {
            form: form.clone(),
            image: None,
            errors: FormErrors::from_api(e),
            error: Some(e.user_message()),
        },
    ))
}

#[instrument(skip(_ctx))]
async fn confirm_delete(
    RequireAdminAuth(_ctx): RequireAdminAuth,
    Path(id): Path<CategoryId>,
) -> ConfirmDeleteTemplate {
    ConfirmDeleteTemplate::new("category", format!("/categories/{id}/delete"))
}

#[instrument(skip(ctx, state))]
async fn delete(
    RequireAdminAuth(ctx): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<CategoryId>,
) -> Result<Response> {
    let outcome = crud::save_then_refetch(
        api::catalog::delete_category(state.api(), &ctx.token, id),
        || api::catalog::categories(state.api(), &ctx.token),
    )
    .await?;

    Ok(crud::respond(
        outcome,
        LIST_TARGET,
        "Category deleted",
        |categories| CategoryListTemplate {
            categories: CategoryRow::list(&state, &categories),
            error: None,
        },
        |e| {
            ConfirmDeleteTemplate::new("category", format!("/categories/{id}/delete"))
                .failed(e.user_message())
        },
    ))
}
