//! Admin form payloads with local validation.
//!
//! Validation here only saves a round trip; the backend validates again and
//! its answer wins. Forms with an `id` update that record, forms without one
//! create a new record.

use std::collections::BTreeMap;
use std::fmt::Display;
use std::str::FromStr;

use emporium_core::api::ApiError;
use emporium_core::{
    Attribute, AttributeId, AttributeValue, AttributeValueId, Category, CategoryId, Email, Slider,
    SliderId, Subcategory, SubcategoryId,
};
use serde::{Deserialize, Deserializer, Serialize};
use validator::{Validate, ValidationError, ValidationErrors};

use crate::components::multipart::MultipartForm;
use crate::error::AppError;

fn valid_email(value: &str) -> Result<(), ValidationError> {
    Email::parse(value).map(|_| ()).map_err(|e| {
        let mut err = ValidationError::new("email");
        err.message = Some(e.to_string().into());
        err
    })
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("required");
        err.message = Some("This field is required".into());
        return Err(err);
    }
    Ok(())
}

/// Links are site-relative paths or absolute http(s) URLs.
fn valid_link(value: &str) -> Result<(), ValidationError> {
    let value = value.trim();
    if value.is_empty() || value.starts_with('/') {
        return Ok(());
    }
    match url::Url::parse(value) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(()),
        _ => {
            let mut err = ValidationError::new("link");
            err.message = Some("Link must start with / or http(s)://".into());
            Err(err)
        }
    }
}

/// Hidden `id` inputs submit `""` on create.
fn empty_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

/// Status selects submit `true`/`false`; checkboxes submit `on`.
fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "on" | "yes"
    )
}

fn flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(String::deserialize(deserializer).is_ok_and(|v| parse_flag(&v)))
}

/// Wire form of a status flag in multipart bodies.
#[must_use]
pub const fn flag_value(status: bool) -> &'static str {
    if status { "1" } else { "0" }
}

fn optional_id<T>(form: &MultipartForm, field: &str) -> Result<Option<T>, AppError>
where
    T: FromStr,
{
    let raw = form.text(field).trim();
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse()
        .map(Some)
        .map_err(|_| AppError::BadRequest(format!("invalid {field}")))
}

/// Admin login form.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct LoginForm {
    #[validate(custom(function = "valid_email"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Attribute create/edit form.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct AttributeForm {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub id: Option<AttributeId>,
    #[validate(
        custom(function = "not_blank"),
        length(max = 50, message = "Name must be at most 50 characters")
    )]
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "flag")]
    pub status: bool,
}

/// JSON body for attribute create and update.
#[derive(Debug, Serialize)]
pub struct AttributePayload<'a> {
    pub name: &'a str,
    pub status: bool,
}

impl AttributeForm {
    #[must_use]
    pub fn payload(&self) -> AttributePayload<'_> {
        AttributePayload {
            name: self.name.trim(),
            status: self.status,
        }
    }
}

impl From<&Attribute> for AttributeForm {
    fn from(attribute: &Attribute) -> Self {
        Self {
            id: Some(attribute.id),
            name: attribute.name.clone(),
            status: attribute.status,
        }
    }
}

/// Attribute value create/edit form. The attribute comes from the URL.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct AttributeValueForm {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub id: Option<AttributeValueId>,
    #[validate(
        custom(function = "not_blank"),
        length(max = 50, message = "Value must be at most 50 characters")
    )]
    #[serde(default)]
    pub value: String,
    #[serde(default, deserialize_with = "flag")]
    pub status: bool,
}

/// JSON body for attribute value create and update.
#[derive(Debug, Serialize)]
pub struct AttributeValuePayload<'a> {
    pub value: &'a str,
    pub status: bool,
}

impl AttributeValueForm {
    #[must_use]
    pub fn payload(&self) -> AttributeValuePayload<'_> {
        AttributeValuePayload {
            value: self.value.trim(),
            status: self.status,
        }
    }
}

impl From<&AttributeValue> for AttributeValueForm {
    fn from(value: &AttributeValue) -> Self {
        Self {
            id: Some(value.id),
            value: value.value.clone(),
            status: value.status,
        }
    }
}

/// Category create/edit form, submitted as multipart with an optional image.
#[derive(Debug, Clone, Default, Validate)]
pub struct CategoryForm {
    pub id: Option<CategoryId>,
    #[validate(
        custom(function = "not_blank"),
        length(max = 100, message = "Name must be at most 100 characters")
    )]
    pub name: String,
    #[validate(length(max = 500, message = "Description must be at most 500 characters"))]
    pub description: String,
    pub status: bool,
}

impl CategoryForm {
    /// # Errors
    ///
    /// Returns [`AppError::BadRequest`] when the hidden `id` is not a number.
    pub fn from_multipart(form: &MultipartForm) -> Result<Self, AppError> {
        Ok(Self {
            id: optional_id(form, "id")?,
            name: form.text("name").to_string(),
            description: form.text("description").to_string(),
            status: parse_flag(form.text("status")),
        })
    }

    /// Text parts of the multipart body.
    #[must_use]
    pub fn fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("name", self.name.trim().to_string()),
            ("description", self.description.trim().to_string()),
            ("status", flag_value(self.status).to_string()),
        ]
    }
}

impl From<&Category> for CategoryForm {
    fn from(category: &Category) -> Self {
        Self {
            id: Some(category.id),
            name: category.name.clone(),
            description: category.description.clone().unwrap_or_default(),
            status: category.status,
        }
    }
}

/// Subcategory create/edit form, submitted as multipart with an optional image.
#[derive(Debug, Clone, Default, Validate)]
pub struct SubcategoryForm {
    pub id: Option<SubcategoryId>,
    #[validate(required(message = "Choose a category"))]
    pub category_id: Option<CategoryId>,
    #[validate(
        custom(function = "not_blank"),
        length(max = 100, message = "Name must be at most 100 characters")
    )]
    pub name: String,
    pub status: bool,
    pub attribute_ids: Vec<AttributeId>,
}

impl SubcategoryForm {
    /// # Errors
    ///
    /// Returns [`AppError::BadRequest`] when an ID field is not a number.
    pub fn from_multipart(form: &MultipartForm) -> Result<Self, AppError> {
        let attribute_ids = form
            .all("attribute_ids")
            .iter()
            .filter(|v| !v.trim().is_empty())
            .map(|v| v.parse::<AttributeId>())
            .collect::<Result<_, _>>()
            .map_err(|_| AppError::BadRequest("invalid attribute_ids".to_string()))?;

        Ok(Self {
            id: optional_id(form, "id")?,
            category_id: optional_id(form, "category_id")?,
            name: form.text("name").to_string(),
            status: parse_flag(form.text("status")),
            attribute_ids,
        })
    }

    /// Text parts of the multipart body; attribute IDs repeat as `attribute_ids[]`.
    #[must_use]
    pub fn fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![
            (
                "category_id",
                self.category_id.map(|c| c.to_string()).unwrap_or_default(),
            ),
            ("name", self.name.trim().to_string()),
            ("status", flag_value(self.status).to_string()),
        ];
        fields.extend(
            self.attribute_ids
                .iter()
                .map(|id| ("attribute_ids[]", id.to_string())),
        );
        fields
    }

    /// Whether the attribute is ticked.
    #[must_use]
    pub fn has_attribute(&self, id: AttributeId) -> bool {
        self.attribute_ids.contains(&id)
    }
}

impl From<&Subcategory> for SubcategoryForm {
    fn from(subcategory: &Subcategory) -> Self {
        Self {
            id: Some(subcategory.id),
            category_id: Some(subcategory.category_id),
            name: subcategory.name.clone(),
            status: subcategory.status,
            attribute_ids: subcategory.attributes.iter().map(|a| a.id).collect(),
        }
    }
}

/// Slider create/edit form, submitted as multipart with an optional image and video.
#[derive(Debug, Clone, Default, Validate)]
pub struct SliderForm {
    pub id: Option<SliderId>,
    #[validate(
        custom(function = "not_blank"),
        length(max = 100, message = "Title must be at most 100 characters")
    )]
    pub title: String,
    #[validate(length(max = 200, message = "Subtitle must be at most 200 characters"))]
    pub subtitle: String,
    #[validate(custom(function = "valid_link"))]
    pub link: String,
    pub status: bool,
}

impl SliderForm {
    /// # Errors
    ///
    /// Returns [`AppError::BadRequest`] when the hidden `id` is not a number.
    pub fn from_multipart(form: &MultipartForm) -> Result<Self, AppError> {
        Ok(Self {
            id: optional_id(form, "id")?,
            title: form.text("title").to_string(),
            subtitle: form.text("subtitle").to_string(),
            link: form.text("link").to_string(),
            status: parse_flag(form.text("status")),
        })
    }

    /// Text parts of the multipart body.
    #[must_use]
    pub fn fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("title", self.title.trim().to_string()),
            ("subtitle", self.subtitle.trim().to_string()),
            ("link", self.link.trim().to_string()),
            ("status", flag_value(self.status).to_string()),
        ]
    }
}

impl From<&Slider> for SliderForm {
    fn from(slider: &Slider) -> Self {
        Self {
            id: Some(slider.id),
            title: slider.title.clone(),
            subtitle: slider.subtitle.clone().unwrap_or_default(),
            link: slider.link.clone().unwrap_or_default(),
            status: slider.status,
        }
    }
}

/// First error message per field, ready for templates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors(BTreeMap<String, String>);

impl FormErrors {
    /// Local validation failures.
    #[must_use]
    pub fn from_validation(errors: &ValidationErrors) -> Self {
        Self(
            errors
                .field_errors()
                .into_iter()
                .filter_map(|(field, errs)| {
                    let first = errs.first()?;
                    let message = first
                        .message
                        .as_ref()
                        .map_or_else(|| format!("Invalid {field}"), ToString::to_string);
                    Some((field.to_string(), message))
                })
                .collect(),
        )
    }

    /// Field messages from a backend 422.
    #[must_use]
    pub fn from_api(error: &ApiError) -> Self {
        Self(
            error
                .field_errors()
                .into_iter()
                .flatten()
                .filter_map(|(field, messages)| Some((field.clone(), messages.first()?.clone())))
                .collect(),
        )
    }

    /// Message for `field`, if any.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn urlencoded<T: for<'de> Deserialize<'de>>(body: &str) -> T {
        serde_urlencoded::from_str(body).unwrap()
    }

    #[test]
    fn test_blank_id_means_create() {
        let form: AttributeForm = urlencoded("id=&name=Color&status=true");
        assert_eq!(form.id, None);
        assert!(form.status);

        let form: AttributeForm = urlencoded("id=7&name=Color&status=false");
        assert_eq!(form.id, Some(AttributeId::new(7)));
        assert!(!form.status);
    }

    #[test]
    fn test_garbage_id_is_rejected() {
        let result: Result<AttributeForm, _> = serde_urlencoded::from_str("id=seven&name=Color");
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_status_is_inactive() {
        let form: AttributeValueForm = urlencoded("value=Red");
        assert!(!form.status);
        assert_eq!(form.payload().value, "Red");
    }

    #[test]
    fn test_blank_name_fails_locally() {
        let form: AttributeForm = urlencoded("name=%20%20&status=true");
        let errors = FormErrors::from_validation(&form.validate().unwrap_err());
        assert_eq!(errors.get("name"), Some("This field is required"));
    }

    #[test]
    fn test_subcategory_requires_category() {
        let form = SubcategoryForm {
            name: "Sneakers".to_string(),
            ..SubcategoryForm::default()
        };
        let errors = FormErrors::from_validation(&form.validate().unwrap_err());
        assert_eq!(errors.get("category_id"), Some("Choose a category"));
    }

    #[test]
    fn test_subcategory_fields_repeat_attributes() {
        let form = SubcategoryForm {
            id: None,
            category_id: Some(CategoryId::new(2)),
            name: " Sneakers ".to_string(),
            status: true,
            attribute_ids: vec![AttributeId::new(7), AttributeId::new(9)],
        };
        let fields = form.fields();
        assert!(fields.contains(&("name", "Sneakers".to_string())));
        assert!(fields.contains(&("status", "1".to_string())));
        let ids: Vec<_> = fields
            .iter()
            .filter(|(k, _)| *k == "attribute_ids[]")
            .map(|(_, v)| v.as_str())
            .collect();
        assert_eq!(ids, ["7", "9"]);
    }

    #[test]
    fn test_slider_link_rules() {
        let slider = |link: &str| SliderForm {
            title: "Summer sale".to_string(),
            link: link.to_string(),
            ..SliderForm::default()
        };
        assert!(slider("").validate().is_ok());
        assert!(slider("/products?category=2").validate().is_ok());
        assert!(slider("https://example.com/sale").validate().is_ok());
        assert!(slider("javascript:alert(1)").validate().is_err());
    }

    #[test]
    fn test_backend_field_errors() {
        let error = ApiError::Validation {
            message: "The given data was invalid.".to_string(),
            fields: BTreeMap::from([("name".to_string(), vec!["Name is taken".to_string()])]),
        };
        let errors = FormErrors::from_api(&error);
        assert_eq!(errors.get("name"), Some("Name is taken"));
        assert!(!errors.is_empty());
    }
}
