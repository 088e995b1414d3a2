//! Form payloads with local validation.
//!
//! Validation here is for fast feedback only; the backend validates again and
//! its answer wins.

use std::collections::BTreeMap;

use emporium_core::Email;
use emporium_core::api::ApiError;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError, ValidationErrors};

fn valid_email(value: &str) -> Result<(), ValidationError> {
    Email::parse(value).map(|_| ()).map_err(|e| {
        let mut err = ValidationError::new("email");
        err.message = Some(e.to_string().into());
        err
    })
}

/// `None` for a blank optional input.
fn blank_to_none(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Login form.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct LoginForm {
    #[validate(custom(function = "valid_email"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Registration form.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct RegisterForm {
    #[validate(length(min = 2, max = 100, message = "Name must be 2 to 100 characters"))]
    pub name: String,
    #[validate(custom(function = "valid_email"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    #[validate(must_match(other = "password", message = "Passwords do not match"))]
    pub password_confirmation: String,
}

/// Payload sent to `POST /auth/register`.
#[derive(Debug, Serialize)]
pub struct RegisterPayload<'a> {
    pub name: &'a str,
    pub email: String,
    pub password: &'a str,
}

impl RegisterForm {
    #[must_use]
    pub fn payload(&self) -> RegisterPayload<'_> {
        RegisterPayload {
            name: self.name.trim(),
            email: normalize_email(&self.email),
            password: &self.password,
        }
    }
}

/// Trimmed, lowercased email for the backend. Falls back to the raw input
/// when it does not parse, letting the backend produce the message.
fn normalize_email(raw: &str) -> String {
    Email::parse(raw).map_or_else(|_| raw.trim().to_string(), |e| e.to_string())
}

/// Contact form.
#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate)]
pub struct ContactForm {
    #[validate(length(min = 2, max = 100, message = "Name must be 2 to 100 characters"))]
    pub name: String,
    #[validate(custom(function = "valid_email"))]
    pub email: String,
    #[serde(default)]
    #[validate(length(max = 30, message = "Phone number is too long"))]
    pub phone: Option<String>,
    #[validate(length(min = 3, max = 150, message = "Subject must be 3 to 150 characters"))]
    pub subject: String,
    #[validate(length(min = 10, max = 2000, message = "Message must be 10 to 2000 characters"))]
    pub message: String,
}

impl ContactForm {
    /// Copy with trimmed fields and a blank phone dropped.
    #[must_use]
    pub fn cleaned(&self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            email: normalize_email(&self.email),
            phone: blank_to_none(self.phone.clone()),
            subject: self.subject.trim().to_string(),
            message: self.message.trim().to_string(),
        }
    }
}

/// Review create/update form.
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct ReviewForm {
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: u8,
    #[serde(default)]
    #[validate(length(max = 1000, message = "Review must be at most 1000 characters"))]
    pub comment: String,
}

/// Profile details form.
#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate)]
pub struct ProfileForm {
    #[validate(length(min = 2, max = 100, message = "Name must be 2 to 100 characters"))]
    pub name: String,
    #[validate(custom(function = "valid_email"))]
    pub email: String,
    #[serde(default)]
    #[validate(length(max = 30, message = "Phone number is too long"))]
    pub phone: Option<String>,
}

impl ProfileForm {
    /// Copy with trimmed fields and a blank phone dropped.
    #[must_use]
    pub fn cleaned(&self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            email: normalize_email(&self.email),
            phone: blank_to_none(self.phone.clone()),
        }
    }
}

/// Password change form.
#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate)]
pub struct PasswordForm {
    #[validate(length(min = 1, message = "Current password is required"))]
    pub current_password: String,
    #[validate(length(min = 8, message = "New password must be at least 8 characters"))]
    pub password: String,
    #[validate(must_match(other = "password", message = "Passwords do not match"))]
    pub password_confirmation: String,
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

    fn contact() -> ContactForm {
        ContactForm {
            name: "Jane".to_string(),
            email: "Jane@Example.com ".to_string(),
            phone: Some("  ".to_string()),
            subject: "Sizing".to_string(),
            message: "Do the shirts run small?".to_string(),
        }
    }

    #[test]
    fn test_contact_form_valid_and_cleaned() {
        let form = contact();
        assert!(form.validate().is_ok());

        let cleaned = form.cleaned();
        assert_eq!(cleaned.email, "jane@example.com");
        assert_eq!(cleaned.phone, None);
    }

    #[test]
    fn test_contact_form_field_messages() {
        let form = ContactForm {
            email: "not-an-email".to_string(),
            message: "short".to_string(),
            ..contact()
        };
        let errors = FormErrors::from_validation(&form.validate().unwrap_err());
        assert_eq!(errors.get("email"), Some("email must contain an @ symbol"));
        assert_eq!(
            errors.get("message"),
            Some("Message must be 10 to 2000 characters")
        );
        assert_eq!(errors.get("name"), None);
    }

    #[test]
    fn test_review_rating_bounds() {
        let review = |rating| ReviewForm {
            rating,
            comment: String::new(),
        };
        assert!(review(1).validate().is_ok());
        assert!(review(5).validate().is_ok());
        assert!(review(0).validate().is_err());
        assert!(review(6).validate().is_err());
    }

    #[test]
    fn test_password_rules() {
        let form = PasswordForm {
            current_password: "old".to_string(),
            password: "longenough".to_string(),
            password_confirmation: "different1".to_string(),
        };
        let errors = FormErrors::from_validation(&form.validate().unwrap_err());
        assert_eq!(errors.get("password_confirmation"), Some("Passwords do not match"));

        let form = PasswordForm {
            password: "short".to_string(),
            password_confirmation: "short".to_string(),
            ..form
        };
        let errors = FormErrors::from_validation(&form.validate().unwrap_err());
        assert!(errors.get("password").is_some());
    }

    #[test]
    fn test_errors_from_backend_validation() {
        let err = ApiError::Validation {
            message: "Invalid".to_string(),
            fields: [("email".to_string(), vec!["Already registered".to_string()])]
                .into_iter()
                .collect(),
        };
        let errors = FormErrors::from_api(&err);
        assert_eq!(errors.get("email"), Some("Already registered"));
        assert!(FormErrors::from_api(&ApiError::Unauthorized).is_empty());
    }
}
