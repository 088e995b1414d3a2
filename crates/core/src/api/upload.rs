//! Files forwarded to the backend as multipart parts.

use reqwest::multipart::{Form, Part};

use super::ApiError;

/// A file received from a browser form, ready to be passed through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    /// Multipart field name the backend expects (`image`, `video`, `picture`).
    pub field: String,
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl Upload {
    /// Browsers submit an empty part when no file was chosen.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty() && self.file_name.is_empty()
    }

    /// Append this file to `form`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Http`] if the content type is not a valid MIME type.
    pub fn attach(self, form: Form) -> Result<Form, ApiError> {
        let mut part = Part::bytes(self.bytes).file_name(self.file_name);
        if let Some(content_type) = self.content_type.as_deref() {
            part = part.mime_str(content_type)?;
        }
        Ok(form.part(self.field, part))
    }
}

/// Build a multipart body from text fields and optional files.
///
/// Empty uploads are skipped so an unchanged file input leaves the stored
/// file alone.
///
/// # Errors
///
/// Returns error if a file carries an invalid content type.
pub fn multipart_form<I, K, V>(fields: I, uploads: Vec<Upload>) -> Result<Form, ApiError>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    let form = fields
        .into_iter()
        .fold(Form::new(), |form, (name, value)| {
            form.text(name.into(), value.into())
        });
    uploads
        .into_iter()
        .filter(|u| !u.is_empty())
        .try_fold(form, |form, upload| upload.attach(form))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload(file_name: &str, bytes: &[u8]) -> Upload {
        Upload {
            field: "image".to_string(),
            file_name: file_name.to_string(),
            content_type: Some("image/png".to_string()),
            bytes: bytes.to_vec(),
        }
    }

    #[test]
    fn test_empty_upload_detected() {
        assert!(upload("", b"").is_empty());
        assert!(!upload("a.png", b"\x89PNG").is_empty());
    }

    #[test]
    fn test_invalid_mime_rejected() {
        let bad = Upload {
            content_type: Some("not a mime".to_string()),
            ..upload("a.png", b"x")
        };
        assert!(multipart_form([("name", "Hero")], vec![bad]).is_err());
        assert!(multipart_form([("name", "Hero")], vec![upload("", b"")]).is_ok());
    }
}
