//! Browser multipart bodies, read into text fields and pass-through files.

use std::collections::BTreeMap;

use axum::extract::Multipart;
use emporium_core::api::Upload;

use crate::error::AppError;

/// A multipart form read into memory.
#[derive(Debug, Default)]
pub struct MultipartForm {
    fields: BTreeMap<String, Vec<String>>,
    uploads: Vec<Upload>,
}

impl MultipartForm {
    /// Read every part. Parts named in `file_fields` become [`Upload`]s
    /// (skipped when no file was chosen); everything else is text.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::BadRequest`] for a malformed body.
    pub async fn read(mut multipart: Multipart, file_fields: &[&str]) -> Result<Self, AppError> {
        let mut form = Self::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?
        {
            let Some(name) = field.name().map(|n| n.trim_end_matches("[]").to_string()) else {
                continue;
            };

            if file_fields.contains(&name.as_str()) {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let content_type = field.content_type().map(ToString::to_string);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.body_text()))?;
                let upload = Upload {
                    field: name,
                    file_name,
                    content_type,
                    bytes: bytes.to_vec(),
                };
                if !upload.is_empty() {
                    form.uploads.push(upload);
                }
            } else {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.body_text()))?;
                form.fields.entry(name).or_default().push(value);
            }
        }

        Ok(form)
    }

    /// First value of a text field, or `""`.
    #[must_use]
    pub fn text(&self, name: &str) -> &str {
        self.fields
            .get(name)
            .and_then(|values| values.first())
            .map_or("", String::as_str)
    }

    /// Every value of a repeated field (`name` or `name[]`).
    #[must_use]
    pub fn all(&self, name: &str) -> &[String] {
        self.fields.get(name).map_or(&[], Vec::as_slice)
    }

    /// Files chosen in the form, in submission order.
    #[must_use]
    pub fn into_uploads(self) -> Vec<Upload> {
        self.uploads
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::{
        body::Body,
        extract::FromRequest,
        http::{Request, header},
    };

    use super::*;

    const BOUNDARY: &str = "XBOUNDARY";

    fn part(name: &str, file_name: Option<&str>, body: &str) -> String {
        let disposition = match file_name {
            Some(f) => format!("form-data; name=\"{name}\"; filename=\"{f}\"\r\nContent-Type: image/png"),
            None => format!("form-data; name=\"{name}\""),
        };
        format!("--{BOUNDARY}\r\nContent-Disposition: {disposition}\r\n\r\n{body}\r\n")
    }

    async fn read(parts: &[String]) -> MultipartForm {
        let body = format!("{}--{BOUNDARY}--\r\n", parts.concat());
        let request = Request::builder()
            .method("POST")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap();
        let multipart = Multipart::from_request(request, &()).await.unwrap();
        MultipartForm::read(multipart, &["image", "video"]).await.unwrap()
    }

    #[tokio::test]
    async fn test_text_and_repeated_fields() {
        let form = read(&[
            part("name", None, "Sneakers"),
            part("attribute_ids[]", None, "7"),
            part("attribute_ids[]", None, "9"),
        ])
        .await;

        assert_eq!(form.text("name"), "Sneakers");
        assert_eq!(form.text("missing"), "");
        assert_eq!(form.all("attribute_ids"), ["7", "9"]);
        assert!(form.into_uploads().is_empty());
    }

    #[tokio::test]
    async fn test_empty_file_input_is_skipped() {
        let form = read(&[
            part("title", None, "Summer"),
            part("image", Some("hero.png"), "PNGDATA"),
            part("video", Some(""), ""),
        ])
        .await;

        let uploads = form.into_uploads();
        assert_eq!(uploads.len(), 1);
        assert_eq!(uploads[0].field, "image");
        assert_eq!(uploads[0].file_name, "hero.png");
        assert_eq!(uploads[0].content_type.as_deref(), Some("image/png"));
        assert_eq!(uploads[0].bytes, b"PNGDATA");
    }
}
