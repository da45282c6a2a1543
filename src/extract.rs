// src/extract.rs
//
// Request extractors shared by the handlers: a body that may be JSON or
// URL-encoded form data, and a buffered multipart form.

use axum::{
    async_trait,
    extract::{multipart::Multipart, FromRequest, Request},
    http::header::CONTENT_TYPE,
    Form, Json,
};
use serde::de::DeserializeOwned;
use std::collections::HashMap;

use crate::error::AppError;

/// Deserializes `application/json` bodies as JSON and everything else as
/// `application/x-www-form-urlencoded`.
#[derive(Debug, Clone)]
pub struct JsonOrForm<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonOrForm<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send + 'static,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_json = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.starts_with("application/json"))
            .unwrap_or(false);

        if is_json {
            let Json(value) = Json::<T>::from_request(req, state)
                .await
                .map_err(|rejection| AppError::bad_request(rejection.body_text()))?;
            Ok(Self(value))
        } else {
            let Form(value) = Form::<T>::from_request(req, state)
                .await
                .map_err(|rejection| AppError::bad_request(rejection.body_text()))?;
            Ok(Self(value))
        }
    }
}

#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Every part of a multipart body, files and text fields kept apart.
#[derive(Debug, Default)]
pub struct MultipartForm {
    pub files: HashMap<String, UploadedFile>,
    pub fields: HashMap<String, String>,
}

impl MultipartForm {
    pub async fn read(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut form = MultipartForm::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::bad_request(format!("Invalid multipart body: {}", e)))?
        {
            let name = field.name().unwrap_or_default().to_string();
            let file_name = field.file_name().map(str::to_string);
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::bad_request(format!("Failed to read field '{}': {}", name, e)))?;

            match file_name {
                Some(file_name) => {
                    form.files.insert(
                        name,
                        UploadedFile {
                            file_name,
                            bytes: data.to_vec(),
                        },
                    );
                }
                None => {
                    form.fields
                        .insert(name, String::from_utf8_lossy(&data).trim().to_string());
                }
            }
        }

        Ok(form)
    }

    /// Non-empty text field.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }

    pub fn parsed<T: std::str::FromStr>(&self, name: &str) -> Result<Option<T>, AppError> {
        match self.field(name) {
            Some(raw) => raw
                .parse::<T>()
                .map(Some)
                .map_err(|_| AppError::bad_request(format!("Invalid value for '{}': {}", name, raw))),
            None => Ok(None),
        }
    }

    /// Required, non-empty file part.
    pub fn take_file(&mut self, name: &str) -> Result<UploadedFile, AppError> {
        self.files
            .remove(name)
            .filter(|file| !file.bytes.is_empty())
            .ok_or_else(|| AppError::bad_request(format!("No {} file provided", name)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multipart_form_accessors() {
        let mut form = MultipartForm::default();
        form.fields.insert("timestamp".into(), "2.5".into());
        form.fields.insert("empty".into(), String::new());
        form.fields.insert("width".into(), "wide".into());
        form.files.insert(
            "video".into(),
            UploadedFile { file_name: "a.mp4".into(), bytes: vec![1, 2, 3] },
        );
        form.files.insert(
            "audio".into(),
            UploadedFile { file_name: "a.mp3".into(), bytes: vec![] },
        );

        assert_eq!(form.field("timestamp"), Some("2.5"));
        assert_eq!(form.field("empty"), None);
        assert_eq!(form.parsed::<f64>("timestamp").unwrap(), Some(2.5));
        assert_eq!(form.parsed::<u32>("missing").unwrap(), None);
        assert!(form.parsed::<u32>("width").is_err());
        assert_eq!(form.take_file("video").unwrap().file_name, "a.mp4");
        assert!(form.take_file("audio").is_err());
        assert!(form.take_file("video").is_err());
    }
}
