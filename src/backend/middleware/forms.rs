/**
 * Request Body Extractors
 *
 * - `ApiJson<T>` / `ApiQuery<T>` / `ApiPath<T>` - axum's `Json`, `Query` and
 *   `Path` with rejections turned into `BackendError`, so malformed input
 *   gets the usual `{"message","status"}` body
 * - `MediaForm<T>` - JSON, or `multipart/form-data` whose text fields are
 *   deserialised into `T` and whose `photo`, `image` or `media` part is kept
 *   as an `UploadedFile`
 */

use axum::extract::{FromRequest, FromRequestParts, Multipart, Request};
use axum::http::header::CONTENT_TYPE;
use axum::Json;
use bytes::Bytes;
use serde::de::DeserializeOwned;

use crate::backend::error::BackendError;

/// Multipart part names that carry the uploaded file
pub const FILE_FIELDS: [&str; 3] = ["photo", "image", "media"];

#[derive(Debug, Clone, FromRequest)]
#[from_request(via(axum::Json), rejection(BackendError))]
pub struct ApiJson<T>(pub T);

#[derive(Debug, Clone, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(BackendError))]
pub struct ApiQuery<T>(pub T);

#[derive(Debug, Clone, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(BackendError))]
pub struct ApiPath<T>(pub T);

/// File part of a multipart request
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub bytes: Bytes,
    pub file_name: String,
    pub content_type: Option<String>,
}

/// Form fields plus an optional uploaded file
#[derive(Debug)]
pub struct MediaForm<T> {
    pub fields: T,
    pub file: Option<UploadedFile>,
}

fn is_multipart(req: &Request) -> bool {
    req.headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.starts_with("multipart/form-data"))
        .unwrap_or(false)
}

impl<S, T> FromRequest<S> for MediaForm<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = BackendError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if !is_multipart(&req) {
            let Json(fields) = Json::<T>::from_request(req, state).await?;
            return Ok(Self { fields, file: None });
        }

        let mut multipart = Multipart::from_request(req, state)
            .await
            .map_err(|rejection| BackendError::validation(rejection.body_text()))?;

        let mut text_fields = serde_json::Map::new();
        let mut file = None;

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|err| BackendError::validation(err.body_text()))?
        {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };

            if FILE_FIELDS.contains(&name.as_str()) && field.file_name().is_some() {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let content_type = field.content_type().map(str::to_string);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|err| BackendError::validation(err.body_text()))?;
                if !bytes.is_empty() {
                    file = Some(UploadedFile {
                        bytes,
                        file_name,
                        content_type,
                    });
                }
            } else {
                let text = field
                    .text()
                    .await
                    .map_err(|err| BackendError::validation(err.body_text()))?;
                text_fields.insert(name, serde_json::Value::String(text));
            }
        }

        let fields = serde_json::from_value(serde_json::Value::Object(text_fields))
            .map_err(|err| BackendError::validation(err.to_string()))?;
        Ok(Self { fields, file })
    }
}
