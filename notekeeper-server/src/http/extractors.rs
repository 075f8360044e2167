//! Custom Axum extractors

use axum::extract::{FromRequest, FromRequestParts, Path, Request};
use axum::http::request::Parts;
use axum::Json;
use serde::de::DeserializeOwned;

use super::error::ApiError;
use crate::models::NoteId;

/// JSON body whose rejections render as `ApiError` envelopes
pub struct ApiJson<T>(pub T);

impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(Self(value))
    }
}

/// Extract a note id from path
///
/// Anything that is not a well-formed id cannot name a stored note, so it
/// is reported as not found rather than as a bad request.
pub struct NoteIdPath(pub NoteId);

impl<S> FromRequestParts<S> for NoteIdPath
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw): Path<String> = Path::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::NotFound {
                resource: "note",
                id: String::new(),
            })?;

        let id = NoteId::parse_str(&raw).map_err(|_| ApiError::NotFound {
            resource: "note",
            id: raw.clone(),
        })?;

        Ok(Self(id))
    }
}
