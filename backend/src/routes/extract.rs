//! Request extractors shared by the resource routes
//!
//! Both reject with [`ApiError`] so that malformed input produces the same
//! JSON error body as every other failure.

use crate::error::ApiError;
use axum::{
    extract::{rejection::JsonRejection, FromRequest, FromRequestParts, Path, Request},
    http::request::Parts,
    Json,
};
use blog_shared::validation::ValidateInput;
use serde::de::DeserializeOwned;

/// JSON body that has been deserialized and validated
pub struct ValidJson<T>(pub T);

#[axum::async_trait]
impl<S, T> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned + ValidateInput,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection: JsonRejection| ApiError::BadRequest(rejection.body_text()))?;

        value.validate()?;
        Ok(Self(value))
    }
}

/// Positive numeric id taken from the `:id` path segment
#[derive(Debug, Clone, Copy)]
pub struct ResourceId(pub i64);

#[axum::async_trait]
impl<S> FromRequestParts<S> for ResourceId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<i64>::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::BadRequest("Invalid id".to_string()))?;

        if id <= 0 {
            return Err(ApiError::BadRequest("Invalid id".to_string()));
        }
        Ok(Self(id))
    }
}
