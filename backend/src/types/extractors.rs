//! Custom extractors for request validation

use aide::operation::OperationInput;
use aide::OperationOutput;
use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
    http::StatusCode,
    Json,
};
use schemars::JsonSchema;
use validator::Validate;

use crate::types::error::AppError;

/// Custom JSON extractor that validates the payload
///
/// The body is parsed regardless of `Content-Type`, matching what API Gateway forwards.
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: serde::de::DeserializeOwned + Validate + JsonSchema,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let body = Bytes::from_request(req, state).await.map_err(|err| {
            tracing::debug!("Failed to read request body: {err}");
            AppError::new(
                StatusCode::BAD_REQUEST,
                "invalid_body",
                "Invalid request body",
            )
        })?;

        if body.iter().all(u8::is_ascii_whitespace) {
            return Err(AppError::new(
                StatusCode::BAD_REQUEST,
                "missing_body",
                "Missing request body",
            ));
        }

        let payload: T = serde_json::from_slice(&body).map_err(|err| {
            tracing::debug!("Invalid JSON payload: {err}");
            AppError::new(
                StatusCode::BAD_REQUEST,
                "invalid_json",
                "Invalid JSON payload",
            )
        })?;

        payload.validate()?;

        Ok(Self(payload))
    }
}

impl<T> OperationInput for ValidatedJson<T>
where
    T: JsonSchema,
{
    fn operation_input(
        ctx: &mut aide::generate::GenContext,
        operation: &mut aide::openapi::Operation,
    ) {
        // Same wire shape as Json<T>
        Json::<T>::operation_input(ctx, operation);
    }

    fn inferred_early_responses(
        ctx: &mut aide::generate::GenContext,
        operation: &mut aide::openapi::Operation,
    ) -> Vec<(Option<u16>, aide::openapi::Response)> {
        AppError::inferred_responses(ctx, operation)
    }
}
