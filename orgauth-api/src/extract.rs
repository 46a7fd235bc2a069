/// Request extractors
///
/// [`ValidatedJson`] deserializes a JSON body and runs its `validator` rules
/// before the handler sees it:
///
/// - body is not JSON, or a field has the wrong type: 400
/// - a rule fails: 422 with one entry per failed rule, field names in camelCase
///
/// Request structs declare required fields as `Option` with a `required`
/// rule, so a missing field is a 422 field error rather than a 400.

use axum::{
    async_trait,
    extract::{FromRequest, Request},
    Json,
};
use orgauth_shared::error::{FieldError, ServiceError};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use crate::error::ApiError;

/// JSON body that has passed validation
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await.map_err(|rejection| {
            tracing::debug!(error = %rejection.body_text(), "Rejected request body");
            ApiError::bad_request(rejection.body_text())
        })?;

        value
            .validate()
            .map_err(|e| ApiError::from(ServiceError::Validation(field_errors(&e))))?;

        Ok(ValidatedJson(value))
    }
}

/// Flattens validator output into field errors, sorted by field name
pub fn field_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut details: Vec<FieldError> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            let field = camel_case(&field.to_string());
            errors.iter().map(move |error| {
                FieldError::new(
                    field.clone(),
                    error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| "Validation failed".to_string()),
                )
            })
        })
        .collect();

    details.sort_by(|a, b| a.field.cmp(&b.field));
    details
}

/// `first_name` -> `firstName`; already camelCase names pass through
fn camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper_next = false;

    for c in field.chars() {
        if c == '_' {
            upper_next = !out.is_empty();
        } else if upper_next {
            out.extend(c.to_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }

    out
}
