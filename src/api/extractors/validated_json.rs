//! Validated JSON extractor - deserialization plus `validator` rules.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use crate::errors::{AppError, FieldError};

/// JSON body that has passed its `Validate` rules.
///
/// Malformed JSON is a 400 bad request; rule violations are a 400 with one
/// entry per failed field.
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;

        value
            .validate()
            .map_err(|e| AppError::InvalidPayload(field_errors(&e)))?;

        Ok(ValidatedJson(value))
    }
}

/// Flatten validation errors, sorted by field for stable output.
pub fn field_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut out: Vec<FieldError> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                let message = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{} no es válido", field));
                FieldError::new(field.to_string(), message)
            })
        })
        .collect();
    out.sort_by(|a, b| a.field.cmp(&b.field));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Validate)]
    struct Sample {
        #[validate(length(min = 1, message = "Requerido"))]
        name: String,
        #[validate(range(min = 1))]
        qty: u32,
    }

    #[test]
    fn test_field_errors_are_listed_per_field() {
        let sample = Sample {
            name: String::new(),
            qty: 0,
        };
        let errors = field_errors(&sample.validate().unwrap_err());
        assert_eq!(
            errors,
            vec![
                FieldError::new("name", "Requerido"),
                FieldError::new("qty", "qty no es válido"),
            ]
        );
    }
}
