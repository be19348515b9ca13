//! JSON bodies that must pass `validator` rules before reaching a handler

use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::response::ApiError;

fn checked<T: Validate>(value: T) -> Result<T, ApiError> {
    value.validate()?;
    Ok(value)
}

/// JSON body, deserialized then validated
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::invalid_body(rejection.body_text()))?;
        checked(value).map(Self)
    }
}

/// Like [`ValidatedJson`], but an empty body stands for `T::default()`.
/// Leave endpoints take their options this way.
#[derive(Debug, Clone)]
pub struct OptionalValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for OptionalValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate + Default,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::invalid_body(rejection.body_text()))?;

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self(T::default()));
        }

        let value: T = serde_json::from_slice(&bytes).map_err(|e| ApiError::invalid_body(e.to_string()))?;
        checked(value).map(Self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::{body::Body, http, http::header::CONTENT_TYPE};
    use serde::Deserialize;

    #[derive(Debug, Default, Deserialize, Validate)]
    struct Leave {
        #[validate(length(equal = 6))]
        code: Option<String>,
    }

    fn request(body: &'static str) -> Request {
        http::Request::builder()
            .method("POST")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_empty_body_uses_default() {
        let OptionalValidatedJson(leave) = OptionalValidatedJson::<Leave>::from_request(request(""), &())
            .await
            .unwrap();
        assert!(leave.code.is_none());
    }

    #[tokio::test]
    async fn test_present_body_is_validated() {
        let OptionalValidatedJson(leave) =
            OptionalValidatedJson::<Leave>::from_request(request(r#"{"code":"ABC123"}"#), &())
                .await
                .unwrap();
        assert_eq!(leave.code.as_deref(), Some("ABC123"));

        let err = OptionalValidatedJson::<Leave>::from_request(request(r#"{"code":"ABC"}"#), &())
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION_ERROR");

        let err = OptionalValidatedJson::<Leave>::from_request(request("{"), &())
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "INVALID_BODY");
    }

    #[tokio::test]
    async fn test_required_body_rejects_syntax_errors() {
        let err = ValidatedJson::<Leave>::from_request(request("not json"), &())
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "INVALID_BODY");
    }
}
