//! JSON body extractor for storage payloads

use axum::{
    Json as AxumJson,
    extract::{FromRequest, Request, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Serialize, de::DeserializeOwned};

use super::error::{ApiError, ApiErrorType};

/// `axum::Json` whose rejections come back as [`ApiError`].
///
/// Any body that does not describe a valid payload is a 400 `invalid_body`;
/// only a failure to read the body keeps axum's status.
#[derive(Debug, Clone, Copy, Default)]
pub struct Json<T>(pub T);

impl<S, T> FromRequest<S> for Json<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        AxumJson::<T>::from_request(req, state)
            .await
            .map(|AxumJson(value)| Json(value))
            .map_err(body_error)
    }
}

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Response {
        AxumJson(self.0).into_response()
    }
}

fn body_error(rejection: JsonRejection) -> ApiError {
    let error = match &rejection {
        JsonRejection::JsonDataError(e) => {
            ApiError::bad_request(format!("Invalid storage payload: {}", e.body_text()))
        }
        JsonRejection::JsonSyntaxError(e) => {
            ApiError::bad_request(format!("Malformed JSON: {}", e.body_text()))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::bad_request("Content-Type must be application/json")
        }
        other => ApiError::new(
            other.status(),
            ApiErrorType::InvalidRequestError,
            other.body_text(),
        ),
    };

    if error.status == StatusCode::BAD_REQUEST {
        error.with_code("invalid_body")
    } else {
        error
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Storage;
    use axum::body::Body;

    fn post(content_type: Option<&str>, body: &'static str) -> Request {
        let mut builder = axum::http::Request::builder().method("POST");
        if let Some(content_type) = content_type {
            builder = builder.header("content-type", content_type);
        }
        builder.body(Body::from(body)).unwrap()
    }

    #[tokio::test]
    async fn test_valid_storage_body() {
        let request = post(
            Some("application/json"),
            r#"{"mount_path": "/drive", "driver": "local"}"#,
        );

        let Json(storage) = Json::<Storage>::from_request(request, &()).await.unwrap();
        assert_eq!(storage.mount_path, "/drive");
    }

    #[tokio::test]
    async fn test_malformed_body_is_bad_request() {
        let request = post(Some("application/json"), "{not json");

        let error = Json::<Storage>::from_request(request, &()).await.unwrap_err();
        assert_eq!(error.status, StatusCode::BAD_REQUEST);
        assert_eq!(error.response.error.code.as_deref(), Some("invalid_body"));
        assert!(error.response.error.message.starts_with("Malformed JSON"));
    }

    #[tokio::test]
    async fn test_missing_field_is_bad_request() {
        let request = post(Some("application/json"), r#"{"driver": "local"}"#);

        let error = Json::<Storage>::from_request(request, &()).await.unwrap_err();
        assert_eq!(error.status, StatusCode::BAD_REQUEST);
        assert!(error.response.error.message.contains("mount_path"));
    }

    #[tokio::test]
    async fn test_missing_content_type() {
        let request = post(None, r#"{"mount_path": "/drive", "driver": "local"}"#);

        let error = Json::<Storage>::from_request(request, &()).await.unwrap_err();
        assert_eq!(error.status, StatusCode::BAD_REQUEST);
    }
}
