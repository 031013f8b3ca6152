use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;

use crate::codec::CodecError;
use crate::db::StoreError;

/// Errors a request handler can end in, mapped onto HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Not found.")]
    NotFound,
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Codec(_) => StatusCode::BAD_REQUEST,
            ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut response = HttpResponse::build(self.status_code());
        match self {
            ApiError::NotFound | ApiError::Codec(CodecError::Malformed(_)) => {
                response.json(json!({ "detail": self.to_string() }))
            }
            ApiError::Codec(CodecError::NotAnObject(_)) => {
                response.json(json!({ "non_field_errors": [self.to_string()] }))
            }
            ApiError::Codec(CodecError::Invalid(errors)) => response.json(errors),
            ApiError::Store(e) => {
                log::error!("Store error: {}", e);
                response.json(json!({ "detail": "Internal server error" }))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::FieldErrors;
    use actix_web::body::to_bytes;

    async fn body_json(error: ApiError) -> (StatusCode, serde_json::Value) {
        let response = error.error_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body()).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[actix_web::test]
    async fn test_not_found_body() {
        let (status, body) = body_json(ApiError::NotFound).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"detail": "Not found."}));
    }

    #[actix_web::test]
    async fn test_validation_body_is_field_map() {
        let mut errors = FieldErrors::default();
        errors.add("title", "This field is required.");

        let (status, body) = body_json(CodecError::Invalid(errors).into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"title": ["This field is required."]}));
    }

    #[actix_web::test]
    async fn test_non_object_body() {
        let (status, body) = body_json(CodecError::NotAnObject("array").into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            json!({"non_field_errors": ["Invalid data. Expected a dictionary, but got array."]})
        );
    }

    #[actix_web::test]
    async fn test_store_error_hides_details() {
        let error = ApiError::Store(StoreError::Sqlite(rusqlite::Error::InvalidQuery));
        let (status, body) = body_json(error).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({"detail": "Internal server error"}));
    }
}
