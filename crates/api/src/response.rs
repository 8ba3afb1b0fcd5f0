//! Response envelope, error mapping and rejecting extractors.
//!
//! Every JSON response has the shape `{status, message, data}` where
//! `status` is `"success"` or `"failed"`.

use axum::{
    Json,
    extract::{
        FromRequest, FromRequestParts,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use lendbook_core::finance::FinanceError;
use lendbook_core::loan::{LoanError, StoreError};
use lendbook_shared::AppError;
use serde::Serialize;
use serde_json::json;
use tracing::{error, warn};

/// Successful response body.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    /// Always "success".
    pub status: &'static str,
    /// Human-readable message.
    pub message: String,
    /// Payload.
    pub data: T,
}

/// Successful response with a status code.
#[derive(Debug)]
pub struct ApiResponse<T> {
    status: StatusCode,
    message: String,
    data: T,
}

impl<T> ApiResponse<T> {
    /// 200 OK.
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            status: StatusCode::OK,
            message: message.into(),
            data,
        }
    }

    /// 201 Created.
    pub fn created(message: impl Into<String>, data: T) -> Self {
        Self {
            status: StatusCode::CREATED,
            message: message.into(),
            data,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let body = Envelope {
            status: "success",
            message: self.message,
            data: self.data,
        };
        (self.status, Json(body)).into_response()
    }
}

/// Error returned by handlers; renders the failed envelope.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = self.0;
        let status =
            StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if err.is_server_error() {
            error!(error = %err, code = err.error_code(), "Request failed");
        } else {
            warn!(error = %err, code = err.error_code(), "Request rejected");
        }
        let body = json!({
            "status": "failed",
            "message": err.public_message(),
            "data": { "code": err.error_code() },
        });
        (status, Json(body)).into_response()
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<LoanError> for ApiError {
    fn from(err: LoanError) -> Self {
        Self(err.into())
    }
}

impl From<FinanceError> for ApiError {
    fn from(err: FinanceError) -> Self {
        Self(err.into())
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        Self(err.into())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(AppError::Validation(rejection.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self(AppError::Validation(rejection.body_text()))
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self(AppError::Validation(rejection.body_text()))
    }
}

/// JSON body extractor that rejects with the failed envelope.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Query string extractor that rejects with the failed envelope.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);

/// Path extractor that rejects with the failed envelope.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);

/// Handler result.
pub type ApiResult<T> = Result<ApiResponse<T>, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use serde_json::Value;

    async fn body_json(response: Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_success_envelope() {
        let response = ApiResponse::created("Loan created", json!({"id": 1})).into_response();
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = body_json(response).await;
        assert_eq!(body["status"], "success");
        assert_eq!(body["message"], "Loan created");
        assert_eq!(body["data"]["id"], 1);
    }

    #[tokio::test]
    async fn test_server_error_hides_detail() {
        let response =
            ApiError::from(StoreError::Database("relation loans missing".into())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["status"], "failed");
        assert_eq!(body["message"], "An internal error occurred");
        assert_eq!(body["data"]["code"], "DATABASE_ERROR");
    }

    #[tokio::test]
    async fn test_loan_errors_map_to_status() {
        let response = ApiError::from(LoanError::ConcurrentModification).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let response = ApiError::from(LoanError::PhoneNotFound("98".into())).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(body["message"], "No customer found with phone number 98");
    }
}
