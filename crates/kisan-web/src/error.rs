//! API 에러 처리.
//!
//! 요청 단위 문제(잘못된 Base64, 범위 밖 파라미터, 작업 실패)만 다룬다.
//! 카메라/모델 실패는 핸들러에서 리포트 값으로 변환되어 200으로 응답한다.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use kisan_core::error::CoreError;
use serde::Serialize;
use thiserror::Error;

/// API 에러
#[derive(Debug, Error)]
pub enum ApiError {
    /// 내부 서버 오류
    #[error("내부 서버 오류: {0}")]
    Internal(String),

    /// 리소스를 찾을 수 없음
    #[error("리소스를 찾을 수 없음: {0}")]
    NotFound(String),

    /// 잘못된 요청
    #[error("잘못된 요청: {0}")]
    BadRequest(String),
}

/// 에러 응답 본문
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// 에러 메시지
    pub error: String,
    /// HTTP 상태 코드
    pub status: u16,
}

impl ApiError {
    /// HTTP 상태 코드
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match self {
            ApiError::Internal(msg) | ApiError::NotFound(msg) | ApiError::BadRequest(msg) => msg,
        };

        let body = ErrorResponse {
            error: message,
            status: status.as_u16(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ImageCodec(msg) => ApiError::BadRequest(format!("이미지 디코딩 실패: {msg}")),
            CoreError::Validation { field, message } => {
                ApiError::BadRequest(format!("{field}: {message}"))
            }
            other => ApiError::Internal(other.to_string()),
        }
    }
}
