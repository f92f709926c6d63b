//! Kisan 핵심 에러 타입.
//!
//! 모든 어댑터 crate는 이 타입으로 에러를 반환하고,
//! 컴포넌트 경계(캡처 세션, 진단 클라이언트, 하이라이트 추출기)에서
//! 호출자에게 보이는 리포트 값으로 변환한다.

use thiserror::Error;

/// 코어 레이어 에러.
/// 직렬화, 설정, 카메라, 이미지 코덱, 외부 모델 호출 에러를 정의한다.
#[derive(Debug, Error)]
pub enum CoreError {
    /// JSON 직렬화/역직렬화 실패
    #[error("직렬화 에러: {0}")]
    Serialization(#[from] serde_json::Error),

    /// 설정값 오류
    #[error("설정 에러: {0}")]
    Config(String),

    /// 필드 유효성 검증 실패
    #[error("유효성 검증 실패: {field}: {message}")]
    Validation {
        /// 검증 실패한 필드명
        field: String,
        /// 실패 사유
        message: String,
    },

    /// 내부 에러 (예상치 못한 상황)
    #[error("내부 에러: {0}")]
    Internal(String),

    /// 네트워크 에러 (연결 실패, 타임아웃)
    #[error("네트워크 에러: {0}")]
    Network(String),

    /// Rate Limit / 할당량 초과 (429)
    #[error("요청 한도 초과, {retry_after_secs}초 후 재시도")]
    RateLimit {
        /// 재시도 대기 시간 (초)
        retry_after_secs: u64,
    },

    /// 서비스 일시 불가 (503)
    #[error("서비스 일시 불가: {0}")]
    ServiceUnavailable(String),

    /// I/O 에러
    #[error("I/O 에러: {0}")]
    Io(#[from] std::io::Error),

    /// 카메라 장치를 열 수 없음
    #[error("카메라 열기 실패: {0}")]
    CameraUnavailable(String),

    /// 이미지 인코딩/디코딩 실패 (JPEG, Base64, 리사이즈)
    #[error("이미지 코덱 에러: {0}")]
    ImageCodec(String),

    /// 외부 모델 응답 형식 오류
    #[error("모델 응답 오류: {0}")]
    ModelResponse(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = CoreError::CameraUnavailable("index 7".to_string());
        assert!(err.to_string().contains("index 7"));

        let err = CoreError::RateLimit {
            retry_after_secs: 30,
        };
        assert!(err.to_string().contains("30"));
    }

    #[test]
    fn from_serde_error() {
        let parse: Result<serde_json::Value, _> = serde_json::from_str("{not json");
        let err: CoreError = parse.unwrap_err().into();
        assert!(matches!(err, CoreError::Serialization(_)));
    }
}
