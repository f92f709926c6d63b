//! # kisan-core
//!
//! Kisan 도메인 모델, 포트(trait) 정의, 에러 타입, 다국어 메시지 테이블.
//! 모든 크레이트가 공유하는 핵심 타입과 인터페이스를 제공한다.
//!
//! ## 구조
//!
//! - [`models`]: 도메인 데이터 구조체 (serde Serialize/Deserialize)
//! - [`ports`]: Hexagonal Architecture 포트 인터페이스 (카메라, 비전 모델)
//! - [`error`]: 핵심 에러 타입 (thiserror)
//! - [`config`]: 애플리케이션 설정 구조체
//! - [`config_manager`]: 설정 파일 관리 (로드/저장)
//! - [`locale`]: 언어 enum + 지역화 메시지 조회 테이블

pub mod config;
pub mod config_manager;
pub mod error;
pub mod locale;
pub mod models;
pub mod ports;

#[cfg(test)]
mod tests {
    use crate::locale::Language;
    use crate::models::diagnosis::{DiagnosisReport, FailureKind};

    #[test]
    fn diagnosis_report_serde_shape() {
        let report = DiagnosisReport::diagnosed("Tomato early blight".to_string(), Language::English);
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["success"], true);
        assert_eq!(json["language"], "english");
        assert_eq!(json["diagnosis"], "Tomato early blight");
        assert!(json.get("error").is_none());
        assert!(json.get("image_base64").is_none());
    }

    #[test]
    fn failure_kind_serializes_as_message_key() {
        let report = DiagnosisReport::camera_unavailable(Language::Tamil);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "Camera could not be opened");
        assert_eq!(report.error, Some(FailureKind::CameraUnavailable));
    }

    #[test]
    fn config_defaults() {
        let config = crate::config::AppConfig::default_config();
        assert_eq!(config.capture.camera_index, 0);
        assert_eq!(config.capture.frame_skip, 3);
        assert_eq!(config.encoding.max_side, 1024);
        assert_eq!(config.encoding.jpeg_quality, 85);
        assert_eq!(config.default_language, Language::Hindi);
        assert_eq!(config.vision_model.model.as_deref(), Some("gemini-2.0-flash-lite"));
    }
}
