//! 진단 결과 모델.
//!
//! 캡처 세션/업로드 진단이 호출자에게 반환하는 리포트.
//! `error` 필드는 안정적인 실패 키만 담으며, 원본 에러 상세는 로그에만 남긴다.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::locale::{self, Language};

/// 실패 키: 직렬화 시 고정 메시지 키 문자열로 표현
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureKind {
    /// 카메라 자원 획득 실패 (세션 종료, 재시도 없음)
    #[serde(rename = "Camera could not be opened")]
    CameraUnavailable,
    /// 타임아웃 내에 하한 신뢰도 이상의 잎을 찾지 못함 (재시도 권장)
    #[serde(rename = "Leaf not detected")]
    LeafNotDetected,
    /// 외부 모델 호출 실패 (네트워크, 할당량, 응답 형식)
    #[serde(rename = "Diagnosis error occurred")]
    DiagnosisFailed,
    /// 잎 존재 확인 호출 실패
    #[serde(rename = "Leaf check failed")]
    LeafCheckFailed,
}

impl FailureKind {
    /// 메시지 키
    pub fn key(&self) -> &'static str {
        match self {
            FailureKind::CameraUnavailable => "Camera could not be opened",
            FailureKind::LeafNotDetected => "Leaf not detected",
            FailureKind::DiagnosisFailed => "Diagnosis error occurred",
            FailureKind::LeafCheckFailed => "Leaf check failed",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// 진단 리포트: 세션당 1회 생성, 생성 후 불변
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosisReport {
    /// 성공 여부
    pub success: bool,
    /// 진단 텍스트 (실패 시 지역화된 일반 에러 문구)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diagnosis: Option<String>,
    /// 실패 키
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<FailureKind>,
    /// 사용자 안내 메시지 (지역화)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// 응답 언어
    pub language: Language,
    /// 생성 시각
    pub timestamp: DateTime<Utc>,
    /// 캡처 신뢰도 (카메라 세션에서만)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,
    /// 캡처 이미지 (Base64 JPEG)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_base64: Option<String>,
}

impl DiagnosisReport {
    fn base(success: bool, language: Language) -> Self {
        Self {
            success,
            diagnosis: None,
            error: None,
            message: None,
            language,
            timestamp: Utc::now(),
            confidence: None,
            image_base64: None,
        }
    }

    /// 모델 진단 성공
    pub fn diagnosed(diagnosis: String, language: Language) -> Self {
        Self {
            diagnosis: Some(diagnosis),
            ..Self::base(true, language)
        }
    }

    /// 외부 모델 실패: 지역화된 일반 에러 문구만 노출
    pub fn diagnosis_failed(language: Language) -> Self {
        let text = locale::diagnosis_error(language).to_string();
        Self {
            diagnosis: Some(text.clone()),
            error: Some(FailureKind::DiagnosisFailed),
            message: Some(text),
            ..Self::base(false, language)
        }
    }

    /// 카메라 열기 실패
    pub fn camera_unavailable(language: Language) -> Self {
        Self {
            error: Some(FailureKind::CameraUnavailable),
            message: Some(locale::camera_error(language).to_string()),
            ..Self::base(false, language)
        }
    }

    /// 하한 신뢰도 미달: 달성한 최고 신뢰도 포함
    pub fn leaf_not_found(language: Language, best_confidence: f32) -> Self {
        Self {
            error: Some(FailureKind::LeafNotDetected),
            message: Some(locale::position_leaf(language).to_string()),
            confidence: Some(best_confidence),
            ..Self::base(false, language)
        }
    }

    /// 업로드 사전 확인에서 잎이 없다고 판단됨
    pub fn leaf_absent(language: Language) -> Self {
        Self {
            error: Some(FailureKind::LeafNotDetected),
            message: Some(locale::leaf_check(language, false).to_string()),
            ..Self::base(false, language)
        }
    }

    /// 캡처 신뢰도 + 재인코딩 이미지 병합
    pub fn with_capture(mut self, confidence: f32, image_base64: Option<String>) -> Self {
        self.confidence = Some(confidence);
        self.image_base64 = image_base64;
        self
    }
}

/// 잎 존재 확인 리포트 (업로드 흐름 사전 필터)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeafCheckReport {
    /// 호출 성공 여부
    pub success: bool,
    /// 잎 존재 여부
    pub is_leaf_present: bool,
    /// 지역화 안내 메시지
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// 모델 응답 (대문자 변환, 공백 제거)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_response: Option<String>,
    /// 실패 키
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<FailureKind>,
}

impl LeafCheckReport {
    /// 모델 응답으로부터 생성
    pub fn answered(is_leaf_present: bool, raw_response: String, language: Language) -> Self {
        Self {
            success: true,
            is_leaf_present,
            message: Some(locale::leaf_check(language, is_leaf_present).to_string()),
            raw_response: Some(raw_response),
            error: None,
        }
    }

    /// 모델 호출 실패
    pub fn failed() -> Self {
        Self {
            success: false,
            is_leaf_present: false,
            message: None,
            raw_response: None,
            error: Some(FailureKind::LeafCheckFailed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leaf_not_found_carries_confidence_and_guidance() {
        let report = DiagnosisReport::leaf_not_found(Language::English, 0.12);
        assert!(!report.success);
        assert_eq!(report.confidence, Some(0.12));
        assert_eq!(
            report.message.as_deref(),
            Some("Please hold the leaf properly in front of the camera")
        );
        assert!(report.diagnosis.is_none());
    }

    #[test]
    fn diagnosis_failure_never_exposes_raw_error() {
        let report = DiagnosisReport::diagnosis_failed(Language::Marathi);
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("Diagnosis error occurred"));
        assert!(json.contains("निदानात त्रुटी झाली"));
    }

    #[test]
    fn with_capture_merges_fields() {
        let report = DiagnosisReport::diagnosed("ok".to_string(), Language::Hindi)
            .with_capture(0.82, Some("aGVsbG8=".to_string()));
        assert_eq!(report.confidence, Some(0.82));
        assert_eq!(report.image_base64.as_deref(), Some("aGVsbG8="));
        assert!(report.success);
    }

    #[test]
    fn leaf_check_report_messages() {
        let yes = LeafCheckReport::answered(true, "YES 95%".to_string(), Language::English);
        assert_eq!(yes.message.as_deref(), Some("Leaf found, analyzing..."));

        let failed = LeafCheckReport::failed();
        let json = serde_json::to_value(&failed).unwrap();
        assert_eq!(json["is_leaf_present"], false);
        assert_eq!(json["error"], "Leaf check failed");
    }
}
