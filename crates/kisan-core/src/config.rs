//! 애플리케이션 설정 구조체.
//!
//! 외부 비전 모델 엔드포인트, 캡처 루프, 잎 검출기, 이미지 인코딩,
//! 웹 서버, 아바타 설정을 정의한다. `ConfigManager`를 통해 JSON 파일에서 로드.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::CoreError;
use crate::locale::Language;
use crate::models::frame::CameraSettings;

/// API 키 환경 변수 (우선순위 순)
pub const API_KEY_ENV_VARS: [&str; 2] = ["KISAN_VISION_API_KEY", "GEMINI_API_KEY"];

/// 최상위 애플리케이션 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// 외부 비전-언어 모델 설정
    #[serde(default)]
    pub vision_model: ExternalApiEndpoint,
    /// 카메라 캡처 루프 설정
    #[serde(default)]
    pub capture: CaptureConfig,
    /// 색상 분할 잎 검출기 설정
    #[serde(default)]
    pub detector: DetectorConfig,
    /// 이미지 인코딩 설정
    #[serde(default)]
    pub encoding: EncodingConfig,
    /// 웹 API 서버 설정
    #[serde(default)]
    pub web: WebConfig,
    /// 아바타 설정
    #[serde(default)]
    pub avatar: AvatarConfig,
    /// 기본 응답 언어
    #[serde(default)]
    pub default_language: Language,
}

// ============================================================
// AI API 제공자 타입
// ============================================================

/// AI API 제공자 타입: URL 문자열 매칭 대신 명시적 enum으로 제공자 구분
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AiProviderType {
    /// Google Gemini: `x-goog-api-key` 헤더 + `:generateContent` 형식
    #[default]
    Gemini,
    /// Anthropic Claude API: `x-api-key` 헤더 + `/v1/messages` 형식
    Anthropic,
    /// OpenAI 호환 API: `Authorization: Bearer` 헤더 + `/v1/chat/completions` 형식
    OpenAi,
}

/// 외부 AI API 엔드포인트 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExternalApiEndpoint {
    /// API URL. Gemini는 모델 경로의 접두사 (예: ".../v1beta/models")
    #[serde(default = "default_vision_endpoint")]
    pub endpoint: String,
    /// API 키 (비어 있으면 환경 변수에서 채움)
    #[serde(default)]
    pub api_key: String,
    /// 모델 이름
    #[serde(default = "default_vision_model")]
    pub model: Option<String>,
    /// 요청 타임아웃 (초)
    #[serde(default = "default_api_timeout_secs")]
    pub timeout_secs: u64,
    /// AI 제공자 타입: 요청/응답 형식 및 인증 헤더 결정에 사용
    #[serde(default)]
    pub provider_type: AiProviderType,
}

impl Default for ExternalApiEndpoint {
    fn default() -> Self {
        Self {
            endpoint: default_vision_endpoint(),
            api_key: String::new(),
            model: default_vision_model(),
            timeout_secs: default_api_timeout_secs(),
            provider_type: AiProviderType::default(),
        }
    }
}

fn default_vision_endpoint() -> String {
    "https://generativelanguage.googleapis.com/v1beta/models".to_string()
}

fn default_vision_model() -> Option<String> {
    Some("gemini-2.0-flash-lite".to_string())
}

fn default_api_timeout_secs() -> u64 {
    30
}

// ============================================================
// 캡처 루프 설정
// ============================================================

/// 카메라 캡처 루프 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureConfig {
    /// 카메라 장치 인덱스
    #[serde(default)]
    pub camera_index: u32,
    /// 전체 타임아웃 (초)
    #[serde(default = "default_capture_timeout_secs")]
    pub timeout_secs: u64,
    /// N번째 프레임마다 분석
    #[serde(default = "default_frame_skip")]
    pub frame_skip: u32,
    /// 이 값을 초과하면 즉시 캡처 종료
    #[serde(default = "default_early_exit_confidence")]
    pub early_exit_confidence: f32,
    /// 캡처 이미지로 인정하는 최소 신뢰도
    #[serde(default = "default_min_confidence")]
    pub min_confidence: f32,
    /// 요청 프레임 너비
    #[serde(default = "default_frame_width")]
    pub frame_width: u32,
    /// 요청 프레임 높이
    #[serde(default = "default_frame_height")]
    pub frame_height: u32,
    /// 요청 FPS
    #[serde(default = "default_fps")]
    pub fps: u32,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            camera_index: 0,
            timeout_secs: default_capture_timeout_secs(),
            frame_skip: default_frame_skip(),
            early_exit_confidence: default_early_exit_confidence(),
            min_confidence: default_min_confidence(),
            frame_width: default_frame_width(),
            frame_height: default_frame_height(),
            fps: default_fps(),
        }
    }
}

impl CaptureConfig {
    /// 타임아웃 Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// 카메라 요청 설정
    pub fn camera_settings(&self) -> CameraSettings {
        CameraSettings {
            width: self.frame_width,
            height: self.frame_height,
            fps: self.fps,
        }
    }
}

fn default_capture_timeout_secs() -> u64 {
    5
}

fn default_frame_skip() -> u32 {
    3
}

fn default_early_exit_confidence() -> f32 {
    0.7
}

fn default_min_confidence() -> f32 {
    0.3
}

fn default_frame_width() -> u32 {
    640
}

fn default_frame_height() -> u32 {
    480
}

fn default_fps() -> u32 {
    30
}

// ============================================================
// 잎 검출기 설정
// ============================================================

/// HSV 범위 (OpenCV 8비트 규약: H 0-179, S/V 0-255), 양 끝 포함
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HsvRange {
    pub lower: [u8; 3],
    pub upper: [u8; 3],
}

impl HsvRange {
    /// 범위 포함 여부
    #[inline]
    pub fn contains(&self, h: u8, s: u8, v: u8) -> bool {
        (self.lower[0]..=self.upper[0]).contains(&h)
            && (self.lower[1]..=self.upper[1]).contains(&s)
            && (self.lower[2]..=self.upper[2]).contains(&v)
    }
}

/// 색상 분할 잎 검출기 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// 건강한 잎 (녹색)
    #[serde(default = "default_green_range")]
    pub green: HsvRange,
    /// 스트레스 잎 (갈색/노란색)
    #[serde(default = "default_brown_range")]
    pub brown: HsvRange,
    /// 최소 면적 비율 (프레임 대비)
    #[serde(default = "default_min_area_ratio")]
    pub min_area_ratio: f32,
    /// 바운딩 박스 여백 (픽셀)
    #[serde(default = "default_padding")]
    pub padding: u32,
    /// 모폴로지 구조 요소 크기 (정사각형)
    #[serde(default = "default_kernel_size")]
    pub kernel_size: u32,
    /// 신뢰도 = min(1, scale × 면적 비율)
    #[serde(default = "default_confidence_scale")]
    pub confidence_scale: f32,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            green: default_green_range(),
            brown: default_brown_range(),
            min_area_ratio: default_min_area_ratio(),
            padding: default_padding(),
            kernel_size: default_kernel_size(),
            confidence_scale: default_confidence_scale(),
        }
    }
}

fn default_green_range() -> HsvRange {
    HsvRange {
        lower: [25, 40, 40],
        upper: [90, 255, 255],
    }
}

fn default_brown_range() -> HsvRange {
    HsvRange {
        lower: [10, 40, 40],
        upper: [25, 255, 255],
    }
}

fn default_min_area_ratio() -> f32 {
    0.15
}

fn default_padding() -> u32 {
    20
}

fn default_kernel_size() -> u32 {
    5
}

fn default_confidence_scale() -> f32 {
    5.0
}

// ============================================================
// 인코딩 / 웹 / 아바타 설정
// ============================================================

/// 이미지 인코딩 설정 (Base64 JPEG 교환 형식)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncodingConfig {
    /// 긴 변 최대 길이 (픽셀)
    #[serde(default = "default_max_side")]
    pub max_side: u32,
    /// JPEG 품질 (1-100)
    #[serde(default = "default_jpeg_quality")]
    pub jpeg_quality: u8,
}

impl Default for EncodingConfig {
    fn default() -> Self {
        Self {
            max_side: default_max_side(),
            jpeg_quality: default_jpeg_quality(),
        }
    }
}

fn default_max_side() -> u32 {
    1024
}

fn default_jpeg_quality() -> u8 {
    85
}

/// 웹 API 서버 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebConfig {
    /// 웹 서버 포트 (기본: 8000)
    #[serde(default = "default_web_port")]
    pub port: u16,
    /// 외부 접근 허용 여부 (false: 127.0.0.1 only)
    #[serde(default)]
    pub allow_external: bool,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            port: default_web_port(),
            allow_external: false,
        }
    }
}

fn default_web_port() -> u16 {
    8000
}

/// 아바타 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvatarConfig {
    /// 아바타 응답 활성화
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// 기본 아바타 ID
    #[serde(default = "default_avatar_id")]
    pub default_avatar_id: String,
}

impl Default for AvatarConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            default_avatar_id: default_avatar_id(),
        }
    }
}

fn default_avatar_id() -> String {
    "farmer_avatar_1".to_string()
}

fn default_true() -> bool {
    true
}

impl AppConfig {
    /// 기본 설정
    pub fn default_config() -> Self {
        Self {
            vision_model: ExternalApiEndpoint::default(),
            capture: CaptureConfig::default(),
            detector: DetectorConfig::default(),
            encoding: EncodingConfig::default(),
            web: WebConfig::default(),
            avatar: AvatarConfig::default(),
            default_language: Language::default(),
        }
    }

    /// 설정 파일에 API 키가 없으면 환경 변수에서 채움
    pub fn apply_env_overrides(&mut self) {
        if !self.vision_model.api_key.is_empty() {
            return;
        }
        if let Some(key) = API_KEY_ENV_VARS
            .iter()
            .filter_map(|name| std::env::var(name).ok())
            .find(|v| !v.trim().is_empty())
        {
            self.vision_model.api_key = key.trim().to_string();
        }
    }

    /// 값 범위 검증
    pub fn validate(&self) -> Result<(), CoreError> {
        let invalid = |field: &str, message: &str| CoreError::Validation {
            field: field.to_string(),
            message: message.to_string(),
        };

        if self.capture.frame_skip == 0 {
            return Err(invalid("capture.frame_skip", "1 이상이어야 함"));
        }
        if !(0.0..=1.0).contains(&self.capture.min_confidence)
            || !(0.0..=1.0).contains(&self.capture.early_exit_confidence)
        {
            return Err(invalid("capture", "신뢰도 임계값은 0.0 ~ 1.0 범위"));
        }
        if self.capture.min_confidence > self.capture.early_exit_confidence {
            return Err(invalid(
                "capture.min_confidence",
                "early_exit_confidence 이하여야 함",
            ));
        }
        if self.detector.kernel_size == 0 {
            return Err(invalid("detector.kernel_size", "1 이상이어야 함"));
        }
        if !(0.0..=1.0).contains(&self.detector.min_area_ratio) {
            return Err(invalid("detector.min_area_ratio", "0.0 ~ 1.0 범위"));
        }
        if !self.detector.confidence_scale.is_finite() || self.detector.confidence_scale <= 0.0 {
            return Err(invalid("detector.confidence_scale", "0 초과 유한값이어야 함"));
        }
        if self.encoding.max_side == 0 {
            return Err(invalid("encoding.max_side", "1 이상이어야 함"));
        }
        if !(1..=100).contains(&self.encoding.jpeg_quality) {
            return Err(invalid("encoding.jpeg_quality", "1 ~ 100 범위"));
        }
        Ok(())
    }
}
