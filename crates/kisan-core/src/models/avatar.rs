//! 아바타 응답 모델.
//!
//! TTS 오디오를 아바타 메타데이터 봉투로 감싼 응답.
//! 실제 영상 렌더링은 없으며 `has_video`는 항상 false.

use serde::{Deserialize, Serialize};

use crate::locale::Language;
use crate::models::highlight::Highlight;

/// 아바타 표현 방식
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AvatarType {
    /// 오디오 + 애니메이션 오버레이
    Animated,
    /// 외부 렌더링 서비스 영상
    Video,
}

/// 아바타 렌더링 메타데이터
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvatarMetadata {
    pub has_video: bool,
    pub animation_type: String,
    pub quality: String,
}

/// 아바타 응답
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvatarResponse {
    pub success: bool,
    pub avatar_type: AvatarType,
    pub avatar_id: String,
    /// TTS 오디오 (Base64, 그대로 전달)
    pub audio_base64: String,
    pub text: String,
    pub language: Language,
    /// 예상 발화 시간 (밀리초)
    pub duration_ms: u64,
    pub metadata: AvatarMetadata,
    /// 에이전트 상태에서 추출한 하이라이트
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_info: Option<Highlight>,
}

/// 아바타 프로필 (카탈로그 항목)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvatarProfile {
    pub id: String,
    pub name: String,
    pub description: String,
    pub language_support: Vec<Language>,
    pub avatar_type: AvatarType,
}
