//! 아바타 응답 서비스.
//!
//! TTS 오디오와 텍스트를 아바타 메타데이터 봉투로 감싼다.
//! 영상 렌더링은 하지 않으며, 에이전트 상태가 주어지면 하이라이트를 덧붙인다.

use kisan_core::config::AvatarConfig;
use kisan_core::locale::Language;
use kisan_core::models::avatar::{AvatarMetadata, AvatarProfile, AvatarResponse, AvatarType};
use serde_json::Value;
use tracing::info;

use crate::highlight::extract_highlight;

/// 분당 발화 단어 수 (재생 시간 추정)
const WORDS_PER_MINUTE: u64 = 150;

/// 기본 아바타 ID
pub const DEFAULT_AVATAR_ID: &str = "farmer_avatar_1";

/// 아바타 응답 구성 요청
#[derive(Debug, Clone, Default)]
pub struct AvatarRequest<'a> {
    pub text: &'a str,
    pub audio_base64: &'a str,
    pub language: Language,
    pub avatar_id: Option<&'a str>,
    pub agent_state: Option<&'a Value>,
}

/// 아바타 서비스
#[derive(Debug, Clone)]
pub struct AvatarService {
    enabled: bool,
    default_avatar_id: String,
}

impl Default for AvatarService {
    fn default() -> Self {
        Self::new(&AvatarConfig::default())
    }
}

impl AvatarService {
    pub fn new(config: &AvatarConfig) -> Self {
        Self {
            enabled: config.enabled,
            default_avatar_id: config.default_avatar_id.clone(),
        }
    }

    /// 아바타 응답 활성화 여부
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// 아바타 응답 생성
    pub async fn generate_response(&self, request: AvatarRequest<'_>) -> AvatarResponse {
        self.build_response(request)
    }

    fn build_response(&self, request: AvatarRequest<'_>) -> AvatarResponse {
        let avatar_id = request
            .avatar_id
            .filter(|id| !id.is_empty())
            .unwrap_or(self.default_avatar_id.as_str())
            .to_string();
        let additional_info = request.agent_state.and_then(extract_highlight);

        info!(
            avatar_id = %avatar_id,
            language = %request.language,
            text_len = request.text.chars().count(),
            highlight = additional_info.as_ref().map(|h| h.kind()),
            "아바타 응답 생성"
        );

        AvatarResponse {
            success: true,
            avatar_type: AvatarType::Animated,
            avatar_id,
            audio_base64: request.audio_base64.to_string(),
            text: request.text.to_string(),
            language: request.language,
            duration_ms: estimate_duration_ms(request.text),
            metadata: AvatarMetadata {
                has_video: false,
                animation_type: "speaking".to_string(),
                quality: "hd".to_string(),
            },
            additional_info,
        }
    }

    /// 아바타 프로필 조회 (없는 ID는 기본 아바타)
    pub fn avatar_info(&self, avatar_id: &str) -> AvatarProfile {
        catalog()
            .into_iter()
            .find(|p| p.id == avatar_id)
            .or_else(|| catalog().into_iter().find(|p| p.id == self.default_avatar_id))
            .unwrap_or_else(default_profile)
    }
}

/// 발화 시간 추정 (밀리초): 단어 수 / 150 wpm
pub fn estimate_duration_ms(text: &str) -> u64 {
    let words = text.split_whitespace().count() as u64;
    words * 60 * 1000 / WORDS_PER_MINUTE
}

/// 아바타 카탈로그
fn catalog() -> Vec<AvatarProfile> {
    vec![default_profile()]
}

fn default_profile() -> AvatarProfile {
    AvatarProfile {
        id: DEFAULT_AVATAR_ID.to_string(),
        name: "Kisan Avatar".to_string(),
        description: "Friendly Indian farmer avatar".to_string(),
        language_support: vec![
            Language::Hindi,
            Language::English,
            Language::Punjabi,
            Language::Marathi,
        ],
        avatar_type: AvatarType::Animated,
    }
}
