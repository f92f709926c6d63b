//! 아바타 API 핸들러.

use axum::extract::{Path, State};
use axum::Json;
use kisan_advisory::avatar::AvatarRequest;
use kisan_core::locale::Language;
use kisan_core::models::avatar::{AvatarProfile, AvatarResponse};
use serde::Deserialize;
use serde_json::Value;

use crate::error::ApiError;
use crate::AppState;

/// 아바타 응답 요청
#[derive(Debug, Deserialize)]
pub struct AvatarResponseRequest {
    pub text: String,
    /// TTS 오디오 (Base64)
    #[serde(default)]
    pub audio_base64: String,
    #[serde(default)]
    pub language: Option<Language>,
    #[serde(default)]
    pub avatar_id: Option<String>,
    /// 상위 에이전트 상태 (하이라이트 추출용)
    #[serde(default)]
    pub agent_state: Option<Value>,
}

/// 아바타 응답 생성
///
/// POST /api/avatar/response
pub async fn create_avatar_response(
    State(state): State<AppState>,
    Json(body): Json<AvatarResponseRequest>,
) -> Result<Json<AvatarResponse>, ApiError> {
    if !state.avatar.is_enabled() {
        return Err(ApiError::NotFound("아바타 응답 비활성화".to_string()));
    }

    let response = state
        .avatar
        .generate_response(AvatarRequest {
            text: &body.text,
            audio_base64: &body.audio_base64,
            language: state.language_or_default(body.language),
            avatar_id: body.avatar_id.as_deref(),
            agent_state: body.agent_state.as_ref(),
        })
        .await;
    Ok(Json(response))
}

/// 아바타 프로필 조회
///
/// GET /api/avatar/{id}
pub async fn get_avatar(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Json<AvatarProfile> {
    Json(state.avatar.avatar_info(&id))
}
