//! 비전 모델 연결 확인 (`kisan check-model`).
//!
//! 텍스트 전용 요청 1회로 API 키와 모델 이름이 유효한지 확인한다.

use kisan_core::error::CoreError;
use kisan_core::ports::vision_model::VisionModel;
use kisan_vision::prompts::SMOKE_TEST_PROMPT;

/// API 키 문제 안내
pub const KEY_HINT: &str = "API 키가 유효한지 확인하세요";
/// 할당량/요청 한도 안내
pub const QUOTA_HINT: &str = "API 할당량 초과 또는 요청 한도 제한";
/// 모델 이름 안내
pub const MODEL_HINT: &str = "모델 이름이 잘못되었거나 사용할 수 없음";

/// 텍스트 전용 요청 1회
pub async fn run_smoke_test(model: &dyn VisionModel) -> Result<String, CoreError> {
    let reply = model.generate(SMOKE_TEST_PROMPT, None).await?;
    let reply = reply.trim();
    if reply.is_empty() {
        return Err(CoreError::ModelResponse("빈 응답".to_string()));
    }
    Ok(reply.to_string())
}

/// 실패 원인 추정 (키 → 할당량 → 모델 순)
pub fn failure_hint(err: &CoreError) -> Option<&'static str> {
    if matches!(err, CoreError::RateLimit { .. }) {
        return Some(QUOTA_HINT);
    }

    let text = err.to_string();
    let lower = text.to_lowercase();
    if text.contains("API_KEY") || lower.contains("api key") || lower.contains("api 키") {
        Some(KEY_HINT)
    } else if lower.contains("quota") || lower.contains("limit") {
        Some(QUOTA_HINT)
    } else if lower.contains("model") {
        Some(MODEL_HINT)
    } else {
        None
    }
}

/// API 키 마스킹 (앞 2자 + 뒤 4자)
pub fn mask_api_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        return "***".to_string();
    }
    let head: String = chars[..2].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}...{tail}")
}
