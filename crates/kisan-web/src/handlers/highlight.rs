//! 에이전트 상태 하이라이트 API 핸들러.

use axum::Json;
use kisan_advisory::highlight::extract_highlight;
use kisan_core::models::highlight::Highlight;
use serde::Serialize;
use serde_json::Value;

/// 하이라이트 응답 (없으면 null)
#[derive(Debug, Serialize)]
pub struct HighlightResponse {
    pub additional_info: Option<Highlight>,
}

/// 에이전트 상태에서 하이라이트 추출
///
/// POST /api/highlight
pub async fn extract(Json(agent_state): Json<Value>) -> Json<HighlightResponse> {
    Json(HighlightResponse {
        additional_info: extract_highlight(&agent_state),
    })
}
