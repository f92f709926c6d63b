//! 상태 확인 API 핸들러.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::AppState;

/// 상태 응답 DTO
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    /// 비전 모델 제공자
    pub model_provider: String,
    /// 카메라 제공자
    pub camera_provider: String,
}

/// 상태 확인
///
/// GET /api/health
pub async fn get_health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        model_provider: state.diagnosis.provider_name().to_string(),
        camera_provider: state.capture.camera_name().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{make_state, EchoModel};
    use image::RgbImage;

    #[tokio::test]
    async fn health_reports_providers() {
        let state = make_state(EchoModel::new("ok"), RgbImage::new(4, 4));
        let response = get_health(State(state)).await.0;
        assert_eq!(response.status, "healthy");
        assert_eq!(response.model_provider, "echo");
        assert_eq!(response.camera_provider, "still");
    }
}
