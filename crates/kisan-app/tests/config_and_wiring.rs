//! 설정 및 DI 와이어링 통합 테스트.
//!
//! config.json → AppConfig → AppState → 핸들러 연동 검증.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use kisan_core::config::AppConfig;
use kisan_core::config_manager::ConfigManager;
use kisan_core::locale::Language;
use kisan_network::vision_client::RemoteVisionModel;
use kisan_vision::camera::FramesDirCamera;
use kisan_web::handlers::{avatar, health, highlight};
use kisan_web::AppState;
use serde_json::json;
use tempfile::TempDir;

fn make_state(config: AppConfig, frames: &std::path::Path) -> AppState {
    let mut endpoint = config.vision_model.clone();
    endpoint.api_key = "wiring-test-key".to_string();
    let model = Arc::new(RemoteVisionModel::new(&endpoint).unwrap());
    let camera = Arc::new(FramesDirCamera::new(frames));
    AppState::new(config, model, camera)
}

#[test]
fn config_defaults_are_valid() {
    let config = AppConfig::default_config();
    config.validate().unwrap();

    assert!(config.capture.min_confidence < config.capture.early_exit_confidence);
    assert!(config.capture.frame_skip > 0);
    assert_eq!(config.encoding.max_side, 1024);
    assert_eq!(config.web.port, 8000);
}

#[test]
fn partial_config_file_merges_with_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(
        &path,
        r#"{ "default_language": "punjabi", "capture": { "timeout_secs": 9 }, "web": { "port": 8123 } }"#,
    )
    .unwrap();

    let config = ConfigManager::with_path(path).unwrap().get();
    assert_eq!(config.default_language, Language::Punjabi);
    assert_eq!(config.capture.timeout_secs, 9);
    assert_eq!(config.capture.frame_skip, 3);
    assert_eq!(config.web.port, 8123);
    assert_eq!(config.detector.padding, 20);
}

#[tokio::test]
async fn state_wires_configured_adapters() {
    let dir = TempDir::new().unwrap();
    let state = make_state(AppConfig::default_config(), dir.path());

    let response = health::get_health(State(state)).await.0;
    assert_eq!(response.model_provider, "gemini");
    assert_eq!(response.camera_provider, "frames-dir");
}

#[tokio::test]
async fn avatar_response_uses_configured_language_and_highlight() {
    let dir = TempDir::new().unwrap();
    let mut config = AppConfig::default_config();
    config.default_language = Language::Telugu;
    let state = make_state(config, dir.path());

    let body: avatar::AvatarResponseRequest = serde_json::from_value(json!({
        "text": "ఎరువు వేయండి",
        "audio_base64": "AAAA",
        "agent_state": {
            "fertilizer_info": { "recommendation": "Urea 25kg", "crop": "paddy", "stage": "tillering" },
            "weather_data": { "temp": 33 }
        }
    }))
    .unwrap();

    let response = avatar::create_avatar_response(State(state.clone()), Json(body))
        .await
        .unwrap()
        .0;
    assert_eq!(response.language, Language::Telugu);
    assert_eq!(response.duration_ms, 800);

    let v = serde_json::to_value(&response).unwrap();
    assert_eq!(v["additional_info"]["type"], "fertilizer");
    assert_eq!(v["additional_info"]["data"]["stage"], "tillering");

    let profile = avatar::get_avatar(State(state), Path("farmer_avatar_1".to_string()))
        .await
        .0;
    assert_eq!(profile.name, "Kisan Avatar");
}

#[tokio::test]
async fn highlight_endpoint_prefers_weather_over_market() {
    let state = json!({
        "weather_data": { "city": "Ludhiana", "humidity": 64 },
        "market_data": [{ "commodity": "Wheat", "modal_price": 2275, "market": "Khanna" }]
    });
    let response = highlight::extract(Json(state)).await.0;
    let v = serde_json::to_value(&response).unwrap();
    assert_eq!(v["additional_info"]["type"], "weather");
    assert_eq!(v["additional_info"]["data"]["city"], "Ludhiana");
}
