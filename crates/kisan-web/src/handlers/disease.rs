//! 병해 진단 API 핸들러.
//!
//! 카메라 스캔은 동기 작업이므로 `spawn_blocking`에서 실행하고,
//! 카메라 세션 뮤텍스로 장치 소비자를 1개로 제한한다.

use std::time::Duration;

use axum::extract::State;
use axum::Json;
use kisan_core::locale::Language;
use kisan_core::models::diagnosis::{DiagnosisReport, LeafCheckReport};
use kisan_vision::capture::{CaptureRequest, TracingObserver};
use kisan_vision::encoder::decode_base64_image;
use serde::Deserialize;
use tracing::{info, warn};

use crate::error::ApiError;
use crate::AppState;

/// 카메라 세션 최대 타임아웃 (초)
const MAX_TIMEOUT_SECS: f64 = 60.0;

/// 카메라 진단 요청
#[derive(Debug, Default, Deserialize)]
pub struct CameraDiagnosisRequest {
    /// 카메라 인덱스 (기본: 설정값)
    #[serde(default)]
    pub camera_index: Option<u32>,
    /// 타임아웃 초 (기본: 설정값)
    #[serde(default)]
    pub timeout_seconds: Option<f64>,
    #[serde(default)]
    pub language: Option<Language>,
}

/// 업로드 이미지 진단 요청
#[derive(Debug, Deserialize)]
pub struct DiagnoseRequest {
    /// Base64 이미지 (data URI 접두사 허용)
    pub image_base64: String,
    #[serde(default)]
    pub language: Option<Language>,
    /// 진단 전 잎 존재 확인 여부
    #[serde(default)]
    pub precheck: bool,
}

/// 잎 존재 확인 요청
#[derive(Debug, Deserialize)]
pub struct LeafCheckRequest {
    pub image_base64: String,
    #[serde(default)]
    pub language: Option<Language>,
}

fn capture_request(
    state: &AppState,
    body: &CameraDiagnosisRequest,
) -> Result<CaptureRequest, ApiError> {
    let mut request = CaptureRequest::from_config(
        &state.config.capture,
        state.language_or_default(body.language),
    );

    if let Some(index) = body.camera_index {
        request.camera_index = index;
    }
    if let Some(secs) = body.timeout_seconds {
        if !secs.is_finite() || secs <= 0.0 || secs > MAX_TIMEOUT_SECS {
            return Err(ApiError::BadRequest(format!(
                "timeout_seconds는 0 초과 {MAX_TIMEOUT_SECS} 이하여야 함: {secs}"
            )));
        }
        request.timeout = Duration::from_secs_f64(secs);
    }
    Ok(request)
}

/// 카메라 캡처 후 진단
///
/// POST /api/disease/camera
pub async fn diagnose_from_camera(
    State(state): State<AppState>,
    Json(body): Json<CameraDiagnosisRequest>,
) -> Result<Json<DiagnosisReport>, ApiError> {
    let request = capture_request(&state, &body)?;
    let language = request.language;
    let camera_index = request.camera_index;

    let scan = {
        let _session = state.camera_session.lock().await;
        let capture = state.capture.clone();
        tokio::task::spawn_blocking(move || {
            let mut observer = TracingObserver::new(language);
            capture.scan(&request, Some(&mut observer))
        })
        .await
        .map_err(|e| ApiError::Internal(format!("카메라 스캔 작업 실패: {e}")))?
    };

    let report = match scan {
        Ok(outcome) => state.capture.finish(outcome, &state.diagnosis, language).await,
        Err(e) => {
            warn!(index = camera_index, "카메라 열기 실패: {e}");
            DiagnosisReport::camera_unavailable(language)
        }
    };

    info!(success = report.success, language = %language, "카메라 진단 응답");
    Ok(Json(report))
}

/// 업로드 이미지 진단
///
/// POST /api/disease/diagnose
pub async fn diagnose_upload(
    State(state): State<AppState>,
    Json(body): Json<DiagnoseRequest>,
) -> Result<Json<DiagnosisReport>, ApiError> {
    let language = state.language_or_default(body.language);
    let report = state
        .diagnosis
        .diagnose_base64(&body.image_base64, language, body.precheck)
        .await?;
    Ok(Json(report))
}

/// 잎 존재 확인
///
/// POST /api/disease/leaf-check
pub async fn check_leaf(
    State(state): State<AppState>,
    Json(body): Json<LeafCheckRequest>,
) -> Result<Json<LeafCheckReport>, ApiError> {
    let language = state.language_or_default(body.language);
    let image = decode_base64_image(&body.image_base64)?;
    Ok(Json(state.diagnosis.check_leaf_present(&image, language).await))
}
