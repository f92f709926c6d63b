//! 캡처 파이프라인 통합 테스트.
//!
//! 디렉토리 재생 카메라 → 캡처 루프 → 잎 검출 → 진단 클라이언트 cross-crate 연동.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use image::{Rgb, RgbImage};
use kisan_core::config::{AppConfig, CaptureConfig};
use kisan_core::error::CoreError;
use kisan_core::locale::Language;
use kisan_core::models::diagnosis::FailureKind;
use kisan_core::ports::vision_model::{VisionImage, VisionModel};
use kisan_vision::camera::FramesDirCamera;
use kisan_vision::capture::{CaptureLoop, CaptureRequest, StopReason};
use kisan_vision::detector::LeafDetector;
use kisan_vision::diagnosis::DiagnosisClient;
use kisan_vision::encoder::{decode_base64_image, ImageEncoder};
use tempfile::TempDir;

const BACKGROUND: Rgb<u8> = Rgb([205, 200, 215]);
const LEAF_GREEN: Rgb<u8> = Rgb([50, 150, 45]);

/// 진단 문장을 돌려주는 모델: 호출 횟수 기록
struct AgronomistModel {
    calls: AtomicUsize,
}

#[async_trait]
impl VisionModel for AgronomistModel {
    async fn generate(
        &self,
        _prompt: &str,
        image: Option<&VisionImage>,
    ) -> Result<String, CoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let image = image.ok_or_else(|| CoreError::Internal("이미지 없음".to_string()))?;
        assert_eq!(image.mime_type, "image/jpeg");
        Ok("Crop: Tomato. Disease: Early blight. Severity: medium.".to_string())
    }

    fn provider_name(&self) -> &str {
        "agronomist"
    }
}

fn make_model() -> Arc<AgronomistModel> {
    Arc::new(AgronomistModel {
        calls: AtomicUsize::new(0),
    })
}

fn write_empty(dir: &Path, name: &str) {
    RgbImage::from_pixel(160, 120, BACKGROUND)
        .save(dir.join(name))
        .unwrap();
}

/// 160x120 프레임 중앙에 80x60 잎 (면적 25%)
fn write_leaf(dir: &Path, name: &str) {
    let mut frame = RgbImage::from_pixel(160, 120, BACKGROUND);
    for y in 30..90 {
        for x in 40..120 {
            frame.put_pixel(x, y, LEAF_GREEN);
        }
    }
    frame.save(dir.join(name)).unwrap();
}

fn make_loop(dir: &Path) -> CaptureLoop {
    let config = AppConfig::default_config();
    CaptureLoop::new(
        Arc::new(FramesDirCamera::new(dir).with_pacing(false)),
        LeafDetector::new(config.detector),
        CaptureConfig::default(),
    )
}

fn request(timeout: Duration) -> CaptureRequest {
    CaptureRequest {
        camera_index: 0,
        timeout,
        language: Language::English,
    }
}

#[tokio::test]
async fn leaf_in_third_frame_is_diagnosed() {
    let dir = TempDir::new().unwrap();
    write_empty(dir.path(), "00.png");
    write_empty(dir.path(), "01.png");
    write_leaf(dir.path(), "02.png");

    let model = make_model();
    let client = DiagnosisClient::new(model.clone(), ImageEncoder::default());
    let capture = make_loop(dir.path());

    let outcome = capture.scan(&request(Duration::from_secs(5)), None).unwrap();
    assert_eq!(outcome.stop, StopReason::EarlyExit);
    assert_eq!(outcome.frames_read, 3);
    assert_eq!(outcome.frames_analyzed, 1);

    let report = capture.finish(outcome, &client, Language::English).await;
    assert!(report.success);
    assert_eq!(report.confidence, Some(1.0));
    assert!(report.diagnosis.unwrap().contains("Early blight"));
    assert_eq!(model.calls.load(Ordering::SeqCst), 1);

    // 캡처 이미지는 패딩된 잎 영역 (80+40 x 60+40)
    let captured = decode_base64_image(&report.image_base64.unwrap()).unwrap();
    assert_eq!(captured.dimensions(), (120, 100));
}

#[tokio::test]
async fn empty_scene_reports_position_guidance() {
    let dir = TempDir::new().unwrap();
    write_empty(dir.path(), "a.png");
    write_empty(dir.path(), "b.png");

    let model = make_model();
    let client = DiagnosisClient::new(model.clone(), ImageEncoder::default());
    let report = make_loop(dir.path())
        .capture_and_diagnose(&client, &request(Duration::from_millis(200)), None)
        .await;

    assert!(!report.success);
    assert_eq!(report.error, Some(FailureKind::LeafNotDetected));
    assert_eq!(report.confidence, Some(0.0));
    assert_eq!(
        report.message.as_deref(),
        Some("Please hold the leaf properly in front of the camera")
    );
    assert_eq!(model.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn missing_camera_directory_is_soft_failure() {
    let dir = TempDir::new().unwrap();
    let model = make_model();
    let client = DiagnosisClient::new(model, ImageEncoder::default());

    let report = make_loop(&dir.path().join("nowhere"))
        .capture_and_diagnose(&client, &request(Duration::from_secs(1)), None)
        .await;

    assert!(!report.success);
    assert_eq!(report.error, Some(FailureKind::CameraUnavailable));
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["error"], "Camera could not be opened");
}
