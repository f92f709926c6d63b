//! 카메라 캡처 루프.
//!
//! 카메라를 열고 타임아웃까지 프레임을 읽으며 N번째 프레임마다 잎을 검출한다.
//! 가장 신뢰도가 높은 잎 영역을 보관하다가, 조기 종료 임계값을 넘는 프레임이
//! 나오면 즉시 멈춘다. 하한 신뢰도 이상이면 진단 클라이언트로 넘긴다.
//!
//! 스캔 단계는 동기 함수다. 웹 계층은 `spawn_blocking`에서 실행한다.

use std::sync::Arc;
use std::time::{Duration, Instant};

use image::RgbImage;
use kisan_core::config::CaptureConfig;
use kisan_core::error::CoreError;
use kisan_core::locale::{self, Language};
use kisan_core::models::diagnosis::DiagnosisReport;
use kisan_core::ports::camera::{CameraProvider, CameraSource};
use tracing::{debug, info, warn};

use crate::detector::{LeafDetection, LeafDetector};
use crate::diagnosis::DiagnosisClient;

/// 관찰자 응답
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObserverControl {
    /// 계속 진행
    Continue,
    /// 사용자 취소
    Quit,
}

/// 분석된 프레임마다 호출되는 시각 피드백 훅
pub trait CaptureObserver: Send {
    /// 분석된 프레임 1장
    fn on_frame(&mut self, frame: &RgbImage, detection: &LeafDetection) -> ObserverControl;

    /// 카메라 해제 직후 (모든 종료 경로에서 1회)
    fn on_teardown(&mut self) {}
}

/// 오버레이 문구를 로그로 남기는 관찰자 (화면 없는 환경용)
#[derive(Debug, Clone)]
pub struct TracingObserver {
    language: Language,
}

impl TracingObserver {
    pub fn new(language: Language) -> Self {
        Self { language }
    }
}

impl CaptureObserver for TracingObserver {
    fn on_frame(&mut self, _frame: &RgbImage, detection: &LeafDetection) -> ObserverControl {
        match detection.overlay_text() {
            Some(text) => debug!(overlay = %text, "프레임 분석"),
            None => debug!(overlay = locale::position_leaf(self.language), "프레임 분석"),
        }
        ObserverControl::Continue
    }

    fn on_teardown(&mut self) {
        debug!("캡처 세션 종료");
    }
}

/// 세션 최고 후보: 더 높은 신뢰도에서만 교체
#[derive(Debug, Clone, PartialEq)]
pub struct BestCandidate {
    /// 잘라낸 잎 영역 (소유 복사본)
    pub frame: RgbImage,
    /// 0.0 ~ 1.0
    pub confidence: f32,
}

impl BestCandidate {
    /// 더 높으면 교체. 교체 여부 반환.
    fn offer(slot: &mut Option<BestCandidate>, detection: &LeafDetection) -> bool {
        let LeafDetection::Detected {
            region, confidence, ..
        } = detection
        else {
            return false;
        };

        let current = slot.as_ref().map_or(0.0, |b| b.confidence);
        if *confidence > current {
            *slot = Some(BestCandidate {
                frame: region.clone(),
                confidence: *confidence,
            });
            true
        } else {
            false
        }
    }
}

/// 스캔 종료 사유
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// 타임아웃 경과
    Timeout,
    /// 조기 종료 임계값 초과
    EarlyExit,
    /// 관찰자 취소
    ObserverQuit,
    /// 프레임 읽기 중 장치 오류
    CameraError,
}

/// 스캔 결과
#[derive(Debug, Clone)]
pub struct ScanOutcome {
    /// 최고 후보
    pub best: Option<BestCandidate>,
    /// 성공한 읽기 수
    pub frames_read: u64,
    /// 분석한 프레임 수
    pub frames_analyzed: u64,
    /// 종료 사유
    pub stop: StopReason,
}

impl ScanOutcome {
    /// 최고 신뢰도 (후보 없으면 0)
    pub fn best_confidence(&self) -> f32 {
        self.best.as_ref().map_or(0.0, |b| b.confidence)
    }
}

/// 캡처 세션 요청
#[derive(Debug, Clone, Copy)]
pub struct CaptureRequest {
    pub camera_index: u32,
    pub timeout: Duration,
    pub language: Language,
}

impl CaptureRequest {
    /// 설정 기본값으로 요청 생성
    pub fn from_config(config: &CaptureConfig, language: Language) -> Self {
        Self {
            camera_index: config.camera_index,
            timeout: config.timeout(),
            language,
        }
    }
}

/// 열린 카메라 보관: drop 시 해제 + 관찰자 통지
struct CameraGuard<'a> {
    source: Box<dyn CameraSource>,
    observer: Option<&'a mut dyn CaptureObserver>,
}

impl Drop for CameraGuard<'_> {
    fn drop(&mut self) {
        self.source.release();
        if let Some(observer) = self.observer.as_deref_mut() {
            observer.on_teardown();
        }
    }
}

/// 캡처 루프
#[derive(Clone)]
pub struct CaptureLoop {
    camera: Arc<dyn CameraProvider>,
    detector: LeafDetector,
    config: CaptureConfig,
}

impl CaptureLoop {
    pub fn new(camera: Arc<dyn CameraProvider>, detector: LeafDetector, config: CaptureConfig) -> Self {
        Self {
            camera,
            detector,
            config,
        }
    }

    /// 카메라 제공자 이름
    pub fn camera_name(&self) -> &str {
        self.camera.provider_name()
    }

    /// 카메라 스캔 (동기)
    ///
    /// 카메라를 열 수 없을 때만 `Err(CameraUnavailable)`.
    pub fn scan(
        &self,
        request: &CaptureRequest,
        observer: Option<&mut dyn CaptureObserver>,
    ) -> Result<ScanOutcome, CoreError> {
        let source = self
            .camera
            .open(request.camera_index, &self.config.camera_settings())?;
        let mut guard = CameraGuard { source, observer };

        info!(
            camera = self.camera.provider_name(),
            index = request.camera_index,
            timeout_secs = request.timeout.as_secs_f32(),
            "카메라 열림, 잎 검출 대기"
        );

        let frame_skip = u64::from(self.config.frame_skip.max(1));
        let start = Instant::now();
        let mut best: Option<BestCandidate> = None;
        let mut frames_read = 0u64;
        let mut frames_analyzed = 0u64;
        let mut stop = StopReason::Timeout;

        while start.elapsed() < request.timeout {
            let frame = match guard.source.read_frame() {
                Ok(Some(frame)) => frame,
                Ok(None) => continue,
                Err(e) => {
                    warn!("프레임 읽기 중 장치 오류: {e}");
                    stop = StopReason::CameraError;
                    break;
                }
            };

            frames_read += 1;
            if frames_read % frame_skip != 0 {
                continue;
            }
            frames_analyzed += 1;

            let detection = self.detector.detect(&frame);
            let confidence = detection.confidence();
            if BestCandidate::offer(&mut best, &detection) {
                debug!(confidence, frame = frames_read, "최고 후보 갱신");
            }

            if let Some(observer) = guard.observer.as_deref_mut() {
                if observer.on_frame(&frame, &detection) == ObserverControl::Quit {
                    info!("관찰자 요청으로 캡처 중단");
                    stop = StopReason::ObserverQuit;
                    break;
                }
            }

            if detection.is_detected() && confidence > self.config.early_exit_confidence {
                info!(confidence, "높은 신뢰도 검출, 즉시 캡처");
                stop = StopReason::EarlyExit;
                break;
            }
        }

        drop(guard);

        let outcome = ScanOutcome {
            best,
            frames_read,
            frames_analyzed,
            stop,
        };
        debug!(
            frames_read = outcome.frames_read,
            frames_analyzed = outcome.frames_analyzed,
            best = outcome.best_confidence(),
            stop = ?outcome.stop,
            "스캔 완료"
        );
        Ok(outcome)
    }

    /// 스캔 결과 → 진단 리포트
    ///
    /// 하한 신뢰도 미만이면 진단하지 않고 위치 조정 안내를 반환한다.
    pub async fn finish(
        &self,
        outcome: ScanOutcome,
        client: &DiagnosisClient,
        language: Language,
    ) -> DiagnosisReport {
        let best_confidence = outcome.best_confidence();
        let best = match outcome.best {
            Some(best) if best.confidence >= self.config.min_confidence => best,
            _ => {
                info!(best = best_confidence, "잎 미검출");
                return DiagnosisReport::leaf_not_found(language, best_confidence);
            }
        };

        info!(confidence = best.confidence, "잎 캡처 완료, 진단 요청");
        let report = client.diagnose_image(&best.frame, language).await;

        let image_base64 = match client.encoder().encode_base64(&best.frame) {
            Ok(b64) => Some(b64),
            Err(e) => {
                warn!("캡처 이미지 인코딩 실패: {e}");
                None
            }
        };
        report.with_capture(best.confidence, image_base64)
    }

    /// 카메라 세션 전체: 스캔 → 진단
    ///
    /// 스캔은 현재 스레드를 막는다. 비동기 서버에서는 [`Self::scan`]을
    /// `spawn_blocking`으로 실행한 뒤 [`Self::finish`]를 호출한다.
    pub async fn capture_and_diagnose(
        &self,
        client: &DiagnosisClient,
        request: &CaptureRequest,
        observer: Option<&mut dyn CaptureObserver>,
    ) -> DiagnosisReport {
        match self.scan(request, observer) {
            Ok(outcome) => self.finish(outcome, client, request.language).await,
            Err(e) => {
                warn!(index = request.camera_index, "카메라 열기 실패: {e}");
                DiagnosisReport::camera_unavailable(request.language)
            }
        }
    }
}
