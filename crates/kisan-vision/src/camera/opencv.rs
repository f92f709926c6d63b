//! OpenCV 카메라 장치.
//!
//! `VideoCapture`로 장치를 열고 BGR 프레임을 RGB로 변환해 돌려준다.
//! 해상도/FPS 요청은 장치가 무시할 수 있다.

use image::RgbImage;
use kisan_core::error::CoreError;
use kisan_core::models::frame::CameraSettings;
use kisan_core::ports::camera::{CameraProvider, CameraSource};
use opencv::core::Mat;
use opencv::prelude::*;
use opencv::{imgproc, videoio};
use tracing::{debug, info, warn};

/// OpenCV 카메라 제공자
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenCvCamera;

impl OpenCvCamera {
    pub fn new() -> Self {
        Self
    }
}

fn cv_err(context: &str, e: opencv::Error) -> CoreError {
    CoreError::CameraUnavailable(format!("{context}: {e}"))
}

impl CameraProvider for OpenCvCamera {
    fn open(
        &self,
        index: u32,
        settings: &CameraSettings,
    ) -> Result<Box<dyn CameraSource>, CoreError> {
        let mut capture = videoio::VideoCapture::new(index as i32, videoio::CAP_ANY)
            .map_err(|e| cv_err("VideoCapture 생성 실패", e))?;

        let opened = capture
            .is_opened()
            .map_err(|e| cv_err("장치 상태 확인 실패", e))?;
        if !opened {
            return Err(CoreError::CameraUnavailable(format!(
                "카메라 인덱스 {index} 열기 실패"
            )));
        }

        for (prop, value) in [
            (videoio::CAP_PROP_FRAME_WIDTH, settings.width as f64),
            (videoio::CAP_PROP_FRAME_HEIGHT, settings.height as f64),
            (videoio::CAP_PROP_FPS, settings.fps as f64),
        ] {
            if let Ok(false) | Err(_) = capture.set(prop, value) {
                debug!(prop, value, "카메라 속성 요청 무시됨");
            }
        }

        info!(
            index,
            width = settings.width,
            height = settings.height,
            fps = settings.fps,
            "카메라 열기 완료"
        );

        Ok(Box::new(OpenCvSource {
            capture,
            frame: Mat::default(),
            released: false,
        }))
    }

    fn provider_name(&self) -> &str {
        "opencv"
    }
}

/// 열린 OpenCV 장치
struct OpenCvSource {
    capture: videoio::VideoCapture,
    frame: Mat,
    released: bool,
}

impl CameraSource for OpenCvSource {
    fn read_frame(&mut self) -> Result<Option<RgbImage>, CoreError> {
        if self.released {
            return Err(CoreError::CameraUnavailable("이미 해제된 카메라".to_string()));
        }

        match self.capture.read(&mut self.frame) {
            Ok(true) => {}
            Ok(false) => return Ok(None),
            Err(e) => {
                warn!("프레임 읽기 실패: {e}");
                return Ok(None);
            }
        }
        if self.frame.empty() {
            return Ok(None);
        }

        let mut rgb = Mat::default();
        imgproc::cvt_color_def(&self.frame, &mut rgb, imgproc::COLOR_BGR2RGB)
            .map_err(|e| CoreError::ImageCodec(format!("색 공간 변환 실패: {e}")))?;

        let size = rgb
            .size()
            .map_err(|e| CoreError::ImageCodec(format!("프레임 크기 조회 실패: {e}")))?;
        let bytes = rgb
            .data_bytes()
            .map_err(|e| CoreError::ImageCodec(format!("프레임 버퍼 접근 실패: {e}")))?
            .to_vec();

        RgbImage::from_raw(size.width as u32, size.height as u32, bytes)
            .map(Some)
            .ok_or_else(|| CoreError::ImageCodec("프레임 버퍼 크기 불일치".to_string()))
    }

    fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        if let Err(e) = self.capture.release() {
            warn!("카메라 해제 실패: {e}");
        } else {
            debug!("카메라 해제");
        }
    }
}

impl Drop for OpenCvSource {
    fn drop(&mut self) {
        self.release();
    }
}
