//! 카메라 포트.
//!
//! 구현: `kisan-vision::camera` (디렉토리 재생, OpenCV 장치)

use image::RgbImage;

use crate::error::CoreError;
use crate::models::frame::CameraSettings;

/// 열린 카메라 자원: 단일 소비자가 독점 소유
pub trait CameraSource: Send {
    /// 프레임 1장 읽기.
    ///
    /// `Ok(None)`은 일시적 읽기 실패로, 세션을 중단하지 않고 건너뛴다.
    fn read_frame(&mut self) -> Result<Option<RgbImage>, CoreError>;

    /// 장치 해제. 여러 번 호출해도 안전해야 한다.
    fn release(&mut self);
}

/// 카메라 제공자: 인덱스로 장치 획득
pub trait CameraProvider: Send + Sync {
    /// 장치 열기. 실패 시 `CoreError::CameraUnavailable`.
    fn open(
        &self,
        index: u32,
        settings: &CameraSettings,
    ) -> Result<Box<dyn CameraSource>, CoreError>;

    /// 제공자 이름 (예: "opencv", "frames-dir")
    fn provider_name(&self) -> &str;
}
