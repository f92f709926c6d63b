//! 디렉토리 재생 카메라.
//!
//! 디렉토리의 이미지 파일을 이름순으로 한 장씩 프레임으로 돌려준다.
//! 끝에 도달하면 처음부터 다시 재생한다. 인덱스 `n > 0`은
//! 하위 디렉토리 `camera{n}`을 연다.

use std::path::{Path, PathBuf};
use std::time::Duration;

use image::RgbImage;
use kisan_core::error::CoreError;
use kisan_core::models::frame::CameraSettings;
use kisan_core::ports::camera::{CameraProvider, CameraSource};
use tracing::{debug, warn};

/// 프레임으로 인식하는 확장자
const FRAME_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "bmp"];

/// 디렉토리 재생 카메라 제공자
#[derive(Debug, Clone)]
pub struct FramesDirCamera {
    root: PathBuf,
    /// true면 요청 FPS에 맞춰 프레임 간격을 둔다
    paced: bool,
}

impl FramesDirCamera {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            paced: true,
        }
    }

    /// 프레임 간격 대기 여부 설정
    pub fn with_pacing(mut self, paced: bool) -> Self {
        self.paced = paced;
        self
    }

    fn device_dir(&self, index: u32) -> PathBuf {
        if index == 0 {
            self.root.clone()
        } else {
            self.root.join(format!("camera{index}"))
        }
    }
}

/// 디렉토리의 프레임 파일 목록 (이름순)
fn list_frames(dir: &Path) -> Result<Vec<PathBuf>, CoreError> {
    let entries = std::fs::read_dir(dir)
        .map_err(|e| CoreError::CameraUnavailable(format!("{}: {e}", dir.display())))?;

    let mut frames: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .is_some_and(|ext| FRAME_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        })
        .collect();
    frames.sort();
    Ok(frames)
}

impl CameraProvider for FramesDirCamera {
    fn open(
        &self,
        index: u32,
        settings: &CameraSettings,
    ) -> Result<Box<dyn CameraSource>, CoreError> {
        let dir = self.device_dir(index);
        let frames = list_frames(&dir)?;
        if frames.is_empty() {
            return Err(CoreError::CameraUnavailable(format!(
                "프레임 파일 없음: {}",
                dir.display()
            )));
        }

        let interval = if self.paced && settings.fps > 0 {
            Some(Duration::from_secs_f64(1.0 / settings.fps as f64))
        } else {
            None
        };

        debug!(
            dir = %dir.display(),
            frames = frames.len(),
            "프레임 디렉토리 열기"
        );

        Ok(Box::new(FramesDirSource {
            frames,
            cursor: 0,
            interval,
            released: false,
        }))
    }

    fn provider_name(&self) -> &str {
        "frames-dir"
    }
}

/// 열린 디렉토리 재생 소스
struct FramesDirSource {
    frames: Vec<PathBuf>,
    cursor: usize,
    interval: Option<Duration>,
    released: bool,
}

impl CameraSource for FramesDirSource {
    fn read_frame(&mut self) -> Result<Option<RgbImage>, CoreError> {
        if self.released {
            return Err(CoreError::CameraUnavailable("이미 해제된 카메라".to_string()));
        }
        if let Some(interval) = self.interval {
            std::thread::sleep(interval);
        }

        let path = &self.frames[self.cursor];
        self.cursor = (self.cursor + 1) % self.frames.len();

        match image::open(path) {
            Ok(img) => Ok(Some(img.to_rgb8())),
            Err(e) => {
                warn!(path = %path.display(), "프레임 읽기 실패: {e}");
                Ok(None)
            }
        }
    }

    fn release(&mut self) {
        if !self.released {
            self.released = true;
            debug!("프레임 디렉토리 해제");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;
    use tempfile::TempDir;

    fn write_frame(dir: &Path, name: &str, color: [u8; 3]) {
        RgbImage::from_pixel(16, 12, Rgb(color))
            .save(dir.join(name))
            .unwrap();
    }

    #[test]
    fn replays_frames_in_name_order_and_loops() {
        let dir = TempDir::new().unwrap();
        write_frame(dir.path(), "b.png", [0, 255, 0]);
        write_frame(dir.path(), "a.png", [255, 0, 0]);
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let provider = FramesDirCamera::new(dir.path()).with_pacing(false);
        let mut cam = provider.open(0, &CameraSettings::default()).unwrap();

        let first = cam.read_frame().unwrap().unwrap();
        let second = cam.read_frame().unwrap().unwrap();
        let third = cam.read_frame().unwrap().unwrap();
        assert_eq!(first.get_pixel(0, 0), &Rgb([255, 0, 0]));
        assert_eq!(second.get_pixel(0, 0), &Rgb([0, 255, 0]));
        assert_eq!(third.get_pixel(0, 0), &Rgb([255, 0, 0]));
    }

    #[test]
    fn corrupt_file_is_skipped_read() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("broken.jpg"), b"not a jpeg").unwrap();

        let provider = FramesDirCamera::new(dir.path()).with_pacing(false);
        let mut cam = provider.open(0, &CameraSettings::default()).unwrap();
        assert!(cam.read_frame().unwrap().is_none());
    }

    #[test]
    fn missing_device_is_unavailable() {
        let dir = TempDir::new().unwrap();
        let provider = FramesDirCamera::new(dir.path());

        assert!(matches!(
            provider.open(0, &CameraSettings::default()),
            Err(CoreError::CameraUnavailable(_))
        ));
        assert!(matches!(
            provider.open(3, &CameraSettings::default()),
            Err(CoreError::CameraUnavailable(_))
        ));
    }

    #[test]
    fn nonzero_index_opens_subdirectory() {
        let dir = TempDir::new().unwrap();
        let sub = dir.path().join("camera2");
        std::fs::create_dir(&sub).unwrap();
        write_frame(&sub, "0001.png", [10, 20, 30]);

        let provider = FramesDirCamera::new(dir.path()).with_pacing(false);
        let mut cam = provider.open(2, &CameraSettings::default()).unwrap();
        assert!(cam.read_frame().unwrap().is_some());

        cam.release();
        assert!(cam.read_frame().is_err());
    }
}
