//! 어댑터 생성 (DI 와이어링).
//!
//! 설정에서 비전 모델과 카메라 제공자를 만들어 `Arc<dyn T>`로 돌려준다.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use directories::ProjectDirs;
use kisan_core::config::ExternalApiEndpoint;
use kisan_core::error::CoreError;
use kisan_core::ports::camera::CameraProvider;
use kisan_core::ports::vision_model::{VisionImage, VisionModel};
use kisan_network::vision_client::RemoteVisionModel;
use kisan_vision::camera::FramesDirCamera;
use tracing::{info, warn};

/// 재생 프레임 디렉토리 결정 (CLI 인자 또는 플랫폼별 기본 경로)
///
/// - macOS: `~/Library/Application Support/com.kisan.assist/frames`
/// - Windows: `%APPDATA%\kisan\assist\data\frames`
/// - Linux: `~/.local/share/assist/frames`
pub fn resolve_frames_dir(frames_dir: Option<&Path>) -> PathBuf {
    frames_dir
        .map(Path::to_path_buf)
        .or_else(|| ProjectDirs::from("com", "kisan", "assist").map(|p| p.data_dir().join("frames")))
        .unwrap_or_else(|| PathBuf::from("./frames"))
}

/// 카메라 제공자 생성
///
/// `opencv` feature가 켜져 있고 디렉토리가 지정되지 않으면 실제 장치를 연다.
pub fn build_camera(frames_dir: Option<&Path>) -> Arc<dyn CameraProvider> {
    #[cfg(feature = "opencv")]
    {
        if frames_dir.is_none() {
            info!("OpenCV 카메라 사용");
            return Arc::new(kisan_vision::camera::OpenCvCamera::new());
        }
    }

    let dir = resolve_frames_dir(frames_dir);
    info!(dir = %dir.display(), "디렉토리 재생 카메라 사용");
    Arc::new(FramesDirCamera::new(dir))
}

/// 비전 모델 생성
///
/// API 키가 없으면 모든 호출이 설정 에러를 내는 모델로 대체한다.
/// 아바타/하이라이트처럼 모델이 필요 없는 기능은 계속 동작한다.
pub fn build_vision_model(config: &ExternalApiEndpoint) -> Arc<dyn VisionModel> {
    match RemoteVisionModel::new(config) {
        Ok(model) => {
            info!(model = model.model(), "비전 모델 클라이언트 준비");
            Arc::new(model)
        }
        Err(e) => {
            warn!("{e}");
            Arc::new(UnconfiguredModel {
                reason: e.to_string(),
            })
        }
    }
}

/// API 키 없이 시작했을 때의 모델
struct UnconfiguredModel {
    reason: String,
}

#[async_trait]
impl VisionModel for UnconfiguredModel {
    async fn generate(
        &self,
        _prompt: &str,
        _image: Option<&VisionImage>,
    ) -> Result<String, CoreError> {
        Err(CoreError::Config(self.reason.clone()))
    }

    fn provider_name(&self) -> &str {
        "unconfigured"
    }
}
