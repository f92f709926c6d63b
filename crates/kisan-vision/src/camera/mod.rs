//! 카메라 어댑터.
//!
//! - [`frames_dir`]: 디렉토리의 이미지 파일을 프레임으로 재생 (장치 없는 환경, 테스트)
//! - `opencv`: 실제 카메라 장치 (`opencv` feature)

pub mod frames_dir;
#[cfg(feature = "opencv")]
pub mod opencv;

pub use frames_dir::FramesDirCamera;
#[cfg(feature = "opencv")]
pub use self::opencv::OpenCvCamera;
