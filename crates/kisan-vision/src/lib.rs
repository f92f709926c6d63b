//! # kisan-vision
//!
//! Edge 이미지 처리 크레이트.
//! 카메라 프레임에서 색상 분할로 잎을 찾고, 가장 좋은 프레임을
//! 외부 비전 모델에 보내 병해를 진단하는 파이프라인을 담당한다.

pub mod camera;
pub mod capture;
pub mod color;
pub mod contour;
pub mod detector;
pub mod diagnosis;
pub mod encoder;
pub mod morphology;
pub mod prompts;
