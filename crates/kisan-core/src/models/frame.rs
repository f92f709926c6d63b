//! 프레임 관련 모델.
//!
//! 카메라 설정, 검출 영역 좌표 등.

use serde::{Deserialize, Serialize};

/// 직사각형 영역 (잎 바운딩 박스)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl Rect {
    /// 면적 (픽셀)
    pub fn area(&self) -> u64 {
        self.w as u64 * self.h as u64
    }

    /// `width` x `height` 프레임 안에 완전히 포함되는지
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        self.x as u64 + self.w as u64 <= width as u64
            && self.y as u64 + self.h as u64 <= height as u64
    }
}

/// 카메라 요청 설정 (장치가 정확히 따르지 않을 수 있음)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CameraSettings {
    /// 요청 너비 (픽셀)
    pub width: u32,
    /// 요청 높이 (픽셀)
    pub height: u32,
    /// 요청 FPS
    pub fps: u32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            fps: 30,
        }
    }
}
