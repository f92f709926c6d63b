//! RGB → HSV 변환 및 색상 범위 마스크.
//!
//! HSV는 OpenCV 8비트 규약을 따른다: H ∈ [0, 180), S, V ∈ [0, 255].

use image::{GrayImage, Luma, RgbImage};
use kisan_core::config::HsvRange;

/// 마스크 전경 값
pub const MASK_ON: u8 = 255;

/// 마스크 배경 값
pub const MASK_OFF: u8 = 0;

/// RGB 픽셀 1개를 HSV로 변환
#[inline]
pub fn rgb_to_hsv(r: u8, g: u8, b: u8) -> (u8, u8, u8) {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let v = max;

    if max == 0 {
        return (0, 0, 0);
    }

    let diff = (max - min) as f32;
    let s = (diff * 255.0 / max as f32).round() as u8;

    if diff == 0.0 {
        return (0, s, v);
    }

    let (r, g, b) = (r as f32, g as f32, b as f32);
    let mut h = if max as f32 == r {
        60.0 * (g - b) / diff
    } else if max as f32 == g {
        120.0 + 60.0 * (b - r) / diff
    } else {
        240.0 + 60.0 * (r - g) / diff
    };
    if h < 0.0 {
        h += 360.0;
    }

    let h = (h / 2.0).round() as u32 % 180;
    (h as u8, s, v)
}

/// 범위 중 하나라도 포함하는 픽셀을 전경으로 표시한 마스크
pub fn hsv_mask(frame: &RgbImage, ranges: &[HsvRange]) -> GrayImage {
    let (w, h) = frame.dimensions();
    let mut mask = GrayImage::new(w, h);

    for (x, y, px) in frame.enumerate_pixels() {
        let (hh, ss, vv) = rgb_to_hsv(px[0], px[1], px[2]);
        if ranges.iter().any(|r| r.contains(hh, ss, vv)) {
            mask.put_pixel(x, y, Luma([MASK_ON]));
        }
    }

    mask
}

/// 전경 픽셀 수
pub fn count_on(mask: &GrayImage) -> u64 {
    mask.as_raw().iter().filter(|&&p| p != MASK_OFF).count() as u64
}
