//! 이진 마스크 모폴로지 연산 (정사각형 구조 요소).
//!
//! 이미지 바깥 픽셀은 팽창에 기여하지 않고 침식을 줄이지 않는다.
//! 정사각형 커널은 분리 가능하므로 가로 → 세로 1차원 패스 두 번으로 처리한다.

use image::GrayImage;

/// 커널 기준점 기준 오프셋 범위 `[-lo, hi]`
#[inline]
fn kernel_span(size: u32) -> (i64, i64) {
    let lo = (size / 2) as i64;
    let hi = size as i64 - 1 - lo;
    (lo, hi)
}

/// 1차원 윈도우 최대/최소 (가로 또는 세로)
fn pass(src: &GrayImage, size: u32, horizontal: bool, take_max: bool) -> GrayImage {
    let (w, h) = src.dimensions();
    let (lo, hi) = kernel_span(size);
    let mut dst = GrayImage::new(w, h);

    for y in 0..h {
        for x in 0..w {
            let (center, limit) = if horizontal {
                (x as i64, w as i64)
            } else {
                (y as i64, h as i64)
            };
            let start = (center - lo).max(0);
            let end = (center + hi).min(limit - 1);

            let mut acc = if take_max { u8::MIN } else { u8::MAX };
            for i in start..=end {
                let p = if horizontal {
                    src.get_pixel(i as u32, y)[0]
                } else {
                    src.get_pixel(x, i as u32)[0]
                };
                acc = if take_max { acc.max(p) } else { acc.min(p) };
            }
            dst.get_pixel_mut(x, y)[0] = acc;
        }
    }

    dst
}

/// 팽창
pub fn dilate(mask: &GrayImage, size: u32) -> GrayImage {
    if size <= 1 {
        return mask.clone();
    }
    let tmp = pass(mask, size, true, true);
    pass(&tmp, size, false, true)
}

/// 침식
pub fn erode(mask: &GrayImage, size: u32) -> GrayImage {
    if size <= 1 {
        return mask.clone();
    }
    let tmp = pass(mask, size, true, false);
    pass(&tmp, size, false, false)
}

/// 닫힘 (팽창 → 침식): 작은 구멍 메우기
pub fn close(mask: &GrayImage, size: u32) -> GrayImage {
    erode(&dilate(mask, size), size)
}

/// 열림 (침식 → 팽창): 작은 잡음 제거
pub fn open(mask: &GrayImage, size: u32) -> GrayImage {
    dilate(&erode(mask, size), size)
}
