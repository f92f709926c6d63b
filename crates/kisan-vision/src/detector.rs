//! 색상 분할 기반 잎 검출기.
//!
//! 1. RGB → HSV, 녹색/갈색 범위 마스크 합집합
//! 2. 닫힘 → 열림 (정사각형 커널)
//! 3. 외곽 영역 중 최대 면적 선택, 최소 면적 비율 미만이면 미검출
//! 4. 바운딩 박스에 여백을 더해 프레임 안으로 자르고 신뢰도 산출

use image::{imageops, RgbImage};
use kisan_core::config::DetectorConfig;
use kisan_core::models::frame::Rect;
use tracing::trace;

use crate::color::hsv_mask;
use crate::contour::largest_region;
use crate::morphology;

/// 프레임 1장의 검출 결과
#[derive(Debug, Clone, PartialEq)]
pub enum LeafDetection {
    /// 잎 없음 (신뢰도 0)
    NotDetected,
    /// 잎 검출
    Detected {
        /// 여백 포함 잘라낸 잎 영역
        region: RgbImage,
        /// 프레임 좌표계 기준 잘라낸 영역
        bbox: Rect,
        /// 외곽선 내부 면적 (픽셀)
        area: u64,
        /// 0.0 ~ 1.0
        confidence: f32,
    },
}

impl LeafDetection {
    /// 검출 신뢰도 (미검출 시 0.0)
    pub fn confidence(&self) -> f32 {
        match self {
            LeafDetection::NotDetected => 0.0,
            LeafDetection::Detected { confidence, .. } => *confidence,
        }
    }

    /// 검출 여부
    pub fn is_detected(&self) -> bool {
        matches!(self, LeafDetection::Detected { .. })
    }

    /// 화면 표시용 상태 문구 (예: "Leaf Detected: 0.83")
    pub fn overlay_text(&self) -> Option<String> {
        match self {
            LeafDetection::NotDetected => None,
            LeafDetection::Detected { confidence, .. } => {
                Some(format!("Leaf Detected: {:.2}", confidence))
            }
        }
    }
}

/// 색상 분할 잎 검출기: 상태 없음, 프레임 단위 순수 함수
#[derive(Debug, Clone, Default)]
pub struct LeafDetector {
    config: DetectorConfig,
}

impl LeafDetector {
    pub fn new(config: DetectorConfig) -> Self {
        Self { config }
    }

    /// 프레임에서 잎 검출
    pub fn detect(&self, frame: &RgbImage) -> LeafDetection {
        let (w, h) = frame.dimensions();
        if w == 0 || h == 0 {
            return LeafDetection::NotDetected;
        }

        let mask = hsv_mask(frame, &[self.config.green, self.config.brown]);
        let mask = morphology::close(&mask, self.config.kernel_size);
        let mask = morphology::open(&mask, self.config.kernel_size);

        let Some(region) = largest_region(&mask) else {
            return LeafDetection::NotDetected;
        };

        let frame_area = (w as u64 * h as u64) as f64;
        let area_ratio = region.enclosed_area as f64 / frame_area;
        if area_ratio < self.config.min_area_ratio as f64 {
            trace!(
                area = region.enclosed_area,
                ratio = area_ratio,
                "최소 면적 미달"
            );
            return LeafDetection::NotDetected;
        }

        let bbox = pad_and_clip(region.bbox, self.config.padding, w, h);
        let crop = imageops::crop_imm(frame, bbox.x, bbox.y, bbox.w, bbox.h).to_image();
        let confidence = (self.config.confidence_scale as f64 * area_ratio).clamp(0.0, 1.0) as f32;

        LeafDetection::Detected {
            region: crop,
            bbox,
            area: region.enclosed_area,
            confidence,
        }
    }
}

/// 사방으로 `padding` 확장 후 프레임 경계로 자름
fn pad_and_clip(bbox: Rect, padding: u32, width: u32, height: u32) -> Rect {
    let x0 = bbox.x.saturating_sub(padding);
    let y0 = bbox.y.saturating_sub(padding);
    let x1 = (bbox.x + bbox.w).saturating_add(padding).min(width);
    let y1 = (bbox.y + bbox.h).saturating_add(padding).min(height);
    Rect {
        x: x0,
        y: y0,
        w: x1 - x0,
        h: y1 - y0,
    }
}
