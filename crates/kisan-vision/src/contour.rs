//! 이진 마스크의 외곽 영역 추출.
//!
//! 전경은 8-연결, 배경은 4-연결로 본다. 영역의 면적은 외곽선이 둘러싼
//! 면적(영역 픽셀 + 내부 구멍)으로 계산한다.
//! 꼭짓점 다각형 면적이 아니라 픽셀 수이므로 꽉 찬 w×h 블록의 면적은 w·h다.

use image::GrayImage;
use kisan_core::models::frame::Rect;
use std::collections::VecDeque;

use crate::color::MASK_OFF;

/// 연결 영역 1개
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    /// 영역 바운딩 박스
    pub bbox: Rect,
    /// 전경 픽셀 수
    pub pixel_count: u64,
    /// 외곽선 내부 면적 (구멍 포함)
    pub enclosed_area: u64,
}

const NEIGHBORS_8: [(i64, i64); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

const NEIGHBORS_4: [(i64, i64); 4] = [(0, -1), (-1, 0), (1, 0), (0, 1)];

/// 라벨 맵 + 영역별 (bbox, 픽셀 수)
fn label_components(mask: &GrayImage) -> (Vec<u32>, Vec<(Rect, u64)>) {
    let (w, h) = mask.dimensions();
    let (wi, hi) = (w as i64, h as i64);
    let mut labels = vec![0u32; (w as usize) * (h as usize)];
    let mut components = Vec::new();
    let mut queue = VecDeque::new();

    for sy in 0..h {
        for sx in 0..w {
            let idx = (sy * w + sx) as usize;
            if mask.get_pixel(sx, sy)[0] == MASK_OFF || labels[idx] != 0 {
                continue;
            }

            let label = components.len() as u32 + 1;
            labels[idx] = label;
            queue.push_back((sx as i64, sy as i64));

            let (mut min_x, mut min_y, mut max_x, mut max_y) = (sx, sy, sx, sy);
            let mut count = 0u64;

            while let Some((x, y)) = queue.pop_front() {
                count += 1;
                min_x = min_x.min(x as u32);
                max_x = max_x.max(x as u32);
                min_y = min_y.min(y as u32);
                max_y = max_y.max(y as u32);

                for (dx, dy) in NEIGHBORS_8 {
                    let (nx, ny) = (x + dx, y + dy);
                    if nx < 0 || ny < 0 || nx >= wi || ny >= hi {
                        continue;
                    }
                    let nidx = (ny * wi + nx) as usize;
                    if labels[nidx] == 0 && mask.get_pixel(nx as u32, ny as u32)[0] != MASK_OFF {
                        labels[nidx] = label;
                        queue.push_back((nx, ny));
                    }
                }
            }

            let bbox = Rect {
                x: min_x,
                y: min_y,
                w: max_x - min_x + 1,
                h: max_y - min_y + 1,
            };
            components.push((bbox, count));
        }
    }

    (labels, components)
}

/// bbox 안에서 바깥과 연결되지 않은 셀 수 (= 영역 + 구멍)
///
/// bbox를 1픽셀 여백으로 감싼 격자에서 테두리부터 비-영역 셀을 채운다.
fn enclosed_area(labels: &[u32], image_width: u32, label: u32, bbox: Rect) -> u64 {
    let gw = bbox.w as i64 + 2;
    let gh = bbox.h as i64 + 2;
    let in_region = |gx: i64, gy: i64| -> bool {
        if gx == 0 || gy == 0 || gx == gw - 1 || gy == gh - 1 {
            return false;
        }
        let x = bbox.x as i64 + gx - 1;
        let y = bbox.y as i64 + gy - 1;
        labels[(y * image_width as i64 + x) as usize] == label
    };

    let mut outside = vec![false; (gw * gh) as usize];
    let mut queue = VecDeque::new();
    outside[0] = true;
    queue.push_back((0i64, 0i64));
    let mut outside_count = 0u64;

    while let Some((x, y)) = queue.pop_front() {
        outside_count += 1;
        for (dx, dy) in NEIGHBORS_4 {
            let (nx, ny) = (x + dx, y + dy);
            if nx < 0 || ny < 0 || nx >= gw || ny >= gh {
                continue;
            }
            let nidx = (ny * gw + nx) as usize;
            if !outside[nidx] && !in_region(nx, ny) {
                outside[nidx] = true;
                queue.push_back((nx, ny));
            }
        }
    }

    (gw * gh) as u64 - outside_count
}

/// 마스크의 모든 연결 영역
pub fn find_regions(mask: &GrayImage) -> Vec<Region> {
    let (labels, components) = label_components(mask);
    components
        .into_iter()
        .enumerate()
        .map(|(i, (bbox, pixel_count))| Region {
            bbox,
            pixel_count,
            enclosed_area: enclosed_area(&labels, mask.width(), i as u32 + 1, bbox),
        })
        .collect()
}

/// 외곽 면적이 가장 큰 영역
///
/// 외곽 면적은 bbox 면적을 넘지 않으므로 bbox가 큰 순서로 보며
/// 현재 최대값 이하인 bbox는 계산하지 않는다.
pub fn largest_region(mask: &GrayImage) -> Option<Region> {
    let (labels, components) = label_components(mask);
    let mut indexed: Vec<(u32, Rect, u64)> = components
        .into_iter()
        .enumerate()
        .map(|(i, (bbox, count))| (i as u32 + 1, bbox, count))
        .collect();
    indexed.sort_by(|a, b| b.1.area().cmp(&a.1.area()));

    let mut best: Option<Region> = None;
    for (label, bbox, pixel_count) in indexed {
        if let Some(b) = &best {
            if bbox.area() <= b.enclosed_area {
                break;
            }
        }
        let area = enclosed_area(&labels, mask.width(), label, bbox);
        if best.map_or(true, |b| area > b.enclosed_area) {
            best = Some(Region {
                bbox,
                pixel_count,
                enclosed_area: area,
            });
        }
    }

    best
}
