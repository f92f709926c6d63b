//! 이미지 교환 형식 인코더.
//!
//! 외부 모델 전송 및 호출자 반환용 Base64 JPEG.
//! 긴 변이 `max_side`를 넘으면 fast_image_resize Lanczos3로 축소한다.

use base64::{engine::general_purpose::STANDARD as B64, Engine};
use fast_image_resize::{images::Image as FirImage, PixelType, ResizeAlg, ResizeOptions, Resizer};
use image::codecs::jpeg::JpegEncoder;
use image::RgbImage;
use kisan_core::config::EncodingConfig;
use kisan_core::error::CoreError;
use kisan_core::ports::vision_model::VisionImage;
use tracing::debug;

/// JPEG + Base64 인코더
#[derive(Debug, Clone)]
pub struct ImageEncoder {
    max_side: u32,
    quality: u8,
}

impl Default for ImageEncoder {
    fn default() -> Self {
        Self::new(&EncodingConfig::default())
    }
}

impl ImageEncoder {
    pub fn new(config: &EncodingConfig) -> Self {
        Self {
            max_side: config.max_side.max(1),
            quality: config.jpeg_quality.clamp(1, 100),
        }
    }

    /// 긴 변 제한 적용 (확대하지 않음)
    pub fn fit(&self, image: &RgbImage) -> Result<RgbImage, CoreError> {
        fit_within(image, self.max_side)
    }

    /// JPEG 인코딩
    pub fn encode_jpeg(&self, image: &RgbImage) -> Result<Vec<u8>, CoreError> {
        let mut buf = Vec::new();
        JpegEncoder::new_with_quality(&mut buf, self.quality)
            .encode_image(image)
            .map_err(|e| CoreError::ImageCodec(format!("JPEG 인코딩 실패: {e}")))?;

        debug!(
            "JPEG 인코딩: {}x{} → {} bytes (품질 {})",
            image.width(),
            image.height(),
            buf.len(),
            self.quality
        );
        Ok(buf)
    }

    /// 호출자 반환용: 축소 + JPEG + Base64
    pub fn encode_base64(&self, image: &RgbImage) -> Result<String, CoreError> {
        let fitted = self.fit(image)?;
        let bytes = self.encode_jpeg(&fitted)?;
        Ok(B64.encode(&bytes))
    }

    /// 모델 전송용: 축소 + JPEG
    pub fn to_vision_image(&self, image: &RgbImage) -> Result<VisionImage, CoreError> {
        let fitted = self.fit(image)?;
        Ok(VisionImage::jpeg(self.encode_jpeg(&fitted)?))
    }
}

/// Base64 문자열 → RGB 이미지
///
/// `data:image/...;base64,` 접두사가 있으면 제거한다.
pub fn decode_base64_image(data: &str) -> Result<RgbImage, CoreError> {
    let payload = match data.split_once(";base64,") {
        Some((prefix, rest)) if prefix.starts_with("data:") => rest,
        _ => data,
    };

    let bytes = B64
        .decode(payload.trim())
        .map_err(|e| CoreError::ImageCodec(format!("Base64 디코딩 실패: {e}")))?;

    let image = image::load_from_memory(&bytes)
        .map_err(|e| CoreError::ImageCodec(format!("이미지 디코딩 실패: {e}")))?;

    Ok(image.to_rgb8())
}

/// 긴 변이 `max_side` 이하가 되도록 비율 유지 축소
pub fn fit_within(image: &RgbImage, max_side: u32) -> Result<RgbImage, CoreError> {
    let (src_w, src_h) = image.dimensions();
    if src_w == 0 || src_h == 0 {
        return Err(CoreError::ImageCodec("소스 이미지 크기 0".to_string()));
    }

    let longest = src_w.max(src_h);
    if longest <= max_side {
        return Ok(image.clone());
    }

    let ratio = max_side as f64 / longest as f64;
    let dst_w = ((src_w as f64 * ratio) as u32).clamp(1, max_side);
    let dst_h = ((src_h as f64 * ratio) as u32).clamp(1, max_side);

    let src_image = FirImage::from_vec_u8(src_w, src_h, image.as_raw().clone(), PixelType::U8x3)
        .map_err(|e| CoreError::ImageCodec(format!("소스 이미지 생성 실패: {e}")))?;
    let mut dst_image = FirImage::new(dst_w, dst_h, PixelType::U8x3);

    let mut resizer = Resizer::new();
    let options = ResizeOptions::new().resize_alg(ResizeAlg::Convolution(
        fast_image_resize::FilterType::Lanczos3,
    ));
    resizer
        .resize(&src_image, &mut dst_image, &options)
        .map_err(|e| CoreError::ImageCodec(format!("리사이즈 실패: {e}")))?;

    debug!("리사이즈: {}x{} → {}x{}", src_w, src_h, dst_w, dst_h);

    RgbImage::from_raw(dst_w, dst_h, dst_image.into_vec())
        .ok_or_else(|| CoreError::ImageCodec("결과 이미지 생성 실패".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn make_test_image(w: u32, h: u32, color: [u8; 3]) -> RgbImage {
        RgbImage::from_pixel(w, h, Rgb(color))
    }

    #[test]
    fn fit_keeps_small_images() {
        let img = make_test_image(640, 480, [10, 120, 30]);
        let fitted = fit_within(&img, 1024).unwrap();
        assert_eq!(fitted.dimensions(), (640, 480));
    }

    #[test]
    fn fit_shrinks_longest_side() {
        let img = make_test_image(2048, 1536, [10, 120, 30]);
        let fitted = fit_within(&img, 1024).unwrap();
        assert_eq!(fitted.dimensions(), (1024, 768));

        let tall = make_test_image(300, 3000, [10, 120, 30]);
        let fitted = fit_within(&tall, 1024).unwrap();
        assert_eq!(fitted.height(), 1024);
        assert!(fitted.width() <= 1024);
    }

    #[test]
    fn zero_sized_image_is_error() {
        let img = RgbImage::new(0, 10);
        assert!(matches!(
            fit_within(&img, 1024),
            Err(CoreError::ImageCodec(_))
        ));
    }

    #[test]
    fn base64_jpeg_round_trip() {
        let encoder = ImageEncoder::default();
        let img = make_test_image(64, 48, [40, 160, 40]);

        let encoded = encoder.encode_base64(&img).unwrap();
        let decoded = decode_base64_image(&encoded).unwrap();
        assert_eq!(decoded.dimensions(), (64, 48));

        let px = decoded.get_pixel(32, 24);
        for (got, want) in px.0.iter().zip([40u8, 160, 40]) {
            assert!(
                (*got as i32 - want as i32).abs() <= 8,
                "q85 허용 오차 초과: {got} vs {want}"
            );
        }

        // 큰 원본은 긴 변 1024 이하로 반환
        let large = make_test_image(1600, 1200, [40, 160, 40]);
        let decoded = decode_base64_image(&encoder.encode_base64(&large).unwrap()).unwrap();
        assert_eq!(decoded.dimensions(), (1024, 768));
    }

    #[test]
    fn decode_accepts_data_uri() {
        let encoder = ImageEncoder::default();
        let img = make_test_image(8, 8, [200, 10, 10]);
        let uri = format!("data:image/jpeg;base64,{}", encoder.encode_base64(&img).unwrap());
        assert_eq!(decode_base64_image(&uri).unwrap().dimensions(), (8, 8));
    }

    #[test]
    fn decode_rejects_garbage() {
        assert!(matches!(
            decode_base64_image("not-base64!!"),
            Err(CoreError::ImageCodec(_))
        ));
        // 유효한 Base64지만 이미지가 아님
        assert!(matches!(
            decode_base64_image("aGVsbG8gd29ybGQ="),
            Err(CoreError::ImageCodec(_))
        ));
    }

    #[test]
    fn vision_image_is_fitted_jpeg() {
        let encoder = ImageEncoder::default();
        let img = make_test_image(1600, 1200, [10, 120, 30]);
        let vision = encoder.to_vision_image(&img).unwrap();
        assert_eq!(vision.mime_type, "image/jpeg");

        let decoded = image::load_from_memory(&vision.data).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (1024, 768));
    }
}
