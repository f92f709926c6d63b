//! 병해 진단 클라이언트.
//!
//! 잎 이미지를 외부 비전 모델에 보내 자연어 진단을 받는다.
//! 모델 호출 실패는 로그로만 남기고 호출자에게는 지역화된 일반 문구를 반환한다.

use std::sync::Arc;

use image::RgbImage;
use kisan_core::error::CoreError;
use kisan_core::locale::Language;
use kisan_core::models::diagnosis::{DiagnosisReport, LeafCheckReport};
use kisan_core::ports::vision_model::VisionModel;
use tracing::{debug, error, info};

use crate::encoder::{decode_base64_image, ImageEncoder};
use crate::prompts::{diagnosis_prompt, LEAF_CHECK_PROMPT};

/// 병해 진단 클라이언트: 모델 어댑터를 주입받아 사용
#[derive(Clone)]
pub struct DiagnosisClient {
    model: Arc<dyn VisionModel>,
    encoder: ImageEncoder,
}

impl DiagnosisClient {
    pub fn new(model: Arc<dyn VisionModel>, encoder: ImageEncoder) -> Self {
        Self { model, encoder }
    }

    /// 인코더 (캡처 결과 재인코딩에 공유)
    pub fn encoder(&self) -> &ImageEncoder {
        &self.encoder
    }

    /// 모델 제공자 이름
    pub fn provider_name(&self) -> &str {
        self.model.provider_name()
    }

    /// 잎 이미지 진단
    pub async fn diagnose_image(&self, image: &RgbImage, language: Language) -> DiagnosisReport {
        match self.request_diagnosis(image, language).await {
            Ok(text) => {
                info!(
                    provider = self.model.provider_name(),
                    language = %language,
                    chars = text.len(),
                    "병해 진단 완료"
                );
                DiagnosisReport::diagnosed(text, language)
            }
            Err(e) => {
                error!(
                    provider = self.model.provider_name(),
                    language = %language,
                    "병해 진단 실패: {e}"
                );
                DiagnosisReport::diagnosis_failed(language)
            }
        }
    }

    async fn request_diagnosis(
        &self,
        image: &RgbImage,
        language: Language,
    ) -> Result<String, CoreError> {
        let vision_image = self.encoder.to_vision_image(image)?;
        debug!(bytes = vision_image.data.len(), "진단 요청 이미지 준비");

        let text = self
            .model
            .generate(diagnosis_prompt(language), Some(&vision_image))
            .await?;
        Ok(text.trim().to_string())
    }

    /// 잎 존재 여부 빠른 확인
    ///
    /// 응답을 대문자로 바꿔 "YES"를 포함하면 잎이 있다고 본다.
    pub async fn check_leaf_present(&self, image: &RgbImage, language: Language) -> LeafCheckReport {
        let result = async {
            let vision_image = self.encoder.to_vision_image(image)?;
            self.model
                .generate(LEAF_CHECK_PROMPT, Some(&vision_image))
                .await
        }
        .await;

        match result {
            Ok(text) => {
                let normalized = text.trim().to_uppercase();
                let is_leaf = normalized.contains("YES");
                debug!(is_leaf, response = %normalized, "잎 존재 확인");
                LeafCheckReport::answered(is_leaf, normalized, language)
            }
            Err(e) => {
                error!(provider = self.model.provider_name(), "잎 존재 확인 실패: {e}");
                LeafCheckReport::failed()
            }
        }
    }

    /// 업로드 흐름: Base64 이미지 디코딩 → (선택) 잎 확인 → 진단
    ///
    /// 디코딩 실패만 `Err`로 돌려준다. 모델 실패는 리포트 값으로 변환된다.
    pub async fn diagnose_base64(
        &self,
        image_base64: &str,
        language: Language,
        precheck: bool,
    ) -> Result<DiagnosisReport, CoreError> {
        let image = decode_base64_image(image_base64)?;
        Ok(self.diagnose_checked(&image, language, precheck).await)
    }

    /// (선택) 잎 확인 후 진단
    ///
    /// 잎 확인 자체가 실패하면 진단 실패, 잎이 없다고 답하면 잎 미검출 리포트.
    pub async fn diagnose_checked(
        &self,
        image: &RgbImage,
        language: Language,
        precheck: bool,
    ) -> DiagnosisReport {
        if precheck {
            let check = self.check_leaf_present(image, language).await;
            if !check.success {
                return DiagnosisReport::diagnosis_failed(language);
            }
            if !check.is_leaf_present {
                info!(language = %language, "사전 확인: 잎 없음");
                return DiagnosisReport::leaf_absent(language);
            }
        }

        self.diagnose_image(image, language).await
    }
}
