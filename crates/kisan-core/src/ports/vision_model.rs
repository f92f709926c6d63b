//! 외부 비전-언어 모델 포트.
//!
//! 지시문 + 이미지 1장을 보내고 자연어 응답을 받는 불투명한 요청/응답 기능.
//! 응답에 구조화 스키마를 강제하지 않는다.
//!
//! 구현: `kisan-network::vision_client::RemoteVisionModel`

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// 모델에 첨부하는 인코딩된 이미지
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisionImage {
    /// 인코딩된 바이트 (JPEG 등)
    pub data: Vec<u8>,
    /// MIME 타입 (예: "image/jpeg")
    pub mime_type: String,
}

impl VisionImage {
    /// JPEG 이미지
    pub fn jpeg(data: Vec<u8>) -> Self {
        Self {
            data,
            mime_type: "image/jpeg".to_string(),
        }
    }
}

/// 비전-언어 모델: 단일 요청/응답, 재시도 없음
#[async_trait]
pub trait VisionModel: Send + Sync {
    /// 지시문(+선택적 이미지)으로 텍스트 생성
    async fn generate(
        &self,
        prompt: &str,
        image: Option<&VisionImage>,
    ) -> Result<String, CoreError>;

    /// 제공자 이름 (예: "gemini", "anthropic", "openai")
    fn provider_name(&self) -> &str;
}
