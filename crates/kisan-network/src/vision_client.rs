//! 외부 비전-언어 모델 클라이언트.
//!
//! 지시문과 JPEG 이미지 1장을 보내고 자연어 응답 텍스트를 받는다.
//! 재시도/백오프는 하지 않는다. 실패는 그대로 호출자에게 돌려준다.

use std::time::Duration;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as B64, Engine};
use reqwest::header::RETRY_AFTER;
use serde_json::{json, Value};
use tracing::{debug, warn};

use kisan_core::config::{AiProviderType, ExternalApiEndpoint};
use kisan_core::error::CoreError;
use kisan_core::ports::vision_model::{VisionImage, VisionModel};

/// 429 응답에 Retry-After가 없을 때 기본 대기 (초)
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// Anthropic/OpenAI 응답 최대 토큰
const MAX_OUTPUT_TOKENS: u32 = 1024;

// ============================================================
// RemoteVisionModel: 외부 비전 모델 클라이언트
// ============================================================

/// 외부 비전-언어 모델 클라이언트
///
/// 지원 API:
/// - Gemini: `POST {endpoint}/{model}:generateContent`
/// - Claude (Anthropic): `POST /v1/messages`
/// - OpenAI 호환: `POST /v1/chat/completions`
///
/// API 키는 메모리에만 유지하며 로그에 남기지 않는다.
#[derive(Debug)]
pub struct RemoteVisionModel {
    /// HTTP 클라이언트
    http_client: reqwest::Client,
    /// API 엔드포인트 URL
    endpoint: String,
    /// API 키
    api_key: String,
    /// 모델 이름
    model: String,
    /// 요청/응답 형식 결정
    provider_type: AiProviderType,
}

impl RemoteVisionModel {
    /// 새 RemoteVisionModel 생성
    pub fn new(config: &ExternalApiEndpoint) -> Result<Self, CoreError> {
        if config.api_key.trim().is_empty() {
            return Err(CoreError::Config(
                "비전 모델 API 키 미설정. config.json 또는 GEMINI_API_KEY 환경 변수를 설정하세요."
                    .into(),
            ));
        }

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| CoreError::Network(format!("HTTP 클라이언트 생성 실패: {}", e)))?;

        let model = config
            .model
            .clone()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| Self::default_model(config.provider_type).to_string());

        debug!(
            endpoint = %config.endpoint,
            model = %model,
            provider = ?config.provider_type,
            timeout = config.timeout_secs,
            "RemoteVisionModel 초기화"
        );

        Ok(Self {
            http_client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            api_key: config.api_key.trim().to_string(),
            model,
            provider_type: config.provider_type,
        })
    }

    /// 제공자별 기본 모델
    fn default_model(provider: AiProviderType) -> &'static str {
        match provider {
            AiProviderType::Gemini => "gemini-2.0-flash-lite",
            AiProviderType::Anthropic => "claude-sonnet-4-5-20250929",
            AiProviderType::OpenAi => "gpt-4o-mini",
        }
    }

    /// 모델 이름
    pub fn model(&self) -> &str {
        &self.model
    }

    /// 요청 URL
    fn request_url(&self) -> String {
        match self.provider_type {
            AiProviderType::Gemini => format!("{}/{}:generateContent", self.endpoint, self.model),
            AiProviderType::Anthropic | AiProviderType::OpenAi => self.endpoint.clone(),
        }
    }

    /// 제공자별 요청 본문
    fn build_request_body(&self, prompt: &str, image: Option<&VisionImage>) -> Value {
        match self.provider_type {
            AiProviderType::Gemini => {
                let mut parts = vec![json!({ "text": prompt })];
                if let Some(img) = image {
                    parts.push(json!({
                        "inline_data": {
                            "mime_type": img.mime_type,
                            "data": B64.encode(&img.data),
                        }
                    }));
                }
                json!({ "contents": [{ "parts": parts }] })
            }
            AiProviderType::Anthropic => {
                let mut content = Vec::new();
                if let Some(img) = image {
                    content.push(json!({
                        "type": "image",
                        "source": {
                            "type": "base64",
                            "media_type": img.mime_type,
                            "data": B64.encode(&img.data),
                        }
                    }));
                }
                content.push(json!({ "type": "text", "text": prompt }));
                json!({
                    "model": self.model,
                    "max_tokens": MAX_OUTPUT_TOKENS,
                    "messages": [{ "role": "user", "content": content }]
                })
            }
            AiProviderType::OpenAi => {
                let mut content = vec![json!({ "type": "text", "text": prompt })];
                if let Some(img) = image {
                    content.push(json!({
                        "type": "image_url",
                        "image_url": {
                            "url": format!("data:{};base64,{}", img.mime_type, B64.encode(&img.data))
                        }
                    }));
                }
                json!({
                    "model": self.model,
                    "max_tokens": MAX_OUTPUT_TOKENS,
                    "messages": [{ "role": "user", "content": content }]
                })
            }
        }
    }

    /// Gemini 응답: `candidates[0].content.parts[].text` 연결
    fn parse_gemini_response(body: &Value) -> Result<String, CoreError> {
        let parts = body
            .get("candidates")
            .and_then(|c| c.as_array())
            .and_then(|arr| arr.first())
            .and_then(|cand| cand.get("content"))
            .and_then(|content| content.get("parts"))
            .and_then(|p| p.as_array());

        let Some(parts) = parts else {
            // 안전 필터 차단 시 candidates 없이 promptFeedback만 옴
            let reason = body
                .get("promptFeedback")
                .and_then(|f| f.get("blockReason"))
                .and_then(|r| r.as_str())
                .unwrap_or("candidates 없음");
            return Err(CoreError::ModelResponse(format!(
                "Gemini 응답에서 텍스트를 찾을 수 없음: {reason}"
            )));
        };

        let text: String = parts
            .iter()
            .filter_map(|part| part.get("text").and_then(|t| t.as_str()))
            .collect();
        if text.is_empty() {
            return Err(CoreError::ModelResponse(
                "Gemini 응답 텍스트가 비어 있음".to_string(),
            ));
        }
        Ok(text)
    }

    /// Claude 응답: `content[].text` 연결
    fn parse_claude_response(body: &Value) -> Result<String, CoreError> {
        let text: String = body
            .get("content")
            .and_then(|c| c.as_array())
            .ok_or_else(|| CoreError::ModelResponse("Claude 응답에 content 없음".to_string()))?
            .iter()
            .filter(|block| block.get("type").and_then(|t| t.as_str()) == Some("text"))
            .filter_map(|block| block.get("text").and_then(|t| t.as_str()))
            .collect();
        if text.is_empty() {
            return Err(CoreError::ModelResponse(
                "Claude 응답에서 텍스트를 찾을 수 없음".to_string(),
            ));
        }
        Ok(text)
    }

    /// OpenAI 응답: `choices[0].message.content`
    fn parse_openai_response(body: &Value) -> Result<String, CoreError> {
        body.get("choices")
            .and_then(|c| c.as_array())
            .and_then(|arr| arr.first())
            .and_then(|choice| choice.get("message"))
            .and_then(|msg| msg.get("content"))
            .and_then(|t| t.as_str())
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .ok_or_else(|| {
                CoreError::ModelResponse("OpenAI 응답에서 텍스트를 찾을 수 없음".to_string())
            })
    }

    /// 오류 상태 코드 → 에러 매핑
    fn status_error(status: reqwest::StatusCode, retry_after: Option<u64>, body: &str) -> CoreError {
        let snippet: String = body.chars().take(200).collect();
        match status.as_u16() {
            429 => CoreError::RateLimit {
                retry_after_secs: retry_after.unwrap_or(DEFAULT_RETRY_AFTER_SECS),
            },
            503 => CoreError::ServiceUnavailable(snippet),
            _ => CoreError::Network(format!("비전 모델 API 오류 ({}): {}", status, snippet)),
        }
    }
}

#[async_trait]
impl VisionModel for RemoteVisionModel {
    async fn generate(
        &self,
        prompt: &str,
        image: Option<&VisionImage>,
    ) -> Result<String, CoreError> {
        let url = self.request_url();
        let request_body = self.build_request_body(prompt, image);

        debug!(
            model = %self.model,
            provider = ?self.provider_type,
            image_bytes = image.map_or(0, |i| i.data.len()),
            "외부 비전 모델 API 호출"
        );

        let mut builder = self
            .http_client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&request_body);

        builder = match self.provider_type {
            AiProviderType::Gemini => builder.header("x-goog-api-key", &self.api_key),
            AiProviderType::Anthropic => builder
                .header("x-api-key", &self.api_key)
                .header("anthropic-version", "2023-06-01"),
            AiProviderType::OpenAi => {
                builder.header("Authorization", format!("Bearer {}", self.api_key))
            }
        };

        let response = builder
            .send()
            .await
            .map_err(|e| CoreError::Network(format!("비전 모델 API 호출 실패: {}", e)))?;

        let status = response.status();
        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok());
        let body = response
            .text()
            .await
            .map_err(|e| CoreError::Network(format!("비전 모델 API 응답 읽기 실패: {}", e)))?;

        if !status.is_success() {
            warn!(status = %status, "비전 모델 API 오류 응답");
            return Err(Self::status_error(status, retry_after, &body));
        }

        let json: Value = serde_json::from_str(&body)
            .map_err(|e| CoreError::ModelResponse(format!("응답 JSON 파싱 실패: {}", e)))?;

        let text = match self.provider_type {
            AiProviderType::Gemini => Self::parse_gemini_response(&json)?,
            AiProviderType::Anthropic => Self::parse_claude_response(&json)?,
            AiProviderType::OpenAi => Self::parse_openai_response(&json)?,
        };

        debug!(chars = text.chars().count(), "비전 모델 응답 수신");
        Ok(text)
    }

    fn provider_name(&self) -> &str {
        match self.provider_type {
            AiProviderType::Gemini => "gemini",
            AiProviderType::Anthropic => "anthropic",
            AiProviderType::OpenAi => "openai",
        }
    }
}

// ============================================================
// 테스트
// ============================================================

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn endpoint(url: &str, provider_type: AiProviderType) -> ExternalApiEndpoint {
        ExternalApiEndpoint {
            endpoint: url.to_string(),
            api_key: "test-key".to_string(),
            model: Some("gemini-2.0-flash-lite".to_string()),
            timeout_secs: 5,
            provider_type,
        }
    }

    fn test_image() -> VisionImage {
        VisionImage::jpeg(vec![0xFF, 0xD8, 0xFF, 0xD9])
    }

    #[test]
    fn empty_api_key_rejected() {
        let mut config = endpoint("http://localhost", AiProviderType::Gemini);
        config.api_key = "  ".to_string();
        let err = RemoteVisionModel::new(&config).unwrap_err();
        assert!(err.to_string().contains("미설정"));
    }

    #[test]
    fn missing_model_uses_provider_default() {
        let mut config = endpoint("http://localhost", AiProviderType::Anthropic);
        config.model = None;
        let model = RemoteVisionModel::new(&config).unwrap();
        assert_eq!(model.model(), "claude-sonnet-4-5-20250929");
        assert_eq!(model.provider_name(), "anthropic");
    }

    #[test]
    fn gemini_request_shape() {
        let model =
            RemoteVisionModel::new(&endpoint("http://x/v1beta/models/", AiProviderType::Gemini))
                .unwrap();
        assert_eq!(
            model.request_url(),
            "http://x/v1beta/models/gemini-2.0-flash-lite:generateContent"
        );

        let body = model.build_request_body("describe", Some(&test_image()));
        let parts = &body["contents"][0]["parts"];
        assert_eq!(parts[0]["text"], "describe");
        assert_eq!(parts[1]["inline_data"]["mime_type"], "image/jpeg");
        assert_eq!(parts[1]["inline_data"]["data"], B64.encode([0xFF, 0xD8, 0xFF, 0xD9]));
    }

    #[test]
    fn text_only_request_has_no_image_part() {
        let model =
            RemoteVisionModel::new(&endpoint("http://x", AiProviderType::Gemini)).unwrap();
        let body = model.build_request_body("Say hello", None);
        assert_eq!(body["contents"][0]["parts"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn parse_gemini_concatenates_parts() {
        let body = json!({
            "candidates": [{
                "content": { "parts": [{ "text": "Tomato " }, { "text": "late blight" }] }
            }]
        });
        assert_eq!(
            RemoteVisionModel::parse_gemini_response(&body).unwrap(),
            "Tomato late blight"
        );
    }

    #[test]
    fn parse_gemini_blocked_prompt() {
        let body = json!({ "promptFeedback": { "blockReason": "SAFETY" } });
        let err = RemoteVisionModel::parse_gemini_response(&body).unwrap_err();
        assert!(matches!(err, CoreError::ModelResponse(ref m) if m.contains("SAFETY")));
    }

    #[test]
    fn parse_claude_and_openai() {
        let claude = json!({ "content": [{ "type": "text", "text": "YES 95%" }] });
        assert_eq!(RemoteVisionModel::parse_claude_response(&claude).unwrap(), "YES 95%");

        let openai = json!({ "choices": [{ "message": { "content": "NO 10%" } }] });
        assert_eq!(RemoteVisionModel::parse_openai_response(&openai).unwrap(), "NO 10%");

        let empty = json!({ "choices": [] });
        assert!(RemoteVisionModel::parse_openai_response(&empty).is_err());
    }

    #[tokio::test]
    async fn gemini_generate_success() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/gemini-2.0-flash-lite:generateContent")
            .match_header("x-goog-api-key", "test-key")
            .match_body(Matcher::PartialJson(json!({
                "contents": [{ "parts": [{ "text": "diagnose" }] }]
            })))
            .with_status(200)
            .with_body(r#"{"candidates":[{"content":{"parts":[{"text":"Healthy leaf"}]}}]}"#)
            .create_async()
            .await;

        let model =
            RemoteVisionModel::new(&endpoint(&server.url(), AiProviderType::Gemini)).unwrap();
        let text = model.generate("diagnose", Some(&test_image())).await.unwrap();
        assert_eq!(text, "Healthy leaf");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn rate_limit_429_with_retry_after() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/gemini-2.0-flash-lite:generateContent")
            .with_status(429)
            .with_header("Retry-After", "17")
            .with_body("Resource has been exhausted (e.g. check quota).")
            .create_async()
            .await;

        let model =
            RemoteVisionModel::new(&endpoint(&server.url(), AiProviderType::Gemini)).unwrap();
        let err = model.generate("x", None).await.unwrap_err();
        assert!(matches!(err, CoreError::RateLimit { retry_after_secs: 17 }));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn service_unavailable_503() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", Matcher::Any)
            .with_status(503)
            .with_body("overloaded")
            .create_async()
            .await;

        let model =
            RemoteVisionModel::new(&endpoint(&server.url(), AiProviderType::Gemini)).unwrap();
        let err = model.generate("x", None).await.unwrap_err();
        assert!(matches!(err, CoreError::ServiceUnavailable(_)));
    }

    #[tokio::test]
    async fn bad_request_is_network_error_with_body() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", Matcher::Any)
            .with_status(400)
            .with_body(r#"{"error":{"message":"API key not valid"}}"#)
            .create_async()
            .await;

        let model =
            RemoteVisionModel::new(&endpoint(&server.url(), AiProviderType::Gemini)).unwrap();
        let err = model.generate("x", None).await.unwrap_err();
        assert!(matches!(err, CoreError::Network(ref m) if m.contains("API key not valid")));
    }

    #[tokio::test]
    async fn malformed_body_is_model_response_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", Matcher::Any)
            .with_status(200)
            .with_body("<html>proxy</html>")
            .create_async()
            .await;

        let model =
            RemoteVisionModel::new(&endpoint(&server.url(), AiProviderType::Gemini)).unwrap();
        let err = model.generate("x", None).await.unwrap_err();
        assert!(matches!(err, CoreError::ModelResponse(_)));
    }

    #[tokio::test]
    async fn anthropic_headers_and_parsing() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/messages")
            .match_header("x-api-key", "test-key")
            .match_header("anthropic-version", "2023-06-01")
            .with_status(200)
            .with_body(r#"{"content":[{"type":"text","text":"NO 5%"}]}"#)
            .create_async()
            .await;

        let config = endpoint(
            &format!("{}/v1/messages", server.url()),
            AiProviderType::Anthropic,
        );
        let model = RemoteVisionModel::new(&config).unwrap();
        assert_eq!(model.generate("leaf?", Some(&test_image())).await.unwrap(), "NO 5%");
        mock.assert_async().await;
    }

    #[test]
    fn openai_bearer_request_blocking() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/v1/chat/completions")
            .match_header("authorization", "Bearer test-key")
            .match_body(Matcher::Regex("data:image/jpeg;base64,".to_string()))
            .with_status(200)
            .with_body(r#"{"choices":[{"message":{"content":"YES 90%"}}]}"#)
            .create();

        let config = endpoint(
            &format!("{}/v1/chat/completions", server.url()),
            AiProviderType::OpenAi,
        );
        let model = RemoteVisionModel::new(&config).unwrap();
        let text = tokio_test::block_on(model.generate("leaf?", Some(&test_image()))).unwrap();
        assert_eq!(text, "YES 90%");
        mock.assert();
    }
}
