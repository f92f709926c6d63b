//! 외부 비전 모델 연동 통합 테스트.
//!
//! 진단 클라이언트 → RemoteVisionModel → mockito Gemini 서버.

use std::sync::Arc;

use image::{Rgb, RgbImage};
use kisan_core::config::ExternalApiEndpoint;
use kisan_core::locale::Language;
use kisan_core::models::diagnosis::FailureKind;
use kisan_network::vision_client::RemoteVisionModel;
use kisan_vision::diagnosis::DiagnosisClient;
use kisan_vision::encoder::ImageEncoder;
use mockito::Matcher;

const GENERATE_PATH: &str = "/gemini-2.0-flash-lite:generateContent";

fn make_client(endpoint: String) -> DiagnosisClient {
    let config = ExternalApiEndpoint {
        endpoint,
        api_key: "test-gemini-key".to_string(),
        ..Default::default()
    };
    let model = RemoteVisionModel::new(&config).unwrap();
    DiagnosisClient::new(Arc::new(model), ImageEncoder::default())
}

fn leaf_base64(client: &DiagnosisClient) -> String {
    let image = RgbImage::from_pixel(64, 48, Rgb([45, 140, 50]));
    client.encoder().encode_base64(&image).unwrap()
}

#[tokio::test]
async fn upload_diagnosis_sends_image_and_key() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", GENERATE_PATH)
        .match_header("x-goog-api-key", "test-gemini-key")
        .match_body(Matcher::Regex(r#""mime_type":"image/jpeg""#.to_string()))
        .with_status(200)
        .with_body(
            r#"{"candidates":[{"content":{"parts":[{"text":"Crop: Wheat. "},{"text":"Disease: Leaf rust."}]}}]}"#,
        )
        .create_async()
        .await;

    let client = make_client(server.url());
    let report = client
        .diagnose_base64(&leaf_base64(&client), Language::English, false)
        .await
        .unwrap();

    assert!(report.success);
    assert_eq!(report.diagnosis.as_deref(), Some("Crop: Wheat. Disease: Leaf rust."));
    mock.assert_async().await;
}

#[tokio::test]
async fn precheck_no_leaf_skips_diagnosis() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", GENERATE_PATH)
        .with_status(200)
        .with_body(r#"{"candidates":[{"content":{"parts":[{"text":"NO 5%"}]}}]}"#)
        .expect(1)
        .create_async()
        .await;

    let client = make_client(server.url());
    let report = client
        .diagnose_base64(&leaf_base64(&client), Language::Gujarati, true)
        .await
        .unwrap();

    assert!(!report.success);
    assert_eq!(report.error, Some(FailureKind::LeafNotDetected));
    mock.assert_async().await;
}

#[tokio::test]
async fn quota_error_is_hidden_behind_localized_text() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", GENERATE_PATH)
        .with_status(429)
        .with_header("retry-after", "17")
        .with_body(r#"{"error":{"message":"Resource has been exhausted (e.g. check quota)."}}"#)
        .create_async()
        .await;

    let client = make_client(server.url());
    let report = client
        .diagnose_base64(&leaf_base64(&client), Language::Bengali, false)
        .await
        .unwrap();

    assert!(!report.success);
    assert_eq!(report.error, Some(FailureKind::DiagnosisFailed));
    assert_eq!(report.diagnosis.as_deref(), Some("নির্ণয়ে ত্রুটি হয়েছে"));

    let json = serde_json::to_string(&report).unwrap();
    assert!(!json.contains("quota"));
    assert!(json.contains("Diagnosis error occurred"));
}

#[tokio::test]
async fn blocked_prompt_fails_leaf_check() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", GENERATE_PATH)
        .with_status(200)
        .with_body(r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#)
        .create_async()
        .await;

    let client = make_client(server.url());
    let image = RgbImage::from_pixel(32, 32, Rgb([45, 140, 50]));
    let report = client.check_leaf_present(&image, Language::English).await;

    assert!(!report.success);
    assert_eq!(report.error, Some(FailureKind::LeafCheckFailed));
}
