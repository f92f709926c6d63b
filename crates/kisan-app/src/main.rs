//! # kisan-app
//!
//! Kisan 바이너리 진입점.
//! 설정 로드, 어댑터 와이어링, 서브커맨드 실행.

mod lifecycle;
mod model_check;
mod wiring;

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use kisan_core::config::AppConfig;
use kisan_core::config_manager::ConfigManager;
use kisan_core::locale::Language;
use kisan_vision::capture::{CaptureLoop, CaptureRequest, TracingObserver};
use kisan_vision::detector::LeafDetector;
use kisan_vision::diagnosis::DiagnosisClient;
use kisan_vision::encoder::ImageEncoder;
use kisan_web::{AppState, WebServer};
use serde::Serialize;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::lifecycle::LifecycleManager;

/// Kisan 농업 도우미 백엔드
///
/// 카메라 잎 검출 + 비전 모델 병해 진단, 아바타 응답 API
#[derive(Parser, Debug)]
#[command(name = "kisan")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// 로그 레벨 (trace, debug, info, warn, error)
    #[arg(long, short = 'l', default_value = "info", global = true)]
    log_level: String,

    /// 설정 파일 경로 (기본: 플랫폼 설정 디렉토리의 config.json)
    #[arg(long, short = 'c', global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// HTTP API 서버 실행
    Serve {
        /// 포트 (기본: 설정값)
        #[arg(long, short = 'p')]
        port: Option<u16>,
        /// 외부 접근 허용 (0.0.0.0 바인드)
        #[arg(long)]
        allow_external: bool,
        /// 카메라 대신 재생할 이미지 디렉토리
        #[arg(long)]
        frames_dir: Option<PathBuf>,
    },
    /// 카메라로 잎을 찾아 진단
    Capture {
        #[arg(long)]
        camera_index: Option<u32>,
        /// 타임아웃 (초)
        #[arg(long)]
        timeout: Option<f64>,
        /// 응답 언어 (hindi, english, punjabi, ...)
        #[arg(long)]
        language: Option<String>,
        /// 카메라 대신 재생할 이미지 디렉토리
        #[arg(long)]
        frames_dir: Option<PathBuf>,
    },
    /// 이미지 파일 진단
    Diagnose {
        image: PathBuf,
        #[arg(long)]
        language: Option<String>,
        /// 진단 전에 잎 존재 여부 확인
        #[arg(long)]
        precheck: bool,
    },
    /// 이미지에 잎이 있는지 확인
    CheckLeaf {
        image: PathBuf,
        #[arg(long)]
        language: Option<String>,
    },
    /// 비전 모델 API 키/모델 확인
    CheckModel,
}

/// 설정 로드 (파일 → 환경 변수)
fn load_config(path: Option<PathBuf>) -> Result<AppConfig> {
    let manager = match path {
        Some(path) => ConfigManager::with_path(path),
        None => ConfigManager::new(),
    }
    .context("설정 로드 실패")?;

    info!("설정 파일: {}", manager.config_path().display());
    let mut config = manager.get();
    config.apply_env_overrides();
    Ok(config)
}

fn resolve_language(config: &AppConfig, language: Option<&str>) -> Language {
    language.map_or(config.default_language, Language::parse_or_default)
}

fn diagnosis_client(config: &AppConfig) -> DiagnosisClient {
    DiagnosisClient::new(
        wiring::build_vision_model(&config.vision_model),
        ImageEncoder::new(&config.encoding),
    )
}

fn open_image(path: &Path) -> Result<image::RgbImage> {
    let image = image::open(path).with_context(|| format!("이미지 열기 실패: {}", path.display()))?;
    Ok(image.to_rgb8())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn serve(
    mut config: AppConfig,
    port: Option<u16>,
    allow_external: bool,
    frames_dir: Option<PathBuf>,
) -> Result<()> {
    if let Some(port) = port {
        config.web.port = port;
    }
    config.web.allow_external |= allow_external;

    let model = wiring::build_vision_model(&config.vision_model);
    let camera = wiring::build_camera(frames_dir.as_deref());
    let server = WebServer::new(AppState::new(config, model, camera));
    info!("API 서버 주소: {}", server.url());

    let lifecycle = LifecycleManager::new();
    let server_task = tokio::spawn(server.run(lifecycle.subscribe()));

    lifecycle.wait_for_signal().await;

    match server_task.await {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => Err(e).context("API 서버 실행 실패"),
        Err(e) => Err(e).context("API 서버 작업 실패"),
    }
}

async fn capture(
    config: AppConfig,
    camera_index: Option<u32>,
    timeout: Option<f64>,
    language: Option<String>,
    frames_dir: Option<PathBuf>,
) -> Result<bool> {
    let language = resolve_language(&config, language.as_deref());
    let mut request = CaptureRequest::from_config(&config.capture, language);
    if let Some(index) = camera_index {
        request.camera_index = index;
    }
    if let Some(secs) = timeout {
        request.timeout = Duration::try_from_secs_f64(secs)
            .with_context(|| format!("잘못된 타임아웃: {secs}"))?;
    }

    let client = diagnosis_client(&config);
    let capture_loop = CaptureLoop::new(
        wiring::build_camera(frames_dir.as_deref()),
        LeafDetector::new(config.detector.clone()),
        config.capture.clone(),
    );

    info!(
        camera = capture_loop.camera_name(),
        index = request.camera_index,
        "잎을 카메라 앞에 대 주세요"
    );
    let mut observer = TracingObserver::new(language);
    let report = capture_loop
        .capture_and_diagnose(&client, &request, Some(&mut observer))
        .await;

    print_json(&report)?;
    Ok(report.success)
}

async fn diagnose(
    config: AppConfig,
    image: PathBuf,
    language: Option<String>,
    precheck: bool,
) -> Result<bool> {
    let language = resolve_language(&config, language.as_deref());
    let image = open_image(&image)?;

    let report = diagnosis_client(&config)
        .diagnose_checked(&image, language, precheck)
        .await;

    print_json(&report)?;
    Ok(report.success)
}

async fn check_leaf(config: AppConfig, image: PathBuf, language: Option<String>) -> Result<bool> {
    let language = resolve_language(&config, language.as_deref());
    let image = open_image(&image)?;

    let report = diagnosis_client(&config)
        .check_leaf_present(&image, language)
        .await;

    print_json(&report)?;
    Ok(report.success)
}

async fn check_model(config: AppConfig) -> Result<bool> {
    let endpoint = &config.vision_model;
    println!("비전 모델 연결 확인");
    println!("{}", "=".repeat(60));

    if endpoint.api_key.is_empty() {
        println!("ERROR: API 키 미설정");
        println!("   config.json의 vision_model.api_key 또는 GEMINI_API_KEY 환경 변수를 설정하세요");
        return Ok(false);
    }
    println!("OK - API 키: {}", model_check::mask_api_key(&endpoint.api_key));

    let model = match kisan_network::vision_client::RemoteVisionModel::new(endpoint) {
        Ok(model) => model,
        Err(e) => {
            println!("ERROR: {e}");
            return Ok(false);
        }
    };
    println!("모델: {} ({:?})", model.model(), endpoint.provider_type);

    match model_check::run_smoke_test(&model).await {
        Ok(reply) => {
            println!("OK - 응답: {reply}");
            println!("SUCCESS - 비전 모델 확인 완료");
            Ok(true)
        }
        Err(e) => {
            println!("ERROR: {e}");
            if let Some(hint) = model_check::failure_hint(&e) {
                println!("   → {hint}");
            }
            Ok(false)
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_filter = format!(
        "kisan={level},kisan_app={level},kisan_core={level},kisan_vision={level},kisan_network={level},kisan_advisory={level},kisan_web={level},tower_http={level}",
        level = cli.log_level
    );
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_filter)),
        )
        .init();

    let config = load_config(cli.config)?;

    let succeeded = match cli.command {
        Command::Serve {
            port,
            allow_external,
            frames_dir,
        } => {
            serve(config, port, allow_external, frames_dir).await?;
            true
        }
        Command::Capture {
            camera_index,
            timeout,
            language,
            frames_dir,
        } => capture(config, camera_index, timeout, language, frames_dir).await?,
        Command::Diagnose {
            image,
            language,
            precheck,
        } => diagnose(config, image, language, precheck).await?,
        Command::CheckLeaf { image, language } => check_leaf(config, image, language).await?,
        Command::CheckModel => check_model(config).await?,
    };

    if !succeeded {
        error!("명령 실패");
        std::process::exit(1);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn capture_flags_parse() {
        let cli = Cli::try_parse_from([
            "kisan",
            "--log-level",
            "debug",
            "capture",
            "--camera-index",
            "1",
            "--timeout",
            "2.5",
            "--language",
            "tamil",
        ])
        .unwrap();

        assert_eq!(cli.log_level, "debug");
        let Command::Capture {
            camera_index,
            timeout,
            language,
            frames_dir,
        } = cli.command
        else {
            panic!("capture 서브커맨드여야 함");
        };
        assert_eq!(camera_index, Some(1));
        assert_eq!(timeout, Some(2.5));
        assert_eq!(language.as_deref(), Some("tamil"));
        assert!(frames_dir.is_none());
    }

    #[test]
    fn language_resolution() {
        let config = AppConfig::default_config();
        assert_eq!(resolve_language(&config, None), Language::Hindi);
        assert_eq!(resolve_language(&config, Some("English")), Language::English);
        assert_eq!(resolve_language(&config, Some("esperanto")), Language::Hindi);
    }

    #[test]
    fn load_config_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kisan").join("config.json");
        let config = load_config(Some(path.clone())).unwrap();
        assert!(path.exists());
        assert_eq!(config.capture.frame_skip, 3);
    }
}
