//! # kisan-web
//!
//! 병해 진단 / 아바타 응답 HTTP API 서버.
//! Axum 기반 REST API.
//!
//! ## 기능
//! - 카메라 캡처 → 잎 검출 → 병해 진단
//! - 업로드 이미지 진단 및 잎 존재 확인
//! - 아바타 응답 봉투 + 에이전트 상태 하이라이트

pub mod error;
pub mod handlers;
pub mod routes;

use std::io;
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;

use axum::Router;
use kisan_advisory::avatar::AvatarService;
use kisan_core::config::{AppConfig, WebConfig};
use kisan_core::locale::Language;
use kisan_core::ports::camera::CameraProvider;
use kisan_core::ports::vision_model::VisionModel;
use kisan_vision::capture::CaptureLoop;
use kisan_vision::detector::LeafDetector;
use kisan_vision::diagnosis::DiagnosisClient;
use kisan_vision::encoder::ImageEncoder;
use tokio::net::TcpListener;
use tokio::sync::{watch, Mutex};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// 포트 바인드 최대 시도 횟수
const MAX_PORT_ATTEMPTS: u16 = 10;

/// 웹 서버 애플리케이션 상태
#[derive(Clone)]
pub struct AppState {
    /// 애플리케이션 설정 (시작 시점 스냅샷)
    pub config: Arc<AppConfig>,
    /// 병해 진단 클라이언트
    pub diagnosis: DiagnosisClient,
    /// 캡처 루프
    pub capture: CaptureLoop,
    /// 아바타 서비스
    pub avatar: AvatarService,
    /// 카메라 세션 직렬화: 장치 소비자는 항상 1개
    pub camera_session: Arc<Mutex<()>>,
}

impl AppState {
    /// 설정과 어댑터로 상태 구성
    pub fn new(
        config: AppConfig,
        model: Arc<dyn VisionModel>,
        camera: Arc<dyn CameraProvider>,
    ) -> Self {
        let diagnosis = DiagnosisClient::new(model, ImageEncoder::new(&config.encoding));
        let capture = CaptureLoop::new(
            camera,
            LeafDetector::new(config.detector.clone()),
            config.capture.clone(),
        );
        let avatar = AvatarService::new(&config.avatar);

        Self {
            config: Arc::new(config),
            diagnosis,
            capture,
            avatar,
            camera_session: Arc::new(Mutex::new(())),
        }
    }

    /// 요청 언어 (없으면 설정 기본 언어)
    pub fn language_or_default(&self, language: Option<Language>) -> Language {
        language.unwrap_or(self.config.default_language)
    }
}

/// HTTP API 서버
pub struct WebServer {
    config: WebConfig,
    state: AppState,
}

impl WebServer {
    /// 새 웹 서버 생성
    pub fn new(state: AppState) -> Self {
        Self {
            config: state.config.web.clone(),
            state,
        }
    }

    /// 라우터 구성 (CORS + 요청 추적)
    pub fn router(state: AppState) -> Router {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        Router::new()
            .nest("/api", routes::api_routes())
            .layer(cors)
            .layer(TraceLayer::new_for_http())
            .with_state(state)
    }

    /// 서버 실행
    ///
    /// 설정 포트가 사용 중이면 다음 포트를 최대 10개까지 시도한다.
    /// `shutdown_rx`가 true가 되면 진행 중인 요청을 마치고 종료한다.
    pub async fn run(self, shutdown_rx: watch::Receiver<bool>) -> Result<(), io::Error> {
        let ip = if self.config.allow_external {
            Ipv4Addr::UNSPECIFIED
        } else {
            Ipv4Addr::LOCALHOST
        };
        let listener = bind_first_free(ip, self.config.port).await?;
        info!("API 서버 시작: http://{}", listener.local_addr()?);

        axum::serve(listener, Self::router(self.state))
            .with_graceful_shutdown(wait_for_shutdown(shutdown_rx))
            .await?;

        info!("API 서버 종료");
        Ok(())
    }

    /// 서버 URL 반환
    pub fn url(&self) -> String {
        format!("http://localhost:{}", self.config.port)
    }
}

/// 시도할 포트 목록 (u16 끝에서 잘림)
fn candidate_ports(base: u16) -> impl Iterator<Item = u16> {
    (0..MAX_PORT_ATTEMPTS).map_while(move |offset| base.checked_add(offset))
}

async fn bind_first_free(ip: Ipv4Addr, base_port: u16) -> Result<TcpListener, io::Error> {
    let mut last_error = None;

    for port in candidate_ports(base_port) {
        match TcpListener::bind(SocketAddr::from((ip, port))).await {
            Ok(listener) => {
                if port != base_port {
                    warn!("포트 {base_port} 사용 불가, 대체 포트 {port} 사용");
                }
                return Ok(listener);
            }
            Err(e) if e.kind() == io::ErrorKind::AddrInUse => {
                warn!("포트 {port} 이미 사용 중");
                last_error = Some(e);
            }
            Err(e) => return Err(e),
        }
    }

    Err(last_error.unwrap_or_else(|| {
        io::Error::new(io::ErrorKind::AddrInUse, format!("포트 {base_port}부터 바인드 실패"))
    }))
}

/// 종료 값이 true가 되거나 송신자가 사라질 때까지 대기
async fn wait_for_shutdown(mut shutdown_rx: watch::Receiver<bool>) {
    if shutdown_rx.wait_for(|stop| *stop).await.is_ok() {
        info!("API 서버 종료 신호 수신");
    }
}
