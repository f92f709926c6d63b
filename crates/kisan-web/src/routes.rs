//! API 라우트 정의.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers;
use crate::AppState;

/// API 라우트 생성
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // 상태 확인
        .route("/health", get(handlers::health::get_health))
        // 병해 진단
        .route(
            "/disease/camera",
            post(handlers::disease::diagnose_from_camera),
        )
        .route(
            "/disease/diagnose",
            post(handlers::disease::diagnose_upload),
        )
        .route("/disease/leaf-check", post(handlers::disease::check_leaf))
        // 아바타
        .route(
            "/avatar/response",
            post(handlers::avatar::create_avatar_response),
        )
        .route("/avatar/{id}", get(handlers::avatar::get_avatar))
        // 에이전트 상태 하이라이트
        .route("/highlight", post(handlers::highlight::extract))
}
