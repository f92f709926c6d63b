//! # kisan-network
//!
//! 외부 비전-언어 모델 네트워크 어댑터.
//! [`VisionModel`](kisan_core::ports::vision_model::VisionModel) 포트를
//! reqwest 기반 HTTP 클라이언트로 구현한다.

pub mod vision_client;
