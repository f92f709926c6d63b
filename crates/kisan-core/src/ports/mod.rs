//! 포트 인터페이스 (trait).
//!
//! Hexagonal Architecture의 포트 레이어.
//! 각 어댑터 crate가 이 trait들을 구현하며,
//! `kisan-app`에서 `Arc<dyn T>`로 와이어링한다.
//!
//! 전역 싱글톤 대신 명시적으로 생성해 주입하므로
//! 테스트에서는 가짜 구현으로 대체할 수 있다.

pub mod camera;
pub mod vision_model;
