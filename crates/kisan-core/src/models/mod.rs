//! Kisan 도메인 모델.
//!
//! 웹/모바일 호출자에게 반환되는 데이터 구조체를 정의한다.
//! 모든 모델은 `serde` Serialize를 구현한다.

pub mod avatar;
pub mod diagnosis;
pub mod frame;
pub mod highlight;
