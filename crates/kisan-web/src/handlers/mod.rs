//! API 핸들러 모듈.

pub mod avatar;
pub mod disease;
pub mod health;
pub mod highlight;
