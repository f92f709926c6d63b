//! # kisan-advisory
//!
//! 대화형 농업 도우미의 응답 보조 기능.
//!
//! - [`highlight`]: 상위 에이전트 상태에서 UI 패널용 하이라이트 1개 추출
//! - [`avatar`]: TTS 오디오를 아바타 메타데이터 봉투로 감싸기

pub mod avatar;
pub mod highlight;
