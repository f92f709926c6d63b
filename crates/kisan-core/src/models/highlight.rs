//! 하이라이트 페이로드 모델.
//!
//! 상위 에이전트 상태에서 추출하여 UI 패널에 표시하는 요약 데이터.
//! 직렬화 형식: `{"type": "...", "data": ...}`

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 하이라이트 페이로드 (태그드 유니온)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum Highlight {
    /// 비료 추천
    Fertilizer(FertilizerHighlight),
    /// 농약 추천
    Pesticide(PesticideHighlight),
    /// 날씨 데이터 (에이전트가 준 형태 그대로)
    Weather(Value),
    /// 시장 가격 (상위 5개)
    MarketPrices(Vec<MarketPrice>),
    /// 정부 지원 제도
    SchemeInfo(SchemeHighlight),
}

impl Highlight {
    /// 직렬화 태그 이름
    pub fn kind(&self) -> &'static str {
        match self {
            Highlight::Fertilizer(_) => "fertilizer",
            Highlight::Pesticide(_) => "pesticide",
            Highlight::Weather(_) => "weather",
            Highlight::MarketPrices(_) => "market_prices",
            Highlight::SchemeInfo(_) => "scheme_info",
        }
    }
}

/// 비료 추천 요약
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FertilizerHighlight {
    pub recommendation: String,
    pub crop: String,
    pub stage: String,
    /// 참고 이미지 URL (최대 4개)
    pub images: Vec<String>,
}

/// 농약 추천 요약
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PesticideHighlight {
    pub recommendation: String,
    pub pest: String,
    pub crop: String,
    /// 참고 이미지 URL (최대 4개)
    pub images: Vec<String>,
}

/// 시장 가격 항목 (commodity/price/market 만 유지)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketPrice {
    pub commodity: String,
    /// 원본 `modal_price` (숫자 또는 문자열)
    pub price: Value,
    pub market: String,
}

/// 정부 지원 제도 요약
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemeHighlight {
    pub info: String,
    pub schemes: Value,
}
