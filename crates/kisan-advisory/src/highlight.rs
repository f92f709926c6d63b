//! 에이전트 상태 하이라이트 추출기.
//!
//! 상위 대화 에이전트가 만든 상태 딕셔너리에서 UI 패널에 보여줄
//! 요약 1개를 고른다. 우선순위: 비료 → 농약 → 날씨 → 시장 가격 → 정부 제도.
//!
//! 값의 "비어 있음" 판정은 상위 에이전트의 동적 타입 규칙을 따른다:
//! null, false, 0, "", [], {} 는 비어 있다.
//! 형태가 맞지 않는 상태(예: `market_data`가 리스트가 아님)는 추출 에러로
//! 로그에 남기고 하이라이트 없음으로 처리한다.

use kisan_core::error::CoreError;
use kisan_core::models::highlight::{
    FertilizerHighlight, Highlight, MarketPrice, PesticideHighlight, SchemeHighlight,
};
use serde_json::{Map, Value};
use tracing::{debug, error};

/// 이미지 URL 최대 개수
pub const MAX_IMAGES: usize = 4;

/// 시장 가격 최대 항목 수
pub const MAX_MARKET_ITEMS: usize = 5;

/// 정부 제도 안내 문구
pub const SCHEME_INFO_TEXT: &str = "Government scheme information available";

/// 에이전트 상태에서 하이라이트 추출
///
/// 항상 `None` 또는 하이라이트 1개. 에러를 호출자에게 전파하지 않는다.
pub fn extract_highlight(agent_state: &Value) -> Option<Highlight> {
    match try_extract(agent_state) {
        Ok(highlight) => {
            if let Some(h) = &highlight {
                debug!(kind = h.kind(), "하이라이트 추출");
            }
            highlight
        }
        Err(e) => {
            error!("하이라이트 추출 실패: {e}");
            None
        }
    }
}

fn try_extract(agent_state: &Value) -> Result<Option<Highlight>, CoreError> {
    let state = agent_state
        .as_object()
        .ok_or_else(|| malformed("agent_state", "객체가 아님"))?;

    if let Some(info) = recommendation_source(state, "fertilizer_info")? {
        return Ok(Some(Highlight::Fertilizer(FertilizerHighlight {
            recommendation: text_field(info, "recommendation"),
            crop: text_field(info, "crop"),
            stage: text_field(info, "stage"),
            images: image_urls(state)?,
        })));
    }

    if let Some(info) = recommendation_source(state, "pesticide_info")? {
        return Ok(Some(Highlight::Pesticide(PesticideHighlight {
            recommendation: text_field(info, "recommendation"),
            pest: text_field(info, "pest"),
            crop: text_field(info, "crop"),
            images: image_urls(state)?,
        })));
    }

    if let Some(weather) = state.get("weather_data").filter(|v| is_truthy(v)) {
        return Ok(Some(Highlight::Weather(weather.clone())));
    }

    if let Some(market) = state.get("market_data").filter(|v| is_truthy(v)) {
        let items = market
            .as_array()
            .ok_or_else(|| malformed("market_data", "리스트가 아님"))?;
        let prices = items
            .iter()
            .take(MAX_MARKET_ITEMS)
            .map(market_price)
            .collect::<Result<Vec<_>, _>>()?;
        return Ok(Some(Highlight::MarketPrices(prices)));
    }

    if let Some(schemes) = state.get("government_schemes").filter(|v| is_truthy(v)) {
        return Ok(Some(Highlight::SchemeInfo(SchemeHighlight {
            info: SCHEME_INFO_TEXT.to_string(),
            schemes: schemes.clone(),
        })));
    }

    Ok(None)
}

/// 비료/농약 정보: 비어 있지 않고 `fallback`이 참이 아니면 선택
fn recommendation_source<'a>(
    state: &'a Map<String, Value>,
    key: &str,
) -> Result<Option<&'a Map<String, Value>>, CoreError> {
    let Some(value) = state.get(key).filter(|v| is_truthy(v)) else {
        return Ok(None);
    };
    let info = value
        .as_object()
        .ok_or_else(|| malformed(key, "객체가 아님"))?;

    if info.get("fallback").is_some_and(is_truthy) {
        debug!(key, "fallback 추천은 건너뜀");
        return Ok(None);
    }
    Ok(Some(info))
}

/// `image_urls` 앞 4개
fn image_urls(state: &Map<String, Value>) -> Result<Vec<String>, CoreError> {
    let Some(value) = state.get("image_urls") else {
        return Ok(Vec::new());
    };
    let urls = value
        .as_array()
        .ok_or_else(|| malformed("image_urls", "리스트가 아님"))?;

    urls.iter()
        .take(MAX_IMAGES)
        .map(|u| {
            u.as_str()
                .map(str::to_string)
                .ok_or_else(|| malformed("image_urls", "문자열이 아닌 항목"))
        })
        .collect()
}

/// 시장 가격 항목 1개 축약
fn market_price(item: &Value) -> Result<MarketPrice, CoreError> {
    let obj = item
        .as_object()
        .ok_or_else(|| malformed("market_data", "객체가 아닌 항목"))?;

    Ok(MarketPrice {
        commodity: obj
            .get("commodity")
            .map(value_text)
            .unwrap_or_else(|| "Unknown".to_string()),
        price: obj.get("modal_price").cloned().unwrap_or(Value::from(0)),
        market: text_field(obj, "market"),
    })
}

/// 문자열 필드 (없으면 빈 문자열)
fn text_field(obj: &Map<String, Value>, key: &str) -> String {
    obj.get(key).map(value_text).unwrap_or_default()
}

/// 문자열은 그대로, null은 빈 문자열, 그 외는 JSON 표기
fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// 동적 타입 참/거짓 판정
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

fn malformed(field: &str, message: &str) -> CoreError {
    CoreError::Validation {
        field: field.to_string(),
        message: message.to_string(),
    }
}
