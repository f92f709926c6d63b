//! 언어 선택자 + 지역화 메시지 테이블.
//!
//! 지원 언어는 닫힌 집합이며, 알 수 없는 언어 식별자는
//! 항상 [`Language::Hindi`]로 폴백한다.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 응답 언어
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Language {
    /// 기본 언어 (폴백)
    #[default]
    Hindi,
    English,
    Punjabi,
    Marathi,
    Gujarati,
    Tamil,
    Telugu,
    Kannada,
    Bengali,
}

impl Language {
    /// 전체 언어 목록
    pub const ALL: [Language; 9] = [
        Language::Hindi,
        Language::English,
        Language::Punjabi,
        Language::Marathi,
        Language::Gujarati,
        Language::Tamil,
        Language::Telugu,
        Language::Kannada,
        Language::Bengali,
    ];

    /// 언어 식별자 (소문자)
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Hindi => "hindi",
            Language::English => "english",
            Language::Punjabi => "punjabi",
            Language::Marathi => "marathi",
            Language::Gujarati => "gujarati",
            Language::Tamil => "tamil",
            Language::Telugu => "telugu",
            Language::Kannada => "kannada",
            Language::Bengali => "bengali",
        }
    }

    /// 식별자 파싱: 미지원 값은 기본 언어로 폴백
    pub fn parse_or_default(value: &str) -> Self {
        value.parse().unwrap_or_default()
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 미지원 언어 식별자
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsupportedLanguage(pub String);

impl FromStr for Language {
    type Err = UnsupportedLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        Language::ALL
            .into_iter()
            .find(|lang| lang.as_str() == normalized)
            .ok_or(UnsupportedLanguage(normalized))
    }
}

impl From<String> for Language {
    fn from(value: String) -> Self {
        Language::parse_or_default(&value)
    }
}

// ============================================================
// 메시지 테이블
// ============================================================

/// 카메라 열기 실패 안내
pub fn camera_error(lang: Language) -> &'static str {
    match lang {
        Language::Hindi => "कैमरा नहीं खुल सका",
        Language::English => "Camera failed to open",
        Language::Punjabi => "ਕੈਮਰਾ ਨਹੀਂ ਖੁੱਲ੍ਹ ਸਕਿਆ",
        Language::Marathi => "कॅमेरा उघडू शकला नाही",
        Language::Gujarati => "કેમેરા ખુલી શક્યો નથી",
        Language::Tamil => "கேமரா திறக்க முடியவில்லை",
        Language::Telugu => "కెమెరా తెరవలేకపోయింది",
        Language::Kannada => "ಕ್ಯಾಮೆರಾ ತೆರೆಯಲು ಸಾಧ್ಯವಾಗಲಿಲ್ಲ",
        Language::Bengali => "ক্যামেরা খোলা যায়নি",
    }
}

/// 잎 위치 조정 안내 (캡처 실패 시 / 미검출 프레임 오버레이)
pub fn position_leaf(lang: Language) -> &'static str {
    match lang {
        Language::Hindi => "कृपया पत्ती को सही से कैमरे के सामने रखें",
        Language::English => "Please hold the leaf properly in front of the camera",
        Language::Punjabi => "ਕਿਰਪਾ ਕਰਕੇ ਪੱਤਾ ਕੈਮਰੇ ਦੇ ਸਾਹਮਣੇ ਠੀਕ ਤਰ੍ਹਾਂ ਰੱਖੋ",
        Language::Marathi => "कृपया पान कॅमेऱ्यासमोर योग्य प्रकारे ठेवा",
        Language::Gujarati => "કૃપા કરીને પાન કેમેરા સામે યોગ્ય રીતે મૂકો",
        Language::Tamil => "தயவுசெய்து இலை கேமரா முன் சரியாக வைக்கவும்",
        Language::Telugu => "దయచేసి ఆకు కెమెరా ముందు సరిగ్గా ఉంచండి",
        Language::Kannada => "ದಯವಿಟ್ಟು ಎಲೆ ಕ್ಯಾಮೆರಾ ಮುಂದೆ ಸರಿಯಾಗಿ ಇರಿಸಿ",
        Language::Bengali => "দয়া করে পাতা ক্যামেরার সামনে সঠিকভাবে রাখুন",
    }
}

/// 진단 실패 일반 메시지
pub fn diagnosis_error(lang: Language) -> &'static str {
    match lang {
        Language::Hindi => "निदान में त्रुटि हुई",
        Language::English => "Diagnosis error occurred",
        Language::Punjabi => "ਨਿਦਾਨ ਵਿੱਚ ਗਲਤੀ ਹੋਈ",
        Language::Marathi => "निदानात त्रुटी झाली",
        Language::Gujarati => "નિદાનમાં ભૂલ થઈ",
        Language::Tamil => "நோயறிதலில் பிழை ஏற்பட்டது",
        Language::Telugu => "నిర్ధారణలో లోపం సంభవించింది",
        Language::Kannada => "ನಿದಾನದಲ್ಲಿ ದೋಷ ಸಂಭವಿಸಿದೆ",
        Language::Bengali => "নির্ণয়ে ত্রুটি হয়েছে",
    }
}

/// 잎 존재 확인 결과 안내
pub fn leaf_check(lang: Language, leaf_found: bool) -> &'static str {
    if leaf_found {
        match lang {
            Language::Hindi => "पत्ती मिल गई, विश्लेषण हो रहा है...",
            Language::English => "Leaf found, analyzing...",
            Language::Punjabi => "ਪੱਤਾ ਮਿਲ ਗਿਆ, ਵਿਸ਼ਲੇਸ਼ਣ ਹੋ ਰਿਹਾ ਹੈ...",
            Language::Marathi => "पान सापडले, विश्लेषण होत आहे...",
            Language::Gujarati => "પાન મળ્યું, વિશ્લેષણ થઈ રહ્યું છે...",
            Language::Tamil => "இலை கிடைத்தது, பகுப்பாய்வு நடக்கிறது...",
            Language::Telugu => "ఆకు దొరికింది, విశ్లేషణ జరుగుతోంది...",
            Language::Kannada => "ಎಲೆ ಸಿಕ್ಕಿತು, ವಿಶ್ಲೇಷಣೆ ನಡೆಯುತ್ತಿದೆ...",
            Language::Bengali => "পাতা পাওয়া গেছে, বিশ্লেষণ হচ্ছে...",
        }
    } else {
        match lang {
            Language::Hindi => "पत्ती को कैमरे के सामने अच्छे से रखिए",
            Language::English => "Please hold the leaf properly in front of camera",
            Language::Punjabi => "ਪੱਤਾ ਕੈਮਰੇ ਦੇ ਸਾਹਮਣੇ ਠੀਕ ਤਰ੍ਹਾਂ ਰੱਖੋ",
            Language::Marathi => "पान कॅमेऱ्यासमोर चांगल्या प्रकारे ठेवा",
            Language::Gujarati => "પાન કેમેરા સામે સારી રીતે મૂકો",
            Language::Tamil => "இலை கேமரா முன் சரியாக வைக்கவும்",
            Language::Telugu => "ఆకు కెమెరా ముందు సరిగ్గా ఉంచండి",
            Language::Kannada => "ಎಲೆ ಕ್ಯಾಮೆರಾ ಮುಂದೆ ಸರಿಯಾಗಿ ಇರಿಸಿ",
            Language::Bengali => "পাতা ক্যামেরার সামনে ভালো করে রাখুন",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_known_languages() {
        assert_eq!("english".parse::<Language>().unwrap(), Language::English);
        assert_eq!(" Tamil ".parse::<Language>().unwrap(), Language::Tamil);
        for lang in Language::ALL {
            assert_eq!(lang.as_str().parse::<Language>().unwrap(), lang);
        }
    }

    #[test]
    fn unknown_language_falls_back_to_hindi() {
        assert!("klingon".parse::<Language>().is_err());
        assert_eq!(Language::parse_or_default("klingon"), Language::Hindi);

        let lang: Language = serde_json::from_str("\"french\"").unwrap();
        assert_eq!(lang, Language::Hindi);
    }

    #[test]
    fn serializes_lowercase() {
        let json = serde_json::to_string(&Language::Bengali).unwrap();
        assert_eq!(json, "\"bengali\"");
    }

    #[test]
    fn every_language_has_every_message() {
        for lang in Language::ALL {
            assert!(!camera_error(lang).is_empty());
            assert!(!position_leaf(lang).is_empty());
            assert!(!diagnosis_error(lang).is_empty());
            assert_ne!(leaf_check(lang, true), leaf_check(lang, false));
        }
    }
}
