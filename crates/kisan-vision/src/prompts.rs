//! 비전 모델 지시문 테이블.
//!
//! 언어별 진단 지시문은 동일한 6개 항목(작물명, 병해충 여부, 병명/증상,
//! 심각도, 유기농/화학 처방, 예방)을 묻고 150단어 제한과
//! 별표 사용 금지를 명시한다.

use kisan_core::locale::Language;

/// 잎 존재 확인 지시문: 응답 형식 `YES nn%` / `NO nn%`
pub const LEAF_CHECK_PROMPT: &str = "Is there a plant leaf visible in this image? \
Answer with ONLY \"YES\" or \"NO\" followed by confidence percentage.\n\
Format: YES 95% or NO 10%";

/// 모델 연결 확인용 텍스트 지시문
pub const SMOKE_TEST_PROMPT: &str = "Say hello in Hindi";

/// 언어별 병해 진단 지시문
pub fn diagnosis_prompt(lang: Language) -> &'static str {
    match lang {
        Language::Hindi => HINDI,
        Language::English => ENGLISH,
        Language::Punjabi => PUNJABI,
        Language::Marathi => MARATHI,
        Language::Gujarati => GUJARATI,
        Language::Tamil => TAMIL,
        Language::Telugu => TELUGU,
        Language::Kannada => KANNADA,
        Language::Bengali => BENGALI,
    }
}

const HINDI: &str = "आप एक विशेषज्ञ कृषि रोग विशेषज्ञ हैं। इस पत्ती की तस्वीर का विश्लेषण करें और बताएं:

1. फसल का नाम (अगर पहचान सकें)
2. क्या कोई बीमारी या कीट का संक्रमण है?
3. बीमारी का नाम और लक्षण
4. गंभीरता स्तर (कम, मध्यम, उच्च)
5. उपचार के तरीके (जैविक और रासायनिक दोनों)
6. रोकथाम के उपाय

सरल हिंदी में जवाब दें जो किसान आसानी से समझ सकें। अधिकतम 150 शब्दों में।

Note: Do not use any astericks for emphasis or formating.";

const ENGLISH: &str = "You are an expert agricultural disease specialist. Analyze this leaf image and provide:

1. Crop name (if identifiable)
2. Is there any disease or pest infestation?
3. Disease name and symptoms
4. Severity level (low, medium, high)
5. Treatment methods (both organic and chemical)
6. Prevention measures

Provide response in simple language that farmers can easily understand. Maximum 150 words.

Note: Do not use any astericks for emphasis or formating.";

const PUNJABI: &str = "ਤੁਸੀਂ ਇੱਕ ਮਾਹਿਰ ਖੇਤੀ ਰੋਗ ਵਿਸ਼ੇਸ਼ਗ ਹੋ। ਇਸ ਪੱਤੇ ਦੀ ਤਸਵੀਰ ਦਾ ਵਿਸ਼ਲੇਸ਼ਣ ਕਰੋ ਅਤੇ ਦੱਸੋ:

1. ਫਸਲ ਦਾ ਨਾਮ (ਜੇ ਪਛਾਣ ਸਕੋ)
2. ਕੀ ਕੋਈ ਬੀਮਾਰੀ ਜਾਂ ਕੀੜੇ ਦਾ ਸੰਕਰਮਣ ਹੈ?
3. ਬੀਮਾਰੀ ਦਾ ਨਾਮ ਅਤੇ ਲੱਛਣ
4. ਗੰਭੀਰਤਾ ਦਾ ਪੱਧਰ (ਘੱਟ, ਮੱਧਮ, ਉੱਚ)
5. ਇਲਾਜ ਦੇ ਤਰੀਕੇ (ਜੈਵਿਕ ਅਤੇ ਰਸਾਇਣਿਕ ਦੋਵੇਂ)
6. ਰੋਕਥਾਮ ਦੇ ਉਪਾਅ

ਸਰਲ ਪੰਜਾਬੀ ਵਿੱਚ ਜਵਾਬ ਦਿਓ ਜੋ ਕਿਸਾਨ ਆਸਾਨੀ ਨਾਲ ਸਮਝ ਸਕਣ। ਵੱਧ ਤੋਂ ਵੱਧ 150 ਸ਼ਬਦ।

ਨੋਟ: ਜ਼ੋਰ ਦੇਣ ਜਾਂ ਫਾਰਮੈਟਿੰਗ ਲਈ ਕਿਸੇ ਵੀ ਤਾਰਾਂਕਨ ਚਿੰਨ੍ਹ ਦਾ ਉਪਯੋਗ ਨਾ ਕਰੋ।";

const MARATHI: &str = "तुम्ही एक तज्ञ शेती रोग तज्ञ आहात. या पानाच्या चित्राचे विश्लेषण करा आणि सांगा:

1. पिकाचे नाव (ओळखल्यास)
2. काही रोग किंवा कीटकांचे संसर्ग आहे का?
3. रोगाचे नाव आणि लक्षणे
4. गंभीरता पातळी (कमी, मध्यम, उच्च)
5. उपचार पद्धती (जैविक आणि रासायनिक दोन्ही)
6. प्रतिबंध उपाय

सोप्या मराठीत उत्तर द्या जे शेतकरी सहज समजू शकतात. जास्तीत जास्त 150 शब्द.

Note: Do not use any astericks for emphasis or formating.";

const GUJARATI: &str = "તમે એક નિષ્ણાત કૃષિ રોગ નિષ્ણાત છો. આ પાનની છબીનું વિશ્લેષણ કરો અને કહો:

1. પાકનું નામ (ઓળખી શકાય તો)
2. કોઈ રોગ અથવા કીટકોનું ચેપ છે?
3. રોગનું નામ અને લક્ષણો
4. ગંભીરતા સ્તર (નીચું, મધ્યમ, ઉચ્ચ)
5. સારવાર પદ્ધતિઓ (જૈવિક અને રાસાયણિક બંને)
6. અટકાવ ઉપાયો

સરળ ગુજરાતીમાં જવાબ આપો જે ખેડૂતો સહેલાઈથી સમજી શકે. મહત્તમ 150 શબ્દો.

નોંધ: ભાર આપવા અથવા ફોર્મેટિંગ માટે કોઈપણ તારાંકન ચિહ્નનો ઉપયોગ ન કરો.";

const TAMIL: &str = "நீங்கள் ஒரு நிபுணர் விவசாய நோய் நிபுணர். இந்த இலையின் படத்தை பகுப்பாய்வு செய்து சொல்லுங்கள்:

1. பயிரின் பெயர் (அடையாளம் காண முடிந்தால்)
2. ஏதேனும் நோய் அல்லது பூச்சி தொற்று உள்ளதா?
3. நோயின் பெயர் மற்றும் அறிகுறிகள்
4. தீவிரம் நிலை (குறைந்த, நடுத்தர, உயர்)
5. சிகிச்சை முறைகள் (ஜீவ மற்றும் வேதியியல் இரண்டும்)
6. தடுப்பு நடவடிக்கைகள்

விவசாயிகள் எளிதில் புரிந்துகொள்ளக்கூடிய எளிய தமிழில் பதிலளிக்கவும். அதிகபட்சம் 150 சொற்கள்.

குறிப்பு: வலியுறுத்தல் அல்லது வடிவமைப்புக்கு எந்தவிதமான நட்சத்திர குறியீடுகளையும் பயன்படுத்த வேண்டாம்.";

const TELUGU: &str = "మీరు ఒక నిపుణుడు వ్యవసాయ వ్యాధి నిపుణుడు. ఈ ఆకు చిత్రాన్ని విశ్లేషించి చెప్పండి:

1. పంట పేరు (గుర్తించగలిగితే)
2. ఏదైనా వ్యాధి లేదా కీటక సంక్రమణ ఉందా?
3. వ్యాధి పేరు మరియు లక్షణాలు
4. తీవ్రత స్థాయి (తక్కువ, మధ్యమ, ఎక్కువ)
5. చికిత్సా పద్ధతులు (జీవ మరియు రసాయన రెండూ)
6. నివారణ చర్యలు

రైతులు సులభంగా అర్థం చేసుకోగలిగే సరళ తెలుగులో సమాధానం ఇవ్వండి. గరిష్ఠ 150 పదాలు.

గమనిక: ఊదడం లేదా ఫార్మాటింగ్ కోసం ఏదైనా నక్షత్ర చిహ్నాలను ఉపయోగించవద్దు.";

const KANNADA: &str = "ನೀವು ಒಬ್ಬ ನಿಪುಣ ಕೃಷಿ ರೋಗ ನಿಪುಣ. ಈ ಎಲೆಯ ಚಿತ್ರವನ್ನು ವಿಶ್ಲೇಷಿಸಿ ಮತ್ತು ಹೇಳಿ:

1. ಬೆಳೆಯ ಹೆಸರು (ಗುರುತಿಸಬಹುದಾದರೆ)
2. ಯಾವುದೇ ರೋಗ ಅಥವಾ ಕೀಟ ಸೋಂಕು ಇದೆಯೇ?
3. ರೋಗದ ಹೆಸರು ಮತ್ತು ಲಕ್ಷಣಗಳು
4. ತೀವ್ರತೆ ಮಟ್ಟ (ಕಡಿಮೆ, ಮಧ್ಯಮ, ಹೆಚ್ಚು)
5. ಚಿಕಿತ್ಸಾ ವಿಧಾನಗಳು (ಜೈವಿಕ ಮತ್ತು ರಾಸಾಯನಿಕ ಎರಡೂ)
6. ತಡೆಗಟ್ಟುವ ಕ್ರಮಗಳು

ರೈತರು ಸುಲಭವಾಗಿ ಅರ್ಥಮಾಡಿಕೊಳ್ಳಬಹುದಾದ ಸರಳ ಕನ್ನಡದಲ್ಲಿ ಉತ್ತರಿಸಿ. ಗರಿಷ್ಠ 150 ಪದಗಳು.

ಗಮನಿಸಿ: ಒತ್ತು ನೀಡುವುದು ಅಥವಾ ಫಾರ್ಮ್ಯಾಟಿಂಗ್ ಗಾಗಿ ಯಾವುದೇ ನಕ್ಷತ್ರ ಚಿಹ್ನೆಗಳನ್ನು ಬಳಸಬೇಡಿ.";

const BENGALI: &str = "আপনি একজন বিশেষজ্ঞ কৃষি রোগ বিশেষজ্ঞ। এই পাতার ছবি বিশ্লেষণ করুন এবং বলুন:

1. ফসলের নাম (চিহ্নিত করতে পারলে)
2. কোন রোগ বা পোকামাকড়ের সংক্রমণ আছে?
3. রোগের নাম এবং লক্ষণ
4. তীব্রতা স্তর (নিম্ন, মাঝারি, উচ্চ)
5. চিকিৎসা পদ্ধতি (জৈব এবং রাসায়নিক উভয়)
6. প্রতিরোধ ব্যবস্থা

সহজ বাংলায় উত্তর দিন যা কৃষকরা সহজেই বুঝতে পারে। সর্বোচ্চ ১৫০ শব্দ।

নোট: জোর দেওয়া বা ফরম্যাটিং এর জন্য কোন তারকা চিহ্ন ব্যবহার করবেন না।";
