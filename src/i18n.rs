//! Static bilingual string table (English / Urdu).
//!
//! Keys are an enum and every language is an exhaustive `match`, so a
//! missing translation fails to compile instead of failing a request.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ═══════════════════════════════════════════════════════════
// Language
// ═══════════════════════════════════════════════════════════

/// Display language selected on the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// English (primary).
    #[default]
    En,
    /// Urdu (secondary, right-to-left).
    Ur,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::En, Language::Ur];

    /// Form/query code.
    pub fn code(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Ur => "ur",
        }
    }

    /// Locale passed to the speech synthesizer.
    pub fn speech_locale(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Ur => "ur",
        }
    }

    pub fn is_rtl(self) -> bool {
        matches!(self, Self::Ur)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Unsupported language: {0}")]
pub struct UnknownLanguage(pub String);

impl FromStr for Language {
    type Err = UnknownLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Self::En),
            "ur" => Ok(Self::Ur),
            _ => Err(UnknownLanguage(s.to_string())),
        }
    }
}

// ═══════════════════════════════════════════════════════════
// Keys
// ═══════════════════════════════════════════════════════════

/// Named UI and report strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextKey {
    Title,
    Description,
    Upload,
    Name,
    Age,
    Email,
    Analyze,
    Result,
    Report,
    Premium,
    /// Spoken prefix before the label.
    TtsMessage,
    /// Upsell shown for tumor results.
    PremiumText,
    NoPremium,
    AdviceYes,
    AdviceNo,
    ReportTitle,
    /// Contains an `{email}` placeholder.
    EmailMessage,
}

impl TextKey {
    pub const ALL: [TextKey; 17] = [
        TextKey::Title,
        TextKey::Description,
        TextKey::Upload,
        TextKey::Name,
        TextKey::Age,
        TextKey::Email,
        TextKey::Analyze,
        TextKey::Result,
        TextKey::Report,
        TextKey::Premium,
        TextKey::TtsMessage,
        TextKey::PremiumText,
        TextKey::NoPremium,
        TextKey::AdviceYes,
        TextKey::AdviceNo,
        TextKey::ReportTitle,
        TextKey::EmailMessage,
    ];
}

/// Placeholder replaced by [`email_status`].
pub const EMAIL_PLACEHOLDER: &str = "{email}";

// ═══════════════════════════════════════════════════════════
// Lookup
// ═══════════════════════════════════════════════════════════

/// Look up a localized string.
pub fn t(language: Language, key: TextKey) -> &'static str {
    match language {
        Language::En => english(key),
        Language::Ur => urdu(key),
    }
}

/// Simulated delivery confirmation. Empty when no address was given;
/// the address is substituted verbatim, malformed or not.
pub fn email_status(language: Language, email: &str) -> String {
    if email.is_empty() {
        return String::new();
    }
    t(language, TextKey::EmailMessage).replace(EMAIL_PLACEHOLDER, email)
}

fn english(key: TextKey) -> &'static str {
    match key {
        TextKey::Title => "🧠 Brain Tumor Detection App",
        TextKey::Description => {
            "**Early Detection Saves Lives!** Upload MRI, enter details, and download your report."
        }
        TextKey::Upload => "Upload MRI Image",
        TextKey::Name => "Patient Name",
        TextKey::Age => "Patient Age",
        TextKey::Email => "Email (optional)",
        TextKey::Analyze => "🔍 Analyze Image",
        TextKey::Result => "Prediction Result",
        TextKey::Report => "Download Report (PDF)",
        TextKey::Premium => "Premium Feature",
        TextKey::TtsMessage => "Your result is:",
        TextKey::PremiumText => {
            "For Premium Users: AI Health Assistant can schedule an appointment with a doctor!"
        }
        TextKey::NoPremium => "No premium action required.",
        TextKey::AdviceYes => "Consult a neurologist immediately.",
        TextKey::AdviceNo => "No tumor detected. Stay healthy!",
        TextKey::ReportTitle => "Brain Tumor Detection Report",
        TextKey::EmailMessage => "Report sent to {email} (simulation)",
    }
}

fn urdu(key: TextKey) -> &'static str {
    match key {
        TextKey::Title => "🧠 دماغی ٹیومر پتہ لگانے والا ایپ",
        TextKey::Description => {
            "**جلد پتہ لگانا زندگی بچاتا ہے!** MRI اپلوڈ کریں اور رپورٹ حاصل کریں۔"
        }
        TextKey::Upload => "MRI تصویر اپلوڈ کریں",
        TextKey::Name => "مریض کا نام",
        TextKey::Age => "مریض کی عمر",
        TextKey::Email => "ای میل (اختیاری)",
        TextKey::Analyze => "🔍 تصویر کا تجزیہ کریں",
        TextKey::Result => "نتیجہ",
        TextKey::Report => "رپورٹ ڈاؤن لوڈ کریں",
        TextKey::Premium => "پریمیئم فیچر",
        TextKey::TtsMessage => "آپ کا نتیجہ یہ ہے:",
        TextKey::PremiumText => {
            "پریمیئم یوزرز کے لیے: ڈاکٹر سے اپائنٹمنٹ شیڈول کی جا سکتی ہے!"
        }
        TextKey::NoPremium => "کوئی پریمیئم ایکشن نہیں۔",
        TextKey::AdviceYes => "فوراً نیورولوجسٹ سے رجوع کریں۔",
        TextKey::AdviceNo => "کوئی ٹیومر نہیں ملا۔ صحت مند رہیں!",
        TextKey::ReportTitle => "دماغی ٹیومر رپورٹ",
        TextKey::EmailMessage => "{email} پر رپورٹ بھیجی گئی (سیمولیشن)",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_key_is_non_empty_in_every_language() {
        for lang in Language::ALL {
            for key in TextKey::ALL {
                assert!(!t(lang, key).is_empty(), "{lang} {key:?} is empty");
            }
        }
    }

    #[test]
    fn languages_have_independent_strings() {
        for key in TextKey::ALL {
            assert_ne!(t(Language::En, key), t(Language::Ur, key), "{key:?}");
        }
    }

    #[test]
    fn email_template_has_placeholder_in_both_languages() {
        for lang in Language::ALL {
            assert!(t(lang, TextKey::EmailMessage).contains(EMAIL_PLACEHOLDER));
        }
    }

    #[test]
    fn email_status_empty_without_address() {
        assert_eq!(email_status(Language::En, ""), "");
        assert_eq!(email_status(Language::Ur, ""), "");
    }

    #[test]
    fn email_status_substitutes_any_string() {
        assert_eq!(
            email_status(Language::En, "ali@example.com"),
            "Report sent to ali@example.com (simulation)"
        );
        assert_eq!(
            email_status(Language::En, "not an email"),
            "Report sent to not an email (simulation)"
        );
        assert_eq!(
            email_status(Language::Ur, "x@y"),
            "x@y پر رپورٹ بھیجی گئی (سیمولیشن)"
        );
    }

    #[test]
    fn language_parsing() {
        assert_eq!("en".parse::<Language>().unwrap(), Language::En);
        assert_eq!("UR".parse::<Language>().unwrap(), Language::Ur);
        assert!("fr".parse::<Language>().is_err());
    }

    #[test]
    fn language_serde_uses_codes() {
        assert_eq!(serde_json::to_string(&Language::Ur).unwrap(), "\"ur\"");
        let lang: Language = serde_json::from_str("\"en\"").unwrap();
        assert_eq!(lang, Language::En);
    }

    #[test]
    fn only_urdu_is_rtl() {
        assert!(!Language::En.is_rtl());
        assert!(Language::Ur.is_rtl());
        assert_eq!(Language::Ur.speech_locale(), "ur");
    }
}
