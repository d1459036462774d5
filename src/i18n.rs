//! Internationalization (i18n) module
//!
//! Picks the UI language from the system locale. Strings themselves live in
//! `locales/*.yml` and are looked up with `rust_i18n::t!`.
//! Note: Log messages remain in English for consistency.

use std::sync::OnceLock;

/// Supported languages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    English,
    Russian,
}

impl Language {
    /// Locale code understood by `rust_i18n`
    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Russian => "ru",
        }
    }

    /// Map a BCP 47 tag such as `ru-RU` or `en_US.UTF-8`
    pub fn from_tag(tag: &str) -> Self {
        let tag = tag.to_lowercase();
        if tag.starts_with("ru") || tag.contains("russian") {
            Language::Russian
        } else {
            Language::English
        }
    }
}

/// Global language instance
static LANGUAGE: OnceLock<Language> = OnceLock::new();

/// Get the current language, detecting it on first use
pub fn get_language() -> Language {
    *LANGUAGE.get_or_init(detect_language)
}

/// Detect the language and activate it for `t!`
pub fn init_locale() -> Language {
    let language = get_language();
    rust_i18n::set_locale(language.code());
    language
}

fn detect_language() -> Language {
    sys_locale::get_locale()
        .map(|tag| Language::from_tag(&tag))
        .unwrap_or(Language::English)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_from_tag() {
        assert_eq!(Language::from_tag("ru-RU"), Language::Russian);
        assert_eq!(Language::from_tag("ru_RU.UTF-8"), Language::Russian);
        assert_eq!(Language::from_tag("en-US"), Language::English);
        assert_eq!(Language::from_tag("de-DE"), Language::English);
        assert_eq!(Language::from_tag(""), Language::English);
    }

    #[test]
    fn test_language_detection() {
        // This test just ensures detection doesn't panic
        let _lang = detect_language();
    }
}
