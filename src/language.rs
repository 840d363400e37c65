use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// APIに渡す言語コード
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LanguageCode {
    Ko,
    #[default]
    En,
    Ja,
    Zh,
    Es,
    Fr,
    De,
    Vi,
    Th,
}

impl LanguageCode {
    pub fn code(&self) -> &'static str {
        match self {
            LanguageCode::Ko => "ko",
            LanguageCode::En => "en",
            LanguageCode::Ja => "ja",
            LanguageCode::Zh => "zh",
            LanguageCode::Es => "es",
            LanguageCode::Fr => "fr",
            LanguageCode::De => "de",
            LanguageCode::Vi => "vi",
            LanguageCode::Th => "th",
        }
    }

    /// 自言語での表示名
    pub fn native_name(&self) -> &'static str {
        match self {
            LanguageCode::Ko => "한국어",
            LanguageCode::En => "English",
            LanguageCode::Ja => "日本語",
            LanguageCode::Zh => "中文",
            LanguageCode::Es => "Español",
            LanguageCode::Fr => "Français",
            LanguageCode::De => "Deutsch",
            LanguageCode::Vi => "Tiếng Việt",
            LanguageCode::Th => "ไทย",
        }
    }
}

impl std::fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}
