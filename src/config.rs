use crate::error::{MarketFinderError, Result};
use crate::language::LanguageCode;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const API_BASE_URL_ENV: &str = "MARKET_FINDER_API_BASE_URL";
pub const PREDICT_URL_ENV: &str = "MARKET_FINDER_PREDICT_URL";
pub const REGISTER_URL_ENV: &str = "MARKET_FINDER_REGISTER_URL";

const DEFAULT_PREDICT_URL: &str = "http://localhost:8000/";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_base_url: Option<String>,
    pub predict_url: String,
    pub register_url: Option<String>,
    pub language: LanguageCode,
    pub max_image_size: u32,
    pub timeout_seconds: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: None,
            predict_url: DEFAULT_PREDICT_URL.into(),
            register_url: None,
            language: LanguageCode::default(),
            max_image_size: 1280,
            timeout_seconds: 30,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    /// 設定・選択状態の保存先ディレクトリ
    pub fn data_dir() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| MarketFinderError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("market-finder"))
    }

    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::data_dir()?.join("config.json"))
    }

    /// 一覧APIのベースURL（環境変数を優先）
    pub fn api_base_url(&self) -> Result<String> {
        if let Ok(url) = std::env::var(API_BASE_URL_ENV) {
            if !url.trim().is_empty() {
                return Ok(trim_trailing_slash(&url));
            }
        }

        self.api_base_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .map(trim_trailing_slash)
            .ok_or(MarketFinderError::MissingApiBaseUrl)
    }

    /// 店舗登録APIのURL（環境変数を優先）
    pub fn register_url(&self) -> Result<String> {
        match std::env::var(REGISTER_URL_ENV) {
            Ok(url) if !url.trim().is_empty() => Ok(url.trim().to_string()),
            _ => self
                .register_url
                .as_deref()
                .map(str::trim)
                .filter(|url| !url.is_empty())
                .map(str::to_string)
                .ok_or(MarketFinderError::MissingRegisterUrl),
        }
    }

    /// 予測APIのURL（環境変数を優先）
    pub fn predict_url(&self) -> String {
        match std::env::var(PREDICT_URL_ENV) {
            Ok(url) if !url.trim().is_empty() => url,
            _ => self.predict_url.clone(),
        }
    }
}

fn trim_trailing_slash(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}
