use thiserror::Error;

#[derive(Error, Debug)]
pub enum MarketFinderError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("APIのベースURLが設定されていません。`market-finder config --set-api-base-url URL` または環境変数 MARKET_FINDER_API_BASE_URL で設定してください")]
    MissingApiBaseUrl,

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("画像読み込みエラー: {0}")]
    ImageLoad(String),

    #[error("画像処理エラー: {0}")]
    Image(#[from] image::ImageError),

    #[error("通信エラー: {0}")]
    Network(#[from] reqwest::Error),

    #[error("HTTPエラー {status}: {url}")]
    HttpStatus { status: u16, url: String },

    #[error("APIレスポンスのパースに失敗: {0}")]
    ApiParse(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error("市場が見つかりません: {0}")]
    MarketNotFound(String),

    #[error("市場が選択されていません。`market-finder select` で選択してください")]
    NoMarketSelected,

    #[error("入力エラー: {0}")]
    Prompt(String),

    #[error("{0}")]
    Registration(#[from] crate::register::RegistrationError),

    #[error("登録APIのURLが設定されていません。`market-finder config --set-register-url URL` または環境変数 MARKET_FINDER_REGISTER_URL で設定してください")]
    MissingRegisterUrl,

    #[error("店舗登録に失敗しました ({status}): {message}")]
    RegistrationRejected { status: u16, message: String },

    #[error("{0}")]
    Common(#[from] market_finder_common::Error),
}

impl MarketFinderError {
    /// 再試行で回復しうる取得失敗か
    pub fn is_fetch_failure(&self) -> bool {
        matches!(
            self,
            MarketFinderError::Network(_)
                | MarketFinderError::HttpStatus { .. }
                | MarketFinderError::ApiParse(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, MarketFinderError>;
