//! 店舗登録
//!
//! 確認コードを照合し、店名・位置・写真を検証してから登録APIへ送る。

use crate::api::RegistrationProvider;
use crate::error::Result;
use market_finder_common::Coordinates;
use thiserror::Error;
use tracing::info;

/// 店舗登録の確認コード
pub const VERIFICATION_CODE: &str = "0000";

/// 登録内容の不備
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationError {
    #[error("確認コードが正しくありません")]
    InvalidVerificationCode,

    #[error("店舗名を入力してください")]
    MissingName,

    #[error("店舗の位置を設定してください")]
    MissingLocation,

    #[error("店舗の写真を1枚以上追加してください")]
    MissingPhoto,
}

/// 登録する店舗
#[derive(Debug, Clone, Default)]
pub struct ShopRegistration {
    pub name: String,
    pub phone: Option<String>,
    pub location: Option<Coordinates>,
    /// JPEGバイト列
    pub photos: Vec<Vec<u8>>,
}

impl ShopRegistration {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    pub fn location(mut self, location: Coordinates) -> Self {
        self.location = Some(location);
        self
    }

    pub fn photo(mut self, jpeg: Vec<u8>) -> Self {
        self.photos.push(jpeg);
        self
    }

    /// 電話番号（未入力は空文字）
    pub fn call_number(&self) -> &str {
        self.phone.as_deref().map(str::trim).unwrap_or("")
    }

    /// 店名・位置・写真の順に検証
    ///
    /// 位置は (0, 0) と非有限値を未設定とみなす。
    pub fn validate(&self) -> std::result::Result<(), RegistrationError> {
        if self.name.trim().is_empty() {
            return Err(RegistrationError::MissingName);
        }

        match self.location {
            Some(loc) if loc.is_valid() && !(loc.latitude == 0.0 && loc.longitude == 0.0) => {}
            _ => return Err(RegistrationError::MissingLocation),
        }

        if self.photos.is_empty() {
            return Err(RegistrationError::MissingPhoto);
        }
        Ok(())
    }
}

/// 確認コードの照合
pub fn verify_code(code: &str) -> std::result::Result<(), RegistrationError> {
    if code.trim() == VERIFICATION_CODE {
        Ok(())
    } else {
        Err(RegistrationError::InvalidVerificationCode)
    }
}

/// 照合・検証のうえ登録する。戻り値はサーバーのメッセージ
pub async fn register_shop<P: RegistrationProvider>(
    provider: &P,
    code: &str,
    registration: &ShopRegistration,
) -> Result<Option<String>> {
    verify_code(code)?;
    registration.validate()?;

    let message = provider.register_shop(registration).await?;
    info!(name = %registration.name, photos = registration.photos.len(), "shop registered");
    Ok(message)
}
