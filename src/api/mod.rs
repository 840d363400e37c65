//! バックエンドAPI連携モジュール
//!
//! - 一覧API: 市場・店舗・商品の取得
//! - 予測API: 料理写真から候補店舗を取得
//! - 登録API: 店舗の新規登録
//!
//! 呼び出し側はトレイト越しに使い、テストでは差し替える。

mod client;
pub mod types;

pub use client::ApiClient;

use crate::error::Result;
use crate::language::LanguageCode;
use crate::register::ShopRegistration;
use async_trait::async_trait;
use market_finder_common::{Market, PredictionResult, Product, Shop};

/// 市場・店舗・商品の一覧を提供する
#[async_trait]
pub trait MarketProvider: Send + Sync {
    async fn fetch_markets(&self, language: LanguageCode) -> Result<Vec<Market>>;

    async fn fetch_shops_by_market_id(
        &self,
        market_id: &str,
        language: LanguageCode,
    ) -> Result<Vec<Shop>>;

    async fn fetch_products_by_shop_id(
        &self,
        shop_id: &str,
        language: LanguageCode,
    ) -> Result<Vec<Product>>;
}

/// 料理写真の予測を提供する
#[async_trait]
pub trait PredictionProvider: Send + Sync {
    /// `image` はJPEGバイト列
    async fn predict(
        &self,
        image: Vec<u8>,
        language: LanguageCode,
        market_id: &str,
    ) -> Result<PredictionResult>;
}

/// 店舗登録を受け付ける
#[async_trait]
pub trait RegistrationProvider: Send + Sync {
    /// 成功時はサーバーのメッセージ（あれば）を返す
    async fn register_shop(&self, registration: &ShopRegistration) -> Result<Option<String>>;
}
