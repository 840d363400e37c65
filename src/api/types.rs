//! 一覧APIのレスポンス型と変換
//!
//! バックエンドの生の形（数値ID・lat/lon・summary）から共通型へ変換する。

use market_finder_common::{Market, Product, Shop};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// 市場の既定住所（APIが住所を返さないため）
pub const DEFAULT_MARKET_ADDRESS: &str = "부산광역시";
/// 市場の既定カテゴリ
pub const DEFAULT_MARKET_CATEGORY: &str = "전통시장";

/// GET /markets
#[derive(Debug, Clone, Deserialize)]
pub struct MarketApiResponse {
    pub id: i64,
    #[serde(default)]
    pub created_at: String,
    pub name: String,
    #[serde(default = "missing_coordinate", deserialize_with = "number_or_string")]
    pub lat: f64,
    #[serde(default = "missing_coordinate", deserialize_with = "number_or_string")]
    pub lon: f64,
}

/// GET /markets/{id}/stores
#[derive(Debug, Clone, Deserialize)]
pub struct StoreApiResponse {
    pub id: i64,
    pub name: String,
    #[serde(default = "missing_coordinate", deserialize_with = "number_or_string")]
    pub lat: f64,
    #[serde(default = "missing_coordinate", deserialize_with = "number_or_string")]
    pub lon: f64,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub market_id: Option<i64>,
}

/// GET /stores/{id}/products
#[derive(Debug, Clone, Deserialize)]
pub struct ProductApiResponse {
    pub id: i64,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub store_id: Option<i64>,
    pub name: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
}

/// POST 登録API
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegisterApiResponse {
    #[serde(default)]
    pub message: Option<String>,
}

impl From<MarketApiResponse> for Market {
    fn from(api: MarketApiResponse) -> Self {
        Market {
            id: api.id.to_string(),
            description: Some(format!("{}에 오신 것을 환영합니다.", api.name)),
            name: api.name,
            address: DEFAULT_MARKET_ADDRESS.to_string(),
            latitude: api.lat,
            longitude: api.lon,
            category: DEFAULT_MARKET_CATEGORY.to_string(),
            ..Default::default()
        }
    }
}

impl From<StoreApiResponse> for Shop {
    fn from(api: StoreApiResponse) -> Self {
        Shop {
            id: api.id.to_string(),
            name: api.name,
            address: non_empty(api.address),
            rating: api.rating.unwrap_or(0.0),
            description: api.summary.and_then(non_empty),
            images: api.image_url.into_iter().filter(|url| !url.is_empty()).collect(),
            latitude: api.lat,
            longitude: api.lon,
            ..Default::default()
        }
    }
}

impl From<ProductApiResponse> for Product {
    fn from(api: ProductApiResponse) -> Self {
        Product {
            id: api.id.to_string(),
            name: api.name,
            price: api.price,
            rating: 0.0,
            description: api.summary.and_then(non_empty),
            images: api.image_url.into_iter().filter(|url| !url.is_empty()).collect(),
            category: None,
        }
    }
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

fn missing_coordinate() -> f64 {
    f64::NAN
}

/// 数値・数値文字列のどちらも受け付ける。解釈できない値はNaN
fn number_or_string<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        Value::String(s) => s.trim().parse().unwrap_or(f64::NAN),
        _ => f64::NAN,
    })
}
