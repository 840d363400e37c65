//! 市場・店舗・予測結果の型定義
//!
//! CLIとUIで共有される型:
//! - Market / Shop / Product: 一覧APIの変換後の形
//! - PredictionResult: 料理写真の予測APIの出力
//! - Coordinates: 度単位の緯度経度

use serde::{Deserialize, Serialize};

/// 緯度経度（度）
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// 緯度経度がともに有限値か
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }

    /// 他の座標までの距離（km）
    pub fn distance_to(&self, other: &Coordinates) -> f64 {
        crate::distance::calculate_distance(
            self.latitude,
            self.longitude,
            other.latitude,
            other.longitude,
        )
    }
}

impl std::str::FromStr for Coordinates {
    type Err = String;

    /// "35.10,129.04" 形式
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (lat, lon) = s
            .split_once(',')
            .ok_or_else(|| format!("Invalid coordinates: {}. Use LAT,LON", s))?;
        let latitude: f64 = lat
            .trim()
            .parse()
            .map_err(|_| format!("Invalid latitude: {}", lat.trim()))?;
        let longitude: f64 = lon
            .trim()
            .parse()
            .map_err(|_| format!("Invalid longitude: {}", lon.trim()))?;
        let coords = Self::new(latitude, longitude);
        if !coords.is_valid() {
            return Err(format!("Coordinates must be finite: {}", s));
        }
        Ok(coords)
    }
}

/// 伝統市場
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Market {
    pub id: String,
    pub name: String,

    #[serde(default)]
    pub address: String,

    #[serde(default)]
    pub description: Option<String>,

    pub latitude: f64,
    pub longitude: f64,

    #[serde(default)]
    pub category: String,

    #[serde(default)]
    pub rating: Option<f64>,

    #[serde(default)]
    pub images: Vec<String>,

    #[serde(default)]
    pub phone: Option<String>,

    #[serde(default)]
    pub opening_hours: Option<String>,
}

/// メニュー項目
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub name: String,
    pub price: f64,
    #[serde(default)]
    pub description: Option<String>,
}

/// 市場内の店舗
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shop {
    pub id: String,
    pub name: String,

    #[serde(default)]
    pub address: Option<String>,

    #[serde(default)]
    pub rating: f64,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub images: Vec<String>,

    #[serde(default)]
    pub category: Option<String>,

    pub latitude: f64,
    pub longitude: f64,

    #[serde(default)]
    pub phone: Option<String>,

    #[serde(default)]
    pub opening_hours: Option<String>,

    #[serde(default)]
    pub menu: Vec<MenuItem>,
}

/// 店舗の商品
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    pub price: f64,

    #[serde(default)]
    pub rating: f64,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub images: Vec<String>,

    #[serde(default)]
    pub category: Option<String>,
}

/// 予測結果に含まれるメニュー
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictedMenu {
    pub menu_id: i64,
    pub menu_name: String,
    pub menu_price: f64,
}

/// 予測結果の候補店舗
///
/// 予測APIのフィールド名（snake_case）のまま保持する。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictedShop {
    pub store_id: i64,
    pub store_name: String,
    pub lat: f64,
    pub lon: f64,
    pub address: String,
    pub menu_id: i64,
    pub menu_name: String,
    pub menu_price: f64,
    pub similarity: f64,
    pub menus: Vec<PredictedMenu>,
}

impl PredictedShop {
    /// 一致したメニュー名と価格から説明文を合成
    pub fn synthesized_description(&self) -> String {
        format!("{} - {}", self.menu_name, format_price(self.menu_price))
    }

    /// 表示用のShopに変換（予測には評価がないため0）
    pub fn to_shop(&self) -> Shop {
        let address = if self.address.trim().is_empty() {
            None
        } else {
            Some(self.address.clone())
        };

        Shop {
            id: self.store_id.to_string(),
            name: self.store_name.clone(),
            address,
            rating: 0.0,
            description: Some(self.synthesized_description()),
            latitude: self.lat,
            longitude: self.lon,
            menu: self
                .menus
                .iter()
                .map(|m| MenuItem {
                    name: m.menu_name.clone(),
                    price: m.menu_price,
                    description: None,
                })
                .collect(),
            ..Default::default()
        }
    }
}

/// 予測の説明
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Explanation {
    pub title: String,
    pub summary: String,
}

/// 料理写真の予測結果
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictionResult {
    pub label: String,
    pub confidence: f64,
    pub chosen_label: String,
    pub shops: Vec<PredictedShop>,
    pub explanation: Option<Explanation>,
}

impl PredictionResult {
    /// 保存済みの予測レスポンス（JSON）を読み込み
    pub fn from_file(path: &std::path::Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// JSON文字列から読み込み
    pub fn from_json(json: &str) -> crate::Result<Self> {
        let result: Self = serde_json::from_str(json)?;
        Ok(result)
    }

    /// 候補店舗をShopの形で取得
    pub fn to_shops(&self) -> Vec<Shop> {
        self.shops.iter().map(PredictedShop::to_shop).collect()
    }
}

/// 価格をウォン表記に整形（3桁区切り）
///
/// `9000.0` → `"9,000원"`
pub fn format_price(price: f64) -> String {
    let rounded = price.round() as i64;
    let digits = rounded.unsigned_abs().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if rounded < 0 { "-" } else { "" };
    format!("{}{}원", sign, grouped)
}
