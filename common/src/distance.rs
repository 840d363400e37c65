//! 距離計算モジュール
//!
//! Haversine公式による2点間の大円距離と、現在地からの距離順ソート。

use crate::types::{Coordinates, Market, Shop};

/// 地球の半径（km）
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// 座標を持つ要素
pub trait Located {
    fn coordinates(&self) -> Coordinates;
}

impl Located for Market {
    fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }
}

impl Located for Shop {
    fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }
}

impl Located for Coordinates {
    fn coordinates(&self) -> Coordinates {
        *self
    }
}

fn to_rad(degrees: f64) -> f64 {
    degrees * (std::f64::consts::PI / 180.0)
}

/// 2点間の距離を計算（km）
///
/// # Example
/// ```
/// use market_finder_common::calculate_distance;
///
/// let d = calculate_distance(37.5665, 126.9780, 35.1796, 129.0756);
/// assert!((d - 328.64).abs() < 0.1);
/// ```
pub fn calculate_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = to_rad(lat2 - lat1);
    let d_lon = to_rad(lon2 - lon1);

    let a = (d_lat / 2.0).sin() * (d_lat / 2.0).sin()
        + to_rad(lat1).cos() * to_rad(lat2).cos() * (d_lon / 2.0).sin() * (d_lon / 2.0).sin();
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// 距離の昇順で並べ替え（安定ソート）
///
/// 座標が有限値でない要素はソート前に取り除き、元の順序のまま末尾に付ける。
pub fn sort_by_distance<T: Located + Clone>(items: &[T], origin: &Coordinates) -> Vec<T> {
    let (mut located, malformed): (Vec<(f64, &T)>, Vec<(f64, &T)>) = items
        .iter()
        .map(|item| {
            let coords = item.coordinates();
            let distance = if coords.is_valid() {
                origin.distance_to(&coords)
            } else {
                f64::NAN
            };
            (distance, item)
        })
        .partition(|(distance, _)| distance.is_finite());

    located.sort_by(|a, b| a.0.total_cmp(&b.0));

    located
        .into_iter()
        .chain(malformed)
        .map(|(_, item)| item.clone())
        .collect()
}

/// 表示用の距離文字列
pub fn format_distance(km: f64) -> String {
    if km < 1.0 {
        format!("{}m", (km * 1000.0).round() as i64)
    } else {
        format!("{:.1}km", km)
    }
}
