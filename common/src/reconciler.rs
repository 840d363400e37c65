//! 選択状態の調停
//!
//! 保存済みの市場ID・市場一覧・検索キーワード・写真予測結果から、
//! 表示モードと表示する店舗/市場の一覧を決定する。
//! 入力が変わるたびに呼び直す純粋関数で、I/Oは行わない。

use crate::distance::{sort_by_distance, Located};
use crate::search::filter_shops;
use crate::types::{Coordinates, Market, PredictionResult, Shop};
use serde::{Deserialize, Serialize};

/// 表示モード
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    /// 市場一覧
    #[default]
    Markets,
    /// 選択した市場の店舗一覧
    Shops,
}

impl std::fmt::Display for ViewMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ViewMode::Markets => write!(f, "markets"),
            ViewMode::Shops => write!(f, "shops"),
        }
    }
}

/// 選択・検索の状態
///
/// `search_keyword` と `prediction_result` は対で設定・解除する。
/// 写真検索中のみ、キーワードだけが先に入る。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionState {
    pub persisted_market_id: Option<String>,
    pub search_keyword: Option<String>,
    pub prediction_result: Option<PredictionResult>,
}

impl SelectionState {
    pub fn with_market(market_id: impl Into<String>) -> Self {
        Self {
            persisted_market_id: Some(market_id.into()),
            ..Default::default()
        }
    }

    /// 写真検索の完了: キーワードと予測結果をまとめて設定
    pub fn set_search(&mut self, keyword: impl Into<String>, prediction: PredictionResult) {
        self.search_keyword = Some(keyword.into());
        self.prediction_result = Some(prediction);
    }

    /// キーワードと予測結果をまとめて解除
    pub fn clear_search(&mut self) {
        self.search_keyword = None;
        self.prediction_result = None;
    }

    /// 選択中の市場を解除（検索も解除）
    pub fn clear_market(&mut self) {
        self.persisted_market_id = None;
        self.clear_search();
    }
}

/// 調停の入力
#[derive(Debug, Clone, Copy)]
pub struct ReconcileInput<'a> {
    pub markets: &'a [Market],
    /// 選択中の市場について取得済みの全店舗
    pub shops: &'a [Shop],
    pub selection: &'a SelectionState,
    pub user_location: Option<Coordinates>,
    /// 直前の表示が予測結果だったか
    pub had_prediction: bool,
}

/// 調停の出力
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reconciliation {
    pub view_mode: ViewMode,
    pub visible_shops: Vec<Shop>,
    pub visible_markets: Vec<Market>,
    pub selected_market: Option<Market>,
    /// 保存済みIDが市場一覧に存在しない（呼び出し側で解除する）
    pub selection_invalid: bool,
    /// 検索解除直後のため、この市場の全店舗を再取得すべき
    pub refetch_shops_for: Option<String>,
    /// 予測は成功したが候補店舗が0件
    pub empty_prediction: bool,
}

impl Reconciliation {
    /// 予測結果を表示しているか
    pub fn shows_prediction(&self, selection: &SelectionState) -> bool {
        self.view_mode == ViewMode::Shops && !self.selection_invalid && selection.prediction_result.is_some()
    }
}

/// 選択状態から表示内容を決定
pub fn reconcile(input: &ReconcileInput<'_>) -> Reconciliation {
    let selection = input.selection;
    let user_location = input.user_location.filter(Coordinates::is_valid);

    // 1. 選択中の市場を解決
    let selected_market = selection
        .persisted_market_id
        .as_deref()
        .and_then(|id| input.markets.iter().find(|m| m.id == id))
        .cloned();

    let selection_invalid = selection.persisted_market_id.is_some()
        && selected_market.is_none()
        && !input.markets.is_empty();

    if selection_invalid {
        return Reconciliation {
            view_mode: ViewMode::Markets,
            visible_markets: sort_markets(input.markets, user_location),
            selection_invalid: true,
            ..Default::default()
        };
    }

    let has_market = selected_market.is_some();
    let mut refetch_shops_for = None;
    let mut empty_prediction = false;

    let (view_mode, visible_shops) = if let Some(prediction) = &selection.prediction_result {
        // 2. 予測結果を優先
        let shops = prediction.to_shops();
        empty_prediction = shops.is_empty();
        (ViewMode::Shops, shops)
    } else if selection.search_keyword.is_none() && input.had_prediction {
        // 3. 検索解除直後: 全店舗を取り直す
        refetch_shops_for = selected_market.as_ref().map(|m| m.id.clone());
        (mode_for(has_market), input.shops.to_vec())
    } else if let Some(keyword) = &selection.search_keyword {
        // 4. キーワード絞り込み
        (ViewMode::Shops, filter_shops(input.shops, keyword))
    } else {
        // 5. 絞り込みなし
        (mode_for(has_market), input.shops.to_vec())
    };

    // 6. 現在地からの距離順
    let visible_shops = match user_location {
        Some(origin) => sort_by_distance(&visible_shops, &origin),
        None => visible_shops,
    };
    let visible_markets = if view_mode == ViewMode::Markets {
        sort_markets(input.markets, user_location)
    } else {
        input.markets.to_vec()
    };

    Reconciliation {
        view_mode,
        visible_shops,
        visible_markets,
        selected_market,
        selection_invalid: false,
        refetch_shops_for,
        empty_prediction,
    }
}

fn mode_for(has_market: bool) -> ViewMode {
    if has_market {
        ViewMode::Shops
    } else {
        ViewMode::Markets
    }
}

fn sort_markets(markets: &[Market], user_location: Option<Coordinates>) -> Vec<Market> {
    match user_location {
        Some(origin) => sort_by_distance(markets, &origin),
        None => markets.to_vec(),
    }
}

/// 地図マーカーに置ける要素（座標が有限値のもの）だけを抽出
pub fn map_markers<T: Located>(items: &[T]) -> Vec<(&T, Coordinates)> {
    items
        .iter()
        .map(|item| (item, item.coordinates()))
        .filter(|(_, coords)| coords.is_valid())
        .collect()
}
