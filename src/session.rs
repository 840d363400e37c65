//! アプリケーションの状態コンテナ
//!
//! 起動時に保存済みの選択を読み込み、市場一覧・店舗一覧・検索状態とともに保持する。
//! 表示内容は `view` のたびに調停し直す。

use crate::error::Result;
use crate::language::LanguageCode;
use crate::store::{SelectionStore, SELECTED_MARKET_KEY};
use market_finder_common::{
    reconcile, Coordinates, Market, PredictionResult, ReconcileInput, Reconciliation,
    SelectionState, Shop,
};
use tracing::{debug, info};

/// 店舗一覧の取得要求（発行時の市場IDで識別）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShopFetch {
    market_id: String,
}

impl ShopFetch {
    pub fn market_id(&self) -> &str {
        &self.market_id
    }
}

#[derive(Debug, Clone)]
struct ShopBatch {
    market_id: String,
    shops: Vec<Shop>,
}

#[derive(Debug, Clone, Default)]
pub struct Session {
    language: LanguageCode,
    markets: Vec<Market>,
    selection: SelectionState,
    shops: Option<ShopBatch>,
    had_prediction: bool,
}

impl Session {
    pub fn new(language: LanguageCode) -> Self {
        Self {
            language,
            ..Default::default()
        }
    }

    /// 保存済みの市場IDを読み込んで開始
    pub fn load(store: &impl SelectionStore, language: LanguageCode) -> Self {
        let persisted = store.get(SELECTED_MARKET_KEY);
        debug!(market_id = ?persisted, "selection loaded");
        Self {
            language,
            selection: SelectionState {
                persisted_market_id: persisted,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    pub fn language(&self) -> LanguageCode {
        self.language
    }

    pub fn set_language(&mut self, language: LanguageCode) {
        self.language = language;
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn markets(&self) -> &[Market] {
        &self.markets
    }

    pub fn selected_market_id(&self) -> Option<&str> {
        self.selection.persisted_market_id.as_deref()
    }

    pub fn selected_market(&self) -> Option<&Market> {
        let id = self.selected_market_id()?;
        self.markets.iter().find(|m| m.id == id)
    }

    /// 選択中の市場について取得済みの店舗（別の市場のものは返さない）
    pub fn shops(&self) -> &[Shop] {
        match (&self.shops, self.selected_market_id()) {
            (Some(batch), Some(id)) if batch.market_id == id => &batch.shops,
            _ => &[],
        }
    }

    /// 市場一覧を丸ごと置き換える
    ///
    /// 保存済みIDが一覧にない場合は選択を解除してストアからも消す。
    /// 解除した場合は `true`。
    pub fn apply_markets(&mut self, markets: Vec<Market>, store: &mut impl SelectionStore) -> Result<bool> {
        self.markets = markets;

        let dangling = match self.selected_market_id() {
            Some(id) => !self.markets.is_empty() && !self.markets.iter().any(|m| m.id == id),
            None => false,
        };

        if dangling {
            info!(market_id = ?self.selection.persisted_market_id, "selected market no longer exists, clearing");
            self.selection.clear_market();
            self.shops = None;
            self.had_prediction = false;
            store.remove(SELECTED_MARKET_KEY)?;
        }

        Ok(dangling)
    }

    /// 市場を選択して保存
    pub fn select_market(&mut self, market_id: &str, store: &mut impl SelectionStore) -> Result<()> {
        store.set(SELECTED_MARKET_KEY, market_id)?;

        if self.selected_market_id() != Some(market_id) {
            self.shops = None;
        }
        self.selection.persisted_market_id = Some(market_id.to_string());
        self.selection.clear_search();
        self.had_prediction = false;
        info!(market_id, "market selected");
        Ok(())
    }

    /// 市場一覧に戻る（選択と検索を解除）
    pub fn back_to_markets(&mut self, store: &mut impl SelectionStore) -> Result<()> {
        store.remove(SELECTED_MARKET_KEY)?;
        self.selection.clear_market();
        self.shops = None;
        self.had_prediction = false;
        Ok(())
    }

    /// 現在の市場向けに店舗取得を開始
    pub fn begin_shop_fetch(&self) -> Option<ShopFetch> {
        self.selected_market_id().map(|id| ShopFetch {
            market_id: id.to_string(),
        })
    }

    /// 店舗取得の結果を反映。選択が変わっていれば破棄して `false`
    pub fn complete_shop_fetch(&mut self, fetch: ShopFetch, shops: Vec<Shop>) -> bool {
        if self.selected_market_id() != Some(fetch.market_id.as_str()) {
            debug!(
                issued_for = %fetch.market_id,
                current = ?self.selection.persisted_market_id,
                "discarding stale shop response"
            );
            return false;
        }

        self.shops = Some(ShopBatch {
            market_id: fetch.market_id,
            shops,
        });
        // 全店舗が揃ったので予測表示の名残りは不要
        self.had_prediction = false;
        true
    }

    /// 写真検索の開始: 結果が届くまでキーワードだけを仮置きする
    pub fn begin_photo_search(&mut self, placeholder: &str) {
        self.selection.search_keyword = Some(placeholder.to_string());
        self.selection.prediction_result = None;
    }

    /// 予測結果の反映: キーワードと結果を対で設定
    pub fn complete_prediction(&mut self, result: PredictionResult) {
        let keyword = if result.chosen_label.trim().is_empty() {
            self.selection
                .search_keyword
                .clone()
                .unwrap_or_else(|| result.label.clone())
        } else {
            result.chosen_label.clone()
        };
        self.selection.set_search(keyword, result);
    }

    /// 写真検索の失敗: 仮置きのキーワードを取り消す
    pub fn fail_photo_search(&mut self) {
        self.selection.clear_search();
    }

    /// 検索を解除（店舗表示から戻る）
    pub fn clear_search(&mut self) {
        self.had_prediction |= self.selection.prediction_result.is_some();
        self.selection.clear_search();
    }

    /// キーワードで絞り込む（写真検索ではない）
    pub fn set_keyword(&mut self, keyword: Option<String>) {
        self.selection.prediction_result = None;
        self.selection.search_keyword = keyword.filter(|k| !k.trim().is_empty());
    }

    /// 現在の状態から表示内容を調停
    ///
    /// 「直前は予測表示」の印は店舗一覧の取得が完了するまで残り、
    /// それまでは毎回再取得を要求する。
    pub fn view(&self, user_location: Option<Coordinates>) -> Reconciliation {
        reconcile(&ReconcileInput {
            markets: &self.markets,
            shops: self.shops(),
            selection: &self.selection,
            user_location,
            had_prediction: self.had_prediction,
        })
    }
}
