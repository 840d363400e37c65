//! 市場探索サービス
//!
//! APIプロバイダ・選択ストア・セッションをまとめ、画面操作に相当する処理を提供する。
//! 取得失敗はそのままエラーとして返す（自動リトライはしない）。

use crate::api::{MarketProvider, PredictionProvider};
use crate::error::{MarketFinderError, Result};
use crate::language::LanguageCode;
use crate::session::Session;
use crate::store::SelectionStore;
use market_finder_common::{Coordinates, Market, PredictionResult, Product, Reconciliation};
use tracing::{debug, info, warn};

/// 写真検索中に仮置きするキーワード
pub const PHOTO_SEARCH_PLACEHOLDER: &str = "…";

pub struct MarketFinder<P, S> {
    provider: P,
    store: S,
    session: Session,
}

impl<P, S> MarketFinder<P, S>
where
    P: MarketProvider + PredictionProvider,
    S: SelectionStore,
{
    /// 保存済みの選択を読み込んで開始
    pub fn new(provider: P, store: S, language: LanguageCode) -> Self {
        let session = Session::load(&store, language);
        Self {
            provider,
            store,
            session,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// 市場一覧を取得し直す。保存済みの選択が消えていれば解除する
    pub async fn refresh_markets(&mut self) -> Result<&[Market]> {
        let markets = self.provider.fetch_markets(self.session.language()).await?;
        info!(count = markets.len(), "markets loaded");

        if self.session.apply_markets(markets, &mut self.store)? {
            warn!("persisted market selection was stale and has been cleared");
        }
        Ok(self.session.markets())
    }

    /// 市場を選択し、その店舗一覧を読み込む
    pub async fn select_market(&mut self, market_id: &str) -> Result<()> {
        let markets = self.session.markets();
        if !markets.is_empty() && !markets.iter().any(|m| m.id == market_id) {
            return Err(MarketFinderError::MarketNotFound(market_id.to_string()));
        }

        self.session.select_market(market_id, &mut self.store)?;
        self.load_shops().await?;
        Ok(())
    }

    /// 選択中の市場の店舗一覧を取得
    ///
    /// 取得中に選択が変わった場合は結果を捨てて `false` を返す。
    pub async fn load_shops(&mut self) -> Result<bool> {
        let fetch = self
            .session
            .begin_shop_fetch()
            .ok_or(MarketFinderError::NoMarketSelected)?;

        let shops = self
            .provider
            .fetch_shops_by_market_id(fetch.market_id(), self.session.language())
            .await?;
        debug!(market_id = fetch.market_id(), count = shops.len(), "shops loaded");

        Ok(self.session.complete_shop_fetch(fetch, shops))
    }

    /// 写真から候補店舗を検索
    ///
    /// 候補0件はエラーではなく `empty_prediction` として返る。
    pub async fn search_photo(
        &mut self,
        image: Vec<u8>,
        user_location: Option<Coordinates>,
    ) -> Result<Reconciliation> {
        let market_id = self
            .session
            .selected_market_id()
            .ok_or(MarketFinderError::NoMarketSelected)?
            .to_string();

        self.session.begin_photo_search(PHOTO_SEARCH_PLACEHOLDER);

        match self
            .provider
            .predict(image, self.session.language(), &market_id)
            .await
        {
            Ok(result) => {
                info!(label = %result.chosen_label, shops = result.shops.len(), "photo recognised");
                Ok(self.apply_prediction(result, user_location))
            }
            Err(e) => {
                self.session.fail_photo_search();
                Err(e)
            }
        }
    }

    /// 予測結果（保存済みのものを含む）を反映して表示内容を返す
    pub fn apply_prediction(
        &mut self,
        result: PredictionResult,
        user_location: Option<Coordinates>,
    ) -> Reconciliation {
        self.session.complete_prediction(result);
        self.session.view(user_location)
    }

    /// 店舗の商品一覧
    pub async fn fetch_products(&self, shop_id: &str) -> Result<Vec<Product>> {
        self.provider
            .fetch_products_by_shop_id(shop_id, self.session.language())
            .await
    }

    /// キーワードで絞り込む
    pub fn set_keyword(&mut self, keyword: Option<String>) {
        self.session.set_keyword(keyword);
    }

    /// 検索を解除し、必要なら全店舗を取り直して表示内容を返す
    pub async fn clear_search(&mut self, user_location: Option<Coordinates>) -> Result<Reconciliation> {
        self.session.clear_search();
        let out = self.session.view(user_location);

        if out.refetch_shops_for.is_some() {
            self.load_shops().await?;
            return Ok(self.session.view(user_location));
        }
        Ok(out)
    }

    /// 市場一覧に戻る
    pub fn back_to_markets(&mut self) -> Result<()> {
        self.session.back_to_markets(&mut self.store)
    }

    /// 現在の表示内容
    pub fn view(&self, user_location: Option<Coordinates>) -> Reconciliation {
        self.session.view(user_location)
    }
}
