//! キーワード検索
//!
//! 店舗名・カテゴリ・説明のいずれかに、大文字小文字を区別せず部分一致すれば採用。

use crate::types::Shop;

/// 店舗がキーワードに一致するか
pub fn matches_keyword(shop: &Shop, keyword: &str) -> bool {
    let needle = keyword.to_lowercase();

    let fields = [
        Some(shop.name.as_str()),
        shop.category.as_deref(),
        shop.description.as_deref(),
    ];

    fields
        .iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(&needle))
}

/// キーワードで店舗を絞り込み（元の順序を維持）
pub fn filter_shops(shops: &[Shop], keyword: &str) -> Vec<Shop> {
    shops
        .iter()
        .filter(|shop| matches_keyword(shop, keyword))
        .cloned()
        .collect()
}
