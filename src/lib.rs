//! market-finder
//!
//! 伝統市場とその店舗を探し、料理写真から候補店舗を検索する。
//! 表示内容の決定ロジックは `market_finder_common` にあり、
//! ここではAPI連携・選択状態の永続化・セッション管理を扱う。

pub mod api;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod finder;
pub mod language;
pub mod photo;
pub mod register;
pub mod session;
pub mod store;
