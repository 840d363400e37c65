//! Market Finder Common Library
//!
//! CLIと将来のUIで共有される型と純粋ロジック（I/Oなし）

pub mod types;
pub mod error;
pub mod distance;
pub mod search;
pub mod reconciler;
pub mod sheet;
pub mod card;

pub use types::{
    Coordinates, Explanation, Market, MenuItem, PredictedMenu, PredictedShop, PredictionResult,
    Product, Shop,
};
pub use error::{Error, Result};
pub use distance::{calculate_distance, format_distance, sort_by_distance, Located};
pub use search::{filter_shops, matches_keyword};
pub use reconciler::{reconcile, map_markers, ReconcileInput, Reconciliation, SelectionState, ViewMode};
pub use sheet::{drag_to_height, BottomSheet, SheetBounds};
pub use card::CardState;
