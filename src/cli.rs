use crate::language::LanguageCode;
use crate::photo::CropArea;
use clap::{Parser, Subcommand};
use market_finder_common::Coordinates;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "market-finder")]
#[command(about = "伝統市場・店舗探索ツール（料理写真から店舗を検索）", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// 言語（省略時は設定値）
    #[arg(long, global = true)]
    pub lang: Option<LanguageCode>,

    /// 現在地 (LAT,LON)。指定すると距離順に並べる
    #[arg(long, global = true, allow_hyphen_values = true)]
    pub near: Option<Coordinates>,

    /// 選択状態の保存先ディレクトリ（省略時は ~/.config/market-finder）
    #[arg(long, global = true)]
    pub state_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 市場一覧を表示
    Markets,

    /// 市場を選択して保存
    Select {
        /// 市場ID（省略時は一覧から選択）
        market_id: Option<String>,
    },

    /// 選択中の市場の店舗一覧を表示
    Shops {
        /// キーワードで絞り込み（店名・カテゴリ・説明）
        #[arg(short, long)]
        keyword: Option<String>,
    },

    /// 店舗の商品一覧を表示
    Products {
        /// 店舗ID
        #[arg(required = true)]
        shop_id: String,
    },

    /// 料理写真から店舗を検索
    Predict {
        /// 写真ファイル
        #[arg(required = true)]
        image: PathBuf,

        /// 切り抜き範囲 (X,Y,WIDTH,HEIGHT)
        #[arg(long)]
        crop: Option<CropArea>,
    },

    /// 現在の選択状態で表示内容を決定して表示
    View {
        /// キーワードで絞り込み
        #[arg(short, long)]
        keyword: Option<String>,

        /// 保存済みの予測レスポンス（JSON）
        #[arg(long, conflicts_with = "keyword")]
        prediction: Option<PathBuf>,

        /// JSONで出力
        #[arg(long)]
        json: bool,
    },

    /// 店舗を登録
    Register {
        /// 店舗名
        #[arg(required = true)]
        name: String,

        /// 電話番号
        #[arg(long)]
        phone: Option<String>,

        /// 店舗の位置 (LAT,LON)。省略時は --near
        #[arg(long, allow_hyphen_values = true)]
        location: Option<Coordinates>,

        /// 店舗の写真（複数指定可）
        #[arg(long = "photo")]
        photos: Vec<PathBuf>,

        /// 確認コード（省略時は入力を求める）
        #[arg(long)]
        code: Option<String>,
    },

    /// 選択中の市場を解除
    Clear,

    /// 設定を表示/編集
    Config {
        /// 一覧APIのベースURLを設定
        #[arg(long)]
        set_api_base_url: Option<String>,

        /// 予測APIのURLを設定
        #[arg(long)]
        set_predict_url: Option<String>,

        /// 店舗登録APIのURLを設定
        #[arg(long)]
        set_register_url: Option<String>,

        /// 既定の言語を設定
        #[arg(long)]
        set_language: Option<LanguageCode>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}
