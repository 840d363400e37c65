use clap::Parser;
use indicatif::ProgressBar;
use market_finder::{api, cli, config, display, error, finder, photo, register, store};
use market_finder::language::LanguageCode;
use market_finder_common::{sort_by_distance, Coordinates, Market, PredictionResult, Reconciliation, ViewMode};
use api::ApiClient;
use cli::{Cli, Commands};
use config::Config;
use error::{MarketFinderError, Result};
use finder::MarketFinder;
use register::ShopRegistration;
use std::path::Path;
use std::time::Duration;
use store::{FileStore, SelectionStore, SELECTED_MARKET_KEY};

type Finder = MarketFinder<ApiClient, FileStore>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        if e.is_fetch_failure() {
            eprintln!("✖ {}", e);
            eprintln!("  通信状態を確認して、もう一度実行してください");
        }
        return Err(e.into());
    }
    Ok(())
}

fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = Config::load()?;
    let state_dir = match cli.state_dir {
        Some(dir) => dir,
        None => Config::data_dir()?,
    };
    let language = cli.lang.unwrap_or(config.language);
    let origin = cli.near;

    match cli.command {
        Commands::Markets => {
            println!("🏪 market-finder - 市場一覧\n");
            let mut finder = build_finder(&config, &state_dir, language)?;
            refresh_markets(&mut finder).await?;

            let markets = match origin {
                Some(origin) => sort_by_distance(finder.session().markets(), &origin),
                None => finder.session().markets().to_vec(),
            };
            display::print_markets(&markets, finder.session().selected_market_id(), origin);
        }

        Commands::Select { market_id } => {
            let mut finder = build_finder(&config, &state_dir, language)?;
            refresh_markets(&mut finder).await?;

            let market_id = match market_id {
                Some(id) => id,
                None => match pick_market(finder.session().markets())? {
                    Some(id) => id,
                    None => {
                        println!("キャンセルしました");
                        return Ok(());
                    }
                },
            };

            let pb = spinner("店舗一覧を取得中...");
            let result = finder.select_market(&market_id).await;
            pb.finish_and_clear();
            result?;

            let name = finder
                .session()
                .selected_market()
                .map(|m| m.name.clone())
                .unwrap_or_else(|| market_id.clone());
            println!("✔ {} を選択しました（{}件の店舗）", name, finder.session().shops().len());
        }

        Commands::Shops { keyword } => {
            let mut finder = build_finder(&config, &state_dir, language)?;
            refresh_markets(&mut finder).await?;
            load_selected_shops(&mut finder).await?;

            finder.set_keyword(keyword);
            let out = finder.view(origin);
            print_reconciliation(&out, finder.session().selection().search_keyword.as_deref(), None, origin);
        }

        Commands::Products { shop_id } => {
            let finder = build_finder(&config, &state_dir, language)?;
            let pb = spinner("商品一覧を取得中...");
            let products = finder.fetch_products(&shop_id).await;
            pb.finish_and_clear();

            display::print_products(&products?);
        }

        Commands::Predict { image, crop } => {
            println!("📸 market-finder - 写真検索\n");
            let mut finder = build_finder(&config, &state_dir, language)?;
            refresh_markets(&mut finder).await?;
            if finder.session().selected_market_id().is_none() {
                return Err(MarketFinderError::NoMarketSelected);
            }

            let bytes = photo::prepare_photo(&image, crop, config.max_image_size)?;
            println!("✔ 写真を準備しました（{} bytes）", bytes.len());

            let pb = spinner("料理を認識中...");
            let result = finder.search_photo(bytes, origin).await;
            pb.finish_and_clear();
            let out = result?;

            let prediction = finder.session().selection().prediction_result.clone();
            print_reconciliation(
                &out,
                finder.session().selection().search_keyword.as_deref(),
                prediction.as_ref(),
                origin,
            );
        }

        Commands::View { keyword, prediction, json } => {
            let mut finder = build_finder(&config, &state_dir, language)?;
            refresh_markets(&mut finder).await?;
            if finder.session().selected_market_id().is_some() {
                load_selected_shops(&mut finder).await?;
            }

            let out = match prediction {
                Some(path) => {
                    let result = PredictionResult::from_file(&path)?;
                    finder.apply_prediction(result, origin)
                }
                None => {
                    finder.set_keyword(keyword);
                    finder.view(origin)
                }
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                let prediction = finder.session().selection().prediction_result.clone();
                print_reconciliation(
                    &out,
                    finder.session().selection().search_keyword.as_deref(),
                    prediction.as_ref(),
                    origin,
                );
            }
        }

        Commands::Register { name, phone, location, photos, code } => {
            println!("📝 market-finder - 店舗登録\n");
            let client = ApiClient::for_registration(&config)?;

            let code = match code {
                Some(code) => code,
                None => dialoguer::Input::<String>::new()
                    .with_prompt("確認コード")
                    .interact_text()
                    .map_err(|e| MarketFinderError::Prompt(e.to_string()))?,
            };

            register::verify_code(&code)?;

            let mut registration = ShopRegistration::new(name);
            registration.phone = phone;
            registration.location = location.or(origin);
            for path in &photos {
                registration.photos.push(photo::prepare_photo(path, None, config.max_image_size)?);
            }

            let pb = spinner("登録中...");
            let result = register::register_shop(&client, &code, &registration).await;
            pb.finish_and_clear();

            match result? {
                Some(message) => println!("✔ 店舗を登録しました: {}", message),
                None => println!("✔ 店舗を登録しました"),
            }
        }

        Commands::Clear => {
            let mut store = FileStore::open(&state_dir);
            match store.get(SELECTED_MARKET_KEY) {
                Some(id) => {
                    store.remove(SELECTED_MARKET_KEY)?;
                    println!("✔ 市場の選択を解除しました: {}", id);
                }
                None => println!("選択中の市場はありません"),
            }
        }

        Commands::Config { set_api_base_url, set_predict_url, set_register_url, set_language, show } => {
            let mut changed = false;

            if let Some(url) = set_api_base_url {
                config.api_base_url = Some(url);
                changed = true;
            }
            if let Some(url) = set_predict_url {
                config.predict_url = url;
                changed = true;
            }
            if let Some(url) = set_register_url {
                config.register_url = Some(url);
                changed = true;
            }
            if let Some(lang) = set_language {
                config.language = lang;
                changed = true;
            }
            if changed {
                config.save()?;
                println!("✔ 設定を保存しました");
            }

            if show || !changed {
                println!("設定:");
                println!("  一覧API: {}", config.api_base_url().unwrap_or_else(|_| "未設定".into()));
                println!("  予測API: {}", config.predict_url());
                println!("  登録API: {}", config.register_url().unwrap_or_else(|_| "未設定".into()));
                println!("  言語: {} ({})", config.language, config.language.native_name());
                println!("  最大画像サイズ: {}px", config.max_image_size);
                println!("  タイムアウト: {}秒", config.timeout_seconds);
                println!("  保存先: {}", state_dir.display());
            }
        }
    }

    Ok(())
}

fn build_finder(config: &Config, state_dir: &Path, language: LanguageCode) -> Result<Finder> {
    let client = ApiClient::from_config(config)?;
    let store = FileStore::open(state_dir);
    Ok(MarketFinder::new(client, store, language))
}

async fn refresh_markets(finder: &mut Finder) -> Result<()> {
    let before = finder.session().selected_market_id().map(str::to_string);

    let pb = spinner("市場一覧を取得中...");
    let result = finder.refresh_markets().await.map(|_| ());
    pb.finish_and_clear();
    result?;

    if let (Some(id), None) = (before, finder.session().selected_market_id()) {
        println!("⚠ 保存されていた市場 ({}) が見つからないため、選択を解除しました\n", id);
    }
    Ok(())
}

async fn load_selected_shops(finder: &mut Finder) -> Result<()> {
    let pb = spinner("店舗一覧を取得中...");
    let result = finder.load_shops().await;
    pb.finish_and_clear();
    result?;
    Ok(())
}

fn pick_market(markets: &[Market]) -> Result<Option<String>> {
    if markets.is_empty() {
        println!("市場がありません");
        return Ok(None);
    }

    let labels: Vec<String> = markets
        .iter()
        .map(|m| format!("{} ({})", m.name, m.id))
        .collect();

    let choice = dialoguer::Select::new()
        .with_prompt("市場を選択してください")
        .items(&labels)
        .default(0)
        .interact_opt()
        .map_err(|e| MarketFinderError::Prompt(e.to_string()))?;

    Ok(choice.map(|i| markets[i].id.clone()))
}

fn print_reconciliation(
    out: &Reconciliation,
    keyword: Option<&str>,
    prediction: Option<&PredictionResult>,
    origin: Option<Coordinates>,
) {
    if out.selection_invalid {
        println!("⚠ 保存されていた市場が見つかりません");
    }

    match out.view_mode {
        ViewMode::Markets => {
            println!("市場一覧:");
            display::print_markets(&out.visible_markets, None, origin);
        }
        ViewMode::Shops => {
            if let Some(market) = &out.selected_market {
                println!("{}", market.name);
            }
            if let Some(prediction) = prediction {
                println!("認識結果: {} ({:.0}%)", prediction.chosen_label, prediction.confidence * 100.0);
                if let Some(explanation) = &prediction.explanation {
                    println!("  {}: {}", explanation.title, explanation.summary);
                }
            }

            match keyword {
                _ if out.empty_prediction => println!("一致する店舗が見つかりませんでした"),
                Some(k) if out.visible_shops.is_empty() => println!("\"{}\" の検索結果はありません", k),
                _ => display::print_shops(&out.visible_shops, keyword, origin),
            }
        }
    }
}

fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
