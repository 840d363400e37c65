//! 一覧の表示

use market_finder_common::types::format_price;
use market_finder_common::{format_distance, Coordinates, Located, Market, Product, Shop};

fn distance_label<T: Located>(item: &T, origin: Option<Coordinates>) -> String {
    let coords = item.coordinates();
    match origin {
        Some(origin) if coords.is_valid() => format!(" ({})", format_distance(origin.distance_to(&coords))),
        Some(_) => " (位置不明)".to_string(),
        None => String::new(),
    }
}

pub fn print_markets(markets: &[Market], selected: Option<&str>, origin: Option<Coordinates>) {
    if markets.is_empty() {
        println!("市場がありません");
        return;
    }

    for market in markets {
        let mark = if selected == Some(market.id.as_str()) { "*" } else { " " };
        println!(
            "{} [{}] {}{}",
            mark,
            market.id,
            market.name,
            distance_label(market, origin)
        );
        if let Some(description) = &market.description {
            println!("      {}", description);
        }
    }
}

pub fn print_shops(shops: &[Shop], keyword: Option<&str>, origin: Option<Coordinates>) {
    match keyword {
        Some(k) => println!("{}件の店舗 ({})", shops.len(), k),
        None => println!("{}件の店舗", shops.len()),
    }

    for shop in shops {
        let rating = if shop.rating > 0.0 {
            format!(" ★{:.1}", shop.rating)
        } else {
            String::new()
        };
        println!("  [{}] {}{}{}", shop.id, shop.name, rating, distance_label(shop, origin));
        if let Some(description) = &shop.description {
            println!("      {}", description);
        }
        for item in &shop.menu {
            println!("      - {} {}", item.name, format_price(item.price));
        }
    }
}

pub fn print_products(products: &[Product]) {
    if products.is_empty() {
        println!("商品がありません");
        return;
    }

    for product in products {
        println!("  [{}] {} {}", product.id, product.name, format_price(product.price));
        if let Some(description) = &product.description {
            println!("      {}", description);
        }
    }
}
