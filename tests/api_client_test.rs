//! APIクライアントのテスト
//!
//! ローカルのTCPサーバーに固定レスポンスを返させ、
//! リクエストの形とレスポンスの扱いを検証

use market_finder::api::{ApiClient, MarketProvider, PredictionProvider, RegistrationProvider};
use market_finder::error::MarketFinderError;
use market_finder::language::LanguageCode;
use market_finder::register::ShopRegistration;
use market_finder_common::Coordinates;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// 1回だけ応答するサーバーを立て、(ベースURL, 受信したリクエスト) を返す
async fn serve_once(status: u16, body: &'static str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind listener");
    let addr = listener.local_addr().expect("Failed to get local addr");

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.expect("Failed to accept");
        let request = read_request(&mut socket).await;

        let response = format!(
            "HTTP/1.1 {} Canned\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );
        socket
            .write_all(response.as_bytes())
            .await
            .expect("Failed to write response");
        socket.shutdown().await.ok();
        request
    });

    (format!("http://{}", addr), handle)
}

/// ヘッダーとContent-Length分の本文を読む
async fn read_request(socket: &mut tokio::net::TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    loop {
        let n = socket.read(&mut chunk).await.expect("Failed to read request");
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);

        let text = String::from_utf8_lossy(&buf);
        if let Some(header_end) = text.find("\r\n\r\n") {
            let headers = text[..header_end].to_ascii_lowercase();
            let body_len = buf.len() - (header_end + 4);

            if let Some(len) = headers
                .lines()
                .find_map(|l| l.strip_prefix("content-length:"))
                .and_then(|v| v.trim().parse::<usize>().ok())
            {
                if body_len >= len {
                    break;
                }
            } else if headers.contains("transfer-encoding: chunked") {
                if text.ends_with("0\r\n\r\n") {
                    break;
                }
            } else {
                break;
            }
        }
    }

    String::from_utf8_lossy(&buf).into_owned()
}

fn client(base_url: &str) -> ApiClient {
    ApiClient::new(base_url, format!("{}/predict", base_url), Duration::from_secs(5))
        .expect("Failed to build client")
}

fn request_line(request: &str) -> &str {
    request.lines().next().unwrap_or_default()
}

/// 市場一覧: GET /markets?lang_code=
#[tokio::test]
async fn test_fetch_markets_request() {
    let (base, server) = serve_once(
        200,
        r#"[{"id": 1, "created_at": "", "name": "부전시장", "lat": "35.16", "lon": 129.06}]"#,
    )
    .await;

    let markets = client(&base).fetch_markets(LanguageCode::Ko).await.unwrap();
    let request = server.await.unwrap();

    assert_eq!(request_line(&request), "GET /markets?lang_code=ko HTTP/1.1");
    assert_eq!(markets.len(), 1);
    assert_eq!(markets[0].id, "1");
    assert_eq!(markets[0].latitude, 35.16);
    assert_eq!(markets[0].category, "전통시장");
}

/// 店舗一覧: GET /markets/{id}/stores
#[tokio::test]
async fn test_fetch_shops_request() {
    let (base, server) = serve_once(
        200,
        r#"[{"id": 7, "name": "원조호떡", "lat": 35.1, "lon": 129.0, "address": "", "summary": "씨앗호떡", "rating": 4.5}]"#,
    )
    .await;

    let shops = client(&base)
        .fetch_shops_by_market_id("3", LanguageCode::En)
        .await
        .unwrap();
    let request = server.await.unwrap();

    assert_eq!(request_line(&request), "GET /markets/3/stores?lang_code=en HTTP/1.1");
    assert_eq!(shops.len(), 1);
    assert_eq!(shops[0].id, "7");
    assert_eq!(shops[0].address, None);
    assert_eq!(shops[0].description.as_deref(), Some("씨앗호떡"));
}

/// 商品一覧: GET /stores/{id}/products
#[tokio::test]
async fn test_fetch_products_request() {
    let (base, server) = serve_once(200, r#"[{"id": 11, "name": "호떡", "price": 1500}]"#).await;

    let products = client(&base)
        .fetch_products_by_shop_id("7", LanguageCode::Ja)
        .await
        .unwrap();
    let request = server.await.unwrap();

    assert_eq!(request_line(&request), "GET /stores/7/products?lang_code=ja HTTP/1.1");
    assert_eq!(products[0].id, "11");
    assert_eq!(products[0].price, 1500.0);
}

/// ベースURL末尾のスラッシュは取り除く
#[tokio::test]
async fn test_base_url_trailing_slash() {
    let (base, server) = serve_once(200, "[]").await;

    let client = ApiClient::new(format!("{}/", base), "http://unused/", Duration::from_secs(5)).unwrap();
    assert_eq!(client.base_url(), base);

    client.fetch_markets(LanguageCode::En).await.unwrap();
    let request = server.await.unwrap();
    assert_eq!(request_line(&request), "GET /markets?lang_code=en HTTP/1.1");
}

/// 2xx以外はHttpStatus
#[tokio::test]
async fn test_http_error_status() {
    let (base, server) = serve_once(500, r#"{"detail": "boom"}"#).await;

    let err = client(&base).fetch_markets(LanguageCode::En).await.unwrap_err();
    server.await.unwrap();

    match err {
        MarketFinderError::HttpStatus { status, url } => {
            assert_eq!(status, 500);
            assert!(url.ends_with("/markets"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

/// 解析できない本文はApiParse
#[tokio::test]
async fn test_invalid_json_body() {
    let (base, server) = serve_once(200, "{ not json").await;

    let err = client(&base)
        .fetch_shops_by_market_id("1", LanguageCode::En)
        .await
        .unwrap_err();
    server.await.unwrap();

    assert!(matches!(err, MarketFinderError::ApiParse(_)));
    assert!(err.is_fetch_failure());
}

/// 予測: multipartで file / lang_code / market_no を送る
#[tokio::test]
async fn test_predict_multipart_fields() {
    let (base, server) = serve_once(
        200,
        r#"{"label": "hotteok", "confidence": 0.9, "chosen_label": "호떡", "shops": [
            {"store_id": 42, "store_name": "원조호떡", "lat": 35.1, "lon": 129.0, "address": "",
             "menu_id": 1, "menu_name": "씨앗호떡", "menu_price": 2000, "similarity": 0.8, "menus": []}
        ]}"#,
    )
    .await;

    let result = client(&base)
        .predict(b"JPEGDATA".to_vec(), LanguageCode::Ko, "3")
        .await
        .unwrap();
    let request = server.await.unwrap();

    assert_eq!(request_line(&request), "POST /predict HTTP/1.1");
    assert!(request.to_ascii_lowercase().contains("content-type: multipart/form-data"));
    assert!(request.contains(r#"name="file"; filename="food_photo.jpg""#));
    assert!(request.contains("image/jpeg"));
    assert!(request.contains("JPEGDATA"));
    assert!(request.contains("name=\"lang_code\"\r\n\r\nko\r\n"));
    assert!(request.contains("name=\"market_no\"\r\n\r\n3\r\n"));

    assert_eq!(result.chosen_label, "호떡");
    assert_eq!(result.shops.len(), 1);
    assert_eq!(result.shops[0].store_id, 42);
}

/// 予測の失敗
#[tokio::test]
async fn test_predict_error_status() {
    let (base, server) = serve_once(503, "").await;

    let err = client(&base)
        .predict(vec![0xff, 0xd8], LanguageCode::En, "1")
        .await
        .unwrap_err();
    server.await.unwrap();

    assert!(matches!(err, MarketFinderError::HttpStatus { status: 503, .. }));
}

fn registration() -> ShopRegistration {
    ShopRegistration::new("할매국밥")
        .phone("051-123-4567")
        .location(Coordinates::new(35.1, 129.03))
        .photo(b"PHOTO0".to_vec())
        .photo(b"PHOTO1".to_vec())
}

/// 登録: multipartで name / call_number / files を送る
#[tokio::test]
async fn test_register_multipart_fields() {
    let (base, server) = serve_once(200, r#"{"message": "ok"}"#).await;
    let client = client(&base).with_register_url(format!("{}/register", base));

    let message = client.register_shop(&registration()).await.unwrap();
    let request = server.await.unwrap();

    assert_eq!(request_line(&request), "POST /register HTTP/1.1");
    assert!(request.contains("name=\"name\"\r\n\r\n할매국밥\r\n"));
    assert!(request.contains("name=\"call_number\"\r\n\r\n051-123-4567\r\n"));
    assert!(request.contains(r#"name="files"; filename="shop_photo_0.jpg""#));
    assert!(request.contains(r#"name="files"; filename="shop_photo_1.jpg""#));
    assert!(request.contains("PHOTO0"));
    assert!(request.contains("PHOTO1"));
    assert_eq!(message.as_deref(), Some("ok"));
}

/// 登録の失敗はサーバーのmessageを返す
#[tokio::test]
async fn test_register_rejected_message() {
    let (base, server) = serve_once(400, r#"{"message": "이미 등록된 가게입니다."}"#).await;
    let client = client(&base).with_register_url(format!("{}/register", base));

    let err = client.register_shop(&registration()).await.unwrap_err();
    server.await.unwrap();

    match err {
        MarketFinderError::RegistrationRejected { status, message } => {
            assert_eq!(status, 400);
            assert_eq!(message, "이미 등록된 가게입니다.");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

/// messageがなければ既定の文言
#[tokio::test]
async fn test_register_rejected_without_message() {
    let (base, server) = serve_once(500, "Internal Server Error").await;
    let client = client(&base).with_register_url(format!("{}/register", base));

    let err = client.register_shop(&registration()).await.unwrap_err();
    server.await.unwrap();

    assert!(matches!(
        err,
        MarketFinderError::RegistrationRejected { status: 500, ref message } if message == "등록에 실패했습니다."
    ));
}

/// 登録URL未設定
#[tokio::test]
async fn test_register_without_url() {
    let client = client("http://127.0.0.1:9");

    let err = client.register_shop(&registration()).await.unwrap_err();
    assert!(matches!(err, MarketFinderError::MissingRegisterUrl));
}
