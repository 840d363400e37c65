//! 店舗登録のテスト
//!
//! 確認コード・入力検証を通ったものだけが登録APIへ送られることを検証

use async_trait::async_trait;
use market_finder::api::RegistrationProvider;
use market_finder::error::{MarketFinderError, Result};
use market_finder::register::{register_shop, RegistrationError, ShopRegistration, VERIFICATION_CODE};
use market_finder_common::Coordinates;
use std::sync::Mutex;

#[derive(Default)]
struct RecordingProvider {
    received: Mutex<Vec<String>>,
}

#[async_trait]
impl RegistrationProvider for RecordingProvider {
    async fn register_shop(&self, registration: &ShopRegistration) -> Result<Option<String>> {
        self.received.lock().unwrap().push(registration.name.clone());
        Ok(Some("registered".to_string()))
    }
}

fn registration() -> ShopRegistration {
    ShopRegistration::new("할매국밥")
        .location(Coordinates::new(35.1, 129.03))
        .photo(vec![0xff, 0xd8])
}

/// 正しい内容は送信される
#[tokio::test]
async fn test_register_valid() {
    let provider = RecordingProvider::default();

    let message = register_shop(&provider, VERIFICATION_CODE, &registration()).await.unwrap();

    assert_eq!(message.as_deref(), Some("registered"));
    assert_eq!(*provider.received.lock().unwrap(), vec!["할매국밥".to_string()]);
}

/// 確認コードが違えば送信しない
#[tokio::test]
async fn test_register_wrong_code() {
    let provider = RecordingProvider::default();

    let err = register_shop(&provider, "1234", &registration()).await.unwrap_err();

    assert!(matches!(
        err,
        MarketFinderError::Registration(RegistrationError::InvalidVerificationCode)
    ));
    assert!(provider.received.lock().unwrap().is_empty());
}

/// 入力の不備があれば送信しない
#[tokio::test]
async fn test_register_invalid_fields() {
    let provider = RecordingProvider::default();

    let mut no_name = registration();
    no_name.name = " ".to_string();
    let mut origin = registration();
    origin.location = Some(Coordinates::new(0.0, 0.0));
    let mut no_photo = registration();
    no_photo.photos.clear();

    let cases = [
        (no_name, RegistrationError::MissingName),
        (origin, RegistrationError::MissingLocation),
        (no_photo, RegistrationError::MissingPhoto),
    ];
    for (reg, expected) in cases {
        let err = register_shop(&provider, VERIFICATION_CODE, &reg).await.unwrap_err();
        assert!(
            matches!(err, MarketFinderError::Registration(e) if e == expected),
            "期待したエラーではない: {:?}",
            expected
        );
    }

    assert!(provider.received.lock().unwrap().is_empty());
}

/// エラーメッセージは不備の内容をそのまま表示する
#[test]
fn test_registration_error_display() {
    let err: MarketFinderError = RegistrationError::MissingPhoto.into();
    assert_eq!(format!("{}", err), format!("{}", RegistrationError::MissingPhoto));
}
