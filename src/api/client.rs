//! reqwestによるAPIクライアント

use super::types::{MarketApiResponse, ProductApiResponse, RegisterApiResponse, StoreApiResponse};
use super::{MarketProvider, PredictionProvider, RegistrationProvider};
use crate::config::Config;
use crate::error::{MarketFinderError, Result};
use crate::language::LanguageCode;
use crate::register::ShopRegistration;
use async_trait::async_trait;
use market_finder_common::{Market, PredictionResult, Product, Shop};
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

const PHOTO_FILE_NAME: &str = "food_photo.jpg";
const REGISTER_FAILED_MESSAGE: &str = "등록에 실패했습니다.";

pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    predict_url: String,
    register_url: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, predict_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            predict_url: predict_url.into(),
            register_url: None,
        })
    }

    pub fn with_register_url(mut self, url: impl Into<String>) -> Self {
        self.register_url = Some(url.into());
        self
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let client = Self::new(
            config.api_base_url()?,
            config.predict_url(),
            Duration::from_secs(config.timeout_seconds),
        )?;
        Ok(match config.register_url() {
            Ok(url) => client.with_register_url(url),
            Err(_) => client,
        })
    }

    /// 登録専用（一覧APIのURLは不要）
    pub fn for_registration(config: &Config) -> Result<Self> {
        let client = Self::new(
            config.api_base_url().unwrap_or_default(),
            config.predict_url(),
            Duration::from_secs(config.timeout_seconds),
        )?;
        Ok(client.with_register_url(config.register_url()?))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, language: LanguageCode) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, lang = %language, "GET");

        let response = self
            .http
            .get(&url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .query(&[("lang_code", language.code())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!(%url, status = status.as_u16(), "request failed");
            return Err(MarketFinderError::HttpStatus {
                status: status.as_u16(),
                url,
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body)
            .map_err(|e| MarketFinderError::ApiParse(format!("{}: {}", url, e)))
    }
}

#[async_trait]
impl MarketProvider for ApiClient {
    async fn fetch_markets(&self, language: LanguageCode) -> Result<Vec<Market>> {
        let data: Vec<MarketApiResponse> = self.get_json("/markets", language).await?;
        debug!(count = data.len(), "markets fetched");
        Ok(data.into_iter().map(Market::from).collect())
    }

    async fn fetch_shops_by_market_id(
        &self,
        market_id: &str,
        language: LanguageCode,
    ) -> Result<Vec<Shop>> {
        let path = format!("/markets/{}/stores", market_id);
        let data: Vec<StoreApiResponse> = self.get_json(&path, language).await?;
        debug!(market_id, count = data.len(), "stores fetched");
        Ok(data.into_iter().map(Shop::from).collect())
    }

    async fn fetch_products_by_shop_id(
        &self,
        shop_id: &str,
        language: LanguageCode,
    ) -> Result<Vec<Product>> {
        let path = format!("/stores/{}/products", shop_id);
        let data: Vec<ProductApiResponse> = self.get_json(&path, language).await?;
        Ok(data.into_iter().map(Product::from).collect())
    }
}

#[async_trait]
impl PredictionProvider for ApiClient {
    async fn predict(
        &self,
        image: Vec<u8>,
        language: LanguageCode,
        market_id: &str,
    ) -> Result<PredictionResult> {
        debug!(url = %self.predict_url, bytes = image.len(), market_id, "POST predict");

        let file = Part::bytes(image)
            .file_name(PHOTO_FILE_NAME)
            .mime_str("image/jpeg")?;
        let form = Form::new()
            .part("file", file)
            .text("lang_code", language.code())
            .text("market_no", market_id.to_string());

        let response = self
            .http
            .post(&self.predict_url)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), %body, "prediction failed");
            return Err(MarketFinderError::HttpStatus {
                status: status.as_u16(),
                url: self.predict_url.clone(),
            });
        }

        let body = response.text().await?;
        let result = PredictionResult::from_json(&body)
            .map_err(|e| MarketFinderError::ApiParse(format!("{}: {}", self.predict_url, e)))?;
        debug!(label = %result.chosen_label, shops = result.shops.len(), "prediction received");
        Ok(result)
    }
}

#[async_trait]
impl RegistrationProvider for ApiClient {
    async fn register_shop(&self, registration: &ShopRegistration) -> Result<Option<String>> {
        let url = self
            .register_url
            .as_deref()
            .ok_or(MarketFinderError::MissingRegisterUrl)?;
        debug!(%url, photos = registration.photos.len(), "POST register");

        let mut form = Form::new()
            .text("name", registration.name.trim().to_string())
            .text("call_number", registration.call_number().to_string());
        for (i, photo) in registration.photos.iter().enumerate() {
            let part = Part::bytes(photo.clone())
                .file_name(format!("shop_photo_{}.jpg", i))
                .mime_str("image/jpeg")?;
            form = form.part("files", part);
        }

        let response = self.http.post(url).multipart(form).send().await?;
        let status = response.status();
        let body = response.text().await?;
        let parsed: Option<RegisterApiResponse> = serde_json::from_str(&body).ok();

        if !status.is_success() {
            let message = parsed
                .and_then(|r| r.message)
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| REGISTER_FAILED_MESSAGE.to_string());
            warn!(status = status.as_u16(), %message, "registration rejected");
            return Err(MarketFinderError::RegistrationRejected {
                status: status.as_u16(),
                message,
            });
        }

        Ok(parsed.and_then(|r| r.message))
    }
}
