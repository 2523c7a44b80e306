//! Async client for the NOWPayments API

use crate::config::{ApiKey, ClientConfig, Environment};
use crate::endpoint::{Arg, Endpoint, Method};
use crate::types::PaymentRequest;
use crate::{NowPaymentsError, Result};
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{Client, StatusCode};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use tracing::{debug, warn};

/// Header carrying the API key
pub const API_KEY_HEADER: &str = "x-api-key";

/// What an operation produced
#[derive(Debug, Clone, PartialEq)]
pub enum ApiResponse {
    /// Debug mode: the URL that would have been requested; nothing was sent
    Url(String),
    /// Decoded JSON body
    Json(Value),
    /// A GET answered with something other than 200; the body is dropped.
    /// POST never produces this, it decodes whatever comes back.
    NotOk(StatusCode),
}

impl ApiResponse {
    /// The decoded body, if there is one
    pub fn json(&self) -> Option<&Value> {
        match self {
            ApiResponse::Json(value) => Some(value),
            _ => None,
        }
    }

    pub fn into_json(self) -> Option<Value> {
        match self {
            ApiResponse::Json(value) => Some(value),
            _ => None,
        }
    }

    /// The resolved URL, in debug mode
    pub fn url(&self) -> Option<&str> {
        match self {
            ApiResponse::Url(url) => Some(url),
            _ => None,
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiResponse::NotOk(status) => Some(*status),
            _ => None,
        }
    }

    /// Decode the body into a typed model; `None` when there is no body
    pub fn decode<T: DeserializeOwned>(self) -> Result<Option<T>> {
        match self {
            ApiResponse::Json(value) => Ok(Some(serde_json::from_value(value)?)),
            _ => Ok(None),
        }
    }
}

/// Client for the NOWPayments REST API
///
/// Configuration is fixed at construction and the underlying
/// [`reqwest::Client`] is shared, so clones are cheap and a single client
/// can serve any number of concurrent tasks.
#[derive(Clone)]
pub struct NowPaymentsClient {
    http: Client,
    config: ClientConfig,
    headers: HeaderMap,
}

impl fmt::Debug for NowPaymentsClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NowPaymentsClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl NowPaymentsClient {
    /// Create a client for `key`, against the sandbox when `sandbox` is
    /// set. With `debug_mode` every operation returns its URL instead of
    /// sending a request.
    pub fn new(key: impl Into<String>, sandbox: bool, debug_mode: bool) -> Result<Self> {
        let config = ClientConfig::new(key)?
            .with_sandbox(sandbox)
            .with_debug_mode(debug_mode);
        Self::with_config(config)
    }

    /// Create a client from an explicit configuration
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        config.validate()?;

        let headers = auth_headers(&config.api_key, &config.user_agent)?;

        let mut builder = Client::builder().default_headers(headers.clone());
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| NowPaymentsError::config(format!("Failed to create HTTP client: {}", e)))?;

        debug!(
            environment = config.environment.base_url(),
            key = %config.api_key.masked(),
            debug_mode = config.debug_mode,
            "NOWPayments client ready"
        );

        Ok(Self {
            http,
            config,
            headers,
        })
    }

    /// Create a client from `NOWPAYMENTS_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::with_config(ClientConfig::from_env()?)
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn environment(&self) -> &Environment {
        &self.config.environment
    }

    pub fn is_debug_mode(&self) -> bool {
        self.config.debug_mode
    }

    /// Headers attached to every request
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Join an endpoint path onto the configured base URL
    pub fn resolve_url(&self, endpoint_path: &str) -> String {
        self.config.environment.resolve_url(endpoint_path)
    }

    /// Full URL for an endpoint with its positional arguments filled in
    pub fn endpoint_url(&self, endpoint: Endpoint, args: &[Arg<'_>]) -> Result<String> {
        Ok(self.resolve_url(&endpoint.render(args)?))
    }

    /// GET an endpoint.
    ///
    /// A 200 response is decoded as JSON. Any other status yields
    /// [`ApiResponse::NotOk`] and the body is only logged.
    pub async fn get(&self, endpoint: Endpoint, args: &[Arg<'_>]) -> Result<ApiResponse> {
        endpoint.expect_method(Method::Get)?;
        let url = self.endpoint_url(endpoint, args)?;
        if self.config.debug_mode {
            return Ok(ApiResponse::Url(url));
        }

        debug!(%endpoint, %url, "GET");
        let response = self.http.get(&url).send().await?;
        let status = response.status();
        let text = response.text().await?;

        if status != StatusCode::OK {
            warn!(%endpoint, %status, body = %text, "request rejected");
            return Ok(ApiResponse::NotOk(status));
        }

        debug!(%endpoint, %status, body = %text, "response");
        Ok(ApiResponse::Json(serde_json::from_str(&text)?))
    }

    /// POST a JSON body to an endpoint.
    ///
    /// The status code is not inspected: whatever comes back is decoded as
    /// JSON, and a non-JSON body is an error.
    pub async fn post<B>(&self, endpoint: Endpoint, body: &B) -> Result<ApiResponse>
    where
        B: Serialize + ?Sized,
    {
        endpoint.expect_method(Method::Post)?;
        let url = self.endpoint_url(endpoint, &[])?;
        if self.config.debug_mode {
            return Ok(ApiResponse::Url(url));
        }

        debug!(%endpoint, %url, "POST");
        let response = self.http.post(&url).json(body).send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            warn!(%endpoint, %status, body = %text, "request rejected");
        } else {
            debug!(%endpoint, %status, body = %text, "response");
        }
        Ok(ApiResponse::Json(serde_json::from_str(&text)?))
    }

    /// GET an endpoint by registry name, e.g. `"PAYMENT_STATUS"`
    pub async fn get_by_name(&self, name: &str, args: &[Arg<'_>]) -> Result<ApiResponse> {
        self.get(name.parse()?, args).await
    }

    /// POST to an endpoint by registry name
    pub async fn post_by_name<B>(&self, name: &str, body: &B) -> Result<ApiResponse>
    where
        B: Serialize + ?Sized,
    {
        self.post(name.parse()?, body).await
    }

    /// Current state of the API; `{"message": "OK"}` when healthy
    pub async fn status(&self) -> Result<ApiResponse> {
        self.get(Endpoint::Status, &[]).await
    }

    /// All cryptocurrencies available for payments
    pub async fn currencies(&self) -> Result<ApiResponse> {
        self.get(Endpoint::Currencies, &[]).await
    }

    /// Coins enabled under "coins settings" in the merchant account
    pub async fn merchant_coins(&self) -> Result<ApiResponse> {
        self.get(Endpoint::MerchantCoins, &[]).await
    }

    /// Approximate price in `currency_to` for `amount` of fiat `currency_from`
    ///
    /// `amount` may be an integer, a float or a [`Decimal`]; a float that has
    /// no decimal form (NaN, infinities) is rejected with `InvalidAmount`.
    pub async fn estimate<A>(
        &self,
        amount: A,
        currency_from: &str,
        currency_to: &str,
    ) -> Result<ApiResponse>
    where
        A: TryInto<Decimal>,
        A::Error: fmt::Display,
    {
        let amount: Decimal = amount.try_into().map_err(|e| NowPaymentsError::InvalidAmount {
            message: e.to_string(),
        })?;
        self.get(Endpoint::Estimate, &[&amount, &currency_from, &currency_to])
            .await
    }

    /// Create a payment the customer can complete without leaving the site
    pub async fn create_payment(&self, request: &PaymentRequest) -> Result<ApiResponse> {
        self.post(Endpoint::Payment, request).await
    }

    /// Current information about a payment
    pub async fn payment_status(&self, payment_id: impl fmt::Display + Send + Sync) -> Result<ApiResponse> {
        self.get(Endpoint::PaymentStatus, &[&payment_id]).await
    }

    /// Minimum payment amount for a currency pair
    pub async fn min_amount(&self, currency_from: &str, currency_to: &str) -> Result<ApiResponse> {
        self.get(Endpoint::MinAmount, &[&currency_from, &currency_to])
            .await
    }
}

fn auth_headers(api_key: &ApiKey, user_agent: &str) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();

    let mut key = HeaderValue::from_str(api_key.expose())
        .map_err(|e| NowPaymentsError::config(format!("Invalid API key header: {}", e)))?;
    key.set_sensitive(true);
    headers.insert(API_KEY_HEADER, key);

    let agent = HeaderValue::from_str(user_agent)
        .map_err(|e| NowPaymentsError::config(format!("Invalid user agent: {}", e)))?;
    headers.insert(USER_AGENT, agent);

    Ok(headers)
}
