//! HTTP client for the bot's REST API.
//!
//! Read endpoints are unauthenticated. Mutating lifecycle and trading
//! endpoints carry the session token verbatim in the `Authorization` header
//! (no `Bearer` prefix), which is what the bot expects.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::{Client as HttpClient, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::dto::{
    error_detail, LoginRequest, LoginResponse, StartRequest, StatusResponse, SymbolsResponse,
};
use crate::config::ApiConfig;
use crate::domain::{
    CommandAck, ManualTradeRequest, NewsItem, StatusSnapshot, StrategyConfig, SystemError, Trade,
};
use crate::error::{Error, Result};
use crate::port::BotApi;

pub struct HttpBotApi {
    http: HttpClient,
    base_url: String,
}

impl HttpBotApi {
    /// Create a client with default reqwest settings.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: HttpClient::new(),
            base_url: normalize_base(base_url.into()),
        }
    }

    #[must_use]
    pub fn from_config(config: &ApiConfig) -> Self {
        let http = HttpClient::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .connect_timeout(Duration::from_millis(config.connect_timeout_ms))
            .build()
            .unwrap_or_else(|err| {
                warn!(error = %err, "Failed to build HTTP client, using defaults");
                HttpClient::new()
            });

        Self {
            http,
            base_url: normalize_base(config.base_url.clone()),
        }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T>(&self, path: &str) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let url = self.url(path);
        debug!(url = %url, "GET");
        let response = self.http.get(&url).send().await?;
        decode(response).await
    }

    async fn post<B>(&self, path: &str, token: Option<&str>, body: Option<&B>) -> Result<Response>
    where
        B: Serialize + ?Sized,
    {
        let url = self.url(path);
        debug!(url = %url, authenticated = token.is_some(), "POST");
        let mut request: RequestBuilder = self.http.post(&url);
        if let Some(token) = token {
            request = request.header(AUTHORIZATION, token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().await?;
        check_status(response).await
    }

    async fn command<B>(&self, path: &str, token: Option<&str>, body: Option<&B>) -> Result<CommandAck>
    where
        B: Serialize + ?Sized,
    {
        let response = self.post(path, token, body).await?;
        let text = response.text().await?;
        Ok(parse_ack(path, &text))
    }
}

/// Commands succeed on any 2xx; a body that does not parse still counts as
/// an acknowledgement.
fn parse_ack(path: &str, text: &str) -> CommandAck {
    if text.trim().is_empty() {
        return CommandAck::default();
    }
    match serde_json::from_str::<Value>(text) {
        Ok(value) => CommandAck::from_value(&value),
        Err(e) => {
            debug!(path, error = %e, "Unparseable command acknowledgement");
            CommandAck::default()
        }
    }
}

fn normalize_base(base_url: String) -> String {
    base_url.trim_end_matches('/').to_string()
}

/// Turn a non-2xx response into [`Error::Server`] with the bot's `detail`.
async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let detail = error_detail(&body)
        .or_else(|| status.canonical_reason().map(str::to_string))
        .unwrap_or_else(|| "request failed".to_string());
    Err(Error::Server {
        status: status.as_u16(),
        detail,
    })
}

async fn decode<T>(response: Response) -> Result<T>
where
    T: DeserializeOwned,
{
    let response = check_status(response).await?;
    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}

#[async_trait]
impl BotApi for HttpBotApi {
    async fn login(&self, password: &str) -> Result<String> {
        let response = self
            .post("/api/login", None, Some(&LoginRequest { password }))
            .await?;
        let body: LoginResponse = serde_json::from_slice(&response.bytes().await?)?;
        Ok(body.token)
    }

    async fn logout(&self, token: &str) -> Result<()> {
        self.post::<()>("/api/logout", Some(token), None).await?;
        Ok(())
    }

    async fn status(&self) -> Result<StatusSnapshot> {
        let response: StatusResponse = self.get_json("/api/status").await?;
        Ok(response.into())
    }

    async fn trades(&self) -> Result<Vec<Trade>> {
        self.get_json("/api/trades").await
    }

    async fn news(&self, limit: usize) -> Result<Vec<NewsItem>> {
        self.get_json(&format!("/api/news?limit={limit}")).await
    }

    async fn errors(&self) -> Result<Vec<SystemError>> {
        self.get_json("/api/errors").await
    }

    async fn resolve_error(&self, id: &str) -> Result<()> {
        let path = format!("/api/errors/resolve/{}", encode_segment(id));
        self.post::<()>(&path, None, None).await?;
        Ok(())
    }

    async fn start(&self, token: &str, symbols: &[String]) -> Result<CommandAck> {
        let body = StartRequest {
            symbols: (!symbols.is_empty()).then_some(symbols),
        };
        self.command("/api/start", Some(token), Some(&body)).await
    }

    async fn stop(&self, token: &str) -> Result<CommandAck> {
        self.command::<()>("/api/stop", Some(token), None).await
    }

    async fn emergency_stop(&self, token: &str) -> Result<CommandAck> {
        self.command::<()>("/api/emergency-stop", Some(token), None)
            .await
    }

    async fn manual_trade(
        &self,
        token: &str,
        request: &ManualTradeRequest,
    ) -> Result<CommandAck> {
        self.command("/api/trade/manual", Some(token), Some(request))
            .await
    }

    async fn update_strategy(&self, config: &StrategyConfig) -> Result<CommandAck> {
        self.command("/api/strategy/update", None, Some(config))
            .await
    }

    async fn strategy(&self) -> Result<StrategyConfig> {
        self.get_json("/api/strategy").await
    }

    async fn symbols(&self) -> Result<Vec<String>> {
        let response: SymbolsResponse = self.get_json("/api/symbols").await?;
        Ok(response.symbols)
    }

    async fn update_symbols(&self, symbols: &[String]) -> Result<CommandAck> {
        self.command("/api/symbols/update", None, Some(symbols))
            .await
    }

    async fn health(&self) -> Result<()> {
        let _: Value = self.get_json("/healthz").await?;
        Ok(())
    }
}

/// Percent-encode a single path segment.
fn encode_segment(segment: &str) -> String {
    let mut url = match url::Url::parse("http://placeholder/") {
        Ok(url) => url,
        Err(_) => return segment.to_string(),
    };
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.push(segment);
    }
    url.path().trim_start_matches('/').to_string()
}
