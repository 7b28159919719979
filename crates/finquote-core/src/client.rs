use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::http::{HttpAuth, HttpClient, HttpRequest, ReqwestHttpClient};
use crate::payload::{SearchPayload, StockPayload};
use crate::throttle::RequestBudget;
use crate::{QuoteError, Stock};

const DEFAULT_BASE_URL: &str = "https://api.finquote.dev";

/// Configuration for [`QuoteClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub auth: HttpAuth,
    pub timeout_ms: u64,
    pub quota_window: Duration,
    pub quota_limit: u32,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            auth: HttpAuth::None,
            timeout_ms: 3_000,
            quota_window: Duration::from_secs(60),
            quota_limit: 120,
        }
    }

    /// Build a configuration from `FINQUOTE_BASE_URL` and `FINQUOTE_API_KEY`.
    pub fn from_env() -> Self {
        let base_url =
            std::env::var("FINQUOTE_BASE_URL").unwrap_or_else(|_| String::from(DEFAULT_BASE_URL));
        let auth = match std::env::var("FINQUOTE_API_KEY") {
            Ok(key) => HttpAuth::Header {
                name: String::from("x-api-key"),
                value: key,
            },
            Err(_) => HttpAuth::None,
        };

        Self {
            auth,
            ..Self::new(base_url)
        }
    }

    pub fn with_auth(mut self, auth: HttpAuth) -> Self {
        self.auth = auth;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

/// Client for the quote service.
///
/// The client is a shared, externally owned collaborator: instruments hold an
/// `Arc` to it for refreshes but never manage its lifecycle. All failures are
/// propagated verbatim; there are no retries and no local recovery.
pub struct QuoteClient {
    http: Arc<dyn HttpClient>,
    config: ClientConfig,
    budget: RequestBudget,
}

impl QuoteClient {
    pub fn new(config: ClientConfig) -> Self {
        Self::with_http_client(config, Arc::new(ReqwestHttpClient::new()))
    }

    /// Build a client over a custom transport, e.g. a scripted one in tests.
    pub fn with_http_client(config: ClientConfig, http: Arc<dyn HttpClient>) -> Self {
        let budget = RequestBudget::new(config.quota_window, config.quota_limit);
        Self {
            http,
            config,
            budget,
        }
    }

    /// Fetch the current snapshot for one ticker.
    pub async fn fetch_stock(&self, ticker: &str) -> Result<StockPayload, QuoteError> {
        let url = format!(
            "{}/stocks/{}",
            self.config.base_url,
            urlencoding::encode(ticker)
        );
        let body = self.execute(&url, ticker).await?;

        let payload = decode::<StockPayload>(&body)?;
        payload.validate()?;
        Ok(payload)
    }

    /// Look up snapshots matching a free-text query.
    pub async fn search_stocks(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<StockPayload>, QuoteError> {
        let url = format!(
            "{}/search?query={}&limit={}",
            self.config.base_url,
            urlencoding::encode(query),
            limit
        );
        let body = self.execute(&url, query).await?;

        let payload = decode::<SearchPayload>(&body)?;
        for result in &payload.results {
            result.validate()?;
        }
        Ok(payload.results)
    }

    /// Fetch a ticker and wrap it in a ready [`Stock`] holding this client.
    pub async fn get_stock(self: &Arc<Self>, ticker: &str) -> Result<Stock, QuoteError> {
        let payload = self.fetch_stock(ticker).await?;
        Stock::new(Arc::clone(self), payload)
    }

    /// Search and wrap every result in a [`Stock`] holding this client.
    pub async fn search(
        self: &Arc<Self>,
        query: &str,
        limit: usize,
    ) -> Result<Vec<Stock>, QuoteError> {
        let payloads = self.search_stocks(query, limit).await?;
        payloads
            .into_iter()
            .map(|payload| Stock::new(Arc::clone(self), payload))
            .collect()
    }

    async fn execute(&self, url: &str, subject: &str) -> Result<String, QuoteError> {
        if !self.budget.try_acquire() {
            warn!(url, "local request budget exhausted");
            return Err(QuoteError::RateLimited);
        }

        debug!(url, "issuing quote request");
        let request = HttpRequest::new(url, &self.config.auth, self.config.timeout_ms);
        let response = self.http.execute(request).await?;

        if response.is_success() {
            return Ok(response.body);
        }

        match response.status {
            404 => Err(QuoteError::NotFound {
                ticker: subject.to_owned(),
            }),
            401 | 403 => Err(QuoteError::Unauthorized {
                status: response.status,
            }),
            429 => Err(QuoteError::RateLimited),
            status => {
                warn!(url, status, "quote service returned non-success status");
                Err(QuoteError::UpstreamStatus { status })
            }
        }
    }
}

fn decode<T: serde::de::DeserializeOwned>(body: &str) -> Result<T, QuoteError> {
    serde_json::from_str(body).map_err(|e| QuoteError::malformed(e.to_string()))
}
