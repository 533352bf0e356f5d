use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use tracing::{debug, warn};

use super::{parse_payload, SeatStatusSource};
use crate::config::SourceConfig;
use crate::domain::{SeatQuery, SeatStatusMap};
use crate::retry::{retry_with_backoff, CircuitBreaker, RetryConfig};
use crate::{Result, SeatLayoutError};

/// Fetches `GET <base>/buses/<bus_id>/seats?date=<YYYY-MM-DD>`.
pub struct HttpSeatStatusSource {
    client: reqwest::Client,
    base_url: String,
    retry: RetryConfig,
    breaker: CircuitBreaker,
}

impl HttpSeatStatusSource {
    pub fn from_config(config: &SourceConfig) -> Result<Self> {
        let base_url = config.base_url.clone().ok_or_else(|| {
            SeatLayoutError::InvalidArgument("seat.source.url is not set".to_string())
        })?;

        let mut headers = HeaderMap::new();
        for (name, value) in &config.headers {
            let name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
                SeatLayoutError::InvalidArgument(format!("Invalid header name {}: {}", name, e))
            })?;
            let value = HeaderValue::from_str(value).map_err(|e| {
                SeatLayoutError::InvalidArgument(format!("Invalid header value for {}: {}", name, e))
            })?;
            headers.insert(name, value);
        }

        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            retry: config.retry_config(),
            breaker: CircuitBreaker::new(config.failure_threshold, config.recovery_timeout()),
        })
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn breaker(&self) -> &CircuitBreaker {
        &self.breaker
    }

    fn seats_url(&self, query: &SeatQuery) -> String {
        format!("{}/buses/{}/seats", self.base_url, query.bus_id)
    }

    async fn fetch_once(&self, query: &SeatQuery) -> Result<SeatStatusMap> {
        let url = self.seats_url(query);
        let date = query.travel_date.format("%Y-%m-%d").to_string();
        debug!("GET {} date={}", url, date);

        let response = self
            .client
            .get(&url)
            .query(&[("date", date.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!("Seat source answered {} for {}", status, query.key());
            return Err(SeatLayoutError::Upstream {
                status: status.as_u16(),
                url,
            });
        }

        let bytes = response.bytes().await?;
        parse_payload(&bytes)
    }
}

#[async_trait]
impl SeatStatusSource for HttpSeatStatusSource {
    async fn fetch(&self, query: &SeatQuery) -> Result<SeatStatusMap> {
        let operation = format!("fetch seats {}", query.key());
        retry_with_backoff(&self.retry, &operation, || {
            self.breaker.call(|| self.fetch_once(query))
        })
        .await
    }
}
