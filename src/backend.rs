//! Profiling backend access
//!
//! `ProfileBackend` is the seam between the dashboard and the server it
//! watches. `HttpBackend` talks to a live server with reqwest; tests swap in
//! scripted implementations.

use crate::config::DashboardConfig;
use crate::error::FetchError;
use crate::models::{ReportRow, StatsSample, TableQuery, TableResponse};
use futures::future::{BoxFuture, FutureExt};
use std::time::Duration;

/// Stats requests must not stall the poll cadence for long
const STATS_TIMEOUT: Duration = Duration::from_secs(10);

/// Trait for the profile and stats endpoints
pub trait ProfileBackend: Send + Sync {
    /// `GET /p` with the query's parameters
    fn fetch_table(&self, query: TableQuery) -> BoxFuture<'static, Result<TableResponse, FetchError>>;

    /// `GET /stats`
    fn fetch_stats(&self) -> BoxFuture<'static, Result<StatsSample, FetchError>>;
}

/// reqwest-backed implementation of `ProfileBackend`
#[derive(Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
    request_timeout: Duration,
}

impl HttpBackend {
    pub fn new(config: &DashboardConfig) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("pprof_dashboard/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url().to_string(),
            request_timeout: config.request_timeout(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl ProfileBackend for HttpBackend {
    fn fetch_table(&self, query: TableQuery) -> BoxFuture<'static, Result<TableResponse, FetchError>> {
        let client = self.client.clone();
        let url = format!("{}/p", self.base_url);
        let timeout = self.request_timeout;

        async move {
            log::debug!("[TABLE] GET {} profile={} filter={:?} cumsort={} force={}",
                url, query.profile, query.filter, query.cumsort, query.force);

            let request = async {
                let response = client.get(&url).query(&query.to_query_pairs()).send().await?;
                let status = response.status();
                let content_type = response
                    .headers()
                    .get(reqwest::header::CONTENT_TYPE)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default()
                    .to_string();
                let body = response.text().await?;

                if !status.is_success() {
                    return Err(FetchError::Status { code: status.as_u16(), body });
                }
                parse_table_body(&content_type, &body)
            };

            match tokio::time::timeout(timeout, request).await {
                Ok(result) => result,
                Err(_) => Err(FetchError::Timeout(timeout.as_secs())),
            }
        }
        .boxed()
    }

    fn fetch_stats(&self) -> BoxFuture<'static, Result<StatsSample, FetchError>> {
        let client = self.client.clone();
        let url = format!("{}/stats", self.base_url);

        async move {
            let request = async {
                let response = client.get(&url).send().await?;
                let status = response.status();
                let body = response.text().await?;
                if !status.is_success() {
                    return Err(FetchError::Status { code: status.as_u16(), body });
                }
                let sample: StatsSample = serde_json::from_str(&body)?;
                Ok::<_, FetchError>(sample)
            };

            match tokio::time::timeout(STATS_TIMEOUT, request).await {
                Ok(result) => result,
                Err(_) => Err(FetchError::Timeout(STATS_TIMEOUT.as_secs())),
            }
        }
        .boxed()
    }
}

/// Interpret a successful `/p` body.
///
/// JSON bodies must be an array of rows (`null` reads as no rows); anything
/// else is kept as a plain-text fragment.
pub fn parse_table_body(content_type: &str, body: &str) -> Result<TableResponse, FetchError> {
    let trimmed = body.trim();
    let looks_json = content_type.contains("json") || trimmed.starts_with('[');

    if !looks_json {
        return Ok(TableResponse::Fragment(body.to_string()));
    }
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(TableResponse::Rows(Vec::new()));
    }
    let rows: Vec<ReportRow> = serde_json::from_str(trimmed)?;
    Ok(TableResponse::Rows(rows))
}
