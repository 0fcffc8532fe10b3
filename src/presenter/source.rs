// src/presenter/source.rs

use anyhow::{anyhow, Context, Result};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::future::Future;
use std::marker::PhantomData;
use tracing::{debug, warn};
use url::Url;

use super::chart::ChartData;

/// Produces the series a presenter draws.
pub trait SummarySource: Send + Sync + 'static {
    fn load(&self) -> impl Future<Output = Result<ChartData>> + Send;
}

/// Fetches a summary document over HTTP and turns it into chart data.
///
/// Any failure surfaces as `failure` at the top of the error chain; the cause
/// stays underneath for logging.
pub struct HttpSummarySource<T> {
    client: Client,
    url: Url,
    failure: &'static str,
    _summary: PhantomData<fn() -> T>,
}

impl<T> HttpSummarySource<T> {
    pub fn new(client: Client, base: &Url, endpoint: &str, failure: &'static str) -> Result<Self> {
        let url = base
            .join(endpoint)
            .with_context(|| format!("joining {} onto {}", endpoint, base))?;
        Ok(Self {
            client,
            url,
            failure,
            _summary: PhantomData,
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

impl<T> SummarySource for HttpSummarySource<T>
where
    T: DeserializeOwned + Into<ChartData> + Send + 'static,
{
    async fn load(&self) -> Result<ChartData> {
        debug!(url = %self.url, "requesting summary");
        let resp = self
            .client
            .get(self.url.clone())
            .send()
            .await
            .context(self.failure)?;

        if !resp.status().is_success() {
            warn!(url = %self.url, status = %resp.status(), "summary request failed");
            return Err(anyhow!(self.failure));
        }

        let summary: T = resp.json().await.context(self.failure)?;
        Ok(summary.into())
    }
}
