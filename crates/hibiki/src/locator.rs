//! Multi-mirror resource locator with ordered failover.

use std::sync::Mutex;

use bytes::Bytes;
use reqwest::header::{HeaderMap, RANGE};
use tokio::sync::OnceCell;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::{
    error::{HibikiError, HibikiResult},
    util::{
        http::HttpClient,
        range::ByteRange,
        url::merge_baseurls,
    },
};

/// A fetchable resource backed by one or more equivalent mirror URLs and
/// an optional inclusive byte range.
///
/// [`Locator::fetch`] tries the mirrors strictly in declared order, one
/// at a time; only the last mirror's failure reaches the caller. A
/// completed fetch is cached, so repeated calls yield the one logical
/// result without another network round.
#[derive(Debug)]
pub struct Locator {
    urls: Vec<Url>,
    range: ByteRange,

    /// Body of a completed fetch, shared by every caller.
    result: OnceCell<Bytes>,
    /// Cancellation handle of the in-flight attempt chain, if any.
    in_flight: Mutex<Option<CancellationToken>>,
}

impl Locator {
    pub fn new(urls: Vec<Url>) -> Self {
        Self::with_range(urls, 0, None)
    }

    pub fn with_range(urls: Vec<Url>, start_byte: u64, end_byte: Option<u64>) -> Self {
        assert!(!urls.is_empty(), "locator requires at least one url");

        Self {
            urls,
            range: ByteRange::new(start_byte, end_byte),
            result: OnceCell::new(),
            in_flight: Mutex::new(None),
        }
    }

    /// Resolves a possibly relative URL against every base mirror,
    /// producing a locator with one mirror per base. Without bases the
    /// URL must be absolute.
    pub fn resolve(base_urls: &[Url], url: &str) -> HibikiResult<Self> {
        let urls = if base_urls.is_empty() {
            vec![Url::parse(url)?]
        } else {
            base_urls
                .iter()
                .map(|base| merge_baseurls(base, url))
                .collect::<HibikiResult<Vec<_>>>()?
        };

        Ok(Self::new(urls))
    }

    pub fn urls(&self) -> &[Url] {
        &self.urls
    }

    /// The first mirror. Useful for logging and diagnostics.
    pub fn primary(&self) -> &Url {
        &self.urls[0]
    }

    pub fn start_byte(&self) -> u64 {
        self.range.start
    }

    pub fn end_byte(&self) -> Option<u64> {
        self.range.end
    }

    /// Fetches the resource, failing over across mirrors.
    ///
    /// If a fetch already completed, the cached body is returned without
    /// a new request; a caller arriving while another fetch is in flight
    /// waits for that fetch instead of issuing its own.
    pub async fn fetch(&self, client: &HttpClient) -> HibikiResult<Bytes> {
        self.fetch_with_headers(client, None).await
    }

    /// Like [`Locator::fetch`], with extra request headers applied to
    /// every mirror attempt.
    pub async fn fetch_with_headers(
        &self,
        client: &HttpClient,
        headers: Option<HeaderMap>,
    ) -> HibikiResult<Bytes> {
        let bytes = self
            .result
            .get_or_try_init(|| self.run_failover(client, headers))
            .await?;
        Ok(bytes.clone())
    }

    /// Aborts a pending [`Locator::fetch`], if any. Idempotent; a no-op
    /// when idle or already completed.
    ///
    /// The in-flight marker is cleared before the transport operation is
    /// cancelled, so an attempt settling concurrently observes the
    /// cancellation and stops instead of continuing the failover chain.
    /// The aborted fetch fails with [`HibikiError::FetchAborted`].
    pub fn abort_fetch(&self) {
        if let Some(token) = self.in_flight.lock().unwrap().take() {
            token.cancel();
        }
    }

    async fn run_failover(
        &self,
        client: &HttpClient,
        headers: Option<HeaderMap>,
    ) -> HibikiResult<Bytes> {
        let token = CancellationToken::new();
        *self.in_flight.lock().unwrap() = Some(token.clone());

        let mut last_error = None;
        for (i, url) in self.urls.iter().enumerate() {
            if token.is_cancelled() {
                return Err(HibikiError::FetchAborted);
            }

            let outcome = tokio::select! {
                biased;
                _ = token.cancelled() => return Err(HibikiError::FetchAborted),
                outcome = self.request_one(client, url, headers.clone()) => outcome,
            };

            match outcome {
                Ok(bytes) => {
                    self.in_flight.lock().unwrap().take();
                    return Ok(bytes);
                }
                Err(error) => {
                    if i + 1 < self.urls.len() {
                        tracing::info!("Trying fallback URL after error: {error}");
                    }
                    last_error = Some(error);
                }
            }
        }

        self.in_flight.lock().unwrap().take();
        Err(last_error.expect("mirror list is never empty"))
    }

    async fn request_one(
        &self,
        client: &HttpClient,
        url: &Url,
        headers: Option<HeaderMap>,
    ) -> HibikiResult<Bytes> {
        let mut request = client.get(url.clone());
        if let Some(headers) = headers {
            request = request.headers(headers);
        }
        if !self.range.is_full() {
            request = request.header(RANGE, self.range.to_http_range());
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            let status = response.status();
            if let Ok(body) = response.text().await {
                tracing::warn!("Error body: {body}");
            }
            return Err(HibikiError::HttpError(status));
        }

        Ok(response.bytes().await?)
    }
}

impl Clone for Locator {
    /// Deep-copies the mirror list and byte range. Fetch state is not
    /// carried over: a clone always starts idle.
    fn clone(&self) -> Self {
        Self {
            urls: self.urls.clone(),
            range: self.range.clone(),
            result: OnceCell::new(),
            in_flight: Mutex::new(None),
        }
    }
}

impl PartialEq for Locator {
    /// Value equality over mirrors and byte range; fetch state does not
    /// participate.
    fn eq(&self, other: &Self) -> bool {
        self.urls == other.urls && self.range == other.range
    }
}
