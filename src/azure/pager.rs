//! Generic paginated listing.
//!
//! Every analyzer lists its resources through [`list_all`]: fetch the first
//! page, follow `nextLink` until exhausted, and fail the whole listing if any
//! page fails. Partial results are never returned.

use super::error::{ArmError, Result};
use super::types::Page;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio_util::sync::CancellationToken;

/// Something that can fetch one page of a list response by URL.
///
/// [`ArmClient`](super::ArmClient) is the production implementation; tests
/// substitute in-memory sources.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Base URL list calls are built against, without trailing slash.
    fn endpoint(&self) -> &str;

    /// Fetch the page at `url`. Items are left untyped so one source serves
    /// every resource type.
    async fn get_page(&self, url: &str) -> Result<Page<Value>>;
}

/// Page-at-a-time iterator over a list call.
pub struct Pager<'a> {
    source: &'a dyn PageSource,
    next_url: Option<String>,
    cancel: CancellationToken,
    pages_fetched: usize,
}

impl<'a> Pager<'a> {
    /// Start a listing at `first_url`.
    pub fn new(source: &'a dyn PageSource, first_url: String, cancel: CancellationToken) -> Self {
        Self {
            source,
            next_url: Some(first_url),
            cancel,
            pages_fetched: 0,
        }
    }

    /// Whether another page remains.
    pub fn more(&self) -> bool {
        self.next_url.is_some()
    }

    /// Number of pages fetched so far.
    pub fn pages_fetched(&self) -> usize {
        self.pages_fetched
    }

    /// Fetch the next page and decode its items as `T`.
    pub async fn next_page<T: DeserializeOwned>(&mut self) -> Result<Vec<T>> {
        let Some(url) = self.next_url.take() else {
            return Ok(Vec::new());
        };

        if self.cancel.is_cancelled() {
            return Err(ArmError::Cancelled);
        }

        let page = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => return Err(ArmError::Cancelled),
            page = self.source.get_page(&url) => page?,
        };
        self.pages_fetched += 1;

        log::debug!(
            "Fetched page {} ({} items) from {}",
            self.pages_fetched,
            page.value.len(),
            url
        );

        if page.has_next() {
            self.next_url = page.next_link.clone();
        }

        page.value
            .into_iter()
            .map(|item| {
                serde_json::from_value(item).map_err(|e| ArmError::ParseError(e.to_string()))
            })
            .collect()
    }
}

/// List every item reachable from `first_url`.
pub async fn list_all<T: DeserializeOwned>(
    source: &dyn PageSource,
    first_url: String,
    cancel: &CancellationToken,
) -> Result<Vec<T>> {
    let mut pager = Pager::new(source, first_url, cancel.clone());
    let mut items = Vec::new();
    while pager.more() {
        items.extend(pager.next_page::<T>().await?);
    }
    log::debug!(
        "Listed {} items over {} page(s)",
        items.len(),
        pager.pages_fetched()
    );
    Ok(items)
}
