//! Azure Resource Manager client
//!
//! Thin authenticated access to the management REST API. Only list calls are
//! needed: the client builds list URLs, fetches pages, maps error statuses and
//! retries throttled requests with exponential backoff.

use super::error::{ArmError, Result};
use super::pager::{PageSource, list_all};
use super::types::{ArmErrorResponse, Page, ResourceGroup};
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode, Url};
use serde_json::Value;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Public cloud management endpoint
pub const ARM_ENDPOINT: &str = "https://management.azure.com";

/// API version used for resource group discovery
const RESOURCE_GROUPS_API_VERSION: &str = "2021-04-01";

/// User agent for API requests
const USER_AGENT: &str = concat!("azqr-cli/", env!("CARGO_PKG_VERSION"));

/// Upper bound for a single backoff sleep
const MAX_BACKOFF: Duration = Duration::from_secs(60);

/// Connection and retry settings for [`ArmClient`]
#[derive(Debug, Clone)]
pub struct ArmClientOptions {
    /// Base management endpoint (sovereign clouds use a different host)
    pub endpoint: String,
    /// Per-request timeout
    pub timeout: Duration,
    /// Retries after a 429 before giving up
    pub max_retries: u32,
    /// First backoff delay; doubled on every retry
    pub retry_base_delay: Duration,
}

impl Default for ArmClientOptions {
    fn default() -> Self {
        Self {
            endpoint: ARM_ENDPOINT.to_string(),
            timeout: Duration::from_secs(30),
            max_retries: 3,
            retry_base_delay: Duration::from_millis(500),
        }
    }
}

/// Client for the Azure Resource Manager API
pub struct ArmClient {
    /// HTTP client with configured timeout and headers
    http_client: Client,
    /// Base API URL without trailing slash
    endpoint: String,
    /// Parsed endpoint; continuation links must share its origin
    origin: Url,
    /// Bearer token for the management audience
    token: String,
    max_retries: u32,
    retry_base_delay: Duration,
}

impl ArmClient {
    /// Create a client against the public cloud endpoint
    pub fn new(token: impl Into<String>) -> Result<Self> {
        Self::with_options(token, ArmClientOptions::default())
    }

    /// Create a client with custom endpoint, timeout and retry policy
    pub fn with_options(token: impl Into<String>, options: ArmClientOptions) -> Result<Self> {
        let endpoint = options.endpoint.trim_end_matches('/').to_string();
        let origin = Url::parse(&endpoint)
            .ok()
            .filter(|url| matches!(url.scheme(), "http" | "https") && url.host_str().is_some())
            .ok_or_else(|| {
                ArmError::InvalidUrl(format!(
                    "endpoint must be an absolute http:// or https:// URL: {}",
                    endpoint
                ))
            })?;

        let http_client = Client::builder()
            .timeout(options.timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(ArmError::HttpError)?;

        Ok(Self {
            http_client,
            endpoint,
            origin,
            token: token.into(),
            max_retries: options.max_retries,
            retry_base_delay: options.retry_base_delay,
        })
    }

    /// URL listing every resource of `resource_type` in a resource group.
    pub fn resource_group_list_url(
        &self,
        subscription_id: &str,
        resource_group: &str,
        resource_type: &str,
        api_version: &str,
    ) -> String {
        resource_list_url(
            &self.endpoint,
            subscription_id,
            resource_group,
            resource_type,
            api_version,
        )
    }

    /// URL listing the resource groups of a subscription
    pub fn resource_groups_url(&self, subscription_id: &str) -> String {
        resource_groups_url(&self.endpoint, subscription_id)
    }

    /// List the names of every resource group in a subscription
    ///
    /// Endpoint: GET /subscriptions/:id/resourcegroups
    pub async fn list_resource_groups(
        &self,
        subscription_id: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<String>> {
        list_resource_group_names(self, subscription_id, cancel).await
    }

    /// Make an authenticated GET request, retrying while throttled
    async fn get_with_retry(&self, url: &str) -> Result<Response> {
        let mut attempt = 0;
        loop {
            let response = self
                .http_client
                .get(url)
                .bearer_auth(&self.token)
                .send()
                .await?;

            if response.status() != StatusCode::TOO_MANY_REQUESTS {
                return Ok(response);
            }

            attempt += 1;
            if attempt > self.max_retries {
                return Err(ArmError::Throttled { attempts: attempt });
            }

            let delay = retry_after(&response)
                .unwrap_or_else(|| backoff_delay(self.retry_base_delay, attempt));
            log::warn!(
                "Throttled by management API, retrying in {}ms (attempt {}/{})",
                delay.as_millis(),
                attempt,
                self.max_retries
            );
            tokio::time::sleep(delay).await;
        }
    }

    /// Handle the HTTP response, converting errors appropriately
    async fn handle_response(&self, response: Response) -> Result<Page<Value>> {
        let status = response.status();

        if status.is_success() {
            return response
                .json::<Page<Value>>()
                .await
                .map_err(|e| ArmError::ParseError(e.to_string()));
        }

        let status_code = status.as_u16();
        let error_body = response.text().await.unwrap_or_default();
        Err(map_error_status(status_code, &error_body))
    }
}

#[async_trait]
impl PageSource for ArmClient {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn get_page(&self, url: &str) -> Result<Page<Value>> {
        if !same_origin(&self.origin, url) {
            return Err(ArmError::InvalidUrl(format!(
                "continuation link leaves {}: {}",
                self.endpoint, url
            )));
        }
        let response = self.get_with_retry(url).await?;
        self.handle_response(response).await
    }
}

/// URL listing every resource of `resource_type` in a resource group.
///
/// `resource_type` is the provider/type pair, e.g.
/// `Microsoft.ApiManagement/service`.
pub fn resource_list_url(
    endpoint: &str,
    subscription_id: &str,
    resource_group: &str,
    resource_type: &str,
    api_version: &str,
) -> String {
    format!(
        "{}/subscriptions/{}/resourceGroups/{}/providers/{}?api-version={}",
        endpoint,
        urlencoding::encode(subscription_id),
        urlencoding::encode(resource_group),
        resource_type,
        api_version
    )
}

/// URL listing the resource groups of a subscription.
pub fn resource_groups_url(endpoint: &str, subscription_id: &str) -> String {
    format!(
        "{}/subscriptions/{}/resourcegroups?api-version={}",
        endpoint,
        urlencoding::encode(subscription_id),
        RESOURCE_GROUPS_API_VERSION
    )
}

/// Names of every resource group in a subscription, through any page source.
pub async fn list_resource_group_names(
    source: &dyn PageSource,
    subscription_id: &str,
    cancel: &CancellationToken,
) -> Result<Vec<String>> {
    let url = resource_groups_url(source.endpoint(), subscription_id);
    let groups: Vec<ResourceGroup> = list_all(source, url, cancel).await?;
    Ok(groups.into_iter().filter_map(|g| g.name).collect())
}

/// Whether `url` targets the same scheme, host and port as `origin`.
/// The bearer token is only ever sent to the management endpoint.
fn same_origin(origin: &Url, url: &str) -> bool {
    Url::parse(url).is_ok_and(|url| {
        url.scheme() == origin.scheme()
            && url.host_str() == origin.host_str()
            && url.port_or_known_default() == origin.port_or_known_default()
    })
}

/// Map a non-success status and body to an [`ArmError`].
fn map_error_status(status_code: u16, error_body: &str) -> ArmError {
    let parsed = serde_json::from_str::<ArmErrorResponse>(error_body).ok();
    let error_message = parsed
        .as_ref()
        .map(|e| e.get_message())
        .unwrap_or_else(|| error_body.to_string());

    match status_code {
        401 => ArmError::Unauthorized,
        403 => ArmError::PermissionDenied(error_message),
        404 => ArmError::NotFound(error_message),
        500..=599 => ArmError::ServerError {
            status: status_code,
            message: error_message,
        },
        _ => ArmError::ApiError {
            status: status_code,
            code: parsed
                .map(|e| e.get_code())
                .unwrap_or_else(|| "Unknown".to_string()),
            message: error_message,
        },
    }
}

/// Delay requested by a `Retry-After` header given in seconds.
fn retry_after(response: &Response) -> Option<Duration> {
    response
        .headers()
        .get(reqwest::header::RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(|secs| Duration::from_secs(secs).min(MAX_BACKOFF))
}

/// Exponential backoff: base, 2*base, 4*base, ... capped at [`MAX_BACKOFF`].
fn backoff_delay(base: Duration, attempt: u32) -> Duration {
    let factor = 1u32 << attempt.saturating_sub(1).min(16);
    base.saturating_mul(factor).min(MAX_BACKOFF)
}
