use crate::analyzer::ServiceKind;
use crate::analyzer::scanner::DEFAULT_CONCURRENCY;
use crate::azure::{ARM_ENDPOINT, ArmClientOptions};
use crate::formatter::OutputFormat;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub scan: ScanConfig,
    pub arm: ArmConfig,
    pub output: OutputConfig,
}

/// Scan scope defaults
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    pub subscription_id: Option<String>,
    /// Empty means every resource group in the subscription
    pub resource_groups: Vec<String>,
    /// Empty means every supported service
    pub services: Vec<ServiceKind>,
    pub exclude_rules: Vec<String>,
}

/// Management API connection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArmConfig {
    pub endpoint: String,
    pub timeout_secs: u64,
    pub max_retries: u32,
    pub retry_base_delay_ms: u64,
    /// Resource group reviews in flight at once
    pub max_concurrent_reviews: usize,
}

impl Default for ArmConfig {
    fn default() -> Self {
        Self {
            endpoint: ARM_ENDPOINT.to_string(),
            timeout_secs: 30,
            max_retries: 3,
            retry_base_delay_ms: 500,
            max_concurrent_reviews: DEFAULT_CONCURRENCY,
        }
    }
}

impl ArmConfig {
    pub fn client_options(&self) -> ArmClientOptions {
        ArmClientOptions {
            endpoint: self.endpoint.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
            max_retries: self.max_retries,
            retry_base_delay: Duration::from_millis(self.retry_base_delay_ms),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
}
