//! Handler for the `scan` command.
//!
//! Merges flags over the config file, builds the management API client and
//! scan context, fans the analyzers out over the resource groups and prints
//! the report.

use crate::analyzer::{AnalyzerSetup, ScanContext, ScanReport, Scanner, ServiceKind};
use crate::azure::{ArmClient, ArmError, PageSource, list_resource_group_names};
use crate::config::Config;
use crate::error::{AzqrError, ConfigError, Result};
use crate::formatter::{OutputFormat, format_report};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Configuration for the scan command
#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    /// Subscription to scan (flag or AZURE_SUBSCRIPTION_ID)
    pub subscription_id: Option<String>,
    /// Resource groups; empty means discover every group
    pub resource_groups: Vec<String>,
    /// Services to review; empty falls back to config, then to all
    pub services: Vec<ServiceKind>,
    /// JSON array of diagnostic setting IDs
    pub diagnostics_file: Option<PathBuf>,
    /// Output format; falls back to config
    pub format: Option<OutputFormat>,
    /// Recommendation IDs to skip, added to the config's list
    pub exclude_rules: Vec<String>,
    /// Bearer token (flag or AZURE_ACCESS_TOKEN)
    pub access_token: Option<String>,
}

/// Scan settings after merging flags over the config file.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanSettings {
    pub subscription_id: String,
    pub resource_groups: Vec<String>,
    pub services: Vec<ServiceKind>,
    pub exclude_rules: Vec<String>,
    pub format: OutputFormat,
    pub max_concurrent_reviews: usize,
}

impl ScanOptions {
    /// Flags win over the config file; lists from the config are used only
    /// when the flag list is empty, except excluded rules which accumulate.
    pub fn resolve(&self, config: &Config) -> std::result::Result<ScanSettings, ConfigError> {
        let subscription_id = self
            .subscription_id
            .clone()
            .or_else(|| config.scan.subscription_id.clone())
            .filter(|s| !s.trim().is_empty())
            .ok_or(ConfigError::MissingValue(
                "subscription ID (--subscription-id, AZURE_SUBSCRIPTION_ID or scan.subscription_id)",
            ))?;

        let resource_groups = if self.resource_groups.is_empty() {
            config.scan.resource_groups.clone()
        } else {
            self.resource_groups.clone()
        };

        let mut services = if !self.services.is_empty() {
            self.services.clone()
        } else if !config.scan.services.is_empty() {
            config.scan.services.clone()
        } else {
            ServiceKind::ALL.to_vec()
        };
        services.sort();
        services.dedup();

        let mut seen = HashSet::new();
        let exclude_rules = config
            .scan
            .exclude_rules
            .iter()
            .chain(&self.exclude_rules)
            .filter(|id| seen.insert(*id))
            .cloned()
            .collect();

        Ok(ScanSettings {
            subscription_id,
            resource_groups,
            services,
            exclude_rules,
            format: self.format.unwrap_or(config.output.format),
            max_concurrent_reviews: config.arm.max_concurrent_reviews,
        })
    }
}

/// Handle the `scan` command.
pub async fn handle_scan(
    options: ScanOptions,
    config: &Config,
    cancel: CancellationToken,
) -> Result<()> {
    let settings = options.resolve(config)?;
    let token = options
        .access_token
        .clone()
        .filter(|t| !t.trim().is_empty())
        .ok_or(ConfigError::MissingValue(
            "access token (--access-token or AZURE_ACCESS_TOKEN)",
        ))?;

    let context = match &options.diagnostics_file {
        Some(path) => load_scan_context(path)?,
        None => ScanContext::new(),
    };

    let client = ArmClient::with_options(token, config.arm.client_options())?;
    let report = run_scan(Arc::new(client), &settings, context, cancel).await?;

    format_report(&report, settings.format);
    finish(&report)
}

/// Run the scan against any page source.
pub async fn run_scan(
    source: Arc<dyn PageSource>,
    settings: &ScanSettings,
    context: ScanContext,
    cancel: CancellationToken,
) -> Result<ScanReport> {
    warn_unknown_rules(&settings.exclude_rules);

    let resource_groups = if settings.resource_groups.is_empty() {
        let groups =
            list_resource_group_names(source.as_ref(), &settings.subscription_id, &cancel)
                .await
                .map_err(|e| match e {
                    ArmError::Cancelled => AzqrError::Cancelled,
                    other => AzqrError::Arm(other),
                })?;
        log::info!(
            "Discovered {} resource group(s) in subscription {}",
            groups.len(),
            settings.subscription_id
        );
        groups
    } else {
        settings.resource_groups.clone()
    };

    let setup = AnalyzerSetup::new(settings.subscription_id.clone(), source, Arc::new(context))
        .with_cancellation(cancel)
        .with_excluded_rules(settings.exclude_rules.iter().cloned());
    let scanner = Scanner::new(&setup, &settings.services)
        .with_concurrency(settings.max_concurrent_reviews);

    Ok(scanner.scan(&resource_groups).await)
}

/// Map a finished report to the command's outcome.
pub fn finish(report: &ScanReport) -> Result<()> {
    if report.was_cancelled() {
        return Err(AzqrError::Cancelled);
    }
    if !report.is_success() {
        return Err(AzqrError::ScanFailed(report.failures.len()));
    }
    Ok(())
}

/// Build a scan context from a JSON array of diagnostic setting IDs.
pub fn load_scan_context(path: &Path) -> Result<ScanContext> {
    let content = std::fs::read_to_string(path)?;
    let ids: Vec<String> =
        serde_json::from_str(&content).map_err(|e| AzqrError::DiagnosticsFile {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
    let context = ScanContext::from_diagnostic_setting_ids(&ids);
    log::info!(
        "Loaded {} diagnostic setting(s) covering {} resource(s)",
        ids.len(),
        context.diagnostics_count()
    );
    Ok(context)
}

fn warn_unknown_rules(ids: &[String]) {
    let known: HashSet<String> = ServiceKind::ALL
        .iter()
        .flat_map(|kind| kind.describe())
        .map(|info| info.recommendation_id)
        .collect();
    for id in ids.iter().filter(|id| !known.contains(*id)) {
        log::warn!("Unknown recommendation id {} in exclusions", id);
    }
}
