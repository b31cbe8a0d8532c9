//! Output formatters for scan reports and rule catalogs.
//!
//! Findings are produced in no particular order; everything is sorted here,
//! right before rendering.

pub mod json;
pub mod table;

use crate::analyzer::{RecommendationInfo, ScanReport, ServiceKind};
use serde::{Deserialize, Serialize};

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable table.
    #[default]
    Table,
    /// Pretty-printed JSON.
    Json,
}

/// One service's catalog, for `azqr rules`.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceCatalog {
    pub service: ServiceKind,
    pub name: &'static str,
    pub recommendations: Vec<RecommendationInfo>,
}

impl ServiceCatalog {
    pub fn of(service: ServiceKind) -> Self {
        Self {
            service,
            name: service.display_name(),
            recommendations: service.describe(),
        }
    }
}

/// Copy of `report` with rows in a stable order.
pub fn sorted_report(report: &ScanReport) -> ScanReport {
    let mut sorted = report.clone();
    sorted.results.sort_by(|a, b| {
        (&a.resource_group, &a.service_name, &a.resource_type).cmp(&(
            &b.resource_group,
            &b.service_name,
            &b.resource_type,
        ))
    });
    sorted.recommendations.sort_by(|a, b| {
        (&a.resource_group, &a.resource_name, &a.recommendation_id).cmp(&(
            &b.resource_group,
            &b.resource_name,
            &b.recommendation_id,
        ))
    });
    sorted
        .skipped
        .sort_by(|a, b| (&a.resource_group, &a.resource).cmp(&(&b.resource_group, &b.resource)));
    sorted
        .failures
        .sort_by(|a, b| (&a.resource_group, a.service).cmp(&(&b.resource_group, b.service)));
    sorted
}

/// Format a scan report to a string.
pub fn format_report_to_string(report: &ScanReport, format: OutputFormat) -> String {
    let report = sorted_report(report);
    match format {
        OutputFormat::Table => table::format_report(&report),
        OutputFormat::Json => json::format_report(&report),
    }
}

/// Format catalogs to a string.
pub fn format_catalogs_to_string(catalogs: &[ServiceCatalog], format: OutputFormat) -> String {
    match format {
        OutputFormat::Table => table::format_catalogs(catalogs),
        OutputFormat::Json => json::format_catalogs(catalogs),
    }
}

/// Format and print a scan report.
pub fn format_report(report: &ScanReport, format: OutputFormat) {
    print!("{}", format_report_to_string(report, format));
}
