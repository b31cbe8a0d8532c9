//! JSON formatter.

use super::ServiceCatalog;
use crate::analyzer::{
    AzureServiceResult, MalformedResource, RecommendationResult, ScanFailure, ScanReport,
};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Format a scan report as JSON.
pub fn format_report(report: &ScanReport) -> String {
    let output = JsonReport::from(report);
    let mut json = serde_json::to_string_pretty(&output).unwrap_or_else(|_| "{}".to_string());
    json.push('\n');
    json
}

/// Format catalogs as JSON.
pub fn format_catalogs(catalogs: &[ServiceCatalog]) -> String {
    let mut json = serde_json::to_string_pretty(catalogs).unwrap_or_else(|_| "[]".to_string());
    json.push('\n');
    json
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonReport<'a> {
    generated_at: DateTime<Utc>,
    summary: JsonSummary,
    services: &'a [AzureServiceResult],
    recommendations: &'a [RecommendationResult],
    skipped: &'a [MalformedResource],
    failures: &'a [ScanFailure],
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonSummary {
    resources_reviewed: usize,
    recommendations_triggered: usize,
    rule_errors: usize,
    resources_skipped: usize,
    failed_reviews: usize,
    passed: bool,
}

impl<'a> From<&'a ScanReport> for JsonReport<'a> {
    fn from(report: &'a ScanReport) -> Self {
        Self {
            generated_at: Utc::now(),
            summary: JsonSummary {
                resources_reviewed: report.results.len(),
                recommendations_triggered: report.triggered_count(),
                rule_errors: report
                    .recommendations
                    .iter()
                    .filter(|r| r.error.is_some())
                    .count(),
                resources_skipped: report.skipped.len(),
                failed_reviews: report.failures.len(),
                passed: report.is_success(),
            },
            services: &report.results,
            recommendations: &report.recommendations,
            skipped: &report.skipped,
            failures: &report.failures,
        }
    }
}
