//! Runs every selected analyzer over every selected resource group.

use super::analyzer::{ReviewError, ServiceAnalyzer};
use super::services::{AnalyzerSetup, ServiceKind};
use super::types::{AzureServiceResult, MalformedResource, RecommendationResult};
use futures_util::stream::{self, StreamExt};
use serde::Serialize;

/// Reviews in flight at once unless configured otherwise.
pub const DEFAULT_CONCURRENCY: usize = 8;

/// A (resource group, service) pair whose review failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanFailure {
    pub resource_group: String,
    pub service: ServiceKind,
    pub error: String,
    pub cancelled: bool,
}

/// Combined output of a scan.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanReport {
    pub results: Vec<AzureServiceResult>,
    pub recommendations: Vec<RecommendationResult>,
    pub skipped: Vec<MalformedResource>,
    pub failures: Vec<ScanFailure>,
}

impl ScanReport {
    /// No review failed.
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn triggered_count(&self) -> usize {
        self.recommendations.iter().filter(|r| r.triggered).count()
    }

    pub fn was_cancelled(&self) -> bool {
        self.failures.iter().any(|f| f.cancelled)
    }
}

/// Concurrent fan-out of analyzers.
pub struct Scanner {
    analyzers: Vec<Box<dyn ServiceAnalyzer>>,
    concurrency: usize,
}

impl Scanner {
    /// One analyzer per service, sharing `setup`.
    pub fn new(setup: &AnalyzerSetup, services: &[ServiceKind]) -> Self {
        let mut services = services.to_vec();
        services.sort();
        services.dedup();
        Self::with_analyzers(services.iter().map(|s| s.analyzer(setup)).collect())
    }

    /// Scanner over prebuilt analyzers.
    pub fn with_analyzers(analyzers: Vec<Box<dyn ServiceAnalyzer>>) -> Self {
        Self {
            analyzers,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }

    /// Cap the number of reviews in flight. Zero is treated as one.
    pub fn with_concurrency(mut self, limit: usize) -> Self {
        self.concurrency = limit.max(1);
        self
    }

    pub fn services(&self) -> Vec<ServiceKind> {
        self.analyzers.iter().map(|a| a.service()).collect()
    }

    /// Review every (resource group, service) pair, at most
    /// [`with_concurrency`](Self::with_concurrency) at a time.
    ///
    /// A failed pair is recorded in [`ScanReport::failures`] and contributes
    /// nothing else; the other pairs are unaffected.
    pub async fn scan(&self, resource_groups: &[String]) -> ScanReport {
        let jobs = resource_groups.iter().flat_map(|rg| {
            self.analyzers.iter().map(move |analyzer| async move {
                (rg, analyzer.service(), analyzer.review_detailed(rg).await)
            })
        });

        let outcomes: Vec<_> = stream::iter(jobs)
            .buffer_unordered(self.concurrency)
            .collect()
            .await;

        let mut report = ScanReport::default();
        for (rg, service, outcome) in outcomes {
            match outcome {
                Ok(review) => {
                    report.results.extend(review.results);
                    report.recommendations.extend(review.recommendations);
                    report.skipped.extend(review.skipped);
                }
                Err(err) => report.failures.push(failure(rg, service, &err)),
            }
        }
        report
    }
}

fn failure(resource_group: &str, service: ServiceKind, err: &ReviewError) -> ScanFailure {
    if err.is_cancelled() {
        log::debug!("Review of {} in {} cancelled", service, resource_group);
    } else {
        log::warn!(
            "Failed to analyze {} in Resource Group {}: {}",
            service.display_name(),
            resource_group,
            err
        );
    }
    ScanFailure {
        resource_group: resource_group.to_string(),
        service,
        error: err.to_string(),
        cancelled: err.is_cancelled(),
    }
}
