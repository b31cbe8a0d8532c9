//! Core types for the recommendation engine.
//!
//! - `Category`, `Impact`, `RecommendationType` - rule metadata
//! - `Recommendation<T>` - one typed check against resources of type `T`
//! - `Evaluation` / `RuleError` - what a check returns
//! - `AzureServiceResult` / `RecommendationResult` - flat output rows

use super::context::ScanContext;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Area of concern a recommendation belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Monitoring and Alerting")]
    MonitoringAndAlerting,
    Governance,
    #[serde(rename = "High Availability")]
    HighAvailability,
    Security,
    Scalability,
    #[serde(rename = "Disaster Recovery")]
    DisasterRecovery,
    #[serde(rename = "Other Best Practices")]
    OtherBestPractices,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MonitoringAndAlerting => "Monitoring and Alerting",
            Self::Governance => "Governance",
            Self::HighAvailability => "High Availability",
            Self::Security => "Security",
            Self::Scalability => "Scalability",
            Self::DisasterRecovery => "Disaster Recovery",
            Self::OtherBestPractices => "Other Best Practices",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How much a failing recommendation matters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Impact {
    Low,
    Medium,
    High,
}

impl Impact {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

impl fmt::Display for Impact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Distinguishes pass/fail checks from SLA pseudo-rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RecommendationType {
    #[default]
    Default,
    /// Never triggers; the evaluation detail carries the computed SLA.
    #[serde(rename = "SLA")]
    Sla,
}

/// Outcome of one rule against one resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluation {
    /// `true` when the resource fails the recommendation
    pub triggered: bool,
    /// Free-form detail; the SLA string for SLA rules
    pub detail: String,
}

impl Evaluation {
    /// Outcome of a boolean check with no detail.
    pub fn check(triggered: bool) -> Self {
        Self {
            triggered,
            detail: String::new(),
        }
    }

    /// Non-triggering outcome carrying `detail`.
    pub fn info(detail: impl Into<String>) -> Self {
        Self {
            triggered: false,
            detail: detail.into(),
        }
    }
}

/// Why a rule could not evaluate a resource.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    /// A nested field the rule dereferences is absent from the payload.
    #[error("missing field {field}")]
    MissingField { field: &'static str },
}

impl RuleError {
    pub fn missing(field: &'static str) -> Self {
        Self::MissingField { field }
    }
}

/// Typed rule predicate. Must be total and free of side effects.
pub type EvalFn<T> = fn(&T, &ScanContext) -> Result<Evaluation, RuleError>;

/// A single named best-practice check for resources of type `T`.
pub struct Recommendation<T> {
    pub recommendation_id: &'static str,
    pub resource_type: &'static str,
    pub category: Category,
    pub recommendation_type: RecommendationType,
    pub impact: Impact,
    pub recommendation: &'static str,
    pub learn_more_url: &'static str,
    pub eval: EvalFn<T>,
}

impl<T> Recommendation<T> {
    /// Run the predicate.
    pub fn evaluate(&self, resource: &T, ctx: &ScanContext) -> Result<Evaluation, RuleError> {
        (self.eval)(resource, ctx)
    }

    pub fn is_sla(&self) -> bool {
        self.recommendation_type == RecommendationType::Sla
    }
}

impl<T> Clone for Recommendation<T> {
    fn clone(&self) -> Self {
        Self {
            recommendation_id: self.recommendation_id,
            resource_type: self.resource_type,
            category: self.category,
            recommendation_type: self.recommendation_type,
            impact: self.impact,
            recommendation: self.recommendation,
            learn_more_url: self.learn_more_url,
            eval: self.eval,
        }
    }
}

impl<T> fmt::Debug for Recommendation<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Recommendation")
            .field("recommendation_id", &self.recommendation_id)
            .field("resource_type", &self.resource_type)
            .field("category", &self.category)
            .field("recommendation_type", &self.recommendation_type)
            .field("impact", &self.impact)
            .finish_non_exhaustive()
    }
}

/// Type-erased recommendation metadata, used for listing catalogs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationInfo {
    pub recommendation_id: String,
    pub resource_type: String,
    pub category: Category,
    pub recommendation_type: RecommendationType,
    pub impact: Impact,
    pub recommendation: String,
    pub learn_more_url: String,
}

impl<T> From<&Recommendation<T>> for RecommendationInfo {
    fn from(r: &Recommendation<T>) -> Self {
        Self {
            recommendation_id: r.recommendation_id.to_string(),
            resource_type: r.resource_type.to_string(),
            category: r.category,
            recommendation_type: r.recommendation_type,
            impact: r.impact,
            recommendation: r.recommendation.to_string(),
            learn_more_url: r.learn_more_url.to_string(),
        }
    }
}

/// One reviewed resource, flattened for reporting.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AzureServiceResult {
    pub subscription_id: String,
    pub resource_group: String,
    pub service_name: String,
    pub sku: String,
    pub sla: String,
    #[serde(rename = "type")]
    pub resource_type: String,
    pub availability_zones: bool,
    pub private_endpoints: bool,
    pub diagnostic_settings: bool,
    pub caf_naming: bool,
}

/// One rule evaluated against one resource, flattened for reporting.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationResult {
    pub subscription_id: String,
    pub resource_group: String,
    pub resource_id: String,
    pub resource_name: String,
    pub resource_type: String,
    pub recommendation_id: String,
    pub category: Category,
    pub recommendation_type: RecommendationType,
    pub impact: Impact,
    pub recommendation: String,
    pub learn_more_url: String,
    pub triggered: bool,
    pub detail: String,
    /// Set when the rule could not evaluate the resource.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// A listed resource that could not be reviewed at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MalformedResource {
    pub resource_group: String,
    pub resource_type: String,
    /// Best-effort identifier (ID, name, or position in the listing)
    pub resource: String,
    pub reason: String,
}

impl fmt::Display for MalformedResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} in resource group {}: {}",
            self.resource_type, self.resource, self.resource_group, self.reason
        )
    }
}
