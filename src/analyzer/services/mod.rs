//! Per-service rule tables.
//!
//! Each reviewed resource type implements [`ServiceRules`]: its catalog plus
//! the handful of descriptors the analyzer needs to fill a summary row.
//! [`ServiceKind`] is the runtime selector the CLI and scanner work with.

pub mod apim;
pub mod vgw;

use super::analyzer::{ResourceAnalyzer, ServiceAnalyzer};
use super::catalog::RuleCatalog;
use super::context::{DiagnosticsIndex, ScanContext};
use super::types::{Evaluation, RecommendationInfo, RuleError};
use crate::azure::PageSource;
use crate::azure::resources::{ApiManagementService, ArmResource, VirtualNetworkGateway};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

pub use apim::ApiManagement;
pub use vgw::VirtualNetworkGateways;

pub(crate) const SLA_URL: &str =
    "https://www.microsoft.com/licensing/docs/view/Service-Level-Agreements-SLA-for-Online-Services";
pub(crate) const CAF_NAMING_URL: &str = "https://learn.microsoft.com/en-us/azure/cloud-adoption-framework/ready/azure-best-practices/resource-abbreviations";
pub(crate) const TAGS_URL: &str =
    "https://learn.microsoft.com/en-us/azure/azure-resource-manager/management/tag-resources?tabs=json";

/// Shared diagnostics check: triggered when `resource_id` has no diagnostic
/// settings, otherwise the detail names them.
pub(crate) fn diagnostics_evaluation(ctx: &ScanContext, resource_id: &str) -> Evaluation {
    match ctx.diagnostics_settings(resource_id) {
        Some(names) => Evaluation::info(names.join(", ")),
        None => Evaluation::check(true),
    }
}

/// Rules and row descriptors for one resource type.
pub trait ServiceRules: Send + Sync + 'static {
    type Resource: ArmResource;

    const KIND: ServiceKind;
    const DISPLAY_NAME: &'static str;
    /// Recommendation whose detail is the resource's SLA
    const SLA_RULE: &'static str;
    /// Recommendation checking the CAF name prefix
    const NAMING_RULE: &'static str;

    /// Build the catalog. Pure; called once per analyzer.
    fn recommendations() -> RuleCatalog<Self::Resource>;

    fn sku(resource: &Self::Resource) -> Result<String, RuleError>;
    fn availability_zones(resource: &Self::Resource) -> bool;
    fn private_endpoints(resource: &Self::Resource) -> bool;
}

/// Services the scanner knows how to review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceKind {
    Apim,
    Vgw,
}

impl ServiceKind {
    pub const ALL: [ServiceKind; 2] = [ServiceKind::Apim, ServiceKind::Vgw];

    /// Selector used on the command line and in config files.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Apim => "apim",
            Self::Vgw => "vgw",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Apim => ApiManagement::DISPLAY_NAME,
            Self::Vgw => VirtualNetworkGateways::DISPLAY_NAME,
        }
    }

    pub fn resource_type(&self) -> &'static str {
        match self {
            Self::Apim => ApiManagementService::RESOURCE_TYPE,
            Self::Vgw => VirtualNetworkGateway::RESOURCE_TYPE,
        }
    }

    /// Catalog metadata ordered by recommendation ID.
    pub fn describe(&self) -> Vec<RecommendationInfo> {
        match self {
            Self::Apim => ApiManagement::recommendations().describe(),
            Self::Vgw => VirtualNetworkGateways::recommendations().describe(),
        }
    }

    /// Build the analyzer for this service.
    pub fn analyzer(&self, setup: &AnalyzerSetup) -> Box<dyn ServiceAnalyzer> {
        match self {
            Self::Apim => Box::new(setup.build::<ApiManagement>()),
            Self::Vgw => Box::new(setup.build::<VirtualNetworkGateways>()),
        }
    }
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

impl FromStr for ServiceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.key() == key)
            .ok_or_else(|| {
                format!(
                    "unknown service '{}' (expected one of: {})",
                    s,
                    Self::ALL.map(|k| k.key()).join(", ")
                )
            })
    }
}

/// Everything shared by the analyzers of one scan.
#[derive(Clone)]
pub struct AnalyzerSetup {
    pub subscription_id: String,
    pub source: Arc<dyn PageSource>,
    pub context: Arc<ScanContext>,
    pub diagnostics: Option<Arc<dyn DiagnosticsIndex>>,
    pub cancel: CancellationToken,
    pub excluded_rules: HashSet<String>,
}

impl AnalyzerSetup {
    pub fn new(
        subscription_id: impl Into<String>,
        source: Arc<dyn PageSource>,
        context: Arc<ScanContext>,
    ) -> Self {
        Self {
            subscription_id: subscription_id.into(),
            source,
            context,
            diagnostics: None,
            cancel: CancellationToken::new(),
            excluded_rules: HashSet::new(),
        }
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn with_excluded_rules(mut self, rules: impl IntoIterator<Item = String>) -> Self {
        self.excluded_rules = rules.into_iter().collect();
        self
    }

    pub fn with_diagnostics_index(mut self, index: Arc<dyn DiagnosticsIndex>) -> Self {
        self.diagnostics = Some(index);
        self
    }

    fn build<S: ServiceRules>(&self) -> ResourceAnalyzer<S> {
        let mut analyzer = ResourceAnalyzer::<S>::new(
            self.subscription_id.clone(),
            Arc::clone(&self.source),
            Arc::clone(&self.context),
        )
        .with_cancellation(self.cancel.clone())
        .with_excluded_rules(self.excluded_rules.iter().cloned());
        if let Some(index) = &self.diagnostics {
            analyzer = analyzer.with_diagnostics_index(Arc::clone(index));
        }
        analyzer
    }
}
