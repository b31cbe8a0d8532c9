//! # Analyzer Module
//!
//! The recommendation engine: typed rule catalogs per resource type, a
//! shared read-only scan context, an evaluator that applies a catalog to one
//! resource, and analyzers that list resources and flatten the findings.
//!
//! ## Example
//!
//! ```rust,ignore
//! use azqr_cli::analyzer::{ScanContext, VirtualNetworkGatewayAnalyzer};
//! use std::sync::Arc;
//!
//! let analyzer = VirtualNetworkGatewayAnalyzer::new(sub, Arc::new(client), Arc::new(ScanContext::new()));
//! for row in analyzer.review("rg-hub").await? {
//!     println!("{} {} {}", row.service_name, row.sku, row.sla);
//! }
//! ```

#[allow(clippy::module_inception)]
pub mod analyzer;
pub mod catalog;
pub mod context;
pub mod evaluator;
pub mod scanner;
pub mod services;
pub mod types;

pub use analyzer::{
    ApiManagementAnalyzer, ResourceAnalyzer, ReviewError, ServiceAnalyzer, ServiceReview,
    VirtualNetworkGatewayAnalyzer,
};
pub use catalog::RuleCatalog;
pub use context::{DiagnosticsError, DiagnosticsIndex, ScanContext};
pub use evaluator::{Finding, ResourceIdentity, evaluate};
pub use scanner::{ScanFailure, ScanReport, Scanner};
pub use services::{AnalyzerSetup, ServiceKind, ServiceRules};
pub use types::{
    AzureServiceResult, Category, Evaluation, Impact, MalformedResource, Recommendation,
    RecommendationInfo, RecommendationResult, RecommendationType, RuleError,
};
