//! Generic per-resource-type analyzer.
//!
//! [`ResourceAnalyzer`] lists one resource type in a resource group, runs the
//! type's catalog against every resource and flattens the findings into
//! summary rows and recommendation rows. One generic implementation serves
//! every [`ServiceRules`] type.

use super::catalog::RuleCatalog;
use super::context::{DiagnosticsError, DiagnosticsIndex, ScanContext};
use super::evaluator::{Finding, ResourceIdentity, evaluate, finding};
use super::services::{ServiceKind, ServiceRules};
use super::types::{AzureServiceResult, MalformedResource, RecommendationResult};
use crate::azure::resources::ArmResource;
use crate::azure::{ArmError, PageSource, list_all, resource_list_url};
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashSet;
use std::marker::PhantomData;
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// Failure that aborts the review of one resource group.
#[derive(Debug, Error)]
pub enum ReviewError {
    /// Listing failed on some page; nothing from the listing is kept.
    #[error("{0}")]
    Transport(#[from] ArmError),

    #[error("{0}")]
    DiagnosticsLookup(#[from] DiagnosticsError),
}

impl ReviewError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Transport(e) if e.is_cancelled())
    }
}

/// Everything one review produced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceReview {
    pub results: Vec<AzureServiceResult>,
    pub recommendations: Vec<RecommendationResult>,
    pub skipped: Vec<MalformedResource>,
}

/// Object-safe view of an analyzer, for running different services side by
/// side.
#[async_trait]
pub trait ServiceAnalyzer: Send + Sync {
    fn service(&self) -> ServiceKind;

    async fn review_detailed(&self, resource_group: &str) -> Result<ServiceReview, ReviewError>;
}

/// Reviews every resource of `S::Resource` in a resource group.
pub struct ResourceAnalyzer<S: ServiceRules> {
    subscription_id: String,
    source: Arc<dyn PageSource>,
    context: Arc<ScanContext>,
    diagnostics: Arc<dyn DiagnosticsIndex>,
    catalog: RuleCatalog<S::Resource>,
    excluded: HashSet<String>,
    cancel: CancellationToken,
    _service: PhantomData<fn() -> S>,
}

pub type ApiManagementAnalyzer = ResourceAnalyzer<super::services::ApiManagement>;
pub type VirtualNetworkGatewayAnalyzer = ResourceAnalyzer<super::services::VirtualNetworkGateways>;

impl<S: ServiceRules> ResourceAnalyzer<S> {
    /// Create an analyzer. The scan context doubles as the diagnostics index
    /// unless [`with_diagnostics_index`](Self::with_diagnostics_index) replaces it.
    pub fn new(
        subscription_id: impl Into<String>,
        source: Arc<dyn PageSource>,
        context: Arc<ScanContext>,
    ) -> Self {
        let diagnostics: Arc<dyn DiagnosticsIndex> = context.clone();
        Self {
            subscription_id: subscription_id.into(),
            source,
            context,
            diagnostics,
            catalog: S::recommendations(),
            excluded: HashSet::new(),
            cancel: CancellationToken::new(),
            _service: PhantomData,
        }
    }

    pub fn with_diagnostics_index(mut self, index: Arc<dyn DiagnosticsIndex>) -> Self {
        self.diagnostics = index;
        self
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Leave these rules out of the recommendation rows. Summary rows still
    /// derive SLA and naming compliance from the full catalog. Unknown IDs
    /// are ignored.
    pub fn with_excluded_rules(mut self, ids: impl IntoIterator<Item = String>) -> Self {
        self.excluded.extend(ids);
        self
    }

    pub fn catalog(&self) -> &RuleCatalog<S::Resource> {
        &self.catalog
    }

    /// Summary rows for every resource in `resource_group`.
    pub async fn review(&self, resource_group: &str) -> Result<Vec<AzureServiceResult>, ReviewError> {
        Ok(self.review_detailed(resource_group).await?.results)
    }

    /// Summary rows, per-rule rows and skipped resources for `resource_group`.
    pub async fn review_detailed(&self, resource_group: &str) -> Result<ServiceReview, ReviewError> {
        log::info!(
            "Analyzing {} in Resource Group {}",
            S::DISPLAY_NAME,
            resource_group
        );

        let url = resource_list_url(
            self.source.endpoint(),
            &self.subscription_id,
            resource_group,
            S::Resource::RESOURCE_TYPE,
            S::Resource::API_VERSION,
        );
        // Items stay untyped until here so one bad payload skips only itself.
        let items: Vec<Value> = list_all(self.source.as_ref(), url, &self.cancel).await?;

        let mut review = ServiceReview::default();
        for (position, item) in items.into_iter().enumerate() {
            let label = item_label(&item, position);
            let resource = match serde_json::from_value::<S::Resource>(item) {
                Ok(resource) => resource,
                Err(e) => {
                    review.skipped.push(skip::<S>(
                        resource_group,
                        label,
                        format!("payload could not be decoded: {}", e),
                    ));
                    continue;
                }
            };
            let (Some(id), Some(name)) = (resource.id(), resource.name()) else {
                review.skipped.push(skip::<S>(
                    resource_group,
                    label,
                    "resource has no id or name".to_string(),
                ));
                continue;
            };

            let identity = ResourceIdentity {
                subscription_id: &self.subscription_id,
                resource_group,
                resource_id: id,
                resource_name: name,
            };
            let findings = evaluate(&resource, &self.catalog, &self.context);

            review.results.push(self.summarize(&resource, &identity, &findings)?);
            review.recommendations.extend(
                findings
                    .iter()
                    .filter(|f| !self.excluded.contains(f.recommendation_id()))
                    .map(|f| f.to_result(&identity)),
            );
        }

        log::debug!(
            "Reviewed {} {} in {} ({} skipped)",
            review.results.len(),
            S::KIND,
            resource_group,
            review.skipped.len()
        );
        Ok(review)
    }

    fn summarize(
        &self,
        resource: &S::Resource,
        identity: &ResourceIdentity<'_>,
        findings: &[Finding<'_, S::Resource>],
    ) -> Result<AzureServiceResult, ReviewError> {
        let diagnostic_settings = self.diagnostics.has_diagnostics(identity.resource_id)?;

        let sla = finding(findings, S::SLA_RULE)
            .map(|f| f.detail().to_string())
            .unwrap_or_default();
        let caf_naming = finding(findings, S::NAMING_RULE)
            .is_some_and(|f| f.error().is_none() && !f.is_triggered());

        Ok(AzureServiceResult {
            subscription_id: identity.subscription_id.to_string(),
            resource_group: identity.resource_group.to_string(),
            service_name: identity.resource_name.to_string(),
            sku: S::sku(resource).unwrap_or_default(),
            sla,
            resource_type: resource
                .resource_type()
                .unwrap_or(S::Resource::RESOURCE_TYPE)
                .to_string(),
            availability_zones: S::availability_zones(resource),
            private_endpoints: S::private_endpoints(resource),
            diagnostic_settings,
            caf_naming,
        })
    }
}

/// Best-effort identifier for a raw list item: its ID, its name, or its
/// position in the listing.
fn item_label(item: &Value, position: usize) -> String {
    ["id", "name"]
        .iter()
        .find_map(|key| item.get(key).and_then(Value::as_str))
        .map(str::to_string)
        .unwrap_or_else(|| format!("#{}", position))
}

fn skip<S: ServiceRules>(resource_group: &str, resource: String, reason: String) -> MalformedResource {
    let skipped = MalformedResource {
        resource_group: resource_group.to_string(),
        resource_type: S::Resource::RESOURCE_TYPE.to_string(),
        resource,
        reason,
    };
    log::warn!("Skipping {}", skipped);
    skipped
}

#[async_trait]
impl<S: ServiceRules> ServiceAnalyzer for ResourceAnalyzer<S> {
    fn service(&self) -> ServiceKind {
        S::KIND
    }

    async fn review_detailed(&self, resource_group: &str) -> Result<ServiceReview, ReviewError> {
        ResourceAnalyzer::review_detailed(self, resource_group).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::services::apim::codes as apim_codes;
    use crate::analyzer::services::vgw::codes as vgw_codes;
    use crate::azure::Page;
    use serde_json::{Value, json};
    use std::collections::HashMap;

    const RG: &str = "rg-net";

    /// Serves fixed pages keyed by URL.
    struct StaticSource {
        pages: HashMap<String, Page<Value>>,
    }

    impl StaticSource {
        fn new(pages: impl IntoIterator<Item = (String, Page<Value>)>) -> Arc<dyn PageSource> {
            Arc::new(Self {
                pages: pages.into_iter().collect(),
            })
        }
    }

    #[async_trait]
    impl PageSource for StaticSource {
        fn endpoint(&self) -> &str {
            "https://arm.test"
        }

        async fn get_page(&self, url: &str) -> crate::azure::Result<Page<Value>> {
            self.pages
                .get(url)
                .cloned()
                .ok_or_else(|| ArmError::NotFound(url.to_string()))
        }
    }

    fn gateways_url() -> String {
        resource_list_url(
            "https://arm.test",
            "sub",
            RG,
            "Microsoft.Network/virtualNetworkGateways",
            "2023-09-01",
        )
    }

    fn gateway(name: &str, sku: &str, tier: &str) -> Value {
        json!({
            "id": format!("/subscriptions/sub/resourceGroups/{RG}/providers/Microsoft.Network/virtualNetworkGateways/{name}"),
            "name": name,
            "type": "Microsoft.Network/virtualNetworkGateways",
            "properties": {
                "gatewayType": "Vpn",
                "sku": {"name": sku, "tier": tier}
            }
        })
    }

    struct FailingIndex;

    impl DiagnosticsIndex for FailingIndex {
        fn has_diagnostics(&self, resource_id: &str) -> Result<bool, DiagnosticsError> {
            Err(DiagnosticsError::LookupFailed {
                resource_id: resource_id.to_string(),
                message: "monitor unavailable".to_string(),
            })
        }
    }

    #[tokio::test]
    async fn test_review_builds_summary_rows() {
        let source = StaticSource::new([(
            gateways_url(),
            Page::last(vec![
                gateway("vpng-hub", "VpnGw2AZ", "VpnGw2"),
                gateway("edge", "Basic", "Basic"),
            ]),
        )]);
        let ctx = ScanContext::new().with_diagnostics(
            &format!("/subscriptions/sub/resourceGroups/{RG}/providers/Microsoft.Network/virtualNetworkGateways/vpng-hub"),
            "law",
        );
        let analyzer = VirtualNetworkGatewayAnalyzer::new("sub", source, Arc::new(ctx));

        let mut rows = analyzer.review(RG).await.unwrap();
        rows.sort_by(|a, b| a.service_name.cmp(&b.service_name));

        assert_eq!(rows.len(), 2);
        let edge = &rows[0];
        assert_eq!(edge.service_name, "edge");
        assert_eq!(edge.sla, "99.9%");
        assert!(!edge.caf_naming);
        assert!(!edge.availability_zones);
        assert!(!edge.diagnostic_settings);

        let hub = &rows[1];
        assert_eq!(hub.sku, "VpnGw2AZ");
        assert_eq!(hub.sla, "99.95%");
        assert!(hub.caf_naming);
        assert!(hub.availability_zones);
        assert!(hub.diagnostic_settings);
        assert_eq!(hub.subscription_id, "sub");
        assert_eq!(hub.resource_group, RG);
    }

    #[tokio::test]
    async fn test_detailed_review_has_one_row_per_rule() {
        let source = StaticSource::new([(
            gateways_url(),
            Page::last(vec![gateway("vpng-hub", "VpnGw1", "VpnGw1")]),
        )]);
        let analyzer = VirtualNetworkGatewayAnalyzer::new("sub", source, Arc::new(ScanContext::new()));

        let review = analyzer.review_detailed(RG).await.unwrap();
        assert_eq!(review.recommendations.len(), analyzer.catalog().len());
        let az = review
            .recommendations
            .iter()
            .find(|r| r.recommendation_id == vgw_codes::AVAILABILITY_ZONES)
            .unwrap();
        assert!(az.triggered);
        assert_eq!(az.resource_name, "vpng-hub");
    }

    #[tokio::test]
    async fn test_resource_without_identity_is_skipped() {
        let source = StaticSource::new([(
            gateways_url(),
            Page::last(vec![
                json!({"properties": {"gatewayType": "Vpn"}}),
                gateway("vpng-hub", "VpnGw1", "VpnGw1"),
            ]),
        )]);
        let analyzer = VirtualNetworkGatewayAnalyzer::new("sub", source, Arc::new(ScanContext::new()));

        let review = analyzer.review_detailed(RG).await.unwrap();
        assert_eq!(review.results.len(), 1);
        assert_eq!(review.skipped.len(), 1);
        assert_eq!(review.skipped[0].resource, "#0");
        assert_eq!(review.skipped[0].resource_group, RG);
    }

    #[tokio::test]
    async fn test_rule_error_leaves_derived_fields_empty() {
        let source = StaticSource::new([(
            gateways_url(),
            Page::last(vec![json!({
                "id": "/subscriptions/sub/resourceGroups/rg-net/providers/Microsoft.Network/virtualNetworkGateways/vpng-bare",
                "name": "vpng-bare"
            })]),
        )]);
        let analyzer = VirtualNetworkGatewayAnalyzer::new("sub", source, Arc::new(ScanContext::new()));

        let review = analyzer.review_detailed(RG).await.unwrap();
        let row = &review.results[0];
        assert_eq!(row.sla, "");
        assert_eq!(row.sku, "");
        assert!(!row.caf_naming);

        let sla = review
            .recommendations
            .iter()
            .find(|r| r.recommendation_id == vgw_codes::SLA)
            .unwrap();
        assert!(sla.error.as_deref().unwrap().contains("properties.sku"));
    }

    #[tokio::test]
    async fn test_diagnostics_lookup_failure_aborts_review() {
        let source = StaticSource::new([(
            gateways_url(),
            Page::last(vec![gateway("vpng-hub", "VpnGw1", "VpnGw1")]),
        )]);
        let analyzer = VirtualNetworkGatewayAnalyzer::new("sub", source, Arc::new(ScanContext::new()))
            .with_diagnostics_index(Arc::new(FailingIndex));

        let result = analyzer.review(RG).await;
        assert!(matches!(result, Err(ReviewError::DiagnosticsLookup(_))));
    }

    #[tokio::test]
    async fn test_listing_error_surfaces_as_transport() {
        let analyzer =
            ApiManagementAnalyzer::new("sub", StaticSource::new([]), Arc::new(ScanContext::new()));
        let result = analyzer.review(RG).await;
        assert!(matches!(
            result,
            Err(ReviewError::Transport(ArmError::NotFound(_)))
        ));
    }

    #[tokio::test]
    async fn test_excluded_rules_are_not_reported() {
        let url = resource_list_url(
            "https://arm.test",
            "sub",
            RG,
            "Microsoft.ApiManagement/service",
            "2022-08-01",
        );
        let service = json!({
            "id": "/subscriptions/sub/resourceGroups/rg-net/providers/Microsoft.ApiManagement/service/apim-a",
            "name": "apim-a",
            "sku": {"name": "Premium"},
            "zones": ["1", "2"]
        });
        let source = StaticSource::new([(url, Page::last(vec![service]))]);
        let analyzer = ApiManagementAnalyzer::new("sub", source, Arc::new(ScanContext::new()))
            .with_excluded_rules([apim_codes::TAGS.to_string()]);

        let review = analyzer.review_detailed(RG).await.unwrap();
        assert!(
            review
                .recommendations
                .iter()
                .all(|r| r.recommendation_id != apim_codes::TAGS)
        );
        assert_eq!(review.results[0].sla, "99.99%");
        assert!(review.results[0].availability_zones);
        assert_eq!(ServiceAnalyzer::service(&analyzer), ServiceKind::Apim);
    }

    #[tokio::test]
    async fn test_excluding_summary_rules_keeps_row_fields() {
        let url = resource_list_url(
            "https://arm.test",
            "sub",
            RG,
            "Microsoft.ApiManagement/service",
            "2022-08-01",
        );
        let service = json!({
            "id": "/subscriptions/sub/resourceGroups/rg-net/providers/Microsoft.ApiManagement/service/apim-good",
            "name": "apim-good",
            "sku": {"name": "Premium"},
            "zones": ["1"]
        });
        let source = StaticSource::new([(url, Page::last(vec![service]))]);
        let analyzer = ApiManagementAnalyzer::new("sub", source, Arc::new(ScanContext::new()))
            .with_excluded_rules([apim_codes::CAF_NAMING.to_string(), apim_codes::SLA.to_string()]);

        let review = analyzer.review_detailed(RG).await.unwrap();
        let row = &review.results[0];
        assert!(row.caf_naming);
        assert_eq!(row.sla, "99.99%");
        assert_eq!(review.recommendations.len(), analyzer.catalog().len() - 2);
        assert!(review.recommendations.iter().all(|r| {
            r.recommendation_id != apim_codes::CAF_NAMING && r.recommendation_id != apim_codes::SLA
        }));
    }

    #[tokio::test]
    async fn test_undecodable_item_skips_only_itself() {
        let source = StaticSource::new([(
            gateways_url(),
            Page::last(vec![
                json!({
                    "id": "/subscriptions/sub/resourceGroups/rg-net/providers/Microsoft.Network/virtualNetworkGateways/vpng-odd",
                    "name": "vpng-odd",
                    "properties": {"sku": {"name": "VpnGw1", "capacity": "two"}}
                }),
                json!({
                    "id": "/subscriptions/sub/resourceGroups/rg-net/providers/Microsoft.Network/virtualNetworkGateways/vpng-nulls",
                    "name": "vpng-nulls",
                    "tags": null,
                    "properties": {"gatewayType": "Vpn", "sku": {"name": "VpnGw1AZ", "tier": "VpnGw1"}}
                }),
                gateway("vpng-hub", "VpnGw1", "VpnGw1"),
            ]),
        )]);
        let analyzer = VirtualNetworkGatewayAnalyzer::new("sub", source, Arc::new(ScanContext::new()));

        let review = analyzer.review_detailed(RG).await.unwrap();
        let mut names: Vec<_> = review.results.iter().map(|r| r.service_name.as_str()).collect();
        names.sort();
        assert_eq!(names, vec!["vpng-hub", "vpng-nulls"]);

        assert_eq!(review.skipped.len(), 1);
        assert!(review.skipped[0].resource.ends_with("/vpng-odd"));
        assert!(review.skipped[0].reason.contains("could not be decoded"));
    }
}
