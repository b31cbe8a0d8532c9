//! API Management recommendations (`apim-*`).

use super::{CAF_NAMING_URL, SLA_URL, ServiceKind, ServiceRules, TAGS_URL, diagnostics_evaluation};
use crate::analyzer::catalog::RuleCatalog;
use crate::analyzer::context::ScanContext;
use crate::analyzer::types::{
    Category, Evaluation, Impact, Recommendation, RecommendationType, RuleError,
};
use crate::azure::resources::{ApiManagementService, ArmResource};

const RESOURCE_TYPE: &str = ApiManagementService::RESOURCE_TYPE;

/// Rule codes.
pub mod codes {
    pub const DIAGNOSTIC_SETTINGS: &str = "apim-001";
    pub const AVAILABILITY_ZONES: &str = "apim-002";
    pub const SLA: &str = "apim-003";
    pub const PRIVATE_ENDPOINT: &str = "apim-004";
    pub const CAF_NAMING: &str = "apim-005";
    pub const TAGS: &str = "apim-006";
    pub const MANAGED_IDENTITY: &str = "apim-007";
}

pub const SLA_DEFAULT: &str = "99.95%";
pub const SLA_MULTI_ZONE_PREMIUM: &str = "99.99%";

/// API Management services.
pub struct ApiManagement;

impl ServiceRules for ApiManagement {
    type Resource = ApiManagementService;

    const KIND: ServiceKind = ServiceKind::Apim;
    const DISPLAY_NAME: &'static str = "API Management Services";
    const SLA_RULE: &'static str = codes::SLA;
    const NAMING_RULE: &'static str = codes::CAF_NAMING;

    fn recommendations() -> RuleCatalog<ApiManagementService> {
        RuleCatalog::new(rules())
    }

    fn sku(service: &ApiManagementService) -> Result<String, RuleError> {
        sku_name(service).map(str::to_string)
    }

    fn availability_zones(service: &ApiManagementService) -> bool {
        !service.zones.is_empty()
    }

    fn private_endpoints(service: &ApiManagementService) -> bool {
        !service.private_endpoint_connections().is_empty()
    }
}

fn sku_name(service: &ApiManagementService) -> Result<&str, RuleError> {
    service
        .sku
        .as_ref()
        .and_then(|s| s.name.as_deref())
        .ok_or(RuleError::missing("sku.name"))
}

/// SLA for a service configuration.
///
/// Premium (case-sensitive substring) deployed across zones or regions gets
/// the higher tier; everything else gets the default.
pub fn sla(sku_name: &str, zones: usize, additional_locations: usize) -> &'static str {
    if sku_name.contains("Premium") && (zones > 0 || additional_locations > 0) {
        SLA_MULTI_ZONE_PREMIUM
    } else {
        SLA_DEFAULT
    }
}

/// The full `apim-*` table.
pub fn rules() -> Vec<Recommendation<ApiManagementService>> {
    vec![
        Recommendation {
            recommendation_id: codes::DIAGNOSTIC_SETTINGS,
            resource_type: RESOURCE_TYPE,
            category: Category::MonitoringAndAlerting,
            recommendation_type: RecommendationType::Default,
            impact: Impact::Low,
            recommendation: "APIM should have diagnostic settings enabled",
            learn_more_url: "https://learn.microsoft.com/en-us/azure/api-management/api-management-howto-use-azure-monitor#resource-logs",
            eval: |s: &ApiManagementService, ctx: &ScanContext| {
                let id = s.id().ok_or(RuleError::missing("id"))?;
                Ok(diagnostics_evaluation(ctx, id))
            },
        },
        Recommendation {
            recommendation_id: codes::AVAILABILITY_ZONES,
            resource_type: RESOURCE_TYPE,
            category: Category::HighAvailability,
            recommendation_type: RecommendationType::Default,
            impact: Impact::High,
            recommendation: "APIM should have availability zones enabled",
            learn_more_url: "https://learn.microsoft.com/en-us/azure/reliability/migrate-api-mgt",
            eval: |s: &ApiManagementService, _: &ScanContext| {
                Ok(Evaluation::check(s.zones.is_empty()))
            },
        },
        Recommendation {
            recommendation_id: codes::SLA,
            resource_type: RESOURCE_TYPE,
            category: Category::HighAvailability,
            recommendation_type: RecommendationType::Sla,
            impact: Impact::High,
            recommendation: "APIM should have a SLA",
            learn_more_url: SLA_URL,
            eval: |s: &ApiManagementService, _: &ScanContext| {
                let sku = sku_name(s)?;
                Ok(Evaluation::info(sla(
                    sku,
                    s.zones.len(),
                    s.additional_locations().len(),
                )))
            },
        },
        Recommendation {
            recommendation_id: codes::PRIVATE_ENDPOINT,
            resource_type: RESOURCE_TYPE,
            category: Category::Security,
            recommendation_type: RecommendationType::Default,
            impact: Impact::High,
            recommendation: "APIM should use private endpoints",
            learn_more_url: "https://learn.microsoft.com/en-us/azure/api-management/private-endpoint",
            eval: |s: &ApiManagementService, _: &ScanContext| {
                Ok(Evaluation::check(s.private_endpoint_connections().is_empty()))
            },
        },
        Recommendation {
            recommendation_id: codes::CAF_NAMING,
            resource_type: RESOURCE_TYPE,
            category: Category::Governance,
            recommendation_type: RecommendationType::Default,
            impact: Impact::Low,
            recommendation: "APIM should comply with naming conventions",
            learn_more_url: CAF_NAMING_URL,
            eval: |s: &ApiManagementService, _: &ScanContext| {
                let name = s.name().ok_or(RuleError::missing("name"))?;
                Ok(Evaluation::check(!name.starts_with("apim")))
            },
        },
        Recommendation {
            recommendation_id: codes::TAGS,
            resource_type: RESOURCE_TYPE,
            category: Category::Governance,
            recommendation_type: RecommendationType::Default,
            impact: Impact::Low,
            recommendation: "APIM should have tags",
            learn_more_url: TAGS_URL,
            eval: |s: &ApiManagementService, _: &ScanContext| {
                Ok(Evaluation::check(s.tags().is_empty()))
            },
        },
        Recommendation {
            recommendation_id: codes::MANAGED_IDENTITY,
            resource_type: RESOURCE_TYPE,
            category: Category::Security,
            recommendation_type: RecommendationType::Default,
            impact: Impact::Medium,
            recommendation: "APIM should use Managed Identities",
            learn_more_url: "https://learn.microsoft.com/en-us/azure/api-management/api-management-howto-use-managed-service-identity",
            eval: |s: &ApiManagementService, _: &ScanContext| {
                let has_identity = s
                    .identity
                    .as_ref()
                    .and_then(|i| i.identity_type.as_deref())
                    .is_some_and(|t| !t.eq_ignore_ascii_case("none"));
                Ok(Evaluation::check(!has_identity))
            },
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::evaluator::{evaluate, finding};
    use crate::azure::resources::{ApiManagementSku, ManagedServiceIdentity};
    use crate::azure::resources::apim::{AdditionalLocation, ApiManagementProperties};
    use proptest::prelude::*;
    use std::collections::HashMap;

    const ID: &str = "/subscriptions/s/resourceGroups/rg/providers/Microsoft.ApiManagement/service/apim-prod";

    fn service(sku: &str, zones: &[&str], extra_locations: usize) -> ApiManagementService {
        ApiManagementService {
            id: Some(ID.to_string()),
            name: Some("apim-prod".to_string()),
            resource_type: Some(RESOURCE_TYPE.to_string()),
            sku: Some(ApiManagementSku {
                name: Some(sku.to_string()),
                capacity: Some(1),
            }),
            zones: zones.iter().map(|z| z.to_string()).collect(),
            properties: Some(ApiManagementProperties {
                additional_locations: (0..extra_locations)
                    .map(|_| AdditionalLocation::default())
                    .collect(),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    fn eval(rule: &str, service: &ApiManagementService, ctx: &ScanContext) -> Evaluation {
        let catalog = ApiManagement::recommendations();
        catalog.get(rule).unwrap().evaluate(service, ctx).unwrap()
    }

    #[test]
    fn test_catalog_keys_match_ids() {
        let catalog = ApiManagement::recommendations();
        assert_eq!(catalog.len(), rules().len());
        for (key, rec) in catalog.iter() {
            assert_eq!(key, rec.recommendation_id);
            assert_eq!(rec.resource_type, RESOURCE_TYPE);
        }
        assert!(catalog.get(ApiManagement::SLA_RULE).unwrap().is_sla());
    }

    #[test]
    fn test_sla_premium_with_zones() {
        let ctx = ScanContext::new();
        assert_eq!(eval(codes::SLA, &service("Premium", &["1"], 0), &ctx).detail, "99.99%");
    }

    #[test]
    fn test_sla_premium_with_additional_location() {
        let ctx = ScanContext::new();
        assert_eq!(eval(codes::SLA, &service("Premium", &[], 1), &ctx).detail, "99.99%");
    }

    #[test]
    fn test_sla_premium_single_zone_single_region() {
        let ctx = ScanContext::new();
        let result = eval(codes::SLA, &service("Premium", &[], 0), &ctx);
        assert_eq!(result.detail, "99.95%");
        assert!(!result.triggered);
    }

    #[test]
    fn test_sla_standard_with_zones() {
        let ctx = ScanContext::new();
        assert_eq!(eval(codes::SLA, &service("Standard", &["1"], 0), &ctx).detail, "99.95%");
    }

    #[test]
    fn test_sla_premium_match_is_case_sensitive() {
        assert_eq!(sla("premium", 3, 0), SLA_DEFAULT);
        assert_eq!(sla("PremiumV2", 1, 0), SLA_MULTI_ZONE_PREMIUM);
    }

    #[test]
    fn test_sla_without_sku_is_an_error() {
        let mut s = service("Premium", &["1"], 0);
        s.sku = None;
        let catalog = ApiManagement::recommendations();
        let result = catalog.get(codes::SLA).unwrap().evaluate(&s, &ScanContext::new());
        assert_eq!(result, Err(RuleError::missing("sku.name")));
    }

    #[test]
    fn test_diagnostics_rule() {
        let s = service("Developer", &[], 0);
        assert!(eval(codes::DIAGNOSTIC_SETTINGS, &s, &ScanContext::new()).triggered);

        let ctx = ScanContext::new()
            .with_diagnostics(&ID.to_uppercase(), "law")
            .with_diagnostics(ID, "archive");
        let result = eval(codes::DIAGNOSTIC_SETTINGS, &s, &ctx);
        assert!(!result.triggered);
        assert_eq!(result.detail, "law, archive");
    }

    #[test]
    fn test_naming_tags_identity_and_private_endpoints() {
        let ctx = ScanContext::new();
        let mut s = service("Developer", &[], 0);
        assert!(!eval(codes::CAF_NAMING, &s, &ctx).triggered);
        assert!(eval(codes::TAGS, &s, &ctx).triggered);
        assert!(eval(codes::MANAGED_IDENTITY, &s, &ctx).triggered);
        assert!(eval(codes::PRIVATE_ENDPOINT, &s, &ctx).triggered);
        assert!(eval(codes::AVAILABILITY_ZONES, &s, &ctx).triggered);

        s.name = Some("gateway".to_string());
        s.tags = HashMap::from([("env".to_string(), "prod".to_string())]);
        s.identity = Some(ManagedServiceIdentity {
            identity_type: Some("SystemAssigned".to_string()),
        });
        assert!(eval(codes::CAF_NAMING, &s, &ctx).triggered);
        assert!(!eval(codes::TAGS, &s, &ctx).triggered);
        assert!(!eval(codes::MANAGED_IDENTITY, &s, &ctx).triggered);

        s.identity = Some(ManagedServiceIdentity {
            identity_type: Some("None".to_string()),
        });
        assert!(eval(codes::MANAGED_IDENTITY, &s, &ctx).triggered);
    }

    #[test]
    fn test_sparse_service_reports_errors_per_rule() {
        let catalog = ApiManagement::recommendations();
        let findings = evaluate(&ApiManagementService::default(), &catalog, &ScanContext::new());
        assert_eq!(findings.len(), catalog.len());
        assert!(finding(&findings, codes::DIAGNOSTIC_SETTINGS).unwrap().error().is_some());
        assert!(finding(&findings, codes::CAF_NAMING).unwrap().error().is_some());
        assert!(finding(&findings, codes::TAGS).unwrap().error().is_none());
    }

    proptest! {
        #[test]
        fn prop_sla_only_upgrades_for_premium(
            sku in "[A-Za-z0-9_]{0,12}",
            zones in 0usize..4,
            extra in 0usize..3,
        ) {
            let value = sla(&sku, zones, extra);
            if !sku.contains("Premium") || (zones == 0 && extra == 0) {
                prop_assert_eq!(value, SLA_DEFAULT);
            } else {
                prop_assert_eq!(value, SLA_MULTI_ZONE_PREMIUM);
            }
        }
    }
}
