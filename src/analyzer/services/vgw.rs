//! Virtual Network Gateway recommendations (`vgw-*`).

use super::{CAF_NAMING_URL, SLA_URL, ServiceKind, ServiceRules, TAGS_URL, diagnostics_evaluation};
use crate::analyzer::catalog::RuleCatalog;
use crate::analyzer::context::ScanContext;
use crate::analyzer::types::{
    Category, Evaluation, Impact, Recommendation, RecommendationType, RuleError,
};
use crate::azure::resources::vgw::{SKU_TIER_BASIC, VirtualNetworkGatewaySku};
use crate::azure::resources::{ArmResource, GatewayType, VirtualNetworkGateway};

const RESOURCE_TYPE: &str = VirtualNetworkGateway::RESOURCE_TYPE;

/// Rule codes.
pub mod codes {
    pub const DIAGNOSTIC_SETTINGS: &str = "vgw-001";
    pub const CAF_NAMING: &str = "vgw-002";
    pub const TAGS: &str = "vgw-003";
    pub const SLA: &str = "vgw-004";
    pub const AVAILABILITY_ZONES: &str = "vgw-005";
}

pub const SLA_BASIC: &str = "99.9%";
pub const SLA_DEFAULT: &str = "99.95%";

/// Virtual network gateways (VPN and ExpressRoute).
pub struct VirtualNetworkGateways;

impl ServiceRules for VirtualNetworkGateways {
    type Resource = VirtualNetworkGateway;

    const KIND: ServiceKind = ServiceKind::Vgw;
    const DISPLAY_NAME: &'static str = "Virtual Network Gateways";
    const SLA_RULE: &'static str = codes::SLA;
    const NAMING_RULE: &'static str = codes::CAF_NAMING;

    fn recommendations() -> RuleCatalog<VirtualNetworkGateway> {
        RuleCatalog::new(rules())
    }

    fn sku(gateway: &VirtualNetworkGateway) -> Result<String, RuleError> {
        gateway_sku(gateway)?
            .name
            .clone()
            .ok_or(RuleError::missing("properties.sku.name"))
    }

    fn availability_zones(gateway: &VirtualNetworkGateway) -> bool {
        gateway_sku(gateway)
            .ok()
            .and_then(|s| s.name.as_deref())
            .is_some_and(is_zone_redundant)
    }

    /// Gateways are reached through their public IPs; private endpoints do
    /// not apply.
    fn private_endpoints(_: &VirtualNetworkGateway) -> bool {
        false
    }
}

fn gateway_sku(gateway: &VirtualNetworkGateway) -> Result<&VirtualNetworkGatewaySku, RuleError> {
    gateway
        .properties
        .as_ref()
        .and_then(|p| p.sku.as_ref())
        .ok_or(RuleError::missing("properties.sku"))
}

/// Zone-redundant SKUs carry an `AZ` suffix (`VpnGw2AZ`, `ErGw1AZ`).
pub fn is_zone_redundant(sku_name: &str) -> bool {
    sku_name.to_lowercase().ends_with("az")
}

/// CAF abbreviation a gateway name must start with.
pub fn naming_prefix(gateway_type: &GatewayType) -> &'static str {
    match gateway_type {
        GatewayType::Vpn => "vpng",
        GatewayType::ExpressRoute => "ergw",
        _ => "lgw",
    }
}

/// SLA for a SKU tier.
pub fn sla(tier: &str) -> &'static str {
    if tier == SKU_TIER_BASIC {
        SLA_BASIC
    } else {
        SLA_DEFAULT
    }
}

/// The full `vgw-*` table.
pub fn rules() -> Vec<Recommendation<VirtualNetworkGateway>> {
    vec![
        Recommendation {
            recommendation_id: codes::DIAGNOSTIC_SETTINGS,
            resource_type: RESOURCE_TYPE,
            category: Category::MonitoringAndAlerting,
            recommendation_type: RecommendationType::Default,
            impact: Impact::Low,
            recommendation: "Virtual Network Gateway should have diagnostic settings enabled",
            learn_more_url: "https://learn.microsoft.com/en-us/azure/vpn-gateway/monitor-vpn-gateway",
            eval: |g: &VirtualNetworkGateway, ctx: &ScanContext| {
                let id = g.id().ok_or(RuleError::missing("id"))?;
                Ok(diagnostics_evaluation(ctx, id))
            },
        },
        Recommendation {
            recommendation_id: codes::CAF_NAMING,
            resource_type: RESOURCE_TYPE,
            category: Category::Governance,
            recommendation_type: RecommendationType::Default,
            impact: Impact::Low,
            recommendation: "Virtual Network Gateway Name should comply with naming conventions",
            learn_more_url: CAF_NAMING_URL,
            eval: |g: &VirtualNetworkGateway, _: &ScanContext| {
                let gateway_type = g
                    .properties
                    .as_ref()
                    .and_then(|p| p.gateway_type.as_ref())
                    .ok_or(RuleError::missing("properties.gatewayType"))?;
                let name = g.name().ok_or(RuleError::missing("name"))?;
                Ok(Evaluation::check(!name.starts_with(naming_prefix(gateway_type))))
            },
        },
        Recommendation {
            recommendation_id: codes::TAGS,
            resource_type: RESOURCE_TYPE,
            category: Category::Governance,
            recommendation_type: RecommendationType::Default,
            impact: Impact::Low,
            recommendation: "Virtual Network Gateway should have tags",
            learn_more_url: TAGS_URL,
            eval: |g: &VirtualNetworkGateway, _: &ScanContext| {
                Ok(Evaluation::check(g.tags().is_empty()))
            },
        },
        Recommendation {
            recommendation_id: codes::SLA,
            resource_type: RESOURCE_TYPE,
            category: Category::HighAvailability,
            recommendation_type: RecommendationType::Sla,
            impact: Impact::High,
            recommendation: "Virtual Network Gateway should have a SLA",
            learn_more_url: SLA_URL,
            eval: |g: &VirtualNetworkGateway, _: &ScanContext| {
                let tier = gateway_sku(g)?
                    .tier
                    .as_deref()
                    .ok_or(RuleError::missing("properties.sku.tier"))?;
                Ok(Evaluation::info(sla(tier)))
            },
        },
        Recommendation {
            recommendation_id: codes::AVAILABILITY_ZONES,
            resource_type: RESOURCE_TYPE,
            category: Category::HighAvailability,
            recommendation_type: RecommendationType::Default,
            impact: Impact::High,
            recommendation: "Virtual Network Gateway should have availability zones enabled",
            learn_more_url: "https://learn.microsoft.com/en-us/azure/vpn-gateway/create-zone-redundant-vnet-gateway",
            eval: |g: &VirtualNetworkGateway, _: &ScanContext| {
                let name = gateway_sku(g)?
                    .name
                    .as_deref()
                    .ok_or(RuleError::missing("properties.sku.name"))?;
                Ok(Evaluation::check(!is_zone_redundant(name)))
            },
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::evaluator::{evaluate, finding};
    use crate::azure::resources::vgw::VirtualNetworkGatewayProperties;
    use std::collections::HashMap;

    const ID: &str = "/subscriptions/s/resourceGroups/rg/providers/Microsoft.Network/virtualNetworkGateways/vpng-hub";

    fn gateway(name: &str, gateway_type: GatewayType, sku_name: &str, tier: &str) -> VirtualNetworkGateway {
        VirtualNetworkGateway {
            id: Some(ID.to_string()),
            name: Some(name.to_string()),
            resource_type: Some(RESOURCE_TYPE.to_string()),
            properties: Some(VirtualNetworkGatewayProperties {
                gateway_type: Some(gateway_type),
                sku: Some(VirtualNetworkGatewaySku {
                    name: Some(sku_name.to_string()),
                    tier: Some(tier.to_string()),
                    capacity: None,
                }),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    fn eval(rule: &str, g: &VirtualNetworkGateway, ctx: &ScanContext) -> Result<Evaluation, RuleError> {
        VirtualNetworkGateways::recommendations()
            .get(rule)
            .unwrap()
            .evaluate(g, ctx)
    }

    #[test]
    fn test_catalog_covers_all_codes() {
        let catalog = VirtualNetworkGateways::recommendations();
        assert_eq!(catalog.len(), 5);
        for (key, rec) in catalog.iter() {
            assert_eq!(key, rec.recommendation_id);
        }
        assert_eq!(
            catalog.get(codes::AVAILABILITY_ZONES).unwrap().recommendation,
            "Virtual Network Gateway should have availability zones enabled"
        );
    }

    #[test]
    fn test_sla_by_tier() {
        let ctx = ScanContext::new();
        let basic = gateway("vpng-a", GatewayType::Vpn, "Basic", "Basic");
        assert_eq!(eval(codes::SLA, &basic, &ctx).unwrap().detail, "99.9%");

        let gw1 = gateway("vpng-a", GatewayType::Vpn, "VpnGw1", "VpnGw1");
        let result = eval(codes::SLA, &gw1, &ctx).unwrap();
        assert_eq!(result.detail, "99.95%");
        assert!(!result.triggered);
    }

    #[test]
    fn test_naming_by_gateway_type() {
        let ctx = ScanContext::new();
        let cases = [
            ("vpng-test", GatewayType::Vpn, false),
            ("foo", GatewayType::Vpn, true),
            ("ergw-x", GatewayType::ExpressRoute, false),
            ("vpng-x", GatewayType::ExpressRoute, true),
            ("lgw-x", GatewayType::Other("HyperNet".into()), false),
            ("lgw-x", GatewayType::LocalGateway, false),
            ("VPNG-upper", GatewayType::Vpn, true),
        ];
        for (name, gateway_type, triggered) in cases {
            let g = gateway(name, gateway_type.clone(), "VpnGw1", "VpnGw1");
            assert_eq!(
                eval(codes::CAF_NAMING, &g, &ctx).unwrap().triggered,
                triggered,
                "{name} / {gateway_type}"
            );
        }
    }

    #[test]
    fn test_naming_without_gateway_type_is_an_error() {
        let mut g = gateway("vpng-a", GatewayType::Vpn, "VpnGw1", "VpnGw1");
        if let Some(p) = g.properties.as_mut() {
            p.gateway_type = None;
        }
        assert_eq!(
            eval(codes::CAF_NAMING, &g, &ScanContext::new()),
            Err(RuleError::missing("properties.gatewayType"))
        );
    }

    #[test]
    fn test_diagnostics_case_insensitive() {
        let g = gateway("vpng-hub", GatewayType::Vpn, "VpnGw1", "VpnGw1");
        assert!(eval(codes::DIAGNOSTIC_SETTINGS, &g, &ScanContext::new()).unwrap().triggered);

        let ctx = ScanContext::new().with_diagnostics(&ID.to_lowercase(), "to-law");
        let result = eval(codes::DIAGNOSTIC_SETTINGS, &g, &ctx).unwrap();
        assert!(!result.triggered);
        assert_eq!(result.detail, "to-law");
    }

    #[test]
    fn test_zone_redundant_sku() {
        let ctx = ScanContext::new();
        let az = gateway("vpng-a", GatewayType::Vpn, "VpnGw2AZ", "VpnGw2");
        assert!(!eval(codes::AVAILABILITY_ZONES, &az, &ctx).unwrap().triggered);
        assert!(VirtualNetworkGateways::availability_zones(&az));

        let regional = gateway("vpng-a", GatewayType::Vpn, "VpnGw2", "VpnGw2");
        assert!(eval(codes::AVAILABILITY_ZONES, &regional, &ctx).unwrap().triggered);
        assert!(!VirtualNetworkGateways::availability_zones(&regional));
    }

    #[test]
    fn test_tags() {
        let ctx = ScanContext::new();
        let mut g = gateway("vpng-a", GatewayType::Vpn, "VpnGw1", "VpnGw1");
        assert!(eval(codes::TAGS, &g, &ctx).unwrap().triggered);
        g.tags = HashMap::from([("owner".to_string(), "net".to_string())]);
        assert!(!eval(codes::TAGS, &g, &ctx).unwrap().triggered);
    }

    #[test]
    fn test_missing_properties_only_fail_dependent_rules() {
        let g = VirtualNetworkGateway {
            id: Some(ID.to_string()),
            name: Some("vpng-hub".to_string()),
            ..Default::default()
        };
        let catalog = VirtualNetworkGateways::recommendations();
        let findings = evaluate(&g, &catalog, &ScanContext::new());
        assert_eq!(findings.len(), 5);
        assert_eq!(
            finding(&findings, codes::SLA).unwrap().error(),
            Some(&RuleError::missing("properties.sku"))
        );
        assert!(finding(&findings, codes::CAF_NAMING).unwrap().error().is_some());
        assert!(finding(&findings, codes::DIAGNOSTIC_SETTINGS).unwrap().is_triggered());
        assert!(finding(&findings, codes::TAGS).unwrap().is_triggered());
    }
}
