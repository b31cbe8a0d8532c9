//! Virtual network gateway (`Microsoft.Network/virtualNetworkGateways`).

use super::impl_arm_resource;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VirtualNetworkGateway {
    pub id: Option<String>,
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub resource_type: Option<String>,
    pub location: Option<String>,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub tags: HashMap<String, String>,
    pub properties: Option<VirtualNetworkGatewayProperties>,
}

impl_arm_resource!(
    VirtualNetworkGateway,
    "Microsoft.Network/virtualNetworkGateways",
    "2023-09-01"
);

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VirtualNetworkGatewayProperties {
    pub gateway_type: Option<GatewayType>,
    pub vpn_type: Option<String>,
    pub sku: Option<VirtualNetworkGatewaySku>,
    pub active_active: Option<bool>,
}

/// Gateway SKU. `name` carries the zone-redundant `AZ` suffix, `tier` does not.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VirtualNetworkGatewaySku {
    pub name: Option<String>,
    pub tier: Option<String>,
    pub capacity: Option<i32>,
}

/// Bottom SKU tier; every other tier carries the higher SLA.
pub const SKU_TIER_BASIC: &str = "Basic";

/// Gateway kind. Values the API may add later land in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum GatewayType {
    Vpn,
    ExpressRoute,
    LocalGateway,
    Other(String),
}

impl GatewayType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Vpn => "Vpn",
            Self::ExpressRoute => "ExpressRoute",
            Self::LocalGateway => "LocalGateway",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for GatewayType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "Vpn" => Self::Vpn,
            "ExpressRoute" => Self::ExpressRoute,
            "LocalGateway" => Self::LocalGateway,
            _ => Self::Other(s),
        }
    }
}

impl From<&str> for GatewayType {
    fn from(s: &str) -> Self {
        Self::from(s.to_string())
    }
}

impl From<GatewayType> for String {
    fn from(t: GatewayType) -> Self {
        t.as_str().to_string()
    }
}

impl fmt::Display for GatewayType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
