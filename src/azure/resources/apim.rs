//! API Management service (`Microsoft.ApiManagement/service`).

use super::impl_arm_resource;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiManagementService {
    pub id: Option<String>,
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub resource_type: Option<String>,
    pub location: Option<String>,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub tags: HashMap<String, String>,
    pub sku: Option<ApiManagementSku>,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub zones: Vec<String>,
    pub identity: Option<ManagedServiceIdentity>,
    pub properties: Option<ApiManagementProperties>,
}

impl_arm_resource!(
    ApiManagementService,
    "Microsoft.ApiManagement/service",
    "2022-08-01"
);

impl ApiManagementService {
    /// Regions beyond the primary one; empty when `properties` is absent.
    pub fn additional_locations(&self) -> &[AdditionalLocation] {
        self.properties
            .as_ref()
            .map(|p| p.additional_locations.as_slice())
            .unwrap_or_default()
    }

    /// Private endpoint connections; empty when `properties` is absent.
    pub fn private_endpoint_connections(&self) -> &[serde_json::Value] {
        self.properties
            .as_ref()
            .map(|p| p.private_endpoint_connections.as_slice())
            .unwrap_or_default()
    }
}

/// `Developer`, `Basic`, `Standard`, `Premium`, `Consumption`, ...
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiManagementSku {
    pub name: Option<String>,
    pub capacity: Option<i32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiManagementProperties {
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub additional_locations: Vec<AdditionalLocation>,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub private_endpoint_connections: Vec<serde_json::Value>,
    pub public_network_access: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdditionalLocation {
    pub location: Option<String>,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub zones: Vec<String>,
}

/// `SystemAssigned`, `UserAssigned`, `SystemAssigned, UserAssigned` or `None`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ManagedServiceIdentity {
    #[serde(rename = "type")]
    pub identity_type: Option<String>,
}
