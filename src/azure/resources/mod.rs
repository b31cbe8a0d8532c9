//! Typed models for the resource types the analyzers review.
//!
//! Fields follow the ARM JSON shape. Everything the service may omit is an
//! `Option` so a sparse payload still decodes; rules turn absent fields they
//! need into [`RuleError::MissingField`](crate::analyzer::RuleError).
//! Collections decode an explicit `null` as empty.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use std::collections::HashMap;

/// `null` or a missing key decodes as `T::default()`.
/// Pair with `#[serde(default)]` to cover the missing key.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Identity and metadata every ARM tracked resource carries.
pub trait ArmResource: DeserializeOwned + Send + Sync + 'static {
    /// Provider/type pair, e.g. `Microsoft.ApiManagement/service`
    const RESOURCE_TYPE: &'static str;
    /// API version used for list calls
    const API_VERSION: &'static str;

    fn id(&self) -> Option<&str>;
    fn name(&self) -> Option<&str>;
    fn resource_type(&self) -> Option<&str>;
    fn tags(&self) -> &HashMap<String, String>;
}

macro_rules! impl_arm_resource {
    ($ty:ty, $resource_type:expr, $api_version:expr) => {
        impl $crate::azure::resources::ArmResource for $ty {
            const RESOURCE_TYPE: &'static str = $resource_type;
            const API_VERSION: &'static str = $api_version;

            fn id(&self) -> Option<&str> {
                self.id.as_deref()
            }

            fn name(&self) -> Option<&str> {
                self.name.as_deref()
            }

            fn resource_type(&self) -> Option<&str> {
                self.resource_type.as_deref()
            }

            fn tags(&self) -> &std::collections::HashMap<String, String> {
                &self.tags
            }
        }
    };
}

pub(crate) use impl_arm_resource;

pub mod apim;
pub mod vgw;

pub use apim::{ApiManagementService, ApiManagementSku, ManagedServiceIdentity};
pub use vgw::{GatewayType, VirtualNetworkGateway, VirtualNetworkGatewaySku};
