//! Azure Resource Manager access
//!
//! Authenticated list calls against the management API, a generic pager that
//! follows `nextLink` continuations, and typed models for the reviewed
//! resource types.
//!
//! # Example
//!
//! ```rust,ignore
//! use azqr_cli::azure::{ArmClient, list_all, resources::ApiManagementService};
//! use tokio_util::sync::CancellationToken;
//!
//! let client = ArmClient::new(std::env::var("AZURE_ACCESS_TOKEN")?)?;
//! let url = client.resource_group_list_url(sub, "rg-prod", "Microsoft.ApiManagement/service", "2022-08-01");
//! let services: Vec<ApiManagementService> = list_all(&client, url, &CancellationToken::new()).await?;
//! ```

pub mod client;
pub mod error;
pub mod pager;
pub mod resources;
pub mod types;

// Re-export commonly used items
pub use client::{
    ARM_ENDPOINT, ArmClient, ArmClientOptions, list_resource_group_names, resource_groups_url,
    resource_list_url,
};
pub use error::{ArmError, Result};
pub use pager::{PageSource, Pager, list_all};
pub use types::{Page, ResourceGroup};
