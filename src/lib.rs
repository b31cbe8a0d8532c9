//! # azqr CLI
//!
//! A Rust-based command-line application that reviews Azure resources against
//! best-practice recommendations.
//!
//! ## Features
//!
//! - **Typed rule catalogs**: one table of recommendations per resource type
//! - **Shared scan context**: diagnostic settings looked up once per scan
//! - **Concurrent scans**: every resource group and service reviewed in parallel
//! - **Table and JSON output**
//!
//! ## Example
//!
//! ```rust,no_run
//! use azqr_cli::analyzer::{ScanContext, VirtualNetworkGatewayAnalyzer};
//! use azqr_cli::azure::ArmClient;
//! use std::sync::Arc;
//!
//! # async fn run() -> azqr_cli::Result<()> {
//! let client = ArmClient::new(std::env::var("AZURE_ACCESS_TOKEN").unwrap_or_default())?;
//! let analyzer = VirtualNetworkGatewayAnalyzer::new(
//!     "00000000-0000-0000-0000-000000000000",
//!     Arc::new(client),
//!     Arc::new(ScanContext::new()),
//! );
//! for row in analyzer.review("rg-hub").await? {
//!     println!("{} {} {}", row.service_name, row.sku, row.sla);
//! }
//! # Ok(())
//! # }
//! ```

pub mod analyzer;
pub mod azure;
pub mod cli;
pub mod config;
pub mod error;
pub mod formatter;
pub mod handlers;

// Re-export commonly used types and functions
pub use error::{AzqrError, ConfigError, Result};
pub use handlers::*;
use cli::Commands;
use config::Config;
use tokio_util::sync::CancellationToken;

/// The current version of the CLI tool
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub async fn run_command(command: Commands, config: &Config, cancel: CancellationToken) -> Result<()> {
    match command {
        Commands::Scan {
            subscription_id,
            resource_groups,
            services,
            diagnostics_file,
            format,
            exclude_rules,
            access_token,
        } => {
            let options = ScanOptions {
                subscription_id,
                resource_groups,
                services,
                diagnostics_file,
                format,
                exclude_rules,
                access_token,
            };
            handlers::handle_scan(options, config, cancel).await
        }
        Commands::Rules { service, format } => handlers::handle_rules(service, format),
    }
}
