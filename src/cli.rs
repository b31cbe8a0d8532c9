use crate::analyzer::ServiceKind;
use crate::formatter::OutputFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "azqr")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Review Azure resources against best-practice recommendations")]
#[command(long_about = "Lists API Management services and virtual network gateways in a subscription, evaluates each one against a catalog of best-practice recommendations (diagnostics, naming, tags, SLA, availability zones, ...) and reports the results.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scan resource groups and evaluate every resource
    Scan {
        /// Subscription to scan
        #[arg(short, long, env = "AZURE_SUBSCRIPTION_ID")]
        subscription_id: Option<String>,

        /// Resource group to scan (repeatable); all groups when omitted
        #[arg(short = 'g', long = "resource-group", value_name = "NAME")]
        resource_groups: Vec<String>,

        /// Services to review (apim, vgw); all when omitted
        #[arg(long, value_delimiter = ',')]
        services: Vec<ServiceKind>,

        /// JSON array of diagnostic setting IDs
        #[arg(long, value_name = "FILE")]
        diagnostics_file: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,

        /// Recommendation ID to skip (repeatable)
        #[arg(long = "exclude-rule", value_name = "ID")]
        exclude_rules: Vec<String>,

        /// Bearer token for the management API
        #[arg(long, env = "AZURE_ACCESS_TOKEN", hide_env_values = true)]
        access_token: Option<String>,
    },

    /// List the recommendation catalogs
    Rules {
        /// Only show one service
        #[arg(long)]
        service: Option<ServiceKind>,

        /// Output format
        #[arg(long, value_enum, default_value = "table")]
        format: OutputFormat,
    },
}

impl Cli {
    /// Initialize logging based on verbosity level
    pub fn init_logging(&self) {
        if self.quiet {
            return;
        }

        let level = match self.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        };

        env_logger::Builder::from_default_env()
            .filter_level(level)
            .init();
    }
}
