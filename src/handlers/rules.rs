//! Handler for the `rules` command.

use crate::analyzer::ServiceKind;
use crate::error::Result;
use crate::formatter::{OutputFormat, ServiceCatalog, format_catalogs_to_string};

/// Catalogs for `service`, or for every service.
pub fn catalogs(service: Option<ServiceKind>) -> Vec<ServiceCatalog> {
    match service {
        Some(kind) => vec![ServiceCatalog::of(kind)],
        None => ServiceKind::ALL.into_iter().map(ServiceCatalog::of).collect(),
    }
}

/// Handle the `rules` command.
pub fn handle_rules(service: Option<ServiceKind>, format: OutputFormat) -> Result<()> {
    print!("{}", format_catalogs_to_string(&catalogs(service), format));
    Ok(())
}
