//! Shared, read-only lookups for one scan.
//!
//! A `ScanContext` is built once before any analyzer runs and then only
//! borrowed. Analyzers running concurrently share it behind an `Arc`.

use std::collections::HashMap;
use thiserror::Error;

/// Path segment separating a resource ID from its diagnostic setting name.
const DIAGNOSTIC_SETTINGS_SEGMENT: &str = "/providers/microsoft.insights/diagnosticsettings/";

/// Failure resolving diagnostics presence for one resource.
#[derive(Debug, Error)]
pub enum DiagnosticsError {
    #[error("diagnostics lookup failed for {resource_id}: {message}")]
    LookupFailed {
        resource_id: String,
        message: String,
    },
}

/// Answers whether a resource has diagnostic settings.
pub trait DiagnosticsIndex: Send + Sync {
    /// `resource_id` is matched case-insensitively.
    fn has_diagnostics(&self, resource_id: &str) -> Result<bool, DiagnosticsError>;
}

/// Lookups prefetched once per scan.
#[derive(Debug, Clone, Default)]
pub struct ScanContext {
    /// Lowercase resource ID -> names of its diagnostic settings
    diagnostics_settings: HashMap<String, Vec<String>>,
}

impl ScanContext {
    /// An empty context: no resource has diagnostics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a context from diagnostic setting IDs of the form
    /// `{resourceId}/providers/microsoft.insights/diagnosticSettings/{name}`.
    ///
    /// IDs without the diagnostic settings segment are ignored.
    pub fn from_diagnostic_setting_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut ctx = Self::new();
        for id in ids {
            let id = id.as_ref().trim();
            let Some(pos) = id.to_ascii_lowercase().find(DIAGNOSTIC_SETTINGS_SEGMENT) else {
                log::debug!("Ignoring malformed diagnostic setting id: {}", id);
                continue;
            };
            // ASCII lowercasing keeps byte offsets, so `pos` indexes `id` too
            let setting_name = &id[pos + DIAGNOSTIC_SETTINGS_SEGMENT.len()..];
            ctx.diagnostics_settings
                .entry(id[..pos].to_lowercase())
                .or_default()
                .push(setting_name.to_string());
        }
        ctx
    }

    /// Record a diagnostic setting for `resource_id`.
    pub fn with_diagnostics(mut self, resource_id: &str, setting_name: &str) -> Self {
        self.diagnostics_settings
            .entry(resource_id.to_lowercase())
            .or_default()
            .push(setting_name.to_string());
        self
    }

    /// Diagnostic setting names of a resource, if it has any.
    pub fn diagnostics_settings(&self, resource_id: &str) -> Option<&[String]> {
        self.diagnostics_settings
            .get(&resource_id.to_lowercase())
            .map(Vec::as_slice)
    }

    /// Whether `resource_id` appears in the diagnostics map.
    pub fn has_diagnostics_settings(&self, resource_id: &str) -> bool {
        self.diagnostics_settings
            .contains_key(&resource_id.to_lowercase())
    }

    /// Number of resources with at least one diagnostic setting.
    pub fn diagnostics_count(&self) -> usize {
        self.diagnostics_settings.len()
    }
}

impl DiagnosticsIndex for ScanContext {
    fn has_diagnostics(&self, resource_id: &str) -> Result<bool, DiagnosticsError> {
        Ok(self.has_diagnostics_settings(resource_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GATEWAY_ID: &str =
        "/subscriptions/s/resourceGroups/RG-Hub/providers/Microsoft.Network/virtualNetworkGateways/vpng-hub";

    #[test]
    fn test_from_setting_ids_is_case_insensitive() {
        let ctx = ScanContext::from_diagnostic_setting_ids([format!(
            "{}/providers/Microsoft.Insights/diagnosticSettings/to-law",
            GATEWAY_ID
        )]);

        assert!(ctx.has_diagnostics_settings(GATEWAY_ID));
        assert!(ctx.has_diagnostics_settings(&GATEWAY_ID.to_uppercase()));
        assert_eq!(
            ctx.diagnostics_settings(GATEWAY_ID),
            Some(&["to-law".to_string()][..])
        );
    }

    #[test]
    fn test_multiple_settings_for_one_resource() {
        let ctx = ScanContext::from_diagnostic_setting_ids([
            format!("{}/providers/microsoft.insights/diagnosticSettings/a", GATEWAY_ID),
            format!("{}/providers/microsoft.insights/diagnosticSettings/b", GATEWAY_ID),
            "not-a-setting-id".to_string(),
        ]);
        assert_eq!(ctx.diagnostics_count(), 1);
        assert_eq!(ctx.diagnostics_settings(GATEWAY_ID).map(<[String]>::len), Some(2));
    }

    #[test]
    fn test_index_lookup() {
        let ctx = ScanContext::new().with_diagnostics(GATEWAY_ID, "default");
        assert!(ctx.has_diagnostics(&GATEWAY_ID.to_lowercase()).unwrap());
        assert!(!ctx.has_diagnostics("/subscriptions/s/other").unwrap());
    }
}
