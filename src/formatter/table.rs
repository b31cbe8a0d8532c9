//! Plain table formatter.

use super::ServiceCatalog;
use crate::analyzer::{Impact, ScanReport};
use colored::Colorize;

fn yes_no(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}

fn impact(impact: Impact) -> String {
    match impact {
        Impact::High => impact.as_str().red().to_string(),
        Impact::Medium => impact.as_str().yellow().to_string(),
        Impact::Low => impact.as_str().to_string(),
    }
}

/// Format a scan report as text tables.
pub fn format_report(report: &ScanReport) -> String {
    let mut output = String::new();

    if report.results.is_empty() {
        output.push_str("No resources found.\n");
    } else {
        output.push_str(&format!(
            "{}\n",
            format!(
                "{:<24} {:<32} {:<12} {:<8} {:<5} {:<5} {:<5} {:<5}",
                "RESOURCE GROUP", "NAME", "SKU", "SLA", "AZ", "PVT", "DIAG", "CAF"
            )
            .bold()
        ));
        for row in &report.results {
            output.push_str(&format!(
                "{:<24} {:<32} {:<12} {:<8} {:<5} {:<5} {:<5} {:<5}\n",
                row.resource_group,
                row.service_name,
                row.sku,
                row.sla,
                yes_no(row.availability_zones),
                yes_no(row.private_endpoints),
                yes_no(row.diagnostic_settings),
                yes_no(row.caf_naming),
            ));
        }
    }

    let triggered: Vec<_> = report
        .recommendations
        .iter()
        .filter(|r| r.triggered || r.error.is_some())
        .collect();
    if !triggered.is_empty() {
        output.push_str(&format!("\n{}\n", "Recommendations".bold()));
        for rec in triggered {
            match &rec.error {
                Some(err) => output.push_str(&format!(
                    "  {} {} {} - {}\n",
                    "ERR ".yellow(),
                    rec.recommendation_id,
                    rec.resource_name,
                    err
                )),
                None => output.push_str(&format!(
                    "  {} {} {} [{}] {}\n",
                    "FAIL".red(),
                    rec.recommendation_id,
                    rec.resource_name,
                    impact(rec.impact),
                    rec.recommendation
                )),
            }
        }
    }

    if !report.skipped.is_empty() {
        output.push_str(&format!("\n{}\n", "Skipped resources".bold()));
        for skipped in &report.skipped {
            output.push_str(&format!("  {}\n", skipped));
        }
    }

    if !report.failures.is_empty() {
        output.push_str(&format!("\n{}\n", "Failed reviews".bold().red()));
        for failure in &report.failures {
            output.push_str(&format!(
                "  {} in {}: {}\n",
                failure.service.display_name(),
                failure.resource_group,
                failure.error
            ));
        }
    }

    output.push_str(&format!(
        "\nReviewed {} resource(s), {} recommendation(s) triggered.\n",
        report.results.len(),
        report.triggered_count()
    ));

    output
}

/// Format catalogs as text tables.
pub fn format_catalogs(catalogs: &[ServiceCatalog]) -> String {
    let mut output = String::new();

    for catalog in catalogs {
        output.push_str(&format!("{} ({})\n", catalog.name.bold(), catalog.service));
        for rec in &catalog.recommendations {
            let kind = if rec.recommendation_type == crate::analyzer::RecommendationType::Sla {
                " (SLA)"
            } else {
                ""
            };
            output.push_str(&format!(
                "  {:<9} {:<24} {:<7} {}{}\n",
                rec.recommendation_id,
                rec.category.as_str(),
                rec.impact.as_str(),
                rec.recommendation,
                kind
            ));
            output.push_str(&format!("            {}\n", rec.learn_more_url.dimmed()));
        }
        output.push('\n');
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::{
        AzureServiceResult, Category, RecommendationResult, RecommendationType, ServiceKind,
    };

    fn report() -> ScanReport {
        ScanReport {
            results: vec![AzureServiceResult {
                subscription_id: "sub".into(),
                resource_group: "rg-hub".into(),
                service_name: "vpng-hub".into(),
                sku: "VpnGw1".into(),
                sla: "99.95%".into(),
                resource_type: "Microsoft.Network/virtualNetworkGateways".into(),
                availability_zones: false,
                private_endpoints: false,
                diagnostic_settings: true,
                caf_naming: true,
            }],
            recommendations: vec![RecommendationResult {
                subscription_id: "sub".into(),
                resource_group: "rg-hub".into(),
                resource_id: "/x/vpng-hub".into(),
                resource_name: "vpng-hub".into(),
                resource_type: "Microsoft.Network/virtualNetworkGateways".into(),
                recommendation_id: "vgw-005".into(),
                category: Category::HighAvailability,
                recommendation_type: RecommendationType::Default,
                impact: Impact::High,
                recommendation: "Virtual Network Gateway should have availability zones enabled"
                    .into(),
                learn_more_url: "https://example.com".into(),
                triggered: true,
                detail: String::new(),
                error: None,
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_report_lists_rows_and_triggered_rules() {
        let output = format_report(&report());
        assert!(output.contains("vpng-hub"));
        assert!(output.contains("99.95%"));
        assert!(output.contains("vgw-005"));
        assert!(output.contains("1 recommendation(s) triggered"));
    }

    #[test]
    fn test_empty_report() {
        let output = format_report(&ScanReport::default());
        assert!(output.contains("No resources found."));
        assert!(!output.contains("Failed reviews"));
    }

    #[test]
    fn test_catalog_marks_sla_rules() {
        let output = format_catalogs(&[ServiceCatalog::of(ServiceKind::Vgw)]);
        assert!(output.contains("vgw-004"));
        assert!(output.contains("(SLA)"));
    }
}
