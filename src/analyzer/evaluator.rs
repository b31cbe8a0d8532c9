//! Applies a rule catalog to one resource.
//!
//! Every rule runs, and each produces exactly one [`Finding`]. A rule that
//! cannot evaluate the resource yields a finding holding the
//! [`RuleError`]; it never stops the remaining rules.

use super::catalog::RuleCatalog;
use super::context::ScanContext;
use super::types::{Evaluation, Recommendation, RecommendationResult, RuleError};

/// One rule evaluated against one resource.
#[derive(Debug)]
pub struct Finding<'c, T> {
    pub recommendation: &'c Recommendation<T>,
    pub outcome: Result<Evaluation, RuleError>,
}

impl<T> Finding<'_, T> {
    pub fn recommendation_id(&self) -> &'static str {
        self.recommendation.recommendation_id
    }

    /// `true` only when the rule evaluated and failed.
    pub fn is_triggered(&self) -> bool {
        matches!(&self.outcome, Ok(e) if e.triggered)
    }

    /// Evaluation detail, empty when the rule errored.
    pub fn detail(&self) -> &str {
        self.outcome
            .as_ref()
            .map(|e| e.detail.as_str())
            .unwrap_or_default()
    }

    pub fn error(&self) -> Option<&RuleError> {
        self.outcome.as_ref().err()
    }

    /// Flatten into a report row.
    pub fn to_result(&self, identity: &ResourceIdentity<'_>) -> RecommendationResult {
        let rec = self.recommendation;
        let (triggered, detail, error) = match &self.outcome {
            Ok(eval) => (eval.triggered, eval.detail.clone(), None),
            Err(err) => (
                false,
                String::new(),
                Some(format!(
                    "rule {} could not evaluate resource {}: {}",
                    rec.recommendation_id, identity.resource_name, err
                )),
            ),
        };
        RecommendationResult {
            subscription_id: identity.subscription_id.to_string(),
            resource_group: identity.resource_group.to_string(),
            resource_id: identity.resource_id.to_string(),
            resource_name: identity.resource_name.to_string(),
            resource_type: rec.resource_type.to_string(),
            recommendation_id: rec.recommendation_id.to_string(),
            category: rec.category,
            recommendation_type: rec.recommendation_type,
            impact: rec.impact,
            recommendation: rec.recommendation.to_string(),
            learn_more_url: rec.learn_more_url.to_string(),
            triggered,
            detail,
            error,
        }
    }
}

/// Where a resource lives, for flattening findings into rows.
#[derive(Debug, Clone, Copy)]
pub struct ResourceIdentity<'a> {
    pub subscription_id: &'a str,
    pub resource_group: &'a str,
    pub resource_id: &'a str,
    pub resource_name: &'a str,
}

/// Run every rule of `catalog` against `resource`.
///
/// Findings come back in unspecified order.
pub fn evaluate<'c, T>(
    resource: &T,
    catalog: &'c RuleCatalog<T>,
    ctx: &ScanContext,
) -> Vec<Finding<'c, T>> {
    catalog
        .recommendations()
        .map(|recommendation| {
            let outcome = recommendation.evaluate(resource, ctx);
            if let Err(err) = &outcome {
                log::debug!(
                    "Rule {} could not evaluate resource: {}",
                    recommendation.recommendation_id,
                    err
                );
            }
            Finding {
                recommendation,
                outcome,
            }
        })
        .collect()
}

/// Find the finding produced by rule `id`.
pub fn finding<'f, 'c, T>(findings: &'f [Finding<'c, T>], id: &str) -> Option<&'f Finding<'c, T>> {
    findings.iter().find(|f| f.recommendation_id() == id)
}
