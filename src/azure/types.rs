//! Wire types shared by every management API list call
//!
//! These mirror the ARM REST envelopes: list pages with a `nextLink`
//! continuation and the `{ "error": { "code", "message" } }` error body.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One page of a list response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// Items on this page
    #[serde(default = "Vec::new")]
    pub value: Vec<T>,
    /// Absolute URL of the next page, absent on the last page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_link: Option<String>,
}

impl<T> Page<T> {
    /// A final page holding `value`.
    pub fn last(value: Vec<T>) -> Self {
        Self {
            value,
            next_link: None,
        }
    }

    /// A page followed by another one at `next_link`.
    pub fn with_next(value: Vec<T>, next_link: impl Into<String>) -> Self {
        Self {
            value,
            next_link: Some(next_link.into()),
        }
    }

    /// Whether another page follows. Empty links count as the end.
    pub fn has_next(&self) -> bool {
        self.next_link.as_deref().is_some_and(|l| !l.is_empty())
    }
}

/// ARM error envelope
#[derive(Debug, Clone, Deserialize)]
pub struct ArmErrorResponse {
    pub error: Option<ArmErrorBody>,
}

/// Inner ARM error body
#[derive(Debug, Clone, Deserialize)]
pub struct ArmErrorBody {
    pub code: Option<String>,
    pub message: Option<String>,
}

impl ArmErrorResponse {
    /// Error code, or `Unknown` when the body carries none
    pub fn get_code(&self) -> String {
        self.error
            .as_ref()
            .and_then(|e| e.code.clone())
            .unwrap_or_else(|| "Unknown".to_string())
    }

    /// Error message, or `Unknown error` when the body carries none
    pub fn get_message(&self) -> String {
        self.error
            .as_ref()
            .and_then(|e| e.message.clone())
            .unwrap_or_else(|| "Unknown error".to_string())
    }
}

/// Resource group as returned by `GET /subscriptions/{id}/resourcegroups`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceGroup {
    pub id: Option<String>,
    pub name: Option<String>,
    pub location: Option<String>,
    #[serde(default)]
    pub tags: HashMap<String, String>,
}
