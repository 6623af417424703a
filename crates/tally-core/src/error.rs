//! # Error Types
//!
//! Validation issues and the error that carries them.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  tally-core errors (this file)                                         │
//! │  ├── IssueCode         - Closed, machine-readable failure taxonomy     │
//! │  ├── Issue             - One failure: code + path + message + hint     │
//! │  └── ValidationErrors  - Every issue found in one validation pass      │
//! │                                                                         │
//! │  CLI errors (apps/cli)                                                 │
//! │  └── ConfigError       - Bad environment configuration                 │
//! │                                                                         │
//! │  Flow: Issue* → ValidationErrors → adapter (cell locator, JSON, text)  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Validation failure is a normal outcome: returned as data, never panics
//! 3. `path` is stable and deterministic so adapters can map it back to a
//!    spreadsheet cell or form field
//! 4. Compute and format have no error path at all

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;

// =============================================================================
// Issue Code
// =============================================================================

/// Machine-readable validation failure code.
///
/// Serialized in SCREAMING_SNAKE_CASE (`"MISSING_REQUIRED"`), which is the
/// form adapters switch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueCode {
    /// Field missing, null, or blank after trimming.
    MissingRequired,
    /// Wrong JSON type (object expected, got array; number expected, got bool).
    InvalidType,
    /// A date string that is not `YYYY-MM-DD`.
    InvalidFormat,
    /// Well-typed but not acceptable (unknown currency, zero quantity, out of range).
    InvalidValue,
    /// `YYYY-MM-DD` shaped but not a real calendar date (`2025-02-30`).
    InvalidDate,
    /// Due date earlier than issue date.
    DateOrder,
    /// `lineItems` is an empty array.
    EmptyArray,
    /// A negative number where only non-negative values are allowed.
    NegativeNumber,
    /// Reserved catch-all; no current rule emits it.
    Unknown,
}

impl IssueCode {
    /// The wire form of the code.
    pub const fn as_str(&self) -> &'static str {
        match self {
            IssueCode::MissingRequired => "MISSING_REQUIRED",
            IssueCode::InvalidType => "INVALID_TYPE",
            IssueCode::InvalidFormat => "INVALID_FORMAT",
            IssueCode::InvalidValue => "INVALID_VALUE",
            IssueCode::InvalidDate => "INVALID_DATE",
            IssueCode::DateOrder => "DATE_ORDER",
            IssueCode::EmptyArray => "EMPTY_ARRAY",
            IssueCode::NegativeNumber => "NEGATIVE_NUMBER",
            IssueCode::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for IssueCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Issue
// =============================================================================

/// A single validation failure.
///
/// ## Paths
/// `path` addresses one field of the draft schema using dots for object
/// keys and brackets for array indices:
/// ```text
/// ""                       top-level input is not an object
/// "business.email"         group field
/// "lineItems"              the array itself (empty, wrong type, too long)
/// "lineItems[2].unitPrice" field of the third line item
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize, TS)]
#[ts(export)]
#[error("{path}: {message}")]
pub struct Issue {
    pub code: IssueCode,
    pub path: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl Issue {
    pub fn new(code: IssueCode, path: impl Into<String>, message: impl Into<String>) -> Self {
        Issue {
            code,
            path: path.into(),
            message: message.into(),
            hint: None,
        }
    }

    /// Attaches a hint telling the user how to fix the value.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Every issue found while validating one input.
///
/// Never empty when produced by the validator.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(transparent)]
#[error("invoice failed validation with {} issue(s)", .0.len())]
pub struct ValidationErrors(Vec<Issue>);

impl ValidationErrors {
    pub fn new(issues: Vec<Issue>) -> Self {
        ValidationErrors(issues)
    }

    pub fn issues(&self) -> &[Issue] {
        &self.0
    }

    pub fn into_issues(self) -> Vec<Issue> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// First issue reported at exactly `path`.
    pub fn find(&self, path: &str) -> Option<&Issue> {
        self.0.iter().find(|issue| issue.path == path)
    }

    /// Whether any issue carries `code`.
    pub fn has_code(&self, code: IssueCode) -> bool {
        self.0.iter().any(|issue| issue.code == code)
    }
}

impl IntoIterator for ValidationErrors {
    type Item = Issue;
    type IntoIter = std::vec::IntoIter<Issue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = &'a Issue;
    type IntoIter = std::slice::Iter<'a, Issue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_display() {
        let issue = Issue::new(
            IssueCode::MissingRequired,
            "header.invoiceNumber",
            "Invoice number is required",
        );
        assert_eq!(
            issue.to_string(),
            "header.invoiceNumber: Invoice number is required"
        );
    }

    #[test]
    fn test_issue_code_wire_form() {
        let json = serde_json::to_value(IssueCode::NegativeNumber).unwrap();
        assert_eq!(json, "NEGATIVE_NUMBER");
        assert_eq!(IssueCode::DateOrder.to_string(), "DATE_ORDER");
    }

    #[test]
    fn test_issue_serialization_omits_missing_hint() {
        let issue = Issue::new(IssueCode::EmptyArray, "lineItems", "At least one line item is required");
        let json = serde_json::to_value(&issue).unwrap();
        assert_eq!(json["code"], "EMPTY_ARRAY");
        assert!(json.get("hint").is_none());

        let hinted = issue.with_hint("Add a line item");
        let json = serde_json::to_value(&hinted).unwrap();
        assert_eq!(json["hint"], "Add a line item");
    }

    #[test]
    fn test_validation_errors_lookup() {
        let errors = ValidationErrors::new(vec![
            Issue::new(IssueCode::MissingRequired, "business.name", "Business name is required"),
            Issue::new(IssueCode::InvalidDate, "header.issueDate", "Issue date is not a real date"),
        ]);
        assert_eq!(errors.len(), 2);
        assert_eq!(errors.to_string(), "invoice failed validation with 2 issue(s)");
        assert_eq!(
            errors.find("header.issueDate").map(|i| i.code),
            Some(IssueCode::InvalidDate)
        );
        assert!(errors.has_code(IssueCode::MissingRequired));
        assert!(!errors.has_code(IssueCode::Unknown));
    }

    #[test]
    fn test_validation_errors_serialize_as_list() {
        let errors = ValidationErrors::new(vec![Issue::new(
            IssueCode::InvalidType,
            "",
            "Invoice must be an object",
        )]);
        let json = serde_json::to_value(&errors).unwrap();
        assert!(json.is_array());
        assert_eq!(json[0]["path"], "");
    }
}
