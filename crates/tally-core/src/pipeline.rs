//! # Pipeline
//!
//! Validate → compute → format, as one call.
//!
//! ```text
//! ┌──────────┐   ┌────────────┐   ┌───────────┐   ┌──────────────┐
//! │ raw JSON │──►│  validate  │──►│  compute  │──►│    format    │──► Processed
//! └──────────┘   └─────┬──────┘   └───────────┘   └──────────────┘
//!                      │ issues
//!                      ▼
//!              Err(ValidationErrors)   (compute and format never run)
//! ```
//!
//! Adapters that only speak JSON wrap the result in a [`ProcessReport`].

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;
use ts_rs::TS;

use crate::calc;
use crate::error::{Issue, ValidationErrors};
use crate::format::format_invoice;
use crate::types::{ComputedInvoice, FormatOptions, FormattedInvoice, InvoiceDraft};
use crate::validation::{validate_with, ValidateOptions};

/// Output of a successful pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Processed {
    /// Display strings, ready for a template.
    pub invoice: FormattedInvoice,
    /// The numeric form, for anything that needs to recompute.
    pub computed: ComputedInvoice,
}

/// Runs the full pipeline with default validation options.
pub fn process(raw: &Value, options: &FormatOptions) -> Result<Processed, ValidationErrors> {
    process_with(raw, &ValidateOptions::default(), options)
}

/// Runs the full pipeline.
///
/// Stops at validation when there is any issue; nothing is computed or
/// formatted for invalid input.
pub fn process_with(
    raw: &Value,
    validate_options: &ValidateOptions,
    format_options: &FormatOptions,
) -> Result<Processed, ValidationErrors> {
    let draft = validate_with(raw, validate_options).map_err(|errors| {
        debug!(issues = errors.len(), "Pipeline stopped at validation");
        errors
    })?;
    Ok(process_draft(&draft, format_options))
}

/// Computes and formats an already validated draft.
pub fn process_draft(draft: &InvoiceDraft, options: &FormatOptions) -> Processed {
    let computed = calc::compute(draft);
    let invoice = format_invoice(&computed, options);
    debug!(
        invoice_number = %draft.header.invoice_number,
        lines = draft.line_items.len(),
        locale = %invoice.locale,
        "Pipeline finished"
    );
    Processed { invoice, computed }
}

// =============================================================================
// Report
// =============================================================================

/// JSON view of a pipeline result.
///
/// ```text
/// success: { "ok": true,  "invoice": {...}, "computed": {...} }
/// failure: { "ok": false, "issues": [ { "code", "path", "message", "hint"? } ] }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessReport {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoice: Option<FormattedInvoice>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub computed: Option<ComputedInvoice>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issues: Option<Vec<Issue>>,
}

impl From<Result<Processed, ValidationErrors>> for ProcessReport {
    fn from(result: Result<Processed, ValidationErrors>) -> Self {
        match result {
            Ok(processed) => ProcessReport::from(processed),
            Err(errors) => ProcessReport::from(errors),
        }
    }
}

impl From<Processed> for ProcessReport {
    fn from(Processed { invoice, computed }: Processed) -> Self {
        ProcessReport {
            ok: true,
            invoice: Some(invoice),
            computed: Some(computed),
            issues: None,
        }
    }
}

impl From<ValidationErrors> for ProcessReport {
    fn from(errors: ValidationErrors) -> Self {
        ProcessReport {
            ok: false,
            invoice: None,
            computed: None,
            issues: Some(errors.into_issues()),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
