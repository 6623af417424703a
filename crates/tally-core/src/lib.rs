//! # tally-core: Pure Invoice Logic for Tally
//!
//! This crate is the **heart** of Tally. It turns loosely-typed invoice input
//! (JSON documents, spreadsheet rows, form posts) into a validated draft,
//! computes its totals and renders locale-correct display strings, all as
//! pure functions with zero I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Tally Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              Adapters (CLI, sheet readers, web forms)           │   │
//! │  │    read input ──► serde_json::Value        issues ──► cells     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ tally-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │validation │─►│   calc    │─►│  format   │  │  locale   │  │   │
//! │  │   │  Issues   │  │  Totals   │  │ Formatted │◄─│  tables   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │              pipeline: validate → compute → format             │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO FILES • NO NETWORK • PURE FUNCTIONS              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │         Templates / document renderers (outside this crate)     │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Draft, computed and formatted invoice types
//! - [`error`] - Issue codes and the validation error
//! - [`validation`] - Raw input → `InvoiceDraft`, collecting every issue
//! - [`calc`] - Line amounts and totals
//! - [`locale`] - Currency and locale lookup tables
//! - [`format`] - Display strings
//! - [`pipeline`] - All three stages in one call
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same input, same output, bit for bit
//! 2. **No I/O**: reading files or sheets is the adapter's job
//! 3. **Failures Are Data**: invalid input yields a list of issues, never a panic
//! 4. **Round Late**: amounts stay unrounded `f64` until they are formatted
//!
//! ## Example Usage
//!
//! ```rust
//! use serde_json::json;
//! use tally_core::{pipeline, FormatOptions};
//!
//! let raw = json!({
//!     "business": { "name": "Acme", "address": "1 Road", "email": "a@acme.test" },
//!     "client": { "name": "Bob", "address": "2 Street" },
//!     "header": { "invoiceNumber": "42", "issueDate": "2025-01-15", "currency": "USD" },
//!     "lineItems": [{ "description": "Design", "quantity": 3, "unitPrice": 400 }]
//! });
//!
//! let processed = pipeline::process(&raw, &FormatOptions::default()).unwrap();
//! assert_eq!(processed.invoice.totals.total, "$1,200.00");
//! assert_eq!(processed.invoice.header.issue_date, "Jan 15, 2025");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod calc;
pub mod error;
pub mod format;
pub mod locale;
pub mod pipeline;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use tally_core::Issue` instead of
// `use tally_core::error::Issue`

pub use calc::{compute, recompute};
pub use error::{Issue, IssueCode, ValidationErrors};
pub use format::format_invoice;
pub use locale::{get_locale, is_supported_currency};
pub use pipeline::{process, process_draft, process_with, ProcessReport, Processed};
pub use types::*;
pub use validation::{validate, validate_with, ValidateOptions};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum line items on one invoice, for adapters that enforce a cap.
///
/// ## Business Reason
/// A sheet-based template only has so many rows. The validator applies it
/// only when asked through [`ValidateOptions::max_line_items`].
pub const MAX_LINE_ITEMS: usize = 100;
