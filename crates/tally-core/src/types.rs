//! # Domain Types
//!
//! The data model that flows through the invoice pipeline.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Pipeline Data Model                             │
//! │                                                                         │
//! │  serde_json::Value ──validate──► InvoiceDraft                          │
//! │                                   ├── Business                          │
//! │                                   ├── Client                            │
//! │                                   ├── Header                            │
//! │                                   └── Vec<LineItem>                     │
//! │                                        │                                │
//! │                                     compute                             │
//! │                                        ▼                                │
//! │                                   ComputedInvoice                       │
//! │                                   ├── InvoiceDraft (flattened)          │
//! │                                   └── Totals                            │
//! │                                        │                                │
//! │                                      format                             │
//! │                                        ▼                                │
//! │                                   FormattedInvoice (all Strings)        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Absence Conventions
//! - Draft / Computed: an absent optional field is `None` and is omitted when
//!   serialized, so a serialized draft is valid validator input again.
//! - Formatted: an absent optional field is `""`, so template interpolation
//!   never prints "undefined" or "null".

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;

// =============================================================================
// Draft (validated input)
// =============================================================================

/// The business issuing the invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Business {
    pub name: String,

    /// Multi-line postal address, lines separated by `\n`.
    pub address: String,

    pub email: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,

    /// VAT / sales-tax registration number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax_id: Option<String>,
}

/// The customer being billed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub name: String,
    pub address: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Invoice-level metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Header {
    /// Opaque, user-chosen invoice number ("2025-001", "INV/7", ...).
    pub invoice_number: String,

    #[ts(as = "String")]
    pub issue_date: NaiveDate,

    /// Never earlier than `issue_date`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(as = "Option<String>")]
    pub due_date: Option<NaiveDate>,

    /// Upper-case ISO 4217 code from the supported allow-list.
    pub currency: String,

    /// Tax rate as a fraction in `[0, 1]` (0.19 = 19%).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax_rate: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// A single billed line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub description: String,

    /// Always `> 0`.
    pub quantity: f64,

    /// Always `>= 0` (free lines are allowed).
    pub unit_price: f64,

    /// Unit label ("h", "pcs", "days").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

/// A fully validated invoice, ready for computation.
///
/// Only the validator produces drafts from untrusted input; partial drafts
/// do not exist. Downstream stages take it by reference and never mutate it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceDraft {
    pub business: Business,
    pub client: Client,
    pub header: Header,
    pub line_items: Vec<LineItem>,
}

// =============================================================================
// Computed
// =============================================================================

/// Derived financial totals. Full `f64` precision, never rounded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    /// One `quantity × unit_price` per line, same order as the line items.
    pub line_item_amounts: Vec<f64>,
    pub subtotal: f64,
    pub tax_amount: f64,
    pub total: f64,
}

/// A draft together with the totals derived from it.
///
/// Totals have no identity of their own: after editing `draft.line_items`
/// call [`crate::calc::recompute`] instead of adjusting them by hand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ComputedInvoice {
    #[serde(flatten)]
    pub draft: InvoiceDraft,
    pub totals: Totals,
}

// =============================================================================
// Formatted
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct FormattedBusiness {
    pub name: String,
    pub address: String,
    pub email: String,
    pub phone: String,
    pub logo_url: String,
    pub tax_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct FormattedClient {
    pub name: String,
    pub address: String,
    pub email: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct FormattedHeader {
    pub invoice_number: String,
    pub issue_date: String,
    pub due_date: String,
    pub currency: String,
    /// Integer percentage without the `%` sign ("19").
    pub tax_rate_display: String,
    pub notes: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct FormattedLineItem {
    pub description: String,
    pub quantity: String,
    pub unit: String,
    pub unit_price: String,
    pub amount: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct FormattedTotals {
    pub subtotal: String,
    pub tax_amount: String,
    pub total: String,
}

/// Display-ready invoice. Every value is a string; nothing here is ever fed
/// back into validation or computation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct FormattedInvoice {
    /// The locale tag the values were rendered for ("de-DE").
    pub locale: String,
    pub business: FormattedBusiness,
    pub client: FormattedClient,
    pub header: FormattedHeader,
    pub line_items: Vec<FormattedLineItem>,
    pub totals: FormattedTotals,
}

// =============================================================================
// Format Options
// =============================================================================

/// How verbose rendered dates are.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum DateStyle {
    /// Numeric: `01/15/2025`, `15.01.2025`.
    Short,
    /// Abbreviated month: `Jan 15, 2025`.
    #[default]
    Medium,
    /// Full month: `January 15, 2025`.
    Long,
}

/// How the currency is shown next to an amount.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum CurrencyDisplay {
    /// `€`, `$`, `CA$`.
    #[default]
    Symbol,
    /// `EUR`, `USD`.
    Code,
    /// `euros`, `US dollars`.
    Name,
}

/// Error returned when a [`DateStyle`] or [`CurrencyDisplay`] name is unknown.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} '{value}', expected one of: {expected}")]
pub struct ParseOptionError {
    pub kind: &'static str,
    pub value: String,
    pub expected: &'static str,
}

impl FromStr for DateStyle {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "short" => Ok(DateStyle::Short),
            "medium" => Ok(DateStyle::Medium),
            "long" => Ok(DateStyle::Long),
            _ => Err(ParseOptionError {
                kind: "date style",
                value: s.to_string(),
                expected: "short, medium, long",
            }),
        }
    }
}

impl FromStr for CurrencyDisplay {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "symbol" => Ok(CurrencyDisplay::Symbol),
            "code" => Ok(CurrencyDisplay::Code),
            "name" => Ok(CurrencyDisplay::Name),
            _ => Err(ParseOptionError {
                kind: "currency display",
                value: s.to_string(),
                expected: "symbol, code, name",
            }),
        }
    }
}

impl fmt::Display for DateStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DateStyle::Short => "short",
            DateStyle::Medium => "medium",
            DateStyle::Long => "long",
        })
    }
}

impl fmt::Display for CurrencyDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CurrencyDisplay::Symbol => "symbol",
            CurrencyDisplay::Code => "code",
            CurrencyDisplay::Name => "name",
        })
    }
}

/// Options for [`crate::format::format_invoice`]. Every field is
/// independently overridable; `None` means "use the default".
///
/// ## Defaults
/// - `locale`: derived from the invoice currency via [`crate::locale::get_locale`]
/// - `date_style`: [`DateStyle::Medium`]
/// - `currency_display`: [`CurrencyDisplay::Symbol`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct FormatOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_style: Option<DateStyle>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency_display: Option<CurrencyDisplay>,
}

impl FormatOptions {
    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = Some(locale.into());
        self
    }

    pub fn with_date_style(mut self, style: DateStyle) -> Self {
        self.date_style = Some(style);
        self
    }

    pub fn with_currency_display(mut self, display: CurrencyDisplay) -> Self {
        self.currency_display = Some(display);
        self
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_header() -> Header {
        Header {
            invoice_number: "2025-001".to_string(),
            issue_date: NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
            due_date: None,
            currency: "EUR".to_string(),
            tax_rate: Some(0.19),
            notes: None,
        }
    }

    #[test]
    fn test_header_serializes_camel_case_and_iso_dates() {
        let json = serde_json::to_value(sample_header()).unwrap();
        assert_eq!(json["invoiceNumber"], "2025-001");
        assert_eq!(json["issueDate"], "2025-01-15");
        assert_eq!(json["taxRate"], 0.19);
    }

    #[test]
    fn test_absent_optionals_are_omitted() {
        let json = serde_json::to_value(sample_header()).unwrap();
        let obj = json.as_object().unwrap();
        assert!(!obj.contains_key("dueDate"));
        assert!(!obj.contains_key("notes"));
    }

    #[test]
    fn test_date_style_from_str() {
        assert_eq!("short".parse::<DateStyle>().unwrap(), DateStyle::Short);
        assert_eq!(" LONG ".parse::<DateStyle>().unwrap(), DateStyle::Long);
        assert!("full".parse::<DateStyle>().is_err());
    }

    #[test]
    fn test_currency_display_from_str() {
        assert_eq!("Code".parse::<CurrencyDisplay>().unwrap(), CurrencyDisplay::Code);
        let err = "emoji".parse::<CurrencyDisplay>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "unknown currency display 'emoji', expected one of: symbol, code, name"
        );
    }

    #[test]
    fn test_defaults() {
        assert_eq!(DateStyle::default(), DateStyle::Medium);
        assert_eq!(CurrencyDisplay::default(), CurrencyDisplay::Symbol);
        assert_eq!(FormatOptions::default().locale, None);
    }

    #[test]
    fn test_format_options_builder() {
        let options = FormatOptions::default()
            .with_locale("en-GB")
            .with_date_style(DateStyle::Long)
            .with_currency_display(CurrencyDisplay::Name);
        assert_eq!(options.locale.as_deref(), Some("en-GB"));
        assert_eq!(options.date_style, Some(DateStyle::Long));
        assert_eq!(options.currency_display, Some(CurrencyDisplay::Name));
    }
}
