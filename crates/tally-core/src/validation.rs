//! # Validation Module
//!
//! Turns untyped input into an [`InvoiceDraft`], or a complete list of
//! [`Issue`]s explaining why it can't.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Where Input Comes From                             │
//! │                                                                         │
//! │  JSON file / HTTP body ──┐                                              │
//! │  Spreadsheet cells ──────┼──► serde_json::Value ──► validate()          │
//! │  Web form ───────────────┘                              │               │
//! │                                                         ├── Ok(draft)   │
//! │                                                         └── Err(issues) │
//! │                                                                         │
//! │  EXHAUSTIVE: every field of every group is checked, so the user can    │
//! │  fix all problems in one pass. Only a non-object top level stops       │
//! │  validation early (nothing else can be checked).                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Leniency for Spreadsheet Input
//! Sheet cells often arrive as text, so numeric fields accept numeric strings
//! (`"2"`, `" 19.5 "`) and then go through the same sign/range checks as real
//! numbers. Blank strings count as missing.
//!
//! ## Usage
//! ```rust
//! use serde_json::json;
//! use tally_core::validation::validate;
//! use tally_core::IssueCode;
//!
//! let errors = validate(&json!({
//!     "business": { "name": "Acme", "address": "1 Road", "email": "a@acme.test" },
//!     "client": { "name": "Bob", "address": "2 Street" },
//!     "header": { "invoiceNumber": "1", "issueDate": "2025-01-15", "currency": "USD" },
//!     "lineItems": []
//! }))
//! .unwrap_err();
//!
//! assert_eq!(errors.issues()[0].code, IssueCode::EmptyArray);
//! assert_eq!(errors.issues()[0].path, "lineItems");
//! ```

use chrono::{Datelike, NaiveDate};
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{Issue, IssueCode, ValidationErrors};
use crate::locale;
use crate::types::{Business, Client, Header, InvoiceDraft, LineItem};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationErrors>;

type Object = Map<String, Value>;

// =============================================================================
// Options
// =============================================================================

/// Knobs for [`validate_with`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidateOptions {
    /// Maximum number of line items. `None` leaves the cap to the caller
    /// (sheet readers enforce [`crate::MAX_LINE_ITEMS`] themselves).
    pub max_line_items: Option<usize>,
}

impl ValidateOptions {
    /// Options enforcing the standard [`crate::MAX_LINE_ITEMS`] cap.
    pub fn capped() -> Self {
        ValidateOptions {
            max_line_items: Some(crate::MAX_LINE_ITEMS),
        }
    }
}

// =============================================================================
// Entry Points
// =============================================================================

/// Validates raw input with default options (no line-item cap).
pub fn validate(raw: &Value) -> ValidationResult<InvoiceDraft> {
    validate_with(raw, &ValidateOptions::default())
}

/// Validates raw input.
///
/// ## Returns
/// - `Ok(draft)` when there are zero issues and all four groups
///   (`business`, `client`, `header`, `lineItems`) produced a value
/// - `Err(errors)` with every issue found, in document order
pub fn validate_with(raw: &Value, options: &ValidateOptions) -> ValidationResult<InvoiceDraft> {
    let Some(root) = raw.as_object() else {
        debug!("Rejected non-object invoice input");
        return Err(ValidationErrors::new(vec![Issue::new(
            IssueCode::InvalidType,
            "",
            "Invoice data must be an object",
        )
        .with_hint("Expected { business, client, header, lineItems }")]));
    };

    let mut v = Validator::default();

    let business = v.group(root, "business", "Business").and_then(|obj| v.business(obj));
    let client = v.group(root, "client", "Client").and_then(|obj| v.client(obj));
    let header = v.group(root, "header", "Header").and_then(|obj| v.header(obj));
    let line_items = v.line_items(root.get("lineItems"), options);

    match (business, client, header, line_items) {
        (Some(business), Some(client), Some(header), Some(line_items)) if v.issues.is_empty() => {
            debug!(lines = line_items.len(), "Invoice input validated");
            Ok(InvoiceDraft {
                business,
                client,
                header,
                line_items,
            })
        }
        _ => {
            debug!(issues = v.issues.len(), "Invoice input failed validation");
            Err(ValidationErrors::new(v.issues))
        }
    }
}

// =============================================================================
// Dates
// =============================================================================

/// Why a string is not an acceptable ISO date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateParseError {
    /// Not shaped like `YYYY-MM-DD`.
    Format,
    /// Shaped right, but no such day (`2025-02-30`, `2025-13-01`).
    Calendar,
}

/// Strict `YYYY-MM-DD` parser.
///
/// Exactly ten characters, zero-padded. The components must name a real day:
/// unlike lenient date libraries, February 30th is rejected instead of
/// rolling into March.
///
/// ## Example
/// ```rust
/// use tally_core::validation::{parse_iso_date, DateParseError};
///
/// assert!(parse_iso_date("2024-02-29").is_ok());
/// assert_eq!(parse_iso_date("2025-02-30"), Err(DateParseError::Calendar));
/// assert_eq!(parse_iso_date("2025-2-3"), Err(DateParseError::Format));
/// ```
pub fn parse_iso_date(s: &str) -> Result<NaiveDate, DateParseError> {
    let bytes = s.as_bytes();
    let shaped = bytes.len() == 10
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit());
    if !shaped {
        return Err(DateParseError::Format);
    }

    let year: i32 = s[0..4].parse().map_err(|_| DateParseError::Format)?;
    let month: u32 = s[5..7].parse().map_err(|_| DateParseError::Format)?;
    let day: u32 = s[8..10].parse().map_err(|_| DateParseError::Format)?;

    NaiveDate::from_ymd_opt(year, month, day)
        .filter(|d| d.year() == year && d.month() == month && d.day() == day)
        .ok_or(DateParseError::Calendar)
}

/// Converts a native date into the value form the validator accepts.
///
/// Adapters holding real date values (spreadsheet date cells, form date
/// pickers) put them into the input through this.
pub fn date_value(date: NaiveDate) -> Value {
    Value::String(date.format("%Y-%m-%d").to_string())
}

// =============================================================================
// Field Rules
// =============================================================================

/// Sign and range constraints for a numeric field.
#[derive(Debug, Clone, Copy)]
struct NumberRule {
    allow_negative: bool,
    allow_zero: bool,
    min: Option<f64>,
    max: Option<f64>,
}

const QUANTITY: NumberRule = NumberRule {
    allow_negative: false,
    allow_zero: false,
    min: None,
    max: None,
};

const UNIT_PRICE: NumberRule = NumberRule {
    allow_negative: false,
    allow_zero: true,
    min: None,
    max: None,
};

const TAX_RATE: NumberRule = NumberRule {
    allow_negative: false,
    allow_zero: true,
    min: Some(0.0),
    max: Some(1.0),
};

/// A raw value seen through numeric eyes.
enum NumberInput {
    Missing,
    Number(f64),
    NotANumber,
}

fn coerce_number(value: Option<&Value>) -> NumberInput {
    match value {
        None | Some(Value::Null) => NumberInput::Missing,
        Some(Value::Number(n)) => match n.as_f64() {
            Some(f) if f.is_finite() => NumberInput::Number(f),
            _ => NumberInput::NotANumber,
        },
        Some(Value::String(s)) => {
            let s = s.trim();
            if s.is_empty() {
                return NumberInput::Missing;
            }
            match s.parse::<f64>() {
                Ok(f) if f.is_finite() => NumberInput::Number(f),
                _ => NumberInput::NotANumber,
            }
        }
        Some(_) => NumberInput::NotANumber,
    }
}

fn join(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{parent}.{key}")
    }
}

// =============================================================================
// Validator
// =============================================================================

/// Accumulates issues while walking the input.
///
/// Every rule records its own issues and returns `None` on failure, so a
/// failing field never stops the walk.
#[derive(Default)]
struct Validator {
    issues: Vec<Issue>,
}

impl Validator {
    fn push(&mut self, code: IssueCode, path: impl Into<String>, message: impl Into<String>) {
        self.issues.push(Issue::new(code, path, message));
    }

    fn push_hinted(
        &mut self,
        code: IssueCode,
        path: impl Into<String>,
        message: impl Into<String>,
        hint: impl Into<String>,
    ) {
        self.issues.push(Issue::new(code, path, message).with_hint(hint));
    }

    // -------------------------------------------------------------------------
    // Groups
    // -------------------------------------------------------------------------

    fn group<'v>(&mut self, root: &'v Object, key: &str, label: &str) -> Option<&'v Object> {
        match root.get(key) {
            None | Some(Value::Null) => {
                self.push(IssueCode::MissingRequired, key, format!("{label} section is required"));
                None
            }
            Some(Value::Object(obj)) => Some(obj),
            Some(_) => {
                self.push(IssueCode::InvalidType, key, format!("{label} section must be an object"));
                None
            }
        }
    }

    fn business(&mut self, obj: &Object) -> Option<Business> {
        let before = self.issues.len();
        let name = self.required_string(obj, "business", "name", "Business name");
        let address = self.required_string(obj, "business", "address", "Business address");
        let email = self.required_string(obj, "business", "email", "Business email");
        let phone = self.optional_string(obj, "business", "phone", "Business phone");
        let logo_url = self.optional_string(obj, "business", "logoUrl", "Logo URL");
        let tax_id = self.optional_string(obj, "business", "taxId", "Tax ID");

        if self.issues.len() > before {
            return None;
        }
        Some(Business {
            name: name?,
            address: address?,
            email: email?,
            phone,
            logo_url,
            tax_id,
        })
    }

    fn client(&mut self, obj: &Object) -> Option<Client> {
        let before = self.issues.len();
        let name = self.required_string(obj, "client", "name", "Client name");
        let address = self.required_string(obj, "client", "address", "Client address");
        let email = self.optional_string(obj, "client", "email", "Client email");

        if self.issues.len() > before {
            return None;
        }
        Some(Client {
            name: name?,
            address: address?,
            email,
        })
    }

    fn header(&mut self, obj: &Object) -> Option<Header> {
        let before = self.issues.len();
        let invoice_number =
            self.required_string(obj, "header", "invoiceNumber", "Invoice number");
        let issue_date = self.date(obj, "header", "issueDate", "Issue date", true);
        let due_date = self.date(obj, "header", "dueDate", "Due date", false);
        let currency = self.currency(obj, "header");
        let tax_rate = self.optional_number(obj, "header", "taxRate", "Tax rate", TAX_RATE);
        let notes = self.optional_string(obj, "header", "notes", "Notes");

        // Same-day due dates are fine.
        if let (Some(issue), Some(due)) = (issue_date, due_date) {
            if due < issue {
                self.push_hinted(
                    IssueCode::DateOrder,
                    "header.dueDate",
                    "Due date cannot be before the issue date",
                    format!("Use {issue} or later"),
                );
            }
        }

        if self.issues.len() > before {
            return None;
        }
        Some(Header {
            invoice_number: invoice_number?,
            issue_date: issue_date?,
            due_date,
            currency: currency?,
            tax_rate,
            notes,
        })
    }

    fn line_items(
        &mut self,
        value: Option<&Value>,
        options: &ValidateOptions,
    ) -> Option<Vec<LineItem>> {
        let items = match value {
            None | Some(Value::Null) => {
                self.push(IssueCode::MissingRequired, "lineItems", "Line items are required");
                return None;
            }
            Some(Value::Array(items)) => items,
            Some(_) => {
                self.push(IssueCode::InvalidType, "lineItems", "Line items must be a list");
                return None;
            }
        };

        if items.is_empty() {
            self.push_hinted(
                IssueCode::EmptyArray,
                "lineItems",
                "At least one line item is required",
                "Add a line with a description, quantity and unit price",
            );
            return None;
        }

        let before = self.issues.len();

        if let Some(max) = options.max_line_items {
            if items.len() > max {
                self.push_hinted(
                    IssueCode::InvalidValue,
                    "lineItems",
                    format!("Too many line items: {} (maximum {max})", items.len()),
                    "Split the work across several invoices",
                );
            }
        }

        // Keep going after a bad item: later items still get their issues reported.
        let mut out = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            if let Some(line) = self.line_item(item, index) {
                out.push(line);
            }
        }

        if self.issues.len() > before {
            None
        } else {
            Some(out)
        }
    }

    fn line_item(&mut self, value: &Value, index: usize) -> Option<LineItem> {
        let path = format!("lineItems[{index}]");
        let n = index + 1;

        let Some(obj) = value.as_object() else {
            self.push(IssueCode::InvalidType, path, format!("Line item {n} must be an object"));
            return None;
        };

        let before = self.issues.len();
        let description =
            self.required_string(obj, &path, "description", &format!("Line item {n} description"));
        let quantity = self.required_number(
            obj,
            &path,
            "quantity",
            &format!("Line item {n} quantity"),
            QUANTITY,
        );
        let unit_price = self.required_number(
            obj,
            &path,
            "unitPrice",
            &format!("Line item {n} unit price"),
            UNIT_PRICE,
        );
        let unit = self.optional_string(obj, &path, "unit", &format!("Line item {n} unit"));

        if self.issues.len() > before {
            return None;
        }
        Some(LineItem {
            description: description?,
            quantity: quantity?,
            unit_price: unit_price?,
            unit,
        })
    }

    // -------------------------------------------------------------------------
    // Strings
    // -------------------------------------------------------------------------

    fn required_string(
        &mut self,
        obj: &Object,
        parent: &str,
        key: &str,
        label: &str,
    ) -> Option<String> {
        let path = join(parent, key);
        match obj.get(key) {
            None | Some(Value::Null) => {
                self.push(IssueCode::MissingRequired, path, format!("{label} is required"));
                None
            }
            Some(Value::String(s)) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    self.push(IssueCode::MissingRequired, path, format!("{label} is required"));
                    None
                } else {
                    Some(trimmed.to_string())
                }
            }
            Some(_) => {
                self.push(IssueCode::InvalidType, path, format!("{label} must be text"));
                None
            }
        }
    }

    /// Missing, null and blank are all "absent"; only a wrong type is an issue.
    fn optional_string(
        &mut self,
        obj: &Object,
        parent: &str,
        key: &str,
        label: &str,
    ) -> Option<String> {
        match obj.get(key) {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => {
                let trimmed = s.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            }
            Some(_) => {
                self.push(IssueCode::InvalidType, join(parent, key), format!("{label} must be text"));
                None
            }
        }
    }

    // -------------------------------------------------------------------------
    // Numbers
    // -------------------------------------------------------------------------

    fn required_number(
        &mut self,
        obj: &Object,
        parent: &str,
        key: &str,
        label: &str,
        rule: NumberRule,
    ) -> Option<f64> {
        let path = join(parent, key);
        match coerce_number(obj.get(key)) {
            NumberInput::Missing => {
                self.push(IssueCode::MissingRequired, path, format!("{label} is required"));
                None
            }
            NumberInput::NotANumber => {
                self.push(IssueCode::InvalidType, path, format!("{label} must be a number"));
                None
            }
            NumberInput::Number(n) => self.check_number(n, path, label, rule),
        }
    }

    fn optional_number(
        &mut self,
        obj: &Object,
        parent: &str,
        key: &str,
        label: &str,
        rule: NumberRule,
    ) -> Option<f64> {
        let path = join(parent, key);
        match coerce_number(obj.get(key)) {
            NumberInput::Missing => None,
            NumberInput::NotANumber => {
                self.push(IssueCode::InvalidType, path, format!("{label} must be a number"));
                None
            }
            NumberInput::Number(n) => self.check_number(n, path, label, rule),
        }
    }

    fn check_number(&mut self, n: f64, path: String, label: &str, rule: NumberRule) -> Option<f64> {
        if !rule.allow_negative && n < 0.0 {
            self.push(IssueCode::NegativeNumber, path, format!("{label} cannot be negative"));
            return None;
        }
        if !rule.allow_zero && n == 0.0 {
            self.push(IssueCode::InvalidValue, path, format!("{label} must be greater than zero"));
            return None;
        }

        let below = rule.min.is_some_and(|min| n < min);
        let above = rule.max.is_some_and(|max| n > max);
        if below || above {
            let min = rule.min.map_or_else(|| "-∞".to_string(), |m| m.to_string());
            let max = rule.max.map_or_else(|| "∞".to_string(), |m| m.to_string());
            self.push_hinted(
                IssueCode::InvalidValue,
                path,
                format!("{label} must be between {min} and {max}"),
                "Use a decimal fraction, e.g. 0.19 for 19%",
            );
            return None;
        }

        // "-0" passes the sign check; store it as 0.
        Some(n + 0.0)
    }

    // -------------------------------------------------------------------------
    // Dates & Currency
    // -------------------------------------------------------------------------

    fn date(
        &mut self,
        obj: &Object,
        parent: &str,
        key: &str,
        label: &str,
        required: bool,
    ) -> Option<NaiveDate> {
        let path = join(parent, key);
        let raw = match obj.get(key) {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s.trim()).filter(|s| !s.is_empty()),
            Some(_) => {
                self.push_hinted(
                    IssueCode::InvalidType,
                    path,
                    format!("{label} must be a date"),
                    "Use the YYYY-MM-DD format, e.g. 2025-01-31",
                );
                return None;
            }
        };

        let Some(raw) = raw else {
            if required {
                self.push(IssueCode::MissingRequired, path, format!("{label} is required"));
            }
            return None;
        };

        match parse_iso_date(raw) {
            Ok(date) => Some(date),
            Err(DateParseError::Format) => {
                self.push_hinted(
                    IssueCode::InvalidFormat,
                    path,
                    format!("{label} must use the YYYY-MM-DD format"),
                    "e.g. 2025-01-31",
                );
                None
            }
            Err(DateParseError::Calendar) => {
                self.push(
                    IssueCode::InvalidDate,
                    path,
                    format!("{label} '{raw}' is not a real calendar date"),
                );
                None
            }
        }
    }

    fn currency(&mut self, obj: &Object, parent: &str) -> Option<String> {
        let path = join(parent, "currency");
        match obj.get("currency") {
            None | Some(Value::Null) => {
                self.push(IssueCode::MissingRequired, path, "Currency is required");
                None
            }
            Some(Value::String(s)) => {
                let code = s.trim();
                if code.is_empty() {
                    self.push(IssueCode::MissingRequired, path, "Currency is required");
                    return None;
                }
                match locale::currency(code) {
                    Some(info) => Some(info.code.to_string()),
                    None => {
                        let examples: Vec<&str> = locale::supported_currencies().take(4).collect();
                        self.push_hinted(
                            IssueCode::InvalidValue,
                            path,
                            format!("Currency '{code}' is not supported"),
                            format!("Use an ISO 4217 code such as {}", examples.join(", ")),
                        );
                        None
                    }
                }
            }
            Some(_) => {
                self.push(IssueCode::InvalidType, path, "Currency must be text");
                None
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
