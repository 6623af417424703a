//! # Formatter
//!
//! Renders a [`ComputedInvoice`] into display strings following the
//! conventions of one locale.
//!
//! ## Rendering Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Field                          Rendering                              │
//! │  ─────────────────────────────  ─────────────────────────────────────  │
//! │  unit price, amounts, totals    currency, exactly 2 decimals           │
//! │  quantity                       plain number, 0 to 2 decimals          │
//! │  issue / due date               date pattern for the chosen style      │
//! │  tax rate                       whole percent, no sign ("19")          │
//! │  absent optional                ""                                     │
//! │                                                                         │
//! │  Rounding: half away from zero, on the shortest decimal.               │
//! │  A value that rounds to zero never shows a minus sign.                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The locale defaults to the currency's primary market
//! ([`locale::get_locale`]), so an EUR invoice reads `4.734,50 €`
//! unless the caller asks for something else.

use chrono::{Datelike, NaiveDate};
use tracing::debug;

use crate::locale::{self, CurrencyPlacement, Grouping, LocaleData, NBSP};
use crate::types::{
    ComputedInvoice, CurrencyDisplay, DateStyle, FormatOptions, FormattedBusiness,
    FormattedClient, FormattedHeader, FormattedInvoice, FormattedLineItem, FormattedTotals,
};
use crate::validation::parse_iso_date;

// =============================================================================
// Invoice
// =============================================================================

/// Formats every field of a computed invoice.
///
/// Pure: the same invoice and options always give identical strings.
pub fn format_invoice(computed: &ComputedInvoice, options: &FormatOptions) -> FormattedInvoice {
    let draft = &computed.draft;
    let header = &draft.header;
    let totals = &computed.totals;

    let tag = options
        .locale
        .as_deref()
        .unwrap_or_else(|| locale::get_locale(&header.currency));
    let data = locale::resolve_locale(tag);
    let date_style = options.date_style.unwrap_or_default();
    let currency_display = options.currency_display.unwrap_or_default();

    debug!(
        requested = tag,
        locale = data.tag,
        date_style = %date_style,
        currency_display = %currency_display,
        "Formatting invoice"
    );

    let money = |amount: f64| render_currency(amount, &header.currency, data, currency_display);

    let line_items = draft
        .line_items
        .iter()
        .enumerate()
        .map(|(i, item)| FormattedLineItem {
            description: item.description.clone(),
            quantity: signed(render_number(item.quantity, data, 0, 2)),
            unit: text(&item.unit),
            unit_price: money(item.unit_price),
            // Totals out of step with the items render as NaN rather than panic.
            amount: money(totals.line_item_amounts.get(i).copied().unwrap_or(f64::NAN)),
        })
        .collect();

    FormattedInvoice {
        locale: data.tag.to_string(),
        business: FormattedBusiness {
            name: draft.business.name.clone(),
            address: draft.business.address.clone(),
            email: draft.business.email.clone(),
            phone: text(&draft.business.phone),
            logo_url: text(&draft.business.logo_url),
            tax_id: text(&draft.business.tax_id),
        },
        client: FormattedClient {
            name: draft.client.name.clone(),
            address: draft.client.address.clone(),
            email: text(&draft.client.email),
        },
        header: FormattedHeader {
            invoice_number: header.invoice_number.clone(),
            issue_date: render_date(header.issue_date, data, date_style),
            due_date: header
                .due_date
                .map(|d| render_date(d, data, date_style))
                .unwrap_or_default(),
            currency: header.currency.clone(),
            tax_rate_display: format_tax_rate(header.tax_rate),
            notes: text(&header.notes),
        },
        line_items,
        totals: FormattedTotals {
            subtotal: money(totals.subtotal),
            tax_amount: money(totals.tax_amount),
            total: money(totals.total),
        },
    }
}

fn text(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

fn signed((negative, digits): (bool, String)) -> String {
    if negative {
        format!("-{digits}")
    } else {
        digits
    }
}

// =============================================================================
// Standalone Utilities
// =============================================================================

/// Formats an amount in `currency` following `locale_tag`.
///
/// ## Example
/// ```rust
/// use tally_core::format::format_currency;
/// use tally_core::CurrencyDisplay;
///
/// assert_eq!(format_currency(1234.5, "USD", "en-US", CurrencyDisplay::Symbol), "$1,234.50");
/// assert_eq!(format_currency(4734.5, "EUR", "de-DE", CurrencyDisplay::Symbol), "4.734,50\u{a0}€");
/// ```
pub fn format_currency(
    amount: f64,
    currency: &str,
    locale_tag: &str,
    display: CurrencyDisplay,
) -> String {
    render_currency(amount, currency, locale::resolve_locale(locale_tag), display)
}

/// Formats a plain number with between `min_fraction` and `max_fraction`
/// decimals. Trailing zeros beyond `min_fraction` are dropped.
pub fn format_number(value: f64, locale_tag: &str, min_fraction: usize, max_fraction: usize) -> String {
    let max_fraction = max_fraction.max(min_fraction);
    signed(render_number(
        value,
        locale::resolve_locale(locale_tag),
        min_fraction,
        max_fraction,
    ))
}

/// Formats an ISO `YYYY-MM-DD` date. Anything else is returned unchanged.
pub fn format_date(iso: &str, locale_tag: &str, style: DateStyle) -> String {
    match parse_iso_date(iso.trim()) {
        Ok(date) => render_date(date, locale::resolve_locale(locale_tag), style),
        Err(_) => iso.to_string(),
    }
}

/// Whole-percent display of a fractional tax rate: `0.19` → `"19"`.
pub fn format_tax_rate(rate: Option<f64>) -> String {
    // `+ 0.0` turns -0 into 0.
    rate.map(|r| format!("{}", (r * 100.0).round() + 0.0))
        .unwrap_or_default()
}

// =============================================================================
// Numbers
// =============================================================================

/// Renders `|value|` with locale separators. The flag says whether a minus
/// sign belongs in front; it is never set for a result that reads as zero.
pub fn render_number(
    value: f64,
    data: &LocaleData,
    min_fraction: usize,
    max_fraction: usize,
) -> (bool, String) {
    if value.is_nan() {
        return (false, "NaN".to_string());
    }
    if value.is_infinite() {
        return (value < 0.0, "∞".to_string());
    }

    let rounded = round_half_expand(value.abs(), max_fraction);
    let negative = value < 0.0 && rounded.bytes().any(|b| matches!(b, b'1'..=b'9'));

    let (int_part, frac_part) = rounded.split_once('.').unwrap_or((rounded.as_str(), ""));
    let mut frac = frac_part;
    while frac.len() > min_fraction && frac.ends_with('0') {
        frac = &frac[..frac.len() - 1];
    }

    let grouped = group_integer(int_part, data);
    let digits = if frac.is_empty() {
        grouped
    } else {
        format!("{grouped}{}{frac}", data.decimal)
    };
    (negative, digits)
}

/// Rounds a non-negative value to `digits` decimals, ties away from zero.
///
/// Works on the shortest decimal that round-trips to `abs`, so `1.005`
/// rounds to `1.01` even though the nearest double sits just below it.
fn round_half_expand(abs: f64, digits: usize) -> String {
    let shortest = format!("{abs}");
    let (int_part, frac_part) = shortest.split_once('.').unwrap_or((shortest.as_str(), ""));

    if frac_part.len() <= digits {
        if digits == 0 {
            return int_part.to_string();
        }
        return format!("{int_part}.{frac_part:0<digits$}");
    }

    let kept = if digits == 0 {
        int_part.to_string()
    } else {
        format!("{int_part}.{}", &frac_part[..digits])
    };
    if frac_part.as_bytes()[digits] >= b'5' {
        bump_last_digit(&kept)
    } else {
        kept
    }
}

/// Adds one unit in the last place of a decimal string, with carry.
fn bump_last_digit(s: &str) -> String {
    let mut chars: Vec<char> = s.chars().collect();
    for c in chars.iter_mut().rev() {
        match *c {
            '.' => continue,
            '9' => *c = '0',
            d => {
                *c = char::from(d as u8 + 1);
                return chars.into_iter().collect();
            }
        }
    }
    std::iter::once('1').chain(chars).collect()
}

fn group_integer(digits: &str, data: &LocaleData) -> String {
    if digits.len() < 3 + data.min_grouping_digits.max(1) {
        return digits.to_string();
    }

    let size = match data.grouping {
        Grouping::Standard => 3,
        Grouping::Indian => 2,
    };

    let mut groups = Vec::new();
    let mut end = digits.len() - 3;
    groups.push(&digits[end..]);
    while end > 0 {
        let start = end.saturating_sub(size);
        groups.push(&digits[start..end]);
        end = start;
    }
    groups.reverse();
    groups.join(data.group)
}

// =============================================================================
// Currency
// =============================================================================

/// Renders an amount with exactly two decimals and the currency marker
/// placed the way `data` expects.
///
/// Unknown codes are shown as the upper-cased code in every display mode.
pub fn render_currency(
    amount: f64,
    currency_code: &str,
    data: &LocaleData,
    display: CurrencyDisplay,
) -> String {
    let (negative, number) = render_number(amount, data, 2, 2);
    let sign = if negative { "-" } else { "" };
    let info = locale::currency(currency_code);
    let code = currency_code.trim().to_ascii_uppercase();

    let marker = match display {
        CurrencyDisplay::Name => {
            let name = info.map_or(code.as_str(), |c| c.name_for_language(data.language));
            return format!("{sign}{number} {name}");
        }
        CurrencyDisplay::Symbol => info.map_or(code.as_str(), |c| c.symbol_for_region(data.region)),
        CurrencyDisplay::Code => code.as_str(),
    };

    match data.currency_placement {
        CurrencyPlacement::Prefix if ends_with_letter(marker) => {
            format!("{sign}{marker}{NBSP}{number}")
        }
        CurrencyPlacement::Prefix => format!("{sign}{marker}{number}"),
        CurrencyPlacement::SpacedPrefix => format!("{sign}{marker}{NBSP}{number}"),
        CurrencyPlacement::Suffix => format!("{sign}{number}{NBSP}{marker}"),
    }
}

fn ends_with_letter(s: &str) -> bool {
    s.chars().last().is_some_and(char::is_alphabetic)
}

// =============================================================================
// Dates
// =============================================================================

/// Renders a calendar date with the pattern for `style`.
///
/// ## Pattern Tokens
/// ```text
/// {d}     day            5        {M}     month          1
/// {dd}    day, 2 digits  05       {MM}    month, 2 digits 01
/// {MMM}   short month    Jan.     {MMMM}  full month     Januar
/// {y}     year           2025
/// ```
/// Unknown tokens are copied through as written.
pub fn render_date(date: NaiveDate, data: &LocaleData, style: DateStyle) -> String {
    let pattern = match style {
        DateStyle::Short => data.date_short,
        DateStyle::Medium => data.date_medium,
        DateStyle::Long => data.date_long,
    };
    let month = date.month0() as usize;

    let mut out = String::with_capacity(pattern.len() + 8);
    let mut rest = pattern;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let tail = &rest[open..];
        let Some(close) = tail.find('}') else {
            out.push_str(tail);
            return out;
        };

        match &tail[1..close] {
            "d" => out.push_str(&date.day().to_string()),
            "dd" => out.push_str(&format!("{:02}", date.day())),
            "M" => out.push_str(&date.month().to_string()),
            "MM" => out.push_str(&format!("{:02}", date.month())),
            "MMM" => out.push_str(data.months_abbr[month]),
            "MMMM" => out.push_str(data.months_full[month]),
            "y" => out.push_str(&date.year().to_string()),
            _ => out.push_str(&tail[..=close]),
        }
        rest = &tail[close + 1..];
    }
    out.push_str(rest);
    out
}

// =============================================================================
// Unit Tests
// =============================================================================
