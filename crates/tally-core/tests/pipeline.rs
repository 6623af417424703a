//! End-to-end checks: raw JSON in, formatted invoice or issues out.

use serde_json::{json, Value};
use tally_core::{
    calc, format_invoice, get_locale, process, validate, FormatOptions, IssueCode, ProcessReport,
};

fn reference_invoice() -> Value {
    json!({
        "business": {
            "name": "Müller Consulting GmbH",
            "address": "Hauptstraße 1\n10115 Berlin",
            "email": "rechnung@mueller.test",
            "taxId": "DE123456789"
        },
        "client": {
            "name": "Globex AG",
            "address": "Industriestraße 9\n80331 München",
            "email": "ap@globex.test"
        },
        "header": {
            "invoiceNumber": "2025-0042",
            "issueDate": "2025-01-15",
            "dueDate": "2025-02-14",
            "currency": "EUR",
            "taxRate": 0.19,
            "notes": "Zahlbar innerhalb von 30 Tagen."
        },
        "lineItems": [
            { "description": "Beratung", "quantity": 10, "unitPrice": 150, "unit": "Std." },
            { "description": "Entwicklung", "quantity": 25, "unitPrice": 120, "unit": "Std." },
            { "description": "Lizenz", "quantity": 1, "unitPrice": 234.50 }
        ]
    })
}

fn items(n: usize) -> Value {
    Value::Array(
        (1..=n)
            .map(|i| {
                json!({
                    "description": format!("Item {i}"),
                    "quantity": (i as f64) * 0.3,
                    "unitPrice": 10.0 / (i as f64 + 2.0)
                })
            })
            .collect(),
    )
}

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn scenario_reference_invoice_end_to_end() {
    let processed = process(&reference_invoice(), &FormatOptions::default()).unwrap();
    let totals = &processed.computed.totals;

    assert_eq!(totals.line_item_amounts, vec![1500.0, 3000.0, 234.5]);
    assert_eq!(totals.subtotal, 4734.5);
    assert!((totals.tax_amount - 899.555).abs() < 1e-9);
    assert!((totals.total - 5634.055).abs() < 1e-9);

    let invoice = &processed.invoice;
    assert_eq!(invoice.locale, "de-DE");
    assert_eq!(invoice.totals.subtotal, "4.734,50\u{a0}€");
    assert!(invoice.totals.tax_amount.starts_with("899,5"));
    assert!(invoice.totals.total.starts_with("5.634,0"));
    assert_eq!(invoice.header.issue_date, "15. Jan. 2025");
    assert_eq!(invoice.header.due_date, "14. Feb. 2025");
    assert_eq!(invoice.header.tax_rate_display, "19");
    assert_eq!(invoice.line_items[2].unit, "");
    assert_eq!(invoice.line_items[2].amount, "234,50\u{a0}€");
}

#[test]
fn scenario_empty_line_items() {
    let mut raw = reference_invoice();
    raw["lineItems"] = json!([]);

    let errors = validate(&raw).unwrap_err();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors.issues()[0].code, IssueCode::EmptyArray);
    assert_eq!(errors.issues()[0].path, "lineItems");
}

#[test]
fn scenario_lowercase_currency_is_normalized() {
    let mut raw = reference_invoice();
    raw["header"]["currency"] = json!("eur");
    assert_eq!(validate(&raw).unwrap().header.currency, "EUR");
}

#[test]
fn scenario_impossible_date() {
    let mut raw = reference_invoice();
    raw["header"]["issueDate"] = json!("2025-02-30");

    let errors = validate(&raw).unwrap_err();
    let issue = errors.find("header.issueDate").unwrap();
    assert_eq!(issue.code, IssueCode::InvalidDate);
}

#[test]
fn scenario_currency_locales() {
    assert_eq!(get_locale("EUR"), "de-DE");
    assert_eq!(get_locale("XYZ"), "en-US");
    assert_eq!(get_locale("eur"), "de-DE");
}

#[test]
fn scenario_all_issues_reported_together() {
    let mut raw = reference_invoice();
    raw["lineItems"][1]["unitPrice"] = json!(-120);
    raw["business"]["email"] = json!("");
    raw["header"]["dueDate"] = json!("2025-01-01");
    raw["client"]["name"] = json!(7);

    let errors = validate(&raw).unwrap_err();
    let found: Vec<(IssueCode, &str)> = errors
        .issues()
        .iter()
        .map(|i| (i.code, i.path.as_str()))
        .collect();

    assert_eq!(
        found,
        vec![
            (IssueCode::MissingRequired, "business.email"),
            (IssueCode::InvalidType, "client.name"),
            (IssueCode::DateOrder, "header.dueDate"),
            (IssueCode::NegativeNumber, "lineItems[1].unitPrice"),
        ]
    );
}

// =============================================================================
// Properties
// =============================================================================

#[test]
fn validated_draft_round_trips() {
    let draft = validate(&reference_invoice()).unwrap();
    let serialized = serde_json::to_value(&draft).unwrap();
    assert_eq!(validate(&serialized).unwrap(), draft);
}

#[test]
fn formatting_is_idempotent() {
    let draft = validate(&reference_invoice()).unwrap();
    let options = FormatOptions::default().with_locale("fr-FR");
    let first = format_invoice(&calc::compute(&draft), &options);
    let second = format_invoice(&calc::compute(&draft), &options);
    assert_eq!(first, second);
}

#[test]
fn due_date_may_equal_issue_date() {
    let mut raw = reference_invoice();
    raw["header"]["dueDate"] = json!("2025-01-15");
    assert!(validate(&raw).is_ok());

    raw["header"]["dueDate"] = json!("2025-01-14");
    let errors = validate(&raw).unwrap_err();
    assert_eq!(errors.find("header.dueDate").map(|i| i.code), Some(IssueCode::DateOrder));
}

#[test]
fn totals_are_consistent_for_any_item_count() {
    for n in 1..=100 {
        let mut raw = reference_invoice();
        raw["lineItems"] = items(n);
        let draft = validate(&raw).unwrap();
        let totals = calc::compute(&draft).totals;

        let mut sum = 0.0_f64;
        for amount in &totals.line_item_amounts {
            sum += amount;
        }
        assert_eq!(totals.line_item_amounts.len(), n);
        assert_eq!(totals.subtotal.to_bits(), sum.to_bits(), "subtotal drift at {n} items");
        assert_eq!(
            totals.total.to_bits(),
            (totals.subtotal + totals.tax_amount).to_bits(),
            "total drift at {n} items"
        );
    }
}

#[test]
fn missing_tax_rate_means_no_tax() {
    let mut raw = reference_invoice();
    raw["header"].as_object_mut().unwrap().remove("taxRate");

    let processed = process(&raw, &FormatOptions::default()).unwrap();
    assert_eq!(processed.computed.totals.tax_amount, 0.0);
    assert_eq!(processed.computed.totals.total, processed.computed.totals.subtotal);
    assert_eq!(processed.invoice.header.tax_rate_display, "");
}

#[test]
fn report_serializes_failures_as_issue_list() {
    let mut raw = reference_invoice();
    raw["header"]["currency"] = json!("DOGE");

    let report = ProcessReport::from(process(&raw, &FormatOptions::default()));
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["ok"], false);
    assert_eq!(json["issues"][0]["code"], "INVALID_VALUE");
    assert_eq!(json["issues"][0]["path"], "header.currency");
    assert!(json["issues"][0]["hint"].is_string());
}
