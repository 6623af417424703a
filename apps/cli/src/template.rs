//! Placeholder merge for text templates (HTML, Markdown, plain text).
//!
//! ```text
//! Invoice {{invoice_number}} for {{client_name}}
//! {{#line_items}}
//! - {{item_description}}: {{item_quantity}} {{item_unit}} × {{item_unit_price}} = {{item_amount}}
//! {{/line_items}}
//! Total: {{total}}
//! ```
//!
//! The block between `{{#line_items}}` and `{{/line_items}}` is repeated once
//! per line item. Unknown placeholders are left in the output as written.
//! Values are inserted verbatim; nothing is escaped.

use tally_core::{FormattedInvoice, FormattedLineItem};

const BLOCK_OPEN: &str = "{{#line_items}}";
const BLOCK_CLOSE: &str = "{{/line_items}}";

/// Merges a formatted invoice into `template`.
pub fn render_template(template: &str, invoice: &FormattedInvoice) -> String {
    let fields = invoice_fields(invoice);

    let Some((head, block, tail)) = split_block(template) else {
        return substitute(template, &fields);
    };

    let mut out = substitute(head, &fields);
    for item in &invoice.line_items {
        let mut item_scope = item_fields(item);
        item_scope.extend_from_slice(&fields);
        out.push_str(&substitute(block, &item_scope));
    }
    out.push_str(&substitute(tail, &fields));
    out
}

fn split_block(template: &str) -> Option<(&str, &str, &str)> {
    let open = template.find(BLOCK_OPEN)?;
    let body_start = open + BLOCK_OPEN.len();
    let close = body_start + template[body_start..].find(BLOCK_CLOSE)?;
    Some((
        &template[..open],
        &template[body_start..close],
        &template[close + BLOCK_CLOSE.len()..],
    ))
}

fn invoice_fields(invoice: &FormattedInvoice) -> Vec<(&'static str, &str)> {
    vec![
        ("locale", invoice.locale.as_str()),
        ("business_name", invoice.business.name.as_str()),
        ("business_address", invoice.business.address.as_str()),
        ("business_email", invoice.business.email.as_str()),
        ("business_phone", invoice.business.phone.as_str()),
        ("business_logo_url", invoice.business.logo_url.as_str()),
        ("business_tax_id", invoice.business.tax_id.as_str()),
        ("client_name", invoice.client.name.as_str()),
        ("client_address", invoice.client.address.as_str()),
        ("client_email", invoice.client.email.as_str()),
        ("invoice_number", invoice.header.invoice_number.as_str()),
        ("issue_date", invoice.header.issue_date.as_str()),
        ("due_date", invoice.header.due_date.as_str()),
        ("currency", invoice.header.currency.as_str()),
        ("tax_rate", invoice.header.tax_rate_display.as_str()),
        ("notes", invoice.header.notes.as_str()),
        ("subtotal", invoice.totals.subtotal.as_str()),
        ("tax_amount", invoice.totals.tax_amount.as_str()),
        ("total", invoice.totals.total.as_str()),
    ]
}

fn item_fields(item: &FormattedLineItem) -> Vec<(&'static str, &str)> {
    vec![
        ("item_description", item.description.as_str()),
        ("item_quantity", item.quantity.as_str()),
        ("item_unit", item.unit.as_str()),
        ("item_unit_price", item.unit_price.as_str()),
        ("item_amount", item.amount.as_str()),
    ]
}

/// Single left-to-right pass, so inserted values are never re-scanned.
fn substitute(text: &str, fields: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(open) = rest.find("{{") {
        out.push_str(&rest[..open]);
        let tail = &rest[open..];
        let Some(close) = tail.find("}}") else {
            out.push_str(tail);
            return out;
        };

        let name = tail[2..close].trim();
        match fields.iter().find(|(key, _)| *key == name) {
            Some((_, value)) => out.push_str(value),
            None => out.push_str(&tail[..close + 2]),
        }
        rest = &tail[close + 2..];
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tally_core::{FormattedHeader, FormattedTotals};

    fn invoice() -> FormattedInvoice {
        FormattedInvoice {
            locale: "en-US".to_string(),
            header: FormattedHeader {
                invoice_number: "INV-9".to_string(),
                tax_rate_display: "19".to_string(),
                ..Default::default()
            },
            line_items: vec![
                FormattedLineItem {
                    description: "Design".to_string(),
                    quantity: "3".to_string(),
                    unit: "h".to_string(),
                    unit_price: "$400.00".to_string(),
                    amount: "$1,200.00".to_string(),
                },
                FormattedLineItem {
                    description: "Hosting".to_string(),
                    quantity: "1".to_string(),
                    unit: String::new(),
                    unit_price: "$20.00".to_string(),
                    amount: "$20.00".to_string(),
                },
            ],
            totals: FormattedTotals {
                total: "$1,220.00".to_string(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_simple_placeholders() {
        let out = render_template("Invoice {{invoice_number}} ({{ tax_rate }}%)", &invoice());
        assert_eq!(out, "Invoice INV-9 (19%)");
    }

    #[test]
    fn test_line_item_block_repeats() {
        let template = "#{{invoice_number}}\n{{#line_items}}{{item_description}}={{item_amount}};{{/line_items}}\n{{total}}";
        let out = render_template(template, &invoice());
        assert_eq!(out, "#INV-9\nDesign=$1,200.00;Hosting=$20.00;\n$1,220.00");
    }

    #[test]
    fn test_invoice_fields_visible_inside_block() {
        let template = "{{#line_items}}{{invoice_number}}/{{item_quantity}} {{/line_items}}";
        assert_eq!(render_template(template, &invoice()), "INV-9/3 INV-9/1 ");
    }

    #[test]
    fn test_unknown_placeholders_untouched() {
        let out = render_template("{{signature}} {{invoice_number}} {{", &invoice());
        assert_eq!(out, "{{signature}} INV-9 {{");
    }

    #[test]
    fn test_unclosed_block_is_plain_text() {
        let out = render_template("{{#line_items}}{{item_amount}}", &invoice());
        assert_eq!(out, "{{#line_items}}{{item_amount}}");
    }

    #[test]
    fn test_values_are_not_rescanned() {
        let mut inv = invoice();
        inv.header.notes = "{{total}}".to_string();
        assert_eq!(render_template("{{notes}}", &inv), "{{total}}");
    }
}
