//! # Calculator
//!
//! Derives line amounts and invoice totals from a validated draft.
//!
//! ## Numeric Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  amount[i]  = quantity[i] × unit_price[i]        (plain f64 multiply)   │
//! │  subtotal   = amount[0] + amount[1] + ...         (left to right)       │
//! │  tax_amount = subtotal × tax_rate (0 when absent)                       │
//! │  total      = subtotal + tax_amount                                     │
//! │                                                                         │
//! │  NO ROUNDING HERE. Rounding to 2 decimals happens only in `format`.    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Floating-point addition is not associative, so the summation order is
//! fixed to the line-item order. Same draft in, bit-identical totals out.
//!
//! ## Usage
//! ```rust
//! use serde_json::json;
//! use tally_core::{calc, validation};
//!
//! let draft = validation::validate(&json!({
//!     "business": { "name": "Acme", "address": "1 Road", "email": "a@acme.test" },
//!     "client": { "name": "Bob", "address": "2 Street" },
//!     "header": { "invoiceNumber": "1", "issueDate": "2025-01-15", "currency": "USD" },
//!     "lineItems": [{ "description": "Work", "quantity": 2, "unitPrice": 50 }]
//! }))
//! .unwrap();
//!
//! let computed = calc::compute(&draft);
//! assert_eq!(computed.totals.total, 100.0);
//! ```

use tracing::trace;

use crate::types::{ComputedInvoice, InvoiceDraft, LineItem, Totals};

/// `quantity × unit_price` for one line, unrounded.
#[inline]
pub fn line_amount(item: &LineItem) -> f64 {
    item.quantity * item.unit_price
}

/// Computes the totals for a draft without cloning it.
pub fn compute_totals(draft: &InvoiceDraft) -> Totals {
    let line_item_amounts: Vec<f64> = draft.line_items.iter().map(line_amount).collect();

    // Explicit left-to-right fold: the order is part of the contract.
    let subtotal = line_item_amounts.iter().fold(0.0_f64, |acc, amount| acc + amount);
    let tax_amount = subtotal * draft.header.tax_rate.unwrap_or(0.0);
    let total = subtotal + tax_amount;

    trace!(
        lines = line_item_amounts.len(),
        subtotal,
        tax_amount,
        total,
        "Computed totals"
    );

    Totals {
        line_item_amounts,
        subtotal,
        tax_amount,
        total,
    }
}

/// Derives the computed invoice for a draft.
///
/// Pure and total: a validated draft cannot make this fail.
///
/// ## User Workflow
/// ```text
/// Line items: 10 × 150.00, 25 × 120.00, 1 × 234.50
///      │
///      ▼
/// compute() ← THIS FUNCTION
///      │
///      ▼
/// amounts [1500, 3000, 234.5]
/// subtotal 4734.5, tax @19% 899.555, total 5634.055
/// ```
pub fn compute(draft: &InvoiceDraft) -> ComputedInvoice {
    ComputedInvoice {
        totals: compute_totals(draft),
        draft: draft.clone(),
    }
}

/// Throws away whatever totals `computed` carries and derives them again
/// from its (possibly edited) line items.
///
/// Totals are never patched incrementally, so an edited invoice can't drift
/// from its line items.
pub fn recompute(computed: ComputedInvoice) -> ComputedInvoice {
    let ComputedInvoice { draft, .. } = computed;
    ComputedInvoice {
        totals: compute_totals(&draft),
        draft,
    }
}

impl ComputedInvoice {
    /// Method form of [`recompute`].
    pub fn recompute(self) -> Self {
        recompute(self)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Business, Client, Header};
    use chrono::NaiveDate;

    fn draft(items: &[(f64, f64)], tax_rate: Option<f64>) -> InvoiceDraft {
        InvoiceDraft {
            business: Business {
                name: "Acme GmbH".to_string(),
                address: "Hauptstraße 1\n10115 Berlin".to_string(),
                email: "billing@acme.test".to_string(),
                phone: None,
                logo_url: None,
                tax_id: None,
            },
            client: Client {
                name: "Globex".to_string(),
                address: "Main St 2".to_string(),
                email: None,
            },
            header: Header {
                invoice_number: "2025-001".to_string(),
                issue_date: NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
                due_date: None,
                currency: "EUR".to_string(),
                tax_rate,
                notes: None,
            },
            line_items: items
                .iter()
                .enumerate()
                .map(|(i, (quantity, unit_price))| LineItem {
                    description: format!("Item {}", i + 1),
                    quantity: *quantity,
                    unit_price: *unit_price,
                    unit: None,
                })
                .collect(),
        }
    }

    #[test]
    fn test_reference_invoice() {
        let computed = compute(&draft(&[(10.0, 150.0), (25.0, 120.0), (1.0, 234.50)], Some(0.19)));
        let totals = &computed.totals;

        assert_eq!(totals.line_item_amounts, vec![1500.0, 3000.0, 234.5]);
        assert_eq!(totals.subtotal, 4734.5);
        assert!((totals.tax_amount - 899.555).abs() < 1e-9);
        assert!((totals.total - 5634.055).abs() < 1e-9);
    }

    #[test]
    fn test_no_tax_rate_means_no_tax() {
        let totals = compute_totals(&draft(&[(3.0, 19.99)], None));
        assert_eq!(totals.tax_amount, 0.0);
        assert_eq!(totals.total, totals.subtotal);
    }

    #[test]
    fn test_no_intermediate_rounding() {
        // 3 × 0.1 in f64 is 0.30000000000000004; that must survive untouched.
        let totals = compute_totals(&draft(&[(3.0, 0.1)], None));
        assert_eq!(totals.line_item_amounts[0], 3.0 * 0.1);
        assert_ne!(totals.subtotal, 0.3);
    }

    #[test]
    fn test_subtotal_sums_left_to_right() {
        let items: Vec<(f64, f64)> = (1..=100).map(|i| (i as f64 * 0.7, 1.0 / i as f64)).collect();
        let totals = compute_totals(&draft(&items, Some(0.07)));

        let mut expected = 0.0_f64;
        for amount in &totals.line_item_amounts {
            expected += amount;
        }
        assert_eq!(totals.subtotal.to_bits(), expected.to_bits());
        assert_eq!(totals.total.to_bits(), (totals.subtotal + totals.tax_amount).to_bits());
    }

    #[test]
    fn test_compute_is_deterministic() {
        let d = draft(&[(1.5, 33.33), (7.0, 0.01)], Some(0.2));
        assert_eq!(compute(&d), compute(&d));
    }

    #[test]
    fn test_recompute_discards_stale_totals() {
        let mut computed = compute(&draft(&[(1.0, 100.0)], Some(0.1)));
        computed.draft.line_items[0].quantity = 3.0;
        assert_eq!(computed.totals.subtotal, 100.0);

        let fresh = computed.recompute();
        assert_eq!(fresh.totals.line_item_amounts, vec![300.0]);
        assert_eq!(fresh.totals.subtotal, 300.0);
        assert!((fresh.totals.total - 330.0).abs() < 1e-9);
    }

    #[test]
    fn test_free_line_item() {
        let totals = compute_totals(&draft(&[(2.0, 0.0), (1.0, 10.0)], None));
        assert_eq!(totals.line_item_amounts, vec![0.0, 10.0]);
        assert_eq!(totals.total, 10.0);
    }
}
