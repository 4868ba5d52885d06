//! Reconciliation: fee schedule + adjustments + payments → balance.

use chrono::NaiveDate;

use coopbill_core::Money;
use coopbill_enrollment::{BillAdjustment, Payment, Settings};

use crate::fees::FeeSchedule;
use crate::invoice::{InvoiceResult, LineItem, PaymentStatus, SurchargeQuote};

/// Fold adjustments and payments into a fee schedule.
///
/// Adjustments become line items and count toward the adjusted total;
/// payments never appear as line items and are subtracted afterwards. Both are
/// ordered by date, then by their remaining fields, so the result does not
/// depend on the order the caller fetched them in.
/// When `include_surcharge` is set, the processor fee is quoted on the
/// outstanding balance only, and only if something is owed and both
/// processor settings are usable.
pub fn reconcile(
    schedule: FeeSchedule,
    adjustments: &[BillAdjustment],
    payments: &[Payment],
    settings: &Settings,
    include_surcharge: bool,
) -> InvoiceResult {
    let (family_id, mut line_items, base_total) = schedule.into_parts();

    let mut adjustments: Vec<&BillAdjustment> = adjustments.iter().collect();
    adjustments.sort_by(|a, b| adjustment_key(a).cmp(&adjustment_key(b)));

    let mut adjusted_total = base_total;
    for adjustment in adjustments {
        line_items.push(LineItem::adjustment(&adjustment.description, adjustment.amount));
        adjusted_total += adjustment.amount;
    }

    let mut payments = payments.to_vec();
    payments.sort_by(|a, b| payment_key(a).cmp(&payment_key(b)));

    let total_paid: Money = payments.iter().map(Payment::reduction).sum();
    let balance = adjusted_total - total_paid;
    let payment_status = PaymentStatus::classify(total_paid, balance);

    let surcharge = if include_surcharge && balance.is_positive() {
        settings.surcharge_rate().map(|rate| {
            let surcharge = rate.surcharge_on(balance);
            let total_with_surcharge = adjusted_total + surcharge;
            SurchargeQuote {
                surcharge,
                total_with_surcharge,
                balance_with_surcharge: total_with_surcharge - total_paid,
            }
        })
    } else {
        None
    };

    InvoiceResult {
        family_id,
        line_items,
        base_total,
        adjusted_total,
        total_paid,
        balance,
        payment_status,
        payments,
        surcharge,
    }
}

fn adjustment_key(a: &BillAdjustment) -> (NaiveDate, &str, Money) {
    (a.adjustment_date, a.description.as_str(), a.amount)
}

fn payment_key(p: &Payment) -> (NaiveDate, Money, Option<&str>, Option<&str>) {
    (
        p.payment_date,
        p.amount,
        p.payment_method.as_deref(),
        p.description.as_deref(),
    )
}
