//! The billing statement: line items, totals and payment status.

use serde::Serialize;

use coopbill_core::{FamilyId, Money, StudentId};
use coopbill_enrollment::{HourSlot, Payment};

/// What produced a line item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum LineItemKind {
    FamilyFee,
    BackgroundCheck,
    StudentFee,
    Course,
    BookRental,
    Adjustment,
}

/// One row of a statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub description: String,
    /// Signed; only adjustments can be negative.
    pub amount: Money,
    pub kind: LineItemKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_id: Option<StudentId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slot: Option<HourSlot>,
}

impl LineItem {
    fn fixed(kind: LineItemKind, description: &str, amount: Money) -> Self {
        Self {
            description: description.to_string(),
            amount,
            kind,
            student_id: None,
            slot: None,
        }
    }

    pub fn family_fee(amount: Money) -> Self {
        Self::fixed(LineItemKind::FamilyFee, "Family Fee", amount)
    }

    pub fn background_check(amount: Money) -> Self {
        Self::fixed(LineItemKind::BackgroundCheck, "Background Check", amount)
    }

    pub fn student_fee(student_id: StudentId, amount: Money) -> Self {
        Self {
            student_id: Some(student_id),
            ..Self::fixed(LineItemKind::StudentFee, "Student Fee", amount)
        }
    }

    pub fn course(student_id: StudentId, slot: HourSlot, course_name: &str, amount: Money) -> Self {
        Self {
            description: course_name.to_string(),
            amount,
            kind: LineItemKind::Course,
            student_id: Some(student_id),
            slot: Some(slot),
        }
    }

    pub fn book_rental(student_id: StudentId, slot: HourSlot, course_name: &str, amount: Money) -> Self {
        Self {
            description: format!("{course_name} - Book Rental"),
            amount,
            kind: LineItemKind::BookRental,
            student_id: Some(student_id),
            slot: Some(slot),
        }
    }

    pub fn adjustment(description: &str, amount: Money) -> Self {
        Self::fixed(LineItemKind::Adjustment, description, amount)
    }

    pub fn is_credit(&self) -> bool {
        self.amount.is_negative()
    }
}

/// Where a family stands after payments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    /// Money owed, nothing paid yet.
    Unpaid,
    /// Money owed, something paid.
    Partial,
    /// Balance is exactly zero.
    Paid,
    /// Paid more than owed.
    Overpaid,
}

impl PaymentStatus {
    pub fn classify(total_paid: Money, balance: Money) -> Self {
        if balance.is_negative() {
            PaymentStatus::Overpaid
        } else if balance.is_zero() {
            PaymentStatus::Paid
        } else if total_paid.is_zero() {
            PaymentStatus::Unpaid
        } else {
            PaymentStatus::Partial
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PaymentStatus::Unpaid => "unpaid",
            PaymentStatus::Partial => "partial",
            PaymentStatus::Paid => "paid",
            PaymentStatus::Overpaid => "overpaid",
        }
    }
}

impl core::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Online-payment quote: the processor fee on the outstanding balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SurchargeQuote {
    pub surcharge: Money,
    pub total_with_surcharge: Money,
    pub balance_with_surcharge: Money,
}

/// Immutable result of one invoice computation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceResult {
    pub(crate) family_id: FamilyId,
    pub(crate) line_items: Vec<LineItem>,
    pub(crate) base_total: Money,
    pub(crate) adjusted_total: Money,
    pub(crate) total_paid: Money,
    pub(crate) balance: Money,
    pub(crate) payment_status: PaymentStatus,
    pub(crate) payments: Vec<Payment>,
    #[serde(flatten)]
    pub(crate) surcharge: Option<SurchargeQuote>,
}

impl InvoiceResult {
    pub fn family_id(&self) -> FamilyId {
        self.family_id
    }

    /// Fees, course charges, then adjustments, in statement order.
    pub fn line_items(&self) -> &[LineItem] {
        &self.line_items
    }

    /// Sum of fee and course lines, before adjustments.
    pub fn base_total(&self) -> Money {
        self.base_total
    }

    /// Sum of every line item, adjustments included.
    pub fn adjusted_total(&self) -> Money {
        self.adjusted_total
    }

    pub fn total_paid(&self) -> Money {
        self.total_paid
    }

    /// Positive: owed. Negative: overpaid.
    pub fn balance(&self) -> Money {
        self.balance
    }

    pub fn payment_status(&self) -> PaymentStatus {
        self.payment_status
    }

    /// Payments in date order (the statement's trailing section).
    pub fn payments(&self) -> &[Payment] {
        &self.payments
    }

    pub fn surcharge_quote(&self) -> Option<&SurchargeQuote> {
        self.surcharge.as_ref()
    }

    pub fn surcharge(&self) -> Option<Money> {
        self.surcharge.map(|q| q.surcharge)
    }

    pub fn total_with_surcharge(&self) -> Option<Money> {
        self.surcharge.map(|q| q.total_with_surcharge)
    }

    pub fn balance_with_surcharge(&self) -> Option<Money> {
        self.surcharge.map(|q| q.balance_with_surcharge)
    }

    pub fn has_balance_due(&self) -> bool {
        self.balance.is_positive()
    }
}
