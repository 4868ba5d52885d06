//! Payments and manual bill adjustments recorded against a family.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use coopbill_core::{FamilyId, Money};

/// A receipt against a family's balance.
///
/// Stored positive; reconciliation subtracts the absolute value regardless of
/// the stored sign.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub family_id: FamilyId,
    pub amount: Money,
    pub payment_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Payment {
    pub fn new(family_id: FamilyId, amount: Money, payment_date: NaiveDate) -> Self {
        Self {
            family_id,
            amount,
            payment_date,
            payment_method: None,
            description: None,
        }
    }

    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.payment_method = Some(method.into());
        self
    }

    /// The amount this payment reduces the balance by.
    pub fn reduction(&self) -> Money {
        self.amount.abs()
    }
}

/// A manual correction: negative is a credit, positive a charge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillAdjustment {
    pub family_id: FamilyId,
    pub amount: Money,
    pub adjustment_date: NaiveDate,
    pub description: String,
}

impl BillAdjustment {
    pub fn new(
        family_id: FamilyId,
        amount: Money,
        adjustment_date: NaiveDate,
        description: impl Into<String>,
    ) -> Self {
        Self {
            family_id,
            amount,
            adjustment_date,
            description: description.into(),
        }
    }

    pub fn is_credit(&self) -> bool {
        self.amount.is_negative()
    }
}
