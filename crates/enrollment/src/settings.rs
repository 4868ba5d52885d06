//! Global fee settings.
//!
//! Settings arrive as a flat string→string map. Every numeric accessor has a
//! fixed fallback for absent or non-numeric values; none of them fail.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use coopbill_core::Money;

pub const FAMILY_FEE: &str = "FamilyFee";
pub const BACKGROUND_FEE: &str = "BackgroundFee";
pub const STUDENT_FEE: &str = "StudentFee";
pub const SCHOOL_YEAR: &str = "SchoolYear";
pub const PAYPAL_PERCENTAGE: &str = "PayPalPercentage";
pub const PAYPAL_FIXED_RATE: &str = "PayPalFixedRate";

const DEFAULT_FAMILY_FEE: i64 = 20;
const DEFAULT_STUDENT_FEE: i64 = 20;
const DEFAULT_BACKGROUND_FEE: i64 = 0;

/// Payment-processor surcharge terms: `percentage` of the amount plus `fixed`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SurchargeRate {
    pub percentage: Decimal,
    pub fixed: Money,
}

impl SurchargeRate {
    /// Fee the processor adds on top of `amount`, rounded to cents.
    pub fn surcharge_on(&self, amount: Money) -> Money {
        (amount.percent(self.percentage) + self.fixed).round_to_cents()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Settings(BTreeMap<String, String>);

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Strictly parsed numeric value; `None` when absent or non-numeric.
    pub fn number(&self, key: &str) -> Option<Money> {
        self.get(key).and_then(Money::parse)
    }

    fn number_or(&self, key: &str, default: i64) -> Money {
        self.number(key).unwrap_or_else(|| Money::from(default))
    }

    /// Per-family fee, default 20.
    pub fn family_fee(&self) -> Money {
        self.number_or(FAMILY_FEE, DEFAULT_FAMILY_FEE)
    }

    /// Per-student fee, default 20.
    pub fn student_fee(&self) -> Money {
        self.number_or(STUDENT_FEE, DEFAULT_STUDENT_FEE)
    }

    /// Background-check fee, default 0.
    pub fn background_fee(&self) -> Money {
        self.number_or(BACKGROUND_FEE, DEFAULT_BACKGROUND_FEE)
    }

    /// The current school year's leading year number.
    ///
    /// `"2024"` and `"2024-2025"` both yield 2024. No default: without it a
    /// student's grade cannot be derived.
    pub fn school_year(&self) -> Option<i32> {
        let value = self.get(SCHOOL_YEAR)?.trim();
        let digits: String = value.chars().take_while(char::is_ascii_digit).collect();
        digits.parse().ok()
    }

    /// Processor surcharge terms, only if both settings are present and numeric.
    pub fn surcharge_rate(&self) -> Option<SurchargeRate> {
        let percentage = self.number(PAYPAL_PERCENTAGE)?.amount();
        let fixed = self.number(PAYPAL_FIXED_RATE)?;
        Some(SurchargeRate { percentage, fixed })
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Settings {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}
