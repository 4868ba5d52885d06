//! Single entry point over a fetched snapshot: preconditions, fees, reconciliation.

use serde::{Deserialize, Serialize};
use tracing::debug;

use coopbill_core::{DomainError, DomainResult, FamilyId, MissingInput};
use coopbill_enrollment::{BillAdjustment, CourseCatalog, Family, HourLabels, Payment, Settings, Student};

use crate::fees::compute_line_items;
use crate::invoice::InvoiceResult;
use crate::reconcile::reconcile;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceOptions {
    /// Quote the online-payment processor fee on the outstanding balance.
    #[serde(default)]
    pub include_surcharge: bool,
}

impl InvoiceOptions {
    pub fn with_surcharge() -> Self {
        Self {
            include_surcharge: true,
        }
    }
}

/// Everything one invoice computation reads, borrowed from the caller's snapshot.
///
/// The `Option` fields are the catalogs whose absence is a precondition failure;
/// the slices may legitimately be empty.
#[derive(Debug, Clone, Copy)]
pub struct InvoiceInputs<'a> {
    pub family: Option<&'a Family>,
    pub students: &'a [Student],
    pub courses: Option<&'a CourseCatalog>,
    pub hour_labels: Option<&'a HourLabels>,
    pub settings: Option<&'a Settings>,
    pub adjustments: &'a [BillAdjustment],
    pub payments: &'a [Payment],
}

impl InvoiceInputs<'_> {
    fn check(&self, family_id: FamilyId) -> DomainResult<(&Family, &CourseCatalog, &Settings)> {
        let family = self
            .family
            .filter(|f| f.id == family_id)
            .ok_or(DomainError::missing(MissingInput::Family(family_id)))?;
        let settings = self
            .settings
            .ok_or(DomainError::missing(MissingInput::Settings))?;
        let courses = self
            .courses
            .ok_or(DomainError::missing(MissingInput::CourseCatalog))?;
        self.hour_labels
            .ok_or(DomainError::missing(MissingInput::HourLabels))?;
        Ok((family, courses, settings))
    }
}

/// Compute the invoice for `family_id` from a point-in-time snapshot.
///
/// Fails only on missing inputs; a family owing nothing is a normal result.
pub fn calculate_invoice(
    family_id: FamilyId,
    inputs: InvoiceInputs<'_>,
    options: InvoiceOptions,
) -> DomainResult<InvoiceResult> {
    let (family, courses, settings) = inputs.check(family_id)?;

    let schedule = compute_line_items(family, inputs.students, courses, settings);
    let result = reconcile(
        schedule,
        inputs.adjustments,
        inputs.payments,
        settings,
        options.include_surcharge,
    );

    debug!(
        family_id = %family_id,
        lines = result.line_items().len(),
        adjusted_total = %result.adjusted_total(),
        total_paid = %result.total_paid(),
        balance = %result.balance(),
        status = %result.payment_status(),
        "invoice computed"
    );

    Ok(result)
}
