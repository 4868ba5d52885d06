//! Fee accumulation: enrollment state → ordered fee line items.
//!
//! Statement order is fixed:
//!
//! ```text
//! Family Fee
//! Background Check            (only if the family needs one)
//! for each active student, youngest graduating class first:
//!   Student Fee
//!   for each hour slot (math, 1st..4th, 5th fall, 5th spring):
//!     <course>                (catalog hit with a positive fee)
//!     <course> - Book Rental  (same course, positive rental)
//! ```
//!
//! A slot naming a course the catalog doesn't have, or one whose fee is not
//! positive, bills nothing. That is a data-quality gap, not an error.

use tracing::debug;

use coopbill_core::{FamilyId, Money};
use coopbill_enrollment::{CourseCatalog, Family, Settings, Student, roster_order};

use crate::invoice::LineItem;

/// Fee lines for one family, before adjustments and payments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeeSchedule {
    family_id: FamilyId,
    line_items: Vec<LineItem>,
    base_total: Money,
}

impl FeeSchedule {
    pub fn family_id(&self) -> FamilyId {
        self.family_id
    }

    pub fn line_items(&self) -> &[LineItem] {
        &self.line_items
    }

    pub fn base_total(&self) -> Money {
        self.base_total
    }

    pub(crate) fn into_parts(self) -> (FamilyId, Vec<LineItem>, Money) {
        (self.family_id, self.line_items, self.base_total)
    }
}

/// Build the fee lines for `family`.
///
/// `students` is the family's full student list; inactive students are
/// dropped and the rest re-sorted here, so caller order never matters.
///
/// Hour labels are not a parameter: line-item descriptions are course names
/// only. Their presence is still required by [`crate::calculate_invoice`],
/// which checks it before calling this.
pub fn compute_line_items(
    family: &Family,
    students: &[Student],
    courses: &CourseCatalog,
    settings: &Settings,
) -> FeeSchedule {
    let mut lines = vec![LineItem::family_fee(settings.family_fee())];

    if family.needs_background_check {
        lines.push(LineItem::background_check(settings.background_fee()));
    }

    let student_fee = settings.student_fee();
    for student in roster_order(students) {
        lines.push(LineItem::student_fee(student.id, student_fee));

        for (slot, name) in student.hours.iter() {
            let Some(name) = name else { continue };

            let Some(course) = courses.find(name) else {
                debug!(student_id = %student.id, ?slot, course = name, "course not in catalog; not billed");
                continue;
            };
            let Some(fee) = course.billable_fee() else {
                debug!(student_id = %student.id, ?slot, course = name, "course has no positive fee; not billed");
                continue;
            };

            lines.push(LineItem::course(student.id, slot, name, fee));
            if let Some(rental) = course.billable_book_rental() {
                lines.push(LineItem::book_rental(student.id, slot, name, rental));
            }
        }
    }

    let base_total = lines.iter().map(|line| line.amount).sum();

    FeeSchedule {
        family_id: family.id,
        line_items: lines,
        base_total,
    }
}
