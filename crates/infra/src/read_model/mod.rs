//! Read-side repository seam for the invoice engine.
//!
//! The engine never fetches anything itself; these traits are what the
//! persistence layer implements so [`crate::invoice_service::InvoiceService`]
//! can assemble a snapshot. Absent catalogs are `Ok(None)`, which the engine
//! turns into precondition errors; an empty list is a normal answer.

pub mod in_memory;

use std::sync::Arc;

use thiserror::Error;

use coopbill_core::FamilyId;
use coopbill_enrollment::{
    BillAdjustment, CourseCatalog, Family, GradeTable, HourLabels, Payment, Settings, Student,
};

pub use in_memory::{InMemoryStore, Snapshot};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    /// The backing store could not be reached or read.
    #[error("repository unavailable: {0}")]
    Unavailable(String),

    /// Stored data could not be decoded.
    #[error("corrupt data: {0}")]
    Corrupt(String),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

pub trait FamilyRepository: Send + Sync {
    fn family(&self, id: FamilyId) -> RepositoryResult<Option<Family>>;

    /// Every known family id, in a stable order (public tokens resolve to the
    /// first id on collision).
    fn family_ids(&self) -> RepositoryResult<Vec<FamilyId>>;
}

pub trait EnrollmentRepository: Send + Sync {
    /// All students of the family, active or not.
    fn students_for_family(&self, id: FamilyId) -> RepositoryResult<Vec<Student>>;
    fn course_catalog(&self) -> RepositoryResult<Option<CourseCatalog>>;
    fn hour_labels(&self) -> RepositoryResult<Option<HourLabels>>;
    fn grade_table(&self) -> RepositoryResult<Option<GradeTable>>;
}

pub trait SettingsRepository: Send + Sync {
    fn settings(&self) -> RepositoryResult<Option<Settings>>;
}

pub trait LedgerRepository: Send + Sync {
    fn payments_for_family(&self, id: FamilyId) -> RepositoryResult<Vec<Payment>>;
    fn adjustments_for_family(&self, id: FamilyId) -> RepositoryResult<Vec<BillAdjustment>>;
}

/// Everything the invoice service reads.
pub trait InvoiceRepository:
    FamilyRepository + EnrollmentRepository + SettingsRepository + LedgerRepository
{
}

impl<T> InvoiceRepository for T where
    T: FamilyRepository + EnrollmentRepository + SettingsRepository + LedgerRepository
{
}

impl<S> FamilyRepository for Arc<S>
where
    S: FamilyRepository + ?Sized,
{
    fn family(&self, id: FamilyId) -> RepositoryResult<Option<Family>> {
        (**self).family(id)
    }

    fn family_ids(&self) -> RepositoryResult<Vec<FamilyId>> {
        (**self).family_ids()
    }
}

impl<S> EnrollmentRepository for Arc<S>
where
    S: EnrollmentRepository + ?Sized,
{
    fn students_for_family(&self, id: FamilyId) -> RepositoryResult<Vec<Student>> {
        (**self).students_for_family(id)
    }

    fn course_catalog(&self) -> RepositoryResult<Option<CourseCatalog>> {
        (**self).course_catalog()
    }

    fn hour_labels(&self) -> RepositoryResult<Option<HourLabels>> {
        (**self).hour_labels()
    }

    fn grade_table(&self) -> RepositoryResult<Option<GradeTable>> {
        (**self).grade_table()
    }
}

impl<S> SettingsRepository for Arc<S>
where
    S: SettingsRepository + ?Sized,
{
    fn settings(&self) -> RepositoryResult<Option<Settings>> {
        (**self).settings()
    }
}

impl<S> LedgerRepository for Arc<S>
where
    S: LedgerRepository + ?Sized,
{
    fn payments_for_family(&self, id: FamilyId) -> RepositoryResult<Vec<Payment>> {
        (**self).payments_for_family(id)
    }

    fn adjustments_for_family(&self, id: FamilyId) -> RepositoryResult<Vec<BillAdjustment>> {
        (**self).adjustments_for_family(id)
    }
}
