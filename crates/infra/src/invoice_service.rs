//! Invoice orchestration over a repository.
//!
//! `InvoiceService` is the seam an HTTP layer (or the CLI) calls. It fetches a
//! consistent snapshot for one family from an [`InvoiceRepository`], then hands
//! it to the pure engine in `coopbill-invoicing`:
//!
//! ```text
//! family id ──repository──▶ snapshot ──calculate_invoice──▶ InvoiceResult
//! token ──TokenIndex──▶ family id ──(as above)
//! ```
//!
//! The service holds no business logic of its own. Precondition checks happen
//! in the engine; the service only decides what to fetch and logs the outcome.

use std::sync::RwLock;

use thiserror::Error;
use tracing::{debug, warn};

use coopbill_core::{DomainError, FamilyId, MissingInput};
use coopbill_enrollment::{FamilySchedule, family_schedule};
use coopbill_invoicing::{
    FamilyToken, InvoiceInputs, InvoiceOptions, InvoiceResult, TokenIndex, calculate_invoice,
    hash_for_family,
};

use crate::read_model::{InvoiceRepository, RepositoryError};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl ServiceError {
    /// Unknown token or family; a public endpoint maps this to 404.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ServiceError::Domain(DomainError::NotFound))
    }

    /// Required data missing from the snapshot; an operator problem, not a caller one.
    pub fn is_precondition(&self) -> bool {
        matches!(self, ServiceError::Domain(e) if e.is_precondition())
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug)]
pub struct InvoiceService<R> {
    repo: R,
    tokens: RwLock<Option<TokenIndex>>,
}

impl<R> InvoiceService<R> {
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            tokens: RwLock::new(None),
        }
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    pub fn into_inner(self) -> R {
        self.repo
    }
}

impl<R> InvoiceService<R>
where
    R: InvoiceRepository,
{
    /// Compute the current invoice for one family.
    #[tracing::instrument(skip(self))]
    pub fn calculate_family_invoice(
        &self,
        family_id: FamilyId,
        options: InvoiceOptions,
    ) -> ServiceResult<InvoiceResult> {
        let family = self.repo.family(family_id)?;
        let students = self.repo.students_for_family(family_id)?;
        let courses = self.repo.course_catalog()?;
        let hour_labels = self.repo.hour_labels()?;
        let settings = self.repo.settings()?;
        let adjustments = self.repo.adjustments_for_family(family_id)?;
        let payments = self.repo.payments_for_family(family_id)?;

        let inputs = InvoiceInputs {
            family: family.as_ref(),
            students: &students,
            courses: courses.as_ref(),
            hour_labels: hour_labels.as_ref(),
            settings: settings.as_ref(),
            adjustments: &adjustments,
            payments: &payments,
        };

        match calculate_invoice(family_id, inputs, options) {
            Ok(result) => {
                debug!(
                    balance = %result.balance(),
                    status = %result.payment_status(),
                    "family invoice ready"
                );
                Ok(result)
            }
            Err(err) => {
                if err.is_precondition() {
                    warn!(error = %err, "cannot compute invoice");
                }
                Err(err.into())
            }
        }
    }

    /// Public invoice link: resolve `token` to a family, then compute its invoice.
    ///
    /// Tokens that are malformed or match no family are both `NotFound`.
    #[tracing::instrument(skip(self))]
    pub fn calculate_invoice_for_token(
        &self,
        token: &str,
        options: InvoiceOptions,
    ) -> ServiceResult<InvoiceResult> {
        let family_id = self.resolve_token(token)?;
        self.calculate_family_invoice(family_id, options)
    }

    /// The class schedule for a family's active students.
    #[tracing::instrument(skip(self))]
    pub fn family_schedule(&self, family_id: FamilyId) -> ServiceResult<FamilySchedule> {
        let family = self
            .repo
            .family(family_id)?
            .ok_or(DomainError::missing(MissingInput::Family(family_id)))
            .inspect_err(|err| warn!(error = %err, "cannot build schedule"))?;
        let settings = self
            .repo
            .settings()?
            .ok_or(DomainError::missing(MissingInput::Settings))
            .inspect_err(|err| warn!(error = %err, "cannot build schedule"))?;
        let labels = self
            .repo
            .hour_labels()?
            .ok_or(DomainError::missing(MissingInput::HourLabels))
            .inspect_err(|err| warn!(error = %err, "cannot build schedule"))?;
        let grades = self
            .repo
            .grade_table()?
            .ok_or(DomainError::missing(MissingInput::GradeTable))
            .inspect_err(|err| warn!(error = %err, "cannot build schedule"))?;
        let students = self.repo.students_for_family(family_id)?;

        let school_year = settings.school_year();
        if school_year.is_none() {
            debug!("school year not set; grades left blank");
        }

        Ok(family_schedule(
            &family,
            &students,
            &labels,
            &grades,
            school_year,
        ))
    }

    /// The public token for a known family.
    pub fn token_for_family(&self, family_id: FamilyId) -> ServiceResult<FamilyToken> {
        if self.repo.family(family_id)?.is_none() {
            return Err(DomainError::not_found().into());
        }
        Ok(hash_for_family(family_id))
    }

    fn resolve_token(&self, token: &str) -> ServiceResult<FamilyId> {
        let token: FamilyToken = match token.parse() {
            Ok(token) => token,
            Err(_) => {
                debug!("malformed invoice token");
                return Err(DomainError::not_found().into());
            }
        };

        if let Some(id) = self.cached_lookup(&token) {
            if self.repo.family(id)?.is_some() {
                return Ok(id);
            }
            debug!(family_id = %id, "cached token points at a removed family");
        }

        // Miss or stale hit: the family set changed since the index was built.
        let index = TokenIndex::build(self.repo.family_ids()?);
        let found = index.resolve(&token);
        if let Ok(mut slot) = self.tokens.write() {
            *slot = Some(index);
        }

        found.ok_or_else(|| {
            debug!(token = %token, "invoice token matched no family");
            DomainError::not_found().into()
        })
    }

    fn cached_lookup(&self, token: &FamilyToken) -> Option<FamilyId> {
        let guard = self.tokens.read().ok()?;
        guard.as_ref()?.resolve(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use chrono::NaiveDate;
    use coopbill_core::{Money, StudentId};
    use coopbill_enrollment::settings::{BACKGROUND_FEE, FAMILY_FEE, SCHOOL_YEAR, STUDENT_FEE};
    use coopbill_enrollment::{
        Course, CourseCatalog, Family, GradeTable, HourLabels, HourSlot, Payment, Settings, Student,
    };
    use coopbill_invoicing::PaymentStatus;
    use rust_decimal_macros::dec;

    use crate::read_model::InMemoryStore;

    fn seeded_store() -> InMemoryStore {
        let store = InMemoryStore::new();
        let id = FamilyId::new(7);
        store
            .upsert_family(Family::new(id, "Example").with_background_check(true))
            .unwrap();
        store
            .add_student(
                Student::new(StudentId::new(1), id, "Sam", "Example")
                    .with_grad_year("2030")
                    .with_course(HourSlot::Math, "Algebra"),
            )
            .unwrap();
        store
            .set_courses(CourseCatalog::new(vec![
                Course::new("Algebra", Money::from(50)).with_book_rental(Money::from(10)),
            ]))
            .unwrap();
        store.set_hour_labels(HourLabels::new()).unwrap();
        store.set_grade_table(GradeTable::standard()).unwrap();
        store
            .set_settings(
                Settings::new()
                    .with(FAMILY_FEE, "20")
                    .with(BACKGROUND_FEE, "35")
                    .with(STUDENT_FEE, "20")
                    .with(SCHOOL_YEAR, "2024"),
            )
            .unwrap();
        store
            .record_payment(Payment::new(
                id,
                Money::from(100),
                NaiveDate::from_ymd_opt(2024, 9, 1).unwrap(),
            ))
            .unwrap();
        store
    }

    #[test]
    fn computes_invoice_from_repository() {
        let service = InvoiceService::new(seeded_store());
        let result = service
            .calculate_family_invoice(FamilyId::new(7), InvoiceOptions::default())
            .unwrap();

        assert_eq!(result.adjusted_total(), Money::from(dec!(135.00)));
        assert_eq!(result.balance(), Money::from(dec!(35.00)));
        assert_eq!(result.payment_status(), PaymentStatus::Partial);
    }

    #[test]
    fn unknown_family_is_a_precondition_failure() {
        let service = InvoiceService::new(seeded_store());
        let err = service
            .calculate_family_invoice(FamilyId::new(8), InvoiceOptions::default())
            .unwrap_err();

        assert!(err.is_precondition());
        assert!(!err.is_not_found());
    }

    #[test]
    fn token_round_trips_through_the_service() {
        let service = InvoiceService::new(seeded_store());
        let token = service.token_for_family(FamilyId::new(7)).unwrap();
        assert_eq!(token.as_str(), "7902699b");

        let via_token = service
            .calculate_invoice_for_token(token.as_str(), InvoiceOptions::default())
            .unwrap();
        let direct = service
            .calculate_family_invoice(FamilyId::new(7), InvoiceOptions::default())
            .unwrap();
        assert_eq!(via_token, direct);
    }

    #[test]
    fn bad_tokens_are_not_found() {
        let service = InvoiceService::new(seeded_store());
        for token in ["", "xyz", "7902699B", "00000000"] {
            let err = service
                .calculate_invoice_for_token(token, InvoiceOptions::default())
                .unwrap_err();
            assert!(err.is_not_found(), "token {token:?}");
        }
        assert!(service.token_for_family(FamilyId::new(8)).unwrap_err().is_not_found());
    }

    #[test]
    fn index_picks_up_families_added_later() {
        let store = Arc::new(seeded_store());
        let service = InvoiceService::new(Arc::clone(&store));
        let first = service.token_for_family(FamilyId::new(7)).unwrap();
        service
            .calculate_invoice_for_token(first.as_str(), InvoiceOptions::default())
            .unwrap();

        store.upsert_family(Family::new(FamilyId::new(1), "Later")).unwrap();
        let later = service
            .calculate_invoice_for_token("6b86b273", InvoiceOptions::default())
            .unwrap();
        assert_eq!(later.family_id(), FamilyId::new(1));
        assert_eq!(later.adjusted_total(), Money::from(20));
        assert_eq!(later.payment_status(), PaymentStatus::Unpaid);
    }

    #[test]
    fn removed_family_token_is_not_found() {
        let store = Arc::new(seeded_store());
        let service = InvoiceService::new(Arc::clone(&store));
        service
            .calculate_invoice_for_token("7902699b", InvoiceOptions::default())
            .unwrap();

        store.remove_family(FamilyId::new(7)).unwrap();
        let err = service
            .calculate_invoice_for_token("7902699b", InvoiceOptions::default())
            .unwrap_err();
        assert!(err.is_not_found(), "{err}");
        assert!(!err.is_precondition());

        // Added back, it resolves again.
        store.upsert_family(Family::new(FamilyId::new(7), "Example")).unwrap();
        let result = service
            .calculate_invoice_for_token("7902699b", InvoiceOptions::default())
            .unwrap();
        assert_eq!(result.family_id(), FamilyId::new(7));
    }

    #[test]
    fn schedule_lists_grades_and_hours() {
        let service = InvoiceService::new(seeded_store());
        let schedule = service.family_schedule(FamilyId::new(7)).unwrap();

        assert_eq!(schedule.family_name, "Example Family");
        let student = &schedule.students[0];
        assert_eq!(student.grade.as_deref(), Some("7th"));
        assert_eq!(student.hours.len(), 7);
        assert_eq!(student.hours[0].course.as_deref(), Some("Algebra"));
    }

    #[test]
    fn schedule_requires_grade_table() {
        let store = seeded_store();
        let mut snapshot = store.snapshot().unwrap();
        snapshot.grades = None;
        let service = InvoiceService::new(InMemoryStore::from_snapshot(snapshot));

        let err = service.family_schedule(FamilyId::new(7)).unwrap_err();
        assert_eq!(
            err,
            ServiceError::Domain(DomainError::Precondition(MissingInput::GradeTable))
        );
    }
}
