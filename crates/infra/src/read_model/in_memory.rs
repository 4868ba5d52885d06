use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::{Deserialize, Serialize};

use coopbill_core::{Entity, FamilyId};
use coopbill_enrollment::{
    BillAdjustment, CourseCatalog, Family, GradeTable, HourLabels, Payment, Settings, Student,
};

use super::{
    EnrollmentRepository, FamilyRepository, LedgerRepository, RepositoryError, RepositoryResult,
    SettingsRepository,
};

/// A point-in-time export of everything the invoice engine reads.
///
/// This is also the on-disk format the CLI loads. Catalogs left out of the
/// document stay `None` so the engine can report them as missing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(default)]
    pub families: Vec<Family>,
    #[serde(default)]
    pub students: Vec<Student>,
    #[serde(default)]
    pub courses: Option<CourseCatalog>,
    #[serde(default)]
    pub hour_labels: Option<HourLabels>,
    #[serde(default)]
    pub grades: Option<GradeTable>,
    #[serde(default)]
    pub settings: Option<Settings>,
    #[serde(default)]
    pub payments: Vec<Payment>,
    #[serde(default)]
    pub adjustments: Vec<BillAdjustment>,
}

/// In-memory repository for tests, benches and snapshot files.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    inner: RwLock<Snapshot>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        Self {
            inner: RwLock::new(snapshot),
        }
    }

    /// Load a store from a JSON [`Snapshot`] document.
    pub fn from_json(json: &str) -> RepositoryResult<Self> {
        let snapshot: Snapshot =
            serde_json::from_str(json).map_err(|e| RepositoryError::Corrupt(e.to_string()))?;
        Ok(Self::from_snapshot(snapshot))
    }

    /// Copy of the current contents.
    pub fn snapshot(&self) -> RepositoryResult<Snapshot> {
        Ok(self.read()?.clone())
    }

    /// Insert a family, replacing any existing one with the same id in place.
    pub fn upsert_family(&self, family: Family) -> RepositoryResult<()> {
        let mut snapshot = self.write()?;
        match snapshot.families.iter_mut().find(|f| f.id == family.id) {
            Some(existing) => *existing = family,
            None => snapshot.families.push(family),
        }
        Ok(())
    }

    /// Drop a family record. Its students and ledger entries are left alone.
    pub fn remove_family(&self, id: FamilyId) -> RepositoryResult<bool> {
        let mut snapshot = self.write()?;
        let before = snapshot.families.len();
        snapshot.families.retain(|f| f.id != id);
        Ok(snapshot.families.len() != before)
    }

    pub fn add_student(&self, student: Student) -> RepositoryResult<()> {
        self.write()?.students.push(student);
        Ok(())
    }

    pub fn set_courses(&self, courses: CourseCatalog) -> RepositoryResult<()> {
        self.write()?.courses = Some(courses);
        Ok(())
    }

    pub fn set_hour_labels(&self, labels: HourLabels) -> RepositoryResult<()> {
        self.write()?.hour_labels = Some(labels);
        Ok(())
    }

    pub fn set_grade_table(&self, grades: GradeTable) -> RepositoryResult<()> {
        self.write()?.grades = Some(grades);
        Ok(())
    }

    pub fn set_settings(&self, settings: Settings) -> RepositoryResult<()> {
        self.write()?.settings = Some(settings);
        Ok(())
    }

    pub fn record_payment(&self, payment: Payment) -> RepositoryResult<()> {
        self.write()?.payments.push(payment);
        Ok(())
    }

    pub fn record_adjustment(&self, adjustment: BillAdjustment) -> RepositoryResult<()> {
        self.write()?.adjustments.push(adjustment);
        Ok(())
    }

    fn read(&self) -> RepositoryResult<RwLockReadGuard<'_, Snapshot>> {
        self.inner
            .read()
            .map_err(|_| RepositoryError::Unavailable("snapshot lock poisoned".to_string()))
    }

    fn write(&self) -> RepositoryResult<RwLockWriteGuard<'_, Snapshot>> {
        self.inner
            .write()
            .map_err(|_| RepositoryError::Unavailable("snapshot lock poisoned".to_string()))
    }
}

impl FamilyRepository for InMemoryStore {
    fn family(&self, id: FamilyId) -> RepositoryResult<Option<Family>> {
        let snapshot = self.read()?;
        Ok(snapshot.families.iter().find(|f| f.id == id).cloned())
    }

    fn family_ids(&self) -> RepositoryResult<Vec<FamilyId>> {
        let snapshot = self.read()?;
        Ok(snapshot.families.iter().map(Entity::id).collect())
    }
}

impl EnrollmentRepository for InMemoryStore {
    fn students_for_family(&self, id: FamilyId) -> RepositoryResult<Vec<Student>> {
        let snapshot = self.read()?;
        Ok(snapshot
            .students
            .iter()
            .filter(|s| s.family_id == id)
            .cloned()
            .collect())
    }

    fn course_catalog(&self) -> RepositoryResult<Option<CourseCatalog>> {
        Ok(self.read()?.courses.clone())
    }

    fn hour_labels(&self) -> RepositoryResult<Option<HourLabels>> {
        Ok(self.read()?.hour_labels.clone())
    }

    fn grade_table(&self) -> RepositoryResult<Option<GradeTable>> {
        Ok(self.read()?.grades.clone())
    }
}

impl SettingsRepository for InMemoryStore {
    fn settings(&self) -> RepositoryResult<Option<Settings>> {
        Ok(self.read()?.settings.clone())
    }
}

impl LedgerRepository for InMemoryStore {
    fn payments_for_family(&self, id: FamilyId) -> RepositoryResult<Vec<Payment>> {
        let snapshot = self.read()?;
        Ok(snapshot
            .payments
            .iter()
            .filter(|p| p.family_id == id)
            .cloned()
            .collect())
    }

    fn adjustments_for_family(&self, id: FamilyId) -> RepositoryResult<Vec<BillAdjustment>> {
        let snapshot = self.read()?;
        Ok(snapshot
            .adjustments
            .iter()
            .filter(|a| a.family_id == id)
            .cloned()
            .collect())
    }
}
