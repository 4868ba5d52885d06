use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use coopbill_core::Money;

use crate::student::HourSlot;

/// Catalog entry. Students reference courses by `course_name`, not by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub course_name: String,
    #[serde(default)]
    pub fee: Money,
    #[serde(default)]
    pub book_rental: Option<Money>,
    #[serde(default)]
    pub hour: i32,
    #[serde(default)]
    pub location: Option<String>,
}

impl Course {
    pub fn new(name: impl Into<String>, fee: Money) -> Self {
        Self {
            course_name: name.into(),
            fee,
            book_rental: None,
            hour: 0,
            location: None,
        }
    }

    pub fn with_book_rental(mut self, amount: Money) -> Self {
        self.book_rental = Some(amount);
        self
    }

    pub fn with_hour(mut self, hour: i32) -> Self {
        self.hour = hour;
        self
    }

    /// Fee to bill, if any. Zero and negative fees bill nothing.
    pub fn billable_fee(&self) -> Option<Money> {
        Some(self.fee).filter(|fee| fee.is_positive())
    }

    /// Book rental to bill, if any.
    pub fn billable_book_rental(&self) -> Option<Money> {
        self.book_rental.filter(|rental| rental.is_positive())
    }
}

/// The course catalog, indexed by exact course name.
///
/// If two courses share a name the first one listed wins, which is what a
/// linear "find by name" over the catalog would return.
#[derive(Debug, Clone, Default)]
pub struct CourseCatalog {
    courses: Vec<Course>,
    by_name: HashMap<String, usize>,
}

impl CourseCatalog {
    pub fn new(courses: Vec<Course>) -> Self {
        let mut by_name = HashMap::with_capacity(courses.len());
        for (idx, course) in courses.iter().enumerate() {
            by_name.entry(course.course_name.clone()).or_insert(idx);
        }
        Self { courses, by_name }
    }

    /// Exact, case-sensitive name match.
    pub fn find(&self, name: &str) -> Option<&Course> {
        self.by_name.get(name).map(|&idx| &self.courses[idx])
    }

    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    pub fn len(&self) -> usize {
        self.courses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }
}

impl FromIterator<Course> for CourseCatalog {
    fn from_iter<I: IntoIterator<Item = Course>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl Serialize for CourseCatalog {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.courses.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for CourseCatalog {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Vec::<Course>::deserialize(deserializer).map(Self::new)
    }
}

/// Display labels for the hour slots, keyed by slot index (0 = math).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HourLabels(BTreeMap<usize, String>);

impl HourLabels {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_label(mut self, slot: HourSlot, label: impl Into<String>) -> Self {
        self.0.insert(slot.index(), label.into());
        self
    }

    /// Label for `slot`, falling back to the slot's built-in name.
    pub fn label(&self, slot: HourSlot) -> &str {
        self.0
            .get(&slot.index())
            .map(String::as_str)
            .unwrap_or_else(|| slot.default_label())
    }
}

impl FromIterator<(HourSlot, String)> for HourLabels {
    fn from_iter<I: IntoIterator<Item = (HourSlot, String)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(slot, label)| (slot.index(), label)).collect())
    }
}
