use core::cmp::Reverse;

use serde::{Deserialize, Deserializer, Serialize};

use coopbill_core::{Entity, FamilyId, StudentId};

/// Slot value the schedule editor writes for "not enrolled this hour".
pub const NO_COURSE: &str = "NO_COURSE";

/// Offset of the grade-code rule: `school_year - graduation_year + 13`.
pub const GRADE_CODE_OFFSET: i32 = 13;

/// One of the seven fixed teaching periods, in billing/schedule order.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HourSlot {
    Math,
    First,
    Second,
    Third,
    Fourth,
    FifthFall,
    FifthSpring,
}

impl HourSlot {
    pub const ALL: [HourSlot; 7] = [
        HourSlot::Math,
        HourSlot::First,
        HourSlot::Second,
        HourSlot::Third,
        HourSlot::Fourth,
        HourSlot::FifthFall,
        HourSlot::FifthSpring,
    ];

    /// Position of the slot in [`HourSlot::ALL`], also the catalog's hour number.
    pub const fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Label used when the hour-label table has no entry for this slot.
    pub const fn default_label(self) -> &'static str {
        match self {
            HourSlot::Math => "Math",
            HourSlot::First => "1st Hour",
            HourSlot::Second => "2nd Hour",
            HourSlot::Third => "3rd Hour",
            HourSlot::Fourth => "4th Hour",
            HourSlot::FifthFall => "5th Hour (Fall)",
            HourSlot::FifthSpring => "5th Hour (Spring)",
        }
    }
}

/// A student's course selection for each hour.
///
/// Each field holds a course *name* (the catalog join key), the
/// [`NO_COURSE`] sentinel, or nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HourSlots {
    #[serde(default)]
    pub math_hour: Option<String>,
    #[serde(default)]
    pub first_hour: Option<String>,
    #[serde(default)]
    pub second_hour: Option<String>,
    #[serde(default)]
    pub third_hour: Option<String>,
    #[serde(default)]
    pub fourth_hour: Option<String>,
    #[serde(default)]
    pub fifth_hour_fall: Option<String>,
    #[serde(default)]
    pub fifth_hour_spring: Option<String>,
}

impl HourSlots {
    fn raw(&self, slot: HourSlot) -> Option<&str> {
        let value = match slot {
            HourSlot::Math => &self.math_hour,
            HourSlot::First => &self.first_hour,
            HourSlot::Second => &self.second_hour,
            HourSlot::Third => &self.third_hour,
            HourSlot::Fourth => &self.fourth_hour,
            HourSlot::FifthFall => &self.fifth_hour_fall,
            HourSlot::FifthSpring => &self.fifth_hour_spring,
        };
        value.as_deref()
    }

    fn raw_mut(&mut self, slot: HourSlot) -> &mut Option<String> {
        match slot {
            HourSlot::Math => &mut self.math_hour,
            HourSlot::First => &mut self.first_hour,
            HourSlot::Second => &mut self.second_hour,
            HourSlot::Third => &mut self.third_hour,
            HourSlot::Fourth => &mut self.fourth_hour,
            HourSlot::FifthFall => &mut self.fifth_hour_fall,
            HourSlot::FifthSpring => &mut self.fifth_hour_spring,
        }
    }

    /// The course name in `slot`, if it holds a real course.
    ///
    /// Empty values and the [`NO_COURSE`] sentinel are "no course". The name is
    /// returned untrimmed; catalog lookup is exact.
    pub fn course(&self, slot: HourSlot) -> Option<&str> {
        self.raw(slot)
            .filter(|name| !name.trim().is_empty() && *name != NO_COURSE)
    }

    pub fn set(&mut self, slot: HourSlot, course: impl Into<String>) {
        *self.raw_mut(slot) = Some(course.into());
    }

    /// Every slot with its course (if any), in fixed slot order.
    pub fn iter(&self) -> impl Iterator<Item = (HourSlot, Option<&str>)> + '_ {
        HourSlot::ALL.into_iter().map(|slot| (slot, self.course(slot)))
    }
}

/// An enrolled student. Belongs to exactly one family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: StudentId,
    pub family_id: FamilyId,
    pub first_name: String,
    pub last_name: String,
    /// Graduation year as stored; may be missing or garbage.
    #[serde(default, deserialize_with = "string_or_number")]
    pub grad_year: Option<String>,
    #[serde(default)]
    pub inactive: bool,
    #[serde(flatten)]
    pub hours: HourSlots,
}

impl Student {
    pub fn new(
        id: StudentId,
        family_id: FamilyId,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        Self {
            id,
            family_id,
            first_name: first_name.into(),
            last_name: last_name.into(),
            grad_year: None,
            inactive: false,
            hours: HourSlots::default(),
        }
    }

    pub fn with_grad_year(mut self, year: impl Into<String>) -> Self {
        self.grad_year = Some(year.into());
        self
    }

    pub fn with_course(mut self, slot: HourSlot, course: impl Into<String>) -> Self {
        self.hours.set(slot, course);
        self
    }

    pub fn inactive(mut self) -> Self {
        self.inactive = true;
        self
    }

    pub fn is_active(&self) -> bool {
        !self.inactive
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Parsed graduation year, `None` if missing or unparsable.
    pub fn graduation_year(&self) -> Option<i32> {
        self.grad_year.as_deref()?.trim().parse().ok()
    }

    /// `school_year - graduation_year + 13`.
    pub fn grade_code(&self, school_year: i32) -> Option<i32> {
        self.graduation_year()
            .map(|grad| school_year - grad + GRADE_CODE_OFFSET)
    }

    /// Key for roster order: graduation year descending (unparsable as 0, so
    /// last), then last name, first name, id ascending.
    fn roster_key(&self) -> (Reverse<i32>, &str, &str, StudentId) {
        (
            Reverse(self.graduation_year().unwrap_or(0)),
            self.last_name.as_str(),
            self.first_name.as_str(),
            self.id,
        )
    }
}

impl Entity for Student {
    type Id = StudentId;

    fn id(&self) -> StudentId {
        self.id
    }
}

/// Active students in roster order (youngest first).
///
/// Inactive students are dropped here and nowhere else. Input order is never
/// trusted.
pub fn roster_order(students: &[Student]) -> Vec<&Student> {
    let mut roster: Vec<&Student> = students.iter().filter(|s| s.is_active()).collect();
    roster.sort_by(|a, b| a.roster_key().cmp(&b.roster_key()));
    roster
}

fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Int(i64),
        Float(f64),
    }

    Ok(Option::<Raw>::deserialize(deserializer)?.map(|raw| match raw {
        Raw::Text(s) => s,
        Raw::Int(n) => n.to_string(),
        Raw::Float(n) => n.to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn student(id: i64, first: &str, last: &str, grad: Option<&str>) -> Student {
        let s = Student::new(StudentId::new(id), FamilyId::new(1), first, last);
        match grad {
            Some(year) => s.with_grad_year(year),
            None => s,
        }
    }

    #[test]
    fn sentinel_and_blank_slots_hold_no_course() {
        let s = student(1, "Ada", "Lovelace", Some("2030"))
            .with_course(HourSlot::Math, "Algebra")
            .with_course(HourSlot::First, NO_COURSE)
            .with_course(HourSlot::Second, "   ");

        assert_eq!(s.hours.course(HourSlot::Math), Some("Algebra"));
        assert_eq!(s.hours.course(HourSlot::First), None);
        assert_eq!(s.hours.course(HourSlot::Second), None);
        assert_eq!(s.hours.course(HourSlot::FifthSpring), None);

        let slots: Vec<HourSlot> = s.hours.iter().map(|(slot, _)| slot).collect();
        assert_eq!(slots, HourSlot::ALL.to_vec());
    }

    #[test]
    fn grade_code_uses_offset_thirteen() {
        let s = student(1, "Ada", "Lovelace", Some("2030"));
        assert_eq!(s.grade_code(2024), Some(7));
        assert_eq!(s.grade_code(2030), Some(13));

        let unknown = student(2, "Bo", "Lovelace", Some("soon"));
        assert_eq!(unknown.grade_code(2024), None);
    }

    #[test]
    fn roster_sorts_youngest_first_and_drops_inactive() {
        let students = vec![
            student(1, "Zed", "Adams", Some("2028")),
            student(2, "Amy", "Baker", None),
            student(3, "Cal", "Adams", Some("2032")),
            student(4, "Ann", "Adams", Some("2028")),
            student(5, "Old", "Adams", Some("2035")).inactive(),
            student(6, "Eve", "adams", Some("2028")),
        ];

        let order: Vec<i64> = roster_order(&students).iter().map(|s| s.id.get()).collect();
        // 2032, then 2028 block by last name (ordinal: "Adams" < "adams"), then first name, then missing year.
        assert_eq!(order, vec![3, 4, 1, 6, 2]);
    }

    #[test]
    fn deserializes_collaborator_shape() {
        let json = r#"{
            "id": 11, "familyId": 7, "firstName": "Ada", "lastName": "Lovelace",
            "gradYear": 2030, "inactive": false,
            "mathHour": "Algebra", "firstHour": "NO_COURSE", "secondHour": null
        }"#;
        let s: Student = serde_json::from_str(json).unwrap();

        assert_eq!(s.grad_year.as_deref(), Some("2030"));
        assert_eq!(s.hours.course(HourSlot::Math), Some("Algebra"));
        assert_eq!(s.hours.course(HourSlot::First), None);
        assert_eq!(s.hours.fifth_hour_fall, None);
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: roster order does not depend on input order.
        #[test]
        fn roster_order_ignores_input_order(
            years in prop::collection::vec(prop::option::of(2020i32..2040), 1..8),
            seed in any::<u64>(),
        ) {
            let students: Vec<Student> = years
                .iter()
                .enumerate()
                .map(|(i, y)| {
                    let year = y.map(|y| y.to_string());
                    student(i as i64, "Kid", if i % 2 == 0 { "Ames" } else { "Boyd" }, year.as_deref())
                })
                .collect();

            let mut shuffled = students.clone();
            // Deterministic rotation + reversal derived from the seed.
            let len = shuffled.len();
            shuffled.rotate_left((seed as usize) % len);
            if seed % 2 == 0 {
                shuffled.reverse();
            }

            let a: Vec<StudentId> = roster_order(&students).iter().map(|s| s.id).collect();
            let b: Vec<StudentId> = roster_order(&shuffled).iter().map(|s| s.id).collect();
            prop_assert_eq!(a, b);
        }
    }
}
