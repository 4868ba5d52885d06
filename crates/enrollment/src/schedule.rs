//! Per-family class schedule, the view behind the public schedule link.

use serde::{Deserialize, Serialize};

use coopbill_core::{FamilyId, StudentId};

use crate::course::HourLabels;
use crate::family::Family;
use crate::grade::GradeTable;
use crate::student::{HourSlot, Student, roster_order};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledHour {
    pub slot: HourSlot,
    pub label: String,
    /// `None` when the student has no course this hour.
    pub course: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentSchedule {
    pub student_id: StudentId,
    pub name: String,
    pub grade_code: Option<i32>,
    pub grade: Option<String>,
    pub hours: Vec<ScheduledHour>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FamilySchedule {
    pub family_id: FamilyId,
    pub family_name: String,
    pub students: Vec<StudentSchedule>,
}

/// Build the schedule for a family's active students, in roster order.
///
/// `school_year` drives grade derivation; without it every grade is unknown.
pub fn family_schedule(
    family: &Family,
    students: &[Student],
    labels: &HourLabels,
    grades: &GradeTable,
    school_year: Option<i32>,
) -> FamilySchedule {
    let students = roster_order(students)
        .into_iter()
        .map(|student| {
            let grade_code = school_year.and_then(|year| student.grade_code(year));
            let hours = student
                .hours
                .iter()
                .map(|(slot, course)| ScheduledHour {
                    slot,
                    label: labels.label(slot).to_string(),
                    course: course.map(str::to_string),
                })
                .collect();

            StudentSchedule {
                student_id: student.id,
                name: student.full_name(),
                grade_code,
                grade: grade_code.and_then(|code| grades.label(code)).map(str::to_string),
                hours,
            }
        })
        .collect();

    FamilySchedule {
        family_id: family.id,
        family_name: family.display_name(),
        students,
    }
}
