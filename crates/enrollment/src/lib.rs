//! Enrollment snapshot model (families, students, courses, settings, payments).
//!
//! These are the read-only shapes the persistence layer hands to the invoice
//! engine, plus the pure derivations over them (roster order, grades,
//! schedules). Nothing here performs IO.

pub mod course;
pub mod family;
pub mod grade;
pub mod ledger;
pub mod schedule;
pub mod settings;
pub mod student;

pub use course::{Course, CourseCatalog, HourLabels};
pub use family::Family;
pub use grade::GradeTable;
pub use ledger::{BillAdjustment, Payment};
pub use schedule::{FamilySchedule, ScheduledHour, StudentSchedule, family_schedule};
pub use settings::{Settings, SurchargeRate};
pub use student::{HourSlot, HourSlots, NO_COURSE, Student, roster_order};
