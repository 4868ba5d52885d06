use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use chrono::NaiveDate;
use coopbill_core::{FamilyId, Money, StudentId};
use coopbill_enrollment::settings::{BACKGROUND_FEE, PAYPAL_FIXED_RATE, PAYPAL_PERCENTAGE};
use coopbill_enrollment::{
    BillAdjustment, Course, CourseCatalog, Family, GradeTable, HourLabels, HourSlot, Payment,
    Settings, Student,
};
use coopbill_infra::{InMemoryStore, InvoiceService};
use coopbill_invoicing::{InvoiceOptions, TokenIndex, hash_for_family, resolve};

const FAMILY: FamilyId = FamilyId::new(1);

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 9, day).unwrap()
}

/// One family with `students` children, each taking a course in every slot.
fn store_with_students(students: i64) -> InMemoryStore {
    let store = InMemoryStore::new();
    store
        .upsert_family(Family::new(FAMILY, "Bench").with_background_check(true))
        .unwrap();

    let courses: Vec<Course> = HourSlot::ALL
        .iter()
        .map(|slot| {
            Course::new(format!("Course {}", slot.index()), Money::from(40))
                .with_book_rental(Money::from(5))
        })
        .collect();
    store.set_courses(CourseCatalog::new(courses)).unwrap();

    for i in 0..students {
        let mut student = Student::new(StudentId::new(i), FAMILY, format!("Kid{i}"), "Bench")
            .with_grad_year((2026 + i % 12).to_string());
        for slot in HourSlot::ALL {
            student = student.with_course(slot, format!("Course {}", slot.index()));
        }
        store.add_student(student).unwrap();
    }

    for day in 1..=10 {
        store
            .record_payment(Payment::new(FAMILY, Money::from(25), date(day)))
            .unwrap();
    }
    store
        .record_adjustment(BillAdjustment::new(FAMILY, Money::from(-15), date(2), "Volunteer credit"))
        .unwrap();

    store.set_hour_labels(HourLabels::new()).unwrap();
    store.set_grade_table(GradeTable::standard()).unwrap();
    store
        .set_settings(
            Settings::new()
                .with(BACKGROUND_FEE, "35")
                .with(PAYPAL_PERCENTAGE, "2.9")
                .with(PAYPAL_FIXED_RATE, "0.30"),
        )
        .unwrap();
    store
}

fn bench_family_invoice(c: &mut Criterion) {
    let mut group = c.benchmark_group("calculate_family_invoice");

    for students in [1_i64, 4, 12] {
        let service = InvoiceService::new(store_with_students(students));
        group.bench_with_input(BenchmarkId::new("students", students), &students, |b, _| {
            b.iter(|| {
                black_box(
                    service
                        .calculate_family_invoice(black_box(FAMILY), InvoiceOptions::with_surcharge())
                        .unwrap(),
                );
            });
        });
    }

    group.finish();
}

fn bench_token_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("token_lookup");
    group.throughput(Throughput::Elements(1));

    for families in [100_i64, 1_000, 10_000] {
        let ids: Vec<FamilyId> = (1..=families).map(FamilyId::new).collect();
        // Worst case for the scan: the last family.
        let token = hash_for_family(FamilyId::new(families));
        let index = TokenIndex::build(ids.iter().copied());

        group.bench_with_input(BenchmarkId::new("linear_scan", families), &token, |b, token| {
            b.iter(|| black_box(resolve(token, ids.iter().copied())));
        });
        group.bench_with_input(BenchmarkId::new("index", families), &token, |b, token| {
            b.iter(|| black_box(index.resolve(token)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_family_invoice, bench_token_lookup);
criterion_main!(benches);
