//! Performance benchmarks for the Technician Pay Distribution Engine.
//!
//! This benchmark suite tracks the cost of:
//! - A single job computed directly through the pipeline
//! - A job pay request through the HTTP router
//! - Period reports over snapshots of growing size
//!
//! Run with: `cargo bench`
//! HTML reports are generated in `target/criterion/`

use chrono::{Days, NaiveDate};
use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use rust_decimal::Decimal;

use tech_pay_engine::api::{AppState, create_router};
use tech_pay_engine::calculation::PayEngine;
use tech_pay_engine::config::ConfigLoader;
use tech_pay_engine::models::{
    EntryStatus, Job, JobStatus, ReportingPeriod, Technician, TechnicianStatus, TimeEntry,
};
use tech_pay_engine::source::Snapshot;

use axum::{body::Body, http::Request};
use tower::ServiceExt;

fn load_config() -> ConfigLoader {
    ConfigLoader::load("./config/default").expect("Failed to load config")
}

fn period_start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 3).unwrap()
}

/// Creates a snapshot of `job_count` jobs, each worked by three of ten
/// technicians over two days.
fn create_snapshot(job_count: u64) -> Snapshot {
    let technicians = (1..=10)
        .map(|id| Technician {
            id,
            name: format!("Technician {:02}", id),
            min_pay: Decimal::new(1800 + id as i64 * 150, 2),
            status: TechnicianStatus::Active,
        })
        .collect();

    let jobs = (1..=job_count)
        .map(|id| Job {
            id,
            ticket_number: Some(format!("BENCH-{:05}", id)),
            description: format!("Benchmark job {}", id),
            client_name: None,
            billing_amount: Some(Decimal::new(80_000 + id as i64 * 1_000, 2)),
            expenses: Some(Decimal::new(12_500, 2)),
            commissions: Some(Decimal::new(4_000, 2)),
            status: JobStatus::Completed,
        })
        .collect();

    let mut time_entries = Vec::new();
    for job_id in 1..=job_count {
        for offset in 0..3 {
            let tech_id = (job_id + offset) % 10 + 1;
            for day in 0..2 {
                time_entries.push(TimeEntry {
                    id: time_entries.len() as u64 + 1,
                    job_id,
                    tech_id: Some(tech_id),
                    date_worked: period_start() + Days::new((job_id % 20) + day),
                    hours_worked: Some(Decimal::new(300 + offset as i64 * 125, 2)),
                    mileage: Decimal::from(15 + offset * 10),
                    personal_expenses: Decimal::ZERO,
                    per_diem: Decimal::new(2_500, 2),
                    status: EntryStatus::Verified,
                    notes: None,
                });
            }
        }
    }

    Snapshot {
        jobs,
        technicians,
        time_entries,
    }
}

/// Benchmark: One job straight through the pipeline.
fn bench_single_job(c: &mut Criterion) {
    let loader = load_config();
    let snapshot = create_snapshot(1);

    c.bench_function("single_job", |b| {
        b.iter(|| {
            let engine = PayEngine::new(black_box(&snapshot), loader.config());
            black_box(engine.compute_job_pay(1))
        })
    });
}

/// Benchmark: One job pay request through the router.
fn bench_job_request(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let router = create_router(AppState::new(load_config()));
    let body = serde_json::json!({ "job_id": 1, "snapshot": create_snapshot(1) }).to_string();

    c.bench_function("job_request", |b| {
        b.to_async(&rt).iter(|| async {
            let router = router.clone();
            let response = router
                .oneshot(
                    Request::builder()
                        .method("POST")
                        .uri("/pay/job")
                        .header("Content-Type", "application/json")
                        .body(Body::from(body.clone()))
                        .unwrap(),
                )
                .await
                .unwrap();
            black_box(response)
        })
    });
}

/// Benchmark: Period reports to see how they scale with job count.
fn bench_period_scaling(c: &mut Criterion) {
    let loader = load_config();
    let period = ReportingPeriod::between(
        period_start(),
        period_start() + Days::new(30),
    );

    let mut group = c.benchmark_group("period_summary");

    for job_count in [10u64, 100, 500] {
        let snapshot = create_snapshot(job_count);

        group.throughput(Throughput::Elements(job_count));
        group.bench_with_input(BenchmarkId::new("jobs", job_count), &snapshot, |b, snapshot| {
            b.iter(|| {
                let engine = PayEngine::new(snapshot, loader.config());
                black_box(engine.compute_period_summary(&period, None))
            })
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_single_job,
    bench_job_request,
    bench_period_scaling,
);
criterion_main!(benches);
