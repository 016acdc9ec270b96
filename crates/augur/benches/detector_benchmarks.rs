//! Insight detector performance benchmarks.
//!
//! Measures each detector in isolation and the full detection pass.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use augur::inference::TypeInference;
use augur::input::DataTable;
use augur::insight::{
    run_detectors, AnomalyDetector, CorrelationDetector, Detector, PredictionDetector,
    RecommendationDetector, SummaryDetector, TrendDetector, DEFAULT_KINDS,
};
use augur::schema::DatasetSnapshot;
use augur::InsightType;

/// Build a typed snapshot with numeric, date, and categorical columns.
fn generate_snapshot(rows: usize) -> DatasetSnapshot {
    let headers = vec![
        "date".to_string(),
        "revenue".to_string(),
        "cost".to_string(),
        "region".to_string(),
    ];

    let regions = ["North", "South", "East", "West"];
    let mut data_rows = Vec::with_capacity(rows);
    for row in 0..rows {
        // Correlated revenue and cost with periodic outliers
        let revenue = if row % 97 == 0 {
            50_000.0
        } else {
            1_000.0 + row as f64 * 3.5
        };
        let cost = 400.0 + row as f64 * 1.4;
        data_rows.push(vec![
            format!("2023-{:02}-{:02}", (row % 12) + 1, (row % 28) + 1),
            format!("{:.2}", revenue),
            format!("{:.2}", cost),
            regions[row % regions.len()].to_string(),
        ]);
    }

    let table = DataTable::new(headers, data_rows);
    let columns = TypeInference::new().infer_schema(&table);
    DatasetSnapshot::build(&table, columns)
}

/// Benchmark each detector against the same snapshot.
fn bench_individual_detectors(c: &mut Criterion) {
    let mut group = c.benchmark_group("individual_detectors");
    let snapshot = generate_snapshot(1_000);

    group.bench_function("summary", |b| {
        let detector = SummaryDetector;
        b.iter(|| black_box(detector.detect(&snapshot)))
    });

    group.bench_function("anomaly", |b| {
        let detector = AnomalyDetector;
        b.iter(|| black_box(detector.detect(&snapshot)))
    });

    group.bench_function("trend", |b| {
        let detector = TrendDetector;
        b.iter(|| black_box(detector.detect(&snapshot)))
    });

    group.bench_function("correlation", |b| {
        let detector = CorrelationDetector;
        b.iter(|| black_box(detector.detect(&snapshot)))
    });

    group.bench_function("prediction", |b| {
        let detector = PredictionDetector;
        b.iter(|| black_box(detector.detect(&snapshot)))
    });

    group.bench_function("recommendation", |b| {
        let detector = RecommendationDetector;
        b.iter(|| black_box(detector.detect(&snapshot)))
    });

    group.finish();
}

/// Benchmark the default detection pass at various dataset sizes.
fn bench_default_pass(c: &mut Criterion) {
    let mut group = c.benchmark_group("default_pass");

    for rows in [100, 1_000, 10_000].iter() {
        let snapshot = generate_snapshot(*rows);

        group.bench_with_input(BenchmarkId::new("rows", rows), &snapshot, |b, snapshot| {
            b.iter(|| black_box(run_detectors(snapshot, DEFAULT_KINDS)))
        });
    }

    group.finish();
}

/// Benchmark a full pass with every detector enabled.
fn bench_all_detectors(c: &mut Criterion) {
    let mut group = c.benchmark_group("all_detectors");
    let snapshot = generate_snapshot(1_000);

    let all_kinds = [
        InsightType::Summary,
        InsightType::Anomaly,
        InsightType::Trend,
        InsightType::Correlation,
        InsightType::Prediction,
        InsightType::Recommendation,
    ];

    group.bench_function("rows_1000", |b| {
        b.iter(|| black_box(run_detectors(&snapshot, &all_kinds)))
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_individual_detectors,
    bench_default_pass,
    bench_all_detectors,
);
criterion_main!(benches);
