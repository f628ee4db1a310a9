use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use matrisk::dataset::{Dataset, PatientRecord, RiskCategory};
use matrisk::ml::ClassifierKind;
use matrisk::pipeline::{TrainingOptions, predict_risk, train_model};
use ndarray::Array2;

const ROWS: usize = 1_000;

/// Deterministic three-band dataset roughly the size of the public maternal risk CSV.
fn synthetic_dataset(rows: usize) -> Dataset {
    let mut flat = Vec::with_capacity(rows * 6);
    let mut target = Vec::with_capacity(rows);
    for i in 0..rows {
        let band = (i % 3) as f32;
        let wobble = ((i * 7919) % 13) as f32;
        flat.extend_from_slice(&[
            18.0 + band * 12.0 + wobble,
            95.0 + band * 25.0 + wobble,
            60.0 + band * 18.0 + wobble * 0.5,
            6.0 + band * 2.5 + wobble * 0.1,
            36.5 + band * 0.8,
            65.0 + band * 10.0 + wobble,
        ]);
        target.push(RiskCategory::ALL[i % 3]);
    }
    Dataset {
        features: Array2::from_shape_vec((rows, 6), flat).expect("shape"),
        target,
    }
}

fn bench_training(c: &mut Criterion) {
    let dataset = synthetic_dataset(ROWS);
    for classifier in [ClassifierKind::RandomForest, ClassifierKind::GbdtStump] {
        let options = TrainingOptions {
            classifier,
            ..TrainingOptions::default()
        };
        c.bench_with_input(
            BenchmarkId::new("train", classifier.to_string()),
            &options,
            |b, options| b.iter(|| train_model(black_box(&dataset), options).expect("train")),
        );
    }
}

fn bench_prediction(c: &mut Criterion) {
    let model = train_model(&synthetic_dataset(ROWS), &TrainingOptions::default()).expect("train");
    let record = PatientRecord::default();
    c.bench_function("predict_one_record", |b| {
        b.iter(|| predict_risk(Some(&model), black_box(&record)).expect("predict"))
    });
}

criterion_group!(benches, bench_training, bench_prediction);
criterion_main!(benches);
