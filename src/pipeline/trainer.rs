//! Seeded 80/20 split, single fit, held-out evaluation.

use ndarray::Axis;
use serde::{Deserialize, Serialize};

use super::error::TrainingError;
use crate::dataset::{Dataset, RiskCategory};
use crate::ml::forest::{ForestOptions, RandomForest};
use crate::ml::gbdt_stump::{BoostingOptions, GbdtStump};
use crate::ml::metrics::{ConfusionMatrix, PerClassStats, accuracy, precision_recall_by_class};
use crate::ml::split::train_test_indices;
use crate::ml::{Classifier, ClassifierKind, TrainedClassifier};

/// Training knobs; stored under `[training]` in the config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingOptions {
    /// Seed for both the split and the classifier.
    pub seed: u64,
    /// Share of rows held out for evaluation.
    pub test_fraction: f32,
    pub classifier: ClassifierKind,
    pub forest: ForestOptions,
    pub boosting: BoostingOptions,
}

impl Default for TrainingOptions {
    fn default() -> Self {
        Self {
            seed: 42,
            test_fraction: 0.2,
            classifier: ClassifierKind::default(),
            forest: ForestOptions::default(),
            boosting: BoostingOptions::default(),
        }
    }
}

impl TrainingOptions {
    /// Clamp out-of-range values read from disk.
    pub fn normalized(self) -> Self {
        let test_fraction = if self.test_fraction.is_finite() {
            self.test_fraction.clamp(0.05, 0.5)
        } else {
            Self::default().test_fraction
        };
        Self {
            seed: self.seed,
            test_fraction,
            classifier: self.classifier,
            forest: self.forest.normalized(),
            boosting: self.boosting.normalized(),
        }
    }
}

/// Held-out evaluation of a freshly trained model.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationReport {
    pub classifier: ClassifierKind,
    pub train_rows: usize,
    pub test_rows: usize,
    /// Rows are true categories, columns predicted, both in class-code order.
    pub confusion: ConfusionMatrix,
    /// Indexed by class code.
    pub per_class: Vec<PerClassStats>,
}

/// Fitted classifier together with its held-out accuracy.
#[derive(Debug)]
pub struct TrainedModel {
    pub(super) classifier: Box<dyn TrainedClassifier>,
    /// Fraction of test rows predicted exactly, in `[0, 1]`.
    pub accuracy: f32,
    pub report: EvaluationReport,
}

/// Split, fit and evaluate.
pub fn train_model(
    dataset: &Dataset,
    options: &TrainingOptions,
) -> Result<TrainedModel, TrainingError> {
    let rows = dataset.len();
    if rows < 2 {
        return Err(TrainingError::TooFewRows { rows });
    }
    if dataset.distinct_classes() < 2 {
        return Err(TrainingError::SingleClass {
            only: dataset.target.first().copied().unwrap_or_default(),
        });
    }

    let split = train_test_indices(rows, options.test_fraction, options.seed);
    if split.train.is_empty() || split.test.is_empty() {
        return Err(TrainingError::EmptyPartition {
            train: split.train.len(),
            test: split.test.len(),
        });
    }

    let codes = dataset.target_codes();
    let train_x = dataset.features.select(Axis(0), &split.train);
    let train_y: Vec<usize> = split.train.iter().map(|&i| codes[i]).collect();
    let test_x = dataset.features.select(Axis(0), &split.test);
    let test_y: Vec<usize> = split.test.iter().map(|&i| codes[i]).collect();

    let classifier = fit_classifier(options, train_x.view(), &train_y)?;
    let predicted = classifier.predict(test_x.view());
    let confusion = ConfusionMatrix::from_predictions(RiskCategory::COUNT, &test_y, &predicted);
    let accuracy = accuracy(&confusion);
    let report = EvaluationReport {
        classifier: options.classifier,
        train_rows: train_y.len(),
        test_rows: test_y.len(),
        per_class: precision_recall_by_class(&confusion),
        confusion,
    };
    tracing::info!(
        "Trained {} on {} rows ({} held out): accuracy {:.3}",
        options.classifier,
        report.train_rows,
        report.test_rows,
        accuracy
    );
    Ok(TrainedModel {
        classifier,
        accuracy,
        report,
    })
}

fn fit_classifier(
    options: &TrainingOptions,
    features: ndarray::ArrayView2<'_, f32>,
    labels: &[usize],
) -> Result<Box<dyn TrainedClassifier>, TrainingError> {
    let n_classes = RiskCategory::COUNT;
    let model: Box<dyn TrainedClassifier> = match options.classifier {
        ClassifierKind::RandomForest => Box::new(
            RandomForest::new(options.forest.clone(), options.seed).fit(
                features,
                labels,
                n_classes,
            )?,
        ),
        ClassifierKind::GbdtStump => Box::new(
            GbdtStump::new(options.boosting.clone()).fit(features, labels, n_classes)?,
        ),
    };
    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    fn dataset(rows: &[([f32; 6], RiskCategory)]) -> Dataset {
        let flat: Vec<f32> = rows.iter().flat_map(|(features, _)| *features).collect();
        Dataset {
            features: Array2::from_shape_vec((rows.len(), 6), flat).unwrap(),
            target: rows.iter().map(|(_, category)| *category).collect(),
        }
    }

    fn banded(n: usize) -> Dataset {
        let rows: Vec<([f32; 6], RiskCategory)> = (0..n)
            .map(|i| {
                let category = RiskCategory::from_code(i % 3).unwrap();
                let band = (i % 3) as f32;
                let jitter = (i % 5) as f32;
                (
                    [
                        20.0 + band * 10.0 + jitter,
                        100.0 + band * 25.0 + jitter,
                        65.0 + band * 15.0,
                        5.0 + band * 2.0,
                        36.6 + band * 0.6,
                        70.0 + band * 8.0,
                    ],
                    category,
                )
            })
            .collect();
        dataset(&rows)
    }

    #[test]
    fn single_row_is_rejected() {
        let data = dataset(&[([25.0, 120.0, 80.0, 4.5, 37.0, 75.0], RiskCategory::High)]);
        assert_eq!(
            train_model(&data, &TrainingOptions::default()).unwrap_err(),
            TrainingError::TooFewRows { rows: 1 }
        );
    }

    #[test]
    fn single_class_is_rejected() {
        let row = [25.0, 120.0, 80.0, 4.5, 37.0, 75.0];
        let data = dataset(&[(row, RiskCategory::Mid), (row, RiskCategory::Mid)]);
        assert_eq!(
            train_model(&data, &TrainingOptions::default()).unwrap_err(),
            TrainingError::SingleClass {
                only: RiskCategory::Mid
            }
        );
    }

    #[test]
    fn accuracy_is_a_fraction_and_report_adds_up() {
        let model = train_model(&banded(100), &TrainingOptions::default()).unwrap();
        assert!((0.0..=1.0).contains(&model.accuracy));
        assert!(model.accuracy > 0.9);
        assert_eq!(model.report.train_rows, 80);
        assert_eq!(model.report.test_rows, 20);
        assert_eq!(model.report.confusion.total(), 20);
        assert_eq!(model.report.per_class.len(), 3);
    }

    #[test]
    fn boosted_stumps_train_through_the_same_path() {
        let options = TrainingOptions {
            classifier: ClassifierKind::GbdtStump,
            ..TrainingOptions::default()
        };
        let model = train_model(&banded(60), &options).unwrap();
        assert_eq!(model.report.classifier, ClassifierKind::GbdtStump);
        assert!((0.0..=1.0).contains(&model.accuracy));
    }

    #[test]
    fn two_rows_train_with_one_held_out() {
        let data = dataset(&[
            ([20.0, 100.0, 60.0, 4.0, 36.5, 70.0], RiskCategory::Low),
            ([40.0, 160.0, 100.0, 9.0, 38.0, 90.0], RiskCategory::High),
        ]);
        let model = train_model(&data, &TrainingOptions::default()).unwrap();
        assert_eq!(model.report.train_rows, 1);
        assert_eq!(model.report.test_rows, 1);
    }

    #[test]
    fn options_normalize_out_of_range_values() {
        let options = TrainingOptions {
            test_fraction: 0.9,
            ..TrainingOptions::default()
        }
        .normalized();
        assert_eq!(options.test_fraction, 0.5);
        let options = TrainingOptions {
            test_fraction: f32::NAN,
            ..TrainingOptions::default()
        }
        .normalized();
        assert_eq!(options.test_fraction, 0.2);
    }
}
