use super::*;
use crate::app_dirs::{APP_DIR_NAME, BaseOverrideGuard, CONFIG_FILE_NAME};
use crate::ml::ClassifierKind;
use tempfile::tempdir;

#[test]
fn missing_file_writes_defaults() {
    let dir = tempdir().unwrap();
    let _guard = BaseOverrideGuard::set(dir.path());
    let settings = load_or_default().unwrap();
    assert_eq!(settings, AppSettings::default());
    let written = dir.path().join(APP_DIR_NAME).join(CONFIG_FILE_NAME);
    assert!(written.is_file());
    assert_eq!(load_from_path(&written).unwrap(), AppSettings::default());
}

#[test]
fn partial_file_fills_in_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        "[training]\nseed = 7\nclassifier = \"gbdt_stump\"\n\n[form]\nage = 40\n",
    )
    .unwrap();
    let settings = load_from_path(&path).unwrap();
    assert_eq!(settings.training.seed, 7);
    assert_eq!(settings.training.classifier, ClassifierKind::GbdtStump);
    assert_eq!(settings.training.test_fraction, 0.2);
    assert_eq!(settings.training.forest.n_trees, 100);
    assert_eq!(settings.form.age, 40);
    assert_eq!(settings.form.systolic_bp, 120);
}

#[test]
fn out_of_range_values_are_clamped() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        "[training]\ntest_fraction = 0.95\n\n[training.forest]\nn_trees = 0\n\n[form]\nage = 500\nbody_temp = 20.0\n",
    )
    .unwrap();
    let settings = load_from_path(&path).unwrap();
    assert_eq!(settings.training.test_fraction, 0.5);
    assert_eq!(settings.training.forest.n_trees, 1);
    assert_eq!(settings.form.age, 100);
    assert_eq!(settings.form.body_temp, 35.0);
}

#[test]
fn malformed_file_is_a_parse_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[training\nseed = ").unwrap();
    assert!(matches!(
        load_from_path(&path),
        Err(ConfigError::ParseToml { .. })
    ));
}

#[test]
fn unknown_classifier_is_a_parse_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[training]\nclassifier = \"svm\"\n").unwrap();
    assert!(matches!(
        load_from_path(&path),
        Err(ConfigError::ParseToml { .. })
    ));
}

#[test]
fn save_round_trips_and_leaves_no_temp_files() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("config.toml");
    let mut settings = AppSettings::default();
    settings.training.seed = 99;
    settings.form.heart_rate = 90;
    save_to_path(&settings, &path).unwrap();
    save_to_path(&settings, &path).unwrap();
    assert_eq!(load_from_path(&path).unwrap(), settings);
    let entries: Vec<_> = std::fs::read_dir(path.parent().unwrap())
        .unwrap()
        .filter_map(|entry| entry.ok())
        .collect();
    assert_eq!(entries.len(), 1);
}
