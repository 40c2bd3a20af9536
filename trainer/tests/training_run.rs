use std::fs;
use std::path::Path;

use approx::assert_abs_diff_eq;
use fare_datasets::generate::taxi_trips;
use fare_datasets::{load_parquet, to_frame, write_parquet};
use polars::prelude::{NamedFrom, Series};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use taxi_fare_trainer::features::{CATEGORICAL_FEATURES, LABEL, NUMERIC_FEATURES};
use taxi_fare_trainer::persist::{load_metadata, load_model};
use taxi_fare_trainer::{run, Config};
use tempfile::tempdir;

fn write_data_dir(dir: &Path, seed: u64) {
    let mut rng = SmallRng::seed_from_u64(seed);
    for (split, parts) in [("train", 3), ("test", 1)] {
        let split_dir = dir.join(split);
        fs::create_dir_all(&split_dir).unwrap();
        for part in 0..parts {
            let mut df = taxi_trips(400, &mut rng).unwrap();
            write_parquet(&mut df, split_dir.join(format!("part-{part:05}.parquet"))).unwrap();
        }
        fs::write(split_dir.join("_SUCCESS"), "").unwrap();
    }
    fs::write(
        dir.join("hyperparameter.csv"),
        ",alpha,reg_param\n0,0.25,0.01\n1,0.75,0.5\n",
    )
    .unwrap();
}

fn config(dir: &Path) -> Config {
    let mut config = Config::new(dir);
    config.model_dir = Some(dir.join("out").join("model"));
    config
}

#[test]
fn full_run_trains_scores_and_saves() {
    let dir = tempdir().unwrap();
    write_data_dir(dir.path(), 11);

    let report = run(&config(dir.path())).unwrap();
    assert_eq!(report.n_train, 1200);
    assert_eq!(report.n_test, 400);
    assert_eq!(report.hyperparameters.alpha, 0.25);
    assert_eq!(report.hyperparameters.reg_param, 0.01);
    assert!(report.n_steps <= 50);
    let test = report.test.unwrap();
    assert!(test.r2 > 0.9, "{test}");

    assert_eq!(report.sample.height(), 20);
    assert_eq!(report.sample.width(), 4);

    let metadata = load_metadata(&report.model_dir).unwrap();
    assert_eq!(metadata.n_features, report.n_features);
    assert_eq!(metadata.params.l1_ratio(), 0.25);
    assert_eq!(metadata.params.penalty(), 0.01);
    assert_eq!(metadata.params.max_iterations(), 50);
}

#[test]
fn rerun_overwrites_the_model_with_equal_predictions() {
    let dir = tempdir().unwrap();
    write_data_dir(dir.path(), 12);
    let config = config(dir.path());

    let first = run(&config).unwrap();
    let first_model = load_model(&first.model_dir).unwrap();
    fs::write(first.model_dir.join("stale.json"), "{}").unwrap();

    let second = run(&config).unwrap();
    assert!(!second.model_dir.join("stale.json").exists());

    let test = load_parquet(dir.path().join("test")).unwrap();
    let test = to_frame(&test, &CATEGORICAL_FEATURES[..], &NUMERIC_FEATURES[..], LABEL).unwrap();
    let second_model = load_model(&second.model_dir).unwrap();

    let before = first_model.predict(&test).unwrap();
    let after = second_model.predict(&test).unwrap();
    assert_abs_diff_eq!(before, after, epsilon = 1e-9);
    assert_abs_diff_eq!(
        first.test.unwrap().rmse,
        second.test.unwrap().rmse,
        epsilon = 1e-9
    );
}

#[test]
fn unseen_test_categories_are_scored() {
    let dir = tempdir().unwrap();
    write_data_dir(dir.path(), 13);

    // replace the test split by trips from a day and a location never seen in training
    let test_dir = dir.path().join("test");
    fs::remove_dir_all(&test_dir).unwrap();
    fs::create_dir_all(&test_dir).unwrap();
    let mut df = taxi_trips(25, &mut SmallRng::seed_from_u64(99)).unwrap();
    df.with_column(Series::new("day_of_week".into(), vec!["Holiday"; 25]))
        .unwrap();
    df.with_column(Series::new("pickup_location_id".into(), vec![999i64; 25]))
        .unwrap();
    write_parquet(&mut df, test_dir.join("part-00000.parquet")).unwrap();

    let report = run(&config(dir.path())).unwrap();
    assert_eq!(report.n_test, 25);
    assert_eq!(report.sample.height(), 20);
    assert!(report.test.unwrap().rmse.is_finite());
}

#[test]
fn empty_test_split_still_saves_the_model() {
    let dir = tempdir().unwrap();
    write_data_dir(dir.path(), 15);

    let test_dir = dir.path().join("test");
    fs::remove_dir_all(&test_dir).unwrap();
    fs::create_dir_all(&test_dir).unwrap();
    let mut df = taxi_trips(0, &mut SmallRng::seed_from_u64(1)).unwrap();
    write_parquet(&mut df, test_dir.join("part-00000.parquet")).unwrap();

    let report = run(&config(dir.path())).unwrap();
    assert_eq!(report.n_test, 0);
    assert!(report.test.is_none());
    assert_eq!(report.sample.height(), 0);
    assert_eq!(report.sample.width(), 4);

    let model = load_model(&report.model_dir).unwrap();
    assert_eq!(model.model().nfeatures(), report.n_features);
}

#[test]
fn missing_inputs_fail_the_run() {
    let dir = tempdir().unwrap();
    write_data_dir(dir.path(), 14);
    fs::remove_file(dir.path().join("hyperparameter.csv")).unwrap();
    assert!(run(&config(dir.path())).is_err());

    let empty = tempdir().unwrap();
    let err = run(&config(empty.path())).unwrap_err();
    assert!(format!("{err:#}").contains("train"));
}
