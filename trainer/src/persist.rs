//! Model directory layout
//!
//! A saved model is a directory with three JSON documents:
//!
//! * `metadata.json`: model class, creation time, regression parameters, feature count and the
//!   column names the model reads and writes
//! * `model.json`: coefficients and intercept of the regression
//! * `pipeline.json`: the fitted feature stages
//!
//! Saving replaces the whole directory.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::Path;

use anyhow::{ensure, Context, Result};
use chrono::{DateTime, Utc};
use fare_elasticnet::{ElasticNet, ElasticNetValidParams};
use fare_preprocessing::FittedFeaturePipeline;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::features::{FEATURES, LABEL, PREDICTION};
use crate::job::TrainedModel;

const METADATA: &str = "metadata.json";
const MODEL: &str = "model.json";
const PIPELINE: &str = "pipeline.json";

/// Content of `metadata.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub class: String,
    pub timestamp: DateTime<Utc>,
    pub params: ElasticNetValidParams<f64>,
    pub n_features: usize,
    pub features_col: String,
    pub label_col: String,
    pub prediction_col: String,
}

impl ModelMetadata {
    fn new(model: &TrainedModel) -> Self {
        ModelMetadata {
            class: "fare_elasticnet::ElasticNet".to_string(),
            timestamp: Utc::now(),
            params: model.params.clone(),
            n_features: model.model.nfeatures(),
            features_col: FEATURES.to_string(),
            label_col: LABEL.to_string(),
            prediction_col: PREDICTION.to_string(),
        }
    }
}

/// Write `model` to `dir`, removing anything stored there before
pub fn save_model(dir: &Path, model: &TrainedModel) -> Result<()> {
    if dir.exists() {
        fs::remove_dir_all(dir)
            .with_context(|| format!("failed to remove old model at {}", dir.display()))?;
    }
    fs::create_dir_all(dir)
        .with_context(|| format!("failed to create model directory {}", dir.display()))?;

    write_json(&dir.join(METADATA), &ModelMetadata::new(model))?;
    write_json(&dir.join(MODEL), &model.model)?;
    write_json(&dir.join(PIPELINE), &model.pipeline)?;
    Ok(())
}

/// Read the metadata of the model saved in `dir`
pub fn load_metadata(dir: &Path) -> Result<ModelMetadata> {
    read_json(&dir.join(METADATA))
}

/// Read a model written by [`save_model`]
pub fn load_model(dir: &Path) -> Result<TrainedModel> {
    let metadata = load_metadata(dir)?;
    let model: ElasticNet<f64> = read_json(&dir.join(MODEL))?;
    let pipeline: FittedFeaturePipeline = read_json(&dir.join(PIPELINE))?;

    ensure!(
        model.nfeatures() == metadata.n_features,
        "model in {} has {} coefficients but its metadata expects {}",
        dir.display(),
        model.nfeatures(),
        metadata.n_features
    );

    Ok(TrainedModel {
        pipeline,
        model,
        params: metadata.params,
    })
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), value)
        .with_context(|| format!("failed to write {}", path.display()))
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("failed to parse {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::job::train;
    use fare_datasets::generate::trip_frame;
    use fare_datasets::Hyperparameters;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;
    use tempfile::tempdir;

    fn trained() -> TrainedModel {
        let frame = trip_frame(200, &mut SmallRng::seed_from_u64(7)).unwrap();
        let params = Hyperparameters {
            alpha: 0.2,
            reg_param: 0.05,
        };
        train(&frame, params, 50).unwrap()
    }

    #[test]
    fn saved_model_is_read_back() {
        let dir = tempdir().unwrap();
        let model_dir = dir.path().join("model");
        let model = trained();

        save_model(&model_dir, &model).unwrap();
        for name in [METADATA, MODEL, PIPELINE] {
            assert!(model_dir.join(name).is_file(), "{name}");
        }

        let metadata = load_metadata(&model_dir).unwrap();
        assert_eq!(metadata.n_features, model.model().nfeatures());
        assert_eq!(metadata.label_col, "total_amount");
        assert_eq!(metadata.params.penalty(), 0.05);

        let loaded = load_model(&model_dir).unwrap();
        assert_eq!(loaded.hyperparameters(), model.hyperparameters());
        assert_eq!(loaded.pipeline(), model.pipeline());
    }

    #[test]
    fn existing_directory_is_replaced() {
        let dir = tempdir().unwrap();
        let model_dir = dir.path().join("model");
        fs::create_dir_all(model_dir.join("stale")).unwrap();
        fs::write(model_dir.join("old.txt"), "old").unwrap();

        save_model(&model_dir, &trained()).unwrap();
        assert!(!model_dir.join("old.txt").exists());
        assert!(!model_dir.join("stale").exists());
        assert!(model_dir.join(MODEL).is_file());
    }

    #[test]
    fn inconsistent_metadata_is_rejected() {
        let dir = tempdir().unwrap();
        let model = trained();
        save_model(dir.path(), &model).unwrap();

        let mut metadata = load_metadata(dir.path()).unwrap();
        metadata.n_features += 1;
        write_json(&dir.path().join(METADATA), &metadata).unwrap();

        assert!(load_model(dir.path()).is_err());
        assert!(load_model(&dir.path().join("missing")).is_err());
    }
}
