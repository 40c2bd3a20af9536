//! The training run: load, fit, score, display and save

use std::path::PathBuf;

use anyhow::{Context, Result};
use fare::frame::{Column, Frame};
use fare::metrics::RegressionReport;
use fare::traits::{Fit, Transformer};
use fare::{DatasetView, ParamGuard};
use fare_datasets::{load_hyperparameters, load_parquet, to_frame, Hyperparameters};
use fare_elasticnet::{ElasticNet, ElasticNetValidParams, Solver};
use fare_preprocessing::FittedFeaturePipeline;
use ndarray::Array1;
use polars::prelude::{DataFrame, NamedFrom, Series};
use polars::prelude::Column as PolarsColumn;

use crate::config::Config;
use crate::features::{
    feature_pipeline, CATEGORICAL_FEATURES, DISPLAY_COLUMNS, FEATURES, LABEL, NUMERIC_FEATURES,
    PREDICTION,
};
use crate::persist::save_model;

/// A fitted feature pipeline together with the regression fitted on its output
#[derive(Debug, Clone, PartialEq)]
pub struct TrainedModel {
    pub(crate) pipeline: FittedFeaturePipeline,
    pub(crate) model: ElasticNet<f64>,
    pub(crate) params: ElasticNetValidParams<f64>,
}

impl TrainedModel {
    pub fn pipeline(&self) -> &FittedFeaturePipeline {
        &self.pipeline
    }

    pub fn model(&self) -> &ElasticNet<f64> {
        &self.model
    }

    pub fn params(&self) -> &ElasticNetValidParams<f64> {
        &self.params
    }

    /// The hyperparameters the regression was fitted with
    pub fn hyperparameters(&self) -> Hyperparameters {
        Hyperparameters {
            alpha: self.params.l1_ratio(),
            reg_param: self.params.penalty(),
        }
    }

    /// Run the fitted feature stages on `frame`
    pub fn features(&self, frame: &Frame) -> fare_preprocessing::Result<Frame> {
        self.pipeline.transform(frame)
    }

    /// Predict the fare of every row of `frame`
    pub fn predict(&self, frame: &Frame) -> Result<Array1<f64>> {
        let transformed = self.features(frame)?;
        Ok(self.model.try_predict(&transformed.dense(FEATURES)?)?)
    }
}

/// Fit the feature pipeline and the regression on `frame`
pub fn train(frame: &Frame, hyperparameters: Hyperparameters, max_iter: u32) -> Result<TrainedModel> {
    let pipeline = feature_pipeline().fit(frame)?;
    let transformed: fare_preprocessing::Result<Frame> = pipeline.transform(frame);
    let transformed = transformed?;

    let records = transformed.dense(FEATURES)?;
    let targets = transformed.complete_numeric(LABEL)?;
    tracing::debug!(
        rows = records.nrows(),
        features = records.ncols(),
        "assembled training records"
    );

    let params = ElasticNet::params()
        .penalty(hyperparameters.reg_param)
        .l1_ratio(hyperparameters.alpha)
        .max_iterations(max_iter)
        .solver(Solver::Normal)
        .check()?;
    let model = params.fit(&DatasetView::new(records, targets))?;

    Ok(TrainedModel {
        pipeline,
        model,
        params,
    })
}

/// Predict the fares of `frame` and compare them with its label column
pub fn evaluate(model: &TrainedModel, frame: &Frame) -> Result<(Array1<f64>, RegressionReport)> {
    let predictions = model.predict(frame)?;
    let report = RegressionReport::new(&predictions, frame.complete_numeric(LABEL)?)?;
    Ok((predictions, report))
}

/// The first `n` rows of the display columns next to their prediction
pub fn sample_table(frame: &Frame, predictions: &Array1<f64>, n: usize) -> Result<DataFrame> {
    let head = frame.head(n);
    let mut columns: Vec<PolarsColumn> = Vec::with_capacity(DISPLAY_COLUMNS.len() + 1);
    for name in DISPLAY_COLUMNS {
        let series = match head.column(name)? {
            Column::Text(values) => Series::new(name.into(), values.as_slice()),
            Column::Numeric(values) => Series::new(name.into(), values.to_vec()),
            other => anyhow::bail!("column {name} of kind {} can not be displayed", other.kind()),
        };
        columns.push(series.into());
    }

    let shown: Vec<f64> = predictions.iter().take(head.nrows()).copied().collect();
    columns.push(Series::new(PREDICTION.into(), shown).into());
    Ok(DataFrame::new(columns)?)
}

/// Summary of a finished training run
#[derive(Debug, Clone)]
pub struct TrainingReport {
    pub hyperparameters: Hyperparameters,
    pub n_train: usize,
    pub n_test: usize,
    pub n_features: usize,
    pub n_steps: u32,
    pub train: RegressionReport,
    /// `None` when the test split has no rows
    pub test: Option<RegressionReport>,
    /// Predictions of the first test rows
    pub sample: DataFrame,
    pub model_dir: PathBuf,
}

fn load_trips(path: PathBuf) -> Result<Frame> {
    let df = load_parquet(&path)
        .with_context(|| format!("failed to read trips from {}", path.display()))?;
    let frame = to_frame(&df, &CATEGORICAL_FEATURES[..], &NUMERIC_FEATURES[..], LABEL)
        .with_context(|| format!("unexpected trip schema in {}", path.display()))?;
    Ok(frame)
}

/// Train on `<data-dir>/train`, score on `<data-dir>/test` and save the model
pub fn run(config: &Config) -> Result<TrainingReport> {
    let train_frame = load_trips(config.train_dir())?;
    let test_frame = load_trips(config.test_dir())?;
    tracing::info!(
        train = train_frame.nrows(),
        test = test_frame.nrows(),
        "loaded trips"
    );

    let path = config.hyperparameter_path();
    let hyperparameters = load_hyperparameters(&path)
        .with_context(|| format!("failed to read hyperparameters from {}", path.display()))?;
    tracing::info!(
        alpha = hyperparameters.alpha,
        reg_param = hyperparameters.reg_param,
        "loaded hyperparameters"
    );

    let trained = train(&train_frame, hyperparameters, config.max_iter)
        .context("failed to fit the taxi fare model")?;
    tracing::info!(
        features = trained.model.nfeatures(),
        steps = trained.model.n_steps(),
        intercept = trained.model.intercept(),
        "fitted elastic net"
    );

    let (_, train_report) = evaluate(&trained, &train_frame)?;
    tracing::info!(%train_report, "training metrics");

    let (predictions, test_report) = if test_frame.nrows() == 0 {
        tracing::warn!("test split is empty, skipping test metrics");
        (Array1::zeros(0), None)
    } else {
        let (predictions, report) =
            evaluate(&trained, &test_frame).context("failed to score the test trips")?;
        tracing::info!(test_report = %report, "test metrics");
        (predictions, Some(report))
    };

    let sample = sample_table(&test_frame, &predictions, config.show)?;

    let model_dir = config.model_dir();
    save_model(&model_dir, &trained)?;
    tracing::info!(path = %model_dir.display(), "saved model");

    Ok(TrainingReport {
        hyperparameters,
        n_train: train_frame.nrows(),
        n_test: test_frame.nrows(),
        n_features: trained.model.nfeatures(),
        n_steps: trained.model.n_steps(),
        train: train_report,
        test: test_report,
        sample,
        model_dir,
    })
}
