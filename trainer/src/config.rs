//! Command line configuration of a training run

use std::path::PathBuf;

use clap::Parser;

/// Train the taxi fare regression and save it to the model directory
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "taxi-fare-trainer")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Train an elastic net regression predicting taxi fares", long_about = None)]
pub struct Config {
    /// Directory holding `train/`, `test/` and `hyperparameter.csv`
    #[arg(long, default_value = "/home/ubuntu/airflow/ml-data")]
    pub data_dir: PathBuf,

    /// Output directory of the model, replaced if it exists [default: <data-dir>/model]
    #[arg(long)]
    pub model_dir: Option<PathBuf>,

    /// Maximum number of optimizer iterations
    #[arg(long, default_value = "50")]
    pub max_iter: u32,

    /// Number of predictions to display
    #[arg(long, default_value = "20")]
    pub show: usize,
}

impl Config {
    /// Configuration with default flags reading from `data_dir`
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Config {
            data_dir: data_dir.into(),
            model_dir: None,
            max_iter: 50,
            show: 20,
        }
    }

    pub fn train_dir(&self) -> PathBuf {
        self.data_dir.join("train")
    }

    pub fn test_dir(&self) -> PathBuf {
        self.data_dir.join("test")
    }

    pub fn hyperparameter_path(&self) -> PathBuf {
        self.data_dir.join("hyperparameter.csv")
    }

    pub fn model_dir(&self) -> PathBuf {
        self.model_dir
            .clone()
            .unwrap_or_else(|| self.data_dir.join("model"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::try_parse_from(["taxi-fare-trainer"]).unwrap();
        assert_eq!(config, Config::new("/home/ubuntu/airflow/ml-data"));
        assert_eq!(
            config.train_dir(),
            PathBuf::from("/home/ubuntu/airflow/ml-data/train")
        );
        assert_eq!(
            config.hyperparameter_path(),
            PathBuf::from("/home/ubuntu/airflow/ml-data/hyperparameter.csv")
        );
        assert_eq!(
            config.model_dir(),
            PathBuf::from("/home/ubuntu/airflow/ml-data/model")
        );
    }

    #[test]
    fn flags_override_defaults() {
        let config = Config::try_parse_from([
            "taxi-fare-trainer",
            "--data-dir",
            "/tmp/data",
            "--model-dir",
            "/tmp/out",
            "--max-iter",
            "10",
            "--show",
            "5",
        ])
        .unwrap();
        assert_eq!(config.test_dir(), PathBuf::from("/tmp/data/test"));
        assert_eq!(config.model_dir(), PathBuf::from("/tmp/out"));
        assert_eq!(config.max_iter, 10);
        assert_eq!(config.show, 5);
    }

    #[test]
    fn invalid_flags_are_rejected() {
        assert!(Config::try_parse_from(["taxi-fare-trainer", "--max-iter", "many"]).is_err());
    }
}
