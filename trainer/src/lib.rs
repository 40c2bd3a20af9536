//! Batch job training the taxi fare regression
//!
//! A run reads the `train/` and `test/` trip tables and the tuned hyperparameters from the data
//! directory, fits the [feature pipeline](features::feature_pipeline) and an elastic net on the
//! training trips, scores the test trips and saves the model directory.
//!
//! ```no_run
//! use taxi_fare_trainer::{config::Config, job};
//!
//! let report = job::run(&Config::new("/data/taxi"))?;
//! if let Some(test) = report.test {
//!     println!("{}", test);
//! }
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod config;
pub mod features;
pub mod job;
pub mod persist;

pub use config::Config;
pub use job::{run, TrainedModel, TrainingReport};
