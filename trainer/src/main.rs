use clap::Parser;
use taxi_fare_trainer::{job, Config};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "taxi_fare_trainer=info,fare=info".into()),
        )
        .init();

    let config = Config::parse();
    // polars truncates long tables when printing
    std::env::set_var("POLARS_FMT_MAX_ROWS", config.show.to_string());
    tracing::info!(data_dir = %config.data_dir.display(), "starting training run");

    let report = job::run(&config)?;
    println!("{}", report.sample);
    println!("train: {}", report.train);
    match report.test {
        Some(test) => println!("test:  {}", test),
        None => println!("test:  no test trips"),
    }
    println!(
        "model with {} features saved to {}",
        report.n_features,
        report.model_dir.display()
    );
    Ok(())
}
