#[allow(clippy::type_complexity)]
pub mod config {
    use criterion::{measurement::WallTime, BenchmarkGroup};
    use std::time::Duration;

    /// Settings shared by the solver and preprocessing benches
    pub fn set_default_benchmark_configs(benchmark: &mut BenchmarkGroup<WallTime>) {
        let sample_size: usize = 20;
        let measurement_time: Duration = Duration::new(10, 0);
        let confidence_level: f64 = 0.97;
        let warm_up_time: Duration = Duration::new(3, 0);
        let noise_threshold: f64 = 0.05;

        benchmark
            .sample_size(sample_size)
            .measurement_time(measurement_time)
            .confidence_level(confidence_level)
            .warm_up_time(warm_up_time)
            .noise_threshold(noise_threshold);
    }
}
