//! Utility functions for randomly generating trip records

use fare::frame::Frame;
use ndarray_rand::rand::Rng;
use ndarray_rand::rand_distr::StandardNormal;
use polars::prelude::{DataFrame, NamedFrom, Series};

use crate::{to_frame, Result};

/// Categorical columns of generated trips
pub const TRIP_CATEGORICAL: [&str; 3] = ["pickup_location_id", "dropoff_location_id", "day_of_week"];
/// Numeric columns of generated trips
pub const TRIP_NUMERIC: [&str; 3] = ["passenger_count", "trip_distance", "pickup_time"];
/// Fare column of generated trips
pub const TRIP_LABEL: &str = "total_amount";

pub const DAYS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

const N_LOCATIONS: i64 = 12;

/// Generate `n` trip records with a fare that is linear in the trip attributes plus gaussian
/// noise
///
/// Location ids and passenger counts are integer columns, the day of week a string column, the
/// distance and the pickup hour floating point columns, like the records of a real trip table.
pub fn taxi_trips(n: usize, rng: &mut impl Rng) -> Result<DataFrame> {
    let mut pickups = Vec::with_capacity(n);
    let mut dropoffs = Vec::with_capacity(n);
    let mut days = Vec::with_capacity(n);
    let mut passengers = Vec::with_capacity(n);
    let mut distances = Vec::with_capacity(n);
    let mut pickup_times = Vec::with_capacity(n);
    let mut fares = Vec::with_capacity(n);

    for _ in 0..n {
        let pickup = rng.gen_range(1..=N_LOCATIONS);
        let dropoff = rng.gen_range(1..=N_LOCATIONS);
        let day = rng.gen_range(0..DAYS.len());
        let passenger_count = rng.gen_range(1..=4i64);
        let distance = rng.gen_range(0.3..20.0);
        let pickup_time = rng.gen_range(0..24) as f64;
        let noise: f64 = rng.sample(StandardNormal);

        // weekend and airport-like locations are more expensive
        let surcharge = if day >= 5 { 1.5 } else { 0.0 } + if pickup == 1 { 5.0 } else { 0.0 };
        let fare = 3.0
            + 2.5 * distance
            + 0.5 * passenger_count as f64
            + 0.05 * pickup_time
            + surcharge
            + 0.5 * noise;

        pickups.push(pickup);
        dropoffs.push(dropoff);
        days.push(DAYS[day]);
        passengers.push(passenger_count);
        distances.push(distance);
        pickup_times.push(pickup_time);
        fares.push(fare);
    }

    Ok(DataFrame::new(vec![
        Series::new("pickup_location_id".into(), pickups).into(),
        Series::new("dropoff_location_id".into(), dropoffs).into(),
        Series::new("day_of_week".into(), days).into(),
        Series::new("passenger_count".into(), passengers).into(),
        Series::new("trip_distance".into(), distances).into(),
        Series::new("pickup_time".into(), pickup_times).into(),
        Series::new(TRIP_LABEL.into(), fares).into(),
    ])?)
}

/// Generate `n` trip records and convert them into a [`Frame`]
pub fn trip_frame(n: usize, rng: &mut impl Rng) -> Result<Frame> {
    let df = taxi_trips(n, rng)?;
    to_frame(&df, &TRIP_CATEGORICAL[..], &TRIP_NUMERIC[..], TRIP_LABEL)
}
