//! Columns of the trip table and the feature pipeline built from them

use fare::pipeline::Pipeline;
use fare_preprocessing::{
    FeaturePipeline, FeatureStage, HandleInvalid, OneHotEncoder, StandardScaler, StringIndexer,
    VectorAssembler,
};

pub const CATEGORICAL_FEATURES: [&str; 3] =
    ["pickup_location_id", "dropoff_location_id", "day_of_week"];
pub const NUMERIC_FEATURES: [&str; 3] = ["passenger_count", "trip_distance", "pickup_time"];
pub const LABEL: &str = "total_amount";
/// Output column of the last stage, the input of the regression
pub const FEATURES: &str = "features";
pub const PREDICTION: &str = "prediction";
/// Columns shown next to the prediction
pub const DISPLAY_COLUMNS: [&str; 3] = ["trip_distance", "day_of_week", "total_amount"];

/// Columns concatenated into [`FEATURES`], one per trip column
pub fn assembler_inputs() -> Vec<String> {
    CATEGORICAL_FEATURES
        .iter()
        .map(|c| format!("{c}_onehot"))
        .chain(NUMERIC_FEATURES.iter().map(|n| format!("{n}_scaled")))
        .collect()
}

/// Build the stage list
///
/// Every categorical column is indexed, keeping unseen values in an extra bucket, and one-hot
/// encoded. Every numeric column is wrapped into a vector and standardized. A final assembler
/// concatenates all encoded and scaled columns into [`FEATURES`].
pub fn feature_pipeline() -> FeaturePipeline {
    let mut stages: Vec<FeatureStage> = Vec::new();

    for c in CATEGORICAL_FEATURES {
        stages.push(
            StringIndexer::new(c, format!("{c}_idx"))
                .handle_invalid(HandleInvalid::Keep)
                .into(),
        );
        stages.push(OneHotEncoder::new(format!("{c}_idx"), format!("{c}_onehot")).into());
    }

    for n in NUMERIC_FEATURES {
        stages.push(VectorAssembler::new(vec![n], format!("{n}_vector")).into());
        stages.push(
            StandardScaler::new(format!("{n}_vector"), format!("{n}_scaled"))
                .with_mean(true)
                .with_std(true)
                .into(),
        );
    }

    stages.push(VectorAssembler::new(assembler_inputs(), FEATURES).into());
    Pipeline::new(stages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fare::pipeline::Stage;

    #[test]
    fn two_stages_per_column_and_a_final_assembler() {
        let pipeline = feature_pipeline();
        let stages = pipeline.stages();
        assert_eq!(
            stages.len(),
            2 * (CATEGORICAL_FEATURES.len() + NUMERIC_FEATURES.len()) + 1
        );

        let kinds: Vec<_> = stages.iter().map(FeatureStage::kind).collect();
        assert_eq!(&kinds[..2], &["StringIndexer", "OneHotEncoder"]);
        assert_eq!(&kinds[6..8], &["VectorAssembler", "StandardScaler"]);
        assert_eq!(stages.last().unwrap().output_cols(), vec![FEATURES]);
    }

    #[test]
    fn every_column_is_assembled_once() {
        let inputs = assembler_inputs();
        assert_eq!(inputs.len(), 6);
        for column in CATEGORICAL_FEATURES.iter().chain(NUMERIC_FEATURES.iter()) {
            let uses = inputs
                .iter()
                .filter(|input| input.starts_with(&format!("{column}_")))
                .count();
            assert_eq!(uses, 1, "{column}");
        }
    }

    #[test]
    fn stage_inputs_exist_in_the_trip_table() {
        let source: Vec<&str> = CATEGORICAL_FEATURES
            .iter()
            .chain(NUMERIC_FEATURES.iter())
            .copied()
            .collect();
        feature_pipeline().validate(&source[..]).unwrap();
        assert!(feature_pipeline().validate(&source[1..]).is_err());
    }
}
