//! Static feature schema consumed by the preprocessing pipeline and the model
//!
//! The expected feature vector is the contract with the trained model: its
//! order is reproduced exactly in every feature matrix.

use serde::{Deserialize, Serialize};

/// Column holding the regression target
pub const TARGET_COLUMN: &str = "median_house_value";

/// Categorical column expanded into indicator columns
pub const CATEGORICAL_COLUMN: &str = "ocean_proximity";

/// Sentinel string scrubbed before the generic missing-value fill
pub const NULL_SENTINEL: &str = "Null";

/// Known column aliases, applied after lower-casing
pub const COLUMN_ALIASES: [(&str, &str); 5] = [
    ("lat", "latitude"),
    ("bedrooms", "total_bedrooms"),
    ("median_age", "housing_median_age"),
    ("pop", "population"),
    ("rooms", "total_rooms"),
];

/// Ordered feature vector expected by the model
pub const EXPECTED_FEATURES: [&str; 13] = [
    "longitude",
    "latitude",
    "housing_median_age",
    "total_rooms",
    "total_bedrooms",
    "population",
    "households",
    "median_income",
    "ocean_proximity__LT_1H_OCEAN",
    "ocean_proximity_INLAND",
    "ocean_proximity_ISLAND",
    "ocean_proximity_NEAR_BAY",
    "ocean_proximity_NEAR_OCEAN",
];

/// Immutable description of how raw columns map onto model features
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureSchema {
    /// Exact-match renames (alias, canonical)
    pub aliases: Vec<(String, String)>,
    /// Column expanded by the categorical encoder
    pub categorical_column: String,
    /// Ordered output columns
    pub expected_features: Vec<String>,
    /// Target column split off before alignment
    pub target_column: String,
    /// Literal cell value replaced by `fill_value`
    pub null_sentinel: String,
    /// Value used for sentinels, missing cells and absent columns
    pub fill_value: f64,
}

impl FeatureSchema {
    /// The housing schema the shipped model was trained against
    pub fn housing() -> Self {
        Self {
            aliases: COLUMN_ALIASES
                .iter()
                .map(|(alias, canonical)| (alias.to_string(), canonical.to_string()))
                .collect(),
            categorical_column: CATEGORICAL_COLUMN.to_string(),
            expected_features: EXPECTED_FEATURES.iter().map(|s| s.to_string()).collect(),
            target_column: TARGET_COLUMN.to_string(),
            null_sentinel: NULL_SENTINEL.to_string(),
            fill_value: 0.0,
        }
    }

    /// Canonical name for a lower-cased column, or the name itself
    pub fn canonical_name<'a>(&'a self, name: &'a str) -> &'a str {
        self.aliases
            .iter()
            .find(|(alias, _)| alias == name)
            .map(|(_, canonical)| canonical.as_str())
            .unwrap_or(name)
    }

    /// Indicator column name for one category value
    ///
    /// `<` and `>` are spelled out and whitespace becomes `_`, so the raw
    /// label `<1H OCEAN` maps to `ocean_proximity__LT_1H_OCEAN`.
    pub fn indicator_name(&self, category: &str) -> String {
        let mut label = String::with_capacity(category.len() + 4);
        for c in category.chars() {
            match c {
                '<' => label.push_str("_LT_"),
                '>' => label.push_str("_GT_"),
                c if c.is_whitespace() => label.push('_'),
                c => label.push(c),
            }
        }
        format!("{}_{}", self.categorical_column, label)
    }

    /// Position of a column in the expected feature vector
    pub fn feature_index(&self, name: &str) -> Option<usize> {
        self.expected_features.iter().position(|f| f == name)
    }
}

impl Default for FeatureSchema {
    fn default() -> Self {
        Self::housing()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_housing_schema_has_thirteen_features() {
        let schema = FeatureSchema::housing();
        assert_eq!(schema.expected_features.len(), 13);
        assert_eq!(schema.expected_features[0], "longitude");
        assert_eq!(schema.expected_features[12], "ocean_proximity_NEAR_OCEAN");
    }

    #[test]
    fn test_canonical_name_exact_match_only() {
        let schema = FeatureSchema::housing();
        assert_eq!(schema.canonical_name("lat"), "latitude");
        assert_eq!(schema.canonical_name("pop"), "population");
        // Substrings are not renamed
        assert_eq!(schema.canonical_name("population"), "population");
        assert_eq!(schema.canonical_name("latitude_x"), "latitude_x");
        assert_eq!(schema.canonical_name("LAT"), "LAT");
    }

    #[test]
    fn test_indicator_names_match_expected_vector() {
        let schema = FeatureSchema::housing();
        for raw in ["<1H OCEAN", "INLAND", "ISLAND", "NEAR BAY", "NEAR OCEAN"] {
            let name = schema.indicator_name(raw);
            assert!(
                schema.feature_index(&name).is_some(),
                "{} -> {} not in expected features",
                raw,
                name
            );
        }
    }

    #[test]
    fn test_indicator_name_greater_than() {
        let schema = FeatureSchema::housing();
        assert_eq!(schema.indicator_name(">5 MILES"), "ocean_proximity__GT_5_MILES");
    }
}
