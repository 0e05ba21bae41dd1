//! File-backed growth reference built from published LMS tables.
//!
//! Each table holds the Box-Cox power (L), median (M) and coefficient of
//! variation (S) at a series of ages for one dataset, sex and measurement.
//! Values between tabulated ages are linearly interpolated.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::models::{
    CentileCurve, CentilePoint, MeasurementMethod, ReferenceDataset, SdsCentile, Sex,
    COLE_NINE_CENTILES,
};
use super::errors::ReferenceError;
use super::provider::{GrowthReferenceTrait, ReferenceSummary};

/// Environment variable naming the LMS table file
pub const REFERENCE_PATH_ENV: &str = "GROWTH_REFERENCE_PATH";

/// L, M and S parameters at one age
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct LmsRow {
    /// Age in decimal years
    pub age: f64,
    pub l: f64,
    pub m: f64,
    pub s: f64,
}

impl LmsRow {
    /// SDS of an observation against this row
    pub fn z_score(&self, value: f64) -> f64 {
        if self.l.abs() < 1e-9 {
            (value / self.m).ln() / self.s
        } else {
            ((value / self.m).powf(self.l) - 1.0) / (self.l * self.s)
        }
    }

    /// Observation value sitting at `z`, if the LMS curve is defined there
    pub fn value_at(&self, z: f64) -> Option<f64> {
        if self.l.abs() < 1e-9 {
            return Some(self.m * (self.s * z).exp());
        }
        let base = 1.0 + self.l * self.s * z;
        if base <= 0.0 {
            None
        } else {
            Some(self.m * base.powf(1.0 / self.l))
        }
    }
}

/// LMS table for one dataset, sex and measurement
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LmsTable {
    pub reference: ReferenceDataset,
    pub sex: Sex,
    pub measurement_method: MeasurementMethod,
    pub rows: Vec<LmsRow>,
}

impl LmsTable {
    fn key(&self) -> (ReferenceDataset, Sex, MeasurementMethod) {
        (self.reference, self.sex, self.measurement_method)
    }

    /// Sort rows by age and reject tables that cannot be interpolated
    fn normalise(mut self) -> Result<Self, ReferenceError> {
        if self.rows.len() < 2 {
            return Err(ReferenceError::Malformed(format!(
                "{} {} {} table needs at least two rows",
                self.reference, self.sex, self.measurement_method
            )));
        }

        let invalid = self.rows.iter().any(|row| {
            !(row.age.is_finite() && row.l.is_finite() && row.m.is_finite() && row.s.is_finite())
                || row.m <= 0.0
                || row.s <= 0.0
        });
        if invalid {
            return Err(ReferenceError::Malformed(format!(
                "{} {} {} table has non-finite or non-positive parameters",
                self.reference, self.sex, self.measurement_method
            )));
        }

        self.rows.sort_by(|a, b| a.age.total_cmp(&b.age));
        if self.rows.windows(2).any(|pair| pair[0].age == pair[1].age) {
            return Err(ReferenceError::Malformed(format!(
                "{} {} {} table repeats an age",
                self.reference, self.sex, self.measurement_method
            )));
        }

        Ok(self)
    }

    /// First and last tabulated ages
    pub fn age_span(&self) -> (f64, f64) {
        let first = self.rows.first().map(|row| row.age).unwrap_or(0.0);
        let last = self.rows.last().map(|row| row.age).unwrap_or(0.0);
        (first, last)
    }

    /// Interpolated parameters at `age`
    fn row_at(&self, age: f64) -> Result<LmsRow, ReferenceError> {
        let (min, max) = self.age_span();
        if !age.is_finite() || age < min || age > max {
            return Err(ReferenceError::AgeOutOfRange {
                dataset: self.reference,
                method: self.measurement_method,
                age,
                min,
                max,
            });
        }

        let upper = self.rows.partition_point(|row| row.age < age);
        if upper < self.rows.len() && self.rows[upper].age == age {
            return Ok(self.rows[upper]);
        }

        let (lo, hi) = (self.rows[upper - 1], self.rows[upper]);
        let t = (age - lo.age) / (hi.age - lo.age);
        Ok(LmsRow {
            age,
            l: lo.l + t * (hi.l - lo.l),
            m: lo.m + t * (hi.m - lo.m),
            s: lo.s + t * (hi.s - lo.s),
        })
    }
}

#[derive(Debug, Deserialize)]
struct LmsFile {
    tables: Vec<LmsTable>,
}

/// Standard normal cumulative distribution (Abramowitz & Stegun 26.2.17)
pub fn normal_cdf(z: f64) -> f64 {
    if z > 10.0 {
        return 1.0;
    }
    if z < -10.0 {
        return 0.0;
    }

    let t = 1.0 / (1.0 + 0.231_641_9 * z.abs());
    let d = 0.398_942_280_401_432_7 * (-z * z / 2.0).exp();
    let tail = d
        * t
        * (0.319_381_530
            + t * (-0.356_563_782 + t * (1.781_477_937 + t * (-1.821_255_978 + t * 1.330_274_429))));

    if z >= 0.0 {
        1.0 - tail
    } else {
        tail
    }
}

/// Centiles are reported to 2 dp, so they are held inside these bounds
pub const MIN_CENTILE: f64 = 0.01;
pub const MAX_CENTILE: f64 = 99.99;

/// Centile of an SDS, kept strictly inside (0, 100) after display rounding
pub fn sds_to_centile(sds: f64) -> f64 {
    (normal_cdf(sds) * 100.0).clamp(MIN_CENTILE, MAX_CENTILE)
}

/// Growth reference answering lookups from in-memory LMS tables
#[derive(Debug, Clone, Default)]
pub struct LmsReference {
    source: String,
    tables: HashMap<(ReferenceDataset, Sex, MeasurementMethod), LmsTable>,
}

impl LmsReference {
    /// Create an empty reference; every lookup fails as unsupported
    pub fn new() -> Self {
        Self {
            source: "empty".to_string(),
            tables: HashMap::new(),
        }
    }

    /// Add a table, replacing any earlier table for the same combination
    pub fn insert_table(&mut self, table: LmsTable) -> Result<(), ReferenceError> {
        let table = table.normalise()?;
        debug!(
            "Loaded {} {} {} table with {} rows",
            table.reference,
            table.sex,
            table.measurement_method,
            table.rows.len()
        );
        self.tables.insert(table.key(), table);
        Ok(())
    }

    /// Builder form of [`LmsReference::insert_table`]
    pub fn with_table(mut self, table: LmsTable) -> Result<Self, ReferenceError> {
        self.insert_table(table)?;
        Ok(self)
    }

    /// Parse a `{"tables": [...]}` document
    pub fn from_json_str(json: &str) -> Result<Self, ReferenceError> {
        let file: LmsFile = serde_json::from_str(json)?;
        let mut reference = Self::new();
        reference.source = "inline".to_string();
        for table in file.tables {
            reference.insert_table(table)?;
        }
        Ok(reference)
    }

    /// Load tables from a JSON file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ReferenceError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let mut reference = Self::from_json_str(&json)?;
        reference.source = path.display().to_string();
        info!("Loaded {} growth reference tables from {}", reference.tables.len(), path.display());
        Ok(reference)
    }

    /// Load tables from the file named by `GROWTH_REFERENCE_PATH`.
    ///
    /// Falls back to an empty reference so the service can still start and
    /// report every lookup as unsupported.
    pub fn from_env() -> Self {
        match std::env::var(REFERENCE_PATH_ENV) {
            Ok(path) => match Self::from_json_file(&path) {
                Ok(reference) => reference,
                Err(e) => {
                    warn!("Failed to load growth reference from {}: {}. Using an empty reference.", path, e);
                    Self::new()
                }
            },
            Err(_) => {
                warn!("{} not set - growth reference lookups will be unavailable", REFERENCE_PATH_ENV);
                Self::new()
            }
        }
    }

    fn table(
        &self,
        dataset: ReferenceDataset,
        sex: Sex,
        method: MeasurementMethod,
    ) -> Result<&LmsTable, ReferenceError> {
        self.tables
            .get(&(dataset, sex, method))
            .ok_or(ReferenceError::UnsupportedCombination { dataset, sex, method })
    }
}

impl GrowthReferenceTrait for LmsReference {
    fn lookup_sds_centile(
        &self,
        dataset: ReferenceDataset,
        sex: Sex,
        method: MeasurementMethod,
        age_years: f64,
        value: f64,
    ) -> Result<SdsCentile, ReferenceError> {
        if !value.is_finite() || value <= 0.0 {
            return Err(ReferenceError::InvalidObservation(format!(
                "{} value {} cannot be scored",
                method, value
            )));
        }

        let row = self.table(dataset, sex, method)?.row_at(age_years)?;
        let sds = row.z_score(value);
        Ok(SdsCentile { sds, centile: sds_to_centile(sds) })
    }

    fn lookup_centile_curves(
        &self,
        dataset: ReferenceDataset,
        sex: Sex,
        method: MeasurementMethod,
    ) -> Result<Vec<CentileCurve>, ReferenceError> {
        let table = self.table(dataset, sex, method)?;
        Ok(COLE_NINE_CENTILES
            .iter()
            .map(|line| CentileCurve {
                centile: line.centile,
                sds: line.sds,
                points: table
                    .rows
                    .iter()
                    .filter_map(|row| {
                        row.value_at(line.sds).map(|value| CentilePoint { age: row.age, value })
                    })
                    .collect(),
            })
            .collect())
    }

    fn measurement_from_sds(
        &self,
        dataset: ReferenceDataset,
        sex: Sex,
        method: MeasurementMethod,
        age_years: f64,
        sds: f64,
    ) -> Result<f64, ReferenceError> {
        let row = self.table(dataset, sex, method)?.row_at(age_years)?;
        row.value_at(sds).ok_or_else(|| {
            ReferenceError::InvalidObservation(format!(
                "{} is undefined at SDS {:.2} for age {:.2}",
                method, sds, age_years
            ))
        })
    }

    fn describe(&self) -> ReferenceSummary {
        ReferenceSummary {
            source: self.source.clone(),
            table_count: self.tables.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn height_table() -> LmsTable {
        LmsTable {
            reference: ReferenceDataset::UkWho,
            sex: Sex::Male,
            measurement_method: MeasurementMethod::Height,
            rows: vec![
                LmsRow { age: 4.0, l: 1.0, m: 102.0, s: 0.04 },
                LmsRow { age: 2.0, l: 1.0, m: 86.0, s: 0.04 },
                LmsRow { age: 6.0, l: 1.0, m: 116.0, s: 0.04 },
            ],
        }
    }

    #[test]
    fn test_normal_cdf_reference_points() {
        assert!((normal_cdf(0.0) - 0.5).abs() < 1e-7);
        assert!((normal_cdf(1.959964) - 0.975).abs() < 1e-6);
        assert!((normal_cdf(-2.0) - 0.022750).abs() < 1e-6);
        assert!((normal_cdf(2.0) + normal_cdf(-2.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_extreme_sds_keeps_centile_inside_bounds() {
        assert_eq!(sds_to_centile(12.0), MAX_CENTILE);
        assert_eq!(sds_to_centile(-12.0), MIN_CENTILE);
        assert_eq!(sds_to_centile(5.0), MAX_CENTILE);
        assert!((sds_to_centile(-2.0) - 2.2750).abs() < 1e-4);
    }

    #[test]
    fn test_lookup_at_median_is_fiftieth_centile() {
        let reference = LmsReference::new().with_table(height_table()).unwrap();
        let result = reference
            .lookup_sds_centile(ReferenceDataset::UkWho, Sex::Male, MeasurementMethod::Height, 4.0, 102.0)
            .unwrap();
        assert!(result.sds.abs() < 1e-12);
        assert!((result.centile - 50.0).abs() < 1e-6);
    }

    #[test]
    fn test_lookup_interpolates_between_rows() {
        let reference = LmsReference::new().with_table(height_table()).unwrap();
        // Median at 3 years is halfway between 86 and 102
        let result = reference
            .lookup_sds_centile(ReferenceDataset::UkWho, Sex::Male, MeasurementMethod::Height, 3.0, 94.0)
            .unwrap();
        assert!(result.sds.abs() < 1e-12);

        let above = reference
            .lookup_sds_centile(ReferenceDataset::UkWho, Sex::Male, MeasurementMethod::Height, 3.0, 94.0 * 1.04)
            .unwrap();
        assert!((above.sds - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_measurement_from_sds_inverts_lookup() {
        let reference = LmsReference::new().with_table(height_table()).unwrap();
        let value = reference
            .measurement_from_sds(ReferenceDataset::UkWho, Sex::Male, MeasurementMethod::Height, 5.0, 1.5)
            .unwrap();
        let back = reference
            .lookup_sds_centile(ReferenceDataset::UkWho, Sex::Male, MeasurementMethod::Height, 5.0, value)
            .unwrap();
        assert!((back.sds - 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_unsupported_combination_is_typed() {
        let reference = LmsReference::new().with_table(height_table()).unwrap();
        let err = reference
            .lookup_sds_centile(ReferenceDataset::UkWho, Sex::Female, MeasurementMethod::Height, 4.0, 100.0)
            .unwrap_err();
        assert!(matches!(err, ReferenceError::UnsupportedCombination { sex: Sex::Female, .. }));
    }

    #[test]
    fn test_age_outside_table_is_rejected() {
        let reference = LmsReference::new().with_table(height_table()).unwrap();
        let err = reference
            .lookup_sds_centile(ReferenceDataset::UkWho, Sex::Male, MeasurementMethod::Height, 7.5, 120.0)
            .unwrap_err();
        assert!(matches!(err, ReferenceError::AgeOutOfRange { .. }));
    }

    #[test]
    fn test_non_positive_observation_is_rejected() {
        let reference = LmsReference::new().with_table(height_table()).unwrap();
        let err = reference
            .lookup_sds_centile(ReferenceDataset::UkWho, Sex::Male, MeasurementMethod::Height, 4.0, 0.0)
            .unwrap_err();
        assert!(matches!(err, ReferenceError::InvalidObservation(_)));
    }

    #[test]
    fn test_centile_curves_cover_table_ages() {
        let reference = LmsReference::new().with_table(height_table()).unwrap();
        let curves = reference
            .lookup_centile_curves(ReferenceDataset::UkWho, Sex::Male, MeasurementMethod::Height)
            .unwrap();
        assert_eq!(curves.len(), 9);
        let median = curves.iter().find(|c| c.centile == 50.0).unwrap();
        let ages: Vec<f64> = median.points.iter().map(|p| p.age).collect();
        assert_eq!(ages, vec![2.0, 4.0, 6.0]);
        assert!((median.points[1].value - 102.0).abs() < 1e-9);
    }

    #[test]
    fn test_from_json_str() {
        let json = r#"{
            "tables": [{
                "reference": "turners-syndrome",
                "sex": "female",
                "measurement_method": "height",
                "rows": [
                    {"age": 1.0, "l": 1.0, "m": 70.0, "s": 0.05},
                    {"age": 2.0, "l": 1.0, "m": 80.0, "s": 0.05}
                ]
            }]
        }"#;
        let reference = LmsReference::from_json_str(json).unwrap();
        assert_eq!(reference.describe().table_count, 1);
        assert!(reference
            .lookup_sds_centile(ReferenceDataset::TurnersSyndrome, Sex::Female, MeasurementMethod::Height, 1.5, 75.0)
            .is_ok());
    }

    #[test]
    fn test_single_row_table_is_malformed() {
        let mut table = height_table();
        table.rows.truncate(1);
        let err = LmsReference::new().with_table(table).unwrap_err();
        assert!(matches!(err, ReferenceError::Malformed(_)));
    }
}
