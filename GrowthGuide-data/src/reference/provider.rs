use crate::models::{CentileCurve, MeasurementMethod, ReferenceDataset, SdsCentile, Sex};
use super::errors::ReferenceError;

/// Summary of what a reference implementation can answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceSummary {
    /// Name of the backing source (file path, service name, ...)
    pub source: String,

    /// Number of dataset/sex/measurement tables available
    pub table_count: usize,
}

/// Narrow interface to the external growth-reference statistical service.
///
/// Every call is blocking and may fail; failures are typed so the caller can
/// omit a single measurement instead of failing a whole calculation.
pub trait GrowthReferenceTrait {
    /// SDS and centile of `value` observed at `age_years`
    fn lookup_sds_centile(
        &self,
        dataset: ReferenceDataset,
        sex: Sex,
        method: MeasurementMethod,
        age_years: f64,
        value: f64,
    ) -> Result<SdsCentile, ReferenceError>;

    /// Coordinates of the standard centile lines, each ordered by age
    fn lookup_centile_curves(
        &self,
        dataset: ReferenceDataset,
        sex: Sex,
        method: MeasurementMethod,
    ) -> Result<Vec<CentileCurve>, ReferenceError>;

    /// Measurement value that sits at `sds` for the given age
    fn measurement_from_sds(
        &self,
        dataset: ReferenceDataset,
        sex: Sex,
        method: MeasurementMethod,
        age_years: f64,
        sds: f64,
    ) -> Result<f64, ReferenceError>;

    /// Describe the loaded reference data
    fn describe(&self) -> ReferenceSummary;
}

/// Deterministic reference double for testing
#[cfg(any(test, feature = "mock"))]
pub mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::models::{CentilePoint, COLE_NINE_CENTILES};
    use crate::reference::lms::sds_to_centile;

    /// Reference double that answers every lookup with a configured SDS.
    ///
    /// Centile curves follow a straight line per centile so chart assembly can
    /// be checked without real reference data.
    #[derive(Debug, Clone, Default)]
    pub struct StubGrowthReference {
        sds: HashMap<MeasurementMethod, f64>,
        medians: HashMap<MeasurementMethod, f64>,
        failing: Vec<MeasurementMethod>,
    }

    impl StubGrowthReference {
        /// Create a stub that scores every observation at SDS 0
        pub fn new() -> Self {
            Self::default()
        }

        /// Score observations of `method` at a fixed SDS
        pub fn with_sds(mut self, method: MeasurementMethod, sds: f64) -> Self {
            self.sds.insert(method, sds);
            self
        }

        /// Answer median lookups for `method` with a fixed value
        pub fn with_median(mut self, method: MeasurementMethod, value: f64) -> Self {
            self.medians.insert(method, value);
            self
        }

        /// Fail every lookup for `method` as an unsupported combination
        pub fn with_failure(mut self, method: MeasurementMethod) -> Self {
            self.failing.push(method);
            self
        }

        fn check(
            &self,
            dataset: ReferenceDataset,
            sex: Sex,
            method: MeasurementMethod,
        ) -> Result<(), ReferenceError> {
            if self.failing.contains(&method) {
                return Err(ReferenceError::UnsupportedCombination { dataset, sex, method });
            }
            Ok(())
        }
    }

    impl GrowthReferenceTrait for StubGrowthReference {
        fn lookup_sds_centile(
            &self,
            dataset: ReferenceDataset,
            sex: Sex,
            method: MeasurementMethod,
            _age_years: f64,
            _value: f64,
        ) -> Result<SdsCentile, ReferenceError> {
            self.check(dataset, sex, method)?;
            let sds = self.sds.get(&method).copied().unwrap_or(0.0);
            Ok(SdsCentile { sds, centile: sds_to_centile(sds) })
        }

        fn lookup_centile_curves(
            &self,
            dataset: ReferenceDataset,
            sex: Sex,
            method: MeasurementMethod,
        ) -> Result<Vec<CentileCurve>, ReferenceError> {
            self.check(dataset, sex, method)?;
            Ok(COLE_NINE_CENTILES
                .iter()
                .map(|line| CentileCurve {
                    centile: line.centile,
                    sds: line.sds,
                    points: (0..=40)
                        .map(|step| {
                            let age = step as f64 * 0.5;
                            CentilePoint { age, value: 50.0 + 5.0 * age + 3.0 * line.sds }
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
            _age_years: f64,
            _sds: f64,
        ) -> Result<f64, ReferenceError> {
            self.check(dataset, sex, method)?;
            self.medians
                .get(&method)
                .copied()
                .ok_or(ReferenceError::UnsupportedCombination { dataset, sex, method })
        }

        fn describe(&self) -> ReferenceSummary {
            ReferenceSummary { source: "stub".to_string(), table_count: MeasurementMethod::ALL.len() }
        }
    }
}
