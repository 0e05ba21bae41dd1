use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[cfg(feature = "with-api")]
use utoipa::ToSchema;

use growth_guide_data::models::{MeasurementMethod, ReferenceDataset, Sex};

use super::patient::{Gestation, PatientContext};

/// A single anthropometric observation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct Measurement {
    pub method: MeasurementMethod,

    /// Observed value in `unit`
    pub value: f64,

    pub unit: String,

    pub observation_date: NaiveDate,
}

impl Measurement {
    pub fn new(method: MeasurementMethod, value: f64, observation_date: NaiveDate) -> Self {
        Self {
            method,
            value,
            unit: method.unit().to_string(),
            observation_date,
        }
    }
}

/// An earlier set of measurements for the same patient
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct PreviousMeasurement {
    /// Date the measurements were taken
    pub date: NaiveDate,

    /// Weight in kg
    #[validate(range(min = 0.1, max = 300.0, message = "Weight must be between 0.1 and 300 kg"))]
    pub weight: Option<f64>,

    /// Height in cm
    #[validate(range(min = 10.0, max = 250.0, message = "Height must be between 10 and 250 cm"))]
    pub height: Option<f64>,

    /// Head circumference in cm
    #[validate(range(min = 10.0, max = 100.0, message = "Head circumference must be between 10 and 100 cm"))]
    pub ofc: Option<f64>,
}

impl PreviousMeasurement {
    /// Every value carried by this entry as a measurement on `date`
    pub fn measurements(&self) -> Vec<Measurement> {
        [
            (MeasurementMethod::Weight, self.weight),
            (MeasurementMethod::Height, self.height),
            (MeasurementMethod::Ofc, self.ofc),
        ]
        .into_iter()
        .filter_map(|(method, value)| value.map(|v| Measurement::new(method, v, self.date)))
        .collect()
    }
}

/// Skeletal maturity assessment from a hand and wrist X-ray
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct BoneAgeAssessment {
    pub assessment_date: NaiveDate,

    #[validate(range(max = 20, message = "Bone age years must be between 0 and 20"))]
    pub bone_age_years: u8,

    #[serde(default)]
    #[validate(range(max = 11, message = "Bone age months must be between 0 and 11"))]
    pub bone_age_months: u8,

    /// Height at the time of assessment, if measured
    #[validate(range(min = 10.0, max = 250.0, message = "Height must be between 10 and 250 cm"))]
    pub height: Option<f64>,
}

impl BoneAgeAssessment {
    /// Bone age in decimal years
    pub fn bone_age(&self) -> f64 {
        f64::from(self.bone_age_years) + f64::from(self.bone_age_months) / 12.0
    }
}

/// Inclusive age window in decimal years
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct AgeRange {
    pub min: f64,
    pub max: f64,
}

impl AgeRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, age: f64) -> bool {
        age >= self.min && age <= self.max
    }

    /// Whether the window is finite and ordered
    pub fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min < self.max
    }
}

/// Request-scoped presentation settings
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct CalculationOptions {
    /// Growth reference to score against; the service default when absent
    pub reference: Option<ReferenceDataset>,

    /// Age window of the chart the results will be drawn on
    pub chart_range: Option<AgeRange>,
}

/// Input to a growth calculation
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct CalculationRequest {
    pub sex: Sex,

    pub birth_date: NaiveDate,

    /// Date the current measurements were taken
    pub measurement_date: NaiveDate,

    /// Weight in kg
    #[validate(range(min = 0.1, max = 300.0, message = "Weight must be between 0.1 and 300 kg"))]
    pub weight: Option<f64>,

    /// Height or length in cm
    #[validate(range(min = 10.0, max = 250.0, message = "Height must be between 10 and 250 cm"))]
    pub height: Option<f64>,

    /// Head circumference in cm
    #[validate(range(min = 10.0, max = 100.0, message = "Head circumference must be between 10 and 100 cm"))]
    pub ofc: Option<f64>,

    #[validate(range(min = 22, max = 44, message = "Gestation weeks must be between 22 and 44"))]
    pub gestation_weeks: Option<u8>,

    #[validate(range(max = 6, message = "Gestation days must be between 0 and 6"))]
    pub gestation_days: Option<u8>,

    /// Mother's height in cm
    #[validate(range(min = 100.0, max = 250.0, message = "Maternal height must be between 100 and 250 cm"))]
    pub maternal_height: Option<f64>,

    /// Father's height in cm
    #[validate(range(min = 100.0, max = 250.0, message = "Paternal height must be between 100 and 250 cm"))]
    pub paternal_height: Option<f64>,

    #[serde(default)]
    #[validate]
    pub previous_measurements: Vec<PreviousMeasurement>,

    #[serde(default)]
    #[validate]
    pub bone_age_assessments: Vec<BoneAgeAssessment>,

    #[serde(default)]
    pub options: CalculationOptions,
}

impl CalculationRequest {
    /// Minimal request for `sex` and the two dates; measurements are added by the caller
    pub fn new(sex: Sex, birth_date: NaiveDate, measurement_date: NaiveDate) -> Self {
        Self {
            sex,
            birth_date,
            measurement_date,
            weight: None,
            height: None,
            ofc: None,
            gestation_weeks: None,
            gestation_days: None,
            maternal_height: None,
            paternal_height: None,
            previous_measurements: Vec::new(),
            bone_age_assessments: Vec::new(),
            options: CalculationOptions::default(),
        }
    }

    pub fn patient(&self) -> PatientContext {
        PatientContext {
            sex: self.sex,
            birth_date: self.birth_date,
            gestation: self
                .gestation_weeks
                .map(|weeks| Gestation::new(weeks, self.gestation_days.unwrap_or(0))),
        }
    }

    /// Directly observed measurements on the measurement date
    pub fn measurements(&self) -> Vec<Measurement> {
        [
            (MeasurementMethod::Weight, self.weight),
            (MeasurementMethod::Height, self.height),
            (MeasurementMethod::Ofc, self.ofc),
        ]
        .into_iter()
        .filter_map(|(method, value)| {
            value.map(|v| Measurement::new(method, v, self.measurement_date))
        })
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_request_deserializes_with_defaults() {
        let json = r#"{
            "sex": "female",
            "birth_date": "2020-01-15",
            "measurement_date": "2024-06-01",
            "weight": 16.2,
            "height": null
        }"#;
        let request: CalculationRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.sex, Sex::Female);
        assert_eq!(request.weight, Some(16.2));
        assert!(request.previous_measurements.is_empty());
        assert_eq!(request.options, CalculationOptions::default());
        assert_eq!(request.measurements().len(), 1);
    }

    #[test]
    fn test_range_validation() {
        let mut request = CalculationRequest::new(Sex::Male, date(2020, 1, 1), date(2024, 1, 1));
        request.weight = Some(350.0);
        request.gestation_weeks = Some(20);
        let errors = request.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("weight"));
        assert!(fields.contains_key("gestation_weeks"));
    }

    #[test]
    fn test_nested_previous_measurement_validation() {
        let mut request = CalculationRequest::new(Sex::Male, date(2020, 1, 1), date(2024, 1, 1));
        request.height = Some(100.0);
        request.previous_measurements.push(PreviousMeasurement {
            date: date(2023, 1, 1),
            weight: None,
            height: Some(400.0),
            ofc: None,
        });
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_bone_age_in_years() {
        let assessment = BoneAgeAssessment {
            assessment_date: date(2024, 1, 1),
            bone_age_years: 7,
            bone_age_months: 6,
            height: None,
        };
        assert!((assessment.bone_age() - 7.5).abs() < 1e-12);
    }
}
