use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[cfg(feature = "with-api")]
use utoipa::ToSchema;

use growth_guide_data::models::{MeasurementMethod, ReferenceDataset};

/// Whole years, months and days elapsed
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct CalendarAge {
    pub years: u32,
    pub months: u32,
    pub days: u32,
}

/// Age at an observation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct AgeResult {
    /// `years + months/12 + days/365.25`, negative before the reference date
    pub decimal_years: f64,

    /// Calendar breakdown of the elapsed time (magnitude only)
    pub calendar: CalendarAge,
}

/// Outcome of the SDS plausibility gate
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum ValidationStatus {
    Ok,
    Warning,
    Rejected,
}

/// Gate outcome for one measurement type
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct ValidationOutcome {
    pub method: MeasurementMethod,
    pub status: ValidationStatus,
    pub message: Option<String>,
}

impl ValidationOutcome {
    pub fn ok(method: MeasurementMethod) -> Self {
        Self { method, status: ValidationStatus::Ok, message: None }
    }

    pub fn warning(method: MeasurementMethod, message: String) -> Self {
        Self { method, status: ValidationStatus::Warning, message: Some(message) }
    }

    pub fn rejected(method: MeasurementMethod, message: String) -> Self {
        Self { method, status: ValidationStatus::Rejected, message: Some(message) }
    }

    /// Whether the measurement stays in the result
    pub fn is_retained(&self) -> bool {
        self.status != ValidationStatus::Rejected
    }
}

/// SDS and centile of a value at a specific age
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct SdsPoint {
    pub age_years: f64,
    pub sds: f64,
    pub centile: f64,
}

/// A scored measurement that passed the SDS gate
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct MeasurementResult {
    pub method: MeasurementMethod,
    pub value: f64,
    pub unit: String,

    /// Age the primary score was read at: corrected when correction applies
    pub age_years: f64,
    pub sds: f64,
    pub centile: f64,

    /// Gate outcome for `sds`
    pub status: ValidationStatus,

    /// Score at chronological age, present only when `sds` is corrected
    pub chronological: Option<SdsPoint>,

    /// BMI as a percentage of the median BMI for age (BMI only)
    pub percentage_median: Option<f64>,
    pub percentage_median_interpretation: Option<String>,
}

impl MeasurementResult {
    /// Score at chronological age
    pub fn chronological_point(&self) -> SdsPoint {
        self.chronological.unwrap_or(SdsPoint {
            age_years: self.age_years,
            sds: self.sds,
            centile: self.centile,
        })
    }

    /// Score at the gestation-corrected age, when correction applies
    pub fn corrected_point(&self) -> Option<SdsPoint> {
        self.chronological.map(|_| SdsPoint {
            age_years: self.age_years,
            sds: self.sds,
            centile: self.centile,
        })
    }
}

/// Formula used for a body surface area
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum BsaMethod {
    Boyd,
    LookupTable,
}

/// Body surface area in m²
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct BsaResult {
    pub value: f64,
    pub method: BsaMethod,
}

/// Annualised height velocity, or why it could not be given
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct HeightVelocityResult {
    /// cm/year
    pub value: Option<f64>,
    pub message: Option<String>,
}

impl HeightVelocityResult {
    pub fn value(value: f64) -> Self {
        Self { value: Some(value), message: None }
    }

    pub fn message(message: impl Into<String>) -> Self {
        Self { value: None, message: Some(message.into()) }
    }
}

/// Predicted adult height from parental heights
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct MidParentalHeightResult {
    /// cm
    pub value: f64,
    pub sds: Option<f64>,
    pub centile: Option<f64>,

    /// Lower bound of the target range in cm
    pub target_range_lower: f64,

    /// Upper bound of the target range in cm
    pub target_range_upper: f64,
}

/// Growth hormone dose at the standard 7 mg/m²/week
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct GhDose {
    pub mg_per_day: f64,
    pub mg_m2_week: f64,
    pub mcg_kg_day: f64,
}

/// A previous measurement scored at its own age
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct PreviousMeasurementResult {
    pub date: NaiveDate,
    pub method: MeasurementMethod,
    pub value: f64,

    /// Age the value was scored at (corrected when `corrected_age_applied`)
    pub age_years: f64,
    pub sds: f64,
    pub centile: f64,
    pub corrected_age_applied: bool,
}

/// Height scored against bone age instead of chronological age
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct BoneAgeResult {
    pub assessment_date: NaiveDate,
    pub bone_age: f64,
    pub chronological_age: f64,
    pub height: f64,
    pub sds: f64,
    pub centile: f64,
}

/// Full output of one growth calculation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct CalculationResult {
    pub reference: ReferenceDataset,
    pub measurement_date: NaiveDate,
    pub age: AgeResult,
    pub corrected_age: Option<AgeResult>,
    pub gestation_correction_applied: bool,

    pub weight: Option<MeasurementResult>,
    pub height: Option<MeasurementResult>,
    pub bmi: Option<MeasurementResult>,
    pub ofc: Option<MeasurementResult>,

    pub bsa: Option<BsaResult>,
    pub height_velocity: Option<HeightVelocityResult>,
    pub mid_parental_height: Option<MidParentalHeightResult>,
    pub gh_dose: Option<GhDose>,

    pub previous_measurements: Vec<PreviousMeasurementResult>,
    pub bone_age: Vec<BoneAgeResult>,

    /// One gate outcome per measurement type attempted
    pub validation: Vec<ValidationOutcome>,
    pub warnings: Vec<String>,
}

impl CalculationResult {
    /// Result for `method`, if it was retained
    pub fn measurement(&self, method: MeasurementMethod) -> Option<&MeasurementResult> {
        match method {
            MeasurementMethod::Weight => self.weight.as_ref(),
            MeasurementMethod::Height => self.height.as_ref(),
            MeasurementMethod::Bmi => self.bmi.as_ref(),
            MeasurementMethod::Ofc => self.ofc.as_ref(),
        }
    }
}
