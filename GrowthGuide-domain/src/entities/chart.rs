use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[cfg(feature = "with-api")]
use utoipa::ToSchema;

use growth_guide_data::models::{CentileCurve, MeasurementMethod, ReferenceDataset, Sex};

use super::measurement::AgeRange;

/// Kind of patient point drawn over the centile lines
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum OverlayKind {
    Current,
    Corrected,
    Previous,
    BoneAge,
}

/// Patient point with its own score for tooltips
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct OverlayPoint {
    pub kind: OverlayKind,
    pub age: f64,
    pub value: f64,
    pub sds: f64,
    pub centile: f64,
    pub date: Option<NaiveDate>,
}

/// Request for one growth chart
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct ChartRequest {
    pub reference: ReferenceDataset,
    pub method: MeasurementMethod,
    pub sex: Sex,

    /// Age window to keep; the whole curve when absent
    pub age_range: Option<AgeRange>,

    #[serde(default)]
    pub overlays: Vec<OverlayPoint>,
}

/// Centile lines plus patient overlays, ready for plotting
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct ChartSeries {
    pub reference: ReferenceDataset,
    pub method: MeasurementMethod,
    pub sex: Sex,
    pub age_range: Option<AgeRange>,
    pub centiles: Vec<CentileCurve>,
    pub overlays: Vec<OverlayPoint>,

    /// Why the centile lines are missing, if they are
    pub message: Option<String>,
}
