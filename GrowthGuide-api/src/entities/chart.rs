use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use growth_guide_data::models::{MeasurementMethod, ReferenceDataset, Sex};
use growth_guide_domain::entities::{AgeRange, CalculationRequest, ChartRequest, OverlayPoint};

/// Request payload for chart data
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ChartDataRequest {
    /// Reference dataset; falls back to the calculation's choice, then the server default
    pub reference: Option<ReferenceDataset>,

    pub method: MeasurementMethod,

    pub sex: Sex,

    /// Age window in decimal years; the whole reference span when absent
    pub age_range: Option<AgeRange>,

    /// Points to draw as supplied by the caller
    #[serde(default)]
    pub overlays: Vec<OverlayPoint>,

    /// Calculation whose results are added as overlays
    pub calculation: Option<CalculationRequest>,
}

/// Convert a public chart request to the domain request
pub fn convert_to_domain_chart_request(
    request: ChartDataRequest,
    default_reference: ReferenceDataset,
) -> ChartRequest {
    let reference = request
        .reference
        .or_else(|| request.calculation.as_ref().and_then(|c| c.options.reference))
        .unwrap_or(default_reference);

    ChartRequest {
        reference,
        method: request.method,
        sex: request.sex,
        age_range: request.age_range,
        overlays: request.overlays,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn request() -> ChartDataRequest {
        ChartDataRequest {
            reference: None,
            method: MeasurementMethod::Weight,
            sex: Sex::Female,
            age_range: None,
            overlays: Vec::new(),
            calculation: None,
        }
    }

    #[test]
    fn test_reference_falls_back_to_default() {
        let chart = convert_to_domain_chart_request(request(), ReferenceDataset::Cdc);
        assert_eq!(chart.reference, ReferenceDataset::Cdc);
    }

    #[test]
    fn test_reference_taken_from_calculation() {
        let birth = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        let mut calculation =
            CalculationRequest::new(Sex::Female, birth, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        calculation.options.reference = Some(ReferenceDataset::TurnersSyndrome);

        let mut data = request();
        data.calculation = Some(calculation);
        let chart = convert_to_domain_chart_request(data.clone(), ReferenceDataset::UkWho);
        assert_eq!(chart.reference, ReferenceDataset::TurnersSyndrome);

        data.reference = Some(ReferenceDataset::Trisomy21);
        let chart = convert_to_domain_chart_request(data, ReferenceDataset::UkWho);
        assert_eq!(chart.reference, ReferenceDataset::Trisomy21);
    }
}
