//! Chart series assembly.

use tracing::warn;

use growth_guide_data::models::MeasurementMethod;
use growth_guide_data::reference::GrowthReferenceTrait;

use crate::entities::conversions::convert_to_domain_curve;
use crate::entities::{CalculationResult, ChartRequest, ChartSeries, OverlayKind, OverlayPoint};

/// Centile lines for `request`, clipped to its age range, plus its overlays.
///
/// Problems never fail the call: the series comes back without centile
/// lines and with `message` set instead.
pub fn assemble_series<R: GrowthReferenceTrait + ?Sized>(
    reference: &R,
    request: &ChartRequest,
) -> ChartSeries {
    let mut series = ChartSeries {
        reference: request.reference,
        method: request.method,
        sex: request.sex,
        age_range: request.age_range,
        centiles: Vec::new(),
        overlays: request.overlays.clone(),
        message: None,
    };

    if let Some(range) = request.age_range {
        if !range.is_valid() {
            series.message = Some(format!(
                "Invalid age range: minimum ({}) must be below maximum ({})",
                range.min, range.max
            ));
            return series;
        }
    }

    match reference.lookup_centile_curves(request.reference, request.sex, request.method) {
        Ok(curves) => {
            series.centiles = curves
                .into_iter()
                .map(|curve| convert_to_domain_curve(curve, request.age_range))
                .collect();
        }
        Err(err) => {
            warn!("Centile curves unavailable: {}", err);
            series.message = Some(format!("Centile data unavailable: {}", err));
        }
    }

    series
}

/// Patient points from a calculation for the chart of `method`
pub fn overlays_for(result: &CalculationResult, method: MeasurementMethod) -> Vec<OverlayPoint> {
    let mut overlays = Vec::new();

    if let Some(current) = result.measurement(method) {
        let chronological = current.chronological_point();
        overlays.push(OverlayPoint {
            kind: OverlayKind::Current,
            age: chronological.age_years,
            value: current.value,
            sds: chronological.sds,
            centile: chronological.centile,
            date: Some(result.measurement_date),
        });
        if let Some(corrected) = current.corrected_point() {
            overlays.push(OverlayPoint {
                kind: OverlayKind::Corrected,
                age: corrected.age_years,
                value: current.value,
                sds: corrected.sds,
                centile: corrected.centile,
                date: Some(result.measurement_date),
            });
        }
    }

    overlays.extend(
        result
            .previous_measurements
            .iter()
            .filter(|previous| previous.method == method)
            .map(|previous| OverlayPoint {
                kind: OverlayKind::Previous,
                age: previous.age_years,
                value: previous.value,
                sds: previous.sds,
                centile: previous.centile,
                date: Some(previous.date),
            }),
    );

    if method == MeasurementMethod::Height {
        overlays.extend(result.bone_age.iter().map(|assessment| OverlayPoint {
            kind: OverlayKind::BoneAge,
            age: assessment.bone_age,
            value: assessment.height,
            sds: assessment.sds,
            centile: assessment.centile,
            date: Some(assessment.assessment_date),
        }));
    }

    overlays
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::AgeRange;
    use growth_guide_data::models::{ReferenceDataset, Sex};
    use growth_guide_data::reference::tests::StubGrowthReference;

    fn request(range: Option<AgeRange>) -> ChartRequest {
        ChartRequest {
            reference: ReferenceDataset::UkWho,
            method: MeasurementMethod::Height,
            sex: Sex::Male,
            age_range: range,
            overlays: vec![OverlayPoint {
                kind: OverlayKind::Current,
                age: 4.0,
                value: 102.0,
                sds: 0.1,
                centile: 53.98,
                date: None,
            }],
        }
    }

    #[test]
    fn test_series_has_nine_clipped_lines() {
        let series = assemble_series(&StubGrowthReference::new(), &request(Some(AgeRange::new(2.0, 5.0))));

        assert!(series.message.is_none());
        assert_eq!(series.centiles.len(), 9);
        for curve in &series.centiles {
            assert!(curve.points.iter().all(|p| (2.0..=5.0).contains(&p.age)));
            assert_eq!(curve.points.len(), 7);
        }
        assert_eq!(series.overlays.len(), 1);
    }

    #[test]
    fn test_invalid_range_returns_message() {
        let series = assemble_series(&StubGrowthReference::new(), &request(Some(AgeRange::new(5.0, 2.0))));

        assert!(series.centiles.is_empty());
        assert!(series.message.unwrap().contains("Invalid age range"));
        assert_eq!(series.overlays.len(), 1);
    }

    #[test]
    fn test_reference_failure_returns_message() {
        let reference = StubGrowthReference::new().with_failure(MeasurementMethod::Height);
        let series = assemble_series(&reference, &request(None));

        assert!(series.centiles.is_empty());
        assert!(series.message.unwrap().starts_with("Centile data unavailable"));
    }
}
