//! Mid-parental (target) height.

use growth_guide_data::models::{MeasurementMethod, ReferenceDataset, Sex};
use growth_guide_data::reference::{GrowthReferenceTrait, ReferenceError};

use crate::entities::{AgeRange, MidParentalHeightResult};

/// Average adult height difference between the sexes, in cm
pub const SEX_HEIGHT_DIFFERENCE_CM: f64 = 13.0;

/// Age at which a predicted adult height is scored
pub const ADULT_EVALUATION_AGE: f64 = 18.0;

/// Evaluation age used when the chart runs from 8 to 20 years
pub const EXTENDED_EVALUATION_AGE: f64 = 20.0;

/// Half-width of the target range
pub fn target_range_half_width(sex: Sex) -> f64 {
    match sex {
        Sex::Female => 8.5,
        Sex::Male => 10.0,
    }
}

/// Predicted adult height and target range, without a centile
pub fn predict(maternal_height_cm: f64, paternal_height_cm: f64, sex: Sex) -> MidParentalHeightResult {
    let adjustment = match sex {
        Sex::Female => -SEX_HEIGHT_DIFFERENCE_CM,
        Sex::Male => SEX_HEIGHT_DIFFERENCE_CM,
    };
    let value = (maternal_height_cm + paternal_height_cm + adjustment) / 2.0;
    let half_width = target_range_half_width(sex);

    MidParentalHeightResult {
        value,
        sds: None,
        centile: None,
        target_range_lower: value - half_width,
        target_range_upper: value + half_width,
    }
}

/// Age to score the prediction at for a chart covering `chart_range`
pub fn evaluation_age(chart_range: Option<AgeRange>) -> f64 {
    match chart_range {
        Some(range) if range.min >= 8.0 && range.max >= EXTENDED_EVALUATION_AGE => EXTENDED_EVALUATION_AGE,
        _ => ADULT_EVALUATION_AGE,
    }
}

/// Score the prediction as a UK-WHO height observed at `evaluation_age`
pub fn attach_centile<R: GrowthReferenceTrait + ?Sized>(
    reference: &R,
    result: &mut MidParentalHeightResult,
    sex: Sex,
    evaluation_age: f64,
) -> Result<(), ReferenceError> {
    let score = reference.lookup_sds_centile(
        ReferenceDataset::UkWho,
        sex,
        MeasurementMethod::Height,
        evaluation_age,
        result.value,
    )?;
    result.sds = Some(score.sds);
    result.centile = Some(score.centile);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use growth_guide_data::reference::tests::StubGrowthReference;

    #[test]
    fn test_female_prediction() {
        let result = predict(160.0, 180.0, Sex::Female);
        assert_eq!(result.value, 163.5);
        assert_eq!(result.target_range_lower, 155.0);
        assert_eq!(result.target_range_upper, 172.0);
    }

    #[test]
    fn test_male_prediction() {
        let result = predict(160.0, 180.0, Sex::Male);
        assert_eq!(result.value, 176.5);
        assert_eq!(result.target_range_lower, 166.5);
        assert_eq!(result.target_range_upper, 186.5);
    }

    #[test]
    fn test_evaluation_age() {
        assert_eq!(evaluation_age(None), 18.0);
        assert_eq!(evaluation_age(Some(AgeRange::new(0.0, 2.0))), 18.0);
        assert_eq!(evaluation_age(Some(AgeRange::new(2.0, 20.0))), 18.0);
        assert_eq!(evaluation_age(Some(AgeRange::new(8.0, 20.0))), 20.0);
    }

    #[test]
    fn test_attach_centile() {
        let reference = StubGrowthReference::new().with_sds(MeasurementMethod::Height, 1.0);
        let mut result = predict(160.0, 180.0, Sex::Male);
        attach_centile(&reference, &mut result, Sex::Male, 18.0).unwrap();
        assert_eq!(result.sds, Some(1.0));
        assert!((result.centile.unwrap() - 84.13).abs() < 0.01);
    }

    #[test]
    fn test_attach_centile_failure_leaves_prediction() {
        let reference = StubGrowthReference::new().with_failure(MeasurementMethod::Height);
        let mut result = predict(160.0, 180.0, Sex::Female);
        assert!(attach_centile(&reference, &mut result, Sex::Female, 18.0).is_err());
        assert_eq!(result.value, 163.5);
        assert_eq!(result.centile, None);
    }
}
