//! Plausibility gate applied to every SDS before it reaches the result.

use growth_guide_data::models::MeasurementMethod;

use crate::entities::ValidationOutcome;

/// Beyond this |SDS| a measurement is kept with a warning
pub const SDS_WARNING_LIMIT: f64 = 4.0;

/// Beyond this |SDS| a weight, height or OFC is rejected
pub const SDS_HARD_LIMIT: f64 = 8.0;

/// Beyond this |SDS| a BMI is rejected
pub const BMI_SDS_HARD_LIMIT: f64 = 15.0;

pub fn hard_limit(method: MeasurementMethod) -> f64 {
    match method {
        MeasurementMethod::Bmi => BMI_SDS_HARD_LIMIT,
        _ => SDS_HARD_LIMIT,
    }
}

/// Classify `sds` for `method` as ok, warning or rejected
pub fn validate(method: MeasurementMethod, sds: f64) -> ValidationOutcome {
    let label = method.label();

    if !sds.is_finite() {
        return ValidationOutcome::rejected(
            method,
            format!("{} SDS could not be calculated. Please check measurement accuracy.", label),
        );
    }

    let limit = hard_limit(method);
    if sds.abs() > limit {
        return ValidationOutcome::rejected(
            method,
            format!(
                "{} SDS ({:.2}) exceeds acceptable range (±{} SDS). Please check measurement accuracy.",
                label, sds, limit
            ),
        );
    }

    if sds.abs() > SDS_WARNING_LIMIT {
        return ValidationOutcome::warning(
            method,
            format!(
                "{} SDS ({:.2}) is beyond ±{} SDS. Please verify measurement accuracy.",
                label, sds, SDS_WARNING_LIMIT
            ),
        );
    }

    ValidationOutcome::ok(method)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::ValidationStatus;

    #[test]
    fn test_warning_boundary() {
        assert_eq!(validate(MeasurementMethod::Height, 4.0).status, ValidationStatus::Ok);
        assert_eq!(validate(MeasurementMethod::Height, -4.0).status, ValidationStatus::Ok);
        assert_eq!(validate(MeasurementMethod::Height, 4.01).status, ValidationStatus::Warning);
        assert_eq!(validate(MeasurementMethod::Weight, -4.01).status, ValidationStatus::Warning);
    }

    #[test]
    fn test_hard_limit() {
        assert_eq!(validate(MeasurementMethod::Weight, 8.0).status, ValidationStatus::Warning);
        assert_eq!(validate(MeasurementMethod::Weight, 8.01).status, ValidationStatus::Rejected);
        assert_eq!(validate(MeasurementMethod::Ofc, -8.01).status, ValidationStatus::Rejected);
    }

    #[test]
    fn test_bmi_has_wider_hard_limit() {
        assert_eq!(validate(MeasurementMethod::Bmi, 8.01).status, ValidationStatus::Warning);
        assert_eq!(validate(MeasurementMethod::Bmi, 14.99).status, ValidationStatus::Warning);
        assert_eq!(validate(MeasurementMethod::Bmi, 15.01).status, ValidationStatus::Rejected);
    }

    #[test]
    fn test_messages() {
        let warning = validate(MeasurementMethod::Height, 4.5);
        assert_eq!(
            warning.message.as_deref(),
            Some("Height SDS (4.50) is beyond ±4 SDS. Please verify measurement accuracy.")
        );

        let rejected = validate(MeasurementMethod::Bmi, -15.5);
        assert_eq!(
            rejected.message.as_deref(),
            Some("BMI SDS (-15.50) exceeds acceptable range (±15 SDS). Please check measurement accuracy.")
        );
        assert!(!rejected.is_retained());
    }

    #[test]
    fn test_non_finite_is_rejected() {
        assert_eq!(validate(MeasurementMethod::Weight, f64::NAN).status, ValidationStatus::Rejected);
    }
}
