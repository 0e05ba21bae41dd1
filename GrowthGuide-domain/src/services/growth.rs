use chrono::NaiveDate;
use thiserror::Error;
use tracing::{debug, instrument, warn};
use validator::{Validate, ValidationErrors, ValidationErrorsKind};

use growth_guide_data::models::{MeasurementMethod, ReferenceDataset, Sex};
use growth_guide_data::reference::{
    GrowthReferenceTrait, LmsReference, ReferenceError, ReferenceSummary,
};

use crate::entities::conversions::convert_to_domain_point;
use crate::entities::{
    AgeResult, BoneAgeResult, BsaResult, CalculationRequest, CalculationResult, ChartRequest,
    ChartSeries, Gestation, HeightVelocityResult, Measurement, MeasurementResult,
    MidParentalHeightResult, PreviousMeasurementResult, SdsPoint, ValidationOutcome,
    ValidationStatus,
};
use crate::services::age::calculate_age;
use crate::services::gestation::correction_for;
use crate::services::{bmi, bsa, chart, gh_dose, mid_parental, round_to, sds_gate, velocity};

/// Growth service errors
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GrowthServiceError {
    /// The request breaks the input contract
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Every provided measurement was rejected or could not be scored
    #[error("No valid measurements: {}", .0.join("; "))]
    NoValidMeasurements(Vec<String>),
}

/// Trait for growth calculation operations
pub trait GrowthServiceTrait {
    /// Check a calculation request against the input contract
    fn validate_calculation_request(
        &self,
        request: &CalculationRequest,
    ) -> Result<(), GrowthServiceError>;

    /// Score every measurement in a validated request and derive the
    /// downstream results
    fn calculate(&self, request: &CalculationRequest)
        -> Result<CalculationResult, GrowthServiceError>;

    /// Centile lines and overlays for one chart
    fn chart_series(&self, request: &ChartRequest) -> ChartSeries;

    /// Dataset used when a request does not name one
    fn default_reference(&self) -> ReferenceDataset;

    /// Description of the loaded reference data
    fn reference_summary(&self) -> ReferenceSummary;
}

/// Fixed inputs for scoring measurements taken on one date
struct ScoringContext {
    dataset: ReferenceDataset,
    sex: Sex,
    age_years: f64,
    corrected_age_years: Option<f64>,
}

impl ScoringContext {
    /// Age to read reference values at: corrected when eligible
    fn effective_age(&self) -> f64 {
        self.corrected_age_years.unwrap_or(self.age_years)
    }
}

/// Gate outcomes and user-facing warnings gathered while scoring
#[derive(Default)]
struct Notes {
    validation: Vec<ValidationOutcome>,
    warnings: Vec<String>,
}

/// Growth service combining the calculators with a growth reference
pub struct GrowthService<R: GrowthReferenceTrait> {
    reference: R,
    default_reference: ReferenceDataset,
}

impl<R: GrowthReferenceTrait> GrowthService<R> {
    /// Create a new growth service scoring against `reference`
    pub fn new(reference: R) -> Self {
        Self {
            reference,
            default_reference: ReferenceDataset::default(),
        }
    }

    /// Use `dataset` for requests that do not choose one
    pub fn with_default_reference(mut self, dataset: ReferenceDataset) -> Self {
        self.default_reference = dataset;
        self
    }

    /// Map reference errors to per-measurement messages
    fn map_reference_error(&self, method: MeasurementMethod, err: &ReferenceError) -> String {
        match err {
            ReferenceError::UnsupportedCombination { .. } | ReferenceError::AgeOutOfRange { .. } => {
                format!("{} SDS unavailable: {}", method.label(), err)
            }
            _ => format!("{} SDS could not be calculated: {}", method.label(), err),
        }
    }

    /// Score one current measurement and run it through the SDS gate
    fn score_measurement(
        &self,
        context: &ScoringContext,
        measurement: &Measurement,
        notes: &mut Notes,
    ) -> Option<MeasurementResult> {
        let method = measurement.method;

        let chronological = match self.reference.lookup_sds_centile(
            context.dataset,
            context.sex,
            method,
            context.age_years,
            measurement.value,
        ) {
            Ok(score) => score,
            Err(err) => {
                let message = self.map_reference_error(method, &err);
                warn!("{}", message);
                notes.validation.push(ValidationOutcome::rejected(method, message.clone()));
                notes.warnings.push(message);
                return None;
            }
        };

        let corrected = context.corrected_age_years.and_then(|age| {
            match self.reference.lookup_sds_centile(
                context.dataset,
                context.sex,
                method,
                age,
                measurement.value,
            ) {
                Ok(score) => Some(convert_to_domain_point(age, score)),
                Err(err) => {
                    warn!("Corrected {} lookup failed: {}", method, err);
                    notes
                        .warnings
                        .push(format!("Corrected-age {}", self.map_reference_error(method, &err)));
                    None
                }
            }
        });

        // The corrected score, when there is one, is the score reported and gated
        let (primary, chronological) = match corrected {
            Some(point) => (point, Some(convert_to_domain_point(context.age_years, chronological))),
            None => (convert_to_domain_point(context.age_years, chronological), None),
        };

        let outcome = sds_gate::validate(method, primary.sds);
        if let Some(message) = &outcome.message {
            warn!("{}", message);
            notes.warnings.push(message.clone());
        }
        let status = outcome.status;
        notes.validation.push(outcome);

        if status == ValidationStatus::Rejected {
            return None;
        }

        Some(MeasurementResult {
            method,
            value: measurement.value,
            unit: measurement.unit.clone(),
            age_years: primary.age_years,
            sds: round_to(primary.sds, 2),
            centile: round_to(primary.centile, 2),
            status,
            chronological: chronological.map(|point| SdsPoint {
                sds: round_to(point.sds, 2),
                centile: round_to(point.centile, 2),
                ..point
            }),
            percentage_median: None,
            percentage_median_interpretation: None,
        })
    }

    /// Attach percentage of median BMI; a failed median lookup leaves it absent
    fn with_percentage_median(
        &self,
        mut result: MeasurementResult,
        context: &ScoringContext,
    ) -> MeasurementResult {
        match self.reference.measurement_from_sds(
            context.dataset,
            context.sex,
            MeasurementMethod::Bmi,
            context.effective_age(),
            0.0,
        ) {
            Ok(median) if median > 0.0 => {
                let percentage = round_to(bmi::percentage_median(result.value, median), 1);
                result.percentage_median = Some(percentage);
                result.percentage_median_interpretation =
                    Some(bmi::interpret_percentage_median(percentage).to_string());
            }
            Ok(median) => warn!("Reference returned a non-positive median BMI ({})", median),
            Err(err) => warn!("Median BMI lookup failed: {}", err),
        }
        result
    }

    /// Score previous measurements at their own (corrected when eligible) ages
    fn score_previous(
        &self,
        request: &CalculationRequest,
        dataset: ReferenceDataset,
        gestation: Option<Gestation>,
        notes: &mut Notes,
    ) -> Vec<PreviousMeasurementResult> {
        let mut entries: Vec<_> = request.previous_measurements.iter().collect();
        entries.sort_by_key(|entry| entry.date);

        let mut results = Vec::new();
        for entry in entries {
            let age = calculate_age(request.birth_date, entry.date);
            let corrected = correction_for(gestation, request.birth_date, entry.date, age.decimal_years);
            let age_years = corrected.map(|a| a.decimal_years).unwrap_or(age.decimal_years);

            for measurement in entry.measurements() {
                let method = measurement.method;
                let score = match self.reference.lookup_sds_centile(
                    dataset,
                    request.sex,
                    method,
                    age_years,
                    measurement.value,
                ) {
                    Ok(score) => score,
                    Err(err) => {
                        warn!("Previous {} on {} not scored: {}", method, entry.date, err);
                        notes.warnings.push(format!(
                            "Previous measurement on {}: {}",
                            entry.date,
                            self.map_reference_error(method, &err)
                        ));
                        continue;
                    }
                };

                let outcome = sds_gate::validate(method, score.sds);
                if let Some(message) = &outcome.message {
                    notes
                        .warnings
                        .push(format!("Previous measurement on {}: {}", entry.date, message));
                }
                if !outcome.is_retained() {
                    continue;
                }

                results.push(PreviousMeasurementResult {
                    date: entry.date,
                    method,
                    value: measurement.value,
                    age_years,
                    sds: round_to(score.sds, 2),
                    centile: round_to(score.centile, 2),
                    corrected_age_applied: corrected.is_some(),
                });
            }
        }
        results
    }

    /// Score heights against bone age
    fn score_bone_age(
        &self,
        request: &CalculationRequest,
        dataset: ReferenceDataset,
        current_height: Option<f64>,
        notes: &mut Notes,
    ) -> Vec<BoneAgeResult> {
        let mut assessments: Vec<_> = request.bone_age_assessments.iter().collect();
        assessments.sort_by_key(|assessment| assessment.assessment_date);

        let mut results = Vec::new();
        for assessment in assessments {
            let same_day_height = if assessment.assessment_date == request.measurement_date {
                current_height
            } else {
                None
            };
            let Some(height) = assessment.height.or(same_day_height) else {
                debug!("Bone age assessment on {} has no height to score", assessment.assessment_date);
                continue;
            };

            let bone_age = assessment.bone_age();
            match self.reference.lookup_sds_centile(
                dataset,
                request.sex,
                MeasurementMethod::Height,
                bone_age,
                height,
            ) {
                Ok(score) => results.push(BoneAgeResult {
                    assessment_date: assessment.assessment_date,
                    bone_age,
                    chronological_age: calculate_age(request.birth_date, assessment.assessment_date)
                        .decimal_years,
                    height,
                    sds: round_to(score.sds, 2),
                    centile: round_to(score.centile, 2),
                }),
                Err(err) => {
                    warn!("Bone age height on {} not scored: {}", assessment.assessment_date, err);
                    notes.warnings.push(format!(
                        "Bone age assessment on {}: {}",
                        assessment.assessment_date,
                        self.map_reference_error(MeasurementMethod::Height, &err)
                    ));
                }
            }
        }
        results
    }

    fn mid_parental_height(
        &self,
        request: &CalculationRequest,
        notes: &mut Notes,
    ) -> Option<MidParentalHeightResult> {
        let (maternal, paternal) = match (request.maternal_height, request.paternal_height) {
            (Some(maternal), Some(paternal)) => (maternal, paternal),
            _ => return None,
        };

        let mut result = mid_parental::predict(maternal, paternal, request.sex);
        let evaluation_age = mid_parental::evaluation_age(request.options.chart_range);
        if let Err(err) = mid_parental::attach_centile(&self.reference, &mut result, request.sex, evaluation_age) {
            warn!("Mid-parental height centile unavailable: {}", err);
            notes
                .warnings
                .push(format!("Mid-parental height centile unavailable: {}", err));
        }

        Some(MidParentalHeightResult {
            value: round_to(result.value, 1),
            sds: result.sds.map(|sds| round_to(sds, 2)),
            centile: result.centile.map(|centile| round_to(centile, 1)),
            target_range_lower: round_to(result.target_range_lower, 1),
            target_range_upper: round_to(result.target_range_upper, 1),
        })
    }
}

/// Display form of an age: decimal years to 2 dp
fn rounded_age(age: AgeResult) -> AgeResult {
    AgeResult {
        decimal_years: round_to(age.decimal_years, 2),
        ..age
    }
}

/// Flatten validator errors, including nested list entries, into sorted messages
fn collect_validation_messages(prefix: &str, errors: &ValidationErrors, messages: &mut Vec<String>) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{}.{}", prefix, field)
        };
        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                let error_msgs: Vec<String> = field_errors
                    .iter()
                    .map(|err| {
                        if let Some(msg) = &err.message {
                            msg.to_string()
                        } else {
                            format!("Invalid {}", field)
                        }
                    })
                    .collect();
                messages.push(format!("{}: {}", path, error_msgs.join(", ")));
            }
            ValidationErrorsKind::Struct(inner) => collect_validation_messages(&path, inner, messages),
            ValidationErrorsKind::List(entries) => {
                for (index, inner) in entries {
                    collect_validation_messages(&format!("{}[{}]", path, index), inner, messages);
                }
            }
        }
    }
}

fn check_not_before_birth(
    birth_date: NaiveDate,
    date: NaiveDate,
    what: &str,
    problems: &mut Vec<String>,
) {
    if date < birth_date {
        problems.push(format!("{} ({}) cannot be before birth date", what, date));
    }
}

impl<R: GrowthReferenceTrait> GrowthServiceTrait for GrowthService<R> {
    fn validate_calculation_request(
        &self,
        request: &CalculationRequest,
    ) -> Result<(), GrowthServiceError> {
        // Use the validator crate's validation
        if let Err(validation_errors) = request.validate() {
            let mut messages = Vec::new();
            collect_validation_messages("", &validation_errors, &mut messages);
            messages.sort();
            return Err(GrowthServiceError::ValidationError(messages.join("; ")));
        }

        let mut problems = Vec::new();

        if request.measurement_date <= request.birth_date {
            problems.push("Measurement date must be after birth date".to_string());
        }

        if request.weight.is_none() && request.height.is_none() && request.ofc.is_none() {
            problems.push("At least one measurement (weight, height, or OFC) is required".to_string());
        }

        if request.gestation_days.is_some() && request.gestation_weeks.is_none() {
            problems.push("Gestation days require gestation weeks".to_string());
        }

        for previous in &request.previous_measurements {
            check_not_before_birth(request.birth_date, previous.date, "Previous measurement date", &mut problems);
            if previous.measurements().is_empty() {
                problems.push(format!("Previous measurement on {} has no values", previous.date));
            }
        }

        for assessment in &request.bone_age_assessments {
            check_not_before_birth(
                request.birth_date,
                assessment.assessment_date,
                "Bone age assessment date",
                &mut problems,
            );
        }

        if let Some(range) = request.options.chart_range {
            if !range.is_valid() {
                problems.push("Chart age range minimum must be below maximum".to_string());
            }
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(GrowthServiceError::ValidationError(problems.join("; ")))
        }
    }

    #[instrument(skip_all, fields(sex = %request.sex))]
    fn calculate(
        &self,
        request: &CalculationRequest,
    ) -> Result<CalculationResult, GrowthServiceError> {
        let dataset = request.options.reference.unwrap_or(self.default_reference);
        let patient = request.patient();

        let age = calculate_age(patient.birth_date, request.measurement_date);
        let corrected_age = correction_for(
            patient.gestation,
            patient.birth_date,
            request.measurement_date,
            age.decimal_years,
        );
        debug!(
            "Scoring against {} at age {:.3} (corrected: {:?})",
            dataset,
            age.decimal_years,
            corrected_age.map(|a| a.decimal_years)
        );

        let context = ScoringContext {
            dataset,
            sex: patient.sex,
            age_years: age.decimal_years,
            corrected_age_years: corrected_age.map(|a| a.decimal_years),
        };
        let mut notes = Notes::default();

        let (mut weight, mut height, mut ofc) = (None, None, None);
        for measurement in request.measurements() {
            let scored = self.score_measurement(&context, &measurement, &mut notes);
            match measurement.method {
                MeasurementMethod::Weight => weight = scored,
                MeasurementMethod::Height => height = scored,
                MeasurementMethod::Ofc => ofc = scored,
                MeasurementMethod::Bmi => {}
            }
        }

        // BMI only from values that survived the gate
        let bmi = match (&weight, &height) {
            (Some(weight), Some(height)) => {
                let value = round_to(bmi::calculate_bmi(weight.value, height.value), 1);
                let measurement = Measurement::new(MeasurementMethod::Bmi, value, request.measurement_date);
                self.score_measurement(&context, &measurement, &mut notes)
                    .map(|result| self.with_percentage_median(result, &context))
            }
            _ => None,
        };

        if weight.is_none() && height.is_none() && ofc.is_none() && bmi.is_none() {
            warn!("No measurement survived scoring");
            return Err(GrowthServiceError::NoValidMeasurements(notes.warnings));
        }

        let bsa = weight.as_ref().map(|weight| {
            let result = bsa::calculate_bsa(weight.value, height.as_ref().map(|h| h.value));
            BsaResult {
                value: round_to(result.value, 2),
                ..result
            }
        });

        let gh_dose = match (&bsa, &weight) {
            (Some(bsa), Some(weight)) => gh_dose::calculate_gh_dose(bsa.value, weight.value),
            _ => None,
        };

        let mid_parental_height = self.mid_parental_height(request, &mut notes);
        let previous_measurements = self.score_previous(request, dataset, patient.gestation, &mut notes);
        let bone_age = self.score_bone_age(
            request,
            dataset,
            height.as_ref().map(|h| h.value),
            &mut notes,
        );

        // Velocity reads only previous heights the gate accepted
        let previous_height = velocity::select_previous_height(
            request.measurement_date,
            previous_measurements
                .iter()
                .filter(|previous| previous.method == MeasurementMethod::Height)
                .map(|previous| (previous.date, previous.value)),
        );
        let height_velocity = match (&height, previous_height) {
            (Some(current), Some((previous_date, previous_height))) => {
                let result = velocity::calculate_height_velocity(
                    current.value,
                    request.measurement_date,
                    previous_height,
                    previous_date,
                );
                Some(HeightVelocityResult {
                    value: result.value.map(|v| round_to(v, 1)),
                    ..result
                })
            }
            _ => None,
        };

        debug!(
            "Calculation complete with {} warnings",
            notes.warnings.len()
        );

        Ok(CalculationResult {
            reference: dataset,
            measurement_date: request.measurement_date,
            age: rounded_age(age),
            corrected_age: corrected_age.map(rounded_age),
            gestation_correction_applied: corrected_age.is_some(),
            weight,
            height,
            bmi,
            ofc,
            bsa,
            height_velocity,
            mid_parental_height,
            gh_dose,
            previous_measurements,
            bone_age,
            validation: notes.validation,
            warnings: notes.warnings,
        })
    }

    #[instrument(skip_all, fields(reference = %request.reference, method = %request.method))]
    fn chart_series(&self, request: &ChartRequest) -> ChartSeries {
        chart::assemble_series(&self.reference, request)
    }

    fn default_reference(&self) -> ReferenceDataset {
        self.default_reference
    }

    fn reference_summary(&self) -> ReferenceSummary {
        self.reference.describe()
    }
}

/// Create a growth service over any reference implementation
pub fn create_growth_service<R>(reference: R) -> impl GrowthServiceTrait + Send + Sync
where
    R: GrowthReferenceTrait + Send + Sync,
{
    GrowthService::new(reference)
}

/// Create a growth service over the LMS tables named by the environment
pub fn create_default_growth_service(
    default_reference: ReferenceDataset,
) -> impl GrowthServiceTrait + Send + Sync {
    GrowthService::new(LmsReference::from_env()).with_default_reference(default_reference)
}

/// Create a mock growth service for testing
/// This function is only available when the mock feature is enabled
#[cfg(feature = "mock")]
pub fn create_mock_growth_service() -> impl GrowthServiceTrait + Send + Sync {
    crate::testing::MockGrowthService::new()
}
