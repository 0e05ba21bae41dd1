//! Standard growth hormone dose.

use crate::entities::GhDose;
use super::round_to;

/// Standard dose in mg per m² per week
pub const GH_STANDARD_DOSE_MG_M2_WEEK: f64 = 7.0;

/// Daily dose at the standard rate, rounded to the nearest 0.1 mg, with the
/// weekly and per-kilogram rates that dose actually delivers
pub fn calculate_gh_dose(bsa: f64, weight_kg: f64) -> Option<GhDose> {
    if !(bsa > 0.0 && weight_kg > 0.0) {
        return None;
    }

    let mg_per_day = round_to(GH_STANDARD_DOSE_MG_M2_WEEK * bsa / 7.0, 1);
    Some(GhDose {
        mg_per_day,
        mg_m2_week: round_to(mg_per_day * 7.0 / bsa, 1),
        mcg_kg_day: round_to(mg_per_day * 1000.0 / weight_kg, 1),
    })
}
