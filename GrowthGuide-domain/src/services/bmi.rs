//! Body mass index and percentage of median BMI.

/// BMI in kg/m²
pub fn calculate_bmi(weight_kg: f64, height_cm: f64) -> f64 {
    let height_m = height_cm / 100.0;
    weight_kg / (height_m * height_m)
}

/// `bmi` as a percentage of the median BMI for age
pub fn percentage_median(bmi: f64, median: f64) -> f64 {
    bmi / median * 100.0
}

/// Nutritional interpretation of a percentage of median BMI
pub fn interpret_percentage_median(percentage: f64) -> &'static str {
    if percentage < 70.0 {
        "Severe undernutrition"
    } else if percentage < 80.0 {
        "Moderate undernutrition"
    } else if percentage < 90.0 {
        "Mild undernutrition"
    } else if percentage <= 110.0 {
        "Normal"
    } else if percentage <= 120.0 {
        "Above normal range"
    } else {
        "Overweight"
    }
}
