//! Body surface area.

use crate::entities::{BsaMethod, BsaResult};

/// Weight (kg) to BSA (m²) anchors from the children's formulary tables
const BSA_LOOKUP_TABLE: [(f64, f64); 99] = [
    (1.0, 0.10), (1.5, 0.13), (2.0, 0.16), (2.5, 0.19), (3.0, 0.21), (3.5, 0.24),
    (4.0, 0.26), (4.5, 0.28), (5.0, 0.30), (5.5, 0.32), (6.0, 0.34), (6.5, 0.36),
    (7.0, 0.38), (7.5, 0.40), (8.0, 0.42), (8.5, 0.44), (9.0, 0.46), (9.5, 0.47),
    (10.0, 0.49), (11.0, 0.53), (12.0, 0.56), (13.0, 0.59), (14.0, 0.62), (15.0, 0.65),
    (16.0, 0.68), (17.0, 0.71), (18.0, 0.74), (19.0, 0.77), (20.0, 0.79), (21.0, 0.82),
    (22.0, 0.85), (23.0, 0.87), (24.0, 0.90), (25.0, 0.92), (26.0, 0.95), (27.0, 0.97),
    (28.0, 1.0), (29.0, 1.0), (30.0, 1.1), (31.0, 1.1), (32.0, 1.1), (33.0, 1.1),
    (34.0, 1.1), (35.0, 1.2), (36.0, 1.2), (37.0, 1.2), (38.0, 1.2), (39.0, 1.3),
    (40.0, 1.3), (41.0, 1.3), (42.0, 1.3), (43.0, 1.3), (44.0, 1.4), (45.0, 1.4),
    (46.0, 1.4), (47.0, 1.4), (48.0, 1.4), (49.0, 1.5), (50.0, 1.5), (51.0, 1.5),
    (52.0, 1.5), (53.0, 1.5), (54.0, 1.6), (55.0, 1.6), (56.0, 1.6), (57.0, 1.6),
    (58.0, 1.6), (59.0, 1.7), (60.0, 1.7), (61.0, 1.7), (62.0, 1.7), (63.0, 1.7),
    (64.0, 1.7), (65.0, 1.8), (66.0, 1.8), (67.0, 1.8), (68.0, 1.8), (69.0, 1.8),
    (70.0, 1.9), (71.0, 1.9), (72.0, 1.9), (73.0, 1.9), (74.0, 1.9), (75.0, 1.9),
    (76.0, 2.0), (77.0, 2.0), (78.0, 2.0), (79.0, 2.0), (80.0, 2.0), (81.0, 2.0),
    (82.0, 2.1), (83.0, 2.1), (84.0, 2.1), (85.0, 2.1), (86.0, 2.1), (87.0, 2.1),
    (88.0, 2.2), (89.0, 2.2), (90.0, 2.2),
];

/// BSA from weight, using Boyd when height is known and the lookup table otherwise
pub fn calculate_bsa(weight_kg: f64, height_cm: Option<f64>) -> BsaResult {
    match height_cm {
        Some(height_cm) => BsaResult {
            value: boyd_bsa(weight_kg, height_cm),
            method: BsaMethod::Boyd,
        },
        None => BsaResult {
            value: lookup_bsa(weight_kg),
            method: BsaMethod::LookupTable,
        },
    }
}

/// Boyd formula; weight is converted to grams
pub fn boyd_bsa(weight_kg: f64, height_cm: f64) -> f64 {
    let weight_g = weight_kg * 1000.0;
    let exponent = 0.7285 - 0.0188 * weight_g.log10();
    0.0003207 * height_cm.powf(0.3) * weight_g.powf(exponent)
}

/// Table lookup with linear interpolation, extrapolating beyond either end
pub fn lookup_bsa(weight_kg: f64) -> f64 {
    let last = BSA_LOOKUP_TABLE.len() - 1;
    let upper = BSA_LOOKUP_TABLE
        .partition_point(|&(weight, _)| weight < weight_kg)
        .clamp(1, last);

    let (w1, bsa1) = BSA_LOOKUP_TABLE[upper - 1];
    let (w2, bsa2) = BSA_LOOKUP_TABLE[upper];
    if weight_kg == w2 {
        return bsa2;
    }

    let slope = (bsa2 - bsa1) / (w2 - w1);
    bsa1 + slope * (weight_kg - w1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boyd_reference_value() {
        let result = calculate_bsa(20.0, Some(120.0));
        assert_eq!(result.method, BsaMethod::Boyd);
        assert!((result.value - 0.82295).abs() < 1e-4);
        assert_eq!((result.value * 100.0).round() / 100.0, 0.82);
    }

    #[test]
    fn test_lookup_exact_anchor() {
        let result = calculate_bsa(10.0, None);
        assert_eq!(result.method, BsaMethod::LookupTable);
        assert_eq!(result.value, 0.49);
        assert_eq!(lookup_bsa(1.0), 0.10);
        assert_eq!(lookup_bsa(90.0), 2.2);
    }

    #[test]
    fn test_lookup_interpolates_at_midpoint() {
        assert!((lookup_bsa(10.5) - 0.51).abs() < 1e-12);
        assert!((lookup_bsa(1.25) - 0.115).abs() < 1e-12);
    }

    #[test]
    fn test_lookup_extrapolates_beyond_table() {
        // Slope of the first two anchors is 0.06 per kg
        assert!((lookup_bsa(0.5) - 0.07).abs() < 1e-12);
        // Last two anchors are flat
        assert!((lookup_bsa(95.0) - 2.2).abs() < 1e-12);
    }

    #[test]
    fn test_table_is_sorted() {
        assert!(BSA_LOOKUP_TABLE.windows(2).all(|pair| pair[0].0 < pair[1].0));
    }
}
