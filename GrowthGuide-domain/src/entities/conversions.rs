use growth_guide_data::models::{CentileCurve, SdsCentile};

use super::growth::SdsPoint;
use super::measurement::AgeRange;

// Conversion functions between reference-layer values and domain entities
// These functions follow the pattern convert_to_[target_layer]_[model_name]

/// Convert a reference lookup into a domain point at `age_years`
pub fn convert_to_domain_point(age_years: f64, score: SdsCentile) -> SdsPoint {
    SdsPoint {
        age_years,
        sds: score.sds,
        centile: score.centile,
    }
}

/// Keep only the coordinates of `curve` inside `range`
pub fn convert_to_domain_curve(curve: CentileCurve, range: Option<AgeRange>) -> CentileCurve {
    match range {
        Some(range) => CentileCurve {
            points: curve
                .points
                .into_iter()
                .filter(|point| range.contains(point.age))
                .collect(),
            ..curve
        },
        None => curve,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use growth_guide_data::models::CentilePoint;

    #[test]
    fn test_convert_to_domain_point() {
        let point = convert_to_domain_point(1.5, SdsCentile { sds: -1.0, centile: 15.87 });
        assert_eq!(point, SdsPoint { age_years: 1.5, sds: -1.0, centile: 15.87 });
    }

    #[test]
    fn test_curve_is_clipped_to_range() {
        let curve = CentileCurve {
            centile: 50.0,
            sds: 0.0,
            points: (0..=10)
                .map(|age| CentilePoint { age: age as f64, value: 50.0 + age as f64 })
                .collect(),
        };
        let clipped = convert_to_domain_curve(curve, Some(AgeRange::new(2.0, 4.0)));
        let ages: Vec<f64> = clipped.points.iter().map(|p| p.age).collect();
        assert_eq!(ages, vec![2.0, 3.0, 4.0]);
        assert_eq!(clipped.centile, 50.0);
    }
}
