use serde::{Deserialize, Serialize};
use std::fmt;

#[cfg(feature = "with-api")]
use utoipa::ToSchema;

/// Sex of the child, as understood by the growth references
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sex::Male => write!(f, "male"),
            Sex::Female => write!(f, "female"),
        }
    }
}

/// Kind of anthropometric measurement
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum MeasurementMethod {
    /// Weight in kilograms
    Weight,
    /// Height or length in centimetres
    Height,
    /// Body mass index in kg/m²
    Bmi,
    /// Occipitofrontal (head) circumference in centimetres
    Ofc,
}

impl MeasurementMethod {
    /// All methods in the order results are reported
    pub const ALL: [MeasurementMethod; 4] = [
        MeasurementMethod::Weight,
        MeasurementMethod::Height,
        MeasurementMethod::Bmi,
        MeasurementMethod::Ofc,
    ];

    /// Human readable label used in messages
    pub fn label(&self) -> &'static str {
        match self {
            MeasurementMethod::Weight => "Weight",
            MeasurementMethod::Height => "Height",
            MeasurementMethod::Bmi => "BMI",
            MeasurementMethod::Ofc => "Head circumference",
        }
    }

    /// Unit the observation value is expressed in
    pub fn unit(&self) -> &'static str {
        match self {
            MeasurementMethod::Weight => "kg",
            MeasurementMethod::Height | MeasurementMethod::Ofc => "cm",
            MeasurementMethod::Bmi => "kg/m²",
        }
    }
}

impl fmt::Display for MeasurementMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MeasurementMethod::Weight => "weight",
            MeasurementMethod::Height => "height",
            MeasurementMethod::Bmi => "bmi",
            MeasurementMethod::Ofc => "ofc",
        };
        write!(f, "{}", name)
    }
}

/// Named population growth reference
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "kebab-case")]
pub enum ReferenceDataset {
    /// UK-WHO general population reference
    #[default]
    UkWho,
    /// Turner syndrome (female only)
    TurnersSyndrome,
    /// Trisomy 21 (Down syndrome)
    #[serde(rename = "trisomy-21")]
    Trisomy21,
    /// US CDC reference
    Cdc,
}

impl ReferenceDataset {
    /// Parse the kebab-case identifier used on the wire
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_lowercase().as_str() {
            "uk-who" => Some(ReferenceDataset::UkWho),
            "turners-syndrome" => Some(ReferenceDataset::TurnersSyndrome),
            "trisomy-21" => Some(ReferenceDataset::Trisomy21),
            "cdc" => Some(ReferenceDataset::Cdc),
            _ => None,
        }
    }

    /// Kebab-case identifier
    pub fn code(&self) -> &'static str {
        match self {
            ReferenceDataset::UkWho => "uk-who",
            ReferenceDataset::TurnersSyndrome => "turners-syndrome",
            ReferenceDataset::Trisomy21 => "trisomy-21",
            ReferenceDataset::Cdc => "cdc",
        }
    }
}

impl fmt::Display for ReferenceDataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// SDS and centile pair produced by the reference for one observation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct SdsCentile {
    /// Standard deviation score (z-score)
    pub sds: f64,

    /// Centile in the open interval (0, 100)
    pub centile: f64,
}

/// One coordinate on a centile curve
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct CentilePoint {
    /// Age in decimal years
    pub age: f64,

    /// Measurement value at that age
    pub value: f64,
}

/// Coordinates of a single population centile line, ordered by age
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct CentileCurve {
    /// Centile the line represents (e.g. 0.4, 50, 99.6)
    pub centile: f64,

    /// SDS the line is drawn at
    pub sds: f64,

    /// Points ordered by ascending age
    pub points: Vec<CentilePoint>,
}

/// A centile line of the standard chart set
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StandardCentile {
    pub centile: f64,
    pub sds: f64,
}

/// The nine centile lines of UK growth charts, spaced two thirds of an SDS apart
pub const COLE_NINE_CENTILES: [StandardCentile; 9] = [
    StandardCentile { centile: 0.4, sds: -8.0 / 3.0 },
    StandardCentile { centile: 2.0, sds: -2.0 },
    StandardCentile { centile: 9.0, sds: -4.0 / 3.0 },
    StandardCentile { centile: 25.0, sds: -2.0 / 3.0 },
    StandardCentile { centile: 50.0, sds: 0.0 },
    StandardCentile { centile: 75.0, sds: 2.0 / 3.0 },
    StandardCentile { centile: 91.0, sds: 4.0 / 3.0 },
    StandardCentile { centile: 98.0, sds: 2.0 },
    StandardCentile { centile: 99.6, sds: 8.0 / 3.0 },
];
