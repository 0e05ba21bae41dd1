pub mod reference;

pub use reference::{
    CentileCurve, CentilePoint, MeasurementMethod, ReferenceDataset, SdsCentile, Sex,
    StandardCentile, COLE_NINE_CENTILES,
};
