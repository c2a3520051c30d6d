use std::collections::BTreeMap;

use crate::error::{RasterError, Result};

/// String key/value metadata attached to a dataset or to one of its bands.
pub type Metadata = BTreeMap<String, String>;

pub const CUSTOM_X_ORIGIN: &str = "CUSTOM_X_ORIGIN";
pub const CUSTOM_Y_ORIGIN: &str = "CUSTOM_Y_ORIGIN";
pub const CUSTOM_Z_ORIGIN: &str = "CUSTOM_Z_ORIGIN";

/// Band metadata key holding the band name.
pub const BAND_NAME: &str = "NAME";
/// Band metadata keys recording the range of a band before byte stretching.
pub const INITIAL_MIN: &str = "INITIAL_MIN";
pub const INITIAL_MAX: &str = "INITIAL_MAX";

/// Returns the value stored under `key`, or `default` when it is absent.
pub fn meta_or<'a>(metadata: &'a Metadata, key: &str, default: &'a str) -> &'a str {
    metadata.get(key).map(String::as_str).unwrap_or(default)
}

/// Local origin in meters, expressed in the UTM frame of the dataset.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CustomOrigin {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl CustomOrigin {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn write_to(&self, metadata: &mut Metadata) {
        metadata.insert(CUSTOM_X_ORIGIN.to_string(), self.x.to_string());
        metadata.insert(CUSTOM_Y_ORIGIN.to_string(), self.y.to_string());
        metadata.insert(CUSTOM_Z_ORIGIN.to_string(), self.z.to_string());
    }

    /// Parses the origin back from dataset metadata.
    ///
    /// A missing key reads as `0`; a key holding something that is not a
    /// number is an error.
    pub fn read_from(metadata: &Metadata) -> Result<Self> {
        Ok(Self {
            x: parse_number(metadata, CUSTOM_X_ORIGIN)?,
            y: parse_number(metadata, CUSTOM_Y_ORIGIN)?,
            z: parse_number(metadata, CUSTOM_Z_ORIGIN)?,
        })
    }
}

fn parse_number(metadata: &Metadata, key: &str) -> Result<f64> {
    let value = meta_or(metadata, key, "0");
    value
        .trim()
        .parse::<f64>()
        .map_err(|source| RasterError::NumericParse {
            key: key.to_string(),
            value: value.to_string(),
            source,
        })
}
