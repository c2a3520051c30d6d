//! Raster file I/O.
//!
//! The core types never touch files themselves; they go through a
//! [`RasterCodec`], which [`GdalCodec`] implements on top of GDAL.

mod gdal_codec;

use std::collections::BTreeMap;
use std::path::Path;

use tracing::info;

use crate::dataset::{RasterDataset, UtmZone};
use crate::error::{RasterError, Result};
use crate::metadata::Metadata;
use crate::quantize::ByteBand;
use crate::sample::Sample;
use crate::transform::GeoTransform;

pub use gdal_codec::GdalCodec;

pub const GTIFF: &str = "GTiff";
pub const COMPRESS: &str = "COMPRESS";
pub const PREDICTOR: &str = "PREDICTOR";
pub const ZLEVEL: &str = "ZLEVEL";

/// Load, save and byte-export operations a raster file format provides.
pub trait RasterCodec {
    /// Reads a dataset, casting samples to `T` when the file stores another type.
    fn load<T: Sample>(&self, path: &Path) -> Result<RasterDataset<T>>;

    fn save<T: Sample>(
        &self,
        path: &Path,
        options: &SaveOptions,
        dataset: &RasterDataset<T>,
    ) -> Result<()>;

    /// Persists byte bands with the given georeferencing using `driver`.
    fn export_bytes(
        &self,
        path: &Path,
        driver: &str,
        bands: &[ByteBand],
        georef: &ByteGeoreference,
    ) -> Result<()>;
}

/// Driver and creation options used when saving a dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct SaveOptions {
    pub driver: String,
    pub options: BTreeMap<String, String>,
}

impl Default for SaveOptions {
    fn default() -> Self {
        Self {
            driver: GTIFF.to_string(),
            options: BTreeMap::new(),
        }
    }
}

impl SaveOptions {
    /// GeoTIFF with DEFLATE compression.
    pub fn compressed() -> Self {
        Self::default()
            .with_option(COMPRESS, "DEFLATE")
            .with_option(ZLEVEL, "6")
    }

    pub fn with_driver(mut self, driver: &str) -> Self {
        self.driver = driver.to_string();
        self
    }

    pub fn with_option(mut self, key: &str, value: &str) -> Self {
        self.options.insert(key.to_string(), value.to_string());
        self
    }
}

/// Georeferencing written alongside exported byte bands.
#[derive(Debug, Clone, PartialEq)]
pub struct ByteGeoreference {
    pub width: usize,
    pub height: usize,
    pub transform: GeoTransform,
    pub utm: UtmZone,
    pub metadata: Metadata,
}

impl ByteGeoreference {
    pub fn from_dataset<T: Sample>(dataset: &RasterDataset<T>) -> Self {
        Self {
            width: dataset.width(),
            height: dataset.height(),
            transform: dataset.transform(),
            utm: dataset.utm(),
            metadata: dataset.metadata().clone(),
        }
    }
}

/// Guesses a GDAL driver short name from a file extension.
///
/// `out.jpg` gives `JPEG`, `out.tif` gives `GTiff`, anything else is the
/// upper-cased extension (`PNG`, `GIF`, ...).
pub fn driver_for_path(path: &Path) -> Option<String> {
    let ext = path.extension()?.to_str()?.to_uppercase();
    let driver = match ext.as_str() {
        "JPG" | "JPEG" => "JPEG".to_string(),
        "TIF" | "TIFF" => GTIFF.to_string(),
        _ => ext,
    };
    Some(driver)
}

/// Stretches one band to bytes and exports it as an 8-bit image.
///
/// When `driver` is `None` it is guessed from the output extension.
pub fn export_band_preview<C: RasterCodec, T: Sample>(
    codec: &C,
    dataset: &RasterDataset<T>,
    band: usize,
    path: &Path,
    driver: Option<&str>,
) -> Result<()> {
    let samples = dataset.band(band).ok_or(RasterError::BandIndex {
        index: band,
        count: dataset.band_count(),
    })?;
    let driver = match driver {
        Some(driver) => driver.to_string(),
        None => driver_for_path(path)
            .ok_or_else(|| RasterError::Driver(path.display().to_string()))?,
    };

    let bytes = ByteBand::from_band(samples, dataset.band_name(band));
    info!(
        "Exporting band {} of {} as {} to {:?}",
        band, dataset, driver, path
    );
    codec.export_bytes(
        path,
        &driver,
        std::slice::from_ref(&bytes),
        &ByteGeoreference::from_dataset(dataset),
    )
}
