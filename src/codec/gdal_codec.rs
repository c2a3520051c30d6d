use std::path::Path;

use gdal::cpl::CslStringList;
use gdal::raster::Buffer;
use gdal::spatial_ref::SpatialRef;
use gdal::{Dataset, DriverManager, Metadata as GdalMetadata, MetadataEntry};
use tracing::{debug, info, warn};

use super::{ByteGeoreference, RasterCodec, SaveOptions, GTIFF};
use crate::dataset::{RasterDataset, UtmZone};
use crate::error::{RasterError, Result};
use crate::metadata::Metadata;
use crate::quantize::ByteBand;
use crate::sample::Sample;
use crate::transform::GeoTransform;

const MEM_DRIVER: &str = "MEM";
const JPEG_DRIVER: &str = "JPEG";
const JPEG_QUALITY: &str = "95";

const EPSG_UTM_NORTH: i32 = 32600;
const EPSG_UTM_SOUTH: i32 = 32700;

/// [`RasterCodec`] backed by GDAL.
#[derive(Debug, Default, Clone, Copy)]
pub struct GdalCodec {}

impl GdalCodec {
    pub fn new() -> Self {
        Self {}
    }

    fn set_geo_metadata(
        &self,
        dataset: &mut Dataset,
        path: &Path,
        transform: GeoTransform,
        utm: UtmZone,
        metadata: &Metadata,
    ) -> Result<()> {
        let io = |e| RasterError::io(path, e);

        match utm_epsg(utm) {
            Some(epsg) => {
                let wkt = SpatialRef::from_epsg(epsg as u32)
                    .and_then(|srs| srs.to_wkt())
                    .map_err(io)?;
                dataset.set_projection(&wkt).map_err(io)?;
            }
            None => warn!(
                "UTM zone {} is not valid, {:?} is written without a projection",
                utm.zone, path
            ),
        }

        dataset
            .set_geo_transform(&transform.coefficients())
            .map_err(io)?;

        for (key, value) in metadata {
            dataset.set_metadata_item(key, value, "").map_err(io)?;
        }
        Ok(())
    }
}

impl RasterCodec for GdalCodec {
    fn load<T: Sample>(&self, path: &Path) -> Result<RasterDataset<T>> {
        let io = |e| RasterError::io(path, e);
        let dataset = Dataset::open(path).map_err(io)?;

        let driver = dataset.driver().short_name();
        if driver != GTIFF {
            warn!("expected {} and got {} for {:?}", GTIFF, driver, path);
        }

        let (width, height) = dataset.raster_size();
        let bands = dataset
            .rasterbands()
            .collect::<gdal::errors::Result<Vec<_>>>()
            .map_err(io)?;

        let mut result = RasterDataset::<T>::new();
        result.set_size(bands.len(), width, height, T::default());
        let utm = read_utm_zone(&dataset.projection(), path);
        result.set_utm(utm.zone, utm.north);
        match dataset.geo_transform() {
            Ok(coefficients) => {
                result.set_geo_transform(GeoTransform::from_coefficients(coefficients))
            }
            Err(e) => warn!("no geo transform in {:?}: {}", path, e),
        }
        result.metadata_mut().extend(default_domain(&dataset));
        result.refresh_custom_origin()?;

        for (index, band) in bands.iter().enumerate() {
            if band.band_type() != T::data_type() {
                warn!(
                    "band {} of {:?} is {:?}, reading it as {:?}",
                    index + 1,
                    path,
                    band.band_type(),
                    T::data_type()
                );
            }
            let buffer = band
                .read_as::<T>((0, 0), (width, height), (width, height), None)
                .map_err(io)?;
            if let Some(samples) = result.band_mut(index) {
                samples.copy_from_slice(buffer.data());
            }
            if let Some(meta) = result.band_metadata_mut(index) {
                meta.extend(default_domain(band));
            }
        }

        info!("Loaded {} from {:?}", result, path);
        Ok(result)
    }

    fn save<T: Sample>(
        &self,
        path: &Path,
        options: &SaveOptions,
        data: &RasterDataset<T>,
    ) -> Result<()> {
        let io = |e| RasterError::io(path, e);
        let driver = DriverManager::get_driver_by_name(&options.driver)
            .map_err(|_| RasterError::Driver(options.driver.clone()))?;
        let creation_options = creation_options(&options.options).map_err(io)?;

        let (width, height) = (data.width(), data.height());
        let mut dataset = driver
            .create_with_band_type_with_options::<T, _>(
                path,
                width,
                height,
                data.band_count(),
                &creation_options,
            )
            .map_err(io)?;

        self.set_geo_metadata(
            &mut dataset,
            path,
            data.transform(),
            data.utm(),
            data.metadata(),
        )?;

        for (index, samples) in data.bands().enumerate() {
            let mut band = dataset.rasterband(index + 1).map_err(io)?;
            let mut buffer = Buffer::new((width, height), samples.to_vec());
            band.write((0, 0), (width, height), &mut buffer)
                .map_err(io)?;
            if let Some(meta) = data.band_metadata(index) {
                for (key, value) in meta {
                    band.set_metadata_item(key, value, "").map_err(io)?;
                }
            }
        }

        info!("Saved {} to {:?} ({})", data, path, options.driver);
        Ok(())
    }

    /// Not every driver can create a dataset from scratch, so the bands are
    /// assembled in memory and then copied into the target format.
    fn export_bytes(
        &self,
        path: &Path,
        driver_name: &str,
        bands: &[ByteBand],
        georef: &ByteGeoreference,
    ) -> Result<()> {
        let (width, height) = (georef.width, georef.height);
        if let Some(index) = bands.iter().position(|b| b.bytes.len() != width * height) {
            return Err(RasterError::ShapeMismatch {
                index,
                reason: format!(
                    "{} bytes for a {}x{} raster",
                    bands[index].bytes.len(),
                    width,
                    height
                ),
            });
        }

        let io = |e| RasterError::io(path, e);
        let driver = DriverManager::get_driver_by_name(driver_name)
            .map_err(|_| RasterError::Driver(driver_name.to_string()))?;
        let mem = DriverManager::get_driver_by_name(MEM_DRIVER)
            .map_err(|_| RasterError::Driver(MEM_DRIVER.to_string()))?;

        let mut staging = mem
            .create_with_band_type::<u8, _>("", width, height, bands.len())
            .map_err(io)?;
        self.set_geo_metadata(
            &mut staging,
            path,
            georef.transform,
            georef.utm,
            &georef.metadata,
        )?;

        for (index, byte_band) in bands.iter().enumerate() {
            let mut band = staging.rasterband(index + 1).map_err(io)?;
            let mut buffer = Buffer::new((width, height), byte_band.bytes.clone());
            band.write((0, 0), (width, height), &mut buffer)
                .map_err(io)?;
            for (key, value) in &byte_band.metadata {
                band.set_metadata_item(key, value, "").map_err(io)?;
            }
        }

        let mut options = CslStringList::new();
        if driver_name == JPEG_DRIVER {
            options.set_name_value("QUALITY", JPEG_QUALITY).map_err(io)?;
        }
        debug!("Copying {} byte bands into {} {:?}", bands.len(), driver_name, path);
        staging
            .create_copy(&driver, path, &options)
            .map_err(io)?;
        Ok(())
    }
}

fn creation_options(
    options: &std::collections::BTreeMap<String, String>,
) -> gdal::errors::Result<CslStringList> {
    let mut list = CslStringList::new();
    for (key, value) in options {
        list.set_name_value(key, value)?;
    }
    Ok(list)
}

fn default_domain(object: &impl GdalMetadata) -> Metadata {
    GdalMetadata::metadata(object)
        .filter_map(|MetadataEntry { domain, key, value }| {
            if domain.is_empty() {
                Some((key, value))
            } else {
                None
            }
        })
        .collect()
}

/// EPSG code of WGS84 / UTM for a valid zone.
fn utm_epsg(utm: UtmZone) -> Option<i32> {
    if !(1..=60).contains(&utm.zone) {
        return None;
    }
    let base = if utm.north {
        EPSG_UTM_NORTH
    } else {
        EPSG_UTM_SOUTH
    };
    Some(base + utm.zone)
}

fn read_utm_zone(wkt: &str, path: &Path) -> UtmZone {
    if wkt.is_empty() {
        warn!("{:?} has no projection", path);
        return UtmZone::default();
    }
    let srs = match SpatialRef::from_wkt(wkt) {
        Ok(srs) => srs,
        Err(e) => {
            warn!("cannot parse projection of {:?}: {}", path, e);
            return UtmZone::default();
        }
    };

    if let Some(utm) = srs.auth_code().ok().and_then(utm_from_epsg) {
        return utm;
    }
    // any other UTM datum (ETRS89, NAD83, ...) or a CRS without authority
    let name = srs.get_attr_value("PROJCS", 0).ok().flatten();
    match name.as_deref().and_then(utm_from_name) {
        Some(utm) => {
            debug!("{:?} is UTM zone {} by name {:?}", path, utm.zone, name);
            utm
        }
        None => {
            warn!("projection of {:?} is not UTM", path);
            UtmZone::default()
        }
    }
}

fn utm_from_epsg(code: i32) -> Option<UtmZone> {
    if (EPSG_UTM_NORTH + 1..=EPSG_UTM_NORTH + 60).contains(&code) {
        Some(UtmZone {
            zone: code - EPSG_UTM_NORTH,
            north: true,
        })
    } else if (EPSG_UTM_SOUTH + 1..=EPSG_UTM_SOUTH + 60).contains(&code) {
        Some(UtmZone {
            zone: code - EPSG_UTM_SOUTH,
            north: false,
        })
    } else {
        None
    }
}

/// Parses projected CRS names such as `ETRS89 / UTM zone 32N` or
/// `UTM Zone 33, Southern Hemisphere`.
fn utm_from_name(name: &str) -> Option<UtmZone> {
    let lower = name.to_ascii_lowercase();
    let start = lower.find("utm zone")? + "utm zone".len();
    let rest = lower[start..].trim_start();
    let digits = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
    let zone: i32 = rest[..digits].parse().ok()?;
    if !(1..=60).contains(&zone) {
        return None;
    }

    let suffix = rest[digits..].trim_start_matches([',', ' ']);
    let north = if suffix.starts_with('n') {
        true
    } else if suffix.starts_with('s') {
        false
    } else {
        return None;
    };
    Some(UtmZone { zone, north })
}
