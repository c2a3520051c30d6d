use std::fmt;

use crate::band_index;
use crate::coordinates::CoordinateMapper;
use crate::error::{RasterError, Result};
use crate::metadata::{self, CustomOrigin, Metadata, BAND_NAME};
use crate::sample::Sample;
use crate::transform::GeoTransform;

/// UTM projection identity: zone number and hemisphere.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UtmZone {
    pub zone: i32,
    pub north: bool,
}

impl Default for UtmZone {
    fn default() -> Self {
        Self {
            zone: 0,
            north: true,
        }
    }
}

/// A georeferenced multi-band raster.
///
/// Every band holds `width * height` samples in row-major order
/// (`index = col + row * width`) and has one metadata map in
/// `band_metadata`. The shape only changes through [`RasterDataset::set_size`],
/// which discards all sample data.
///
/// Cloning performs a deep copy: two datasets never share a band buffer.
#[derive(Debug, Clone)]
pub struct RasterDataset<T: Sample> {
    width: usize,
    height: usize,
    transform: GeoTransform,
    utm: UtmZone,
    custom_origin: CustomOrigin,
    bands: Vec<Vec<T>>,
    band_metadata: Vec<Metadata>,
    metadata: Metadata,
}

impl<T: Sample> Default for RasterDataset<T> {
    fn default() -> Self {
        let mut dataset = Self {
            width: 0,
            height: 0,
            transform: GeoTransform::default(),
            utm: UtmZone::default(),
            custom_origin: CustomOrigin::default(),
            bands: Vec::new(),
            band_metadata: Vec::new(),
            metadata: Metadata::new(),
        };
        dataset.set_custom_origin(CustomOrigin::default());
        dataset
    }
}

impl<T: Sample> RasterDataset<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reallocates the dataset to `n` bands of `width * height` samples,
    /// all set to `fill`.
    ///
    /// Previous sample data and band metadata are discarded.
    pub fn set_size(&mut self, n: usize, width: usize, height: usize, fill: T) {
        self.width = width;
        self.height = height;
        self.bands = vec![vec![fill; width * height]; n];
        self.band_metadata = vec![Metadata::new(); n];
    }

    /// Copies transform, UTM zone, custom origin and dataset metadata from
    /// `src`, leaving the shape and samples untouched.
    pub fn copy_meta_only<U: Sample>(&mut self, src: &RasterDataset<U>) {
        self.utm = src.utm;
        self.transform = src.transform;
        self.metadata = src.metadata.clone();
        self.set_custom_origin(src.custom_origin);
    }

    /// Copies metadata and band names from `src` and reshapes to its size.
    /// Samples are reset, not copied.
    pub fn copy_meta<U: Sample>(&mut self, src: &RasterDataset<U>) {
        self.copy_meta_with_size(src, src.width, src.height);
    }

    /// Copies metadata from `src` and reshapes to its grid with `n` bands.
    /// Band metadata is not copied since the band layout differs.
    pub fn copy_meta_with_bands<U: Sample>(&mut self, src: &RasterDataset<U>, n: usize) {
        self.copy_meta_only(src);
        self.set_size(n, src.width, src.height, T::default());
    }

    /// Copies metadata and band names from `src`, with a `width` x `height` grid.
    pub fn copy_meta_with_size<U: Sample>(
        &mut self,
        src: &RasterDataset<U>,
        width: usize,
        height: usize,
    ) {
        self.copy_meta_only(src);
        self.set_size(src.band_count(), width, height, T::default());
        self.band_metadata = src.band_metadata.clone();
    }

    pub fn set_transform(&mut self, origin_x: f64, origin_y: f64, scale_x: f64, scale_y: f64) {
        self.transform = GeoTransform::new(origin_x, origin_y, scale_x, scale_y);
    }

    pub fn set_geo_transform(&mut self, transform: GeoTransform) {
        self.transform = transform;
    }

    pub fn set_utm(&mut self, zone: i32, north: bool) {
        self.utm = UtmZone { zone, north };
    }

    /// Sets the local origin and mirrors it into the dataset metadata.
    pub fn set_custom_origin(&mut self, origin: CustomOrigin) {
        self.custom_origin = origin;
        origin.write_to(&mut self.metadata);
    }

    /// Re-reads the custom origin from the `CUSTOM_*_ORIGIN` metadata keys.
    pub fn refresh_custom_origin(&mut self) -> Result<()> {
        self.custom_origin = CustomOrigin::read_from(&self.metadata)?;
        Ok(())
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn band_count(&self) -> usize {
        self.bands.len()
    }

    pub fn transform(&self) -> GeoTransform {
        self.transform
    }

    pub fn scale_x(&self) -> f64 {
        self.transform.scale_x()
    }

    pub fn scale_y(&self) -> f64 {
        self.transform.scale_y()
    }

    pub fn utm_pose_x(&self) -> f64 {
        self.transform.origin_x()
    }

    pub fn utm_pose_y(&self) -> f64 {
        self.transform.origin_y()
    }

    pub fn utm(&self) -> UtmZone {
        self.utm
    }

    pub fn custom_origin(&self) -> CustomOrigin {
        self.custom_origin
    }

    pub fn mapper(&self) -> CoordinateMapper {
        CoordinateMapper::new(self.transform, self.custom_origin, self.width, self.height)
    }

    pub fn band(&self, index: usize) -> Option<&[T]> {
        self.bands.get(index).map(Vec::as_slice)
    }

    pub fn band_mut(&mut self, index: usize) -> Option<&mut [T]> {
        self.bands.get_mut(index).map(Vec::as_mut_slice)
    }

    pub fn bands(&self) -> impl Iterator<Item = &[T]> {
        self.bands.iter().map(Vec::as_slice)
    }

    pub(crate) fn bands_mut_slices(&mut self) -> Vec<&mut [T]> {
        self.bands.iter_mut().map(Vec::as_mut_slice).collect()
    }

    pub fn band_metadata(&self, index: usize) -> Option<&Metadata> {
        self.band_metadata.get(index)
    }

    pub fn band_metadata_mut(&mut self, index: usize) -> Option<&mut Metadata> {
        self.band_metadata.get_mut(index)
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn metadata_mut(&mut self) -> &mut Metadata {
        &mut self.metadata
    }

    pub fn meta_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        metadata::meta_or(&self.metadata, key, default)
    }

    pub fn band_name(&self, index: usize) -> Option<&str> {
        self.band_metadata
            .get(index)
            .and_then(|meta| meta.get(BAND_NAME))
            .map(String::as_str)
    }

    pub fn set_band_name(&mut self, index: usize, name: &str) -> Result<()> {
        let count = self.band_count();
        let meta = self
            .band_metadata
            .get_mut(index)
            .ok_or(RasterError::BandIndex { index, count })?;
        meta.insert(BAND_NAME.to_string(), name.to_string());
        Ok(())
    }

    pub fn get_band_id(&self, name: &str) -> Result<usize> {
        band_index::get_band_id(&self.band_metadata, name)
    }

    pub fn band_by_name(&self, name: &str) -> Result<&[T]> {
        let id = self.get_band_id(name)?;
        Ok(&self.bands[id])
    }

    pub fn band_by_name_mut(&mut self, name: &str) -> Result<&mut [T]> {
        let id = self.get_band_id(name)?;
        Ok(&mut self.bands[id])
    }

    /// Like `==`, but also compares UTM zone, hemisphere and custom origin.
    pub fn same_georeference(&self, other: &Self) -> bool {
        self == other && self.utm == other.utm && self.custom_origin == other.custom_origin
    }
}

impl<T: Sample> PartialEq for RasterDataset<T> {
    fn eq(&self, other: &Self) -> bool {
        self.width == other.width
            && self.height == other.height
            && self.scale_x() == other.scale_x()
            && self.scale_y() == other.scale_y()
            && self.utm_pose_x() == other.utm_pose_x()
            && self.utm_pose_y() == other.utm_pose_y()
            && self.metadata == other.metadata
            && self.bands == other.bands
    }
}

impl<T: Sample> fmt::Display for RasterDataset<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "RasterDataset[{}x{}x{}]",
            self.width,
            self.height,
            self.band_count()
        )
    }
}
