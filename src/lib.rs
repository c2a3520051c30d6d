//! Georeferenced UTM raster grids.
//!
//! A [`RasterDataset`] holds same-shaped numeric bands anchored to a UTM
//! frame through a [`GeoTransform`], plus an optional local origin (the
//! "custom" frame). On top of it the crate provides coordinate mapping
//! between pixel, UTM and custom frames, band lookup by name, a min/max byte
//! stretch for previews and a tile mosaic. File I/O goes through a
//! [`RasterCodec`]; [`GdalCodec`] implements it with GDAL.

pub mod band_index;
pub mod codec;
pub mod coordinates;
pub mod dataset;
pub mod error;
pub mod merge;
pub mod metadata;
pub mod quantize;
pub mod sample;
pub mod transform;

pub use codec::{GdalCodec, RasterCodec, SaveOptions};
pub use coordinates::{CoordinateMapper, Point};
pub use dataset::{RasterDataset, UtmZone};
pub use error::{RasterError, Result};
pub use merge::merge;
pub use metadata::{CustomOrigin, Metadata};
pub use quantize::{quantize_to_bytes, ByteBand};
pub use sample::Sample;
pub use transform::GeoTransform;
