use rayon::prelude::*;
use tracing::{debug, info};

use crate::dataset::RasterDataset;
use crate::error::{RasterError, Result};
use crate::sample::Sample;

/// Absolute tolerance when comparing tile scales.
const SCALE_EPSILON: f64 = f64::EPSILON;

/// Bias added before flooring a tile offset, absorbing round-off in tile origins.
const OFFSET_BIAS: f64 = 0.1;

/// Bias added before flooring the mosaic size.
const SIZE_BIAS: f64 = 0.5;

/// Pixel offset of a tile inside the mosaic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Placement {
    xoff: usize,
    yoff: usize,
}

fn same(a: f64, b: f64) -> bool {
    (a - b).abs() < SCALE_EPSILON
}

/// Mosaics co-registered tiles into one dataset covering all of them.
///
/// Every tile must share the first tile's scales, width, height and band
/// count. Pixels covered by no tile are set to `no_data`. Where tiles
/// overlap, the tile that comes later in `tiles` wins.
///
/// The output takes its metadata, UTM zone, custom origin and band names from
/// the first tile. Nothing is allocated until all tiles have been validated
/// and placed.
pub fn merge<T: Sample>(tiles: &[RasterDataset<T>], no_data: T) -> Result<RasterDataset<T>> {
    let first = tiles.first().ok_or(RasterError::EmptyInput)?;
    validate(tiles)?;

    let scale_x = first.scale_x();
    let scale_y = first.scale_y();
    let width = first.width();
    let height = first.height();

    let mut min_x = first.utm_pose_x();
    let mut max_x = min_x;
    let mut min_y = first.utm_pose_y();
    let mut max_y = min_y;
    for tile in tiles {
        min_x = min_x.min(tile.utm_pose_x());
        max_x = max_x.max(tile.utm_pose_x());
        min_y = min_y.min(tile.utm_pose_y());
        max_y = max_y.max(tile.utm_pose_y());
    }

    let ulx = min_x;
    let uly = max_y;
    let lrx = max_x + scale_x * width as f64;
    let lry = min_y + scale_y * height as f64;
    let out_w = ((lrx - ulx) / scale_x + SIZE_BIAS).floor() as i64;
    let out_h = ((lry - uly) / scale_y + SIZE_BIAS).floor() as i64;

    let placements = tiles
        .iter()
        .enumerate()
        .map(|(index, tile)| {
            let xoff = ((tile.utm_pose_x() - ulx) / scale_x + OFFSET_BIAS).floor() as i64;
            let yoff = ((tile.utm_pose_y() - uly) / scale_y + OFFSET_BIAS).floor() as i64;
            let fits = xoff >= 0
                && yoff >= 0
                && xoff + width as i64 <= out_w
                && yoff + height as i64 <= out_h;
            if !fits {
                return Err(RasterError::TilePlacement { index, xoff, yoff });
            }
            debug!("tile {} placed at ({}, {})", index, xoff, yoff);
            Ok(Placement {
                xoff: xoff as usize,
                yoff: yoff as usize,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    // at least one tile fits, so both sizes are non-negative here
    let (out_w, out_h) = (out_w as usize, out_h as usize);
    info!(
        "Merging {} tiles into a {} x {} mosaic with {} bands",
        tiles.len(),
        out_w,
        out_h,
        first.band_count()
    );

    let mut result = RasterDataset::new();
    result.copy_meta_only(first);
    result.set_transform(ulx, uly, scale_x, scale_y);
    result.set_size(first.band_count(), out_w, out_h, no_data);
    for index in 0..first.band_count() {
        if let Some(name) = first.band_name(index) {
            result.set_band_name(index, name)?;
        }
    }

    // Bands are disjoint buffers; within a band tiles keep their input order.
    result
        .bands_mut_slices()
        .into_par_iter()
        .enumerate()
        .for_each(|(band, out)| {
            for (tile, placement) in tiles.iter().zip(&placements) {
                if let Some(src) = tile.band(band) {
                    copy_tile_band(src, out, *placement, width, out_w);
                }
            }
        });

    Ok(result)
}

fn validate<T: Sample>(tiles: &[RasterDataset<T>]) -> Result<()> {
    let Some(first) = tiles.first() else {
        return Err(RasterError::EmptyInput);
    };
    if !first.transform().is_invertible() {
        return Err(RasterError::DegenerateTransform {
            scale_x: first.scale_x(),
            scale_y: first.scale_y(),
        });
    }

    for (index, tile) in tiles.iter().enumerate().skip(1) {
        let reason = if !same(first.scale_x(), tile.scale_x()) {
            Some(format!("scale_x {} != {}", tile.scale_x(), first.scale_x()))
        } else if !same(first.scale_y(), tile.scale_y()) {
            Some(format!("scale_y {} != {}", tile.scale_y(), first.scale_y()))
        } else if first.width() != tile.width() || first.height() != tile.height() {
            Some(format!(
                "size {}x{} != {}x{}",
                tile.width(),
                tile.height(),
                first.width(),
                first.height()
            ))
        } else if first.band_count() != tile.band_count() {
            Some(format!(
                "{} bands != {} bands",
                tile.band_count(),
                first.band_count()
            ))
        } else {
            None
        };
        if let Some(reason) = reason {
            return Err(RasterError::ShapeMismatch { index, reason });
        }
    }
    Ok(())
}

fn copy_tile_band<T: Sample>(
    src: &[T],
    out: &mut [T],
    placement: Placement,
    width: usize,
    out_w: usize,
) {
    if width == 0 {
        return;
    }
    let start = placement.xoff + placement.yoff * out_w;
    for (row, line) in src.chunks_exact(width).enumerate() {
        let dst = start + row * out_w;
        out[dst..dst + width].copy_from_slice(line);
    }
}
