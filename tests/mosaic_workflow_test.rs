// Load tiles from disk, mosaic them and write the result back, the same way
// the raster-mosaic tool does.

use std::path::{Path, PathBuf};

use gdal::DriverManager;
use tempfile::TempDir;
use utm_raster::codec::export_band_preview;
use utm_raster::{
    merge, CustomOrigin, GdalCodec, RasterCodec, RasterDataset, RasterError, SaveOptions,
};

const NODATA: f32 = -9999.0;

fn gtiff_available() -> bool {
    DriverManager::get_driver_by_name("GTiff").is_ok()
}

fn write_tile(dir: &Path, name: &str, origin_x: f64, origin_y: f64, value: f32) -> PathBuf {
    let mut tile = RasterDataset::<f32>::new();
    tile.set_utm(31, true);
    tile.set_transform(origin_x, origin_y, 0.5, -0.5);
    tile.set_custom_origin(CustomOrigin::new(377_000.0, 4_826_000.0, 120.0));
    tile.set_size(2, 4, 4, value);
    tile.set_band_name(0, "z_mean").unwrap();
    tile.set_band_name(1, "z_max").unwrap();
    for sample in tile.band_mut(1).unwrap() {
        *sample = value * 10.0;
    }

    let path = dir.join(name);
    GdalCodec::new()
        .save(&path, &SaveOptions::default(), &tile)
        .unwrap();
    path
}

#[test]
fn test_merge_tiles_from_disk() {
    if !gtiff_available() {
        eprintln!("Skipping test: GTiff driver not available");
        return;
    }
    let temp_dir = TempDir::new().unwrap();
    let codec = GdalCodec::new();

    // 2x2 layout of 4x4 tiles at 0.5 m, missing the lower right tile
    let paths = [
        write_tile(temp_dir.path(), "nw.tif", 377_000.0, 4_826_000.0, 1.0),
        write_tile(temp_dir.path(), "ne.tif", 377_002.0, 4_826_000.0, 2.0),
        write_tile(temp_dir.path(), "sw.tif", 377_000.0, 4_825_998.0, 3.0),
    ];
    let tiles = paths
        .iter()
        .map(|p| codec.load::<f32>(p))
        .collect::<Result<Vec<_>, _>>()
        .unwrap();

    let mosaic = merge(&tiles, NODATA).unwrap();
    assert_eq!((mosaic.width(), mosaic.height()), (8, 8));
    assert_eq!(mosaic.band_count(), 2);
    assert_eq!(mosaic.utm_pose_x(), 377_000.0);
    assert_eq!(mosaic.utm_pose_y(), 4_826_000.0);
    assert_eq!(mosaic.get_band_id("z_max").unwrap(), 1);

    let z_mean = mosaic.band(0).unwrap();
    assert_eq!(z_mean[0], 1.0);
    assert_eq!(z_mean[4], 2.0);
    assert_eq!(z_mean[4 * 8], 3.0);
    assert_eq!(z_mean[7 + 7 * 8], NODATA);
    assert_eq!(mosaic.band(1).unwrap()[4], 20.0);

    // the custom frame of the first tile carries over
    let mapper = mosaic.mapper();
    assert_eq!(mapper.index_of_custom(2.0, 0.0), Some(4));

    let out = temp_dir.path().join("mosaic.tif");
    codec.save(&out, &SaveOptions::compressed(), &mosaic).unwrap();
    let reloaded: RasterDataset<f32> = codec.load(&out).unwrap();
    assert_eq!(reloaded.band(0), mosaic.band(0));
    assert_eq!(reloaded.band(1), mosaic.band(1));
    assert_eq!(reloaded.utm(), mosaic.utm());
    assert_eq!(reloaded.custom_origin(), mosaic.custom_origin());
}

#[test]
fn test_mismatched_tiles_are_rejected() {
    if !gtiff_available() {
        eprintln!("Skipping test: GTiff driver not available");
        return;
    }
    let temp_dir = TempDir::new().unwrap();
    let codec = GdalCodec::new();

    let a = write_tile(temp_dir.path(), "a.tif", 0.0, 0.0, 1.0);
    let mut coarse = codec.load::<f32>(&a).unwrap();
    coarse.set_transform(2.0, 0.0, 1.0, -1.0);

    let tiles = vec![codec.load::<f32>(&a).unwrap(), coarse];
    assert!(matches!(
        merge(&tiles, NODATA),
        Err(RasterError::ShapeMismatch { index: 1, .. })
    ));
}

#[test]
fn test_preview_of_mosaic_band() {
    if !gtiff_available() || DriverManager::get_driver_by_name("PNG").is_err() {
        eprintln!("Skipping test: GTiff or PNG driver not available");
        return;
    }
    let temp_dir = TempDir::new().unwrap();
    let codec = GdalCodec::new();
    let tiles = [
        codec
            .load::<f32>(&write_tile(temp_dir.path(), "a.tif", 0.0, 0.0, 1.0))
            .unwrap(),
        codec
            .load::<f32>(&write_tile(temp_dir.path(), "b.tif", 2.0, 0.0, 5.0))
            .unwrap(),
    ];
    let mosaic = merge(&tiles, 0.0).unwrap();

    let preview = temp_dir.path().join("preview.png");
    export_band_preview(&codec, &mosaic, 0, &preview, None).unwrap();
    assert!(preview.exists());

    let missing = temp_dir.path().join("missing.png");
    assert!(matches!(
        export_band_preview(&codec, &mosaic, 2, &missing, None),
        Err(RasterError::BandIndex { index: 2, count: 2 })
    ));
}
