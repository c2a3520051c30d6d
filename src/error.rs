use std::num::ParseFloatError;
use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, RasterError>;

#[derive(thiserror::Error, Debug)]
pub enum RasterError {
    /// The codec failed to open, create, read or write a file.
    #[error("raster I/O failed for {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: gdal::errors::GdalError,
    },
    #[error("unknown raster driver: {0}")]
    Driver(String),
    #[error("tile {index} does not match the first tile: {reason}")]
    ShapeMismatch { index: usize, reason: String },
    #[error("band name not found: {0}")]
    NameNotFound(String),
    #[error("metadata {key}={value:?} is not a number")]
    NumericParse {
        key: String,
        value: String,
        #[source]
        source: ParseFloatError,
    },
    #[error("transform cannot be inverted (scale_x={scale_x}, scale_y={scale_y})")]
    DegenerateTransform { scale_x: f64, scale_y: f64 },
    #[error("no tiles to merge")]
    EmptyInput,
    #[error("tile {index} lands outside the mosaic at offset ({xoff}, {yoff})")]
    TilePlacement { index: usize, xoff: i64, yoff: i64 },
    #[error("band {index} out of range, dataset has {count} bands")]
    BandIndex { index: usize, count: usize },
}

impl RasterError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: gdal::errors::GdalError) -> Self {
        RasterError::Io {
            path: path.into(),
            source,
        }
    }
}
