//! Command line arguments of the `raster-preview` and `raster-mosaic` tools.

use clap::error::ErrorKind;
use clap::Parser;
use std::path::PathBuf;
use tracing::error;

/// Export one band of a raster as an 8-bit image.
///
/// The band is stretched linearly so that its minimum becomes 0 and its
/// maximum 255; the original range is kept as INITIAL_MIN / INITIAL_MAX
/// band metadata.
#[derive(Parser, Debug)]
#[command(name = "raster-preview", author, version, about, long_about = None)]
pub struct PreviewArgs {
    /// Input raster
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Band to export, starting at 0
    #[arg(value_name = "BAND")]
    pub band: usize,

    /// Output image (.png, .jpg, .gif, ...)
    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,

    /// GDAL driver short name (default: guessed from the output extension)
    #[arg(long)]
    pub driver: Option<String>,
}

/// Mosaic co-registered GeoTIFF tiles into one raster.
///
/// Tiles must share pixel scale, size and band count. Where tiles overlap,
/// the tile given last wins.
#[derive(Parser, Debug)]
#[command(name = "raster-mosaic", author, version, about, long_about = None)]
pub struct MosaicArgs {
    /// Input tiles followed by the output raster
    #[arg(value_name = "TILE... OUTPUT", num_args = 3.., required = true)]
    pub paths: Vec<PathBuf>,

    /// Value written to pixels no tile covers
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub no_data: f32,

    /// Write the mosaic with DEFLATE compression
    #[arg(long)]
    pub compress: bool,

    /// Worker threads for the band copy (default: number of CPUs)
    #[arg(short, long)]
    pub threads: Option<usize>,
}

impl MosaicArgs {
    /// Splits the positional paths into the input tiles and the output.
    pub fn tiles_and_output(&self) -> Option<(&[PathBuf], &PathBuf)> {
        let (output, tiles) = self.paths.split_last()?;
        Some((tiles, output))
    }
}

/// Process exit status for a failed parse: 0 when help or version was
/// requested, 1 for usage errors.
pub fn usage_exit_code(err: &clap::Error) -> i32 {
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
        _ => 1,
    }
}

/// Parses the process arguments, printing usage and exiting on failure.
pub fn parse_args<P: Parser>() -> P {
    P::try_parse().unwrap_or_else(|err| {
        let code = usage_exit_code(&err);
        if let Err(e) = err.print() {
            error!("Failed to print usage: {}", e);
        }
        std::process::exit(code)
    })
}
