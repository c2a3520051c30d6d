use anyhow::{Context, Result};
use tracing::info;
use utm_raster::codec::export_band_preview;
use utm_raster::{GdalCodec, RasterCodec, RasterDataset};
use utm_raster_cli::{parse_args, PreviewArgs};

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args: PreviewArgs = parse_args();

    let codec = GdalCodec::new();
    let dataset: RasterDataset<f32> = codec
        .load(&args.input)
        .with_context(|| format!("Failed to load {}", args.input.display()))?;

    export_band_preview(
        &codec,
        &dataset,
        args.band,
        &args.output,
        args.driver.as_deref(),
    )
    .with_context(|| format!("Failed to export {}", args.output.display()))?;

    info!("Written preview: {:?}", args.output);
    Ok(())
}
