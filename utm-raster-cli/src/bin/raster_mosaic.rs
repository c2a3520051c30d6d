use anyhow::{Context, Result};
use rayon::ThreadPoolBuilder;
use tracing::info;
use utm_raster::{merge, GdalCodec, RasterCodec, RasterDataset, SaveOptions};
use utm_raster_cli::{parse_args, MosaicArgs};

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args: MosaicArgs = parse_args();
    let start_time = std::time::Instant::now();

    if let Some(threads) = args.threads {
        ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("Failed to build thread pool")?;
    }

    let (inputs, output) = args
        .tiles_and_output()
        .context("Missing output path")?;

    let codec = GdalCodec::new();
    let tiles = inputs
        .iter()
        .map(|path| {
            codec
                .load::<f32>(path)
                .with_context(|| format!("Failed to load tile {}", path.display()))
        })
        .collect::<Result<Vec<RasterDataset<f32>>>>()?;

    let mosaic = merge(&tiles, args.no_data).context("Failed to merge tiles")?;

    let options = if args.compress {
        SaveOptions::compressed()
    } else {
        SaveOptions::default()
    };
    codec
        .save(output, &options, &mosaic)
        .with_context(|| format!("Failed to save mosaic {}", output.display()))?;

    info!(
        "Written {} from {} tiles to {:?} in {:?}",
        mosaic,
        tiles.len(),
        output,
        start_time.elapsed()
    );
    Ok(())
}
