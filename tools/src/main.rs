use std::fs;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use bam_tools::{bitmap_to_rgba, convert_to_v1, format_pretty, inspect, PngPages};
use clap::{Parser, Subcommand, ValueEnum};
use codec::{
    wrap_bamc, AnyDecoder, BamLoader, CachedPages, CompressionPolicy, Controller, Decoder,
    ExportOptions, RenderMode, ZlibCompressor,
};
use glob::Pattern;

/// Texture pages kept decoded at once.
const PAGE_CACHE_CAPACITY: usize = 16;

#[derive(Parser)]
#[command(
    name = "bam-tools",
    version,
    about = "BAM sprite inspection, export and conversion tools"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Inspect resource structure.
    Inspect {
        /// Path to a resource, or a directory of resources.
        path: PathBuf,
        /// Optional glob filter when inspecting a directory.
        #[arg(long)]
        glob: Option<String>,
        /// Output format.
        #[arg(long, value_enum, default_value_t = OutputFormat::Pretty)]
        format: OutputFormat,
    },
    /// Render every cycle frame to PNG files.
    Export {
        /// Path to the resource.
        input: PathBuf,
        /// Output directory.
        #[arg(long)]
        out: PathBuf,
        /// Directory holding `MOSxxxx.png` texture pages (V2 only).
        #[arg(long)]
        pages: Option<PathBuf>,
        /// Align frames on a shared canvas.
        #[arg(long)]
        shared: bool,
        /// Size the shared canvas per cycle instead of over all cycles.
        #[arg(long)]
        per_cycle: bool,
        /// Render mirrored horizontally.
        #[arg(long)]
        mirrored: bool,
    },
    /// Re-encode a resource as palette + RLE (`BAM V1  `).
    Convert {
        /// Path to the resource.
        input: PathBuf,
        /// Output file.
        #[arg(long)]
        out: PathBuf,
        /// Directory holding `MOSxxxx.png` texture pages (V2 only).
        #[arg(long)]
        pages: Option<PathBuf>,
        /// Frame compression policy.
        #[arg(long, value_enum, default_value_t = Compress::Auto)]
        compress: Compress,
        /// Palette size budget (1-255).
        #[arg(long, default_value_t = codec::MAX_EXPORT_COLORS)]
        max_colors: usize,
        /// Wrap the result in a zlib `BAMC` container.
        #[arg(long)]
        bamc: bool,
        /// Re-quantize V1 input instead of keeping its palette and indices.
        #[arg(long)]
        requantize: bool,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Json,
    Pretty,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Compress {
    Never,
    Always,
    Auto,
}

impl From<Compress> for CompressionPolicy {
    fn from(value: Compress) -> Self {
        match value {
            Compress::Never => Self::Never,
            Compress::Always => Self::Always,
            Compress::Auto => Self::Auto,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Inspect { path, glob, format } => {
            let loader = BamLoader::new();
            let files = if path.is_dir() {
                collect_resources(&path, glob.as_deref())?
            } else {
                vec![path]
            };
            for file in files {
                let bytes =
                    fs::read(&file).with_context(|| format!("read {}", file.display()))?;
                let report = inspect(bytes, &loader)
                    .with_context(|| format!("inspect {}", file.display()))?;
                match format {
                    OutputFormat::Json => {
                        let json =
                            serde_json::to_string_pretty(&report).context("serialize json")?;
                        println!("{json}");
                    }
                    OutputFormat::Pretty => {
                        println!("== {} ==", file.display());
                        print!("{}", format_pretty(&report));
                    }
                }
            }
        }
        Command::Export {
            input,
            out,
            pages,
            shared,
            per_cycle,
            mirrored,
        } => {
            let decoder = load(&input, pages.as_deref())?;
            fs::create_dir_all(&out).with_context(|| format!("create {}", out.display()))?;
            let stem = file_stem(&input);

            let mut controller = Controller::new(&decoder);
            controller.set_shared_per_cycle(per_cycle);
            controller.set_mirrored(mirrored);
            if shared {
                controller.set_mode(RenderMode::Shared);
            }

            let mut written = 0usize;
            for cycle in 0..controller.cycle_count() {
                controller.cycle_set(cycle);
                for position in 0..controller.cycle_frame_count() {
                    let rendered = controller.cycle_get_frame_at(position);
                    for issue in &rendered.issues {
                        tracing::warn!(cycle, position, "{issue}");
                    }
                    let path = out.join(format!("{stem}_{cycle:02}_{position:03}.png"));
                    bitmap_to_rgba(&rendered.image)
                        .save(&path)
                        .with_context(|| format!("write {}", path.display()))?;
                    written += 1;
                }
            }
            tracing::info!(frames = written, dir = %out.display(), "export complete");
        }
        Command::Convert {
            input,
            out,
            pages,
            compress,
            max_colors,
            bamc,
            requantize,
        } => {
            let decoder = load(&input, pages.as_deref())?;
            let options = ExportOptions::default()
                .with_compression(compress.into())
                .with_max_colors(max_colors);
            let mut bytes = convert_to_v1(&decoder, &options, requantize)
                .with_context(|| format!("encode {}", input.display()))?;
            if bamc {
                bytes = wrap_bamc(&bytes, &ZlibCompressor::default()).context("compress")?;
            }
            fs::write(&out, &bytes).with_context(|| format!("write {}", out.display()))?;
            tracing::info!(bytes = bytes.len(), out = %out.display(), "converted");
        }
    }
    Ok(())
}

fn load(path: &Path, pages: Option<&Path>) -> Result<AnyDecoder> {
    let bytes = fs::read(path).with_context(|| format!("read {}", path.display()))?;
    let mut loader = BamLoader::new();
    if let Some(dir) = pages {
        let capacity = NonZeroUsize::new(PAGE_CACHE_CAPACITY).context("page cache capacity")?;
        loader = loader.with_pages(Arc::new(CachedPages::new(PngPages::new(dir), capacity)));
    }
    let decoder = loader
        .load(bytes)
        .with_context(|| format!("load {}", path.display()))?;
    if let AnyDecoder::Block(_) = &decoder {
        if pages.is_none() {
            tracing::warn!("V2 resource loaded without --pages; frames will be empty");
        }
    }
    tracing::debug!(
        frames = decoder.frame_count(),
        cycles = decoder.cycle_count(),
        "loaded {}",
        path.display()
    );
    Ok(decoder)
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("frame")
        .to_string()
}

fn collect_resources(dir: &Path, glob: Option<&str>) -> Result<Vec<PathBuf>> {
    let pattern = match glob {
        Some(value) => Some(Pattern::new(value).context("invalid glob pattern")?),
        None => None,
    };

    let mut files = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("read dir {}", dir.display()))? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let name = path.file_name().and_then(|name| name.to_str()).unwrap_or("");
        let matches = match &pattern {
            Some(pattern) => pattern.matches_path(&path) || pattern.matches(name),
            None => Path::new(name)
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("bam")),
        };
        if matches {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
