use anyhow::Context;
use clap::{Parser, Subcommand};
use moire_inspect::config::{load_config_or_default, Config, ConfigFormat};
use moire_inspect::logging::init_logging;
use moire_inspect::preprocessing::resize_raw;
use moire_inspect::storage::{create_raster, RasterStore};
use moire_inspect::visualization::{render_with, PosterOptions};
use moire_inspect::*;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "moire")]
#[command(about = "Surface deformation inspection with moire line rasters")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (TOML or JSON)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the base raster, and optionally its overlay
    Generate {
        /// Stroke angle in degrees
        #[arg(short, long)]
        angle: Option<f64>,

        /// Spacing between strokes in pixels
        #[arg(short, long)]
        distance: Option<u32>,

        /// Stroke thickness in pixels
        #[arg(short, long)]
        thickness: Option<u32>,

        /// Stroke shift along the normal in pixels
        #[arg(long)]
        offset: Option<i32>,

        /// Also generate the overlay raster from the config's overlay section
        #[arg(long)]
        overlay: bool,

        /// Output directory, defaults to the configured raster directory
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Threshold, crop and resize a photograph
    Process {
        /// Photograph of the surface
        #[arg(short, long)]
        input: PathBuf,

        /// Output image path
        #[arg(short, long)]
        output: PathBuf,

        /// Binary threshold, overrides the config
        #[arg(short, long)]
        threshold: Option<u8>,

        /// Rows cut from the top, overrides the config
        #[arg(long)]
        top_offset: Option<u32>,

        /// Only rescale the photograph to the window, keeping it raw
        #[arg(long)]
        resize_only: bool,
    },

    /// Compare a processed photograph against the base and overlay rasters
    Analyze {
        /// Processed photograph (or a raw one with --raw)
        #[arg(short, long)]
        image: PathBuf,

        /// The input is a raw photograph; preprocess it first
        #[arg(long)]
        raw: bool,

        /// Base raster image; generated from the config when omitted
        #[arg(long)]
        base: Option<PathBuf>,

        /// Overlay raster image; generated from the config when omitted
        #[arg(long)]
        over: Option<PathBuf>,

        /// Write the diagnostic poster here
        #[arg(short, long)]
        poster: Option<PathBuf>,

        /// Write the JSON report here
        #[arg(short, long)]
        report: Option<PathBuf>,
    },

    /// Grab one camera frame, save it, and optionally analyze it
    #[cfg(feature = "camera")]
    Capture {
        /// Analyze the frame against the configured rasters
        #[arg(long)]
        analyze: bool,

        /// Root directory for saved frames and posters
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Write the default configuration
    InitConfig {
        /// Target file; `.json` selects JSON, anything else TOML
        #[arg(default_value = "moire.toml")]
        path: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = load_config_or_default(cli.config.as_deref());
    let _guard = init_logging(&config.logging.clone().with_verbosity(cli.verbose))?;

    match cli.command {
        Commands::Generate { angle, distance, thickness, offset, overlay, output } => {
            handle_generate(&config, angle, distance, thickness, offset, overlay, output)?;
        }
        Commands::Process { input, output, threshold, top_offset, resize_only } => {
            handle_process(&config, input, output, threshold, top_offset, resize_only)?;
        }
        Commands::Analyze { image, raw, base, over, poster, report } => {
            handle_analyze(&config, image, raw, base, over, poster, report)?;
        }
        #[cfg(feature = "camera")]
        Commands::Capture { analyze, output } => {
            handle_capture(&config, analyze, output)?;
        }
        Commands::InitConfig { path } => {
            handle_init_config(&path)?;
        }
    }

    Ok(())
}

fn handle_generate(
    config: &Config,
    angle: Option<f64>,
    distance: Option<u32>,
    thickness: Option<u32>,
    offset: Option<i32>,
    overlay: bool,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    let mut config = config.clone();
    if let Some(angle) = angle {
        config.raster.angle = angle;
    }
    if let Some(distance) = distance {
        config.raster.distance = distance;
    }
    if let Some(thickness) = thickness {
        config.raster.thickness = thickness;
    }
    if let Some(offset) = offset {
        config.raster.offset = offset;
    }
    check_config(&config)?;

    let store = RasterStore::new(output.unwrap_or_else(|| config.storage.raster_dir.clone()));

    let mut settings = vec![config.base_raster()];
    if overlay {
        settings.push(config.overlay_raster());
    }

    for raster_settings in &settings {
        let raster = create_raster(&config.window, raster_settings, Some(&store))?;
        let (width, height) = raster.dimensions();
        println!(
            "Raster {} ({}x{}) -> {}",
            raster_settings.stringify(),
            width,
            height,
            store.path_for(raster_settings).display()
        );
    }

    Ok(())
}

fn handle_process(
    config: &Config,
    input: PathBuf,
    output: PathBuf,
    threshold: Option<u8>,
    top_offset: Option<u32>,
    resize_only: bool,
) -> anyhow::Result<()> {
    let mut config = config.clone();
    if let Some(threshold) = threshold {
        config.processing.threshold = threshold;
    }
    if let Some(top_offset) = top_offset {
        config.processing.top_offset = top_offset;
    }

    let raw = load_raw_image(&input)?;
    let (width, height) = raw.dimensions();
    validate_image_size(width, height, config.processing.top_offset + 2)?;

    let processed = if resize_only {
        resize_raw(&raw, &config.window)?
    } else {
        config.preprocessing().execute(&raw)?
    };
    processed
        .image()
        .save(&output)
        .with_context(|| format!("Failed to save processed image to {}", output.display()))?;

    println!("Processed {}x{} photograph -> {}", width, height, output.display());
    Ok(())
}

fn handle_analyze(
    config: &Config,
    image: PathBuf,
    raw: bool,
    base: Option<PathBuf>,
    over: Option<PathBuf>,
    poster: Option<PathBuf>,
    report: Option<PathBuf>,
) -> anyhow::Result<()> {
    check_config(config)?;

    let processed = if raw {
        config.preprocessing().execute(&load_raw_image(&image)?)?
    } else {
        load_processed_image(&image)?
    };

    let store = raster_store(config);
    let base = match base {
        Some(path) => load_raster_image(&path)?,
        None => create_raster(&config.window, &config.base_raster(), store.as_ref())?,
    };
    let over = match over {
        Some(path) => load_raster_image(&path)?,
        None => create_raster(&config.window, &config.overlay_raster(), store.as_ref())?,
    };

    let analyzer = Analyzer::new(&base, &over, &processed)?;
    print_report(&analyzer.report());

    if let Some(path) = poster {
        save_poster(config, &analyzer, &path)?;
    }

    if let Some(path) = report {
        let json = serde_json::to_string_pretty(&analyzer.report())?;
        std::fs::write(&path, json)?;
        println!("Report saved to {}", path.display());
    }

    Ok(())
}

#[cfg(feature = "camera")]
fn handle_capture(config: &Config, analyze: bool, output: Option<PathBuf>) -> anyhow::Result<()> {
    use moire_inspect::camera::Camera;
    use moire_inspect::storage::FrameStore;

    let frames = match output {
        Some(root) => FrameStore::under(root),
        None => FrameStore::new(
            &config.storage.camera_dir,
            &config.storage.raster_dir,
            &config.storage.poster_dir,
        ),
    };

    let mut camera = Camera::start(&config.camera)?;
    let frame = camera.read()?;
    camera.stop();

    let path = frames.save_camera_image(&frame)?;
    println!("Frame saved to {}", path.display());

    if analyze {
        check_config(config)?;
        let processed = config.preprocessing().execute(&frame)?;
        let base = create_raster(&config.window, &config.base_raster(), None)?;
        let over = create_raster(&config.window, &config.overlay_raster(), None)?;
        frames.save_raster_image(&base)?;
        frames.save_raster_image(&over)?;

        let analyzer = Analyzer::new(&base, &over, &processed)?;
        print_report(&analyzer.report());
        let poster_path = frames.save_poster(&poster_for(config, &analyzer))?;
        println!("Poster saved to {}", poster_path.display());
    }

    Ok(())
}

fn handle_init_config(path: &Path) -> anyhow::Result<()> {
    if path.exists() {
        return Err(anyhow::anyhow!("Refusing to overwrite {}", path.display()));
    }
    Config::default().save_to_file(path, ConfigFormat::from_path(path))?;
    println!("Default configuration written to {}", path.display());
    Ok(())
}

fn check_config(config: &Config) -> anyhow::Result<()> {
    config
        .validate()
        .map_err(|errors| anyhow::anyhow!("Invalid configuration: {}", errors.join("; ")))
}

fn raster_store(config: &Config) -> Option<RasterStore> {
    if config.storage.save_rasters {
        Some(RasterStore::new(&config.storage.raster_dir))
    } else {
        None
    }
}

fn poster_for(config: &Config, analyzer: &Analyzer) -> image::RgbImage {
    let options = PosterOptions {
        marker_radius: config.analysis.marker_radius,
        highlight_p90: config.analysis.highlight_p90,
        ..PosterOptions::default()
    };
    render_with(analyzer.result(), &options)
}

fn save_poster(config: &Config, analyzer: &Analyzer, path: &Path) -> anyhow::Result<()> {
    let poster = poster_for(config, analyzer);
    poster
        .save(path)
        .with_context(|| format!("Failed to save poster to {}", path.display()))?;
    println!("Poster saved to {}", path.display());
    Ok(())
}

fn print_report(report: &AnalysisReport) {
    println!("Run:        {}", report.correlation_id);
    println!("Points:     {} template, {} captured", report.template_points, report.captured_points);
    println!("Rows:       {} ({} matched pairs)", report.rows, report.records);
    let ratio = report
        .tail_ratio
        .map_or_else(|| "n/a".to_string(), |r| format!("{:.3}", r));
    println!(
        "Distances:  p50 {:.3}px  p90 {:.3}px  p99 {:.3}px  (p99/p50 {})",
        report.percentiles.p50, report.percentiles.p90, report.percentiles.p99, ratio
    );
    println!("Verdict:    {}", report.message);
}
