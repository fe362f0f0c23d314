//! Headless survey overlay runner.
//!
//! Loads the layered config, drives the overlay for a number of frames
//! against synthetic abundance and coverage sources, and writes the final
//! color buffer as an equirectangular PNG.
//!
//! Run with: `cargo run -p survey-viewer -- --body Mun --coverage true`

mod snapshot;
mod synthetic;

use std::path::PathBuf;
use std::process::ExitCode;
use std::rc::Rc;

use clap::Parser;
use survey_config::{CONFIG_FILE_NAME, CliArgs, Config};
use survey_overlay::{
    AbundanceSource, BodyCatalog, Capabilities, CoverageLink, FrameOutput, MapOverlay,
    OverlayError, ProviderRegistry, TickReport, ViewState,
};
use tracing::{error, info};

use crate::synthetic::{BandedAbundance, SweepCoverage};

/// Shipped defaults, read before the user's file.
const BASE_CONFIG_FILE_NAME: &str = "overlay.base.ron";

/// CLI arguments for the viewer binary.
#[derive(Parser, Debug)]
#[command(name = "survey-viewer", about = "Render the survey overlay to a PNG")]
struct ViewerArgs {
    #[command(flatten)]
    overlay: CliArgs,

    /// Body to target.
    #[arg(long, default_value = "Kerbin")]
    body: String,

    /// Frames to run.
    #[arg(long, default_value_t = 120)]
    ticks: u32,

    /// Degrees of longitude the synthetic scanner reveals per frame.
    #[arg(long, default_value_t = 4.0)]
    sweep: f64,

    /// Run without an abundance source (forces the field provider).
    #[arg(long)]
    no_abundance: bool,

    /// Write the settings back after the run.
    #[arg(long)]
    save: bool,

    /// Output image.
    #[arg(long, default_value = "overlay.png")]
    output: PathBuf,
}

/// Errors that end the viewer run.
#[derive(Debug, thiserror::Error)]
enum ViewerError {
    #[error("body '{0}' is not in the catalog")]
    UnknownBody(String),

    #[error("overlay never became visible")]
    NothingRendered,

    #[error(transparent)]
    Overlay(#[from] OverlayError),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("png encoding failed: {0}")]
    Png(#[from] png::EncodingError),
}

fn main() -> ExitCode {
    let args = ViewerArgs::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            eprintln!("survey-viewer: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: ViewerArgs) -> Result<(), ViewerError> {
    let config_dir = args.overlay.config.clone().or_else(Config::default_dir);
    let mut config = match &config_dir {
        Some(dir) => Config::load_layered(
            &dir.join(BASE_CONFIG_FILE_NAME),
            &dir.join(CONFIG_FILE_NAME),
        ),
        None => Config::failsafe(),
    };
    config.apply_cli_overrides(&args.overlay);

    survey_log::init_logging(config_dir.as_deref(), cfg!(debug_assertions), Some(&config));

    info!("Survey viewer");
    info!(
        "Provider: {} | Body: {} | Frames: {} | Coverage: {}",
        config.overlay.provider, args.body, args.ticks, config.overlay.use_coverage
    );

    let catalog = BodyCatalog::from_config(&config);
    let target = catalog
        .by_name(&args.body)
        .map(|b| b.id)
        .ok_or_else(|| ViewerError::UnknownBody(args.body.clone()))?;

    let coverage = Rc::new(SweepCoverage::new(args.sweep));
    let abundance: Option<Rc<dyn AbundanceSource>> = if args.no_abundance {
        None
    } else {
        Some(Rc::new(BandedAbundance))
    };
    let caps = Capabilities {
        coverage: CoverageLink::new(coverage.clone()),
        abundance,
    };

    let mut overlay = MapOverlay::new(config, catalog, ProviderRegistry::with_builtin(), caps);
    info!("Available providers: {:?}", overlay.available_providers());

    let view = ViewState {
        map_enabled: true,
        target: Some(target),
    };
    let mut rebuilds = 0u32;
    let mut bands = 0u32;
    for frame in 0..args.ticks {
        coverage.advance();
        match overlay.update(&view) {
            FrameOutput::Visible(out) => match out.tick {
                TickReport::FullRebuild { display_max, .. } => {
                    rebuilds += 1;
                    info!("Frame {frame}: full recolor, display max {display_max:.2}");
                }
                TickReport::Band { .. } => bands += 1,
                TickReport::Idle => {}
            },
            FrameOutput::Hidden => {}
        }
    }
    info!(
        "Ran {} frames: {rebuilds} full recolors, {bands} bands, {:.0} deg scanned",
        args.ticks,
        coverage.frontier()
    );

    if let Some(tip) = overlay.tooltip_at(&view, 0.0, 90.0) {
        info!("{} | {} | {}", tip.title, tip.coordinates, tip.content);
    }

    let grid = overlay.colorizer().grid();
    if overlay.colorizer().mesh().is_none() {
        return Err(ViewerError::NothingRendered);
    }
    snapshot::write_png(&args.output, &overlay.colorizer().frame(), grid)?;
    info!("Wrote {}", args.output.display());

    if args.save
        && let Some(dir) = &config_dir
    {
        overlay.save_to(dir)?;
        info!("Saved settings to {}", dir.display());
    }
    Ok(())
}
