use clap::Parser;
use std::error::Error;
use std::path::{Path, PathBuf};

use glyphcast::camera::{self, CameraError, CameraSettings, CaptureSession, Frame, ProbeSettings};
use glyphcast::charset::{self, CharsetCategory};
use glyphcast::cli::{Args, Command};
use glyphcast::config::Config;
use glyphcast::glyph::{self, load_font};
use glyphcast::live::{self, LiveOptions};
use glyphcast::ramp::{build_ramp, quantize, LUT_LEVELS};
use glyphcast::store::{self, MetricTable, TableMeta};
use glyphcast::terminal::{auto_columns, write_frame};
use glyphcast::transcode::{transcode, RenderOptions, DEFAULT_CHAR_ASPECT};

fn main() {
    env_logger::init();

    let args = Args::parse();

    let config = match Config::load(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let result = match args.command {
        Command::BuildMetrics {
            charset,
            font,
            font_size,
            canvas_size,
            threshold,
            invert,
            out_dir,
        } => build_metrics(
            &config,
            charset.into(),
            font,
            font_size,
            canvas_size,
            threshold,
            invert,
            out_dir,
        ),
        Command::Image {
            image,
            charset,
            cols,
            aspect,
            color,
            metrics_dir,
        } => render_image(
            &config,
            &image,
            charset.into(),
            cols,
            aspect,
            color,
            metrics_dir,
        ),
        Command::Live {
            charset,
            cols,
            aspect,
            fps,
            color,
            mirror,
            max_devices,
            metrics_dir,
        } => run_live(
            &config,
            charset.into(),
            cols,
            aspect,
            fps,
            color,
            mirror,
            max_devices,
            metrics_dir,
        ),
        Command::ListDevices { max_devices } => {
            glyphcast::cli::list_devices(max_devices);
            Ok(())
        }
        Command::Config { action } => {
            glyphcast::cli::handle_config_action(action);
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Offline metric table build: charset -> densities -> ramp -> LUT -> JSON.
#[allow(clippy::too_many_arguments)]
fn build_metrics(
    config: &Config,
    category: CharsetCategory,
    font: Option<PathBuf>,
    font_size: u32,
    canvas_size: u32,
    threshold: u8,
    invert: bool,
    out_dir: Option<PathBuf>,
) -> Result<(), Box<dyn Error>> {
    let font_path = font.or_else(|| config.metrics.font.clone()).ok_or(
        "no font file specified; pass --font or set metrics.font in the config",
    )?;

    let candidate_set = charset::select(category);
    log::info!(
        "building metrics for '{}' ({} candidate characters)",
        candidate_set.label,
        candidate_set.len()
    );

    let loaded = load_font(&font_path)?;
    let metrics = glyph::build_glyph_metrics(
        &candidate_set.chars,
        &loaded.font,
        font_size as f32,
        canvas_size,
        threshold,
    )?;

    let ramp = build_ramp(&metrics, invert)?;
    let lut = quantize(&ramp, LUT_LEVELS)?;

    let table = MetricTable {
        meta: TableMeta {
            charset_label: candidate_set.label,
            font_name: loaded.name,
            font_path: loaded.path.display().to_string(),
            font_size,
            canvas_size,
            threshold,
            chars_count: metrics.len(),
            created_at: chrono::Local::now().to_rfc3339(),
        },
        metrics,
        ramp,
        lut,
    };

    let dir = out_dir.unwrap_or_else(|| config.metrics_dir());
    let path = table.save(&dir)?;
    println!("Saved: {}", path.display());

    Ok(())
}

/// Load the metric table for a charset from the resolved metrics dir.
fn load_table(
    config: &Config,
    category: CharsetCategory,
    metrics_dir: Option<PathBuf>,
) -> Result<MetricTable, Box<dyn Error>> {
    let dir = metrics_dir.unwrap_or_else(|| config.metrics_dir());
    let path = store::find(&dir, category.label())?;
    log::info!("using metric table {}", path.display());
    Ok(MetricTable::load(&path)?)
}

/// Resolve the output column count: flag > config > terminal width.
fn resolve_cols(cols: u16, config: &Config) -> u16 {
    if cols > 0 {
        cols
    } else {
        config.render.cols.unwrap_or_else(auto_columns)
    }
}

/// One-shot still image rendering.
fn render_image(
    config: &Config,
    image_path: &Path,
    category: CharsetCategory,
    cols: u16,
    aspect: Option<f32>,
    color: bool,
    metrics_dir: Option<PathBuf>,
) -> Result<(), Box<dyn Error>> {
    let table = load_table(config, category, metrics_dir)?;

    let rgb = image::open(image_path)
        .map_err(|e| format!("failed to read '{}': {}", image_path.display(), e))?
        .to_rgb8();
    let frame = Frame {
        width: rgb.width(),
        height: rgb.height(),
        data: rgb.into_raw(),
    };

    let options = RenderOptions {
        cols: resolve_cols(cols, config),
        char_aspect: aspect
            .or(config.render.char_aspect)
            .unwrap_or(DEFAULT_CHAR_ASPECT),
        colorize: color || config.render.color,
    };

    let grid = transcode(&frame, &table.lut, &options)?;
    write_frame(&mut std::io::stdout(), &grid)?;

    Ok(())
}

/// Probe for a camera and run the live render loop.
#[allow(clippy::too_many_arguments)]
fn run_live(
    config: &Config,
    category: CharsetCategory,
    cols: u16,
    aspect: Option<f32>,
    fps: Option<f32>,
    color: bool,
    mirror: bool,
    max_devices: u32,
    metrics_dir: Option<PathBuf>,
) -> Result<(), Box<dyn Error>> {
    let table = load_table(config, category, metrics_dir)?;

    let max_devices = config.camera.max_devices.unwrap_or(max_devices);
    let probe_settings = ProbeSettings::default();
    let descriptor =
        camera::scan(max_devices, &probe_settings).ok_or(CameraError::NoUsableDevice {
            max_devices,
            backends: camera::backend_candidates()
                .into_iter()
                .map(camera::probe::backend_name)
                .collect(),
        })?;
    println!("Using camera {}", descriptor);

    let settings = CameraSettings {
        mirror: mirror || config.camera.mirror,
        ..Default::default()
    };
    let mut session = CaptureSession::open(descriptor, &settings)?;

    let options = LiveOptions {
        fps: fps.or(config.render.fps).unwrap_or(5.0),
        render: RenderOptions {
            cols: resolve_cols(cols, config),
            char_aspect: aspect
                .or(config.render.char_aspect)
                .unwrap_or(DEFAULT_CHAR_ASPECT),
            colorize: color || config.render.color,
        },
    };

    let stop = live::install_stop_handler();
    live::run(&mut session, &table.lut, &options, &stop)?;

    Ok(())
}
