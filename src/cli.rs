//! Command-line interface definitions and helpers.
//!
//! This module contains all CLI argument parsing and the small subcommand
//! handlers (`list-devices`, `config`); the build/render subcommands are
//! dispatched from `main`.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::camera::{self, ProbeSettings};
use crate::charset::CharsetCategory;
use crate::config::default_path as get_config_path;

// ==================== CLI Enums ====================

/// Charset category for metric builds and rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Charset {
    All,
    Letters,
    Digits,
    #[default]
    Punctuation,
    LettersDigitsPunct,
}

impl From<Charset> for CharsetCategory {
    fn from(c: Charset) -> Self {
        match c {
            Charset::All => CharsetCategory::All,
            Charset::Letters => CharsetCategory::Letters,
            Charset::Digits => CharsetCategory::Digits,
            Charset::Punctuation => CharsetCategory::Punctuation,
            Charset::LettersDigitsPunct => CharsetCategory::LettersDigitsPunct,
        }
    }
}

// ==================== CLI Arguments ====================

/// Render camera frames and still images as text glyphs in the terminal
#[derive(Parser, Debug)]
#[command(name = "glyphcast")]
#[command(version, about = "Luminance-to-glyph renderer for the terminal", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Config file path
    #[arg(long, short)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Measure glyph densities for a charset and write a metric table
    BuildMetrics {
        /// Charset category to measure
        #[arg(long, default_value = "punctuation")]
        charset: Charset,

        /// Font file to measure (overrides the configured font)
        #[arg(long)]
        font: Option<PathBuf>,

        /// Font size in pixels
        #[arg(long, default_value_t = 16)]
        font_size: u32,

        /// Rasterization canvas side length in pixels
        #[arg(long, default_value_t = 32)]
        canvas_size: u32,

        /// Darkness threshold: pixels below this count as ink
        #[arg(long, default_value_t = 200)]
        threshold: u8,

        /// Flip ramp polarity (for light-background terminals)
        #[arg(long)]
        invert: bool,

        /// Output directory (default: the configured metrics dir)
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },

    /// Render a still image once
    Image {
        /// Input image path
        image: PathBuf,

        /// Charset whose metric table to render with
        #[arg(long, default_value = "punctuation")]
        charset: Charset,

        /// Output columns (0 = fit the terminal)
        #[arg(long, default_value_t = 0)]
        cols: u16,

        /// Terminal character aspect ratio (default 2.0)
        #[arg(long)]
        aspect: Option<f32>,

        /// Colorize output with 24-bit foreground colors
        #[arg(long)]
        color: bool,

        /// Metrics directory (default: the configured metrics dir)
        #[arg(long)]
        metrics_dir: Option<PathBuf>,
    },

    /// Probe for a camera and render it live
    Live {
        /// Charset whose metric table to render with
        #[arg(long, default_value = "punctuation")]
        charset: Charset,

        /// Output columns (0 = fit the terminal)
        #[arg(long, default_value_t = 0)]
        cols: u16,

        /// Terminal character aspect ratio (default 2.0)
        #[arg(long)]
        aspect: Option<f32>,

        /// Target frames per second (default 5.0)
        #[arg(long)]
        fps: Option<f32>,

        /// Colorize output with 24-bit foreground colors
        #[arg(long)]
        color: bool,

        /// Mirror frames horizontally (selfie mode)
        #[arg(long)]
        mirror: bool,

        /// Device indices to probe before giving up
        #[arg(long, default_value_t = 5)]
        max_devices: u32,

        /// Metrics directory (default: the configured metrics dir)
        #[arg(long)]
        metrics_dir: Option<PathBuf>,
    },

    /// Probe capture devices and report the usable ones
    ListDevices {
        /// Device indices to probe
        #[arg(long, default_value_t = 5)]
        max_devices: u32,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Show current configuration
    Show,
    /// Create default config file
    Init,
}

// ==================== Subcommand Handlers ====================

/// Probe device indices and print every accepting (index, backend) pair.
///
/// Unlike the render path (first match wins), listing probes every index
/// so the user can see all usable devices.
pub fn list_devices(max_devices: u32) {
    let backends = camera::backend_candidates();
    let settings = ProbeSettings::default();

    println!(
        "Probing device indices 0..{} with backends {:?}...",
        max_devices,
        backends
            .iter()
            .map(|&b| camera::probe::backend_name(b))
            .collect::<Vec<_>>()
    );

    let mut found = 0;
    for index in 0..max_devices {
        if let Some(descriptor) = camera::probe_device(index, &backends, &settings) {
            println!("  {}", descriptor);
            found += 1;
        }
    }

    if found == 0 {
        println!("No usable capture devices found.");
        println!();
        println!("Make sure a camera is connected and permissions are granted.");
        println!("On macOS, grant access in System Settings > Privacy & Security > Camera.");
    } else {
        println!();
        println!("`glyphcast live` uses the first device listed.");
    }
}

/// Handle config subcommand actions.
pub fn handle_config_action(action: ConfigAction) {
    match action {
        ConfigAction::Show => {
            let config_path = get_config_path();
            if config_path.exists() {
                println!("Config file: {} (exists)", config_path.display());
            } else {
                println!("Config file: {} (not found)", config_path.display());
            }
            println!(
                "Metrics dir: {}",
                crate::config::default_metrics_dir().display()
            );
        }
        ConfigAction::Init => {
            let config_path = get_config_path();

            if config_path.exists() {
                eprintln!("Config file already exists: {}", config_path.display());
                eprintln!("Use 'glyphcast config show' to view current settings.");
                std::process::exit(1);
            }

            if let Some(parent) = config_path.parent() {
                if let Err(e) = std::fs::create_dir_all(parent) {
                    eprintln!("Error creating config directory: {}", e);
                    std::process::exit(1);
                }
            }

            let default_config = r#"# glyphcast configuration

[metrics]
# Directory holding metric table artifacts
# dir = "/path/to/metrics"
# Font measured by `build-metrics` when --font is not given
# font = "/path/to/DejaVuSansMono-Bold.ttf"

[render]
# Output columns (unset = fit the terminal)
# cols = 80
# Terminal character aspect ratio (height/width)
# char_aspect = 2.0
# Live target frame rate
# fps = 5.0
# Colorize output with 24-bit foreground colors
color = false

[camera]
# Device indices probed before giving up
# max_devices = 5
# Mirror frames horizontally (selfie mode)
mirror = false
"#;

            if let Err(e) = std::fs::write(&config_path, default_config) {
                eprintln!("Error writing config file: {}", e);
                std::process::exit(1);
            }

            println!("Created config file: {}", config_path.display());
        }
    }
}
