//! Glyph ink-density measurement.
//!
//! Each candidate character is rasterized black-on-white onto a fixed square
//! canvas, and its density is the fraction of canvas pixels darker than a
//! threshold. Measuring against the whole canvas (not the glyph's bounding
//! box) puts characters of very different natural sizes — `.` versus `@` —
//! on one comparable 0..1 scale.
//!
//! Densities are only comparable within one (font, size, canvas, threshold)
//! configuration; the persisted metric table records all four.

use fontdue::{Font, FontSettings};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default font size in pixels for metric builds.
pub const DEFAULT_FONT_SIZE: f32 = 16.0;

/// Default canvas side length in pixels.
pub const DEFAULT_CANVAS_SIZE: u32 = 32;

/// Default darkness threshold: pixels strictly below this count as ink.
pub const DEFAULT_THRESHOLD: u8 = 200;

/// Density per character, keyed by code point.
///
/// The BTreeMap ordering doubles as the charset's original ordering, which
/// the ramp builder relies on for reproducible tie-breaking.
pub type GlyphDensityMap = BTreeMap<char, f64>;

/// Errors raised while loading fonts or building glyph metrics.
///
/// All of these are configuration errors: without a usable font and valid
/// build parameters no metric table can be produced, so they fail the build
/// rather than degrading per character.
#[derive(Debug, Error)]
pub enum GlyphError {
    #[error("failed to read font file '{}': {source}", .path.display())]
    FontRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse font '{}': {message}", .path.display())]
    FontParse { path: PathBuf, message: String },
    #[error("font size must be positive, got {0}")]
    InvalidFontSize(f32),
    #[error("canvas size must be at least 1 pixel, got {0}")]
    InvalidCanvasSize(u32),
}

/// A parsed font together with its identity, for metric table metadata.
pub struct LoadedFont {
    pub font: Font,
    /// File name of the font, e.g. `DejaVuSansMono-Bold.ttf`
    pub name: String,
    /// Full path the font was loaded from
    pub path: PathBuf,
}

/// Load and parse a font file.
pub fn load_font(path: &Path) -> Result<LoadedFont, GlyphError> {
    let bytes = std::fs::read(path).map_err(|e| GlyphError::FontRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    let font = Font::from_bytes(bytes, FontSettings::default()).map_err(|message| {
        GlyphError::FontParse {
            path: path.to_path_buf(),
            message: message.to_string(),
        }
    })?;

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    Ok(LoadedFont {
        font,
        name,
        path: path.to_path_buf(),
    })
}

/// Measure ink density for every character in `chars`.
///
/// Each character is rasterized at `font_size` and composited centered onto
/// a white `canvas_size` x `canvas_size` canvas; its density is the fraction
/// of canvas pixels with intensity strictly below `threshold`. Characters
/// that produce no marks (e.g. space) get density 0.0.
///
/// # Errors
/// Fails fast on a non-positive font size or a zero canvas size.
pub fn build_glyph_metrics(
    chars: &[char],
    font: &Font,
    font_size: f32,
    canvas_size: u32,
    threshold: u8,
) -> Result<GlyphDensityMap, GlyphError> {
    if !(font_size > 0.0) {
        return Err(GlyphError::InvalidFontSize(font_size));
    }
    if canvas_size == 0 {
        return Err(GlyphError::InvalidCanvasSize(canvas_size));
    }

    let side = canvas_size as usize;
    let mut metrics = GlyphDensityMap::new();

    for &ch in chars {
        // White background; the glyph is drawn in black.
        let mut canvas = vec![255u8; side * side];

        let (glyph_metrics, coverage) = font.rasterize(ch, font_size);
        if glyph_metrics.width > 0 && glyph_metrics.height > 0 {
            blit_centered(
                &mut canvas,
                side,
                &coverage,
                glyph_metrics.width,
                glyph_metrics.height,
            );
        }

        metrics.insert(ch, ink_density(&canvas, threshold));
    }

    Ok(metrics)
}

/// Composite a glyph coverage bitmap onto the canvas, centered.
///
/// Coverage is fontdue's 0..255 alpha; black ink over a white background
/// gives `255 - coverage` per pixel, merged with `min` so overlapping blits
/// keep the darkest value. Glyphs larger than the canvas are clipped.
fn blit_centered(canvas: &mut [u8], side: usize, coverage: &[u8], width: usize, height: usize) {
    let x0 = (side as i32 - width as i32) / 2;
    let y0 = (side as i32 - height as i32) / 2;

    for gy in 0..height {
        let cy = y0 + gy as i32;
        if cy < 0 || cy >= side as i32 {
            continue;
        }
        for gx in 0..width {
            let cx = x0 + gx as i32;
            if cx < 0 || cx >= side as i32 {
                continue;
            }
            let ink = 255 - coverage[gy * width + gx];
            let dst = &mut canvas[cy as usize * side + cx as usize];
            *dst = (*dst).min(ink);
        }
    }
}

/// Fraction of canvas pixels with intensity strictly below `threshold`.
fn ink_density(canvas: &[u8], threshold: u8) -> f64 {
    let dark = canvas.iter().filter(|&&px| px < threshold).count();
    dark as f64 / canvas.len() as f64
}
