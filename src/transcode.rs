//! Per-frame transcoding: luminance, downsampling, LUT mapping.
//!
//! The hot path is deliberately branch-free per sample: convert to
//! grayscale with integer math, area-average down to the character grid,
//! then index the 256-entry LUT with each 8-bit sample. No per-pixel
//! callbacks, no density comparisons at render time.

use crate::camera::Frame;
use crate::ramp::LUT_LEVELS;
use thiserror::Error;

/// Default terminal character aspect ratio (height/width).
/// Terminal cells are typically ~2x taller than wide; compensating with
/// fewer output rows prevents vertical stretching.
pub const DEFAULT_CHAR_ASPECT: f32 = 2.0;

/// Immutable render configuration for one transcode call.
///
/// The outer loop constructs a fresh value per frame when settings change;
/// the transcoder never consults shared mutable state.
#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    /// Output width in character cells
    pub cols: u16,
    /// Terminal character aspect ratio (height/width)
    pub char_aspect: f32,
    /// Emit a parallel per-cell RGB grid
    pub colorize: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            cols: 80,
            char_aspect: DEFAULT_CHAR_ASPECT,
            colorize: false,
        }
    }
}

/// Average RGB color of a downsampled cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CellColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// One transcoded frame: `rows` lines of exactly `cols` glyphs, plus an
/// optional color grid index-aligned with the text (row-major).
#[derive(Debug, Clone)]
pub struct GlyphGrid {
    pub cols: u16,
    pub rows: u16,
    pub lines: Vec<String>,
    pub colors: Option<Vec<CellColor>>,
}

/// Errors raised by the transcoder.
///
/// All of these are fatal to the call: the hot path itself never uses
/// errors for control flow, lookups are total once inputs are validated.
#[derive(Debug, Error)]
pub enum TranscodeError {
    #[error("cannot transcode an empty {width}x{height} frame")]
    EmptyFrame { width: u32, height: u32 },
    #[error("frame buffer holds {actual} bytes, expected {expected} for its dimensions")]
    TruncatedFrame { expected: usize, actual: usize },
    #[error("lookup table has {0} entries, expected 256")]
    LutLength(usize),
    #[error("target column count must be at least 1")]
    ZeroCols,
    #[error("character aspect ratio must be positive, got {0}")]
    InvalidAspect(f32),
}

/// Convert an RGB frame to grayscale using ITU-R BT.601 luminance.
///
/// Integer math (coefficients scaled by 1000) keeps floating point out of
/// the per-pixel path: `Y = (299 R + 587 G + 114 B) / 1000`.
pub fn to_grayscale(frame: &Frame) -> Vec<u8> {
    let mut gray = Vec::with_capacity(frame.pixel_count());

    for rgb in frame.data.chunks_exact(3) {
        let r = rgb[0] as u32;
        let g = rgb[1] as u32;
        let b = rgb[2] as u32;
        let luminance = (299 * r + 587 * g + 114 * b) / 1000;
        gray.push(luminance as u8);
    }

    gray
}

/// Mean luminance of a frame, on the 0-255 scale.
///
/// Used by the device prober to tell live cameras from black frames.
pub fn mean_luminance(frame: &Frame) -> f64 {
    let gray = to_grayscale(frame);
    if gray.is_empty() {
        return 0.0;
    }
    gray.iter().map(|&v| v as u64).sum::<u64>() as f64 / gray.len() as f64
}

/// Output row count for a target width: `cols * height / width` corrected
/// by the character aspect ratio, floored, and at least 1.
fn target_rows(cols: u16, width: u32, height: u32, char_aspect: f32) -> u16 {
    let rows =
        (cols as f64 * height as f64 / width as f64 / char_aspect as f64) as u16;
    rows.max(1)
}

/// Pixel span of a grid cell along one axis.
///
/// Spans are clamped non-empty so every cell averages at least one pixel,
/// even when the grid is finer than the source along that axis.
fn cell_span(cell: u16, scale: f64, limit: u32) -> (u32, u32) {
    let start = ((cell as f64 * scale) as u32).min(limit - 1);
    let end = (((cell as f64 + 1.0) * scale) as u32).clamp(start + 1, limit);
    (start, end)
}

/// Area-average a grayscale field down to `cols x rows`.
fn downsample_luma(gray: &[u8], width: u32, height: u32, cols: u16, rows: u16) -> Vec<u8> {
    let scale_x = width as f64 / cols as f64;
    let scale_y = height as f64 / rows as f64;

    let mut result = Vec::with_capacity(cols as usize * rows as usize);

    for cy in 0..rows {
        let (y0, y1) = cell_span(cy, scale_y, height);
        for cx in 0..cols {
            let (x0, x1) = cell_span(cx, scale_x, width);

            let mut sum = 0u32;
            for py in y0..y1 {
                let row = py as usize * width as usize;
                for px in x0..x1 {
                    sum += gray[row + px as usize] as u32;
                }
            }
            let count = (x1 - x0) * (y1 - y0);
            result.push((sum / count) as u8);
        }
    }

    result
}

/// Area-average the RGB planes down to `cols x rows`.
fn downsample_colors(frame: &Frame, cols: u16, rows: u16) -> Vec<CellColor> {
    let width = frame.width;
    let height = frame.height;
    let scale_x = width as f64 / cols as f64;
    let scale_y = height as f64 / rows as f64;

    let mut result = Vec::with_capacity(cols as usize * rows as usize);

    for cy in 0..rows {
        let (y0, y1) = cell_span(cy, scale_y, height);
        for cx in 0..cols {
            let (x0, x1) = cell_span(cx, scale_x, width);

            let mut sum_r = 0u32;
            let mut sum_g = 0u32;
            let mut sum_b = 0u32;
            for py in y0..y1 {
                let row = py as usize * width as usize;
                for px in x0..x1 {
                    let idx = (row + px as usize) * 3;
                    sum_r += frame.data[idx] as u32;
                    sum_g += frame.data[idx + 1] as u32;
                    sum_b += frame.data[idx + 2] as u32;
                }
            }
            let count = (x1 - x0) * (y1 - y0);
            result.push(CellColor {
                r: (sum_r / count) as u8,
                g: (sum_g / count) as u8,
                b: (sum_b / count) as u8,
            });
        }
    }

    result
}

/// Transcode a frame into a glyph grid through a 256-entry LUT.
///
/// 1. Convert to BT.601 grayscale.
/// 2. Derive the row count from `cols`, the frame shape, and the character
///    aspect ratio.
/// 3. Area-average the luminance (and, when colorizing, the RGB planes)
///    down to the target grid.
/// 4. Map each 8-bit sample through `lut` by direct index.
///
/// The output is always `rows` lines of exactly `cols` characters; the
/// color grid, when present, has identical dimensions and alignment.
///
/// # Errors
/// Fails on a zero-sized or truncated frame, a LUT whose length is not
/// 256, zero columns, or a non-positive aspect ratio.
pub fn transcode(
    frame: &Frame,
    lut: &[char],
    options: &RenderOptions,
) -> Result<GlyphGrid, TranscodeError> {
    if frame.width == 0 || frame.height == 0 {
        return Err(TranscodeError::EmptyFrame {
            width: frame.width,
            height: frame.height,
        });
    }
    if frame.data.len() < frame.expected_len() {
        return Err(TranscodeError::TruncatedFrame {
            expected: frame.expected_len(),
            actual: frame.data.len(),
        });
    }
    if lut.len() != LUT_LEVELS {
        return Err(TranscodeError::LutLength(lut.len()));
    }
    if options.cols == 0 {
        return Err(TranscodeError::ZeroCols);
    }
    if !(options.char_aspect > 0.0) {
        return Err(TranscodeError::InvalidAspect(options.char_aspect));
    }

    let cols = options.cols;
    let rows = target_rows(cols, frame.width, frame.height, options.char_aspect);

    let gray = to_grayscale(frame);
    let luma_grid = downsample_luma(&gray, frame.width, frame.height, cols, rows);

    let mut lines = Vec::with_capacity(rows as usize);
    for row in luma_grid.chunks_exact(cols as usize) {
        lines.push(row.iter().map(|&luma| lut[luma as usize]).collect());
    }

    let colors = options
        .colorize
        .then(|| downsample_colors(frame, cols, rows));

    Ok(GlyphGrid {
        cols,
        rows,
        lines,
        colors,
    })
}
