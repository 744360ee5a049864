//! End-to-end tests for frame transcoding.
//!
//! These drive the full render-time path — grayscale, aspect-corrected
//! downsampling, LUT mapping, optional color — against synthetic frames
//! and a LUT built through the real quantizer.

use glyphcast::camera::Frame;
use glyphcast::ramp::{quantize, LUT_LEVELS};
use glyphcast::transcode::{transcode, CellColor, RenderOptions, TranscodeError};
use std::time::Instant;

/// Ramp used throughout: 5 glyphs, darkest to inkiest.
const RAMP: [char; 5] = [' ', '.', ':', '+', '@'];

fn test_lut() -> Vec<char> {
    quantize(&RAMP, LUT_LEVELS).unwrap()
}

fn uniform_frame(rgb: [u8; 3], width: u32, height: u32) -> Frame {
    let mut data = Vec::with_capacity((width * height * 3) as usize);
    for _ in 0..width * height {
        data.extend_from_slice(&rgb);
    }
    Frame {
        data,
        width,
        height,
    }
}

fn horizontal_gradient(width: u32, height: u32) -> Frame {
    let mut data = Vec::with_capacity((width * height * 3) as usize);
    for _y in 0..height {
        for x in 0..width {
            let brightness = ((x as f32 / (width - 1) as f32) * 255.0) as u8;
            data.extend_from_slice(&[brightness, brightness, brightness]);
        }
    }
    Frame {
        data,
        width,
        height,
    }
}

#[test]
fn test_uniform_gray_round_trip() {
    // The spec scenario: 640x480 all-128 gray at 80 cols, aspect 2.0
    // yields exactly 30 rows of 80 identical characters, all lut[128].
    let frame = uniform_frame([128, 128, 128], 640, 480);
    let lut = test_lut();
    let options = RenderOptions {
        cols: 80,
        char_aspect: 2.0,
        colorize: false,
    };

    let grid = transcode(&frame, &lut, &options).unwrap();

    assert_eq!(grid.rows, 30);
    assert_eq!(grid.cols, 80);
    assert_eq!(grid.lines.len(), 30);
    let expected = lut[128];
    for line in &grid.lines {
        assert_eq!(line.chars().count(), 80);
        assert!(line.chars().all(|ch| ch == expected));
    }
}

#[test]
fn test_pure_red_colorized_grid() {
    let frame = uniform_frame([255, 0, 0], 640, 480);
    let options = RenderOptions {
        cols: 40,
        char_aspect: 2.0,
        colorize: true,
    };

    let grid = transcode(&frame, &test_lut(), &options).unwrap();

    let colors = grid.colors.expect("colorize requested");
    assert_eq!(colors.len(), grid.cols as usize * grid.rows as usize);
    assert!(colors
        .iter()
        .all(|&c| c == CellColor { r: 255, g: 0, b: 0 }));
}

#[test]
fn test_gradient_maps_monotonically_across_columns() {
    let frame = horizontal_gradient(320, 240);
    let lut = test_lut();
    let options = RenderOptions {
        cols: 32,
        char_aspect: 2.0,
        colorize: false,
    };

    let grid = transcode(&frame, &lut, &options).unwrap();

    let ramp_index = |ch: char| RAMP.iter().position(|&r| r == ch).unwrap();
    for line in &grid.lines {
        let indices: Vec<usize> = line.chars().map(ramp_index).collect();
        for pair in indices.windows(2) {
            assert!(
                pair[0] <= pair[1],
                "glyph density regressed left-to-right in '{}'",
                line
            );
        }
        // A full-range gradient must actually span glyphs: darkest cell at
        // the left edge, and a strictly denser glyph by the right edge.
        assert_eq!(*indices.first().unwrap(), 0);
        assert!(*indices.last().unwrap() >= RAMP.len() - 2);
    }
}

#[test]
fn test_tall_narrow_source_keeps_exact_cols() {
    // No ragged rows regardless of source shape.
    let frame = uniform_frame([200, 200, 200], 120, 960);
    let options = RenderOptions {
        cols: 20,
        char_aspect: 2.0,
        colorize: false,
    };

    let grid = transcode(&frame, &test_lut(), &options).unwrap();
    assert_eq!(grid.rows, 80); // 20 * 960 / 120 / 2
    assert!(grid.lines.iter().all(|l| l.chars().count() == 20));
}

#[test]
fn test_empty_frame_is_fatal() {
    let frame = Frame {
        data: Vec::new(),
        width: 0,
        height: 0,
    };
    let result = transcode(&frame, &test_lut(), &RenderOptions::default());
    assert!(matches!(result, Err(TranscodeError::EmptyFrame { .. })));
}

#[test]
fn test_transcode_is_fast_enough_for_live_use() {
    // The transcoder must complete in well under one frame interval.
    // 250ms is deliberately generous for unoptimized builds; release
    // builds run this in well under a millisecond.
    let frame = uniform_frame([90, 120, 150], 640, 480);
    let lut = test_lut();
    let options = RenderOptions {
        cols: 80,
        char_aspect: 2.0,
        colorize: false,
    };

    // Warm once, then time.
    transcode(&frame, &lut, &options).unwrap();
    let start = Instant::now();
    transcode(&frame, &lut, &options).unwrap();
    let elapsed = start.elapsed();

    assert!(
        elapsed.as_millis() < 250,
        "transcode took {:?} for a 640x480 frame",
        elapsed
    );
}
