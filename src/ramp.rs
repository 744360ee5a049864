//! Brightness ramp construction and LUT quantization.
//!
//! A ramp orders measured characters by ink density; the LUT resamples that
//! ramp into a fixed 256-entry table so the transcoder can map an 8-bit
//! luminance sample to a glyph with a single index.
//!
//! Polarity: with `invert = false` the ramp ascends by density, so LUT entry
//! 0 (black input) is the least-inky glyph and entry 255 the inkiest. On a
//! dark-background terminal this renders bright pixels as bright, dense
//! glyphs. Pass `invert = true` for light-background terminals.

use crate::glyph::GlyphDensityMap;
use std::cmp::Ordering;
use thiserror::Error;

/// Number of LUT entries: one per 8-bit luminance value.
pub const LUT_LEVELS: usize = 256;

/// Errors raised while building ramps or lookup tables.
///
/// Both variants are configuration errors and fail the build outright;
/// a one-character "ramp" cannot represent a gradient and must never be
/// silently accepted.
#[derive(Debug, Error)]
pub enum RampError {
    #[error("charset too small to form a gradient: {0} usable characters (need at least 2)")]
    CharsetTooSmall(usize),
    #[error("lookup table must have at least 2 levels, got {0}")]
    InvalidLevels(usize),
}

/// Order characters by measured density into a brightness ramp.
///
/// The sort is stable over the density map's code-point iteration order, so
/// characters with equal density keep ascending code-point order and the
/// ramp is reproducible across runs on identical input.
///
/// # Errors
/// Rejects density maps with fewer than two characters.
pub fn build_ramp(metrics: &GlyphDensityMap, invert: bool) -> Result<Vec<char>, RampError> {
    if metrics.len() < 2 {
        return Err(RampError::CharsetTooSmall(metrics.len()));
    }

    let mut entries: Vec<(char, f64)> = metrics.iter().map(|(&ch, &d)| (ch, d)).collect();

    // Stable sort; a reversed comparator (rather than sort-then-reverse)
    // keeps tie order intact when inverting.
    if invert {
        entries.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    } else {
        entries.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal));
    }

    Ok(entries.into_iter().map(|(ch, _)| ch).collect())
}

/// Resample a ramp into a fixed-size lookup table.
///
/// For each intensity `v` in `0..levels`, the entry is
/// `ramp[v * (ramp.len() - 1) / (levels - 1)]` — nearest-lower-neighbor
/// resampling. When `levels` exceeds the ramp length, adjacent intensities
/// alias to the same character; that is expected (ramps are typically far
/// shorter than 256 entries).
///
/// # Errors
/// Rejects ramps shorter than two characters and `levels < 2`.
pub fn quantize(ramp: &[char], levels: usize) -> Result<Vec<char>, RampError> {
    if ramp.len() < 2 {
        return Err(RampError::CharsetTooSmall(ramp.len()));
    }
    if levels < 2 {
        return Err(RampError::InvalidLevels(levels));
    }

    let n = ramp.len();
    Ok((0..levels).map(|v| ramp[v * (n - 1) / (levels - 1)]).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::glyph::GlyphDensityMap;

    fn density_map(pairs: &[(char, f64)]) -> GlyphDensityMap {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_ramp_sorts_ascending_by_density() {
        let metrics = density_map(&[('@', 0.8), ('.', 0.1), (':', 0.3)]);
        let ramp = build_ramp(&metrics, false).unwrap();
        assert_eq!(ramp, vec!['.', ':', '@']);
    }

    #[test]
    fn test_ramp_invert_reverses_order() {
        let metrics = density_map(&[('@', 0.8), ('.', 0.1), (':', 0.3)]);
        let ramp = build_ramp(&metrics, true).unwrap();
        assert_eq!(ramp, vec!['@', ':', '.']);
    }

    #[test]
    fn test_ramp_ties_keep_code_point_order() {
        // 'A' < 'B' < 'C'; all equal density.
        let metrics = density_map(&[('C', 0.5), ('A', 0.5), ('B', 0.5)]);
        assert_eq!(build_ramp(&metrics, false).unwrap(), vec!['A', 'B', 'C']);
        // Inverting must not scramble ties either.
        assert_eq!(build_ramp(&metrics, true).unwrap(), vec!['A', 'B', 'C']);
    }

    #[test]
    fn test_ramp_rejects_degenerate_charsets() {
        assert!(matches!(
            build_ramp(&GlyphDensityMap::new(), false),
            Err(RampError::CharsetTooSmall(0))
        ));
        let one = density_map(&[('x', 0.5)]);
        assert!(matches!(
            build_ramp(&one, false),
            Err(RampError::CharsetTooSmall(1))
        ));
    }

    #[test]
    fn test_quantize_endpoints_hit_ramp_extremes() {
        let ramp = vec!['.', ':', '+', '@'];
        let lut = quantize(&ramp, LUT_LEVELS).unwrap();
        assert_eq!(lut.len(), LUT_LEVELS);
        assert_eq!(lut[0], '.');
        assert_eq!(lut[LUT_LEVELS - 1], '@');
    }

    #[test]
    fn test_quantize_is_monotonic_in_ramp_index() {
        let ramp = vec!['a', 'b', 'c', 'd', 'e'];
        let lut = quantize(&ramp, LUT_LEVELS).unwrap();
        let index_of = |ch: char| ramp.iter().position(|&r| r == ch).unwrap();
        for pair in lut.windows(2) {
            assert!(index_of(pair[0]) <= index_of(pair[1]));
        }
    }

    #[test]
    fn test_quantize_exact_resample_when_levels_match() {
        let ramp = vec!['x', 'y'];
        assert_eq!(quantize(&ramp, 2).unwrap(), vec!['x', 'y']);
    }

    #[test]
    fn test_quantize_rejects_bad_configuration() {
        assert!(matches!(
            quantize(&['x'], LUT_LEVELS),
            Err(RampError::CharsetTooSmall(1))
        ));
        assert!(matches!(
            quantize(&['x', 'y'], 1),
            Err(RampError::InvalidLevels(1))
        ));
    }
}
