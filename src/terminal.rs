//! Terminal frame emission and cursor state management.
//!
//! Frames are assembled into one string and written with a single call to
//! keep flicker down. Colored output uses 24-bit ANSI foreground sequences
//! with a reset at each line end.

use crate::transcode::GlyphGrid;
use std::io::{self, Write};

/// Minimum auto-detected column count.
const MIN_AUTO_COLUMNS: u16 = 20;

/// Guard that hides the cursor and clears the screen for the duration of a
/// render session, restoring cursor visibility on drop. Dropping on every
/// exit path — normal exit, Ctrl-C unwinding, or an error — is what keeps
/// the terminal usable afterwards.
pub struct ScreenGuard;

impl ScreenGuard {
    /// Clear the screen and hide the cursor.
    pub fn enter() -> io::Result<Self> {
        let mut stdout = io::stdout();
        stdout.write_all(b"\x1b[2J\x1b[?25l")?;
        stdout.flush()?;
        Ok(Self)
    }
}

impl Drop for ScreenGuard {
    fn drop(&mut self) {
        // Best-effort cleanup - ignore errors during drop
        let mut stdout = io::stdout();
        let _ = stdout.write_all(b"\x1b[?25h");
        let _ = stdout.flush();
    }
}

/// Write one transcoded frame, preceded by cursor-home and screen-clear.
///
/// Plain grids emit the glyph rows verbatim. Colorized grids wrap each
/// glyph in a true-color foreground sequence (`ESC[38;2;R;G;Bm`) and reset
/// attributes at the end of every line.
pub fn write_frame(out: &mut impl Write, grid: &GlyphGrid) -> io::Result<()> {
    let mut output = String::new();
    output.push_str("\x1b[H\x1b[2J");

    match &grid.colors {
        Some(colors) => {
            for (y, line) in grid.lines.iter().enumerate() {
                let row_start = y * grid.cols as usize;
                for (x, ch) in line.chars().enumerate() {
                    let color = &colors[row_start + x];
                    output.push_str(&format!(
                        "\x1b[38;2;{};{};{}m{}",
                        color.r, color.g, color.b, ch
                    ));
                }
                output.push_str("\x1b[0m\n");
            }
        }
        None => {
            for line in &grid.lines {
                output.push_str(line);
                output.push('\n');
            }
        }
    }

    out.write_all(output.as_bytes())?;
    out.flush()
}

/// Column count derived from the terminal width, leaving a small margin.
///
/// Falls back to 80 columns when the terminal size is unavailable (e.g.
/// output is piped).
pub fn auto_columns() -> u16 {
    let cols = crossterm::terminal::size().map(|(cols, _)| cols).unwrap_or(80);
    cols.saturating_sub(2).max(MIN_AUTO_COLUMNS)
}
