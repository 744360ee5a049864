//! Live rendering loop.
//!
//! A blocking single-threaded loop: read a frame, transcode it, write it,
//! sleep to pace to the target frame rate, repeat. Cancellation is
//! cooperative — a Ctrl-C flag is checked between frames, never
//! mid-transcode. The [`crate::terminal::ScreenGuard`] restores cursor
//! visibility on every way out of the loop.

use crate::camera::{CameraError, CaptureSession};
use crate::terminal::{write_frame, ScreenGuard};
use crate::transcode::{transcode, RenderOptions, TranscodeError};
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Reads attempted before giving up on the first frame.
const WARMUP_READS: u32 = 30;

/// Delay between warm-up reads and after a failed read.
const READ_RETRY_DELAY: Duration = Duration::from_millis(100);

/// Consecutive failed reads tolerated before the session is declared dead.
const MAX_CONSECUTIVE_FAILURES: u32 = 30;

/// Settings for a live render session.
#[derive(Debug, Clone, Copy)]
pub struct LiveOptions {
    /// Target frames per second
    pub fps: f32,
    /// Per-frame render configuration
    pub render: RenderOptions,
}

impl Default for LiveOptions {
    fn default() -> Self {
        Self {
            fps: 5.0,
            render: RenderOptions::default(),
        }
    }
}

/// Errors that end a live session.
#[derive(Debug, Error)]
pub enum LiveError {
    #[error(transparent)]
    Camera(#[from] CameraError),
    #[error(transparent)]
    Transcode(#[from] TranscodeError),
    #[error("terminal write failed: {0}")]
    Io(#[from] io::Error),
}

/// Install a Ctrl-C handler and return the stop flag it sets.
pub fn install_stop_handler() -> Arc<AtomicBool> {
    let stop = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&stop);
    if let Err(e) = ctrlc::set_handler(move || flag.store(true, Ordering::SeqCst)) {
        log::warn!("could not install Ctrl-C handler: {}", e);
    }
    stop
}

/// Run the live loop until `stop` is set or the session fails.
///
/// Transient read failures are retried with a short backoff; only
/// [`MAX_CONSECUTIVE_FAILURES`] failures in a row end the session. Frame
/// pacing subtracts the work time from the frame interval, so transcoding
/// cost does not accumulate into drift.
pub fn run(
    session: &mut CaptureSession,
    lut: &[char],
    options: &LiveOptions,
    stop: &AtomicBool,
) -> Result<(), LiveError> {
    let first = session.warm_up(WARMUP_READS, READ_RETRY_DELAY)?;
    log::info!(
        "live session started: {}x{} source, {} cols, {:.1} fps target",
        first.width,
        first.height,
        options.render.cols,
        options.fps
    );

    let frame_interval = Duration::from_secs_f32(1.0 / options.fps.max(0.1));
    let guard = ScreenGuard::enter()?;
    let mut stdout = io::stdout();

    // The warm-up frame is frame zero.
    let grid = transcode(&first, lut, &options.render)?;
    write_frame(&mut stdout, &grid)?;

    let mut consecutive_failures = 0u32;

    while !stop.load(Ordering::SeqCst) {
        let started = Instant::now();

        match session.read_frame() {
            Some(frame) => {
                consecutive_failures = 0;
                let grid = transcode(&frame, lut, &options.render)?;
                write_frame(&mut stdout, &grid)?;
            }
            None => {
                consecutive_failures += 1;
                log::warn!(
                    "frame read failed ({}/{})",
                    consecutive_failures,
                    MAX_CONSECUTIVE_FAILURES
                );
                if consecutive_failures >= MAX_CONSECUTIVE_FAILURES {
                    return Err(CameraError::Stalled {
                        attempts: consecutive_failures,
                    }
                    .into());
                }
                thread::sleep(READ_RETRY_DELAY);
                continue;
            }
        }

        let elapsed = started.elapsed();
        if elapsed < frame_interval {
            thread::sleep(frame_interval - elapsed);
        }
    }

    log::info!("live session stopped");
    drop(guard);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_live_options_defaults() {
        let options = LiveOptions::default();
        assert_eq!(options.fps, 5.0);
        assert_eq!(options.render.cols, 80);
        assert!(!options.render.colorize);
    }
}
