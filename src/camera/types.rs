//! Camera types and data structures.

use nokhwa::utils::ApiBackend;
use std::fmt;
use thiserror::Error;

/// Bytes per pixel for the RGB24 frames this crate works with.
pub const BYTES_PER_PIXEL: usize = 3;

/// A usable capture device found by probing: which index it sits at, which
/// backend accepted it, and the mean luminance observed during the probe.
#[derive(Debug, Clone, Copy)]
pub struct DeviceDescriptor {
    /// Device index for selection
    pub index: u32,
    /// Backend that produced usable frames at this index
    pub backend: ApiBackend,
    /// Mean probe luminance (0-255 scale)
    pub score: f64,
}

impl fmt::Display for DeviceDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} (score {:.2})",
            self.index,
            crate::camera::probe::backend_name(self.backend),
            self.score
        )
    }
}

/// Camera resolution settings.
#[derive(Debug, Clone, Copy)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    /// Low resolution (320x240) - fast, for narrow output grids
    pub const LOW: Resolution = Resolution {
        width: 320,
        height: 240,
    };

    /// Medium resolution (640x480) - balanced, recommended
    pub const MEDIUM: Resolution = Resolution {
        width: 640,
        height: 480,
    };

    /// High resolution (1280x720) - for wide output grids
    pub const HIGH: Resolution = Resolution {
        width: 1280,
        height: 720,
    };
}

impl Default for Resolution {
    fn default() -> Self {
        Self::MEDIUM
    }
}

/// A captured RGB frame.
///
/// `data` is tightly packed RGB24, row-major, so
/// `data.len() == width * height * 3`.
#[derive(Debug, Clone)]
pub struct Frame {
    /// Raw pixel data in RGB format
    pub data: Vec<u8>,
    /// Frame width in pixels
    pub width: u32,
    /// Frame height in pixels
    pub height: u32,
}

impl Frame {
    /// Number of pixels in the frame.
    pub fn pixel_count(&self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    /// Expected byte length of `data` for the frame dimensions.
    pub fn expected_len(&self) -> usize {
        self.pixel_count() * BYTES_PER_PIXEL
    }
}

/// Settings for opening a capture session.
#[derive(Debug, Clone, Copy)]
pub struct CameraSettings {
    /// Requested capture resolution (actual may vary)
    pub resolution: Resolution,
    /// Target FPS (actual may vary)
    pub fps: u32,
    /// Mirror frames horizontally (selfie mode)
    pub mirror: bool,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            resolution: Resolution::default(),
            fps: 30,
            mirror: false,
        }
    }
}

/// Errors that can occur during camera operations.
#[derive(Debug, Error)]
pub enum CameraError {
    /// Probing every index/backend combination produced no usable frames.
    #[error(
        "no usable camera found: probed device indices 0..{max_devices} \
         with backends {backends:?}"
    )]
    NoUsableDevice {
        max_devices: u32,
        backends: Vec<&'static str>,
    },
    /// The probed device could not be reopened for the session.
    #[error("failed to open camera index={index} backend={backend}: {message}")]
    OpenFailed {
        index: u32,
        backend: &'static str,
        message: String,
    },
    /// The camera opened but its stream would not start.
    #[error("failed to start camera stream: {0}")]
    StreamFailed(String),
    /// The first frame never arrived within the warm-up budget.
    #[error("camera produced no frames during warm-up ({attempts} reads)")]
    WarmupTimeout { attempts: u32 },
    /// Reads kept failing past the session's retry budget.
    #[error("camera stalled: {attempts} consecutive frame reads failed")]
    Stalled { attempts: u32 },
}
