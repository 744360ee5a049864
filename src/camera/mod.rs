//! Camera capture: device probing, session management, frame conversion.
//!
//! - Backend probing and first-match device scanning via [`probe`]
//! - Blocking per-frame capture via [`CaptureSession`]
//! - Frame types and conversion helpers in [`types`] and [`frame`]

pub mod frame;
pub mod probe;
mod session;
mod types;

pub use frame::{convert_to_rgb, mirror_horizontal};
pub use probe::{backend_candidates, probe_device, scan, ProbeSettings};
pub use session::CaptureSession;
pub use types::{CameraError, CameraSettings, DeviceDescriptor, Frame, Resolution};
