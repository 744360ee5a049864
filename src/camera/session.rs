//! Blocking capture session over a probed device.
//!
//! The session owns the camera handle for the whole render session: opened
//! once from a [`DeviceDescriptor`], read one frame at a time by the render
//! loop, and the stream is released on drop — on every exit path, normal or
//! not.

use nokhwa::pixel_format::RgbFormat;
use nokhwa::utils::{
    CameraFormat, CameraIndex, FrameFormat as NokhwaFrameFormat, RequestedFormat,
    RequestedFormatType,
};
use nokhwa::Camera;
use std::thread;
use std::time::Duration;

use super::frame::{convert_to_rgb, mirror_horizontal};
use super::probe::backend_name;
use super::types::{CameraError, CameraSettings, DeviceDescriptor, Frame, Resolution};

/// A camera opened for per-frame reading.
pub struct CaptureSession {
    camera: Camera,
    descriptor: DeviceDescriptor,
    mirror: bool,
}

impl CaptureSession {
    /// Open the probed device and start its stream.
    ///
    /// Tries format strategies in order of preference — NV12 (native on
    /// macOS), then MJPEG (widely supported), then whatever the camera
    /// offers at its highest resolution.
    ///
    /// # Errors
    /// * [`CameraError::OpenFailed`] - no format strategy opened the device
    /// * [`CameraError::StreamFailed`] - the device opened but streaming failed
    pub fn open(
        descriptor: DeviceDescriptor,
        settings: &CameraSettings,
    ) -> Result<Self, CameraError> {
        let index = CameraIndex::Index(descriptor.index);
        let resolution = nokhwa::utils::Resolution::new(
            settings.resolution.width,
            settings.resolution.height,
        );

        let format_attempts: Vec<RequestedFormat> = vec![
            RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(CameraFormat::new(
                resolution,
                NokhwaFrameFormat::NV12,
                settings.fps,
            ))),
            RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(CameraFormat::new(
                resolution,
                NokhwaFrameFormat::MJPEG,
                settings.fps,
            ))),
            RequestedFormat::new::<RgbFormat>(RequestedFormatType::AbsoluteHighestResolution),
        ];

        let mut camera = None;
        let mut last_error = None;

        for requested in format_attempts {
            match Camera::with_backend(index.clone(), requested, descriptor.backend) {
                Ok(cam) => {
                    camera = Some(cam);
                    break;
                }
                Err(e) => {
                    last_error = Some(e);
                    continue;
                }
            }
        }

        let mut camera = camera.ok_or_else(|| CameraError::OpenFailed {
            index: descriptor.index,
            backend: backend_name(descriptor.backend),
            message: last_error
                .map(|e| e.to_string())
                .unwrap_or_else(|| "no format strategy accepted".to_string()),
        })?;

        camera
            .open_stream()
            .map_err(|e| CameraError::StreamFailed(e.to_string()))?;

        log::info!(
            "capture session open: index={} backend={} {}x{} @ {} fps",
            descriptor.index,
            backend_name(descriptor.backend),
            camera.resolution().width(),
            camera.resolution().height(),
            camera.frame_rate()
        );

        Ok(Self {
            camera,
            descriptor,
            mirror: settings.mirror,
        })
    }

    /// The descriptor this session was opened from.
    pub fn descriptor(&self) -> &DeviceDescriptor {
        &self.descriptor
    }

    /// The resolution the camera actually negotiated.
    pub fn resolution(&self) -> Resolution {
        let res = self.camera.resolution();
        Resolution {
            width: res.width(),
            height: res.height(),
        }
    }

    /// Attempt one frame read.
    ///
    /// Returns `None` on a transient failure (read error or undecodable
    /// buffer); the caller decides how many of those to tolerate.
    pub fn read_frame(&mut self) -> Option<Frame> {
        let buffer = self.camera.frame().ok()?;
        let mut frame = convert_to_rgb(&buffer)?;
        if self.mirror {
            mirror_horizontal(&mut frame);
        }
        Some(frame)
    }

    /// Wait for the camera to deliver its first frame.
    ///
    /// Cameras routinely need a moment after the stream opens before real
    /// frames arrive. Retries up to `max_reads` times with `delay` between
    /// attempts and returns the first frame, or fails the session if the
    /// budget is exhausted.
    pub fn warm_up(&mut self, max_reads: u32, delay: Duration) -> Result<Frame, CameraError> {
        retry_first_frame(max_reads, delay, || self.read_frame())
    }
}

/// Retry a read until it yields a frame or the budget runs out.
///
/// Factored out of [`CaptureSession::warm_up`] so the retry policy is
/// testable without camera hardware.
fn retry_first_frame<F>(max_reads: u32, delay: Duration, mut read: F) -> Result<Frame, CameraError>
where
    F: FnMut() -> Option<Frame>,
{
    for attempt in 0..max_reads {
        if let Some(frame) = read() {
            return Ok(frame);
        }
        if attempt + 1 < max_reads {
            thread::sleep(delay);
        }
    }
    Err(CameraError::WarmupTimeout {
        attempts: max_reads,
    })
}

impl Drop for CaptureSession {
    fn drop(&mut self) {
        let _ = self.camera.stop_stream();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny_frame() -> Frame {
        Frame {
            data: vec![0, 0, 0],
            width: 1,
            height: 1,
        }
    }

    #[test]
    fn test_retry_recovers_from_transient_failures() {
        // First two reads fail, third succeeds within the budget.
        let mut calls = 0;
        let result = retry_first_frame(5, Duration::ZERO, || {
            calls += 1;
            if calls < 3 {
                None
            } else {
                Some(tiny_frame())
            }
        });
        assert!(result.is_ok());
        assert_eq!(calls, 3);
    }

    #[test]
    fn test_retry_exhausted_budget_is_fatal() {
        let mut calls = 0;
        let result = retry_first_frame(4, Duration::ZERO, || {
            calls += 1;
            None
        });
        assert_eq!(calls, 4);
        assert!(matches!(
            result,
            Err(CameraError::WarmupTimeout { attempts: 4 })
        ));
    }
}
