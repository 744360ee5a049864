//! Capture device probing.
//!
//! A device index is only trusted after it produces real frames: the probe
//! opens each candidate backend, reads a handful of frames with short
//! inter-read delays, and accepts the backend if the mean luminance clears
//! a minimum threshold. This rejects "black" devices — virtual cameras and
//! disconnected capture nodes that open fine but never deliver a picture.

use nokhwa::pixel_format::RgbFormat;
use nokhwa::utils::{ApiBackend, CameraIndex, RequestedFormat, RequestedFormatType};
use nokhwa::Camera;
use std::thread;
use std::time::Duration;

use super::frame::convert_to_rgb;
use super::types::DeviceDescriptor;
use crate::transcode::mean_luminance;

/// Tunables for a probe pass.
#[derive(Debug, Clone, Copy)]
pub struct ProbeSettings {
    /// Frame reads attempted per backend
    pub frames: u32,
    /// Delay between reads
    pub read_delay: Duration,
    /// Minimum mean luminance (0-255) for a backend to be accepted
    pub min_mean_luma: f64,
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self {
            frames: 10,
            read_delay: Duration::from_millis(50),
            min_mean_luma: 10.0,
        }
    }
}

/// Backend candidates for the current platform, in priority order.
///
/// The native backend is tried first; `Auto` is the fallback everywhere.
pub fn backend_candidates() -> Vec<ApiBackend> {
    if cfg!(target_os = "macos") {
        vec![ApiBackend::AVFoundation, ApiBackend::Auto]
    } else if cfg!(target_os = "windows") {
        vec![ApiBackend::MediaFoundation, ApiBackend::Auto]
    } else if cfg!(target_os = "linux") {
        vec![ApiBackend::Video4Linux, ApiBackend::Auto]
    } else {
        vec![ApiBackend::Auto]
    }
}

/// Short stable name for a backend, for logs and error messages.
pub fn backend_name(backend: ApiBackend) -> &'static str {
    match backend {
        ApiBackend::AVFoundation => "avfoundation",
        ApiBackend::MediaFoundation => "msmf",
        ApiBackend::Video4Linux => "v4l2",
        ApiBackend::Auto => "auto",
        _ => "other",
    }
}

/// Probe one device index across the candidate backends.
///
/// Returns a descriptor for the first backend whose sampled frames clear
/// the luminance threshold, or `None` if no candidate produces usable
/// frames at this index. Individual read failures are tolerated; a backend
/// is only skipped once its whole sample comes back empty or too dark.
pub fn probe_device(
    index: u32,
    backends: &[ApiBackend],
    settings: &ProbeSettings,
) -> Option<DeviceDescriptor> {
    select_backend(backends, settings.min_mean_luma, |backend| {
        sample_backend(index, backend, settings)
    })
    .map(|(backend, score)| DeviceDescriptor {
        index,
        backend,
        score,
    })
}

/// First-match policy over backends: accept the first one whose mean
/// sampled luminance clears `min_mean_luma`.
///
/// Factored out of [`probe_device`] so the acceptance logic is testable
/// without camera hardware.
fn select_backend<F>(
    backends: &[ApiBackend],
    min_mean_luma: f64,
    mut sample: F,
) -> Option<(ApiBackend, f64)>
where
    F: FnMut(ApiBackend) -> Vec<f64>,
{
    for &backend in backends {
        let lumas = sample(backend);
        if lumas.is_empty() {
            continue;
        }

        let mean = lumas.iter().sum::<f64>() / lumas.len() as f64;
        if mean < min_mean_luma {
            log::debug!(
                "backend {} rejected: mean luminance {:.2} below {:.2}",
                backend_name(backend),
                mean,
                min_mean_luma
            );
            continue;
        }

        return Some((backend, mean));
    }
    None
}

/// Open `index` on `backend` and collect per-frame mean luminances.
///
/// Failed reads are skipped after the inter-read delay; an unopenable
/// device yields an empty sample.
fn sample_backend(index: u32, backend: ApiBackend, settings: &ProbeSettings) -> Vec<f64> {
    let requested =
        RequestedFormat::new::<RgbFormat>(RequestedFormatType::AbsoluteHighestResolution);

    let mut camera = match Camera::with_backend(CameraIndex::Index(index), requested, backend) {
        Ok(camera) => camera,
        Err(e) => {
            log::debug!(
                "probe open failed index={} backend={}: {}",
                index,
                backend_name(backend),
                e
            );
            return Vec::new();
        }
    };

    if let Err(e) = camera.open_stream() {
        log::debug!(
            "probe stream failed index={} backend={}: {}",
            index,
            backend_name(backend),
            e
        );
        return Vec::new();
    }

    let mut lumas = Vec::with_capacity(settings.frames as usize);
    for _ in 0..settings.frames {
        if let Ok(buffer) = camera.frame() {
            if let Some(frame) = convert_to_rgb(&buffer) {
                lumas.push(mean_luminance(&frame));
            }
        }
        thread::sleep(settings.read_delay);
    }

    let _ = camera.stop_stream();
    lumas
}

/// Scan device indices `0..max_devices` and return the first accepting
/// descriptor.
///
/// First-match policy: scanning stops at the first index that yields any
/// usable backend, it does not rank devices against each other.
pub fn scan(max_devices: u32, settings: &ProbeSettings) -> Option<DeviceDescriptor> {
    let backends = backend_candidates();
    for index in 0..max_devices {
        if let Some(descriptor) = probe_device(index, &backends, settings) {
            log::info!("probe accepted {}", descriptor);
            return Some(descriptor);
        }
    }
    None
}
