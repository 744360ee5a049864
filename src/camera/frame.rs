//! Frame conversion and transformation utilities.

use nokhwa::pixel_format::RgbFormat;

use super::types::{Frame, BYTES_PER_PIXEL};

/// Convert a nokhwa buffer to an RGB [`Frame`].
///
/// Handles various camera formats (MJPEG, YUYV, NV12, etc.) by using
/// nokhwa's built-in decode_image which automatically converts from
/// the camera's native format to RGB.
///
/// Returns `None` if the conversion fails (unsupported format or corrupt
/// data); callers treat that as a transient failure and read again.
pub fn convert_to_rgb(buffer: &nokhwa::Buffer) -> Option<Frame> {
    let decoded = buffer.decode_image::<RgbFormat>().ok()?;
    let resolution = buffer.resolution();

    Some(Frame {
        data: decoded.into_raw(),
        width: resolution.width(),
        height: resolution.height(),
    })
}

/// Mirror a frame horizontally (flip left-right) for selfie mode.
pub fn mirror_horizontal(frame: &mut Frame) {
    let width = frame.width as usize;
    let height = frame.height as usize;

    for y in 0..height {
        let row_start = y * width * BYTES_PER_PIXEL;
        let row = &mut frame.data[row_start..row_start + width * BYTES_PER_PIXEL];

        // Swap pixels from left and right
        for x in 0..width / 2 {
            let left = x * BYTES_PER_PIXEL;
            let right = (width - 1 - x) * BYTES_PER_PIXEL;
            for i in 0..BYTES_PER_PIXEL {
                row.swap(left + i, right + i);
            }
        }
    }
}
