//! Pixel brightness classification shared by bounds detection and edge
//! feathering.
//!
//! Brightness is the unweighted mean of the red, green and blue channels.
//! Comparisons are done on the channel sum against three times the
//! threshold, which is exact and avoids floating point.

use image::Rgba;

/// Returns the sum of the red, green and blue channels (three times the
/// brightness).
#[inline]
pub fn channel_sum(pixel: &Rgba<u8>) -> u32 {
    u32::from(pixel[0]) + u32::from(pixel[1]) + u32::from(pixel[2])
}

/// Returns true if the pixel counts as content: brightness strictly above
/// `threshold` and a non-zero alpha.
#[inline]
pub fn is_content(pixel: &Rgba<u8>, threshold: u8) -> bool {
    pixel[3] > 0 && channel_sum(pixel) > 3 * u32::from(threshold)
}

/// Feathered alpha for a pixel in solid-background mode.
///
/// Returns `Some(0)` below `low`, a linear ramp from 0 to 255 over
/// `[low, high)`, and `None` at or above `high` (the pixel keeps its alpha).
#[inline]
pub fn feather_alpha(pixel: &Rgba<u8>, low: u8, high: u8) -> Option<u8> {
    let sum = channel_sum(pixel);
    let low = 3 * u32::from(low);
    let high = 3 * u32::from(high);
    if sum < low {
        Some(0)
    } else if sum < high {
        Some(((sum - low) * 255 / (high - low)) as u8)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gray(value: u8, alpha: u8) -> Rgba<u8> {
        Rgba([value, value, value, alpha])
    }

    #[test]
    fn content_threshold_is_strict() {
        assert!(!is_content(&gray(30, 255), 30));
        assert!(is_content(&gray(31, 255), 30));
        assert!(is_content(&Rgba([91, 0, 0, 255]), 30));
        assert!(!is_content(&Rgba([90, 0, 0, 255]), 30));
    }

    #[test]
    fn transparent_pixels_are_never_content() {
        assert!(!is_content(&gray(255, 0), 30));
        assert!(is_content(&gray(255, 1), 30));
    }

    #[test]
    fn channel_sum_is_three_times_brightness() {
        assert_eq!(channel_sum(&Rgba([30, 60, 90, 0])), 180);
    }

    #[test]
    fn feather_ramp() {
        assert_eq!(feather_alpha(&gray(0, 255), 20, 60), Some(0));
        assert_eq!(feather_alpha(&gray(19, 255), 20, 60), Some(0));
        assert_eq!(feather_alpha(&gray(20, 255), 20, 60), Some(0));
        assert_eq!(feather_alpha(&gray(40, 255), 20, 60), Some(127));
        assert_eq!(feather_alpha(&gray(59, 255), 20, 60), Some(248));
        assert_eq!(feather_alpha(&gray(60, 255), 20, 60), None);
        assert_eq!(feather_alpha(&gray(200, 255), 20, 60), None);
    }
}
