//! Superellipse ("squircle") alpha masks.
//!
//! The boundary `|x/rx|^(2/n) + |y/ry|^(2/n) = 1` is sampled at evenly
//! spaced angles and the resulting polygon is scan-filled, sampling each
//! pixel at its center.

use std::f64::consts::PI;

use super::mask::AlphaMask;

/// Shape parameters for [`squircle_mask`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SquircleShape {
    /// Distance from each canvas edge to the curve.
    pub padding: u32,
    /// Curvature exponent `n`; larger values give squarer corners.
    pub exponent: f64,
    /// Number of boundary samples over a full turn.
    pub steps: u32,
}

/// Builds a `size`x`size` mask that is opaque inside a squircle centered on
/// the canvas with semi-axes `size / 2 - padding`.  A padding of at least
/// half the size yields an empty mask.
pub fn squircle_mask(size: u32, shape: &SquircleShape) -> AlphaMask {
    let mut mask = AlphaMask::new(size, size);
    let half = size / 2;
    if shape.padding >= half || shape.steps < 3 {
        return mask;
    }
    let points = boundary_points(size, shape);
    fill_polygon(&mut mask, &points, u8::MAX);
    mask
}

/// Samples the squircle boundary, starting at angle zero and going
/// counter-clockwise in image coordinates.
fn boundary_points(size: u32, shape: &SquircleShape) -> Vec<(f64, f64)> {
    let half = size / 2;
    let center = half as f64;
    let radius = (half - shape.padding) as f64;
    let power = 2.0 / shape.exponent;
    (0..shape.steps)
        .map(|step| {
            let angle = 2.0 * PI * (step as f64) / (shape.steps as f64);
            let (sin, cos) = angle.sin_cos();
            let x = center + signed_power(cos, power) * radius;
            let y = center + signed_power(sin, power) * radius;
            (x, y)
        })
        .collect()
}

/// `|value|^power`, carrying the sign of `value` (zero counts as positive).
#[inline]
fn signed_power(value: f64, power: f64) -> f64 {
    let magnitude = value.abs().powf(power);
    if value >= 0.0 {
        magnitude
    } else {
        -magnitude
    }
}

/// Fills the interior of a closed polygon with `value` (even-odd rule).
fn fill_polygon(mask: &mut AlphaMask, points: &[(f64, f64)], value: u8) {
    let width = mask.width();
    let mut crossings: Vec<f64> = Vec::new();
    for row in 0..mask.height() {
        let scan_y = row as f64 + 0.5;
        crossings.clear();
        for (index, &(x0, y0)) in points.iter().enumerate() {
            let (x1, y1) = points[(index + 1) % points.len()];
            // Half-open test so a vertex on the scanline is counted once.
            if (y0 <= scan_y && scan_y < y1) || (y1 <= scan_y && scan_y < y0) {
                crossings.push(x0 + (scan_y - y0) * (x1 - x0) / (y1 - y0));
            }
        }
        crossings.sort_by(f64::total_cmp);
        for span in crossings.chunks_exact(2) {
            let start = pixel_index(span[0], width);
            let end = pixel_index(span[1], width);
            if end > start {
                mask.fill_span(row, start, end - start, value);
            }
        }
    }
}

/// First pixel whose center lies at or right of `x`, clamped to
/// `0..=width`.
#[inline]
fn pixel_index(x: f64, width: u32) -> u32 {
    (x - 0.5).ceil().clamp(0.0, width as f64) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn shape(padding: u32) -> SquircleShape {
        SquircleShape { padding, exponent: 5.0, steps: 2000 }
    }

    #[test]
    fn center_opaque_corners_clear() {
        let mask = squircle_mask(1024, &shape(90));
        assert_eq!(mask.width(), 1024);
        assert_eq!(mask.height(), 1024);
        assert_eq!(mask.get(512, 512), 255);
        assert_eq!(mask.get(0, 0), 0);
        assert_eq!(mask.get(1023, 1023), 0);
        assert_eq!(mask.get(100, 100), 0);
        // Inside the padding on the axes.
        assert_eq!(mask.get(512, 80), 0);
        assert_eq!(mask.get(80, 512), 0);
        assert_eq!(mask.get(512, 100), 255);
        assert_eq!(mask.get(100, 512), 255);
    }

    #[test]
    fn mask_is_binary() {
        let mask = squircle_mask(128, &shape(10));
        assert!(mask.data().iter().all(|&value| value == 0 || value == 255));
    }

    #[test]
    fn mask_is_symmetric() {
        let mask = squircle_mask(256, &shape(20));
        for y in 0..256 {
            for x in 0..256 {
                assert_eq!(mask.get(x, y), mask.get(255 - x, y), "({}, {})", x, y);
                assert_eq!(mask.get(x, y), mask.get(x, 255 - y), "({}, {})", x, y);
            }
        }
    }

    #[test]
    fn squircle_is_between_circle_and_square() {
        let mask = squircle_mask(1024, &shape(90));
        let side = 1024.0 - 180.0;
        let count = mask.opaque_count() as f64;
        let circle = PI * (side / 2.0) * (side / 2.0);
        assert!(count < side * side);
        assert!(count > circle);
    }

    #[test]
    fn oversized_padding_is_empty() {
        assert_eq!(squircle_mask(1024, &shape(512)).opaque_count(), 0);
        assert_eq!(squircle_mask(1024, &shape(4000)).opaque_count(), 0);
    }

    #[test]
    fn zero_padding_touches_edges() {
        let mask = squircle_mask(64, &shape(0));
        assert_eq!(mask.get(32, 0), 255);
        assert_eq!(mask.get(0, 32), 255);
        assert_eq!(mask.get(0, 0), 0);
    }

    proptest! {
        #[test]
        fn more_padding_never_grows_the_mask(
            size in 16u32..160,
            first in 0u32..80,
            second in 0u32..80,
        ) {
            let (small, large) = if first <= second { (first, second) } else { (second, first) };
            let loose = squircle_mask(size, &SquircleShape { padding: small, exponent: 5.0, steps: 400 });
            let tight = squircle_mask(size, &SquircleShape { padding: large, exponent: 5.0, steps: 400 });
            prop_assert!(loose.opaque_count() >= tight.opaque_count());
        }
    }
}
