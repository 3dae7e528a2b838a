use image::RgbaImage;
use std::fmt;

use super::brightness::is_content;
use super::error::{StageOutput, Warning};

/// A rectangle within an image.  `right` and `bottom` are exclusive, so the
/// box spans `right - left` columns and `bottom - top` rows.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct BoundingBox {
    /// First column inside the box.
    pub left: u32,
    /// First row inside the box.
    pub top: u32,
    /// One past the last column inside the box.
    pub right: u32,
    /// One past the last row inside the box.
    pub bottom: u32,
}

impl BoundingBox {
    /// Creates a box from its four edges.
    pub fn new(left: u32, top: u32, right: u32, bottom: u32) -> BoundingBox {
        BoundingBox { left, top, right, bottom }
    }

    /// Returns the box inset by `margin` on every side of a
    /// `width`x`height` canvas, or the whole canvas if the margin leaves
    /// nothing.
    pub fn inset(width: u32, height: u32, margin: u32) -> BoundingBox {
        if width <= 2 * margin || height <= 2 * margin {
            BoundingBox::new(0, 0, width, height)
        } else {
            BoundingBox::new(margin, margin, width - margin, height - margin)
        }
    }

    /// Number of columns in the box.
    pub fn width(&self) -> u32 {
        self.right.saturating_sub(self.left)
    }

    /// Number of rows in the box.
    pub fn height(&self) -> u32 {
        self.bottom.saturating_sub(self.top)
    }

    /// True if the box encloses no pixels.
    pub fn is_degenerate(&self) -> bool {
        self.left >= self.right || self.top >= self.bottom
    }

    /// True if the box lies within a `width`x`height` image.
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        self.right <= width && self.bottom <= height
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, out: &mut fmt::Formatter) -> fmt::Result {
        write!(
            out,
            "(left={}, top={}, right={}, bottom={})",
            self.left, self.top, self.right, self.bottom
        )
    }
}

/// Finds the smallest box enclosing every content pixel of `image`.
///
/// A pixel is content when its brightness exceeds `threshold` and its alpha
/// is non-zero.  If nothing qualifies, the box inset by `fallback_margin` is
/// returned together with a [`Warning::NoContentDetected`].
pub fn detect_content_bounds(
    image: &RgbaImage,
    threshold: u8,
    fallback_margin: u32,
) -> StageOutput<BoundingBox> {
    let (width, height) = image.dimensions();
    let mut found: Option<BoundingBox> = None;
    for (x, y, pixel) in image.enumerate_pixels() {
        if !is_content(pixel, threshold) {
            continue;
        }
        let bounds = found.get_or_insert(BoundingBox::new(x, y, x + 1, y + 1));
        bounds.left = bounds.left.min(x);
        bounds.right = bounds.right.max(x + 1);
        // Rows are visited in order, so `top` is already minimal.
        bounds.bottom = y + 1;
    }

    match found {
        Some(bounds) if !bounds.is_degenerate() => {
            log::debug!("Detected graphic bounds: {}", bounds);
            StageOutput::clean(bounds)
        }
        _ => {
            let fallback = BoundingBox::inset(width, height, fallback_margin);
            StageOutput::with_warnings(
                fallback,
                vec![Warning::NoContentDetected { fallback }],
            )
        }
    }
}
