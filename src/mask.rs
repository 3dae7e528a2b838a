use image::RgbaImage;

use super::error::IconError;

/// A single-channel opacity buffer, 0 (transparent) to 255 (opaque).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AlphaMask {
    width: u32,
    height: u32,
    data: Box<[u8]>,
}

impl AlphaMask {
    /// Creates a fully transparent mask.
    pub fn new(width: u32, height: u32) -> AlphaMask {
        AlphaMask {
            width,
            height,
            data: vec![0u8; (width as usize) * (height as usize)]
                .into_boxed_slice(),
        }
    }

    /// Returns the width of the mask, in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the height of the mask, in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns the mask values in row-major order.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Returns a mutable reference to the mask values.
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Returns the opacity at `(x, y)`.  Panics if out of bounds.
    pub fn get(&self, x: u32, y: u32) -> u8 {
        assert!(x < self.width && y < self.height);
        self.data[(y as usize) * (self.width as usize) + (x as usize)]
    }

    /// Sets `count` values of row `y` starting at column `x` to `value`,
    /// clipped to the mask width.
    pub fn fill_span(&mut self, y: u32, x: u32, count: u32, value: u8) {
        if y >= self.height || x >= self.width {
            return;
        }
        let end = x.saturating_add(count).min(self.width);
        let row = (y as usize) * (self.width as usize);
        self.data[row + x as usize..row + end as usize].fill(value);
    }

    /// Number of fully opaque pixels.
    pub fn opaque_count(&self) -> usize {
        self.data.iter().filter(|&&value| value == u8::MAX).count()
    }

    /// Multiplies the alpha channel of `image` by this mask and returns the
    /// result.  Fails if the dimensions differ.
    pub fn apply(&self, image: &RgbaImage) -> Result<RgbaImage, IconError> {
        if (self.width, self.height) != image.dimensions() {
            return Err(IconError::MaskSize {
                mask: (self.width, self.height),
                image: image.dimensions(),
            });
        }
        let mut output = image.clone();
        for (pixel, &opacity) in output.pixels_mut().zip(self.data.iter()) {
            pixel[3] = scale_alpha(pixel[3], opacity);
        }
        Ok(output)
    }
}

/// `alpha * opacity / 255`, rounded to nearest.
#[inline]
fn scale_alpha(alpha: u8, opacity: u8) -> u8 {
    ((u32::from(alpha) * u32::from(opacity) + 127) / 255) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn new_mask_is_transparent() {
        let mask = AlphaMask::new(4, 3);
        assert_eq!(mask.data().len(), 12);
        assert_eq!(mask.opaque_count(), 0);
    }

    #[test]
    fn fill_span_clips_to_width() {
        let mut mask = AlphaMask::new(4, 2);
        mask.fill_span(1, 2, 10, 255);
        mask.fill_span(5, 0, 4, 255);
        assert_eq!(mask.data(), &[0, 0, 0, 0, 0, 0, 255, 255]);
        assert_eq!(mask.get(3, 1), 255);
    }

    #[test]
    fn apply_multiplies_alpha() {
        let mut mask = AlphaMask::new(3, 1);
        mask.data_mut().copy_from_slice(&[0, 255, 128]);
        let image = RgbaImage::from_pixel(3, 1, Rgba([10, 20, 30, 200]));
        let masked = mask.apply(&image).unwrap();
        assert_eq!(masked.get_pixel(0, 0), &Rgba([10, 20, 30, 0]));
        assert_eq!(masked.get_pixel(1, 0), &Rgba([10, 20, 30, 200]));
        assert_eq!(masked.get_pixel(2, 0), &Rgba([10, 20, 30, 100]));
    }

    #[test]
    fn apply_rejects_mismatched_image() {
        let mask = AlphaMask::new(4, 4);
        let image = RgbaImage::new(4, 3);
        match mask.apply(&image) {
            Err(IconError::MaskSize { mask, image }) => {
                assert_eq!(mask, (4, 4));
                assert_eq!(image, (4, 3));
            }
            other => panic!("unexpected result: {:?}", other.map(|_| ())),
        }
    }
}
