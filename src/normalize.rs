use image::{Rgba, RgbaImage};

const OPAQUE_BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Returns a copy of `image` whose outer `border` rows and columns are
/// painted opaque black, wiping out noise and light corners left at the
/// edges of generated artwork.
///
/// The top and bottom strips span the full width; the left and right strips
/// cover only the rows between them.  A border of at least half the image
/// paints everything.
pub fn normalize_background(image: &RgbaImage, border: u32) -> RgbaImage {
    let mut output = image.clone();
    let (width, height) = output.dimensions();
    let top = border.min(height);
    let bottom = height.saturating_sub(border).max(top);
    let side = border.min(width);

    paint(&mut output, 0, 0, width, top);
    paint(&mut output, 0, bottom, width, height);
    paint(&mut output, 0, top, side, bottom);
    paint(&mut output, width.saturating_sub(side), top, width, bottom);
    output
}

fn paint(image: &mut RgbaImage, left: u32, top: u32, right: u32, bottom: u32) {
    for y in top..bottom {
        for x in left..right {
            image.put_pixel(x, y, OPAQUE_BLACK);
        }
    }
}
