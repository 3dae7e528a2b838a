use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};

use super::bounds::BoundingBox;
use super::brightness::feather_alpha;
use super::config::IconConfig;
use super::error::IconError;
use super::mask::AlphaMask;

const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);
const OPAQUE_BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Returns the size of a `width`x`height` logo scaled uniformly so that its
/// larger side equals `target`.  Neither side drops below one pixel.
pub fn fit_logo_size(width: u32, height: u32, target: u32) -> (u32, u32) {
    let longest = u64::from(width.max(height).max(1));
    let scale = |side: u32| {
        ((u64::from(side) * u64::from(target) / longest) as u32).max(1)
    };
    (scale(width), scale(height))
}

/// Makes the dark fringe of a logo fade into a solid backdrop.
///
/// Pixels darker than `low` become fully transparent; pixels in
/// `[low, high)` get an alpha that ramps linearly with their brightness.
/// Brighter pixels are left alone.
pub fn feather_edges(logo: &RgbaImage, low: u8, high: u8) -> RgbaImage {
    let mut output = logo.clone();
    for pixel in output.pixels_mut() {
        match feather_alpha(pixel, low, high) {
            Some(0) => *pixel = TRANSPARENT,
            Some(alpha) => pixel[3] = alpha,
            None => {}
        }
    }
    output
}

/// Crops `bounds` out of `source`, rescales it to the configured share of
/// the canvas, and centers it on a fresh `canvas_size` square.  When `mask`
/// is given, the canvas alpha is multiplied by it; a mask of any other size
/// than the canvas is an error.
///
/// In solid-background mode the canvas starts opaque black and the logo is
/// feathered before it is pasted.
pub fn composite(
    source: &RgbaImage,
    bounds: BoundingBox,
    config: &IconConfig,
    mask: Option<&AlphaMask>,
) -> Result<RgbaImage, IconError> {
    let canvas = place_logo(source, bounds, config);
    match mask {
        Some(mask) => mask.apply(&canvas),
        None => Ok(canvas),
    }
}

fn place_logo(
    source: &RgbaImage,
    bounds: BoundingBox,
    config: &IconConfig,
) -> RgbaImage {
    let size = config.canvas_size;
    let background = if config.solid_background {
        OPAQUE_BLACK
    } else {
        TRANSPARENT
    };
    let mut canvas = RgbaImage::from_pixel(size, size, background);

    let logo = imageops::crop_imm(
        source,
        bounds.left,
        bounds.top,
        bounds.width(),
        bounds.height(),
    )
    .to_image();
    let (width, height) = logo.dimensions();
    if width == 0 || height == 0 {
        log::warn!("Content bounds {} lie outside the source image", bounds);
        return canvas;
    }

    let (new_width, new_height) =
        fit_logo_size(width, height, config.target_logo_size());
    let logo = if (new_width, new_height) == (width, height) {
        logo
    } else {
        imageops::resize(&logo, new_width, new_height, FilterType::Lanczos3)
    };
    let logo = if config.solid_background {
        feather_edges(&logo, config.feather_low, config.feather_high)
    } else {
        logo
    };

    let offset_x = size.saturating_sub(new_width) / 2;
    let offset_y = size.saturating_sub(new_height) / 2;
    log::debug!(
        "Placing {}x{} logo at ({}, {}) on {}x{} canvas",
        new_width,
        new_height,
        offset_x,
        offset_y,
        size,
        size
    );
    imageops::overlay(&mut canvas, &logo, i64::from(offset_x), i64::from(offset_y));
    canvas
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::super::squircle::{squircle_mask, SquircleShape};
    use proptest::prelude::*;

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);

    fn solid_config() -> IconConfig {
        IconConfig { solid_background: true, ..IconConfig::default() }
    }

    #[test]
    fn fit_preserves_aspect_ratio() {
        assert_eq!(fit_logo_size(1024, 1024, 665), (665, 665));
        assert_eq!(fit_logo_size(200, 100, 665), (665, 332));
        assert_eq!(fit_logo_size(100, 400, 665), (166, 665));
        assert_eq!(fit_logo_size(1000, 1, 665), (665, 1));
    }

    #[test]
    fn full_red_source_is_centered() {
        let source = RgbaImage::from_pixel(1024, 1024, RED);
        let config = IconConfig::default();
        let canvas =
            composite(&source, BoundingBox::new(0, 0, 1024, 1024), &config, None).unwrap();
        assert_eq!(canvas.dimensions(), (1024, 1024));
        // 665 px logo at offset 179.
        assert_eq!(canvas.get_pixel(178, 512)[3], 0);
        assert_eq!(*canvas.get_pixel(179, 512), RED);
        assert_eq!(*canvas.get_pixel(843, 843), RED);
        assert_eq!(canvas.get_pixel(844, 512)[3], 0);
        assert_eq!(canvas.get_pixel(512, 178)[3], 0);
    }

    #[test]
    fn empty_source_gives_empty_canvas() {
        let source = RgbaImage::from_pixel(1024, 1024, TRANSPARENT);
        let config = IconConfig::default();
        let canvas =
            composite(&source, BoundingBox::new(50, 50, 974, 974), &config, None).unwrap();
        assert_eq!(canvas.dimensions(), (1024, 1024));
        assert!(canvas.pixels().all(|pixel| pixel[3] == 0));
    }

    #[test]
    fn feathered_pixel_is_half_transparent() {
        let mut logo = RgbaImage::from_pixel(3, 1, Rgba([40, 40, 40, 255]));
        logo.put_pixel(0, 0, Rgba([10, 10, 10, 255]));
        logo.put_pixel(2, 0, Rgba([200, 180, 160, 255]));
        let feathered = feather_edges(&logo, 20, 60);
        assert_eq!(*feathered.get_pixel(0, 0), TRANSPARENT);
        assert_eq!(*feathered.get_pixel(1, 0), Rgba([40, 40, 40, 127]));
        assert_eq!(*feathered.get_pixel(2, 0), Rgba([200, 180, 160, 255]));
    }

    #[test]
    fn solid_mode_blends_feathered_edges_into_black() {
        // A 665x665 logo needs no resampling, so its pixels are exact.
        let mut source = RgbaImage::from_pixel(1024, 1024, OPAQUE_BLACK);
        for y in 179..844 {
            for x in 179..844 {
                source.put_pixel(x, y, Rgba([40, 40, 40, 255]));
            }
        }
        let canvas = composite(
            &source,
            BoundingBox::new(179, 179, 844, 844),
            &solid_config(),
            None,
        )
        .unwrap();
        let corner = canvas.get_pixel(10, 10);
        assert_eq!(*corner, OPAQUE_BLACK);
        let edge = canvas.get_pixel(179, 400);
        assert_eq!(edge[3], 255);
        assert!((19..=20).contains(&edge[0]), "blended value {}", edge[0]);
    }

    #[test]
    fn disabled_mask_keeps_alpha() {
        let mut source = RgbaImage::from_pixel(1024, 1024, TRANSPARENT);
        for y in 300..700 {
            for x in 200..800 {
                source.put_pixel(x, y, Rgba([90, 200, 10, 180]));
            }
        }
        let config = IconConfig::default();
        let bounds = BoundingBox::new(200, 300, 800, 700);
        let unmasked = composite(&source, bounds, &config, None).unwrap();
        assert_eq!(unmasked, place_logo(&source, bounds, &config));
    }

    #[test]
    fn mask_cuts_corners() {
        let source = RgbaImage::from_pixel(1024, 1024, RED);
        let config = solid_config();
        let mask = squircle_mask(
            1024,
            &SquircleShape { padding: 90, exponent: 5.0, steps: 2000 },
        );
        let canvas =
            composite(&source, BoundingBox::new(0, 0, 1024, 1024), &config, Some(&mask)).unwrap();
        assert_eq!(canvas.get_pixel(20, 20)[3], 0);
        assert_eq!(canvas.get_pixel(150, 512)[3], 255);
        assert_eq!(*canvas.get_pixel(512, 512), RED);
    }

    #[test]
    fn out_of_range_bounds_leave_backdrop() {
        let source = RgbaImage::from_pixel(16, 16, RED);
        let config = IconConfig { canvas_size: 32, ..IconConfig::default() };
        let canvas =
            composite(&source, BoundingBox::new(40, 40, 50, 50), &config, None).unwrap();
        assert_eq!(canvas.dimensions(), (32, 32));
        assert!(canvas.pixels().all(|pixel| *pixel == TRANSPARENT));
    }

    #[test]
    fn mask_must_match_canvas() {
        let source = RgbaImage::from_pixel(64, 64, RED);
        let config = IconConfig { canvas_size: 64, ..IconConfig::default() };
        let mask = AlphaMask::new(32, 32);
        let result = composite(&source, BoundingBox::new(0, 0, 64, 64), &config, Some(&mask));
        assert!(matches!(result, Err(IconError::MaskSize { .. })));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(24))]

        #[test]
        fn canvas_size_is_fixed(width in 1u32..64, height in 1u32..64) {
            let source = RgbaImage::from_pixel(64, 64, RED);
            let config = IconConfig { canvas_size: 96, ..IconConfig::default() };
            let canvas =
                composite(&source, BoundingBox::new(0, 0, width, height), &config, None).unwrap();
            prop_assert_eq!(canvas.dimensions(), (96, 96));
            let (new_width, new_height) = fit_logo_size(width, height, config.target_logo_size());
            let longest = new_width.max(new_height);
            prop_assert!(longest.abs_diff(config.target_logo_size()) <= 1);
        }
    }
}
