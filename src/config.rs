use serde::Deserialize;
use std::fs;
use std::path::Path;

use super::error::IconError;

/// Side length of the working canvas, in pixels.
pub const DEFAULT_CANVAS_SIZE: u32 = 1024;
/// Pixels brighter than this (mean of RGB) count as content.
pub const DEFAULT_CONTENT_THRESHOLD: u8 = 30;
/// Below this brightness a logo pixel becomes fully transparent in
/// solid-background mode.
pub const DEFAULT_FEATHER_LOW: u8 = 20;
/// At or above this brightness a logo pixel keeps its alpha in
/// solid-background mode.
pub const DEFAULT_FEATHER_HIGH: u8 = 60;
/// Share of the canvas taken by the larger side of the recentred logo.
pub const DEFAULT_FILL_RATIO: f64 = 0.65;
/// Width of the border strips painted black in solid-background mode.
pub const DEFAULT_BORDER_THICKNESS: u32 = 150;
/// Distance between the canvas edge and the squircle.
pub const DEFAULT_SQUIRCLE_PADDING: u32 = 90;
/// Superellipse curvature exponent.
pub const DEFAULT_SQUIRCLE_EXPONENT: f64 = 5.0;
/// Number of points sampled along the squircle boundary.
pub const DEFAULT_SQUIRCLE_STEPS: u32 = 2000;
/// Margin of the box used when no content is detected.
pub const DEFAULT_FALLBACK_MARGIN: u32 = 50;
/// Sizes embedded in the Windows icon.
pub const DEFAULT_ICO_SIZES: [u32; 6] = [16, 32, 48, 64, 128, 256];
/// Base sizes of the macOS iconset; each also gets an `@2x` variant.
pub const DEFAULT_ICNS_SIZES: [u32; 6] = [16, 32, 64, 128, 256, 512];

// ICO directory entries store dimensions in a single byte (0 meaning 256).
const MAX_ICO_SIZE: u32 = 256;

/// Tunable parameters for the icon pipeline.
///
/// Every field has a default matching the constants above, so a TOML file
/// only needs to name the values it overrides.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct IconConfig {
    /// Side length of the working canvas and of the exported PNG.
    pub canvas_size: u32,
    /// Brightness above which a pixel is treated as content.
    pub content_threshold: u8,
    /// Lower brightness bound of the edge feather.
    pub feather_low: u8,
    /// Upper brightness bound of the edge feather.
    pub feather_high: u8,
    /// Fraction of the canvas covered by the logo's larger side.
    pub fill_ratio: f64,
    /// Border strip width cleaned in solid-background mode.
    pub border_thickness: u32,
    /// Padding between canvas edge and squircle.
    pub squircle_padding: u32,
    /// Superellipse exponent.
    pub squircle_exponent: f64,
    /// Sample count along the squircle boundary.
    pub squircle_steps: u32,
    /// Margin of the fallback content box.
    pub fallback_margin: u32,
    /// Sizes written into `icon.ico`.
    pub ico_sizes: Vec<u32>,
    /// Base sizes written into the iconset for `icon.icns`.
    pub icns_sizes: Vec<u32>,
    /// Whether to cut the canvas to a squircle.
    pub squircle: bool,
    /// Whether to clean the borders and composite onto opaque black.
    pub solid_background: bool,
}

impl Default for IconConfig {
    fn default() -> Self {
        IconConfig {
            canvas_size: DEFAULT_CANVAS_SIZE,
            content_threshold: DEFAULT_CONTENT_THRESHOLD,
            feather_low: DEFAULT_FEATHER_LOW,
            feather_high: DEFAULT_FEATHER_HIGH,
            fill_ratio: DEFAULT_FILL_RATIO,
            border_thickness: DEFAULT_BORDER_THICKNESS,
            squircle_padding: DEFAULT_SQUIRCLE_PADDING,
            squircle_exponent: DEFAULT_SQUIRCLE_EXPONENT,
            squircle_steps: DEFAULT_SQUIRCLE_STEPS,
            fallback_margin: DEFAULT_FALLBACK_MARGIN,
            ico_sizes: DEFAULT_ICO_SIZES.to_vec(),
            icns_sizes: DEFAULT_ICNS_SIZES.to_vec(),
            squircle: true,
            solid_background: false,
        }
    }
}

impl IconConfig {
    /// Parses a configuration from TOML text.  Missing keys keep their
    /// defaults.
    pub fn from_toml_str(text: &str) -> Result<IconConfig, IconError> {
        let config: IconConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads a configuration from a TOML file.
    pub fn from_toml_file(path: &Path) -> Result<IconConfig, IconError> {
        let text = fs::read_to_string(path)?;
        IconConfig::from_toml_str(&text)
    }

    /// The size the logo's larger side is scaled to, `floor(S * fill_ratio)`.
    pub fn target_logo_size(&self) -> u32 {
        ((self.canvas_size as f64) * self.fill_ratio).floor() as u32
    }

    /// Checks that every value describes a usable pipeline.
    pub fn validate(&self) -> Result<(), IconError> {
        if self.canvas_size == 0 {
            return invalid("canvas_size must be positive".to_string());
        }
        if !(self.fill_ratio > 0.0 && self.fill_ratio <= 1.0) {
            return invalid(format!(
                "fill_ratio must be in (0, 1] (was {})",
                self.fill_ratio
            ));
        }
        if self.target_logo_size() == 0 {
            return invalid("fill_ratio leaves no room for the logo".to_string());
        }
        if self.feather_low >= self.feather_high {
            return invalid(format!(
                "feather_low ({}) must be below feather_high ({})",
                self.feather_low, self.feather_high
            ));
        }
        if self.squircle_steps < 3 {
            return invalid(format!(
                "squircle_steps must be at least 3 (was {})",
                self.squircle_steps
            ));
        }
        if !(self.squircle_exponent > 0.0) {
            return invalid(format!(
                "squircle_exponent must be positive (was {})",
                self.squircle_exponent
            ));
        }
        check_sizes("ico_sizes", &self.ico_sizes, MAX_ICO_SIZE)?;
        check_sizes("icns_sizes", &self.icns_sizes, u32::MAX / 2)?;
        Ok(())
    }
}

fn check_sizes(name: &str, sizes: &[u32], max: u32) -> Result<(), IconError> {
    if sizes.is_empty() {
        return invalid(format!("{} must not be empty", name));
    }
    if let Some(&size) = sizes.iter().find(|&&size| size == 0 || size > max) {
        return invalid(format!("{} contains unsupported size {}", name, size));
    }
    Ok(())
}

fn invalid(msg: String) -> Result<(), IconError> {
    Err(IconError::InvalidConfig(msg))
}
