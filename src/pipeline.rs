use image::imageops::{self, FilterType};
use image::RgbaImage;
use std::path::{Path, PathBuf};

use super::bounds::detect_content_bounds;
use super::composite::composite;
use super::config::IconConfig;
use super::error::{IconError, StageOutput, Warning};
use super::export::{export_all, ExportTarget};
use super::normalize::normalize_background;
use super::package::IconPackager;
use super::squircle::{squircle_mask, SquircleShape};

/// File name of the flat PNG icon.
pub const PNG_FILE_NAME: &str = "icon.png";
/// File name of the Windows icon.
pub const ICO_FILE_NAME: &str = "icon.ico";
/// File name of the macOS icon.
pub const ICNS_FILE_NAME: &str = "icon.icns";

/// What a pipeline run wrote and what it warned about.
#[derive(Clone, Debug)]
pub struct PipelineReport {
    /// Artifacts written, in export order.
    pub written: Vec<PathBuf>,
    /// Non-fatal conditions met along the way.
    pub warnings: Vec<Warning>,
}

/// Turns one source image into a set of icon files.
///
/// Each stage takes its input by reference and returns a fresh buffer, so a
/// pipeline can be reused for any number of runs.
pub struct IconPipeline {
    config: IconConfig,
}

impl IconPipeline {
    /// Creates a pipeline, rejecting invalid configurations.
    pub fn new(config: IconConfig) -> Result<IconPipeline, IconError> {
        config.validate()?;
        Ok(IconPipeline { config })
    }

    /// Returns the pipeline's configuration.
    pub fn config(&self) -> &IconConfig {
        &self.config
    }

    /// Decodes the source image and stretches it onto the square working
    /// canvas.  Fails with [`IconError::SourceNotFound`] before touching
    /// anything else if `path` does not exist.
    pub fn load_source(&self, path: &Path) -> Result<RgbaImage, IconError> {
        if !path.exists() {
            return Err(IconError::SourceNotFound(path.to_path_buf()));
        }
        log::info!("Processing source image: {}", path.display());
        let source = image::open(path)?.to_rgba8();
        Ok(self.fit_canvas(source))
    }

    /// Resizes `image` to the canvas size unless it already matches.
    pub fn fit_canvas(&self, image: RgbaImage) -> RgbaImage {
        let size = self.config.canvas_size;
        if image.dimensions() == (size, size) {
            image
        } else {
            imageops::resize(&image, size, size, FilterType::Lanczos3)
        }
    }

    /// Runs the geometry stages on a canvas-sized image: background
    /// normalization, bounds detection, recentring and masking.
    pub fn render(&self, source: &RgbaImage) -> Result<StageOutput<RgbaImage>, IconError> {
        let config = &self.config;
        let mut warnings = Vec::new();

        let normalized;
        let source = if config.solid_background {
            normalized = normalize_background(source, config.border_thickness);
            &normalized
        } else {
            source
        };

        let bounds = detect_content_bounds(
            source,
            config.content_threshold,
            config.fallback_margin,
        )
        .drain_into(&mut warnings);
        log::info!("Detected graphic bounds: {}", bounds);

        let mask = if config.squircle {
            log::info!("Applying squircle mask");
            Some(squircle_mask(config.canvas_size, &self.squircle_shape()))
        } else {
            None
        };
        let canvas = composite(source, bounds, config, mask.as_ref())?;
        Ok(StageOutput::with_warnings(canvas, warnings))
    }

    /// The artifacts written into `build_dir`.
    pub fn targets(&self, build_dir: &Path) -> Vec<ExportTarget> {
        vec![
            ExportTarget::png(build_dir.join(PNG_FILE_NAME)),
            ExportTarget::ico(build_dir.join(ICO_FILE_NAME), &self.config.ico_sizes),
            ExportTarget::icns(build_dir.join(ICNS_FILE_NAME), &self.config.icns_sizes),
        ]
    }

    /// Loads `source_path`, renders it and writes every artifact into
    /// `build_dir`.  Every warning is logged as well as returned.
    pub fn run(
        &self,
        source_path: &Path,
        build_dir: &Path,
        packager: &dyn IconPackager,
    ) -> Result<PipelineReport, IconError> {
        let source = self.load_source(source_path)?;
        let mut warnings = Vec::new();
        let canvas = self.render(&source)?.drain_into(&mut warnings);
        let written = export_all(&canvas, &self.targets(build_dir), packager)?
            .drain_into(&mut warnings);
        for warning in &warnings {
            log::warn!("{}", warning);
        }
        Ok(PipelineReport { written, warnings })
    }

    fn squircle_shape(&self) -> SquircleShape {
        SquircleShape {
            padding: self.config.squircle_padding,
            exponent: self.config.squircle_exponent,
            steps: self.config.squircle_steps,
        }
    }
}
