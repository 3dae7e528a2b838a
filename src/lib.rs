//! Library for turning one source image into a consistent set of
//! application icons: a square PNG, a Windows `.ico` and a macOS `.icns`.
//!
//! The source is stretched onto a square canvas, its visible content is
//! located by brightness, and that content is recentred at a fixed share of
//! the canvas.  Optionally the edges are cleaned onto a solid black backdrop
//! and the result is cut to a superellipse ("squircle").
//!
//! ```no_run
//! use iconkit::{IconConfig, IconPipeline, IconutilPackager};
//! use std::path::Path;
//!
//! let pipeline = IconPipeline::new(IconConfig::default()).unwrap();
//! let report = pipeline
//!     .run(Path::new("source.png"), Path::new("build"), &IconutilPackager::new())
//!     .unwrap();
//! for warning in &report.warnings {
//!     eprintln!("warning: {}", warning);
//! }
//! ```

#![warn(missing_docs)]

mod bounds;
mod brightness;
mod composite;
mod config;
mod element;
mod error;
mod export;
mod family;
mod icontype;
mod mask;
mod normalize;
mod package;
mod pipeline;
mod pngio;
mod squircle;

pub use self::bounds::{detect_content_bounds, BoundingBox};
pub use self::brightness::{feather_alpha, is_content};
pub use self::composite::{composite, feather_edges, fit_logo_size};
pub use self::config::*;
pub use self::element::IconElement;
pub use self::error::{IconError, StageOutput, Warning};
pub use self::export::{export, export_all, iconset_entries, resample, ExportFormat, ExportTarget};
pub use self::family::IconFamily;
pub use self::icontype::{IconType, OSType};
pub use self::mask::AlphaMask;
pub use self::normalize::normalize_background;
pub use self::package::{
    EmbeddedPackager, IconPackager, IconsetEntry, IconutilPackager, PackageOutcome,
};
pub use self::pipeline::{
    IconPipeline, PipelineReport, ICNS_FILE_NAME, ICO_FILE_NAME, PNG_FILE_NAME,
};
pub use self::pngio::{encode_png, png_dimensions, save_png, write_png};
pub use self::squircle::{squircle_mask, SquircleShape};

/// An 8-bit RGBA image, the buffer every stage works on.
pub type RasterImage = image::RgbaImage;
