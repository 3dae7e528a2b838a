use image::imageops::{self, FilterType};
use image::RgbaImage;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use super::error::{IconError, StageOutput, Warning};
use super::package::{IconPackager, IconsetEntry, PackageOutcome};
use super::pngio::{encode_png, save_png};

/// Largest image an ICO entry can describe.
const MAX_ICO_SIZE: u32 = 256;

/// File formats the exporter can produce.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ExportFormat {
    /// A single full-resolution PNG.
    Png,
    /// A Windows icon holding one PNG per size.
    Ico,
    /// A macOS icon built from an iconset with 1x and 2x variants.
    Icns,
}

/// One artifact to produce from the final canvas.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ExportTarget {
    /// Container format.
    pub format: ExportFormat,
    /// Pixel sizes to embed.  For ICNS these are base sizes; each also gets
    /// an `@2x` variant.  Ignored for PNG.
    pub sizes: Vec<u32>,
    /// Where to write the artifact.
    pub path: PathBuf,
}

impl ExportTarget {
    /// A full-resolution PNG at `path`.
    pub fn png<P: Into<PathBuf>>(path: P) -> ExportTarget {
        ExportTarget { format: ExportFormat::Png, sizes: Vec::new(), path: path.into() }
    }

    /// A Windows icon with the given sizes.
    pub fn ico<P: Into<PathBuf>>(path: P, sizes: &[u32]) -> ExportTarget {
        ExportTarget { format: ExportFormat::Ico, sizes: sizes.to_vec(), path: path.into() }
    }

    /// A macOS icon with the given base sizes.
    pub fn icns<P: Into<PathBuf>>(path: P, sizes: &[u32]) -> ExportTarget {
        ExportTarget { format: ExportFormat::Icns, sizes: sizes.to_vec(), path: path.into() }
    }
}

/// Resamples the canvas to a `size`x`size` square.  Always works from the
/// full-resolution canvas passed in, never from a smaller copy.
pub fn resample(canvas: &RgbaImage, size: u32) -> RgbaImage {
    if canvas.dimensions() == (size, size) {
        canvas.clone()
    } else {
        imageops::resize(canvas, size, size, FilterType::Lanczos3)
    }
}

/// Builds the iconset for `sizes`: for each base size, a 1x and a 2x PNG
/// named by the iconset convention.
pub fn iconset_entries(canvas: &RgbaImage, sizes: &[u32]) -> Result<Vec<IconsetEntry>, IconError> {
    let mut entries = Vec::with_capacity(sizes.len() * 2);
    for &size in sizes {
        for density in [1, 2] {
            entries.push(IconsetEntry {
                label: IconsetEntry::label_for(size, density),
                png: encode_png(&resample(canvas, size * density))?,
            });
        }
    }
    Ok(entries)
}

/// Resamples the canvas to `size` and encodes it as a PNG-compressed ICO
/// entry.
fn ico_entry(canvas: &RgbaImage, size: u32) -> Result<ico::IconDirEntry, IconError> {
    if size == 0 || size > MAX_ICO_SIZE {
        return Err(IconError::InvalidContainer(format!(
            "ICO entries must be 1-{} pixels wide (was {})",
            MAX_ICO_SIZE, size
        )));
    }
    let image = ico::IconImage::from_rgba_data(size, size, resample(canvas, size).into_raw());
    Ok(ico::IconDirEntry::encode_as_png(&image)?)
}

/// Writes one artifact.  Returns the written path, or `None` with a warning
/// if the packager could not produce it.  A packager failure only skips the
/// container; it never aborts the export.
pub fn export(
    canvas: &RgbaImage,
    target: &ExportTarget,
    packager: &dyn IconPackager,
) -> Result<StageOutput<Option<PathBuf>>, IconError> {
    ensure_parent(&target.path)?;
    match target.format {
        ExportFormat::Png => {
            save_png(canvas, &target.path)?;
            log::info!("Saved PNG to {}", target.path.display());
        }
        ExportFormat::Ico => {
            let mut dir = ico::IconDir::new(ico::ResourceType::Icon);
            for &size in &target.sizes {
                dir.add_entry(ico_entry(canvas, size)?);
            }
            let mut file = BufWriter::new(File::create(&target.path)?);
            dir.write(&mut file)?;
            file.flush()?;
            log::info!("Saved ICO to {}", target.path.display());
        }
        ExportFormat::Icns => {
            let entries = iconset_entries(canvas, &target.sizes)?;
            let warning = match packager.package(&entries, &target.path) {
                Ok(PackageOutcome::Packaged) => {
                    log::info!("Saved ICNS to {}", target.path.display());
                    None
                }
                Ok(PackageOutcome::Unsupported(reason)) => {
                    Some(Warning::PackagingUnsupported { target: target.path.clone(), reason })
                }
                Err(err) => {
                    discard_partial(&target.path)?;
                    Some(Warning::PackagingFailed {
                        target: target.path.clone(),
                        reason: err.to_string(),
                    })
                }
            };
            if let Some(warning) = warning {
                return Ok(StageOutput::with_warnings(None, vec![warning]));
            }
        }
    }
    Ok(StageOutput::clean(Some(target.path.clone())))
}

/// Writes every target in order and collects the written paths.
pub fn export_all(
    canvas: &RgbaImage,
    targets: &[ExportTarget],
    packager: &dyn IconPackager,
) -> Result<StageOutput<Vec<PathBuf>>, IconError> {
    let mut written = Vec::with_capacity(targets.len());
    let mut warnings = Vec::new();
    for target in targets {
        if let Some(path) = export(canvas, target, packager)?.drain_into(&mut warnings) {
            written.push(path);
        }
    }
    Ok(StageOutput::with_warnings(written, warnings))
}

fn discard_partial(path: &Path) -> Result<(), IconError> {
    if path.exists() {
        fs::remove_file(path)?;
    }
    Ok(())
}

fn ensure_parent(path: &Path) -> Result<(), IconError> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent)?;
            Ok(())
        }
        _ => Ok(()),
    }
}
