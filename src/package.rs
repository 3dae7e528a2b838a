//! Packaging a set of iconset PNGs into a native macOS icon container.
//!
//! The geometry core only produces correctly named PNGs; turning them into
//! an `.icns` file goes through [`IconPackager`], so the mechanism can be
//! swapped without touching anything upstream.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::Command;

use super::error::IconError;
use super::family::IconFamily;
use super::icontype::IconType;

/// One file of an iconset directory.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct IconsetEntry {
    /// File name, `icon_{size}x{size}.png` or `icon_{size}x{size}@2x.png`.
    pub label: String,
    /// Encoded PNG contents.
    pub png: Vec<u8>,
}

impl IconsetEntry {
    /// Returns the iconset file name for a base size at the given density
    /// (1 or 2).
    pub fn label_for(size: u32, density: u32) -> String {
        if density == 2 {
            format!("icon_{0}x{0}@2x.png", size)
        } else {
            format!("icon_{0}x{0}.png", size)
        }
    }
}

/// What a packager did with a request.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PackageOutcome {
    /// The container was written to the destination.
    Packaged,
    /// This host cannot package containers; nothing was written.
    Unsupported(String),
}

/// Turns iconset entries into a single icon container file.
pub trait IconPackager {
    /// Packages `entries` into a container at `destination`.
    fn package(
        &self,
        entries: &[IconsetEntry],
        destination: &Path,
    ) -> Result<PackageOutcome, IconError>;
}

/// Packages through the macOS `iconutil` command.  Unsupported on other
/// hosts, or when `iconutil` is not on the `PATH`.
#[derive(Clone, Debug, Default)]
pub struct IconutilPackager;

impl IconutilPackager {
    /// Creates a packager that looks up `iconutil` on each call.
    pub fn new() -> IconutilPackager {
        IconutilPackager
    }

    fn locate(&self) -> Result<PathBuf, String> {
        if !cfg!(target_os = "macos") {
            return Err("iconutil is only available on macOS".to_string());
        }
        which::which("iconutil").map_err(|err| format!("iconutil not found: {}", err))
    }
}

impl IconPackager for IconutilPackager {
    fn package(
        &self,
        entries: &[IconsetEntry],
        destination: &Path,
    ) -> Result<PackageOutcome, IconError> {
        let program = match self.locate() {
            Ok(program) => program,
            Err(reason) => return Ok(PackageOutcome::Unsupported(reason)),
        };

        // Removed when dropped, including on the error paths below.
        let iconset = tempfile::Builder::new()
            .prefix("AppIcon")
            .suffix(".iconset")
            .tempdir()?;
        for entry in entries {
            fs::write(iconset.path().join(&entry.label), &entry.png)?;
        }

        let output = Command::new(&program)
            .arg("-c")
            .arg("icns")
            .arg(iconset.path())
            .arg("-o")
            .arg(destination)
            .output()?;
        if !output.status.success() {
            return Err(IconError::Packaging(format!(
                "{} exited with {}: {}",
                program.display(),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        iconset.close()?;
        Ok(PackageOutcome::Packaged)
    }
}

/// Writes the ICNS container in process.  Works on every host.
///
/// Entries whose label has no ICNS slot (such as `icon_64x64@2x.png`) are
/// left out.
#[derive(Clone, Debug, Default)]
pub struct EmbeddedPackager;

impl EmbeddedPackager {
    /// Creates an in-process packager.
    pub fn new() -> EmbeddedPackager {
        EmbeddedPackager
    }

    /// Builds the icon family for `entries` without writing it.
    pub fn build_family(&self, entries: &[IconsetEntry]) -> Result<IconFamily, IconError> {
        let mut family = IconFamily::new();
        for entry in entries {
            match IconType::from_iconset_label(&entry.label) {
                Some(icon_type) => {
                    log::debug!("Packing {} as {}", entry.label, icon_type.ostype());
                    family.add_png(icon_type, entry.png.clone())?;
                }
                None => log::debug!("No ICNS slot for {}, leaving it out", entry.label),
            }
        }
        if family.is_empty() {
            return Err(IconError::InvalidContainer(
                "no iconset entry maps to an ICNS icon type".to_string(),
            ));
        }
        Ok(family)
    }
}

impl IconPackager for EmbeddedPackager {
    fn package(
        &self,
        entries: &[IconsetEntry],
        destination: &Path,
    ) -> Result<PackageOutcome, IconError> {
        let family = self.build_family(entries)?;
        let mut file = BufWriter::new(File::create(destination)?);
        family.write(&mut file)?;
        file.flush()?;
        Ok(PackageOutcome::Packaged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::super::pngio::encode_png;
    use image::{Rgba, RgbaImage};

    fn entry(size: u32, density: u32) -> IconsetEntry {
        let pixels = size * density;
        IconsetEntry {
            label: IconsetEntry::label_for(size, density),
            png: encode_png(&RgbaImage::from_pixel(pixels, pixels, Rgba([5, 5, 5, 255])))
                .unwrap(),
        }
    }

    #[test]
    fn labels_follow_iconset_convention() {
        assert_eq!(IconsetEntry::label_for(16, 1), "icon_16x16.png");
        assert_eq!(IconsetEntry::label_for(512, 2), "icon_512x512@2x.png");
    }

    #[test]
    fn embedded_family_skips_unmapped_entries() {
        let entries = vec![entry(16, 1), entry(16, 2), entry(64, 1), entry(64, 2)];
        let family = EmbeddedPackager::new().build_family(&entries).unwrap();
        assert_eq!(
            family.available_icons(),
            vec![
                IconType::RGBA32_16x16,
                IconType::RGBA32_16x16_2x,
                IconType::RGBA32_64x64,
            ]
        );
    }

    #[test]
    fn embedded_family_rejects_mislabelled_png() {
        let mut bad = entry(16, 1);
        bad.label = IconsetEntry::label_for(32, 1);
        let result = EmbeddedPackager::new().build_family(&[bad]);
        assert!(matches!(result, Err(IconError::InvalidContainer(_))));
    }

    #[test]
    fn embedded_family_needs_an_entry() {
        let result = EmbeddedPackager::new().build_family(&[entry(64, 2)]);
        assert!(matches!(result, Err(IconError::InvalidContainer(_))));
    }

    #[cfg(not(target_os = "macos"))]
    #[test]
    fn iconutil_is_unsupported_off_macos() {
        let dir = tempfile::tempdir().unwrap();
        let destination = dir.path().join("icon.icns");
        let outcome = IconutilPackager::new().package(&[entry(16, 1)], &destination).unwrap();
        assert!(matches!(outcome, PackageOutcome::Unsupported(_)));
        assert!(!destination.exists());
    }
}
