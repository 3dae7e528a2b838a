use std::fmt;
use std::io;
use std::path::PathBuf;

use super::bounds::BoundingBox;

/// Errors that abort icon generation.
#[derive(Debug, thiserror::Error)]
pub enum IconError {
    /// The source image path does not exist.
    #[error("source image '{}' not found", .0.display())]
    SourceNotFound(PathBuf),

    /// The source image could not be decoded.
    #[error("failed to decode source image: {0}")]
    Decode(#[from] image::ImageError),

    /// A PNG payload could not be encoded.
    #[error("failed to encode PNG: {0}")]
    Encode(#[from] png::EncodingError),

    /// Reading or writing a file failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The configuration file could not be parsed.
    #[error("failed to parse configuration: {0}")]
    Config(#[from] toml::de::Error),

    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// An icon container is malformed or cannot hold the requested image.
    #[error("invalid icon container: {0}")]
    InvalidContainer(String),

    /// A mask does not cover the image it is applied to.
    #[error("mask is {}x{} but the image is {}x{}", .mask.0, .mask.1, .image.0, .image.1)]
    MaskSize {
        /// Width and height of the mask.
        mask: (u32, u32),
        /// Width and height of the image.
        image: (u32, u32),
    },

    /// The native packaging utility ran but did not produce a container.
    #[error("icon packaging failed: {0}")]
    Packaging(String),
}

/// A condition that is reported to the operator but does not stop the
/// pipeline.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Warning {
    /// No pixel passed the content threshold; `fallback` was used instead.
    NoContentDetected {
        /// The box substituted for the missing content bounds.
        fallback: BoundingBox,
    },
    /// A container could not be packaged on this host and was skipped.
    PackagingUnsupported {
        /// The artifact that was skipped.
        target: PathBuf,
        /// Why the packager declined.
        reason: String,
    },
    /// The packager ran but failed; the artifact was skipped.
    PackagingFailed {
        /// The artifact that was skipped.
        target: PathBuf,
        /// The packager's error.
        reason: String,
    },
}

impl fmt::Display for Warning {
    fn fmt(&self, out: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Warning::NoContentDetected { fallback } => write!(
                out,
                "could not detect content bounding box, using default bounds {}",
                fallback
            ),
            Warning::PackagingUnsupported { target, reason } => write!(
                out,
                "skipping {} ({})",
                target.display(),
                reason
            ),
            Warning::PackagingFailed { target, reason } => write!(
                out,
                "failed to package {}: {}",
                target.display(),
                reason
            ),
        }
    }
}

/// The result of a pipeline stage together with any non-fatal warnings it
/// raised.
#[derive(Clone, Debug)]
pub struct StageOutput<T> {
    /// The value produced by the stage.
    pub output: T,
    /// Warnings raised while producing `output`, in the order they occurred.
    pub warnings: Vec<Warning>,
}

impl<T> StageOutput<T> {
    /// Wraps a stage result that raised no warnings.
    pub fn clean(output: T) -> StageOutput<T> {
        StageOutput { output, warnings: Vec::new() }
    }

    /// Wraps a stage result with the given warnings.
    pub fn with_warnings(output: T, warnings: Vec<Warning>) -> StageOutput<T> {
        StageOutput { output, warnings }
    }

    /// Moves this stage's warnings onto `sink` and returns the bare output.
    pub fn drain_into(self, sink: &mut Vec<Warning>) -> T {
        sink.extend(self.warnings);
        self.output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warning_messages() {
        let warning = Warning::NoContentDetected {
            fallback: BoundingBox::new(50, 50, 974, 974),
        };
        assert_eq!(
            warning.to_string(),
            "could not detect content bounding box, using default bounds \
             (left=50, top=50, right=974, bottom=974)"
        );
        let warning = Warning::PackagingUnsupported {
            target: PathBuf::from("build/icon.icns"),
            reason: "not on macOS".to_string(),
        };
        assert_eq!(warning.to_string(), "skipping build/icon.icns (not on macOS)");
        let warning = Warning::PackagingFailed {
            target: PathBuf::from("build/icon.icns"),
            reason: "icon packaging failed: iconutil exited with 1".to_string(),
        };
        assert_eq!(
            warning.to_string(),
            "failed to package build/icon.icns: icon packaging failed: iconutil exited with 1"
        );
    }

    #[test]
    fn drain_collects_warnings() {
        let mut sink = Vec::new();
        let stage = StageOutput::with_warnings(
            7,
            vec![Warning::NoContentDetected {
                fallback: BoundingBox::new(0, 0, 1, 1),
            }],
        );
        assert_eq!(stage.drain_into(&mut sink), 7);
        assert_eq!(sink.len(), 1);
        assert!(StageOutput::clean(()).warnings.is_empty());
    }
}
