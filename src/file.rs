//! # Validated photo file reference.
//!
//! [`PhotoFile::open`] is the single validation gate for work-item input:
//! the file must exist and be one of the supported image kinds. A stable,
//! content-derived identifier (SHA-256 of the file bytes, lowercase hex) is
//! computed once at open time and never changes afterwards.

use std::fmt;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use crate::error::PhotoError;

/// Supported image kinds.
///
/// Still kinds are processed frame-less; the animated kind ([`ImageKind::Gif`])
/// widens the per-run timeout ceiling to accommodate per-frame processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    /// JPEG still image.
    Jpeg,
    /// PNG still image.
    Png,
    /// GIF, treated as animated/multi-frame.
    Gif,
}

impl ImageKind {
    /// Maps a file extension (without the dot, any case) to a kind.
    ///
    /// Returns `None` for unsupported extensions.
    pub fn from_extension(ext: &str) -> Option<Self> {
        if ext.eq_ignore_ascii_case("jpg") || ext.eq_ignore_ascii_case("jpeg") {
            Some(ImageKind::Jpeg)
        } else if ext.eq_ignore_ascii_case("png") {
            Some(ImageKind::Png)
        } else if ext.eq_ignore_ascii_case("gif") {
            Some(ImageKind::Gif)
        } else {
            None
        }
    }

    /// Whether this kind is animated (multi-frame).
    pub fn is_animated(&self) -> bool {
        matches!(self, ImageKind::Gif)
    }

    /// Short stable label for logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            ImageKind::Jpeg => "jpeg",
            ImageKind::Png => "png",
            ImageKind::Gif => "gif",
        }
    }
}

impl fmt::Display for ImageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}

/// A validated, existing file of a supported kind.
///
/// Immutable after construction; cloning is cheap relative to the work a
/// photo represents and keeps the reference usable across tasks.
#[derive(Debug, Clone)]
pub struct PhotoFile {
    path: PathBuf,
    kind: ImageKind,
    id: String,
}

impl PhotoFile {
    /// Opens and validates a photo file.
    ///
    /// # Errors
    /// - [`PhotoError::Missing`] if the path does not point at an existing file;
    /// - [`PhotoError::Unsupported`] if the extension is not jpeg/png/gif;
    /// - [`PhotoError::Io`] if reading the contents for the id fails.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, PhotoError> {
        let path = path.into();

        if !path.is_file() {
            return Err(PhotoError::Missing { path });
        }

        let kind = path
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(ImageKind::from_extension)
            .ok_or_else(|| PhotoError::Unsupported { path: path.clone() })?;

        let bytes = std::fs::read(&path)?;
        let id = hex_digest(&bytes);

        Ok(Self { path, kind, id })
    }

    /// Content-derived identifier (SHA-256 of the file bytes, lowercase hex).
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Path of the underlying file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Detected image kind.
    pub fn kind(&self) -> ImageKind {
        self.kind
    }
}

fn hex_digest(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    let mut out = String::with_capacity(digest.len() * 2);
    for byte in digest {
        out.push_str(&format!("{byte:02x}"));
    }
    out
}
