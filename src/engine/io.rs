// src/engine/io.rs
//
// I/O operations: Source enum and file loading

use crate::error::{InlineImageError, Result};
use memmap2::Mmap;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Image source - supports in-memory data, memory-mapped files, and file paths
/// (lazy loading: bytes are read only when the pipeline reaches the decode stage)
#[derive(Clone, Debug)]
pub enum Source {
    /// In-memory image data
    Memory(Arc<Vec<u8>>),
    /// Memory-mapped file (zero-copy access)
    Mapped(Arc<Mmap>),
    /// File path for lazy loading
    Path(PathBuf),
}

/// Cheaply cloneable handle to a source's raw bytes, safe to move onto a
/// blocking worker. Mapped sources stay zero-copy.
#[derive(Clone)]
pub enum SourceBytes {
    Owned(Arc<Vec<u8>>),
    Mapped(Arc<Mmap>),
}

impl AsRef<[u8]> for SourceBytes {
    fn as_ref(&self) -> &[u8] {
        match self {
            SourceBytes::Owned(data) => data.as_slice(),
            SourceBytes::Mapped(mmap) => mmap.as_ref(),
        }
    }
}

impl Source {
    /// Wrap an in-memory buffer.
    pub fn from_bytes(data: Vec<u8>) -> Self {
        Source::Memory(Arc::new(data))
    }

    /// Memory-map a file for zero-copy access.
    ///
    /// The map assumes the file is not truncated externally while the
    /// conversion is in flight.
    pub fn map_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(InlineImageError::file_not_found(
                path.to_string_lossy().into_owned(),
            ));
        }
        let file = File::open(path).map_err(|e| {
            InlineImageError::file_read_failed(path.to_string_lossy().into_owned(), e)
        })?;
        let mmap = unsafe {
            Mmap::map(&file).map_err(|e| {
                InlineImageError::mmap_failed(path.to_string_lossy().into_owned(), e)
            })?
        };
        Ok(Source::Mapped(Arc::new(mmap)))
    }

    /// Byte length without touching the file body.
    ///
    /// Path sources answer from filesystem metadata, so an oversized file is
    /// rejected before a single byte of its content is read.
    pub fn byte_len(&self) -> Result<u64> {
        match self {
            Source::Memory(data) => Ok(data.len() as u64),
            Source::Mapped(mmap) => Ok(mmap.len() as u64),
            Source::Path(path) => {
                let meta = std::fs::metadata(path).map_err(|e| {
                    if e.kind() == std::io::ErrorKind::NotFound {
                        InlineImageError::file_not_found(path.to_string_lossy().into_owned())
                    } else {
                        InlineImageError::file_read_failed(path.to_string_lossy().into_owned(), e)
                    }
                })?;
                Ok(meta.len())
            }
        }
    }

    /// Materialize the bytes. Path sources are read here; Memory and Mapped
    /// sources only bump a refcount.
    pub fn bytes(&self) -> Result<SourceBytes> {
        match self {
            Source::Memory(data) => Ok(SourceBytes::Owned(data.clone())),
            Source::Mapped(mmap) => Ok(SourceBytes::Mapped(mmap.clone())),
            Source::Path(path) => {
                let data = std::fs::read(path).map_err(|e| {
                    if e.kind() == std::io::ErrorKind::NotFound {
                        InlineImageError::file_not_found(path.to_string_lossy().into_owned())
                    } else {
                        InlineImageError::file_read_failed(path.to_string_lossy().into_owned(), e)
                    }
                })?;
                Ok(SourceBytes::Owned(Arc::new(data)))
            }
        }
    }
}

/// Guess a declared media type from a path extension.
///
/// Mirrors what browser file inputs report for the formats this crate
/// handles; anything unrecognized is declared as a generic byte stream and
/// will fail media-type validation downstream.
pub fn media_type_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        Some("bmp") => "image/bmp",
        Some("avif") => "image/avif",
        Some("txt") => "text/plain",
        _ => "application/octet-stream",
    }
}
