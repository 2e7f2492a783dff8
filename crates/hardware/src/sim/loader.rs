//! Program Image Loader.
//!
//! Opens NOFF program images and validates their headers. The image itself is
//! kept open as a [`BackingStore`]: pages are copied out of it by the virtual
//! memory layer, eagerly or on demand.

use std::path::Path;

use tracing::debug;

use crate::common::LoadError;
use crate::vm::store::{BackingStore, FileStore, MemStore};

use super::noff::NoffHeader;

/// A program image with a validated header.
pub struct ProgramImage {
    /// Parsed header.
    pub header: NoffHeader,
    /// Image contents, addressed by file offset.
    pub store: Box<dyn BackingStore>,
}

impl std::fmt::Debug for ProgramImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgramImage")
            .field("header", &self.header)
            .finish_non_exhaustive()
    }
}

/// Opens the NOFF image at `path`.
///
/// # Errors
///
/// [`LoadError::Io`] if the file cannot be opened or read, or any header error.
pub fn open_image(path: impl AsRef<Path>) -> Result<ProgramImage, LoadError> {
    let path = path.as_ref();
    let mut store = FileStore::open(path)?;
    let header = NoffHeader::read_from(&mut store)?;
    debug!(path = %path.display(), ?header, "program image opened");
    Ok(ProgramImage {
        header,
        store: Box::new(store),
    })
}

/// Wraps an in-memory NOFF image.
///
/// # Errors
///
/// Any header error.
pub fn image_from_bytes(bytes: Vec<u8>) -> Result<ProgramImage, LoadError> {
    let header = NoffHeader::parse(&bytes)?;
    Ok(ProgramImage {
        header,
        store: Box::new(MemStore::from(bytes)),
    })
}
