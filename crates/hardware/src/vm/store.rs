//! Backing stores.
//!
//! A backing store is random-access byte storage addressed by offset. The
//! program executable and each address space's swap area are both backing
//! stores. Two implementations are provided:
//! 1. **`MemStore`:** a growable in-memory buffer.
//! 2. **`FileStore`:** a host file.

use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::Path;

/// Random-access byte storage.
pub trait BackingStore {
    /// Reads up to `buf.len()` bytes starting at `offset`.
    ///
    /// Returns the number of bytes read; fewer than requested means the end
    /// of the store was reached.
    fn read_at(&mut self, buf: &mut [u8], offset: u64) -> io::Result<usize>;

    /// Writes up to `buf.len()` bytes starting at `offset`.
    ///
    /// Returns the number of bytes written.
    fn write_at(&mut self, buf: &[u8], offset: u64) -> io::Result<usize>;
}

/// Fills `buf` from `offset`, zero-filling past the end of the store.
///
/// # Errors
///
/// Any I/O error from the store.
pub fn read_full(store: &mut dyn BackingStore, buf: &mut [u8], offset: u64) -> io::Result<()> {
    let mut done = 0;
    while done < buf.len() {
        let n = store.read_at(&mut buf[done..], offset + done as u64)?;
        if n == 0 {
            break;
        }
        done += n;
    }
    buf[done..].fill(0);
    Ok(())
}

/// Writes all of `buf` at `offset`.
///
/// # Errors
///
/// Any I/O error from the store, or [`io::ErrorKind::WriteZero`] if it
/// stops accepting bytes.
pub fn write_full(store: &mut dyn BackingStore, buf: &[u8], offset: u64) -> io::Result<()> {
    let mut done = 0;
    while done < buf.len() {
        let n = store.write_at(&buf[done..], offset + done as u64)?;
        if n == 0 {
            return Err(io::Error::new(
                io::ErrorKind::WriteZero,
                "backing store accepted no bytes",
            ));
        }
        done += n;
    }
    Ok(())
}

/// In-memory backing store.
#[derive(Clone, Default)]
pub struct MemStore {
    data: Vec<u8>,
}

impl MemStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current contents.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }
}

impl From<Vec<u8>> for MemStore {
    fn from(data: Vec<u8>) -> Self {
        Self { data }
    }
}

impl fmt::Debug for MemStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemStore").field("len", &self.data.len()).finish()
    }
}

impl BackingStore for MemStore {
    fn read_at(&mut self, buf: &mut [u8], offset: u64) -> io::Result<usize> {
        let Ok(start) = usize::try_from(offset) else {
            return Ok(0);
        };
        let Some(src) = self.data.get(start..) else {
            return Ok(0);
        };
        let n = src.len().min(buf.len());
        buf[..n].copy_from_slice(&src[..n]);
        Ok(n)
    }

    fn write_at(&mut self, buf: &[u8], offset: u64) -> io::Result<usize> {
        let start = usize::try_from(offset)
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "offset too large"))?;
        let end = start + buf.len();
        if self.data.len() < end {
            self.data.resize(end, 0);
        }
        self.data[start..end].copy_from_slice(buf);
        Ok(buf.len())
    }
}

/// Backing store over a host file.
#[derive(Debug)]
pub struct FileStore {
    file: File,
}

impl FileStore {
    /// Opens an existing file read-only.
    ///
    /// # Errors
    ///
    /// Any error from [`File::open`].
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        Ok(Self {
            file: File::open(path)?,
        })
    }

    /// Creates (or truncates) a file for reading and writing.
    ///
    /// # Errors
    ///
    /// Any error from opening the file.
    pub fn create(path: impl AsRef<Path>) -> io::Result<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)?;
        Ok(Self { file })
    }
}

impl From<File> for FileStore {
    fn from(file: File) -> Self {
        Self { file }
    }
}

impl BackingStore for FileStore {
    fn read_at(&mut self, buf: &mut [u8], offset: u64) -> io::Result<usize> {
        let _ = self.file.seek(SeekFrom::Start(offset))?;
        self.file.read(buf)
    }

    fn write_at(&mut self, buf: &[u8], offset: u64) -> io::Result<usize> {
        let _ = self.file.seek(SeekFrom::Start(offset))?;
        self.file.write(buf)
    }
}
