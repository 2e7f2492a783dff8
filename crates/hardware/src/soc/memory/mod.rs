//! Physical Memory.
//!
//! This module implements main memory. It provides:
//! 1. **Storage:** A flat byte array of `num_frames × page_size` bytes.
//! 2. **Word Access:** Little-endian reads and writes of 1, 2 or 4 bytes,
//!    independent of the host byte order.
//! 3. **Frame Access:** Whole-frame views used for paging, swapping and
//!    segment loading.
//!
//! Callers pass addresses produced by the MMU, which never names a frame
//! beyond the end of memory; out-of-range accesses read as zero and writes
//! are dropped.

use crate::common::{AccessSize, PhysAddr};

/// The machine's physical memory.
#[derive(Clone)]
pub struct PhysicalMemory {
    bytes: Vec<u8>,
    page_size: usize,
}

impl PhysicalMemory {
    /// Creates zeroed memory of `num_frames` frames of `page_size` bytes.
    ///
    /// The geometry must already have passed [`crate::config::Config::validate`].
    pub fn new(page_size: u32, num_frames: u32) -> Self {
        Self {
            bytes: vec![0; page_size as usize * num_frames as usize],
            page_size: page_size as usize,
        }
    }

    /// Size in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns `true` for zero-sized memory.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Reads a little-endian value of `size` bytes, zero-extended.
    pub fn read(&self, addr: PhysAddr, size: AccessSize) -> u32 {
        let start = addr.index();
        let len = size.bytes() as usize;
        let Some(bytes) = self.bytes.get(start..start + len) else {
            return 0;
        };
        bytes
            .iter()
            .rev()
            .fold(0u32, |acc, &b| (acc << 8) | u32::from(b))
    }

    /// Writes the low `size` bytes of `value` in little-endian order.
    pub fn write(&mut self, addr: PhysAddr, size: AccessSize, value: u32) {
        let start = addr.index();
        let len = size.bytes() as usize;
        let le = value.to_le_bytes();
        if let Some(dst) = self.bytes.get_mut(start..start + len) {
            dst.copy_from_slice(&le[..len]);
        }
    }

    /// Returns the bytes of frame `frame`.
    pub fn frame(&self, frame: u32) -> &[u8] {
        let start = frame as usize * self.page_size;
        self.bytes
            .get(start..start + self.page_size)
            .unwrap_or_default()
    }

    /// Returns the bytes of frame `frame` for writing.
    pub fn frame_mut(&mut self, frame: u32) -> &mut [u8] {
        let start = frame as usize * self.page_size;
        self.bytes
            .get_mut(start..start + self.page_size)
            .unwrap_or_default()
    }

    /// Clears frame `frame` to zero.
    pub fn zero_frame(&mut self, frame: u32) {
        self.frame_mut(frame).fill(0);
    }

    /// Returns all of memory.
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }
}

impl std::fmt::Debug for PhysicalMemory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhysicalMemory")
            .field("size", &self.bytes.len())
            .field("page_size", &self.page_size)
            .finish()
    }
}
