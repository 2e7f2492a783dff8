//! NOFF Program Image Header.
//!
//! A NOFF image starts with a fixed magic number followed by three segment
//! descriptors (code, initialised data, uninitialised data), each made of three
//! 32-bit words: virtual address, file offset and size. All words are stored
//! little-endian; an image whose magic only matches after a byte swap was
//! written on a big-endian host and has every header word swapped.
//!
//! The uninitialised-data segment has no bytes in the file.

use crate::common::LoadError;
use crate::vm::store::BackingStore;

/// Magic number at offset 0 of every NOFF image.
pub const NOFF_MAGIC: u32 = 0x00ba_dfad;

/// One segment descriptor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Segment {
    /// First virtual address of the segment.
    pub virtual_addr: u32,
    /// Offset of the segment's bytes in the image file.
    pub in_file_addr: u32,
    /// Length in bytes.
    pub size: u32,
}

impl Segment {
    /// One past the last virtual address of the segment.
    pub fn end(&self) -> u32 {
        self.virtual_addr.saturating_add(self.size)
    }

    /// Returns `true` if `vaddr` lies inside the segment.
    pub fn contains(&self, vaddr: u32) -> bool {
        self.size > 0 && vaddr >= self.virtual_addr && vaddr < self.end()
    }

    fn decode(words: &[u32], name: &'static str) -> Result<Self, LoadError> {
        let [virtual_addr, in_file_addr, size] = [words[0], words[1], words[2]];
        // Fields are signed ints on disk.
        let negative = [virtual_addr, in_file_addr, size]
            .iter()
            .any(|&w| (w as i32) < 0);
        if negative
            || virtual_addr.checked_add(size).is_none()
            || in_file_addr.checked_add(size).is_none()
        {
            return Err(LoadError::BadSegment { segment: name });
        }
        Ok(Self {
            virtual_addr,
            in_file_addr,
            size,
        })
    }
}

/// Parsed NOFF header.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NoffHeader {
    /// Program text.
    pub code: Segment,
    /// Initialised data.
    pub init_data: Segment,
    /// Uninitialised data, zero-filled on load.
    pub uninit_data: Segment,
}

impl NoffHeader {
    /// Size of the on-disk header in bytes.
    pub const SIZE: usize = 40;

    /// Parses a header from the first [`NoffHeader::SIZE`] bytes of `bytes`.
    ///
    /// # Errors
    ///
    /// [`LoadError::Truncated`] for short input, [`LoadError::BadMagic`] when
    /// the magic matches in neither byte order, [`LoadError::BadSegment`] for
    /// a negative or overflowing descriptor.
    pub fn parse(bytes: &[u8]) -> Result<Self, LoadError> {
        if bytes.len() < Self::SIZE {
            return Err(LoadError::Truncated {
                needed: Self::SIZE,
                got: bytes.len(),
            });
        }
        let mut words = [0u32; Self::SIZE / 4];
        for (word, chunk) in words.iter_mut().zip(bytes.chunks_exact(4)) {
            *word = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        }

        if words[0] != NOFF_MAGIC {
            if words[0].swap_bytes() != NOFF_MAGIC {
                return Err(LoadError::BadMagic(words[0]));
            }
            for word in &mut words {
                *word = word.swap_bytes();
            }
        }

        Ok(Self {
            code: Segment::decode(&words[1..4], "code")?,
            init_data: Segment::decode(&words[4..7], "initData")?,
            uninit_data: Segment::decode(&words[7..10], "uninitData")?,
        })
    }

    /// Reads and parses the header at offset 0 of `store`.
    ///
    /// # Errors
    ///
    /// As [`NoffHeader::parse`], or the I/O failure.
    pub fn read_from(store: &mut dyn BackingStore) -> Result<Self, LoadError> {
        let mut buf = [0u8; Self::SIZE];
        let mut got = 0;
        while got < Self::SIZE {
            let n = store.read_at(&mut buf[got..], got as u64)?;
            if n == 0 {
                return Err(LoadError::Truncated {
                    needed: Self::SIZE,
                    got,
                });
            }
            got += n;
        }
        Self::parse(&buf)
    }

    /// Encodes the header little-endian.
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let words = [
            NOFF_MAGIC,
            self.code.virtual_addr,
            self.code.in_file_addr,
            self.code.size,
            self.init_data.virtual_addr,
            self.init_data.in_file_addr,
            self.init_data.size,
            self.uninit_data.virtual_addr,
            self.uninit_data.in_file_addr,
            self.uninit_data.size,
        ];
        let mut out = [0u8; Self::SIZE];
        for (chunk, word) in out.chunks_exact_mut(4).zip(words) {
            chunk.copy_from_slice(&word.to_le_bytes());
        }
        out
    }
}
