//! Memory Access Widths.
//!
//! The machine performs 1-, 2- and 4-byte accesses. The width decides the
//! alignment rule enforced during translation and how many bytes of main
//! memory are touched.

use crate::common::error::Exception;

/// Width of a memory access.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccessSize {
    /// One byte; never misaligned.
    Byte,
    /// Two bytes; must be 2-byte aligned.
    Half,
    /// Four bytes; must be 4-byte aligned.
    Word,
}

impl AccessSize {
    /// Returns the number of bytes covered by this access.
    #[inline]
    pub fn bytes(self) -> u32 {
        match self {
            Self::Byte => 1,
            Self::Half => 2,
            Self::Word => 4,
        }
    }

    /// Returns `true` if `addr` is naturally aligned for this width.
    #[inline]
    pub fn is_aligned(self, addr: u32) -> bool {
        addr & (self.bytes() - 1) == 0
    }

    /// Converts a byte count of 1, 2 or 4 into an access width.
    ///
    /// # Errors
    ///
    /// [`Exception::AddressError`] at `addr` for any other count.
    pub fn from_bytes(bytes: u32, addr: u32) -> Result<Self, Exception> {
        match bytes {
            1 => Ok(Self::Byte),
            2 => Ok(Self::Half),
            4 => Ok(Self::Word),
            _ => Err(Exception::AddressError(addr)),
        }
    }
}
