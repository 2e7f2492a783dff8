//! Unaligned word access merging.
//!
//! `lwl`/`lwr` combine part of the aligned memory word containing the address
//! with the current (or pending delayed-load) value of the target register;
//! `swl`/`swr` combine part of the register with the aligned memory word and
//! store it back. The case is selected by the low two bits of the address.

/// Mask selecting the byte offset within a word.
const BYTE_OFFSET_MASK: u32 = 0x3;

/// Returns the word-aligned address containing `addr`.
#[inline]
pub fn aligned(addr: u32) -> u32 {
    addr & !BYTE_OFFSET_MASK
}

/// Merges the aligned memory word `mem` into `old` for `lwl`.
pub fn load_left(addr: u32, mem: u32, old: u32) -> u32 {
    match addr & BYTE_OFFSET_MASK {
        0 => mem,
        1 => (old & 0xff) | (mem << 8),
        2 => (old & 0xffff) | (mem << 16),
        _ => (old & 0x00ff_ffff) | (mem << 24),
    }
}

/// Merges the aligned memory word `mem` into `old` for `lwr`.
pub fn load_right(addr: u32, mem: u32, old: u32) -> u32 {
    match addr & BYTE_OFFSET_MASK {
        0 => (old & 0xffff_ff00) | ((mem >> 24) & 0xff),
        1 => (old & 0xffff_0000) | ((mem >> 16) & 0xffff),
        2 => (old & 0xff00_0000) | ((mem >> 8) & 0x00ff_ffff),
        _ => mem,
    }
}

/// Returns the word `swl` writes back, given the aligned memory word `mem`.
pub fn store_left(addr: u32, mem: u32, reg: u32) -> u32 {
    match addr & BYTE_OFFSET_MASK {
        0 => reg,
        1 => (mem & 0xff00_0000) | ((reg >> 8) & 0x00ff_ffff),
        2 => (mem & 0xffff_0000) | ((reg >> 16) & 0xffff),
        _ => (mem & 0xffff_ff00) | ((reg >> 24) & 0xff),
    }
}

/// Returns the word `swr` writes back, given the aligned memory word `mem`.
pub fn store_right(addr: u32, mem: u32, reg: u32) -> u32 {
    match addr & BYTE_OFFSET_MASK {
        0 => (mem & 0x00ff_ffff) | (reg << 24),
        1 => (mem & 0xffff) | (reg << 16),
        2 => (mem & 0xff) | (reg << 8),
        _ => reg,
    }
}
