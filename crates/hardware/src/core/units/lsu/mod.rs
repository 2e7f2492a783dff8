//! Load/Store Unit (LSU).
//!
//! This module provides the data-path helpers for memory instructions:
//! - Width and extension of ordinary loads (`lb`, `lbu`, `lh`, `lhu`, `lw`).
//! - [`unaligned`]: the partial-word merges of `lwl`, `lwr`, `swl` and `swr`.
//!
//! Translation and the memory access itself are done by the machine; the LSU
//! only shapes values.

/// Partial-word merges for the unaligned load/store instructions.
pub mod unaligned;

use crate::common::data::AccessSize;
use crate::isa::instruction::Op;

/// Load/Store Unit for memory operations.
#[derive(Debug)]
pub struct Lsu;

impl Lsu {
    /// Returns the access width and signedness of an ordinary load.
    ///
    /// `None` for opcodes that are not aligned loads.
    pub fn load_shape(op: Op) -> Option<(AccessSize, bool)> {
        match op {
            Op::Lb => Some((AccessSize::Byte, true)),
            Op::Lbu => Some((AccessSize::Byte, false)),
            Op::Lh => Some((AccessSize::Half, true)),
            Op::Lhu => Some((AccessSize::Half, false)),
            Op::Lw => Some((AccessSize::Word, false)),
            _ => None,
        }
    }

    /// Returns the access width of an ordinary store.
    pub fn store_size(op: Op) -> Option<AccessSize> {
        match op {
            Op::Sb => Some(AccessSize::Byte),
            Op::Sh => Some(AccessSize::Half),
            Op::Sw => Some(AccessSize::Word),
            _ => None,
        }
    }

    /// Sign- or zero-extends a raw loaded value to a full word.
    ///
    /// # Examples
    ///
    /// ```
    /// use mipsim_core::core::units::lsu::Lsu;
    /// use mipsim_core::common::AccessSize;
    ///
    /// assert_eq!(Lsu::extend(0x80, AccessSize::Byte, true), 0xffff_ff80);
    /// assert_eq!(Lsu::extend(0x80, AccessSize::Byte, false), 0x80);
    /// assert_eq!(Lsu::extend(0x8000, AccessSize::Half, true), 0xffff_8000);
    /// ```
    pub fn extend(value: u32, size: AccessSize, signed: bool) -> u32 {
        match (size, signed) {
            (AccessSize::Byte, true) => i32::from(value as u8 as i8) as u32,
            (AccessSize::Byte, false) => value & 0xff,
            (AccessSize::Half, true) => i32::from(value as u16 as i16) as u32,
            (AccessSize::Half, false) => value & 0xffff,
            (AccessSize::Word, _) => value,
        }
    }
}
