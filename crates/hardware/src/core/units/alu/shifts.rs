//! ALU shift operations.
//!
//! Implements shift-left logical (SLL), shift-right logical (SRL), and
//! shift-right arithmetic (SRA). Only the low five bits of the amount are used,
//! for both the constant and the variable forms.

/// Bit mask for the shift amount (5 bits: 0-31).
const SHAMT_MASK: u32 = 0x1f;

/// Shift direction and fill.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShiftOp {
    /// Shift left logical.
    Sll,
    /// Shift right logical.
    Srl,
    /// Shift right arithmetic.
    Sra,
}

/// Shifts `a` by the low five bits of `b`.
pub fn execute(op: ShiftOp, a: u32, b: u32) -> u32 {
    let sh = b & SHAMT_MASK;
    match op {
        ShiftOp::Sll => a << sh,
        ShiftOp::Srl => a >> sh,
        ShiftOp::Sra => ((a as i32) >> sh) as u32,
    }
}
