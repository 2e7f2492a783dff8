//! ALU logical and comparison operations.

/// Bitwise and set-on-less-than operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogicOp {
    /// Bitwise and.
    And,
    /// Bitwise or.
    Or,
    /// Bitwise xor.
    Xor,
    /// Bitwise nor.
    Nor,
    /// Signed set-on-less-than.
    Slt,
    /// Unsigned set-on-less-than.
    Sltu,
}

/// Executes a bitwise or comparison operation.
///
/// Comparisons return `1` or `0`.
pub fn execute(op: LogicOp, a: u32, b: u32) -> u32 {
    match op {
        LogicOp::And => a & b,
        LogicOp::Or => a | b,
        LogicOp::Xor => a ^ b,
        LogicOp::Nor => !(a | b),
        LogicOp::Slt => u32::from((a as i32) < (b as i32)),
        LogicOp::Sltu => u32::from(a < b),
    }
}
