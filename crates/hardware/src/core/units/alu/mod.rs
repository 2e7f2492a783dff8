//! Arithmetic Logic Unit (ALU).
//!
//! This module implements the integer ALU used by the execution engine.
//! All operands and results are raw 32-bit words; signedness belongs to the
//! operation.
//!
//! Operations are organized into submodules by category:
//! - [`arithmetic`]: Add, Sub (overflow-checked and wrapping), Mult, Div
//! - [`logic`]:      And, Or, Xor, Nor, Slt, Sltu
//! - [`shifts`]:     Sll, Srl, Sra

/// Integer arithmetic operations (add, subtract, multiply, divide).
pub mod arithmetic;

/// Bitwise logical and comparison operations.
pub mod logic;

/// Shift operations.
pub mod shifts;

use self::arithmetic::ArithOp;
use self::logic::LogicOp;
use self::shifts::ShiftOp;
use crate::common::error::Exception;

/// Single-result ALU operation selector.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AluOp {
    /// Signed add, traps on overflow.
    Add,
    /// Wrapping add.
    Addu,
    /// Signed subtract, traps on overflow.
    Sub,
    /// Wrapping subtract.
    Subu,
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
    /// Shift left logical.
    Sll,
    /// Shift right logical.
    Srl,
    /// Shift right arithmetic.
    Sra,
}

/// Arithmetic Logic Unit for integer operations.
///
/// Multiply and divide produce a `HI`/`LO` pair and live in
/// [`arithmetic::multiply`] and [`arithmetic::divide`].
#[derive(Debug)]
pub struct Alu;

impl Alu {
    /// Executes a single-result ALU operation.
    ///
    /// For shifts, `a` is the value and the low five bits of `b` the amount.
    ///
    /// # Errors
    ///
    /// [`Exception::Overflow`] for `Add`/`Sub` whose signed result does not fit.
    ///
    /// # Examples
    ///
    /// ```
    /// use mipsim_core::core::units::alu::{Alu, AluOp};
    /// use mipsim_core::common::Exception;
    ///
    /// assert_eq!(Alu::execute(AluOp::Addu, 0x7fff_ffff, 1), Ok(0x8000_0000));
    /// assert_eq!(Alu::execute(AluOp::Add, 0x7fff_ffff, 1), Err(Exception::Overflow));
    /// assert_eq!(Alu::execute(AluOp::Sra, 0x8000_0000, 4), Ok(0xf800_0000));
    /// assert_eq!(Alu::execute(AluOp::Slt, -5_i32 as u32, 10), Ok(1));
    /// ```
    pub fn execute(op: AluOp, a: u32, b: u32) -> Result<u32, Exception> {
        match op {
            AluOp::Add => arithmetic::execute(ArithOp::Add, a, b),
            AluOp::Addu => arithmetic::execute(ArithOp::Addu, a, b),
            AluOp::Sub => arithmetic::execute(ArithOp::Sub, a, b),
            AluOp::Subu => arithmetic::execute(ArithOp::Subu, a, b),
            AluOp::And => Ok(logic::execute(LogicOp::And, a, b)),
            AluOp::Or => Ok(logic::execute(LogicOp::Or, a, b)),
            AluOp::Xor => Ok(logic::execute(LogicOp::Xor, a, b)),
            AluOp::Nor => Ok(logic::execute(LogicOp::Nor, a, b)),
            AluOp::Slt => Ok(logic::execute(LogicOp::Slt, a, b)),
            AluOp::Sltu => Ok(logic::execute(LogicOp::Sltu, a, b)),
            AluOp::Sll => Ok(shifts::execute(ShiftOp::Sll, a, b)),
            AluOp::Srl => Ok(shifts::execute(ShiftOp::Srl, a, b)),
            AluOp::Sra => Ok(shifts::execute(ShiftOp::Sra, a, b)),
        }
    }
}
