//! ALU arithmetic operations.
//!
//! Implements addition and subtraction with and without signed-overflow
//! traps, the double-width multiply and the divide that fill `HI`/`LO`.

use crate::common::constants::SIGN_BIT;
use crate::common::error::Exception;

/// Add and subtract, with and without the overflow trap.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArithOp {
    /// Signed add, traps on overflow.
    Add,
    /// Wrapping add.
    Addu,
    /// Signed subtract, traps on overflow.
    Sub,
    /// Wrapping subtract.
    Subu,
}

/// Executes an add or subtract.
///
/// # Errors
///
/// [`Exception::Overflow`] from `Add`/`Sub` when the signed result overflows.
pub fn execute(op: ArithOp, a: u32, b: u32) -> Result<u32, Exception> {
    match op {
        ArithOp::Add => add_checked(a, b),
        ArithOp::Addu => Ok(a.wrapping_add(b)),
        ArithOp::Sub => sub_checked(a, b),
        ArithOp::Subu => Ok(a.wrapping_sub(b)),
    }
}

/// Signed add that traps when both operands share a sign the sum does not.
///
/// # Errors
///
/// [`Exception::Overflow`] on signed overflow.
pub fn add_checked(a: u32, b: u32) -> Result<u32, Exception> {
    let sum = a.wrapping_add(b);
    if (a ^ b) & SIGN_BIT == 0 && (a ^ sum) & SIGN_BIT != 0 {
        return Err(Exception::Overflow);
    }
    Ok(sum)
}

/// Signed subtract that traps when operands of different sign produce a
/// difference whose sign differs from the minuend.
///
/// # Errors
///
/// [`Exception::Overflow`] on signed overflow.
pub fn sub_checked(a: u32, b: u32) -> Result<u32, Exception> {
    let diff = a.wrapping_sub(b);
    if (a ^ b) & SIGN_BIT != 0 && (a ^ diff) & SIGN_BIT != 0 {
        return Err(Exception::Overflow);
    }
    Ok(diff)
}

/// Multiplies two words into a 64-bit `(hi, lo)` pair.
///
/// The magnitudes are multiplied with a shift-and-add loop over 32-bit
/// halves; a signed product with operands of opposite sign is then negated
/// as a two's-complement pair.
pub fn multiply(a: u32, b: u32, signed: bool) -> (u32, u32) {
    if !signed {
        return multiply_unsigned(a, b);
    }
    let (sa, sb) = (a as i32, b as i32);
    let negative = (sa < 0) != (sb < 0);
    let (hi, lo) = multiply_unsigned(sa.unsigned_abs(), sb.unsigned_abs());
    if negative { negate_pair(hi, lo) } else { (hi, lo) }
}

fn multiply_unsigned(a: u32, mut b: u32) -> (u32, u32) {
    let (mut hi, mut lo) = (0u32, 0u32);
    let (mut m_hi, mut m_lo) = (0u32, a);
    while b != 0 {
        if b & 1 != 0 {
            let (sum, carry) = lo.overflowing_add(m_lo);
            lo = sum;
            hi = hi.wrapping_add(m_hi).wrapping_add(u32::from(carry));
        }
        m_hi = (m_hi << 1) | (m_lo >> 31);
        m_lo <<= 1;
        b >>= 1;
    }
    (hi, lo)
}

fn negate_pair(hi: u32, lo: u32) -> (u32, u32) {
    let lo = (!lo).wrapping_add(1);
    let hi = (!hi).wrapping_add(u32::from(lo == 0));
    (hi, lo)
}

/// Divides `a` by `b`, returning `(hi, lo)` = (remainder, quotient).
///
/// A zero divisor yields `(0, 0)` without trapping. The signed case wraps
/// for `i32::MIN / -1`.
pub fn divide(a: u32, b: u32, signed: bool) -> (u32, u32) {
    if b == 0 {
        return (0, 0);
    }
    if signed {
        let (sa, sb) = (a as i32, b as i32);
        (sa.wrapping_rem(sb) as u32, sa.wrapping_div(sb) as u32)
    } else {
        (a % b, a / b)
    }
}
