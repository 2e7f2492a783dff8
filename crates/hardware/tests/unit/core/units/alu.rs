//! ALU Tests.
//!
//! Overflow detection for the trapping adds and subtracts, and the
//! multiply/divide pairs checked against native 64-bit oracles.

use mipsim_core::common::Exception;
use mipsim_core::core::units::alu::arithmetic::{self, ArithOp, divide, multiply};
use mipsim_core::core::units::alu::logic::{self, LogicOp};
use mipsim_core::core::units::alu::shifts::{self, ShiftOp};
use mipsim_core::core::units::alu::{Alu, AluOp};
use proptest::prelude::*;
use rstest::rstest;

// ─── Boundary operands ──────────────────────────────────────────────────────

const ZERO: u32 = 0;
const ONE: u32 = 1;
const NEG1: u32 = u32::MAX;
const I32_MIN: u32 = 0x8000_0000;
const I32_MAX: u32 = 0x7FFF_FFFF;

fn mult_oracle(a: u32, b: u32) -> (u32, u32) {
    let p = i64::from(a as i32) * i64::from(b as i32);
    ((p >> 32) as u32, p as u32)
}

fn multu_oracle(a: u32, b: u32) -> (u32, u32) {
    let p = u64::from(a) * u64::from(b);
    ((p >> 32) as u32, p as u32)
}

// ═════════════════════════════════════════════════════════════════════════════
//  ADD / SUB overflow
// ═════════════════════════════════════════════════════════════════════════════

#[rstest]
#[case(I32_MAX, ONE)]
#[case(I32_MIN, NEG1)]
#[case(I32_MIN, I32_MIN)]
#[case(I32_MAX, I32_MAX)]
fn add_overflows(#[case] a: u32, #[case] b: u32) {
    assert_eq!(Alu::execute(AluOp::Add, a, b), Err(Exception::Overflow));
    assert_eq!(Alu::execute(AluOp::Addu, a, b), Ok(a.wrapping_add(b)));
}

#[rstest]
#[case(I32_MAX, NEG1, I32_MAX - 1)]
#[case(I32_MIN, I32_MAX, NEG1)]
#[case(NEG1, ONE, ZERO)]
#[case(ZERO, ZERO, ZERO)]
fn add_without_overflow(#[case] a: u32, #[case] b: u32, #[case] sum: u32) {
    assert_eq!(Alu::execute(AluOp::Add, a, b), Ok(sum));
}

#[rstest]
#[case(I32_MIN, ONE)]
#[case(I32_MAX, NEG1)]
#[case(ZERO, I32_MIN)]
fn sub_overflows(#[case] a: u32, #[case] b: u32) {
    assert_eq!(Alu::execute(AluOp::Sub, a, b), Err(Exception::Overflow));
    assert_eq!(Alu::execute(AluOp::Subu, a, b), Ok(a.wrapping_sub(b)));
}

proptest! {
    #[test]
    fn add_traps_exactly_on_signed_overflow(a in any::<u32>(), b in any::<u32>()) {
        let overflows = (a as i32).checked_add(b as i32).is_none();
        let result = Alu::execute(AluOp::Add, a, b);
        prop_assert_eq!(result.is_err(), overflows);
        prop_assert_eq!(Alu::execute(AluOp::Addu, a, b), Ok(a.wrapping_add(b)));
    }
}

// ═════════════════════════════════════════════════════════════════════════════
//  Logic and shifts
// ═════════════════════════════════════════════════════════════════════════════

#[rstest]
#[case(AluOp::And, 0x0F0F_0000, 0x00FF_0000, 0x000F_0000)]
#[case(AluOp::Or, 0x0F0F_0000, 0x00FF_0000, 0x0FFF_0000)]
#[case(AluOp::Xor, 0x0F0F_0000, 0x00FF_0000, 0x0FF0_0000)]
#[case(AluOp::Nor, 0x0F0F_0000, 0x00FF_0000, 0xF000_FFFF)]
#[case(AluOp::Slt, NEG1, ZERO, 1)]
#[case(AluOp::Sltu, NEG1, ZERO, 0)]
#[case(AluOp::Srl, I32_MIN, 31, 1)]
#[case(AluOp::Sra, I32_MIN, 31, NEG1)]
#[case(AluOp::Sll, ONE, 33, 2)]
fn logic_and_shift_cases(#[case] op: AluOp, #[case] a: u32, #[case] b: u32, #[case] want: u32) {
    assert_eq!(Alu::execute(op, a, b), Ok(want));
}

#[test]
fn every_op_matches_its_category_executor() {
    let (a, b) = (0x8765_4321, 0x1234_5678);
    let routes = [
        (AluOp::Add, arithmetic::execute(ArithOp::Add, a, b)),
        (AluOp::Addu, arithmetic::execute(ArithOp::Addu, a, b)),
        (AluOp::Sub, arithmetic::execute(ArithOp::Sub, a, b)),
        (AluOp::Subu, arithmetic::execute(ArithOp::Subu, a, b)),
        (AluOp::And, Ok(logic::execute(LogicOp::And, a, b))),
        (AluOp::Or, Ok(logic::execute(LogicOp::Or, a, b))),
        (AluOp::Xor, Ok(logic::execute(LogicOp::Xor, a, b))),
        (AluOp::Nor, Ok(logic::execute(LogicOp::Nor, a, b))),
        (AluOp::Slt, Ok(logic::execute(LogicOp::Slt, a, b))),
        (AluOp::Sltu, Ok(logic::execute(LogicOp::Sltu, a, b))),
        (AluOp::Sll, Ok(shifts::execute(ShiftOp::Sll, a, b))),
        (AluOp::Srl, Ok(shifts::execute(ShiftOp::Srl, a, b))),
        (AluOp::Sra, Ok(shifts::execute(ShiftOp::Sra, a, b))),
    ];
    for (op, want) in routes {
        assert_eq!(Alu::execute(op, a, b), want, "{op:?}");
    }
    assert_eq!(shifts::execute(ShiftOp::Sll, 1, 0x38), 1 << 24);
    assert_eq!(logic::execute(LogicOp::Slt, a, b), 1);
    assert_eq!(logic::execute(LogicOp::Sltu, a, b), 0);
}

// ═════════════════════════════════════════════════════════════════════════════
//  MULT / MULTU
// ═════════════════════════════════════════════════════════════════════════════

#[rstest]
fn multiply_boundaries_match_native(
    #[values(ZERO, ONE, NEG1, I32_MIN, I32_MAX)] a: u32,
    #[values(ZERO, ONE, NEG1, I32_MIN, I32_MAX)] b: u32,
) {
    assert_eq!(multiply(a, b, true), mult_oracle(a, b), "mult {a:#x} {b:#x}");
    assert_eq!(multiply(a, b, false), multu_oracle(a, b), "multu {a:#x} {b:#x}");
}

proptest! {
    #[test]
    fn multiply_matches_native(a in any::<u32>(), b in any::<u32>()) {
        prop_assert_eq!(multiply(a, b, true), mult_oracle(a, b));
        prop_assert_eq!(multiply(a, b, false), multu_oracle(a, b));
    }
}

// ═════════════════════════════════════════════════════════════════════════════
//  DIV / DIVU
// ═════════════════════════════════════════════════════════════════════════════

#[test]
fn divide_by_zero_clears_hi_lo() {
    assert_eq!(divide(1234, 0, true), (0, 0));
    assert_eq!(divide(1234, 0, false), (0, 0));
}

#[test]
fn signed_divide_truncates_toward_zero() {
    let (hi, lo) = divide(-7i32 as u32, 2, true);
    assert_eq!(lo as i32, -3);
    assert_eq!(hi as i32, -1);
}

#[test]
fn int_min_over_minus_one_wraps() {
    assert_eq!(divide(I32_MIN, NEG1, true), (0, I32_MIN));
}

proptest! {
    #[test]
    fn divu_reconstructs_dividend(a in any::<u32>(), b in 1u32..) {
        let (hi, lo) = divide(a, b, false);
        prop_assert!(hi < b);
        prop_assert_eq!(lo.wrapping_mul(b).wrapping_add(hi), a);
    }

    #[test]
    fn div_reconstructs_dividend(a in any::<i32>(), b in any::<i32>().prop_filter("non-zero", |b| *b != 0)) {
        let (hi, lo) = divide(a as u32, b as u32, true);
        prop_assert_eq!((lo as i32).wrapping_mul(b).wrapping_add(hi as i32), a);
        prop_assert!((hi as i32).unsigned_abs() < b.unsigned_abs());
    }
}
