use mipsim_core::isa::disasm::disassemble;
use pretty_assertions::assert_eq;
use rstest::rstest;

use crate::common::builder::instruction::*;

#[rstest]
#[case(nop(), "nop")]
#[case(addu(reg::V0, reg::A0, reg::T0), "addu v0, a0, t0")]
#[case(addiu(reg::SP, reg::SP, -16), "addiu sp, sp, -16")]
#[case(ori(reg::T0, reg::ZERO, 0xff), "ori t0, zero, 0xff")]
#[case(lui(reg::T1, 0x8000), "lui t1, 0x8000")]
#[case(lw(reg::T0, reg::SP, 4), "lw t0, 4(sp)")]
#[case(sb(reg::T0, reg::A0, -1), "sb t0, -1(a0)")]
#[case(beq(reg::T0, reg::T1, -2), "beq t0, t1, -8")]
#[case(bgezal(reg::A0, 3), "bgezal a0, 12")]
#[case(jal(0x400), "jal 0x400")]
#[case(jr(reg::RA), "jr ra")]
#[case(mult(reg::T0, reg::T1), "mult t0, t1")]
#[case(sll(reg::T0, reg::T1, 2), "sll t0, t1, 2")]
#[case(syscall(), "syscall")]
fn formats_mnemonics(#[case] raw: u32, #[case] text: &str) {
    assert_eq!(disassemble(raw), text);
}

#[test]
fn unknown_encoding() {
    assert_eq!(disassemble(brk()), "unknown");
}
