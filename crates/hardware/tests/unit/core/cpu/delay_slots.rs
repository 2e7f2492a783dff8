//! Branch Delay Slot Tests.
//!
//! For every branch and jump, the instruction after it runs exactly once
//! before the target, and the instruction after the delay slot is skipped
//! when the transfer is taken.

use mipsim_core::common::Exception;
use mipsim_core::core::units::mmu::entry::TranslationEntry;
use pretty_assertions::assert_eq;
use rstest::rstest;

use crate::common::builder::instruction::*;
use crate::common::harness::TestContext;

const TARGET: u32 = 0x40;
/// Branch offset from the delay slot at 4 to `TARGET`, in instructions.
const OFFSET: i32 = (TARGET as i32 - 4) / 4;

/// Runs `branch` at 0 with `setup` applied and checks the delay slot ran once
/// and the fall-through instruction did not.
fn taken(branch: u32, setup: impl FnOnce(&mut TestContext)) -> TestContext {
    let mut tc = TestContext::new().load_program(
        0,
        &[
            branch,
            addiu(reg::S0, reg::S0, 1),
            addiu(reg::S0, reg::S0, 100),
        ],
    );
    tc.write_word(TARGET, addiu(reg::T3, reg::ZERO, 7));
    setup(&mut tc);

    tc.run(1);
    assert_eq!(tc.pc(), 4, "branch must not redirect before its delay slot");
    assert_eq!(tc.machine.regs.next_pc(), TARGET);
    tc.run(1);
    assert_eq!(tc.get_reg(reg::S0), 1, "delay slot runs exactly once");
    assert_eq!(tc.pc(), TARGET);
    tc.run(1);
    assert_eq!(tc.get_reg(reg::T3), 7);
    assert_eq!(tc.get_reg(reg::S0), 1);
    tc
}

#[rstest]
#[case::beq(beq(reg::T0, reg::T1, OFFSET), 5, 5)]
#[case::bne(bne(reg::T0, reg::T1, OFFSET), 5, 6)]
#[case::blez_zero(blez(reg::T0, OFFSET), 0, 0)]
#[case::blez_negative(blez(reg::T0, OFFSET), -1i32 as u32, 0)]
#[case::bgtz(bgtz(reg::T0, OFFSET), 1, 0)]
#[case::bltz(bltz(reg::T0, OFFSET), 0x8000_0000, 0)]
#[case::bgez(bgez(reg::T0, OFFSET), 0, 0)]
fn conditional_branches(#[case] branch: u32, #[case] t0: u32, #[case] t1: u32) {
    let _ = taken(branch, |tc| {
        tc.set_reg(reg::T0, t0);
        tc.set_reg(reg::T1, t1);
    });
}

#[rstest]
#[case::bltzal(bltzal(reg::T0, OFFSET), -4i32 as u32)]
#[case::bgezal(bgezal(reg::T0, OFFSET), 4)]
fn linking_branches_set_ra_past_the_delay_slot(#[case] branch: u32, #[case] t0: u32) {
    let tc = taken(branch, |tc| tc.set_reg(reg::T0, t0));
    assert_eq!(tc.get_reg(reg::RA), 8);
}

#[test]
fn linking_branch_not_taken_still_links() {
    let mut tc = TestContext::new().load_program(0, &[bgezal(reg::T0, OFFSET), nop()]);
    tc.set_reg(reg::T0, -1i32 as u32);
    tc.run(2);
    assert_eq!(tc.get_reg(reg::RA), 8);
    assert_eq!(tc.pc(), 8);
}

#[test]
fn jump() {
    let _ = taken(j(TARGET), |_| {});
}

#[test]
fn jump_and_link() {
    let tc = taken(jal(TARGET), |_| {});
    assert_eq!(tc.get_reg(reg::RA), 8);
}

#[test]
fn jump_register() {
    let _ = taken(jr(reg::T0), |tc| tc.set_reg(reg::T0, TARGET));
}

#[test]
fn jump_and_link_register() {
    let tc = taken(jalr(reg::RA, reg::T0), |tc| tc.set_reg(reg::T0, TARGET));
    assert_eq!(tc.get_reg(reg::RA), 8);
}

#[test]
fn untaken_branch_falls_through() {
    let mut tc = TestContext::new().load_program(
        0,
        &[
            beq(reg::T0, reg::T1, OFFSET),
            addiu(reg::S0, reg::S0, 1),
            addiu(reg::S0, reg::S0, 100),
        ],
    );
    tc.set_reg(reg::T1, 1);
    tc.run(3);
    assert_eq!(tc.get_reg(reg::S0), 101);
    assert_eq!(tc.pc(), 12);
}

#[test]
fn backward_branch_loop() {
    // t0 = 3; loop: t0 -= 1; bne t0, zero, loop; s0 += 1 (delay slot)
    let mut tc = TestContext::new().load_program(
        0,
        &[
            addiu(reg::T0, reg::ZERO, 3),
            addiu(reg::T0, reg::T0, -1),
            bne(reg::T0, reg::ZERO, -2),
            addiu(reg::S0, reg::S0, 1),
            nop(),
        ],
    );
    tc.run(1 + 3 * 3);
    assert_eq!(tc.get_reg(reg::T0), 0);
    assert_eq!(tc.get_reg(reg::S0), 3);
    assert_eq!(tc.pc(), 16);
}

#[test]
fn fault_in_delay_slot_keeps_the_branch_target() {
    let mut tc = TestContext::new().load_program(
        0,
        &[j(TARGET), sw(reg::T0, reg::ZERO, 0x200)],
    );
    tc.write_word(TARGET, addiu(reg::T3, reg::ZERO, 7));
    let entry = TranslationEntry::mapped(4, 4);
    tc.table.set(4, TranslationEntry {
        read_only: true,
        ..entry
    });

    tc.run(1);
    assert_eq!(tc.step(), Err(Exception::ReadOnly(0x200)));
    assert_eq!((tc.pc(), tc.machine.regs.next_pc()), (4, TARGET));

    tc.table.set(4, entry);
    tc.run(2);
    assert_eq!(tc.get_reg(reg::T3), 7);
}
