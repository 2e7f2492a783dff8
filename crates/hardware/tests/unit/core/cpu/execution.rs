//! Execution Engine Tests.
//!
//! Instruction semantics through `one_instruction`, the delayed-load slot, and
//! the guarantee that a faulting instruction changes nothing but the trap state.

use mipsim_core::common::Exception;
use mipsim_core::common::constants::{BAD_VADDR_REG, HI_REG, LO_REG};
use mipsim_core::core::units::mmu::entry::TranslationEntry;
use pretty_assertions::assert_eq;

use crate::common::builder::instruction::*;
use crate::common::harness::TestContext;

const DATA: u32 = 0x200;

#[test]
fn arithmetic_chain() {
    let mut tc = TestContext::new().load_program(
        0,
        &[
            addiu(reg::T0, reg::ZERO, 40),
            addiu(reg::T1, reg::ZERO, -2),
            addu(reg::T2, reg::T0, reg::T1),
            sll(reg::T3, reg::T2, 4),
            sra(reg::T1, reg::T1, 1),
        ],
    );
    tc.run(5);
    assert_eq!(tc.get_reg(reg::T2), 38);
    assert_eq!(tc.get_reg(reg::T3), 38 << 4);
    assert_eq!(tc.get_reg(reg::T1), u32::MAX);
    assert_eq!(tc.pc(), 20);
    assert_eq!(tc.machine.stats.instructions_retired, 5);
}

#[test]
fn load_constant_with_lui_ori() {
    let [hi, lo] = li(reg::T0, 0xDEAD_BEEF);
    let mut tc = TestContext::new().load_program(0, &[hi, lo]);
    tc.run(2);
    assert_eq!(tc.get_reg(reg::T0), 0xDEAD_BEEF);
}

#[test]
fn overflowing_add_commits_nothing() {
    let mut tc = TestContext::new().load_program(0x40, &[add(reg::T2, reg::T0, reg::T1)]);
    tc.set_reg(reg::T0, 0x7FFF_FFFF);
    tc.set_reg(reg::T1, 1);
    tc.set_reg(reg::T2, 0x55);

    assert_eq!(tc.step(), Err(Exception::Overflow));
    assert_eq!(tc.get_reg(reg::T2), 0x55);
    assert_eq!(tc.pc(), 0x40);
    assert_eq!(tc.machine.regs.next_pc(), 0x44);
    assert_eq!(tc.get_reg(BAD_VADDR_REG), 0);
}

#[test]
fn overflowing_addi_and_non_trapping_addiu() {
    let mut tc = TestContext::new().load_program(
        0,
        &[addiu(reg::T1, reg::T0, 1), addi(reg::T2, reg::T0, 1)],
    );
    tc.set_reg(reg::T0, 0x7FFF_FFFF);
    tc.run(1);
    assert_eq!(tc.get_reg(reg::T1), 0x8000_0000);
    assert_eq!(tc.step(), Err(Exception::Overflow));
    assert_eq!(tc.get_reg(reg::T2), 0);
}

#[test]
fn sub_traps_and_subu_wraps() {
    let mut tc = TestContext::new().load_program(
        0,
        &[subu(reg::T2, reg::T0, reg::T1), sub(reg::T3, reg::T0, reg::T1)],
    );
    tc.set_reg(reg::T0, 0x8000_0000);
    tc.set_reg(reg::T1, 1);
    tc.run(1);
    assert_eq!(tc.get_reg(reg::T2), 0x7FFF_FFFF);
    assert_eq!(tc.step(), Err(Exception::Overflow));
}

#[test]
fn mult_and_div_write_hi_lo() {
    let mut tc = TestContext::new().load_program(
        0,
        &[
            mult(reg::T0, reg::T1),
            mfhi(reg::T2),
            mflo(reg::T3),
            div(reg::T0, reg::S0),
            mfhi(reg::A0),
            mflo(reg::V0),
        ],
    );
    tc.set_reg(reg::T0, -7i32 as u32);
    tc.set_reg(reg::T1, 0x1000_0000);
    tc.set_reg(reg::S0, 2);
    tc.run(6);
    let product = -7i64 * 0x1000_0000;
    assert_eq!(tc.get_reg(reg::T2), (product >> 32) as u32);
    assert_eq!(tc.get_reg(reg::T3), product as u32);
    assert_eq!(tc.get_reg(reg::V0) as i32, -3);
    assert_eq!(tc.get_reg(reg::A0) as i32, -1);
}

#[test]
fn divide_by_zero_does_not_trap() {
    let mut tc = TestContext::new().load_program(0, &[divu(reg::T0, reg::ZERO)]);
    tc.set_reg(reg::T0, 99);
    tc.set_reg(HI_REG, 5);
    tc.set_reg(LO_REG, 6);
    tc.run(1);
    assert_eq!((tc.get_reg(HI_REG), tc.get_reg(LO_REG)), (0, 0));
}

#[test]
fn loaded_value_arrives_one_instruction_late() {
    let mut tc = TestContext::new().load_program(
        0,
        &[
            lw(reg::T0, reg::ZERO, DATA as i32),
            addu(reg::T1, reg::T0, reg::ZERO),
            addu(reg::T2, reg::T0, reg::ZERO),
        ],
    );
    tc.write_word(DATA, 0xCAFE);
    tc.set_reg(reg::T0, 1);
    tc.run(3);
    assert_eq!(tc.get_reg(reg::T1), 1);
    assert_eq!(tc.get_reg(reg::T2), 0xCAFE);
}

#[test]
fn byte_and_half_loads_extend() {
    let mut tc = TestContext::new().load_program(
        0,
        &[
            lb(reg::T0, reg::ZERO, DATA as i32),
            lbu(reg::T1, reg::ZERO, DATA as i32),
            lh(reg::T2, reg::ZERO, DATA as i32 + 2),
            nop(),
        ],
    );
    tc.write_word(DATA, 0x8001_00F0);
    tc.run(4);
    assert_eq!(tc.get_reg(reg::T0), 0xFFFF_FFF0);
    assert_eq!(tc.get_reg(reg::T1), 0xF0);
    assert_eq!(tc.get_reg(reg::T2), 0xFFFF_8001);
}

#[test]
fn stores_are_little_endian() {
    let mut tc = TestContext::new().load_program(
        0,
        &[sb(reg::T0, reg::ZERO, DATA as i32 + 1), sw(reg::T1, reg::ZERO, DATA as i32 + 4)],
    );
    tc.set_reg(reg::T0, 0x1234_56AB);
    tc.set_reg(reg::T1, 0x0102_0304);
    tc.run(2);
    assert_eq!(tc.read_word(DATA), 0x0000_AB00);
    assert_eq!(tc.machine.memory.as_slice()[DATA as usize + 4], 0x04);
    assert_eq!(tc.machine.stats.stores, 2);
}

#[test]
fn lwl_merges_with_register() {
    let mut tc = TestContext::new().load_program(0, &[lwl(reg::T0, reg::ZERO, DATA as i32 + 1), nop()]);
    tc.write_word(DATA, 0x4433_2211);
    tc.set_reg(reg::T0, 0xDDCC_BBAA);
    tc.run(2);
    assert_eq!(tc.get_reg(reg::T0), 0x3322_11AA);
}

#[test]
fn lwr_after_lwl_merges_with_pending_value() {
    let mut tc = TestContext::new().load_program(
        0,
        &[
            lwl(reg::T0, reg::ZERO, DATA as i32 + 3),
            lwr(reg::T0, reg::ZERO, DATA as i32 + 4),
            nop(),
        ],
    );
    tc.write_word(DATA, 0x4433_2211);
    tc.write_word(DATA + 4, 0x8877_6655);
    tc.run(3);
    // lwl: 0x11 in the top byte; lwr at offset 0 then fills the low byte from
    // the next word, keeping the pending upper bytes.
    assert_eq!(tc.get_reg(reg::T0), 0x1100_0088);
}

#[test]
fn swr_merges_into_memory() {
    let mut tc = TestContext::new().load_program(0, &[swr(reg::T0, reg::ZERO, DATA as i32 + 1)]);
    tc.write_word(DATA, 0x4433_2211);
    tc.set_reg(reg::T0, 0xDDCC_BBAA);
    tc.run(1);
    assert_eq!(tc.read_word(DATA), 0xBBAA_2211);
}

#[test]
fn misaligned_word_load_is_an_address_error() {
    let mut tc = TestContext::new().load_program(0, &[lw(reg::T0, reg::ZERO, DATA as i32 + 2)]);
    assert_eq!(tc.step(), Err(Exception::AddressError(DATA + 2)));
    assert_eq!(tc.get_reg(BAD_VADDR_REG), DATA + 2);
    assert_eq!(tc.pc(), 0);
}

#[test]
fn faulting_store_leaves_memory_untouched() {
    let mut tc = TestContext::new().load_program(0, &[sw(reg::T0, reg::ZERO, DATA as i32)]);
    tc.table.set(DATA / 128, TranslationEntry {
        read_only: true,
        ..TranslationEntry::mapped(DATA / 128, DATA / 128)
    });
    tc.write_word(DATA, 0x1111);
    tc.set_reg(reg::T0, 0x2222);
    assert_eq!(tc.step(), Err(Exception::ReadOnly(DATA)));
    assert_eq!(tc.read_word(DATA), 0x1111);
    assert!(!tc.table.get(DATA / 128).unwrap().dirty);
}

#[test]
fn store_past_the_table_is_a_page_fault() {
    let mut tc = TestContext::new().load_program(0, &[sw(reg::T0, reg::T1, 0)]);
    tc.set_reg(reg::T1, 32 * 128);
    assert_eq!(tc.step(), Err(Exception::PageFault(32 * 128)));
    assert_eq!(tc.get_reg(BAD_VADDR_REG), 32 * 128);
}

#[test]
fn break_and_coprocessor_opcodes_are_illegal() {
    let mut tc = TestContext::new().load_program(0, &[brk(), 0x4000_0000]);
    assert_eq!(tc.step(), Err(Exception::IllegalInstruction(brk())));
    tc.machine.regs.advance_pc();
    assert_eq!(tc.step(), Err(Exception::IllegalInstruction(0x4000_0000)));
}

#[test]
fn syscall_leaves_pc_on_the_syscall() {
    let mut tc = TestContext::new().load_program(8, &[syscall()]);
    assert_eq!(tc.step(), Err(Exception::Syscall));
    assert_eq!(tc.pc(), 8);
}

#[test]
fn every_attempt_charges_a_tick() {
    let mut tc = TestContext::new().load_program(0, &[nop(), brk()]);
    tc.run(1);
    let _ = tc.step();
    assert_eq!(tc.machine.stats.total_ticks, 2);
    assert_eq!(tc.machine.stats.instructions_retired, 1);
}
