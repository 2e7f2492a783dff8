//! Machine Register File.
//!
//! This module provides the `RegisterFile` struct, the complete user-visible register state
//! of the simulated MIPS processor. It provides:
//! 1. **Unified Storage:** 32 general-purpose registers plus eight special slots
//!    (`HI`, `LO`, `PC`, `NEXT_PC`, `PREV_PC`, `LOAD_REG`, `LOAD_VALUE`, `BAD_VADDR`).
//! 2. **Hardwired Zero:** Register 0 reads as zero no matter what was written to it.
//! 3. **Observability:** A formatted dump of every register for debugging.

use std::fmt;

use crate::common::constants::{
    BAD_VADDR_REG, HI_REG, LOAD_REG, LOAD_VALUE_REG, LO_REG, NEXT_PC_REG, NUM_GP_REGS,
    NUM_TOTAL_REGS, PC_REG, PREV_PC_REG,
};
use crate::isa::abi;

/// Register file holding all 40 machine registers as raw 32-bit words.
///
/// Signed interpretation is left to the instruction semantics.
#[derive(Clone, PartialEq, Eq)]
pub struct RegisterFile {
    regs: [u32; NUM_TOTAL_REGS],
}

impl RegisterFile {
    /// Creates a register file with every register cleared.
    pub fn new() -> Self {
        Self {
            regs: [0; NUM_TOTAL_REGS],
        }
    }

    /// Reads register `idx`.
    ///
    /// Register 0 always returns 0. Indices past the last register also read 0.
    #[inline(always)]
    pub fn read(&self, idx: usize) -> u32 {
        if idx == 0 {
            0
        } else {
            self.regs.get(idx).copied().unwrap_or(0)
        }
    }

    /// Writes register `idx`.
    ///
    /// Writes to register 0 and to indices past the last register are discarded.
    #[inline(always)]
    pub fn write(&mut self, idx: usize, val: u32) {
        if idx == 0 {
            return;
        }
        if let Some(slot) = self.regs.get_mut(idx) {
            *slot = val;
        }
    }

    /// Reads a register as a signed value.
    #[inline]
    pub fn read_signed(&self, idx: usize) -> i32 {
        self.read(idx) as i32
    }

    /// Program counter of the instruction about to execute.
    pub fn pc(&self) -> u32 {
        self.regs[PC_REG]
    }

    /// Address of the instruction after the current one (branch delay slot aware).
    pub fn next_pc(&self) -> u32 {
        self.regs[NEXT_PC_REG]
    }

    /// Program counter of the previously executed instruction.
    pub fn prev_pc(&self) -> u32 {
        self.regs[PREV_PC_REG]
    }

    /// `HI` half of a multiply result, or the remainder of a divide.
    pub fn hi(&self) -> u32 {
        self.regs[HI_REG]
    }

    /// `LO` half of a multiply result, or the quotient of a divide.
    pub fn lo(&self) -> u32 {
        self.regs[LO_REG]
    }

    /// Virtual address recorded by the most recent memory exception.
    pub fn bad_vaddr(&self) -> u32 {
        self.regs[BAD_VADDR_REG]
    }

    /// Sets the three program counters at once.
    pub fn set_pcs(&mut self, prev: u32, pc: u32, next: u32) {
        self.regs[PREV_PC_REG] = prev;
        self.regs[PC_REG] = pc;
        self.regs[NEXT_PC_REG] = next;
    }

    /// Advances past the current instruction without branching.
    ///
    /// Used by the kernel after servicing a system call so the `syscall`
    /// instruction is not re-executed.
    pub fn advance_pc(&mut self) {
        let pc = self.pc();
        let next = self.next_pc();
        self.set_pcs(pc, next, next.wrapping_add(4));
    }

    /// Retires the pending delayed load and schedules a new one.
    ///
    /// The previously scheduled value is written to the register named by
    /// `LOAD_REG`, then `reg`/`value` become the pending load. Register 0 is
    /// cleared afterwards so a load targeting it has no effect.
    pub fn delayed_load(&mut self, reg: u32, value: u32) {
        let target = self.regs[LOAD_REG] as usize;
        if target < NUM_TOTAL_REGS {
            self.regs[target] = self.regs[LOAD_VALUE_REG];
        }
        self.regs[LOAD_REG] = reg;
        self.regs[LOAD_VALUE_REG] = value;
        self.regs[0] = 0;
    }

    /// Returns a snapshot of all registers.
    pub fn as_array(&self) -> &[u32; NUM_TOTAL_REGS] {
        &self.regs
    }

    /// Dumps the register state to stdout.
    pub fn dump(&self) {
        print!("{self}");
    }
}

impl Default for RegisterFile {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RegisterFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterFile")
            .field("pc", &format_args!("{:#010x}", self.pc()))
            .field("next_pc", &format_args!("{:#010x}", self.next_pc()))
            .finish_non_exhaustive()
    }
}

impl fmt::Display for RegisterFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in (0..NUM_GP_REGS).step_by(4) {
            for j in 0..4 {
                let idx = i + j;
                write!(
                    f,
                    "{:>4}(r{:<2}): {:#010x}  ",
                    abi::reg_name(idx),
                    idx,
                    self.read(idx)
                )?;
            }
            writeln!(f)?;
        }
        writeln!(
            f,
            "  Hi: {:#010x}    Lo: {:#010x}  BadVAddr: {:#010x}",
            self.hi(),
            self.lo(),
            self.bad_vaddr()
        )?;
        writeln!(
            f,
            "  PC: {:#010x} NextPC: {:#010x}    PrevPC: {:#010x}",
            self.pc(),
            self.next_pc(),
            self.prev_pc()
        )?;
        writeln!(
            f,
            "  LoadReg: {}  LoadValue: {:#010x}",
            self.regs[LOAD_REG], self.regs[LOAD_VALUE_REG]
        )
    }
}
