//! Single-Instruction Execution.
//!
//! This module implements the execution engine. Each call to
//! [`Machine::one_instruction`] runs one user instruction through
//! fetch, decode, execute and commit:
//! 1. **Fetch:** Translate `PC` and read the instruction word.
//! 2. **Decode:** Turn the word into an [`Instruction`].
//! 3. **Execute:** Compute every effect against a private copy of the register
//!    file; a store is translated but only queued.
//! 4. **Commit:** If nothing raised an exception, install the new registers,
//!    perform the queued store, retire the pending delayed load and advance
//!    `PREV_PC`/`PC`/`NEXT_PC`.
//!
//! Branch and jump targets go to `NEXT_PC` only at commit, so the instruction
//! in the delay slot always executes exactly once before the target. When an
//! exception is raised nothing but the trap state changes, and the kernel can
//! retry the same `PC` after resolving it.

use tracing::trace;

use super::Machine;
use crate::common::constants::{HI_REG, LO_REG, LOAD_REG, LOAD_VALUE_REG, RET_ADDR_REG};
use crate::common::{AccessSize, Exception, PhysAddr, RegisterFile};
use crate::core::units::alu::{Alu, AluOp, arithmetic};
use crate::core::units::lsu::{Lsu, unaligned};
use crate::isa::decode::decode;
use crate::isa::disasm::format_instruction;
use crate::isa::instruction::{Instruction, Op};

/// Mask keeping the 256 MiB region of a `j`/`jal` target.
const JUMP_REGION_MASK: u32 = 0xF000_0000;

/// Word-sized step between consecutive instructions.
const INSTRUCTION_BYTES: u32 = 4;

/// A store computed by an instruction, applied only at commit.
#[derive(Clone, Copy, Debug)]
struct PendingStore {
    addr: PhysAddr,
    size: AccessSize,
    value: u32,
}

/// Everything an instruction changes, ready to commit.
#[derive(Debug)]
struct Effects {
    inst: Instruction,
    regs: RegisterFile,
    store: Option<PendingStore>,
}

impl Machine {
    /// Executes one instruction.
    ///
    /// One tick is charged whether or not the instruction completes.
    ///
    /// # Errors
    ///
    /// The exception raised by the instruction. By the time it is returned,
    /// the pending delayed load has been retired, `BAD_VADDR` holds the
    /// faulting address and no other register or memory location has changed.
    /// `PC` still addresses the faulting instruction.
    pub fn one_instruction(&mut self) -> Result<(), Exception> {
        self.stats.total_ticks += 1;
        self.stats.user_ticks += 1;

        match self.execute() {
            Ok(effects) => {
                self.commit(effects);
                Ok(())
            }
            Err(exception) => {
                self.raise_exception(exception);
                Err(exception)
            }
        }
    }

    fn commit(&mut self, effects: Effects) {
        let Effects { inst, regs, store } = effects;
        self.regs = regs;
        if let Some(store) = store {
            self.memory.write(store.addr, store.size, store.value);
        }

        self.stats.instructions_retired += 1;
        if inst.op.is_load() {
            self.stats.loads += 1;
        } else if inst.op.is_store() {
            self.stats.stores += 1;
        } else if inst.op.is_control_transfer() {
            self.stats.branches += 1;
        }
    }

    /// Computes the effects of the instruction at `PC` without committing them.
    fn execute(&mut self) -> Result<Effects, Exception> {
        let pc = self.regs.pc();
        let fetch_pa = self.translate(pc, AccessSize::Word, false)?;
        let inst = decode(self.memory.read(fetch_pa, AccessSize::Word))?;

        if self.trace {
            trace!(pc = format_args!("{pc:#010x}"), "{}", format_instruction(&inst));
        }

        let mut next = self.regs.clone();
        let rs = self.regs.read(inst.rs);
        let rt = self.regs.read(inst.rt);
        let delay_slot = self.regs.next_pc();
        let mut pc_after = delay_slot.wrapping_add(INSTRUCTION_BYTES);
        let branch_target = delay_slot.wrapping_add(inst.extra << 2);
        let (mut load_reg, mut load_value) = (0u32, 0u32);
        let mut store = None;

        match inst.op {
            Op::Add => next.write(inst.rd, Alu::execute(AluOp::Add, rs, rt)?),
            Op::Addu => next.write(inst.rd, Alu::execute(AluOp::Addu, rs, rt)?),
            Op::Sub => next.write(inst.rd, Alu::execute(AluOp::Sub, rs, rt)?),
            Op::Subu => next.write(inst.rd, Alu::execute(AluOp::Subu, rs, rt)?),
            Op::And => next.write(inst.rd, Alu::execute(AluOp::And, rs, rt)?),
            Op::Or => next.write(inst.rd, Alu::execute(AluOp::Or, rs, rt)?),
            Op::Xor => next.write(inst.rd, Alu::execute(AluOp::Xor, rs, rt)?),
            Op::Nor => next.write(inst.rd, Alu::execute(AluOp::Nor, rs, rt)?),
            Op::Slt => next.write(inst.rd, Alu::execute(AluOp::Slt, rs, rt)?),
            Op::Sltu => next.write(inst.rd, Alu::execute(AluOp::Sltu, rs, rt)?),

            Op::Sll => next.write(inst.rd, Alu::execute(AluOp::Sll, rt, inst.extra)?),
            Op::Srl => next.write(inst.rd, Alu::execute(AluOp::Srl, rt, inst.extra)?),
            Op::Sra => next.write(inst.rd, Alu::execute(AluOp::Sra, rt, inst.extra)?),
            Op::Sllv => next.write(inst.rd, Alu::execute(AluOp::Sll, rt, rs)?),
            Op::Srlv => next.write(inst.rd, Alu::execute(AluOp::Srl, rt, rs)?),
            Op::Srav => next.write(inst.rd, Alu::execute(AluOp::Sra, rt, rs)?),

            Op::Mult | Op::Multu => {
                let (hi, lo) = arithmetic::multiply(rs, rt, inst.op == Op::Mult);
                next.write(HI_REG, hi);
                next.write(LO_REG, lo);
            }
            Op::Div | Op::Divu => {
                let (hi, lo) = arithmetic::divide(rs, rt, inst.op == Op::Div);
                next.write(HI_REG, hi);
                next.write(LO_REG, lo);
            }
            Op::Mfhi => next.write(inst.rd, self.regs.hi()),
            Op::Mthi => next.write(HI_REG, rs),
            Op::Mflo => next.write(inst.rd, self.regs.lo()),
            Op::Mtlo => next.write(LO_REG, rs),

            Op::Addi => next.write(inst.rt, Alu::execute(AluOp::Add, rs, inst.extra)?),
            Op::Addiu => next.write(inst.rt, Alu::execute(AluOp::Addu, rs, inst.extra)?),
            Op::Slti => next.write(inst.rt, Alu::execute(AluOp::Slt, rs, inst.extra)?),
            Op::Sltiu => next.write(inst.rt, Alu::execute(AluOp::Sltu, rs, inst.extra)?),
            Op::Andi => next.write(inst.rt, rs & inst.extra),
            Op::Ori => next.write(inst.rt, rs | inst.extra),
            Op::Xori => next.write(inst.rt, rs ^ inst.extra),
            Op::Lui => next.write(inst.rt, inst.extra),

            Op::Lb | Op::Lbu | Op::Lh | Op::Lhu | Op::Lw => {
                let addr = rs.wrapping_add(inst.extra);
                let Some((size, signed)) = Lsu::load_shape(inst.op) else {
                    return Err(Exception::IllegalInstruction(inst.raw));
                };
                let pa = self.translate(addr, size, false)?;
                load_reg = inst.rt as u32;
                load_value = Lsu::extend(self.memory.read(pa, size), size, signed);
            }
            Op::Lwl | Op::Lwr => {
                let addr = rs.wrapping_add(inst.extra);
                let pa = self.translate(unaligned::aligned(addr), AccessSize::Word, false)?;
                let mem = self.memory.read(pa, AccessSize::Word);
                let old = if self.regs.read(LOAD_REG) as usize == inst.rt {
                    self.regs.read(LOAD_VALUE_REG)
                } else {
                    rt
                };
                load_reg = inst.rt as u32;
                load_value = if inst.op == Op::Lwl {
                    unaligned::load_left(addr, mem, old)
                } else {
                    unaligned::load_right(addr, mem, old)
                };
            }

            Op::Sb | Op::Sh | Op::Sw => {
                let addr = rs.wrapping_add(inst.extra);
                let Some(size) = Lsu::store_size(inst.op) else {
                    return Err(Exception::IllegalInstruction(inst.raw));
                };
                let pa = self.translate(addr, size, true)?;
                store = Some(PendingStore {
                    addr: pa,
                    size,
                    value: rt,
                });
            }
            Op::Swl | Op::Swr => {
                let addr = rs.wrapping_add(inst.extra);
                let word_addr = unaligned::aligned(addr);
                let read_pa = self.translate(word_addr, AccessSize::Word, false)?;
                let mem = self.memory.read(read_pa, AccessSize::Word);
                let value = if inst.op == Op::Swl {
                    unaligned::store_left(addr, mem, rt)
                } else {
                    unaligned::store_right(addr, mem, rt)
                };
                let pa = self.translate(word_addr, AccessSize::Word, true)?;
                store = Some(PendingStore {
                    addr: pa,
                    size: AccessSize::Word,
                    value,
                });
            }

            Op::Beq => {
                if rs == rt {
                    pc_after = branch_target;
                }
            }
            Op::Bne => {
                if rs != rt {
                    pc_after = branch_target;
                }
            }
            Op::Blez => {
                if (rs as i32) <= 0 {
                    pc_after = branch_target;
                }
            }
            Op::Bgtz => {
                if (rs as i32) > 0 {
                    pc_after = branch_target;
                }
            }
            Op::Bltz | Op::Bltzal => {
                if inst.op == Op::Bltzal {
                    next.write(RET_ADDR_REG, delay_slot.wrapping_add(INSTRUCTION_BYTES));
                }
                if (rs as i32) < 0 {
                    pc_after = branch_target;
                }
            }
            Op::Bgez | Op::Bgezal => {
                if inst.op == Op::Bgezal {
                    next.write(RET_ADDR_REG, delay_slot.wrapping_add(INSTRUCTION_BYTES));
                }
                if (rs as i32) >= 0 {
                    pc_after = branch_target;
                }
            }
            Op::J | Op::Jal => {
                if inst.op == Op::Jal {
                    next.write(RET_ADDR_REG, delay_slot.wrapping_add(INSTRUCTION_BYTES));
                }
                pc_after = (pc_after & JUMP_REGION_MASK) | (inst.extra << 2);
            }
            Op::Jr => pc_after = rs,
            Op::Jalr => {
                next.write(inst.rd, delay_slot.wrapping_add(INSTRUCTION_BYTES));
                pc_after = rs;
            }

            Op::Syscall => return Err(Exception::Syscall),
        }

        next.delayed_load(load_reg, load_value);
        next.set_pcs(pc, delay_slot, pc_after);

        Ok(Effects {
            inst,
            regs: next,
            store,
        })
    }
}
