//! Global System Constants.
//!
//! This module defines machine-wide constants. It includes:
//! 1. **Memory Geometry:** Default page size, frame count and TLB size.
//! 2. **Register Numbering:** Indices of the special registers that follow the 32 GPRs.
//! 3. **Instruction Constants:** Word size and the sign bit used by overflow checks.

/// Default page size in bytes. Equal to the disk sector size of the original machine.
pub const PAGE_SIZE: u32 = 128;

/// Default number of physical page frames in main memory.
pub const NUM_PHYS_PAGES: u32 = 32;

/// Default number of entries in the hardware TLB.
pub const TLB_SIZE: usize = 4;

/// Bytes reserved for the user stack above the program's segments.
pub const USER_STACK_SIZE: u32 = 1024;

/// Size of one instruction in bytes.
pub const INSTRUCTION_SIZE: u32 = 4;

/// Bit 31, the sign bit of a 32-bit word.
pub const SIGN_BIT: u32 = 0x8000_0000;

/// Number of general-purpose registers.
pub const NUM_GP_REGS: usize = 32;

/// Total number of registers visible to the kernel.
pub const NUM_TOTAL_REGS: usize = 40;

/// User stack pointer.
pub const STACK_REG: usize = 29;

/// Return address for procedure calls.
pub const RET_ADDR_REG: usize = 31;

/// High word of a multiply result, remainder of a divide.
pub const HI_REG: usize = 32;

/// Low word of a multiply result, quotient of a divide.
pub const LO_REG: usize = 33;

/// Current program counter.
pub const PC_REG: usize = 34;

/// Next program counter (branch delay).
pub const NEXT_PC_REG: usize = 35;

/// Previous program counter, kept for debugging.
pub const PREV_PC_REG: usize = 36;

/// Target register of a pending delayed load.
pub const LOAD_REG: usize = 37;

/// Value of a pending delayed load.
pub const LOAD_VALUE_REG: usize = 38;

/// Failing virtual address of the last exception.
pub const BAD_VADDR_REG: usize = 39;

/// Distance kept between the initial stack pointer and the end of the address space.
pub const STACK_GUARD: u32 = 16;
