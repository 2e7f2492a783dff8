//! MIPS R2000/R3000 machine simulator library.
//!
//! This crate implements a user-mode MIPS simulator with software-managed
//! virtual memory, with the following:
//! 1. **Core:** One-instruction execution with branch delay slots, delayed loads
//!    and precise exceptions.
//! 2. **Memory:** Physical memory and an MMU translating through a linear page
//!    table or a software-loaded TLB.
//! 3. **ISA:** Decoding and disassembly of the MIPS I integer instruction set.
//! 4. **Virtual Memory:** Address spaces, demand paging, clock eviction and swap.
//! 5. **Simulation:** NOFF program loading, a minimal kernel, configuration and
//!    statistics.

/// Common types and constants (addresses, registers, exceptions, access sizes).
pub mod common;
/// Simulator configuration (defaults, enums, hierarchical config structures).
pub mod config;
/// CPU core (machine state, execution, memory access, exceptions) and functional units.
pub mod core;
/// Instruction set (opcode tables, decode, disassembly, ABI names).
pub mod isa;
/// Program image loading and the minimal kernel.
pub mod sim;
/// Physical memory.
pub mod soc;
/// Simulation statistics collection and reporting.
pub mod stats;
/// Address spaces, frame allocation and paging.
pub mod vm;

/// Root configuration type; use `Config::default()` or deserialize from JSON.
pub use crate::config::Config;
/// Simulated machine; holds registers, memory, MMU and stats.
pub use crate::core::Machine;
/// Kernel-side owner of address spaces and physical frames.
pub use crate::vm::MemoryManager;
