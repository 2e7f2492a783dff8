//! Execution units and functional components.
//!
//! This module contains the processor's functional units: the integer ALU,
//! the load/store unit's data-path helpers and the memory management unit.

/// Arithmetic Logic Unit for integer operations.
pub mod alu;

/// Load/Store Unit for memory access shaping.
pub mod lsu;

/// Memory Management Unit with page table and TLB translation.
pub mod mmu;
