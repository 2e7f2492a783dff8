//! Core processor implementation.
//!
//! This module contains the machine context object with its execution engine
//! and the functional units it is built from.

/// Machine state, instruction execution and exception delivery.
pub mod cpu;

/// Execution units (ALU, LSU, MMU).
pub mod units;

pub use self::cpu::Machine;
