//! System-on-Chip Components.
//!
//! The simulated machine has no devices beyond main memory; console, disk and
//! network emulation live outside this crate.

/// Physical main memory.
pub mod memory;

pub use memory::PhysicalMemory;
