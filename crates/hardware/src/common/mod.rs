//! Common utilities and types used throughout the MIPS machine simulator.
//!
//! This module provides the building blocks shared by every other component:
//! 1. **Address Types:** Strong types for virtual and physical addresses.
//! 2. **Constants:** Machine geometry defaults and the numbering of the 40 registers.
//! 3. **Memory Access:** Access widths for loads, stores and fetches.
//! 4. **Error Handling:** Architectural exceptions and paging-layer failures.
//! 5. **Register Management:** The 40-slot user register file.

/// Address type definitions (physical and virtual addresses).
pub mod addr;

/// Common constants used throughout the simulator.
pub mod constants;

/// Memory access width definitions.
pub mod data;

/// Exception and error types.
pub mod error;

/// Register file implementation.
pub mod reg;

pub use addr::{PhysAddr, VirtAddr};
pub use data::AccessSize;
pub use error::{Exception, ExceptionKind, LoadError, VmError};
pub use reg::RegisterFile;
