/// Arithmetic, logic, shift, multiply and divide.
pub mod alu;

/// Load extension and unaligned merges.
pub mod lsu;
