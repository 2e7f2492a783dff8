//! Instruction Set Architecture (ISA) Definitions.
//!
//! Contains the opcode tables, field extraction and decoding logic for the
//! MIPS I integer instruction set, plus a disassembler for tracing.
//!
//! Floating point and the coprocessor instructions are not implemented; they
//! decode as illegal instructions.

/// Register name mappings.
pub mod abi;

/// Instruction word to [`instruction::Instruction`] decoding.
pub mod decode;

/// Instruction disassembler for debug tracing and diagnostics.
pub mod disasm;

/// Instruction structure and bit extraction utilities.
pub mod instruction;

/// Primary opcode, `SPECIAL` funct and `REGIMM` tables.
pub mod opcodes;
