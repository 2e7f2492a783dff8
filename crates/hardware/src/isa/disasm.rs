//! Instruction Disassembler for MIPS I.
//!
//! Converts an instruction word into a human-readable mnemonic string for
//! instruction tracing, the register dump and test diagnostics.
//!
//! # Usage
//!
//! ```
//! use mipsim_core::isa::disasm::disassemble;
//! let text = disassemble(0x2408_000a); // addiu $t0, $zero, 10
//! assert_eq!(text, "addiu t0, zero, 10");
//! ```

use crate::isa::abi::reg_name as r;
use crate::isa::decode::decode;
use crate::isa::instruction::{Instruction, Op};

/// Disassembles a raw instruction word.
///
/// Returns `"unknown"` for encodings the decoder rejects.
pub fn disassemble(raw: u32) -> String {
    match decode(raw) {
        Ok(inst) => format_instruction(&inst),
        Err(_) => "unknown".to_string(),
    }
}

/// Formats an already decoded instruction.
///
/// Branch offsets are printed in bytes relative to the delay slot, jump
/// targets as the low 28 bits of the destination.
pub fn format_instruction(inst: &Instruction) -> String {
    let (rs, rt, rd) = (r(inst.rs), r(inst.rt), r(inst.rd));
    let imm = inst.imm();
    let branch = imm.wrapping_shl(2);

    match inst.op {
        Op::Add => format!("add {rd}, {rs}, {rt}"),
        Op::Addu => format!("addu {rd}, {rs}, {rt}"),
        Op::Sub => format!("sub {rd}, {rs}, {rt}"),
        Op::Subu => format!("subu {rd}, {rs}, {rt}"),
        Op::And => format!("and {rd}, {rs}, {rt}"),
        Op::Or => format!("or {rd}, {rs}, {rt}"),
        Op::Xor => format!("xor {rd}, {rs}, {rt}"),
        Op::Nor => format!("nor {rd}, {rs}, {rt}"),
        Op::Slt => format!("slt {rd}, {rs}, {rt}"),
        Op::Sltu => format!("sltu {rd}, {rs}, {rt}"),

        Op::Sll if inst.raw == 0 => "nop".to_string(),
        Op::Sll => format!("sll {rd}, {rt}, {}", inst.extra),
        Op::Srl => format!("srl {rd}, {rt}, {}", inst.extra),
        Op::Sra => format!("sra {rd}, {rt}, {}", inst.extra),
        Op::Sllv => format!("sllv {rd}, {rt}, {rs}"),
        Op::Srlv => format!("srlv {rd}, {rt}, {rs}"),
        Op::Srav => format!("srav {rd}, {rt}, {rs}"),

        Op::Mult => format!("mult {rs}, {rt}"),
        Op::Multu => format!("multu {rs}, {rt}"),
        Op::Div => format!("div {rs}, {rt}"),
        Op::Divu => format!("divu {rs}, {rt}"),
        Op::Mfhi => format!("mfhi {rd}"),
        Op::Mthi => format!("mthi {rs}"),
        Op::Mflo => format!("mflo {rd}"),
        Op::Mtlo => format!("mtlo {rs}"),

        Op::Addi => format!("addi {rt}, {rs}, {imm}"),
        Op::Addiu => format!("addiu {rt}, {rs}, {imm}"),
        Op::Slti => format!("slti {rt}, {rs}, {imm}"),
        Op::Sltiu => format!("sltiu {rt}, {rs}, {imm}"),
        Op::Andi => format!("andi {rt}, {rs}, {:#x}", inst.extra),
        Op::Ori => format!("ori {rt}, {rs}, {:#x}", inst.extra),
        Op::Xori => format!("xori {rt}, {rs}, {:#x}", inst.extra),
        Op::Lui => format!("lui {rt}, {:#x}", inst.extra >> 16),

        Op::Lb => format!("lb {rt}, {imm}({rs})"),
        Op::Lbu => format!("lbu {rt}, {imm}({rs})"),
        Op::Lh => format!("lh {rt}, {imm}({rs})"),
        Op::Lhu => format!("lhu {rt}, {imm}({rs})"),
        Op::Lw => format!("lw {rt}, {imm}({rs})"),
        Op::Lwl => format!("lwl {rt}, {imm}({rs})"),
        Op::Lwr => format!("lwr {rt}, {imm}({rs})"),
        Op::Sb => format!("sb {rt}, {imm}({rs})"),
        Op::Sh => format!("sh {rt}, {imm}({rs})"),
        Op::Sw => format!("sw {rt}, {imm}({rs})"),
        Op::Swl => format!("swl {rt}, {imm}({rs})"),
        Op::Swr => format!("swr {rt}, {imm}({rs})"),

        Op::Beq => format!("beq {rs}, {rt}, {branch}"),
        Op::Bne => format!("bne {rs}, {rt}, {branch}"),
        Op::Blez => format!("blez {rs}, {branch}"),
        Op::Bgtz => format!("bgtz {rs}, {branch}"),
        Op::Bltz => format!("bltz {rs}, {branch}"),
        Op::Bgez => format!("bgez {rs}, {branch}"),
        Op::Bltzal => format!("bltzal {rs}, {branch}"),
        Op::Bgezal => format!("bgezal {rs}, {branch}"),
        Op::J => format!("j {:#x}", inst.extra << 2),
        Op::Jal => format!("jal {:#x}", inst.extra << 2),
        Op::Jr => format!("jr {rs}"),
        Op::Jalr => format!("jalr {rd}, {rs}"),
        Op::Syscall => "syscall".to_string(),
    }
}
