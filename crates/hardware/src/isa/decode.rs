//! MIPS Instruction Decoder.
//!
//! This module turns a 32-bit instruction word into an [`Instruction`]. The
//! primary opcode selects the format:
//! - `SPECIAL` (R-type): the operation comes from the low six `funct` bits.
//! - `REGIMM`: sign-comparing branches, the operation comes from `rt`.
//! - `J`/`JAL` (J-type): a 26-bit target.
//! - Everything else (I-type): a 16-bit immediate.
//!
//! Reserved encodings, `BREAK` and the coprocessor opcodes decode to
//! [`Exception::IllegalInstruction`].

use crate::common::error::Exception;
use crate::isa::instruction::{Instruction, InstructionBits, Op};
use crate::isa::opcodes::{funct, primary, regimm};

/// Bit shift that moves a `lui` immediate into the upper halfword.
const LUI_SHIFT: u32 = 16;

/// Decodes one instruction word.
///
/// # Errors
///
/// Returns [`Exception::IllegalInstruction`] carrying the raw word for any
/// encoding that is not a supported MIPS I integer instruction.
pub fn decode(raw: u32) -> Result<Instruction, Exception> {
    let opcode = raw.opcode();
    let (op, extra) = match opcode {
        primary::SPECIAL => (decode_special(raw)?, raw.shamt()),
        primary::REGIMM => (decode_regimm(raw)?, raw.simm16() as u32),
        primary::J => (Op::J, raw.target()),
        primary::JAL => (Op::Jal, raw.target()),
        primary::ANDI => (Op::Andi, raw.imm16()),
        primary::ORI => (Op::Ori, raw.imm16()),
        primary::XORI => (Op::Xori, raw.imm16()),
        primary::LUI => (Op::Lui, raw.imm16() << LUI_SHIFT),
        _ => (decode_itype(raw)?, raw.simm16() as u32),
    };

    Ok(Instruction {
        raw,
        op,
        rs: raw.rs(),
        rt: raw.rt(),
        rd: raw.rd(),
        extra,
    })
}

fn decode_special(raw: u32) -> Result<Op, Exception> {
    let op = match raw.funct() {
        funct::SLL => Op::Sll,
        funct::SRL => Op::Srl,
        funct::SRA => Op::Sra,
        funct::SLLV => Op::Sllv,
        funct::SRLV => Op::Srlv,
        funct::SRAV => Op::Srav,
        funct::JR => Op::Jr,
        funct::JALR => Op::Jalr,
        funct::SYSCALL => Op::Syscall,
        funct::MFHI => Op::Mfhi,
        funct::MTHI => Op::Mthi,
        funct::MFLO => Op::Mflo,
        funct::MTLO => Op::Mtlo,
        funct::MULT => Op::Mult,
        funct::MULTU => Op::Multu,
        funct::DIV => Op::Div,
        funct::DIVU => Op::Divu,
        funct::ADD => Op::Add,
        funct::ADDU => Op::Addu,
        funct::SUB => Op::Sub,
        funct::SUBU => Op::Subu,
        funct::AND => Op::And,
        funct::OR => Op::Or,
        funct::XOR => Op::Xor,
        funct::NOR => Op::Nor,
        funct::SLT => Op::Slt,
        funct::SLTU => Op::Sltu,
        _ => return Err(Exception::IllegalInstruction(raw)),
    };
    Ok(op)
}

fn decode_regimm(raw: u32) -> Result<Op, Exception> {
    let op = match raw.rt() as u32 {
        regimm::BLTZ => Op::Bltz,
        regimm::BGEZ => Op::Bgez,
        regimm::BLTZAL => Op::Bltzal,
        regimm::BGEZAL => Op::Bgezal,
        _ => return Err(Exception::IllegalInstruction(raw)),
    };
    Ok(op)
}

fn decode_itype(raw: u32) -> Result<Op, Exception> {
    let op = match raw.opcode() {
        primary::BEQ => Op::Beq,
        primary::BNE => Op::Bne,
        primary::BLEZ => Op::Blez,
        primary::BGTZ => Op::Bgtz,
        primary::ADDI => Op::Addi,
        primary::ADDIU => Op::Addiu,
        primary::SLTI => Op::Slti,
        primary::SLTIU => Op::Sltiu,
        primary::LB => Op::Lb,
        primary::LH => Op::Lh,
        primary::LWL => Op::Lwl,
        primary::LW => Op::Lw,
        primary::LBU => Op::Lbu,
        primary::LHU => Op::Lhu,
        primary::LWR => Op::Lwr,
        primary::SB => Op::Sb,
        primary::SH => Op::Sh,
        primary::SWL => Op::Swl,
        primary::SW => Op::Sw,
        primary::SWR => Op::Swr,
        _ => return Err(Exception::IllegalInstruction(raw)),
    };
    Ok(op)
}
