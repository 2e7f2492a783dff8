//! MIPS I Opcode Tables.
//!
//! Defines the primary opcodes (bits 31-26), the `SPECIAL` function codes
//! (bits 5-0) and the `REGIMM` selectors (the `rt` field, bits 20-16).

/// Primary opcodes.
pub mod primary {
    /// Register-register operations, selected by `funct`.
    pub const SPECIAL: u32 = 0x00;
    /// Sign-comparing branches against zero, selected by `rt`.
    pub const REGIMM: u32 = 0x01;
    /// Jump.
    pub const J: u32 = 0x02;
    /// Jump and link.
    pub const JAL: u32 = 0x03;
    /// Branch on equal.
    pub const BEQ: u32 = 0x04;
    /// Branch on not equal.
    pub const BNE: u32 = 0x05;
    /// Branch on less than or equal to zero.
    pub const BLEZ: u32 = 0x06;
    /// Branch on greater than zero.
    pub const BGTZ: u32 = 0x07;
    /// Add immediate (traps on overflow).
    pub const ADDI: u32 = 0x08;
    /// Add immediate unsigned.
    pub const ADDIU: u32 = 0x09;
    /// Set on less than immediate.
    pub const SLTI: u32 = 0x0A;
    /// Set on less than immediate unsigned.
    pub const SLTIU: u32 = 0x0B;
    /// And immediate.
    pub const ANDI: u32 = 0x0C;
    /// Or immediate.
    pub const ORI: u32 = 0x0D;
    /// Xor immediate.
    pub const XORI: u32 = 0x0E;
    /// Load upper immediate.
    pub const LUI: u32 = 0x0F;
    /// First coprocessor opcode (`COP0`); `COP0`..=`COP3` are unsupported.
    pub const COP0: u32 = 0x10;
    /// Last coprocessor opcode.
    pub const COP3: u32 = 0x13;
    /// Load byte.
    pub const LB: u32 = 0x20;
    /// Load halfword.
    pub const LH: u32 = 0x21;
    /// Load word left.
    pub const LWL: u32 = 0x22;
    /// Load word.
    pub const LW: u32 = 0x23;
    /// Load byte unsigned.
    pub const LBU: u32 = 0x24;
    /// Load halfword unsigned.
    pub const LHU: u32 = 0x25;
    /// Load word right.
    pub const LWR: u32 = 0x26;
    /// Store byte.
    pub const SB: u32 = 0x28;
    /// Store halfword.
    pub const SH: u32 = 0x29;
    /// Store word left.
    pub const SWL: u32 = 0x2A;
    /// Store word.
    pub const SW: u32 = 0x2B;
    /// Store word right.
    pub const SWR: u32 = 0x2E;
}

/// `SPECIAL` function codes.
pub mod funct {
    /// Shift left logical.
    pub const SLL: u32 = 0x00;
    /// Shift right logical.
    pub const SRL: u32 = 0x02;
    /// Shift right arithmetic.
    pub const SRA: u32 = 0x03;
    /// Shift left logical variable.
    pub const SLLV: u32 = 0x04;
    /// Shift right logical variable.
    pub const SRLV: u32 = 0x06;
    /// Shift right arithmetic variable.
    pub const SRAV: u32 = 0x07;
    /// Jump register.
    pub const JR: u32 = 0x08;
    /// Jump and link register.
    pub const JALR: u32 = 0x09;
    /// System call.
    pub const SYSCALL: u32 = 0x0C;
    /// Breakpoint (unsupported).
    pub const BREAK: u32 = 0x0D;
    /// Move from HI.
    pub const MFHI: u32 = 0x10;
    /// Move to HI.
    pub const MTHI: u32 = 0x11;
    /// Move from LO.
    pub const MFLO: u32 = 0x12;
    /// Move to LO.
    pub const MTLO: u32 = 0x13;
    /// Multiply.
    pub const MULT: u32 = 0x18;
    /// Multiply unsigned.
    pub const MULTU: u32 = 0x19;
    /// Divide.
    pub const DIV: u32 = 0x1A;
    /// Divide unsigned.
    pub const DIVU: u32 = 0x1B;
    /// Add (traps on overflow).
    pub const ADD: u32 = 0x20;
    /// Add unsigned.
    pub const ADDU: u32 = 0x21;
    /// Subtract (traps on overflow).
    pub const SUB: u32 = 0x22;
    /// Subtract unsigned.
    pub const SUBU: u32 = 0x23;
    /// Bitwise and.
    pub const AND: u32 = 0x24;
    /// Bitwise or.
    pub const OR: u32 = 0x25;
    /// Bitwise xor.
    pub const XOR: u32 = 0x26;
    /// Bitwise nor.
    pub const NOR: u32 = 0x27;
    /// Set on less than.
    pub const SLT: u32 = 0x2A;
    /// Set on less than unsigned.
    pub const SLTU: u32 = 0x2B;
}

/// `REGIMM` selectors carried in the `rt` field.
pub mod regimm {
    /// Branch on less than zero.
    pub const BLTZ: u32 = 0x00;
    /// Branch on greater than or equal to zero.
    pub const BGEZ: u32 = 0x01;
    /// Branch on less than zero and link.
    pub const BLTZAL: u32 = 0x10;
    /// Branch on greater than or equal to zero and link.
    pub const BGEZAL: u32 = 0x11;
}
