//! Instruction encoding and decoding utilities.
//!
//! Provides bit extraction functions for the three MIPS instruction formats
//! (R, I and J) and the `Instruction` structure produced by the decoder.

/// Bit shift of the primary opcode field (bits 26-31).
const OPCODE_SHIFT: u32 = 26;
/// Bit mask for the 6-bit opcode and funct fields.
const SIX_BIT_MASK: u32 = 0x3F;
/// Bit mask for the 5-bit register and shift-amount fields.
const FIVE_BIT_MASK: u32 = 0x1F;
/// Bit shift of the `rs` field (bits 21-25).
const RS_SHIFT: u32 = 21;
/// Bit shift of the `rt` field (bits 16-20).
const RT_SHIFT: u32 = 16;
/// Bit shift of the `rd` field (bits 11-15).
const RD_SHIFT: u32 = 11;
/// Bit shift of the `shamt` field (bits 6-10).
const SHAMT_SHIFT: u32 = 6;
/// Bit mask for the 16-bit immediate (bits 0-15).
const IMM_MASK: u32 = 0xFFFF;
/// Bit mask for the 26-bit jump target (bits 0-25).
const TARGET_MASK: u32 = 0x03FF_FFFF;

/// Field extraction for encoded MIPS instructions.
pub trait InstructionBits {
    /// Primary opcode (bits 26-31).
    fn opcode(&self) -> u32;

    /// First source register (bits 21-25).
    fn rs(&self) -> usize;

    /// Second source register, or the destination of I-type instructions (bits 16-20).
    fn rt(&self) -> usize;

    /// Destination register of R-type instructions (bits 11-15).
    fn rd(&self) -> usize;

    /// Constant shift amount (bits 6-10).
    fn shamt(&self) -> u32;

    /// `SPECIAL` function code (bits 0-5).
    fn funct(&self) -> u32;

    /// Raw 16-bit immediate (bits 0-15), not extended.
    fn imm16(&self) -> u32;

    /// Sign-extended 16-bit immediate.
    fn simm16(&self) -> i32;

    /// 26-bit jump target (bits 0-25).
    fn target(&self) -> u32;
}

impl InstructionBits for u32 {
    #[inline(always)]
    fn opcode(&self) -> u32 {
        (self >> OPCODE_SHIFT) & SIX_BIT_MASK
    }

    #[inline(always)]
    fn rs(&self) -> usize {
        ((self >> RS_SHIFT) & FIVE_BIT_MASK) as usize
    }

    #[inline(always)]
    fn rt(&self) -> usize {
        ((self >> RT_SHIFT) & FIVE_BIT_MASK) as usize
    }

    #[inline(always)]
    fn rd(&self) -> usize {
        ((self >> RD_SHIFT) & FIVE_BIT_MASK) as usize
    }

    #[inline(always)]
    fn shamt(&self) -> u32 {
        (self >> SHAMT_SHIFT) & FIVE_BIT_MASK
    }

    #[inline(always)]
    fn funct(&self) -> u32 {
        self & SIX_BIT_MASK
    }

    #[inline(always)]
    fn imm16(&self) -> u32 {
        self & IMM_MASK
    }

    /// Truncates to 16 bits and sign-extends through `i16`.
    #[inline(always)]
    fn simm16(&self) -> i32 {
        i32::from((self & IMM_MASK) as u16 as i16)
    }

    #[inline(always)]
    fn target(&self) -> u32 {
        self & TARGET_MASK
    }
}

/// Decoded operation.
///
/// One variant per supported MIPS I integer instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum Op {
    // Arithmetic and logic, register operands
    Add,
    Addu,
    Sub,
    Subu,
    And,
    Or,
    Xor,
    Nor,
    Slt,
    Sltu,
    // Shifts
    Sll,
    Srl,
    Sra,
    Sllv,
    Srlv,
    Srav,
    // Multiply and divide
    Mult,
    Multu,
    Div,
    Divu,
    Mfhi,
    Mthi,
    Mflo,
    Mtlo,
    // Immediate operands
    Addi,
    Addiu,
    Slti,
    Sltiu,
    Andi,
    Ori,
    Xori,
    Lui,
    // Loads and stores
    Lb,
    Lbu,
    Lh,
    Lhu,
    Lw,
    Lwl,
    Lwr,
    Sb,
    Sh,
    Sw,
    Swl,
    Swr,
    // Control transfer
    Beq,
    Bne,
    Blez,
    Bgtz,
    Bltz,
    Bgez,
    Bltzal,
    Bgezal,
    J,
    Jal,
    Jr,
    Jalr,
    Syscall,
}

impl Op {
    /// Returns `true` for conditional branches and jumps.
    pub fn is_control_transfer(self) -> bool {
        matches!(
            self,
            Self::Beq
                | Self::Bne
                | Self::Blez
                | Self::Bgtz
                | Self::Bltz
                | Self::Bgez
                | Self::Bltzal
                | Self::Bgezal
                | Self::J
                | Self::Jal
                | Self::Jr
                | Self::Jalr
        )
    }

    /// Returns `true` for instructions that read data memory.
    pub fn is_load(self) -> bool {
        matches!(
            self,
            Self::Lb | Self::Lbu | Self::Lh | Self::Lhu | Self::Lw | Self::Lwl | Self::Lwr
        )
    }

    /// Returns `true` for instructions that write data memory.
    pub fn is_store(self) -> bool {
        matches!(
            self,
            Self::Sb | Self::Sh | Self::Sw | Self::Swl | Self::Swr
        )
    }
}

/// Decoded instruction.
///
/// Immutable once produced by [`crate::isa::decode::decode`]. The meaning of
/// `extra` depends on the format:
/// - R-type: the shift amount.
/// - I-type: the immediate, sign-extended except for `andi`/`ori`/`xori`
///   (zero-extended) and `lui` (already shifted into the upper half).
/// - J-type: the 26-bit target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Instruction {
    /// Raw 32-bit instruction encoding.
    pub raw: u32,
    /// Decoded operation.
    pub op: Op,
    /// First source register index.
    pub rs: usize,
    /// Second source register index (destination for I-type).
    pub rt: usize,
    /// Destination register index for R-type.
    pub rd: usize,
    /// Shift amount, immediate or jump target.
    pub extra: u32,
}

impl Instruction {
    /// The immediate reinterpreted as a signed value.
    #[inline]
    pub fn imm(&self) -> i32 {
        self.extra as i32
    }
}
