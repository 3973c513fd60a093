//! Opcode decode tables.
//!
//! Every opcode byte (and every byte following a `0xCB` prefix) maps to an
//! [`Instruction`] descriptor. The two 256-entry tables are built at compile
//! time from the usual `x/y/z/p/q` bit-field split of the opcode, so the
//! execute stage only ever matches on an enum.

/// 8-bit operand in standard register order (index 6 is `(HL)`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum R8 {
    B,
    C,
    D,
    E,
    H,
    L,
    HlInd,
    A,
}

impl R8 {
    const fn from_index(index: u8) -> R8 {
        match index & 0x07 {
            0 => R8::B,
            1 => R8::C,
            2 => R8::D,
            3 => R8::E,
            4 => R8::H,
            5 => R8::L,
            6 => R8::HlInd,
            _ => R8::A,
        }
    }
}

/// 16-bit register operand of the `LD rr,d16` / `INC rr` / `ADD HL,rr` group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum R16 {
    BC,
    DE,
    HL,
    SP,
}

impl R16 {
    const fn from_index(index: u8) -> R16 {
        match index & 0x03 {
            0 => R16::BC,
            1 => R16::DE,
            2 => R16::HL,
            _ => R16::SP,
        }
    }
}

/// 16-bit register operand of `PUSH`/`POP`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum R16Stack {
    BC,
    DE,
    HL,
    AF,
}

impl R16Stack {
    const fn from_index(index: u8) -> R16Stack {
        match index & 0x03 {
            0 => R16Stack::BC,
            1 => R16Stack::DE,
            2 => R16Stack::HL,
            _ => R16Stack::AF,
        }
    }
}

/// Indirect address operand of `LD (rr),A` / `LD A,(rr)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum R16Mem {
    BC,
    DE,
    HlInc,
    HlDec,
}

impl R16Mem {
    const fn from_index(index: u8) -> R16Mem {
        match index & 0x03 {
            0 => R16Mem::BC,
            1 => R16Mem::DE,
            2 => R16Mem::HlInc,
            _ => R16Mem::HlDec,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cond {
    NZ,
    Z,
    NC,
    C,
}

impl Cond {
    const fn from_index(index: u8) -> Cond {
        match index & 0x03 {
            0 => Cond::NZ,
            1 => Cond::Z,
            2 => Cond::NC,
            _ => Cond::C,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AluOp {
    Add,
    Adc,
    Sub,
    Sbc,
    And,
    Xor,
    Or,
    Cp,
}

impl AluOp {
    const fn from_index(index: u8) -> AluOp {
        match index & 0x07 {
            0 => AluOp::Add,
            1 => AluOp::Adc,
            2 => AluOp::Sub,
            3 => AluOp::Sbc,
            4 => AluOp::And,
            5 => AluOp::Xor,
            6 => AluOp::Or,
            _ => AluOp::Cp,
        }
    }
}

/// Rotate/shift group of the CB-prefixed table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShiftOp {
    Rlc,
    Rrc,
    Rl,
    Rr,
    Sla,
    Sra,
    Swap,
    Srl,
}

impl ShiftOp {
    const fn from_index(index: u8) -> ShiftOp {
        match index & 0x07 {
            0 => ShiftOp::Rlc,
            1 => ShiftOp::Rrc,
            2 => ShiftOp::Rl,
            3 => ShiftOp::Rr,
            4 => ShiftOp::Sla,
            5 => ShiftOp::Sra,
            6 => ShiftOp::Swap,
            _ => ShiftOp::Srl,
        }
    }
}

/// Decoded instruction descriptor.
///
/// Immediate operands are not part of the descriptor; the execute stage
/// fetches them itself so that each operand byte costs its own M-cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    Nop,
    Stop,
    Halt,
    Di,
    Ei,

    LdR16Imm(R16),
    LdMemA(R16Mem),
    LdAMem(R16Mem),
    LdImm16Sp,
    IncR16(R16),
    DecR16(R16),
    AddHl(R16),

    IncR8(R8),
    DecR8(R8),
    LdR8Imm(R8),
    LdR8R8(R8, R8),

    Rlca,
    Rrca,
    Rla,
    Rra,
    Daa,
    Cpl,
    Scf,
    Ccf,

    AluR8(AluOp, R8),
    AluImm(AluOp),

    Jr,
    JrCond(Cond),
    Jp,
    JpCond(Cond),
    JpHl,
    Call,
    CallCond(Cond),
    Ret,
    RetCond(Cond),
    Reti,
    Rst(u8),
    Push(R16Stack),
    Pop(R16Stack),

    LdhImmA,
    LdhAImm,
    LdhCA,
    LdhAC,
    LdImm16A,
    LdAImm16,
    AddSpImm,
    LdHlSpImm,
    LdSpHl,

    /// `0xCB`: the real instruction comes from [`CB_TABLE`].
    Prefix,

    Shift(ShiftOp, R8),
    Bit(u8, R8),
    Res(u8, R8),
    Set(u8, R8),

    /// One of the eleven opcode holes (D3, DB, DD, E3, E4, EB, EC, ED, F4,
    /// FC, FD).
    Illegal(u8),
}

impl Instruction {
    /// Encoded length in bytes, including the opcode (and CB prefix).
    pub const fn length(&self) -> u8 {
        match self {
            Instruction::LdR16Imm(_)
            | Instruction::LdImm16Sp
            | Instruction::Jp
            | Instruction::JpCond(_)
            | Instruction::Call
            | Instruction::CallCond(_)
            | Instruction::LdImm16A
            | Instruction::LdAImm16 => 3,

            Instruction::LdR8Imm(_)
            | Instruction::AluImm(_)
            | Instruction::Jr
            | Instruction::JrCond(_)
            | Instruction::LdhImmA
            | Instruction::LdhAImm
            | Instruction::AddSpImm
            | Instruction::LdHlSpImm
            | Instruction::Stop
            | Instruction::Prefix
            | Instruction::Shift(..)
            | Instruction::Bit(..)
            | Instruction::Res(..)
            | Instruction::Set(..) => 2,

            _ => 1,
        }
    }
}

const fn decode_base(opcode: u8) -> Instruction {
    let x = opcode >> 6;
    let y = (opcode >> 3) & 0x07;
    let z = opcode & 0x07;
    let p = y >> 1;
    let q = y & 0x01;

    match x {
        0 => match z {
            0 => match y {
                0 => Instruction::Nop,
                1 => Instruction::LdImm16Sp,
                2 => Instruction::Stop,
                3 => Instruction::Jr,
                _ => Instruction::JrCond(Cond::from_index(y - 4)),
            },
            1 => {
                if q == 0 {
                    Instruction::LdR16Imm(R16::from_index(p))
                } else {
                    Instruction::AddHl(R16::from_index(p))
                }
            }
            2 => {
                if q == 0 {
                    Instruction::LdMemA(R16Mem::from_index(p))
                } else {
                    Instruction::LdAMem(R16Mem::from_index(p))
                }
            }
            3 => {
                if q == 0 {
                    Instruction::IncR16(R16::from_index(p))
                } else {
                    Instruction::DecR16(R16::from_index(p))
                }
            }
            4 => Instruction::IncR8(R8::from_index(y)),
            5 => Instruction::DecR8(R8::from_index(y)),
            6 => Instruction::LdR8Imm(R8::from_index(y)),
            _ => match y {
                0 => Instruction::Rlca,
                1 => Instruction::Rrca,
                2 => Instruction::Rla,
                3 => Instruction::Rra,
                4 => Instruction::Daa,
                5 => Instruction::Cpl,
                6 => Instruction::Scf,
                _ => Instruction::Ccf,
            },
        },
        1 => {
            if y == 6 && z == 6 {
                Instruction::Halt
            } else {
                Instruction::LdR8R8(R8::from_index(y), R8::from_index(z))
            }
        }
        2 => Instruction::AluR8(AluOp::from_index(y), R8::from_index(z)),
        _ => match z {
            0 => match y {
                0..=3 => Instruction::RetCond(Cond::from_index(y)),
                4 => Instruction::LdhImmA,
                5 => Instruction::AddSpImm,
                6 => Instruction::LdhAImm,
                _ => Instruction::LdHlSpImm,
            },
            1 => {
                if q == 0 {
                    Instruction::Pop(R16Stack::from_index(p))
                } else {
                    match p {
                        0 => Instruction::Ret,
                        1 => Instruction::Reti,
                        2 => Instruction::JpHl,
                        _ => Instruction::LdSpHl,
                    }
                }
            }
            2 => match y {
                0..=3 => Instruction::JpCond(Cond::from_index(y)),
                4 => Instruction::LdhCA,
                5 => Instruction::LdImm16A,
                6 => Instruction::LdhAC,
                _ => Instruction::LdAImm16,
            },
            3 => match y {
                0 => Instruction::Jp,
                1 => Instruction::Prefix,
                6 => Instruction::Di,
                7 => Instruction::Ei,
                _ => Instruction::Illegal(opcode),
            },
            4 => match y {
                0..=3 => Instruction::CallCond(Cond::from_index(y)),
                _ => Instruction::Illegal(opcode),
            },
            5 => {
                if q == 0 {
                    Instruction::Push(R16Stack::from_index(p))
                } else if p == 0 {
                    Instruction::Call
                } else {
                    Instruction::Illegal(opcode)
                }
            }
            6 => Instruction::AluImm(AluOp::from_index(y)),
            _ => Instruction::Rst(y * 8),
        },
    }
}

const fn decode_cb(opcode: u8) -> Instruction {
    let y = (opcode >> 3) & 0x07;
    let reg = R8::from_index(opcode & 0x07);
    match opcode >> 6 {
        0 => Instruction::Shift(ShiftOp::from_index(y), reg),
        1 => Instruction::Bit(y, reg),
        2 => Instruction::Res(y, reg),
        _ => Instruction::Set(y, reg),
    }
}

const fn build_table(prefixed: bool) -> [Instruction; 256] {
    let mut table = [Instruction::Nop; 256];
    let mut i = 0;
    while i < 256 {
        table[i] = if prefixed {
            decode_cb(i as u8)
        } else {
            decode_base(i as u8)
        };
        i += 1;
    }
    table
}

/// Unprefixed opcode table.
pub static BASE_TABLE: [Instruction; 256] = build_table(false);
/// Table for the byte following a `0xCB` prefix.
pub static CB_TABLE: [Instruction; 256] = build_table(true);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exactly_eleven_holes() {
        let holes: Vec<u8> = BASE_TABLE
            .iter()
            .filter_map(|instr| match instr {
                Instruction::Illegal(op) => Some(*op),
                _ => None,
            })
            .collect();
        assert_eq!(
            holes,
            vec![0xD3, 0xDB, 0xDD, 0xE3, 0xE4, 0xEB, 0xEC, 0xED, 0xF4, 0xFC, 0xFD]
        );
    }

    #[test]
    fn spot_check_decoding() {
        assert_eq!(BASE_TABLE[0x76], Instruction::Halt);
        assert_eq!(BASE_TABLE[0x46], Instruction::LdR8R8(R8::B, R8::HlInd));
        assert_eq!(BASE_TABLE[0xFE], Instruction::AluImm(AluOp::Cp));
        assert_eq!(BASE_TABLE[0xF1], Instruction::Pop(R16Stack::AF));
        assert_eq!(BASE_TABLE[0x3A], Instruction::LdAMem(R16Mem::HlDec));
        assert_eq!(BASE_TABLE[0xEF], Instruction::Rst(0x28));
        assert_eq!(CB_TABLE[0x7E], Instruction::Bit(7, R8::HlInd));
        assert_eq!(CB_TABLE[0x37], Instruction::Shift(ShiftOp::Swap, R8::A));
    }

    #[test]
    fn lengths() {
        assert_eq!(BASE_TABLE[0x00].length(), 1);
        assert_eq!(BASE_TABLE[0x3E].length(), 2);
        assert_eq!(BASE_TABLE[0xCD].length(), 3);
        assert_eq!(BASE_TABLE[0x10].length(), 2);
        assert_eq!(CB_TABLE[0x11].length(), 2);
    }
}
