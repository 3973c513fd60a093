//! Mnemonics and a one-instruction disassembler for debugging surfaces.
//!
//! The `Display` form of an [`Instruction`] uses operand placeholders
//! (`d8`, `d16`, `a8`, `a16`, `r8`); [`disassemble`] fills them in from the
//! bytes that follow the opcode.

use std::fmt;

use super::decode::{
    AluOp, Cond, Instruction, R16Mem, R16Stack, ShiftOp, R16, R8, BASE_TABLE, CB_TABLE,
};

impl fmt::Display for R8 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            R8::B => "B",
            R8::C => "C",
            R8::D => "D",
            R8::E => "E",
            R8::H => "H",
            R8::L => "L",
            R8::HlInd => "(HL)",
            R8::A => "A",
        })
    }
}

impl fmt::Display for R16 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            R16::BC => "BC",
            R16::DE => "DE",
            R16::HL => "HL",
            R16::SP => "SP",
        })
    }
}

impl fmt::Display for R16Stack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            R16Stack::BC => "BC",
            R16Stack::DE => "DE",
            R16Stack::HL => "HL",
            R16Stack::AF => "AF",
        })
    }
}

impl fmt::Display for R16Mem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            R16Mem::BC => "(BC)",
            R16Mem::DE => "(DE)",
            R16Mem::HlInc => "(HL+)",
            R16Mem::HlDec => "(HL-)",
        })
    }
}

impl fmt::Display for Cond {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Cond::NZ => "NZ",
            Cond::Z => "Z",
            Cond::NC => "NC",
            Cond::C => "C",
        })
    }
}

impl AluOp {
    /// Mnemonic prefix including the `A,` operand where the assembler
    /// syntax has one.
    fn prefix(self) -> &'static str {
        match self {
            AluOp::Add => "ADD A,",
            AluOp::Adc => "ADC A,",
            AluOp::Sub => "SUB ",
            AluOp::Sbc => "SBC A,",
            AluOp::And => "AND ",
            AluOp::Xor => "XOR ",
            AluOp::Or => "OR ",
            AluOp::Cp => "CP ",
        }
    }
}

impl fmt::Display for ShiftOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ShiftOp::Rlc => "RLC",
            ShiftOp::Rrc => "RRC",
            ShiftOp::Rl => "RL",
            ShiftOp::Rr => "RR",
            ShiftOp::Sla => "SLA",
            ShiftOp::Sra => "SRA",
            ShiftOp::Swap => "SWAP",
            ShiftOp::Srl => "SRL",
        })
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Instruction as I;

        match self {
            I::Nop => write!(f, "NOP"),
            I::Stop => write!(f, "STOP"),
            I::Halt => write!(f, "HALT"),
            I::Di => write!(f, "DI"),
            I::Ei => write!(f, "EI"),
            I::LdR16Imm(rr) => write!(f, "LD {rr},d16"),
            I::LdMemA(mem) => write!(f, "LD {mem},A"),
            I::LdAMem(mem) => write!(f, "LD A,{mem}"),
            I::LdImm16Sp => write!(f, "LD (a16),SP"),
            I::IncR16(rr) => write!(f, "INC {rr}"),
            I::DecR16(rr) => write!(f, "DEC {rr}"),
            I::AddHl(rr) => write!(f, "ADD HL,{rr}"),
            I::IncR8(r) => write!(f, "INC {r}"),
            I::DecR8(r) => write!(f, "DEC {r}"),
            I::LdR8Imm(r) => write!(f, "LD {r},d8"),
            I::LdR8R8(dst, src) => write!(f, "LD {dst},{src}"),
            I::Rlca => write!(f, "RLCA"),
            I::Rrca => write!(f, "RRCA"),
            I::Rla => write!(f, "RLA"),
            I::Rra => write!(f, "RRA"),
            I::Daa => write!(f, "DAA"),
            I::Cpl => write!(f, "CPL"),
            I::Scf => write!(f, "SCF"),
            I::Ccf => write!(f, "CCF"),
            I::AluR8(op, r) => write!(f, "{}{r}", op.prefix()),
            I::AluImm(op) => write!(f, "{}d8", op.prefix()),
            I::Jr => write!(f, "JR r8"),
            I::JrCond(cc) => write!(f, "JR {cc},r8"),
            I::Jp => write!(f, "JP a16"),
            I::JpCond(cc) => write!(f, "JP {cc},a16"),
            I::JpHl => write!(f, "JP HL"),
            I::Call => write!(f, "CALL a16"),
            I::CallCond(cc) => write!(f, "CALL {cc},a16"),
            I::Ret => write!(f, "RET"),
            I::RetCond(cc) => write!(f, "RET {cc}"),
            I::Reti => write!(f, "RETI"),
            I::Rst(vector) => write!(f, "RST {vector:02X}H"),
            I::Push(rr) => write!(f, "PUSH {rr}"),
            I::Pop(rr) => write!(f, "POP {rr}"),
            I::LdhImmA => write!(f, "LDH (a8),A"),
            I::LdhAImm => write!(f, "LDH A,(a8)"),
            I::LdhCA => write!(f, "LD (C),A"),
            I::LdhAC => write!(f, "LD A,(C)"),
            I::LdImm16A => write!(f, "LD (a16),A"),
            I::LdAImm16 => write!(f, "LD A,(a16)"),
            I::AddSpImm => write!(f, "ADD SP,r8"),
            I::LdHlSpImm => write!(f, "LD HL,SP+r8"),
            I::LdSpHl => write!(f, "LD SP,HL"),
            I::Prefix => write!(f, "PREFIX CB"),
            I::Shift(op, r) => write!(f, "{op} {r}"),
            I::Bit(bit, r) => write!(f, "BIT {bit},{r}"),
            I::Res(bit, r) => write!(f, "RES {bit},{r}"),
            I::Set(bit, r) => write!(f, "SET {bit},{r}"),
            I::Illegal(op) => write!(f, "ILLEGAL ${op:02X}"),
        }
    }
}

/// One disassembled instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisasmLine {
    pub addr: u16,
    pub bytes: Vec<u8>,
    pub text: String,
}

impl fmt::Display for DisasmLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04X}: ", self.addr)?;
        for byte in &self.bytes {
            write!(f, "{byte:02X} ")?;
        }
        for _ in self.bytes.len()..3 {
            f.write_str("   ")?;
        }
        write!(f, " {}", self.text)
    }
}

/// Decode the instruction at `addr`, reading bytes through `read`.
///
/// Relative jumps are rendered with their resolved target address.
pub fn disassemble(mut read: impl FnMut(u16) -> u8, addr: u16) -> DisasmLine {
    let opcode = read(addr);
    let mut instr = BASE_TABLE[opcode as usize];
    if let Instruction::Prefix = instr {
        instr = CB_TABLE[read(addr.wrapping_add(1)) as usize];
    }

    let len = instr.length() as u16;
    let bytes: Vec<u8> = (0..len).map(|i| read(addr.wrapping_add(i))).collect();
    let template = instr.to_string();

    let text = match instr {
        Instruction::Prefix | Instruction::Shift(..) | Instruction::Bit(..) => template,
        Instruction::Res(..) | Instruction::Set(..) => template,
        _ if len == 3 => {
            let value = u16::from_le_bytes([bytes[1], bytes[2]]);
            template
                .replace("d16", &format!("${value:04X}"))
                .replace("a16", &format!("${value:04X}"))
        }
        _ if len == 2 => {
            let value = bytes[1];
            if template.contains("r8") {
                let next = addr.wrapping_add(2);
                let rendered = if matches!(instr, Instruction::Jr | Instruction::JrCond(_)) {
                    format!("${:04X}", next.wrapping_add_signed(value as i8 as i16))
                } else {
                    format!("{}", value as i8)
                };
                template.replace("r8", &rendered)
            } else {
                template
                    .replace("d8", &format!("${value:02X}"))
                    .replace("(a8)", &format!("(${:04X})", 0xFF00 | value as u16))
            }
        }
        _ => template,
    };

    DisasmLine { addr, bytes, text }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn disasm_bytes(bytes: &[u8]) -> String {
        let mut memory = vec![0u8; 0x10000];
        memory[0x0100..0x0100 + bytes.len()].copy_from_slice(bytes);
        disassemble(|addr| memory[addr as usize], 0x0100).text
    }

    #[test]
    fn renders_immediates() {
        assert_eq!(disasm_bytes(&[0x3E, 0x42]), "LD A,$42");
        assert_eq!(disasm_bytes(&[0xC3, 0x50, 0x01]), "JP $0150");
        assert_eq!(disasm_bytes(&[0x21, 0x00, 0xC0]), "LD HL,$C000");
        assert_eq!(disasm_bytes(&[0xE0, 0x40]), "LDH ($FF40),A");
        assert_eq!(disasm_bytes(&[0xFE, 0x90]), "CP $90");
    }

    #[test]
    fn relative_jumps_show_target() {
        // JR -2 loops on itself.
        assert_eq!(disasm_bytes(&[0x18, 0xFE]), "JR $0100");
        assert_eq!(disasm_bytes(&[0x20, 0x05]), "JR NZ,$0107");
        assert_eq!(disasm_bytes(&[0xE8, 0xF0]), "ADD SP,-16");
    }

    #[test]
    fn prefixed_and_plain() {
        assert_eq!(disasm_bytes(&[0xCB, 0x7C]), "BIT 7,H");
        assert_eq!(disasm_bytes(&[0xCB, 0x36]), "SWAP (HL)");
        assert_eq!(disasm_bytes(&[0xAF]), "XOR A");
        assert_eq!(disasm_bytes(&[0x22]), "LD (HL+),A");
        assert_eq!(disasm_bytes(&[0xFF]), "RST 38H");
        assert_eq!(disasm_bytes(&[0xD3]), "ILLEGAL $D3");
    }

    #[test]
    fn line_lists_encoded_bytes() {
        let memory = [0xCD, 0x34, 0x12];
        let line = disassemble(|addr| memory[addr as usize], 0x0000);
        assert_eq!(line.bytes, vec![0xCD, 0x34, 0x12]);
        assert_eq!(line.to_string(), "0000: CD 34 12  CALL $1234");
    }
}
