use crate::cpu::decode::{AluOp, Instruction};
use crate::cpu::{Cpu, Flags};

impl Cpu {
    pub(in crate::cpu) fn alu(&mut self, op: AluOp, value: u8) {
        match op {
            AluOp::Add => self.alu_add(value, false),
            AluOp::Adc => self.alu_add(value, true),
            AluOp::Sub => self.alu_sub(value, false),
            AluOp::Sbc => self.alu_sub(value, true),
            AluOp::And => self.alu_and(value),
            AluOp::Xor => self.alu_xor(value),
            AluOp::Or => self.alu_or(value),
            AluOp::Cp => self.alu_cp(value),
        }
    }

    /// ADD/ADC on A. H from bit 3, C from bit 7.
    fn alu_add(&mut self, value: u8, use_carry: bool) {
        let a = self.regs.a;
        let carry_in = u8::from(use_carry && self.regs.flag(Flags::C));

        let half = (a & 0x0F) + (value & 0x0F) + carry_in;
        let full = a as u16 + value as u16 + carry_in as u16;
        let result = full as u8;

        self.regs.a = result;
        self.regs.f = Flags::empty();
        self.regs.f.set(Flags::Z, result == 0);
        self.regs.f.set(Flags::H, half > 0x0F);
        self.regs.f.set(Flags::C, full > 0xFF);
    }

    /// SUB/SBC on A. H and C are borrows.
    fn alu_sub(&mut self, value: u8, use_carry: bool) {
        let result = self.sub_flags(value, use_carry);
        self.regs.a = result;
    }

    /// CP: flags of `A - value`, A untouched.
    fn alu_cp(&mut self, value: u8) {
        self.sub_flags(value, false);
    }

    fn sub_flags(&mut self, value: u8, use_carry: bool) -> u8 {
        let a = self.regs.a;
        let carry_in = i16::from(use_carry && self.regs.flag(Flags::C));

        let half = (a & 0x0F) as i16 - (value & 0x0F) as i16 - carry_in;
        let full = a as i16 - value as i16 - carry_in;
        let result = full as u8;

        self.regs.f = Flags::N;
        self.regs.f.set(Flags::Z, result == 0);
        self.regs.f.set(Flags::H, half < 0);
        self.regs.f.set(Flags::C, full < 0);
        result
    }

    fn alu_and(&mut self, value: u8) {
        self.regs.a &= value;
        self.regs.f = Flags::H;
        self.regs.f.set(Flags::Z, self.regs.a == 0);
    }

    fn alu_or(&mut self, value: u8) {
        self.regs.a |= value;
        self.regs.f = Flags::empty();
        self.regs.f.set(Flags::Z, self.regs.a == 0);
    }

    fn alu_xor(&mut self, value: u8) {
        self.regs.a ^= value;
        self.regs.f = Flags::empty();
        self.regs.f.set(Flags::Z, self.regs.a == 0);
    }

    /// Decimal adjust after a BCD add or subtract. N is preserved.
    pub(in crate::cpu) fn alu_daa(&mut self) {
        let mut a = self.regs.a;
        let mut adjust: u8 = if self.regs.flag(Flags::C) { 0x60 } else { 0x00 };
        if self.regs.flag(Flags::H) {
            adjust |= 0x06;
        }

        if !self.regs.flag(Flags::N) {
            if a & 0x0F > 0x09 {
                adjust |= 0x06;
            }
            if a > 0x99 {
                adjust |= 0x60;
            }
            a = a.wrapping_add(adjust);
        } else {
            a = a.wrapping_sub(adjust);
        }

        self.regs.f.set(Flags::C, adjust >= 0x60);
        self.regs.f.remove(Flags::H);
        self.regs.f.set(Flags::Z, a == 0);
        self.regs.a = a;
    }

    /// INC helper: Z N H, carry untouched.
    pub(in crate::cpu) fn alu_inc8(&mut self, value: u8) -> u8 {
        let result = value.wrapping_add(1);
        self.regs.f.set(Flags::Z, result == 0);
        self.regs.f.remove(Flags::N);
        self.regs.f.set(Flags::H, value & 0x0F == 0x0F);
        result
    }

    /// DEC helper: Z N H, carry untouched.
    pub(in crate::cpu) fn alu_dec8(&mut self, value: u8) -> u8 {
        let result = value.wrapping_sub(1);
        self.regs.f.set(Flags::Z, result == 0);
        self.regs.f.insert(Flags::N);
        self.regs.f.set(Flags::H, value & 0x0F == 0);
        result
    }

    /// `ADD HL,rr`: Z untouched, H from bit 11, C from bit 15.
    pub(in crate::cpu) fn alu_add16_hl(&mut self, value: u16) {
        let hl = self.regs.hl();
        self.regs.f.remove(Flags::N);
        self.regs.f.set(Flags::H, (hl & 0x0FFF) + (value & 0x0FFF) > 0x0FFF);
        self.regs.f.set(Flags::C, hl as u32 + value as u32 > 0xFFFF);
        self.regs.set_hl(hl.wrapping_add(value));
    }

    /// SP plus a signed immediate (`ADD SP,e` and `LD HL,SP+e`). Flags come
    /// from the unsigned low-byte addition; Z and N are cleared.
    pub(in crate::cpu) fn alu_add16_signed(&mut self, base: u16, imm8: u8) -> u16 {
        let offset = imm8 as i8 as i16 as u16;
        self.regs.f = Flags::empty();
        self.regs.f.set(Flags::H, (base & 0x000F) + (offset & 0x000F) > 0x000F);
        self.regs.f.set(Flags::C, (base & 0x00FF) + (offset & 0x00FF) > 0x00FF);
        base.wrapping_add(offset)
    }

    /// RLCA/RRCA/RLA/RRA. Unlike the CB forms, Z is always cleared.
    pub(in crate::cpu) fn exec_rotate_a(&mut self, instr: Instruction) {
        let a = self.regs.a;
        let carry = u8::from(self.regs.flag(Flags::C));
        let (result, carry_out) = match instr {
            Instruction::Rlca => (a.rotate_left(1), a & 0x80 != 0),
            Instruction::Rrca => (a.rotate_right(1), a & 0x01 != 0),
            Instruction::Rla => ((a << 1) | carry, a & 0x80 != 0),
            Instruction::Rra => ((a >> 1) | (carry << 7), a & 0x01 != 0),
            _ => return,
        };
        self.regs.a = result;
        self.regs.f = Flags::empty();
        self.regs.f.set(Flags::C, carry_out);
    }
}
