use crate::cpu::decode::{ShiftOp, R8};
use crate::cpu::{Bus, Cpu, Flags};

impl Cpu {
    /// CB rotate/shift/swap group: read-modify-write of the operand.
    pub(in crate::cpu) fn exec_shift<B: Bus>(&mut self, bus: &mut B, op: ShiftOp, r: R8) {
        let value = self.read_r8(bus, r);
        let carry = u8::from(self.regs.flag(Flags::C));

        let (result, carry_out) = match op {
            ShiftOp::Rlc => (value.rotate_left(1), value & 0x80 != 0),
            ShiftOp::Rrc => (value.rotate_right(1), value & 0x01 != 0),
            ShiftOp::Rl => ((value << 1) | carry, value & 0x80 != 0),
            ShiftOp::Rr => ((value >> 1) | (carry << 7), value & 0x01 != 0),
            ShiftOp::Sla => (value << 1, value & 0x80 != 0),
            ShiftOp::Sra => ((value >> 1) | (value & 0x80), value & 0x01 != 0),
            ShiftOp::Swap => (value.rotate_left(4), false),
            ShiftOp::Srl => (value >> 1, value & 0x01 != 0),
        };

        self.regs.f = Flags::empty();
        self.regs.f.set(Flags::Z, result == 0);
        self.regs.f.set(Flags::C, carry_out);
        self.write_r8(bus, r, result);
    }

    /// BIT b,r: Z = !bit, N cleared, H set, C untouched.
    pub(in crate::cpu) fn exec_bit<B: Bus>(&mut self, bus: &mut B, bit: u8, r: R8) {
        let value = self.read_r8(bus, r);
        self.regs.f.set(Flags::Z, value & (1 << bit) == 0);
        self.regs.f.remove(Flags::N);
        self.regs.f.insert(Flags::H);
    }

    pub(in crate::cpu) fn exec_res_set<B: Bus>(&mut self, bus: &mut B, bit: u8, r: R8, set: bool) {
        let value = self.read_r8(bus, r);
        let result = if set {
            value | (1 << bit)
        } else {
            value & !(1 << bit)
        };
        self.write_r8(bus, r, result);
    }
}
