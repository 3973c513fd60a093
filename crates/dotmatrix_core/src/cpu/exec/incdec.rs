use crate::cpu::decode::{R16, R8};
use crate::cpu::{Bus, Cpu};

impl Cpu {
    pub(in crate::cpu) fn exec_inc_r8<B: Bus>(&mut self, bus: &mut B, r: R8) {
        let value = self.read_r8(bus, r);
        let result = self.alu_inc8(value);
        self.write_r8(bus, r, result);
    }

    pub(in crate::cpu) fn exec_dec_r8<B: Bus>(&mut self, bus: &mut B, r: R8) {
        let value = self.read_r8(bus, r);
        let result = self.alu_dec8(value);
        self.write_r8(bus, r, result);
    }

    /// 16-bit INC/DEC leave flags alone and take one internal cycle.
    pub(in crate::cpu) fn exec_inc_r16<B: Bus>(&mut self, bus: &mut B, rr: R16) {
        let value = self.r16(rr).wrapping_add(1);
        self.set_r16(rr, value);
        self.idle_cycle(bus);
    }

    pub(in crate::cpu) fn exec_dec_r16<B: Bus>(&mut self, bus: &mut B, rr: R16) {
        let value = self.r16(rr).wrapping_sub(1);
        self.set_r16(rr, value);
        self.idle_cycle(bus);
    }

    pub(in crate::cpu) fn exec_add_hl<B: Bus>(&mut self, bus: &mut B, rr: R16) {
        let value = self.r16(rr);
        self.alu_add16_hl(value);
        self.idle_cycle(bus);
    }
}
