use crate::cpu::decode::R16Stack;
use crate::cpu::{Bus, Cpu};

impl Cpu {
    pub(in crate::cpu) fn exec_push<B: Bus>(&mut self, bus: &mut B, rr: R16Stack) {
        let value = match rr {
            R16Stack::BC => self.regs.bc(),
            R16Stack::DE => self.regs.de(),
            R16Stack::HL => self.regs.hl(),
            R16Stack::AF => self.regs.af(),
        };
        self.idle_cycle(bus);
        self.push_u16(bus, value);
    }

    /// `POP AF` drops the low nibble of F through `set_af`.
    pub(in crate::cpu) fn exec_pop<B: Bus>(&mut self, bus: &mut B, rr: R16Stack) {
        let value = self.pop_u16(bus);
        match rr {
            R16Stack::BC => self.regs.set_bc(value),
            R16Stack::DE => self.regs.set_de(value),
            R16Stack::HL => self.regs.set_hl(value),
            R16Stack::AF => self.regs.set_af(value),
        }
    }
}
