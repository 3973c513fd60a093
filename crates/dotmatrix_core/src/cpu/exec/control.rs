use crate::cpu::decode::Cond;
use crate::cpu::{Bus, Cpu};

impl Cpu {
    /// JR e: 12 T-cycles taken, 8 not taken.
    pub(in crate::cpu) fn exec_jr<B: Bus>(&mut self, bus: &mut B, taken: bool) {
        let offset = self.fetch8(bus) as i8;
        if taken {
            self.regs.pc = self.regs.pc.wrapping_add_signed(offset as i16);
            self.idle_cycle(bus);
        }
    }

    /// JP nn: 16 taken, 12 not taken.
    pub(in crate::cpu) fn exec_jp<B: Bus>(&mut self, bus: &mut B, taken: bool) {
        let addr = self.fetch16(bus);
        if taken {
            self.regs.pc = addr;
            self.idle_cycle(bus);
        }
    }

    /// CALL nn: 24 taken, 12 not taken.
    pub(in crate::cpu) fn exec_call<B: Bus>(&mut self, bus: &mut B, taken: bool) {
        let addr = self.fetch16(bus);
        if taken {
            self.idle_cycle(bus);
            let ret = self.regs.pc;
            self.push_u16(bus, ret);
            self.regs.pc = addr;
        }
    }

    pub(in crate::cpu) fn exec_ret<B: Bus>(&mut self, bus: &mut B) {
        self.regs.pc = self.pop_u16(bus);
        self.idle_cycle(bus);
    }

    /// RET cc: 20 taken, 8 not taken. The condition check itself costs a
    /// cycle.
    pub(in crate::cpu) fn exec_ret_cond<B: Bus>(&mut self, bus: &mut B, cc: Cond) {
        self.idle_cycle(bus);
        if self.condition(cc) {
            self.exec_ret(bus);
        }
    }

    /// RETI enables IME immediately, without the EI delay.
    pub(in crate::cpu) fn exec_reti<B: Bus>(&mut self, bus: &mut B) {
        self.exec_ret(bus);
        bus.interrupts().enable_ime();
    }

    pub(in crate::cpu) fn exec_rst<B: Bus>(&mut self, bus: &mut B, vector: u8) {
        self.idle_cycle(bus);
        let ret = self.regs.pc;
        self.push_u16(bus, ret);
        self.regs.pc = vector as u16;
    }
}
