use crate::cpu::{Bus, Cpu};

impl Cpu {
    /// STOP is two bytes; the padding byte is fetched and ignored. The CPU
    /// then idles until a joypad line goes low.
    pub(in crate::cpu) fn exec_stop<B: Bus>(&mut self, bus: &mut B) {
        let _padding = self.fetch8(bus);
        self.stopped = true;
        self.halted = false;
        log::debug!("CPU entered STOP at PC=0x{:04X}", self.regs.pc);
    }

    /// HALT with IME=0 and an interrupt already pending does not halt;
    /// instead the next opcode byte is read twice.
    pub(in crate::cpu) fn exec_halt<B: Bus>(&mut self, bus: &mut B) {
        let ic = bus.interrupts();
        if !ic.ime() && ic.pending() != 0 {
            self.halt_bug = true;
        } else {
            self.halted = true;
        }
    }

    /// DI also cancels an EI that has not taken effect yet.
    pub(in crate::cpu) fn exec_di<B: Bus>(&mut self, bus: &mut B) {
        bus.interrupts().disable_ime();
        self.ime_pending = false;
    }

    pub(in crate::cpu) fn exec_ei(&mut self) {
        self.ime_pending = true;
    }
}
