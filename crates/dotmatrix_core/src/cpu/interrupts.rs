use super::{Bus, Cpu};

impl Cpu {
    /// Dispatch the highest-priority pending interrupt if IME allows it.
    ///
    /// Two internal M-cycles, PC pushed high byte first, then one more cycle
    /// to load the vector: 20 T-cycles in total. Returns whether a dispatch
    /// happened.
    pub(super) fn service_interrupt<B: Bus>(&mut self, bus: &mut B) -> bool {
        let ic = bus.interrupts();
        if !ic.ime() || ic.pending() == 0 {
            return false;
        }
        ic.disable_ime();
        self.halted = false;

        self.idle_cycle(bus);
        self.idle_cycle(bus);

        let pc = self.regs.pc;
        let [hi, lo] = pc.to_be_bytes();

        // The high-byte push can land on IE (SP=0x0000), so the line is
        // chosen only after it has been written.
        self.regs.sp = self.regs.sp.wrapping_sub(1);
        self.write_cycle(bus, self.regs.sp, hi);
        let selected = bus.interrupts().highest_pending();

        self.regs.sp = self.regs.sp.wrapping_sub(1);
        self.write_cycle(bus, self.regs.sp, lo);

        match selected {
            Some(interrupt) => {
                let ic = bus.interrupts();
                ic.acknowledge(interrupt);
                log::debug!(
                    "CPU interrupt: {interrupt:?} vector=0x{vector:04X} pc=0x{pc:04X} sp=0x{sp:04X} IF=0x{iflags:02X} IE=0x{ie:02X}",
                    vector = interrupt.vector(),
                    sp = self.regs.sp,
                    iflags = ic.flags(),
                    ie = ic.enable(),
                );
                self.regs.pc = interrupt.vector();
            }
            None => {
                // Dispatch cancelled by the IE write above.
                self.regs.pc = 0x0000;
            }
        }

        self.idle_cycle(bus);
        true
    }
}
