use crate::cpu::decode::{R16Mem, R16, R8};
use crate::cpu::{Bus, Cpu};

impl Cpu {
    pub(in crate::cpu) fn exec_ld_r16_imm<B: Bus>(&mut self, bus: &mut B, rr: R16) {
        let value = self.fetch16(bus);
        self.set_r16(rr, value);
    }

    pub(in crate::cpu) fn exec_ld_r8_imm<B: Bus>(&mut self, bus: &mut B, r: R8) {
        let value = self.fetch8(bus);
        self.write_r8(bus, r, value);
    }

    pub(in crate::cpu) fn exec_ld_r8_r8<B: Bus>(&mut self, bus: &mut B, dst: R8, src: R8) {
        let value = self.read_r8(bus, src);
        self.write_r8(bus, dst, value);
    }

    /// Address for `(BC)`, `(DE)`, `(HL+)`, `(HL-)`, applying the HL
    /// post-increment or post-decrement.
    fn indirect_addr(&mut self, mem: R16Mem) -> u16 {
        match mem {
            R16Mem::BC => self.regs.bc(),
            R16Mem::DE => self.regs.de(),
            R16Mem::HlInc => {
                let hl = self.regs.hl();
                self.regs.set_hl(hl.wrapping_add(1));
                hl
            }
            R16Mem::HlDec => {
                let hl = self.regs.hl();
                self.regs.set_hl(hl.wrapping_sub(1));
                hl
            }
        }
    }

    pub(in crate::cpu) fn exec_ld_mem_a<B: Bus>(&mut self, bus: &mut B, mem: R16Mem) {
        let addr = self.indirect_addr(mem);
        self.write_cycle(bus, addr, self.regs.a);
    }

    pub(in crate::cpu) fn exec_ld_a_mem<B: Bus>(&mut self, bus: &mut B, mem: R16Mem) {
        let addr = self.indirect_addr(mem);
        self.regs.a = self.read_cycle(bus, addr);
    }

    /// `LD (nn),SP`: low byte first.
    pub(in crate::cpu) fn exec_ld_imm16_sp<B: Bus>(&mut self, bus: &mut B) {
        let addr = self.fetch16(bus);
        let [lo, hi] = self.regs.sp.to_le_bytes();
        self.write_cycle(bus, addr, lo);
        self.write_cycle(bus, addr.wrapping_add(1), hi);
    }

    pub(in crate::cpu) fn exec_ldh_imm_a<B: Bus>(&mut self, bus: &mut B) {
        let offset = self.fetch8(bus);
        self.write_cycle(bus, 0xFF00 | offset as u16, self.regs.a);
    }

    pub(in crate::cpu) fn exec_ldh_a_imm<B: Bus>(&mut self, bus: &mut B) {
        let offset = self.fetch8(bus);
        self.regs.a = self.read_cycle(bus, 0xFF00 | offset as u16);
    }

    pub(in crate::cpu) fn exec_ldh_c_a<B: Bus>(&mut self, bus: &mut B) {
        self.write_cycle(bus, 0xFF00 | self.regs.c as u16, self.regs.a);
    }

    pub(in crate::cpu) fn exec_ldh_a_c<B: Bus>(&mut self, bus: &mut B) {
        self.regs.a = self.read_cycle(bus, 0xFF00 | self.regs.c as u16);
    }

    pub(in crate::cpu) fn exec_ld_imm16_a<B: Bus>(&mut self, bus: &mut B) {
        let addr = self.fetch16(bus);
        self.write_cycle(bus, addr, self.regs.a);
    }

    pub(in crate::cpu) fn exec_ld_a_imm16<B: Bus>(&mut self, bus: &mut B) {
        let addr = self.fetch16(bus);
        self.regs.a = self.read_cycle(bus, addr);
    }

    /// `ADD SP,e`: 16 T-cycles.
    pub(in crate::cpu) fn exec_add_sp_imm<B: Bus>(&mut self, bus: &mut B) {
        let imm = self.fetch8(bus);
        self.regs.sp = self.alu_add16_signed(self.regs.sp, imm);
        self.idle_cycle(bus);
        self.idle_cycle(bus);
    }

    /// `LD HL,SP+e`: 12 T-cycles.
    pub(in crate::cpu) fn exec_ld_hl_sp_imm<B: Bus>(&mut self, bus: &mut B) {
        let imm = self.fetch8(bus);
        let value = self.alu_add16_signed(self.regs.sp, imm);
        self.regs.set_hl(value);
        self.idle_cycle(bus);
    }
}
