mod alu;
mod bits;
mod control;
mod incdec;
mod ld;
mod stack;
mod system;

use super::decode::{Cond, Instruction, R16, R8};
use super::{Bus, Cpu, Flags};

impl Cpu {
    /// Execute a decoded instruction. The opcode (and CB prefix) has already
    /// been fetched; every further M-cycle is ticked by the handlers.
    pub(super) fn execute<B: Bus>(&mut self, bus: &mut B, instr: Instruction) {
        use Instruction as I;

        match instr {
            I::Nop => {}
            I::Stop => self.exec_stop(bus),
            I::Halt => self.exec_halt(bus),
            I::Di => self.exec_di(bus),
            I::Ei => self.exec_ei(),

            I::LdR16Imm(rr) => self.exec_ld_r16_imm(bus, rr),
            I::LdMemA(mem) => self.exec_ld_mem_a(bus, mem),
            I::LdAMem(mem) => self.exec_ld_a_mem(bus, mem),
            I::LdImm16Sp => self.exec_ld_imm16_sp(bus),
            I::IncR16(rr) => self.exec_inc_r16(bus, rr),
            I::DecR16(rr) => self.exec_dec_r16(bus, rr),
            I::AddHl(rr) => self.exec_add_hl(bus, rr),

            I::IncR8(r) => self.exec_inc_r8(bus, r),
            I::DecR8(r) => self.exec_dec_r8(bus, r),
            I::LdR8Imm(r) => self.exec_ld_r8_imm(bus, r),
            I::LdR8R8(dst, src) => self.exec_ld_r8_r8(bus, dst, src),

            I::Rlca | I::Rrca | I::Rla | I::Rra => self.exec_rotate_a(instr),
            I::Daa => self.alu_daa(),
            I::Cpl => {
                self.regs.a = !self.regs.a;
                self.regs.f.insert(Flags::N | Flags::H);
            }
            I::Scf => {
                self.regs.f.remove(Flags::N | Flags::H);
                self.regs.f.insert(Flags::C);
            }
            I::Ccf => {
                self.regs.f.remove(Flags::N | Flags::H);
                self.regs.f.toggle(Flags::C);
            }

            I::AluR8(op, r) => {
                let value = self.read_r8(bus, r);
                self.alu(op, value);
            }
            I::AluImm(op) => {
                let value = self.fetch8(bus);
                self.alu(op, value);
            }

            I::Jr => self.exec_jr(bus, true),
            I::JrCond(cc) => {
                let taken = self.condition(cc);
                self.exec_jr(bus, taken);
            }
            I::Jp => self.exec_jp(bus, true),
            I::JpCond(cc) => {
                let taken = self.condition(cc);
                self.exec_jp(bus, taken);
            }
            I::JpHl => self.regs.pc = self.regs.hl(),
            I::Call => self.exec_call(bus, true),
            I::CallCond(cc) => {
                let taken = self.condition(cc);
                self.exec_call(bus, taken);
            }
            I::Ret => self.exec_ret(bus),
            I::RetCond(cc) => self.exec_ret_cond(bus, cc),
            I::Reti => self.exec_reti(bus),
            I::Rst(vector) => self.exec_rst(bus, vector),
            I::Push(rr) => self.exec_push(bus, rr),
            I::Pop(rr) => self.exec_pop(bus, rr),

            I::LdhImmA => self.exec_ldh_imm_a(bus),
            I::LdhAImm => self.exec_ldh_a_imm(bus),
            I::LdhCA => self.exec_ldh_c_a(bus),
            I::LdhAC => self.exec_ldh_a_c(bus),
            I::LdImm16A => self.exec_ld_imm16_a(bus),
            I::LdAImm16 => self.exec_ld_a_imm16(bus),
            I::AddSpImm => self.exec_add_sp_imm(bus),
            I::LdHlSpImm => self.exec_ld_hl_sp_imm(bus),
            I::LdSpHl => {
                self.regs.sp = self.regs.hl();
                self.idle_cycle(bus);
            }

            I::Shift(op, r) => self.exec_shift(bus, op, r),
            I::Bit(bit, r) => self.exec_bit(bus, bit, r),
            I::Res(bit, r) => self.exec_res_set(bus, bit, r, false),
            I::Set(bit, r) => self.exec_res_set(bus, bit, r, true),

            // Resolved in `step` before execution.
            I::Prefix | I::Illegal(_) => {}
        }
    }

    /// Read an 8-bit operand. `(HL)` costs one M-cycle.
    pub(super) fn read_r8<B: Bus>(&mut self, bus: &mut B, r: R8) -> u8 {
        match r {
            R8::B => self.regs.b,
            R8::C => self.regs.c,
            R8::D => self.regs.d,
            R8::E => self.regs.e,
            R8::H => self.regs.h,
            R8::L => self.regs.l,
            R8::HlInd => self.read_cycle(bus, self.regs.hl()),
            R8::A => self.regs.a,
        }
    }

    /// Write an 8-bit operand. `(HL)` costs one M-cycle.
    pub(super) fn write_r8<B: Bus>(&mut self, bus: &mut B, r: R8, value: u8) {
        match r {
            R8::B => self.regs.b = value,
            R8::C => self.regs.c = value,
            R8::D => self.regs.d = value,
            R8::E => self.regs.e = value,
            R8::H => self.regs.h = value,
            R8::L => self.regs.l = value,
            R8::HlInd => self.write_cycle(bus, self.regs.hl(), value),
            R8::A => self.regs.a = value,
        }
    }

    pub(super) fn r16(&self, rr: R16) -> u16 {
        match rr {
            R16::BC => self.regs.bc(),
            R16::DE => self.regs.de(),
            R16::HL => self.regs.hl(),
            R16::SP => self.regs.sp,
        }
    }

    pub(super) fn set_r16(&mut self, rr: R16, value: u16) {
        match rr {
            R16::BC => self.regs.set_bc(value),
            R16::DE => self.regs.set_de(value),
            R16::HL => self.regs.set_hl(value),
            R16::SP => self.regs.sp = value,
        }
    }

    #[inline]
    pub(super) fn condition(&self, cc: Cond) -> bool {
        match cc {
            Cond::NZ => !self.regs.flag(Flags::Z),
            Cond::Z => self.regs.flag(Flags::Z),
            Cond::NC => !self.regs.flag(Flags::C),
            Cond::C => self.regs.flag(Flags::C),
        }
    }
}
