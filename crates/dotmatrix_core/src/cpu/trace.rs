use super::decode::Instruction;
use super::regs::Registers;

/// Debug hook called before every executed instruction.
///
/// Installed on the CPU with [`Cpu::set_tracer`](super::Cpu::set_tracer).
/// Implementations observe only; the register file is passed by shared
/// reference and reflects the state after the opcode fetch.
pub trait Tracer {
    fn on_instruction(&mut self, pc: u16, instr: &Instruction, regs: &Registers);
}

impl<F> Tracer for F
where
    F: FnMut(u16, &Instruction, &Registers),
{
    fn on_instruction(&mut self, pc: u16, instr: &Instruction, regs: &Registers) {
        self(pc, instr, regs)
    }
}
