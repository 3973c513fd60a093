mod decode;
mod disasm;
mod exec;
mod interrupts;
mod regs;
mod trace;

use std::collections::VecDeque;
use std::fmt;

pub use decode::{AluOp, Cond, Instruction, ShiftOp, R16, R16Mem, R16Stack, R8, BASE_TABLE, CB_TABLE};
pub use disasm::{disassemble, DisasmLine};
pub use regs::{Flags, Registers};
pub use trace::Tracer;

use crate::error::{CoreError, History, HistoryEntry, OpcodeBytes, Result};
use crate::interrupts::InterruptController;

/// Everything the CPU can see of the rest of the machine.
///
/// The CPU never talks to a subsystem directly: each memory access goes
/// through `read8`/`write8`, and every elapsed M-cycle is reported through
/// `tick` so the bus can advance timer, PPU and DMA in lock-step.
pub trait Bus {
    fn read8(&mut self, addr: u16) -> u8;
    fn write8(&mut self, addr: u16, value: u8);

    /// Advance bus-side peripherals by `cycles` T-cycles.
    fn tick(&mut self, _cycles: u32) {}

    fn interrupts(&mut self) -> &mut InterruptController;
}

/// SM83 core.
pub struct Cpu {
    pub regs: Registers,
    pub halted: bool,
    /// STOP low-power state; left when a joypad line goes low.
    stopped: bool,
    /// HALT executed with IME=0 and an interrupt pending: the next opcode
    /// fetch does not advance PC.
    halt_bug: bool,
    /// EI was executed; IME turns on at the start of the next step, after
    /// that step's interrupt check.
    ime_pending: bool,
    /// T-cycles consumed by the step in progress.
    cycles: u32,
    history: VecDeque<(u16, Instruction)>,
    history_len: usize,
    tracer: Option<Box<dyn Tracer>>,
}

impl Default for Cpu {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Cpu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cpu")
            .field("regs", &self.regs)
            .field("halted", &self.halted)
            .field("stopped", &self.stopped)
            .field("ime_pending", &self.ime_pending)
            .finish_non_exhaustive()
    }
}

impl Cpu {
    /// CPU in the state the boot ROM hands over at 0x0100.
    pub fn new() -> Self {
        Self::with_registers(Registers::post_boot())
    }

    /// CPU at power-on (all registers zero), for running a boot ROM.
    pub fn power_on() -> Self {
        Self::with_registers(Registers::default())
    }

    fn with_registers(regs: Registers) -> Self {
        Self {
            regs,
            halted: false,
            stopped: false,
            halt_bug: false,
            ime_pending: false,
            cycles: 0,
            history: VecDeque::new(),
            history_len: 32,
            tracer: None,
        }
    }

    pub fn set_history_len(&mut self, len: usize) {
        self.history_len = len;
        while self.history.len() > len {
            self.history.pop_front();
        }
    }

    pub fn set_tracer(&mut self, tracer: Option<Box<dyn Tracer>>) {
        self.tracer = tracer;
    }

    #[inline]
    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Recent instructions, oldest first, formatted for diagnostics.
    pub fn history(&self) -> History {
        History(
            self.history
                .iter()
                .map(|(pc, instr)| HistoryEntry {
                    pc: *pc,
                    mnemonic: instr.to_string(),
                })
                .collect(),
        )
    }

    /// Execute one instruction, or service one interrupt, or idle one
    /// M-cycle while halted. Returns the T-cycles consumed.
    ///
    /// The bus has already been ticked for every one of those cycles by the
    /// time this returns.
    pub fn step<B: Bus>(&mut self, bus: &mut B) -> Result<u32> {
        self.cycles = 0;

        // Interrupts are checked at the instruction boundary, which is the
        // end of the previous step.
        if self.service_interrupt(bus) {
            return Ok(self.cycles);
        }

        // EI's delay: IME becomes visible only after the check above.
        if self.ime_pending {
            self.ime_pending = false;
            bus.interrupts().enable_ime();
        }

        if self.stopped {
            // Only a low P1 line wakes STOP; a stale joypad request in IF
            // does not.
            let p1 = bus.read8(0xFF00);
            if (p1 & 0x0F) != 0x0F {
                self.stopped = false;
            } else {
                self.idle_cycle(bus);
                return Ok(self.cycles);
            }
        }

        if self.halted {
            if bus.interrupts().pending() == 0 {
                self.idle_cycle(bus);
                return Ok(self.cycles);
            }
            self.halted = false;
        }

        let pc = self.regs.pc;
        let opcode = self.fetch8(bus);
        let mut instr = BASE_TABLE[opcode as usize];
        if let Instruction::Prefix = instr {
            let cb = self.fetch8(bus);
            instr = CB_TABLE[cb as usize];
        }

        self.record(pc, instr);
        if let Some(tracer) = self.tracer.as_mut() {
            tracer.on_instruction(pc, &instr, &self.regs);
        }

        if let Instruction::Illegal(op) = instr {
            log::error!(
                "CPU fault: illegal opcode 0x{op:02X} at PC=0x{pc:04X} (SP=0x{sp:04X} AF=0x{af:04X} BC=0x{bc:04X} DE=0x{de:04X} HL=0x{hl:04X})",
                sp = self.regs.sp,
                af = self.regs.af(),
                bc = self.regs.bc(),
                de = self.regs.de(),
                hl = self.regs.hl(),
            );
            return Err(CoreError::UnknownOpcode {
                pc,
                opcode: OpcodeBytes::Base(op),
                history: self.history(),
            });
        }

        self.execute(bus, instr);
        Ok(self.cycles)
    }

    fn record(&mut self, pc: u16, instr: Instruction) {
        if self.history_len == 0 {
            return;
        }
        if self.history.len() == self.history_len {
            self.history.pop_front();
        }
        self.history.push_back((pc, instr));
    }

    /// One M-cycle of bus time.
    #[inline]
    fn tick_mcycle<B: Bus>(&mut self, bus: &mut B) {
        bus.tick(4);
        self.cycles += 4;
    }

    #[inline]
    fn read_cycle<B: Bus>(&mut self, bus: &mut B, addr: u16) -> u8 {
        let value = bus.read8(addr);
        self.tick_mcycle(bus);
        value
    }

    #[inline]
    fn write_cycle<B: Bus>(&mut self, bus: &mut B, addr: u16, value: u8) {
        bus.write8(addr, value);
        self.tick_mcycle(bus);
    }

    /// Internal M-cycle with no memory access.
    #[inline]
    fn idle_cycle<B: Bus>(&mut self, bus: &mut B) {
        self.tick_mcycle(bus);
    }

    #[inline]
    fn fetch8<B: Bus>(&mut self, bus: &mut B) -> u8 {
        let value = self.read_cycle(bus, self.regs.pc);
        if self.halt_bug {
            self.halt_bug = false;
        } else {
            self.regs.pc = self.regs.pc.wrapping_add(1);
        }
        value
    }

    #[inline]
    fn fetch16<B: Bus>(&mut self, bus: &mut B) -> u16 {
        let lo = self.fetch8(bus);
        let hi = self.fetch8(bus);
        u16::from_le_bytes([lo, hi])
    }

    /// Two write cycles, high byte first. Callers add the internal cycle
    /// that precedes the writes.
    #[inline]
    fn push_u16<B: Bus>(&mut self, bus: &mut B, value: u16) {
        let [hi, lo] = value.to_be_bytes();
        self.regs.sp = self.regs.sp.wrapping_sub(1);
        self.write_cycle(bus, self.regs.sp, hi);
        self.regs.sp = self.regs.sp.wrapping_sub(1);
        self.write_cycle(bus, self.regs.sp, lo);
    }

    #[inline]
    fn pop_u16<B: Bus>(&mut self, bus: &mut B) -> u16 {
        let lo = self.read_cycle(bus, self.regs.sp);
        self.regs.sp = self.regs.sp.wrapping_add(1);
        let hi = self.read_cycle(bus, self.regs.sp);
        self.regs.sp = self.regs.sp.wrapping_add(1);
        u16::from_le_bytes([lo, hi])
    }
}
