use dotmatrix_common::Button;

use super::{AudioUnit, Cartridge, DisplaySink, FrameBuffer, GameBoyBus};
use crate::config::MachineOptions;
use crate::cpu::{disassemble, Cpu, DisasmLine, Tracer};
use crate::error::Result;
use crate::CYCLES_PER_FRAME;

/// High-level DMG machine.
///
/// Owns the CPU and the bus, and through the bus every subsystem and the
/// display sink. All emulation happens on the caller's thread inside
/// [`step`](Self::step) and [`step_frame`](Self::step_frame).
pub struct GameBoy<D: DisplaySink = FrameBuffer> {
    cpu: Cpu,
    pub(crate) bus: GameBoyBus<D>,
}

impl GameBoy<FrameBuffer> {
    /// Machine rendering into an in-memory [`FrameBuffer`].
    pub fn new(cartridge: Cartridge, options: MachineOptions) -> Self {
        Self::with_display(cartridge, options, FrameBuffer::new())
    }
}

impl<D: DisplaySink> GameBoy<D> {
    pub fn with_display(cartridge: Cartridge, options: MachineOptions, display: D) -> Self {
        let MachineOptions {
            boot_rom,
            history_len,
        } = options;

        let mut cpu = if boot_rom.is_some() {
            Cpu::power_on()
        } else {
            Cpu::new()
        };
        cpu.set_history_len(history_len);

        log::debug!(
            "machine: \"{}\" ({}), boot ROM {}",
            cartridge.title(),
            cartridge.kind(),
            if boot_rom.is_some() { "mapped" } else { "skipped" }
        );

        Self {
            cpu,
            bus: GameBoyBus::new(cartridge, boot_rom, display),
        }
    }

    /// Replace the audio collaborator. It sees 0xFF10..=0xFF3F and one
    /// `tick` per T-cycle from now on.
    pub fn set_audio(&mut self, audio: Box<dyn AudioUnit>) {
        self.bus.audio = audio;
    }

    pub fn set_tracer(&mut self, tracer: Box<dyn Tracer>) {
        self.cpu.set_tracer(Some(tracer));
    }

    pub fn clear_tracer(&mut self) {
        self.cpu.set_tracer(None);
    }

    /// Execute one CPU step and return the T-cycles it took.
    #[inline]
    pub fn step(&mut self) -> Result<u32> {
        self.cpu.step(&mut self.bus)
    }

    /// Run until the PPU enters VBlank, or for one frame's worth of cycles
    /// while the LCD is off. Returns the T-cycles elapsed.
    pub fn step_frame(&mut self) -> Result<u32> {
        self.bus.ppu.take_frame_ready();
        let mut elapsed = 0u32;
        loop {
            elapsed += self.step()?;
            if self.bus.ppu.take_frame_ready() {
                break;
            }
            if !self.bus.ppu.lcd_enabled() && elapsed >= CYCLES_PER_FRAME {
                break;
            }
        }
        Ok(elapsed)
    }

    pub fn press(&mut self, button: Button) {
        self.bus.joypad.press(button, &mut self.bus.interrupts);
    }

    pub fn release(&mut self, button: Button) {
        self.bus.joypad.release(button);
    }

    pub fn display(&self) -> &D {
        &self.bus.display
    }

    pub fn display_mut(&mut self) -> &mut D {
        &mut self.bus.display
    }

    pub fn cpu(&self) -> &Cpu {
        &self.cpu
    }

    pub fn cpu_mut(&mut self) -> &mut Cpu {
        &mut self.cpu
    }

    pub fn cartridge(&self) -> &Cartridge {
        &self.bus.cartridge
    }

    /// Read a byte through the memory map without advancing the clock.
    pub fn peek(&mut self, addr: u16) -> u8 {
        self.bus.peek(addr)
    }

    /// Decode the instruction at `addr`.
    pub fn disassemble(&mut self, addr: u16) -> DisasmLine {
        let bus = &mut self.bus;
        disassemble(|a| bus.peek(a), addr)
    }

    /// Every byte the program has shifted out of the serial port.
    pub fn serial_output(&self) -> &[u8] {
        self.bus.serial.output()
    }

    pub fn battery_ram(&self) -> Option<&[u8]> {
        self.bus.cartridge.battery_ram()
    }

    pub fn load_battery_ram(&mut self, data: &[u8]) {
        self.bus.cartridge.load_battery_ram(data);
    }

    /// Whether battery-backed RAM changed since the last call.
    pub fn take_save_dirty(&mut self) -> bool {
        self.bus.cartridge.take_ram_dirty() && self.bus.cartridge.battery_ram().is_some()
    }

    /// OAM DMA transfer in progress.
    pub fn dma_active(&self) -> bool {
        self.bus.dma_active()
    }
}
