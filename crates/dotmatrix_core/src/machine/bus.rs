mod init;
mod map;
mod mmio;

use super::audio::{AudioRegisters, AudioUnit};
use super::cartridge::Cartridge;
use super::display::DisplaySink;
use super::dma::OamDma;
use super::joypad::Joypad;
use super::ppu::Ppu;
use super::serial::Serial;
use super::timer::Timer;
use crate::cpu::Bus;
use crate::interrupts::InterruptController;
use map::Region;

/// Address decoder and owner of every memory-mapped subsystem.
///
/// Each `tick` T-cycle advances, in order: timer, PPU, OAM DMA, cartridge
/// clock, serial port and the audio collaborator.
pub(crate) struct GameBoyBus<D: DisplaySink> {
    pub(crate) cartridge: Cartridge,
    boot_rom: Option<Vec<u8>>,
    /// Cleared for good by any write to 0xFF50.
    boot_mapped: bool,
    wram: Box<[u8; 0x2000]>,
    hram: [u8; 0x7F],
    pub(crate) ppu: Ppu,
    pub(crate) timer: Timer,
    dma: OamDma,
    pub(crate) joypad: Joypad,
    pub(crate) serial: Serial,
    pub(crate) audio: Box<dyn AudioUnit>,
    pub(crate) interrupts: InterruptController,
    pub(crate) display: D,
}

impl<D: DisplaySink> GameBoyBus<D> {
    /// Power-on bus. With a boot ROM the overlay is mapped and I/O starts
    /// cleared; without one the post-boot register state is applied.
    pub(crate) fn new(cartridge: Cartridge, boot_rom: Option<Vec<u8>>, display: D) -> Self {
        let boot_mapped = boot_rom.is_some();
        let mut bus = Self {
            cartridge,
            boot_rom,
            boot_mapped,
            wram: Box::new([0; 0x2000]),
            hram: [0; 0x7F],
            ppu: Ppu::new(),
            timer: Timer::new(),
            dma: OamDma::new(),
            joypad: Joypad::new(),
            serial: Serial::new(),
            audio: Box::new(AudioRegisters::new()),
            interrupts: InterruptController::new(),
            display,
        };
        bus.fill_internal_ram();
        if !boot_mapped {
            bus.apply_post_boot_state();
        }
        bus
    }

    /// Read without side effects on the CPU clock. Used by the CPU and by
    /// OAM DMA, which sees the same map.
    fn read_mapped(&mut self, addr: u16) -> u8 {
        match map::decode(addr, self.boot_mapped) {
            Region::BootRom(off) => self
                .boot_rom
                .as_deref()
                .and_then(|rom| rom.get(off as usize).copied())
                .unwrap_or(0xFF),
            Region::Cartridge(addr) => self.cartridge.read(addr),
            Region::Vram(off) => self.ppu.read_vram(off),
            Region::Wram(off) | Region::Echo(off) => self.wram[off as usize],
            Region::Oam(off) => self.ppu.read_oam(off as usize),
            Region::Unusable => 0xFF,
            Region::Io(addr) => self.read_io(addr),
            Region::Hram(off) => self.hram[off as usize],
            Region::InterruptEnable => self.interrupts.enable(),
        }
    }

    fn write_mapped(&mut self, addr: u16, value: u8) {
        match map::decode(addr, self.boot_mapped) {
            // The overlay is read-only; writes fall through to the mapper.
            Region::BootRom(off) => self.cartridge.write(off, value),
            Region::Cartridge(addr) => self.cartridge.write(addr, value),
            Region::Vram(off) => self.ppu.write_vram(off, value),
            Region::Wram(off) | Region::Echo(off) => self.wram[off as usize] = value,
            Region::Oam(off) => self.ppu.write_oam(off as usize, value),
            Region::Unusable => {}
            Region::Io(addr) => self.write_io(addr, value),
            Region::Hram(off) => self.hram[off as usize] = value,
            Region::InterruptEnable => self.interrupts.set_enable(value),
        }
    }

    /// Advance every subsystem by one T-cycle.
    fn tick_cycle(&mut self) {
        self.timer.tick(&mut self.interrupts);
        self.ppu.tick(&mut self.interrupts, &mut self.display);
        if let Some((source, offset)) = self.dma.next_transfer() {
            let byte = self.read_mapped(source);
            self.ppu.write_oam(offset as usize, byte);
        }
        self.cartridge.tick();
        self.serial.tick(&mut self.interrupts);
        self.audio.tick();
    }

    /// Side-effect-free view for debuggers. I/O reads go through the normal
    /// path since none of them mutate state.
    pub(crate) fn peek(&mut self, addr: u16) -> u8 {
        self.read_mapped(addr)
    }

    pub(crate) fn dma_active(&self) -> bool {
        self.dma.is_active()
    }
}

impl<D: DisplaySink> Bus for GameBoyBus<D> {
    #[inline]
    fn read8(&mut self, addr: u16) -> u8 {
        self.read_mapped(addr)
    }

    #[inline]
    fn write8(&mut self, addr: u16, value: u8) {
        self.write_mapped(addr, value);
    }

    fn tick(&mut self, cycles: u32) {
        for _ in 0..cycles {
            self.tick_cycle();
        }
    }

    #[inline]
    fn interrupts(&mut self) -> &mut InterruptController {
        &mut self.interrupts
    }
}
