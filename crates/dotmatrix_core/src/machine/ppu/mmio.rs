use super::regs::{Lcdc, Mode, StatSelect};
use super::Ppu;
use crate::interrupts::InterruptController;
use crate::machine::display::DisplaySink;

impl Ppu {
    /// VRAM and OAM stay CPU-accessible in every mode.
    #[inline]
    pub(crate) fn read_vram(&self, addr: u16) -> u8 {
        self.vram[(addr as usize) & 0x1FFF]
    }

    #[inline]
    pub(crate) fn write_vram(&mut self, addr: u16, value: u8) {
        self.vram[(addr as usize) & 0x1FFF] = value;
    }

    /// `index` is 0..0xA0.
    #[inline]
    pub(crate) fn read_oam(&self, index: usize) -> u8 {
        self.oam.get(index).copied().unwrap_or(0xFF)
    }

    #[inline]
    pub(crate) fn write_oam(&mut self, index: usize, value: u8) {
        if let Some(byte) = self.oam.get_mut(index) {
            *byte = value;
        }
    }

    /// LCD register read for 0xFF40..=0xFF4B, except 0xFF46.
    pub(crate) fn read_register(&self, addr: u16) -> u8 {
        match addr {
            0xFF40 => self.lcdc.bits(),
            0xFF41 => self.read_stat(),
            0xFF42 => self.scy,
            0xFF43 => self.scx,
            0xFF44 => self.ly,
            0xFF45 => self.lyc,
            0xFF47 => self.bgp,
            0xFF48 => self.obp0,
            0xFF49 => self.obp1,
            0xFF4A => self.wy,
            0xFF4B => self.wx,
            _ => 0xFF,
        }
    }

    fn read_stat(&self) -> u8 {
        let mode = if self.lcd_enabled() {
            self.mode.bits()
        } else {
            Mode::HBlank.bits()
        };
        let coincidence = if self.ly == self.lyc { 0x04 } else { 0 };
        0x80 | self.stat_select.bits() | coincidence | mode
    }

    pub(crate) fn write_register<D: DisplaySink>(
        &mut self,
        addr: u16,
        value: u8,
        ic: &mut InterruptController,
        sink: &mut D,
    ) {
        match addr {
            0xFF40 => self.write_lcdc(value, sink),
            0xFF41 => self.stat_select = StatSelect::from_bits_truncate(value),
            0xFF42 => self.scy = value,
            0xFF43 => self.scx = value,
            // LY is read-only.
            0xFF44 => {}
            0xFF45 => self.lyc = value,
            0xFF47 => self.bgp = value,
            0xFF48 => self.obp0 = value,
            0xFF49 => self.obp1 = value,
            0xFF4A => self.wy = value,
            0xFF4B => self.wx = value,
            _ => return,
        }
        // Select and compare changes can raise the STAT line immediately.
        self.update_stat(ic);
    }

    fn write_lcdc<D: DisplaySink>(&mut self, value: u8, sink: &mut D) {
        let was_enabled = self.lcd_enabled();
        self.lcdc = Lcdc::from_bits_retain(value);
        let now_enabled = self.lcd_enabled();

        if was_enabled && !now_enabled {
            self.lcd_off(sink);
        } else if !was_enabled && now_enabled {
            self.lcd_on();
        }
    }
}
