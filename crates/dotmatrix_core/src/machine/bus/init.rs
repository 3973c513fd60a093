use super::GameBoyBus;
use crate::machine::audio::AudioRegisters;
use crate::machine::display::DisplaySink;

impl<D: DisplaySink> GameBoyBus<D> {
    /// I/O state the DMG boot ROM leaves behind at PC=0x0100.
    pub(super) fn apply_post_boot_state(&mut self) {
        self.joypad.write(0x30);
        self.serial.init_post_boot();
        self.timer.init_post_boot();

        // The boot ROM leaves a VBlank request behind.
        self.interrupts.set_flags(0x01);
        self.interrupts.set_enable(0x00);

        self.audio = Box::new(AudioRegisters::post_boot());
        self.ppu.init_post_boot();
        self.dma.set_page(0xFF);
    }

    /// WRAM and HRAM power up holding garbage; fill them from a fixed-seed
    /// xorshift.
    pub(super) fn fill_internal_ram(&mut self) {
        let mut x: u32 = 0x1D0C_5EED;
        let mut next = || {
            x ^= x << 13;
            x ^= x >> 17;
            x ^= x << 5;
            (x >> 24) as u8
        };
        for byte in self.wram.iter_mut() {
            *byte = next();
        }
        for byte in self.hram.iter_mut() {
            *byte = next();
        }
    }
}
