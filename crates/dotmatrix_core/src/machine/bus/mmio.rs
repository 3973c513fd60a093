use super::GameBoyBus;
use crate::machine::display::DisplaySink;

impl<D: DisplaySink> GameBoyBus<D> {
    /// 0xFF00..=0xFF7F. Unmapped registers read 0xFF.
    pub(super) fn read_io(&mut self, addr: u16) -> u8 {
        match addr {
            0xFF00 => self.joypad.read(),
            0xFF01 => self.serial.read_sb(),
            0xFF02 => self.serial.read_sc(),
            0xFF04 => self.timer.read_div(),
            0xFF05 => self.timer.read_tima(),
            0xFF06 => self.timer.read_tma(),
            0xFF07 => self.timer.read_tac(),
            // IF: upper three bits always read back as 1.
            0xFF0F => self.interrupts.flags() | 0xE0,
            0xFF10..=0xFF3F => self.audio.read(addr),
            0xFF46 => self.dma.page(),
            0xFF40..=0xFF4B => self.ppu.read_register(addr),
            0xFF50 => {
                if self.boot_mapped {
                    0xFE
                } else {
                    0xFF
                }
            }
            _ => 0xFF,
        }
    }

    pub(super) fn write_io(&mut self, addr: u16, value: u8) {
        match addr {
            0xFF00 => self.joypad.write(value),
            0xFF01 => self.serial.write_sb(value),
            0xFF02 => self.serial.write_sc(value),
            0xFF04 => self.timer.write_div(&mut self.interrupts),
            0xFF05 => self.timer.write_tima(value),
            0xFF06 => self.timer.write_tma(value),
            0xFF07 => self.timer.write_tac(value, &mut self.interrupts),
            0xFF0F => self.interrupts.set_flags(value),
            0xFF10..=0xFF3F => self.audio.write(addr, value),
            0xFF46 => self.dma.start(value),
            0xFF40..=0xFF4B => {
                self.ppu
                    .write_register(addr, value, &mut self.interrupts, &mut self.display)
            }
            0xFF50 => {
                if self.boot_mapped {
                    log::debug!("boot ROM unmapped (wrote 0x{value:02X} to 0xFF50)");
                    self.boot_mapped = false;
                }
            }
            _ => {
                log::trace!("ignored write 0x{value:02X} to unmapped I/O 0x{addr:04X}");
            }
        }
    }
}
