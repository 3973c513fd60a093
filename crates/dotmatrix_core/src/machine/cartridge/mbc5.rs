/// MBC5 bank registers: 9-bit ROM bank (bank 0 is selectable in the
/// switchable window) and a 4-bit RAM bank.
#[derive(Debug, Clone)]
pub(super) struct Mbc5 {
    ram_enabled: bool,
    rom_bank: u16,
    ram_bank: u8,
    /// Rumble carts wire RAM-bank bit 3 to the motor.
    rumble: bool,
    motor: bool,
}

impl Mbc5 {
    pub(super) fn new(rumble: bool) -> Self {
        Self {
            ram_enabled: false,
            rom_bank: 1,
            ram_bank: 0,
            rumble,
            motor: false,
        }
    }

    pub(super) fn rom_bank(&self, addr: u16) -> usize {
        if addr < 0x4000 {
            0
        } else {
            self.rom_bank as usize
        }
    }

    pub(super) fn ram_bank(&self) -> Option<usize> {
        self.ram_enabled.then_some(self.ram_bank as usize)
    }

    pub(super) fn motor_on(&self) -> bool {
        self.motor
    }

    pub(super) fn write_register(&mut self, addr: u16, value: u8) {
        match addr {
            0x0000..=0x1FFF => self.ram_enabled = value & 0x0F == 0x0A,
            0x2000..=0x2FFF => {
                self.rom_bank = (self.rom_bank & 0x100) | value as u16;
                log::trace!("MBC5 ROM bank 0x{:03X}", self.rom_bank);
            }
            0x3000..=0x3FFF => {
                self.rom_bank = (self.rom_bank & 0x0FF) | ((value as u16 & 0x01) << 8);
                log::trace!("MBC5 ROM bank 0x{:03X}", self.rom_bank);
            }
            0x4000..=0x5FFF => {
                if self.rumble {
                    self.motor = value & 0x08 != 0;
                    self.ram_bank = value & 0x07;
                } else {
                    self.ram_bank = value & 0x0F;
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nine_bit_rom_bank() {
        let mut mbc = Mbc5::new(false);
        mbc.write_register(0x2000, 0x34);
        mbc.write_register(0x3000, 0x01);
        assert_eq!(mbc.rom_bank(0x4000), 0x134);

        mbc.write_register(0x2000, 0x00);
        mbc.write_register(0x3000, 0x00);
        assert_eq!(mbc.rom_bank(0x4000), 0);
    }

    #[test]
    fn rumble_bit_is_not_a_ram_bank_bit() {
        let mut mbc = Mbc5::new(true);
        mbc.write_register(0x0000, 0x0A);
        mbc.write_register(0x4000, 0x0B);
        assert_eq!(mbc.ram_bank(), Some(3));
        assert!(mbc.motor_on());
    }
}
