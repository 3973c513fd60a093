/// MBC1 bank registers.
///
/// Mode 0 maps bank 0 at 0x0000 and `high2:low5` at 0x4000 with RAM bank 0.
/// Mode 1 additionally routes `high2` into the fixed window (as bank
/// `high2 << 5`) and into the RAM bank select.
#[derive(Debug, Clone)]
pub(super) struct Mbc1 {
    ram_enabled: bool,
    /// 5-bit register, never zero.
    bank_low: u8,
    /// 2-bit register at 0x4000..0x5FFF.
    bank_high: u8,
    mode: u8,
}

impl Mbc1 {
    pub(super) fn new() -> Self {
        Self {
            ram_enabled: false,
            bank_low: 1,
            bank_high: 0,
            mode: 0,
        }
    }

    pub(super) fn rom_bank(&self, addr: u16) -> usize {
        if addr < 0x4000 {
            if self.mode == 1 {
                (self.bank_high as usize) << 5
            } else {
                0
            }
        } else {
            ((self.bank_high as usize) << 5) | self.bank_low as usize
        }
    }

    /// RAM bank, or `None` while RAM is disabled.
    pub(super) fn ram_bank(&self) -> Option<usize> {
        if !self.ram_enabled {
            return None;
        }
        Some(if self.mode == 1 {
            self.bank_high as usize
        } else {
            0
        })
    }

    pub(super) fn write_register(&mut self, addr: u16, value: u8) {
        match addr {
            0x0000..=0x1FFF => self.ram_enabled = value & 0x0F == 0x0A,
            0x2000..=0x3FFF => {
                self.bank_low = match value & 0x1F {
                    0 => 1,
                    bank => bank,
                };
                log::trace!("MBC1 ROM bank low bits 0x{:02X}", self.bank_low);
            }
            0x4000..=0x5FFF => self.bank_high = value & 0x03,
            0x6000..=0x7FFF => self.mode = value & 0x01,
            _ => {}
        }
    }
}
