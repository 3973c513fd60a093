/// Sound hardware seam.
///
/// The bus forwards every access in 0xFF10..=0xFF3F verbatim and calls
/// `tick` once per T-cycle. Sample generation and host output belong to
/// the implementation.
pub trait AudioUnit {
    fn read(&mut self, addr: u16) -> u8;
    fn write(&mut self, addr: u16, value: u8);
    fn tick(&mut self) {}
}

/// Register file without synthesis.
///
/// Stores what software writes so reads behave, including NR52 power
/// gating: while powered off, writes to 0xFF10..=0xFF25 are dropped, and
/// switching off clears them. Wave RAM stays accessible either way.
#[derive(Debug, Clone)]
pub struct AudioRegisters {
    regs: [u8; 0x30],
}

impl Default for AudioRegisters {
    fn default() -> Self {
        Self { regs: [0; 0x30] }
    }
}

impl AudioRegisters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register values the boot ROM leaves behind.
    pub fn post_boot() -> Self {
        let mut audio = Self::new();
        let defaults: [(u16, u8); 21] = [
            (0xFF10, 0x80),
            (0xFF11, 0xBF),
            (0xFF12, 0xF3),
            (0xFF13, 0xFF),
            (0xFF14, 0xBF),
            (0xFF16, 0x3F),
            (0xFF17, 0x00),
            (0xFF18, 0xFF),
            (0xFF19, 0xBF),
            (0xFF1A, 0x7F),
            (0xFF1B, 0xFF),
            (0xFF1C, 0x9F),
            (0xFF1D, 0xFF),
            (0xFF1E, 0xBF),
            (0xFF20, 0xFF),
            (0xFF21, 0x00),
            (0xFF22, 0x00),
            (0xFF23, 0xBF),
            (0xFF24, 0x77),
            (0xFF25, 0xF3),
            (0xFF26, 0xF1),
        ];
        for (addr, value) in defaults {
            audio.regs[Self::index(addr)] = value;
        }
        audio
    }

    #[inline]
    fn index(addr: u16) -> usize {
        (addr - 0xFF10) as usize
    }

    #[inline]
    fn powered(&self) -> bool {
        self.regs[Self::index(0xFF26)] & 0x80 != 0
    }

    fn write_nr52(&mut self, value: u8) {
        let was_on = self.powered();
        let now_on = value & 0x80 != 0;
        let nr52 = Self::index(0xFF26);
        if was_on && !now_on {
            self.regs[..nr52].fill(0);
            self.regs[nr52] = 0;
            log::debug!("APU powered off");
        }
        if now_on {
            self.regs[nr52] |= 0x80;
        }
    }
}

impl AudioUnit for AudioRegisters {
    fn read(&mut self, addr: u16) -> u8 {
        match addr {
            0xFF10..=0xFF3F => self.regs[Self::index(addr)],
            _ => 0xFF,
        }
    }

    fn write(&mut self, addr: u16, value: u8) {
        match addr {
            0xFF26 => self.write_nr52(value),
            0xFF30..=0xFF3F => self.regs[Self::index(addr)] = value,
            0xFF10..=0xFF25 => {
                if self.powered() {
                    self.regs[Self::index(addr)] = value;
                }
            }
            _ => {}
        }
    }
}
