use crate::interrupts::{Interrupt, InterruptController};

/// T-cycles for one byte at the internal 8192 Hz clock.
const TRANSFER_CYCLES: u32 = 8 * 512;

/// SB/SC with no link partner attached.
///
/// A transfer started on the internal clock records the outgoing byte,
/// shifts in 1s from the open line, and raises the serial interrupt once
/// all eight bits are out. External-clock transfers never complete.
#[derive(Debug, Clone, Default)]
pub(crate) struct Serial {
    sb: u8,
    sc: u8,
    remaining: u32,
    output: Vec<u8>,
}

impl Serial {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn init_post_boot(&mut self) {
        self.sb = 0x00;
        self.sc = 0x00;
    }

    #[inline]
    pub(crate) fn read_sb(&self) -> u8 {
        self.sb
    }

    #[inline]
    pub(crate) fn write_sb(&mut self, value: u8) {
        self.sb = value;
    }

    #[inline]
    pub(crate) fn read_sc(&self) -> u8 {
        self.sc | 0x7E
    }

    pub(crate) fn write_sc(&mut self, value: u8) {
        self.sc = value & 0x81;
        if self.sc == 0x81 {
            self.output.push(self.sb);
            self.remaining = TRANSFER_CYCLES;
        }
    }

    pub(crate) fn tick(&mut self, ic: &mut InterruptController) {
        if self.remaining == 0 {
            return;
        }
        self.remaining -= 1;
        if self.remaining == 0 {
            self.sb = 0xFF;
            self.sc &= !0x80;
            ic.request(Interrupt::Serial);
        }
    }

    /// Every byte sent so far.
    pub(crate) fn output(&self) -> &[u8] {
        &self.output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn internal_clock_transfer_completes_after_4096_cycles() {
        let mut serial = Serial::new();
        let mut ic = InterruptController::new();
        serial.write_sb(b'A');
        serial.write_sc(0x81);
        assert_eq!(serial.output(), b"A");

        for _ in 0..TRANSFER_CYCLES - 1 {
            serial.tick(&mut ic);
        }
        assert_eq!(serial.read_sc() & 0x80, 0x80);
        assert_eq!(ic.flags(), 0);

        serial.tick(&mut ic);
        assert_eq!(serial.read_sc(), 0x7F);
        assert_eq!(serial.read_sb(), 0xFF);
        assert_eq!(ic.flags(), 0x08);
    }

    #[test]
    fn external_clock_never_completes() {
        let mut serial = Serial::new();
        let mut ic = InterruptController::new();
        serial.write_sc(0x80);
        for _ in 0..TRANSFER_CYCLES * 2 {
            serial.tick(&mut ic);
        }
        assert!(serial.output().is_empty());
        assert_eq!(ic.flags(), 0);
    }
}
