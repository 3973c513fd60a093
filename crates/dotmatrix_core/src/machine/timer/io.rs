use super::Timer;
use crate::interrupts::InterruptController;

impl Timer {
    #[inline]
    pub(crate) fn read_div(&self) -> u8 {
        (self.counter >> 8) as u8
    }

    /// Any write clears the whole counter. If the selected bit was high the
    /// reset is a falling edge and TIMA counts once.
    pub(crate) fn write_div(&mut self, ic: &mut InterruptController) {
        let before = self.input();
        self.counter = 0;
        if before {
            self.increment_tima(ic);
        }
    }

    #[inline]
    pub(crate) fn read_tima(&self) -> u8 {
        self.tima
    }

    #[inline]
    pub(crate) fn write_tima(&mut self, value: u8) {
        self.tima = value;
    }

    #[inline]
    pub(crate) fn read_tma(&self) -> u8 {
        self.tma
    }

    #[inline]
    pub(crate) fn write_tma(&mut self, value: u8) {
        self.tma = value;
    }

    #[inline]
    pub(crate) fn read_tac(&self) -> u8 {
        self.tac | 0b1111_1000
    }

    /// Disabling the timer or switching clock select while the edge
    /// detector input is high counts as a falling edge.
    pub(crate) fn write_tac(&mut self, value: u8, ic: &mut InterruptController) {
        let before = self.input();
        self.tac = value & 0x07;
        if before && !self.input() {
            self.increment_tima(ic);
        }
    }
}
