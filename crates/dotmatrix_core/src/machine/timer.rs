//! Divider and TIMA counter.
//!
//! Everything is driven off one 16-bit counter that advances every T-cycle.
//! DIV is its upper byte; TIMA counts falling edges of one counter bit
//! (selected by TAC) ANDed with the enable bit. Register writes can produce
//! such an edge too, which is why they go through `io.rs` instead of poking
//! fields directly.
mod io;

use crate::interrupts::{Interrupt, InterruptController};

#[derive(Debug, Clone, Default)]
pub(crate) struct Timer {
    /// Free-running system counter; DIV exposes bits 15..8.
    counter: u16,
    tima: u8,
    tma: u8,
    /// TAC, lower three bits.
    tac: u8,
}

impl Timer {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Counter value that leaves DIV at 0xAB when the boot ROM hands over.
    pub(crate) fn init_post_boot(&mut self) {
        self.counter = 0xABCC;
        self.tima = 0x00;
        self.tma = 0x00;
        self.tac = 0x00;
    }

    #[inline]
    fn enabled(&self) -> bool {
        self.tac & 0x04 != 0
    }

    /// Divider bit feeding TIMA for the current TAC clock select.
    #[inline]
    fn selected_bit(&self) -> u16 {
        match self.tac & 0x03 {
            0b00 => 1 << 9,
            0b01 => 1 << 3,
            0b10 => 1 << 5,
            _ => 1 << 7,
        }
    }

    /// Input to the TIMA edge detector.
    #[inline]
    fn input(&self) -> bool {
        self.enabled() && self.counter & self.selected_bit() != 0
    }

    /// Increment TIMA; an overflow reloads TMA and raises the interrupt in
    /// the same tick.
    fn increment_tima(&mut self, ic: &mut InterruptController) {
        let (next, overflow) = self.tima.overflowing_add(1);
        if overflow {
            self.tima = self.tma;
            ic.request(Interrupt::Timer);
            log::trace!("timer overflow, TIMA reloaded with 0x{:02X}", self.tma);
        } else {
            self.tima = next;
        }
    }

    /// Advance by one T-cycle.
    pub(crate) fn tick(&mut self, ic: &mut InterruptController) {
        let before = self.input();
        self.counter = self.counter.wrapping_add(1);
        if before && !self.input() {
            self.increment_tima(ic);
        }
    }

    #[cfg(test)]
    pub(crate) fn set_counter(&mut self, counter: u16) {
        self.counter = counter;
    }
}
