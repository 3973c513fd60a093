use dotmatrix_common::Button;

use crate::interrupts::{Interrupt, InterruptController};

/// P1 (0xFF00) and the button matrix behind it.
///
/// Bits 5 and 4 select the action and direction groups (0 selects). The
/// lower nibble reads 0 for each pressed button in any selected group.
#[derive(Debug, Clone)]
pub(crate) struct Joypad {
    select: u8,
    /// Bit set means pressed: A, B, Select, Start.
    actions: u8,
    /// Bit set means pressed: Right, Left, Up, Down.
    directions: u8,
}

impl Default for Joypad {
    fn default() -> Self {
        Self {
            select: 0x30,
            actions: 0,
            directions: 0,
        }
    }
}

impl Joypad {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn read(&self) -> u8 {
        let mut low = 0x0F;
        if self.select & 0x10 == 0 {
            low &= !self.directions;
        }
        if self.select & 0x20 == 0 {
            low &= !self.actions;
        }
        0xC0 | self.select | (low & 0x0F)
    }

    pub(crate) fn write(&mut self, value: u8) {
        self.select = value & 0x30;
    }

    pub(crate) fn press(&mut self, button: Button, ic: &mut InterruptController) {
        let mask = 1 << button.line();
        if button.is_direction() {
            self.directions |= mask;
        } else {
            self.actions |= mask;
        }
        ic.request(Interrupt::Joypad);
    }

    pub(crate) fn release(&mut self, button: Button) {
        let mask = !(1 << button.line());
        if button.is_direction() {
            self.directions &= mask;
        } else {
            self.actions &= mask;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pressed_buttons_read_low_in_selected_group() {
        let mut joypad = Joypad::new();
        let mut ic = InterruptController::new();
        joypad.press(Button::Start, &mut ic);
        joypad.press(Button::Left, &mut ic);

        joypad.write(0x10);
        assert_eq!(joypad.read(), 0xD7);

        joypad.write(0x20);
        assert_eq!(joypad.read(), 0xED);

        joypad.write(0x30);
        assert_eq!(joypad.read(), 0xFF);
        assert_eq!(ic.flags(), 0x10);
    }

    #[test]
    fn release_clears_line() {
        let mut joypad = Joypad::new();
        let mut ic = InterruptController::new();
        joypad.write(0x10);
        joypad.press(Button::A, &mut ic);
        joypad.release(Button::A);
        assert_eq!(joypad.read() & 0x0F, 0x0F);
    }
}
