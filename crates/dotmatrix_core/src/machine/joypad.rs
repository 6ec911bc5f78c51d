use bitflags::bitflags;

use super::interrupts::{InterruptController, InterruptFlags};

bitflags! {
    /// Front-end facing button mask. A set bit means "pressed".
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
    pub struct Buttons: u8 {
        const RIGHT = 1 << 0;
        const LEFT = 1 << 1;
        const UP = 1 << 2;
        const DOWN = 1 << 3;
        const A = 1 << 4;
        const B = 1 << 5;
        const SELECT = 1 << 6;
        const START = 1 << 7;
    }
}

/// Joypad register (P1, $FF00).
///
/// Bits 5/4 select the button and d-pad groups (0 = selected); the low
/// nibble exposes the selected group's lines, pressed reading as 0.
/// Bits 7-6 always read as 1.
pub(crate) struct Joypad {
    /// Selection bits as last written (only bits 5-4 retained).
    select: u8,
    pressed: Buttons,
}

impl Joypad {
    pub(crate) fn new() -> Self {
        Self {
            // Neither group selected at power-on.
            select: 0x30,
            pressed: Buttons::empty(),
        }
    }

    /// Replace the pressed-button state from the front end.
    ///
    /// Any newly pressed line raises the joypad interrupt request,
    /// regardless of the current group selection. Real hardware is
    /// slightly pickier (only selected lines trigger), but games
    /// universally enable both groups when they care.
    pub(crate) fn set_state(&mut self, buttons: Buttons, intc: &mut InterruptController) {
        let newly_pressed = buttons & !self.pressed;
        if !newly_pressed.is_empty() {
            intc.request(InterruptFlags::JOYPAD);
        }
        self.pressed = buttons;
    }

    pub(crate) fn read(&self) -> u8 {
        // Bits 7-6 always read as 1.
        let mut value = 0xC0 | self.select;

        let mut low = 0x0F;
        // D-pad group selected?
        if (self.select & 0x10) == 0 {
            low &= !(self.pressed.bits() & 0x0F);
        }
        // Button group selected?
        if (self.select & 0x20) == 0 {
            low &= !(self.pressed.bits() >> 4);
        }
        value | (low & 0x0F)
    }

    pub(crate) fn write(&mut self, value: u8) {
        // Only the group-select bits are writable.
        self.select = value & 0x30;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unselected_groups_read_high() {
        let mut intc = InterruptController::new();
        let mut joypad = Joypad::new();
        joypad.set_state(Buttons::A | Buttons::DOWN, &mut intc);

        // Neither group selected: low nibble all 1s.
        joypad.write(0x30);
        assert_eq!(joypad.read() & 0x0F, 0x0F);
    }

    #[test]
    fn selected_group_exposes_pressed_lines_low() {
        let mut intc = InterruptController::new();
        let mut joypad = Joypad::new();
        joypad.set_state(Buttons::A | Buttons::DOWN, &mut intc);

        // Select d-pad group (bit 4 = 0): DOWN is bit 3.
        joypad.write(0x20);
        assert_eq!(joypad.read() & 0x0F, 0x07);

        // Select button group (bit 5 = 0): A is bit 0.
        joypad.write(0x10);
        assert_eq!(joypad.read() & 0x0F, 0x0E);
    }

    #[test]
    fn new_press_requests_interrupt() {
        let mut intc = InterruptController::new();
        let mut joypad = Joypad::new();

        joypad.set_state(Buttons::START, &mut intc);
        assert_eq!(intc.read_if() & 0x1F, InterruptFlags::JOYPAD.bits());

        // Holding the same button does not re-request.
        intc.write_if(0);
        joypad.set_state(Buttons::START, &mut intc);
        assert_eq!(intc.read_if() & 0x1F, 0);

        // Releasing does not request either.
        joypad.set_state(Buttons::empty(), &mut intc);
        assert_eq!(intc.read_if() & 0x1F, 0);
    }

    #[test]
    fn upper_bits_always_read_one() {
        let joypad = Joypad::new();
        assert_eq!(joypad.read() & 0xC0, 0xC0);
    }
}
