use crate::cpu::Cpu;

impl Cpu {
    pub(super) fn exec_stop(&mut self) -> u32 {
        // STOP is officially a 2-byte instruction; the second byte is
        // padding. We skip it without a bus cycle so that PC matches
        // hardware while the reported cost stays at one machine cycle.
        self.regs.pc = self.regs.pc.wrapping_add(1);

        // Enter STOP low-power mode. In this state the CPU ignores
        // maskable interrupts and remains idle until a joypad input
        // line goes low (approximated in `step` by polling P1/$FF00).
        self.stopped = true;
        self.halted = false;
        4
    }

    pub(super) fn exec_di(&mut self) -> u32 {
        self.ime = false;
        self.ime_enable_pending = false;
        self.ime_enable_delay = false;
        4
    }

    pub(super) fn exec_ei(&mut self) -> u32 {
        // IME becomes 1 after the *next* instruction completes.
        self.ime_enable_pending = true;
        4
    }
}
