use super::{Bus, Cpu};

impl Cpu {
    /// Check whether a maskable interrupt should be serviced right now.
    ///
    /// Also implements the HALT wake-up rule: if the CPU is halted and an
    /// interrupt becomes pending while IME is disabled, the CPU wakes up
    /// without servicing the interrupt.
    fn poll_pending_interrupt<B: Bus>(&mut self, bus: &mut B) -> Option<u8> {
        let ie = bus.read8(0xFFFF);
        let iflags = bus.read8(0xFF0F);
        let pending = ie & iflags & 0x1F;
        if pending == 0 {
            return None;
        }

        if self.halted && !self.ime {
            self.halted = false;
            return None;
        }

        if !self.ime {
            return None;
        }

        // Lowest-numbered pending source wins
        // (VBlank > STAT > Timer > Serial > Joypad).
        let index = pending.trailing_zeros() as u8;
        if index >= 5 {
            return None;
        }

        Some(index)
    }

    /// Service a pending maskable interrupt if IME is set.
    ///
    /// Returns `Some(cycles)` if an interrupt was taken, or `None` otherwise.
    ///
    /// The entry sequence costs 5 machine cycles: two internal delay
    /// cycles, the two PC pushes, and the vector load. IME is cleared
    /// first; the serviced source's IF bit is cleared as the PC is
    /// redirected to its vector.
    pub(super) fn handle_interrupts<B: Bus>(&mut self, bus: &mut B) -> Option<u32> {
        let index = self.poll_pending_interrupt(bus)?;

        self.ime = false;
        self.halted = false;
        self.ime_enable_pending = false;
        self.ime_enable_delay = false;

        self.idle_cycle(bus);
        self.idle_cycle(bus);

        let pc = self.regs.pc;
        self.push_u16(bus, pc);

        let iflags = bus.read8(0xFF0F);
        bus.write8(0xFF0F, iflags & !(1 << index));

        let vector = 0x0040 + (index as u16) * 8;
        log::debug!(
            "interrupt dispatch: idx={} vector={:#06x} pc={:#06x} sp={:#06x}",
            index,
            vector,
            pc,
            self.regs.sp,
        );
        self.regs.pc = vector;
        self.idle_cycle(bus);

        Some(20)
    }

    /// Apply delayed IME change requested by EI.
    #[inline]
    pub(super) fn apply_ime_delay(&mut self) {
        if self.ime_enable_delay {
            // Second step after EI: actually enable IME.
            self.ime = true;
            self.ime_enable_delay = false;
        } else if self.ime_enable_pending {
            // First step after EI: arm the delayed enable.
            self.ime_enable_pending = false;
            self.ime_enable_delay = true;
        }
    }
}
