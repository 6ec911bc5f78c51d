use crate::cpu::{Bus, Cpu, CpuFault};

use super::cartridge::{Cartridge, CartridgeError};
use super::joypad::Buttons;
use super::SystemBus;

/// High-level Game Boy machine.
///
/// Owns one CPU and one bus (which in turn owns the PPU, timer,
/// interrupt controller, joypad, serial port and cartridge slot) and
/// drives the per-instruction step loop. Front ends interact with the
/// emulated machine exclusively through this type: load a cartridge,
/// feed joypad state, run frames, copy the framebuffer out between
/// frames.
///
/// There is no shared state and no interior mutability; to run the
/// emulator on a background thread, move the whole value there.
pub struct GameBoy {
    pub cpu: Cpu,
    pub(crate) bus: SystemBus,
    /// Latched CPU fault. Once set, stepping is refused; the session is
    /// over.
    fault: Option<CpuFault>,
}

impl Default for GameBoy {
    fn default() -> Self {
        Self::new()
    }
}

impl GameBoy {
    pub fn new() -> Self {
        Self {
            cpu: Cpu::new(),
            bus: SystemBus::new(),
            fault: None,
        }
    }

    /// Reset every component to its power-on state.
    ///
    /// A loaded cartridge stays in the slot with its banking registers
    /// reset; its RAM is battery-backed and survives.
    pub fn reset(&mut self) {
        self.cpu.reset();
        self.bus.reset();
        self.fault = None;
    }

    /// Parse and insert a cartridge from a raw ROM image.
    ///
    /// Validation happens before anything is swapped in: on error the
    /// currently running cartridge (if any) is untouched.
    pub fn load_cartridge(&mut self, rom: &[u8]) -> Result<(), CartridgeError> {
        let cartridge = Cartridge::from_bytes(rom.to_vec())?;
        self.bus.insert_cartridge(cartridge);
        Ok(())
    }

    /// Execute one CPU instruction (or one interrupt entry, or one
    /// halted cycle) with its timer/PPU interleaving, returning the
    /// machine cycles consumed.
    ///
    /// After a [`CpuFault`] every further call returns the same fault.
    pub fn step_instruction(&mut self) -> Result<u32, CpuFault> {
        if let Some(fault) = self.fault {
            return Err(fault);
        }

        match self.cpu.step(&mut self.bus) {
            Ok(tcycles) => Ok(tcycles / 4),
            Err(fault) => {
                log::error!("halting session: {fault}");
                self.fault = Some(fault);
                Err(fault)
            }
        }
    }

    /// Step until the PPU signals frame completion and return the
    /// finished framebuffer.
    ///
    /// The buffer is valid and stable until the next call that advances
    /// the machine.
    pub fn run_until_frame(&mut self) -> Result<&[u8], CpuFault> {
        loop {
            self.step_instruction()?;
            if self.bus.ppu.take_frame_complete() {
                return Ok(self.bus.ppu.framebuffer());
            }
        }
    }

    /// Replace the joypad state with the given pressed-button mask.
    pub fn set_joypad_state(&mut self, buttons: Buttons) {
        self.bus.set_joypad_state(buttons);
    }

    /// The most recently completed 160×144 frame, one 2-bit shade per
    /// pixel (0 = lightest).
    pub fn framebuffer(&self) -> &[u8] {
        self.bus.ppu.framebuffer()
    }

    /// Battery-backed cartridge RAM, bank-concatenated. Empty when no
    /// cartridge is loaded or the cartridge has no RAM.
    pub fn cartridge_ram(&self) -> &[u8] {
        self.bus.cartridge().map(Cartridge::ram).unwrap_or(&[])
    }

    /// Restore battery-backed cartridge RAM from a save snapshot.
    pub fn load_cartridge_ram(&mut self, bytes: &[u8]) -> Result<(), CartridgeError> {
        match self.bus.cartridge_mut() {
            Some(cart) => cart.load_ram(bytes),
            None if bytes.is_empty() => Ok(()),
            None => Err(CartridgeError::RamSizeMismatch {
                expected: 0,
                actual: bytes.len(),
            }),
        }
    }

    /// Bytes the emulated program has pushed out of the serial port.
    /// CPU test ROMs report their results this way.
    pub fn serial_output(&self) -> &[u8] {
        &self.bus.serial.output
    }

    /// Machine cycles elapsed since power-on.
    pub fn cycles(&self) -> u64 {
        self.bus.cycles()
    }

    /// Raw bus read, without advancing time. Intended for inspection
    /// from tests and harnesses.
    pub fn read(&mut self, addr: u16) -> u8 {
        self.bus.read8(addr)
    }

    /// Raw bus write, without advancing time.
    pub fn write(&mut self, addr: u16, value: u8) {
        self.bus.write8(addr, value);
    }
}
