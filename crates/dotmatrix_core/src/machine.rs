mod bus;
mod cartridge;
mod gameboy;
mod interrupts;
mod joypad;
mod ppu;
mod serial;
mod timer;

pub(crate) use bus::SystemBus;
pub use cartridge::{Cartridge, CartridgeError, CartridgeHeader, CartridgeKind};
pub use gameboy::GameBoy;
pub use interrupts::InterruptFlags;
pub use joypad::Buttons;
pub use ppu::Mode;

#[cfg(test)]
mod tests;
