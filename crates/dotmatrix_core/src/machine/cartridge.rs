use thiserror::Error;

mod mbc1;
mod mbc3;
mod mbc5;

use mbc1::Mbc1;
use mbc3::Mbc3;
use mbc5::Mbc5;

/// Lowest address past the cartridge header; images smaller than this
/// cannot even contain a complete header.
const MIN_ROM_LEN: usize = 0x0150;

/// 16 KiB ROM bank size.
const ROM_BANK_LEN: usize = 0x4000;

/// 8 KiB external RAM bank size.
const RAM_BANK_LEN: usize = 0x2000;

/// Errors produced when parsing a ROM image or loading a save-RAM
/// snapshot. Loading never mutates existing state when it fails.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CartridgeError {
    #[error("ROM image too small: {len} bytes (not even a complete header)")]
    TooSmall { len: usize },
    #[error("header checksum mismatch: computed {computed:#04x}, header says {expected:#04x}")]
    ChecksumMismatch { computed: u8, expected: u8 },
    #[error("unknown ROM size code {code:#04x}")]
    UnknownRomSize { code: u8 },
    #[error("unknown RAM size code {code:#04x}")]
    UnknownRamSize { code: u8 },
    #[error("save RAM size mismatch: cartridge has {expected} bytes, snapshot has {actual}")]
    RamSizeMismatch { expected: usize, actual: usize },
}

/// Memory bank controller family declared by the header's type byte
/// ($0147). Only the common DMG-era controllers are supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartridgeKind {
    RomOnly,
    Mbc1,
    Mbc1Ram,
    Mbc3,
    Mbc3Ram,
    Mbc5,
    Mbc5Ram,
    Unsupported(u8),
}

impl CartridgeKind {
    /// Parse the cartridge type byte at $0147. Battery-backed variants
    /// are folded into their RAM variants; battery persistence is the
    /// front end's job via the save-RAM snapshot interface.
    pub fn from_byte(byte: u8) -> Self {
        match byte {
            0x00 => CartridgeKind::RomOnly,
            0x01 => CartridgeKind::Mbc1,
            0x02 | 0x03 => CartridgeKind::Mbc1Ram,
            0x0F | 0x11 => CartridgeKind::Mbc3,
            0x10 | 0x12 | 0x13 => CartridgeKind::Mbc3Ram,
            0x19 => CartridgeKind::Mbc5,
            0x1A | 0x1B => CartridgeKind::Mbc5Ram,
            _ => CartridgeKind::Unsupported(byte),
        }
    }
}

impl std::fmt::Display for CartridgeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CartridgeKind::RomOnly => write!(f, "ROM ONLY"),
            CartridgeKind::Mbc1 => write!(f, "MBC1"),
            CartridgeKind::Mbc1Ram => write!(f, "MBC1+RAM"),
            CartridgeKind::Mbc3 => write!(f, "MBC3"),
            CartridgeKind::Mbc3Ram => write!(f, "MBC3+RAM"),
            CartridgeKind::Mbc5 => write!(f, "MBC5"),
            CartridgeKind::Mbc5Ram => write!(f, "MBC5+RAM"),
            CartridgeKind::Unsupported(byte) => write!(f, "UNSUPPORTED ({byte:#04x})"),
        }
    }
}

/// Parsed cartridge header fields.
#[derive(Debug, Clone)]
pub struct CartridgeHeader {
    /// Game title ($0134-$0143), trimmed of padding.
    pub title: String,
    /// Controller family from $0147.
    pub kind: CartridgeKind,
    /// Declared ROM size in bytes ($0148).
    pub rom_size: usize,
    /// Declared external RAM size in bytes ($0149).
    pub ram_size: usize,
    /// Mask ROM version ($014C).
    pub rom_version: u8,
}

impl CartridgeHeader {
    /// Parse and validate the header region of a ROM image.
    ///
    /// The checksum at $014D is verified over $0134..=$014C with the
    /// boot ROM's `x = x - byte - 1` recurrence; a mismatch fails the
    /// load, since the rest of the header cannot be trusted either.
    pub fn parse(rom: &[u8]) -> Result<Self, CartridgeError> {
        if rom.len() < MIN_ROM_LEN {
            return Err(CartridgeError::TooSmall { len: rom.len() });
        }

        let title_bytes = &rom[0x0134..=0x0143];
        let title = String::from_utf8_lossy(title_bytes)
            .trim_end_matches('\0')
            .trim()
            .to_string();

        let kind = CartridgeKind::from_byte(rom[0x0147]);

        let rom_size_code = rom[0x0148];
        let rom_size = match rom_size_code {
            // 32 KiB << code, up to 8 MiB.
            0x00..=0x08 => (32 * 1024) << rom_size_code,
            _ => return Err(CartridgeError::UnknownRomSize {
                code: rom_size_code,
            }),
        };

        let ram_size_code = rom[0x0149];
        let ram_size = match ram_size_code {
            0x00 => 0,
            0x01 => 2 * 1024,
            0x02 => 8 * 1024,
            0x03 => 32 * 1024,
            0x04 => 128 * 1024,
            0x05 => 64 * 1024,
            _ => return Err(CartridgeError::UnknownRamSize {
                code: ram_size_code,
            }),
        };

        let expected = rom[0x014D];
        let mut computed: u8 = 0;
        for &byte in &rom[0x0134..=0x014C] {
            computed = computed.wrapping_sub(byte).wrapping_sub(1);
        }
        if computed != expected {
            return Err(CartridgeError::ChecksumMismatch { computed, expected });
        }

        Ok(CartridgeHeader {
            title,
            kind,
            rom_size,
            ram_size,
            rom_version: rom[0x014C],
        })
    }
}

impl std::fmt::Display for CartridgeHeader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:?} ({}, ROM {} KiB, RAM {} KiB, v{})",
            self.title,
            self.kind,
            self.rom_size / 1024,
            self.ram_size / 1024,
            self.rom_version
        )
    }
}

/// Banking state, one variant per supported controller scheme.
///
/// The variants hold only the mutable bank-selection registers; the ROM
/// and RAM stores live in [`Cartridge`] so the save-RAM surface does not
/// depend on the controller in use.
enum Mbc {
    None,
    Mbc1(Mbc1),
    Mbc3(Mbc3),
    Mbc5(Mbc5),
}

impl Mbc {
    fn for_kind(kind: CartridgeKind) -> Self {
        match kind {
            CartridgeKind::RomOnly => Mbc::None,
            CartridgeKind::Mbc1 | CartridgeKind::Mbc1Ram => Mbc::Mbc1(Mbc1::new()),
            CartridgeKind::Mbc3 | CartridgeKind::Mbc3Ram => Mbc::Mbc3(Mbc3::new()),
            CartridgeKind::Mbc5 | CartridgeKind::Mbc5Ram => Mbc::Mbc5(Mbc5::new()),
            CartridgeKind::Unsupported(byte) => {
                log::warn!(
                    "unsupported mapper byte {byte:#04x}; treating cartridge as ROM only"
                );
                Mbc::None
            }
        }
    }
}

/// A loaded cartridge: parsed header, ROM/RAM stores and the banking
/// registers that remap the two CPU-visible windows onto them.
pub struct Cartridge {
    header: CartridgeHeader,
    rom: Vec<u8>,
    ram: Vec<u8>,
    mbc: Mbc,
}

impl Cartridge {
    /// Build a cartridge from a raw ROM image, validating the header.
    pub fn from_bytes(rom: Vec<u8>) -> Result<Self, CartridgeError> {
        let header = CartridgeHeader::parse(&rom)?;
        let mbc = Mbc::for_kind(header.kind);
        let ram = vec![0; header.ram_size];

        log::info!("loaded cartridge: {header}");

        Ok(Cartridge {
            header,
            rom,
            ram,
            mbc,
        })
    }

    pub fn header(&self) -> &CartridgeHeader {
        &self.header
    }

    /// Number of 16 KiB banks actually present in the image.
    fn rom_banks(&self) -> usize {
        (self.rom.len() / ROM_BANK_LEN).max(1)
    }

    /// Bank mapped into the switchable window right now.
    fn switchable_rom_bank(&self) -> usize {
        let bank = match &self.mbc {
            Mbc::None => 1,
            Mbc::Mbc1(state) => state.rom_bank(),
            Mbc::Mbc3(state) => state.rom_bank(),
            Mbc::Mbc5(state) => state.rom_bank(),
        };
        // Bank index always reduced modulo the banks physically present.
        bank % self.rom_banks()
    }

    fn ram_bank(&self) -> usize {
        match &self.mbc {
            Mbc::None => 0,
            Mbc::Mbc1(state) => state.ram_bank(),
            Mbc::Mbc3(state) => state.ram_bank(),
            Mbc::Mbc5(state) => state.ram_bank(),
        }
    }

    fn ram_enabled(&self) -> bool {
        match &self.mbc {
            Mbc::None => false,
            Mbc::Mbc1(state) => state.ram_enabled(),
            Mbc::Mbc3(state) => state.ram_enabled(),
            Mbc::Mbc5(state) => state.ram_enabled(),
        }
    }

    /// Read from the ROM window ($0000-$7FFF).
    pub(crate) fn rom_read(&self, addr: u16) -> u8 {
        let index = match addr {
            0x0000..=0x3FFF => addr as usize,
            _ => {
                let offset = (addr as usize - ROM_BANK_LEN) % ROM_BANK_LEN;
                self.switchable_rom_bank() * ROM_BANK_LEN + offset
            }
        };
        self.rom.get(index).copied().unwrap_or(0xFF)
    }

    /// Write into the ROM window: decoded by the controller as a bank
    /// control register, never stored.
    pub(crate) fn rom_write(&mut self, addr: u16, value: u8) {
        match &mut self.mbc {
            Mbc::None => {}
            Mbc::Mbc1(state) => state.write_control(addr, value),
            Mbc::Mbc3(state) => state.write_control(addr, value),
            Mbc::Mbc5(state) => state.write_control(addr, value),
        }
    }

    /// Read from the external RAM window ($A000-$BFFF).
    pub(crate) fn ram_read(&self, addr: u16) -> u8 {
        if !self.ram_enabled() || self.ram.is_empty() {
            return 0xFF;
        }
        let offset = (addr as usize - 0xA000) % RAM_BANK_LEN;
        let index = self.ram_bank() * RAM_BANK_LEN + offset;
        self.ram.get(index).copied().unwrap_or(0xFF)
    }

    /// Write to the external RAM window ($A000-$BFFF).
    pub(crate) fn ram_write(&mut self, addr: u16, value: u8) {
        if !self.ram_enabled() || self.ram.is_empty() {
            return;
        }
        let offset = (addr as usize - 0xA000) % RAM_BANK_LEN;
        let index = self.ram_bank() * RAM_BANK_LEN + offset;
        if let Some(slot) = self.ram.get_mut(index) {
            *slot = value;
        }
    }

    /// Battery-save surface: the raw bank-concatenated RAM bytes.
    pub fn ram(&self) -> &[u8] {
        &self.ram
    }

    /// Replace RAM contents from a save snapshot. The snapshot must be
    /// exactly the size the header declares.
    pub fn load_ram(&mut self, bytes: &[u8]) -> Result<(), CartridgeError> {
        if bytes.len() != self.ram.len() {
            return Err(CartridgeError::RamSizeMismatch {
                expected: self.ram.len(),
                actual: bytes.len(),
            });
        }
        self.ram.copy_from_slice(bytes);
        Ok(())
    }

    /// Return banking registers to their power-on values. RAM contents
    /// survive, as they would on a battery-backed cartridge.
    pub(crate) fn reset_banking(&mut self) {
        self.mbc = Mbc::for_kind(self.header.kind);
    }
}
