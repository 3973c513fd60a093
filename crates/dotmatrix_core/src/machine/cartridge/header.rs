use std::fmt;

use crate::error::{CoreError, Result};

/// Mapper family and on-board extras, from header byte 0x0147.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartridgeKind {
    RomOnly { ram: bool, battery: bool },
    Mbc1 { ram: bool, battery: bool },
    Mbc3 { ram: bool, battery: bool, rtc: bool },
    Mbc5 { ram: bool, battery: bool, rumble: bool },
}

impl CartridgeKind {
    pub fn has_ram(self) -> bool {
        match self {
            CartridgeKind::RomOnly { ram, .. }
            | CartridgeKind::Mbc1 { ram, .. }
            | CartridgeKind::Mbc3 { ram, .. }
            | CartridgeKind::Mbc5 { ram, .. } => ram,
        }
    }

    pub fn has_battery(self) -> bool {
        match self {
            CartridgeKind::RomOnly { battery, .. }
            | CartridgeKind::Mbc1 { battery, .. }
            | CartridgeKind::Mbc3 { battery, .. }
            | CartridgeKind::Mbc5 { battery, .. } => battery,
        }
    }

    pub fn has_rtc(self) -> bool {
        matches!(self, CartridgeKind::Mbc3 { rtc: true, .. })
    }
}

impl TryFrom<u8> for CartridgeKind {
    type Error = CoreError;

    fn try_from(code: u8) -> Result<Self> {
        use CartridgeKind::*;

        let kind = match code {
            0x00 => RomOnly { ram: false, battery: false },
            0x08 => RomOnly { ram: true, battery: false },
            0x09 => RomOnly { ram: true, battery: true },
            0x01 => Mbc1 { ram: false, battery: false },
            0x02 => Mbc1 { ram: true, battery: false },
            0x03 => Mbc1 { ram: true, battery: true },
            0x0F => Mbc3 { ram: false, battery: true, rtc: true },
            0x10 => Mbc3 { ram: true, battery: true, rtc: true },
            0x11 => Mbc3 { ram: false, battery: false, rtc: false },
            0x12 => Mbc3 { ram: true, battery: false, rtc: false },
            0x13 => Mbc3 { ram: true, battery: true, rtc: false },
            0x19 => Mbc5 { ram: false, battery: false, rumble: false },
            0x1A => Mbc5 { ram: true, battery: false, rumble: false },
            0x1B => Mbc5 { ram: true, battery: true, rumble: false },
            0x1C => Mbc5 { ram: false, battery: false, rumble: true },
            0x1D => Mbc5 { ram: true, battery: false, rumble: true },
            0x1E => Mbc5 { ram: true, battery: true, rumble: true },
            other => return Err(CoreError::UnsupportedMapper(other)),
        };
        Ok(kind)
    }
}

impl fmt::Display for CartridgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CartridgeKind::RomOnly { .. } => "ROM",
            CartridgeKind::Mbc1 { .. } => "MBC1",
            CartridgeKind::Mbc3 { .. } => "MBC3",
            CartridgeKind::Mbc5 { .. } => "MBC5",
        };
        f.write_str(name)?;
        if self.has_rtc() {
            f.write_str("+TIMER")?;
        }
        if matches!(self, CartridgeKind::Mbc5 { rumble: true, .. }) {
            f.write_str("+RUMBLE")?;
        }
        if self.has_ram() {
            f.write_str("+RAM")?;
        }
        if self.has_battery() {
            f.write_str("+BATTERY")?;
        }
        Ok(())
    }
}

/// The fields of the 0x0100..0x0150 header the core cares about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartridgeHeader {
    pub title: String,
    pub kind: CartridgeKind,
    /// ROM size in bytes as declared by byte 0x0148.
    pub rom_size: usize,
    /// External RAM size in bytes as declared by byte 0x0149.
    pub ram_size: usize,
    pub header_checksum: u8,
    pub checksum_ok: bool,
}

impl CartridgeHeader {
    pub fn parse(rom: &[u8]) -> Result<Self> {
        if rom.len() < 0x150 {
            return Err(CoreError::RomTooSmall { len: rom.len() });
        }

        let title: String = rom[0x134..0x144]
            .iter()
            .take_while(|&&b| b != 0)
            .filter(|b| b.is_ascii_graphic() || **b == b' ')
            .map(|&b| b as char)
            .collect();

        let kind = CartridgeKind::try_from(rom[0x147])?;
        let rom_size = match rom[0x148] {
            code @ 0x00..=0x08 => 0x8000 << code,
            code => {
                log::warn!("unknown ROM size code 0x{code:02X}, using the image length");
                rom.len()
            }
        };
        let ram_size = match rom[0x149] {
            0x01 => 0x800,
            0x02 => 0x2000,
            0x03 => 0x8000,
            0x04 => 0x20000,
            0x05 => 0x10000,
            _ => 0,
        };

        let computed = rom[0x134..=0x14C]
            .iter()
            .fold(0u8, |acc, &b| acc.wrapping_sub(b).wrapping_sub(1));
        let header_checksum = rom[0x14D];
        let checksum_ok = computed == header_checksum;
        if !checksum_ok {
            log::warn!(
                "header checksum mismatch: stored 0x{header_checksum:02X}, computed 0x{computed:02X}"
            );
        }

        Ok(Self {
            title,
            kind,
            rom_size,
            ram_size,
            header_checksum,
            checksum_ok,
        })
    }
}
