mod header;
mod mbc1;
mod mbc3;
mod mbc5;

pub use header::{CartridgeHeader, CartridgeKind};

use crate::error::Result;
use mbc1::Mbc1;
use mbc3::{Mbc3, Mbc3Target};
use mbc5::Mbc5;

const ROM_BANK_SIZE: usize = 0x4000;
const RAM_BANK_SIZE: usize = 0x2000;

/// Bank-switching logic, one variant per supported mapper family.
#[derive(Debug, Clone)]
enum Mapper {
    RomOnly,
    Mbc1(Mbc1),
    Mbc3(Mbc3),
    Mbc5(Mbc5),
}

/// A cartridge: ROM, optional external RAM, and the mapper in front of them.
///
/// Only 0x0000..0x7FFF and 0xA000..0xBFFF are routed here. Writes to the ROM
/// range program the mapper; disabled or absent RAM reads 0xFF and ignores
/// writes.
#[derive(Debug, Clone)]
pub struct Cartridge {
    kind: CartridgeKind,
    title: String,
    rom: Vec<u8>,
    rom_banks: usize,
    ram: Vec<u8>,
    mapper: Mapper,
    ram_dirty: bool,
}

impl Cartridge {
    /// Build a cartridge from a raw image and a mapper selector already
    /// decoded from the header. `ram_size` is in bytes and ignored for
    /// kinds without RAM.
    pub fn new(rom: Vec<u8>, kind: CartridgeKind, ram_size: usize) -> Self {
        let mapper = match kind {
            CartridgeKind::RomOnly { .. } => Mapper::RomOnly,
            CartridgeKind::Mbc1 { .. } => Mapper::Mbc1(Mbc1::new()),
            CartridgeKind::Mbc3 { rtc, .. } => Mapper::Mbc3(Mbc3::new(rtc)),
            CartridgeKind::Mbc5 { rumble, .. } => Mapper::Mbc5(Mbc5::new(rumble)),
        };
        let ram_size = if kind.has_ram() { ram_size } else { 0 };
        let rom_banks = rom.len().div_ceil(ROM_BANK_SIZE).max(1);

        Self {
            kind,
            title: String::new(),
            rom,
            rom_banks,
            ram: vec![0; ram_size],
            mapper,
            ram_dirty: false,
        }
    }

    /// Parse the header and build the matching cartridge.
    pub fn from_rom(rom: Vec<u8>) -> Result<Self> {
        let header = CartridgeHeader::parse(&rom)?;
        log::debug!(
            "cartridge \"{}\": {} ROM {} KiB RAM {} KiB",
            header.title,
            header.kind,
            header.rom_size / 1024,
            header.ram_size / 1024
        );
        let mut cart = Self::new(rom, header.kind, header.ram_size);
        cart.title = header.title;
        Ok(cart)
    }

    pub fn kind(&self) -> CartridgeKind {
        self.kind
    }

    /// Header title, empty when built with [`Cartridge::new`].
    pub fn title(&self) -> &str {
        &self.title
    }

    fn rom_byte(&self, bank: usize, addr: u16) -> u8 {
        let bank = bank % self.rom_banks;
        let index = bank * ROM_BANK_SIZE + (addr as usize & (ROM_BANK_SIZE - 1));
        self.rom.get(index).copied().unwrap_or(0xFF)
    }

    /// Index into `ram` for an access to `addr`, or `None` if RAM is off.
    fn ram_index(&self, bank: Option<usize>, addr: u16) -> Option<usize> {
        let bank = bank?;
        if self.ram.is_empty() {
            return None;
        }
        let offset = bank * RAM_BANK_SIZE + (addr as usize - 0xA000);
        Some(offset % self.ram.len())
    }

    fn ram_bank(&self) -> Option<usize> {
        match &self.mapper {
            Mapper::RomOnly => Some(0),
            Mapper::Mbc1(m) => m.ram_bank(),
            Mapper::Mbc3(m) => match m.target() {
                Mbc3Target::Ram(bank) => Some(bank),
                _ => None,
            },
            Mapper::Mbc5(m) => m.ram_bank(),
        }
    }

    pub fn read(&self, addr: u16) -> u8 {
        match addr {
            0x0000..=0x7FFF => {
                let bank = match &self.mapper {
                    Mapper::RomOnly => (addr as usize) / ROM_BANK_SIZE,
                    Mapper::Mbc1(m) => m.rom_bank(addr),
                    Mapper::Mbc3(m) => m.rom_bank(addr),
                    Mapper::Mbc5(m) => m.rom_bank(addr),
                };
                self.rom_byte(bank, addr)
            }
            0xA000..=0xBFFF => {
                if let Mapper::Mbc3(m) = &self.mapper {
                    if m.target() == Mbc3Target::Rtc {
                        return m.read_rtc();
                    }
                }
                match self.ram_index(self.ram_bank(), addr) {
                    Some(index) => self.ram[index],
                    None => 0xFF,
                }
            }
            _ => 0xFF,
        }
    }

    pub fn write(&mut self, addr: u16, value: u8) {
        match addr {
            0x0000..=0x7FFF => match &mut self.mapper {
                Mapper::RomOnly => {}
                Mapper::Mbc1(m) => m.write_register(addr, value),
                Mapper::Mbc3(m) => m.write_register(addr, value),
                Mapper::Mbc5(m) => m.write_register(addr, value),
            },
            0xA000..=0xBFFF => {
                if let Mapper::Mbc3(m) = &mut self.mapper {
                    if m.target() == Mbc3Target::Rtc {
                        m.write_rtc(value);
                        return;
                    }
                }
                if let Some(index) = self.ram_index(self.ram_bank(), addr) {
                    self.ram[index] = value;
                    self.ram_dirty = true;
                }
            }
            _ => {}
        }
    }

    /// Advance cartridge-side clocks by one T-cycle.
    #[inline]
    pub fn tick(&mut self) {
        if let Mapper::Mbc3(m) = &mut self.mapper {
            m.tick();
        }
    }

    /// External RAM contents for saving, if the cartridge has a battery.
    pub fn battery_ram(&self) -> Option<&[u8]> {
        (self.kind.has_battery() && !self.ram.is_empty()).then_some(self.ram.as_slice())
    }

    /// Restore previously saved RAM. Extra bytes are ignored; a short image
    /// fills only the start of RAM.
    pub fn load_battery_ram(&mut self, data: &[u8]) {
        let len = data.len().min(self.ram.len());
        if data.len() != self.ram.len() {
            log::warn!(
                "save data is {} bytes, cartridge RAM is {} bytes",
                data.len(),
                self.ram.len()
            );
        }
        self.ram[..len].copy_from_slice(&data[..len]);
    }

    /// Whether RAM was written since the last call. Clears the flag.
    pub fn take_ram_dirty(&mut self) -> bool {
        std::mem::take(&mut self.ram_dirty)
    }

    /// Rumble motor state for MBC5 rumble carts.
    pub fn rumble_active(&self) -> bool {
        matches!(&self.mapper, Mapper::Mbc5(m) if m.motor_on())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// ROM where every byte of bank N holds N.
    fn banked_rom(banks: usize) -> Vec<u8> {
        (0..banks)
            .flat_map(|bank| std::iter::repeat(bank as u8).take(ROM_BANK_SIZE))
            .collect()
    }

    #[test]
    fn rom_only_maps_32k_flat() {
        let cart = Cartridge::new(
            banked_rom(2),
            CartridgeKind::RomOnly { ram: false, battery: false },
            0,
        );
        assert_eq!(cart.read(0x0000), 0);
        assert_eq!(cart.read(0x7FFF), 1);
        assert_eq!(cart.read(0xA000), 0xFF);
    }

    #[test]
    fn mbc1_bank_zero_maps_bank_one() {
        let mut cart = Cartridge::new(
            banked_rom(8),
            CartridgeKind::Mbc1 { ram: false, battery: false },
            0,
        );
        cart.write(0x2000, 0x00);
        assert_eq!(cart.read(0x4000), 1);
        cart.write(0x2000, 0x05);
        assert_eq!(cart.read(0x4000), 5);
        // Bank numbers wrap at the ROM size.
        cart.write(0x2000, 0x09);
        assert_eq!(cart.read(0x4000), 1);
    }

    #[test]
    fn ram_gated_by_enable_register() {
        let mut cart = Cartridge::new(
            banked_rom(4),
            CartridgeKind::Mbc1 { ram: true, battery: true },
            0x8000,
        );
        cart.write(0xA000, 0x12);
        assert_eq!(cart.read(0xA000), 0xFF);
        assert!(!cart.take_ram_dirty());

        cart.write(0x0000, 0x0A);
        cart.write(0xA000, 0x12);
        assert_eq!(cart.read(0xA000), 0x12);
        assert!(cart.take_ram_dirty());
        assert!(!cart.take_ram_dirty());

        cart.write(0x0000, 0x00);
        assert_eq!(cart.read(0xA000), 0xFF);
    }

    #[test]
    fn mbc5_reaches_bank_256() {
        let mut rom = banked_rom(512);
        // Mark bank 0x100 so it differs from bank 0.
        rom[0x100 * ROM_BANK_SIZE] = 0xAA;
        let mut cart = Cartridge::new(
            rom,
            CartridgeKind::Mbc5 { ram: false, battery: false, rumble: false },
            0,
        );
        cart.write(0x2000, 0x00);
        cart.write(0x3000, 0x01);
        assert_eq!(cart.read(0x4000), 0xAA);

        cart.write(0x3000, 0x00);
        assert_eq!(cart.read(0x4001), 0x00);
    }

    #[test]
    fn battery_ram_roundtrip() {
        let mut cart = Cartridge::new(
            banked_rom(2),
            CartridgeKind::Mbc3 { ram: true, battery: true, rtc: false },
            0x2000,
        );
        cart.load_battery_ram(&[1, 2, 3]);
        cart.write(0x0000, 0x0A);
        assert_eq!(cart.read(0xA001), 2);
        assert_eq!(&cart.battery_ram().unwrap()[..3], &[1, 2, 3]);
    }

    #[test]
    fn no_battery_means_nothing_to_save() {
        let cart = Cartridge::new(
            banked_rom(2),
            CartridgeKind::Mbc1 { ram: true, battery: false },
            0x2000,
        );
        assert!(cart.battery_ram().is_none());
    }

    #[test]
    fn mbc3_rtc_register_window() {
        let mut cart = Cartridge::new(
            banked_rom(2),
            CartridgeKind::Mbc3 { ram: true, battery: true, rtc: true },
            0x2000,
        );
        cart.write(0x0000, 0x0A);
        cart.write(0x4000, 0x09);
        cart.write(0xA000, 0x2A);
        assert_eq!(cart.read(0xA000), 0x2A);
        // RTC writes do not touch RAM.
        cart.write(0x4000, 0x00);
        assert_eq!(cart.read(0xA000), 0x00);
        assert!(!cart.take_ram_dirty());
    }
}
