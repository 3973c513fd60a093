use std::ops::Range;

/// Where a CPU address lands. Offsets are relative to the region start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Region {
    BootRom(u16),
    /// 0x0000..0x8000 and 0xA000..0xC000, passed through unchanged.
    Cartridge(u16),
    Vram(u16),
    Wram(u16),
    /// 0xE000..0xFE00 mirrors 0xC000..0xDE00.
    Echo(u16),
    Oam(u16),
    Unusable,
    Io(u16),
    Hram(u16),
    InterruptEnable,
}

const BOOT: Range<u32> = 0x0000..0x0100;
const ROM: Range<u32> = 0x0000..0x8000;
const VRAM: Range<u32> = 0x8000..0xA000;
const EXT_RAM: Range<u32> = 0xA000..0xC000;
const WRAM: Range<u32> = 0xC000..0xE000;
const ECHO: Range<u32> = 0xE000..0xFE00;
const OAM: Range<u32> = 0xFE00..0xFEA0;
const UNUSABLE: Range<u32> = 0xFEA0..0xFF00;
const IO: Range<u32> = 0xFF00..0xFF80;
const HRAM: Range<u32> = 0xFF80..0xFFFF;

#[inline]
fn offset(range: &Range<u32>, addr: u32) -> u16 {
    (addr - range.start) as u16
}

/// Decode `addr`. `boot_mapped` overlays the boot ROM on 0x0000..0x0100.
pub(super) fn decode(addr: u16, boot_mapped: bool) -> Region {
    let a = addr as u32;
    match a {
        _ if boot_mapped && BOOT.contains(&a) => Region::BootRom(offset(&BOOT, a)),
        _ if ROM.contains(&a) || EXT_RAM.contains(&a) => Region::Cartridge(addr),
        _ if VRAM.contains(&a) => Region::Vram(offset(&VRAM, a)),
        _ if WRAM.contains(&a) => Region::Wram(offset(&WRAM, a)),
        _ if ECHO.contains(&a) => Region::Echo(offset(&ECHO, a)),
        _ if OAM.contains(&a) => Region::Oam(offset(&OAM, a)),
        _ if UNUSABLE.contains(&a) => Region::Unusable,
        _ if IO.contains(&a) => Region::Io(addr),
        _ if HRAM.contains(&a) => Region::Hram(offset(&HRAM, a)),
        _ => Region::InterruptEnable,
    }
}
