use bitflags::bitflags;

bitflags! {
    /// LCDC (0xFF40).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub(crate) struct Lcdc: u8 {
        /// On DMG this blanks background and window together.
        const BG_ENABLE = 1 << 0;
        const OBJ_ENABLE = 1 << 1;
        /// 8x16 sprites when set.
        const OBJ_SIZE = 1 << 2;
        /// Background map at 0x9C00 instead of 0x9800.
        const BG_MAP = 1 << 3;
        /// Unsigned tile data at 0x8000 instead of signed at 0x9000.
        const TILE_DATA = 1 << 4;
        const WINDOW_ENABLE = 1 << 5;
        const WINDOW_MAP = 1 << 6;
        const LCD_ENABLE = 1 << 7;
    }
}

bitflags! {
    /// Writable interrupt-select bits of STAT (0xFF41).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub(crate) struct StatSelect: u8 {
        const HBLANK = 1 << 3;
        const VBLANK = 1 << 4;
        const OAM_SCAN = 1 << 5;
        const LYC = 1 << 6;
    }
}

/// PPU mode as reported in STAT bits 1..0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Mode {
    HBlank = 0,
    VBlank = 1,
    OamScan = 2,
    Drawing = 3,
}

impl Mode {
    #[inline]
    pub(crate) fn bits(self) -> u8 {
        self as u8
    }
}

/// Resolve a 2-bit color index through a DMG palette register.
#[inline]
pub(crate) fn shade(palette: u8, color: u8) -> u8 {
    (palette >> ((color & 0x03) * 2)) & 0x03
}
