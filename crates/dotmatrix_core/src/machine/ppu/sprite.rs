use super::fetcher::{decode_row, vram_byte};
use super::fifo::{Palette, PixelFifo, SpritePixel};
use super::regs::Lcdc;

pub(super) const MAX_SPRITES_PER_LINE: usize = 10;

const ATTR_BEHIND_BG: u8 = 1 << 7;
const ATTR_Y_FLIP: u8 = 1 << 6;
const ATTR_X_FLIP: u8 = 1 << 5;
const ATTR_PALETTE: u8 = 1 << 4;

/// One OAM entry as captured during the scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct OamEntry {
    pub(super) y: u8,
    pub(super) x: u8,
    pub(super) tile: u8,
    pub(super) attrs: u8,
}

impl OamEntry {
    pub(super) fn from_oam(oam: &[u8; 0xA0], index: usize) -> Self {
        let base = index * 4;
        Self {
            y: oam[base],
            x: oam[base + 1],
            tile: oam[base + 2],
            attrs: oam[base + 3],
        }
    }

    /// Whether the sprite covers line `ly` at the given height.
    pub(super) fn on_line(&self, ly: u8, height: u8) -> bool {
        let top = ly as u16 + 16;
        top >= self.y as u16 && top < self.y as u16 + height as u16
    }

    fn pixel_template(&self) -> SpritePixel {
        SpritePixel {
            color: 0,
            palette: if self.attrs & ATTR_PALETTE != 0 {
                Palette::Obp1
            } else {
                Palette::Obp0
            },
            behind_bg: self.attrs & ATTR_BEHIND_BG != 0,
        }
    }
}

#[inline]
pub(super) fn sprite_height(lcdc: Lcdc) -> u8 {
    if lcdc.contains(Lcdc::OBJ_SIZE) {
        16
    } else {
        8
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SpriteStep {
    Tile,
    DataLow,
    DataHigh,
    Push,
}

/// Fetches one sprite row while the background fetcher is paused.
#[derive(Debug, Clone)]
pub(super) struct SpriteFetcher {
    entry: OamEntry,
    step: SpriteStep,
    dots: u8,
    address: u16,
    low: u8,
    high: u8,
}

impl SpriteFetcher {
    pub(super) fn new(entry: OamEntry) -> Self {
        Self {
            entry,
            step: SpriteStep::Tile,
            dots: 0,
            address: 0,
            low: 0,
            high: 0,
        }
    }

    /// Advance by one dot. Returns true once the row has been merged.
    pub(super) fn tick(
        &mut self,
        vram: &[u8; 0x2000],
        lcdc: Lcdc,
        ly: u8,
        lx: u8,
        fifo: &mut PixelFifo,
    ) -> bool {
        if self.step == SpriteStep::Push {
            self.merge(lx, fifo);
            return true;
        }

        self.dots += 1;
        if self.dots < 2 {
            return false;
        }
        self.dots = 0;

        self.step = match self.step {
            SpriteStep::Tile => {
                let height = sprite_height(lcdc);
                let mut row = (ly as u16 + 16).wrapping_sub(self.entry.y as u16) as u8 & (height - 1);
                if self.entry.attrs & ATTR_Y_FLIP != 0 {
                    row = height - 1 - row;
                }
                let tile = if height == 16 {
                    self.entry.tile & 0xFE
                } else {
                    self.entry.tile
                };
                self.address = 0x8000 + tile as u16 * 16 + row as u16 * 2;
                SpriteStep::DataLow
            }
            SpriteStep::DataLow => {
                self.low = vram_byte(vram, self.address);
                SpriteStep::DataHigh
            }
            SpriteStep::DataHigh => {
                self.high = vram_byte(vram, self.address + 1);
                SpriteStep::Push
            }
            SpriteStep::Push => SpriteStep::Push,
        };
        false
    }

    /// Overlay the fetched row onto the FIFO, dropping columns already
    /// left of `lx`.
    fn merge(&self, lx: u8, fifo: &mut PixelFifo) {
        let mut colors = decode_row(self.low, self.high);
        if self.entry.attrs & ATTR_X_FLIP != 0 {
            colors.reverse();
        }
        let skip = (lx as usize + 8).saturating_sub(self.entry.x as usize);
        let template = self.entry.pixel_template();
        for (i, &color) in colors.iter().enumerate().skip(skip) {
            fifo.merge(i - skip, SpritePixel { color, ..template });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(y: u8, x: u8, attrs: u8) -> OamEntry {
        OamEntry { y, x, tile: 1, attrs }
    }

    #[test]
    fn visibility_window() {
        let sprite = entry(16, 8, 0);
        assert!(sprite.on_line(0, 8));
        assert!(sprite.on_line(7, 8));
        assert!(!sprite.on_line(8, 8));
        assert!(sprite.on_line(15, 16));
        // Y=0 sits fully above the screen.
        assert!(!entry(0, 8, 0).on_line(0, 16));
    }

    fn run(fetcher: &mut SpriteFetcher, vram: &[u8; 0x2000], lx: u8, fifo: &mut PixelFifo) {
        while !fetcher.tick(vram, Lcdc::OBJ_ENABLE, 0, lx, fifo) {}
    }

    #[test]
    fn x_flip_and_partial_left_edge() {
        let mut vram = [0u8; 0x2000];
        // Tile 1, row 0: leftmost pixel color 1, rest clear.
        vram[0x10] = 0x80;

        let mut fifo = PixelFifo::new();
        fifo.push_row([0; 8]);
        run(&mut SpriteFetcher::new(entry(16, 8, ATTR_X_FLIP)), &vram, 0, &mut fifo);
        let colors: Vec<u8> = (0..8).filter_map(|_| fifo.pop()).map(|e| e.color).collect();
        assert_eq!(colors, vec![0, 0, 0, 0, 0, 0, 0, 1]);

        // X=4 hides the first four columns.
        let mut fifo = PixelFifo::new();
        fifo.push_row([0; 8]);
        vram[0x10] = 0x08;
        run(&mut SpriteFetcher::new(entry(16, 4, 0)), &vram, 0, &mut fifo);
        assert_eq!(fifo.pop().map(|e| e.color), Some(1));
    }

    #[test]
    fn palette_and_priority_from_attributes() {
        let px = entry(16, 8, ATTR_PALETTE | ATTR_BEHIND_BG).pixel_template();
        assert_eq!(px.palette, Palette::Obp1);
        assert!(px.behind_bg);
    }
}
