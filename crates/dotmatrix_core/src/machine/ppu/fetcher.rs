use super::fifo::PixelFifo;
use super::regs::Lcdc;

/// Stage of a tile fetch. Each stage but `Push` takes two dots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(super) enum FetchStep {
    #[default]
    Tile,
    DataLow,
    DataHigh,
    Sleep,
    Push,
}

/// Register values a background fetch depends on, sampled live.
#[derive(Debug, Clone, Copy)]
pub(super) struct FetchContext {
    pub(super) lcdc: Lcdc,
    pub(super) scx: u8,
    pub(super) scy: u8,
    pub(super) ly: u8,
    pub(super) window_line: u8,
}

/// Address of the low bitplane byte for `tile` on row `row`.
pub(super) fn tile_row_address(lcdc: Lcdc, tile: u8, row: u8) -> u16 {
    let base = if lcdc.contains(Lcdc::TILE_DATA) {
        0x8000u16.wrapping_add(tile as u16 * 16)
    } else {
        0x9000u16.wrapping_add_signed(tile as i8 as i16 * 16)
    };
    base + (row as u16 & 0x07) * 2
}

/// Decode one row of a tile into 2-bit color indices, leftmost first.
pub(super) fn decode_row(low: u8, high: u8) -> [u8; 8] {
    let mut out = [0u8; 8];
    for (i, px) in out.iter_mut().enumerate() {
        let bit = 7 - i;
        *px = ((low >> bit) & 1) | (((high >> bit) & 1) << 1);
    }
    out
}

#[inline]
pub(super) fn vram_byte(vram: &[u8; 0x2000], addr: u16) -> u8 {
    vram[(addr as usize) & 0x1FFF]
}

/// Background/window tile fetcher feeding the pixel FIFO.
#[derive(Debug, Clone, Default)]
pub(super) struct BgFetcher {
    step: FetchStep,
    /// Dots spent in the current step.
    dots: u8,
    /// Tiles fetched since the line (or the window) started.
    tile_x: u8,
    window: bool,
    tile: u8,
    low: u8,
    high: u8,
}

impl BgFetcher {
    /// Start over at the beginning of a line.
    pub(super) fn reset(&mut self) {
        *self = Self::default();
    }

    /// Restart fetching from the window's first column.
    pub(super) fn switch_to_window(&mut self) {
        *self = Self {
            window: true,
            ..Self::default()
        };
    }

    /// Map row and column for the current fetch.
    fn map_address(&self, ctx: &FetchContext) -> u16 {
        if self.window {
            let base = if ctx.lcdc.contains(Lcdc::WINDOW_MAP) {
                0x9C00
            } else {
                0x9800
            };
            let row = (ctx.window_line as u16 / 8) & 0x1F;
            base + row * 32 + (self.tile_x as u16 & 0x1F)
        } else {
            let base = if ctx.lcdc.contains(Lcdc::BG_MAP) {
                0x9C00
            } else {
                0x9800
            };
            let y = ctx.ly.wrapping_add(ctx.scy);
            let col = ((ctx.scx >> 3) as u16 + self.tile_x as u16) & 0x1F;
            base + (y as u16 / 8) * 32 + col
        }
    }

    fn fine_row(&self, ctx: &FetchContext) -> u8 {
        if self.window {
            ctx.window_line & 0x07
        } else {
            ctx.ly.wrapping_add(ctx.scy) & 0x07
        }
    }

    /// Advance by one dot.
    pub(super) fn tick(&mut self, vram: &[u8; 0x2000], ctx: &FetchContext, fifo: &mut PixelFifo) {
        if self.step == FetchStep::Push {
            if fifo.len() <= 8 {
                let row = if ctx.lcdc.contains(Lcdc::BG_ENABLE) {
                    decode_row(self.low, self.high)
                } else {
                    [0; 8]
                };
                fifo.push_row(row);
                self.tile_x = self.tile_x.wrapping_add(1);
                self.step = FetchStep::Tile;
            }
            return;
        }

        self.dots += 1;
        if self.dots < 2 {
            return;
        }
        self.dots = 0;

        self.step = match self.step {
            FetchStep::Tile => {
                self.tile = vram_byte(vram, self.map_address(ctx));
                FetchStep::DataLow
            }
            FetchStep::DataLow => {
                let addr = tile_row_address(ctx.lcdc, self.tile, self.fine_row(ctx));
                self.low = vram_byte(vram, addr);
                FetchStep::DataHigh
            }
            FetchStep::DataHigh => {
                let addr = tile_row_address(ctx.lcdc, self.tile, self.fine_row(ctx));
                self.high = vram_byte(vram, addr + 1);
                FetchStep::Sleep
            }
            FetchStep::Sleep | FetchStep::Push => FetchStep::Push,
        };
    }
}
