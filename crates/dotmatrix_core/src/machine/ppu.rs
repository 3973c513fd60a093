mod fetcher;
mod fifo;
mod mmio;
mod regs;
mod sprite;

use crate::interrupts::{Interrupt, InterruptController};
use crate::machine::display::DisplaySink;
use crate::{Color, SCREEN_HEIGHT, SCREEN_WIDTH};
use fetcher::{BgFetcher, FetchContext};
use fifo::{Palette, PixelFifo, SpritePixel};
use regs::{shade, Lcdc, Mode, StatSelect};
use sprite::{sprite_height, OamEntry, SpriteFetcher, MAX_SPRITES_PER_LINE};

const DOTS_PER_LINE: u16 = 456;
const OAM_SCAN_DOTS: u16 = 80;
const VBLANK_START: u8 = 144;
const LINES_PER_FRAME: u8 = 154;

/// Dot-clocked DMG picture processor.
///
/// Owns VRAM, OAM and the LCD registers. [`Ppu::tick`] advances one dot and
/// pushes finished pixels to a [`DisplaySink`].
#[derive(Debug, Clone)]
pub(crate) struct Ppu {
    vram: Box<[u8; 0x2000]>,
    oam: Box<[u8; 0xA0]>,

    lcdc: Lcdc,
    stat_select: StatSelect,
    scy: u8,
    scx: u8,
    ly: u8,
    lyc: u8,
    bgp: u8,
    obp0: u8,
    obp1: u8,
    wy: u8,
    wx: u8,

    mode: Mode,
    /// Dot within the current line, 0..456.
    dot: u16,
    /// OR of the enabled HBlank and OAM-scan sources.
    stat_line: bool,
    /// LY==LYC as of the last update.
    lyc_match: bool,

    sprites: Vec<OamEntry>,
    fifo: PixelFifo,
    fetcher: BgFetcher,
    sprite_fetch: Option<SpriteFetcher>,
    /// Column of the next pixel to emit.
    lx: u8,
    /// Pixels still to drop from the front of the FIFO.
    discard: u8,

    wy_triggered: bool,
    window_active: bool,
    window_drawn: bool,
    window_line: u8,
    /// Sprite pixels queued before a window switch, merged back over the
    /// first window tile.
    pending_splice: Vec<(usize, SpritePixel)>,

    /// First frame after the LCD is switched on is shown blank.
    skip_frame: bool,
    frame_ready: bool,
}

impl Ppu {
    /// Power-on state: LCD off, everything cleared.
    pub(crate) fn new() -> Self {
        Self {
            vram: Box::new([0; 0x2000]),
            oam: Box::new([0; 0xA0]),
            lcdc: Lcdc::empty(),
            stat_select: StatSelect::empty(),
            scy: 0,
            scx: 0,
            ly: 0,
            lyc: 0,
            bgp: 0,
            obp0: 0,
            obp1: 0,
            wy: 0,
            wx: 0,
            mode: Mode::HBlank,
            dot: 0,
            stat_line: false,
            lyc_match: false,
            sprites: Vec::with_capacity(MAX_SPRITES_PER_LINE),
            fifo: PixelFifo::new(),
            fetcher: BgFetcher::default(),
            sprite_fetch: None,
            lx: 0,
            discard: 0,
            wy_triggered: false,
            window_active: false,
            window_drawn: false,
            window_line: 0,
            pending_splice: Vec::new(),
            skip_frame: false,
            frame_ready: false,
        }
    }

    /// Register state the boot ROM leaves behind.
    pub(crate) fn init_post_boot(&mut self) {
        self.lcdc = Lcdc::from_bits_retain(0x91);
        self.bgp = 0xFC;
        self.obp0 = 0xFF;
        self.obp1 = 0xFF;
        self.start_line(0);
    }

    #[inline]
    pub(crate) fn lcd_enabled(&self) -> bool {
        self.lcdc.contains(Lcdc::LCD_ENABLE)
    }

    /// Whether a frame finished since the last call. Clears the flag.
    pub(crate) fn take_frame_ready(&mut self) -> bool {
        std::mem::take(&mut self.frame_ready)
    }

    /// Advance by one dot.
    pub(crate) fn tick<D: DisplaySink>(&mut self, ic: &mut InterruptController, sink: &mut D) {
        if !self.lcd_enabled() {
            return;
        }

        match self.mode {
            Mode::OamScan => {
                if self.dot % 2 == 0 {
                    self.scan_entry((self.dot / 2) as usize);
                }
            }
            Mode::Drawing => self.drawing_dot(sink),
            Mode::HBlank | Mode::VBlank => {}
        }

        self.dot += 1;
        if self.mode == Mode::OamScan && self.dot == OAM_SCAN_DOTS {
            self.start_drawing();
        }
        if self.dot == DOTS_PER_LINE {
            self.end_line(ic, sink);
        }

        self.update_stat(ic);
    }

    fn start_line(&mut self, ly: u8) {
        self.ly = ly;
        self.dot = 0;
        if ly == 0 {
            self.window_line = 0;
            self.wy_triggered = false;
        }
        if ly < VBLANK_START {
            self.mode = Mode::OamScan;
            self.sprites.clear();
            if self.ly == self.wy {
                self.wy_triggered = true;
            }
        } else {
            self.mode = Mode::VBlank;
        }
    }

    fn scan_entry(&mut self, index: usize) {
        if self.sprites.len() >= MAX_SPRITES_PER_LINE {
            return;
        }
        let entry = OamEntry::from_oam(&self.oam, index);
        if entry.on_line(self.ly, sprite_height(self.lcdc)) {
            self.sprites.push(entry);
        }
    }

    fn start_drawing(&mut self) {
        self.mode = Mode::Drawing;
        self.fifo.clear();
        self.fetcher.reset();
        self.sprite_fetch = None;
        self.lx = 0;
        self.discard = self.scx & 0x07;
        self.window_active = false;
        self.window_drawn = false;
        if self.ly == self.wy {
            self.wy_triggered = true;
        }
    }

    fn end_line<D: DisplaySink>(&mut self, ic: &mut InterruptController, sink: &mut D) {
        if self.window_drawn {
            self.window_line = self.window_line.wrapping_add(1);
        }

        let next = self.ly + 1;
        if next == VBLANK_START {
            self.start_line(next);
            self.enter_vblank(ic, sink);
        } else if next == LINES_PER_FRAME {
            self.skip_frame = false;
            self.start_line(0);
        } else {
            self.start_line(next);
        }
    }

    fn enter_vblank<D: DisplaySink>(&mut self, ic: &mut InterruptController, sink: &mut D) {
        ic.request(Interrupt::VBlank);
        if self.stat_select.contains(StatSelect::VBLANK) {
            ic.request(Interrupt::LcdStat);
        }
        log::debug!(
            "PPU: VBlank (IF=0x{:02X}, STAT select=0x{:02X})",
            ic.flags(),
            self.stat_select.bits()
        );
        sink.frame_complete();
        self.frame_ready = true;
    }

    fn fetch_context(&self) -> FetchContext {
        FetchContext {
            lcdc: self.lcdc,
            scx: self.scx,
            scy: self.scy,
            ly: self.ly,
            window_line: self.window_line,
        }
    }

    fn window_triggers(&self) -> bool {
        !self.window_active
            && self.lcdc.contains(Lcdc::WINDOW_ENABLE)
            && self.wy_triggered
            && self.wx <= 166
            && self.lx as u16 + 7 >= self.wx as u16
    }

    fn start_window(&mut self) {
        let kept = self.fifo.sprite_pixels();
        self.fifo.clear();
        self.fetcher.switch_to_window();
        self.window_active = true;
        self.window_drawn = true;
        self.discard = 7u8.saturating_sub(self.wx);
        self.pending_splice = kept;
    }

    fn next_sprite(&mut self) -> Option<OamEntry> {
        if self.discard != 0 || self.fifo.len() < 8 || !self.lcdc.contains(Lcdc::OBJ_ENABLE) {
            return None;
        }
        let lx = self.lx as u16;
        let (index, _) = self
            .sprites
            .iter()
            .enumerate()
            .filter(|(_, s)| s.x as u16 > lx && s.x as u16 <= lx + 8)
            .min_by_key(|(i, s)| (s.x, *i))?;
        Some(self.sprites.remove(index))
    }

    fn drawing_dot<D: DisplaySink>(&mut self, sink: &mut D) {
        if let Some(fetch) = self.sprite_fetch.as_mut() {
            if fetch.tick(&self.vram, self.lcdc, self.ly, self.lx, &mut self.fifo) {
                self.sprite_fetch = None;
            }
            return;
        }

        if self.window_triggers() {
            self.start_window();
        }

        if let Some(entry) = self.next_sprite() {
            self.sprite_fetch = Some(SpriteFetcher::new(entry));
            return;
        }

        let ctx = self.fetch_context();
        let before = self.fifo.len();
        self.fetcher.tick(&self.vram, &ctx, &mut self.fifo);
        if before < self.fifo.len() && !self.pending_splice.is_empty() {
            for (slot, pixel) in std::mem::take(&mut self.pending_splice) {
                self.fifo.merge(slot, pixel);
            }
        }

        if self.fifo.len() > 8 {
            self.shift_pixel(sink);
        }
    }

    fn shift_pixel<D: DisplaySink>(&mut self, sink: &mut D) {
        let Some(entry) = self.fifo.pop() else {
            return;
        };
        if self.discard > 0 {
            self.discard -= 1;
            return;
        }

        let color = if self.skip_frame {
            Color::WHITE
        } else {
            let palette = match entry.palette {
                Palette::Bgp => self.bgp,
                Palette::Obp0 => self.obp0,
                Palette::Obp1 => self.obp1,
            };
            Color::from_shade(shade(palette, entry.color))
        };
        sink.put_pixel(self.lx as usize, self.ly as usize, color);

        self.lx += 1;
        if self.lx as usize == SCREEN_WIDTH {
            self.mode = Mode::HBlank;
            self.sprite_fetch = None;
            self.fifo.clear();
        }
    }

    /// Request INT 48h on a rising edge of the LY==LYC flag, or of the
    /// HBlank/OAM-scan mode line. The mode-1 source is raised on VBlank
    /// entry instead.
    fn update_stat(&mut self, ic: &mut InterruptController) {
        if !self.lcd_enabled() {
            self.stat_line = false;
            self.lyc_match = false;
            return;
        }

        let select = self.stat_select;
        let matched = self.ly == self.lyc;
        let was_matched = std::mem::replace(&mut self.lyc_match, matched);
        if matched && !was_matched && select.contains(StatSelect::LYC) {
            ic.request(Interrupt::LcdStat);
            log::trace!("PPU: LYC match at LY={}", self.ly);
        }

        let line = (select.contains(StatSelect::OAM_SCAN) && self.mode == Mode::OamScan)
            || (select.contains(StatSelect::HBLANK) && self.mode == Mode::HBlank);

        let prev = std::mem::replace(&mut self.stat_line, line);
        if !prev && line {
            ic.request(Interrupt::LcdStat);
            log::trace!(
                "PPU: STAT rising edge (LY={} mode={} select=0x{:02X})",
                self.ly,
                self.mode.bits(),
                select.bits()
            );
        }
    }

    fn lcd_off<D: DisplaySink>(&mut self, sink: &mut D) {
        log::debug!("PPU: LCD off at LY={} dot={}", self.ly, self.dot);
        self.ly = 0;
        self.dot = 0;
        self.mode = Mode::HBlank;
        self.stat_line = false;
        self.lyc_match = false;
        self.fifo.clear();
        self.sprite_fetch = None;
        self.pending_splice.clear();

        for y in 0..SCREEN_HEIGHT {
            for x in 0..SCREEN_WIDTH {
                sink.put_pixel(x, y, Color::WHITE);
            }
        }
        sink.frame_complete();
        self.frame_ready = true;
    }

    fn lcd_on(&mut self) {
        log::debug!("PPU: LCD on");
        self.skip_frame = true;
        self.start_line(0);
    }
}

#[cfg(test)]
mod tests;
