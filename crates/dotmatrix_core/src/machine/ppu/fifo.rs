use std::collections::VecDeque;

/// Palette register a FIFO entry resolves through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum Palette {
    #[default]
    Bgp,
    Obp0,
    Obp1,
}

/// One pending pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct FifoEntry {
    /// 2-bit color index.
    pub(crate) color: u8,
    pub(crate) palette: Palette,
    /// A sprite pixel has claimed this slot.
    pub(crate) sprite: bool,
    /// OBJ-to-BG priority attribute of the sprite that claimed the slot.
    pub(crate) behind_bg: bool,
}

impl FifoEntry {
    pub(crate) fn background(color: u8) -> Self {
        Self {
            color,
            ..Self::default()
        }
    }
}

/// A sprite pixel about to be merged into the FIFO.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SpritePixel {
    pub(crate) color: u8,
    pub(crate) palette: Palette,
    pub(crate) behind_bg: bool,
}

/// Shared background/window FIFO that sprite pixels are merged into.
#[derive(Debug, Clone, Default)]
pub(crate) struct PixelFifo {
    entries: VecDeque<FifoEntry>,
}

impl PixelFifo {
    pub(crate) fn new() -> Self {
        Self {
            entries: VecDeque::with_capacity(16),
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }

    pub(crate) fn push_row(&mut self, colors: [u8; 8]) {
        self.entries
            .extend(colors.into_iter().map(FifoEntry::background));
    }

    #[inline]
    pub(crate) fn pop(&mut self) -> Option<FifoEntry> {
        self.entries.pop_front()
    }

    /// Merge a sprite pixel into slot `index`.
    ///
    /// A slot already claimed by a sprite stays as it is, transparent pixels
    /// never land, and a behind-BG pixel only lands over background color 0.
    pub(crate) fn merge(&mut self, index: usize, pixel: SpritePixel) {
        let Some(slot) = self.entries.get_mut(index) else {
            return;
        };
        if slot.sprite || pixel.color == 0 {
            return;
        }
        if pixel.behind_bg && slot.color != 0 {
            return;
        }
        *slot = FifoEntry {
            color: pixel.color,
            palette: pixel.palette,
            sprite: true,
            behind_bg: pixel.behind_bg,
        };
    }

    /// Sprite pixels currently queued, by slot.
    pub(crate) fn sprite_pixels(&self) -> Vec<(usize, SpritePixel)> {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.sprite)
            .map(|(i, e)| {
                (
                    i,
                    SpritePixel {
                        color: e.color,
                        palette: e.palette,
                        behind_bg: e.behind_bg,
                    },
                )
            })
            .collect()
    }
}
