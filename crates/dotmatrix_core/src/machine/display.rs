use dotmatrix_common::Color;

use crate::{SCREEN_HEIGHT, SCREEN_WIDTH};

/// Receives pixels from the PPU.
///
/// `put_pixel` is called once per visible dot in row-major order and must
/// not block. `frame_complete` marks VBlank entry.
pub trait DisplaySink {
    fn put_pixel(&mut self, x: usize, y: usize, color: Color);
    fn frame_complete(&mut self) {}
}

/// In-memory RGBA frame, the default sink.
#[derive(Debug, Clone)]
pub struct FrameBuffer {
    pixels: Vec<u8>,
    frames: u64,
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameBuffer {
    pub fn new() -> Self {
        let mut pixels = vec![0; SCREEN_WIDTH * SCREEN_HEIGHT * 4];
        for px in pixels.chunks_exact_mut(4) {
            px.copy_from_slice(&Color::WHITE.rgba());
        }
        Self { pixels, frames: 0 }
    }

    /// Row-major RGBA bytes, 160x144x4.
    pub fn as_rgba(&self) -> &[u8] {
        &self.pixels
    }

    /// `None` outside the 160x144 screen.
    pub fn pixel(&self, x: usize, y: usize) -> Option<Color> {
        if x >= SCREEN_WIDTH || y >= SCREEN_HEIGHT {
            return None;
        }
        let i = (y * SCREEN_WIDTH + x) * 4;
        match self.pixels[i..i + 4] {
            [r, g, b, a] => Some(Color::new_rgba(r, g, b, a)),
            _ => None,
        }
    }

    /// Number of completed frames.
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl DisplaySink for FrameBuffer {
    fn put_pixel(&mut self, x: usize, y: usize, color: Color) {
        if x >= SCREEN_WIDTH || y >= SCREEN_HEIGHT {
            return;
        }
        let i = (y * SCREEN_WIDTH + x) * 4;
        self.pixels[i..i + 4].copy_from_slice(&color.rgba());
    }

    fn frame_complete(&mut self) {
        self.frames += 1;
    }
}
