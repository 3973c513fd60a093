use super::*;
use crate::machine::display::FrameBuffer;
use crate::CYCLES_PER_FRAME;

struct Rig {
    ppu: Ppu,
    ic: InterruptController,
    fb: FrameBuffer,
}

impl Rig {
    /// LCD on at the top of a frame, identity palettes.
    fn new() -> Self {
        let mut rig = Self {
            ppu: Ppu::new(),
            ic: InterruptController::new(),
            fb: FrameBuffer::new(),
        };
        rig.ppu.init_post_boot();
        rig.write(0xFF47, 0xE4);
        rig.write(0xFF48, 0xE4);
        rig.ic.set_flags(0);
        rig
    }

    fn write(&mut self, addr: u16, value: u8) {
        self.ppu
            .write_register(addr, value, &mut self.ic, &mut self.fb);
    }

    fn run(&mut self, dots: u32) {
        for _ in 0..dots {
            self.ppu.tick(&mut self.ic, &mut self.fb);
        }
    }

    fn lines(&mut self, n: u32) {
        self.run(n * DOTS_PER_LINE as u32);
    }

    /// Fill tile `index` (0x8000 addressing) with a solid color index.
    fn solid_tile(&mut self, index: u16, color: u8) {
        let low = if color & 1 != 0 { 0xFF } else { 0x00 };
        let high = if color & 2 != 0 { 0xFF } else { 0x00 };
        for row in 0..8 {
            let addr = 0x8000 + index * 16 + row * 2;
            self.ppu.write_vram(addr, low);
            self.ppu.write_vram(addr + 1, high);
        }
    }

    fn sprite(&mut self, slot: usize, y: u8, x: u8, tile: u8, attrs: u8) {
        for (i, b) in [y, x, tile, attrs].into_iter().enumerate() {
            self.ppu.write_oam(slot * 4 + i, b);
        }
    }
}

#[test]
fn vblank_after_144_lines() {
    let mut rig = Rig::new();
    rig.run(144 * 456 - 1);
    assert_eq!(rig.ic.flags() & 0x01, 0);
    assert_eq!(rig.fb.frames(), 0);

    rig.run(1);
    assert_eq!(rig.ppu.ly, 144);
    assert_eq!(rig.ic.flags() & 0x01, 0x01);
    assert_eq!(rig.fb.frames(), 1);
    assert!(rig.ppu.take_frame_ready());
    assert!(!rig.ppu.take_frame_ready());

    rig.run(CYCLES_PER_FRAME);
    assert_eq!(rig.fb.frames(), 2);
}

#[test]
fn mode_sequence_on_a_visible_line() {
    let mut rig = Rig::new();
    assert_eq!(rig.ppu.read_register(0xFF41) & 0x03, 2);
    rig.run(80);
    assert_eq!(rig.ppu.read_register(0xFF41) & 0x03, 3);

    let mut drawing = 0;
    while rig.ppu.mode == Mode::Drawing {
        rig.run(1);
        drawing += 1;
    }
    assert!((172..=289).contains(&drawing), "mode 3 took {drawing} dots");
    assert_eq!(rig.ppu.read_register(0xFF41) & 0x03, 0);
}

#[test]
fn lyc_stat_interrupt_fires_once_per_match() {
    let mut rig = Rig::new();
    rig.write(0xFF45, 5);
    rig.write(0xFF41, 0x40);

    let mut fired = 0;
    for _ in 0..CYCLES_PER_FRAME {
        rig.run(1);
        if rig.ic.flags() & 0x02 != 0 {
            fired += 1;
            rig.ic.set_flags(0);
        }
    }
    assert_eq!(fired, 1);
}

#[test]
fn stat_read_reports_coincidence_and_unused_bit() {
    let mut rig = Rig::new();
    rig.write(0xFF45, 0);
    rig.write(0xFF41, 0xFF);
    assert_eq!(rig.ppu.read_register(0xFF41), 0x80 | 0x78 | 0x04 | 0x02);
}

#[test]
fn ly_ignores_writes() {
    let mut rig = Rig::new();
    rig.lines(3);
    rig.write(0xFF44, 0x00);
    assert_eq!(rig.ppu.read_register(0xFF44), 3);
}

#[test]
fn oam_scan_keeps_ten_sprites() {
    let mut rig = Rig::new();
    for slot in 0..12 {
        rig.sprite(slot, 16, 8 + slot as u8, 0, 0);
    }
    rig.run(80);
    assert_eq!(rig.ppu.sprites.len(), MAX_SPRITES_PER_LINE);
}

#[test]
fn background_uses_bgp() {
    let mut rig = Rig::new();
    rig.solid_tile(0, 3);
    rig.lines(144);
    assert_eq!(rig.fb.pixel(0, 0), Some(Color::BLACK));
    assert_eq!(rig.fb.pixel(159, 143), Some(Color::BLACK));

    rig.write(0xFF47, 0x00);
    rig.run(CYCLES_PER_FRAME);
    assert_eq!(rig.fb.pixel(80, 72), Some(Color::WHITE));
}

#[test]
fn fine_scroll_discards_leading_pixels() {
    let mut rig = Rig::new();
    rig.solid_tile(1, 3);
    rig.ppu.write_vram(0x9800, 1);
    rig.write(0xFF43, 4);
    rig.lines(1);
    assert_eq!(rig.fb.pixel(3, 0), Some(Color::BLACK));
    assert_eq!(rig.fb.pixel(4, 0), Some(Color::WHITE));
}

#[test]
fn window_line_counts_only_rendered_lines() {
    let mut rig = Rig::new();
    rig.write(0xFF4A, 0);
    rig.write(0xFF4B, 7);
    rig.write(0xFF40, 0x91 | 0x20);

    rig.lines(10);
    assert_eq!(rig.ppu.window_line, 10);

    rig.write(0xFF4B, 0xFF);
    rig.lines(10);
    assert_eq!(rig.ppu.window_line, 10);

    rig.write(0xFF4B, 7);
    rig.lines(5);
    assert_eq!(rig.ppu.window_line, 15);
}

#[test]
fn window_covers_background_from_wx() {
    let mut rig = Rig::new();
    // Background map 0x9800 is tile 0 (clear); window map 0x9C00 uses tile 1.
    rig.solid_tile(1, 3);
    for i in 0..0x400 {
        rig.ppu.write_vram(0x9C00 + i, 1);
    }
    rig.write(0xFF4A, 0);
    rig.write(0xFF4B, 7 + 80);
    rig.write(0xFF40, 0x91 | 0x20 | 0x40);
    rig.lines(1);
    assert_eq!(rig.fb.pixel(79, 0), Some(Color::WHITE));
    assert_eq!(rig.fb.pixel(80, 0), Some(Color::BLACK));
    assert_eq!(rig.fb.pixel(159, 0), Some(Color::BLACK));
}

#[test]
fn leftmost_sprite_wins_overlap() {
    let mut rig = Rig::new();
    rig.solid_tile(1, 1);
    rig.solid_tile(2, 2);
    rig.sprite(0, 16, 16, 1, 0);
    rig.sprite(1, 16, 12, 2, 0);
    rig.write(0xFF40, 0x93);
    rig.lines(1);

    let light = Color::from_shade(1);
    let dark = Color::from_shade(2);
    assert_eq!(rig.fb.pixel(3, 0), Some(Color::WHITE));
    assert_eq!(rig.fb.pixel(4, 0), Some(dark));
    assert_eq!(rig.fb.pixel(11, 0), Some(dark));
    assert_eq!(rig.fb.pixel(12, 0), Some(light));
    assert_eq!(rig.fb.pixel(15, 0), Some(light));
    assert_eq!(rig.fb.pixel(16, 0), Some(Color::WHITE));
}

#[test]
fn behind_bg_sprite_hidden_by_nonzero_background() {
    let mut rig = Rig::new();
    rig.solid_tile(0, 1);
    rig.solid_tile(2, 3);
    rig.sprite(0, 16, 8, 2, 0x80);
    rig.write(0xFF40, 0x93);
    rig.lines(1);
    assert_eq!(rig.fb.pixel(0, 0), Some(Color::from_shade(1)));
}

#[test]
fn lcd_off_blanks_and_parks_at_line_zero() {
    let mut rig = Rig::new();
    rig.lines(20);
    rig.fb.put_pixel(0, 0, Color::BLACK);

    rig.write(0xFF40, 0x11);
    assert_eq!(rig.ppu.read_register(0xFF44), 0);
    assert_eq!(rig.ppu.read_register(0xFF41) & 0x03, 0);
    assert_eq!(rig.fb.pixel(0, 0), Some(Color::WHITE));
    assert_eq!(rig.fb.frames(), 1);

    rig.run(CYCLES_PER_FRAME);
    assert_eq!(rig.ppu.read_register(0xFF44), 0);
    assert_eq!(rig.fb.frames(), 1);
}

#[test]
fn first_frame_after_enable_is_blank() {
    let mut rig = Rig::new();
    rig.solid_tile(0, 3);
    rig.write(0xFF40, 0x11);
    rig.write(0xFF40, 0x91);

    rig.run(CYCLES_PER_FRAME);
    assert_eq!(rig.fb.pixel(10, 10), Some(Color::WHITE));

    rig.run(CYCLES_PER_FRAME);
    assert_eq!(rig.fb.pixel(10, 10), Some(Color::BLACK));
}

#[test]
fn lyc_edge_fires_while_hblank_source_holds_the_line() {
    let mut rig = Rig::new();
    rig.write(0xFF45, 5);
    rig.write(0xFF41, 0x48);

    rig.lines(4);
    rig.run(400);
    assert_eq!(rig.ppu.mode, Mode::HBlank);
    rig.ic.set_flags(0);

    rig.run(56);
    assert_eq!(rig.ppu.ly, 5);
    assert_eq!(rig.ic.flags() & 0x02, 0x02);
}

#[test]
fn hblank_source_fires_when_drawing_ends() {
    let mut rig = Rig::new();
    rig.write(0xFF41, 0x08);
    rig.ic.set_flags(0);

    rig.run(80);
    while rig.ppu.mode == Mode::Drawing {
        assert_eq!(rig.ic.flags() & 0x02, 0);
        rig.run(1);
    }
    assert_eq!(rig.ppu.mode, Mode::HBlank);
    assert_eq!(rig.ic.flags() & 0x02, 0x02);
}

#[test]
fn oam_source_fires_at_each_line_start() {
    let mut rig = Rig::new();
    rig.write(0xFF41, 0x20);
    rig.ic.set_flags(0);

    rig.run(455);
    assert_eq!(rig.ic.flags() & 0x02, 0);
    rig.run(1);
    assert_eq!(rig.ppu.ly, 1);
    assert_eq!(rig.ic.flags() & 0x02, 0x02);
}

#[test]
fn vblank_source_fires_on_entry_even_with_hblank_selected() {
    let mut rig = Rig::new();
    rig.write(0xFF41, 0x18);
    rig.lines(143);
    rig.run(455);
    rig.ic.set_flags(0);

    rig.run(1);
    assert_eq!(rig.ppu.ly, 144);
    assert_eq!(rig.ic.flags(), 0x03);
}

#[test]
fn oam_select_alone_is_quiet_at_vblank_entry() {
    let mut rig = Rig::new();
    rig.write(0xFF41, 0x20);
    rig.lines(143);
    rig.run(455);
    rig.ic.set_flags(0);

    rig.run(1);
    assert_eq!(rig.ppu.ly, 144);
    assert_eq!(rig.ic.flags(), 0x01);
}

#[test]
fn tall_sprite_uses_even_tile_and_flips_across_both_halves() {
    let mut rig = Rig::new();
    rig.solid_tile(2, 1);
    rig.solid_tile(3, 2);
    rig.sprite(0, 16, 8, 3, 0x40);
    rig.sprite(1, 16, 40, 3, 0x00);
    rig.write(0xFF40, 0x97);
    rig.lines(16);

    let top = Some(Color::from_shade(1));
    let bottom = Some(Color::from_shade(2));
    // Y-flipped: line 0 shows the last row of the odd tile.
    assert_eq!(rig.fb.pixel(0, 0), bottom);
    assert_eq!(rig.fb.pixel(0, 15), top);
    assert_eq!(rig.fb.pixel(32, 0), top);
    assert_eq!(rig.fb.pixel(32, 8), bottom);
}

#[test]
fn window_switch_keeps_sprite_pixels_already_queued() {
    let mut rig = Rig::new();
    rig.solid_tile(1, 1);
    rig.solid_tile(2, 3);
    for i in 0..0x400 {
        rig.ppu.write_vram(0x9C00 + i, 1);
    }
    // Sprite spans columns 76..84; the window starts at column 80.
    rig.sprite(0, 16, 84, 2, 0);
    rig.write(0xFF4A, 0);
    rig.write(0xFF4B, 87);
    rig.write(0xFF40, 0x91 | 0x02 | 0x20 | 0x40);
    rig.lines(1);

    assert_eq!(rig.fb.pixel(75, 0), Some(Color::WHITE));
    for x in 76..84 {
        assert_eq!(rig.fb.pixel(x, 0), Some(Color::BLACK), "column {x}");
    }
    assert_eq!(rig.fb.pixel(84, 0), Some(Color::from_shade(1)));
}
