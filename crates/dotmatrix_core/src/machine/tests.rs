use once_cell::sync::Lazy;

use super::{Cartridge, GameBoy};
use crate::config::MachineOptions;
use crate::cpu::Bus;
use crate::error::CoreError;
use crate::{Button, Color, CYCLES_PER_FRAME};

const ROM_BANK: usize = 0x4000;

/// 32 KiB or larger image with a valid header and `program` at 0x0100.
fn build_rom(kind: u8, rom_code: u8, ram_code: u8, program: &[u8]) -> Vec<u8> {
    let mut rom = vec![0u8; (0x8000usize << rom_code).max(0x8000)];
    rom[0x100..0x100 + program.len()].copy_from_slice(program);
    rom[0x134..0x13C].copy_from_slice(b"DOTTEST!");
    rom[0x147] = kind;
    rom[0x148] = rom_code;
    rom[0x149] = ram_code;
    rom[0x14D] = rom[0x134..=0x14C]
        .iter()
        .fold(0u8, |acc, &b| acc.wrapping_sub(b).wrapping_sub(1));
    rom
}

/// Idle loop at 0x0100; the VBlank handler stores 0x42 at 0xC000.
static LOOP_ROM: Lazy<Vec<u8>> = Lazy::new(|| {
    let program = [
        0x3E, 0x01, // LD A,0x01
        0xE0, 0xFF, // LDH (0xFF),A
        0xFB, // EI
        0x18, 0xFE, // JR -2
    ];
    let mut rom = build_rom(0x00, 0x00, 0x00, &program);
    rom[0x40..0x46].copy_from_slice(&[
        0x3E, 0x42, // LD A,0x42
        0xEA, 0x00, 0xC0, // LD (0xC000),A
        0xD9, // RETI
    ]);
    rom
});

/// MBC1, 8 banks, every switchable-bank byte holding its bank number.
static MBC1_ROM: Lazy<Vec<u8>> = Lazy::new(|| {
    let mut rom = build_rom(0x03, 0x02, 0x02, &[0x18, 0xFE]);
    for bank in 1..8 {
        rom[bank * ROM_BANK..(bank + 1) * ROM_BANK].fill(bank as u8);
    }
    rom
});

fn machine(rom: &[u8]) -> GameBoy {
    let cart = Cartridge::from_rom(rom.to_vec()).unwrap();
    GameBoy::new(cart, MachineOptions::default())
}

fn idle_machine() -> GameBoy {
    machine(&LOOP_ROM)
}

#[test]
fn timer_overflow_reloads_tma_in_the_same_tick() {
    let mut gb = idle_machine();
    let bus = &mut gb.bus;
    bus.write8(0xFF04, 0x00);
    bus.write8(0xFF06, 0x42);
    bus.write8(0xFF05, 0xFF);
    bus.write8(0xFF07, 0x04);
    bus.interrupts.set_flags(0);

    bus.tick(1023);
    assert_eq!(bus.read8(0xFF05), 0xFF);
    assert_eq!(bus.interrupts.flags() & 0x04, 0);

    bus.tick(1);
    assert_eq!(bus.read8(0xFF05), 0x42);
    assert_eq!(bus.interrupts.flags() & 0x04, 0x04);
}

#[test]
fn div_keeps_running_while_timer_disabled() {
    let mut gb = idle_machine();
    let bus = &mut gb.bus;
    bus.write8(0xFF07, 0x00);
    bus.write8(0xFF04, 0x12);
    assert_eq!(bus.read8(0xFF04), 0x00);
    let tima = bus.read8(0xFF05);
    bus.tick(256 * 3);
    assert_eq!(bus.read8(0xFF04), 0x03);
    assert_eq!(bus.read8(0xFF05), tima);
    assert_eq!(bus.read8(0xFF07), 0xF8);
}

#[test]
fn lcd_reenable_blanks_the_next_frame() {
    let mut gb = idle_machine();
    let bus = &mut gb.bus;
    for addr in 0x8000..0x8010 {
        bus.write8(addr, 0xFF);
    }
    bus.tick(CYCLES_PER_FRAME);
    assert_eq!(gb.display().pixel(20, 20), Some(Color::BLACK));

    let bus = &mut gb.bus;
    bus.tick(30 * 456);
    bus.write8(0xFF40, 0x11);
    bus.write8(0xFF40, 0x91);
    bus.tick(CYCLES_PER_FRAME);
    assert_eq!(gb.display().pixel(20, 20), Some(Color::WHITE));

    gb.bus.tick(CYCLES_PER_FRAME);
    assert_eq!(gb.display().pixel(20, 20), Some(Color::BLACK));
}

#[test]
fn mbc1_bank_zero_selects_bank_one() {
    let mut gb = machine(&MBC1_ROM);
    gb.bus.write8(0x2000, 0x00);
    assert_eq!(gb.bus.read8(0x4000), 1);
    gb.bus.write8(0x2000, 0x07);
    assert_eq!(gb.bus.read8(0x7FFF), 7);
    // Fixed window is untouched.
    assert_eq!(gb.bus.read8(0x0100), 0x18);
}

#[test]
fn dma_fills_oam_after_160_cycles() {
    let mut gb = idle_machine();
    let bus = &mut gb.bus;
    for i in 0..0xA0u16 {
        bus.write8(0xC000 + i, (i as u8) ^ 0x5A);
    }
    for i in 0..0xA0u16 {
        bus.write8(0xFE00 + i, 0x00);
    }

    bus.write8(0xFF46, 0xC0);
    assert_eq!(bus.read8(0xFF46), 0xC0);
    bus.tick(159);
    assert!(bus.dma_active());
    assert_eq!(bus.read8(0xFE9F), 0x00);

    bus.tick(1);
    assert!(!bus.dma_active());
    for i in 0..0xA0u16 {
        assert_eq!(bus.read8(0xFE00 + i), (i as u8) ^ 0x5A, "OAM byte {i:#04X}");
    }
}

#[test]
fn dma_from_echo_page_reads_wram() {
    let mut gb = idle_machine();
    let bus = &mut gb.bus;
    bus.write8(0xD000, 0x99);
    bus.write8(0xFF46, 0xF0);
    bus.tick(160);
    assert_eq!(bus.read8(0xFE00), 0x99);
}

#[test]
fn echo_ram_aliases_wram() {
    let mut gb = idle_machine();
    let bus = &mut gb.bus;
    bus.write8(0xC123, 0x77);
    assert_eq!(bus.read8(0xE123), 0x77);
    bus.write8(0xFDFF, 0x31);
    assert_eq!(bus.read8(0xDDFF), 0x31);
}

#[test]
fn unusable_region_swallows_writes() {
    let mut gb = idle_machine();
    let bus = &mut gb.bus;
    bus.write8(0xFEA0, 0x12);
    bus.write8(0xFEFF, 0x34);
    assert_eq!(bus.read8(0xFEA0), 0xFF);
    assert_eq!(bus.read8(0xFEFF), 0xFF);
}

#[test]
fn io_read_sentinels() {
    let mut gb = idle_machine();
    let bus = &mut gb.bus;
    bus.write8(0xFF0F, 0x00);
    assert_eq!(bus.read8(0xFF0F), 0xE0);
    assert_eq!(bus.read8(0xFF03), 0xFF);
    assert_eq!(bus.read8(0xFF4C), 0xFF);
    assert_eq!(bus.read8(0xFF7F), 0xFF);
    assert_eq!(bus.read8(0xFF02), 0x7E);
}

#[test]
fn post_boot_io_state() {
    let mut gb = idle_machine();
    assert_eq!(gb.cpu().regs.pc, 0x0100);
    let bus = &mut gb.bus;
    assert_eq!(bus.read8(0xFF40), 0x91);
    assert_eq!(bus.read8(0xFF47), 0xFC);
    assert_eq!(bus.read8(0xFF04), 0xAB);
    assert_eq!(bus.read8(0xFF0F), 0xE1);
    assert_eq!(bus.read8(0xFF26), 0xF1);
    assert_eq!(bus.read8(0xFF46), 0xFF);
}

#[test]
fn vblank_handler_runs_through_the_machine() {
    let mut gb = idle_machine();
    gb.step_frame().unwrap();
    gb.step_frame().unwrap();
    assert_eq!(gb.peek(0xC000), 0x42);
    assert!(gb.cpu().regs.pc >= 0x0105 && gb.cpu().regs.pc <= 0x0107);
}

#[test]
fn step_frame_spans_one_frame() {
    let mut gb = idle_machine();
    gb.step_frame().unwrap();
    let elapsed = gb.step_frame().unwrap();
    assert!(
        elapsed.abs_diff(CYCLES_PER_FRAME) <= 24,
        "frame took {elapsed} cycles"
    );
    assert!(gb.display().frames() >= 2);
}

#[test]
fn boot_rom_overlay_until_ff50() {
    let mut boot = vec![0x00; 0x100];
    boot[0] = 0xAA;
    let cart = Cartridge::from_rom(LOOP_ROM.clone()).unwrap();
    let options = MachineOptions::builder().boot_rom(boot).build();
    let mut gb = GameBoy::new(cart, options);

    assert_eq!(gb.cpu().regs.pc, 0x0000);
    assert_eq!(gb.peek(0x0000), 0xAA);
    assert_eq!(gb.peek(0x0100), 0x3E);
    // LCD is off at power-on, so a frame is a fixed cycle count.
    assert!(gb.step_frame().unwrap() >= CYCLES_PER_FRAME);

    gb.bus.write8(0xFF50, 0x01);
    assert_eq!(gb.peek(0x0000), 0x00);
    gb.bus.write8(0xFF50, 0x00);
    assert_eq!(gb.peek(0x0000), 0x00);
}

#[test]
fn battery_ram_dirty_tracking() {
    let mut gb = machine(&MBC1_ROM);
    assert!(!gb.take_save_dirty());
    gb.bus.write8(0x0000, 0x0A);
    gb.bus.write8(0xA000, 0x05);
    assert!(gb.take_save_dirty());
    assert!(!gb.take_save_dirty());
    assert_eq!(gb.battery_ram().map(|ram| ram[0]), Some(0x05));

    gb.load_battery_ram(&[0x11; 0x2000]);
    assert_eq!(gb.bus.read8(0xA1FF), 0x11);
}

#[test]
fn serial_transfer_completes_with_interrupt() {
    let mut gb = idle_machine();
    let bus = &mut gb.bus;
    bus.interrupts.set_flags(0);
    bus.write8(0xFF01, b'O');
    bus.write8(0xFF02, 0x81);
    bus.tick(4095);
    assert_eq!(bus.interrupts.flags() & 0x08, 0);
    bus.tick(1);
    assert_eq!(bus.interrupts.flags() & 0x08, 0x08);
    assert_eq!(bus.read8(0xFF01), 0xFF);
    assert_eq!(bus.read8(0xFF02) & 0x80, 0);
    assert_eq!(gb.serial_output(), b"O");
}

#[test]
fn button_press_reaches_p1_and_if() {
    let mut gb = idle_machine();
    gb.bus.interrupts.set_flags(0);
    gb.press(Button::Start);
    assert_eq!(gb.bus.interrupts.flags() & 0x10, 0x10);

    gb.bus.write8(0xFF00, 0x10);
    assert_eq!(gb.bus.read8(0xFF00) & 0x0F, 0x07);
    gb.bus.write8(0xFF00, 0x20);
    assert_eq!(gb.bus.read8(0xFF00) & 0x0F, 0x0F);

    gb.release(Button::Start);
    gb.bus.write8(0xFF00, 0x10);
    assert_eq!(gb.bus.read8(0xFF00) & 0x0F, 0x0F);
}

#[test]
fn lyc_interrupt_through_the_bus() {
    let mut gb = idle_machine();
    let bus = &mut gb.bus;
    bus.write8(0xFF45, 10);
    bus.write8(0xFF41, 0x40);
    bus.interrupts.set_flags(0);
    bus.tick(10 * 456 - 1);
    assert_eq!(bus.interrupts.flags() & 0x02, 0);
    bus.tick(1);
    assert_eq!(bus.interrupts.flags() & 0x02, 0x02);
    assert_eq!(bus.read8(0xFF41) & 0x04, 0x04);
}

#[test]
fn disassembles_from_the_memory_map() {
    let mut gb = idle_machine();
    assert_eq!(gb.disassemble(0x0100).text, "LD A,$01");
    assert_eq!(gb.disassemble(0x0104).text, "EI");
}

#[test]
fn unknown_opcode_ends_the_session() {
    let rom = build_rom(0x00, 0x00, 0x00, &[0x00, 0xD3]);
    let mut gb = machine(&rom);
    gb.step().unwrap();
    match gb.step() {
        Err(CoreError::UnknownOpcode { pc, history, .. }) => {
            assert_eq!(pc, 0x0101);
            assert_eq!(history.0.len(), 2);
            assert_eq!(history.0[1].mnemonic, "ILLEGAL $D3");
        }
        other => panic!("expected an opcode fault, got {other:?}"),
    }
}
