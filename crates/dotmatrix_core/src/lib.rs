pub mod config;
pub mod cpu;
pub mod error;
pub mod interrupts;
pub mod machine;

pub use config::MachineOptions;
pub use cpu::{Bus, Cpu, Instruction, Registers, Tracer};
pub use error::{CoreError, Result};
pub use interrupts::{Interrupt, InterruptController};
pub use machine::{
    AudioRegisters, AudioUnit, Cartridge, CartridgeHeader, CartridgeKind, DisplaySink,
    FrameBuffer, GameBoy,
};

pub use dotmatrix_common::{Button, Color};

/// Visible LCD width in pixels.
pub const SCREEN_WIDTH: usize = 160;
/// Visible LCD height in pixels.
pub const SCREEN_HEIGHT: usize = 144;

/// Master clock rate in T-cycles per second.
pub const CLOCK_HZ: u32 = 4_194_304;
/// T-cycles in one full frame (154 lines of 456 dots).
pub const CYCLES_PER_FRAME: u32 = 70_224;
