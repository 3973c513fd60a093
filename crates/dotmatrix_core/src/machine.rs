mod audio;
mod bus;
mod cartridge;
mod display;
mod dma;
mod gameboy;
mod joypad;
mod ppu;
mod serial;
mod timer;

pub use audio::{AudioRegisters, AudioUnit};
pub(crate) use bus::GameBoyBus;
pub use cartridge::{Cartridge, CartridgeHeader, CartridgeKind};
pub use display::{DisplaySink, FrameBuffer};
pub use gameboy::GameBoy;

#[cfg(test)]
mod tests;
