use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use dotmatrix::RunOptions;

#[derive(Parser)]
#[command(version, about = "Run a DMG cartridge headless")]
struct Args {
    /// Path to ROM file
    rom: PathBuf,

    /// Number of frames to run
    #[arg(long, default_value_t = 60)]
    frames: u32,

    /// Path to a 256-byte boot ROM
    #[arg(long)]
    boot_rom: Option<PathBuf>,

    /// Battery save file (defaults to the ROM path with .sav)
    #[arg(long)]
    save: Option<PathBuf>,

    /// Write the final frame to this path as PPM
    #[arg(long)]
    dump_frame: Option<PathBuf>,

    /// Echo bytes sent over the serial port to stdout
    #[arg(long)]
    serial: bool,

    /// Log every instruction (needs RUST_LOG=trace)
    #[arg(long)]
    trace: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let opts = RunOptions::builder()
        .rom(args.rom)
        .frames(args.frames)
        .boot_rom(args.boot_rom)
        .save(args.save)
        .dump_frame(args.dump_frame)
        .serial(args.serial)
        .trace(args.trace)
        .build();

    let summary = dotmatrix::run(&opts)?;
    log::info!(
        "'{}': {} frames, {} T-cycles, {} serial bytes",
        summary.title,
        summary.frames,
        summary.cycles,
        summary.serial.len()
    );
    Ok(())
}
