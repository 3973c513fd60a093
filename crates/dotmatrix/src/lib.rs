use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use dotmatrix_core::{
    Cartridge, FrameBuffer, GameBoy, Instruction, MachineOptions, Registers, Tracer,
    SCREEN_HEIGHT, SCREEN_WIDTH,
};
use typed_builder::TypedBuilder;

/// What a headless session should do.
#[derive(Debug, Clone, TypedBuilder)]
pub struct RunOptions {
    pub rom: PathBuf,
    #[builder(default = 60)]
    pub frames: u32,
    #[builder(default)]
    pub boot_rom: Option<PathBuf>,
    /// Battery save file. Defaults to the ROM path with a `.sav` extension.
    #[builder(default)]
    pub save: Option<PathBuf>,
    /// Write the last frame as a binary PPM.
    #[builder(default)]
    pub dump_frame: Option<PathBuf>,
    /// Echo serial output to stdout as it arrives.
    #[builder(default)]
    pub serial: bool,
    /// Log every executed instruction at trace level.
    #[builder(default)]
    pub trace: bool,
}

/// Result of a finished session.
#[derive(Debug, Clone)]
pub struct Summary {
    pub title: String,
    pub frames: u32,
    pub cycles: u64,
    pub serial: Vec<u8>,
}

/// Logs each instruction with the register file, one line per step.
struct LogTracer;

impl Tracer for LogTracer {
    fn on_instruction(&mut self, pc: u16, instr: &Instruction, regs: &Registers) {
        log::trace!(
            "{pc:04X}  {:<16} AF={:04X} BC={:04X} DE={:04X} HL={:04X} SP={:04X}",
            instr.to_string(),
            regs.af(),
            regs.bc(),
            regs.de(),
            regs.hl(),
            regs.sp
        );
    }
}

pub fn default_save_path(rom: &Path) -> PathBuf {
    rom.with_extension("sav")
}

pub fn run(opts: &RunOptions) -> Result<Summary> {
    let rom = fs::read(&opts.rom)
        .with_context(|| format!("failed to read ROM '{}'", opts.rom.display()))?;
    let cartridge = Cartridge::from_rom(rom)
        .with_context(|| format!("failed to load cartridge '{}'", opts.rom.display()))?;

    let boot_rom = match &opts.boot_rom {
        Some(path) => Some(
            fs::read(path)
                .with_context(|| format!("failed to read boot ROM '{}'", path.display()))?,
        ),
        None => None,
    };
    let options = MachineOptions {
        boot_rom,
        ..MachineOptions::default()
    };

    let mut gb = GameBoy::new(cartridge, options);
    let title = gb.cartridge().title().to_string();
    log::info!("Playing '{}' ({})", title, gb.cartridge().kind());

    let save_path = opts
        .save
        .clone()
        .unwrap_or_else(|| default_save_path(&opts.rom));
    load_save(&mut gb, &save_path)?;

    if opts.trace {
        gb.set_tracer(Box::new(LogTracer));
    }

    let mut cycles = 0u64;
    let mut echoed = 0usize;
    let stdout = std::io::stdout();
    for _ in 0..opts.frames {
        cycles += gb.step_frame()? as u64;

        if opts.serial {
            let output = gb.serial_output();
            if output.len() > echoed {
                let mut out = stdout.lock();
                out.write_all(&output[echoed..])?;
                out.flush()?;
                echoed = output.len();
            }
        }
    }

    if gb.take_save_dirty() {
        store_save(&gb, &save_path)?;
    }

    if let Some(path) = &opts.dump_frame {
        fs::write(path, encode_ppm(gb.display()))
            .with_context(|| format!("failed to write frame '{}'", path.display()))?;
        log::info!("Wrote frame to '{}'", path.display());
    }

    Ok(Summary {
        title,
        frames: opts.frames,
        cycles,
        serial: gb.serial_output().to_vec(),
    })
}

fn load_save(gb: &mut GameBoy, path: &Path) -> Result<()> {
    if gb.battery_ram().is_none() || !path.exists() {
        return Ok(());
    }
    let data =
        fs::read(path).with_context(|| format!("failed to read save '{}'", path.display()))?;
    gb.load_battery_ram(&data);
    log::info!("Loaded {} bytes of save data from '{}'", data.len(), path.display());
    Ok(())
}

fn store_save(gb: &GameBoy, path: &Path) -> Result<()> {
    let Some(ram) = gb.battery_ram() else {
        return Ok(());
    };
    fs::write(path, ram).with_context(|| format!("failed to write save '{}'", path.display()))?;
    log::info!("Saved {} bytes to '{}'", ram.len(), path.display());
    Ok(())
}

/// Binary PPM (P6) of the current frame.
pub fn encode_ppm(frame: &FrameBuffer) -> Vec<u8> {
    let header = format!("P6\n{SCREEN_WIDTH} {SCREEN_HEIGHT}\n255\n");
    let mut out = Vec::with_capacity(header.len() + SCREEN_WIDTH * SCREEN_HEIGHT * 3);
    out.extend_from_slice(header.as_bytes());
    for px in frame.as_rgba().chunks_exact(4) {
        out.extend_from_slice(&px[..3]);
    }
    out
}
