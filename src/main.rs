use std::path::{Path, PathBuf};

use clap::Parser;
use log::{info, warn};

use mychip8::{
    load_palette, load_palette_from_env, open_trace_sink, run_emulator_app,
    run_emulator_headless, Chip8Error, DebugMode, RunnerSettings, DEBUG_LOG_PATH,
};

#[derive(Debug, Parser)]
#[command(name = "mychip8")]
#[command(about = "Run a CHIP-8 ROM")]
struct Args {
    /// ROM file (*.ch8 / *.rom)
    #[arg(short = 'f', long)]
    rom: PathBuf,

    /// Colour palette; falls back to CHIP8_PALETTE, then bw
    #[arg(short = 'p', long, value_parser = ["bw", "amber"])]
    palette: Option<String>,

    #[arg(short = 's', long, default_value_t = 20)]
    scale: usize,

    #[arg(long, default_value_t = 500)]
    hz: u32,

    #[arg(short = 'v', long, default_value_t = 30)]
    volume: u8,

    #[arg(long)]
    nosound: bool,

    /// 0 off, 1 log to dbg.log, 2 step-by-step
    #[arg(long, default_value_t = 0)]
    debug: u8,

    #[arg(long)]
    headless: bool,

    #[arg(long, default_value_t = 2000)]
    max_cycles: usize,
}

fn main() -> Result<(), Chip8Error> {
    env_logger::init();
    let args = Args::parse();

    let palette = match &args.palette {
        Some(name) => load_palette(name),
        None => load_palette_from_env(),
    }
    .map_err(|message| {
        warn!("{message}");
        Chip8Error::InvalidArgument("palette must be bw or amber")
    })?;

    let settings = RunnerSettings {
        palette,
        scale: args.scale,
        cpu_hz: args.hz,
        volume: args.volume,
        sound_enabled: !args.nosound,
        debug: DebugMode::from_level(args.debug),
    }
    .validate()?;

    if args.headless {
        let mut trace = open_trace_sink(settings.debug, Path::new(DEBUG_LOG_PATH))?;
        let state = run_emulator_headless(
            &args.rom,
            args.max_cycles,
            settings.cpu_hz,
            trace.as_deref_mut(),
        )?;
        println!("headless finished: pc=0x{:03x}", state.pc);
        return Ok(());
    }

    let state = run_emulator_app(&args.rom, settings)?;
    info!("window closed at pc=0x{:03x}", state.pc);
    Ok(())
}
