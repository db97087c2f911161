use std::path::Path;
use std::time::Instant;

use log::{debug, info, log_enabled, Level};

use crate::chip8_emulator::clock::HostClock;
use crate::chip8_emulator::config::{SCREEN_HEIGHT, SCREEN_WIDTH, TIMER_HZ};
use crate::chip8_emulator::cpu::{execute_cycle, tick_timers};
use crate::chip8_emulator::error::Chip8Error;
use crate::chip8_emulator::palette::PALETTES;
use crate::chip8_emulator::settings::{DebugMode, RunnerSettings};
use crate::chip8_emulator::sound::ToneStream;
use crate::chip8_emulator::state::{create_state, set_key_state, EmulatorState};
use crate::chip8_emulator::trace::{FileTrace, LogTrace, StepTrace, TraceSink};

pub const DEBUG_LOG_PATH: &str = "dbg.log";
const TARGET_FPS: u32 = 60;

/// Sink for the chosen debug mode. With debugging off, instructions still go
/// to `log::trace!` when that level is enabled.
pub fn open_trace_sink(
    mode: DebugMode,
    log_path: &Path,
) -> Result<Option<Box<dyn TraceSink>>, Chip8Error> {
    let sink: Option<Box<dyn TraceSink>> = match mode {
        DebugMode::Off if log_enabled!(Level::Trace) => Some(Box::new(LogTrace)),
        DebugMode::Off => None,
        DebugMode::LogFile => {
            info!("writing instruction trace to {}", log_path.display());
            Some(Box::new(FileTrace::create(log_path)?))
        }
        DebugMode::StepByStep => Some(Box::new(StepTrace::stdio())),
    };
    Ok(sink)
}

pub fn run_emulator_headless(
    rom_path: &Path,
    max_cycles: usize,
    cpu_hz: u32,
    mut trace: Option<&mut (dyn TraceSink + '_)>,
) -> Result<EmulatorState, Chip8Error> {
    if max_cycles == 0 {
        return Err(Chip8Error::InvalidArgument("max_cycles must be > 0"));
    }
    if cpu_hz == 0 {
        return Err(Chip8Error::InvalidArgument("cpu_hz must be > 0"));
    }

    let mut state = create_state(Some(rom_path))?;
    let cycles_per_timer_tick = usize::max(1, (cpu_hz / TIMER_HZ) as usize);

    for i in 0..max_cycles {
        execute_cycle(&mut state, trace.as_deref_mut());

        if ((i + 1) % cycles_per_timer_tick) == 0 {
            tick_timers(&mut state);
        }
    }

    debug!("headless run stopped after {max_cycles} cycles at pc=0x{:03x}", state.pc);
    Ok(state)
}

pub fn run_emulator_app(
    rom_path: &Path,
    settings: RunnerSettings,
) -> Result<EmulatorState, Chip8Error> {
    use raylib::core::audio::RaylibAudio;
    use raylib::prelude::{Color, KeyboardKey, RaylibDraw};

    let settings = settings.validate()?;
    let mut state = create_state(Some(rom_path))?;
    let mut trace = open_trace_sink(settings.debug, Path::new(DEBUG_LOG_PATH))?;

    let scale = settings.scale;
    let width = (SCREEN_WIDTH * scale) as i32;
    let height = (SCREEN_HEIGHT * scale) as i32;
    let (mut rl, thread) = raylib::init()
        .size(width, height)
        .title("MyChip8")
        .vsync()
        .build();
    rl.set_target_fps(TARGET_FPS);

    let audio = if settings.sound_enabled {
        let device = RaylibAudio::init_audio_device()
            .map_err(|error| Chip8Error::Audio(format!("{error:?}")))?;
        Some(device)
    } else {
        None
    };
    let mut tone = audio
        .as_ref()
        .map(|device| ToneStream::new(device, settings.volume));

    let key_map = [
        (KeyboardKey::KEY_ZERO, 0x0usize),
        (KeyboardKey::KEY_ONE, 0x1),
        (KeyboardKey::KEY_TWO, 0x2),
        (KeyboardKey::KEY_THREE, 0x3),
        (KeyboardKey::KEY_FOUR, 0x4),
        (KeyboardKey::KEY_FIVE, 0x5),
        (KeyboardKey::KEY_SIX, 0x6),
        (KeyboardKey::KEY_SEVEN, 0x7),
        (KeyboardKey::KEY_EIGHT, 0x8),
        (KeyboardKey::KEY_NINE, 0x9),
        (KeyboardKey::KEY_A, 0xA),
        (KeyboardKey::KEY_B, 0xB),
        (KeyboardKey::KEY_C, 0xC),
        (KeyboardKey::KEY_D, 0xD),
        (KeyboardKey::KEY_E, 0xE),
        (KeyboardKey::KEY_F, 0xF),
    ];

    let mut palette = settings.palette;
    let mut clock = HostClock::new(settings.cpu_hz, TARGET_FPS);
    let mut previous_tick = Instant::now();
    info!(
        "running {} at {} Hz, palette {}",
        rom_path.display(),
        settings.cpu_hz,
        palette.name
    );

    while !rl.window_should_close() {
        if rl.is_key_pressed(KeyboardKey::KEY_F1) {
            palette = PALETTES[0];
        } else if rl.is_key_pressed(KeyboardKey::KEY_F2) {
            palette = PALETTES[1];
        }

        for (key, mapped) in key_map {
            set_key_state(&mut state, mapped, rl.is_key_down(key));
        }

        let now = Instant::now();
        let frame_dt = (now - previous_tick).as_secs_f32();
        previous_tick = now;
        let budget = clock.advance(frame_dt);

        let cycles = if settings.debug == DebugMode::StepByStep {
            budget.cycles.min(1)
        } else {
            budget.cycles
        };
        for _ in 0..cycles {
            execute_cycle(&mut state, trace.as_deref_mut());
        }

        for _ in 0..budget.timer_ticks {
            tick_timers(&mut state);
        }

        if let Some(tone) = tone.as_mut() {
            tone.update(state.sound_active());
        }

        let (on_r, on_g, on_b) = palette.on_rgb();
        let (off_r, off_g, off_b) = palette.off_rgb();
        let on_color = Color::new(on_r, on_g, on_b, 0xFF);

        let mut d = rl.begin_drawing(&thread);
        d.clear_background(Color::new(off_r, off_g, off_b, 0xFF));
        for (index, value) in state.screen_buffer.iter().enumerate() {
            if *value == 0 {
                continue;
            }
            let x = (index % SCREEN_WIDTH) as i32;
            let y = (index / SCREEN_WIDTH) as i32;
            d.draw_rectangle(
                x * scale as i32,
                y * scale as i32,
                scale as i32,
                scale as i32,
                on_color,
            );
        }
    }

    Ok(state)
}
