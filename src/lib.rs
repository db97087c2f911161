pub mod chip8_emulator;

pub use chip8_emulator::app::{
    open_trace_sink, run_emulator_app, run_emulator_headless, DEBUG_LOG_PATH,
};
pub use chip8_emulator::clock::{FrameBudget, HostClock};
pub use chip8_emulator::cpu::{decode, execute_cycle, execute_opcode, fetch, tick_timers, Decoded};
pub use chip8_emulator::disasm::disassemble;
pub use chip8_emulator::error::Chip8Error;
pub use chip8_emulator::palette::{
    load_palette, load_palette_from_env, Palette, AMBER_PALETTE, BW_PALETTE,
};
pub use chip8_emulator::settings::{DebugMode, RunnerSettings};
pub use chip8_emulator::state::{
    clear_display, create_state, create_state_with_seed, first_pressed_key, load_rom,
    load_rom_bytes, reset_state, set_key_state, EmulatorState,
};
pub use chip8_emulator::trace::{
    FileTrace, LogTrace, RecordingTrace, StepTrace, TraceRecord, TraceSink,
};
