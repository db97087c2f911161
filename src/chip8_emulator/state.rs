use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info, log_enabled};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::chip8_emulator::config::{
    FONT_BYTES, KEY_COUNT, MAX_ROM_SIZE, MEMORY_SIZE, PROGRAM_START, REGISTER_COUNT,
    SCREEN_HEIGHT, SCREEN_WIDTH, STACK_DEPTH,
};
use crate::chip8_emulator::error::Chip8Error;

#[derive(Debug, Clone)]
pub struct EmulatorState {
    pub memory: [u8; MEMORY_SIZE],
    pub registers: [u8; REGISTER_COUNT],
    pub stack: [u16; STACK_DEPTH],
    /// Number of live entries in `stack`, 0..=16.
    pub sp: usize,
    pub key_inputs: [bool; KEY_COUNT],
    pub screen_buffer: [u8; SCREEN_WIDTH * SCREEN_HEIGHT],
    pub pc: u16,
    pub index: u16,
    pub delay_timer: u8,
    pub sound_timer: u8,
    pub rom_path: Option<PathBuf>,
    pub rng: StdRng,
}

impl Default for EmulatorState {
    fn default() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }
}

impl EmulatorState {
    fn with_rng(rng: StdRng) -> Self {
        let mut state = Self {
            memory: [0; MEMORY_SIZE],
            registers: [0; REGISTER_COUNT],
            stack: [0; STACK_DEPTH],
            sp: 0,
            key_inputs: [false; KEY_COUNT],
            screen_buffer: [0; SCREEN_WIDTH * SCREEN_HEIGHT],
            pc: PROGRAM_START as u16,
            index: 0,
            delay_timer: 0,
            sound_timer: 0,
            rom_path: None,
            rng,
        };
        load_font(&mut state);
        state
    }

    /// Tone should be audible while the sound timer is non-zero.
    pub fn sound_active(&self) -> bool {
        self.sound_timer > 0
    }

    pub fn pixel(&self, x: usize, y: usize) -> bool {
        self.screen_buffer[(y % SCREEN_HEIGHT) * SCREEN_WIDTH + (x % SCREEN_WIDTH)] == 1
    }
}

pub fn create_state(rom_path: Option<&Path>) -> Result<EmulatorState, Chip8Error> {
    let mut state = EmulatorState::default();
    reset_state(&mut state, rom_path)?;
    Ok(state)
}

/// Same as `create_state(None)` but with a fixed seed for `CXKK`.
pub fn create_state_with_seed(seed: u64) -> EmulatorState {
    EmulatorState::with_rng(StdRng::seed_from_u64(seed))
}

pub fn reset_state(state: &mut EmulatorState, rom_path: Option<&Path>) -> Result<(), Chip8Error> {
    state.memory = [0; MEMORY_SIZE];
    state.registers = [0; REGISTER_COUNT];
    state.stack = [0; STACK_DEPTH];
    state.sp = 0;
    state.key_inputs = [false; KEY_COUNT];
    clear_display(state);

    state.pc = PROGRAM_START as u16;
    state.index = 0;
    state.delay_timer = 0;
    state.sound_timer = 0;

    load_font(state);

    if let Some(path) = rom_path {
        state.rom_path = Some(path.to_path_buf());
    }

    if let Some(path) = state.rom_path.clone() {
        load_rom(state, &path)?;
    }

    Ok(())
}

pub fn clear_display(state: &mut EmulatorState) {
    state.screen_buffer = [0; SCREEN_WIDTH * SCREEN_HEIGHT];
}

pub fn load_font(state: &mut EmulatorState) {
    state.memory[..FONT_BYTES.len()].copy_from_slice(&FONT_BYTES);
}

pub fn load_rom(state: &mut EmulatorState, path: &Path) -> Result<(), Chip8Error> {
    let rom_bytes = fs::read(path)?;
    load_rom_bytes(state, &rom_bytes)?;
    state.rom_path = Some(path.to_path_buf());
    Ok(())
}

pub fn load_rom_bytes(state: &mut EmulatorState, rom_bytes: &[u8]) -> Result<(), Chip8Error> {
    if rom_bytes.is_empty() {
        return Err(Chip8Error::EmptyInput);
    }
    if rom_bytes.len() > MAX_ROM_SIZE {
        return Err(Chip8Error::RomTooLarge {
            size: rom_bytes.len(),
            max: MAX_ROM_SIZE,
        });
    }

    let start = PROGRAM_START;
    let end = PROGRAM_START + rom_bytes.len();
    state.memory[start..end].copy_from_slice(rom_bytes);

    if log_enabled!(log::Level::Debug) {
        debug!("rom contents:\n{}", hex_dump(rom_bytes));
    }
    info!("loaded rom into memory 0x{start:03x}..0x{end:03x}");

    Ok(())
}

fn hex_dump(bytes: &[u8]) -> String {
    bytes
        .chunks(16)
        .map(|row| {
            row.iter()
                .map(|byte| format!("0x{byte:02x}"))
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Reads past the end of memory yield 0.
pub fn read_memory(state: &EmulatorState, address: usize) -> u8 {
    state.memory.get(address).copied().unwrap_or(0)
}

/// Writes past the end of memory are dropped.
pub fn write_memory(state: &mut EmulatorState, address: usize, value: u8) {
    if let Some(cell) = state.memory.get_mut(address) {
        *cell = value;
    }
}

pub fn first_pressed_key(state: &EmulatorState) -> Option<u8> {
    state
        .key_inputs
        .iter()
        .position(|pressed| *pressed)
        .map(|index| index as u8)
}

pub fn is_key_pressed(state: &EmulatorState, key_index: usize) -> bool {
    state.key_inputs.get(key_index).copied().unwrap_or(false)
}

pub fn set_key_state(state: &mut EmulatorState, key_index: usize, is_pressed: bool) {
    if key_index >= KEY_COUNT {
        return;
    }

    state.key_inputs[key_index] = is_pressed;
}
