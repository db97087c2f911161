use rand::Rng;

use crate::chip8_emulator::config::{
    FONT_GLYPH_SIZE, MEMORY_SIZE, SCREEN_HEIGHT, SCREEN_WIDTH, STACK_DEPTH,
};
use crate::chip8_emulator::state::{
    clear_display, first_pressed_key, is_key_pressed, read_memory, write_memory, EmulatorState,
};
use crate::chip8_emulator::trace::{TraceRecord, TraceSink};

const FLAG: usize = 0xF;

/// Fixed sub-fields of an instruction word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decoded {
    pub opcode: u16,
    pub x: usize,
    pub y: usize,
    pub n: u8,
    pub kk: u8,
    pub nnn: u16,
}

pub fn decode(opcode: u16) -> Decoded {
    Decoded {
        opcode,
        x: ((opcode & 0x0F00) >> 8) as usize,
        y: ((opcode & 0x00F0) >> 4) as usize,
        n: (opcode & 0x000F) as u8,
        kk: (opcode & 0x00FF) as u8,
        nnn: opcode & 0x0FFF,
    }
}

/// Big-endian word at `PC`, or `None` when `PC` leaves no room for two bytes.
pub fn fetch(state: &EmulatorState) -> Option<u16> {
    let pc = state.pc as usize;
    if pc + 1 >= MEMORY_SIZE {
        return None;
    }
    Some(((state.memory[pc] as u16) << 8) | state.memory[pc + 1] as u16)
}

/// Runs exactly one instruction. A `PC` outside memory makes this a no-op.
pub fn execute_cycle(state: &mut EmulatorState, trace: Option<&mut (dyn TraceSink + '_)>) {
    let Some(opcode) = fetch(state) else {
        return;
    };
    let address = state.pc;
    state.pc += 2;

    if let Some(sink) = trace {
        sink.record(&TraceRecord::capture(state, address, opcode));
    }

    execute_opcode(state, opcode);
}

/// 60 Hz countdown of both timers, saturating at zero.
pub fn tick_timers(state: &mut EmulatorState) {
    state.delay_timer = state.delay_timer.saturating_sub(1);
    state.sound_timer = state.sound_timer.saturating_sub(1);
}

/// Executes an already-fetched word. `PC` is expected to point past it.
pub fn execute_opcode(state: &mut EmulatorState, opcode: u16) {
    let op = decode(opcode);

    match opcode & 0xF000 {
        0x0000 => handle_family_0(state, op),
        0x1000 => state.pc = op.nnn,
        0x2000 => handle_opcode_2nnn_call(state, op),
        0x3000 => {
            let equal = state.registers[op.x] == op.kk;
            skip_if(state, equal);
        }
        0x4000 => {
            let equal = state.registers[op.x] == op.kk;
            skip_if(state, !equal);
        }
        0x5000 => {
            let equal = state.registers[op.x] == state.registers[op.y];
            skip_if(state, equal);
        }
        0x6000 => state.registers[op.x] = op.kk,
        0x7000 => state.registers[op.x] = state.registers[op.x].wrapping_add(op.kk),
        0x8000 => handle_family_8(state, op),
        0x9000 => {
            let equal = state.registers[op.x] == state.registers[op.y];
            skip_if(state, !equal);
        }
        0xA000 => state.index = op.nnn,
        0xB000 => state.pc = op.nnn + state.registers[0] as u16,
        0xC000 => state.registers[op.x] = state.rng.gen::<u8>() & op.kk,
        0xD000 => handle_opcode_dxyn_draw(state, op),
        0xE000 => handle_family_e(state, op),
        _ => handle_family_f(state, op),
    }
}

fn skip_if(state: &mut EmulatorState, condition: bool) {
    if condition {
        state.pc += 2;
    }
}

fn handle_family_0(state: &mut EmulatorState, op: Decoded) {
    match op.kk {
        0xE0 => clear_display(state),
        0xEE => {
            // Return on an empty stack is ignored.
            if state.sp > 0 {
                state.sp -= 1;
                state.pc = state.stack[state.sp];
            }
        }
        _ => {}
    }
}

fn handle_opcode_2nnn_call(state: &mut EmulatorState, op: Decoded) {
    // A call with all 16 slots taken is dropped.
    if state.sp < STACK_DEPTH {
        state.stack[state.sp] = state.pc;
        state.sp += 1;
        state.pc = op.nnn;
    }
}

fn handle_family_8(state: &mut EmulatorState, op: Decoded) {
    let vx = state.registers[op.x];
    let vy = state.registers[op.y];

    // VF is written first so that VF as destination ends up holding the result.
    match op.n {
        0x0 => state.registers[op.x] = vy,
        0x1 => state.registers[op.x] = vx | vy,
        0x2 => state.registers[op.x] = vx & vy,
        0x3 => state.registers[op.x] = vx ^ vy,
        0x4 => {
            let (result, carry) = vx.overflowing_add(vy);
            state.registers[FLAG] = u8::from(carry);
            state.registers[op.x] = result;
        }
        0x5 => {
            state.registers[FLAG] = u8::from(vx >= vy);
            state.registers[op.x] = vx.wrapping_sub(vy);
        }
        0x6 => {
            state.registers[FLAG] = vx & 0x1;
            state.registers[op.x] = vx >> 1;
        }
        0x7 => {
            state.registers[FLAG] = u8::from(vy >= vx);
            state.registers[op.x] = vy.wrapping_sub(vx);
        }
        0xE => {
            state.registers[FLAG] = (vx & 0x80) >> 7;
            state.registers[op.x] = vx << 1;
        }
        _ => {}
    }
}

fn handle_opcode_dxyn_draw(state: &mut EmulatorState, op: Decoded) {
    let x_start = state.registers[op.x] as usize;
    let y_start = state.registers[op.y] as usize;
    let height = op.n as usize;
    state.registers[FLAG] = 0;

    for row in 0..height {
        let sprite_row = read_memory(state, state.index as usize + row);
        let y_pos = (y_start + row) % SCREEN_HEIGHT;

        for bit in 0..8 {
            if sprite_row & (0x80 >> bit) == 0 {
                continue;
            }

            let x_pos = (x_start + bit) % SCREEN_WIDTH;
            let location = x_pos + (y_pos * SCREEN_WIDTH);
            if state.screen_buffer[location] == 1 {
                state.registers[FLAG] = 1;
            }
            state.screen_buffer[location] ^= 1;
        }
    }
}

fn handle_family_e(state: &mut EmulatorState, op: Decoded) {
    let pressed = is_key_pressed(state, state.registers[op.x] as usize);

    match op.kk {
        0x9E => skip_if(state, pressed),
        0xA1 => skip_if(state, !pressed),
        _ => {}
    }
}

fn handle_family_f(state: &mut EmulatorState, op: Decoded) {
    let x_reg = op.x;
    let index = state.index as usize;

    match op.kk {
        0x07 => state.registers[x_reg] = state.delay_timer,
        0x0A => {
            if let Some(key) = first_pressed_key(state) {
                state.registers[x_reg] = key;
            } else {
                // No key yet: re-run this instruction next cycle.
                state.pc = state.pc.saturating_sub(2);
            }
        }
        0x15 => state.delay_timer = state.registers[x_reg],
        0x18 => state.sound_timer = state.registers[x_reg],
        0x1E => state.index = state.index.wrapping_add(state.registers[x_reg] as u16),
        0x29 => state.index = state.registers[x_reg] as u16 * FONT_GLYPH_SIZE as u16,
        0x33 => {
            let value = state.registers[x_reg];
            write_memory(state, index, value / 100);
            write_memory(state, index + 1, (value / 10) % 10);
            write_memory(state, index + 2, value % 10);
        }
        0x55 => {
            for register in 0..=x_reg {
                let value = state.registers[register];
                write_memory(state, index + register, value);
            }
        }
        0x65 => {
            for register in 0..=x_reg {
                state.registers[register] = read_memory(state, index + register);
            }
        }
        _ => {}
    }
}
