use std::io::Cursor;

use mychip8::{
    create_state_with_seed, execute_cycle, load_rom_bytes, EmulatorState, FileTrace,
    RecordingTrace, StepTrace, TraceRecord,
};

fn sample_record() -> TraceRecord {
    let mut registers = [0u8; 16];
    registers[0] = 0x12;
    registers[0xF] = 0x01;
    TraceRecord {
        address: 0x204,
        opcode: 0x6A05,
        index: 0x2F0,
        sp: 2,
        delay_timer: 0x3C,
        sound_timer: 0,
        registers,
    }
}

fn program_state() -> EmulatorState {
    let mut state = create_state_with_seed(5);
    // LD V1,7 ; ADD V1,1 ; CALL 206 ; RET
    load_rom_bytes(&mut state, &[0x61, 0x07, 0x71, 0x01, 0x22, 0x06, 0x00, 0xEE]).unwrap();
    state
}

#[test]
fn log_line_matches_debug_file_layout() {
    let line = sample_record().log_line();

    assert_eq!(
        line,
        "0204: LD VA,05        I=2F0 SP=02 DT=3C ST=00 \
         V0=12 V1=00 V2=00 V3=00 V4=00 V5=00 V6=00 V7=00 \
         V8=00 V9=00 VA=00 VB=00 VC=00 VD=00 VE=00 VF=01"
    );
}

#[test]
fn step_view_shows_register_grid() {
    let view = sample_record().step_view();
    let lines: Vec<&str> = view.lines().collect();

    assert_eq!(lines[0], "0204: LD VA,05         I:2F0  SP:02  DT:3C  ST:00");
    assert!(lines[1].starts_with("│ V0 :12"));
    assert!(lines[2].ends_with("│ VF :01 │"));
    assert_eq!(lines.len(), 3);
}

#[test]
fn record_captures_state_before_execution() {
    let mut state = program_state();
    let mut recorder = RecordingTrace::default();

    for _ in 0..3 {
        execute_cycle(&mut state, Some(&mut recorder));
    }

    let second = recorder.records[1];
    assert_eq!(second.address, 0x202);
    assert_eq!(second.opcode, 0x7101);
    assert_eq!(second.registers[1], 7);
    assert_eq!(recorder.records[2].sp, 0);
    assert_eq!(state.sp, 1);
}

#[test]
fn tracing_does_not_change_execution() {
    let mut traced = program_state();
    let mut plain = program_state();
    let mut recorder = RecordingTrace::default();

    for _ in 0..4 {
        execute_cycle(&mut traced, Some(&mut recorder));
        execute_cycle(&mut plain, None);
    }

    assert_eq!(traced.pc, plain.pc);
    assert_eq!(traced.registers, plain.registers);
    assert_eq!(traced.sp, plain.sp);
    assert_eq!(traced.stack, plain.stack);
    assert_eq!(recorder.records.len(), 4);
}

#[test]
fn file_trace_writes_one_line_per_instruction() {
    let mut state = program_state();
    let mut sink = FileTrace::new(Vec::new());

    for _ in 0..2 {
        execute_cycle(&mut state, Some(&mut sink));
    }

    let text = String::from_utf8(sink.into_inner()).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("0200: LD V1,07"));
    assert!(lines[1].starts_with("0202: ADD V1,01"));
    assert!(lines[1].contains(" V1=07 "));
}

#[test]
fn file_trace_creates_log_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dbg.log");
    let mut state = program_state();

    {
        let mut sink = FileTrace::create(&path).unwrap();
        execute_cycle(&mut state, Some(&mut sink));
    }

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.starts_with("0200: LD V1,07"));
}

#[test]
fn step_trace_prompts_and_consumes_one_line_per_instruction() {
    let mut state = program_state();
    let mut sink = StepTrace::new(Cursor::new(b"\n\n".to_vec()), Vec::new());

    execute_cycle(&mut state, Some(&mut sink));
    execute_cycle(&mut state, Some(&mut sink));

    let output = String::from_utf8(sink.into_output()).unwrap();
    assert_eq!(output.matches("--- press ENTER to step ---").count(), 2);
    assert!(output.contains("0202: ADD V1,01"));
    assert_eq!(state.registers[1], 8);
}
