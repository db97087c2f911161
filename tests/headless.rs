use mychip8::{open_trace_sink, run_emulator_headless, Chip8Error, DebugMode, RecordingTrace};

fn rom_file(bytes: &[u8]) -> tempfile::NamedTempFile {
    let tmp = tempfile::NamedTempFile::new().unwrap();
    std::fs::write(tmp.path(), bytes).unwrap();
    tmp
}

#[test]
fn headless_runs_cls_and_jump_to_self() {
    let rom = rom_file(&[0x00, 0xE0, 0x12, 0x00]);

    let state = run_emulator_headless(rom.path(), 10, 600, None).unwrap();

    assert_eq!(state.pc, 0x200);
    assert!(state.screen_buffer.iter().all(|pixel| *pixel == 0));
    assert_eq!(state.rom_path.as_deref(), Some(rom.path()));
}

#[test]
fn headless_ticks_timers_at_sixty_hz() {
    // LD V0,30 ; LD DT,V0 ; JP 204
    let rom = rom_file(&[0x60, 0x1E, 0xF0, 0x15, 0x12, 0x04]);

    // 600 Hz: one tick every 10 cycles; the first tick lands after DT is loaded.
    let state = run_emulator_headless(rom.path(), 100, 600, None).unwrap();

    assert_eq!(state.delay_timer, 20);
}

#[test]
fn headless_draws_font_glyph() {
    // LD V1,0xA ; LD F,V1 ; DRW V0,V0,5 ; JP 206
    let rom = rom_file(&[0x61, 0x0A, 0xF1, 0x29, 0xD0, 0x05, 0x12, 0x06]);

    let state = run_emulator_headless(rom.path(), 16, 600, None).unwrap();

    assert_eq!(state.index, 50);
    assert!(
        state.screen_buffer.iter().any(|pixel| *pixel == 1),
        "expected the glyph to light at least one pixel"
    );
    assert_eq!(state.screen_buffer[0..4], [1, 1, 1, 1]);
}

#[test]
fn headless_passes_every_instruction_to_trace() {
    let rom = rom_file(&[0x00, 0xE0, 0x12, 0x00]);
    let mut recorder = RecordingTrace::default();

    run_emulator_headless(rom.path(), 4, 600, Some(&mut recorder)).unwrap();

    let addresses: Vec<u16> = recorder.records.iter().map(|record| record.address).collect();
    let opcodes: Vec<u16> = recorder.records.iter().map(|record| record.opcode).collect();
    assert_eq!(addresses, [0x200, 0x202, 0x200, 0x202]);
    assert_eq!(opcodes, [0x00E0, 0x1200, 0x00E0, 0x1200]);
}

#[test]
fn headless_rejects_empty_rom() {
    let rom = rom_file(&[]);

    let result = run_emulator_headless(rom.path(), 10, 600, None);

    assert!(matches!(result, Err(Chip8Error::EmptyInput)));
}

#[test]
fn headless_rejects_zero_cycles() {
    let rom = rom_file(&[0x12, 0x00]);

    let result = run_emulator_headless(rom.path(), 0, 600, None);

    assert!(matches!(result, Err(Chip8Error::InvalidArgument(_))));
}

#[test]
fn headless_reports_missing_rom() {
    let dir = tempfile::tempdir().unwrap();

    let result = run_emulator_headless(&dir.path().join("missing.ch8"), 10, 600, None);

    assert!(matches!(result, Err(Chip8Error::Io(_))));
}

#[test]
fn headless_log_file_mode_writes_trace() {
    let rom = rom_file(&[0x00, 0xE0, 0x12, 0x00]);
    let dir = tempfile::tempdir().unwrap();
    let log_path = dir.path().join("dbg.log");

    let mut trace = open_trace_sink(DebugMode::LogFile, &log_path).unwrap();
    assert!(trace.is_some());
    run_emulator_headless(rom.path(), 3, 600, trace.as_deref_mut()).unwrap();
    drop(trace);

    let text = std::fs::read_to_string(&log_path).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("0200: CLS"));
    assert!(lines[1].starts_with("0202: JP 200"));
}

#[test]
fn debug_off_opens_no_trace_without_trace_logging() {
    let dir = tempfile::tempdir().unwrap();
    let log_path = dir.path().join("dbg.log");

    let trace = open_trace_sink(DebugMode::Off, &log_path).unwrap();

    assert!(trace.is_none());
    assert!(!log_path.exists());
}
