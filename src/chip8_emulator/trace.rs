use std::fs::File;
use std::io::{self, BufRead, BufReader, Stdin, Stdout, Write};
use std::path::Path;

use log::warn;

use crate::chip8_emulator::config::REGISTER_COUNT;
use crate::chip8_emulator::disasm::disassemble;
use crate::chip8_emulator::state::EmulatorState;

/// Machine state captured after fetch, before the instruction runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceRecord {
    /// Address the opcode was fetched from.
    pub address: u16,
    pub opcode: u16,
    pub index: u16,
    pub sp: usize,
    pub delay_timer: u8,
    pub sound_timer: u8,
    pub registers: [u8; REGISTER_COUNT],
}

impl TraceRecord {
    pub fn capture(state: &EmulatorState, address: u16, opcode: u16) -> Self {
        Self {
            address,
            opcode,
            index: state.index,
            sp: state.sp,
            delay_timer: state.delay_timer,
            sound_timer: state.sound_timer,
            registers: state.registers,
        }
    }

    pub fn mnemonic(&self) -> String {
        disassemble(self.opcode)
    }

    /// Single-line layout used by the `dbg.log` file.
    pub fn log_line(&self) -> String {
        let mut line = format!(
            "{:04X}: {:<15} I={:03X} SP={:02X} DT={:02X} ST={:02X}",
            self.address,
            self.mnemonic(),
            self.index,
            self.sp,
            self.delay_timer,
            self.sound_timer
        );
        for (register, value) in self.registers.iter().enumerate() {
            line.push_str(&format!(" V{register:X}={value:02X}"));
        }
        line
    }

    /// Multi-line layout used by the interactive stepper.
    pub fn step_view(&self) -> String {
        let mut view = format!(
            "{:04X}: {:<15}  I:{:03X}  SP:{:02X}  DT:{:02X}  ST:{:02X}\n",
            self.address,
            self.mnemonic(),
            self.index,
            self.sp,
            self.delay_timer,
            self.sound_timer
        );
        for (register, value) in self.registers.iter().enumerate() {
            view.push_str(&format!("│ V{register:<2X}:{value:02X}"));
            if register % 8 == 7 {
                view.push_str(" │\n");
            }
        }
        view
    }
}

/// Observer notified once per executed instruction. Must not influence execution.
pub trait TraceSink {
    fn record(&mut self, record: &TraceRecord);
}

/// Routes every record through `log::trace!`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogTrace;

impl TraceSink for LogTrace {
    fn record(&mut self, record: &TraceRecord) {
        log::trace!("{}", record.log_line());
    }
}

/// Appends one line per instruction to a writer, flushing after each.
#[derive(Debug)]
pub struct FileTrace<W: Write> {
    writer: W,
    failed: bool,
}

impl FileTrace<File> {
    pub fn create(path: &Path) -> io::Result<Self> {
        Ok(Self::new(File::create(path)?))
    }
}

impl<W: Write> FileTrace<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            failed: false,
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> TraceSink for FileTrace<W> {
    fn record(&mut self, record: &TraceRecord) {
        if self.failed {
            return;
        }
        let result = writeln!(self.writer, "{}", record.log_line()).and_then(|_| self.writer.flush());
        if let Err(error) = result {
            warn!("instruction trace disabled after write failure: {error}");
            self.failed = true;
        }
    }
}

/// Prints each instruction and blocks until a line is read from `input`.
#[derive(Debug)]
pub struct StepTrace<R: BufRead, W: Write> {
    input: R,
    output: W,
}

impl StepTrace<BufReader<Stdin>, Stdout> {
    pub fn stdio() -> Self {
        Self::new(BufReader::new(io::stdin()), io::stdout())
    }
}

impl<R: BufRead, W: Write> StepTrace<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    fn show_and_wait(&mut self, record: &TraceRecord) -> io::Result<()> {
        write!(self.output, "{}", record.step_view())?;
        write!(self.output, "\n--- press ENTER to step ---\n")?;
        self.output.flush()?;
        let mut line = String::new();
        self.input.read_line(&mut line)?;
        Ok(())
    }
}

impl<R: BufRead, W: Write> TraceSink for StepTrace<R, W> {
    fn record(&mut self, record: &TraceRecord) {
        if let Err(error) = self.show_and_wait(record) {
            warn!("step trace io error: {error}");
        }
    }
}

/// Keeps every record in memory.
#[derive(Debug, Default, Clone)]
pub struct RecordingTrace {
    pub records: Vec<TraceRecord>,
}

impl TraceSink for RecordingTrace {
    fn record(&mut self, record: &TraceRecord) {
        self.records.push(*record);
    }
}
