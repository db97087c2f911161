pub mod app;
pub mod clock;
pub mod config;
pub mod cpu;
pub mod disasm;
pub mod error;
pub mod palette;
pub mod settings;
pub mod sound;
pub mod state;
pub mod trace;
