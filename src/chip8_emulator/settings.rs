use crate::chip8_emulator::error::Chip8Error;
use crate::chip8_emulator::palette::{Palette, BW_PALETTE};

pub const MIN_CPU_HZ: u32 = 100;
pub const MAX_VOLUME: u8 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebugMode {
    Off,
    /// One line per instruction in `dbg.log`.
    LogFile,
    /// Print each instruction and wait for ENTER.
    StepByStep,
}

impl DebugMode {
    /// 1 and 2 select a mode; every other level means off.
    pub fn from_level(level: u8) -> Self {
        match level {
            1 => Self::LogFile,
            2 => Self::StepByStep,
            _ => Self::Off,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunnerSettings {
    pub palette: Palette,
    pub scale: usize,
    pub cpu_hz: u32,
    pub volume: u8,
    pub sound_enabled: bool,
    pub debug: DebugMode,
}

impl Default for RunnerSettings {
    fn default() -> Self {
        Self {
            palette: BW_PALETTE,
            scale: 20,
            cpu_hz: 500,
            volume: 30,
            sound_enabled: true,
            debug: DebugMode::Off,
        }
    }
}

impl RunnerSettings {
    pub fn validate(self) -> Result<Self, Chip8Error> {
        if self.scale < 1 {
            return Err(Chip8Error::InvalidArgument("scale must be >= 1"));
        }
        if self.cpu_hz < MIN_CPU_HZ {
            return Err(Chip8Error::InvalidArgument("hz must be >= 100"));
        }
        if self.volume > MAX_VOLUME {
            return Err(Chip8Error::InvalidArgument("volume must be 0..=100"));
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(RunnerSettings::default().validate().is_ok());
    }

    #[test]
    fn rejects_slow_cpu_and_zero_scale() {
        let slow = RunnerSettings {
            cpu_hz: 99,
            ..RunnerSettings::default()
        };
        assert!(matches!(
            slow.validate(),
            Err(Chip8Error::InvalidArgument(_))
        ));

        let tiny = RunnerSettings {
            scale: 0,
            ..RunnerSettings::default()
        };
        assert!(tiny.validate().is_err());
    }

    #[test]
    fn rejects_loud_volume() {
        let loud = RunnerSettings {
            volume: 101,
            ..RunnerSettings::default()
        };
        assert!(loud.validate().is_err());
    }

    #[test]
    fn unknown_debug_levels_fall_back_to_off() {
        assert_eq!(DebugMode::from_level(0), DebugMode::Off);
        assert_eq!(DebugMode::from_level(1), DebugMode::LogFile);
        assert_eq!(DebugMode::from_level(2), DebugMode::StepByStep);
        assert_eq!(DebugMode::from_level(7), DebugMode::Off);
    }
}
