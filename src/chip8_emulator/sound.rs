use raylib::core::audio::{AudioStream, RaylibAudio};

use crate::chip8_emulator::config::TIMER_HZ;

pub const SAMPLE_RATE: u32 = 44_100;
pub const TONE_HZ: f32 = 440.0;
// Kept even so the buffer splits cleanly in `update_slice`.
const SAMPLES_PER_UPDATE: usize = (SAMPLE_RATE as usize / TIMER_HZ as usize) & !1;
const PEAK_AMPLITUDE: f32 = 2500.0;

/// Phase-continuous square wave generator.
#[derive(Debug, Clone)]
pub struct SquareWave {
    phase: f32,
    phase_step: f32,
    amplitude: i16,
}

impl SquareWave {
    /// `volume` is a percentage, clamped to 0..=100.
    pub fn new(frequency: f32, sample_rate: u32, volume: u8) -> Self {
        let volume = f32::from(volume.min(100)) / 100.0;
        Self {
            phase: 0.0,
            phase_step: frequency / sample_rate as f32,
            amplitude: (PEAK_AMPLITUDE * volume) as i16,
        }
    }

    pub fn fill(&mut self, samples: &mut [i16], active: bool) {
        for sample in samples.iter_mut() {
            *sample = if !active {
                0
            } else if self.phase < 0.5 {
                self.amplitude
            } else {
                -self.amplitude
            };
            self.phase = (self.phase + self.phase_step).fract();
        }
    }
}

/// Mono 16-bit stream that plays the square wave while the sound timer runs.
pub struct ToneStream<'aud> {
    stream: AudioStream<'aud>,
    wave: SquareWave,
    buffer: Vec<i16>,
}

impl<'aud> ToneStream<'aud> {
    pub fn new(audio: &'aud RaylibAudio, volume: u8) -> Self {
        let stream = audio.new_audio_stream(SAMPLE_RATE, 16, 1);
        stream.play();
        Self {
            stream,
            wave: SquareWave::new(TONE_HZ, SAMPLE_RATE, volume),
            buffer: vec![0; SAMPLES_PER_UPDATE],
        }
    }

    /// Refills the stream when raylib has consumed the previous buffer.
    pub fn update(&mut self, active: bool) {
        if !self.stream.is_processed() {
            return;
        }
        self.wave.fill(&mut self.buffer, active);
        self.stream.update(update_slice(&self.buffer));
    }
}

/// raylib-rs passes `data.len() * size_of::<T>()` as the frame count, so a
/// 16-bit mono buffer of N samples must be handed over as its first N/2
/// elements for raylib to copy exactly N frames.
fn update_slice(samples: &[i16]) -> &[i16] {
    &samples[..samples.len() / 2]
}
