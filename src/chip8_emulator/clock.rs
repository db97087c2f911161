use crate::chip8_emulator::config::TIMER_HZ;

/// Longest frame delta honoured; longer stalls are not caught up.
const MAX_FRAME_DT: f32 = 0.1;

/// Work due for one host frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameBudget {
    pub cycles: usize,
    pub timer_ticks: usize,
}

/// Turns elapsed wall-clock time into instruction cycles and 60 Hz timer ticks.
/// Fractional remainders carry over to the next frame.
#[derive(Debug, Clone)]
pub struct HostClock {
    cycle_interval: f32,
    timer_interval: f32,
    max_cycles_per_frame: usize,
    accumulated_time: f32,
    timer_accumulated_time: f32,
}

impl HostClock {
    pub fn new(cpu_hz: u32, target_fps: u32) -> Self {
        let cpu_hz = cpu_hz.max(1);
        let target_fps = target_fps.max(1);
        Self {
            cycle_interval: 1.0 / cpu_hz as f32,
            timer_interval: 1.0 / TIMER_HZ as f32,
            max_cycles_per_frame: usize::max(1, (cpu_hz / target_fps) as usize * 3),
            accumulated_time: 0.0,
            timer_accumulated_time: 0.0,
        }
    }

    pub fn advance(&mut self, frame_dt: f32) -> FrameBudget {
        let frame_dt = frame_dt.clamp(0.0, MAX_FRAME_DT);
        self.accumulated_time += frame_dt;
        self.timer_accumulated_time += frame_dt;

        let mut budget = FrameBudget::default();
        while self.accumulated_time >= self.cycle_interval
            && budget.cycles < self.max_cycles_per_frame
        {
            self.accumulated_time -= self.cycle_interval;
            budget.cycles += 1;
        }
        // Time beyond the cap is dropped rather than replayed next frame.
        if budget.cycles == self.max_cycles_per_frame {
            self.accumulated_time = self.accumulated_time.min(self.cycle_interval);
        }

        while self.timer_accumulated_time >= self.timer_interval {
            self.timer_accumulated_time -= self.timer_interval;
            budget.timer_ticks += 1;
        }

        budget
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn carries_fractional_cycles_between_frames() {
        let mut clock = HostClock::new(500, 60);

        // 3 ms at 500 Hz is 1.5 cycles; 3.5 ms more brings the total to 3.25.
        let first = clock.advance(0.003);
        let second = clock.advance(0.0035);

        assert_eq!(first.cycles, 1);
        assert_eq!(second.cycles, 2);
    }

    #[test]
    fn ticks_timers_at_sixty_hz_independent_of_cpu_rate() {
        let mut slow = HostClock::new(100, 60);
        let mut fast = HostClock::new(2000, 60);

        let slow_ticks: usize = (0..10).map(|_| slow.advance(0.05).timer_ticks).sum();
        let fast_ticks: usize = (0..10).map(|_| fast.advance(0.05).timer_ticks).sum();

        assert!((29..=30).contains(&slow_ticks));
        assert_eq!(slow_ticks, fast_ticks);
    }

    #[test]
    fn caps_cycles_after_a_stall() {
        let mut clock = HostClock::new(600, 60);

        let budget = clock.advance(5.0);

        assert_eq!(budget.cycles, 30);
        assert!(budget.timer_ticks <= 6);
    }
}
