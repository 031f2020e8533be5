// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Wall-clock timing for the engine loop.

use std::time::{Duration, Instant};

/// Measures per-iteration deltas and total elapsed time for the loop.
///
/// `tick` is called once at the top of every loop iteration and returns the
/// wall-clock time since the previous tick; the first tick measures from
/// the moment the clock was created (or last reset).
#[derive(Debug, Clone)]
pub struct FrameClock {
    started: Instant,
    last_tick: Instant,
}

impl FrameClock {
    /// Creates a clock whose first tick measures from now.
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            started: now,
            last_tick: now,
        }
    }

    /// Advances the clock and returns the time since the previous tick.
    pub fn tick(&mut self) -> Duration {
        let now = Instant::now();
        let dt = now - self.last_tick;
        self.last_tick = now;
        dt
    }

    /// Like [`tick`](Self::tick), as `f32` seconds for event payloads.
    pub fn tick_secs(&mut self) -> f32 {
        self.tick().as_secs_f32()
    }

    /// Returns the total time since the clock was created or reset.
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Restarts both the elapsed total and the delta measurement.
    pub fn reset(&mut self) {
        let now = Instant::now();
        self.started = now;
        self.last_tick = now;
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    const SLEEP_MS: u64 = 30;
    const MARGIN_MS: u64 = 200;

    #[test]
    fn first_tick_measures_from_creation() {
        let mut clock = FrameClock::new();
        thread::sleep(Duration::from_millis(SLEEP_MS));
        let dt = clock.tick();
        assert!(dt >= Duration::from_millis(SLEEP_MS));
        assert!(dt < Duration::from_millis(SLEEP_MS + MARGIN_MS));
    }

    #[test]
    fn consecutive_ticks_measure_between_calls() {
        let mut clock = FrameClock::new();
        clock.tick();
        thread::sleep(Duration::from_millis(SLEEP_MS));
        let dt = clock.tick_secs();
        assert!(dt >= SLEEP_MS as f32 / 1000.0);
        assert!(dt < (SLEEP_MS + MARGIN_MS) as f32 / 1000.0);
    }

    #[test]
    fn reset_restarts_elapsed() {
        let mut clock = FrameClock::new();
        thread::sleep(Duration::from_millis(SLEEP_MS));
        clock.reset();
        assert!(clock.elapsed() < Duration::from_millis(SLEEP_MS));
    }
}
