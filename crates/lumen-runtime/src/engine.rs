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

//! The engine lifecycle and timed update loop.
//!
//! The loop publishes an `Update` event every iteration with the measured
//! frame delta and, at a fixed cadence, hands a `Render` dispatch to the
//! worker pool so draw submission never blocks frame pacing. Stopping is
//! cooperative: a flag checked at the top of each iteration.

use crate::pool::WorkerPool;
use lumen_core::{EngineEvent, EventBus, FrameClock};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use std::thread;
use std::time::Duration;

/// An error raised by the engine lifecycle.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// [`EngineCore::run`] was called before [`EngineCore::initialize`].
    #[error("engine loop started before initialization")]
    NotInitialized,
}

/// Lifecycle states of the engine core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// Construction finished, subsystems not yet built.
    Uninitialized,
    /// Subsystems built, loop not running.
    Initialized,
    /// The loop is executing.
    Running,
    /// A stop was requested; the loop exits at its next top-of-iteration check.
    StopRequested,
    /// Shutdown completed; re-initialization is required before running again.
    ShutDown,
}

/// Tuning knobs for the engine loop.
///
/// The step and sleep intervals are configuration rather than constants so
/// tests can run the loop at accelerated time.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Worker threads for the pool; `None` means host parallelism.
    pub worker_threads: Option<usize>,
    /// Interval between fixed-step (render-dispatch) ticks.
    pub fixed_step: Duration,
    /// Sleep inserted at the end of every loop iteration to yield the CPU.
    pub sleep_interval: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            worker_threads: None,
            fixed_step: Duration::from_micros(16_667), // 1/60 s
            sleep_interval: Duration::from_millis(1),
        }
    }
}

/// A cloneable handle that requests a cooperative stop from any thread.
#[derive(Debug, Clone)]
pub struct StopHandle {
    flag: Arc<AtomicBool>,
}

impl StopHandle {
    /// Asks the loop to exit at its next iteration boundary.
    pub fn request_stop(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Returns `true` once a stop has been requested.
    pub fn is_stop_requested(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// Owns the event bus and worker pool and drives the timed loop.
///
/// Lifecycle: `Uninitialized → Initialized → Running → StopRequested →
/// ShutDown`. `initialize` and `shutdown` are idempotent; `run` requires a
/// prior `initialize`.
pub struct EngineCore {
    config: EngineConfig,
    state: EngineState,
    bus: Arc<RwLock<EventBus>>,
    pool: Option<WorkerPool>,
    stop_flag: Arc<AtomicBool>,
    frames: u64,
}

impl EngineCore {
    /// Creates an uninitialized engine around a shared bus.
    pub fn new(config: EngineConfig, bus: Arc<RwLock<EventBus>>) -> Self {
        Self {
            config,
            state: EngineState::Uninitialized,
            bus,
            pool: None,
            stop_flag: Arc::new(AtomicBool::new(false)),
            frames: 0,
        }
    }

    /// Builds the worker pool and publishes the `Init` event.
    ///
    /// Idempotent: calling it while already initialized is a successful
    /// no-op.
    pub fn initialize(&mut self) {
        if matches!(self.state, EngineState::Initialized | EngineState::Running) {
            log::debug!("Engine already initialized; ignoring.");
            return;
        }

        let pool = match self.config.worker_threads {
            Some(n) => WorkerPool::new(n),
            None => WorkerPool::with_default_threads(),
        };
        self.pool = Some(pool);
        self.stop_flag.store(false, Ordering::SeqCst);
        self.frames = 0;
        self.state = EngineState::Initialized;

        self.dispatch(&EngineEvent::Init);
        log::info!("Engine initialized.");
    }

    /// Runs the timed loop until a stop is requested.
    ///
    /// Every iteration dispatches `Update` with the measured wall-clock
    /// delta; whenever the accumulated delta crosses the fixed step, the
    /// `Render` dispatch for that step is submitted to the worker pool.
    /// Render handlers may therefore run concurrently with the next
    /// `Update` dispatch and must tolerate that overlap.
    pub fn run(&mut self) -> Result<(), EngineError> {
        if self.state != EngineState::Initialized {
            log::error!("run() called in state {:?}.", self.state);
            return Err(EngineError::NotInitialized);
        }

        self.state = EngineState::Running;
        log::info!(
            "Engine loop starting (fixed step {:?}, sleep {:?}).",
            self.config.fixed_step,
            self.config.sleep_interval
        );

        let mut clock = FrameClock::new();
        let mut accumulator = Duration::ZERO;

        while !self.stop_flag.load(Ordering::SeqCst) {
            let dt = clock.tick();
            self.dispatch(&EngineEvent::Update {
                dt_seconds: dt.as_secs_f32(),
            });

            accumulator += dt;
            while accumulator >= self.config.fixed_step {
                accumulator -= self.config.fixed_step;
                self.fixed_update();
            }

            thread::sleep(self.config.sleep_interval);
        }

        self.state = EngineState::StopRequested;
        log::info!("Engine loop exited after {} fixed step(s).", self.frames);
        Ok(())
    }

    /// One fixed step: offloads the `Render` dispatch to the pool.
    fn fixed_update(&mut self) {
        self.frames += 1;
        let frame = self.frames;
        let bus = Arc::clone(&self.bus);

        if let Some(pool) = &self.pool {
            let submitted = pool.execute(move || {
                if let Ok(bus) = bus.read() {
                    bus.dispatch(&EngineEvent::Render { frame });
                }
            });
            if let Err(e) = submitted {
                log::error!("Render dispatch rejected: {e}");
            }
        }
    }

    /// Returns a handle that can stop the loop from any thread.
    pub fn stop_handle(&self) -> StopHandle {
        StopHandle {
            flag: Arc::clone(&self.stop_flag),
        }
    }

    /// Asks the running loop to exit at its next iteration boundary.
    pub fn request_stop(&self) {
        self.stop_flag.store(true, Ordering::SeqCst);
    }

    /// Publishes `Shutdown`, stops the pool, and resets to `ShutDown`.
    ///
    /// Idempotent: a second call is a no-op.
    pub fn shutdown(&mut self) {
        if matches!(self.state, EngineState::Uninitialized | EngineState::ShutDown) {
            log::debug!("Engine not initialized; shutdown ignored.");
            return;
        }

        self.dispatch(&EngineEvent::Shutdown);

        if let Some(mut pool) = self.pool.take() {
            pool.stop();
        }

        self.state = EngineState::ShutDown;
        log::info!("Engine shut down.");
    }

    /// Returns the current lifecycle state.
    pub fn state(&self) -> EngineState {
        self.state
    }

    /// Returns the number of fixed steps executed so far.
    pub fn fixed_steps(&self) -> u64 {
        self.frames
    }

    /// Returns the shared event bus.
    pub fn bus(&self) -> Arc<RwLock<EventBus>> {
        Arc::clone(&self.bus)
    }

    fn dispatch(&self, event: &EngineEvent) {
        match self.bus.read() {
            Ok(bus) => bus.dispatch(event),
            Err(_) => log::error!("Event bus lock poisoned; dropping {:?}.", event.kind()),
        }
    }
}

impl std::fmt::Debug for EngineCore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineCore")
            .field("state", &self.state)
            .field("fixed_steps", &self.frames)
            .finish()
    }
}
