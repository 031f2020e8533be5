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

//! The application composition root.
//!
//! There are no global singletons anywhere in the engine; this type is
//! where everything gets constructed and wired together explicitly, which
//! also makes fully isolated instances in tests trivial.

use crate::engine::{EngineConfig, EngineCore, EngineError, StopHandle};
use crate::view::ViewStateMachine;
use lumen_core::{
    ConfigStore, EngineEvent, EventBus, EventKind, OptionKey, OptionsRegistry, View,
};
use std::sync::{Arc, Mutex, RwLock};

/// Well-known application options, stored in the app's options registry.
#[derive(Debug, Clone, Copy)]
pub enum AppOption {
    /// Window width in pixels (int).
    WindowWidth,
    /// Window height in pixels (int).
    WindowHeight,
    /// Vertical-sync toggle (bool).
    VSync,
    /// Window/application title (text).
    Title,
    /// Render scale factor (float).
    RenderScale,
}

impl OptionKey for AppOption {
    fn ordinal(self) -> u32 {
        self as u32
    }
}

/// Composes the engine core, the view state machine, and the options
/// registry, and wires lifecycle handlers onto the shared event bus.
///
/// Wiring done at construction:
/// - `Update` drives the active views' per-frame hooks,
/// - `TransitionRequested` is forwarded to [`ViewStateMachine::show`],
/// - `Shutdown` hides every view.
pub struct Application {
    engine: EngineCore,
    bus: Arc<RwLock<EventBus>>,
    views: Arc<Mutex<ViewStateMachine>>,
    options: OptionsRegistry<AppOption>,
}

impl Application {
    /// Builds and wires an application around `config`.
    pub fn new(config: EngineConfig) -> Self {
        let bus = Arc::new(RwLock::new(EventBus::new()));
        let views = Arc::new(Mutex::new(ViewStateMachine::new()));
        let engine = EngineCore::new(config, Arc::clone(&bus));

        {
            let mut bus = bus.write().expect("fresh bus lock");

            let for_update = Arc::clone(&views);
            bus.subscribe(EventKind::Update, move |event| {
                if let EngineEvent::Update { dt_seconds } = event {
                    if let Ok(mut machine) = for_update.lock() {
                        machine.update_views(*dt_seconds);
                    }
                }
            });

            let for_transition = Arc::clone(&views);
            bus.subscribe(EventKind::TransitionRequested, move |event| {
                if let EngineEvent::TransitionRequested { view } = event {
                    if let Ok(mut machine) = for_transition.lock() {
                        machine.show(view);
                    }
                }
            });

            let for_shutdown = Arc::clone(&views);
            bus.subscribe(EventKind::Shutdown, move |_| {
                if let Ok(mut machine) = for_shutdown.lock() {
                    machine.hide_all();
                }
            });
        }

        Self {
            engine,
            bus,
            views,
            options: OptionsRegistry::new(),
        }
    }

    /// Copies the well-known keys out of a loaded config store into the
    /// options registry. Absent keys keep the registry untouched so option
    /// reads fall back to their call-site defaults.
    pub fn apply_config(&mut self, config: &ConfigStore) {
        if let Some(v) = config.get("Window.Width") {
            self.options.set(AppOption::WindowWidth, v.clone());
        }
        if let Some(v) = config.get("Window.Height") {
            self.options.set(AppOption::WindowHeight, v.clone());
        }
        if let Some(v) = config.get("Window.Title") {
            self.options.set(AppOption::Title, v.clone());
        }
        if let Some(v) = config.get("Render.VSync") {
            self.options.set(AppOption::VSync, v.clone());
        }
        if let Some(v) = config.get("Render.Scale") {
            self.options.set(AppOption::RenderScale, v.clone());
        }
        log::info!("Applied config; {} option(s) set.", self.options.len());
    }

    /// Registers a view with the view state machine.
    pub fn register_view(&self, name: impl Into<String>, view: Box<dyn View>) {
        if let Ok(mut machine) = self.views.lock() {
            machine.register(name, view);
        }
    }

    /// Publishes a transition request for `name` through the bus.
    pub fn request_transition(&self, name: impl Into<String>) {
        if let Ok(bus) = self.bus.read() {
            bus.dispatch(&EngineEvent::TransitionRequested { view: name.into() });
        }
    }

    /// Initializes the engine and runs the loop until a stop is requested.
    pub fn run(&mut self) -> Result<(), EngineError> {
        self.engine.initialize();
        self.engine.run()
    }

    /// Shuts the engine down. Idempotent.
    pub fn shutdown(&mut self) {
        self.engine.shutdown();
    }

    /// Returns a handle that stops the loop from any thread.
    pub fn stop_handle(&self) -> StopHandle {
        self.engine.stop_handle()
    }

    /// Returns the shared event bus.
    pub fn bus(&self) -> Arc<RwLock<EventBus>> {
        Arc::clone(&self.bus)
    }

    /// Returns the shared view state machine.
    pub fn views(&self) -> Arc<Mutex<ViewStateMachine>> {
        Arc::clone(&self.views)
    }

    /// Returns the options registry.
    pub fn options(&self) -> &OptionsRegistry<AppOption> {
        &self.options
    }

    /// Returns the options registry for mutation.
    ///
    /// The application is the registry's single writer; share reads, not
    /// this reference.
    pub fn options_mut(&mut self) -> &mut OptionsRegistry<AppOption> {
        &mut self.options
    }

    /// Returns the engine core.
    pub fn engine(&self) -> &EngineCore {
        &self.engine
    }
}

impl std::fmt::Debug for Application {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Application")
            .field("engine", &self.engine)
            .field("options", &self.options.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_core::DrawSurface;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;
    use std::time::Duration;

    struct CountingView {
        shows: Arc<AtomicUsize>,
        updates: Arc<AtomicUsize>,
    }

    impl View for CountingView {
        fn on_show(&mut self) {
            self.shows.fetch_add(1, Ordering::SeqCst);
        }
        fn on_hide(&mut self) {}
        fn update(&mut self, _dt_seconds: f32) {
            self.updates.fetch_add(1, Ordering::SeqCst);
        }
        fn render(&mut self, _surface: &mut dyn DrawSurface) {}
    }

    fn fast_config() -> EngineConfig {
        EngineConfig {
            worker_threads: Some(1),
            fixed_step: Duration::from_millis(5),
            sleep_interval: Duration::from_millis(1),
        }
    }

    #[test]
    fn transition_request_reaches_view_machine() {
        let app = Application::new(fast_config());
        let shows = Arc::new(AtomicUsize::new(0));
        app.register_view(
            "menu",
            Box::new(CountingView {
                shows: Arc::clone(&shows),
                updates: Arc::new(AtomicUsize::new(0)),
            }),
        );

        app.request_transition("menu");

        assert_eq!(shows.load(Ordering::SeqCst), 1);
        let views = app.views();
        assert_eq!(views.lock().unwrap().current_view(), Some("menu"));
    }

    #[test]
    fn update_events_drive_active_views_through_the_loop() {
        let mut app = Application::new(fast_config());
        let updates = Arc::new(AtomicUsize::new(0));
        app.register_view(
            "game",
            Box::new(CountingView {
                shows: Arc::new(AtomicUsize::new(0)),
                updates: Arc::clone(&updates),
            }),
        );
        app.request_transition("game");

        let stop = app.stop_handle();
        let stopper = thread::spawn(move || {
            thread::sleep(Duration::from_millis(60));
            stop.request_stop();
        });
        app.run().expect("run should succeed");
        stopper.join().expect("stopper thread");
        app.shutdown();

        assert!(updates.load(Ordering::SeqCst) > 0);
    }

    #[test]
    fn shutdown_hides_all_views() {
        let mut app = Application::new(fast_config());
        let shows = Arc::new(AtomicUsize::new(0));
        app.register_view(
            "menu",
            Box::new(CountingView {
                shows: Arc::clone(&shows),
                updates: Arc::new(AtomicUsize::new(0)),
            }),
        );
        app.request_transition("menu");

        // Initialize so shutdown publishes the Shutdown event.
        app.engine.initialize();
        app.shutdown();

        let views = app.views();
        let machine = views.lock().unwrap();
        assert_eq!(machine.current_view(), None);
        assert!(!machine.is_active("menu"));
    }

    #[test]
    fn apply_config_fills_known_options() {
        let mut app = Application::new(fast_config());
        let mut config = ConfigStore::new();
        config.parse("Window {\n Width = 1280\n Title = \"demo\"\n}\nRender {\n VSync = true\n Scale = 1.5\n}\n");

        app.apply_config(&config);

        let options = app.options();
        assert_eq!(options.get(AppOption::WindowWidth, 0i64), 1280);
        assert_eq!(options.get(AppOption::Title, String::new()), "demo");
        assert!(options.get(AppOption::VSync, false));
        assert_eq!(options.get(AppOption::RenderScale, 1.0f64), 1.5);
        // Height was absent; the call-site default applies.
        assert_eq!(options.get(AppOption::WindowHeight, 720i64), 720);
    }
}
