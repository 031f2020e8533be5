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

//! Headless runner for the Lumen engine.
//!
//! Loads a config file, wires a placeholder idle view, and runs the loop
//! until stdin reaches end-of-file or a line is entered. Useful for smoke
//! testing the runtime on machines without a display.

use anyhow::Result;
use lumen_core::{ConfigStore, DrawSurface, View};
use lumen_runtime::{Application, EngineConfig};
use std::io::BufRead;
use std::thread;

/// A view that only counts time; stands in for real screens.
struct IdleView {
    lived_seconds: f32,
}

impl View for IdleView {
    fn on_show(&mut self) {
        log::info!("Idle view shown.");
    }

    fn on_hide(&mut self) {
        log::info!("Idle view hidden after {:.1} s.", self.lived_seconds);
    }

    fn update(&mut self, dt_seconds: f32) {
        self.lived_seconds += dt_seconds;
    }

    fn render(&mut self, _surface: &mut dyn DrawSurface) {}
}

fn main() -> Result<()> {
    env_logger::init();

    let mut config_path = String::from("lumen.cfg");
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" | "-c" => {
                if let Some(path) = args.next() {
                    config_path = path;
                } else {
                    log::warn!("'{arg}' given without a path; keeping '{config_path}'.");
                }
            }
            other => log::warn!("Unknown argument '{other}' ignored."),
        }
    }

    let mut config = ConfigStore::new();
    config.load_or_default(&config_path);

    let mut app = Application::new(EngineConfig::default());
    app.apply_config(&config);
    app.register_view("idle", Box::new(IdleView { lived_seconds: 0.0 }));
    app.request_transition("idle");

    // Stop on the first stdin line (or EOF, for piped runs).
    let stop = app.stop_handle();
    thread::spawn(move || {
        let mut line = String::new();
        let _ = std::io::stdin().lock().read_line(&mut line);
        log::info!("Stop requested from stdin.");
        stop.request_stop();
    });

    log::info!("Runner starting; press Enter to stop.");
    app.run()?;
    app.shutdown();
    Ok(())
}
