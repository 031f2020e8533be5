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

//! # Lumen Core
//!
//! Foundational crate containing traits, core types, and interface contracts
//! for the Lumen real-time application engine: the event model and bus, the
//! typed options/config stores, the drawing-surface and view contracts, and
//! the frame clock that paces the runtime loop.

#![warn(missing_docs)]

pub mod config;
pub mod draw;
pub mod event;
pub mod options;
pub mod time;
pub mod view;

pub use config::{ConfigError, ConfigStore};
pub use draw::{Color, DrawSurface, NullSurface, SurfaceWindowHandle};
pub use event::{EngineEvent, EventBus, EventKind};
pub use options::{OptionKey, OptionValue, OptionsRegistry};
pub use time::FrameClock;
pub use view::View;
