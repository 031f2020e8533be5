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

//! # Lumen Runtime
//!
//! The coordination substrate of the Lumen engine: the timed update loop
//! and lifecycle ([`EngineCore`]), the worker pool that offloads render
//! dispatch ([`WorkerPool`]), the view state machine, and the
//! [`Application`] composition root that wires them onto the event bus.

pub mod app;
pub mod engine;
pub mod pool;
pub mod view;

pub use app::{AppOption, Application};
pub use engine::{EngineConfig, EngineCore, EngineError, EngineState, StopHandle};
pub use pool::{PoolError, TaskHandle, WorkerPool};
pub use view::ViewStateMachine;
