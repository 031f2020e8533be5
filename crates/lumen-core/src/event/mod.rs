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

//! Provides the primitives for event-driven communication.
//!
//! Events are modeled as one closed enum, [`EngineEvent`], rather than as
//! open runtime-typed payloads: every lifecycle stage the engine publishes
//! is a variant here, and the [`EventBus`] routes on the stable
//! [`EventKind`] tag of each variant. Keeping the set closed makes dispatch
//! an O(1) map lookup plus a linear handler scan, with no reflection-like
//! machinery involved.

mod bus;

pub use self::bus::{EventBus, EventHandler};

/// A lifecycle or application event published through the [`EventBus`].
///
/// Instances live only for the duration of a `dispatch` call; the bus never
/// retains them.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// Published once when the engine finishes initialization.
    Init,
    /// Published every loop iteration with the wall-clock seconds elapsed
    /// since the previous iteration.
    Update {
        /// Elapsed wall-clock time since the previous Update, in seconds.
        dt_seconds: f32,
    },
    /// Published at the fixed-step rate, from a worker-pool thread.
    ///
    /// Handlers for this event may run concurrently with the next `Update`
    /// dispatch on the loop thread and must be safe to do so.
    Render {
        /// Monotonically increasing fixed-step counter.
        frame: u64,
    },
    /// A request to make the named view the current one.
    TransitionRequested {
        /// Name the target view was registered under.
        view: String,
    },
    /// Published once when the engine shuts down.
    Shutdown,
}

impl EngineEvent {
    /// Returns the stable tag identifying this event's variant.
    pub fn kind(&self) -> EventKind {
        match self {
            EngineEvent::Init => EventKind::Init,
            EngineEvent::Update { .. } => EventKind::Update,
            EngineEvent::Render { .. } => EventKind::Render,
            EngineEvent::TransitionRequested { .. } => EventKind::TransitionRequested,
            EngineEvent::Shutdown => EventKind::Shutdown,
        }
    }
}

/// Stable dispatch tag for each [`EngineEvent`] variant.
///
/// Subscriptions are keyed by this tag, so a handler registered for
/// `EventKind::Update` sees every `EngineEvent::Update` and nothing else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Tag for [`EngineEvent::Init`].
    Init,
    /// Tag for [`EngineEvent::Update`].
    Update,
    /// Tag for [`EngineEvent::Render`].
    Render,
    /// Tag for [`EngineEvent::TransitionRequested`].
    TransitionRequested,
    /// Tag for [`EngineEvent::Shutdown`].
    Shutdown,
}
