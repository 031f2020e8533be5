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

//! The capability contract implemented by every UI/game screen.

use crate::draw::DrawSurface;

/// A named, independently activatable screen.
///
/// Concrete views implement this small set of lifecycle methods instead of
/// inheriting from a renderable base type; the view state machine in the
/// runtime crate holds them behind the trait. `Send` because transition
/// handling can touch views from bus-subscriber context.
pub trait View: Send {
    /// Called when the view becomes the current one, after the previous
    /// current view (if any) has fully deactivated.
    fn on_show(&mut self);

    /// Called when the view is deactivated.
    fn on_hide(&mut self);

    /// Called once per loop iteration while the view is active.
    fn update(&mut self, dt_seconds: f32);

    /// Called for active and visible views when a frame is prepared.
    fn render(&mut self, surface: &mut dyn DrawSurface);
}
