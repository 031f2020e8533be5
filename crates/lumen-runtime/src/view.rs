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

//! Registry and transition logic for named views.

use lumen_core::{DrawSurface, View};
use std::collections::HashMap;

struct ViewSlot {
    view: Box<dyn View>,
    active: bool,
    visible: bool,
}

/// Tracks registered views and the single current one.
///
/// At steady state exactly zero or one view is current. A transition fully
/// deactivates the outgoing view (its `on_hide` hook runs, visibility is
/// cleared) before the incoming view's `on_show` hook runs. Showing or
/// hiding an unregistered name is reported and otherwise a no-op.
#[derive(Default)]
pub struct ViewStateMachine {
    views: HashMap<String, ViewSlot>,
    current: Option<String>,
}

impl ViewStateMachine {
    /// Creates an empty machine with no current view.
    pub fn new() -> Self {
        Self {
            views: HashMap::new(),
            current: None,
        }
    }

    /// Registers `view` under `name`, inactive and hidden.
    ///
    /// Registering over an existing name replaces the mapping; callers that
    /// don't intend an overwrite must unregister first.
    pub fn register(&mut self, name: impl Into<String>, view: Box<dyn View>) {
        let name = name.into();
        let slot = ViewSlot {
            view,
            active: false,
            visible: false,
        };
        if self.views.insert(name.clone(), slot).is_some() {
            log::debug!("View '{name}' re-registered; previous mapping replaced.");
        } else {
            log::debug!("View '{name}' registered.");
        }
    }

    /// Removes the view registered under `name`, clearing current-view if
    /// it pointed there.
    pub fn unregister(&mut self, name: &str) -> bool {
        let removed = self.views.remove(name).is_some();
        if removed && self.current.as_deref() == Some(name) {
            self.current = None;
        }
        removed
    }

    /// Makes `name` the current view.
    ///
    /// The previous current view is deactivated first (hide hook, cleared
    /// visibility); then the target activates. An unregistered `name` is
    /// warned about, leaves the current view untouched, and never fails.
    pub fn show(&mut self, name: &str) {
        if !self.views.contains_key(name) {
            log::warn!("Cannot show unregistered view '{name}'.");
            return;
        }

        if let Some(previous) = self.current.take() {
            // Self-transition still re-runs the full hide/show cycle.
            self.deactivate(&previous);
        }

        if let Some(slot) = self.views.get_mut(name) {
            slot.active = true;
            slot.visible = true;
            slot.view.on_show();
        }
        self.current = Some(name.to_string());
        log::debug!("View '{name}' is now current.");
    }

    /// Deactivates `name` without requiring it to be current.
    ///
    /// The current-view marker is cleared only if it pointed at `name`.
    pub fn hide(&mut self, name: &str) {
        if !self.views.contains_key(name) {
            log::warn!("Cannot hide unregistered view '{name}'.");
            return;
        }
        self.deactivate(name);
        if self.current.as_deref() == Some(name) {
            self.current = None;
        }
    }

    /// Deactivates every registered view and clears the current view.
    pub fn hide_all(&mut self) {
        let names: Vec<String> = self.views.keys().cloned().collect();
        for name in names {
            self.deactivate(&name);
        }
        self.current = None;
    }

    fn deactivate(&mut self, name: &str) {
        if let Some(slot) = self.views.get_mut(name) {
            if slot.active {
                slot.active = false;
                slot.visible = false;
                slot.view.on_hide();
            }
        }
    }

    /// Dispatches the per-frame update hook to active views only.
    pub fn update_views(&mut self, dt_seconds: f32) {
        for slot in self.views.values_mut() {
            if slot.active {
                slot.view.update(dt_seconds);
            }
        }
    }

    /// Renders views that are both active and visible.
    ///
    /// Iteration order over simultaneously visible views is unordered;
    /// callers needing draw-order control should keep a single active view,
    /// which is the common case.
    pub fn render(&mut self, surface: &mut dyn DrawSurface) {
        for slot in self.views.values_mut() {
            if slot.active && slot.visible {
                slot.view.render(surface);
            }
        }
    }

    /// Returns the name of the current view, if any.
    pub fn current_view(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Returns `true` if `name` is registered and active.
    pub fn is_active(&self, name: &str) -> bool {
        self.views.get(name).is_some_and(|slot| slot.active)
    }

    /// Returns the number of registered views.
    pub fn len(&self) -> usize {
        self.views.len()
    }

    /// Returns `true` if no views are registered.
    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }
}

impl std::fmt::Debug for ViewStateMachine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewStateMachine")
            .field("views", &self.views.len())
            .field("current", &self.current)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_core::NullSurface;
    use std::sync::{Arc, Mutex};

    /// Records every lifecycle hook invocation into a shared journal.
    struct JournalingView {
        name: &'static str,
        journal: Arc<Mutex<Vec<String>>>,
    }

    impl JournalingView {
        fn new(name: &'static str, journal: Arc<Mutex<Vec<String>>>) -> Box<Self> {
            Box::new(Self { name, journal })
        }

        fn log(&self, what: &str) {
            self.journal
                .lock()
                .unwrap()
                .push(format!("{}:{}", self.name, what));
        }
    }

    impl View for JournalingView {
        fn on_show(&mut self) {
            self.log("show");
        }
        fn on_hide(&mut self) {
            self.log("hide");
        }
        fn update(&mut self, _dt_seconds: f32) {
            self.log("update");
        }
        fn render(&mut self, _surface: &mut dyn DrawSurface) {
            self.log("render");
        }
    }

    fn machine_with(names: &[&'static str]) -> (ViewStateMachine, Arc<Mutex<Vec<String>>>) {
        let journal = Arc::new(Mutex::new(Vec::new()));
        let mut machine = ViewStateMachine::new();
        for name in names {
            machine.register(*name, JournalingView::new(name, Arc::clone(&journal)));
        }
        (machine, journal)
    }

    #[test]
    fn show_activates_and_sets_current() {
        let (mut machine, journal) = machine_with(&["menu"]);
        machine.show("menu");

        assert_eq!(machine.current_view(), Some("menu"));
        assert!(machine.is_active("menu"));
        assert_eq!(*journal.lock().unwrap(), vec!["menu:show"]);
    }

    #[test]
    fn transition_hides_outgoing_before_showing_incoming() {
        let (mut machine, journal) = machine_with(&["menu", "game"]);
        machine.show("menu");
        machine.show("game");

        assert_eq!(machine.current_view(), Some("game"));
        assert!(!machine.is_active("menu"));
        assert_eq!(
            *journal.lock().unwrap(),
            vec!["menu:show", "menu:hide", "game:show"]
        );
    }

    #[test]
    fn show_unregistered_is_a_no_op() {
        let (mut machine, journal) = machine_with(&["menu"]);
        machine.show("menu");
        machine.show("missing");

        assert_eq!(machine.current_view(), Some("menu"));
        assert_eq!(*journal.lock().unwrap(), vec!["menu:show"]);
    }

    #[test]
    fn hide_clears_current_only_when_it_matches() {
        let (mut machine, _) = machine_with(&["menu", "overlay"]);
        machine.show("menu");

        machine.hide("overlay");
        assert_eq!(machine.current_view(), Some("menu"));

        machine.hide("menu");
        assert_eq!(machine.current_view(), None);
        assert!(!machine.is_active("menu"));
    }

    #[test]
    fn hide_all_deactivates_everything() {
        let (mut machine, _) = machine_with(&["a", "b", "c"]);
        machine.show("a");
        machine.hide_all();

        assert_eq!(machine.current_view(), None);
        for name in ["a", "b", "c"] {
            assert!(!machine.is_active(name));
        }
    }

    #[test]
    fn update_reaches_active_views_only() {
        let (mut machine, journal) = machine_with(&["menu", "game"]);
        machine.show("game");
        journal.lock().unwrap().clear();

        machine.update_views(0.016);
        assert_eq!(*journal.lock().unwrap(), vec!["game:update"]);
    }

    #[test]
    fn render_draws_active_and_visible_views() {
        let (mut machine, journal) = machine_with(&["menu"]);
        let mut surface = NullSurface::with_size(640, 480);

        machine.render(&mut surface);
        assert!(journal.lock().unwrap().is_empty());

        machine.show("menu");
        journal.lock().unwrap().clear();
        machine.render(&mut surface);
        assert_eq!(*journal.lock().unwrap(), vec!["menu:render"]);
    }

    #[test]
    fn register_over_existing_name_replaces() {
        let (mut machine, journal) = machine_with(&["menu"]);
        machine.register("menu", JournalingView::new("menu2", Arc::clone(&journal)));
        assert_eq!(machine.len(), 1);

        machine.show("menu");
        assert_eq!(*journal.lock().unwrap(), vec!["menu2:show"]);
    }

    #[test]
    fn unregister_clears_current() {
        let (mut machine, _) = machine_with(&["menu"]);
        machine.show("menu");

        assert!(machine.unregister("menu"));
        assert_eq!(machine.current_view(), None);
        assert!(machine.is_empty());
        assert!(!machine.unregister("menu"));
    }
}
