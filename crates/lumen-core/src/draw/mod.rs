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

//! The drawing-surface contract consumed by views.
//!
//! Concrete rendering backends (OpenGL, Vulkan, DirectX, ...) live outside
//! this workspace; they plug in by implementing [`DrawSurface`]. The engine
//! itself only ever talks to the trait, so backends are swappable at this
//! boundary. A [`NullSurface`] is provided for tests and headless runs.

use raw_window_handle::{HasDisplayHandle, HasWindowHandle};
use std::sync::Arc;

/// Combines the windowing handle traits a graphics backend needs into a
/// single trait usable as a trait object.
pub trait WindowHandle: HasWindowHandle + HasDisplayHandle {}

// Blanket impl: anything satisfying the subtraits is a WindowHandle.
impl<T: HasWindowHandle + HasDisplayHandle> WindowHandle for T {}

/// A shareable, thread-safe window handle for backend initialization.
pub type SurfaceWindowHandle = Arc<dyn WindowHandle + Send + Sync>;

/// An RGBA color with 8-bit channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel (255 = opaque).
    pub a: u8,
}

impl Color {
    /// Opaque white.
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    /// Opaque black.
    pub const BLACK: Color = Color::rgb(0, 0, 0);

    /// Creates an opaque color from RGB channels.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }
}

/// Abstraction over a 2D drawing backend.
///
/// Implementations are out of scope for the engine core; anything that can
/// target a window handle and draw rectangles and text qualifies.
pub trait DrawSurface {
    /// Binds the surface to a window. Must be called before drawing.
    fn init(&mut self, handle: SurfaceWindowHandle);

    /// Draws a filled rectangle in surface coordinates.
    fn draw_rect(&mut self, x: i32, y: i32, width: u32, height: u32, color: Color);

    /// Draws a line of text with its baseline origin at (`x`, `y`).
    fn draw_text(&mut self, x: i32, y: i32, text: &str, color: Color);

    /// Returns the surface width in pixels.
    fn width(&self) -> u32;

    /// Returns the surface height in pixels.
    fn height(&self) -> u32;
}

/// A backend that draws nothing and records what it was asked to do.
///
/// Used by tests and by the headless runner, where no real window exists.
#[derive(Debug, Default)]
pub struct NullSurface {
    commands: Vec<String>,
    size: (u32, u32),
}

impl NullSurface {
    /// Creates a surface reporting the given logical size.
    pub fn with_size(width: u32, height: u32) -> Self {
        Self {
            commands: Vec::new(),
            size: (width, height),
        }
    }

    /// Returns the draw calls recorded so far, oldest first.
    pub fn commands(&self) -> &[String] {
        &self.commands
    }

    /// Forgets all recorded draw calls.
    pub fn clear(&mut self) {
        self.commands.clear();
    }
}

impl DrawSurface for NullSurface {
    fn init(&mut self, _handle: SurfaceWindowHandle) {
        self.commands.push("init".to_string());
    }

    fn draw_rect(&mut self, x: i32, y: i32, width: u32, height: u32, _color: Color) {
        self.commands
            .push(format!("rect {x},{y} {width}x{height}"));
    }

    fn draw_text(&mut self, x: i32, y: i32, text: &str, _color: Color) {
        self.commands.push(format!("text {x},{y} '{text}'"));
    }

    fn width(&self) -> u32 {
        self.size.0
    }

    fn height(&self) -> u32 {
        self.size.1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_surface_records_draw_calls_in_order() {
        let mut surface = NullSurface::with_size(320, 200);
        surface.draw_rect(0, 0, 320, 200, Color::BLACK);
        surface.draw_text(10, 20, "hello", Color::WHITE);

        assert_eq!(surface.width(), 320);
        assert_eq!(surface.height(), 200);
        assert_eq!(
            surface.commands(),
            &["rect 0,0 320x200".to_string(), "text 10,20 'hello'".to_string()]
        );

        surface.clear();
        assert!(surface.commands().is_empty());
    }
}
