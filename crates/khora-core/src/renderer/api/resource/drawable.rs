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

//! Surfaces a backend can present into.

use crate::renderer::api::core::AdapterId;

/// Opaque handle to a native window owned by the windowing layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowHandle(pub u64);

/// What kind of surface a drawable is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawableKind {
    /// A hidden surface, used by tools that need a live context but no output.
    Offscreen,
    /// A native window.
    Window {
        /// The window being drawn into.
        window: WindowHandle,
        /// Caller-defined tag.
        tag: u32,
    },
    /// Exclusive fullscreen on an adapter.
    Fullscreen {
        /// Adapter driving the display.
        adapter: AdapterId,
        /// Refresh rate in hertz.
        refresh: u32,
    },
}

/// A presentable surface bound to a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Drawable {
    /// Surface kind.
    pub kind: DrawableKind,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Drawable {
    /// A hidden surface of the given size.
    pub fn offscreen(width: u32, height: u32) -> Self {
        Self {
            kind: DrawableKind::Offscreen,
            width,
            height,
        }
    }

    /// A surface covering a native window.
    pub fn window(window: WindowHandle, tag: u32, width: u32, height: u32) -> Self {
        Self {
            kind: DrawableKind::Window { window, tag },
            width,
            height,
        }
    }

    /// An exclusive fullscreen surface.
    pub fn fullscreen(adapter: AdapterId, width: u32, height: u32, refresh: u32) -> Self {
        Self {
            kind: DrawableKind::Fullscreen { adapter, refresh },
            width,
            height,
        }
    }
}
