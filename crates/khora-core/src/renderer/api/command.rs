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

//! Defines the render commands recorded into a [`RenderContext`].
//!
//! Commands are plain `Copy` values so a producer thread can fill a reserved
//! slot in place without allocating.
//!
//! [`RenderContext`]: crate::renderer::api::context::RenderContext

use crate::renderer::api::util::enums::Primitive;

/// Which buffers a clear command touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ClearMask(pub u8);

impl ClearMask {
    /// Color buffer.
    pub const COLOR: ClearMask = ClearMask(1 << 0);
    /// Depth buffer.
    pub const DEPTH: ClearMask = ClearMask(1 << 1);
    /// Stencil buffer.
    pub const STENCIL: ClearMask = ClearMask(1 << 2);
    /// Every buffer.
    pub const ALL: ClearMask = ClearMask(0b111);

    /// Returns `true` if every bit of `other` is set.
    pub fn contains(self, other: ClearMask) -> bool {
        self.0 & other.0 == other.0
    }
}

/// A single draw-time operation consumed by a backend's dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum RenderCommand {
    /// Does nothing. Slots hold this until a producer fills them.
    #[default]
    Null,
    /// Clears buffers of the current target.
    Clear {
        /// Buffers to clear.
        mask: ClearMask,
        /// Packed RGBA8 clear color.
        color: u32,
        /// Depth clear value.
        depth: f32,
        /// Stencil clear value.
        stencil: u32,
    },
    /// Sets the viewport rectangle.
    Viewport {
        /// Left edge in pixels.
        x: u32,
        /// Bottom edge in pixels.
        y: u32,
        /// Width in pixels.
        width: u32,
        /// Height in pixels.
        height: u32,
        /// Near depth.
        min_z: f32,
        /// Far depth.
        max_z: f32,
    },
    /// Draws primitives with a program.
    Render {
        /// Topology.
        primitive: Primitive,
        /// Number of indices or vertices.
        count: u32,
        /// Backend handle of the program.
        program: u64,
        /// Backend handle of the vertex buffer.
        vertex_buffer: u64,
        /// Backend handle of the index buffer.
        index_buffer: u64,
        /// Backend handle of the parameter block.
        parameters: u64,
    },
    /// Copies a whole render target into the current one.
    Blit {
        /// Backend handle of the source target.
        source: u64,
        /// Width of the copied region.
        width: u32,
        /// Height of the copied region.
        height: u32,
    },
}

impl RenderCommand {
    /// A clear command for the color buffer only.
    pub fn clear_color(color: u32) -> Self {
        RenderCommand::Clear {
            mask: ClearMask::COLOR,
            color,
            depth: 1.0,
            stencil: 0,
        }
    }

    /// A viewport covering `width` x `height` from the origin.
    pub fn viewport(width: u32, height: u32) -> Self {
        RenderCommand::Viewport {
            x: 0,
            y: 0,
            width,
            height,
            min_z: 0.0,
            max_z: 1.0,
        }
    }
}
