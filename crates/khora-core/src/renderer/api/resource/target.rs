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

//! Render targets: the framebuffer and offscreen surfaces commands draw into.

use crate::renderer::api::backend::{BackendData, BackendId};
use crate::renderer::api::util::enums::{ColorSpace, PixelFormat};

/// What a render target writes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    /// The backend's default framebuffer, presented on flip.
    Framebuffer,
    /// An offscreen texture that can later be sampled or blitted.
    Texture,
}

/// A surface render commands draw into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderTarget {
    /// Surface kind.
    pub kind: TargetKind,
    /// Backend the target belongs to.
    pub backend: Option<BackendId>,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel layout, unset until the owning backend picks one.
    pub pixel_format: Option<PixelFormat>,
    /// Color space.
    pub color_space: ColorSpace,
    /// Backend-opaque handles.
    pub backend_data: BackendData,
}

impl RenderTarget {
    /// The zero-sized framebuffer target of a freshly constructed backend.
    pub fn framebuffer(backend: BackendId) -> Self {
        Self {
            kind: TargetKind::Framebuffer,
            backend: Some(backend),
            width: 0,
            height: 0,
            pixel_format: None,
            color_space: ColorSpace::Linear,
            backend_data: BackendData::default(),
        }
    }

    /// An offscreen texture target.
    pub fn texture(
        width: u32,
        height: u32,
        pixel_format: PixelFormat,
        color_space: ColorSpace,
    ) -> Self {
        Self {
            kind: TargetKind::Texture,
            backend: None,
            width,
            height,
            pixel_format: Some(pixel_format),
            color_space,
            backend_data: BackendData::default(),
        }
    }
}
