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

//! Adapter and display mode information.

use crate::renderer::api::util::enums::{ColorSpace, PixelFormat};

/// Index of a display adapter as reported by a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct AdapterId(pub u32);

impl AdapterId {
    /// The adapter the system considers primary.
    pub const DEFAULT: AdapterId = AdapterId(0);
}

/// A display mode an adapter can drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    /// Mode identifier, unique per adapter.
    pub id: u32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Refresh rate in hertz.
    pub refresh: u32,
    /// Pixel layout of the mode.
    pub pixel_format: PixelFormat,
    /// Color space of the mode.
    pub color_space: ColorSpace,
}
