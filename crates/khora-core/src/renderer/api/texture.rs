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

//! Texture resources.

use crate::renderer::api::backend::BackendData;
use crate::renderer::api::resource::ResourceOwner;
use crate::renderer::api::util::enums::PixelFormat;
use crate::resource::ResourceUuid;

/// A two-dimensional texture.
#[derive(Debug)]
pub struct Texture {
    uuid: ResourceUuid,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel layout of the uploaded data.
    pub format: PixelFormat,
    pub(crate) owner: ResourceOwner,
    /// Backend-opaque handles of the uploaded copy.
    pub backend_data: BackendData,
}

impl Texture {
    /// A texture that has not been uploaded anywhere.
    pub fn new(uuid: ResourceUuid, width: u32, height: u32, format: PixelFormat) -> Self {
        Self {
            uuid,
            width,
            height,
            format,
            owner: ResourceOwner::Unbound,
            backend_data: BackendData::default(),
        }
    }

    /// Resource identifier.
    pub fn uuid(&self) -> ResourceUuid {
        self.uuid
    }

    /// Current owner.
    pub fn owner(&self) -> &ResourceOwner {
        &self.owner
    }

    /// Bytes a full mip-0 upload must contain.
    pub fn byte_size(&self) -> usize {
        self.width as usize * self.height as usize * self.format.bytes_per_pixel()
    }
}
