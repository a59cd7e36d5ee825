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

//! Compiled shader resources.

use crate::renderer::api::backend::BackendData;
use crate::renderer::api::resource::ResourceOwner;
use crate::renderer::api::util::enums::ShaderStage;
use crate::resource::ResourceUuid;

/// A compiled shader for one pipeline stage.
///
/// The GPU copy lives in whichever backend last accepted an upload; see
/// [`RenderBackend::upload_shader`](crate::renderer::backend::RenderBackend::upload_shader).
#[derive(Debug)]
pub struct Shader {
    uuid: ResourceUuid,
    stage: ShaderStage,
    pub(crate) owner: ResourceOwner,
    /// Backend-opaque handles of the uploaded copy.
    pub backend_data: BackendData,
}

impl Shader {
    /// A shader that has not been uploaded anywhere.
    pub fn new(uuid: ResourceUuid, stage: ShaderStage) -> Self {
        Self {
            uuid,
            stage,
            owner: ResourceOwner::Unbound,
            backend_data: BackendData::default(),
        }
    }

    /// Resource identifier.
    pub fn uuid(&self) -> ResourceUuid {
        self.uuid
    }

    /// Pipeline stage.
    pub fn stage(&self) -> ShaderStage {
        self.stage
    }

    /// Current owner.
    pub fn owner(&self) -> &ResourceOwner {
        &self.owner
    }
}
