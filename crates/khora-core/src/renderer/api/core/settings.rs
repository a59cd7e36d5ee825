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

//! Global configuration for the rendering system.

use crate::renderer::api::util::enums::RenderApi;
use serde::{Deserialize, Serialize};

/// Default number of buckets in each per-backend resource table.
pub const DEFAULT_TABLE_BUCKETS: usize = 256;

/// Default command capacity of a pipeline step's render context.
pub const DEFAULT_CONTEXT_CAPACITY: usize = 1024;

/// Configuration consumed by the backend registry and pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// APIs the registry must never construct; allocation skips over them.
    pub disabled_apis: Vec<RenderApi>,
    /// Caller platform bits merged into every backend's resource platform tag.
    pub resource_platform: u64,
    /// Worker fan-out applied once to each new backend, if set.
    pub max_concurrency: Option<usize>,
    /// Fixed bucket count of the shader, program and texture tables.
    pub table_buckets: usize,
    /// Command capacity used when a pipeline step does not give one.
    pub context_capacity: usize,
}

impl RenderConfig {
    /// Returns `true` if `api` has been administratively disabled.
    pub fn is_disabled(&self, api: RenderApi) -> bool {
        self.disabled_apis.contains(&api)
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            disabled_apis: Vec::new(),
            resource_platform: 0,
            max_concurrency: None,
            table_buckets: DEFAULT_TABLE_BUCKETS,
            context_capacity: DEFAULT_CONTEXT_CAPACITY,
        }
    }
}
