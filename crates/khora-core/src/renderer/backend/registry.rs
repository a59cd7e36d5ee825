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

//! Backend selection along the API fallback chain.

use super::{RenderBackend, ThreadBinding};
use crate::renderer::api::core::RenderConfig;
use crate::renderer::api::util::enums::RenderApi;
use crate::renderer::error::RenderError;
use crate::renderer::traits::{BackendFactory, BackendOps};
use std::sync::Arc;

/// Owns every live backend and resolves API requests to concrete backends.
///
/// The registry is not internally synchronized: callers that share it
/// between threads wrap it in their own lock.
pub struct BackendRegistry {
    factory: Box<dyn BackendFactory>,
    config: RenderConfig,
    live: Vec<Arc<RenderBackend>>,
}

impl BackendRegistry {
    /// Creates an empty registry.
    pub fn new(factory: impl BackendFactory + 'static, config: RenderConfig) -> Self {
        Self {
            factory: Box::new(factory),
            config,
            live: Vec::new(),
        }
    }

    /// The active configuration.
    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Enables or disables an API for future allocations.
    pub fn set_api_disabled(&mut self, api: RenderApi, disabled: bool) {
        self.config.disabled_apis.retain(|&a| a != api);
        if disabled {
            self.config.disabled_apis.push(api);
        }
    }

    /// Every live backend, in no particular order.
    pub fn backends(&self) -> &[Arc<RenderBackend>] {
        &self.live
    }

    fn construct(&self, api: RenderApi) -> Option<Box<dyn BackendOps>> {
        let mut ops = self.factory.create(api)?;
        if ops.construct() {
            Some(ops)
        } else {
            log::info!("Failed to initialize {api} render backend");
            ops.destruct();
            None
        }
    }

    /// Creates a backend for `api`, walking the fallback chain if allowed.
    ///
    /// Disabled APIs are skipped without being attempted. Abstract APIs
    /// (`Default`, `OpenGL`, `DirectX`, `Gles`) always resolve to their first
    /// concrete member. When a concrete API fails to construct, the next API
    /// in the chain is tried if `allow_fallback` is set; otherwise the call
    /// fails at once.
    ///
    /// On success the backend is registered, receives the configured resource
    /// platform and concurrency, and becomes current on `binding`.
    pub fn allocate(
        &mut self,
        api: RenderApi,
        allow_fallback: bool,
        binding: &mut ThreadBinding,
    ) -> Result<Arc<RenderBackend>, RenderError> {
        let requested = api;
        let mut api = api;

        let ops = loop {
            while api != RenderApi::Unknown && self.config.is_disabled(api) {
                log::debug!("Render API {api} is disabled, falling back");
                api = api.fallback();
            }
            if api == RenderApi::Unknown {
                log::warn!("No supported and enabled render api found, giving up");
                return Err(RenderError::NoBackendAvailable { requested });
            }
            if api.is_abstract() {
                api = api.fallback();
                continue;
            }
            if let Some(ops) = self.construct(api) {
                break ops;
            }
            if !allow_fallback {
                log::warn!("Requested render api not supported: {api}");
                return Err(RenderError::BackendRefused { api });
            }
            api = api.fallback();
        };

        let backend = Arc::new(RenderBackend::new(ops, self.config.table_buckets));
        backend.set_resource_platform(self.config.resource_platform);
        if let Some(threads) = self.config.max_concurrency {
            backend.set_max_concurrency(threads);
        }
        self.live.push(Arc::clone(&backend));
        binding.enable_thread(&backend);

        log::info!(
            "Allocated {} render backend (requested {requested})",
            backend.api()
        );
        Ok(backend)
    }

    /// Destroys a backend and forgets it.
    ///
    /// Runs the destruct hook, empties the resource tables, resets the
    /// framebuffer and drawable, then removes the backend from the live list.
    /// Calling it again for the same backend does nothing. Bindings that still
    /// name the backend are left untouched.
    pub fn deallocate(&mut self, backend: &Arc<RenderBackend>) {
        if !backend.teardown() {
            return;
        }
        if let Some(index) = self.live.iter().position(|b| b.id() == backend.id()) {
            self.live.swap_remove(index);
        }
        log::debug!("Deallocated {} render backend", backend.api());
    }
}

impl Drop for BackendRegistry {
    fn drop(&mut self) {
        for backend in std::mem::take(&mut self.live) {
            backend.teardown();
        }
    }
}

impl std::fmt::Debug for BackendRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendRegistry")
            .field("config", &self.config)
            .field("live", &self.live)
            .finish_non_exhaustive()
    }
}
