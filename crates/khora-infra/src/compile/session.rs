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

//! A short-lived backend used to compile one sub-platform.

use crate::graphics::gl::GlDriver;
use crate::graphics::BackendVariant;
use khora_core::renderer::{ColorSpace, Drawable, PixelFormat, RenderApi, RenderError};
use khora_core::{BackendRegistry, RenderBackend, ThreadBinding};
use std::sync::Arc;

const DRAWABLE_SIZE: u32 = 100;

/// Owns a backend with a hidden drawable for the duration of one sub-platform.
///
/// Dropping the session releases the backend from the compiling thread and
/// deallocates it, whether or not the compile succeeded.
pub(crate) struct CompileSession<'r> {
    registry: &'r mut BackendRegistry,
    binding: ThreadBinding,
    backend: Arc<RenderBackend>,
}

impl<'r> CompileSession<'r> {
    /// Allocates a backend for `api`, falling back as needed, and binds an offscreen drawable.
    pub fn open(
        registry: &'r mut BackendRegistry,
        api: RenderApi,
        platform: u64,
    ) -> Result<Self, RenderError> {
        let mut binding = ThreadBinding::new();
        let backend = registry.allocate(api, true, &mut binding)?;
        let mut session = Self {
            registry,
            binding,
            backend,
        };
        session
            .backend
            .set_format(PixelFormat::R8G8B8X8, ColorSpace::Linear)?;
        session.backend.set_drawable(
            &mut session.binding,
            Drawable::offscreen(DRAWABLE_SIZE, DRAWABLE_SIZE),
        )?;
        session.backend.set_resource_platform(platform);
        Ok(session)
    }

    pub fn backend(&self) -> &Arc<RenderBackend> {
        &self.backend
    }

    /// Runs `f` against the backend's GL context. `None` if it has none.
    pub fn with_driver<R>(&self, f: impl FnOnce(&mut dyn GlDriver) -> R) -> Option<R> {
        self.backend.with_ops(|ops| {
            ops.as_any_mut()
                .downcast_mut::<BackendVariant>()
                .and_then(BackendVariant::gl_driver_mut)
                .map(|driver| f(driver))
        })
    }
}

impl Drop for CompileSession<'_> {
    fn drop(&mut self) {
        self.binding.disable_thread(&self.backend);
        self.registry.deallocate(&self.backend);
    }
}
