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

//! Placeholders for APIs this build cannot drive.

use khora_core::renderer::{
    AdapterId, BackendOps, ColorSpace, Drawable, PixelFormat, Program, RenderApi, RenderContext,
    RenderTarget, Resolution, Shader, Texture,
};
use std::any::Any;

/// A backend whose construction always fails.
///
/// Stands in for the DirectX, OpenGL ES 3 and console APIs so that requesting
/// them walks the fallback chain instead of finding no implementation.
#[derive(Debug)]
pub struct StubBackend {
    api: RenderApi,
}

impl StubBackend {
    /// A stub for `api`.
    pub fn new(api: RenderApi) -> Self {
        Self { api }
    }
}

impl BackendOps for StubBackend {
    fn api(&self) -> RenderApi {
        self.api
    }

    fn construct(&mut self) -> bool {
        log::warn!("{} render backend is not yet implemented", self.api);
        false
    }

    fn destruct(&mut self) {}

    fn enumerate_adapters(&self) -> Vec<AdapterId> {
        Vec::new()
    }

    fn enumerate_modes(&self, _adapter: AdapterId) -> Vec<Resolution> {
        Vec::new()
    }

    fn set_drawable(
        &mut self,
        _drawable: &Drawable,
        _format: PixelFormat,
        _color_space: ColorSpace,
    ) -> bool {
        false
    }

    fn enable_thread(&mut self) {}

    fn disable_thread(&mut self) {}

    fn dispatch(&mut self, _target: &RenderTarget, _contexts: &[&RenderContext]) {}

    fn flip(&mut self) {}

    fn upload_shader(&mut self, _shader: &mut Shader, _blob: &[u8]) -> bool {
        false
    }

    fn upload_program(
        &mut self,
        _program: &mut Program,
        _vertex: &Shader,
        _pixel: &Shader,
    ) -> bool {
        false
    }

    fn upload_texture(&mut self, _texture: &mut Texture, _data: &[u8]) -> bool {
        false
    }

    fn deallocate_shader(&mut self, _shader: &mut Shader) {}

    fn deallocate_program(&mut self, _program: &mut Program) {}

    fn deallocate_texture(&mut self, _texture: &mut Texture) {}

    fn parameter_bind_texture(&self, _block: &mut [u8], _offset: usize, _texture: &Texture) {}

    fn parameter_bind_target(&self, _block: &mut [u8], _offset: usize, _target: &RenderTarget) {}

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
