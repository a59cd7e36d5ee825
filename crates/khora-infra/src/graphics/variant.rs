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

//! The closed set of backend implementations.

use super::gl::{GlBackend, GlDriver};
use super::null::NullBackend;
use super::stub::StubBackend;
use khora_core::renderer::{
    AdapterId, BackendOps, ColorSpace, Drawable, PixelFormat, Program, RenderApi, RenderContext,
    RenderTarget, Resolution, Shader, Texture,
};
use std::any::Any;

/// Every backend this build knows, dispatched by match.
#[derive(Debug)]
pub enum BackendVariant {
    /// Draws nothing.
    Null(NullBackend),
    /// OpenGL 2, OpenGL 4 or OpenGL ES 2.
    Gl(GlBackend),
    /// An API that is not implemented yet.
    Stub(StubBackend),
}

impl BackendVariant {
    /// The GL context of a constructed GL backend.
    pub fn gl_driver_mut(&mut self) -> Option<&mut (dyn GlDriver + 'static)> {
        match self {
            BackendVariant::Gl(backend) => backend.driver_mut(),
            _ => None,
        }
    }
}

macro_rules! delegate {
    ($self:ident, $backend:ident => $call:expr) => {
        match $self {
            BackendVariant::Null($backend) => $call,
            BackendVariant::Gl($backend) => $call,
            BackendVariant::Stub($backend) => $call,
        }
    };
}

impl BackendOps for BackendVariant {
    fn api(&self) -> RenderApi {
        delegate!(self, b => b.api())
    }

    fn construct(&mut self) -> bool {
        delegate!(self, b => b.construct())
    }

    fn destruct(&mut self) {
        delegate!(self, b => b.destruct())
    }

    fn enumerate_adapters(&self) -> Vec<AdapterId> {
        delegate!(self, b => b.enumerate_adapters())
    }

    fn enumerate_modes(&self, adapter: AdapterId) -> Vec<Resolution> {
        delegate!(self, b => b.enumerate_modes(adapter))
    }

    fn set_drawable(
        &mut self,
        drawable: &Drawable,
        format: PixelFormat,
        color_space: ColorSpace,
    ) -> bool {
        delegate!(self, b => b.set_drawable(drawable, format, color_space))
    }

    fn enable_thread(&mut self) {
        delegate!(self, b => b.enable_thread())
    }

    fn disable_thread(&mut self) {
        delegate!(self, b => b.disable_thread())
    }

    fn dispatch(&mut self, target: &RenderTarget, contexts: &[&RenderContext]) {
        delegate!(self, b => b.dispatch(target, contexts))
    }

    fn flip(&mut self) {
        delegate!(self, b => b.flip())
    }

    fn upload_shader(&mut self, shader: &mut Shader, blob: &[u8]) -> bool {
        delegate!(self, b => b.upload_shader(shader, blob))
    }

    fn upload_program(&mut self, program: &mut Program, vertex: &Shader, pixel: &Shader) -> bool {
        delegate!(self, b => b.upload_program(program, vertex, pixel))
    }

    fn upload_texture(&mut self, texture: &mut Texture, data: &[u8]) -> bool {
        delegate!(self, b => b.upload_texture(texture, data))
    }

    fn deallocate_shader(&mut self, shader: &mut Shader) {
        delegate!(self, b => b.deallocate_shader(shader))
    }

    fn deallocate_program(&mut self, program: &mut Program) {
        delegate!(self, b => b.deallocate_program(program))
    }

    fn deallocate_texture(&mut self, texture: &mut Texture) {
        delegate!(self, b => b.deallocate_texture(texture))
    }

    fn parameter_bind_texture(&self, block: &mut [u8], offset: usize, texture: &Texture) {
        delegate!(self, b => b.parameter_bind_texture(block, offset, texture))
    }

    fn parameter_bind_target(&self, block: &mut [u8], offset: usize, target: &RenderTarget) {
        delegate!(self, b => b.parameter_bind_target(block, offset, target))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
