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

//! A backend that accepts everything and draws nothing.

use khora_core::renderer::{
    AdapterId, BackendOps, ColorSpace, Drawable, PixelFormat, Program, RenderApi, RenderContext,
    RenderTarget, Resolution, Shader, Texture,
};
use std::any::Any;

/// The last stop of every fallback chain.
///
/// Uploads hand out increasing fake handles so callers can tell resources
/// apart; dispatch only counts what it was given.
#[derive(Debug, Default)]
pub struct NullBackend {
    next_handle: u64,
    dispatched: u64,
    flips: u64,
}

impl NullBackend {
    /// An unconstructed null backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands consumed by dispatch so far.
    pub fn dispatched_commands(&self) -> u64 {
        self.dispatched
    }

    /// Flips so far.
    pub fn flips(&self) -> u64 {
        self.flips
    }

    fn handle(&mut self) -> u64 {
        self.next_handle += 1;
        self.next_handle
    }
}

impl BackendOps for NullBackend {
    fn api(&self) -> RenderApi {
        RenderApi::Null
    }

    fn construct(&mut self) -> bool {
        true
    }

    fn destruct(&mut self) {}

    fn enumerate_adapters(&self) -> Vec<AdapterId> {
        vec![AdapterId::DEFAULT]
    }

    fn enumerate_modes(&self, _adapter: AdapterId) -> Vec<Resolution> {
        vec![Resolution {
            id: 0,
            width: 800,
            height: 600,
            refresh: 60,
            pixel_format: PixelFormat::R8G8B8A8,
            color_space: ColorSpace::Linear,
        }]
    }

    fn set_drawable(
        &mut self,
        _drawable: &Drawable,
        _format: PixelFormat,
        _color_space: ColorSpace,
    ) -> bool {
        true
    }

    fn enable_thread(&mut self) {}

    fn disable_thread(&mut self) {}

    fn dispatch(&mut self, _target: &RenderTarget, contexts: &[&RenderContext]) {
        for context in contexts {
            self.dispatched += context.sorted_len() as u64;
        }
    }

    fn flip(&mut self) {
        self.flips += 1;
    }

    fn upload_shader(&mut self, shader: &mut Shader, _blob: &[u8]) -> bool {
        shader.backend_data[0] = self.handle();
        true
    }

    fn upload_program(&mut self, program: &mut Program, _vertex: &Shader, _pixel: &Shader) -> bool {
        program.backend_data[0] = self.handle();
        true
    }

    fn upload_texture(&mut self, texture: &mut Texture, _data: &[u8]) -> bool {
        texture.backend_data[0] = self.handle();
        true
    }

    fn deallocate_shader(&mut self, shader: &mut Shader) {
        shader.backend_data[0] = 0;
    }

    fn deallocate_program(&mut self, program: &mut Program) {
        program.backend_data[0] = 0;
    }

    fn deallocate_texture(&mut self, texture: &mut Texture) {
        texture.backend_data[0] = 0;
    }

    fn parameter_bind_texture(&self, _block: &mut [u8], _offset: usize, _texture: &Texture) {}

    fn parameter_bind_target(&self, _block: &mut [u8], _offset: usize, _target: &RenderTarget) {}

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
