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

use crate::renderer::api::{
    context::RenderContext,
    core::{AdapterId, Resolution},
    program::Program,
    resource::{Drawable, RenderTarget},
    shader::Shader,
    texture::Texture,
    util::enums::{ColorSpace, PixelFormat, RenderApi},
};
use std::any::Any;

/// The fixed capability set every backend variant provides.
///
/// A [`RenderBackend`](crate::renderer::backend::RenderBackend) owns exactly one
/// implementation of this trait behind a dedicated ops lock and only calls it
/// with that lock held, so the methods never run concurrently for one backend.
/// Format and drawable settings live under a separate state lock.
/// Lifecycle bookkeeping such as thread binding, resource ownership and table
/// maintenance is done by the caller; implementations only talk to the
/// graphics API.
///
/// `construct` and `destruct` may fail. Every other operation is assumed to
/// succeed or to be sequenced correctly by the caller.
pub trait BackendOps: Send {
    /// The concrete API this implementation talks to.
    fn api(&self) -> RenderApi;

    /// Connects to the graphics API.
    ///
    /// # Returns
    ///
    /// `false` if the API is unavailable on this machine. The registry then
    /// treats the API exactly as if it were unsupported.
    fn construct(&mut self) -> bool;

    /// Releases the connection and every GPU object still held.
    fn destruct(&mut self);

    /// Lists the display adapters the API can drive.
    fn enumerate_adapters(&self) -> Vec<AdapterId>;

    /// Lists the display modes of one adapter.
    fn enumerate_modes(&self, adapter: AdapterId) -> Vec<Resolution>;

    /// Binds a presentable surface.
    ///
    /// # Arguments
    ///
    /// * `drawable`: The surface to render into.
    /// * `format`: The pixel format chosen before the surface was offered.
    /// * `color_space`: The color space chosen with the format.
    ///
    /// # Returns
    ///
    /// `false` if the surface cannot be used, in which case nothing changed.
    fn set_drawable(&mut self, drawable: &Drawable, format: PixelFormat, color_space: ColorSpace)
        -> bool;

    /// Makes the API usable from the calling thread.
    fn enable_thread(&mut self);

    /// Releases the API from the calling thread.
    fn disable_thread(&mut self);

    /// Consumes sorted render contexts.
    ///
    /// Each context has already been sorted; implementations walk
    /// [`RenderContext::sorted`] for each context in slice order.
    fn dispatch(&mut self, target: &RenderTarget, contexts: &[&RenderContext]);

    /// Presents the framebuffer.
    fn flip(&mut self);

    /// Creates the GPU copy of a shader from its compiled payload.
    fn upload_shader(&mut self, shader: &mut Shader, blob: &[u8]) -> bool;

    /// Creates the GPU copy of a program from two already uploaded shaders.
    fn upload_program(&mut self, program: &mut Program, vertex: &Shader, pixel: &Shader) -> bool;

    /// Creates the GPU copy of a texture from raw pixel data.
    fn upload_texture(&mut self, texture: &mut Texture, data: &[u8]) -> bool;

    /// Frees the GPU copy of a shader.
    fn deallocate_shader(&mut self, shader: &mut Shader);

    /// Frees the GPU copy of a program.
    fn deallocate_program(&mut self, program: &mut Program);

    /// Frees the GPU copy of a texture.
    fn deallocate_texture(&mut self, texture: &mut Texture);

    /// Writes the backend handle of `texture` into a uniform block at `offset`.
    fn parameter_bind_texture(&self, block: &mut [u8], offset: usize, texture: &Texture);

    /// Writes the backend handle of `target` into a uniform block at `offset`.
    fn parameter_bind_target(&self, block: &mut [u8], offset: usize, target: &RenderTarget);

    /// Allows downcasting to the concrete variant.
    fn as_any(&self) -> &dyn Any;

    /// Allows mutable downcasting to the concrete variant.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}
