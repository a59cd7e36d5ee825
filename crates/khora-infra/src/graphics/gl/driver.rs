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

//! The slice of OpenGL the backends and the compiler drive.
//!
//! Handles are plain GL object names so drivers stay object safe and a
//! scripted driver can stand in for a real context.

use khora_core::renderer::{ClearMask, PixelFormat, Primitive, RenderApi, ShaderStage};

/// A uniform or vertex attribute reported by the driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveVariable {
    /// Name as written in the shader source.
    pub name: String,
    /// Element count (`1` unless the variable is an array).
    pub size: i32,
    /// GL type enum (`GL_FLOAT_VEC3`, `GL_SAMPLER_2D`, ...).
    pub gl_type: u32,
}

/// A current OpenGL context.
pub trait GlDriver: Send {
    /// Makes the context current on the calling thread, or releases it.
    fn make_current(&mut self, current: bool);

    /// Resizes the default framebuffer.
    fn resize(&mut self, width: u32, height: u32);

    /// Presents the default framebuffer.
    fn swap_buffers(&mut self);

    /// Creates a shader object for `stage`.
    fn create_shader(&mut self, stage: ShaderStage) -> Result<u32, String>;

    /// Sets the source of `shader` and compiles it, returning the compile status.
    fn compile_shader(&mut self, shader: u32, source: &str) -> bool;

    /// The info log of `shader`.
    fn shader_info_log(&self, shader: u32) -> String;

    /// Deletes a shader object.
    fn delete_shader(&mut self, shader: u32);

    /// Creates an empty program object.
    fn create_program(&mut self) -> Result<u32, String>;

    /// Attaches a compiled shader to a program.
    fn attach_shader(&mut self, program: u32, shader: u32);

    /// Links `program`, returning the link status.
    fn link_program(&mut self, program: u32) -> bool;

    /// The info log of `program`.
    fn program_info_log(&self, program: u32) -> String;

    /// Active vertex attributes of a linked program, in driver order.
    fn active_attributes(&self, program: u32) -> Vec<ActiveVariable>;

    /// Active uniforms of a linked program, in driver order.
    fn active_uniforms(&self, program: u32) -> Vec<ActiveVariable>;

    /// Binds an attribute name to a location. Takes effect at the next link.
    fn bind_attrib_location(&mut self, program: u32, location: u32, name: &str);

    /// The location of a uniform, `None` if it is not active.
    fn uniform_location(&self, program: u32, name: &str) -> Option<u32>;

    /// Deletes a program object.
    fn delete_program(&mut self, program: u32);

    /// Creates a 2D texture holding `data`.
    fn create_texture(
        &mut self,
        width: u32,
        height: u32,
        format: PixelFormat,
        data: &[u8],
    ) -> Result<u32, String>;

    /// Deletes a texture object.
    fn delete_texture(&mut self, texture: u32);

    /// Clears the buffers selected by `mask`.
    fn clear(&mut self, mask: ClearMask, color: [f32; 4], depth: f32, stencil: i32);

    /// Sets the viewport and depth range.
    fn viewport(&mut self, x: i32, y: i32, width: u32, height: u32, min_z: f32, max_z: f32);

    /// Draws `count` vertices with `program`.
    fn draw(&mut self, primitive: Primitive, program: u32, count: u32);

    /// Copies a framebuffer of the given size into the bound one.
    fn blit(&mut self, source: u32, width: u32, height: u32);
}

/// Creates GL contexts for the backends.
///
/// Context creation belongs to the windowing layer; applications hand the
/// backend factory a provider that knows how to do it.
pub trait GlContextProvider: Send + Sync {
    /// Creates a context for one of the GL APIs, `None` if it is unavailable.
    fn create_context(&self, api: RenderApi) -> Option<Box<dyn GlDriver>>;
}

impl<F> GlContextProvider for F
where
    F: Fn(RenderApi) -> Option<Box<dyn GlDriver>> + Send + Sync,
{
    fn create_context(&self, api: RenderApi) -> Option<Box<dyn GlDriver>> {
        self(api)
    }
}
