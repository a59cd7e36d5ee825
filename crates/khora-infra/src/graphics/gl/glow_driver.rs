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

//! [`GlDriver`] over a `glow` context.

use super::conversions::{GlPixelFormat, IntoGl};
use super::driver::{ActiveVariable, GlDriver};
use glow::HasContext;
use khora_core::renderer::{ClearMask, PixelFormat, Primitive, ShaderStage};
use std::num::NonZeroU32;

/// The windowing side of a GL context: whatever created it and owns its surface.
pub trait GlSurface: Send {
    /// Makes the context current on the calling thread, or releases it.
    fn make_current(&mut self, current: bool);
    /// Resizes the surface.
    fn resize(&mut self, width: u32, height: u32);
    /// Presents the back buffer.
    fn swap_buffers(&mut self);
}

/// A surface with nothing to present, for contexts that never reach a screen.
#[derive(Debug, Default)]
pub struct HeadlessSurface;

impl GlSurface for HeadlessSurface {
    fn make_current(&mut self, _current: bool) {}
    fn resize(&mut self, _width: u32, _height: u32) {}
    fn swap_buffers(&mut self) {}
}

/// Drives a loaded `glow` context.
pub struct GlowDriver {
    gl: glow::Context,
    surface: Box<dyn GlSurface>,
}

// SAFETY: a GL context is only ever used from the thread it is current on.
// The owning backend serializes every call behind its ops lock and makes the
// context current through `make_current` before use, so moving the driver
// between threads never lets two threads touch the context at once.
unsafe impl Send for GlowDriver {}

fn shader(handle: u32) -> Option<glow::NativeShader> {
    NonZeroU32::new(handle).map(glow::NativeShader)
}

fn program(handle: u32) -> Option<glow::NativeProgram> {
    NonZeroU32::new(handle).map(glow::NativeProgram)
}

impl GlowDriver {
    /// Wraps a context whose function pointers are already loaded.
    pub fn new(gl: glow::Context, surface: Box<dyn GlSurface>) -> Self {
        // Core profiles refuse to draw without a bound vertex array.
        unsafe {
            if let Ok(vao) = gl.create_vertex_array() {
                gl.bind_vertex_array(Some(vao));
            }
        }
        Self { gl, surface }
    }

    /// The wrapped context.
    pub fn context(&self) -> &glow::Context {
        &self.gl
    }
}

impl std::fmt::Debug for GlowDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlowDriver")
            .field("version", self.gl.version())
            .finish_non_exhaustive()
    }
}

impl GlDriver for GlowDriver {
    fn make_current(&mut self, current: bool) {
        self.surface.make_current(current);
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.surface.resize(width, height);
    }

    fn swap_buffers(&mut self) {
        self.surface.swap_buffers();
    }

    fn create_shader(&mut self, stage: ShaderStage) -> Result<u32, String> {
        unsafe { self.gl.create_shader(stage.into_gl()) }.map(|s| s.0.get())
    }

    fn compile_shader(&mut self, handle: u32, source: &str) -> bool {
        let Some(shader) = shader(handle) else {
            return false;
        };
        unsafe {
            self.gl.shader_source(shader, source);
            self.gl.compile_shader(shader);
            self.gl.get_shader_compile_status(shader)
        }
    }

    fn shader_info_log(&self, handle: u32) -> String {
        shader(handle)
            .map(|shader| unsafe { self.gl.get_shader_info_log(shader) })
            .unwrap_or_default()
    }

    fn delete_shader(&mut self, handle: u32) {
        if let Some(shader) = shader(handle) {
            unsafe { self.gl.delete_shader(shader) };
        }
    }

    fn create_program(&mut self) -> Result<u32, String> {
        unsafe { self.gl.create_program() }.map(|p| p.0.get())
    }

    fn attach_shader(&mut self, program_handle: u32, shader_handle: u32) {
        if let (Some(program), Some(shader)) = (program(program_handle), shader(shader_handle)) {
            unsafe { self.gl.attach_shader(program, shader) };
        }
    }

    fn link_program(&mut self, handle: u32) -> bool {
        let Some(program) = program(handle) else {
            return false;
        };
        unsafe {
            self.gl.link_program(program);
            self.gl.get_program_link_status(program)
        }
    }

    fn program_info_log(&self, handle: u32) -> String {
        program(handle)
            .map(|program| unsafe { self.gl.get_program_info_log(program) })
            .unwrap_or_default()
    }

    fn active_attributes(&self, handle: u32) -> Vec<ActiveVariable> {
        let Some(program) = program(handle) else {
            return Vec::new();
        };
        unsafe {
            (0..self.gl.get_active_attributes(program))
                .filter_map(|index| self.gl.get_active_attribute(program, index))
                .map(|attribute| ActiveVariable {
                    name: attribute.name,
                    size: attribute.size,
                    gl_type: attribute.atype,
                })
                .collect()
        }
    }

    fn active_uniforms(&self, handle: u32) -> Vec<ActiveVariable> {
        let Some(program) = program(handle) else {
            return Vec::new();
        };
        unsafe {
            (0..self.gl.get_active_uniforms(program))
                .filter_map(|index| self.gl.get_active_uniform(program, index))
                .map(|uniform| ActiveVariable {
                    name: uniform.name,
                    size: uniform.size,
                    gl_type: uniform.utype,
                })
                .collect()
        }
    }

    fn bind_attrib_location(&mut self, handle: u32, location: u32, name: &str) {
        if let Some(program) = program(handle) {
            unsafe { self.gl.bind_attrib_location(program, location, name) };
        }
    }

    fn uniform_location(&self, handle: u32, name: &str) -> Option<u32> {
        let program = program(handle)?;
        unsafe { self.gl.get_uniform_location(program, name) }.map(|location| location.0)
    }

    fn delete_program(&mut self, handle: u32) {
        if let Some(program) = program(handle) {
            unsafe { self.gl.delete_program(program) };
        }
    }

    fn create_texture(
        &mut self,
        width: u32,
        height: u32,
        format: PixelFormat,
        data: &[u8],
    ) -> Result<u32, String> {
        let GlPixelFormat {
            internal,
            format,
            ty,
        } = format.into_gl();
        unsafe {
            let texture = self.gl.create_texture()?;
            self.gl.bind_texture(glow::TEXTURE_2D, Some(texture));
            self.gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_MIN_FILTER,
                glow::LINEAR as i32,
            );
            self.gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_MAG_FILTER,
                glow::LINEAR as i32,
            );
            self.gl.tex_image_2d(
                glow::TEXTURE_2D,
                0,
                internal,
                width as i32,
                height as i32,
                0,
                format,
                ty,
                glow::PixelUnpackData::Slice(Some(data)),
            );
            self.gl.bind_texture(glow::TEXTURE_2D, None);
            Ok(texture.0.get())
        }
    }

    fn delete_texture(&mut self, handle: u32) {
        if let Some(texture) = NonZeroU32::new(handle).map(glow::NativeTexture) {
            unsafe { self.gl.delete_texture(texture) };
        }
    }

    fn clear(&mut self, mask: ClearMask, color: [f32; 4], depth: f32, stencil: i32) {
        let [r, g, b, a] = color;
        unsafe {
            self.gl.clear_color(r, g, b, a);
            self.gl.clear_depth_f32(depth);
            self.gl.clear_stencil(stencil);
            self.gl.clear(mask.into_gl());
        }
    }

    fn viewport(&mut self, x: i32, y: i32, width: u32, height: u32, min_z: f32, max_z: f32) {
        unsafe {
            self.gl.viewport(x, y, width as i32, height as i32);
            self.gl.depth_range_f32(min_z, max_z);
        }
    }

    fn draw(&mut self, primitive: Primitive, program_handle: u32, count: u32) {
        unsafe {
            self.gl.use_program(program(program_handle));
            self.gl.draw_arrays(primitive.into_gl(), 0, count as i32);
        }
    }

    fn blit(&mut self, source: u32, width: u32, height: u32) {
        let framebuffer = NonZeroU32::new(source).map(glow::NativeFramebuffer);
        let (w, h) = (width as i32, height as i32);
        unsafe {
            self.gl.bind_framebuffer(glow::READ_FRAMEBUFFER, framebuffer);
            self.gl.blit_framebuffer(
                0,
                0,
                w,
                h,
                0,
                0,
                w,
                h,
                glow::COLOR_BUFFER_BIT,
                glow::NEAREST,
            );
            self.gl.bind_framebuffer(glow::READ_FRAMEBUFFER, None);
        }
    }
}

