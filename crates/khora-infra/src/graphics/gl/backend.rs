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

//! The OpenGL 2, OpenGL 4 and OpenGL ES 2 backends.

use super::conversions::{attribute_name, unpack_color};
use super::driver::{GlContextProvider, GlDriver};
use khora_core::renderer::{
    AdapterId, BackendOps, ColorSpace, Drawable, PixelFormat, Program, RenderApi, RenderCommand,
    RenderContext, RenderTarget, Resolution, Shader, Texture,
};
use std::any::Any;
use std::sync::Arc;

/// A backend driving one GL context.
///
/// The context comes from the [`GlContextProvider`] at construction time and
/// lives until `destruct`. Every GL object handle is kept in the first slot of
/// the resource's backend data.
pub struct GlBackend {
    api: RenderApi,
    provider: Arc<dyn GlContextProvider>,
    driver: Option<Box<dyn GlDriver>>,
    drawable: Option<Drawable>,
    format: Option<PixelFormat>,
}

impl GlBackend {
    /// An unconstructed backend for one of the GL APIs.
    pub fn new(api: RenderApi, provider: Arc<dyn GlContextProvider>) -> Self {
        Self {
            api,
            provider,
            driver: None,
            drawable: None,
            format: None,
        }
    }

    /// The live context, `None` before `construct` or after `destruct`.
    pub fn driver_mut(&mut self) -> Option<&mut (dyn GlDriver + 'static)> {
        self.driver.as_deref_mut()
    }

    fn execute(driver: &mut dyn GlDriver, command: &RenderCommand) {
        match *command {
            RenderCommand::Null => {}
            RenderCommand::Clear {
                mask,
                color,
                depth,
                stencil,
            } => driver.clear(mask, unpack_color(color), depth, stencil as i32),
            RenderCommand::Viewport {
                x,
                y,
                width,
                height,
                min_z,
                max_z,
            } => driver.viewport(x as i32, y as i32, width, height, min_z, max_z),
            RenderCommand::Render {
                primitive,
                count,
                program,
                ..
            } => driver.draw(primitive, program as u32, count),
            RenderCommand::Blit {
                source,
                width,
                height,
            } => driver.blit(source as u32, width, height),
        }
    }
}

fn write_handle(block: &mut [u8], offset: usize, handle: u64) {
    let bytes = (handle as u32).to_le_bytes();
    let slot = offset
        .checked_add(bytes.len())
        .and_then(|end| block.get_mut(offset..end));
    match slot {
        Some(slot) => slot.copy_from_slice(&bytes),
        None => log::warn!(
            "Parameter offset {offset} is outside a {} byte uniform block",
            block.len()
        ),
    }
}

impl BackendOps for GlBackend {
    fn api(&self) -> RenderApi {
        self.api
    }

    fn construct(&mut self) -> bool {
        match self.provider.create_context(self.api) {
            Some(driver) => {
                log::debug!("Created {} context", self.api);
                self.driver = Some(driver);
                true
            }
            None => {
                log::info!("Unable to create {} context", self.api);
                false
            }
        }
    }

    fn destruct(&mut self) {
        if let Some(mut driver) = self.driver.take() {
            driver.make_current(false);
            log::debug!("Destroyed {} context", self.api);
        }
        self.drawable = None;
        self.format = None;
    }

    fn enumerate_adapters(&self) -> Vec<AdapterId> {
        vec![AdapterId::DEFAULT]
    }

    fn enumerate_modes(&self, adapter: AdapterId) -> Vec<Resolution> {
        if adapter != AdapterId::DEFAULT {
            return Vec::new();
        }
        match (self.drawable, self.format) {
            (Some(drawable), Some(pixel_format)) => vec![Resolution {
                id: 0,
                width: drawable.width,
                height: drawable.height,
                refresh: 60,
                pixel_format,
                color_space: ColorSpace::Linear,
            }],
            _ => Vec::new(),
        }
    }

    fn set_drawable(
        &mut self,
        drawable: &Drawable,
        format: PixelFormat,
        _color_space: ColorSpace,
    ) -> bool {
        let Some(driver) = self.driver.as_deref_mut() else {
            return false;
        };
        if drawable.width == 0 || drawable.height == 0 {
            return false;
        }
        driver.make_current(true);
        driver.resize(drawable.width, drawable.height);
        self.drawable = Some(*drawable);
        self.format = Some(format);
        true
    }

    fn enable_thread(&mut self) {
        if let Some(driver) = self.driver.as_deref_mut() {
            driver.make_current(true);
        }
    }

    fn disable_thread(&mut self) {
        if let Some(driver) = self.driver.as_deref_mut() {
            driver.make_current(false);
        }
    }

    fn dispatch(&mut self, _target: &RenderTarget, contexts: &[&RenderContext]) {
        let Some(driver) = self.driver.as_deref_mut() else {
            return;
        };
        for context in contexts {
            for (key, command) in context.sorted() {
                log::trace!("{} dispatch {key:#018x}: {command:?}", self.api);
                Self::execute(driver, command);
            }
        }
    }

    fn flip(&mut self) {
        if let Some(driver) = self.driver.as_deref_mut() {
            driver.swap_buffers();
        }
    }

    fn upload_shader(&mut self, shader: &mut Shader, blob: &[u8]) -> bool {
        let Some(driver) = self.driver.as_deref_mut() else {
            return false;
        };
        let Ok(source) = std::str::from_utf8(blob) else {
            log::error!("Shader {} payload is not valid GLSL text", shader.uuid());
            return false;
        };
        let handle = match driver.create_shader(shader.stage()) {
            Ok(handle) => handle,
            Err(err) => {
                log::error!("Unable to create shader object: {err}");
                return false;
            }
        };
        if !driver.compile_shader(handle, source) {
            log::error!(
                "Unable to compile shader {}: {}",
                shader.uuid(),
                driver.shader_info_log(handle)
            );
            driver.delete_shader(handle);
            return false;
        }
        if shader.backend_data[0] != 0 {
            driver.delete_shader(shader.backend_data[0] as u32);
        }
        shader.backend_data[0] = handle as u64;
        true
    }

    fn upload_program(&mut self, program: &mut Program, vertex: &Shader, pixel: &Shader) -> bool {
        let Some(driver) = self.driver.as_deref_mut() else {
            return false;
        };
        let (vs, ps) = (vertex.backend_data[0] as u32, pixel.backend_data[0] as u32);
        if vs == 0 || ps == 0 {
            log::error!("Program {} linked from shaders that are not uploaded", program.uuid());
            return false;
        }
        let handle = match driver.create_program() {
            Ok(handle) => handle,
            Err(err) => {
                log::error!("Unable to create program object: {err}");
                return false;
            }
        };
        driver.attach_shader(handle, vs);
        driver.attach_shader(handle, ps);
        for attribute in &program.attributes.attributes {
            if let Some(name) = attribute_name(attribute.binding) {
                driver.bind_attrib_location(handle, attribute.binding.location(), name);
            }
        }
        if !driver.link_program(handle) {
            log::error!(
                "Unable to link program {}: {}",
                program.uuid(),
                driver.program_info_log(handle)
            );
            driver.delete_program(handle);
            return false;
        }
        if program.backend_data[0] != 0 {
            driver.delete_program(program.backend_data[0] as u32);
        }
        program.backend_data[0] = handle as u64;
        true
    }

    fn upload_texture(&mut self, texture: &mut Texture, data: &[u8]) -> bool {
        let Some(driver) = self.driver.as_deref_mut() else {
            return false;
        };
        if data.len() < texture.byte_size() {
            log::error!(
                "Texture {} needs {} bytes, got {}",
                texture.uuid(),
                texture.byte_size(),
                data.len()
            );
            return false;
        }
        match driver.create_texture(texture.width, texture.height, texture.format, data) {
            Ok(handle) => {
                if texture.backend_data[0] != 0 {
                    driver.delete_texture(texture.backend_data[0] as u32);
                }
                texture.backend_data[0] = handle as u64;
                true
            }
            Err(err) => {
                log::error!("Unable to create texture {}: {err}", texture.uuid());
                false
            }
        }
    }

    fn deallocate_shader(&mut self, shader: &mut Shader) {
        if let Some(driver) = self.driver.as_deref_mut() {
            if shader.backend_data[0] != 0 {
                driver.delete_shader(shader.backend_data[0] as u32);
            }
        }
        shader.backend_data[0] = 0;
    }

    fn deallocate_program(&mut self, program: &mut Program) {
        if let Some(driver) = self.driver.as_deref_mut() {
            if program.backend_data[0] != 0 {
                driver.delete_program(program.backend_data[0] as u32);
            }
        }
        program.backend_data[0] = 0;
    }

    fn deallocate_texture(&mut self, texture: &mut Texture) {
        if let Some(driver) = self.driver.as_deref_mut() {
            if texture.backend_data[0] != 0 {
                driver.delete_texture(texture.backend_data[0] as u32);
            }
        }
        texture.backend_data[0] = 0;
    }

    fn parameter_bind_texture(&self, block: &mut [u8], offset: usize, texture: &Texture) {
        write_handle(block, offset, texture.backend_data[0]);
    }

    fn parameter_bind_target(&self, block: &mut [u8], offset: usize, target: &RenderTarget) {
        write_handle(block, offset, target.backend_data[0]);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl std::fmt::Debug for GlBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlBackend")
            .field("api", &self.api)
            .field("constructed", &self.driver.is_some())
            .field("drawable", &self.drawable)
            .finish_non_exhaustive()
    }
}
