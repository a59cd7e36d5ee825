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

//! Upload and deallocation of shaders, programs and textures.
//!
//! All three kinds follow one protocol. If another backend holds the resource,
//! that backend frees its copy first and ownership is cleared. The target
//! backend's hook then runs and, only if it succeeds, the target becomes the
//! owner. A resource is therefore never attached to two backends, and moving it
//! between backends never leaks the old copy.
//!
//! Handles written by a previous owner are cleared before the target hook
//! runs, even when that owner has already been destroyed, so a backend only
//! ever sees handles it created itself.
//!
//! A program linked through [`RenderBackend::link_program`] keeps its two
//! shaders alive and frees them along with itself once nothing else uses them.

use super::{RenderBackend, SharedProgram, SharedShader, SharedTexture};
use crate::renderer::api::{
    backend::BackendData, program::Program, resource::ResourceOwner, shader::Shader,
    texture::Texture,
};
use crate::renderer::error::ResourceError;
use crate::renderer::traits::BackendOps;
use crate::resource::ResourceUuid;
use std::sync::{Arc, PoisonError};

trait Owned {
    fn uuid(&self) -> ResourceUuid;
    fn owner_mut(&mut self) -> &mut ResourceOwner;
    fn backend_data_mut(&mut self) -> &mut BackendData;
}

impl Owned for Shader {
    fn uuid(&self) -> ResourceUuid {
        Shader::uuid(self)
    }
    fn owner_mut(&mut self) -> &mut ResourceOwner {
        &mut self.owner
    }
    fn backend_data_mut(&mut self) -> &mut BackendData {
        &mut self.backend_data
    }
}

impl Owned for Program {
    fn uuid(&self) -> ResourceUuid {
        Program::uuid(self)
    }
    fn owner_mut(&mut self) -> &mut ResourceOwner {
        &mut self.owner
    }
    fn backend_data_mut(&mut self) -> &mut BackendData {
        &mut self.backend_data
    }
}

impl Owned for Texture {
    fn uuid(&self) -> ResourceUuid {
        Texture::uuid(self)
    }
    fn owner_mut(&mut self) -> &mut ResourceOwner {
        &mut self.owner
    }
    fn backend_data_mut(&mut self) -> &mut BackendData {
        &mut self.backend_data
    }
}

impl RenderBackend {
    fn migrate<R: Owned>(
        self: &Arc<Self>,
        resource: &mut R,
        release: fn(&RenderBackend, &mut R),
        upload: impl FnOnce(&mut dyn BackendOps, &mut R) -> bool,
    ) -> Result<(), ResourceError> {
        if !resource.owner_mut().is_owned_by(self) {
            match resource.owner_mut().backend() {
                Some(previous) => {
                    log::debug!(
                        "Moving {} from {} backend to {} backend",
                        resource.uuid(),
                        previous.api(),
                        self.api()
                    );
                    release(&previous, resource);
                }
                None if resource.owner_mut().is_bound() => log::debug!(
                    "Dropping stale handles of {}, its previous backend is gone",
                    resource.uuid()
                ),
                None => {}
            }
            *resource.backend_data_mut() = BackendData::default();
        }
        *resource.owner_mut() = ResourceOwner::Unbound;

        let accepted = {
            let mut ops = self.lock_ops();
            upload(&mut **ops, resource)
        };
        if accepted {
            *resource.owner_mut() = ResourceOwner::bound(self);
            Ok(())
        } else {
            log::error!("{} backend rejected upload of {}", self.api(), resource.uuid());
            Err(ResourceError::UploadRejected {
                api: self.api(),
                uuid: resource.uuid(),
            })
        }
    }

    /// Uploads a compiled shader payload, taking ownership of the shader.
    pub fn upload_shader(
        self: &Arc<Self>,
        shader: &mut Shader,
        blob: &[u8],
    ) -> Result<(), ResourceError> {
        self.migrate(shader, RenderBackend::release_shader, |ops, shader| {
            ops.upload_shader(shader, blob)
        })
    }

    /// Uploads a program linked from two shaders already owned by this backend.
    pub fn upload_program(
        self: &Arc<Self>,
        program: &mut Program,
        vertex: &Shader,
        pixel: &Shader,
    ) -> Result<(), ResourceError> {
        self.migrate(program, RenderBackend::release_program, |ops, program| {
            ops.upload_program(program, vertex, pixel)
        })
    }

    /// Uploads `program` from two shared shaders and keeps both alive with it.
    ///
    /// Shaders attached by an earlier link are released if the program held
    /// the last reference to them.
    pub fn link_program(
        self: &Arc<Self>,
        program: &mut Program,
        vertex: SharedShader,
        pixel: SharedShader,
    ) -> Result<(), ResourceError> {
        {
            let vertex = vertex.read().unwrap_or_else(PoisonError::into_inner);
            let pixel = pixel.read().unwrap_or_else(PoisonError::into_inner);
            self.upload_program(program, &vertex, &pixel)?;
        }
        if let Some((old_vertex, old_pixel)) = program.attach_shaders(vertex, pixel) {
            release_unshared(old_vertex);
            release_unshared(old_pixel);
        }
        Ok(())
    }

    /// Uploads raw texture data, taking ownership of the texture.
    pub fn upload_texture(
        self: &Arc<Self>,
        texture: &mut Texture,
        data: &[u8],
    ) -> Result<(), ResourceError> {
        self.migrate(texture, RenderBackend::release_texture, |ops, texture| {
            ops.upload_texture(texture, data)
        })
    }

    fn release_shader(&self, shader: &mut Shader) {
        self.lock_ops().deallocate_shader(shader);
        self.shaders.remove(shader.uuid());
    }

    fn release_program(&self, program: &mut Program) {
        self.lock_ops().deallocate_program(program);
        self.programs.remove(program.uuid());
        if let Some((vertex, pixel)) = program.detach_shaders() {
            release_unshared(vertex);
            release_unshared(pixel);
        }
    }

    fn release_texture(&self, texture: &mut Texture) {
        self.lock_ops().deallocate_texture(texture);
        self.textures.remove(texture.uuid());
    }

    /// Frees this backend's copy of `shader`. Does nothing if another backend owns it.
    pub fn deallocate_shader(&self, shader: &mut Shader) {
        if shader.owner.is_owned_by(self) {
            self.release_shader(shader);
            shader.owner = ResourceOwner::Unbound;
        }
    }

    /// Frees this backend's copy of `program`. Does nothing if another backend owns it.
    pub fn deallocate_program(&self, program: &mut Program) {
        if program.owner.is_owned_by(self) {
            self.release_program(program);
            program.owner = ResourceOwner::Unbound;
        }
    }

    /// Frees this backend's copy of `texture`. Does nothing if another backend owns it.
    pub fn deallocate_texture(&self, texture: &mut Texture) {
        if texture.owner.is_owned_by(self) {
            self.release_texture(texture);
            texture.owner = ResourceOwner::Unbound;
        }
    }

    /// Records an uploaded shader in the shader table.
    pub fn register_shader(&self, shader: &SharedShader) {
        let uuid = shader.read().unwrap_or_else(PoisonError::into_inner).uuid();
        self.shaders.insert(uuid, shader);
    }

    /// Records an uploaded program in the program table.
    pub fn register_program(&self, program: &SharedProgram) {
        let uuid = program.read().unwrap_or_else(PoisonError::into_inner).uuid();
        self.programs.insert(uuid, program);
    }

    /// Records an uploaded texture in the texture table.
    pub fn register_texture(&self, texture: &SharedTexture) {
        let uuid = texture.read().unwrap_or_else(PoisonError::into_inner).uuid();
        self.textures.insert(uuid, texture);
    }
}

/// Frees `shader` on its owner when the caller held the last reference to it.
fn release_unshared(shader: SharedShader) {
    if Arc::strong_count(&shader) > 1 {
        return;
    }
    let mut guard = shader.write().unwrap_or_else(PoisonError::into_inner);
    if let Some(owner) = guard.owner.backend() {
        owner.deallocate_shader(&mut guard);
    }
}
