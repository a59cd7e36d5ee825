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

//! Loading compiled shaders and programs into a backend.
//!
//! A loader first looks in the backend's resource tables. Otherwise it reads
//! the persisted variant best matching the backend's resource platform,
//! uploads it and records it in the table, so later loads of the same UUID
//! share one GPU copy for as long as a caller holds it.
//!
//! When compiled streams change, [`handle_resource_event`] refreshes the
//! resident copies in place so existing handles see the new code.

use crate::error::LoadError;
use crate::record::{ProgramStaticRecord, ShaderDynamicRecord, ShaderStaticRecord};
use crate::store::{ResourceStore, StreamKind};
use khora_core::renderer::backend::{SharedProgram, SharedShader};
use khora_core::renderer::{Program, RenderBackend, Shader, ShaderStage};
use khora_core::resource::ResourceUuid;
use std::sync::{Arc, PoisonError, RwLock};

/// Loads a shader into `backend`.
pub fn load_shader(
    backend: &Arc<RenderBackend>,
    store: &dyn ResourceStore,
    uuid: ResourceUuid,
    stage: ShaderStage,
) -> Result<SharedShader, LoadError> {
    if let Some(shader) = backend.shader_table().get(uuid) {
        return Ok(shader);
    }

    let payload = read_shader_payload(backend, store, uuid, stage)?;
    let mut shader = Shader::new(uuid, stage);
    backend.upload_shader(&mut shader, &payload)?;
    let shader = Arc::new(RwLock::new(shader));
    backend.register_shader(&shader);
    log::debug!(
        "Loaded {stage:?} shader {uuid} ({} bytes) on {} backend",
        payload.len(),
        backend.api()
    );
    Ok(shader)
}

/// Loads a program and both of its shaders into `backend`.
pub fn load_program(
    backend: &Arc<RenderBackend>,
    store: &dyn ResourceStore,
    uuid: ResourceUuid,
) -> Result<SharedProgram, LoadError> {
    if let Some(program) = backend.program_table().get(uuid) {
        return Ok(program);
    }

    let mut program = read_program(backend, store, uuid)?;
    let vertex = load_shader(backend, store, program.vertex_shader, ShaderStage::Vertex)?;
    let pixel = load_shader(backend, store, program.pixel_shader, ShaderStage::Pixel)?;
    backend.link_program(&mut program, vertex, pixel)?;

    let program = Arc::new(RwLock::new(program));
    backend.register_program(&program);
    log::debug!("Loaded program {uuid} on {} backend", backend.api());
    Ok(program)
}

/// Refreshes the resident copy of `uuid` after its compiled streams changed.
///
/// A resident shader is uploaded again and every resident program linked
/// from it is relinked. A resident program is rebuilt from its stored layout.
/// Returns `Ok(false)` if `backend` holds nothing with this UUID.
pub fn handle_resource_event(
    backend: &Arc<RenderBackend>,
    store: &dyn ResourceStore,
    uuid: ResourceUuid,
) -> Result<bool, LoadError> {
    if let Some(shader) = backend.shader_table().get(uuid) {
        reload_shader(backend, store, &shader)?;
        for program in backend.program_table().live() {
            let mut program = program.write().unwrap_or_else(PoisonError::into_inner);
            if program.vertex_shader == uuid || program.pixel_shader == uuid {
                relink(backend, &mut program)?;
            }
        }
        return Ok(true);
    }
    if let Some(program) = backend.program_table().get(uuid) {
        let mut program = program.write().unwrap_or_else(PoisonError::into_inner);
        reload_program(backend, store, &mut program)?;
        return Ok(true);
    }
    log::trace!("Ignoring change of {uuid}, not resident on {} backend", backend.api());
    Ok(false)
}

fn read_shader_payload(
    backend: &RenderBackend,
    store: &dyn ResourceStore,
    uuid: ResourceUuid,
    stage: ShaderStage,
) -> Result<Vec<u8>, LoadError> {
    let platform = backend.resource_platform();
    let Some((found, bytes)) = store.read_best(uuid, StreamKind::Static, platform)? else {
        log::warn!("No compiled variant of shader {uuid} for platform {platform:#018x}");
        return Err(LoadError::NotCompiled { uuid, platform });
    };
    ShaderStaticRecord::from_bytes(&bytes, stage)?;
    let Some(bytes) = store.read(uuid, StreamKind::Dynamic, found)? else {
        log::warn!("Shader {uuid} has no compiled payload for platform {found:#018x}");
        return Err(LoadError::NotCompiled { uuid, platform });
    };
    Ok(ShaderDynamicRecord::from_bytes(&bytes)?.payload)
}

fn read_program(
    backend: &RenderBackend,
    store: &dyn ResourceStore,
    uuid: ResourceUuid,
) -> Result<Program, LoadError> {
    let platform = backend.resource_platform();
    let Some((_, bytes)) = store.read_best(uuid, StreamKind::Static, platform)? else {
        log::warn!("No compiled variant of program {uuid} for platform {platform:#018x}");
        return Err(LoadError::NotCompiled { uuid, platform });
    };
    Ok(ProgramStaticRecord::from_bytes(&bytes)?.into_program(uuid))
}

fn reload_shader(
    backend: &Arc<RenderBackend>,
    store: &dyn ResourceStore,
    shader: &SharedShader,
) -> Result<(), LoadError> {
    let mut shader = shader.write().unwrap_or_else(PoisonError::into_inner);
    let (uuid, stage) = (shader.uuid(), shader.stage());
    let payload = read_shader_payload(backend, store, uuid, stage)?;
    backend.upload_shader(&mut shader, &payload)?;
    log::debug!("Reloaded {stage:?} shader {uuid} on {} backend", backend.api());
    Ok(())
}

fn relink(backend: &Arc<RenderBackend>, program: &mut Program) -> Result<(), LoadError> {
    let Some((vertex, pixel)) = program.shaders().cloned() else {
        log::warn!("Program {} holds no shaders to relink", program.uuid());
        return Ok(());
    };
    backend.link_program(program, vertex, pixel)?;
    log::debug!("Relinked program {} on {} backend", program.uuid(), backend.api());
    Ok(())
}

fn reload_program(
    backend: &Arc<RenderBackend>,
    store: &dyn ResourceStore,
    program: &mut Program,
) -> Result<(), LoadError> {
    let fresh = read_program(backend, store, program.uuid())?;
    let vertex = load_shader(backend, store, fresh.vertex_shader, ShaderStage::Vertex)?;
    let pixel = load_shader(backend, store, fresh.pixel_shader, ShaderStage::Pixel)?;
    program.vertex_shader = fresh.vertex_shader;
    program.pixel_shader = fresh.pixel_shader;
    program.attributes = fresh.attributes;
    program.parameters = fresh.parameters;
    backend.link_program(program, vertex, pixel)?;
    log::debug!("Reloaded program {} on {} backend", program.uuid(), backend.api());
    Ok(())
}
