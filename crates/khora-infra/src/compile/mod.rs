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

//! Offline shader and program compiler.
//!
//! A resource is compiled once for every platform recorded in its source
//! that is at least as specific as the requested one. Each sub-platform gets
//! its own backend, created and torn down around the compile, and its own
//! persisted streams. A failing sub-platform does not stop the others; the
//! failures are reported together at the end.

mod error;
mod platforms;
mod program;
mod session;
mod shader;

pub use self::error::{CompileError, FailureReason, SubPlatformFailure};
pub use self::platforms::concrete_api;
pub use self::program::NO_LOCATION;

use self::session::CompileSession;
use khora_core::renderer::{ProgramError, Shader, ShaderStage};
use khora_core::resource::{
    hash_str, ResourceType, ResourceUuid, KEY_PIXEL_SHADER, KEY_SOURCE, KEY_VERTEX_SHADER,
};
use khora_core::BackendRegistry;
use khora_io::loader::load_shader;
use khora_io::record::{ProgramStaticRecord, ShaderDynamicRecord, ShaderStaticRecord};
use khora_io::{ResourceSource, ResourceStore, SourceRepository, StreamKind};
use std::sync::PoisonError;

const NO_MESSAGE: &str = "<no message>";

/// Replaces an empty driver log with a placeholder.
fn driver_log(log: String) -> String {
    let log = log.trim_end();
    if log.is_empty() {
        NO_MESSAGE.to_string()
    } else {
        log.to_string()
    }
}

/// Outcome of one sub-platform.
enum Step {
    Written,
    Skipped,
}

/// Compiles resource sources into persisted streams.
pub struct ResourceCompiler<'a> {
    registry: &'a mut BackendRegistry,
    repository: &'a dyn SourceRepository,
    store: &'a dyn ResourceStore,
}

impl<'a> ResourceCompiler<'a> {
    /// A compiler allocating its backends from `registry`, reading blobs and
    /// referenced sources from `repository` and writing into `store`.
    pub fn new(
        registry: &'a mut BackendRegistry,
        repository: &'a dyn SourceRepository,
        store: &'a dyn ResourceStore,
    ) -> Self {
        Self {
            registry,
            repository,
            store,
        }
    }

    /// Compiles `uuid` as the resource type named `type_name`.
    pub fn compile(
        &mut self,
        uuid: ResourceUuid,
        platform: u64,
        source: &ResourceSource,
        type_name: &str,
    ) -> Result<(), CompileError> {
        let kind = ResourceType::from_name(type_name).ok_or_else(|| {
            CompileError::UnsupportedType {
                name: type_name.to_string(),
            }
        })?;
        match kind {
            ResourceType::VertexShader => {
                self.compile_shader(uuid, platform, source, ShaderStage::Vertex)
            }
            ResourceType::PixelShader => {
                self.compile_shader(uuid, platform, source, ShaderStage::Pixel)
            }
            ResourceType::Program => self.compile_program(uuid, platform, source),
            ResourceType::Texture => Err(CompileError::UnsupportedType {
                name: type_name.to_string(),
            }),
        }
    }

    /// Reads the source of `uuid` from the repository and compiles it.
    pub fn compile_stored(
        &mut self,
        uuid: ResourceUuid,
        platform: u64,
        type_name: &str,
    ) -> Result<(), CompileError> {
        let source = self
            .repository
            .read(uuid)
            .map_err(CompileError::Source)?
            .ok_or(CompileError::MissingSource { uuid })?;
        self.compile(uuid, platform, &source, type_name)
    }

    /// Compiles a shader for every matching sub-platform.
    pub fn compile_shader(
        &mut self,
        uuid: ResourceUuid,
        platform: u64,
        source: &ResourceSource,
        stage: ShaderStage,
    ) -> Result<(), CompileError> {
        let platforms = source.platforms_within(platform);
        self.run(uuid, platforms, |compiler, subplatform| {
            compiler.shader_variant(uuid, source, stage, subplatform)
        })
    }

    /// Compiles a program for every matching sub-platform, including the
    /// more specific platforms its shaders are specialized for.
    pub fn compile_program(
        &mut self,
        uuid: ResourceUuid,
        platform: u64,
        source: &ResourceSource,
    ) -> Result<(), CompileError> {
        let mut platforms = source.platforms_within(platform);
        let more = self.shader_specializations(source, &platforms);
        platforms::merge(&mut platforms, more);
        self.run(uuid, platforms, |compiler, subplatform| {
            compiler.program_variant(uuid, source, subplatform)
        })
    }

    fn run(
        &mut self,
        uuid: ResourceUuid,
        platforms: Vec<u64>,
        mut variant: impl FnMut(&mut Self, u64) -> Result<Step, FailureReason>,
    ) -> Result<(), CompileError> {
        let mut failures = Vec::new();
        let mut written = 0usize;
        for platform in platforms {
            if platform == 0 {
                continue;
            }
            match variant(self, platform) {
                Ok(Step::Written) => written += 1,
                Ok(Step::Skipped) => {}
                Err(reason) => {
                    log::error!("Unable to compile {uuid} for platform {platform:#018x}: {reason}");
                    failures.push(SubPlatformFailure { platform, reason });
                }
            }
        }
        if failures.is_empty() {
            log::info!("Compiled {uuid} for {written} platform(s)");
            Ok(())
        } else {
            Err(CompileError::Failed { uuid, failures })
        }
    }

    fn shader_variant(
        &mut self,
        uuid: ResourceUuid,
        source: &ResourceSource,
        stage: ShaderStage,
        platform: u64,
    ) -> Result<Step, FailureReason> {
        let Some(api) = concrete_api(platform) else {
            return Ok(Step::Skipped);
        };

        let payload = {
            let session = CompileSession::open(&mut *self.registry, api, platform)?;
            if !api.is_opengl() {
                log::debug!("No {api} shader compiler, skipping platform {platform:#018x}");
                return Ok(Step::Skipped);
            }
            let Some((size, checksum)) = source
                .get(hash_str(KEY_SOURCE), platform)
                .and_then(|change| change.as_blob())
            else {
                return Ok(Step::Skipped);
            };
            let text = self.repository.read_blob(uuid, checksum, size)?;
            session
                .with_driver(|driver| shader::compile_glsl(driver, stage, &text))
                .ok_or(FailureReason::NoContext {
                    api: session.backend().api(),
                })??
        };

        let static_record = ShaderStaticRecord::new(stage).to_bytes()?;
        self.store
            .write(uuid, StreamKind::Static, platform, &static_record)?;
        let dynamic_record = ShaderDynamicRecord::new(payload).to_bytes()?;
        self.store
            .write(uuid, StreamKind::Dynamic, platform, &dynamic_record)?;
        Ok(Step::Written)
    }

    fn shader_reference(
        source: &ResourceSource,
        stage: ShaderStage,
        platform: u64,
    ) -> Result<ResourceUuid, FailureReason> {
        let key = match stage {
            ShaderStage::Vertex => KEY_VERTEX_SHADER,
            ShaderStage::Pixel => KEY_PIXEL_SHADER,
        };
        let value = source
            .get(hash_str(key), platform)
            .and_then(|change| change.as_value())
            .ok_or(ProgramError::MissingShader { stage })?;
        value
            .parse()
            .map_err(|_| FailureReason::InvalidReference {
                stage,
                value: value.to_string(),
            })
    }

    /// Platforms the referenced shaders specialize beyond the program's own.
    fn shader_specializations(&self, source: &ResourceSource, platforms: &[u64]) -> Vec<u64> {
        let mut more = Vec::new();
        for &platform in platforms {
            let (Ok(vertex), Ok(pixel)) = (
                Self::shader_reference(source, ShaderStage::Vertex, platform),
                Self::shader_reference(source, ShaderStage::Pixel, platform),
            ) else {
                continue;
            };
            for shader in [vertex, pixel] {
                match self.repository.read(shader) {
                    Ok(Some(shader_source)) => platforms::merge(
                        &mut more,
                        shader_source
                            .platforms_within(platform)
                            .into_iter()
                            .filter(|&p| p != platform),
                    ),
                    Ok(None) => {}
                    Err(err) => log::warn!("Unable to read source of shader {shader}: {err}"),
                }
            }
        }
        more
    }

    fn program_variant(
        &mut self,
        uuid: ResourceUuid,
        source: &ResourceSource,
        platform: u64,
    ) -> Result<Step, FailureReason> {
        let Some(api) = concrete_api(platform) else {
            return Ok(Step::Skipped);
        };
        let vertex_uuid = Self::shader_reference(source, ShaderStage::Vertex, platform)?;
        let pixel_uuid = Self::shader_reference(source, ShaderStage::Pixel, platform)?;

        let program = {
            let session = CompileSession::open(&mut *self.registry, api, platform)?;
            if !api.is_opengl() {
                log::debug!("No {api} program compiler, skipping platform {platform:#018x}");
                return Ok(Step::Skipped);
            }
            let backend = session.backend();
            let vertex = load_shader(backend, self.store, vertex_uuid, ShaderStage::Vertex)?;
            let pixel = load_shader(backend, self.store, pixel_uuid, ShaderStage::Pixel)?;

            let handle = |shader: &Shader| (shader.uuid(), shader.backend_data[0] as u32);
            let vertex_handle = handle(&vertex.read().unwrap_or_else(PoisonError::into_inner));
            let pixel_handle = handle(&pixel.read().unwrap_or_else(PoisonError::into_inner));
            let linked = session.with_driver(|driver| {
                program::link_and_reflect(driver, uuid, vertex_handle, pixel_handle)
            });

            backend.deallocate_shader(&mut pixel.write().unwrap_or_else(PoisonError::into_inner));
            backend.deallocate_shader(&mut vertex.write().unwrap_or_else(PoisonError::into_inner));
            linked.ok_or(FailureReason::NoContext { api: backend.api() })??
        };

        let record = ProgramStaticRecord::from_program(&program).to_bytes()?;
        self.store.write(uuid, StreamKind::Static, platform, &record)?;
        log::debug!(
            "Program {uuid} for platform {platform:#018x}: {} attribute(s), {} parameter(s)",
            program.attributes.attributes.len(),
            program.parameters.len()
        );
        Ok(Step::Written)
    }
}

impl std::fmt::Debug for ResourceCompiler<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceCompiler")
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}
