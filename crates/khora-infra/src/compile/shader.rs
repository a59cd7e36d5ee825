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

//! GLSL shader compilation.

use super::driver_log;
use crate::graphics::gl::GlDriver;
use khora_core::renderer::{ShaderError, ShaderStage};

/// Compiles GLSL `source` for `stage` and returns the payload to persist.
///
/// GL keeps no portable binary, so the payload is the validated source itself.
pub(crate) fn compile_glsl(
    driver: &mut dyn GlDriver,
    stage: ShaderStage,
    source: &[u8],
) -> Result<Vec<u8>, ShaderError> {
    let text = std::str::from_utf8(source).map_err(|err| ShaderError::CompilationFailed {
        stage,
        log: format!("source is not valid UTF-8: {err}"),
    })?;
    let handle = driver
        .create_shader(stage)
        .map_err(|log| ShaderError::CompilationFailed { stage, log })?;

    let compiled = driver.compile_shader(handle, text);
    let log = driver_log(driver.shader_info_log(handle));
    driver.delete_shader(handle);

    if !compiled {
        log::error!("Unable to compile shader: {log}");
        return Err(ShaderError::CompilationFailed { stage, log });
    }
    log::debug!("Successfully compiled shader: {log}");
    Ok(source.to_vec())
}
