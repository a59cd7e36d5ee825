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

//! Program linking and reflection.
//!
//! Attribute locations must be bound before the final link, but their names
//! are only known once the program has linked. Programs are therefore linked
//! twice: once to enumerate the active attributes, then again after binding
//! each of them to its semantic slot. The layout is read back after the
//! second link.

use super::driver_log;
use crate::graphics::gl::conversions::{attribute_binding, parameter_type, vertex_format};
use crate::graphics::gl::GlDriver;
use khora_core::renderer::{Program, ProgramError, VertexAttributes};
use khora_core::resource::{hash_str, ResourceUuid};

/// Location recorded for uniforms the driver reports without one.
pub const NO_LOCATION: u32 = u32::MAX;

/// Links two compiled shader objects and reflects the program layout.
///
/// The GL program object only lives for the duration of the call.
pub(crate) fn link_and_reflect(
    driver: &mut dyn GlDriver,
    uuid: ResourceUuid,
    vertex: (ResourceUuid, u32),
    pixel: (ResourceUuid, u32),
) -> Result<Program, ProgramError> {
    let handle = driver
        .create_program()
        .map_err(|log| ProgramError::LinkFailed { log })?;
    driver.attach_shader(handle, vertex.1);
    driver.attach_shader(handle, pixel.1);

    let result = reflect(driver, handle, uuid, vertex.0, pixel.0);
    driver.delete_program(handle);
    result
}

fn link(driver: &mut dyn GlDriver, handle: u32, pass: &str) -> Result<(), ProgramError> {
    let linked = driver.link_program(handle);
    let log = driver_log(driver.program_info_log(handle));
    if !linked {
        log::error!("Unable to {pass} program: {log}");
        return Err(ProgramError::LinkFailed { log });
    }
    log::debug!("Successfully {pass}ed program: {log}");
    Ok(())
}

fn reflect(
    driver: &mut dyn GlDriver,
    handle: u32,
    uuid: ResourceUuid,
    vertex_shader: ResourceUuid,
    pixel_shader: ResourceUuid,
) -> Result<Program, ProgramError> {
    link(driver, handle, "link")?;

    for attribute in driver.active_attributes(handle) {
        let binding = attribute_binding(&attribute.name).ok_or_else(|| {
            log::error!("Invalid/unknown attribute name: {}", attribute.name);
            ProgramError::UnknownAttribute {
                name: attribute.name.clone(),
            }
        })?;
        driver.bind_attrib_location(handle, binding.location(), &attribute.name);
    }

    link(driver, handle, "relink")?;

    let attributes = driver
        .active_attributes(handle)
        .into_iter()
        .map(|attribute| {
            let binding = attribute_binding(&attribute.name).ok_or_else(|| {
                ProgramError::UnknownAttribute {
                    name: attribute.name.clone(),
                }
            })?;
            let format = vertex_format(attribute.gl_type).ok_or_else(|| {
                log::error!("Invalid/unknown attribute type: {:#06x}", attribute.gl_type);
                ProgramError::UnsupportedAttributeType {
                    name: attribute.name.clone(),
                    code: attribute.gl_type,
                }
            })?;
            Ok((binding, format))
        })
        .collect::<Result<Vec<_>, ProgramError>>()?;

    let uniforms = driver.active_uniforms(handle);
    let mut program = Program::new(uuid, vertex_shader, pixel_shader, uniforms.len());
    program.attributes = VertexAttributes::pack(attributes);

    for uniform in uniforms {
        let kind = parameter_type(uniform.gl_type).ok_or_else(|| {
            log::error!("Invalid/unknown uniform type: {:#06x}", uniform.gl_type);
            ProgramError::UnsupportedUniformType {
                name: uniform.name.clone(),
                code: uniform.gl_type,
            }
        })?;
        let location = driver
            .uniform_location(handle, &uniform.name)
            .unwrap_or(NO_LOCATION);
        program
            .parameters
            .push(hash_str(&uniform.name), location, uniform.size.max(0) as u32, kind)?;
    }

    Ok(program)
}
