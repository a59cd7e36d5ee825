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

//! Defines the hierarchy of error types for the rendering subsystem.

use crate::renderer::api::util::enums::{RenderApi, ShaderStage};
use crate::resource::ResourceUuid;
use std::fmt;

/// An error related to compiling, loading or uploading a shader.
#[derive(Debug)]
pub enum ShaderError {
    /// The driver rejected the shader source.
    CompilationFailed {
        /// Stage being compiled.
        stage: ShaderStage,
        /// Diagnostic text reported by the driver.
        log: String,
    },
    /// No compiled variant exists for the requested platform.
    NotFound {
        /// The shader that was looked up.
        uuid: ResourceUuid,
    },
    /// The compiled payload does not belong to a shader of the expected stage.
    StageMismatch {
        /// The shader being loaded.
        uuid: ResourceUuid,
        /// Stage the caller expected.
        expected: ShaderStage,
    },
}

impl fmt::Display for ShaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderError::CompilationFailed { stage, log } => {
                write!(f, "Unable to compile {stage:?} shader: {log}")
            }
            ShaderError::NotFound { uuid } => {
                write!(f, "No compiled shader found for {uuid}")
            }
            ShaderError::StageMismatch { uuid, expected } => {
                write!(f, "Shader {uuid} is not a {expected:?} shader")
            }
        }
    }
}

impl std::error::Error for ShaderError {}

/// An error related to linking a program or building its layout.
#[derive(Debug)]
pub enum ProgramError {
    /// The driver refused to link the program.
    LinkFailed {
        /// Diagnostic text reported by the driver.
        log: String,
    },
    /// A program needs both a vertex and a pixel shader.
    MissingShader {
        /// The stage with no shader.
        stage: ShaderStage,
    },
    /// An active attribute name has no known semantic binding.
    UnknownAttribute {
        /// Name reported by the driver.
        name: String,
    },
    /// An active attribute has a type with no vertex format.
    UnsupportedAttributeType {
        /// Attribute name.
        name: String,
        /// Driver type code.
        code: u32,
    },
    /// An active uniform has a type with no parameter type.
    UnsupportedUniformType {
        /// Uniform name.
        name: String,
        /// Driver type code.
        code: u32,
    },
    /// More parameters were added than the program was allocated for.
    ParameterCapacityExceeded {
        /// The fixed parameter capacity.
        capacity: usize,
    },
}

impl fmt::Display for ProgramError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProgramError::LinkFailed { log } => write!(f, "Unable to link program: {log}"),
            ProgramError::MissingShader { stage } => {
                write!(f, "Unable to compile program: missing {stage:?} shader")
            }
            ProgramError::UnknownAttribute { name } => {
                write!(f, "Invalid/unknown attribute name: {name}")
            }
            ProgramError::UnsupportedAttributeType { name, code } => {
                write!(f, "Invalid/unknown attribute type {code:#06x} for '{name}'")
            }
            ProgramError::UnsupportedUniformType { name, code } => {
                write!(f, "Invalid/unknown uniform type {code:#06x} for '{name}'")
            }
            ProgramError::ParameterCapacityExceeded { capacity } => {
                write!(f, "Program parameter capacity of {capacity} exceeded")
            }
        }
    }
}

impl std::error::Error for ProgramError {}

/// An error related to the creation or use of a GPU resource.
#[derive(Debug)]
pub enum ResourceError {
    /// A shader-specific error occurred.
    Shader(ShaderError),
    /// A program-specific error occurred.
    Program(ProgramError),
    /// The backend's upload hook refused the resource.
    UploadRejected {
        /// Backend that refused.
        api: RenderApi,
        /// The resource being uploaded.
        uuid: ResourceUuid,
    },
    /// An error originating from the specific graphics backend implementation.
    BackendError(String),
}

impl fmt::Display for ResourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceError::Shader(err) => write!(f, "Shader resource error: {err}"),
            ResourceError::Program(err) => write!(f, "Program resource error: {err}"),
            ResourceError::UploadRejected { api, uuid } => {
                write!(f, "{api} backend rejected upload of {uuid}")
            }
            ResourceError::BackendError(msg) => {
                write!(f, "Backend-specific resource error: {msg}")
            }
        }
    }
}

impl std::error::Error for ResourceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ResourceError::Shader(err) => Some(err),
            ResourceError::Program(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ShaderError> for ResourceError {
    fn from(err: ShaderError) -> Self {
        ResourceError::Shader(err)
    }
}

impl From<ProgramError> for ResourceError {
    fn from(err: ProgramError) -> Self {
        ResourceError::Program(err)
    }
}

/// A high-level error raised by the backend registry and backend lifecycle.
#[derive(Debug)]
pub enum RenderError {
    /// The fallback chain was exhausted without constructing a backend.
    NoBackendAvailable {
        /// The API originally requested.
        requested: RenderApi,
    },
    /// The requested API failed to construct and fallback was not allowed.
    BackendRefused {
        /// The API that failed.
        api: RenderApi,
    },
    /// The pixel format cannot change while a drawable is attached.
    FormatLocked,
    /// A drawable was offered before any pixel format was chosen.
    FormatNotSet,
    /// The backend refused the drawable.
    DrawableRejected {
        /// The refusing backend's API.
        api: RenderApi,
    },
    /// An error occurred while managing a GPU resource.
    ResourceError(ResourceError),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::NoBackendAvailable { requested } => write!(
                f,
                "No supported and enabled render api found (requested {requested})"
            ),
            RenderError::BackendRefused { api } => {
                write!(f, "Requested render api not supported: {api}")
            }
            RenderError::FormatLocked => {
                write!(f, "Unable to change format when drawable is already set")
            }
            RenderError::FormatNotSet => {
                write!(f, "A pixel format must be set before binding a drawable")
            }
            RenderError::DrawableRejected { api } => {
                write!(f, "The {api} backend rejected the drawable")
            }
            RenderError::ResourceError(err) => {
                write!(f, "Graphics resource operation failed: {err}")
            }
        }
    }
}

impl std::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RenderError::ResourceError(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ResourceError> for RenderError {
    fn from(err: ResourceError) -> Self {
        RenderError::ResourceError(err)
    }
}
