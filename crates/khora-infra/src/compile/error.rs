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

//! Errors reported by the resource compiler.

use khora_core::renderer::{ProgramError, RenderApi, RenderError, ShaderError, ShaderStage};
use khora_core::resource::ResourceUuid;
use khora_io::{IoError, LoadError};
use std::fmt;

/// Why one sub-platform could not be compiled.
#[derive(Debug)]
pub enum FailureReason {
    /// No backend could be set up for the sub-platform's API.
    Backend(RenderError),
    /// The backend that was allocated has no GL context to compile with.
    NoContext {
        /// The API the backend ended up with.
        api: RenderApi,
    },
    /// The driver rejected the shader source.
    Shader(ShaderError),
    /// Linking or reflecting the program failed.
    Program(ProgramError),
    /// A program's shader reference is not a valid identifier.
    InvalidReference {
        /// The stage being referenced.
        stage: ShaderStage,
        /// The recorded value.
        value: String,
    },
    /// A shader the program needs could not be loaded.
    Load(LoadError),
    /// Reading the source blob or writing the compiled streams failed.
    Io(IoError),
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::Backend(err) => write!(f, "Unable to create render backend: {err}"),
            FailureReason::NoContext { api } => {
                write!(f, "{api} backend has no GL context to compile with")
            }
            FailureReason::Shader(err) => write!(f, "{err}"),
            FailureReason::Program(err) => write!(f, "{err}"),
            FailureReason::InvalidReference { stage, value } => {
                write!(f, "Invalid {stage:?} shader reference '{value}'")
            }
            FailureReason::Load(err) => write!(f, "Unable to load shader: {err}"),
            FailureReason::Io(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for FailureReason {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FailureReason::Backend(err) => Some(err),
            FailureReason::Shader(err) => Some(err),
            FailureReason::Program(err) => Some(err),
            FailureReason::Load(err) => Some(err),
            FailureReason::Io(err) => Some(err),
            FailureReason::NoContext { .. } | FailureReason::InvalidReference { .. } => None,
        }
    }
}

impl From<RenderError> for FailureReason {
    fn from(err: RenderError) -> Self {
        FailureReason::Backend(err)
    }
}

impl From<ShaderError> for FailureReason {
    fn from(err: ShaderError) -> Self {
        FailureReason::Shader(err)
    }
}

impl From<ProgramError> for FailureReason {
    fn from(err: ProgramError) -> Self {
        FailureReason::Program(err)
    }
}

impl From<LoadError> for FailureReason {
    fn from(err: LoadError) -> Self {
        FailureReason::Load(err)
    }
}

impl From<IoError> for FailureReason {
    fn from(err: IoError) -> Self {
        FailureReason::Io(err)
    }
}

/// A failed sub-platform.
#[derive(Debug)]
pub struct SubPlatformFailure {
    /// The sub-platform tag.
    pub platform: u64,
    /// What went wrong.
    pub reason: FailureReason,
}

impl fmt::Display for SubPlatformFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "platform {:#018x}: {}", self.platform, self.reason)
    }
}

/// An error returned by the resource compiler.
#[derive(Debug)]
pub enum CompileError {
    /// The type name is not one the compiler handles.
    UnsupportedType {
        /// The type name given.
        name: String,
    },
    /// No source has been recorded for the resource.
    MissingSource {
        /// The resource.
        uuid: ResourceUuid,
    },
    /// The source could not be read.
    Source(IoError),
    /// At least one sub-platform failed. The others were still compiled.
    Failed {
        /// The resource.
        uuid: ResourceUuid,
        /// One entry per failed sub-platform.
        failures: Vec<SubPlatformFailure>,
    },
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompileError::UnsupportedType { name } => {
                write!(f, "No compiler for resource type '{name}'")
            }
            CompileError::MissingSource { uuid } => write!(f, "No source recorded for {uuid}"),
            CompileError::Source(err) => write!(f, "Unable to read resource source: {err}"),
            CompileError::Failed { uuid, failures } => {
                write!(f, "Compiling {uuid} failed on {} platform(s)", failures.len())?;
                for failure in failures {
                    write!(f, "\n  {failure}")?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for CompileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CompileError::Source(err) => Some(err),
            _ => None,
        }
    }
}
