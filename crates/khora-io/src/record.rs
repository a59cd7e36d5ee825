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

//! Persisted compiled-resource records.
//!
//! All records use fixed-width little-endian integers so the layout is
//! stable and self-describing:
//!
//! ```text
//! shader static   u64 type_hash | u32 version | descriptor (empty)
//! shader dynamic  u32 version | u64 length | length bytes
//! program static  u64 type_hash | u32 version | u128 vertex shader | u128 pixel shader
//!                 | attributes (entries, stride) | parameters (capacity, entries)
//! ```

use crate::error::IoError;
use bincode::{Decode, Encode};
use khora_core::renderer::{ParameterList, Program, ShaderStage, VertexAttributes};
use khora_core::resource::{ResourceType, ResourceUuid};

/// Version written by this build and the only one it reads.
pub const FORMAT_VERSION: u32 = 1;

fn config() -> impl bincode::config::Config {
    bincode::config::standard()
        .with_fixed_int_encoding()
        .with_little_endian()
}

fn encode<T: Encode>(record: &T) -> Result<Vec<u8>, IoError> {
    Ok(bincode::encode_to_vec(record, config())?)
}

fn decode<T: Decode<()>>(bytes: &[u8]) -> Result<T, IoError> {
    let (record, _) = bincode::decode_from_slice(bytes, config())?;
    Ok(record)
}

fn check_version(found: u32) -> Result<(), IoError> {
    if found != FORMAT_VERSION {
        return Err(IoError::Version {
            found,
            expected: FORMAT_VERSION,
        });
    }
    Ok(())
}

fn check_type(expected: ResourceType, found: u64) -> Result<(), IoError> {
    if expected.hash() != found {
        return Err(IoError::TypeMismatch { expected, found });
    }
    Ok(())
}

/// Stage-specific shader description. Carries no fields yet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Encode, Decode)]
pub struct ShaderDescriptor {}

/// The static stream of a compiled shader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Encode, Decode)]
pub struct ShaderStaticRecord {
    /// Type hash of the shader kind.
    pub type_hash: u64,
    /// Format version.
    pub version: u32,
    /// Stage descriptor.
    pub descriptor: ShaderDescriptor,
}

impl ShaderStaticRecord {
    /// A current-version record for `stage`.
    pub fn new(stage: ShaderStage) -> Self {
        Self {
            type_hash: shader_type(stage).hash(),
            version: FORMAT_VERSION,
            descriptor: ShaderDescriptor::default(),
        }
    }

    /// Serializes the record.
    pub fn to_bytes(&self) -> Result<Vec<u8>, IoError> {
        encode(self)
    }

    /// Parses a record of a shader of `stage`.
    pub fn from_bytes(bytes: &[u8], stage: ShaderStage) -> Result<Self, IoError> {
        let record: Self = decode(bytes)?;
        check_type(shader_type(stage), record.type_hash)?;
        check_version(record.version)?;
        Ok(record)
    }
}

/// The dynamic stream of a compiled shader.
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub struct ShaderDynamicRecord {
    /// Format version.
    pub version: u32,
    /// Compiled payload.
    pub payload: Vec<u8>,
}

impl ShaderDynamicRecord {
    /// A current-version record around `payload`.
    pub fn new(payload: Vec<u8>) -> Self {
        Self {
            version: FORMAT_VERSION,
            payload,
        }
    }

    /// Serializes the record.
    pub fn to_bytes(&self) -> Result<Vec<u8>, IoError> {
        encode(self)
    }

    /// Parses a record.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, IoError> {
        let record: Self = decode(bytes)?;
        check_version(record.version)?;
        Ok(record)
    }
}

/// The static stream of a linked program.
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub struct ProgramStaticRecord {
    /// Type hash of programs.
    pub type_hash: u64,
    /// Format version.
    pub version: u32,
    /// Vertex shader UUID.
    pub vertex_shader: u128,
    /// Pixel shader UUID.
    pub pixel_shader: u128,
    /// Vertex input layout.
    pub attributes: VertexAttributes,
    /// Uniform layout.
    pub parameters: ParameterList,
}

impl ProgramStaticRecord {
    /// Captures the layout of `program`.
    pub fn from_program(program: &Program) -> Self {
        Self {
            type_hash: ResourceType::Program.hash(),
            version: FORMAT_VERSION,
            vertex_shader: program.vertex_shader.as_u128(),
            pixel_shader: program.pixel_shader.as_u128(),
            attributes: program.attributes.clone(),
            parameters: program.parameters.clone(),
        }
    }

    /// Builds an un-uploaded program with this layout.
    pub fn into_program(self, uuid: ResourceUuid) -> Program {
        let mut program = Program::new(
            uuid,
            ResourceUuid::from_u128(self.vertex_shader),
            ResourceUuid::from_u128(self.pixel_shader),
            self.parameters.capacity(),
        );
        program.attributes = self.attributes;
        program.parameters = self.parameters;
        program
    }

    /// Serializes the record.
    pub fn to_bytes(&self) -> Result<Vec<u8>, IoError> {
        encode(self)
    }

    /// Parses a record.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, IoError> {
        let record: Self = decode(bytes)?;
        check_type(ResourceType::Program, record.type_hash)?;
        check_version(record.version)?;
        Ok(record)
    }
}

/// The resource type of a shader stage.
pub fn shader_type(stage: ShaderStage) -> ResourceType {
    match stage {
        ShaderStage::Vertex => ResourceType::VertexShader,
        ShaderStage::Pixel => ResourceType::PixelShader,
    }
}
