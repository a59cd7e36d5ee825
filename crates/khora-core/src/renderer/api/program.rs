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

//! Linked programs and their platform-independent vertex and parameter layout.
//!
//! The layout is what the offline compiler persists: a vertex attribute list
//! packed by semantic binding and a parameter list with offsets into a single
//! uniform block.

use crate::renderer::api::backend::BackendData;
use crate::renderer::api::resource::ResourceOwner;
use crate::renderer::api::util::enums::{ParameterType, VertexAttributeBinding, VertexFormat};
use crate::renderer::api::util::flags::ShaderStageFlags;
use crate::renderer::backend::SharedShader;
use crate::renderer::error::ProgramError;
use crate::resource::ResourceUuid;
use bincode::de::Decoder;
use bincode::error::DecodeError;
use bincode::{Decode, Encode};

/// One vertex attribute of a program's input layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Encode, Decode)]
pub struct VertexAttribute {
    /// Semantic slot.
    pub binding: VertexAttributeBinding,
    /// Component layout.
    pub format: VertexFormat,
    /// Byte offset inside a vertex.
    pub offset: u16,
}

impl VertexAttribute {
    /// Size in bytes, derived from the format.
    pub fn size(&self) -> u16 {
        self.format.size()
    }
}

/// A program's vertex input layout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Encode, Decode)]
pub struct VertexAttributes {
    /// Attributes in ascending binding order.
    pub attributes: Vec<VertexAttribute>,
    /// Total size of one vertex.
    pub stride: u16,
}

impl VertexAttributes {
    /// Packs attributes given in any order.
    ///
    /// Attributes are sorted by binding and laid out back to back, so the
    /// result does not depend on the order the driver enumerated them in.
    pub fn pack<I>(attributes: I) -> Self
    where
        I: IntoIterator<Item = (VertexAttributeBinding, VertexFormat)>,
    {
        let mut attributes: Vec<VertexAttribute> = attributes
            .into_iter()
            .map(|(binding, format)| VertexAttribute {
                binding,
                format,
                offset: 0,
            })
            .collect();
        attributes.sort_unstable_by_key(|attribute| attribute.binding);

        let mut offset = 0u16;
        for attribute in &mut attributes {
            attribute.offset = offset;
            offset += attribute.size();
        }
        Self {
            attributes,
            stride: offset,
        }
    }

    /// Looks up the attribute bound to `binding`.
    pub fn get(&self, binding: VertexAttributeBinding) -> Option<&VertexAttribute> {
        self.attributes.iter().find(|a| a.binding == binding)
    }
}

/// One program parameter (uniform).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Encode, Decode)]
pub struct Parameter {
    /// Hash of the uniform name.
    pub name: u64,
    /// Backend location of the uniform.
    pub location: u32,
    /// Number of array elements.
    pub dim: u32,
    /// Byte offset inside the program's uniform block.
    pub offset: u32,
    /// Stages reading the parameter.
    pub stages: ShaderStageFlags,
    /// Semantic type.
    pub kind: ParameterType,
}

/// A parameter list whose capacity is fixed when the program is created.
#[derive(Debug, Clone, PartialEq, Eq, Encode)]
pub struct ParameterList {
    capacity: u32,
    parameters: Vec<Parameter>,
}

impl<Context> Decode<Context> for ParameterList {
    fn decode<D: Decoder<Context = Context>>(decoder: &mut D) -> Result<Self, DecodeError> {
        let capacity: u32 = Decode::decode(decoder)?;
        let parameters: Vec<Parameter> = Decode::decode(decoder)?;
        if parameters.len() > capacity as usize {
            return Err(DecodeError::OtherString(format!(
                "parameter list holds {} entries but has capacity {capacity}",
                parameters.len()
            )));
        }
        Ok(Self {
            capacity,
            parameters,
        })
    }
}
bincode::impl_borrow_decode!(ParameterList);

impl ParameterList {
    /// An empty list that will accept at most `capacity` parameters.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: capacity as u32,
            parameters: Vec::with_capacity(capacity),
        }
    }

    /// The fixed capacity.
    pub fn capacity(&self) -> usize {
        self.capacity as usize
    }

    /// Parameters in the order they were added.
    pub fn as_slice(&self) -> &[Parameter] {
        &self.parameters
    }

    /// Number of parameters.
    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    /// Returns `true` if no parameter was added.
    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    /// Size of the uniform block the parameters describe.
    pub fn block_size(&self) -> u32 {
        self.parameters
            .last()
            .map(|last| last.offset + last.kind.block_size())
            .unwrap_or(0)
    }

    /// Appends a parameter shared by the vertex and pixel stages, placing it
    /// right after the previous one in the uniform block.
    pub fn push(
        &mut self,
        name: u64,
        location: u32,
        dim: u32,
        kind: ParameterType,
    ) -> Result<&Parameter, ProgramError> {
        if self.parameters.len() >= self.capacity() {
            return Err(ProgramError::ParameterCapacityExceeded {
                capacity: self.capacity(),
            });
        }
        let offset = self.block_size();
        self.parameters.push(Parameter {
            name,
            location,
            dim,
            offset,
            stages: ShaderStageFlags::VERTEX_PIXEL,
            kind,
        });
        Ok(&self.parameters[self.parameters.len() - 1])
    }

    /// Looks up a parameter by name hash.
    pub fn find(&self, name: u64) -> Option<&Parameter> {
        self.parameters.iter().find(|p| p.name == name)
    }
}

/// A linked GPU program built from a vertex and a pixel shader.
#[derive(Debug)]
pub struct Program {
    uuid: ResourceUuid,
    /// Vertex shader the program was linked from.
    pub vertex_shader: ResourceUuid,
    /// Pixel shader the program was linked from.
    pub pixel_shader: ResourceUuid,
    /// Vertex input layout.
    pub attributes: VertexAttributes,
    /// Uniform layout.
    pub parameters: ParameterList,
    pub(crate) owner: ResourceOwner,
    /// Backend-opaque handles of the uploaded copy.
    pub backend_data: BackendData,
    shaders: Option<(SharedShader, SharedShader)>,
}

impl Program {
    /// A program with room for `num_parameters` parameters.
    pub fn new(
        uuid: ResourceUuid,
        vertex_shader: ResourceUuid,
        pixel_shader: ResourceUuid,
        num_parameters: usize,
    ) -> Self {
        Self {
            uuid,
            vertex_shader,
            pixel_shader,
            attributes: VertexAttributes::default(),
            parameters: ParameterList::with_capacity(num_parameters),
            owner: ResourceOwner::Unbound,
            backend_data: BackendData::default(),
            shaders: None,
        }
    }

    /// Resource identifier.
    pub fn uuid(&self) -> ResourceUuid {
        self.uuid
    }

    /// Current owner.
    pub fn owner(&self) -> &ResourceOwner {
        &self.owner
    }

    /// The vertex and pixel shaders the program was last linked from.
    pub fn shaders(&self) -> Option<&(SharedShader, SharedShader)> {
        self.shaders.as_ref()
    }

    /// Keeps `vertex` and `pixel` alive with the program, returning the
    /// previously attached pair.
    pub(crate) fn attach_shaders(
        &mut self,
        vertex: SharedShader,
        pixel: SharedShader,
    ) -> Option<(SharedShader, SharedShader)> {
        self.shaders.replace((vertex, pixel))
    }

    pub(crate) fn detach_shaders(&mut self) -> Option<(SharedShader, SharedShader)> {
        self.shaders.take()
    }
}
