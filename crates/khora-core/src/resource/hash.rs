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

//! Stable 64-bit name hashing for resource keys, type tags and uniform names.

/// Hashes arbitrary bytes into a stable 64-bit value.
///
/// The value is persisted, so it must never change between builds: it is the
/// first eight bytes of the BLAKE3 digest read as little-endian.
pub fn hash_bytes(bytes: &[u8]) -> u64 {
    let digest = blake3::hash(bytes);
    let mut head = [0u8; 8];
    head.copy_from_slice(&digest.as_bytes()[..8]);
    u64::from_le_bytes(head)
}

/// Hashes a UTF-8 name.
pub fn hash_str(name: &str) -> u64 {
    hash_bytes(name.as_bytes())
}

/// Key under which a shader's raw source blob is recorded.
pub const KEY_SOURCE: &str = "source";
/// Key under which a program records its vertex shader reference.
pub const KEY_VERTEX_SHADER: &str = "vertexshader";
/// Key under which a program records its pixel shader reference.
pub const KEY_PIXEL_SHADER: &str = "pixelshader";

/// The kinds of resource the renderer compiles and loads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceType {
    /// A vertex shader.
    VertexShader,
    /// A pixel shader.
    PixelShader,
    /// A linked program.
    Program,
    /// A texture.
    Texture,
}

impl ResourceType {
    /// The type name as it appears in resource sources.
    pub fn name(self) -> &'static str {
        match self {
            ResourceType::VertexShader => "vertexshader",
            ResourceType::PixelShader => "pixelshader",
            ResourceType::Program => "program",
            ResourceType::Texture => "texture",
        }
    }

    /// Resolves a type name, if known.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "vertexshader" => Some(ResourceType::VertexShader),
            "pixelshader" => Some(ResourceType::PixelShader),
            "program" => Some(ResourceType::Program),
            "texture" => Some(ResourceType::Texture),
            _ => None,
        }
    }

    /// The persisted type hash.
    pub fn hash(self) -> u64 {
        hash_str(self.name())
    }

    /// Resolves a persisted type hash, if known.
    pub fn from_hash(hash: u64) -> Option<Self> {
        [
            ResourceType::VertexShader,
            ResourceType::PixelShader,
            ResourceType::Program,
            ResourceType::Texture,
        ]
        .into_iter()
        .find(|kind| kind.hash() == hash)
    }
}
