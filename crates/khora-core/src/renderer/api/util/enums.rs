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

//! Generic rendering enums.

use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};

/// Identifies a graphics API, either abstract (a family to be resolved) or concrete.
///
/// The discriminants are stable: they are packed into resource platform tags
/// and must not be reordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum RenderApi {
    /// No API, or the end of a fallback chain.
    #[default]
    Unknown = 0,
    /// Whatever API is preferred on the current platform.
    Default = 1,
    /// A backend that accepts every call and draws nothing.
    Null = 2,
    /// Any OpenGL desktop variant.
    OpenGL = 3,
    /// Any DirectX variant.
    DirectX = 4,
    /// Any OpenGL ES variant.
    Gles = 5,
    /// OpenGL 2.x.
    OpenGL2 = 6,
    /// OpenGL 4.x core profile.
    OpenGL4 = 7,
    /// DirectX 10.
    DirectX10 = 8,
    /// DirectX 11.
    DirectX11 = 9,
    /// OpenGL ES 2.
    Gles2 = 10,
    /// OpenGL ES 3.
    Gles3 = 11,
    /// PlayStation 3.
    Ps3 = 12,
    /// PlayStation 4.
    Ps4 = 13,
    /// Xbox 360.
    Xbox360 = 14,
    /// Xbox One.
    XboxOne = 15,
}

impl RenderApi {
    /// Every API value, in discriminant order.
    pub const ALL: [RenderApi; 16] = [
        RenderApi::Unknown,
        RenderApi::Default,
        RenderApi::Null,
        RenderApi::OpenGL,
        RenderApi::DirectX,
        RenderApi::Gles,
        RenderApi::OpenGL2,
        RenderApi::OpenGL4,
        RenderApi::DirectX10,
        RenderApi::DirectX11,
        RenderApi::Gles2,
        RenderApi::Gles3,
        RenderApi::Ps3,
        RenderApi::Ps4,
        RenderApi::Xbox360,
        RenderApi::XboxOne,
    ];

    /// Converts a raw discriminant back into an API, mapping unknown values to `Unknown`.
    pub fn from_raw(raw: u8) -> Self {
        Self::ALL
            .get(raw as usize)
            .copied()
            .unwrap_or(RenderApi::Unknown)
    }

    /// The next API to try when this one is disabled or fails to construct.
    ///
    /// Abstract families resolve to their most capable concrete member, concrete
    /// APIs step down to a less capable sibling, and every chain ends at
    /// `Null` and then `Unknown`.
    pub fn fallback(self) -> RenderApi {
        match self {
            RenderApi::Unknown => RenderApi::Unknown,
            RenderApi::Default => Self::platform_default(),
            RenderApi::Null => RenderApi::Unknown,
            RenderApi::OpenGL => RenderApi::OpenGL4,
            RenderApi::DirectX => RenderApi::DirectX11,
            RenderApi::Gles => RenderApi::Gles3,
            RenderApi::OpenGL4 => {
                if cfg!(windows) {
                    RenderApi::DirectX10
                } else {
                    RenderApi::OpenGL2
                }
            }
            RenderApi::DirectX10 => RenderApi::OpenGL2,
            RenderApi::DirectX11 => RenderApi::OpenGL4,
            RenderApi::Gles3 => RenderApi::Gles2,
            RenderApi::Gles2 => RenderApi::Null,
            RenderApi::OpenGL2 => RenderApi::Null,
            RenderApi::Ps3 | RenderApi::Ps4 | RenderApi::Xbox360 | RenderApi::XboxOne => {
                RenderApi::Null
            }
        }
    }

    fn platform_default() -> RenderApi {
        if cfg!(windows) {
            RenderApi::DirectX
        } else if cfg!(any(target_os = "ios", target_os = "android")) {
            RenderApi::Gles
        } else {
            RenderApi::OpenGL
        }
    }

    /// Returns `true` for the family placeholders that never construct a backend themselves.
    pub fn is_abstract(self) -> bool {
        matches!(
            self,
            RenderApi::Default | RenderApi::OpenGL | RenderApi::DirectX | RenderApi::Gles
        )
    }

    /// Returns `true` for desktop OpenGL, abstract or concrete.
    pub fn is_opengl(self) -> bool {
        matches!(
            self,
            RenderApi::OpenGL | RenderApi::OpenGL2 | RenderApi::OpenGL4
        )
    }

    /// The API group this API belongs to.
    pub fn group(self) -> RenderApiGroup {
        match self {
            RenderApi::OpenGL | RenderApi::OpenGL2 | RenderApi::OpenGL4 => RenderApiGroup::OpenGL,
            RenderApi::DirectX | RenderApi::DirectX10 | RenderApi::DirectX11 => {
                RenderApiGroup::DirectX
            }
            RenderApi::Gles | RenderApi::Gles2 | RenderApi::Gles3 => RenderApiGroup::Gles,
            _ => RenderApiGroup::None,
        }
    }

    /// A short human-readable name, used in logs.
    pub fn name(self) -> &'static str {
        match self {
            RenderApi::Unknown => "unknown",
            RenderApi::Default => "default",
            RenderApi::Null => "null",
            RenderApi::OpenGL => "OpenGL",
            RenderApi::DirectX => "DirectX",
            RenderApi::Gles => "OpenGL ES",
            RenderApi::OpenGL2 => "OpenGL 2",
            RenderApi::OpenGL4 => "OpenGL 4",
            RenderApi::DirectX10 => "DirectX 10",
            RenderApi::DirectX11 => "DirectX 11",
            RenderApi::Gles2 => "OpenGL ES 2",
            RenderApi::Gles3 => "OpenGL ES 3",
            RenderApi::Ps3 => "PS3",
            RenderApi::Ps4 => "PS4",
            RenderApi::Xbox360 => "Xbox 360",
            RenderApi::XboxOne => "Xbox One",
        }
    }
}

impl std::fmt::Display for RenderApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A family of related graphics APIs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum RenderApiGroup {
    /// No specific group.
    #[default]
    None = 0,
    /// Desktop OpenGL.
    OpenGL = 1,
    /// DirectX.
    DirectX = 2,
    /// OpenGL ES.
    Gles = 3,
}

impl RenderApiGroup {
    /// Converts a raw discriminant back into a group, mapping unknown values to `None`.
    pub fn from_raw(raw: u8) -> Self {
        match raw {
            1 => RenderApiGroup::OpenGL,
            2 => RenderApiGroup::DirectX,
            3 => RenderApiGroup::Gles,
            _ => RenderApiGroup::None,
        }
    }

    /// The abstract API standing for the whole group, if the group is specific.
    pub fn api(self) -> Option<RenderApi> {
        match self {
            RenderApiGroup::OpenGL => Some(RenderApi::OpenGL),
            RenderApiGroup::DirectX => Some(RenderApi::DirectX),
            RenderApiGroup::Gles => Some(RenderApi::Gles),
            RenderApiGroup::None => None,
        }
    }
}

/// Pixel layout of a framebuffer or texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PixelFormat {
    /// 8 bits per channel, red-green-blue-alpha.
    R8G8B8A8,
    /// 8 bits per channel, red-green-blue with an unused fourth byte.
    R8G8B8X8,
    /// 8 bits per channel, red-green-blue.
    R8G8B8,
    /// 32-bit float per channel, red-green-blue-alpha.
    R32G32B32A32F,
    /// 8-bit single channel.
    A8,
}

impl PixelFormat {
    /// Size in bytes of a single pixel.
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            PixelFormat::R8G8B8A8 | PixelFormat::R8G8B8X8 => 4,
            PixelFormat::R8G8B8 => 3,
            PixelFormat::R32G32B32A32F => 16,
            PixelFormat::A8 => 1,
        }
    }
}

/// How color values stored in a surface are to be interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ColorSpace {
    /// Linear color values.
    #[default]
    Linear,
    /// sRGB-encoded color values.
    Srgb,
}

/// A programmable pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    /// Processes individual vertices.
    Vertex,
    /// Processes rasterized pixels.
    Pixel,
}

/// Component layout of a single vertex attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Encode, Decode)]
pub enum VertexFormat {
    /// One 32-bit float.
    Float,
    /// Two 32-bit floats.
    Float2,
    /// Three 32-bit floats.
    Float3,
    /// Four 32-bit floats.
    Float4,
    /// Four unsigned bytes.
    Ubyte4,
    /// Four normalized unsigned bytes.
    Ubyte4Normalized,
    /// One 32-bit integer.
    Int,
    /// Two 32-bit integers.
    Int2,
    /// Four 32-bit integers.
    Int4,
}

impl VertexFormat {
    /// Size in bytes of one attribute of this format.
    pub fn size(self) -> u16 {
        match self {
            VertexFormat::Float => 4,
            VertexFormat::Float2 => 8,
            VertexFormat::Float3 => 12,
            VertexFormat::Float4 => 16,
            VertexFormat::Ubyte4 | VertexFormat::Ubyte4Normalized => 4,
            VertexFormat::Int => 4,
            VertexFormat::Int2 => 8,
            VertexFormat::Int4 => 16,
        }
    }
}

/// Semantic slot a vertex attribute is bound to.
///
/// The ordering of the variants is the attribute packing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Encode, Decode)]
#[repr(u8)]
pub enum VertexAttributeBinding {
    /// Vertex position.
    Position = 0,
    /// Skinning weights.
    Weight = 1,
    /// Vertex normal.
    Normal = 2,
    /// Primary vertex color.
    PrimaryColor = 3,
    /// Secondary vertex color.
    SecondaryColor = 4,
    /// Fog coordinate.
    FogCoord = 5,
    /// First texture coordinate set.
    TexCoord0 = 8,
    /// Second texture coordinate set.
    TexCoord1 = 9,
    /// Third texture coordinate set.
    TexCoord2 = 10,
    /// Fourth texture coordinate set.
    TexCoord3 = 11,
    /// Fifth texture coordinate set.
    TexCoord4 = 12,
    /// Sixth texture coordinate set.
    TexCoord5 = 13,
    /// Seventh texture coordinate set.
    TexCoord6 = 14,
    /// Eighth texture coordinate set.
    TexCoord7 = 15,
}

impl VertexAttributeBinding {
    /// The attribute location this binding occupies.
    pub fn location(self) -> u32 {
        self as u32
    }
}

/// Semantic type of a program parameter (uniform).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Encode, Decode)]
pub enum ParameterType {
    /// Four floats.
    Float4,
    /// Four integers.
    Int4,
    /// A 4x4 float matrix.
    Matrix,
    /// A texture binding.
    Texture,
    /// A render target sampled as a texture.
    Target,
}

impl ParameterType {
    /// Bytes the parameter occupies in a uniform block.
    pub fn block_size(self) -> u32 {
        match self {
            ParameterType::Float4 | ParameterType::Int4 => 16,
            ParameterType::Matrix => 64,
            ParameterType::Texture | ParameterType::Target => 4,
        }
    }
}

/// Primitive topology for draw commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Primitive {
    /// Independent triangles.
    #[default]
    TriangleList,
    /// Independent lines.
    LineList,
}
