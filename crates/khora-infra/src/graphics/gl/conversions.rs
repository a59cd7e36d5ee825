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

//! Conversions between engine types and GL enums, and the reflection tables.

use khora_core::renderer::{
    ClearMask, ParameterType, PixelFormat, Primitive, ShaderStage, VertexAttributeBinding,
    VertexFormat,
};

/// A local extension trait to convert our engine's types into GL enums.
/// This avoids Rust's orphan rules while keeping an idiomatic `.into_gl()` syntax.
pub trait IntoGl<T> {
    /// Consumes self and converts it into a GL-compatible value.
    fn into_gl(self) -> T;
}

impl IntoGl<u32> for ShaderStage {
    fn into_gl(self) -> u32 {
        match self {
            ShaderStage::Vertex => glow::VERTEX_SHADER,
            ShaderStage::Pixel => glow::FRAGMENT_SHADER,
        }
    }
}

impl IntoGl<u32> for Primitive {
    fn into_gl(self) -> u32 {
        match self {
            Primitive::TriangleList => glow::TRIANGLES,
            Primitive::LineList => glow::LINES,
        }
    }
}

impl IntoGl<u32> for ClearMask {
    fn into_gl(self) -> u32 {
        let mut bits = 0;
        if self.contains(ClearMask::COLOR) {
            bits |= glow::COLOR_BUFFER_BIT;
        }
        if self.contains(ClearMask::DEPTH) {
            bits |= glow::DEPTH_BUFFER_BIT;
        }
        if self.contains(ClearMask::STENCIL) {
            bits |= glow::STENCIL_BUFFER_BIT;
        }
        bits
    }
}

/// Internal format, pixel format and component type of a texture upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlPixelFormat {
    /// Sized internal format.
    pub internal: i32,
    /// Client pixel format.
    pub format: u32,
    /// Client component type.
    pub ty: u32,
}

impl IntoGl<GlPixelFormat> for PixelFormat {
    fn into_gl(self) -> GlPixelFormat {
        let (internal, format, ty) = match self {
            PixelFormat::R8G8B8A8 | PixelFormat::R8G8B8X8 => {
                (glow::RGBA8, glow::RGBA, glow::UNSIGNED_BYTE)
            }
            PixelFormat::R8G8B8 => (glow::RGB8, glow::RGB, glow::UNSIGNED_BYTE),
            PixelFormat::R32G32B32A32F => (glow::RGBA32F, glow::RGBA, glow::FLOAT),
            PixelFormat::A8 => (glow::R8, glow::RED, glow::UNSIGNED_BYTE),
        };
        GlPixelFormat {
            internal: internal as i32,
            format,
            ty,
        }
    }
}

/// Unpacks a `0xRRGGBBAA` color into normalized components.
pub fn unpack_color(color: u32) -> [f32; 4] {
    let channel = |shift: u32| ((color >> shift) & 0xFF) as f32 / 255.0;
    [channel(24), channel(16), channel(8), channel(0)]
}

// --- Reflection ---

/// Attribute names the compiler recognizes and the slots they bind to.
const ATTRIBUTE_NAMES: &[(&str, VertexAttributeBinding)] = &[
    ("position", VertexAttributeBinding::Position),
    ("color", VertexAttributeBinding::PrimaryColor),
    ("texcoord", VertexAttributeBinding::TexCoord0),
];

/// The semantic slot of an attribute, matched on its exact name.
pub fn attribute_binding(name: &str) -> Option<VertexAttributeBinding> {
    ATTRIBUTE_NAMES
        .iter()
        .find(|(known, _)| *known == name)
        .map(|&(_, binding)| binding)
}

/// The attribute name bound to a semantic slot, the inverse of [`attribute_binding`].
pub fn attribute_name(binding: VertexAttributeBinding) -> Option<&'static str> {
    ATTRIBUTE_NAMES
        .iter()
        .find(|(_, known)| *known == binding)
        .map(|&(name, _)| name)
}

/// The vertex format of a GL attribute type.
pub fn vertex_format(gl_type: u32) -> Option<VertexFormat> {
    match gl_type {
        glow::FLOAT => Some(VertexFormat::Float),
        glow::FLOAT_VEC2 => Some(VertexFormat::Float2),
        glow::FLOAT_VEC3 => Some(VertexFormat::Float3),
        glow::FLOAT_VEC4 => Some(VertexFormat::Float4),
        glow::INT | glow::UNSIGNED_INT => Some(VertexFormat::Int),
        glow::INT_VEC2 | glow::UNSIGNED_INT_VEC2 => Some(VertexFormat::Int2),
        glow::INT_VEC4 | glow::UNSIGNED_INT_VEC4 => Some(VertexFormat::Int4),
        _ => None,
    }
}

/// The parameter type of a GL uniform type.
pub fn parameter_type(gl_type: u32) -> Option<ParameterType> {
    match gl_type {
        glow::FLOAT_VEC4 => Some(ParameterType::Float4),
        glow::INT_VEC4 | glow::UNSIGNED_INT_VEC4 => Some(ParameterType::Int4),
        glow::FLOAT_MAT4 => Some(ParameterType::Matrix),
        glow::SAMPLER_2D => Some(ParameterType::Texture),
        _ => None,
    }
}
