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

use anyhow::{Context, Result};
use khora_core::renderer::{RenderApi, RenderApiGroup};
use khora_core::resource::PlatformDecl;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Represents the structure of the `Resources.toml` manifest file.
///
/// ```toml
/// [[shaders]]
/// uuid = "6f1c2a52-8d3e-4c51-9d7a-2b9f0e1d4c77"
/// stage = "vertex"
/// variants = [
///     { group = "OpenGL", file = "sprite.vert" },
///     { group = "OpenGL", api = "OpenGL2", file = "sprite_gl2.vert" },
/// ]
///
/// [[programs]]
/// uuid = "0b8e6f4d-1a2c-4e3f-8b5d-7c9a6e2f1d30"
/// variants = [
///     { group = "OpenGL", vertex = "6f1c2a52-...", pixel = "..." },
/// ]
/// ```
#[derive(Deserialize, Debug, Default)]
pub struct ResourceManifest {
    #[serde(default)]
    pub shaders: Vec<ShaderEntry>,
    #[serde(default)]
    pub programs: Vec<ProgramEntry>,
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StageName {
    Vertex,
    Pixel,
}

impl StageName {
    /// The resource type name the compiler dispatches on.
    pub fn type_name(self) -> &'static str {
        match self {
            StageName::Vertex => "vertexshader",
            StageName::Pixel => "pixelshader",
        }
    }
}

/// The platform fields a variant is recorded for. Unset fields stay generic.
#[derive(Deserialize, Debug, Default, Clone, Copy)]
pub struct PlatformSpec {
    #[serde(default)]
    pub group: RenderApiGroup,
    #[serde(default)]
    pub api: RenderApi,
    #[serde(default)]
    pub quality_level: u8,
}

impl PlatformSpec {
    pub fn compose(&self) -> u64 {
        PlatformDecl {
            render_api_group: self.group,
            render_api: self.api,
            quality_level: self.quality_level,
            ..Default::default()
        }
        .compose()
    }
}

#[derive(Deserialize, Debug)]
pub struct ShaderEntry {
    pub uuid: String,
    pub stage: StageName,
    pub variants: Vec<ShaderVariant>,
}

#[derive(Deserialize, Debug)]
pub struct ShaderVariant {
    #[serde(flatten)]
    pub platform: PlatformSpec,
    /// GLSL file, relative to the manifest.
    pub file: PathBuf,
}

#[derive(Deserialize, Debug)]
pub struct ProgramEntry {
    pub uuid: String,
    pub variants: Vec<ProgramVariant>,
}

#[derive(Deserialize, Debug)]
pub struct ProgramVariant {
    #[serde(flatten)]
    pub platform: PlatformSpec,
    pub vertex: String,
    pub pixel: String,
}

/// Loads a manifest. Shader file paths come back resolved against its directory.
pub fn load_manifest(path: &Path) -> Result<ResourceManifest> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read manifest file at '{}'", path.display()))?;
    let mut manifest: ResourceManifest = toml::from_str(&text)
        .with_context(|| format!("Failed to parse TOML from '{}'", path.display()))?;

    let base = path.parent().unwrap_or_else(|| Path::new(""));
    for variant in manifest.shaders.iter_mut().flat_map(|s| s.variants.iter_mut()) {
        if variant.file.is_relative() {
            variant.file = base.join(&variant.file);
        }
    }
    Ok(manifest)
}
