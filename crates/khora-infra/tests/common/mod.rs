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

#![allow(dead_code)]

//! A scripted GL driver.
//!
//! Shader sources are plain text scanned for `attribute <type> <name>;` and
//! `uniform <type> <name>;` declarations, which become the program's active
//! attributes and uniforms in declaration order. A source containing `#error`
//! fails to compile; one containing `#link_error` fails to link.

use khora_core::renderer::{ClearMask, PixelFormat, Primitive, RenderApi, ShaderStage};
use khora_infra::graphics::gl::{ActiveVariable, GlDriver};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct MockProgram {
    shaders: Vec<u32>,
    links: u32,
    linked: bool,
    log: String,
}

#[derive(Default)]
pub struct GlState {
    pub calls: Vec<String>,
    next_handle: u32,
    shaders: HashMap<u32, (ShaderStage, String, String)>,
    programs: HashMap<u32, MockProgram>,
    pub contexts: Vec<RenderApi>,
}

impl GlState {
    fn handle(&mut self) -> u32 {
        self.next_handle += 1;
        self.next_handle
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.calls.iter().filter(|c| c.starts_with(prefix)).count()
    }

    pub fn live_shaders(&self) -> usize {
        self.shaders.len()
    }

    pub fn live_programs(&self) -> usize {
        self.programs.len()
    }
}

pub type SharedState = Arc<Mutex<GlState>>;

fn gl_type(name: &str) -> u32 {
    match name {
        "float" => glow::FLOAT,
        "vec2" => glow::FLOAT_VEC2,
        "vec3" => glow::FLOAT_VEC3,
        "vec4" => glow::FLOAT_VEC4,
        "int" => glow::INT,
        "ivec2" => glow::INT_VEC2,
        "ivec3" => glow::INT_VEC3,
        "ivec4" => glow::INT_VEC4,
        "uvec4" => glow::UNSIGNED_INT_VEC4,
        "mat3" => glow::FLOAT_MAT3,
        "mat4" => glow::FLOAT_MAT4,
        "sampler2D" => glow::SAMPLER_2D,
        _ => glow::NONE,
    }
}

fn declarations(source: &str, keyword: &str) -> Vec<ActiveVariable> {
    source
        .lines()
        .filter_map(|line| {
            let mut words = line.split_whitespace();
            if words.next()? != keyword {
                return None;
            }
            let ty = words.next()?;
            let name = words.next()?.trim_end_matches(';');
            Some(ActiveVariable {
                name: name.to_string(),
                size: 1,
                gl_type: gl_type(ty),
            })
        })
        .collect()
}

pub struct MockGl {
    state: SharedState,
}

impl MockGl {
    fn state(&self) -> std::sync::MutexGuard<'_, GlState> {
        self.state.lock().unwrap()
    }

    fn program_sources(&self, program: u32) -> Vec<(ShaderStage, String)> {
        let state = self.state();
        let Some(entry) = state.programs.get(&program) else {
            return Vec::new();
        };
        entry
            .shaders
            .iter()
            .filter_map(|s| state.shaders.get(s))
            .map(|(stage, source, _)| (*stage, source.clone()))
            .collect()
    }
}

impl GlDriver for MockGl {
    fn make_current(&mut self, current: bool) {
        self.state().calls.push(format!("make_current {current}"));
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.state().calls.push(format!("resize {width}x{height}"));
    }

    fn swap_buffers(&mut self) {
        self.state().calls.push("swap".to_string());
    }

    fn create_shader(&mut self, stage: ShaderStage) -> Result<u32, String> {
        let mut state = self.state();
        let handle = state.handle();
        state
            .shaders
            .insert(handle, (stage, String::new(), String::new()));
        state.calls.push(format!("create_shader {stage:?}"));
        Ok(handle)
    }

    fn compile_shader(&mut self, shader: u32, source: &str) -> bool {
        let mut state = self.state();
        state.calls.push(format!("compile_shader {shader}"));
        let Some(entry) = state.shaders.get_mut(&shader) else {
            return false;
        };
        entry.1 = source.to_string();
        if source.contains("#error") {
            entry.2 = "0:1: error: scripted failure".to_string();
            false
        } else {
            entry.2.clear();
            true
        }
    }

    fn shader_info_log(&self, shader: u32) -> String {
        self.state()
            .shaders
            .get(&shader)
            .map(|entry| entry.2.clone())
            .unwrap_or_default()
    }

    fn delete_shader(&mut self, shader: u32) {
        let mut state = self.state();
        state.shaders.remove(&shader);
        state.calls.push(format!("delete_shader {shader}"));
    }

    fn create_program(&mut self) -> Result<u32, String> {
        let mut state = self.state();
        let handle = state.handle();
        state.programs.insert(handle, MockProgram::default());
        Ok(handle)
    }

    fn attach_shader(&mut self, program: u32, shader: u32) {
        let mut state = self.state();
        if let Some(entry) = state.programs.get_mut(&program) {
            entry.shaders.push(shader);
        }
    }

    fn link_program(&mut self, program: u32) -> bool {
        let failed = self
            .program_sources(program)
            .iter()
            .any(|(_, source)| source.contains("#link_error"));
        let mut state = self.state();
        state.calls.push(format!("link {program}"));
        let Some(entry) = state.programs.get_mut(&program) else {
            return false;
        };
        entry.links += 1;
        entry.linked = !failed;
        entry.log = if failed {
            "error: scripted link failure".to_string()
        } else {
            String::new()
        };
        !failed
    }

    fn program_info_log(&self, program: u32) -> String {
        self.state()
            .programs
            .get(&program)
            .map(|entry| entry.log.clone())
            .unwrap_or_default()
    }

    fn active_attributes(&self, program: u32) -> Vec<ActiveVariable> {
        self.program_sources(program)
            .iter()
            .filter(|(stage, _)| *stage == ShaderStage::Vertex)
            .flat_map(|(_, source)| declarations(source, "attribute"))
            .collect()
    }

    fn active_uniforms(&self, program: u32) -> Vec<ActiveVariable> {
        let mut uniforms: Vec<ActiveVariable> = Vec::new();
        for (_, source) in self.program_sources(program) {
            for uniform in declarations(&source, "uniform") {
                if !uniforms.iter().any(|u| u.name == uniform.name) {
                    uniforms.push(uniform);
                }
            }
        }
        uniforms
    }

    fn bind_attrib_location(&mut self, _program: u32, location: u32, name: &str) {
        self.state().calls.push(format!("bind {name} {location}"));
    }

    fn uniform_location(&self, program: u32, name: &str) -> Option<u32> {
        self.active_uniforms(program)
            .iter()
            .position(|u| u.name == name)
            .map(|index| index as u32)
    }

    fn delete_program(&mut self, program: u32) {
        let mut state = self.state();
        state.programs.remove(&program);
        state.calls.push(format!("delete_program {program}"));
    }

    fn create_texture(
        &mut self,
        width: u32,
        height: u32,
        format: PixelFormat,
        _data: &[u8],
    ) -> Result<u32, String> {
        let mut state = self.state();
        let handle = state.handle();
        state
            .calls
            .push(format!("create_texture {width}x{height} {format:?}"));
        Ok(handle)
    }

    fn delete_texture(&mut self, texture: u32) {
        self.state().calls.push(format!("delete_texture {texture}"));
    }

    fn clear(&mut self, _mask: ClearMask, color: [f32; 4], _depth: f32, _stencil: i32) {
        self.state().calls.push(format!("clear {:?}", color));
    }

    fn viewport(&mut self, x: i32, y: i32, width: u32, height: u32, _min_z: f32, _max_z: f32) {
        self.state()
            .calls
            .push(format!("viewport {x},{y} {width}x{height}"));
    }

    fn draw(&mut self, _primitive: Primitive, program: u32, count: u32) {
        self.state().calls.push(format!("draw {program} {count}"));
    }

    fn blit(&mut self, source: u32, width: u32, height: u32) {
        self.state()
            .calls
            .push(format!("blit {source} {width}x{height}"));
    }
}

/// A context provider handing out scripted drivers for `apis` only.
pub fn provider(
    state: &SharedState,
    apis: &[RenderApi],
) -> impl Fn(RenderApi) -> Option<Box<dyn GlDriver>> + Send + Sync + 'static {
    let state = Arc::clone(state);
    let apis = apis.to_vec();
    move |api| {
        if !apis.contains(&api) {
            return None;
        }
        state.lock().unwrap().contexts.push(api);
        Some(Box::new(MockGl {
            state: Arc::clone(&state),
        }) as Box<dyn GlDriver>)
    }
}
