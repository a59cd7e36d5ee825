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

mod common;

use common::{provider, GlState, SharedState};
use khora_core::renderer::{
    BackendRegistry, ParameterType, ProgramError, RenderApi, RenderApiGroup, RenderConfig,
    ShaderError, ShaderStage, ShaderStageFlags, VertexAttributeBinding, VertexFormat,
};
use khora_core::resource::{
    hash_str, PlatformDecl, ResourceUuid, KEY_PIXEL_SHADER, KEY_SOURCE, KEY_VERTEX_SHADER,
    PLATFORM_ALL,
};
use khora_infra::compile::{CompileError, FailureReason};
use khora_infra::{InfraBackendFactory, ResourceCompiler};
use khora_io::record::{ProgramStaticRecord, ShaderDynamicRecord, ShaderStaticRecord};
use khora_io::source::MemorySourceRepository;
use khora_io::store::MemoryResourceStore;
use khora_io::{ResourceSource, ResourceStore, SourceRepository, StreamKind};
use std::sync::{Arc, Mutex};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn platform(group: RenderApiGroup, api: RenderApi) -> u64 {
    PlatformDecl {
        render_api_group: group,
        render_api: api,
        ..Default::default()
    }
    .compose()
}

fn gl() -> u64 {
    platform(RenderApiGroup::OpenGL, RenderApi::Unknown)
}

fn gl2() -> u64 {
    platform(RenderApiGroup::OpenGL, RenderApi::OpenGL2)
}

fn gl4() -> u64 {
    platform(RenderApiGroup::OpenGL, RenderApi::OpenGL4)
}

struct Fixture {
    state: SharedState,
    registry: BackendRegistry,
    repository: MemorySourceRepository,
    store: MemoryResourceStore,
}

impl Fixture {
    fn with_gl() -> Self {
        let state = Arc::new(Mutex::new(GlState::default()));
        let apis = [RenderApi::OpenGL4, RenderApi::OpenGL2];
        let factory = InfraBackendFactory::with_gl(provider(&state, &apis));
        Self::new(state, factory)
    }

    fn without_gl() -> Self {
        Self::new(
            Arc::new(Mutex::new(GlState::default())),
            InfraBackendFactory::new(),
        )
    }

    fn new(state: SharedState, factory: InfraBackendFactory) -> Self {
        init_logger();
        Self {
            state,
            registry: BackendRegistry::new(factory, RenderConfig::default()),
            repository: MemorySourceRepository::new(),
            store: MemoryResourceStore::new(),
        }
    }

    /// Records GLSL blobs for a shader and persists its source.
    fn shader(&self, uuid: ResourceUuid, variants: &[(u64, &str)]) -> ResourceSource {
        let mut source = ResourceSource::new();
        for &(platform, text) in variants {
            self.repository
                .set_blob(&mut source, uuid, hash_str(KEY_SOURCE), platform, text.as_bytes())
                .unwrap();
        }
        self.repository.write(uuid, &source).unwrap();
        source
    }

    /// Records shader references for a program.
    fn program(
        &self,
        uuid: ResourceUuid,
        vertex: &[(u64, ResourceUuid)],
        pixel: &[(u64, ResourceUuid)],
    ) -> ResourceSource {
        let mut source = ResourceSource::new();
        for &(platform, shader) in vertex {
            source.set(hash_str(KEY_VERTEX_SHADER), platform, shader.to_string());
        }
        for &(platform, shader) in pixel {
            source.set(hash_str(KEY_PIXEL_SHADER), platform, shader.to_string());
        }
        self.repository.write(uuid, &source).unwrap();
        source
    }

    fn compile(
        &mut self,
        uuid: ResourceUuid,
        source: &ResourceSource,
        type_name: &str,
    ) -> Result<(), CompileError> {
        ResourceCompiler::new(&mut self.registry, &self.repository, &self.store)
            .compile(uuid, PLATFORM_ALL, source, type_name)
    }

    fn stored(&self, uuid: ResourceUuid, kind: StreamKind, platform: u64) -> Option<Vec<u8>> {
        self.store.read(uuid, kind, platform).unwrap()
    }
}

const VERTEX_SOURCE: &str = "attribute vec2 texcoord;
attribute vec3 position;
attribute vec4 color;
uniform vec4 tint;
uniform mat4 transform;
void main() {}
";

const PIXEL_SOURCE: &str = "uniform sampler2D albedo;
uniform vec4 tint;
void main() {}
";

fn failures(result: Result<(), CompileError>) -> Vec<(u64, FailureReason)> {
    match result {
        Err(CompileError::Failed { failures, .. }) => failures
            .into_iter()
            .map(|failure| (failure.platform, failure.reason))
            .collect(),
        other => panic!("expected per-platform failures, got {other:?}"),
    }
}

#[test]
fn shader_is_compiled_for_every_recorded_gl_platform() {
    // --- 1. ARRANGE ---
    let mut fx = Fixture::with_gl();
    let uuid = ResourceUuid::new();
    let source = fx.shader(uuid, &[(gl4(), VERTEX_SOURCE), (gl2(), "void main() {}\n")]);

    // --- 2. ACT ---
    let result = fx.compile(uuid, &source, "vertexshader");

    // --- 3. ASSERT ---
    assert!(result.is_ok(), "{result:?}");
    for (platform, text) in [(gl4(), VERTEX_SOURCE), (gl2(), "void main() {}\n")] {
        let header = fx.stored(uuid, StreamKind::Static, platform).unwrap();
        assert_eq!(header.len(), 12);
        assert!(ShaderStaticRecord::from_bytes(&header, ShaderStage::Vertex).is_ok());

        let payload = fx.stored(uuid, StreamKind::Dynamic, platform).unwrap();
        let record = ShaderDynamicRecord::from_bytes(&payload).unwrap();
        assert_eq!(record.payload, text.as_bytes());
    }
    assert!(fx.registry.backends().is_empty());
    let state = fx.state.lock().unwrap();
    assert_eq!(state.contexts, vec![RenderApi::OpenGL4, RenderApi::OpenGL2]);
    assert_eq!(state.live_shaders(), 0);
}

#[test]
fn shader_compile_error_fails_only_its_platform() {
    // --- 1. ARRANGE ---
    let mut fx = Fixture::with_gl();
    let uuid = ResourceUuid::new();
    let source = fx.shader(uuid, &[(gl4(), "#error\n"), (gl2(), "void main() {}\n")]);

    // --- 2. ACT ---
    let failures = failures(fx.compile(uuid, &source, "pixelshader"));

    // --- 3. ASSERT ---
    assert_eq!(failures.len(), 1);
    let (platform, reason) = &failures[0];
    assert_eq!(*platform, gl4());
    match reason {
        FailureReason::Shader(ShaderError::CompilationFailed { stage, log }) => {
            assert_eq!(*stage, ShaderStage::Pixel);
            assert!(log.contains("scripted failure"));
        }
        other => panic!("unexpected failure {other:?}"),
    }
    assert!(fx.stored(uuid, StreamKind::Static, gl4()).is_none());
    assert!(fx.stored(uuid, StreamKind::Dynamic, gl4()).is_none());
    assert!(fx.stored(uuid, StreamKind::Static, gl2()).is_some());
}

#[test]
fn generic_and_non_gl_platforms_are_skipped() {
    let mut fx = Fixture::with_gl();
    let uuid = ResourceUuid::new();
    let directx = platform(RenderApiGroup::DirectX, RenderApi::Unknown);
    let source = fx.shader(uuid, &[(0, "void main() {}\n"), (directx, "float4 main() {}\n")]);

    let result = fx.compile(uuid, &source, "vertexshader");

    assert!(result.is_ok(), "{result:?}");
    assert!(fx.store.platforms(uuid, StreamKind::Static).unwrap().is_empty());
    assert!(fx.registry.backends().is_empty());
}

#[test]
fn shader_without_gl_context_reports_the_backend_it_got() {
    let mut fx = Fixture::without_gl();
    let uuid = ResourceUuid::new();
    let source = fx.shader(uuid, &[(gl4(), "void main() {}\n")]);

    let failures = failures(fx.compile(uuid, &source, "vertexshader"));

    assert!(matches!(
        failures.as_slice(),
        [(_, FailureReason::NoContext { api: RenderApi::Null })]
    ));
}

#[test]
fn program_layout_is_reflected_and_persisted() {
    // --- 1. ARRANGE ---
    let mut fx = Fixture::with_gl();
    let (vs, ps, program) = (ResourceUuid::new(), ResourceUuid::new(), ResourceUuid::new());
    let vs_source = fx.shader(vs, &[(gl4(), VERTEX_SOURCE)]);
    let ps_source = fx.shader(ps, &[(gl4(), PIXEL_SOURCE)]);
    fx.compile(vs, &vs_source, "vertexshader").unwrap();
    fx.compile(ps, &ps_source, "pixelshader").unwrap();
    let source = fx.program(program, &[(gl4(), vs)], &[(gl4(), ps)]);
    fx.state.lock().unwrap().calls.clear();

    // --- 2. ACT ---
    let result = fx.compile(program, &source, "program");

    // --- 3. ASSERT ---
    assert!(result.is_ok(), "{result:?}");
    let bytes = fx.stored(program, StreamKind::Static, gl4()).unwrap();
    let program = ProgramStaticRecord::from_bytes(&bytes)
        .unwrap()
        .into_program(program);
    assert_eq!(program.vertex_shader, vs);
    assert_eq!(program.pixel_shader, ps);

    let layout: Vec<_> = program
        .attributes
        .attributes
        .iter()
        .map(|a| (a.binding, a.format, a.offset))
        .collect();
    assert_eq!(
        layout,
        vec![
            (VertexAttributeBinding::Position, VertexFormat::Float3, 0),
            (VertexAttributeBinding::PrimaryColor, VertexFormat::Float4, 12),
            (VertexAttributeBinding::TexCoord0, VertexFormat::Float2, 28),
        ]
    );
    assert_eq!(program.attributes.stride, 36);

    let parameters: Vec<_> = program
        .parameters
        .as_slice()
        .iter()
        .map(|p| (p.name, p.kind, p.offset, p.location))
        .collect();
    assert_eq!(
        parameters,
        vec![
            (hash_str("tint"), ParameterType::Float4, 0, 0),
            (hash_str("transform"), ParameterType::Matrix, 16, 1),
            (hash_str("albedo"), ParameterType::Texture, 80, 2),
        ]
    );
    assert!(program
        .parameters
        .as_slice()
        .iter()
        .all(|p| p.stages == ShaderStageFlags::VERTEX_PIXEL && p.dim == 1));

    let state = fx.state.lock().unwrap();
    assert_eq!(state.count("link "), 2);
    for bind in ["bind texcoord 8", "bind position 0", "bind color 3"] {
        assert_eq!(state.count(bind), 1, "{bind}");
    }
    assert_eq!(state.live_programs(), 0);
    assert_eq!(state.live_shaders(), 0);
}

#[test]
fn missing_vertex_shader_fails_only_that_platform() {
    // --- 1. ARRANGE ---
    let mut fx = Fixture::with_gl();
    let (vs, ps, program) = (ResourceUuid::new(), ResourceUuid::new(), ResourceUuid::new());
    let vs_source = fx.shader(vs, &[(gl4(), VERTEX_SOURCE)]);
    let ps_source = fx.shader(ps, &[(gl4(), PIXEL_SOURCE), (gl2(), PIXEL_SOURCE)]);
    fx.compile(vs, &vs_source, "vertexshader").unwrap();
    fx.compile(ps, &ps_source, "pixelshader").unwrap();
    let source = fx.program(program, &[(gl4(), vs)], &[(gl4(), ps), (gl2(), ps)]);

    // --- 2. ACT ---
    let failures = failures(fx.compile(program, &source, "program"));

    // --- 3. ASSERT ---
    assert!(matches!(
        failures.as_slice(),
        [(p, FailureReason::Program(ProgramError::MissingShader { stage: ShaderStage::Vertex }))]
            if *p == gl2()
    ));
    assert!(fx.stored(program, StreamKind::Static, gl2()).is_none());
    assert!(fx.stored(program, StreamKind::Static, gl4()).is_some());
}

#[test]
fn unknown_attribute_name_fails_the_program() {
    let mut fx = Fixture::with_gl();
    let (vs, ps, program) = (ResourceUuid::new(), ResourceUuid::new(), ResourceUuid::new());
    let vs_source = fx.shader(vs, &[(gl4(), "attribute vec3 normal;\n")]);
    let ps_source = fx.shader(ps, &[(gl4(), PIXEL_SOURCE)]);
    fx.compile(vs, &vs_source, "vertexshader").unwrap();
    fx.compile(ps, &ps_source, "pixelshader").unwrap();
    let source = fx.program(program, &[(gl4(), vs)], &[(gl4(), ps)]);

    let failures = failures(fx.compile(program, &source, "program"));

    assert!(matches!(
        failures.as_slice(),
        [(_, FailureReason::Program(ProgramError::UnknownAttribute { name }))] if name == "normal"
    ));
    assert!(fx.stored(program, StreamKind::Static, gl4()).is_none());
    assert_eq!(fx.state.lock().unwrap().live_programs(), 0);
}

#[test]
fn unsupported_uniform_type_fails_the_program() {
    let mut fx = Fixture::with_gl();
    let (vs, ps, program) = (ResourceUuid::new(), ResourceUuid::new(), ResourceUuid::new());
    let vs_source = fx.shader(vs, &[(gl4(), "attribute vec3 position;\nuniform mat3 normals;\n")]);
    let ps_source = fx.shader(ps, &[(gl4(), PIXEL_SOURCE)]);
    fx.compile(vs, &vs_source, "vertexshader").unwrap();
    fx.compile(ps, &ps_source, "pixelshader").unwrap();
    let source = fx.program(program, &[(gl4(), vs)], &[(gl4(), ps)]);

    let failures = failures(fx.compile(program, &source, "program"));

    assert!(matches!(
        failures.as_slice(),
        [(_, FailureReason::Program(ProgramError::UnsupportedUniformType { code, .. }))]
            if *code == glow::FLOAT_MAT3
    ));
}

#[test]
fn link_failure_reports_driver_log() {
    let mut fx = Fixture::with_gl();
    let (vs, ps, program) = (ResourceUuid::new(), ResourceUuid::new(), ResourceUuid::new());
    let vs_source = fx.shader(vs, &[(gl4(), "attribute vec3 position;\n")]);
    let ps_source = fx.shader(ps, &[(gl4(), "#link_error\n")]);
    fx.compile(vs, &vs_source, "vertexshader").unwrap();
    fx.compile(ps, &ps_source, "pixelshader").unwrap();
    let source = fx.program(program, &[(gl4(), vs)], &[(gl4(), ps)]);

    let failures = failures(fx.compile(program, &source, "program"));

    let [(_, FailureReason::Program(ProgramError::LinkFailed { log }))] = failures.as_slice() else {
        panic!("expected one link failure, got {failures:?}");
    };
    assert!(log.contains("scripted link failure"));
}

#[test]
fn program_follows_shader_specializations() {
    // --- 1. ARRANGE ---
    let mut fx = Fixture::with_gl();
    let (vs, ps, program) = (ResourceUuid::new(), ResourceUuid::new(), ResourceUuid::new());
    let vs_source = fx.shader(
        vs,
        &[
            (gl(), "attribute vec3 position;\n"),
            (gl4(), "attribute vec3 position;\nattribute vec4 color;\n"),
        ],
    );
    let ps_source = fx.shader(ps, &[(gl(), PIXEL_SOURCE)]);
    fx.compile(vs, &vs_source, "vertexshader").unwrap();
    fx.compile(ps, &ps_source, "pixelshader").unwrap();
    let source = fx.program(program, &[(gl(), vs)], &[(gl(), ps)]);

    // --- 2. ACT ---
    let result = fx.compile(program, &source, "program");

    // --- 3. ASSERT ---
    assert!(result.is_ok(), "{result:?}");
    let mut platforms = fx.store.platforms(program, StreamKind::Static).unwrap();
    platforms.sort_unstable();
    let mut expected = vec![gl(), gl4()];
    expected.sort_unstable();
    assert_eq!(platforms, expected);

    let bytes = fx.stored(program, StreamKind::Static, gl4()).unwrap();
    let specialized = ProgramStaticRecord::from_bytes(&bytes).unwrap();
    assert_eq!(specialized.attributes.stride, 28);
}

#[test]
fn unsupported_type_names_are_rejected() {
    let mut fx = Fixture::with_gl();
    let uuid = ResourceUuid::new();
    let source = ResourceSource::new();

    for name in ["texture", "mesh"] {
        let result = fx.compile(uuid, &source, name);
        assert!(
            matches!(result, Err(CompileError::UnsupportedType { .. })),
            "{name}"
        );
    }
}

#[test]
fn compile_stored_reads_the_repository() {
    let mut fx = Fixture::with_gl();
    let uuid = ResourceUuid::new();
    fx.shader(uuid, &[(gl4(), "void main() {}\n")]);

    let compiled = ResourceCompiler::new(&mut fx.registry, &fx.repository, &fx.store)
        .compile_stored(uuid, gl4(), "vertexshader");
    let missing = ResourceCompiler::new(&mut fx.registry, &fx.repository, &fx.store)
        .compile_stored(ResourceUuid::new(), gl4(), "vertexshader");

    assert!(compiled.is_ok(), "{compiled:?}");
    assert!(fx.stored(uuid, StreamKind::Dynamic, gl4()).is_some());
    assert!(matches!(missing, Err(CompileError::MissingSource { .. })));
}
