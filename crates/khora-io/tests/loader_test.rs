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

use khora_core::renderer::{
    AdapterId, BackendFactory, BackendOps, BackendRegistry, ColorSpace, Drawable, ParameterType,
    PixelFormat, Program, RenderApi, RenderBackend, RenderConfig, RenderContext, RenderTarget,
    Resolution, Shader, ShaderStage, Texture, ThreadBinding, VertexAttributeBinding,
    VertexAttributes, VertexFormat,
};
use khora_core::resource::{PlatformDecl, ResourceUuid};
use khora_io::loader::{handle_resource_event, load_program, load_shader};
use khora_io::record::{ProgramStaticRecord, ShaderDynamicRecord, ShaderStaticRecord};
use khora_io::store::{MemoryResourceStore, ResourceStore, StreamKind};
use khora_io::LoadError;
use std::any::Any;
use std::sync::{Arc, Mutex};

// --- Test Setup: a backend that stores uploaded payload sizes as handles ---
#[derive(Default)]
struct Uploads {
    shaders: Vec<usize>,
    programs: usize,
    live_shaders: usize,
}

struct RecordingOps {
    uploads: Arc<Mutex<Uploads>>,
}

impl BackendOps for RecordingOps {
    fn api(&self) -> RenderApi {
        RenderApi::Null
    }
    fn construct(&mut self) -> bool {
        true
    }
    fn destruct(&mut self) {}
    fn enumerate_adapters(&self) -> Vec<AdapterId> {
        Vec::new()
    }
    fn enumerate_modes(&self, _: AdapterId) -> Vec<Resolution> {
        Vec::new()
    }
    fn set_drawable(&mut self, _: &Drawable, _: PixelFormat, _: ColorSpace) -> bool {
        true
    }
    fn enable_thread(&mut self) {}
    fn disable_thread(&mut self) {}
    fn dispatch(&mut self, _: &RenderTarget, _: &[&RenderContext]) {}
    fn flip(&mut self) {}
    fn upload_shader(&mut self, shader: &mut Shader, blob: &[u8]) -> bool {
        let mut uploads = self.uploads.lock().unwrap();
        if shader.backend_data[0] == 0 {
            uploads.live_shaders += 1;
        }
        shader.backend_data[0] = blob.len() as u64;
        uploads.shaders.push(blob.len());
        true
    }
    fn upload_program(&mut self, program: &mut Program, vertex: &Shader, pixel: &Shader) -> bool {
        program.backend_data[0] = vertex.backend_data[0] + pixel.backend_data[0];
        self.uploads.lock().unwrap().programs += 1;
        true
    }
    fn upload_texture(&mut self, _: &mut Texture, _: &[u8]) -> bool {
        true
    }
    fn deallocate_shader(&mut self, shader: &mut Shader) {
        if shader.backend_data[0] != 0 {
            self.uploads.lock().unwrap().live_shaders -= 1;
            shader.backend_data[0] = 0;
        }
    }
    fn deallocate_program(&mut self, _: &mut Program) {}
    fn deallocate_texture(&mut self, _: &mut Texture) {}
    fn parameter_bind_texture(&self, _: &mut [u8], _: usize, _: &Texture) {}
    fn parameter_bind_target(&self, _: &mut [u8], _: usize, _: &RenderTarget) {}
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

struct RecordingFactory {
    uploads: Arc<Mutex<Uploads>>,
}

impl BackendFactory for RecordingFactory {
    fn create(&self, api: RenderApi) -> Option<Box<dyn BackendOps>> {
        (api == RenderApi::Null).then(|| {
            Box::new(RecordingOps {
                uploads: Arc::clone(&self.uploads),
            }) as Box<dyn BackendOps>
        })
    }
}

fn null_platform() -> u64 {
    PlatformDecl {
        render_api: RenderApi::Null,
        ..Default::default()
    }
    .compose()
}

fn store_shader(
    store: &MemoryResourceStore,
    uuid: ResourceUuid,
    stage: ShaderStage,
    payload: &[u8],
) {
    let platform = null_platform();
    let header = ShaderStaticRecord::new(stage).to_bytes().unwrap();
    let body = ShaderDynamicRecord::new(payload.to_vec()).to_bytes().unwrap();
    store.write(uuid, StreamKind::Static, platform, &header).unwrap();
    store.write(uuid, StreamKind::Dynamic, platform, &body).unwrap();
}

/// Stores a generic program variant with one `Float4` parameter per name.
fn store_program(
    store: &MemoryResourceStore,
    uuid: ResourceUuid,
    vertex: ResourceUuid,
    pixel: ResourceUuid,
    names: &[u64],
) {
    let mut program = Program::new(uuid, vertex, pixel, names.len());
    program.attributes =
        VertexAttributes::pack([(VertexAttributeBinding::Position, VertexFormat::Float3)]);
    for (location, name) in names.iter().enumerate() {
        program
            .parameters
            .push(*name, location as u32, 1, ParameterType::Float4)
            .unwrap();
    }
    let record = ProgramStaticRecord::from_program(&program).to_bytes().unwrap();
    store.write(uuid, StreamKind::Static, 0, &record).unwrap();
}

fn recording_backend(uploads: &Arc<Mutex<Uploads>>) -> (BackendRegistry, Arc<RenderBackend>) {
    let mut registry = BackendRegistry::new(
        RecordingFactory {
            uploads: Arc::clone(uploads),
        },
        RenderConfig::default(),
    );
    let mut binding = ThreadBinding::new();
    let backend = registry.allocate(RenderApi::Null, false, &mut binding).unwrap();
    (registry, backend)
}
// ---

#[test]
fn test_load_program_uploads_shaders_then_program() {
    // --- 1. ARRANGE ---
    let _ = env_logger::builder().is_test(true).try_init();
    let uploads = Arc::new(Mutex::new(Uploads::default()));
    let mut registry = BackendRegistry::new(
        RecordingFactory {
            uploads: Arc::clone(&uploads),
        },
        RenderConfig::default(),
    );
    let mut binding = ThreadBinding::new();
    let backend = registry.allocate(RenderApi::Null, false, &mut binding).unwrap();

    let store = MemoryResourceStore::new();
    let vertex = ResourceUuid::new();
    let pixel = ResourceUuid::new();
    store_shader(&store, vertex, ShaderStage::Vertex, b"vertex source");
    store_shader(&store, pixel, ShaderStage::Pixel, b"pixel");

    let program_uuid = ResourceUuid::new();
    // Generic variant: every platform satisfies it.
    store_program(&store, program_uuid, vertex, pixel, &[9]);

    // --- 2. ACT ---
    let loaded = load_program(&backend, &store, program_uuid).unwrap();

    // --- 3. ASSERT ---
    {
        let loaded = loaded.read().unwrap();
        assert!(loaded.owner().is_owned_by(&backend));
        assert_eq!(loaded.backend_data[0], 13 + 5);
        assert_eq!(loaded.attributes.stride, 12);
        assert_eq!(loaded.parameters.len(), 1);
    }
    assert_eq!(uploads.lock().unwrap().shaders, vec![13, 5]);
    assert_eq!(uploads.lock().unwrap().programs, 1);
    assert!(backend.program_table().contains(program_uuid));

    // A second load is served from the table.
    let again = load_program(&backend, &store, program_uuid).unwrap();
    assert!(Arc::ptr_eq(&loaded, &again));
    assert_eq!(uploads.lock().unwrap().programs, 1);
}

#[test]
fn test_load_shader_without_variant_is_not_compiled() {
    let uploads = Arc::new(Mutex::new(Uploads::default()));
    let mut registry = BackendRegistry::new(RecordingFactory { uploads }, RenderConfig::default());
    let mut binding = ThreadBinding::new();
    let backend = registry.allocate(RenderApi::Null, false, &mut binding).unwrap();
    let store = MemoryResourceStore::new();
    let uuid = ResourceUuid::new();
    let gles2 = PlatformDecl {
        render_api: RenderApi::Gles2,
        ..Default::default()
    }
    .compose();
    store
        .write(
            uuid,
            StreamKind::Static,
            gles2,
            &ShaderStaticRecord::new(ShaderStage::Vertex).to_bytes().unwrap(),
        )
        .unwrap();

    let result = load_shader(&backend, &store, uuid, ShaderStage::Vertex);

    assert!(matches!(result, Err(LoadError::NotCompiled { .. })));
}

#[test]
fn test_load_shader_rejects_wrong_stage() {
    let uploads = Arc::new(Mutex::new(Uploads::default()));
    let mut registry = BackendRegistry::new(RecordingFactory { uploads }, RenderConfig::default());
    let mut binding = ThreadBinding::new();
    let backend = registry.allocate(RenderApi::Null, false, &mut binding).unwrap();
    let store = MemoryResourceStore::new();
    let uuid = ResourceUuid::new();
    store_shader(&store, uuid, ShaderStage::Pixel, b"x");

    let result = load_shader(&backend, &store, uuid, ShaderStage::Vertex);

    assert!(matches!(result, Err(LoadError::Io(_))));
}

#[test]
fn test_program_keeps_its_shaders_until_deallocated() {
    // --- 1. ARRANGE ---
    let _ = env_logger::builder().is_test(true).try_init();
    let uploads = Arc::new(Mutex::new(Uploads::default()));
    let (_registry, backend) = recording_backend(&uploads);
    let store = MemoryResourceStore::new();
    let (vertex, pixel) = (ResourceUuid::new(), ResourceUuid::new());
    let program_uuid = ResourceUuid::new();
    store_shader(&store, vertex, ShaderStage::Vertex, b"vs");
    store_shader(&store, pixel, ShaderStage::Pixel, b"ps");
    store_program(&store, program_uuid, vertex, pixel, &[1]);

    // --- 2. ACT ---
    let program = load_program(&backend, &store, program_uuid).unwrap();

    // --- 3. ASSERT ---
    assert!(backend.shader_table().contains(vertex));
    assert!(backend.shader_table().contains(pixel));
    assert_eq!(uploads.lock().unwrap().live_shaders, 2);

    backend.deallocate_program(&mut program.write().unwrap());
    assert_eq!(uploads.lock().unwrap().live_shaders, 0);
    assert!(backend.shader_table().is_empty());
    assert!(program.read().unwrap().shaders().is_none());
}

#[test]
fn test_shared_shader_survives_program_teardown() {
    // --- 1. ARRANGE ---
    let uploads = Arc::new(Mutex::new(Uploads::default()));
    let (_registry, backend) = recording_backend(&uploads);
    let store = MemoryResourceStore::new();
    let (vertex, pixel) = (ResourceUuid::new(), ResourceUuid::new());
    let program_uuid = ResourceUuid::new();
    store_shader(&store, vertex, ShaderStage::Vertex, b"vs");
    store_shader(&store, pixel, ShaderStage::Pixel, b"ps");
    store_program(&store, program_uuid, vertex, pixel, &[1]);
    let held = load_shader(&backend, &store, vertex, ShaderStage::Vertex).unwrap();
    let program = load_program(&backend, &store, program_uuid).unwrap();

    // --- 2. ACT ---
    backend.deallocate_program(&mut program.write().unwrap());

    // --- 3. ASSERT ---
    assert_eq!(uploads.lock().unwrap().live_shaders, 1);
    assert!(held.read().unwrap().owner().is_owned_by(&backend));
    assert!(!backend.shader_table().contains(pixel));
}

#[test]
fn test_resource_event_reloads_shader_and_relinks_programs() {
    // --- 1. ARRANGE ---
    let _ = env_logger::builder().is_test(true).try_init();
    let uploads = Arc::new(Mutex::new(Uploads::default()));
    let (_registry, backend) = recording_backend(&uploads);
    let store = MemoryResourceStore::new();
    let (vertex, pixel) = (ResourceUuid::new(), ResourceUuid::new());
    let program_uuid = ResourceUuid::new();
    store_shader(&store, vertex, ShaderStage::Vertex, b"vertex source");
    store_shader(&store, pixel, ShaderStage::Pixel, b"pixel");
    store_program(&store, program_uuid, vertex, pixel, &[1]);
    let program = load_program(&backend, &store, program_uuid).unwrap();
    store_shader(&store, vertex, ShaderStage::Vertex, b"vertex source v2");

    // --- 2. ACT ---
    let handled = handle_resource_event(&backend, &store, vertex).unwrap();

    // --- 3. ASSERT ---
    assert!(handled);
    let uploads = uploads.lock().unwrap();
    assert_eq!(uploads.shaders, vec![13, 5, 16]);
    assert_eq!(uploads.programs, 2);
    assert_eq!(uploads.live_shaders, 2);
    assert_eq!(program.read().unwrap().backend_data[0], 16 + 5);
}

#[test]
fn test_resource_event_reloads_program_layout() {
    // --- 1. ARRANGE ---
    let uploads = Arc::new(Mutex::new(Uploads::default()));
    let (_registry, backend) = recording_backend(&uploads);
    let store = MemoryResourceStore::new();
    let (vertex, pixel) = (ResourceUuid::new(), ResourceUuid::new());
    let program_uuid = ResourceUuid::new();
    store_shader(&store, vertex, ShaderStage::Vertex, b"vs");
    store_shader(&store, pixel, ShaderStage::Pixel, b"ps");
    store_program(&store, program_uuid, vertex, pixel, &[1]);
    let program = load_program(&backend, &store, program_uuid).unwrap();
    store_program(&store, program_uuid, vertex, pixel, &[1, 2]);

    // --- 2. ACT ---
    let handled = handle_resource_event(&backend, &store, program_uuid).unwrap();

    // --- 3. ASSERT ---
    assert!(handled);
    let program = program.read().unwrap();
    assert_eq!(program.parameters.len(), 2);
    assert!(program.owner().is_owned_by(&backend));
    assert_eq!(uploads.lock().unwrap().programs, 2);
    // Shaders came from the table, not from a second upload.
    assert_eq!(uploads.lock().unwrap().shaders.len(), 2);
}

#[test]
fn test_resource_event_ignores_resources_not_resident() {
    // --- 1. ARRANGE ---
    let uploads = Arc::new(Mutex::new(Uploads::default()));
    let (_registry, backend) = recording_backend(&uploads);
    let store = MemoryResourceStore::new();
    let stranger = ResourceUuid::new();
    store_shader(&store, stranger, ShaderStage::Vertex, b"never loaded");

    // --- 2. ACT ---
    let handled = handle_resource_event(&backend, &store, stranger).unwrap();

    // --- 3. ASSERT ---
    assert!(!handled);
    assert!(uploads.lock().unwrap().shaders.is_empty());
    assert!(backend.shader_table().is_empty());
}
