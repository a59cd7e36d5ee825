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
    AdapterId, BackendFactory, BackendOps, ColorSpace, Drawable, PipelineStep, PixelFormat,
    RenderApi, RenderCommand, RenderConfig, RenderContext, RenderError, RenderPipeline,
    RenderTarget, Resolution, Shader, ShaderStage, Texture,
};
use khora_core::renderer::{BackendRegistry, Program, ThreadBinding};
use khora_core::resource::{PlatformDecl, ResourceUuid};
use std::any::Any;
use std::sync::{Arc, Mutex};

type Events = Arc<Mutex<Vec<String>>>;

// --- Test Setup: a scripted backend that records every hook call ---
struct MockOps {
    api: RenderApi,
    works: bool,
    events: Events,
}

impl MockOps {
    fn record(&self, what: &str) {
        self.events.lock().unwrap().push(format!("{} {what}", self.api));
    }
}

impl BackendOps for MockOps {
    fn api(&self) -> RenderApi {
        self.api
    }
    fn construct(&mut self) -> bool {
        self.record("construct");
        self.works
    }
    fn destruct(&mut self) {
        self.record("destruct");
    }
    fn enumerate_adapters(&self) -> Vec<AdapterId> {
        vec![AdapterId::DEFAULT]
    }
    fn enumerate_modes(&self, _adapter: AdapterId) -> Vec<Resolution> {
        Vec::new()
    }
    fn set_drawable(&mut self, drawable: &Drawable, _: PixelFormat, _: ColorSpace) -> bool {
        self.record("set_drawable");
        drawable.width > 0
    }
    fn enable_thread(&mut self) {
        self.record("enable_thread");
    }
    fn disable_thread(&mut self) {
        self.record("disable_thread");
    }
    fn dispatch(&mut self, _target: &RenderTarget, contexts: &[&RenderContext]) {
        for context in contexts {
            let keys: Vec<String> = context.sorted().map(|(key, _)| key.to_string()).collect();
            self.record(&format!("dispatch [{}]", keys.join(",")));
        }
    }
    fn flip(&mut self) {
        self.record("flip");
    }
    fn upload_shader(&mut self, _shader: &mut Shader, blob: &[u8]) -> bool {
        self.record("upload_shader");
        !blob.is_empty()
    }
    fn upload_program(&mut self, _: &mut Program, _: &Shader, _: &Shader) -> bool {
        self.record("upload_program");
        true
    }
    fn upload_texture(&mut self, _texture: &mut Texture, _data: &[u8]) -> bool {
        self.record("upload_texture");
        true
    }
    fn deallocate_shader(&mut self, _shader: &mut Shader) {
        self.record("deallocate_shader");
    }
    fn deallocate_program(&mut self, _program: &mut Program) {
        self.record("deallocate_program");
    }
    fn deallocate_texture(&mut self, _texture: &mut Texture) {
        self.record("deallocate_texture");
    }
    fn parameter_bind_texture(&self, block: &mut [u8], offset: usize, texture: &Texture) {
        let handle = (texture.backend_data[0] as u32).to_le_bytes();
        block[offset..offset + 4].copy_from_slice(&handle);
    }
    fn parameter_bind_target(&self, block: &mut [u8], offset: usize, target: &RenderTarget) {
        let handle = (target.backend_data[0] as u32).to_le_bytes();
        block[offset..offset + 4].copy_from_slice(&handle);
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

struct MockFactory {
    working: Vec<RenderApi>,
    events: Events,
}

impl BackendFactory for MockFactory {
    fn create(&self, api: RenderApi) -> Option<Box<dyn BackendOps>> {
        Some(Box::new(MockOps {
            api,
            works: self.working.contains(&api),
            events: Arc::clone(&self.events),
        }))
    }
}

fn registry(working: &[RenderApi], config: RenderConfig) -> (BackendRegistry, Events) {
    let _ = env_logger::builder().is_test(true).try_init();
    let events = Events::default();
    let factory = MockFactory {
        working: working.to_vec(),
        events: Arc::clone(&events),
    };
    (BackendRegistry::new(factory, config), events)
}

fn count(events: &Events, entry: &str) -> usize {
    events.lock().unwrap().iter().filter(|e| *e == entry).count()
}
// ---

#[test]
fn test_default_resolves_to_null_when_only_null_is_enabled() {
    // --- 1. ARRANGE ---
    let config = RenderConfig {
        disabled_apis: RenderApi::ALL
            .into_iter()
            .filter(|&api| api != RenderApi::Null)
            .collect(),
        ..Default::default()
    };
    let (mut registry, events) = registry(&RenderApi::ALL, config);
    let mut binding = ThreadBinding::new();

    // --- 2. ACT ---
    let backend = registry
        .allocate(RenderApi::Default, true, &mut binding)
        .expect("null backend must be reachable");

    // --- 3. ASSERT ---
    assert_eq!(backend.api(), RenderApi::Null);
    assert_eq!(backend.frame_count(), 1);
    assert!(binding.is_current(&backend));
    assert_eq!(count(&events, "null construct"), 1);
    assert_eq!(count(&events, "null enable_thread"), 1);
    assert_eq!(registry.backends().len(), 1);
}

#[test]
fn test_failed_construction_falls_back_to_sibling() {
    let (mut registry, events) = registry(&[RenderApi::Gles2], RenderConfig::default());
    let mut binding = ThreadBinding::new();

    let backend = registry
        .allocate(RenderApi::Gles3, true, &mut binding)
        .unwrap();

    assert_eq!(backend.api(), RenderApi::Gles2);
    let events = events.lock().unwrap();
    assert_eq!(
        &events[..3],
        &[
            "OpenGL ES 3 construct".to_string(),
            "OpenGL ES 3 destruct".to_string(),
            "OpenGL ES 2 construct".to_string(),
        ]
    );
}

#[test]
fn test_construction_refused_without_fallback() {
    let (mut registry, _) = registry(&[RenderApi::Gles2], RenderConfig::default());
    let mut binding = ThreadBinding::new();

    let result = registry.allocate(RenderApi::Gles3, false, &mut binding);

    assert!(matches!(
        result,
        Err(RenderError::BackendRefused {
            api: RenderApi::Gles3
        })
    ));
    assert!(registry.backends().is_empty());
    assert!(binding.current().is_none());
}

#[test]
fn test_exhausted_chain_reports_no_backend() {
    let (mut registry, _) = registry(&[], RenderConfig::default());
    let mut binding = ThreadBinding::new();

    let result = registry.allocate(RenderApi::Gles, true, &mut binding);

    assert!(matches!(
        result,
        Err(RenderError::NoBackendAvailable {
            requested: RenderApi::Gles
        })
    ));
}

#[test]
fn test_resource_platform_carries_backend_api() {
    let config = RenderConfig {
        resource_platform: PlatformDecl {
            quality_level: 2,
            ..Default::default()
        }
        .compose(),
        ..Default::default()
    };
    let (mut registry, _) = registry(&[RenderApi::Null], config);
    let mut binding = ThreadBinding::new();

    let backend = registry.allocate(RenderApi::Null, false, &mut binding).unwrap();

    let decl = PlatformDecl::decompose(backend.resource_platform());
    assert_eq!(decl.render_api, RenderApi::Null);
    assert_eq!(decl.quality_level, 2);
}

#[test]
fn test_binding_switches_between_backends() {
    let (mut registry, events) =
        registry(&[RenderApi::Null, RenderApi::Gles2], RenderConfig::default());
    let mut binding = ThreadBinding::new();
    let first = registry.allocate(RenderApi::Null, false, &mut binding).unwrap();

    let second = registry.allocate(RenderApi::Gles2, false, &mut binding).unwrap();

    assert!(binding.is_current(&second));
    assert!(!binding.is_current(&first));
    assert_eq!(count(&events, "null disable_thread"), 1);

    binding.disable_thread(&first);
    assert!(binding.is_current(&second), "releasing a non-current backend keeps the slot");

    binding.disable_thread(&second);
    assert!(binding.current().is_none());
    assert_eq!(count(&events, "OpenGL ES 2 disable_thread"), 1);
}

#[test]
fn test_format_is_locked_once_drawable_is_bound() {
    let (mut registry, _) = registry(&[RenderApi::Null], RenderConfig::default());
    let mut binding = ThreadBinding::new();
    let backend = registry.allocate(RenderApi::Null, false, &mut binding).unwrap();

    assert!(matches!(
        backend.set_drawable(&mut binding, Drawable::offscreen(64, 32)),
        Err(RenderError::FormatNotSet)
    ));

    backend
        .set_format(PixelFormat::R8G8B8X8, ColorSpace::Linear)
        .unwrap();
    backend
        .set_drawable(&mut binding, Drawable::offscreen(64, 32))
        .unwrap();

    let result = backend.set_format(PixelFormat::R8G8B8A8, ColorSpace::Srgb);

    assert!(matches!(result, Err(RenderError::FormatLocked)));
    assert_eq!(backend.pixel_format(), Some(PixelFormat::R8G8B8X8));
    assert_eq!(backend.color_space(), ColorSpace::Linear);
    let framebuffer = backend.target_framebuffer();
    assert_eq!((framebuffer.width, framebuffer.height), (64, 32));
    assert_eq!(framebuffer.pixel_format, Some(PixelFormat::R8G8B8X8));
}

#[test]
fn test_rejected_drawable_leaves_backend_untouched() {
    let (mut registry, _) = registry(&[RenderApi::Null], RenderConfig::default());
    let mut binding = ThreadBinding::new();
    let backend = registry.allocate(RenderApi::Null, false, &mut binding).unwrap();
    backend
        .set_format(PixelFormat::R8G8B8A8, ColorSpace::Linear)
        .unwrap();

    let result = backend.set_drawable(&mut binding, Drawable::offscreen(0, 0));

    assert!(matches!(result, Err(RenderError::DrawableRejected { .. })));
    assert!(backend.drawable().is_none());
    assert!(backend.set_format(PixelFormat::R8G8B8, ColorSpace::Srgb).is_ok());
}

#[test]
fn test_max_concurrency_is_set_once() {
    let (mut registry, _) = registry(&[RenderApi::Null], RenderConfig::default());
    let mut binding = ThreadBinding::new();
    let backend = registry.allocate(RenderApi::Null, false, &mut binding).unwrap();
    assert_eq!(backend.max_concurrency(), 0);

    backend.set_max_concurrency(4);
    backend.set_max_concurrency(8);

    assert_eq!(backend.max_concurrency(), 4);
}

#[test]
fn test_max_concurrency_ignored_after_drawable() {
    let (mut registry, _) = registry(&[RenderApi::Null], RenderConfig::default());
    let mut binding = ThreadBinding::new();
    let backend = registry.allocate(RenderApi::Null, false, &mut binding).unwrap();
    backend
        .set_format(PixelFormat::R8G8B8A8, ColorSpace::Linear)
        .unwrap();
    backend
        .set_drawable(&mut binding, Drawable::offscreen(8, 8))
        .unwrap();

    backend.set_max_concurrency(2);

    assert_eq!(backend.max_concurrency(), 0);
}

#[test]
fn test_dispatch_sorts_and_resets_contexts() {
    let (mut registry, events) = registry(&[RenderApi::Null], RenderConfig::default());
    let mut binding = ThreadBinding::new();
    let backend = registry.allocate(RenderApi::Null, false, &mut binding).unwrap();
    let target = backend.target_framebuffer();
    let mut first = RenderContext::new(4);
    let mut second = RenderContext::new(4);
    first.queue(3, RenderCommand::Null);
    first.queue(1, RenderCommand::Null);
    second.queue(9, RenderCommand::Null);
    second.queue(2, RenderCommand::Null);

    backend.dispatch(&target, &mut [&mut first, &mut second]);

    assert_eq!(first.reserved(), 0);
    assert_eq!(second.reserved(), 0);
    assert_eq!(count(&events, "null dispatch [1,3]"), 1);
    assert_eq!(count(&events, "null dispatch [2,9]"), 1);

    // A fresh wave starts again at slot 0.
    *first.reserve(7) = RenderCommand::viewport(1, 1);
    assert_eq!(first.reserved(), 1);
}

#[test]
fn test_upload_migrates_ownership_between_backends() {
    // --- 1. ARRANGE ---
    let (mut registry, events) =
        registry(&[RenderApi::Null, RenderApi::Gles2], RenderConfig::default());
    let mut binding = ThreadBinding::new();
    let a = registry.allocate(RenderApi::Null, false, &mut binding).unwrap();
    let b = registry.allocate(RenderApi::Gles2, false, &mut binding).unwrap();
    let mut shader = Shader::new(ResourceUuid::new(), ShaderStage::Vertex);

    // --- 2. ACT ---
    a.upload_shader(&mut shader, b"void main() {}").unwrap();
    assert!(shader.owner().is_owned_by(&a));
    b.upload_shader(&mut shader, b"void main() {}").unwrap();

    // --- 3. ASSERT ---
    assert_eq!(count(&events, "null deallocate_shader"), 1);
    assert!(shader.owner().is_owned_by(&b));
    assert!(!shader.owner().is_owned_by(&a));

    a.deallocate_shader(&mut shader);
    assert!(shader.owner().is_owned_by(&b), "a no longer owns the shader");

    b.deallocate_shader(&mut shader);
    assert!(!shader.owner().is_bound());
    assert_eq!(count(&events, "OpenGL ES 2 deallocate_shader"), 1);
}

#[test]
fn test_rejected_upload_leaves_resource_unbound() {
    let (mut registry, _) = registry(&[RenderApi::Null], RenderConfig::default());
    let mut binding = ThreadBinding::new();
    let backend = registry.allocate(RenderApi::Null, false, &mut binding).unwrap();
    let mut shader = Shader::new(ResourceUuid::new(), ShaderStage::Pixel);

    let result = backend.upload_shader(&mut shader, &[]);

    assert!(result.is_err());
    assert!(!shader.owner().is_bound());
}

#[test]
fn test_registered_resources_are_found_by_uuid() {
    let (mut registry, _) = registry(&[RenderApi::Null], RenderConfig::default());
    let mut binding = ThreadBinding::new();
    let backend = registry.allocate(RenderApi::Null, false, &mut binding).unwrap();
    let uuid = ResourceUuid::new();
    let texture = Arc::new(std::sync::RwLock::new(Texture::new(
        uuid,
        2,
        2,
        PixelFormat::R8G8B8A8,
    )));
    backend
        .upload_texture(&mut texture.write().unwrap(), &[0; 16])
        .unwrap();

    backend.register_texture(&texture);

    assert!(backend.texture_table().contains(uuid));
    registry.deallocate(&backend);
    assert!(!backend.texture_table().contains(uuid));
}

#[test]
fn test_flip_advances_frame_counter() {
    let (mut registry, events) = registry(&[RenderApi::Null], RenderConfig::default());
    let mut binding = ThreadBinding::new();
    let backend = registry.allocate(RenderApi::Null, false, &mut binding).unwrap();

    backend.flip();
    backend.flip();

    assert_eq!(backend.frame_count(), 3);
    assert_eq!(count(&events, "null flip"), 2);
}

#[test]
fn test_exclusive_section_is_not_reentrant() {
    let (mut registry, _) = registry(&[RenderApi::Null], RenderConfig::default());
    let mut binding = ThreadBinding::new();
    let backend = registry.allocate(RenderApi::Null, false, &mut binding).unwrap();

    let guard = backend.try_enter_exclusive().expect("lock is free");
    assert!(backend.try_enter_exclusive().is_none());

    backend.leave_exclusive(guard);
    assert!(backend.try_enter_exclusive().is_some());
}

#[test]
fn test_deallocate_is_idempotent() {
    let (mut registry, events) = registry(&[RenderApi::Null], RenderConfig::default());
    let mut binding = ThreadBinding::new();
    let backend = registry.allocate(RenderApi::Null, false, &mut binding).unwrap();

    registry.deallocate(&backend);
    registry.deallocate(&backend);

    assert!(backend.is_destroyed());
    assert!(registry.backends().is_empty());
    assert_eq!(count(&events, "null destruct"), 1);
    // Thread bindings are the caller's business.
    assert!(binding.is_current(&backend));
}

#[test]
fn test_pipeline_runs_and_dispatches_steps_in_order() {
    let (mut registry, events) = registry(&[RenderApi::Null], RenderConfig::default());
    let mut binding = ThreadBinding::new();
    let backend = registry.allocate(RenderApi::Null, false, &mut binding).unwrap();
    let offscreen = RenderTarget::texture(16, 16, PixelFormat::R8G8B8A8, ColorSpace::Linear);
    let mut pipeline = RenderPipeline::new(Arc::clone(&backend));
    pipeline.add_step(PipelineStep::new(offscreen.clone(), 8, |_, _, context| {
        context.queue(5, RenderCommand::clear_color(0));
        context.queue(4, RenderCommand::viewport(16, 16));
    }));
    pipeline.add_step(PipelineStep::blit(offscreen, backend.target_framebuffer(), 4));

    pipeline.execute();
    assert_eq!(pipeline.steps()[0].context().reserved(), 2);
    pipeline.dispatch();

    let events = events.lock().unwrap();
    let dispatched: Vec<&String> = events.iter().filter(|e| e.contains("dispatch")).collect();
    assert_eq!(dispatched, ["null dispatch [4,5]", "null dispatch [0]"]);
    assert!(pipeline.steps().iter().all(|step| step.context().reserved() == 0));
}

#[test]
fn test_parameter_binding_writes_backend_handle() {
    let (mut registry, _) = registry(&[RenderApi::Null], RenderConfig::default());
    let mut binding = ThreadBinding::new();
    let backend = registry.allocate(RenderApi::Null, false, &mut binding).unwrap();
    let mut texture = Texture::new(ResourceUuid::new(), 1, 1, PixelFormat::A8);
    texture.backend_data[0] = 42;
    let mut block = [0u8; 8];

    backend.parameter_bind_texture(&mut block, 4, &texture);

    assert_eq!(&block[4..], &42u32.to_le_bytes());
}
