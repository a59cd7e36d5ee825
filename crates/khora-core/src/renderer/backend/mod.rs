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

//! Live backend instances and their lifecycle.
//!
//! A [`RenderBackend`] wraps one [`BackendOps`] implementation with the state
//! every backend shares: pixel format, drawable, framebuffer target, frame
//! counter, concurrency hint, resource platform tag, an exclusive-access lock
//! and the three resource tables. Backends are created and destroyed by the
//! [`BackendRegistry`].

mod binding;
mod registry;
mod table;
mod upload;

pub use self::binding::ThreadBinding;
pub use self::registry::BackendRegistry;
pub use self::table::ResourceTable;

use crate::renderer::api::{
    backend::BackendId,
    context::RenderContext,
    core::{AdapterId, Resolution},
    program::Program,
    resource::{Drawable, RenderTarget},
    shader::Shader,
    texture::Texture,
    util::enums::{ColorSpace, PixelFormat, RenderApi, RenderApiGroup},
};
use crate::renderer::error::RenderError;
use crate::renderer::traits::BackendOps;
use crate::resource::PlatformDecl;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, TryLockError};

/// A shader shared between the client and a backend's shader table.
pub type SharedShader = Arc<RwLock<Shader>>;
/// A program shared between the client and a backend's program table.
pub type SharedProgram = Arc<RwLock<Program>>;
/// A texture shared between the client and a backend's texture table.
pub type SharedTexture = Arc<RwLock<Texture>>;

/// Proof of holding a backend's exclusive-access lock. Dropping it leaves.
pub type ExclusiveGuard<'a> = MutexGuard<'a, ()>;

#[derive(Debug)]
struct BackendState {
    pixel_format: Option<PixelFormat>,
    color_space: ColorSpace,
    drawable: Option<Drawable>,
    framebuffer: RenderTarget,
    concurrency: Option<usize>,
    platform: u64,
    destroyed: bool,
}

/// One live connection to a graphics API.
pub struct RenderBackend {
    id: BackendId,
    api: RenderApi,
    api_group: RenderApiGroup,
    exclusive: Mutex<()>,
    frame_count: AtomicU64,
    ops: Mutex<Box<dyn BackendOps>>,
    state: Mutex<BackendState>,
    shaders: ResourceTable<RwLock<Shader>>,
    programs: ResourceTable<RwLock<Program>>,
    textures: ResourceTable<RwLock<Texture>>,
}

impl RenderBackend {
    /// Wraps an already constructed implementation.
    pub(crate) fn new(ops: Box<dyn BackendOps>, table_buckets: usize) -> Self {
        let id = BackendId::next();
        let api = ops.api();
        let api_group = api.group();
        Self {
            id,
            api,
            api_group,
            exclusive: Mutex::new(()),
            frame_count: AtomicU64::new(1),
            ops: Mutex::new(ops),
            state: Mutex::new(BackendState {
                pixel_format: None,
                color_space: ColorSpace::Linear,
                drawable: None,
                framebuffer: RenderTarget::framebuffer(id),
                concurrency: None,
                platform: PlatformDecl {
                    render_api_group: api_group,
                    render_api: api,
                    ..Default::default()
                }
                .compose(),
                destroyed: false,
            }),
            shaders: ResourceTable::new(table_buckets),
            programs: ResourceTable::new(table_buckets),
            textures: ResourceTable::new(table_buckets),
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, BackendState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_ops(&self) -> MutexGuard<'_, Box<dyn BackendOps>> {
        self.ops.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Unique identity of this instance.
    pub fn id(&self) -> BackendId {
        self.id
    }

    /// The concrete API.
    pub fn api(&self) -> RenderApi {
        self.api
    }

    /// The API group.
    pub fn api_group(&self) -> RenderApiGroup {
        self.api_group
    }

    /// Frames presented so far, starting at 1.
    pub fn frame_count(&self) -> u64 {
        self.frame_count.load(Ordering::Acquire)
    }

    /// Runs `f` with exclusive access to the implementation.
    pub fn with_ops<R>(&self, f: impl FnOnce(&mut dyn BackendOps) -> R) -> R {
        let mut ops = self.lock_ops();
        f(&mut **ops)
    }

    /// Display adapters the API can drive.
    pub fn enumerate_adapters(&self) -> Vec<AdapterId> {
        self.lock_ops().enumerate_adapters()
    }

    /// Display modes of `adapter`.
    pub fn enumerate_modes(&self, adapter: AdapterId) -> Vec<Resolution> {
        self.lock_ops().enumerate_modes(adapter)
    }

    /// Takes the exclusive-access lock without blocking.
    pub fn try_enter_exclusive(&self) -> Option<ExclusiveGuard<'_>> {
        match self.exclusive.try_lock() {
            Ok(guard) => Some(guard),
            Err(TryLockError::Poisoned(poisoned)) => Some(poisoned.into_inner()),
            Err(TryLockError::WouldBlock) => None,
        }
    }

    /// Blocks until the exclusive-access lock is held. The lock is not reentrant.
    pub fn enter_exclusive(&self) -> ExclusiveGuard<'_> {
        self.exclusive.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Releases the exclusive-access lock.
    pub fn leave_exclusive(&self, guard: ExclusiveGuard<'_>) {
        drop(guard);
    }

    /// Chooses the pixel format and color space of the next drawable.
    ///
    /// Rejected once a drawable is attached; the current format is kept.
    pub fn set_format(
        &self,
        format: PixelFormat,
        color_space: ColorSpace,
    ) -> Result<(), RenderError> {
        let mut state = self.lock_state();
        if state.drawable.is_some() {
            log::warn!(
                "Unable to change format of {} backend when drawable is already set",
                self.api
            );
            return Err(RenderError::FormatLocked);
        }
        state.pixel_format = Some(format);
        state.color_space = color_space;
        Ok(())
    }

    /// The chosen pixel format.
    pub fn pixel_format(&self) -> Option<PixelFormat> {
        self.lock_state().pixel_format
    }

    /// The chosen color space.
    pub fn color_space(&self) -> ColorSpace {
        self.lock_state().color_space
    }

    /// Binds a presentable surface and makes this backend current for `binding`.
    ///
    /// Any other backend current on `binding` is released first, even if the
    /// surface is then refused. On success the framebuffer target takes the
    /// surface's size and the chosen format.
    pub fn set_drawable(
        self: &Arc<Self>,
        binding: &mut ThreadBinding,
        drawable: Drawable,
    ) -> Result<(), RenderError> {
        binding.release_other(self);

        let mut state = self.lock_state();
        let format = state.pixel_format.ok_or(RenderError::FormatNotSet)?;
        let color_space = state.color_space;
        if !self.lock_ops().set_drawable(&drawable, format, color_space) {
            log::warn!("{} backend rejected drawable {:?}", self.api, drawable.kind);
            return Err(RenderError::DrawableRejected { api: self.api });
        }

        state.drawable = Some(drawable);
        state.framebuffer.width = drawable.width;
        state.framebuffer.height = drawable.height;
        state.framebuffer.pixel_format = Some(format);
        state.framebuffer.color_space = color_space;
        drop(state);

        binding.set_current(self);
        Ok(())
    }

    /// The attached surface.
    pub fn drawable(&self) -> Option<Drawable> {
        self.lock_state().drawable
    }

    /// A snapshot of the framebuffer target.
    pub fn target_framebuffer(&self) -> RenderTarget {
        self.lock_state().framebuffer.clone()
    }

    /// Consumes render contexts and hands them back to producers.
    ///
    /// Every context is sorted, the implementation consumes them in slice
    /// order, then each reservation counter is cleared with release ordering.
    pub fn dispatch(&self, target: &RenderTarget, contexts: &mut [&mut RenderContext]) {
        for context in contexts.iter_mut() {
            context.sort();
        }
        {
            let sorted: Vec<&RenderContext> = contexts.iter().map(|c| &**c).collect();
            log::trace!(
                "Dispatching {} context(s) on {} backend",
                sorted.len(),
                self.api
            );
            self.lock_ops().dispatch(target, &sorted);
        }
        for context in contexts.iter_mut() {
            context.reset();
        }
    }

    /// Presents the framebuffer and advances the frame counter.
    pub fn flip(&self) {
        self.lock_ops().flip();
        self.frame_count.fetch_add(1, Ordering::AcqRel);
    }

    /// Sets the worker fan-out.
    ///
    /// Only the first request made before a drawable is attached takes effect;
    /// later ones are ignored.
    pub fn set_max_concurrency(&self, threads: usize) {
        let mut state = self.lock_state();
        if state.concurrency.is_some() || state.drawable.is_some() {
            log::debug!(
                "Ignoring concurrency change to {threads} on {} backend",
                self.api
            );
            return;
        }
        state.concurrency = Some(threads);
    }

    /// The worker fan-out, `0` if never set.
    pub fn max_concurrency(&self) -> usize {
        self.lock_state().concurrency.unwrap_or(0)
    }

    /// The platform tag compiled resources are selected with.
    pub fn resource_platform(&self) -> u64 {
        self.lock_state().platform
    }

    /// Sets caller platform bits; the API and API group fields always describe this backend.
    pub fn set_resource_platform(&self, platform: u64) {
        let mut decl = PlatformDecl::decompose(platform);
        decl.render_api_group = self.api_group;
        decl.render_api = self.api;
        self.lock_state().platform = decl.compose();
    }

    /// Shaders uploaded to this backend.
    pub fn shader_table(&self) -> &ResourceTable<RwLock<Shader>> {
        &self.shaders
    }

    /// Programs uploaded to this backend.
    pub fn program_table(&self) -> &ResourceTable<RwLock<Program>> {
        &self.programs
    }

    /// Textures uploaded to this backend.
    pub fn texture_table(&self) -> &ResourceTable<RwLock<Texture>> {
        &self.textures
    }

    /// Writes the handle of `texture` into a uniform block.
    pub fn parameter_bind_texture(&self, block: &mut [u8], offset: usize, texture: &Texture) {
        self.lock_ops().parameter_bind_texture(block, offset, texture);
    }

    /// Writes the handle of `target` into a uniform block.
    pub fn parameter_bind_target(&self, block: &mut [u8], offset: usize, target: &RenderTarget) {
        self.lock_ops().parameter_bind_target(block, offset, target);
    }

    pub(crate) fn enable_thread_hook(&self) {
        self.lock_ops().enable_thread();
    }

    pub(crate) fn disable_thread_hook(&self) {
        self.lock_ops().disable_thread();
    }

    /// Returns `true` once the registry has torn this backend down.
    pub fn is_destroyed(&self) -> bool {
        self.lock_state().destroyed
    }

    /// Tears the backend down. Returns `false` if it already was.
    pub(crate) fn teardown(&self) -> bool {
        let mut state = self.lock_state();
        if state.destroyed {
            return false;
        }
        self.lock_ops().destruct();
        self.shaders.clear();
        self.programs.clear();
        self.textures.clear();
        state.framebuffer = RenderTarget::framebuffer(self.id);
        state.drawable = None;
        state.destroyed = true;
        true
    }
}

impl std::fmt::Debug for RenderBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderBackend")
            .field("id", &self.id)
            .field("api", &self.api)
            .field("frame_count", &self.frame_count())
            .finish_non_exhaustive()
    }
}
