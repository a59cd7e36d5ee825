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

//! Explicit "current backend" slot of a worker.

use super::RenderBackend;
use std::sync::Arc;

/// The backend a worker currently renders with.
///
/// Each worker (thread or task slot) owns one binding and passes it to the
/// operations that change which backend is current. At most one backend is
/// current per binding; binding a new one first releases the previous one.
/// Bindings are independent, so one worker never affects another.
#[derive(Debug, Default)]
pub struct ThreadBinding {
    current: Option<Arc<RenderBackend>>,
}

impl ThreadBinding {
    /// A binding with no current backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// The current backend, if any.
    pub fn current(&self) -> Option<&Arc<RenderBackend>> {
        self.current.as_ref()
    }

    /// Returns `true` if `backend` is current.
    pub fn is_current(&self, backend: &RenderBackend) -> bool {
        self.current
            .as_ref()
            .is_some_and(|current| current.id() == backend.id())
    }

    /// Makes `backend` current, releasing any other current backend first.
    pub fn enable_thread(&mut self, backend: &Arc<RenderBackend>) {
        self.release_other(backend);
        self.current = Some(Arc::clone(backend));
        backend.enable_thread_hook();
    }

    /// Releases `backend` from this worker.
    ///
    /// The backend's hook always runs; the slot is only cleared if `backend`
    /// was the current one.
    pub fn disable_thread(&mut self, backend: &Arc<RenderBackend>) {
        backend.disable_thread_hook();
        if self.is_current(backend) {
            self.current = None;
        }
    }

    /// Runs the disable hook of the current backend if it is not `backend`.
    ///
    /// The slot keeps pointing at the released backend until the caller
    /// replaces it.
    pub(crate) fn release_other(&mut self, backend: &RenderBackend) {
        if let Some(previous) = &self.current {
            if previous.id() != backend.id() {
                previous.disable_thread_hook();
            }
        }
    }

    pub(crate) fn set_current(&mut self, backend: &Arc<RenderBackend>) {
        self.current = Some(Arc::clone(backend));
    }

    /// Empties the slot without running any hook.
    pub fn clear(&mut self) {
        self.current = None;
    }
}
