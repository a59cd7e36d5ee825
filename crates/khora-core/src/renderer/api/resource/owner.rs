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

//! Backend ownership of GPU resources.

use crate::renderer::api::backend::BackendId;
use crate::renderer::backend::RenderBackend;
use std::sync::{Arc, Weak};

/// Which backend, if any, currently holds the GPU copy of a resource.
///
/// Transitions only happen through the backend upload and deallocate paths, so a
/// resource is never attached to two backends at once.
#[derive(Debug, Clone, Default)]
pub enum ResourceOwner {
    /// Not uploaded anywhere.
    #[default]
    Unbound,
    /// Uploaded to the backend with this identity.
    Bound {
        /// Identity of the owning backend.
        id: BackendId,
        /// Handle used to reach the owner when the resource migrates.
        backend: Weak<RenderBackend>,
    },
}

impl ResourceOwner {
    /// Ownership by `backend`.
    pub fn bound(backend: &Arc<RenderBackend>) -> Self {
        ResourceOwner::Bound {
            id: backend.id(),
            backend: Arc::downgrade(backend),
        }
    }

    /// Returns `true` if some backend holds the resource.
    pub fn is_bound(&self) -> bool {
        matches!(self, ResourceOwner::Bound { .. })
    }

    /// Identity of the owning backend.
    pub fn id(&self) -> Option<BackendId> {
        match self {
            ResourceOwner::Bound { id, .. } => Some(*id),
            ResourceOwner::Unbound => None,
        }
    }

    /// Returns `true` if `backend` is the owner.
    pub fn is_owned_by(&self, backend: &RenderBackend) -> bool {
        self.id() == Some(backend.id())
    }

    /// The owning backend, if it is still alive.
    pub fn backend(&self) -> Option<Arc<RenderBackend>> {
        match self {
            ResourceOwner::Bound { backend, .. } => backend.upgrade(),
            ResourceOwner::Unbound => None,
        }
    }
}
