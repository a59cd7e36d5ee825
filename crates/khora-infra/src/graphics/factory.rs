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

use super::gl::{GlBackend, GlContextProvider};
use super::null::NullBackend;
use super::stub::StubBackend;
use super::variant::BackendVariant;
use khora_core::renderer::{BackendFactory, BackendOps, RenderApi};
use std::sync::Arc;

/// Builds the backends implemented in this crate.
///
/// GL backends need a context provider. Without one they are not offered at
/// all and the registry falls through to the next API in the chain.
#[derive(Clone, Default)]
pub struct InfraBackendFactory {
    gl: Option<Arc<dyn GlContextProvider>>,
}

impl InfraBackendFactory {
    /// A factory offering only the null and stub backends.
    pub fn new() -> Self {
        Self::default()
    }

    /// A factory that also offers the GL backends, with contexts from `provider`.
    pub fn with_gl(provider: impl GlContextProvider + 'static) -> Self {
        Self {
            gl: Some(Arc::new(provider)),
        }
    }

    fn variant(&self, api: RenderApi) -> Option<BackendVariant> {
        match api {
            RenderApi::Null => Some(BackendVariant::Null(NullBackend::new())),
            RenderApi::OpenGL2 | RenderApi::OpenGL4 | RenderApi::Gles2 => {
                let provider = self.gl.as_ref()?;
                Some(BackendVariant::Gl(GlBackend::new(api, Arc::clone(provider))))
            }
            RenderApi::DirectX10
            | RenderApi::DirectX11
            | RenderApi::Gles3
            | RenderApi::Ps3
            | RenderApi::Ps4
            | RenderApi::Xbox360
            | RenderApi::XboxOne => Some(BackendVariant::Stub(StubBackend::new(api))),
            RenderApi::Unknown
            | RenderApi::Default
            | RenderApi::OpenGL
            | RenderApi::DirectX
            | RenderApi::Gles => None,
        }
    }
}

impl BackendFactory for InfraBackendFactory {
    fn create(&self, api: RenderApi) -> Option<Box<dyn BackendOps>> {
        self.variant(api)
            .map(|variant| Box::new(variant) as Box<dyn BackendOps>)
    }
}

impl std::fmt::Debug for InfraBackendFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InfraBackendFactory")
            .field("gl", &self.gl.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn abstract_apis_have_no_implementation() {
        let factory = InfraBackendFactory::new();
        assert!(factory.create(RenderApi::OpenGL).is_none());
        assert!(factory.create(RenderApi::Default).is_none());
    }

    #[test]
    fn gl_needs_a_provider() {
        let factory = InfraBackendFactory::new();
        assert!(factory.create(RenderApi::OpenGL4).is_none());
        assert_eq!(
            factory.create(RenderApi::Null).map(|ops| ops.api()),
            Some(RenderApi::Null)
        );
    }

    #[test]
    fn stubs_refuse_to_construct() {
        let factory = InfraBackendFactory::new();
        let mut ops = factory.create(RenderApi::DirectX11).expect("stub exists");
        assert!(!ops.construct());
    }
}
