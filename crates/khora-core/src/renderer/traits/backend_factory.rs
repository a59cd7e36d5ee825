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

use crate::renderer::api::util::enums::RenderApi;
use crate::renderer::traits::backend_ops::BackendOps;

/// Creates backend implementations for concrete APIs.
///
/// The set of implementations is fixed at build time; a concrete factory lives
/// in `khora-infra`. The registry asks the factory for one API at a time while
/// walking the fallback chain.
pub trait BackendFactory: Send + Sync {
    /// Creates an unconstructed implementation for `api`.
    ///
    /// # Returns
    ///
    /// `None` if this build has no implementation for `api`. The registry then
    /// moves on to the next API in the fallback chain.
    fn create(&self, api: RenderApi) -> Option<Box<dyn BackendOps>>;
}
