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

//! Which platforms a resource is compiled for.

use khora_core::renderer::RenderApi;
use khora_core::resource::PlatformDecl;

/// The API a sub-platform is compiled with.
///
/// An unset API is derived from the API group. A sub-platform that names
/// neither is not compiled at all.
pub fn concrete_api(platform: u64) -> Option<RenderApi> {
    let decl = PlatformDecl::decompose(platform);
    if decl.render_api <= RenderApi::Default {
        decl.render_api_group.api()
    } else {
        Some(decl.render_api)
    }
}

/// Appends every platform of `more` not already in `platforms`, keeping order.
pub fn merge(platforms: &mut Vec<u64>, more: impl IntoIterator<Item = u64>) {
    for platform in more {
        if !platforms.contains(&platform) {
            platforms.push(platform);
        }
    }
}
