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

//! Resource identity: UUIDs, platform tags and stable name hashes.

pub mod hash;
pub mod platform;
pub mod uuid;

pub use self::hash::{
    hash_bytes, hash_str, ResourceType, KEY_PIXEL_SHADER, KEY_SOURCE, KEY_VERTEX_SHADER,
};
pub use self::platform::{
    best_match, is_equal_or_more_specific, specificity, PlatformDecl, PLATFORM_ALL,
    PLATFORM_GENERIC,
};
pub use self::uuid::ResourceUuid;
