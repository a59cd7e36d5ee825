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

//! Identity and opaque per-resource storage shared between the core and backends.

use std::sync::atomic::{AtomicU64, Ordering};

/// Unique identity of a live backend instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BackendId(pub u64);

impl BackendId {
    /// Hands out a process-unique identifier.
    pub fn next() -> Self {
        static NEXT_ID: AtomicU64 = AtomicU64::new(1);
        BackendId(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Backend-opaque storage attached to every GPU resource.
///
/// Backends keep whatever handles they need here (a GL object name, a slot
/// index). The core never interprets the contents.
pub type BackendData = [u64; 4];
