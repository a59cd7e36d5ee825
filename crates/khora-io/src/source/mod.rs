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

//! Resource source change history.
//!
//! A [`ResourceSource`] is the editable description of one resource: an
//! append-only list of changes, each setting or clearing one key for one
//! platform. Values are either inline strings (used for cross references such
//! as "which vertex shader") or content-addressed blobs stored next to the
//! source by a [`SourceRepository`].

mod repository;

pub use self::repository::{LocalSourceRepository, MemorySourceRepository, SourceRepository};

use khora_core::resource::{is_equal_or_more_specific, specificity, PLATFORM_ALL};
use serde::{Deserialize, Serialize};

/// The payload of a change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangeValue {
    /// An inline value.
    Value(String),
    /// A blob stored by the repository.
    Blob {
        /// Size in bytes.
        size: u64,
        /// Content checksum, also the blob's storage key.
        checksum: u64,
    },
    /// The key was cleared for this platform.
    Unset,
}

/// One entry of the change history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceChange {
    /// Position in the history. Later changes have larger timestamps.
    pub timestamp: u64,
    /// Name hash of the key.
    pub key: u64,
    /// Platform the change applies to.
    pub platform: u64,
    /// The new value.
    pub value: ChangeValue,
}

impl ResourceChange {
    /// The inline value, if this change carries one.
    pub fn as_value(&self) -> Option<&str> {
        match &self.value {
            ChangeValue::Value(value) => Some(value),
            _ => None,
        }
    }

    /// Size and checksum, if this change carries a blob.
    pub fn as_blob(&self) -> Option<(u64, u64)> {
        match self.value {
            ChangeValue::Blob { size, checksum } => Some((size, checksum)),
            _ => None,
        }
    }
}

/// The change history of one resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceSource {
    changes: Vec<ResourceChange>,
}

impl ResourceSource {
    /// An empty history.
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, key: u64, platform: u64, value: ChangeValue) {
        let timestamp = self.changes.last().map_or(1, |last| last.timestamp + 1);
        self.changes.push(ResourceChange {
            timestamp,
            key,
            platform,
            value,
        });
    }

    /// Records an inline value.
    pub fn set(&mut self, key: u64, platform: u64, value: impl Into<String>) {
        self.push(key, platform, ChangeValue::Value(value.into()));
    }

    /// Records a blob already written to the repository.
    pub fn set_blob(&mut self, key: u64, platform: u64, size: u64, checksum: u64) {
        self.push(key, platform, ChangeValue::Blob { size, checksum });
    }

    /// Clears a key for one platform.
    pub fn unset(&mut self, key: u64, platform: u64) {
        self.push(key, platform, ChangeValue::Unset);
    }

    /// Every change, oldest first.
    pub fn changes(&self) -> &[ResourceChange] {
        &self.changes
    }

    /// The change in effect for `key` on `platform`.
    ///
    /// Only changes whose platform `platform` satisfies are considered. For
    /// each such platform the newest change counts, and a cleared key hides
    /// that platform. Among what remains the most specific platform wins,
    /// then the newest change.
    pub fn get(&self, key: u64, platform: u64) -> Option<&ResourceChange> {
        let mut newest: Vec<&ResourceChange> = Vec::new();
        for change in self
            .changes
            .iter()
            .filter(|c| c.key == key && is_equal_or_more_specific(platform, c.platform))
        {
            match newest.iter_mut().find(|c| c.platform == change.platform) {
                Some(slot) if slot.timestamp < change.timestamp => *slot = change,
                Some(_) => {}
                None => newest.push(change),
            }
        }
        newest
            .into_iter()
            .filter(|c| c.value != ChangeValue::Unset)
            .max_by_key(|c| (specificity(c.platform), c.timestamp))
    }

    /// Every distinct platform named by a change, in first-seen order.
    pub fn platforms(&self) -> Vec<u64> {
        let mut platforms = Vec::new();
        for change in &self.changes {
            if !platforms.contains(&change.platform) {
                platforms.push(change.platform);
            }
        }
        platforms
    }

    /// The distinct recorded platforms equal to or more specific than `platform`.
    ///
    /// [`PLATFORM_ALL`] selects every recorded platform.
    pub fn platforms_within(&self, platform: u64) -> Vec<u64> {
        self.platforms()
            .into_iter()
            .filter(|&p| platform == PLATFORM_ALL || is_equal_or_more_specific(p, platform))
            .collect()
    }
}
