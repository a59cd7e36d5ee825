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

//! UUID-keyed tables of resources uploaded to a backend.

use crate::resource::ResourceUuid;
use std::sync::{Arc, Mutex, PoisonError, Weak};

type Bucket<T> = Vec<(ResourceUuid, Weak<T>)>;

/// A fixed-bucket map from resource UUID to the live resource.
///
/// The bucket count is chosen once and never changes. Entries hold weak
/// references so a table never keeps a resource alive on its own; entries whose
/// resource was dropped are pruned on access.
pub struct ResourceTable<T> {
    buckets: Box<[Mutex<Bucket<T>>]>,
}

impl<T> ResourceTable<T> {
    /// Creates an empty table with `bucket_count` buckets (at least one).
    pub fn new(bucket_count: usize) -> Self {
        Self {
            buckets: (0..bucket_count.max(1))
                .map(|_| Mutex::new(Vec::new()))
                .collect(),
        }
    }

    /// The fixed number of buckets.
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    fn bucket(&self, uuid: ResourceUuid) -> std::sync::MutexGuard<'_, Bucket<T>> {
        let value = uuid.as_u128();
        let folded = (value as u64) ^ ((value >> 64) as u64);
        let index = (folded % self.buckets.len() as u64) as usize;
        self.buckets[index]
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Associates `uuid` with `resource`, replacing any previous entry.
    pub fn insert(&self, uuid: ResourceUuid, resource: &Arc<T>) {
        let mut bucket = self.bucket(uuid);
        bucket.retain(|(key, entry)| *key != uuid && entry.strong_count() > 0);
        bucket.push((uuid, Arc::downgrade(resource)));
    }

    /// Finds the live resource for `uuid`.
    pub fn get(&self, uuid: ResourceUuid) -> Option<Arc<T>> {
        let mut bucket = self.bucket(uuid);
        let position = bucket.iter().position(|(key, _)| *key == uuid)?;
        match bucket[position].1.upgrade() {
            Some(resource) => Some(resource),
            None => {
                bucket.swap_remove(position);
                None
            }
        }
    }

    /// Returns `true` if a live resource is registered for `uuid`.
    pub fn contains(&self, uuid: ResourceUuid) -> bool {
        self.get(uuid).is_some()
    }

    /// Evicts `uuid`. Returns `true` if an entry was present.
    pub fn remove(&self, uuid: ResourceUuid) -> bool {
        let mut bucket = self.bucket(uuid);
        match bucket.iter().position(|(key, _)| *key == uuid) {
            Some(position) => {
                bucket.swap_remove(position);
                true
            }
            None => false,
        }
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.buckets
            .iter()
            .map(|bucket| {
                bucket
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .iter()
                    .filter(|(_, entry)| entry.strong_count() > 0)
                    .count()
            })
            .sum()
    }

    /// Returns `true` if no live entry remains.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Strong references to every live resource, in no particular order.
    pub fn live(&self) -> Vec<Arc<T>> {
        self.buckets
            .iter()
            .flat_map(|bucket| {
                bucket
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .iter()
                    .filter_map(|(_, entry)| entry.upgrade())
                    .collect::<Vec<_>>()
            })
            .collect()
    }

    /// Drops every entry.
    pub fn clear(&self) {
        for bucket in self.buckets.iter() {
            bucket.lock().unwrap_or_else(PoisonError::into_inner).clear();
        }
    }
}

impl<T> std::fmt::Debug for ResourceTable<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceTable")
            .field("buckets", &self.bucket_count())
            .field("len", &self.len())
            .finish()
    }
}
