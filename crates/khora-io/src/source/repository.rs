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

//! Storage of resource sources and their blobs.

use super::ResourceSource;
use crate::error::IoError;
use khora_core::resource::{hash_bytes, ResourceUuid};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

/// Where resource sources and their blobs live.
pub trait SourceRepository: Send + Sync {
    /// Reads the source of `uuid`, `None` if it has never been written.
    fn read(&self, uuid: ResourceUuid) -> Result<Option<ResourceSource>, IoError>;

    /// Replaces the source of `uuid`.
    fn write(&self, uuid: ResourceUuid, source: &ResourceSource) -> Result<(), IoError>;

    /// Stores a blob and returns its checksum.
    fn write_blob(&self, uuid: ResourceUuid, data: &[u8]) -> Result<u64, IoError>;

    /// Fetches a blob and verifies its size and checksum.
    fn read_blob(&self, uuid: ResourceUuid, checksum: u64, size: u64) -> Result<Vec<u8>, IoError>;

    /// Stores `data` and records it under `key` for `platform` in `source`.
    fn set_blob(
        &self,
        source: &mut ResourceSource,
        uuid: ResourceUuid,
        key: u64,
        platform: u64,
        data: &[u8],
    ) -> Result<(), IoError> {
        let checksum = self.write_blob(uuid, data)?;
        source.set_blob(key, platform, data.len() as u64, checksum);
        Ok(())
    }
}

fn verify_blob(
    uuid: ResourceUuid,
    checksum: u64,
    size: u64,
    data: Vec<u8>,
) -> Result<Vec<u8>, IoError> {
    if data.len() as u64 != size || hash_bytes(&data) != checksum {
        return Err(IoError::BlobMismatch { uuid, checksum });
    }
    Ok(data)
}

/// Keeps sources in memory. Used by tools and tests.
#[derive(Debug, Default)]
pub struct MemorySourceRepository {
    sources: Mutex<HashMap<ResourceUuid, ResourceSource>>,
    blobs: Mutex<HashMap<(ResourceUuid, u64), Vec<u8>>>,
}

impl MemorySourceRepository {
    /// An empty repository.
    pub fn new() -> Self {
        Self::default()
    }
}

impl SourceRepository for MemorySourceRepository {
    fn read(&self, uuid: ResourceUuid) -> Result<Option<ResourceSource>, IoError> {
        let sources = self.sources.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(sources.get(&uuid).cloned())
    }

    fn write(&self, uuid: ResourceUuid, source: &ResourceSource) -> Result<(), IoError> {
        let mut sources = self.sources.lock().unwrap_or_else(PoisonError::into_inner);
        sources.insert(uuid, source.clone());
        Ok(())
    }

    fn write_blob(&self, uuid: ResourceUuid, data: &[u8]) -> Result<u64, IoError> {
        let checksum = hash_bytes(data);
        let mut blobs = self.blobs.lock().unwrap_or_else(PoisonError::into_inner);
        blobs.insert((uuid, checksum), data.to_vec());
        Ok(checksum)
    }

    fn read_blob(&self, uuid: ResourceUuid, checksum: u64, size: u64) -> Result<Vec<u8>, IoError> {
        let data = {
            let blobs = self.blobs.lock().unwrap_or_else(PoisonError::into_inner);
            blobs.get(&(uuid, checksum)).cloned()
        };
        match data {
            Some(data) => verify_blob(uuid, checksum, size, data),
            None => Err(IoError::BlobMismatch { uuid, checksum }),
        }
    }
}

/// Keeps sources on disk, one directory per resource.
///
/// ```text
/// <root>/<uuid>/source.ron
/// <root>/<uuid>/<checksum>.blob
/// ```
#[derive(Debug, Clone)]
pub struct LocalSourceRepository {
    root: PathBuf,
}

impl LocalSourceRepository {
    /// A repository rooted at `root`. The directory is created on first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resource_dir(&self, uuid: ResourceUuid) -> PathBuf {
        self.root.join(uuid.to_string())
    }

    fn source_path(&self, uuid: ResourceUuid) -> PathBuf {
        self.resource_dir(uuid).join("source.ron")
    }

    fn blob_path(&self, uuid: ResourceUuid, checksum: u64) -> PathBuf {
        self.resource_dir(uuid).join(format!("{checksum:016x}.blob"))
    }

    fn ensure_dir(&self, uuid: ResourceUuid) -> Result<(), IoError> {
        let dir = self.resource_dir(uuid);
        std::fs::create_dir_all(&dir).map_err(|e| IoError::io(dir, e))
    }
}

impl SourceRepository for LocalSourceRepository {
    fn read(&self, uuid: ResourceUuid) -> Result<Option<ResourceSource>, IoError> {
        let path = self.source_path(uuid);
        let text = match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(IoError::io(path, e)),
        };
        ron::from_str(&text)
            .map(Some)
            .map_err(|source| IoError::SourceFormat { path, source })
    }

    fn write(&self, uuid: ResourceUuid, source: &ResourceSource) -> Result<(), IoError> {
        self.ensure_dir(uuid)?;
        let pretty_config = ron::ser::PrettyConfig::default().indentor("  ".to_string());
        let text = ron::ser::to_string_pretty(source, pretty_config)?;
        let path = self.source_path(uuid);
        std::fs::write(&path, text).map_err(|e| IoError::io(path, e))?;
        log::debug!("Wrote resource source {uuid} ({} changes)", source.changes().len());
        Ok(())
    }

    fn write_blob(&self, uuid: ResourceUuid, data: &[u8]) -> Result<u64, IoError> {
        self.ensure_dir(uuid)?;
        let checksum = hash_bytes(data);
        let path = self.blob_path(uuid, checksum);
        std::fs::write(&path, data).map_err(|e| IoError::io(path, e))?;
        Ok(checksum)
    }

    fn read_blob(&self, uuid: ResourceUuid, checksum: u64, size: u64) -> Result<Vec<u8>, IoError> {
        let path = self.blob_path(uuid, checksum);
        match std::fs::read(&path) {
            Ok(data) => verify_blob(uuid, checksum, size, data),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(IoError::BlobMismatch { uuid, checksum })
            }
            Err(e) => Err(IoError::io(path, e)),
        }
    }
}
