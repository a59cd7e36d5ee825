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

//! Compiled resource stores.
//!
//! The compiler writes one static stream per resource and platform, plus a
//! dynamic stream for resources with a compiled payload. Loaders read back the
//! variant that best fits a backend's resource platform.

use crate::error::IoError;
use khora_core::resource::{best_match, ResourceUuid};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

/// The two persisted streams of a compiled resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamKind {
    /// Type tag, version and layout.
    Static,
    /// Compiled payload.
    Dynamic,
}

impl StreamKind {
    fn extension(self) -> &'static str {
        match self {
            StreamKind::Static => "static",
            StreamKind::Dynamic => "dynamic",
        }
    }
}

/// Where compiled resources are persisted.
pub trait ResourceStore: Send + Sync {
    /// Writes one stream, replacing any previous content.
    fn write(&self, uuid: ResourceUuid, kind: StreamKind, platform: u64, bytes: &[u8])
        -> Result<(), IoError>;

    /// Reads one stream for exactly `platform`.
    fn read(
        &self,
        uuid: ResourceUuid,
        kind: StreamKind,
        platform: u64,
    ) -> Result<Option<Vec<u8>>, IoError>;

    /// Every platform a stream of `kind` was written for.
    fn platforms(&self, uuid: ResourceUuid, kind: StreamKind) -> Result<Vec<u64>, IoError>;

    /// Returns `true` if a stream exists for exactly `platform`.
    fn exists(&self, uuid: ResourceUuid, kind: StreamKind, platform: u64) -> Result<bool, IoError> {
        Ok(self.platforms(uuid, kind)?.contains(&platform))
    }

    /// Reads the most specific stream `platform` satisfies.
    ///
    /// Returns the platform actually read along with the bytes.
    fn read_best(
        &self,
        uuid: ResourceUuid,
        kind: StreamKind,
        platform: u64,
    ) -> Result<Option<(u64, Vec<u8>)>, IoError> {
        let mut candidates = self.platforms(uuid, kind)?;
        candidates.sort_unstable();
        let Some(best) = best_match(candidates, platform) else {
            return Ok(None);
        };
        Ok(self.read(uuid, kind, best)?.map(|bytes| (best, bytes)))
    }
}

/// Keeps compiled streams in memory.
#[derive(Debug, Default)]
pub struct MemoryResourceStore {
    streams: Mutex<HashMap<(ResourceUuid, StreamKind, u64), Vec<u8>>>,
}

impl MemoryResourceStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl ResourceStore for MemoryResourceStore {
    fn write(
        &self,
        uuid: ResourceUuid,
        kind: StreamKind,
        platform: u64,
        bytes: &[u8],
    ) -> Result<(), IoError> {
        let mut streams = self.streams.lock().unwrap_or_else(PoisonError::into_inner);
        streams.insert((uuid, kind, platform), bytes.to_vec());
        Ok(())
    }

    fn read(
        &self,
        uuid: ResourceUuid,
        kind: StreamKind,
        platform: u64,
    ) -> Result<Option<Vec<u8>>, IoError> {
        let streams = self.streams.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(streams.get(&(uuid, kind, platform)).cloned())
    }

    fn platforms(&self, uuid: ResourceUuid, kind: StreamKind) -> Result<Vec<u64>, IoError> {
        let streams = self.streams.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(streams
            .keys()
            .filter(|(u, k, _)| *u == uuid && *k == kind)
            .map(|&(_, _, platform)| platform)
            .collect())
    }
}

/// Keeps compiled streams on disk.
///
/// ```text
/// <root>/<uuid>/<platform as 16 hex digits>.static
/// <root>/<uuid>/<platform as 16 hex digits>.dynamic
/// ```
#[derive(Debug, Clone)]
pub struct LocalResourceStore {
    root: PathBuf,
}

impl LocalResourceStore {
    /// A store rooted at `root`. Directories are created on first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn stream_path(&self, uuid: ResourceUuid, kind: StreamKind, platform: u64) -> PathBuf {
        self.root
            .join(uuid.to_string())
            .join(format!("{platform:016x}.{}", kind.extension()))
    }
}

impl ResourceStore for LocalResourceStore {
    fn write(
        &self,
        uuid: ResourceUuid,
        kind: StreamKind,
        platform: u64,
        bytes: &[u8],
    ) -> Result<(), IoError> {
        let path = self.stream_path(uuid, kind, platform);
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir).map_err(|e| IoError::io(dir, e))?;
        }
        std::fs::write(&path, bytes).map_err(|e| IoError::io(&path, e))?;
        log::debug!("Wrote {} bytes to {}", bytes.len(), path.display());
        Ok(())
    }

    fn read(
        &self,
        uuid: ResourceUuid,
        kind: StreamKind,
        platform: u64,
    ) -> Result<Option<Vec<u8>>, IoError> {
        let path = self.stream_path(uuid, kind, platform);
        match std::fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(IoError::io(path, e)),
        }
    }

    fn platforms(&self, uuid: ResourceUuid, kind: StreamKind) -> Result<Vec<u64>, IoError> {
        let dir = self.root.join(uuid.to_string());
        let entries = match std::fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(IoError::io(dir, e)),
        };
        let mut platforms = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| IoError::io(&dir, e))?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(kind.extension()) {
                continue;
            }
            let platform = path
                .file_stem()
                .and_then(|stem| stem.to_str())
                .and_then(|stem| u64::from_str_radix(stem, 16).ok());
            match platform {
                Some(platform) => platforms.push(platform),
                None => log::warn!("Ignoring stray file {} in resource store", path.display()),
            }
        }
        Ok(platforms)
    }
}
