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

//! Error types of the I/O layer.

use khora_core::renderer::ResourceError;
use khora_core::resource::{ResourceType, ResourceUuid};
use std::path::PathBuf;
use thiserror::Error;

/// A failure reading or writing a source, a store or a configuration file.
#[derive(Debug, Error)]
pub enum IoError {
    /// A filesystem operation failed.
    #[error("I/O error on '{path}': {source}")]
    Io {
        /// The file or directory involved.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },
    /// A resource source file could not be parsed.
    #[error("Malformed resource source '{path}': {source}")]
    SourceFormat {
        /// The source file.
        path: PathBuf,
        /// The parser error.
        #[source]
        source: ron::error::SpannedError,
    },
    /// A resource source could not be written out.
    #[error("Unable to serialize resource source: {0}")]
    SourceSerialize(#[from] ron::Error),
    /// A persisted record could not be encoded.
    #[error("Unable to encode record: {0}")]
    Encode(#[from] bincode::error::EncodeError),
    /// A persisted record could not be decoded.
    #[error("Unable to decode record: {0}")]
    Decode(#[from] bincode::error::DecodeError),
    /// A persisted record was written by an unsupported format version.
    #[error("Unsupported record version {found} (expected {expected})")]
    Version {
        /// The version found in the stream.
        found: u32,
        /// The version this build reads.
        expected: u32,
    },
    /// A static record names a different resource type than requested.
    #[error("Record type hash {found:#018x} does not match {expected:?}")]
    TypeMismatch {
        /// The requested type.
        expected: ResourceType,
        /// The type hash found in the stream.
        found: u64,
    },
    /// A stored blob does not match the checksum recorded for it.
    #[error("Blob {checksum:#018x} of {uuid} is missing or corrupt")]
    BlobMismatch {
        /// The owning resource.
        uuid: ResourceUuid,
        /// The checksum the change recorded.
        checksum: u64,
    },
    /// A configuration file could not be parsed.
    #[error("Malformed configuration '{path}': {source}")]
    Config {
        /// The configuration file.
        path: PathBuf,
        /// The parser error.
        #[source]
        source: toml::de::Error,
    },
}

impl IoError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        IoError::Io {
            path: path.into(),
            source,
        }
    }
}

/// A failure turning persisted records into uploaded GPU resources.
#[derive(Debug, Error)]
pub enum LoadError {
    /// No compiled variant of the resource matches the backend's platform.
    #[error("No compiled variant of {uuid} for platform {platform:#018x}")]
    NotCompiled {
        /// The resource.
        uuid: ResourceUuid,
        /// The backend's resource platform.
        platform: u64,
    },
    /// Reading the persisted records failed.
    #[error(transparent)]
    Io(#[from] IoError),
    /// The backend refused the resource.
    #[error(transparent)]
    Resource(#[from] ResourceError),
}
