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

//! # Khora IO
//!
//! Resource I/O for the rendering layer: editable resource sources and their
//! blobs, stores of compiled streams, the persisted record layouts, loaders
//! that turn compiled records into uploaded GPU resources, and render
//! configuration files.

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod loader;
pub mod record;
pub mod source;
pub mod store;

pub use error::{IoError, LoadError};
pub use source::{ChangeValue, ResourceChange, ResourceSource, SourceRepository};
pub use store::{ResourceStore, StreamKind};
