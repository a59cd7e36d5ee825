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

//! Provides the public, backend-agnostic rendering contracts.
//!
//! This module defines the "common language" for all rendering operations: the
//! [`BackendOps`] capability trait every backend variant implements, the data
//! structures that flow through it (commands, contexts, targets, shaders,
//! programs, textures) and the error types of the rendering layer.
//!
//! The 'how' is handled by concrete backend variants in the `khora-infra`
//! crate, which implement [`BackendOps`] and are produced through a
//! [`BackendFactory`]. [`backend`] holds the lifecycle shared by all of them.

pub mod api;
pub mod backend;
pub mod error;
pub mod traits;

// Re-export the most important traits and types for easier use.
pub use self::api::*;
pub use self::backend::{BackendRegistry, RenderBackend, ResourceTable, ThreadBinding};
pub use self::error::{ProgramError, RenderError, ResourceError, ShaderError};
pub use self::traits::{BackendFactory, BackendOps};
