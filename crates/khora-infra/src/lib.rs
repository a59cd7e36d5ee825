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

//! # Khora Infra
//!
//! Concrete implementations of the rendering contracts defined in
//! `khora-core`: the null, OpenGL and stub backends, the factory the backend
//! registry builds them with, and the offline shader and program compiler.

#![warn(missing_docs)]

pub mod compile;
pub mod graphics;

pub use compile::{CompileError, ResourceCompiler};
pub use graphics::InfraBackendFactory;
