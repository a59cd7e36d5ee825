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

//! Backend-agnostic rendering API.
//!
//! Organized into several logical sub-modules:
//!
//! - **[`core`]**: Adapters, display modes and render configuration.
//! - **[`resource`]**: Drawables, render targets and backend ownership.
//! - **[`util`]**: API enums, pixel formats and stage flags.
//! - **[`context`]**: The concurrently fillable command buffer.
//! - **[`pipeline`]**: Ordered steps dispatched against one backend.

pub mod backend;
pub mod command;
pub mod context;
pub mod core;
pub mod pipeline;
pub mod program;
pub mod resource;
pub mod shader;
pub mod texture;
pub mod util;

pub use self::backend::*;
pub use self::command::*;
pub use self::context::*;
pub use self::core::*;
pub use self::pipeline::*;
pub use self::program::*;
pub use self::resource::*;
pub use self::shader::*;
pub use self::texture::*;
pub use self::util::*;
