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

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// A globally unique, persistent identifier for a logical render resource.
///
/// Shaders, programs and textures are all addressed by one of these, both in
/// the per-backend resource tables and in the persisted compiled streams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ResourceUuid(Uuid);

impl ResourceUuid {
    /// The nil identifier, used for "no resource".
    pub const NIL: Self = Self(Uuid::nil());

    /// Creates a new, random (version 4) `ResourceUuid`.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Builds an identifier from its 128-bit big-endian value.
    pub const fn from_u128(value: u128) -> Self {
        Self(Uuid::from_u128(value))
    }

    /// The 128-bit value, as written into persisted streams.
    pub const fn as_u128(&self) -> u128 {
        self.0.as_u128()
    }

    /// Returns `true` for the nil identifier.
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl Default for ResourceUuid {
    /// Creates a new, random (version 4) `ResourceUuid`.
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ResourceUuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl FromStr for ResourceUuid {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

impl From<Uuid> for ResourceUuid {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}
