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

//! Packed 64-bit resource platform tags.
//!
//! A platform tag names the environment a resource variant was built for. Each
//! field occupies its own byte range and the value `0` means "unspecified":
//!
//! | bits    | field            |
//! |---------|------------------|
//! | 0..8    | device platform  |
//! | 8..16   | architecture     |
//! | 16..24  | render API group |
//! | 24..32  | render API       |
//! | 32..40  | quality level    |
//! | 40..56  | custom bits      |
//!
//! A tag `a` is *equal or more specific* than `b` when every field set in `b`
//! holds the same value in `a`.

use crate::renderer::api::util::enums::{RenderApi, RenderApiGroup};

/// The fully generic platform: no field is specified.
pub const PLATFORM_GENERIC: u64 = 0;

/// Marker meaning "every platform", used when collecting variants.
pub const PLATFORM_ALL: u64 = u64::MAX;

const PLATFORM_SHIFT: u32 = 0;
const ARCH_SHIFT: u32 = 8;
const GROUP_SHIFT: u32 = 16;
const API_SHIFT: u32 = 24;
const QUALITY_SHIFT: u32 = 32;
const CUSTOM_SHIFT: u32 = 40;

const FIELDS: [(u32, u64); 6] = [
    (PLATFORM_SHIFT, 0xFF),
    (ARCH_SHIFT, 0xFF),
    (GROUP_SHIFT, 0xFF),
    (API_SHIFT, 0xFF),
    (QUALITY_SHIFT, 0xFF),
    (CUSTOM_SHIFT, 0xFFFF),
];

/// The decomposed form of a platform tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlatformDecl {
    /// Device platform (operating system family), `0` if unspecified.
    pub platform: u8,
    /// CPU architecture, `0` if unspecified.
    pub arch: u8,
    /// Render API group.
    pub render_api_group: RenderApiGroup,
    /// Render API.
    pub render_api: RenderApi,
    /// Quality tier, `0` if unspecified.
    pub quality_level: u8,
    /// Caller-defined bits.
    pub custom: u16,
}

impl PlatformDecl {
    /// Splits a packed tag into its fields.
    pub fn decompose(platform: u64) -> Self {
        let field = |shift: u32, mask: u64| (platform >> shift) & mask;
        Self {
            platform: field(PLATFORM_SHIFT, 0xFF) as u8,
            arch: field(ARCH_SHIFT, 0xFF) as u8,
            render_api_group: RenderApiGroup::from_raw(field(GROUP_SHIFT, 0xFF) as u8),
            render_api: RenderApi::from_raw(field(API_SHIFT, 0xFF) as u8),
            quality_level: field(QUALITY_SHIFT, 0xFF) as u8,
            custom: field(CUSTOM_SHIFT, 0xFFFF) as u16,
        }
    }

    /// Packs the fields back into a tag.
    pub fn compose(&self) -> u64 {
        ((self.platform as u64) << PLATFORM_SHIFT)
            | ((self.arch as u64) << ARCH_SHIFT)
            | ((self.render_api_group as u64) << GROUP_SHIFT)
            | ((self.render_api as u64) << API_SHIFT)
            | ((self.quality_level as u64) << QUALITY_SHIFT)
            | ((self.custom as u64) << CUSTOM_SHIFT)
    }
}

/// Returns `true` if `platform` is equal to, or a specialization of, `reference`.
pub fn is_equal_or_more_specific(platform: u64, reference: u64) -> bool {
    if reference == PLATFORM_ALL {
        return true;
    }
    FIELDS.iter().all(|&(shift, mask)| {
        let wanted = (reference >> shift) & mask;
        wanted == 0 || wanted == (platform >> shift) & mask
    })
}

/// Number of specified fields in a tag.
pub fn specificity(platform: u64) -> u32 {
    FIELDS
        .iter()
        .filter(|&&(shift, mask)| (platform >> shift) & mask != 0)
        .count() as u32
}

/// Picks the most specific candidate that `target` satisfies.
///
/// Candidates are considered in iteration order and a later candidate wins a
/// tie, so callers pass them oldest first.
pub fn best_match<I>(candidates: I, target: u64) -> Option<u64>
where
    I: IntoIterator<Item = u64>,
{
    let mut best: Option<u64> = None;
    for candidate in candidates {
        if !is_equal_or_more_specific(target, candidate) {
            continue;
        }
        match best {
            Some(current) if specificity(current) > specificity(candidate) => {}
            _ => best = Some(candidate),
        }
    }
    best
}
