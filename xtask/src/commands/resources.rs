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

use crate::commands::manifest::{load_manifest, ResourceManifest};
use crate::helpers::*;
use anyhow::{Context, Result};
use khora_core::resource::{
    hash_str, PlatformDecl, ResourceType, ResourceUuid, KEY_PIXEL_SHADER, KEY_SOURCE,
    KEY_VERTEX_SHADER,
};
use khora_io::record::ProgramStaticRecord;
use khora_io::source::LocalSourceRepository;
use khora_io::store::LocalResourceStore;
use khora_io::{ChangeValue, ResourceSource, ResourceStore, SourceRepository, StreamKind};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

pub const MANIFEST_FILE_NAME: &str = "Resources.toml";
pub const SOURCE_ROOT: &str = ".resources/sources";
pub const STORE_ROOT: &str = ".resources/compiled";

fn parse_uuid(text: &str) -> Result<ResourceUuid> {
    text.parse()
        .with_context(|| format!("'{text}' is not a valid resource uuid"))
}

/// `OpenGL/OpenGL4` style label of a platform tag.
fn describe_platform(platform: u64) -> String {
    let decl = PlatformDecl::decompose(platform);
    let mut label = format!("{:?}/{:?}", decl.render_api_group, decl.render_api);
    if decl.quality_level != 0 {
        label.push_str(&format!(" q{}", decl.quality_level));
    }
    label
}

fn describe_key(key: u64) -> String {
    [KEY_SOURCE, KEY_VERTEX_SHADER, KEY_PIXEL_SHADER]
        .into_iter()
        .find(|name| hash_str(name) == key)
        .map_or_else(|| format!("{key:#018x}"), str::to_string)
}

pub fn import(manifest_path: &Path, sources: &Path) -> Result<()> {
    print_heading("Importing Resources", "📦", Tone::Magenta);
    print_note("Manifest", &manifest_path.display().to_string());
    let manifest = load_manifest(manifest_path)?;
    let repository = LocalSourceRepository::new(sources);
    let count = import_manifest(&manifest, &repository)?;
    print_success(&format!(
        "Recorded {count} resource(s) into '{}'",
        sources.display()
    ));
    Ok(())
}

/// Appends every manifest variant to the recorded sources.
///
/// Returns the number of resources touched.
pub fn import_manifest(
    manifest: &ResourceManifest,
    repository: &dyn SourceRepository,
) -> Result<usize> {
    let mut count = 0;
    for shader in &manifest.shaders {
        let uuid = parse_uuid(&shader.uuid)?;
        let mut source = repository.read(uuid)?.unwrap_or_default();
        for variant in &shader.variants {
            let text = fs::read(&variant.file).with_context(|| {
                format!("Failed to read shader file '{}'", variant.file.display())
            })?;
            let platform = variant.platform.compose();
            repository.set_blob(&mut source, uuid, hash_str(KEY_SOURCE), platform, &text)?;
            log::debug!(
                "{} {uuid} <- {} ({})",
                shader.stage.type_name(),
                variant.file.display(),
                describe_platform(platform)
            );
        }
        repository.write(uuid, &source)?;
        count += 1;
    }

    for program in &manifest.programs {
        let uuid = parse_uuid(&program.uuid)?;
        let mut source = repository.read(uuid)?.unwrap_or_default();
        for variant in &program.variants {
            let platform = variant.platform.compose();
            let vertex = parse_uuid(&variant.vertex)?;
            let pixel = parse_uuid(&variant.pixel)?;
            source.set(hash_str(KEY_VERTEX_SHADER), platform, vertex.to_string());
            source.set(hash_str(KEY_PIXEL_SHADER), platform, pixel.to_string());
        }
        repository.write(uuid, &source)?;
        count += 1;
    }
    Ok(count)
}

pub fn inspect(uuid: &str, sources: &Path, store: &Path) -> Result<()> {
    let uuid = parse_uuid(uuid)?;
    print_heading(&format!("Resource {uuid}"), "🔍", Tone::Cyan);

    match LocalSourceRepository::new(sources).read(uuid)? {
        Some(source) => print_source(&source),
        None => print_note("Source", "not recorded"),
    }

    let store = LocalResourceStore::new(store);
    for kind in [StreamKind::Static, StreamKind::Dynamic] {
        let mut platforms = store.platforms(uuid, kind)?;
        platforms.sort_unstable();
        println!("{} {}", bold(format!("{kind:?} streams:")), platforms.len());
        for platform in platforms {
            let bytes = store.read(uuid, kind, platform)?.unwrap_or_default();
            let summary = match kind {
                StreamKind::Static => describe_static(uuid, &bytes),
                StreamKind::Dynamic => format!("{} byte(s)", bytes.len()),
            };
            println!("  {:<24} {}", describe_platform(platform), summary);
        }
    }
    Ok(())
}

fn print_source(source: &ResourceSource) {
    println!("{} {}", bold("Source changes:"), source.changes().len());
    for change in source.changes() {
        let value = match &change.value {
            ChangeValue::Value(value) => value.clone(),
            ChangeValue::Blob { size, checksum } => format!("blob {checksum:016x} ({size} bytes)"),
            ChangeValue::Unset => "<unset>".to_string(),
        };
        println!(
            "  #{:<4} {:<14} {:<24} {}",
            change.timestamp,
            describe_key(change.key),
            describe_platform(change.platform),
            value
        );
    }
}

fn describe_static(uuid: ResourceUuid, bytes: &[u8]) -> String {
    let Some(type_hash) = bytes
        .get(..8)
        .and_then(|head| head.try_into().ok())
        .map(u64::from_le_bytes)
    else {
        return Tone::Yellow.paint(format!("truncated ({} bytes)", bytes.len()));
    };
    match ResourceType::from_hash(type_hash) {
        Some(ResourceType::Program) => match ProgramStaticRecord::from_bytes(bytes) {
            Ok(record) => {
                let program = record.into_program(uuid);
                format!(
                    "program, {} attribute(s), stride {}, {} parameter(s)",
                    program.attributes.attributes.len(),
                    program.attributes.stride,
                    program.parameters.len()
                )
            }
            Err(e) => Tone::Red.paint(e),
        },
        Some(kind) => kind.name().to_string(),
        None => Tone::Yellow.paint(format!("unknown type {type_hash:#018x}")),
    }
}

pub fn list(store: &Path) -> Result<()> {
    print_heading("Compiled Resources", "📦", Tone::Blue);
    let streams = collect_streams(store)?;
    if streams.is_empty() {
        print_note("Info", &format!("No compiled streams under '{}'", store.display()));
        return Ok(());
    }
    for (uuid, (statics, dynamics)) in &streams {
        println!("  {}  {statics} static, {dynamics} dynamic", Tone::Green.paint(uuid));
    }
    print_success(&format!("{} compiled resource(s)", streams.len()));
    Ok(())
}

/// Counts static and dynamic stream files per resource directory.
fn collect_streams(store: &Path) -> Result<BTreeMap<String, (usize, usize)>> {
    let mut streams = BTreeMap::new();
    if !store.exists() {
        return Ok(streams);
    }
    for entry in WalkDir::new(store).min_depth(2).max_depth(2) {
        let entry = entry.with_context(|| format!("Failed to walk '{}'", store.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let Some(uuid) = path
            .parent()
            .and_then(Path::file_name)
            .and_then(|name| name.to_str())
        else {
            continue;
        };
        if uuid.parse::<ResourceUuid>().is_err() {
            continue;
        }
        let slot = streams.entry(uuid.to_string()).or_insert((0, 0));
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("static") => slot.0 += 1,
            Some("dynamic") => slot.1 += 1,
            _ => {}
        }
    }
    Ok(streams)
}
