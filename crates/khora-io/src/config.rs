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

//! Render configuration files.

use crate::error::IoError;
use khora_core::renderer::RenderConfig;
use std::path::Path;

/// Conventional name of the render configuration file.
pub const CONFIG_FILE_NAME: &str = "Render.toml";

/// Reads a render configuration, falling back to defaults if the file is absent.
///
/// Keys missing from the file keep their default values.
///
/// ```toml
/// disabled_apis = ["DirectX10", "DirectX11"]
/// max_concurrency = 4
/// table_buckets = 512
/// ```
pub fn load_render_config(path: impl AsRef<Path>) -> Result<RenderConfig, IoError> {
    let path = path.as_ref();
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            log::info!("No render configuration at {}, using defaults", path.display());
            return Ok(RenderConfig::default());
        }
        Err(e) => return Err(IoError::io(path, e)),
    };
    toml::from_str(&text).map_err(|source| IoError::Config {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use khora_core::renderer::RenderApi;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_render_config(dir.path().join(CONFIG_FILE_NAME)).unwrap();
        assert_eq!(config, RenderConfig::default());
    }

    #[test]
    fn partial_file_overrides_given_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "disabled_apis = [\"OpenGL4\"]\nmax_concurrency = 4\n").unwrap();

        let config = load_render_config(&path).unwrap();

        assert_eq!(config.disabled_apis, vec![RenderApi::OpenGL4]);
        assert_eq!(config.max_concurrency, Some(4));
        assert_eq!(config.table_buckets, RenderConfig::default().table_buckets);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "table_buckets = \"many\"").unwrap();

        assert!(matches!(load_render_config(&path), Err(IoError::Config { .. })));
    }
}
