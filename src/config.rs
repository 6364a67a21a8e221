// Copyright 2026 The norsk-drill Authors
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

use std::fs::read_to_string;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;

use crate::error::Fallible;
use crate::error::fail;

/// Looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "norsk-drill.toml";

/// Settings read from `norsk-drill.toml`. Every key is optional.
///
/// ```toml
/// host = "127.0.0.1"
/// port = 8000
/// database = "data/norsk_drill.db"
/// window_size = 10
/// admin_localhost_only = true
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Path to the SQLite database. Created if missing.
    pub database: PathBuf,
    /// How many recently shown words to avoid repeating.
    pub window_size: usize,
    /// Reject admin requests that don't come from a loopback address.
    pub admin_localhost_only: bool,
    /// Fixed RNG seed. By default the seed comes from the clock.
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            database: PathBuf::from("norsk_drill.db"),
            window_size: 10,
            admin_localhost_only: true,
            seed: None,
        }
    }
}

impl Config {
    pub fn from_toml(text: &str) -> Fallible<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Load the config. An explicit path must exist; the default file is
    /// optional.
    pub fn load(path: Option<&Path>) -> Fallible<Self> {
        match path {
            Some(path) => {
                if !path.exists() {
                    return fail(format!("config file {} does not exist.", path.display()));
                }
                log::debug!("Reading config from {}", path.display());
                Self::from_toml(&read_to_string(path)?)
            }
            None => {
                let path = Path::new(DEFAULT_CONFIG_FILE);
                if path.exists() {
                    log::debug!("Reading config from {DEFAULT_CONFIG_FILE}");
                    Self::from_toml(&read_to_string(path)?)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::helper::create_tmp_directory;

    #[test]
    fn test_empty_file_is_default() -> Fallible<()> {
        assert_eq!(Config::from_toml("")?, Config::default());
        Ok(())
    }

    #[test]
    fn test_partial_file() -> Fallible<()> {
        let config = Config::from_toml("port = 9001\nwindow_size = 3\n")?;
        assert_eq!(config.port, 9001);
        assert_eq!(config.window_size, 3);
        assert_eq!(config.host, "127.0.0.1");
        assert!(config.admin_localhost_only);
        Ok(())
    }

    #[test]
    fn test_unknown_key_is_an_error() {
        assert!(Config::from_toml("colour = \"blue\"").is_err());
    }

    #[test]
    fn test_missing_explicit_file() -> Fallible<()> {
        let dir = create_tmp_directory()?;
        let result = Config::load(Some(&dir.join("nope.toml")));
        assert!(result.is_err());
        Ok(())
    }

    #[test]
    fn test_load_explicit_file() -> Fallible<()> {
        let dir = create_tmp_directory()?;
        let path = dir.join("norsk-drill.toml");
        std::fs::write(&path, "database = \"words.db\"\nseed = 42\n")?;
        let config = Config::load(Some(&path))?;
        assert_eq!(config.database, PathBuf::from("words.db"));
        assert_eq!(config.seed, Some(42));
        Ok(())
    }
}
