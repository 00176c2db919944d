//! Global configuration for ntlog (stored in ~/.config/ntlog/config.toml)

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{NtlogError, Result};
use crate::header::HeaderConfig;

const CONFIG_DIR: &str = "ntlog";
const CONFIG_FILE: &str = "config.toml";
pub const CONFIG_DIR_ENV_VAR: &str = "NTLOG_CONFIG_DIR";

/// Header templates as written in the config file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HeadersSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hour: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry: Option<String>,
}

impl From<HeadersSection> for HeaderConfig {
    fn from(section: HeadersSection) -> Self {
        HeaderConfig {
            year: section.year,
            month: section.month,
            day: section.day,
            hour: section.hour,
            entry: section.entry,
        }
    }
}

/// User-wide defaults
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GlobalConfig {
    /// Default for `--keep-for`, e.g. `"2w"`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keep_for: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_entries: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_entries: Option<usize>,
    /// Default for `--editor`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub editor: Option<String>,
    #[serde(default)]
    pub headers: HeadersSection,
}

impl GlobalConfig {
    fn config_path() -> Result<PathBuf> {
        // Allow environment variable override for testing
        let config_dir = if let Ok(env_dir) = std::env::var(CONFIG_DIR_ENV_VAR) {
            PathBuf::from(env_dir)
        } else {
            dirs::config_dir()
                .ok_or_else(|| {
                    NtlogError::Other("unable to determine config directory".to_string())
                })?
                .join(CONFIG_DIR)
        };

        Ok(config_dir.join(CONFIG_FILE))
    }

    /// Load the config file, or defaults when there is none.
    pub fn load() -> Result<Self> {
        let path = match Self::config_path() {
            Ok(path) => path,
            Err(e) => {
                tracing::debug!("no config directory: {}", e);
                return Ok(Self::default());
            }
        };

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path).map_err(|e| NtlogError::file_access(&path, e))?;
        Self::parse(&content).map_err(|e| {
            NtlogError::Other(format!(
                "failed to parse config from {}: {}",
                path.display(),
                e
            ))
        })
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Returns the source description for display purposes
    pub fn source_display() -> String {
        if std::env::var(CONFIG_DIR_ENV_VAR).is_ok() {
            format!("${CONFIG_DIR_ENV_VAR}/{CONFIG_FILE}")
        } else {
            format!("~/.config/{CONFIG_DIR}/{CONFIG_FILE}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = GlobalConfig::default();
        assert!(config.keep_for.is_none());
        assert_eq!(HeaderConfig::from(config.headers), HeaderConfig::default());
    }

    #[test]
    fn test_parse_full_config() {
        let config = GlobalConfig::parse(
            r#"
keep_for = "2w"
min_entries = 3
max_entries = 50
editor = "vim"

[headers]
year = "%Y"
day = "%A %d %B"
"#,
        )
        .unwrap();
        assert_eq!(config.keep_for.as_deref(), Some("2w"));
        assert_eq!(config.min_entries, Some(3));
        assert_eq!(config.max_entries, Some(50));
        let headers = HeaderConfig::from(config.headers);
        assert_eq!(headers.year.as_deref(), Some("%Y"));
        assert!(headers.month.is_none());
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        assert!(GlobalConfig::parse("keepfor = \"2w\"").is_err());
    }

    #[test]
    fn test_serialized_config_parses_back() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join(CONFIG_FILE);

        let config = GlobalConfig {
            keep_for: Some("30d".to_string()),
            ..Default::default()
        };
        fs::write(&config_path, toml::to_string_pretty(&config).unwrap()).unwrap();

        let loaded = GlobalConfig::parse(&fs::read_to_string(&config_path).unwrap()).unwrap();
        assert_eq!(loaded, config);
    }
}
