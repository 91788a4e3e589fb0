use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::buffer::ELEMENT_WIDTH;

/// Default number of elements, matching a 40-byte block of `f32`.
pub const DEFAULT_ELEMENT_COUNT: usize = 10;

/// The misordered step lands on index `ELEMENT_WIDTH`, so the buffer must hold it.
pub const MIN_ELEMENT_COUNT: usize = ELEMENT_WIDTH + 1;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {message}")]
    Read { path: String, message: String },

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("element_count {len} is too small; the walkthrough needs at least {min}")]
    TooSmall { len: usize, min: usize },
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::Parse(err.message().to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WalkthroughConfig {
    pub element_count: usize,
    /// Abort when a step that should agree with the others does not.
    pub strict: bool,
}

impl Default for WalkthroughConfig {
    fn default() -> Self {
        Self {
            element_count: DEFAULT_ELEMENT_COUNT,
            strict: true,
        }
    }
}

impl WalkthroughConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|err| ConfigError::Read {
            path: path.display().to_string(),
            message: err.to_string(),
        })?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.element_count < MIN_ELEMENT_COUNT {
            return Err(ConfigError::TooSmall {
                len: self.element_count,
                min: MIN_ELEMENT_COUNT,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config = WalkthroughConfig::from_toml_str("").unwrap();
        assert_eq!(config, WalkthroughConfig::default());
        assert_eq!(config.element_count, 10);
        assert!(config.strict);
    }

    #[test]
    fn test_overrides() {
        let config = WalkthroughConfig::from_toml_str("element_count = 32\nstrict = false\n").unwrap();
        assert_eq!(config.element_count, 32);
        assert!(!config.strict);
    }

    #[test]
    fn test_too_small_rejected() {
        let err = WalkthroughConfig::from_toml_str("element_count = 4").unwrap_err();
        assert_eq!(err, ConfigError::TooSmall { len: 4, min: 5 });
    }

    #[test]
    fn test_smallest_allowed() {
        assert!(WalkthroughConfig::from_toml_str("element_count = 5").is_ok());
    }

    #[test]
    fn test_unknown_field_is_parse_error() {
        let err = WalkthroughConfig::from_toml_str("elements = 10").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "element_count = 16").unwrap();
        let config = WalkthroughConfig::from_file(file.path()).unwrap();
        assert_eq!(config.element_count, 16);
    }

    #[test]
    fn test_missing_file() {
        let err = WalkthroughConfig::from_file(Path::new("/nonexistent/walkthrough.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
