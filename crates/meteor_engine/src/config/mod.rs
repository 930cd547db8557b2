//! Serde-backed configuration files
//!
//! Any `Serialize + Deserialize + Default` type becomes loadable from TOML or
//! RON by implementing [`Config`]. The format is chosen by file extension.

pub use serde::{Deserialize, Serialize};
use std::path::Path;

/// Load and save a settings struct as TOML or RON
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Read `path`, choosing the format from its extension
    fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;

        match ConfigFormat::from_path(path)? {
            ConfigFormat::Toml => {
                toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
            }
            ConfigFormat::Ron => {
                ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
            }
        }
    }

    /// Parse configuration from a string in the given format
    fn from_str_as(contents: &str, format: ConfigFormat) -> Result<Self, ConfigError> {
        match format {
            ConfigFormat::Toml => {
                toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
            }
            ConfigFormat::Ron => {
                ron::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
            }
        }
    }

    /// Render configuration in the given format
    fn to_string_as(&self, format: ConfigFormat) -> Result<String, ConfigError> {
        match format {
            ConfigFormat::Toml => {
                toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))
            }
            ConfigFormat::Ron => ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string())),
        }
    }

    /// Write to `path` in the format its extension names
    fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let contents = self.to_string_as(ConfigFormat::from_path(path)?)?;
        std::fs::write(path, contents)?;
        Ok(())
    }
}

/// Supported on-disk formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// `.toml`
    Toml,
    /// `.ron`
    Ron,
}

impl ConfigFormat {
    /// Pick the format from a file extension
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Ok(Self::Toml),
            Some("ron") => Ok(Self::Ron),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Why a configuration could not be loaded, saved or accepted
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// File could not be read or written
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Contents do not match the expected structure
    #[error("Parse error: {0}")]
    Parse(String),

    /// Value could not be rendered
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Extension is neither `.toml` nor `.ron`
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Values parsed but do not make sense together
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(default)]
    struct Sample {
        name: String,
        rate: f32,
    }

    impl Default for Sample {
        fn default() -> Self {
            Self {
                name: "sample".to_string(),
                rate: 0.5,
            }
        }
    }

    impl Config for Sample {}

    #[test]
    fn test_format_from_extension() {
        assert_eq!(ConfigFormat::from_path(Path::new("a/b.toml")).unwrap(), ConfigFormat::Toml);
        assert_eq!(ConfigFormat::from_path(Path::new("game.ron")).unwrap(), ConfigFormat::Ron);
        assert!(matches!(
            ConfigFormat::from_path(Path::new("game.json")),
            Err(ConfigError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let sample = Sample::from_str_as("rate = 2.0", ConfigFormat::Toml).unwrap();
        assert_eq!(sample.rate, 2.0);
        assert_eq!(sample.name, "sample");
    }

    #[test]
    fn test_ron_parse() {
        let sample = Sample::from_str_as("(name: \"ron\")", ConfigFormat::Ron).unwrap();
        assert_eq!(sample.name, "ron");
        assert_eq!(sample.rate, 0.5);
    }

    #[test]
    fn test_bad_input_is_parse_error() {
        assert!(matches!(
            Sample::from_str_as("rate = \"fast\"", ConfigFormat::Toml),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        assert!(matches!(
            Sample::load_from_file("definitely/not/here.toml"),
            Err(ConfigError::Io(_))
        ));
    }
}
