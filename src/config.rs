//! Configuration loading
//!
//! `defaults/followers.default.toml` is embedded into the crate so that
//! docs and runtime behavior stay in sync. Applications layer user files and
//! command-line overrides on top of those defaults via [`Loader`] before
//! deserializing into [`FollowersConfig`].

use crate::building::FieldPolicy;
use crate::formats::DEFAULT_FORMAT;
use crate::ingest::{IngestOptions, ResultOrder};
use crate::matching::MatcherKind;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::Path;

pub use config::ConfigError;

const DEFAULT_TOML: &str = include_str!("../defaults/followers.default.toml");

/// Top-level configuration
#[derive(Debug, Clone, Deserialize)]
pub struct FollowersConfig {
    pub parse: ParseConfig,
    pub ingest: IngestConfig,
    pub write: WriteConfig,
    pub layout: LayoutConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ParseConfig {
    pub matcher: MatcherKind,
    pub field_policy: FieldPolicy,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IngestConfig {
    pub workers: usize,
    pub queue_capacity: usize,
    pub order: ResultOrder,
}

impl From<&IngestConfig> for IngestOptions {
    fn from(config: &IngestConfig) -> Self {
        IngestOptions {
            workers: config.workers,
            queue_capacity: config.queue_capacity,
            order: config.order,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct WriteConfig {
    #[serde(default = "default_write_format")]
    pub format: String,
}

fn default_write_format() -> String {
    DEFAULT_FORMAT.to_string()
}

/// Spacing used by [`crate::graph::layout`]
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct LayoutConfig {
    pub origin_x: f32,
    pub origin_y: f32,
    pub box_width: f32,
    pub box_height: f32,
    pub level_offset: f32,
    pub horizontal_offset: f32,
    pub child_advance: f32,
    pub trigger_advance: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        LayoutConfig {
            origin_x: 100.0,
            origin_y: 50.0,
            box_width: 300.0,
            box_height: 120.0,
            level_offset: 200.0,
            horizontal_offset: 300.0,
            child_advance: 120.0,
            trigger_advance: 60.0,
        }
    }
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (useful for CLI settings).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<FollowersConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<FollowersConfig, ConfigError> {
    Loader::new().build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_default_config() {
        let config = load_defaults().expect("defaults to deserialize");
        assert_eq!(config.parse.matcher, MatcherKind::Grammar);
        assert_eq!(config.parse.field_policy, FieldPolicy::Lenient);
        assert_eq!(config.ingest.workers, 4);
        assert_eq!(config.ingest.order, ResultOrder::Document);
        assert_eq!(config.write.format, "elements");
        assert_eq!(config.layout, LayoutConfig::default());
    }

    #[test]
    fn write_format_falls_back_to_default() {
        let write: WriteConfig = Config::builder()
            .add_source(File::from_str("", FileFormat::Toml))
            .build()
            .expect("empty config to build")
            .try_deserialize()
            .expect("write config to deserialize");
        assert_eq!(write.format, DEFAULT_FORMAT);
    }

    #[test]
    fn supports_overrides() {
        let config = Loader::new()
            .set_override("parse.matcher", "pattern")
            .expect("override to apply")
            .set_override("ingest.workers", 9_i64)
            .expect("override to apply")
            .build()
            .expect("config to build");
        assert_eq!(config.parse.matcher, MatcherKind::Pattern);
        assert_eq!(IngestOptions::from(&config.ingest).workers, 9);
    }

    #[test]
    fn layers_user_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[parse]\nfield_policy = \"strict\"\n[layout]\nlevel_offset = 80.0").unwrap();

        let config = Loader::new().with_file(file.path()).build().unwrap();
        assert_eq!(config.parse.field_policy, FieldPolicy::Strict);
        assert_eq!(config.parse.matcher, MatcherKind::Grammar);
        assert_eq!(config.layout.level_offset, 80.0);
    }

    #[test]
    fn missing_optional_file_is_ignored() {
        let config = Loader::new()
            .with_optional_file("/nonexistent/followers.toml")
            .build()
            .unwrap();
        assert_eq!(config.ingest.queue_capacity, 64);
    }

    #[test]
    fn rejects_unknown_matcher() {
        let result = Loader::new()
            .set_override("parse.matcher", "fuzzy")
            .unwrap()
            .build();
        assert!(result.is_err());
    }
}
