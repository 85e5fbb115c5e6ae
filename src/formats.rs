//! Document formats
//!
//! A [`Formatter`] turns a [`FollowerSet`] into document text. Formats are
//! looked up by name through the [`FormatRegistry`]. Built-ins:
//!
//! - `elements`: the line-oriented document layout, with trailing commas
//!   inside map blocks. Re-readable by both matchers.
//! - `json`: strictly conformant JSON with the same envelope and keys.
//!   Re-readable by both matchers.
//! - `yaml`: the same structure as YAML, for export only.

pub mod elements;
pub mod json;
pub mod registry;
pub mod yaml;

pub use elements::ElementsFormat;
pub use json::JsonFormat;
pub use registry::FormatRegistry;
pub use yaml::YamlFormat;

use crate::error::FormatError;
use crate::model::FollowerSet;

/// Name of the format used when none is configured
pub const DEFAULT_FORMAT: &str = "elements";

/// Trait for document output formats
pub trait Formatter: Send + Sync {
    /// The name of this format (e.g., "elements", "json")
    fn name(&self) -> &str;

    /// Optional description of this format
    fn description(&self) -> &str {
        ""
    }

    /// Serialize a follower set into document text
    fn serialize(&self, set: &FollowerSet) -> Result<String, FormatError>;
}
