//! YAML export

use super::Formatter;
use crate::error::FormatError;
use crate::model::FollowerSet;

pub struct YamlFormat;

impl Formatter for YamlFormat {
    fn name(&self) -> &str {
        "yaml"
    }

    fn description(&self) -> &str {
        "YAML export (not re-readable)"
    }

    fn serialize(&self, set: &FollowerSet) -> Result<String, FormatError> {
        serde_yaml::to_string(set).map_err(|err| FormatError::SerializationError(err.to_string()))
    }
}
