//! Strict JSON output
//!
//! Same envelope and key names as `elements`, written by serde_json with
//! pretty indentation and a trailing newline.

use super::Formatter;
use crate::error::FormatError;
use crate::model::FollowerSet;

pub struct JsonFormat;

impl Formatter for JsonFormat {
    fn name(&self) -> &str {
        "json"
    }

    fn description(&self) -> &str {
        "Strict JSON document"
    }

    fn serialize(&self, set: &FollowerSet) -> Result<String, FormatError> {
        let mut out = serde_json::to_string_pretty(set)
            .map_err(|err| FormatError::SerializationError(err.to_string()))?;
        out.push('\n');
        Ok(out)
    }
}
