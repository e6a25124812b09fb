//! Configuration loading
//!
//! Resolves the generator options once per generation call, either from the
//! `plugin_options` object embedded in the request or from a standalone JSON
//! file given on the command line.

use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;
use tracing::{debug, error, trace, Level};

use crate::prelude::SqlgenError;

/// Generator options
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Java package of every generated file
    pub package: String,
    /// Use table names verbatim instead of singularizing them
    pub emit_exact_table_names: bool,
    /// Table names that are never singularized
    pub inflection_exclude_table_names: Vec<String>,
    /// Parameter count up to which parameters bind as direct method arguments
    pub query_parameter_limit: i64,
    /// Add the SQL text to each interface method's Javadoc
    pub emit_sql_as_comment: bool,
    /// `:one` methods return `Optional<T>` instead of a nullable `T`
    pub use_optional_for_nullable_return_values: bool,
    /// Capture the generation log into a `log` output file
    #[serde(alias = "ouptut_log_file")]
    pub output_log_file: bool,
    /// Level of the captured log
    pub log_level: String,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            package: String::new(),
            emit_exact_table_names: false,
            inflection_exclude_table_names: Vec::new(),
            query_parameter_limit: 1,
            emit_sql_as_comment: false,
            use_optional_for_nullable_return_values: false,
            output_log_file: false,
            log_level: "info".to_string(),
        }
    }
}

impl Options {
    /// Parse and validate options from a JSON value
    ///
    /// `None` and `null` yield the defaults.
    pub fn from_value(value: Option<&serde_json::Value>) -> Result<Self, SqlgenError> {
        let options = match value {
            None | Some(serde_json::Value::Null) => {
                trace!("No plugin options given, using defaults");
                Self::default()
            }
            Some(value) => Self::deserialize(value).map_err(|e| {
                error!(error = ?e, "Malformed plugin options");
                SqlgenError::Config(format!("unmarshalling plugin options: {}", e))
            })?,
        };

        options.validate()?;
        debug!(options = ?options, "Options resolved");
        Ok(options)
    }

    /// Parse and validate options from raw JSON bytes
    pub fn from_json(bytes: &[u8]) -> Result<Self, SqlgenError> {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Self::from_value(None);
        }
        let value: serde_json::Value = serde_json::from_slice(bytes).map_err(|e| {
            error!(error = ?e, "Options are not valid JSON");
            SqlgenError::Config(format!("unmarshalling plugin options: {}", e))
        })?;
        Self::from_value(Some(&value))
    }

    /// Load options from a JSON file
    pub fn load(path: &Path) -> Result<Self, SqlgenError> {
        debug!(path = ?path, "Loading options file");
        let bytes = fs::read(path).map_err(|e| {
            error!(path = ?path, error = ?e, "Failed to read options file");
            SqlgenError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_json(&bytes)
    }

    /// Reject values no generation run can honour
    pub fn validate(&self) -> Result<(), SqlgenError> {
        if self.query_parameter_limit < 0 {
            error!(limit = ?self.query_parameter_limit, "Negative query parameter limit");
            return Err(SqlgenError::Config(
                "invalid options: query parameter limit must not be negative".to_string(),
            ));
        }
        self.captured_log_level()?;
        Ok(())
    }

    /// Inline parameter limit as a count
    pub fn parameter_limit(&self) -> usize {
        usize::try_from(self.query_parameter_limit).unwrap_or(0)
    }

    /// Level used when the log is captured into the output
    pub fn captured_log_level(&self) -> Result<Level, SqlgenError> {
        Level::from_str(&self.log_level).map_err(|_| {
            SqlgenError::Config(format!("invalid options: unknown log level '{}'", self.log_level))
        })
    }
}
