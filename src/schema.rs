//! Request data structures
//!
//! These types describe the analyzed catalog and queries handed to the
//! generator. They form the contract between the external SQL analyzer
//! (produces) and code generation (consumes).

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::error;

use crate::config::Options;
use crate::error::SqlgenError;

/// Schemas that never produce enum types or table shapes
pub const SYSTEM_SCHEMAS: [&str; 2] = ["pg_catalog", "information_schema"];

/// A complete generation request
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GenerateRequest {
    pub settings: Settings,
    pub catalog: Catalog,
    pub queries: Vec<Query>,
    pub sqlc_version: String,
    /// Raw plugin options object, parsed by [`crate::config::Options`]
    pub plugin_options: Option<serde_json::Value>,
}

impl GenerateRequest {
    /// Decode a request from raw JSON bytes
    pub fn from_json(bytes: &[u8]) -> Result<Self, SqlgenError> {
        serde_json::from_slice(bytes).map_err(|e| {
            error!(error = ?e, "Malformed generate request");
            SqlgenError::Request(e.to_string())
        })
    }

    /// Options carried inside the request
    pub fn options(&self) -> Result<Options, SqlgenError> {
        Options::from_value(self.plugin_options.as_ref())
    }
}

/// Global analyzer settings
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub engine: Engine,
}

/// SQL engine the queries were analyzed for
///
/// A request without an engine is treated as PostgreSQL, the analyzer's own
/// default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Engine {
    #[default]
    Postgresql,
    Mysql,
    /// Any other engine; every type maps to the fallback type
    Other(String),
}

impl From<String> for Engine {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "postgresql" => Engine::Postgresql,
            "mysql" => Engine::Mysql,
            _ => Engine::Other(tag),
        }
    }
}

impl From<Engine> for String {
    fn from(engine: Engine) -> Self {
        engine.to_string()
    }
}

impl fmt::Display for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Engine::Postgresql => f.write_str("postgresql"),
            Engine::Mysql => f.write_str("mysql"),
            Engine::Other(tag) => f.write_str(tag),
        }
    }
}

/// The analyzed database catalog
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Catalog {
    pub name: String,
    pub comment: String,
    pub default_schema: String,
    pub schemas: Vec<Schema>,
}

/// A database schema (namespace)
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Schema {
    pub name: String,
    pub comment: String,
    pub tables: Vec<Table>,
    pub enums: Vec<Enum>,
}

impl Schema {
    /// System schemas are skipped during catalog traversal
    pub fn is_system(&self) -> bool {
        SYSTEM_SCHEMAS.contains(&self.name.as_str())
    }
}

/// Database table
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Table {
    pub rel: Identifier,
    pub comment: String,
    pub columns: Vec<Column>,
}

/// A custom enum type defined in the database
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Enum {
    pub name: String,
    pub vals: Vec<String>,
    pub comment: String,
}

/// A (possibly schema-qualified) object name
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct Identifier {
    pub catalog: String,
    pub schema: String,
    pub name: String,
}

impl Identifier {
    pub fn new(schema: &str, name: &str) -> Self {
        Self {
            catalog: String::new(),
            schema: schema.to_string(),
            name: name.to_string(),
        }
    }

    /// `schema.name`, or just `name` when the schema is empty
    pub fn data_type(&self) -> String {
        if self.schema.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.schema, self.name)
        }
    }

    /// Fill in the default schema for unqualified identifiers
    pub fn with_default_schema(&self, default_schema: &str) -> Self {
        let mut id = self.clone();
        if id.schema.is_empty() {
            id.schema = default_schema.to_string();
        }
        id
    }
}

/// A table column, query parameter column or result column
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Column {
    /// Empty when the analyzer could not name the column
    pub name: String,
    pub not_null: bool,
    pub is_array: bool,
    pub comment: String,
    /// Owning table, absent for computed columns
    pub table: Option<Identifier>,
    #[serde(rename = "type")]
    pub type_name: Option<Identifier>,
    /// Set for `sqlc.embed(table)` result columns
    pub embed_table: Option<Identifier>,
}

impl Column {
    /// SQL type name the type mapper dispatches on
    pub fn data_type(&self) -> String {
        self.type_name
            .as_ref()
            .map(Identifier::data_type)
            .unwrap_or_default()
    }

    pub fn is_nullable(&self) -> bool {
        !self.not_null
    }
}

/// A positional query parameter
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Parameter {
    /// 1-based ordinal as written in the SQL (`$1`, `$2`, ...)
    pub number: u32,
    pub column: Column,
}

/// An analyzed query
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Query {
    pub name: String,
    pub cmd: String,
    pub text: String,
    pub filename: String,
    pub comments: Vec<String>,
    pub params: Vec<Parameter>,
    pub columns: Vec<Column>,
}

/// Execution semantics of a query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Command {
    #[serde(rename = ":one")]
    One,
    #[serde(rename = ":many")]
    Many,
    #[serde(rename = ":exec")]
    Exec,
    #[serde(rename = ":execrows")]
    ExecRows,
    #[serde(rename = ":execresult")]
    ExecResult,
    #[serde(rename = ":execlastid")]
    ExecLastId,
    #[serde(rename = ":copyfrom")]
    CopyFrom,
}

impl Command {
    /// Parse a command tag; `None` for tags this generator does not know
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            ":one" => Some(Command::One),
            ":many" => Some(Command::Many),
            ":exec" => Some(Command::Exec),
            ":execrows" => Some(Command::ExecRows),
            ":execresult" => Some(Command::ExecResult),
            ":execlastid" => Some(Command::ExecLastId),
            ":copyfrom" => Some(Command::CopyFrom),
            _ => None,
        }
    }

    /// Commands whose result columns are decoded into rows
    pub fn returns_rows(&self) -> bool {
        matches!(self, Command::One | Command::Many)
    }
}
