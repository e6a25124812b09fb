//! Code generation
//!
//! This module turns an analyzed catalog and query set into Java source: enum
//! types and table shapes first, then bound queries, then rendering.

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::io;
use std::path::Path;
use std::sync::{Arc, Mutex};

use serde::Serialize;
use tracing::{debug, error, info};

use crate::config::Options;
use crate::error::SqlgenError;
use crate::schema::{Catalog, Column, Engine, GenerateRequest};

pub mod binding;
pub mod catalog;
pub mod imports;
pub mod java;
pub mod model;
pub mod naming;
pub mod placeholder;
pub mod query;
pub mod shapes;
pub mod types;

pub use java::JavaGenerator;

use model::{EnumType, Query, Shape};
use shapes::ShapeRegistry;
use types::TypeDescriptor;

/// Generated file name to file contents, ordered by name
pub type GeneratedFiles = BTreeMap<String, String>;

/// Types always generated alongside the catalog and query types
const RESERVED_TYPE_NAMES: [&str; 2] = ["Queries", "QueriesImpl"];

/// Name of the captured log output file
pub const LOG_FILE: &str = "log";

/// Read-only inputs shared by every stage of one generation run
#[derive(Debug, Clone, Copy)]
pub struct GenContext<'a> {
    pub engine: &'a Engine,
    pub catalog: &'a Catalog,
    pub options: &'a Options,
}

impl<'a> GenContext<'a> {
    pub fn new(engine: &'a Engine, catalog: &'a Catalog, options: &'a Options) -> Self {
        Self {
            engine,
            catalog,
            options,
        }
    }

    pub fn map_type(&self, column: &Column) -> TypeDescriptor {
        types::map_type(self.engine, self.catalog, column)
    }

    pub fn default_schema(&self) -> &str {
        &self.catalog.default_schema
    }
}

/// Configuration for rendering
#[derive(Debug, Clone, Default)]
pub struct CodeGenConfig {
    /// Java package, empty for the default package
    pub package: String,
    /// Analyzer version written into file headers
    pub sqlc_version: String,
    pub emit_sql_as_comment: bool,
    pub use_optional_returns: bool,
}

impl CodeGenConfig {
    pub fn new(package: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            ..Default::default()
        }
    }

    pub fn with_sqlc_version(mut self, version: impl Into<String>) -> Self {
        self.sqlc_version = version.into();
        self
    }

    pub fn with_sql_comments(mut self, enabled: bool) -> Self {
        self.emit_sql_as_comment = enabled;
        self
    }

    pub fn with_optional_returns(mut self, enabled: bool) -> Self {
        self.use_optional_returns = enabled;
        self
    }

    pub fn from_options(options: &Options, sqlc_version: &str) -> Self {
        Self::new(options.package.clone())
            .with_sqlc_version(sqlc_version)
            .with_sql_comments(options.emit_sql_as_comment)
            .with_optional_returns(options.use_optional_for_nullable_return_values)
    }
}

/// Trait for language-specific code generators
pub trait CodeGenerator {
    /// Render every source file of a generation
    fn render(
        &self,
        generation: &Generation,
        config: &CodeGenConfig,
    ) -> Result<GeneratedFiles, SqlgenError>;
}

/// The complete data model of one generation run
#[derive(Debug, Clone, Default)]
pub struct Generation {
    pub enums: Vec<EnumType>,
    /// Table shapes, sorted by name
    pub classes: Vec<Arc<Shape>>,
    /// Bound queries, sorted by method name
    pub queries: Vec<Query>,
}

impl Generation {
    /// Build enum types, table shapes and bound queries
    pub fn build(request: &GenerateRequest, options: &Options) -> Result<Self, SqlgenError> {
        let ctx = GenContext::new(&request.settings.engine, &request.catalog, options);
        let mut registry = ShapeRegistry::new();

        let enums = catalog::build_enums(&ctx);
        let classes = catalog::build_table_shapes(&ctx, &mut registry);
        info!(enums = ?enums.len(), classes = ?classes.len(), "Catalog processed");

        let queries = query::build_queries(&ctx, &mut registry, &request.queries)?;
        info!(
            queries = ?queries.len(),
            shapes = ?registry.len(),
            "Queries bound"
        );

        let generation = Self {
            enums,
            classes,
            queries,
        };
        generation.check_type_names()?;
        Ok(generation)
    }

    /// Fail when two generated types would be written to the same file
    fn check_type_names(&self) -> Result<(), SqlgenError> {
        let names = self
            .enums
            .iter()
            .map(|e| e.name.as_str())
            .chain(self.emitted_shapes().into_iter().map(|s| s.name.as_str()))
            .chain(RESERVED_TYPE_NAMES.iter().copied());

        let mut seen = HashSet::new();
        for name in names {
            if !seen.insert(name) {
                error!(type_name = ?name, "Generated type name used twice");
                return Err(SqlgenError::CodeGen {
                    unit: format!("{}.java", name),
                    message: format!("type name '{}' is generated more than once", name),
                });
            }
        }
        Ok(())
    }

    /// Every shape written out as its own class, in emission order
    ///
    /// Table shapes come first, then query shapes in query order.
    pub fn emitted_shapes(&self) -> Vec<&Arc<Shape>> {
        let mut shapes: Vec<&Arc<Shape>> = self.classes.iter().collect();
        for query in &self.queries {
            shapes.extend(query.arg.emitted_shape());
            shapes.extend(query.ret.emitted_shape());
        }
        shapes
    }
}

/// Run a complete generation and return every output file
///
/// With `output_log_file` set, the run is logged as JSON lines into an extra
/// [`LOG_FILE`] output instead of the caller's subscriber.
pub fn generate(request: &GenerateRequest, options: &Options) -> Result<GeneratedFiles, SqlgenError> {
    options.validate()?;

    if !options.output_log_file {
        return generate_files(request, options);
    }

    let level = options.captured_log_level()?;
    let buffer = LogBuffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .json()
        .with_ansi(false)
        .without_time()
        .with_max_level(level)
        .with_writer(move || writer.clone())
        .finish();

    let mut files =
        tracing::subscriber::with_default(subscriber, || generate_files(request, options))?;
    files.insert(LOG_FILE.to_string(), buffer.contents());
    Ok(files)
}

fn generate_files(
    request: &GenerateRequest,
    options: &Options,
) -> Result<GeneratedFiles, SqlgenError> {
    info!(
        engine = %request.settings.engine,
        queries = ?request.queries.len(),
        "Starting code generation"
    );

    let generation = Generation::build(request, options)?;

    let mut files = GeneratedFiles::new();
    files.insert("enums.txt".to_string(), dump("enums.txt", &generation.enums)?);
    files.insert("classes.txt".to_string(), dump("classes.txt", &generation.classes)?);
    files.insert("queries.txt".to_string(), dump("queries.txt", &generation.queries)?);

    let config = CodeGenConfig::from_options(options, &request.sqlc_version);
    debug!(config = ?config, "Code generation config");

    let generator = JavaGenerator::new()?;
    files.extend(generator.render(&generation, &config)?);

    info!(files = ?files.len(), "Code generation complete");
    Ok(files)
}

/// Tab-indented JSON of part of the data model
fn dump<T: Serialize>(unit: &str, value: &T) -> Result<String, SqlgenError> {
    let mut out = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"\t");
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
    value
        .serialize(&mut serializer)
        .map_err(|e| SqlgenError::CodeGen {
            unit: unit.to_string(),
            message: format!("Serialization error: {}", e),
        })?;

    String::from_utf8(out).map_err(|e| SqlgenError::CodeGen {
        unit: unit.to_string(),
        message: format!("Serialization error: {}", e),
    })
}

/// Write generated files below `dir`
pub fn write_files(files: &GeneratedFiles, dir: &Path) -> Result<(), SqlgenError> {
    fs::create_dir_all(dir)?;
    debug!(path = ?dir, "Created output directory");

    for (name, contents) in files {
        let path = dir.join(name);
        fs::write(&path, contents)?;
        debug!(path = ?path, "Wrote file");
    }

    info!(files = ?files.len(), path = ?dir, "Generated files written");
    Ok(())
}

/// In-memory log sink shared with the capturing subscriber
#[derive(Debug, Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    fn contents(&self) -> String {
        let bytes = self.0.lock().unwrap_or_else(|e| e.into_inner());
        String::from_utf8_lossy(&bytes).into_owned()
    }
}

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
