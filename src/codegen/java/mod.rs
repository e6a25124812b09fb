//! Java code generator
//!
//! Renders enums, shape classes, the `Queries` interface and its JDBC
//! implementation. Bind and decode instructions from the query binder are
//! turned into JDBC calls here; the templates only lay out the files.

use std::sync::Arc;

use minijinja::{AutoEscape, Environment};
use serde::Serialize;
use tracing::{debug, info, trace};

use crate::codegen::binding::{BindInstruction, BindOp, DecodeInstruction, DecodeOp, ValueRef};
use crate::codegen::imports::{required_imports, Unit};
use crate::codegen::model::{EnumType, Field, Query, QueryValue, Shape};
use crate::codegen::naming::{escape_reserved, upper_first};
use crate::codegen::types::TypeDescriptor;
use crate::codegen::{CodeGenConfig, CodeGenerator, GeneratedFiles, Generation};
use crate::error::SqlgenError;
use crate::inflection::singular;
use crate::schema::Command;

const GENERATOR_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Java types read and written through a typed JDBC accessor
const BOXED_TYPES: &[&str] = &["Integer", "Long", "Short", "Double", "Float", "Boolean"];

/// Java code generator
pub struct JavaGenerator {
    env: Environment<'static>,
}

impl JavaGenerator {
    pub fn new() -> Result<Self, SqlgenError> {
        let mut env = Environment::new();
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);
        env.set_auto_escape_callback(|_| AutoEscape::None);

        let templates = [
            ("header", include_str!("templates/header.java.jinja")),
            ("enum", include_str!("templates/enum.java.jinja")),
            ("class", include_str!("templates/class.java.jinja")),
            ("interface", include_str!("templates/interface.java.jinja")),
            ("implementation", include_str!("templates/implementation.java.jinja")),
        ];
        for (name, source) in templates {
            env.add_template(name, source)
                .map_err(|e| SqlgenError::CodeGen {
                    unit: name.to_string(),
                    message: format!("Template error: {}", e),
                })?;
        }

        Ok(Self { env })
    }

    fn render_unit<S: Serialize>(
        &self,
        template_name: &str,
        unit: &str,
        view: &S,
    ) -> Result<String, SqlgenError> {
        let template = self
            .env
            .get_template(template_name)
            .map_err(|e| SqlgenError::CodeGen {
                unit: unit.to_string(),
                message: format!("Template error: {}", e),
            })?;

        let source = template.render(view).map_err(|e| SqlgenError::CodeGen {
            unit: unit.to_string(),
            message: format!("Render error: {}", e),
        })?;

        trace!(unit = ?unit, bytes = ?source.len(), "Rendered unit");
        Ok(java_format(&source))
    }
}

impl CodeGenerator for JavaGenerator {
    fn render(
        &self,
        generation: &Generation,
        config: &CodeGenConfig,
    ) -> Result<GeneratedFiles, SqlgenError> {
        info!(
            package = ?config.package,
            enums = ?generation.enums.len(),
            queries = ?generation.queries.len(),
            "Generating Java code"
        );

        let mut files = GeneratedFiles::new();

        for e in &generation.enums {
            let file = format!("{}.java", e.name);
            let view = enum_view(e, config, &file);
            files.insert(file.clone(), self.render_unit("enum", &file, &view)?);
            debug!(file = ?file, "Generated enum");
        }

        let arguments: Vec<&Arc<Shape>> = generation
            .queries
            .iter()
            .filter_map(|q| q.arg.shape())
            .collect();

        for shape in generation.emitted_shapes() {
            let file = format!("{}.java", shape.name);
            let with_builder = arguments.iter().any(|a| Arc::ptr_eq(a, shape));
            let view = class_view(shape, with_builder, config, &file);
            files.insert(file.clone(), self.render_unit("class", &file, &view)?);
            debug!(file = ?file, "Generated class");
        }

        let queries = &generation.queries;

        let file = "Queries.java".to_string();
        let view = QueriesView {
            header: header(config, &file, Unit::Interface(queries)),
            queries: queries.iter().map(|q| method_view(q, config)).collect(),
        };
        files.insert(file.clone(), self.render_unit("interface", &file, &view)?);

        let file = "QueriesImpl.java".to_string();
        let view = QueriesView {
            header: header(config, &file, Unit::Implementation(queries)),
            queries: queries.iter().map(|q| method_view(q, config)).collect(),
        };
        files.insert(file.clone(), self.render_unit("implementation", &file, &view)?);

        info!(files = ?files.len(), "Java code generation complete");
        Ok(files)
    }
}

#[derive(Serialize)]
struct HeaderView {
    package: String,
    sqlc_version: String,
    generator_version: &'static str,
    source_name: String,
    imports: Vec<String>,
}

fn header(config: &CodeGenConfig, file: &str, unit: Unit<'_>) -> HeaderView {
    HeaderView {
        package: config.package.clone(),
        sqlc_version: config.sqlc_version.clone(),
        generator_version: GENERATOR_VERSION,
        source_name: file.to_string(),
        imports: required_imports(&unit),
    }
}

#[derive(Serialize)]
struct ConstantView {
    name: String,
    literal: String,
}

#[derive(Serialize)]
struct EnumView {
    #[serde(flatten)]
    header: HeaderView,
    name: String,
    comment: Vec<String>,
    constants: Vec<ConstantView>,
}

fn enum_view(e: &EnumType, config: &CodeGenConfig, file: &str) -> EnumView {
    EnumView {
        header: header(config, file, Unit::Enum),
        name: e.name.clone(),
        comment: javadoc_lines(&e.comment),
        constants: e
            .constants
            .iter()
            .map(|c| ConstantView {
                name: c.name.clone(),
                literal: java_string_literal(&c.value),
            })
            .collect(),
    }
}

#[derive(Serialize)]
struct FieldView {
    name: String,
    java_type: String,
    getter_type: String,
    getter: String,
    nullable: bool,
    is_list: bool,
    element_type: String,
    adder: Option<String>,
    clearer: String,
    comment: Vec<String>,
}

#[derive(Serialize)]
struct ClassView {
    #[serde(flatten)]
    header: HeaderView,
    name: String,
    /// Nested builder class, only for shapes passed as query arguments
    builder: Option<String>,
    comment: Vec<String>,
    constructor_params: String,
    field_names: Vec<String>,
    fields: Vec<FieldView>,
}

/// Builder method adding one element to a list field
///
/// `None` when the singular form is the field name itself or names another
/// field, either of which would clash with an existing builder method.
fn adder_name(field: &Field, shape: &Shape) -> Option<String> {
    let adder = escape_reserved(&singular(&field.name, &[]));
    if shape.fields.iter().any(|f| f.name == adder) {
        None
    } else {
        Some(adder)
    }
}

fn class_view(shape: &Shape, with_builder: bool, config: &CodeGenConfig, file: &str) -> ClassView {
    let fields: Vec<FieldView> = shape
        .fields
        .iter()
        .map(|f| FieldView {
            name: f.name.clone(),
            java_type: f.ty.java_type(),
            getter_type: f.ty.getter_type(),
            getter: f.getter(),
            nullable: f.ty.is_nullable,
            is_list: f.ty.is_array,
            element_type: f.ty.name.clone(),
            adder: if f.ty.is_array {
                adder_name(f, shape)
            } else {
                None
            },
            clearer: format!("clear{}", upper_first(&f.name)),
            comment: javadoc_lines(&f.comment),
        })
        .collect();

    ClassView {
        header: header(config, file, Unit::Class(shape)),
        name: shape.name.clone(),
        builder: with_builder.then(|| format!("Builder{}", shape.name)),
        comment: javadoc_lines(&shape.comment),
        constructor_params: fields
            .iter()
            .map(|f| format!("final {} {}", f.java_type, f.name))
            .collect::<Vec<_>>()
            .join(", "),
        field_names: fields.iter().map(|f| f.name.clone()).collect(),
        fields,
    }
}

#[derive(Serialize)]
struct MethodView {
    method_name: String,
    constant_name: String,
    sql_literal: String,
    javadoc: Vec<String>,
    return_type: String,
    params: String,
    kind: &'static str,
    binds: Vec<String>,
    row_type: String,
    row: String,
    missing_row: String,
}

#[derive(Serialize)]
struct QueriesView {
    #[serde(flatten)]
    header: HeaderView,
    queries: Vec<MethodView>,
}

/// Template branch for a query's execution
fn method_kind(query: &Query) -> &'static str {
    match query.cmd {
        Command::One if !query.ret.is_empty() => "one",
        Command::Many if !query.ret.is_empty() => "many",
        Command::ExecRows | Command::ExecResult => "exec_rows",
        Command::ExecLastId => "exec_last_id",
        _ => "exec",
    }
}

fn return_type(query: &Query, config: &CodeGenConfig) -> String {
    let row = query.ret.java_type();
    match (method_kind(query), row) {
        ("one", Some(row)) if config.use_optional_returns => format!("java.util.Optional<{}>", row),
        ("one", Some(row)) => row,
        ("many", Some(row)) => format!("List<{}>", row),
        ("exec_rows", _) => "int".to_string(),
        ("exec_last_id", _) => "long".to_string(),
        _ => "void".to_string(),
    }
}

/// Method parameter list
fn method_params(arg: &QueryValue) -> String {
    match arg {
        QueryValue::Empty => String::new(),
        QueryValue::Scalar { name, ty } => format!("final {} {}", ty.java_type(), name),
        QueryValue::Shape {
            shape,
            inline: true,
            ..
        } => shape
            .fields
            .iter()
            .map(|f| format!("final {} {}", f.ty.java_type(), f.name))
            .collect::<Vec<_>>()
            .join(", "),
        QueryValue::Shape { name, shape, .. } => format!("final {} {}", shape.name, name),
    }
}

fn method_view(query: &Query, config: &CodeGenConfig) -> MethodView {
    let kind = method_kind(query);
    let row_type = query.ret.java_type().unwrap_or_default();

    let decodes: Vec<String> = query.decodes.iter().map(render_decode).collect();
    let row = match &query.ret {
        QueryValue::Shape { shape, .. } => format!("new {}({})", shape.name, decodes.join(", ")),
        _ => decodes.into_iter().next().unwrap_or_default(),
    };
    let (row, missing_row) = if kind == "one" && config.use_optional_returns {
        (
            format!("java.util.Optional.ofNullable({})", row),
            "java.util.Optional.empty()".to_string(),
        )
    } else {
        (row, "null".to_string())
    };

    let mut javadoc: Vec<String> = query
        .comments
        .iter()
        .flat_map(|c| javadoc_lines(c.trim()))
        .collect();
    if config.emit_sql_as_comment {
        javadoc.push("<pre>{@code".to_string());
        javadoc.extend(javadoc_lines(&query.sql));
        javadoc.push("}</pre>".to_string());
    }

    MethodView {
        method_name: query.method_name.clone(),
        constant_name: query.constant_name.clone(),
        sql_literal: java_string_literal(&query.sql),
        javadoc,
        return_type: return_type(query, config),
        params: method_params(&query.arg),
        kind,
        binds: query.binds.iter().map(render_bind).collect(),
        row_type,
        row,
        missing_row,
    }
}

/// Expression reading the bound value
fn value_expr(bind: &BindInstruction) -> String {
    match &bind.value {
        ValueRef::Argument { name } => name.clone(),
        ValueRef::Getter { target, field } => {
            let getter = format!("{}.get{}()", target, upper_first(field));
            if bind.ty.is_nullable {
                format!("{}.orElse(null)", getter)
            } else {
                getter
            }
        }
    }
}

/// `v == null ? null : expr` for nullable values
fn null_guarded(value: &str, ty: &TypeDescriptor, expr: String) -> String {
    if ty.is_nullable {
        format!("{} == null ? null : {}", value, expr)
    } else {
        expr
    }
}

/// SQL element type name passed to `createArrayOf`
fn array_element_type(ty: &TypeDescriptor) -> &str {
    ty.data_type
        .strip_prefix("pg_catalog.")
        .unwrap_or(&ty.data_type)
}

fn scalar_setter(name: &str) -> &'static str {
    match name {
        "Integer" => "setInt",
        "Long" => "setLong",
        "Short" => "setShort",
        "Double" => "setDouble",
        "Float" => "setFloat",
        "Boolean" => "setBoolean",
        "String" => "setString",
        _ => "setObject",
    }
}

fn scalar_getter(name: &str) -> &'static str {
    match name {
        "Integer" => "getInt",
        "Long" => "getLong",
        "Short" => "getShort",
        "Double" => "getDouble",
        "Float" => "getFloat",
        "Boolean" => "getBoolean",
        "String" => "getString",
        _ => "getObject",
    }
}

/// JDBC statement binding one parameter
fn render_bind(bind: &BindInstruction) -> String {
    let i = bind.index;
    let ty = &bind.ty;
    let v = value_expr(bind);

    match bind.op {
        BindOp::EnumArray => {
            let array = format!(
                "conn.createArrayOf({}, {}.stream().map({}::getLabel).toArray())",
                java_string_literal(array_element_type(ty)),
                v,
                ty.name
            );
            format!("ps.setArray({}, {});", i, null_guarded(&v, ty, array))
        }
        BindOp::EnumObject => {
            let label = null_guarded(&v, ty, format!("{}.getLabel()", v));
            format!("ps.setObject({}, {}, Types.OTHER);", i, label)
        }
        BindOp::EnumString => {
            let label = null_guarded(&v, ty, format!("{}.getLabel()", v));
            format!("ps.setString({}, {});", i, label)
        }
        BindOp::Array => {
            let array = format!(
                "conn.createArrayOf({}, {}.toArray())",
                java_string_literal(array_element_type(ty)),
                v
            );
            format!("ps.setArray({}, {});", i, null_guarded(&v, ty, array))
        }
        BindOp::LocalTemporal | BindOp::Uuid => format!("ps.setObject({}, {});", i, v),
        BindOp::Instant => {
            let timestamp = null_guarded(&v, ty, format!("Timestamp.from({})", v));
            format!("ps.setTimestamp({}, {});", i, timestamp)
        }
        BindOp::BigDecimal => format!("ps.setBigDecimal({}, {});", i, v),
        BindOp::Scalar => {
            let setter = if ty.is_nullable && BOXED_TYPES.contains(&ty.name.as_str()) {
                "setObject"
            } else {
                scalar_setter(&ty.name)
            };
            format!("ps.{}({}, {});", setter, i, v)
        }
    }
}

/// JDBC expression reading one result column
fn render_decode(decode: &DecodeInstruction) -> String {
    let i = decode.index;
    let ty = &decode.ty;

    match decode.op {
        DecodeOp::EnumArray => {
            let list = format!(
                "Arrays.stream((String[]) rs.getArray({}).getArray()).map({}::valueOfLabel).collect(Collectors.toList())",
                i, ty.name
            );
            null_guarded(&format!("rs.getArray({})", i), ty, list)
        }
        DecodeOp::Enum => format!("{}.valueOfLabel(rs.getString({}))", ty.name, i),
        DecodeOp::Array => {
            let list = format!("Arrays.asList(({}[]) rs.getArray({}).getArray())", ty.name, i);
            null_guarded(&format!("rs.getArray({})", i), ty, list)
        }
        DecodeOp::LocalTemporal => format!("rs.getObject({}, {}.class)", i, ty.name),
        DecodeOp::Instant => {
            let instant = format!("rs.getTimestamp({}).toInstant()", i);
            null_guarded(&format!("rs.getTimestamp({})", i), ty, instant)
        }
        DecodeOp::Uuid => format!("rs.getObject({}, UUID.class)", i),
        DecodeOp::BigDecimal => format!("rs.getBigDecimal({})", i),
        DecodeOp::Scalar => {
            if ty.is_nullable && BOXED_TYPES.contains(&ty.name.as_str()) {
                format!("rs.getObject({}, {}.class)", i, ty.name)
            } else {
                format!("rs.{}({})", scalar_getter(&ty.name), i)
            }
        }
    }
}

/// Quote `s` as a Java string literal
pub fn java_string_literal(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Split text into Javadoc lines that cannot close the comment early
fn javadoc_lines(text: &str) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }
    text.lines().map(|l| l.replace("*/", "*&#47;")).collect()
}

/// Normalize rendered Java source
///
/// Trailing whitespace is stripped, runs of blank lines collapse into one and
/// the file ends with exactly one newline.
pub fn java_format(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    let mut previous_blank = true;

    for line in source.lines() {
        let line = line.trim_end();
        let blank = line.is_empty();
        if blank && previous_blank {
            continue;
        }
        out.push_str(line);
        out.push('\n');
        previous_blank = blank;
    }

    let trimmed = out.trim_end().len();
    out.truncate(trimmed);
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Options;
    use crate::schema::{Engine, GenerateRequest};
    use serde_json::json;

    fn render(request: serde_json::Value, options: &Options) -> GeneratedFiles {
        let request: GenerateRequest = serde_json::from_value(request).unwrap();
        let generation = Generation::build(&request, options).unwrap();
        let config = CodeGenConfig::from_options(options, &request.sqlc_version);
        JavaGenerator::new().unwrap().render(&generation, &config).unwrap()
    }

    fn catalog() -> serde_json::Value {
        json!({
            "default_schema": "public",
            "schemas": [{
                "name": "public",
                "enums": [{ "name": "status", "vals": ["in-progress", "done"] }],
                "tables": [{
                    "rel": { "name": "venues" },
                    "comment": "Music venues",
                    "columns": [
                        { "name": "id", "not_null": true, "type": { "name": "int4" } },
                        { "name": "slug", "not_null": true, "type": { "name": "text" } },
                        { "name": "status", "not_null": true, "type": { "name": "status" } },
                        { "name": "statuses", "is_array": true, "type": { "name": "status" } },
                        { "name": "tags", "is_array": true, "type": { "name": "text" } },
                        { "name": "created_at", "not_null": true, "type": { "name": "timestamptz" } }
                    ]
                }]
            }]
        })
    }

    #[test]
    fn test_java_format() {
        assert_eq!(java_format("\n\na  \n\n\n\nb\n\n"), "a\n\nb\n");
        assert_eq!(java_format(""), "\n");
    }

    #[test]
    fn test_java_string_literal() {
        assert_eq!(
            java_string_literal("SELECT \"a\"\nFROM t WHERE x = '\\'"),
            "\"SELECT \\\"a\\\"\\nFROM t WHERE x = '\\\\'\""
        );
    }

    #[test]
    fn test_javadoc_lines_escape_comment_end() {
        assert_eq!(javadoc_lines("a */ b\nc"), vec!["a *&#47; b", "c"]);
        assert!(javadoc_lines("").is_empty());
    }

    #[test]
    fn test_render_enum() {
        let options = Options {
            package: "com.example.db".to_string(),
            ..Default::default()
        };
        let files = render(json!({ "sqlc_version": "v1.26.0", "catalog": catalog() }), &options);
        let status = &files["Status.java"];

        assert!(status.starts_with("// Code generated by sqlc. DO NOT EDIT.\n"));
        assert!(status.contains("//   sqlc v1.26.0\n"));
        assert!(status.contains("package com.example.db;\n\nimport java.util.HashMap;\nimport java.util.Map;\n"));
        assert!(status.contains("public enum Status {\n    IN_PROGRESS(\"in-progress\"),\n    DONE(\"done\");\n"));
        assert!(status.contains("public static Status valueOfLabel(final String label) {"));
        assert!(status.ends_with("}\n"));
        assert!(!status.contains("\n\n\n"));
    }

    #[test]
    fn test_render_empty_enum() {
        let catalog = json!({
            "default_schema": "public",
            "schemas": [{ "name": "public", "enums": [{ "name": "empty", "vals": [] }] }]
        });
        let files = render(json!({ "catalog": catalog }), &Options::default());

        assert!(files["Empty.java"].contains("public enum Empty {\n    ;\n"));
        assert!(!files["Empty.java"].contains("package"));
    }

    #[test]
    fn test_render_class() {
        let files = render(json!({ "catalog": catalog() }), &Options::default());
        let venue = &files["Venue.java"];

        assert!(venue.contains("/**\n * Music venues\n */\npublic class Venue {"));
        assert!(venue.contains("import java.time.Instant;"));
        assert!(venue.contains("    private final java.util.List<Status> statuses;\n"));
        assert!(venue.contains("    public Status getStatus() {\n        return this.status;\n    }"));
        assert!(venue.contains(
            "    public java.util.Optional<java.util.List<String>> getTags() {\n        return java.util.Optional.ofNullable(this.tags);\n    }"
        ));
        // table classes are never query arguments here
        assert!(!venue.contains("Builder"));
    }

    #[test]
    fn test_render_argument_builder() {
        let param = |number: u32, name: &str, data_type: &str| {
            json!({
                "number": number,
                "column": { "name": name, "is_array": true, "type": { "name": data_type } }
            })
        };
        let request = json!({
            "catalog": catalog(),
            "queries": [{
                "name": "FindVenues",
                "cmd": ":exec",
                "text": "SELECT 1 WHERE $1 IS NULL AND $2 IS NULL AND $3 IS NULL",
                "params": [param(1, "statuses", "status"), param(2, "tags", "text"), param(3, "data", "text")]
            }]
        });
        let files = render(request, &Options::default());
        let params = &files["FindVenuesParams.java"];

        assert!(params.contains("    public static BuilderFindVenuesParams builder() {"));
        assert!(params.contains("public BuilderFindVenuesParams status(final Status status) {"));
        assert!(params.contains("public BuilderFindVenuesParams tag(final String tag) {"));
        assert!(params.contains(
            "public BuilderFindVenuesParams tags(final java.util.Collection<? extends String> tags) {"
        ));
        assert!(params.contains("public BuilderFindVenuesParams clearTags() {"));
        // `data` is its own singular, so only the collection method exists
        assert!(!params.contains("(final String data)"));
        assert!(params.contains("return new FindVenuesParams(statuses, tags, data);"));
    }

    #[test]
    fn test_render_queries() {
        let request = json!({
            "catalog": catalog(),
            "queries": [
                {
                    "name": "GetVenue",
                    "cmd": ":one",
                    "text": "SELECT id, slug, status, statuses, tags, created_at FROM venues WHERE slug = $1",
                    "comments": [" Look up a venue"],
                    "params": [{ "number": 1, "column": { "name": "slug", "not_null": true, "type": { "name": "text" } } }],
                    "columns": [
                        { "name": "id", "not_null": true, "type": { "name": "int4" }, "table": { "name": "venues" } },
                        { "name": "slug", "not_null": true, "type": { "name": "text" }, "table": { "name": "venues" } },
                        { "name": "status", "not_null": true, "type": { "name": "status" }, "table": { "name": "venues" } },
                        { "name": "statuses", "is_array": true, "type": { "name": "status" }, "table": { "name": "venues" } },
                        { "name": "tags", "is_array": true, "type": { "name": "text" }, "table": { "name": "venues" } },
                        { "name": "created_at", "not_null": true, "type": { "name": "timestamptz" }, "table": { "name": "venues" } }
                    ]
                },
                {
                    "name": "SetStatus",
                    "cmd": ":execrows",
                    "text": "UPDATE venues SET status = $2 WHERE id = $1",
                    "params": [
                        { "number": 1, "column": { "name": "id", "not_null": true, "type": { "name": "int4" } } },
                        { "number": 2, "column": { "name": "status", "type": { "name": "status" } } }
                    ]
                },
                {
                    "name": "CreateVenue",
                    "cmd": ":execlastid",
                    "text": "INSERT INTO venues (slug) VALUES ($1)",
                    "params": [{ "number": 1, "column": { "name": "slug", "not_null": true, "type": { "name": "text" } } }]
                },
                {
                    "name": "ListSlugs",
                    "cmd": ":many",
                    "text": "SELECT slug FROM venues",
                    "columns": [{ "name": "slug", "not_null": true, "type": { "name": "text" } }]
                }
            ]
        });
        let options = Options {
            emit_sql_as_comment: true,
            use_optional_for_nullable_return_values: true,
            ..Default::default()
        };
        let files = render(request, &options);

        assert!(!files.contains_key("GetVenueRow.java"));
        assert!(files.contains_key("SetStatusParams.java"));

        let iface = &files["Queries.java"];
        assert!(iface.contains("    /**\n     * Look up a venue\n     * <pre>{@code\n"));
        assert!(iface.contains(
            "    java.util.Optional<Venue> getVenue(final String slug) throws SQLException;"
        ));
        assert!(iface.contains("    int setStatus(final SetStatusParams params) throws SQLException;"));
        assert!(iface.contains("    long createVenue(final String slug) throws SQLException;"));
        assert!(iface.contains("    List<String> listSlugs() throws SQLException;"));
        assert!(iface.contains("import java.util.List;"));

        let imp = &files["QueriesImpl.java"];
        assert!(imp.contains("private static final String GET_VENUE = \"SELECT id, slug, status, statuses, tags, created_at FROM venues WHERE slug = ?\";"));
        assert!(imp.contains("            ps.setString(1, slug);\n"));
        assert!(imp.contains("return java.util.Optional.empty();"));
        assert!(imp.contains(
            "return java.util.Optional.ofNullable(new Venue(rs.getInt(1), rs.getString(2), Status.valueOfLabel(rs.getString(3)), rs.getArray(4) == null ? null : Arrays.stream((String[]) rs.getArray(4).getArray()).map(Status::valueOfLabel).collect(Collectors.toList()), rs.getArray(5) == null ? null : Arrays.asList((String[]) rs.getArray(5).getArray()), rs.getTimestamp(6).toInstant()));"
        ));
        assert!(imp.contains(
            "            ps.setObject(1, params.getStatus().orElse(null) == null ? null : params.getStatus().orElse(null).getLabel(), Types.OTHER);\n            ps.setInt(2, params.getId());\n            return ps.executeUpdate();"
        ));
        assert!(imp.contains("conn.prepareStatement(CREATE_VENUE, Statement.RETURN_GENERATED_KEYS)"));
        assert!(imp.contains("return rs.getLong(1);"));
        assert!(imp.contains("                    results.add(rs.getString(1));\n"));
        assert!(imp.contains("import java.sql.Types;"));
    }

    #[test]
    fn test_render_bind_variants() {
        let ty = |name: &str, nullable: bool| TypeDescriptor {
            name: name.to_string(),
            is_nullable: nullable,
            data_type: "pg_catalog.int4".to_string(),
            engine: Engine::Postgresql,
            ..Default::default()
        };
        let arg = |name: &str| ValueRef::Argument {
            name: name.to_string(),
        };

        let b = crate::codegen::binding::bind(1, arg("id"), &ty("Integer", true));
        assert_eq!(render_bind(&b), "ps.setObject(1, id);");

        let b = crate::codegen::binding::bind(2, arg("at"), &ty("Instant", false));
        assert_eq!(render_bind(&b), "ps.setTimestamp(2, Timestamp.from(at));");

        let b = crate::codegen::binding::bind(3, arg("day"), &ty("LocalDate", false));
        assert_eq!(render_bind(&b), "ps.setObject(3, day);");

        let mut ids = ty("Integer", false);
        ids.is_array = true;
        let b = crate::codegen::binding::bind(4, arg("ids"), &ids);
        assert_eq!(
            render_bind(&b),
            "ps.setArray(4, conn.createArrayOf(\"int4\", ids.toArray()));"
        );

        let mut status = ty("Status", false);
        status.is_enum = true;
        status.engine = Engine::Mysql;
        let b = crate::codegen::binding::bind(5, arg("s"), &status);
        assert_eq!(render_bind(&b), "ps.setString(5, s.getLabel());");
    }

    #[test]
    fn test_render_decode_variants() {
        let ty = |name: &str, nullable: bool| TypeDescriptor {
            name: name.to_string(),
            is_nullable: nullable,
            engine: Engine::Postgresql,
            ..Default::default()
        };
        let d = |i, t: TypeDescriptor| render_decode(&crate::codegen::binding::decode(i, &t));

        assert_eq!(d(1, ty("Long", false)), "rs.getLong(1)");
        assert_eq!(d(2, ty("Long", true)), "rs.getObject(2, Long.class)");
        assert_eq!(d(3, ty("String", true)), "rs.getString(3)");
        assert_eq!(d(4, ty("UUID", false)), "rs.getObject(4, UUID.class)");
        assert_eq!(d(5, ty("java.math.BigDecimal", false)), "rs.getBigDecimal(5)");
        assert_eq!(d(6, ty("LocalDateTime", true)), "rs.getObject(6, LocalDateTime.class)");
        assert_eq!(
            d(7, ty("Instant", true)),
            "rs.getTimestamp(7) == null ? null : rs.getTimestamp(7).toInstant()"
        );
        assert_eq!(d(8, ty("Object", false)), "rs.getObject(8)");
    }
}
