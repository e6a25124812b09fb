//! Import resolution
//!
//! Computes the sorted set of qualified names each generated Java file
//! imports. Enum and shape types live in the generated package and are never
//! imported; `java.util.List` and `java.util.Optional` inside field types are
//! written fully qualified.

use std::collections::BTreeSet;

use crate::codegen::binding::{BindOp, DecodeOp};
use crate::codegen::model::{Query, QueryValue, Shape};
use crate::codegen::types::TypeDescriptor;
use crate::schema::Command;

/// A generated source file
#[derive(Debug, Clone, Copy)]
pub enum Unit<'a> {
    Enum,
    Class(&'a Shape),
    /// The `Queries` interface
    Interface(&'a [Query]),
    /// The JDBC implementation of the interface
    Implementation(&'a [Query]),
}

/// Import for a Java type name, if it needs one
fn type_import(name: &str) -> Option<&'static str> {
    match name {
        "Instant" => Some("java.time.Instant"),
        "LocalDate" => Some("java.time.LocalDate"),
        "LocalDateTime" => Some("java.time.LocalDateTime"),
        "LocalTime" => Some("java.time.LocalTime"),
        "UUID" => Some("java.util.UUID"),
        _ => None,
    }
}

fn add_types<'a>(imports: &mut BTreeSet<&'static str>, types: impl IntoIterator<Item = &'a TypeDescriptor>) {
    imports.extend(types.into_iter().filter_map(|ty| type_import(&ty.name)));
}

/// Types spelled out in a method signature
///
/// A shape passed whole only contributes its own name.
fn signature_types(value: &QueryValue) -> Vec<&TypeDescriptor> {
    match value {
        QueryValue::Shape { inline: false, .. } => Vec::new(),
        _ => value.types(),
    }
}

/// `:many` methods that actually return a list
fn returns_list(query: &Query) -> bool {
    query.cmd == Command::Many && !query.ret.is_empty()
}

/// Sorted imports required by `unit`
pub fn required_imports(unit: &Unit<'_>) -> Vec<String> {
    let mut imports: BTreeSet<&'static str> = BTreeSet::new();

    match unit {
        Unit::Enum => {
            imports.insert("java.util.HashMap");
            imports.insert("java.util.Map");
        }
        Unit::Class(shape) => {
            add_types(&mut imports, shape.fields.iter().map(|f| &f.ty));
        }
        Unit::Interface(queries) => {
            imports.insert("java.sql.SQLException");
            for query in queries.iter() {
                if returns_list(query) {
                    imports.insert("java.util.List");
                }
                add_types(&mut imports, signature_types(&query.arg));
                add_types(&mut imports, signature_types(&query.ret));
            }
        }
        Unit::Implementation(queries) => {
            imports.insert("java.sql.Connection");
            imports.insert("java.sql.PreparedStatement");
            imports.insert("java.sql.SQLException");

            for query in queries.iter() {
                match query.cmd {
                    Command::One | Command::Many if !query.ret.is_empty() => {
                        imports.insert("java.sql.ResultSet");
                    }
                    Command::ExecLastId => {
                        imports.insert("java.sql.ResultSet");
                        imports.insert("java.sql.Statement");
                    }
                    _ => {}
                }
                if returns_list(query) {
                    imports.insert("java.util.ArrayList");
                    imports.insert("java.util.List");
                }

                for bind in &query.binds {
                    match bind.op {
                        BindOp::EnumObject => {
                            imports.insert("java.sql.Types");
                        }
                        BindOp::Instant => {
                            imports.insert("java.sql.Timestamp");
                        }
                        _ => {}
                    }
                }
                for decode in &query.decodes {
                    match decode.op {
                        DecodeOp::EnumArray => {
                            imports.insert("java.util.Arrays");
                            imports.insert("java.util.stream.Collectors");
                        }
                        DecodeOp::Array => {
                            imports.insert("java.util.Arrays");
                        }
                        _ => {}
                    }
                }

                add_types(&mut imports, query.arg.types());
                add_types(&mut imports, query.ret.types());
            }
        }
    }

    imports.into_iter().map(str::to_string).collect()
}
