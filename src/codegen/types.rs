//! Type mapping
//!
//! Resolves SQL column types into Java type descriptors. Resolution is a pure
//! function of the column, the engine and the catalog's enums; equal inputs
//! always produce equal descriptors, which shape deduplication relies on.

use serde::Serialize;
use tracing::warn;

use crate::codegen::naming::class_name;
use crate::schema::{Catalog, Column, Engine};

/// Type used when nothing else matches
pub const FALLBACK_TYPE: &str = "Object";

pub const BIG_DECIMAL: &str = "java.math.BigDecimal";

/// Wall-clock date/time types bound and read as plain objects
const LOCAL_TEMPORAL_TYPES: &[&str] = &["LocalDate", "LocalDateTime", "LocalTime"];

/// Resolved Java type of one column or parameter
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct TypeDescriptor {
    /// Java type name of a single element
    pub name: String,
    pub is_enum: bool,
    pub is_array: bool,
    pub is_nullable: bool,
    /// SQL type name as written by the analyzer, used as array element type
    pub data_type: String,
    pub engine: Engine,
}

impl TypeDescriptor {
    /// Java type of a declared value (`java.util.List<T>` for arrays)
    pub fn java_type(&self) -> String {
        if self.is_array {
            format!("java.util.List<{}>", self.name)
        } else {
            self.name.clone()
        }
    }

    /// Java type of a getter's return value; nullable scalars become `Optional`
    pub fn getter_type(&self) -> String {
        if self.is_nullable {
            format!("java.util.Optional<{}>", self.java_type())
        } else {
            self.java_type()
        }
    }

    pub fn is_local_temporal(&self) -> bool {
        LOCAL_TEMPORAL_TYPES.contains(&self.name.as_str())
    }

    pub fn is_instant(&self) -> bool {
        self.name == "Instant"
    }

    pub fn is_uuid(&self) -> bool {
        self.name == "UUID"
    }

    pub fn is_big_decimal(&self) -> bool {
        self.name == BIG_DECIMAL
    }

    pub fn is_fallback(&self) -> bool {
        self.name == FALLBACK_TYPE
    }
}

/// Map a column to its Java type descriptor
pub fn map_type(engine: &Engine, catalog: &Catalog, column: &Column) -> TypeDescriptor {
    let data_type = column.data_type();
    let (name, is_enum) = inner_type(engine, catalog, &data_type);

    let ty = TypeDescriptor {
        name,
        is_enum,
        is_array: column.is_array,
        is_nullable: column.is_nullable(),
        data_type,
        engine: engine.clone(),
    };

    if ty.is_fallback() && ty.data_type != "any" {
        warn!(
            column = ?column.name,
            data_type = ?ty.data_type,
            engine = %engine,
            "Unresolved column type, using fallback"
        );
    }
    ty
}

fn inner_type(engine: &Engine, catalog: &Catalog, data_type: &str) -> (String, bool) {
    let builtin = match engine {
        Engine::Postgresql => postgres_type(data_type),
        Engine::Mysql => mysql_type(data_type),
        Engine::Other(_) => return (FALLBACK_TYPE.to_string(), false),
    };

    match builtin {
        Some(name) => (name.to_string(), false),
        None => match enum_type(catalog, data_type) {
            Some(name) => (name, true),
            None => (FALLBACK_TYPE.to_string(), false),
        },
    }
}

fn postgres_type(data_type: &str) -> Option<&'static str> {
    let name = match data_type {
        "serial" | "serial4" | "pg_catalog.serial4" | "integer" | "int" | "int4"
        | "pg_catalog.int4" => "Integer",
        "bigserial" | "serial8" | "pg_catalog.serial8" | "bigint" | "int8" | "pg_catalog.int8" => {
            "Long"
        }
        "smallserial" | "serial2" | "pg_catalog.serial2" | "smallint" | "int2"
        | "pg_catalog.int2" => "Short",
        "float" | "double precision" | "float8" | "pg_catalog.float8" => "Double",
        "real" | "float4" | "pg_catalog.float4" => "Float",
        "numeric" | "pg_catalog.numeric" | "money" => BIG_DECIMAL,
        "bool" | "boolean" | "pg_catalog.bool" => "Boolean",
        "json" | "jsonb" => "String",
        "bytea" | "blob" | "pg_catalog.bytea" => "String",
        "date" => "LocalDate",
        "time" | "pg_catalog.time" | "timetz" | "pg_catalog.timetz" => "LocalTime",
        "timestamp" | "pg_catalog.timestamp" => "LocalDateTime",
        "timestamptz" | "pg_catalog.timestamptz" => "Instant",
        "text" | "pg_catalog.varchar" | "pg_catalog.bpchar" | "varchar" | "bpchar" | "char"
        | "string" | "citext" | "name" => "String",
        "inet" | "cidr" | "macaddr" | "macaddr8" => "String",
        "uuid" => "UUID",
        "any" => FALLBACK_TYPE,
        _ => return None,
    };
    Some(name)
}

fn mysql_type(data_type: &str) -> Option<&'static str> {
    let name = match data_type {
        "varchar" | "text" | "char" | "tinytext" | "mediumtext" | "longtext" => "String",
        "int" | "integer" | "smallint" | "mediumint" | "year" => "Integer",
        "bigint" => "Long",
        "blob" | "binary" | "varbinary" | "tinyblob" | "mediumblob" | "longblob" => "String",
        "double" | "double precision" | "real" => "Double",
        "decimal" | "dec" | "fixed" => "String",
        // Inline MySQL enums carry no catalog entry to name a Java enum after
        "enum" => "String",
        "date" | "datetime" | "time" => "LocalDateTime",
        "timestamp" => "Instant",
        "boolean" | "bool" | "tinyint" => "Boolean",
        "json" => "String",
        "any" => FALLBACK_TYPE,
        _ => return None,
    };
    Some(name)
}

/// Find a catalog enum named `data_type` and return its Java type name
///
/// Schemas are scanned in catalog order; enums outside the default schema are
/// prefixed with their schema name.
pub fn enum_type(catalog: &Catalog, data_type: &str) -> Option<String> {
    catalog.schemas.iter().find_map(|schema| {
        schema
            .enums
            .iter()
            .find(|e| {
                e.name == data_type || format!("{}.{}", schema.name, e.name) == data_type
            })
            .map(|e| {
                if schema.name == catalog.default_schema {
                    class_name(&e.name)
                } else {
                    class_name(&format!("{}_{}", schema.name, e.name))
                }
            })
    })
}
