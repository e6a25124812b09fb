//! Generated data model
//!
//! Everything the emission layer renders: enum types, shapes (aggregate
//! classes) and bound queries. The model serializes verbatim into the
//! `enums.txt`, `classes.txt` and `queries.txt` debug dumps.

use std::sync::Arc;

use serde::Serialize;

use crate::codegen::binding::{BindInstruction, DecodeInstruction};
use crate::codegen::types::TypeDescriptor;
use crate::schema::{Command, Identifier};

/// One enum constant
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Constant {
    pub name: String,
    /// Literal label as stored in the database
    pub value: String,
    #[serde(rename = "type")]
    pub type_name: String,
}

/// A generated enum type
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnumType {
    pub name: String,
    pub comment: String,
    pub constants: Vec<Constant>,
}

/// A member of a shape
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Field {
    /// Position in the declaring table or result, or the parameter number
    pub id: usize,
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeDescriptor,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub comment: String,
    /// Table the source column belongs to, schema filled in
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_table: Option<Identifier>,
}

impl Field {
    /// Java getter name (`getSpotifyPlaylist`)
    pub fn getter(&self) -> String {
        format!("get{}", crate::codegen::naming::upper_first(&self.name))
    }
}

/// A generated aggregate class
///
/// Field order is binding and decoding order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Shape {
    pub name: String,
    /// Owning table; `None` for shapes synthesized from queries
    pub table: Option<Identifier>,
    pub fields: Vec<Field>,
    pub comment: String,
}

impl Shape {
    /// True when `other` has the same ordered (name, type, source table) fields
    pub fn same_structure(&self, other: &Shape) -> bool {
        self.fields.len() == other.fields.len()
            && self.fields.iter().zip(&other.fields).all(|(a, b)| {
                a.name == b.name && a.ty == b.ty && a.source_table == b.source_table
            })
    }
}

/// The argument or return value of a query method
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QueryValue {
    #[default]
    Empty,
    Scalar {
        name: String,
        #[serde(rename = "type")]
        ty: TypeDescriptor,
    },
    Shape {
        name: String,
        shape: Arc<Shape>,
        /// The shape is written out as its own class by this query
        emit: bool,
        /// The shape's fields are passed as separate method arguments
        inline: bool,
    },
}

impl QueryValue {
    pub fn is_empty(&self) -> bool {
        matches!(self, QueryValue::Empty)
    }

    pub fn shape(&self) -> Option<&Arc<Shape>> {
        match self {
            QueryValue::Shape { shape, .. } => Some(shape),
            _ => None,
        }
    }

    /// Shape this value introduces as a new class, if any
    pub fn emitted_shape(&self) -> Option<&Arc<Shape>> {
        match self {
            QueryValue::Shape {
                shape, emit: true, ..
            } => Some(shape),
            _ => None,
        }
    }

    /// Every type descriptor carried by this value
    pub fn types(&self) -> Vec<&TypeDescriptor> {
        match self {
            QueryValue::Empty => Vec::new(),
            QueryValue::Scalar { ty, .. } => vec![ty],
            QueryValue::Shape { shape, .. } => shape.fields.iter().map(|f| &f.ty).collect(),
        }
    }

    /// Java type of the value as a whole
    pub fn java_type(&self) -> Option<String> {
        match self {
            QueryValue::Empty => None,
            QueryValue::Scalar { ty, .. } => Some(ty.java_type()),
            QueryValue::Shape { shape, .. } => Some(shape.name.clone()),
        }
    }
}

/// A bound query, ready for emission
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Query {
    pub cmd: Command,
    pub class_name: String,
    pub constant_name: String,
    pub field_name: String,
    pub method_name: String,
    pub source_name: String,
    /// SQL with placeholders rewritten to `?`
    pub sql: String,
    /// Parameter number referenced by each `?`, in order of appearance
    pub placeholders: Vec<u32>,
    pub comments: Vec<String>,
    pub arg: QueryValue,
    pub ret: QueryValue,
    pub binds: Vec<BindInstruction>,
    pub decodes: Vec<DecodeInstruction>,
}
