//! Shape registry
//!
//! Keeps every shape generated so far in creation order and decides whether a
//! query's columns can reuse one of them or need a new class. Table shapes are
//! registered before any query is bound, so they always win the first-match
//! scan over shapes synthesized for queries.
//!
//! The scan is linear in shapes times fields. Replacing it with a hash lookup
//! must keep the creation-order tie-break.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::{debug, trace};

use crate::codegen::model::{Field, Shape};
use crate::codegen::naming::{escape_reserved, member_name};
use crate::codegen::GenContext;
use crate::schema::{Column, Identifier};

/// A column offered to a shape, tagged with its id
#[derive(Debug, Clone, Copy)]
pub struct ShapeColumn<'a> {
    pub id: usize,
    pub column: &'a Column,
}

/// Produces the raw member name of a column from the column and its id
pub type ColumnNamer = fn(&Column, usize) -> String;

/// Result column name, `column_<n>` when the analyzer gave none
pub fn column_name(column: &Column, position: usize) -> String {
    if column.name.is_empty() {
        format!("column_{}", position + 1)
    } else {
        column.name.clone()
    }
}

/// Parameter name, `dollar_<n>` when the analyzer gave none
pub fn param_name(column: &Column, number: usize) -> String {
    if column.name.is_empty() {
        format!("dollar_{}", number)
    } else {
        column.name.clone()
    }
}

/// Table identity used for structural comparison
///
/// The catalog part is dropped and an empty schema means the default schema.
pub fn table_key(table: &Identifier, default_schema: &str) -> Identifier {
    let mut key = table.with_default_schema(default_schema);
    key.catalog.clear();
    key
}

/// Build a candidate shape from columns
///
/// A column whose id was already seen is dropped. Repeated source names get
/// a `_<n>` suffix, `n` being the 1-based occurrence count; dropped columns
/// still count as occurrences. Unnamed columns are keyed by their synthesized
/// name, so they never collide with each other.
///
/// Distinct source names can still map to one member name (`user_id` and
/// `userId`); the later field then takes the next free suffix.
pub fn build_shape(
    ctx: &GenContext<'_>,
    name: &str,
    columns: &[ShapeColumn<'_>],
    namer: ColumnNamer,
) -> Shape {
    let mut fields = Vec::with_capacity(columns.len());
    let mut id_seen: HashSet<usize> = HashSet::new();
    let mut name_seen: HashMap<String, usize> = HashMap::new();
    let mut emitted: HashSet<String> = HashSet::new();

    for c in columns {
        let source_name = namer(c.column, c.id);
        let seen = name_seen.entry(source_name.clone()).or_insert(0);
        let occurrence = *seen;
        *seen += 1;

        if !id_seen.insert(c.id) {
            trace!(shape = ?name, id = ?c.id, "Dropping duplicate column id");
            continue;
        }

        let member = member_name(&source_name);
        let mut suffix = occurrence + 1;
        let mut field_name = if occurrence == 0 {
            escape_reserved(&member)
        } else {
            format!("{}_{}", member, suffix)
        };
        while !emitted.insert(field_name.clone()) {
            suffix += 1;
            field_name = format!("{}_{}", member, suffix);
        }
        if suffix > occurrence + 1 {
            trace!(shape = ?name, source = ?source_name, field = ?field_name, "Member name clash");
        }

        fields.push(Field {
            id: c.id,
            name: field_name,
            ty: ctx.map_type(c.column),
            comment: c.column.comment.clone(),
            source_table: c
                .column
                .table
                .as_ref()
                .map(|t| table_key(t, ctx.default_schema())),
        });
    }

    Shape {
        name: name.to_string(),
        table: None,
        fields,
        comment: String::new(),
    }
}

/// Outcome of [`ShapeRegistry::resolve`]
#[derive(Debug, Clone)]
pub struct Resolved {
    pub shape: Arc<Shape>,
    /// No structurally equal shape existed before
    pub is_new: bool,
}

/// Every shape of one generation run, in creation order
#[derive(Debug, Default)]
pub struct ShapeRegistry {
    shapes: Vec<Arc<Shape>>,
}

impl ShapeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a shape without looking for an equal one
    pub fn register(&mut self, shape: Shape) -> Arc<Shape> {
        let shape = Arc::new(shape);
        self.shapes.push(Arc::clone(&shape));
        shape
    }

    /// First shape, in creation order, structurally equal to `candidate`
    pub fn find(&self, candidate: &Shape) -> Option<&Arc<Shape>> {
        self.shapes.iter().find(|s| s.same_structure(candidate))
    }

    /// Reuse an equal shape or register `candidate` under its own name
    pub fn resolve(&mut self, candidate: Shape) -> Resolved {
        if let Some(existing) = self.find(&candidate) {
            debug!(candidate = ?candidate.name, reused = ?existing.name, "Reusing shape");
            return Resolved {
                shape: Arc::clone(existing),
                is_new: false,
            };
        }

        debug!(shape = ?candidate.name, fields = ?candidate.fields.len(), "Synthesized shape");
        Resolved {
            shape: self.register(candidate),
            is_new: true,
        }
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}
