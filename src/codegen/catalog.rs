//! Catalog traversal
//!
//! Builds one enum type per catalog enum and one shape per table. Schemas in
//! [`crate::schema::SYSTEM_SCHEMAS`] are skipped.

use std::sync::Arc;

use tracing::{debug, trace};

use crate::codegen::model::{Constant, EnumType, Shape};
use crate::codegen::naming::{class_name, enum_constant_name};
use crate::codegen::shapes::{build_shape, column_name, table_key, ShapeColumn, ShapeRegistry};
use crate::codegen::GenContext;
use crate::inflection::singular;
use crate::schema::Schema;

/// Name of a catalog object, prefixed with its schema outside the default schema
fn qualified_name(ctx: &GenContext<'_>, schema: &Schema, name: &str) -> String {
    if schema.name == ctx.default_schema() {
        name.to_string()
    } else {
        format!("{}_{}", schema.name, name)
    }
}

fn user_schemas<'a>(ctx: &GenContext<'a>) -> impl Iterator<Item = &'a Schema> {
    ctx.catalog.schemas.iter().filter(|s| {
        if s.is_system() {
            trace!(schema = ?s.name, "Skipping system schema");
        }
        !s.is_system()
    })
}

/// Build every enum type, sorted by name
pub fn build_enums(ctx: &GenContext<'_>) -> Vec<EnumType> {
    let mut enums: Vec<EnumType> = user_schemas(ctx)
        .flat_map(|schema| {
            schema.enums.iter().map(move |e| {
                let name = class_name(&qualified_name(ctx, schema, &e.name));
                let constants = e
                    .vals
                    .iter()
                    .map(|value| Constant {
                        name: enum_constant_name(value),
                        value: value.clone(),
                        type_name: name.clone(),
                    })
                    .collect();

                debug!(schema = ?schema.name, enum_name = ?e.name, java_name = ?name, "Enum type");
                EnumType {
                    name,
                    comment: e.comment.clone(),
                    constants,
                }
            })
        })
        .collect();

    enums.sort_by(|a, b| a.name.cmp(&b.name));
    enums
}

/// Build one shape per table, sorted by name, and register them in order
///
/// Every field is associated with its table so that query results read from
/// the same table can reuse the shape.
pub fn build_table_shapes(ctx: &GenContext<'_>, registry: &mut ShapeRegistry) -> Vec<Arc<Shape>> {
    let options = ctx.options;
    let mut shapes: Vec<Shape> = Vec::new();

    for schema in user_schemas(ctx) {
        for table in &schema.tables {
            let table_name = qualified_name(ctx, schema, &table.rel.name);
            let struct_name = if options.emit_exact_table_names {
                table_name
            } else {
                singular(&table_name, &options.inflection_exclude_table_names)
            };

            let columns: Vec<ShapeColumn<'_>> = table
                .columns
                .iter()
                .enumerate()
                .map(|(id, column)| ShapeColumn { id, column })
                .collect();

            let key = table_key(&table.rel.with_default_schema(&schema.name), ctx.default_schema());
            let mut shape = build_shape(ctx, &class_name(&struct_name), &columns, column_name);
            for field in &mut shape.fields {
                field.source_table = Some(key.clone());
            }
            shape.table = Some(key);
            shape.comment = table.comment.clone();

            debug!(
                table = ?table.rel.name,
                class = ?shape.name,
                fields = ?shape.fields.len(),
                "Table shape"
            );
            shapes.push(shape);
        }
    }

    shapes.sort_by(|a, b| a.name.cmp(&b.name));
    shapes.into_iter().map(|s| registry.register(s)).collect()
}
