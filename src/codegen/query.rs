//! Query binding
//!
//! Resolves each analyzed query into method names, an argument value, a
//! return value and the ordered bind and decode instructions. Parameter and
//! result shapes go through the [`ShapeRegistry`] so that structurally equal
//! shapes are generated once.

use std::sync::Arc;

use tracing::{debug, error, trace};

use crate::codegen::binding::{bind, bind_order, decode, BindInstruction, DecodeInstruction, ValueRef};
use crate::codegen::model::{Query, QueryValue};
use crate::codegen::naming::{arg_name, constant_name, escape_reserved, lower_first, upper_first};
use crate::codegen::placeholder;
use crate::codegen::shapes::{build_shape, column_name, param_name, ShapeColumn, ShapeRegistry};
use crate::codegen::GenContext;
use crate::error::SqlgenError;
use crate::schema::{self, Command, Parameter};

/// Argument name of a shape passed as a whole
pub const PARAMS_NAME: &str = "params";

/// Local name of a decoded row shape
pub const RESULT_NAME: &str = "result";

/// Bind every query, sorted by method name
///
/// Queries without a name or command are skipped. The first failing query
/// aborts the whole run.
pub fn build_queries(
    ctx: &GenContext<'_>,
    registry: &mut ShapeRegistry,
    queries: &[schema::Query],
) -> Result<Vec<Query>, SqlgenError> {
    let mut bound = Vec::with_capacity(queries.len());
    for query in queries {
        if let Some(q) = bind_query(ctx, registry, query)? {
            bound.push(q);
        }
    }

    bound.sort_by(|a, b| a.method_name.cmp(&b.method_name));
    Ok(bound)
}

/// Bind a single query; `None` when the query is skipped
pub fn bind_query(
    ctx: &GenContext<'_>,
    registry: &mut ShapeRegistry,
    query: &schema::Query,
) -> Result<Option<Query>, SqlgenError> {
    if query.name.is_empty() || query.cmd.is_empty() {
        trace!(query = ?query.name, cmd = ?query.cmd, "Skipping query without name or command");
        return Ok(None);
    }

    let cmd = match Command::from_tag(&query.cmd) {
        Some(Command::CopyFrom) | None => {
            error!(query = ?query.name, cmd = ?query.cmd, "Unsupported query command");
            return Err(SqlgenError::UnsupportedCommand {
                query: query.name.clone(),
                command: query.cmd.clone(),
            });
        }
        Some(cmd) => cmd,
    };

    let (sql, tokens) = placeholder::rewrite(&query.text, ctx.engine);
    let ordinals = placeholder::parse_ordinals(&query.name, &tokens)?;

    let class_name = upper_first(&query.name);
    let method_name = lower_first(&query.name);

    let (arg, binds) = bind_params(ctx, registry, query, &class_name, &ordinals)?;
    let ret = bind_result(ctx, registry, query, cmd, &class_name);
    let decodes = if cmd.returns_rows() {
        decode_result(&ret)
    } else {
        Vec::new()
    };

    debug!(
        query = ?query.name,
        cmd = ?cmd,
        arg = ?arg.java_type(),
        ret = ?ret.java_type(),
        binds = ?binds.len(),
        "Bound query"
    );

    Ok(Some(Query {
        cmd,
        constant_name: constant_name(&query.name),
        field_name: format!("{}Stmt", method_name),
        method_name,
        class_name,
        source_name: query.filename.clone(),
        sql,
        placeholders: ordinals,
        comments: query.comments.clone(),
        arg,
        ret,
        binds,
        decodes,
    }))
}

/// Argument name of a scalar parameter
fn scalar_param_name(param: &Parameter) -> String {
    if param.column.name.is_empty() {
        format!("dollar_{}", param.number)
    } else {
        arg_name(&param.column.name)
    }
}

fn bind_params(
    ctx: &GenContext<'_>,
    registry: &mut ShapeRegistry,
    query: &schema::Query,
    class_name: &str,
    ordinals: &[u32],
) -> Result<(QueryValue, Vec<BindInstruction>), SqlgenError> {
    let limit = ctx.options.parameter_limit();

    match query.params.as_slice() {
        [] => match ordinals.first() {
            Some(&ordinal) => Err(SqlgenError::UnknownParameter {
                query: query.name.clone(),
                ordinal,
            }),
            None => Ok((QueryValue::Empty, Vec::new())),
        },
        [param] if limit != 0 => {
            let name = escape_reserved(&scalar_param_name(param));
            let ty = ctx.map_type(&param.column);

            if let Some(&ordinal) = ordinals.iter().find(|&&o| o != param.number) {
                return Err(SqlgenError::UnknownParameter {
                    query: query.name.clone(),
                    ordinal,
                });
            }
            let sites = ordinals.len().max(1);
            let binds = (1..=sites)
                .map(|index| bind(index, ValueRef::Argument { name: name.clone() }, &ty))
                .collect();

            Ok((QueryValue::Scalar { name, ty }, binds))
        }
        params => {
            let columns: Vec<ShapeColumn<'_>> = params
                .iter()
                .map(|p| ShapeColumn {
                    id: p.number as usize,
                    column: &p.column,
                })
                .collect();
            let candidate = build_shape(ctx, &format!("{}Params", class_name), &columns, param_name);
            let order = bind_order(&query.name, &candidate.fields, ordinals)?;

            // Inline shapes never become classes, so they stay out of the registry
            let inline = params.len() <= limit;
            let (shape, emit) = if inline {
                (Arc::new(candidate), false)
            } else {
                let resolved = registry.resolve(candidate);
                (resolved.shape, resolved.is_new)
            };

            let binds = order
                .iter()
                .enumerate()
                .map(|(site, &position)| {
                    let field = &shape.fields[position];
                    let value = if inline {
                        ValueRef::Argument {
                            name: field.name.clone(),
                        }
                    } else {
                        ValueRef::Getter {
                            target: PARAMS_NAME.to_string(),
                            field: field.name.clone(),
                        }
                    };
                    bind(site + 1, value, &field.ty)
                })
                .collect();

            Ok((
                QueryValue::Shape {
                    name: PARAMS_NAME.to_string(),
                    shape,
                    emit,
                    inline,
                },
                binds,
            ))
        }
    }
}

fn bind_result(
    ctx: &GenContext<'_>,
    registry: &mut ShapeRegistry,
    query: &schema::Query,
    cmd: Command,
    class_name: &str,
) -> QueryValue {
    match query.columns.as_slice() {
        [] => QueryValue::Empty,
        [column] if column.embed_table.is_none() => QueryValue::Scalar {
            name: escape_reserved(&column_name(column, 0).replace('$', "_")),
            ty: ctx.map_type(column),
        },
        columns if cmd.returns_rows() => {
            let columns: Vec<ShapeColumn<'_>> = columns
                .iter()
                .enumerate()
                .map(|(id, column)| ShapeColumn { id, column })
                .collect();
            let candidate = build_shape(ctx, &format!("{}Row", class_name), &columns, column_name);
            let resolved = registry.resolve(candidate);

            QueryValue::Shape {
                name: RESULT_NAME.to_string(),
                shape: resolved.shape,
                emit: resolved.is_new,
                inline: false,
            }
        }
        _ => {
            trace!(query = ?query.name, cmd = ?cmd, "Ignoring result columns of non-row command");
            QueryValue::Empty
        }
    }
}

fn decode_result(ret: &QueryValue) -> Vec<DecodeInstruction> {
    match ret {
        QueryValue::Empty => Vec::new(),
        QueryValue::Scalar { ty, .. } => vec![decode(1, ty)],
        QueryValue::Shape { shape, .. } => shape
            .fields
            .iter()
            .enumerate()
            .map(|(i, field)| decode(i + 1, &field.ty))
            .collect(),
    }
}
