//! Bind and decode instructions
//!
//! Each parameter bind site and each result column gets a structured
//! instruction chosen from its [`TypeDescriptor`]. The emission layer turns the
//! instructions into target syntax.

use serde::Serialize;

use crate::codegen::model::Field;
use crate::codegen::types::TypeDescriptor;
use crate::error::SqlgenError;
use crate::schema::Engine;

/// How a value is bound to a statement parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BindOp {
    /// Array of enum labels
    EnumArray,
    /// Enum label passed as a database-native object
    EnumObject,
    /// Enum label passed as a plain string
    EnumString,
    Array,
    /// Wall-clock date/time passed as an object
    LocalTemporal,
    /// Point in time converted to a timestamp
    Instant,
    Uuid,
    BigDecimal,
    /// Typed setter named after the Java type
    Scalar,
}

/// How a result column is read back
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DecodeOp {
    EnumArray,
    Enum,
    Array,
    LocalTemporal,
    Instant,
    Uuid,
    BigDecimal,
    Scalar,
}

/// Where the value bound at a site comes from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValueRef {
    /// A method argument
    Argument { name: String },
    /// A field of an argument object, read through its getter
    Getter { target: String, field: String },
}

/// Bind one value to the 1-based parameter `index`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BindInstruction {
    pub index: usize,
    pub op: BindOp,
    pub value: ValueRef,
    #[serde(rename = "type")]
    pub ty: TypeDescriptor,
}

/// Read the 1-based result column `index`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecodeInstruction {
    pub index: usize,
    pub op: DecodeOp,
    #[serde(rename = "type")]
    pub ty: TypeDescriptor,
}

pub fn bind_op(ty: &TypeDescriptor) -> BindOp {
    if ty.is_enum && ty.is_array {
        BindOp::EnumArray
    } else if ty.is_enum {
        match ty.engine {
            Engine::Postgresql => BindOp::EnumObject,
            _ => BindOp::EnumString,
        }
    } else if ty.is_array {
        BindOp::Array
    } else if ty.is_local_temporal() {
        BindOp::LocalTemporal
    } else if ty.is_instant() {
        BindOp::Instant
    } else if ty.is_uuid() {
        BindOp::Uuid
    } else if ty.is_big_decimal() {
        BindOp::BigDecimal
    } else {
        BindOp::Scalar
    }
}

pub fn decode_op(ty: &TypeDescriptor) -> DecodeOp {
    if ty.is_enum && ty.is_array {
        DecodeOp::EnumArray
    } else if ty.is_enum {
        DecodeOp::Enum
    } else if ty.is_array {
        DecodeOp::Array
    } else if ty.is_local_temporal() {
        DecodeOp::LocalTemporal
    } else if ty.is_instant() {
        DecodeOp::Instant
    } else if ty.is_uuid() {
        DecodeOp::Uuid
    } else if ty.is_big_decimal() {
        DecodeOp::BigDecimal
    } else {
        DecodeOp::Scalar
    }
}

pub fn bind(index: usize, value: ValueRef, ty: &TypeDescriptor) -> BindInstruction {
    BindInstruction {
        index,
        op: bind_op(ty),
        value,
        ty: ty.clone(),
    }
}

pub fn decode(index: usize, ty: &TypeDescriptor) -> DecodeInstruction {
    DecodeInstruction {
        index,
        op: decode_op(ty),
        ty: ty.clone(),
    }
}

/// Field position bound at each placeholder site
///
/// Without placeholder ordinals the fields bind in declaration order. With
/// them, site `i` binds the field whose id equals the `i`-th ordinal; a
/// parameter repeated in the SQL is bound once per site.
pub fn bind_order(
    query: &str,
    fields: &[Field],
    ordinals: &[u32],
) -> Result<Vec<usize>, SqlgenError> {
    if ordinals.is_empty() {
        return Ok((0..fields.len()).collect());
    }

    ordinals
        .iter()
        .map(|&ordinal| {
            fields
                .iter()
                .position(|f| f.id == ordinal as usize)
                .ok_or_else(|| SqlgenError::UnknownParameter {
                    query: query.to_string(),
                    ordinal,
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ty(name: &str) -> TypeDescriptor {
        TypeDescriptor {
            name: name.to_string(),
            engine: Engine::Postgresql,
            ..Default::default()
        }
    }

    fn field(id: usize, name: &str) -> Field {
        Field {
            id,
            name: name.to_string(),
            ty: ty("String"),
            comment: String::new(),
            source_table: None,
        }
    }

    #[test]
    fn test_bind_op_dispatch() {
        let mut status = ty("Status");
        status.is_enum = true;
        assert_eq!(bind_op(&status), BindOp::EnumObject);

        status.engine = Engine::Mysql;
        assert_eq!(bind_op(&status), BindOp::EnumString);

        status.is_array = true;
        assert_eq!(bind_op(&status), BindOp::EnumArray);

        let mut tags = ty("String");
        tags.is_array = true;
        assert_eq!(bind_op(&tags), BindOp::Array);

        assert_eq!(bind_op(&ty("LocalDate")), BindOp::LocalTemporal);
        assert_eq!(bind_op(&ty("Instant")), BindOp::Instant);
        assert_eq!(bind_op(&ty("UUID")), BindOp::Uuid);
        assert_eq!(bind_op(&ty("java.math.BigDecimal")), BindOp::BigDecimal);
        assert_eq!(bind_op(&ty("Integer")), BindOp::Scalar);
        assert_eq!(bind_op(&ty("Object")), BindOp::Scalar);
    }

    #[test]
    fn test_decode_op_dispatch() {
        let mut status = ty("Status");
        status.is_enum = true;
        assert_eq!(decode_op(&status), DecodeOp::Enum);

        status.engine = Engine::Mysql;
        assert_eq!(decode_op(&status), DecodeOp::Enum);

        status.is_array = true;
        assert_eq!(decode_op(&status), DecodeOp::EnumArray);

        let mut ids = ty("Long");
        ids.is_array = true;
        assert_eq!(decode_op(&ids), DecodeOp::Array);

        assert_eq!(decode_op(&ty("LocalTime")), DecodeOp::LocalTemporal);
        assert_eq!(decode_op(&ty("Instant")), DecodeOp::Instant);
        assert_eq!(decode_op(&ty("UUID")), DecodeOp::Uuid);
        assert_eq!(decode_op(&ty("java.math.BigDecimal")), DecodeOp::BigDecimal);
        assert_eq!(decode_op(&ty("Boolean")), DecodeOp::Scalar);
    }

    #[test]
    fn test_bind_order_without_ordinals() {
        let fields = vec![field(1, "a"), field(2, "b")];
        assert_eq!(bind_order("q", &fields, &[]).unwrap(), vec![0, 1]);
    }

    #[test]
    fn test_bind_order_remaps_ordinals() {
        let fields = vec![field(1, "id"), field(2, "name"), field(3, "email")];
        let order = bind_order("q", &fields, &[3, 1, 2]).unwrap();
        assert_eq!(order, vec![2, 0, 1]);
    }

    #[test]
    fn test_bind_order_repeated_placeholder() {
        let fields = vec![field(1, "id"), field(2, "name")];
        let order = bind_order("q", &fields, &[2, 1, 2]).unwrap();
        assert_eq!(order, vec![1, 0, 1]);
    }

    #[test]
    fn test_bind_order_unknown_ordinal() {
        let fields = vec![field(1, "id")];
        let err = bind_order("GetUser", &fields, &[1, 4]).unwrap_err();

        assert!(matches!(err, SqlgenError::UnknownParameter { ordinal: 4, .. }));
        assert!(err.to_string().contains("GetUser"));
    }
}
