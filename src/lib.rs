//! # sqlgen-java
//!
//! Generate Java data access code from analyzed SQL
//!
//! This crate provides a CLI tool and library that turn an SQL analyzer's
//! catalog and query set into Java enums, data classes and a JDBC
//! implementation of a `Queries` interface.

pub mod codegen;
pub mod config;
pub mod error;
pub mod inflection;
pub mod schema;

pub mod prelude {
    pub use crate::codegen::{
        generate, write_files, CodeGenConfig, CodeGenerator, GeneratedFiles, Generation,
        JavaGenerator,
    };
    pub use crate::config::Options;
    pub use crate::error::SqlgenError;
    pub use crate::schema::{Catalog, Column, Engine, GenerateRequest, Query};
}
