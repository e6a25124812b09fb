//! Placeholder rewriting
//!
//! JDBC only understands positional `?` parameters, so PostgreSQL's numbered
//! `$n` placeholders are rewritten and the ordinal of each one is recorded.
//!
//! The rewrite is a plain regular-expression substitution, not a SQL parser:
//! a `$n` inside a string literal or quoted identifier is rewritten too. The
//! first placeholder found left to right always becomes bind site 1.

use std::sync::LazyLock;

use regex::Regex;
use tracing::trace;

use crate::error::SqlgenError;
use crate::schema::Engine;

static POSTGRES_PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\B\$\d+\b").expect("valid placeholder pattern"));

/// Rewrite `$n` placeholders to `?`
///
/// Returns the rewritten SQL and the placeholder tokens in order of
/// appearance. Engines other than PostgreSQL already use `?` and are returned
/// unchanged with no tokens.
pub fn rewrite(sql: &str, engine: &Engine) -> (String, Vec<String>) {
    if *engine != Engine::Postgresql {
        return (sql.to_string(), Vec::new());
    }

    let mut tokens = Vec::new();
    let rewritten = POSTGRES_PLACEHOLDER
        .replace_all(sql, |caps: &regex::Captures<'_>| {
            tokens.push(caps[0].to_string());
            "?"
        })
        .into_owned();

    trace!(placeholders = ?tokens, "Rewrote placeholders");
    (rewritten, tokens)
}

/// Parse `$n` tokens into parameter numbers
pub fn parse_ordinals(query: &str, tokens: &[String]) -> Result<Vec<u32>, SqlgenError> {
    tokens
        .iter()
        .map(|token| {
            token
                .trim_start_matches('$')
                .parse::<u32>()
                .map_err(|_| SqlgenError::Placeholder {
                    query: query.to_string(),
                    token: token.clone(),
                })
        })
        .collect()
}
