//! Composition of the rewrites per execution path

use crate::{inject_output_clause, rewrite_limit, translate};

/// Which driver entry point a statement arrived through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatementPath {
    /// Execute without returning rows
    Exec,
    /// Query returning rows; INSERTs on this path want their identity back
    Query,
}

/// Applies every rewrite the path needs, in order: quoting and
/// placeholders, then pagination, then (query path only) the OUTPUT clause.
pub fn rewrite(sql: &str, path: StatementPath) -> String {
    let translated = translate(sql);
    let paged = rewrite_limit(&translated);
    let rewritten = match path {
        StatementPath::Exec => paged,
        StatementPath::Query => inject_output_clause(&paged),
    };

    if rewritten != sql {
        tracing::trace!(
            target: "sqlshim::rewrite",
            ?path,
            original = %sql,
            rewritten = %rewritten,
            "statement rewritten"
        );
    }
    rewritten
}

pub fn rewrite_exec(sql: &str) -> String {
    rewrite(sql, StatementPath::Exec)
}

pub fn rewrite_query(sql: &str) -> String {
    rewrite(sql, StatementPath::Query)
}
