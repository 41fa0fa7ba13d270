//! Identity-return injection for INSERT statements
//!
//! The ORM reads the generated primary key from the row returned by an
//! INSERT on the query path. SQL Server only returns it when asked with an
//! `OUTPUT INSERTED.<column>` clause placed before `VALUES`.

use regex::Regex;
use std::sync::LazyLock;

use crate::structure::code_depths;

static INSERT_INTO_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*INSERT\s+INTO\b").expect("valid regex"));

static OUTPUT_CLAUSE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\sOUTPUT\s").expect("valid regex"));

static VALUES_BOUNDARY_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\s(?:DEFAULT\s+)?VALUES\b").expect("valid regex"));

/// Clause inserted ahead of the `VALUES` keyword.
pub const OUTPUT_INSERTED_ID: &str = " OUTPUT INSERTED.[id]";

/// Adds `OUTPUT INSERTED.[id]` to an `INSERT INTO .. VALUES ..` statement.
///
/// Statements that are not inserts, that already carry an `OUTPUT` clause,
/// or that have no `VALUES` keyword are returned unchanged, so applying this
/// twice is the same as applying it once. Keywords inside string literals
/// are ignored.
///
/// # Example
///
/// ```
/// use sqlshim_rewrite::inject_output_clause;
///
/// let once = inject_output_clause("INSERT INTO t (a) VALUES (1)");
/// assert_eq!(once, "INSERT INTO t (a) OUTPUT INSERTED.[id] VALUES (1)");
/// assert_eq!(inject_output_clause(&once), once);
/// ```
pub fn inject_output_clause(sql: &str) -> String {
    if !INSERT_INTO_REGEX.is_match(sql) {
        return sql.to_string();
    }

    let depths = code_depths(sql);
    let outside_literals = |found: &regex::Match<'_>| depths[found.start()].is_some();

    if OUTPUT_CLAUSE_REGEX.find_iter(sql).any(|found| outside_literals(&found)) {
        return sql.to_string();
    }

    match VALUES_BOUNDARY_REGEX
        .find_iter(sql)
        .find(|found| outside_literals(found))
    {
        Some(values) => {
            let at = values.start();
            let mut out = String::with_capacity(sql.len() + OUTPUT_INSERTED_ID.len());
            out.push_str(&sql[..at]);
            out.push_str(OUTPUT_INSERTED_ID);
            out.push_str(&sql[at..]);
            out
        }
        None => sql.to_string(),
    }
}
