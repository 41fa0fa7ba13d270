//! Trailing `LIMIT` / `LIMIT .. OFFSET ..` rewriting
//!
//! SQL Server has no `LIMIT`. A trailing limiting clause becomes either
//! `OFFSET .. ROWS FETCH NEXT .. ROWS ONLY` or a `TOP n` right after `SELECT`.
//! Only the end of the statement is inspected; limits inside subqueries or
//! CTEs are left alone.

use regex::{Captures, Regex};
use std::sync::LazyLock;

use crate::structure::code_depths;

static LIMIT_OFFSET_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\s+LIMIT\s+(\d+)\s+OFFSET\s+(\d+)\s*$").expect("valid regex")
});

static LIMIT_ONLY_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\s+LIMIT\s+(\d+)\s*$").expect("valid regex"));

static ORDER_BY_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bORDER\s+BY\b").expect("valid regex"));

static SELECT_KEYWORD_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bSELECT\b").expect("valid regex"));

/// OFFSET/FETCH needs an ORDER BY; this one keeps the engine's row order.
const NOOP_ORDER_BY: &str = " ORDER BY (SELECT NULL)";

/// Rewrites a trailing MySQL limiting clause into SQL Server pagination.
///
/// - `.. LIMIT n OFFSET m` becomes `.. OFFSET m ROWS FETCH NEXT n ROWS ONLY`,
///   with `ORDER BY (SELECT NULL)` added first when the statement has no
///   top-level ORDER BY.
/// - `.. ORDER BY .. LIMIT n` becomes `.. ORDER BY .. OFFSET 0 ROWS FETCH NEXT n ROWS ONLY`.
/// - `SELECT .. LIMIT n` without ORDER BY becomes `SELECT TOP n ..`.
///
/// Anything else, including a `LIMIT n` statement with no `SELECT` keyword,
/// is returned unchanged.
///
/// # Example
///
/// ```
/// use sqlshim_rewrite::rewrite_limit;
///
/// assert_eq!(rewrite_limit("SELECT * FROM t LIMIT 10"), "SELECT TOP 10 * FROM t");
/// assert_eq!(
///     rewrite_limit("SELECT * FROM t LIMIT 10 OFFSET 20"),
///     "SELECT * FROM t ORDER BY (SELECT NULL) OFFSET 20 ROWS FETCH NEXT 10 ROWS ONLY"
/// );
/// ```
pub fn rewrite_limit(sql: &str) -> String {
    let trimmed = sql.trim();

    if let Some(caps) = LIMIT_OFFSET_REGEX.captures(trimmed) {
        let (limit, offset) = (&caps[1], &caps[2]);
        let base = strip_clause(trimmed, &caps);
        let ordering = if has_order_by(base) { "" } else { NOOP_ORDER_BY };
        return format!("{base}{ordering} OFFSET {offset} ROWS FETCH NEXT {limit} ROWS ONLY");
    }

    if let Some(caps) = LIMIT_ONLY_REGEX.captures(trimmed) {
        let limit = &caps[1];
        let base = strip_clause(trimmed, &caps);

        if has_order_by(base) {
            return format!("{base} OFFSET 0 ROWS FETCH NEXT {limit} ROWS ONLY");
        }

        if let Some(select) = SELECT_KEYWORD_REGEX.find(base) {
            let at = select.end();
            return format!("{} TOP {}{}", &base[..at], limit, &base[at..]);
        }
    }

    sql.to_string()
}

/// The statement with the matched limiting clause removed.
fn strip_clause<'a>(trimmed: &'a str, caps: &Captures<'_>) -> &'a str {
    let clause_start = caps.get(0).map_or(trimmed.len(), |m| m.start());
    trimmed[..clause_start].trim()
}

/// Whether the statement itself is ordered. ORDER BY inside parentheses
/// (window functions, subqueries) or inside a literal does not count.
fn has_order_by(sql: &str) -> bool {
    let depths = code_depths(sql);
    ORDER_BY_REGEX
        .find_iter(sql)
        .any(|found| depths[found.start()] == Some(0))
}
