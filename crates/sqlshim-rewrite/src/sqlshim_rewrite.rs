//! MySQL-to-T-SQL statement rewrites
//!
//! Pure text-to-text functions used by the SQL Server compatibility driver.
//! None of them parse SQL or fail; a shape they do not recognise comes back
//! unchanged.
//!
//! - [`translate`] - back-tick identifiers to `[..]`, `?` to `@p1`, `@p2`, ...
//! - [`rewrite_limit`] - trailing `LIMIT`/`OFFSET` to `TOP` or `OFFSET .. FETCH`
//! - [`inject_output_clause`] - `OUTPUT INSERTED.[id]` for inserts on the query path
//! - [`rewrite`] - all of the above in order for a [`StatementPath`]

mod limit;
mod output;
mod pipeline;
mod structure;
mod translate;

#[cfg(test)]
mod limit_tests;
#[cfg(test)]
mod output_tests;
#[cfg(test)]
mod translate_tests;

pub use limit::rewrite_limit;
pub use output::{OUTPUT_INSERTED_ID, inject_output_clause};
pub use pipeline::{StatementPath, rewrite, rewrite_exec, rewrite_query};
pub use translate::translate;
