//! Driver contract decorated by the shim layers
//!
//! The required surface is [`Driver`]. Context-aware variants of execute,
//! query and begin are separate capability traits that a driver may or may
//! not implement; callers discover them at runtime through the `as_*`
//! accessors, which return `None` unless the driver overrides them.

use crate::{Context, ExecResult, Result, Rows, Tx, TxOptions, Value};
use async_trait::async_trait;

/// A database driver as seen by the ORM layer
#[async_trait]
pub trait Driver: Send + Sync {
    /// Dialect label of the engine this driver talks to (e.g. "mssql", "mysql")
    fn dialect(&self) -> &str;

    /// Execute a statement that does not return rows.
    ///
    /// On success the driver stores the outcome in `dest`.
    async fn exec(
        &self,
        ctx: &Context,
        sql: &str,
        args: &[Value],
        dest: &mut Option<ExecResult>,
    ) -> Result<()>;

    /// Execute a statement that returns rows.
    ///
    /// On success the driver stores a rows cursor in `dest`.
    async fn query(
        &self,
        ctx: &Context,
        sql: &str,
        args: &[Value],
        dest: &mut Option<Rows>,
    ) -> Result<()>;

    /// Begin a transaction with the engine's default options
    async fn tx(&self, ctx: &Context) -> Result<Box<dyn Tx>>;

    /// Close the driver and release its connections
    async fn close(&self) -> Result<()>;

    /// Get the context-aware execute capability if supported
    fn as_exec_context(&self) -> Option<&dyn ExecContext> {
        None
    }

    /// Get the context-aware query capability if supported
    fn as_query_context(&self) -> Option<&dyn QueryContext> {
        None
    }

    /// Get the begin-with-options capability if supported
    fn as_begin_tx(&self) -> Option<&dyn BeginTx> {
        None
    }
}

/// Execute returning the result directly instead of through a destination
#[async_trait]
pub trait ExecContext: Send + Sync {
    async fn exec_context(&self, ctx: &Context, sql: &str, args: &[Value]) -> Result<ExecResult>;
}

/// Query returning the rows cursor directly instead of through a destination
#[async_trait]
pub trait QueryContext: Send + Sync {
    async fn query_context(&self, ctx: &Context, sql: &str, args: &[Value]) -> Result<Rows>;
}

/// Begin a transaction with explicit options
#[async_trait]
pub trait BeginTx: Send + Sync {
    async fn begin_tx(&self, ctx: &Context, opts: &TxOptions) -> Result<Box<dyn Tx>>;
}
