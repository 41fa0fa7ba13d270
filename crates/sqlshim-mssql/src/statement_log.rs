//! Statement logging driver
//!
//! Emits one `tracing` event per statement with the text exactly as it is
//! handed to the wrapped driver. Installed downstream of the compatibility
//! driver, it shows the final T-SQL.

use std::sync::Arc;

use async_trait::async_trait;
use sqlshim_core::{
    BeginTx, Context, Driver, ExecContext, ExecResult, QueryContext, Result, Rows, Tx, TxOptions,
    Value,
};
use uuid::Uuid;

use crate::capability;

/// Target of every event emitted by the statement logger
pub const STATEMENT_LOG_TARGET: &str = "sqlshim::statements";

#[derive(Debug, Clone)]
struct StatementLogger {
    dialect: String,
    log_args: bool,
}

impl StatementLogger {
    fn log(&self, op: &'static str, tx: Option<Uuid>, sql: &str, args: &[Value]) {
        let tx = tx.map(|id| id.to_string());
        if self.log_args {
            tracing::debug!(
                target: STATEMENT_LOG_TARGET,
                op,
                dialect = %self.dialect,
                tx = tx.as_deref(),
                sql = %sql,
                args = %DisplayArgs(args),
                "statement"
            );
        } else {
            tracing::debug!(
                target: STATEMENT_LOG_TARGET,
                op,
                dialect = %self.dialect,
                tx = tx.as_deref(),
                sql = %sql,
                arg_count = args.len(),
                "statement"
            );
        }
    }

    fn log_tx(&self, op: &'static str, tx: Uuid) {
        tracing::debug!(
            target: STATEMENT_LOG_TARGET,
            op,
            dialect = %self.dialect,
            tx = %tx,
            "transaction"
        );
    }
}

struct DisplayArgs<'a>(&'a [Value]);

impl std::fmt::Display for DisplayArgs<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("[")?;
        for (idx, value) in self.0.iter().enumerate() {
            if idx > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", value)?;
        }
        f.write_str("]")
    }
}

/// Driver decorator that logs every statement before delegating
pub struct StatementLogDriver {
    inner: Arc<dyn Driver>,
    logger: StatementLogger,
}

impl StatementLogDriver {
    /// Wrap `inner`; argument values are only logged when `log_args` is set
    pub fn new(inner: Arc<dyn Driver>, log_args: bool) -> Self {
        let logger = StatementLogger {
            dialect: inner.dialect().to_string(),
            log_args,
        };
        Self { inner, logger }
    }

    fn wrap_tx(&self, tx: Box<dyn Tx>) -> Box<dyn Tx> {
        let id = Uuid::new_v4();
        self.logger.log_tx("begin", id);
        Box::new(StatementLogTx {
            inner: tx,
            id,
            logger: self.logger.clone(),
        })
    }
}

#[async_trait]
impl Driver for StatementLogDriver {
    fn dialect(&self) -> &str {
        self.inner.dialect()
    }

    async fn exec(
        &self,
        ctx: &Context,
        sql: &str,
        args: &[Value],
        dest: &mut Option<ExecResult>,
    ) -> Result<()> {
        self.logger.log("exec", None, sql, args);
        self.inner.exec(ctx, sql, args, dest).await
    }

    async fn query(
        &self,
        ctx: &Context,
        sql: &str,
        args: &[Value],
        dest: &mut Option<Rows>,
    ) -> Result<()> {
        self.logger.log("query", None, sql, args);
        self.inner.query(ctx, sql, args, dest).await
    }

    async fn tx(&self, ctx: &Context) -> Result<Box<dyn Tx>> {
        let tx = self.inner.tx(ctx).await?;
        Ok(self.wrap_tx(tx))
    }

    async fn close(&self) -> Result<()> {
        self.inner.close().await
    }

    fn as_exec_context(&self) -> Option<&dyn ExecContext> {
        Some(self)
    }

    fn as_query_context(&self) -> Option<&dyn QueryContext> {
        Some(self)
    }

    fn as_begin_tx(&self) -> Option<&dyn BeginTx> {
        Some(self)
    }
}

#[async_trait]
impl ExecContext for StatementLogDriver {
    async fn exec_context(&self, ctx: &Context, sql: &str, args: &[Value]) -> Result<ExecResult> {
        self.logger.log("exec_context", None, sql, args);
        capability::exec_context(self.inner.as_ref(), ctx, sql, args).await
    }
}

#[async_trait]
impl QueryContext for StatementLogDriver {
    async fn query_context(&self, ctx: &Context, sql: &str, args: &[Value]) -> Result<Rows> {
        self.logger.log("query_context", None, sql, args);
        capability::query_context(self.inner.as_ref(), ctx, sql, args).await
    }
}

#[async_trait]
impl BeginTx for StatementLogDriver {
    async fn begin_tx(&self, ctx: &Context, opts: &TxOptions) -> Result<Box<dyn Tx>> {
        let tx = capability::begin_tx(self.inner.as_ref(), ctx, opts).await?;
        Ok(self.wrap_tx(tx))
    }
}

/// Transaction decorator created by [`StatementLogDriver`]
pub struct StatementLogTx {
    inner: Box<dyn Tx>,
    id: Uuid,
    logger: StatementLogger,
}

#[async_trait]
impl Tx for StatementLogTx {
    async fn exec(
        &self,
        ctx: &Context,
        sql: &str,
        args: &[Value],
        dest: &mut Option<ExecResult>,
    ) -> Result<()> {
        self.logger.log("exec", Some(self.id), sql, args);
        self.inner.exec(ctx, sql, args, dest).await
    }

    async fn query(
        &self,
        ctx: &Context,
        sql: &str,
        args: &[Value],
        dest: &mut Option<Rows>,
    ) -> Result<()> {
        self.logger.log("query", Some(self.id), sql, args);
        self.inner.query(ctx, sql, args, dest).await
    }

    async fn commit(self: Box<Self>) -> Result<()> {
        self.logger.log_tx("commit", self.id);
        self.inner.commit().await
    }

    async fn rollback(self: Box<Self>) -> Result<()> {
        self.logger.log_tx("rollback", self.id);
        self.inner.rollback().await
    }
}
