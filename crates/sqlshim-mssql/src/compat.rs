//! SQL Server compatibility driver
//!
//! The ORM emits MySQL-style statements (back-tick identifiers, `?`
//! placeholders, `LIMIT`) even when its driver reports the `mssql` dialect.
//! [`wrap_mssql_compat`] puts a rewriting layer in front of such a driver;
//! every statement passes through the rewrite pipeline before it reaches the
//! wrapped driver, including statements run inside transactions. Arguments,
//! context, destinations and errors pass through untouched.

use std::sync::Arc;

use async_trait::async_trait;
use sqlshim_core::{
    BeginTx, Context, Dialect, Driver, ExecContext, ExecResult, QueryContext, Result, Rows, Tx,
    TxOptions, Value,
};
use sqlshim_rewrite::{rewrite_exec, rewrite_query};

use crate::capability;

/// Wraps `driver` with the SQL Server rewrites when it reports the `mssql`
/// or `sqlserver` dialect.
///
/// For every other dialect the same `Arc` is returned and nothing is
/// allocated, so call sites can apply this unconditionally.
pub fn wrap_mssql_compat(driver: Arc<dyn Driver>) -> Arc<dyn Driver> {
    let dialect = Dialect::from_label(driver.dialect());
    if !dialect.is_mssql() {
        tracing::debug!(%dialect, "no SQL Server rewrites needed, driver passed through");
        return driver;
    }

    tracing::debug!(
        reported = %driver.dialect(),
        "installing SQL Server compatibility rewrites"
    );
    Arc::new(MssqlCompatDriver::new(driver))
}

/// Driver decorator that rewrites statements into T-SQL.
///
/// Prefer [`wrap_mssql_compat`], which only wraps SQL Server drivers.
pub struct MssqlCompatDriver {
    inner: Arc<dyn Driver>,
}

impl MssqlCompatDriver {
    /// Wrap `inner` without checking its dialect
    pub fn new(inner: Arc<dyn Driver>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl Driver for MssqlCompatDriver {
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
        self.inner.exec(ctx, &rewrite_exec(sql), args, dest).await
    }

    async fn query(
        &self,
        ctx: &Context,
        sql: &str,
        args: &[Value],
        dest: &mut Option<Rows>,
    ) -> Result<()> {
        self.inner.query(ctx, &rewrite_query(sql), args, dest).await
    }

    async fn tx(&self, ctx: &Context) -> Result<Box<dyn Tx>> {
        let tx = self.inner.tx(ctx).await?;
        Ok(Box::new(MssqlCompatTx::new(tx)))
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
impl ExecContext for MssqlCompatDriver {
    async fn exec_context(&self, ctx: &Context, sql: &str, args: &[Value]) -> Result<ExecResult> {
        capability::exec_context(self.inner.as_ref(), ctx, &rewrite_exec(sql), args).await
    }
}

#[async_trait]
impl QueryContext for MssqlCompatDriver {
    async fn query_context(&self, ctx: &Context, sql: &str, args: &[Value]) -> Result<Rows> {
        capability::query_context(self.inner.as_ref(), ctx, &rewrite_query(sql), args).await
    }
}

#[async_trait]
impl BeginTx for MssqlCompatDriver {
    async fn begin_tx(&self, ctx: &Context, opts: &TxOptions) -> Result<Box<dyn Tx>> {
        let tx = capability::begin_tx(self.inner.as_ref(), ctx, opts).await?;
        Ok(Box::new(MssqlCompatTx::new(tx)))
    }
}

impl std::fmt::Debug for MssqlCompatDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MssqlCompatDriver")
            .field("dialect", &self.inner.dialect())
            .finish()
    }
}

/// Transaction decorator applying the same rewrites as [`MssqlCompatDriver`]
pub struct MssqlCompatTx {
    inner: Box<dyn Tx>,
}

impl MssqlCompatTx {
    pub fn new(inner: Box<dyn Tx>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl Tx for MssqlCompatTx {
    async fn exec(
        &self,
        ctx: &Context,
        sql: &str,
        args: &[Value],
        dest: &mut Option<ExecResult>,
    ) -> Result<()> {
        self.inner.exec(ctx, &rewrite_exec(sql), args, dest).await
    }

    async fn query(
        &self,
        ctx: &Context,
        sql: &str,
        args: &[Value],
        dest: &mut Option<Rows>,
    ) -> Result<()> {
        self.inner.query(ctx, &rewrite_query(sql), args, dest).await
    }

    async fn commit(self: Box<Self>) -> Result<()> {
        self.inner.commit().await
    }

    async fn rollback(self: Box<Self>) -> Result<()> {
        self.inner.rollback().await
    }
}
