//! Recording mock driver shared by the wrapper tests

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use sqlshim_core::{
    BeginTx, ColumnMeta, Context, Driver, ExecContext, ExecResult, QueryContext, Result, Row,
    Rows, ShimError, Tx, TxOptions, Value,
};

/// Error type standing in for a driver's own errors
#[derive(Debug, thiserror::Error, PartialEq)]
#[error("mock database error {code}")]
pub(crate) struct MockDbError {
    pub code: i32,
}

/// One call observed by the mock
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Call {
    pub op: &'static str,
    pub sql: String,
    pub args: Vec<Value>,
    pub cancelled: bool,
}

#[derive(Default)]
struct Shared {
    calls: Mutex<Vec<Call>>,
    tx_options: Mutex<Vec<TxOptions>>,
}

impl Shared {
    fn record(&self, op: &'static str, ctx: &Context, sql: &str, args: &[Value]) {
        self.calls.lock().push(Call {
            op,
            sql: sql.to_string(),
            args: args.to_vec(),
            cancelled: ctx.cancellation_token().is_cancelled(),
        });
    }
}

/// Mock driver that records every statement and can be configured to lack
/// capabilities, fail, or forget to fill its destinations.
///
/// Like a real driver it honours the call context: a cancelled context fails
/// with [`ShimError::Cancelled`], an expired deadline with
/// [`ShimError::Timeout`], and any call after `close` with
/// [`ShimError::Connection`].
pub(crate) struct RecordingDriver {
    dialect: String,
    exec_context: bool,
    query_context: bool,
    begin_tx: bool,
    fill_destinations: bool,
    fail_code: Option<i32>,
    tx_fail_code: Option<i32>,
    closed: AtomicBool,
    shared: Arc<Shared>,
}

impl RecordingDriver {
    /// A driver with every optional capability
    pub fn new(dialect: &str) -> Self {
        Self {
            dialect: dialect.to_string(),
            exec_context: true,
            query_context: true,
            begin_tx: true,
            fill_destinations: true,
            fail_code: None,
            tx_fail_code: None,
            closed: AtomicBool::new(false),
            shared: Arc::new(Shared::default()),
        }
    }

    /// A driver implementing only the required operations
    pub fn base_only(dialect: &str) -> Self {
        Self {
            exec_context: false,
            query_context: false,
            begin_tx: false,
            ..Self::new(dialect)
        }
    }

    /// Base operations succeed without storing anything in the destination
    pub fn leaving_destinations_empty(mut self) -> Self {
        self.fill_destinations = false;
        self
    }

    /// Every statement fails with `MockDbError { code }`
    pub fn failing_with(mut self, code: i32) -> Self {
        self.fail_code = Some(code);
        self
    }

    /// Transactions begin normally but every statement inside them fails
    /// with `MockDbError { code }`
    pub fn failing_in_tx(mut self, code: i32) -> Self {
        self.tx_fail_code = Some(code);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.shared.calls.lock().clone()
    }

    pub fn ops(&self) -> Vec<&'static str> {
        self.shared.calls.lock().iter().map(|c| c.op).collect()
    }

    pub fn last_sql(&self) -> Option<String> {
        self.shared.calls.lock().last().map(|c| c.sql.clone())
    }

    pub fn tx_options(&self) -> Vec<TxOptions> {
        self.shared.tx_options.lock().clone()
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    fn outcome(&self, ctx: &Context) -> Result<()> {
        if self.is_closed() {
            return Err(ShimError::Connection("driver is closed".to_string()));
        }
        statement_outcome(ctx, self.fail_code)
    }

    fn new_tx(&self) -> Box<dyn Tx> {
        Box::new(RecordingTx {
            shared: self.shared.clone(),
            fail_code: self.tx_fail_code.or(self.fail_code),
        })
    }
}

fn statement_outcome(ctx: &Context, fail_code: Option<i32>) -> Result<()> {
    if ctx.cancellation_token().is_cancelled() {
        return Err(ShimError::Cancelled);
    }
    if ctx.remaining() == Some(Duration::ZERO) {
        return Err(ShimError::Timeout("statement deadline exceeded".to_string()));
    }
    match fail_code {
        Some(code) => Err(ShimError::native(MockDbError { code })),
        None => Ok(()),
    }
}

pub(crate) fn sample_exec_result() -> ExecResult {
    ExecResult {
        rows_affected: 1,
        last_insert_id: Some(7),
    }
}

pub(crate) fn sample_rows() -> Rows {
    Rows::new(
        vec![ColumnMeta::new("id", "bigint", 0)],
        vec![Row::new(vec!["id".to_string()], vec![Value::Int64(7)])],
    )
}

#[async_trait]
impl Driver for RecordingDriver {
    fn dialect(&self) -> &str {
        &self.dialect
    }

    async fn exec(
        &self,
        ctx: &Context,
        sql: &str,
        args: &[Value],
        dest: &mut Option<ExecResult>,
    ) -> Result<()> {
        self.shared.record("exec", ctx, sql, args);
        self.outcome(ctx)?;
        if self.fill_destinations {
            *dest = Some(sample_exec_result());
        }
        Ok(())
    }

    async fn query(
        &self,
        ctx: &Context,
        sql: &str,
        args: &[Value],
        dest: &mut Option<Rows>,
    ) -> Result<()> {
        self.shared.record("query", ctx, sql, args);
        self.outcome(ctx)?;
        if self.fill_destinations {
            *dest = Some(sample_rows());
        }
        Ok(())
    }

    async fn tx(&self, ctx: &Context) -> Result<Box<dyn Tx>> {
        self.shared.record("tx", ctx, "", &[]);
        self.outcome(ctx)?;
        Ok(self.new_tx())
    }

    async fn close(&self) -> Result<()> {
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn as_exec_context(&self) -> Option<&dyn ExecContext> {
        if self.exec_context { Some(self) } else { None }
    }

    fn as_query_context(&self) -> Option<&dyn QueryContext> {
        if self.query_context { Some(self) } else { None }
    }

    fn as_begin_tx(&self) -> Option<&dyn BeginTx> {
        if self.begin_tx { Some(self) } else { None }
    }
}

#[async_trait]
impl ExecContext for RecordingDriver {
    async fn exec_context(&self, ctx: &Context, sql: &str, args: &[Value]) -> Result<ExecResult> {
        self.shared.record("exec_context", ctx, sql, args);
        self.outcome(ctx)?;
        Ok(sample_exec_result())
    }
}

#[async_trait]
impl QueryContext for RecordingDriver {
    async fn query_context(&self, ctx: &Context, sql: &str, args: &[Value]) -> Result<Rows> {
        self.shared.record("query_context", ctx, sql, args);
        self.outcome(ctx)?;
        Ok(sample_rows())
    }
}

#[async_trait]
impl BeginTx for RecordingDriver {
    async fn begin_tx(&self, ctx: &Context, opts: &TxOptions) -> Result<Box<dyn Tx>> {
        self.shared.record("begin_tx", ctx, "", &[]);
        self.shared.tx_options.lock().push(*opts);
        self.outcome(ctx)?;
        Ok(self.new_tx())
    }
}

struct RecordingTx {
    shared: Arc<Shared>,
    fail_code: Option<i32>,
}

impl RecordingTx {
    fn outcome(&self, ctx: &Context) -> Result<()> {
        statement_outcome(ctx, self.fail_code)
    }
}

#[async_trait]
impl Tx for RecordingTx {
    async fn exec(
        &self,
        ctx: &Context,
        sql: &str,
        args: &[Value],
        dest: &mut Option<ExecResult>,
    ) -> Result<()> {
        self.shared.record("tx.exec", ctx, sql, args);
        self.outcome(ctx)?;
        *dest = Some(sample_exec_result());
        Ok(())
    }

    async fn query(
        &self,
        ctx: &Context,
        sql: &str,
        args: &[Value],
        dest: &mut Option<Rows>,
    ) -> Result<()> {
        self.shared.record("tx.query", ctx, sql, args);
        self.outcome(ctx)?;
        *dest = Some(sample_rows());
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<()> {
        self.shared.calls.lock().push(Call {
            op: "commit",
            sql: String::new(),
            args: Vec::new(),
            cancelled: false,
        });
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<()> {
        self.shared.calls.lock().push(Call {
            op: "rollback",
            sql: String::new(),
            args: Vec::new(),
            cancelled: false,
        });
        Ok(())
    }
}
