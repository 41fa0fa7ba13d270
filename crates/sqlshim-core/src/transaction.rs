//! Transaction handle and options

use crate::{Context, ExecResult, Result, Rows, Value};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Isolation levels understood by the supported engines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IsolationLevel {
    ReadUncommitted,
    ReadCommitted,
    RepeatableRead,
    /// SQL Server row-versioning isolation
    Snapshot,
    Serializable,
}

impl IsolationLevel {
    /// The level as written in `SET TRANSACTION ISOLATION LEVEL ...`
    pub fn as_sql(&self) -> &'static str {
        match self {
            IsolationLevel::ReadUncommitted => "READ UNCOMMITTED",
            IsolationLevel::ReadCommitted => "READ COMMITTED",
            IsolationLevel::RepeatableRead => "REPEATABLE READ",
            IsolationLevel::Snapshot => "SNAPSHOT",
            IsolationLevel::Serializable => "SERIALIZABLE",
        }
    }
}

/// Options for [`crate::BeginTx::begin_tx`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxOptions {
    /// Isolation level, engine default when `None`
    #[serde(default)]
    pub isolation: Option<IsolationLevel>,
    #[serde(default)]
    pub read_only: bool,
}

impl TxOptions {
    pub fn with_isolation(mut self, level: IsolationLevel) -> Self {
        self.isolation = Some(level);
        self
    }

    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }
}

/// A database transaction
#[async_trait]
pub trait Tx: Send + Sync {
    /// Execute a statement within the transaction
    async fn exec(
        &self,
        ctx: &Context,
        sql: &str,
        args: &[Value],
        dest: &mut Option<ExecResult>,
    ) -> Result<()>;

    /// Execute a query within the transaction
    async fn query(
        &self,
        ctx: &Context,
        sql: &str,
        args: &[Value],
        dest: &mut Option<Rows>,
    ) -> Result<()>;

    /// Commit the transaction
    async fn commit(self: Box<Self>) -> Result<()>;

    /// Rollback the transaction
    async fn rollback(self: Box<Self>) -> Result<()>;
}
