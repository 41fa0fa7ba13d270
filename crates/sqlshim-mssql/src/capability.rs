//! Extended-operation dispatch with fallback to the base operations
//!
//! A wrapped driver may or may not implement the context-aware variants.
//! These helpers use the variant when it is there and otherwise run the base
//! operation with a fresh destination slot, handing back whatever the driver
//! stored in it.

use sqlshim_core::{Context, Driver, ExecResult, Result, Rows, ShimError, Tx, TxOptions, Value};

pub(crate) async fn exec_context(
    driver: &dyn Driver,
    ctx: &Context,
    sql: &str,
    args: &[Value],
) -> Result<ExecResult> {
    if let Some(ext) = driver.as_exec_context() {
        return ext.exec_context(ctx, sql, args).await;
    }

    let mut dest = None;
    driver.exec(ctx, sql, args, &mut dest).await?;
    dest.ok_or_else(|| missing(driver, "exec_context", "exec"))
}

pub(crate) async fn query_context(
    driver: &dyn Driver,
    ctx: &Context,
    sql: &str,
    args: &[Value],
) -> Result<Rows> {
    if let Some(ext) = driver.as_query_context() {
        return ext.query_context(ctx, sql, args).await;
    }

    let mut dest = None;
    driver.query(ctx, sql, args, &mut dest).await?;
    dest.ok_or_else(|| missing(driver, "query_context", "query"))
}

pub(crate) async fn begin_tx(
    driver: &dyn Driver,
    ctx: &Context,
    opts: &TxOptions,
) -> Result<Box<dyn Tx>> {
    if let Some(ext) = driver.as_begin_tx() {
        return ext.begin_tx(ctx, opts).await;
    }

    if *opts != TxOptions::default() {
        tracing::debug!(
            dialect = %driver.dialect(),
            ?opts,
            "driver cannot begin with options, starting a default transaction"
        );
    }
    driver.tx(ctx).await
}

fn missing(driver: &dyn Driver, extended: &str, base: &str) -> ShimError {
    tracing::error!(
        dialect = %driver.dialect(),
        extended,
        base,
        "wrapped driver produced no result"
    );
    ShimError::MissingCapability(format!(
        "{} driver implements no {extended} and its {base} left the destination empty",
        driver.dialect()
    ))
}
