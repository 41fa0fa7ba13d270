//! Tests for the SQL Server compatibility driver

use std::sync::Arc;
use std::time::Duration;

use pretty_assertions::assert_eq;
use rstest::rstest;
use sqlshim_core::{Context, Driver, IsolationLevel, ShimError, TxOptions, Value};
use tokio_util::sync::CancellationToken;

use crate::test_support::{MockDbError, RecordingDriver, sample_exec_result, sample_rows};
use crate::wrap_mssql_compat;

fn args(values: &[i64]) -> Vec<Value> {
    values.iter().copied().map(Value::Int64).collect()
}

#[rstest]
#[case::mysql("mysql")]
#[case::postgres("postgres")]
#[case::sqlite("sqlite3")]
#[case::unknown("oracle")]
fn test_other_dialects_pass_through(#[case] dialect: &str) {
    let inner: Arc<dyn Driver> = Arc::new(RecordingDriver::new(dialect));
    let wrapped = wrap_mssql_compat(inner.clone());
    assert!(Arc::ptr_eq(&inner, &wrapped));
}

#[rstest]
#[case::mssql("mssql")]
#[case::upper("MSSQL")]
#[case::sqlserver("sqlserver")]
#[case::mixed("SqlServer")]
fn test_sql_server_dialects_are_wrapped(#[case] dialect: &str) {
    let inner: Arc<dyn Driver> = Arc::new(RecordingDriver::new(dialect));
    let wrapped = wrap_mssql_compat(inner.clone());
    assert!(!Arc::ptr_eq(&inner, &wrapped));
    assert_eq!(wrapped.dialect(), dialect);
}

#[tokio::test]
async fn test_passed_through_driver_sees_original_text() {
    let mock = Arc::new(RecordingDriver::new("mysql"));
    let driver = wrap_mssql_compat(mock.clone());

    let mut dest = None;
    driver
        .exec(&Context::background(), "DELETE FROM `t` WHERE `id` = ? LIMIT 1", &args(&[1]), &mut dest)
        .await
        .unwrap();

    assert_eq!(mock.last_sql().unwrap(), "DELETE FROM `t` WHERE `id` = ? LIMIT 1");
}

#[tokio::test]
async fn test_exec_rewrites_without_output_clause() {
    let mock = Arc::new(RecordingDriver::new("mssql"));
    let driver = wrap_mssql_compat(mock.clone());
    let values = vec![Value::from("a.txt"), Value::Int64(3)];

    let mut dest = None;
    driver
        .exec(
            &Context::background(),
            "INSERT INTO `files` (`name`, `owner_id`) VALUES (?, ?)",
            &values,
            &mut dest,
        )
        .await
        .unwrap();

    let calls = mock.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].op, "exec");
    assert_eq!(
        calls[0].sql,
        "INSERT INTO [files] ([name], [owner_id]) VALUES (@p1, @p2)"
    );
    assert_eq!(calls[0].args, values);
    assert_eq!(dest, Some(sample_exec_result()));
}

#[tokio::test]
async fn test_query_rewrites_insert_with_output_clause() {
    let mock = Arc::new(RecordingDriver::new("mssql"));
    let driver = wrap_mssql_compat(mock.clone());

    let mut rows = None;
    driver
        .query(
            &Context::background(),
            "INSERT INTO `users` (`email`) VALUES (?)",
            &[Value::from("a@b.c")],
            &mut rows,
        )
        .await
        .unwrap();

    assert_eq!(
        mock.last_sql().unwrap(),
        "INSERT INTO [users] ([email]) OUTPUT INSERTED.[id] VALUES (@p1)"
    );
    assert_eq!(rows, Some(sample_rows()));
}

#[tokio::test]
async fn test_query_rewrites_pagination() {
    let mock = Arc::new(RecordingDriver::new("sqlserver"));
    let driver = wrap_mssql_compat(mock.clone());

    let mut rows = None;
    driver
        .query(
            &Context::background(),
            "SELECT `id` FROM `shares` WHERE `user_id` = ? LIMIT 10 OFFSET 30",
            &args(&[9]),
            &mut rows,
        )
        .await
        .unwrap();

    assert_eq!(
        mock.last_sql().unwrap(),
        "SELECT [id] FROM [shares] WHERE [user_id] = @p1 ORDER BY (SELECT NULL) OFFSET 30 ROWS FETCH NEXT 10 ROWS ONLY"
    );
}

#[tokio::test]
async fn test_exec_context_uses_native_capability() {
    let mock = Arc::new(RecordingDriver::new("mssql"));
    let driver = wrap_mssql_compat(mock.clone());

    let ext = driver.as_exec_context().expect("wrapper offers exec_context");
    let result = ext
        .exec_context(&Context::background(), "UPDATE `t` SET `a` = ?", &args(&[1]))
        .await
        .unwrap();

    assert_eq!(result, sample_exec_result());
    assert_eq!(mock.ops(), vec!["exec_context"]);
    assert_eq!(mock.last_sql().unwrap(), "UPDATE [t] SET [a] = @p1");
}

#[tokio::test]
async fn test_exec_context_falls_back_to_exec() {
    let mock = Arc::new(RecordingDriver::base_only("mssql"));
    let driver = wrap_mssql_compat(mock.clone());

    let ext = driver.as_exec_context().expect("wrapper offers exec_context");
    let result = ext
        .exec_context(&Context::background(), "UPDATE `t` SET `a` = ?", &args(&[1]))
        .await
        .unwrap();

    assert_eq!(result, sample_exec_result());
    assert_eq!(mock.ops(), vec!["exec"]);
    assert_eq!(mock.last_sql().unwrap(), "UPDATE [t] SET [a] = @p1");
}

#[tokio::test]
async fn test_query_context_native_and_fallback_agree() {
    let native = Arc::new(RecordingDriver::new("mssql"));
    let base = Arc::new(RecordingDriver::base_only("mssql"));
    let sql = "SELECT `id` FROM `t` ORDER BY `id` LIMIT 1";

    let mut results = Vec::new();
    for mock in [native.clone(), base.clone()] {
        let driver = wrap_mssql_compat(mock);
        let rows = driver
            .as_query_context()
            .expect("wrapper offers query_context")
            .query_context(&Context::background(), sql, &[])
            .await
            .unwrap();
        results.push(rows);
    }

    assert_eq!(results[0], results[1]);
    assert_eq!(native.ops(), vec!["query_context"]);
    assert_eq!(base.ops(), vec!["query"]);
    assert_eq!(
        base.last_sql().unwrap(),
        "SELECT [id] FROM [t] ORDER BY [id] OFFSET 0 ROWS FETCH NEXT 1 ROWS ONLY"
    );
    assert_eq!(native.last_sql(), base.last_sql());
}

#[tokio::test]
async fn test_fallback_with_empty_destination_is_an_error() {
    let mock = Arc::new(RecordingDriver::base_only("mssql").leaving_destinations_empty());
    let driver = wrap_mssql_compat(mock.clone());
    let ctx = Context::background();

    let err = driver
        .as_query_context()
        .unwrap()
        .query_context(&ctx, "SELECT 1", &[])
        .await
        .unwrap_err();
    assert!(matches!(err, ShimError::MissingCapability(_)));

    let err = driver
        .as_exec_context()
        .unwrap()
        .exec_context(&ctx, "DELETE FROM t", &[])
        .await
        .unwrap_err();
    assert!(matches!(err, ShimError::MissingCapability(_)));
}

#[tokio::test]
async fn test_driver_errors_propagate_verbatim() {
    let mock = Arc::new(RecordingDriver::base_only("mssql").failing_with(2627));
    let driver = wrap_mssql_compat(mock.clone());
    let ctx = Context::background();

    let mut dest = None;
    let err = driver.exec(&ctx, "INSERT INTO t (a) VALUES (1)", &[], &mut dest).await.unwrap_err();
    assert_eq!(err.downcast_native::<MockDbError>(), Some(&MockDbError { code: 2627 }));
    assert!(dest.is_none());

    let err = driver
        .as_query_context()
        .unwrap()
        .query_context(&ctx, "SELECT 1", &[])
        .await
        .unwrap_err();
    assert_eq!(err.downcast_native::<MockDbError>(), Some(&MockDbError { code: 2627 }));

    let err = match driver.tx(&ctx).await {
        Err(err) => err,
        Ok(_) => panic!("transaction should fail"),
    };
    assert_eq!(err.downcast_native::<MockDbError>(), Some(&MockDbError { code: 2627 }));
}

#[tokio::test]
async fn test_transaction_statements_are_rewritten() {
    let mock = Arc::new(RecordingDriver::new("mssql"));
    let driver = wrap_mssql_compat(mock.clone());
    let ctx = Context::background();

    let tx = driver.tx(&ctx).await.unwrap();
    let mut exec_dest = None;
    tx.exec(&ctx, "UPDATE `users` SET `nick` = ? WHERE `id` = ?", &args(&[1, 2]), &mut exec_dest)
        .await
        .unwrap();
    let mut rows = None;
    tx.query(&ctx, "INSERT INTO `groups` (`name`) VALUES (?)", &[Value::from("admin")], &mut rows)
        .await
        .unwrap();
    tx.commit().await.unwrap();

    let calls = mock.calls();
    assert_eq!(
        calls.iter().map(|c| c.op).collect::<Vec<_>>(),
        vec!["tx", "tx.exec", "tx.query", "commit"]
    );
    assert_eq!(calls[1].sql, "UPDATE [users] SET [nick] = @p1 WHERE [id] = @p2");
    assert_eq!(calls[1].args, args(&[1, 2]));
    assert_eq!(
        calls[2].sql,
        "INSERT INTO [groups] ([name]) OUTPUT INSERTED.[id] VALUES (@p1)"
    );
    assert_eq!(rows, Some(sample_rows()));
}

#[tokio::test]
async fn test_begin_tx_forwards_options() {
    let mock = Arc::new(RecordingDriver::new("mssql"));
    let driver = wrap_mssql_compat(mock.clone());
    let ctx = Context::background();
    let opts = TxOptions::default().with_isolation(IsolationLevel::Snapshot);

    let tx = driver
        .as_begin_tx()
        .expect("wrapper offers begin_tx")
        .begin_tx(&ctx, &opts)
        .await
        .unwrap();
    let mut dest = None;
    tx.exec(&ctx, "DELETE FROM `t` WHERE `id` = ?", &args(&[5]), &mut dest)
        .await
        .unwrap();
    tx.rollback().await.unwrap();

    assert_eq!(mock.tx_options(), vec![opts]);
    assert_eq!(mock.ops(), vec!["begin_tx", "tx.exec", "rollback"]);
    assert_eq!(mock.calls()[1].sql, "DELETE FROM [t] WHERE [id] = @p1");
}

#[tokio::test]
async fn test_begin_tx_falls_back_to_plain_tx() {
    let mock = Arc::new(RecordingDriver::base_only("mssql"));
    let driver = wrap_mssql_compat(mock.clone());
    let ctx = Context::background();
    let opts = TxOptions::default().read_only();

    let tx = driver.as_begin_tx().unwrap().begin_tx(&ctx, &opts).await.unwrap();
    let mut rows = None;
    tx.query(&ctx, "SELECT `id` FROM `t` LIMIT 3", &[], &mut rows)
        .await
        .unwrap();

    assert!(mock.tx_options().is_empty());
    assert_eq!(mock.ops(), vec!["tx", "tx.query"]);
    assert_eq!(mock.last_sql().unwrap(), "SELECT TOP 3 [id] FROM [t]");
}

#[tokio::test]
async fn test_transaction_errors_propagate_verbatim() {
    let mock = Arc::new(RecordingDriver::new("mssql").failing_in_tx(1205));
    let driver = wrap_mssql_compat(mock.clone());
    let ctx = Context::background();

    let tx = driver.tx(&ctx).await.unwrap();
    let mut exec_dest = None;
    let err = tx
        .exec(&ctx, "UPDATE `t` SET `a` = ?", &args(&[1]), &mut exec_dest)
        .await
        .unwrap_err();
    assert_eq!(err.downcast_native::<MockDbError>(), Some(&MockDbError { code: 1205 }));
    assert!(exec_dest.is_none());

    let mut rows = None;
    let err = tx
        .query(&ctx, "SELECT `a` FROM `t` LIMIT 1", &[], &mut rows)
        .await
        .unwrap_err();
    assert_eq!(err.downcast_native::<MockDbError>(), Some(&MockDbError { code: 1205 }));
    assert!(rows.is_none());
    tx.rollback().await.unwrap();

    let calls = mock.calls();
    assert_eq!(calls[1].sql, "UPDATE [t] SET [a] = @p1");
    assert_eq!(calls[2].sql, "SELECT TOP 1 [a] FROM [t]");
    assert_eq!(mock.ops(), vec!["tx", "tx.exec", "tx.query", "rollback"]);
}

#[tokio::test]
async fn test_begin_tx_errors_inside_transaction_propagate() {
    let mock = Arc::new(RecordingDriver::new("mssql").failing_in_tx(547));
    let driver = wrap_mssql_compat(mock.clone());
    let ctx = Context::background();

    let tx = driver
        .as_begin_tx()
        .unwrap()
        .begin_tx(&ctx, &TxOptions::default())
        .await
        .unwrap();
    let mut dest = None;
    let err = tx
        .exec(&ctx, "DELETE FROM `t` WHERE `id` = ?", &args(&[3]), &mut dest)
        .await
        .unwrap_err();
    assert_eq!(err.downcast_native::<MockDbError>(), Some(&MockDbError { code: 547 }));
}

#[tokio::test]
async fn test_cancelled_context_is_forwarded() {
    let mock = Arc::new(RecordingDriver::new("mssql"));
    let driver = wrap_mssql_compat(mock.clone());
    let token = CancellationToken::new();
    let ctx = Context::with_cancellation(token.clone());
    token.cancel();

    let mut dest = None;
    let err = driver.exec(&ctx, "SELECT 1", &[], &mut dest).await.unwrap_err();

    assert!(matches!(err, ShimError::Cancelled));
    assert!(mock.calls()[0].cancelled);
}

#[tokio::test]
async fn test_expired_deadline_error_is_forwarded() {
    let mock = Arc::new(RecordingDriver::base_only("mssql"));
    let driver = wrap_mssql_compat(mock.clone());
    let ctx = Context::background().with_timeout(Duration::ZERO);

    let err = driver
        .as_query_context()
        .unwrap()
        .query_context(&ctx, "SELECT `id` FROM `t`", &[])
        .await
        .unwrap_err();

    assert!(matches!(err, ShimError::Timeout(_)));
    assert_eq!(mock.last_sql().unwrap(), "SELECT [id] FROM [t]");
}

#[tokio::test]
async fn test_close_is_forwarded() {
    let mock = Arc::new(RecordingDriver::new("mssql"));
    let driver = wrap_mssql_compat(mock.clone());

    driver.close().await.unwrap();
    assert!(mock.is_closed());

    let mut rows = None;
    let err = driver
        .query(&Context::background(), "SELECT 1", &[], &mut rows)
        .await
        .unwrap_err();
    assert!(matches!(err, ShimError::Connection(_)));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_statements_number_independently() {
    let mock = Arc::new(RecordingDriver::new("mssql"));
    let driver = wrap_mssql_compat(mock.clone());

    let mut handles = Vec::new();
    for n in 0..32i64 {
        let driver = driver.clone();
        handles.push(tokio::spawn(async move {
            let mut dest = None;
            driver
                .exec(
                    &Context::background(),
                    "UPDATE `t` SET `a` = ?, `b` = ? WHERE `id` = ?",
                    &args(&[n, n + 1, n + 2]),
                    &mut dest,
                )
                .await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let calls = mock.calls();
    assert_eq!(calls.len(), 32);
    for call in calls {
        assert_eq!(call.sql, "UPDATE [t] SET [a] = @p1, [b] = @p2 WHERE [id] = @p3");
        assert_eq!(call.args.len(), 3);
        let first = call.args[0].as_i64().unwrap();
        assert_eq!(call.args, args(&[first, first + 1, first + 2]));
    }
}
