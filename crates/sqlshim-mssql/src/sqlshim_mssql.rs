//! SQL Server compatibility layer for ORM drivers
//!
//! Decorates a [`sqlshim_core::Driver`] so that MySQL-style statements from
//! the ORM run against SQL Server. Drivers for any other dialect are left
//! exactly as they are.
//!
//! # Example
//!
//! ```ignore
//! use sqlshim_mssql::{assemble_driver, CompatConfig};
//!
//! let config = CompatConfig::from_toml_str(&std::fs::read_to_string("db.toml")?)?;
//! let driver = assemble_driver(open_sqlserver_driver()?, &config);
//!
//! // SELECT TOP 10 * FROM [users] WHERE [name] = @p1
//! driver.query(&ctx, "SELECT * FROM `users` WHERE `name` = ? LIMIT 10", &args, &mut rows).await?;
//! ```

mod assemble;
mod capability;
mod compat;
mod config;
mod statement_log;

#[cfg(test)]
mod compat_tests;
#[cfg(test)]
mod statement_log_tests;
#[cfg(test)]
mod test_support;

pub use assemble::assemble_driver;
pub use compat::{MssqlCompatDriver, MssqlCompatTx, wrap_mssql_compat};
pub use config::CompatConfig;
pub use statement_log::{STATEMENT_LOG_TARGET, StatementLogDriver, StatementLogTx};
