//! sqlshim core - driver contract shared by the shim crates
//!
//! This crate defines what a database driver looks like to the ORM layer
//! and to the wrappers that decorate it:
//!
//! - `Driver` - required operations plus optional capability accessors
//! - `ExecContext`, `QueryContext`, `BeginTx` - optional extended capabilities
//! - `Tx` - transaction handle
//! - `Context` - caller cancellation/deadline, passed through untouched
//! - `Value`, `Rows`, `ExecResult` and the `ShimError` type

mod context;
mod dialect;
mod driver;
mod error;
mod transaction;
mod types;

pub use context::*;
pub use dialect::*;
pub use driver::*;
pub use error::*;
pub use transaction::*;
pub use types::*;
