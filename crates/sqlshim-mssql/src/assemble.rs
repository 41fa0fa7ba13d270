//! Assembly of the driver stack handed to the ORM

use std::sync::Arc;

use sqlshim_core::Driver;

use crate::{CompatConfig, StatementLogDriver, wrap_mssql_compat};

/// Layers the configured wrappers over a freshly opened driver.
///
/// The statement logger sits directly on the driver and the compatibility
/// rewrites go outside it, so logged statements are the text the database
/// actually receives.
pub fn assemble_driver(driver: Arc<dyn Driver>, config: &CompatConfig) -> Arc<dyn Driver> {
    let mut driver = driver;

    if config.log_statements() {
        driver = Arc::new(StatementLogDriver::new(driver, config.log_args()));
    }

    if config.enabled() {
        driver = wrap_mssql_compat(driver);
    }

    driver
}
