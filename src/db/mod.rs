pub mod apply;
pub mod config;
pub mod statements;

use std::sync::Once;
use std::time::Duration;

use sqlx::{AnyConnection, Connection};
use thiserror::Error;

use crate::db::config::DbConfig;

static INSTALL_DRIVERS: Once = Once::new();

/// Opens the single connection used for a run.
///
/// No transaction is started, so every statement executed on the returned
/// connection commits on its own.
pub async fn connect(config: &DbConfig) -> Result<AnyConnection, ConnectError> {
    INSTALL_DRIVERS.call_once(sqlx::any::install_default_drivers);

    let url = config.connection_url();
    let timeout = config.connect_timeout;

    tracing::debug!(target_db = %config.redacted_target(), ?timeout, "connecting");

    match tokio::time::timeout(timeout, AnyConnection::connect(&url)).await {
        Ok(Ok(conn)) => Ok(conn),
        Ok(Err(err)) => Err(ConnectError::Sqlx(err)),
        Err(_) => Err(ConnectError::Timeout(timeout)),
    }
}

#[derive(Debug, Error)]
pub enum ConnectError {
    #[error("timed out after {0:?}")]
    Timeout(Duration),
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}
