use std::process::ExitCode;

use sqlx::Connection;

use schema_apply::db::{self, config::DbConfig};
use schema_apply::config::LogConfig;
use schema_apply::logging;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();

    let config = match DbConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Configuration error: {err}");
            return ExitCode::FAILURE;
        }
    };

    let _log_guard = logging::init_tracing(&LogConfig::from_env());

    match db::connect(&config).await {
        Ok(conn) => {
            println!("CONNECTED");
            if let Err(err) = conn.close().await {
                tracing::warn!(error = %err, "failed to close connection");
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            println!("CONNECTION ERROR: {err}");
            ExitCode::FAILURE
        }
    }
}
