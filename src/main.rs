use std::process::ExitCode;

use schema_apply::{apply_schema, logging, Config};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Configuration error: {err}");
            return ExitCode::FAILURE;
        }
    };

    let _log_guard = logging::init_tracing(&config.log);

    match apply_schema(&config).await {
        Ok(_) => {
            println!("Schema applied successfully.");
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!(error = %err, "schema apply aborted");
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
