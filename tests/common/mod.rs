#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

use schema_apply::config::{LogConfig, SchemaConfig};
use schema_apply::db::config::DbConfig;
use schema_apply::Config;

pub fn sqlite_url(db_path: &Path) -> String {
    format!("sqlite:{}?mode=rwc", db_path.display())
}

pub fn write_schema(dir: &Path, sql: &str) -> PathBuf {
    let path = dir.join("schema.sql");
    std::fs::write(&path, sql).expect("failed to write schema file");
    path
}

pub fn test_config(schema_path: PathBuf, url: String, database: Option<&str>) -> Config {
    Config {
        log: LogConfig {
            level: "debug".to_string(),
            file_enabled: false,
            dir: PathBuf::from("./logs"),
        },
        schema: SchemaConfig {
            path: schema_path,
            placeholder: "controle_estoque".to_string(),
        },
        db: DbConfig {
            host: "localhost".to_string(),
            port: 3306,
            user: String::new(),
            password: String::new(),
            database: database.map(str::to_string),
            url: Some(url),
            connect_timeout: Duration::from_secs(5),
        },
    }
}

pub async fn open_pool(db_path: &Path) -> SqlitePool {
    let options = SqliteConnectOptions::from_str(&sqlite_url(db_path))
        .expect("invalid sqlite url")
        .create_if_missing(true);

    SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .expect("failed to open sqlite pool")
}

pub async fn table_exists(pool: &SqlitePool, name: &str) -> bool {
    let found: Option<String> =
        sqlx::query_scalar(r#"SELECT "name" FROM "sqlite_master" WHERE "type" = 'table' AND "name" = ?"#)
            .bind(name)
            .fetch_optional(pool)
            .await
            .expect("failed to query sqlite_master");
    found.is_some()
}
