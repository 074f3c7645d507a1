pub mod config;
pub mod db;
pub mod logging;

pub use config::Config;
pub use db::apply::{apply_schema, ApplyError, ApplyReport};
