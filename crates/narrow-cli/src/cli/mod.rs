pub mod commands;
pub mod config;
pub mod protocol;

pub use commands::run_command;
pub use config::{snapshot_path, Snapshot};
pub use protocol::CliCommand;
