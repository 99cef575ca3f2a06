#![warn(clippy::uninlined_format_args)]

pub mod env_config;
pub mod snapshot_loader;

pub use env_config::{ConfigError, settings_from_env, settings_from_lookup};
pub use snapshot_loader::{
    LoadWarning, LoadedSnapshot, SnapshotLoadError, load_snapshot, parse_snapshot,
};
