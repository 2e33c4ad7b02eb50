//! Command implementations

pub mod config;
pub mod run;

use camino::Utf8Path;
use rafs_reindex_core::{ConfigLoader, JobConfig};

/// Load configuration from the optional file and the environment
pub(crate) fn load_config(path: Option<&Utf8Path>) -> rafs_reindex_core::Result<JobConfig> {
    let loader = match path {
        Some(path) => ConfigLoader::with_file(path),
        None => ConfigLoader::new(),
    };
    loader.load()
}
