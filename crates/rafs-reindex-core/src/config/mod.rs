//! Configuration loading

mod loader;

pub use loader::{ConfigLoader, CONFIG_PATH_ENV};
