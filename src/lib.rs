pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliConfig, Command};

pub use adapters::{FileStore, MemoryStore};
pub use config::TomlConfig;
pub use crate::core::aggregate::RoundingMode;
pub use crate::core::service::RatingService;
pub use crate::core::validator::validate;
pub use domain::session::Session;
pub use utils::error::{ErrorKind, RatingError, Result};
