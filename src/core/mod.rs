//! Core utilities: configuration, errors, logging, subprocess and disk helpers

pub mod config;
pub mod disk;
pub mod error;
pub mod logging;
pub mod process;

pub use error::{AppError, AppResult};
pub use logging::init_logger;
