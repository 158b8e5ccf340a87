//! Segmenta - Telegram bot for splitting videos into fixed-duration segments
//!
//! This library provides all the functionality for the Segmenta bot:
//! probing and splitting videos with ffmpeg, per-request scratch directory
//! bookkeeping, and the Telegram handlers that tie it together.
//!
//! # Module Structure
//!
//! - `core`: Configuration, errors, logging, process and disk utilities
//! - `split`: The ffmpeg splitting engine and scratch directory management
//! - `telegram`: Telegram bot integration and handlers

pub mod cli;
pub mod core;
pub mod split;
pub mod telegram;

// Re-export commonly used types for convenience
pub use crate::core::{config, AppError, AppResult};
pub use crate::split::{SplitOptions, Splitter};
pub use crate::telegram::{create_bot, schema, setup_bot_commands, HandlerDeps};
