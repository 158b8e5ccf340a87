//! Dispatcher schema and handler dependencies

use std::path::PathBuf;
use std::sync::Arc;

use teloxide::dispatching::{UpdateFilterExt, UpdateHandler};
use teloxide::prelude::*;
use teloxide::types::Message;

use super::bot::Command;
use super::commands::{
    handle_help_command, handle_settings_command, handle_start_command, handle_status_command,
};
use super::videos::{handle_video_upload, is_video_upload};
use crate::core::config;
use crate::split::{SplitOptions, Splitter};

/// Error type for handlers
pub type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Dependencies required by handlers
#[derive(Clone)]
pub struct HandlerDeps {
    pub splitter: Arc<Splitter>,
    pub options: SplitOptions,
    pub work_dir: PathBuf,
}

impl HandlerDeps {
    /// Create new handler dependencies
    pub fn new(splitter: Arc<Splitter>, options: SplitOptions, work_dir: PathBuf) -> Self {
        Self {
            splitter,
            options,
            work_dir,
        }
    }

    /// Dependencies from the process-wide configuration
    pub fn from_config() -> Self {
        Self::new(
            Arc::new(Splitter::from_config()),
            SplitOptions::from_config(),
            PathBuf::from(&*config::WORK_DIR),
        )
    }
}

/// Creates the main dispatcher schema for the Telegram bot.
///
/// This function returns a handler tree that can be used with teloxide's
/// Dispatcher. The same schema is used in production and in tests.
pub fn schema(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    let deps_commands = deps.clone();
    let deps_video = deps;

    dptree::entry()
        // Command handler
        .branch(command_handler(deps_commands))
        // Video/document upload handler
        .branch(video_handler(deps_video))
}

/// Handler for bot commands (/start, /help, /status, /settings)
fn command_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    Update::filter_message().branch(dptree::entry().filter_command::<Command>().endpoint(
        move |bot: Bot, msg: Message, cmd: Command| {
            let deps = deps.clone();
            async move {
                log::info!("🎯 Received command: {:?} from chat {}", cmd, msg.chat.id);

                match cmd {
                    Command::Start => handle_start_command(&bot, &msg, &deps.options).await?,
                    Command::Help => handle_help_command(&bot, &msg, &deps.options).await?,
                    Command::Status => handle_status_command(&bot, &msg, &deps.splitter).await?,
                    Command::Settings => handle_settings_command(&bot, &msg, &deps.options).await?,
                }
                Ok(())
            }
        },
    ))
}

/// Handler for video uploads (Video messages and Documents with video mime)
fn video_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    Update::filter_message()
        .filter(is_video_upload)
        .endpoint(move |bot: Bot, msg: Message| {
            let deps = deps.clone();
            async move {
                log::info!("🎬 Received video upload from chat {}", msg.chat.id);
                handle_video_upload(bot, msg, deps).await?;
                Ok(())
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deps_clone_shares_splitter() {
        let deps = HandlerDeps::new(
            Arc::new(Splitter::new("ffmpeg", "ffprobe")),
            SplitOptions::default(),
            PathBuf::from("/tmp/video_processing"),
        );
        let cloned = deps.clone();
        assert!(Arc::ptr_eq(&deps.splitter, &cloned.splitter));
        assert_eq!(deps.work_dir, cloned.work_dir);
    }
}
