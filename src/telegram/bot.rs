//! Bot initialization and command definitions
//!
//! This module contains:
//! - Command enum definition
//! - Bot instance creation (TELEGRAM_TOKEN, optional local Bot API server)
//! - Command registration in the Telegram UI

use reqwest::ClientBuilder;
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;

use crate::core::config;

/// Bot commands enum with descriptions
#[derive(BotCommands, Clone, Debug)]
#[command(rename_rule = "lowercase", description = "I can:")]
pub enum Command {
    #[command(description = "greeting and current settings")]
    Start,
    #[command(description = "how to use the bot")]
    Help,
    #[command(description = "server status")]
    Status,
    #[command(description = "splitting settings")]
    Settings,
}

/// Creates a Bot instance with custom or default API URL
///
/// The token is read from TELEGRAM_TOKEN (falling back to teloxide's
/// conventional TELOXIDE_TOKEN). BOT_API_URL switches the bot to a local
/// Bot API server.
///
/// # Returns
/// * `Ok(Bot)` - Successfully created bot instance
/// * `Err(anyhow::Error)` - Missing token, invalid URL, or client build failure
pub fn create_bot() -> anyhow::Result<Bot> {
    let token = std::env::var("TELEGRAM_TOKEN")
        .or_else(|_| std::env::var("TELOXIDE_TOKEN"))
        .map_err(|_| anyhow::anyhow!("TELEGRAM_TOKEN environment variable not set"))?;

    let client = ClientBuilder::new().timeout(config::network::timeout()).build()?;

    let bot = if let Ok(bot_api_url) = std::env::var("BOT_API_URL") {
        log::info!("Using custom Bot API URL: {}", bot_api_url);
        let url = url::Url::parse(&bot_api_url).map_err(|e| anyhow::anyhow!("Invalid BOT_API_URL: {}", e))?;
        Bot::with_client(token, client).set_api_url(url)
    } else {
        Bot::with_client(token, client)
    };

    Ok(bot)
}

/// Sets up bot commands in Telegram UI
///
/// # Arguments
/// * `bot` - Bot instance to configure
///
/// # Returns
/// * `Ok(())` - Commands set successfully
/// * `Err(RequestError)` - Failed to set commands
pub async fn setup_bot_commands(bot: &Bot) -> Result<(), teloxide::RequestError> {
    use teloxide::types::BotCommand;

    bot.set_my_commands(vec![
        BotCommand::new("start", "greeting and current settings"),
        BotCommand::new("help", "how to use the bot"),
        BotCommand::new("status", "server status"),
        BotCommand::new("settings", "splitting settings"),
    ])
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_descriptions() {
        let commands = Command::descriptions();
        let command_list = format!("{}", commands);

        assert!(command_list.contains("I can"));
        assert!(command_list.contains("start"));
        assert!(command_list.contains("help"));
        assert!(command_list.contains("status"));
        assert!(command_list.contains("settings"));
    }

    #[test]
    fn test_command_parsing() {
        let cmd = Command::parse("/settings", "segmenta_bot").unwrap();
        assert!(matches!(cmd, Command::Settings));

        let cmd = Command::parse("/start", "segmenta_bot").unwrap();
        assert!(matches!(cmd, Command::Start));
    }
}
