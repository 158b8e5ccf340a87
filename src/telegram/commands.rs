//! Text command handlers: /start, /help, /status, /settings

use teloxide::prelude::*;

use crate::core::{config, disk};
use crate::split::{estimate_segments, SplitOptions, Splitter};

/// Format a byte count as megabytes with two decimals
pub fn format_size_mb(bytes: u64) -> String {
    format!("{:.2} MB", bytes as f64 / (1024.0 * 1024.0))
}

/// Format a duration in seconds as minutes with one decimal
pub fn format_duration_min(seconds: f64) -> String {
    format!("{:.1} min", seconds / 60.0)
}

/// Handle /start: greeting with the current settings and workflow
pub async fn handle_start_command(bot: &Bot, msg: &Message, options: &SplitOptions) -> ResponseResult<()> {
    let compression_status = if options.compress { "✅ enabled" } else { "❌ disabled" };

    bot.send_message(
        msg.chat.id,
        format!(
            "🎬 Hi! I'm a video splitting bot.\n\n\
             ⚙️ Current settings:\n\
             ⏱ Segment length: {dur} seconds\n\
             🗜 Compression: {compression}\n\n\
             📤 Send me a video and I will:\n\
             1️⃣ split it into {dur}-second segments\n\
             2️⃣ compress it (if compression is enabled)\n\
             3️⃣ send you back numbered files\n\n\
             💡 Commands:\n\
             /start - this message\n\
             /help - usage help\n\
             /status - server status\n\
             /settings - splitting settings",
            dur = options.segment_duration,
            compression = compression_status,
        ),
    )
    .await?;

    Ok(())
}

/// Handle /help: usage instructions and compression notes
pub async fn handle_help_command(bot: &Bot, msg: &Message, options: &SplitOptions) -> ResponseResult<()> {
    let compression_info = if options.compress {
        "\n🗜 Compression is on - the files will be smaller!\n"
    } else {
        "\n"
    };

    let processing_speed = if options.compress {
        "~2 minutes per 10 minutes of video"
    } else {
        "~30 seconds per 10 minutes of video"
    };

    bot.send_message(
        msg.chat.id,
        format!(
            "📖 How to use the bot:\n\n\
             1️⃣ Send a video (any size or length)\n\
             2️⃣ I split it into {dur}-second segments\n\
             3️⃣ You get numbered files: part_001, part_002...\n\
             {compression_info}\
             💡 Tips:\n\
             • Send as File for maximum quality\n\
             • With compression the files are 50-70% smaller\n\
             • Processing time: {speed}",
            dur = options.segment_duration,
            compression_info = compression_info,
            speed = processing_speed,
        ),
    )
    .await?;

    Ok(())
}

/// Handle /status: free disk space, ffmpeg availability, API key presence
pub async fn handle_status_command(bot: &Bot, msg: &Message, splitter: &Splitter) -> ResponseResult<()> {
    let free_space = match disk::get_disk_space(&config::WORK_DIR) {
        Ok(info) => format!("{:.2} GB", info.available_gb()),
        Err(e) => {
            log::warn!("Failed to check disk space for /status: {}", e);
            "unknown".to_string()
        }
    };

    let ffmpeg_status = if splitter.check_ffmpeg().await {
        "installed"
    } else {
        "NOT FOUND"
    };

    let api_key_status = if config::GROQ_API_KEY.is_some() {
        "configured"
    } else {
        "not configured"
    };

    bot.send_message(
        msg.chat.id,
        format!(
            "✅ The bot is up!\n\n\
             💾 Free space: {free_space}\n\
             ⚙️ FFmpeg: {ffmpeg_status}\n\
             🔑 Groq API: {api_key_status}",
        ),
    )
    .await?;

    Ok(())
}

/// Handle /settings: current splitting configuration with a worked example
pub async fn handle_settings_command(bot: &Bot, msg: &Message, options: &SplitOptions) -> ResponseResult<()> {
    let compression_status = if options.compress {
        "✅ enabled (H.264 re-encode)"
    } else {
        "❌ disabled (fast stream copy)"
    };

    // Worked example: how many parts a 5-minute video produces
    let example_duration_secs = 300.0;
    let num_parts = estimate_segments(example_duration_secs, options.segment_duration);

    let mut settings_text = format!(
        "⚙️ Bot settings:\n\n\
         ⏱ Segment length: {dur} seconds\n\
         🗜 Compression: {compression}\n\
         📦 Max segment size: {max_mb} MB\n\n\
         📊 Example:\n\
         a 5-minute video → {num_parts} segments\n\n",
        dur = options.segment_duration,
        compression = compression_status,
        max_mb = config::validation::MAX_FILE_SIZE_MB,
        num_parts = num_parts,
    );

    if options.compress {
        settings_text.push_str(
            "💡 Compression pros:\n\
             • smaller files (50-70% saved)\n\
             • faster upload and download\n\n\
             ⚠️ Cons:\n\
             • slower processing (~2 min per 10 min of video)\n\
             • slight quality loss (CRF 28)",
        );
    } else {
        settings_text.push_str(
            "⚡ No-compression pros:\n\
             • very fast processing\n\
             • 100% original quality\n\n\
             ⚠️ Cons:\n\
             • large files\n\
             • slower upload",
        );
    }

    bot.send_message(msg.chat.id, settings_text).await?;

    Ok(())
}
