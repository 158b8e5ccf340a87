//! Incoming video handler: download, split, send back numbered segments
//!
//! The whole flow for one upload runs inside a per-user scratch directory
//! that is removed when the handler returns, on success and failure alike.
//! Progress is reported by editing a single status message.

use teloxide::net::Download;
use teloxide::prelude::*;
use teloxide::types::{FileId, InputFile, Message};

use super::commands::{format_duration_min, format_size_mb};
use super::handlers::HandlerDeps;
use crate::core::error::{AppError, AppResult};
use crate::core::{config, disk};
use crate::split::scratch::ScratchDir;
use crate::split::estimate_segments;

/// The video payload of an incoming message
#[derive(Debug, Clone)]
pub struct UploadedVideo {
    pub file_id: FileId,
    pub file_name: String,
    pub file_size: u64,
}

impl UploadedVideo {
    /// Extract the video from a message: either a Video or a Document with
    /// a video mime type.
    pub fn from_message(msg: &Message) -> Option<Self> {
        if let Some(video) = msg.video() {
            return Some(Self {
                file_id: video.file.id.clone(),
                file_name: video
                    .file_name
                    .clone()
                    .unwrap_or_else(|| format!("video_{}.mp4", video.file.unique_id.0)),
                file_size: u64::from(video.file.size),
            });
        }
        if let Some(doc) = msg.document() {
            if is_video_document(doc) {
                return Some(Self {
                    file_id: doc.file.id.clone(),
                    file_name: doc
                        .file_name
                        .clone()
                        .unwrap_or_else(|| format!("video_{}.mp4", doc.file.unique_id.0)),
                    file_size: u64::from(doc.file.size),
                });
            }
        }
        None
    }
}

fn is_video_document(doc: &teloxide::types::Document) -> bool {
    doc.mime_type
        .as_ref()
        .map(|m| m.essence_str().starts_with("video/"))
        .unwrap_or(false)
}

/// Filter predicate for the dispatcher: message carries a video upload
pub fn is_video_upload(msg: Message) -> bool {
    msg.video().is_some() || msg.document().map(is_video_document).unwrap_or(false)
}

/// Scratch directories are keyed by the sender, so two users uploading
/// concurrently in one group chat never share (and tear down) each other's
/// tree. Channel posts carry no sender; those fall back to the chat id.
pub fn scratch_key(msg: &Message) -> i64 {
    msg.from.as_ref().map(|u| u.id.0 as i64).unwrap_or(msg.chat.id.0)
}

/// Handler for an incoming video upload.
///
/// Creates the per-user scratch directory, runs the processing pipeline,
/// and surfaces any failure as a single generic message. The scratch guard
/// guarantees temp files are removed whichever way the pipeline exits.
pub async fn handle_video_upload(bot: Bot, msg: Message, deps: HandlerDeps) -> ResponseResult<()> {
    let Some(upload) = UploadedVideo::from_message(&msg) else {
        bot.send_message(msg.chat.id, "❌ That doesn't look like a video. Please send a video file.")
            .await?;
        return Ok(());
    };

    if let Err(e) = disk::check_disk_space_for_upload() {
        log::error!("Refusing upload from chat {}: {}", msg.chat.id, e);
        bot.send_message(
            msg.chat.id,
            "❌ The server is out of disk space right now. Please try again later.",
        )
        .await?;
        return Ok(());
    }

    let scratch = match ScratchDir::create(&deps.work_dir, scratch_key(&msg)) {
        Ok(s) => s,
        Err(e) => {
            log::error!("Failed to create scratch dir for chat {}: {}", msg.chat.id, e);
            bot.send_message(msg.chat.id, "❌ Something went wrong. Please try again.")
                .await?;
            return Ok(());
        }
    };

    if let Err(e) = process_upload(&bot, &msg, &deps, &scratch, &upload).await {
        log::error!("Failed to process upload from chat {}: {}", msg.chat.id, e);
        let _ = bot
            .send_message(msg.chat.id, "❌ Failed to process the video. Please try again.")
            .await;
    }

    // scratch drops here: per-user temp tree removed whatever happened above
    Ok(())
}

/// The processing pipeline: download, probe, split, send.
async fn process_upload(
    bot: &Bot,
    msg: &Message,
    deps: &HandlerDeps,
    scratch: &ScratchDir,
    upload: &UploadedVideo,
) -> AppResult<()> {
    let chat_id = msg.chat.id;
    let options = &deps.options;

    let status_msg = bot
        .send_message(
            chat_id,
            format!("⏳ Receiving the video...\n📦 Size: {}", format_size_mb(upload.file_size)),
        )
        .await?;

    // Download the file from Telegram into the scratch directory
    let file = bot.get_file(upload.file_id.clone()).await?;
    let input_path = scratch.input_path(&upload.file_name);
    let mut dst = tokio::fs::File::create(&input_path).await?;
    bot.download_file(&file.path, &mut dst).await?;
    log::info!(
        "📥 Downloaded {} ({}) for chat {}",
        input_path.display(),
        format_size_mb(upload.file_size),
        chat_id
    );

    // Probe the duration; a probe failure is not fatal (estimate degrades to 1)
    let duration = match deps.splitter.probe_duration(&input_path).await {
        Ok(d) => d,
        Err(e) => {
            log::warn!("Failed to probe duration of {}: {}", input_path.display(), e);
            0.0
        }
    };
    let num_parts_estimate = estimate_segments(duration, options.segment_duration);

    let compression_note = if options.compress {
        "\n🗜 Compression is on - this will take a while..."
    } else {
        ""
    };
    bot.edit_message_text(
        chat_id,
        status_msg.id,
        format!(
            "✅ Video received!\n\
             ⏱ Length: {}\n\
             📊 Expecting: ~{} segments\n\
             ✂️ Splitting...{}",
            format_duration_min(duration),
            num_parts_estimate,
            compression_note,
        ),
    )
    .await?;

    // Split into the output subdirectory
    let output_dir = scratch.output_dir()?;
    let parts = match deps.splitter.split(&input_path, &output_dir, options).await {
        Ok(parts) => parts,
        Err(e) => {
            log::error!("Split failed for chat {}: {}", chat_id, e);
            bot.edit_message_text(chat_id, status_msg.id, "❌ Failed to split the video. Please try again.")
                .await?;
            return Ok(());
        }
    };

    // Report the result, including size savings when re-encoding
    if options.compress {
        let original_size = tokio::fs::metadata(&input_path).await.map(|m| m.len()).unwrap_or(0);
        let mut total_parts_size: u64 = 0;
        for part in &parts {
            total_parts_size += tokio::fs::metadata(part).await.map(|m| m.len()).unwrap_or(0);
        }
        let saved_percent = if original_size > 0 {
            (original_size.saturating_sub(total_parts_size)) as f64 / original_size as f64 * 100.0
        } else {
            0.0
        };

        bot.edit_message_text(
            chat_id,
            status_msg.id,
            format!(
                "✅ Splitting finished!\n\
                 📤 Sending {} segments...\n\
                 💾 Original size: {}\n\
                 💾 New size: {}\n\
                 🎉 Saved: {:.1}%",
                parts.len(),
                format_size_mb(original_size),
                format_size_mb(total_parts_size),
                saved_percent,
            ),
        )
        .await?;
    } else {
        bot.edit_message_text(
            chat_id,
            status_msg.id,
            format!("✅ Splitting finished!\n📤 Sending {} segments...", parts.len()),
        )
        .await?;
    }

    // Send each part independently; one failed send must not abort the rest
    let total = parts.len();
    let mut sent = 0usize;
    for (i, part_path) in parts.iter().enumerate() {
        let index = i + 1;
        match send_part(bot, chat_id, deps, part_path, index, total).await {
            Ok(()) => sent += 1,
            Err(e) => {
                log::error!("Failed to send part {}/{} to chat {}: {}", index, total, chat_id, e);
                let _ = bot
                    .send_message(chat_id, format!("❌ Failed to send part {}", index))
                    .await;
            }
        }
    }

    bot.edit_message_text(
        chat_id,
        status_msg.id,
        format!("✅ Done!\n📦 Sent {} of {} segments", sent, total),
    )
    .await?;

    Ok(())
}

/// Send a single segment with its caption
async fn send_part(
    bot: &Bot,
    chat_id: ChatId,
    deps: &HandlerDeps,
    part_path: &std::path::Path,
    index: usize,
    total: usize,
) -> AppResult<()> {
    let part_duration = deps.splitter.probe_duration(part_path).await.unwrap_or(0.0);
    let part_size = tokio::fs::metadata(part_path).await.map(|m| m.len()).unwrap_or(0);

    if part_size > config::validation::MAX_FILE_SIZE_BYTES {
        return Err(AppError::Validation(format!(
            "segment {} is {} (over the {} MB limit)",
            index,
            format_size_mb(part_size),
            config::validation::MAX_FILE_SIZE_MB
        )));
    }

    bot.send_video(chat_id, InputFile::file(part_path.to_path_buf()))
        .caption(part_caption(index, total, part_duration, part_size))
        .supports_streaming(true)
        .await?;

    Ok(())
}

/// Caption for one sent segment: "Part i/n" plus duration and size
pub fn part_caption(index: usize, total: usize, duration_secs: f64, size_bytes: u64) -> String {
    format!(
        "🎬 Part {}/{}\n⏱ {} | 💾 {}",
        index,
        total,
        format_duration_min(duration_secs),
        format_size_mb(size_bytes),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_part_caption() {
        let caption = part_caption(2, 10, 30.0, 5 * 1024 * 1024);
        assert_eq!(caption, "🎬 Part 2/10\n⏱ 0.5 min | 💾 5.00 MB");
    }

    #[test]
    fn test_part_caption_zero_duration() {
        // Probe failures degrade to a zero duration, never a missing caption
        let caption = part_caption(1, 1, 0.0, 1024 * 1024);
        assert!(caption.starts_with("🎬 Part 1/1"));
        assert!(caption.contains("0.0 min"));
    }

    #[test]
    fn test_scratch_key_is_the_sender_in_a_group() {
        // Two users in one group chat must get distinct scratch trees,
        // so the key is the sender id, not the (shared) chat id.
        let msg: Message = serde_json::from_str(
            r#"{
                "message_id": 199,
                "date": 1568289890,
                "chat": {"id": -100123456, "type": "group", "title": "movie night"},
                "from": {"id": 777000, "is_bot": false, "first_name": "Ann"},
                "text": "hi"
            }"#,
        )
        .unwrap();
        assert_eq!(scratch_key(&msg), 777000);
    }

    #[test]
    fn test_scratch_key_falls_back_to_chat_for_channel_posts() {
        let msg: Message = serde_json::from_str(
            r#"{
                "message_id": 7,
                "date": 1568289890,
                "chat": {"id": -100987654, "type": "channel", "title": "clips"},
                "text": "hi"
            }"#,
        )
        .unwrap();
        assert_eq!(scratch_key(&msg), -100987654);
    }
}
