use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "segmenta")]
#[command(author, version, about = "Telegram bot that splits videos into fixed-duration segments", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the Telegram bot (long polling)
    Run,

    /// Split a local video file without Telegram
    Split {
        /// Input video file
        input: String,

        /// Output directory for the segments (defaults to the current directory)
        #[arg(short, long)]
        output: Option<String>,

        /// Segment length in seconds
        #[arg(short, long)]
        duration: Option<u64>,

        /// Re-encode segments with H.264/AAC instead of stream copy
        #[arg(long)]
        compress: bool,
    },

    /// Print the duration of a local video file in seconds
    Probe {
        /// Input video file
        input: String,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
