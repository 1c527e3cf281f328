//! `caption-alchemist`: generate TikTok captions and hashtags from the terminal.

mod app;

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use caption_alchemist::config::AppConfig;
use caption_alchemist::history::DEFAULT_HISTORY_LIMIT;
use caption_alchemist::primitives::{GenerationResult, ToneOption, VideoSelection};
use caption_alchemist::telemetry::init_tracing;
use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "caption-alchemist", version, about = "Captions and hashtags for short videos")]
struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Generate a caption and hashtags for a video.
    Generate {
        /// Video the caption is for. Only its file name is used.
        #[arg(long)]
        video: PathBuf,
        /// Caption tone.
        #[arg(long, default_value_t = ToneOption::default())]
        tone: ToneOption,
        /// What happens in the video, the audience, or the message.
        #[arg(long, default_value = "")]
        context: String,
    },
    /// Show recent generations, newest first.
    History {
        #[arg(long, default_value_t = DEFAULT_HISTORY_LIMIT)]
        limit: usize,
    },
    /// List the available tones.
    Tones,
    /// List models visible to the configured API key.
    Models,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = AppConfig::from_env().context("invalid configuration")?;

    match cli.command {
        Command::Generate {
            video,
            tone,
            context,
        } => generate(&config, video, tone, &context).await,
        Command::History { limit } => {
            let history = app::history(&config).await;
            let entries = history.list(limit).await;
            if entries.is_empty() {
                println!("No history yet.");
            }
            for entry in entries {
                println!(
                    "{}  {}  [{}]",
                    entry.created_at().format("%Y-%m-%d %H:%M:%S"),
                    entry.video_name(),
                    entry.tone()
                );
                println!("  {}", entry.caption());
                println!("  {}", entry.hashtags().join(" "));
            }
            Ok(())
        }
        Command::Tones => {
            for tone in ToneOption::ALL {
                println!("{} {:<14} {}", tone.icon(), tone.as_str(), tone.description());
            }
            Ok(())
        }
        Command::Models => {
            let transport = app::transport(&config)?;
            for model in transport.list_models().await {
                println!("{model}");
            }
            Ok(())
        }
    }
}

async fn generate(config: &AppConfig, video: PathBuf, tone: ToneOption, context: &str) -> Result<()> {
    if !video.is_file() {
        bail!("video file not found: {}", video.display());
    }
    let selection = VideoSelection::from_path(&video)?;

    let session = app::session(config).await?;
    session.select_video(selection);

    let outcome = session.generate(tone, context).await;
    // Give the background history write a chance to land before exiting.
    session.flush_history().await;

    let result = outcome?;
    print_result(&result);
    Ok(())
}

fn print_result(result: &GenerationResult) {
    println!("Caption:  {}", result.caption());
    println!("Hashtags: {}", result.hashtag_line());
    println!();
    println!("{}", result.share_text());
}
