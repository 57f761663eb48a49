use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "musicflow")]
#[command(author, version, about = "Telegram bot that turns Spotify links into audio files", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// Run the bot (long polling)
    Run,

    /// Parse a Spotify link and print its metadata
    Resolve {
        /// Track, playlist or album link (or spotify: URI)
        url: String,

        /// Print the metadata as JSON
        #[arg(long)]
        json: bool,
    },

    /// Download a single track without Telegram
    Fetch {
        /// Spotify track link
        url: String,

        /// Bitrate: 128, 192 or 320
        #[arg(short, long, default_value = "192")]
        quality: String,

        /// Directory the audio file is moved into
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_runs_bot() {
        let cli = Cli::try_parse_from(["musicflow"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_resolve_with_json() {
        let cli = Cli::try_parse_from(["musicflow", "resolve", "spotify:track:abc", "--json"]).unwrap();
        assert_eq!(
            cli.command,
            Some(Commands::Resolve {
                url: "spotify:track:abc".into(),
                json: true
            })
        );
    }

    #[test]
    fn test_fetch_defaults() {
        let cli = Cli::try_parse_from(["musicflow", "fetch", "https://open.spotify.com/track/abc"]).unwrap();
        assert_eq!(
            cli.command,
            Some(Commands::Fetch {
                url: "https://open.spotify.com/track/abc".into(),
                quality: "192".into(),
                output: PathBuf::from("."),
            })
        );
    }

    #[test]
    fn test_fetch_custom_quality_and_output() {
        let cli = Cli::try_parse_from(["musicflow", "fetch", "x", "-q", "320", "--output", "/tmp/music"]).unwrap();
        match cli.command {
            Some(Commands::Fetch { quality, output, .. }) => {
                assert_eq!(quality, "320");
                assert_eq!(output, PathBuf::from("/tmp/music"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
