mod config;

use std::io::Read;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::debug;

use config::Config;

#[derive(Parser)]
#[command(name = "scribe")]
#[command(about = "Scribe — chat message parsing and link tools")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse message text and print the node tree as JSON
    Parse {
        /// Message text; read from stdin when omitted
        text: Option<String>,
    },
    /// Reduce message text to plain text
    Sanitize {
        /// Message text; read from stdin when omitted
        text: Option<String>,
    },
    /// Escape text so it re-parses as literal text
    Escape {
        /// Text to escape; read from stdin when omitted
        text: Option<String>,
    },
    /// Decompose a platform link into its parts
    Link {
        /// A guild, channel, message, or webhook URL
        url: String,
    },
}

fn main() -> Result<()> {
    let config = Config::from_env();
    logging::init_logger(config.log_dir.as_deref(), &config.log_level);

    let cli = Cli::parse();
    match cli.command {
        Commands::Parse { text } => {
            let text = read_input(text)?;
            let nodes = markdown::parse(&text);
            debug!(node_count = nodes.len(), "parsed message");
            println!("{}", serde_json::to_string_pretty(&nodes)?);
        }
        Commands::Sanitize { text } => {
            let text = read_input(text)?;
            println!("{}", markdown::sanitize(&text));
        }
        Commands::Escape { text } => {
            let text = read_input(text)?;
            println!("{}", markdown::escape(&text));
        }
        Commands::Link { url } => match scribe_links::match_link(&url) {
            Some(link) => println!("{}", serde_json::to_string_pretty(&link)?),
            None => {
                eprintln!("unrecognized link: {}", logging::redact_tokens(&url));
                std::process::exit(2);
            }
        },
    }

    Ok(())
}

fn read_input(text: Option<String>) -> Result<String> {
    match text {
        Some(t) => Ok(t),
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf.trim_end_matches('\n').to_string())
        }
    }
}
