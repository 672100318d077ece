use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "revlens")]
#[command(
    author,
    version,
    about = "Pick a product review and classify its sentiment and noun level"
)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, default_value = "revlens.yaml")]
    pub config: String,

    /// Review file path or http(s) URL (tab-separated, with a `text` column)
    #[arg(short, long, global = true)]
    pub reviews: Option<String>,

    /// Inference API base URL; the model id is appended
    #[arg(short, long, global = true)]
    pub endpoint: Option<String>,

    /// Use the local heuristics only
    #[arg(long, global = true)]
    pub offline: bool,

    /// API token for this run only (not stored)
    #[arg(long, global = true, env = "REVLENS_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print a random review
    Pick,

    /// Classify the sentiment of a random review
    Sentiment {
        /// Classify this text instead of a random review
        #[arg(short, long)]
        text: Option<String>,
    },

    /// Report the noun level of a random review
    Nouns {
        /// Analyze this text instead of a random review
        #[arg(short, long)]
        text: Option<String>,
    },

    /// Pick a random review and run both analyses
    Analyze,

    /// Manage the stored API token
    Token {
        #[command(subcommand)]
        command: TokenCommand,
    },
}

#[derive(Subcommand, Debug)]
pub enum TokenCommand {
    /// Store a token (a blank token removes it)
    Set { token: String },

    /// Remove the stored token
    Clear,

    /// Show whether a token is configured
    Status,
}
