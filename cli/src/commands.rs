//! Command-line definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use docsentry_core::{AnalysisType, LlmProvider, ENV_API_URL, ENV_DATA_DIR};

/// DocSentry - AI-assisted policy document analysis
#[derive(Parser, Debug)]
#[command(name = "docsentry")]
#[command(version)]
pub struct Cli {
    /// API base URL, including its path prefix
    #[arg(long, global = true, env = ENV_API_URL)]
    pub api_url: Option<String>,

    /// Directory holding config.toml and the local database
    #[arg(long, global = true, env = ENV_DATA_DIR)]
    pub data_dir: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn log_filter(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else {
            "warn"
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sign in and store the session credential
    Login {
        #[arg(short, long)]
        email: Option<String>,

        /// Password (prompted if not provided)
        #[arg(short, long)]
        password: Option<String>,
    },

    /// Create an account and sign in
    Register {
        #[arg(long)]
        first_name: String,

        #[arg(long)]
        last_name: String,

        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        organization: Option<String>,

        /// Password (prompted if not provided)
        #[arg(short, long)]
        password: Option<String>,
    },

    /// Sign out and forget the stored credential
    Logout,

    /// Show the signed-in user
    Whoami,

    /// List documents with their analysis status
    #[command(alias = "dashboard")]
    Documents,

    /// Upload a document and start its analysis
    Analyze {
        /// PDF, DOCX or TXT file, at most 10 MB
        file: Option<PathBuf>,

        #[arg(long, default_value_t = LlmProvider::default())]
        provider: LlmProvider,

        #[arg(long, default_value_t = AnalysisType::default())]
        analysis_type: AnalysisType,
    },

    /// Download the analysis results of a completed document
    Download {
        id: String,

        /// Target file or directory
        #[arg(short, long, default_value = ".")]
        output: PathBuf,

        /// Print the download URL for a viewer instead of fetching the file
        #[arg(long)]
        url: bool,
    },

    /// List the available providers and analysis types
    Options,
}
