//! Command-line surface of `rag-console`.

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};
use rag_render::ScoreStyle;
use tracing::Level;

/// Console client for a retrieval-augmented question-answering backend.
///
/// Settings come from the environment (`RAG_*`, optionally via `.env`);
/// flags override them.
#[derive(Debug, Parser)]
#[command(name = "rag-console", version)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Options shared by every command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct GlobalArgs {
    /// Backend base address, e.g. `http://localhost:8000`.
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Path prefix of the backend endpoints (`/` for none).
    #[arg(long, global = true)]
    pub api_prefix: Option<String>,

    /// Number of passages requested per question.
    #[arg(long, global = true, value_parser = clap::value_parser!(u32).range(1..))]
    pub top_k: Option<u32>,

    /// Score display: `percent` (92.0%) or `fraction` (0.920).
    #[arg(long, global = true)]
    pub score_style: Option<ScoreStyle>,

    /// Print answers and passages as HTML fragments.
    #[arg(long, global = true)]
    pub html: bool,

    /// More log output on stderr (`-v` debug, `-vv` trace).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Ask one question and print the answer with its ranked passages.
    Ask {
        /// The question; multiple words are joined with spaces.
        #[arg(required = true, num_args = 1..)]
        question: Vec<String>,
    },

    /// Ingest pasted text and/or a file.
    Ingest {
        /// Raw text to ingest.
        #[arg(long)]
        text: Option<String>,

        /// File to upload (PDF, text, ...).
        #[arg(long)]
        file: Option<PathBuf>,
    },

    /// Show whether the backend holds ingested data.
    Status,

    /// Delete all ingested data.
    Clear {
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },

    /// Interactive session (default).
    Shell,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn log_level(&self) -> Level {
        match self.global.verbose {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    }
}
