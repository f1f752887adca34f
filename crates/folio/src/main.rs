// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Folio - document retrieval, tutoring and flashcard review from the terminal.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod app;
mod ask;
mod check;
mod docs;
mod study;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use colored::Colorize;
use folio_config::FolioConfig;
use folio_core::FolioError;
use folio_storage::{CardStatus, Feedback};

/// Folio - document retrieval, tutoring and flashcard review.
#[derive(Parser, Debug)]
#[command(name = "folio", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the XDG hierarchy.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Index a JSON array of `{text, pages}` chunks into a session.
    Index {
        #[arg(long)]
        session: String,
        #[arg(long)]
        user: String,
        #[arg(long)]
        document: String,
        file: PathBuf,
    },
    /// Similarity search within a session, or across all of a user's sessions.
    Search {
        query: String,
        #[arg(long)]
        user: String,
        /// Omit to search every session the user owns.
        #[arg(long)]
        session: Option<String>,
        #[arg(short, long)]
        k: Option<usize>,
    },
    /// Sessions whose documents resemble this session's.
    Related {
        #[arg(long)]
        session: String,
        #[arg(long)]
        user: String,
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Answer one question with the tool loop.
    Ask {
        question: String,
        #[arg(long)]
        session: String,
        #[arg(long)]
        user: String,
        #[arg(long)]
        model: Option<String>,
        #[arg(long)]
        deep_think: bool,
        /// Document type for the prompt (pdf, docx, txt, image).
        #[arg(long)]
        file_type: Option<String>,
        /// Print the full outcome as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Stream a plain answer from the primary backend.
    Stream {
        prompt: String,
        #[arg(long)]
        model: Option<String>,
    },
    /// Suggest a short title for a conversation.
    Title { message: String },
    /// Record a flashcard review (known, reviewing, remaining).
    Review {
        #[arg(long)]
        session: String,
        #[arg(long)]
        message: String,
        #[arg(long)]
        card: i64,
        #[arg(long, default_value = "")]
        front: String,
        outcome: CardStatus,
    },
    /// List flashcards due for review.
    Due {
        #[arg(required = true)]
        sessions: Vec<String>,
    },
    /// Store a question/answer exchange in long-term memory.
    Remember {
        #[arg(long)]
        user: String,
        #[arg(long)]
        session: Option<String>,
        #[arg(long)]
        question: String,
        #[arg(long)]
        answer: String,
        /// `up` or `down`.
        #[arg(long)]
        feedback: Option<Feedback>,
    },
    /// Manage Folio configuration.
    Config {
        #[command(subcommand)]
        action: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Validate configuration and report which backends are usable.
    Check,
}

fn load_config(path: Option<&PathBuf>) -> FolioConfig {
    let loaded = match path {
        Some(path) => folio_config::load_and_validate_path(path),
        None => folio_config::load_and_validate(),
    };
    match loaded {
        Ok(config) => config,
        Err(errors) => {
            folio_config::render_errors(&errors);
            std::process::exit(1);
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref());
    app::init_tracing(&config.agent.log_level);

    if let Err(e) = run(cli.command, config).await {
        eprintln!("{} {e}", "error:".red().bold());
        std::process::exit(1);
    }
}

async fn run(command: Commands, config: FolioConfig) -> Result<(), FolioError> {
    match command {
        Commands::Index {
            session,
            user,
            document,
            file,
        } => docs::run_index(&config, &session, &user, &document, &file).await,
        Commands::Search {
            query,
            user,
            session,
            k,
        } => docs::run_search(&config, &query, &user, session.as_deref(), k).await,
        Commands::Related {
            session,
            user,
            limit,
        } => docs::run_related(&config, &session, &user, limit).await,
        Commands::Ask {
            question,
            session,
            user,
            model,
            deep_think,
            file_type,
            json,
        } => {
            let options = ask::AskOptions {
                model,
                deep_think,
                file_type,
                json,
            };
            ask::run_ask(&config, &question, &session, &user, options).await
        }
        Commands::Stream { prompt, model } => {
            ask::run_stream(&config, &prompt, model.as_deref()).await
        }
        Commands::Title { message } => ask::run_title(&config, &message).await,
        Commands::Review {
            session,
            message,
            card,
            front,
            outcome,
        } => study::run_review(&config, &session, &message, card, &front, outcome).await,
        Commands::Due { sessions } => study::run_due(&config, &sessions).await,
        Commands::Remember {
            user,
            session,
            question,
            answer,
            feedback,
        } => {
            study::run_remember(&config, &user, session.as_deref(), &question, &answer, feedback)
                .await
        }
        Commands::Config {
            action: ConfigCommand::Check,
        } => check::run_check(&config).await,
    }
}
