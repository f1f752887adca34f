// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `folio index`, `folio search` and `folio related`.

use std::path::Path;

use colored::Colorize;
use folio_config::FolioConfig;
use folio_core::{FolioError, IndexPhase, IndexProgress, IndexProgressSink};
use folio_retrieval::{ChunkInput, SearchResult, build_citations};

use crate::app::Services;

/// Prints indexing phases to stderr.
struct StderrProgress;

impl IndexProgressSink for StderrProgress {
    fn report(&self, progress: IndexProgress) {
        let phase = match progress.phase {
            IndexPhase::Completed => progress.phase.to_string().green(),
            IndexPhase::Failure => progress.phase.to_string().red(),
            _ => progress.phase.to_string().normal(),
        };
        match progress.detail {
            Some(detail) => eprintln!("[{:>3}%] {phase}: {detail}", progress.percent),
            None => eprintln!("[{:>3}%] {phase}", progress.percent),
        }
    }
}

/// Reads a JSON array of chunks.
pub fn read_chunks(path: &Path) -> Result<Vec<ChunkInput>, FolioError> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| FolioError::Internal(format!("reading {}: {e}", path.display())))?;
    serde_json::from_str(&text)
        .map_err(|e| FolioError::Internal(format!("{} is not a chunk list: {e}", path.display())))
}

pub async fn run_index(
    config: &FolioConfig,
    session: &str,
    user: &str,
    document: &str,
    file: &Path,
) -> Result<(), FolioError> {
    let chunks = read_chunks(file)?;
    let services = Services::open(config).await?;
    let stored = services
        .retrieval
        .index_document(session, user, document, chunks, &StderrProgress)
        .await?;
    println!("indexed {stored} chunk(s) into session {session}");
    Ok(())
}

fn print_results(results: &[SearchResult]) {
    if results.is_empty() {
        println!("{}", "no matches".dimmed());
        return;
    }
    for (result, citation) in results.iter().zip(build_citations(results)) {
        println!(
            "[{}] {:.3}  {} p.{:?}",
            citation.index,
            result.score,
            result.session_id.bold(),
            citation.pages
        );
        println!("    {}", citation.excerpt);
    }
}

pub async fn run_search(
    config: &FolioConfig,
    query: &str,
    user: &str,
    session: Option<&str>,
    k: Option<usize>,
) -> Result<(), FolioError> {
    let services = Services::open(config).await?;
    let results = match session {
        Some(session) => services.retrieval.search_in_scope(query, session, user, k).await,
        None => services.retrieval.search_across_scopes(query, user, k).await,
    };
    print_results(&results);
    Ok(())
}

pub async fn run_related(
    config: &FolioConfig,
    session: &str,
    user: &str,
    limit: Option<usize>,
) -> Result<(), FolioError> {
    let services = Services::open(config).await?;
    let related = services
        .retrieval
        .find_related_scopes(session, user, limit)
        .await;
    if related.is_empty() {
        println!("{}", "no related sessions".dimmed());
    }
    for scope in related {
        println!("{:.3}  {}", scope.score, scope.session_id);
    }
    Ok(())
}
