//! Document ingestion.
//!
//! Drives the per-file flow: read bytes → extract text → chunk → append to
//! a fresh corpus. Files are processed strictly sequentially, and a file
//! that fails to read or extract is logged and skipped, so one bad PDF
//! never sinks the run.

use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};

use crate::chunk::chunk_text;
use crate::corpus::Corpus;
use crate::extract::TextExtractor;
use crate::models::Document;
use crate::trace::Trace;

/// Ingest `paths` into a new corpus, replacing nothing: the caller decides
/// what to do with any previous corpus. Rejects an empty path list up
/// front; per-file failures are recorded in the trace and skipped.
pub fn ingest_documents(
    extractor: &dyn TextExtractor,
    paths: &[PathBuf],
    max_chars: usize,
    trace: &mut Trace,
) -> Result<Corpus> {
    if paths.is_empty() {
        bail!("no files to process");
    }

    let names: Vec<String> = paths.iter().map(|p| display_name(p)).collect();
    trace.record(format!(
        "[FILES] Selected {} file(s): {}",
        paths.len(),
        names.join(", ")
    ));
    trace.record(format!("[START] Processing {} file(s)", paths.len()));

    let mut corpus = Corpus::new();
    for (path, name) in paths.iter().zip(&names) {
        trace.record(format!("[PDF] Extracting text from {}", name));

        let text = match extract_file(extractor, path) {
            Ok(text) => text,
            Err(err) => {
                tracing::warn!(file = %name, error = %err, "skipping file");
                trace.record(format!("[ERROR] Failed to parse {}: {}", name, err));
                continue;
            }
        };
        trace.record(format!(
            "[PDF] Extracted {} characters",
            text.chars().count()
        ));

        let chunks = chunk_text(&text, max_chars);
        trace.record(format!("[CHUNK] Created {} chunks", chunks.len()));

        corpus.add_document(Document {
            name: name.clone(),
            chunks,
        });
    }

    trace.record(format!("[DONE] Total chunks: {}", corpus.total_chunks()));
    tracing::info!(
        files = paths.len(),
        documents = corpus.document_count(),
        chunks = corpus.total_chunks(),
        "ingest complete"
    );
    Ok(corpus)
}

fn extract_file(extractor: &dyn TextExtractor, path: &Path) -> Result<String> {
    let bytes =
        std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    Ok(extractor.extract(&bytes)?)
}

/// Display name for a path: the file name component, falling back to the
/// whole path when there is none.
fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
