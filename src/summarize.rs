//! Model-written document summaries.
//!
//! Samples the front of a document (the first [`SUMMARY_CHUNK_SAMPLE`]
//! chunks) and asks the chat model for a short summary. Unlike question
//! answering, a failed call here propagates to the caller: summarization
//! is a direct command with no inline-error answer contract.

use anyhow::{bail, Result};

use crate::completion::{ChatMessage, Completer};
use crate::trace::Trace;

/// How many chunks from the start of the document feed the summary.
pub const SUMMARY_CHUNK_SAMPLE: usize = 40;

const SUMMARY_SYSTEM_PROMPT: &str =
    "You are a helpful summarizer. Provide a concise summary (3-5 sentences) of the document.";

pub async fn summarize_document(
    completer: &dyn Completer,
    model: &str,
    name: &str,
    chunks: &[String],
    trace: &mut Trace,
) -> Result<String> {
    trace.record(format!("[SUMMARY] Starting for {}", name));

    if chunks.is_empty() {
        trace.record(format!("[ERROR] No chunks found for {}", name));
        bail!("no chunks found for {}", name);
    }

    let content = chunks
        .iter()
        .take(SUMMARY_CHUNK_SAMPLE)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join("\n\n");

    let messages = [
        ChatMessage::system(SUMMARY_SYSTEM_PROMPT),
        ChatMessage::user(format!("Document: {}\n\nContent:\n\n{}", name, content)),
    ];

    let summary = match completer.complete(&messages, model).await {
        Ok(Some(text)) if !text.is_empty() => text,
        Ok(_) => {
            trace.record(format!(
                "[ERROR] Summary failed for {}: Empty response from API",
                name
            ));
            bail!("Empty response from API");
        }
        Err(err) => {
            tracing::error!(document = %name, error = %err, "summary failed");
            trace.record(format!("[ERROR] Summary failed for {}: {}", name, err));
            return Err(err);
        }
    };

    trace.record(format!("[SUMMARY] Completed for {}", name));
    Ok(summary)
}
