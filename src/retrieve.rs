//! Two-stage chunk retrieval.
//!
//! Strategies form a small chain of responsibility: [`Retriever`] tries each
//! [`RetrievalStrategy`] in order and stops at the first non-empty selection.
//! The deterministic [`KeywordStrategy`] runs first; the model-ranked
//! [`ModelRankStrategy`] is reached only when keyword scoring finds nothing,
//! and swallows its own failures so a broken ranking call degrades to "no
//! context" instead of an error.
//!
//! All strategies see the same candidate window: a prefix of the global
//! chunk list, so window positions and global indices coincide.

use async_trait::async_trait;
use std::sync::Arc;

use crate::completion::{ChatMessage, Completer};
use crate::trace::Trace;

const RANK_SYSTEM_PROMPT: &str = "You are a retrieval system. Given document chunks and a question, return a JSON array of the 3 most relevant chunk indices (0-based) in order of relevance. Return ONLY valid JSON like [5,12,2]. If fewer than 3 relevant chunks exist, return available ones.";

/// One way of selecting relevant chunk indices for a question.
///
/// `chunks` is the bounded candidate window. Returned indices address that
/// window; an empty selection hands the question to the next strategy.
#[async_trait]
pub trait RetrievalStrategy: Send + Sync {
    fn name(&self) -> &str;

    async fn select(&self, question: &str, chunks: &[String], trace: &mut Trace) -> Vec<usize>;
}

/// Ordered strategy chain over a bounded window of the global chunk list.
pub struct Retriever {
    strategies: Vec<Box<dyn RetrievalStrategy>>,
    window: usize,
}

impl Retriever {
    pub fn new(strategies: Vec<Box<dyn RetrievalStrategy>>, window: usize) -> Self {
        Self { strategies, window }
    }

    /// The candidate window: the first `window` chunks in global order.
    /// Chunks past the window are never considered by any strategy.
    pub fn candidates<'a>(&self, chunks: &'a [String]) -> &'a [String] {
        &chunks[..self.window.min(chunks.len())]
    }

    /// Try each strategy in order; the first non-empty selection wins.
    pub async fn select(
        &self,
        question: &str,
        candidates: &[String],
        trace: &mut Trace,
    ) -> Vec<usize> {
        for strategy in &self.strategies {
            let selected = strategy.select(question, candidates, trace).await;
            if !selected.is_empty() {
                tracing::debug!(
                    strategy = strategy.name(),
                    count = selected.len(),
                    "retrieval selection"
                );
                return selected;
            }
        }
        Vec::new()
    }
}

/// Deterministic keyword scorer.
///
/// Tokenizes the question (lower-cased, split on non-word characters,
/// tokens of length <= 2 dropped, duplicates kept), scores each candidate
/// +2 per token that occurs as a substring, and returns up to `limit`
/// indices with score > 0 in descending-score order. Ties keep their
/// original chunk order.
pub struct KeywordStrategy {
    limit: usize,
}

impl KeywordStrategy {
    pub fn new(limit: usize) -> Self {
        Self { limit }
    }
}

/// Lower-cased question tokens longer than two chars. Word characters are
/// ASCII alphanumerics and underscore; repeats are deliberately kept so a
/// repeated word weighs double.
fn tokenize(question: &str) -> Vec<String> {
    question
        .to_lowercase()
        .split(|c: char| !c.is_ascii_alphanumeric() && c != '_')
        .filter(|token| token.len() > 2)
        .map(str::to_string)
        .collect()
}

#[async_trait]
impl RetrievalStrategy for KeywordStrategy {
    fn name(&self) -> &str {
        "keyword"
    }

    async fn select(&self, question: &str, chunks: &[String], trace: &mut Trace) -> Vec<usize> {
        let tokens = tokenize(question);

        let mut scores: Vec<(usize, u32)> = chunks
            .iter()
            .enumerate()
            .map(|(i, chunk)| {
                let lowered = chunk.to_lowercase();
                let mut score = 0u32;
                for token in &tokens {
                    // One bonus per token occurrence in the question, no
                    // matter how often the token appears in the chunk.
                    if lowered.contains(token.as_str()) {
                        score += 2;
                    }
                }
                (i, score)
            })
            .collect();

        // Stable sort: tied scores keep insertion (global index) order.
        scores.sort_by_key(|&(_, score)| std::cmp::Reverse(score));

        let selected: Vec<usize> = scores
            .iter()
            .take(self.limit)
            .filter(|&&(_, score)| score > 0)
            .map(|&(i, _)| i)
            .collect();

        trace.record(format!(
            "[RETRIEVE] Selected {} chunks by keyword matching",
            selected.len()
        ));
        selected
    }
}

/// Model-ranked fallback.
///
/// Labels every candidate with `IDX:<i>`, asks the chat model for a JSON
/// array of relevant indices, and parses whatever comes back. Any failure
/// (transport error, non-JSON reply, non-array JSON) yields an empty
/// selection; the question then proceeds with no retrieved context. No
/// retry is attempted.
pub struct ModelRankStrategy {
    completer: Arc<dyn Completer>,
    model: String,
}

impl ModelRankStrategy {
    pub fn new(completer: Arc<dyn Completer>, model: impl Into<String>) -> Self {
        Self {
            completer,
            model: model.into(),
        }
    }
}

fn chunks_payload(chunks: &[String]) -> String {
    chunks
        .iter()
        .enumerate()
        .map(|(i, chunk)| format!("IDX:{}\n{}", i, chunk))
        .collect::<Vec<_>>()
        .join("\n\n---\n\n")
}

/// Indices from the model's reply. Non-integer entries are dropped here;
/// out-of-range ones survive and are dropped at resolution time, like any
/// other invalid index.
fn parse_ranked_indices(raw: &str) -> Option<Vec<usize>> {
    let value: serde_json::Value = serde_json::from_str(raw.trim()).ok()?;
    let entries = match value.as_array() {
        Some(entries) => entries,
        None => return Some(Vec::new()),
    };
    Some(
        entries
            .iter()
            .filter_map(|v| v.as_u64().map(|n| n as usize))
            .collect(),
    )
}

#[async_trait]
impl RetrievalStrategy for ModelRankStrategy {
    fn name(&self) -> &str {
        "model-rank"
    }

    async fn select(&self, question: &str, chunks: &[String], trace: &mut Trace) -> Vec<usize> {
        trace.record("[RETRIEVE] No keyword matches, trying AI retrieval...");

        let messages = [
            ChatMessage::system(RANK_SYSTEM_PROMPT),
            ChatMessage::user(format!(
                "Question:\n{}\n\nChunks (index:content):\n\n{}",
                question,
                chunks_payload(chunks)
            )),
        ];

        match self.completer.complete(&messages, &self.model).await {
            Ok(Some(raw)) => match parse_ranked_indices(&raw) {
                Some(indices) => indices,
                None => {
                    trace.record("[WARN] AI retrieval returned non-JSON");
                    Vec::new()
                }
            },
            Ok(None) => {
                trace.record("[WARN] AI retrieval returned non-JSON");
                Vec::new()
            }
            Err(err) => {
                tracing::warn!(error = %err, "model ranking call failed");
                trace.record(format!("[WARN] AI retrieval failed: {}", err));
                Vec::new()
            }
        }
    }
}
