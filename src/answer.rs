//! Answer synthesis from retrieved context.
//!
//! Resolves a retrieval selection against the candidate window, assembles
//! the context block, and makes a single grounded chat call. Synthesis
//! never fails: a missing reply or a transport error becomes the answer
//! text itself, so the caller always has something to show.

use std::sync::Arc;

use crate::completion::{ChatMessage, Completer};
use crate::models::{Answer, ContextPassage};
use crate::trace::Trace;

/// Canned answer used when no context could be retrieved. The model is
/// not called in that case.
pub const NO_CONTEXT_ANSWER: &str = "No relevant content found to answer your question.";

const ANSWER_SYSTEM_PROMPT: &str = "You are a helpful assistant. Use ONLY the provided context to answer the question. If the answer is not in the context, say 'I don't have information about that in the provided documents.'";

pub struct AnswerSynthesizer {
    completer: Arc<dyn Completer>,
    model: String,
}

impl AnswerSynthesizer {
    pub fn new(completer: Arc<dyn Completer>, model: impl Into<String>) -> Self {
        Self {
            completer,
            model: model.into(),
        }
    }

    /// Answer `question` from the selected `candidates` chunks.
    ///
    /// Selection order is preserved in the context block. Indices that do
    /// not resolve against the window are dropped; duplicates are kept.
    pub async fn answer(
        &self,
        question: &str,
        selection: &[usize],
        candidates: &[String],
        trace: &mut Trace,
    ) -> Answer {
        let passages: Vec<ContextPassage> = selection
            .iter()
            .filter_map(|&index| {
                candidates.get(index).map(|text| ContextPassage {
                    index,
                    text: text.clone(),
                })
            })
            .collect();

        if passages.is_empty() {
            trace.record("[WARN] No relevant chunks found for answer");
        }

        let context = passages
            .iter()
            .map(|p| p.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");

        if context.is_empty() {
            trace.record("[ANSWER] No context available");
            return Answer {
                text: NO_CONTEXT_ANSWER.to_string(),
                passages,
            };
        }

        let messages = [
            ChatMessage::system(ANSWER_SYSTEM_PROMPT),
            ChatMessage::user(format!(
                "Question: {}\n\nContext from documents:\n\n{}",
                question, context
            )),
        ];

        let text = match self.completer.complete(&messages, &self.model).await {
            // A blank reply reads as no answer at all.
            Ok(Some(content)) if !content.is_empty() => content,
            Ok(_) => "No response generated.".to_string(),
            Err(err) => {
                tracing::error!(error = %err, "answer generation failed");
                trace.record(format!("[ERROR] Answer generation failed: {}", err));
                format!("Error: {}", err)
            }
        };
        trace.record("[ANSWER] Generated answer");

        Answer { text, passages }
    }
}
