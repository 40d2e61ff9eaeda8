//! Chat session: one corpus, one trace, one question at a time.
//!
//! The session owns the corpus for the current run and the diagnostic
//! trace, and gates question-answering behind a busy flag so a second
//! question cannot start while one is in flight. The gate is released on
//! every exit from `ask`, including a caller dropping the in-flight
//! future, so an abandoned question never wedges the session.

use std::path::PathBuf;

use anyhow::Result;

use crate::answer::AnswerSynthesizer;
use crate::corpus::Corpus;
use crate::extract::TextExtractor;
use crate::ingest::ingest_documents;
use crate::models::Answer;
use crate::retrieve::Retriever;
use crate::trace::Trace;

/// Why a question was rejected before any external call was made.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AskError {
    /// A question is already in flight.
    Busy,
    /// The question was empty after trimming.
    EmptyQuestion,
    /// No documents have been processed yet.
    EmptyCorpus,
}

impl std::fmt::Display for AskError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AskError::Busy => write!(f, "a question is already being answered"),
            AskError::EmptyQuestion => write!(f, "question is empty"),
            AskError::EmptyCorpus => write!(f, "no documents have been processed yet"),
        }
    }
}

impl std::error::Error for AskError {}

/// Holds the busy flag for the duration of one ask. Clearing it in `drop`
/// covers normal returns and a caller that drops the future mid-await.
struct BusyGuard<'a> {
    flag: &'a mut bool,
}

impl<'a> BusyGuard<'a> {
    fn hold(flag: &'a mut bool) -> Self {
        *flag = true;
        Self { flag }
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        *self.flag = false;
    }
}

pub struct ChatSession {
    corpus: Corpus,
    retriever: Retriever,
    synthesizer: AnswerSynthesizer,
    trace: Trace,
    busy: bool,
}

impl ChatSession {
    pub fn new(retriever: Retriever, synthesizer: AnswerSynthesizer) -> Self {
        let mut trace = Trace::new();
        trace.record("[INIT] docchat ready");
        Self {
            corpus: Corpus::new(),
            retriever,
            synthesizer,
            trace,
            busy: false,
        }
    }

    /// Ingest `paths`, replacing any previously loaded corpus. Ingest trace
    /// entries land in this session's trace.
    pub fn load_documents(
        &mut self,
        extractor: &dyn TextExtractor,
        paths: &[PathBuf],
        max_chars: usize,
    ) -> Result<()> {
        self.corpus = ingest_documents(extractor, paths, max_chars, &mut self.trace)?;
        Ok(())
    }

    /// Answer one question against the loaded corpus.
    ///
    /// Rejections (busy, blank question, nothing loaded) happen before the
    /// busy flag is taken and before any external call. Everything after
    /// that returns an [`Answer`]; retrieval and synthesis failures are
    /// folded into the answer text rather than escaping as errors.
    pub async fn ask(&mut self, question: &str) -> Result<Answer, AskError> {
        if self.busy {
            return Err(AskError::Busy);
        }
        let question = question.trim();
        if question.is_empty() {
            return Err(AskError::EmptyQuestion);
        }
        if self.corpus.is_empty() {
            return Err(AskError::EmptyCorpus);
        }

        let _busy = BusyGuard::hold(&mut self.busy);
        self.trace.record(format!("[QUESTION] {}", question));
        self.trace.record("[RETRIEVE] Selecting relevant chunks...");

        let candidates = self.retriever.candidates(self.corpus.chunks());
        let selection = self
            .retriever
            .select(question, candidates, &mut self.trace)
            .await;
        let answer = self
            .synthesizer
            .answer(question, &selection, candidates, &mut self.trace)
            .await;

        Ok(answer)
    }

    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    pub fn trace(&self) -> &Trace {
        &self.trace
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }
}
