//! Core data models used throughout docchat.
//!
//! These types represent the documents, context passages, and answers that
//! flow through the ingestion and question-answering pipeline.

/// A processed document: display name plus its ordered chunk texts.
///
/// Created once extraction and chunking finish, then handed to the corpus.
/// The name is a display identifier and is not required to be unique.
#[derive(Debug, Clone)]
pub struct Document {
    pub name: String,
    pub chunks: Vec<String>,
}

/// A chunk that was actually supplied as context for one answer, resolved
/// to its global index and text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextPassage {
    pub index: usize,
    pub text: String,
}

/// The outcome of one question-answering call: the answer text and the
/// passages it was grounded on (empty when nothing relevant was found).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answer {
    pub text: String,
    pub passages: Vec<ContextPassage>,
}
