//! In-memory corpus for one processing run.
//!
//! Owns every ingested document's chunks and the flattened global chunk list
//! in ingestion order. A fresh corpus is built on each run and never mutated
//! in place afterwards; retrieval and synthesis borrow chunk text from it for
//! the duration of a single question.

use crate::models::Document;

struct DocumentEntry {
    name: String,
    chunk_start: usize,
    chunk_end: usize,
}

/// Per-document view: the document name and its slice of the global list.
pub struct DocumentChunks<'a> {
    pub name: &'a str,
    pub chunks: &'a [String],
}

/// The owned store for the current session's documents and chunks.
///
/// Global chunk index = cumulative count of chunks from all documents
/// ingested before, plus the chunk's index within its own document.
pub struct Corpus {
    documents: Vec<DocumentEntry>,
    chunks: Vec<String>,
}

impl Corpus {
    pub fn new() -> Self {
        Self {
            documents: Vec::new(),
            chunks: Vec::new(),
        }
    }

    /// Append a document, extending the global chunk list in order.
    pub fn add_document(&mut self, doc: Document) {
        let chunk_start = self.chunks.len();
        self.chunks.extend(doc.chunks);
        self.documents.push(DocumentEntry {
            name: doc.name,
            chunk_start,
            chunk_end: self.chunks.len(),
        });
    }

    /// The flattened global chunk list, in ingestion order.
    pub fn chunks(&self) -> &[String] {
        &self.chunks
    }

    /// Resolve one global index; out-of-range indices yield `None`.
    pub fn chunk(&self, index: usize) -> Option<&str> {
        self.chunks.get(index).map(String::as_str)
    }

    pub fn total_chunks(&self) -> usize {
        self.chunks.len()
    }

    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    /// True when no document contributed any chunk.
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Iterate documents in ingestion order with their chunk slices.
    pub fn documents(&self) -> impl Iterator<Item = DocumentChunks<'_>> {
        self.documents.iter().map(|entry| DocumentChunks {
            name: &entry.name,
            chunks: &self.chunks[entry.chunk_start..entry.chunk_end],
        })
    }
}

impl Default for Corpus {
    fn default() -> Self {
        Self::new()
    }
}
