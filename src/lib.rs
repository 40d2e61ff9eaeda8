//! # docchat
//!
//! Retrieval-backed question answering over local PDF documents.
//!
//! docchat extracts text from PDFs, chunks it into bounded passages held in
//! an in-memory corpus for the session, and answers questions by selecting
//! relevant passages (deterministic keyword scoring, falling back to a
//! model-ranked selection) and sending them as context to an
//! OpenAI-compatible chat API. Nothing is persisted between runs.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────┐   ┌──────────────┐   ┌──────────┐
//! │  PDFs   │──▶│ Extract+Chunk│──▶│  Corpus  │
//! └─────────┘   └──────────────┘   └────┬─────┘
//!                                       │ question
//!                      ┌────────────────┘
//!                      ▼
//!                ┌───────────┐  miss  ┌────────────┐
//!                │  Keyword  │───────▶│ Model rank │
//!                └─────┬─────┘        └─────┬──────┘
//!                      │ hit                │
//!                      ▼                    ▼
//!                ┌──────────────────────────────────┐
//!                │      Answer (one chat call)      │
//!                └──────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! export OPENAI_API_KEY=sk-...
//! docchat ask --file report.pdf "What is the main conclusion?"
//! docchat chat --file a.pdf --file b.pdf      # interactive loop
//! docchat chunks --file report.pdf            # inspect chunking, no API
//! docchat summarize --file report.pdf
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | Core data types |
//! | [`extract`] | PDF text extraction |
//! | [`chunk`] | Text chunking |
//! | [`corpus`] | In-memory corpus for one run |
//! | [`ingest`] | Per-file ingestion pipeline |
//! | [`retrieve`] | Two-stage chunk retrieval |
//! | [`answer`] | Context assembly and answer synthesis |
//! | [`completion`] | Chat completion client |
//! | [`summarize`] | Model-written document summaries |
//! | [`session`] | Busy-gated question-answering session |
//! | [`trace`] | In-session diagnostic trace |

pub mod answer;
pub mod chunk;
pub mod completion;
pub mod config;
pub mod corpus;
pub mod extract;
pub mod ingest;
pub mod models;
pub mod retrieve;
pub mod session;
pub mod summarize;
pub mod trace;
