//! End-to-end flows through the public library API with deterministic
//! fakes: no network, no real PDFs.

use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;

use docchat::answer::{AnswerSynthesizer, NO_CONTEXT_ANSWER};
use docchat::completion::{ChatMessage, Completer};
use docchat::extract::{ExtractError, TextExtractor};
use docchat::retrieve::{KeywordStrategy, ModelRankStrategy, Retriever};
use docchat::session::{AskError, ChatSession};

enum Reply {
    Text(&'static str),
    Fail(&'static str),
}

/// Completer that plays back a scripted reply per call and records what it
/// was asked, so tests can assert on call counts and prompt contents.
struct ScriptedCompleter {
    replies: Mutex<VecDeque<Reply>>,
    calls: AtomicUsize,
    seen: Mutex<Vec<Vec<ChatMessage>>>,
}

impl ScriptedCompleter {
    fn new(replies: Vec<Reply>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn seen(&self) -> Vec<Vec<ChatMessage>> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl Completer for ScriptedCompleter {
    async fn complete(&self, messages: &[ChatMessage], _model: &str) -> Result<Option<String>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push(messages.to_vec());
        match self.replies.lock().unwrap().pop_front() {
            Some(Reply::Text(raw)) => Ok(Some(raw.to_string())),
            Some(Reply::Fail(msg)) => Err(anyhow::anyhow!(msg)),
            None => panic!("completer called more times than scripted"),
        }
    }
}

/// Extractor that echoes file bytes back as text; a marker stages per-file
/// extraction failures.
struct EchoExtractor;

impl TextExtractor for EchoExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String, ExtractError> {
        let text = String::from_utf8_lossy(bytes).into_owned();
        if text.contains("CORRUPT") {
            return Err(ExtractError::Pdf("bad xref table".to_string()));
        }
        Ok(text)
    }
}

fn build_session(completer: Arc<ScriptedCompleter>) -> ChatSession {
    let retriever = Retriever::new(
        vec![
            Box::new(KeywordStrategy::new(5)),
            Box::new(ModelRankStrategy::new(completer.clone(), "gpt-4o-mini")),
        ],
        60,
    );
    let synthesizer = AnswerSynthesizer::new(completer, "gpt-4o-mini");
    ChatSession::new(retriever, synthesizer)
}

fn write_file(dir: &tempfile::TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}

#[tokio::test]
async fn paris_question_travels_from_file_to_answer() {
    let dir = tempfile::tempdir().unwrap();
    let pdf = write_file(
        &dir,
        "france.pdf",
        "Paris is the capital of France.\n\nIt has a population of over two million.",
    );

    let completer = ScriptedCompleter::new(vec![Reply::Text("The capital of France is Paris.")]);
    let mut session = build_session(completer.clone());
    session
        .load_documents(&EchoExtractor, &[pdf], 900)
        .unwrap();

    // Both paragraphs merge into a single chunk at the default size.
    assert_eq!(session.corpus().total_chunks(), 1);

    let answer = session.ask("What is the capital of France?").await.unwrap();

    assert_eq!(answer.text, "The capital of France is Paris.");
    assert_eq!(answer.passages.len(), 1);
    assert_eq!(answer.passages[0].index, 0);
    assert!(answer.passages[0].text.starts_with("Paris is the capital"));

    // Keyword scoring hit, so the single call is the answer call.
    assert_eq!(completer.calls(), 1);
    let seen = completer.seen();
    assert!(seen[0][0].content.contains("You are a helpful assistant"));
    assert!(seen[0][1]
        .content
        .contains("Context from documents:\n\nParis is the capital of France."));
}

#[tokio::test]
async fn model_ranking_steps_in_when_keywords_miss() {
    let dir = tempfile::tempdir().unwrap();
    let pdf = write_file(&dir, "treaty.pdf", "The treaty was signed at dawn.");

    let completer = ScriptedCompleter::new(vec![
        Reply::Text("[0]"),
        Reply::Text("It was signed at dawn."),
    ]);
    let mut session = build_session(completer.clone());
    session
        .load_documents(&EchoExtractor, &[pdf], 900)
        .unwrap();

    // No question token appears in the chunk, so the keyword stage is empty.
    let answer = session.ask("zzz qqq").await.unwrap();

    assert_eq!(answer.text, "It was signed at dawn.");
    assert_eq!(answer.passages[0].index, 0);
    assert_eq!(completer.calls(), 2);

    let seen = completer.seen();
    assert!(seen[0][0].content.contains("You are a retrieval system"));
    assert!(seen[0][1].content.contains("IDX:0\nThe treaty was signed at dawn."));
    assert!(seen[1][0].content.contains("You are a helpful assistant"));

    let messages: Vec<String> = session
        .trace()
        .entries()
        .iter()
        .map(|e| e.message.clone())
        .collect();
    assert!(messages.contains(&"[RETRIEVE] Selected 0 chunks by keyword matching".to_string()));
    assert!(messages.contains(&"[RETRIEVE] No keyword matches, trying AI retrieval...".to_string()));
}

#[tokio::test]
async fn failed_ranking_degrades_to_no_context_answer() {
    let dir = tempfile::tempdir().unwrap();
    let pdf = write_file(&dir, "notes.pdf", "The harvest festival lasted a week.");

    let completer = ScriptedCompleter::new(vec![Reply::Fail("connection reset")]);
    let mut session = build_session(completer.clone());
    session
        .load_documents(&EchoExtractor, &[pdf], 900)
        .unwrap();

    let answer = session.ask("zzz qqq").await.unwrap();

    assert_eq!(answer.text, NO_CONTEXT_ANSWER);
    assert!(answer.passages.is_empty());
    // Only the failed ranking call; no answer call follows.
    assert_eq!(completer.calls(), 1);

    let messages: Vec<String> = session
        .trace()
        .entries()
        .iter()
        .map(|e| e.message.clone())
        .collect();
    assert!(messages.contains(&"[WARN] AI retrieval failed: connection reset".to_string()));
    assert!(messages.contains(&"[ANSWER] No context available".to_string()));
}

#[tokio::test]
async fn answer_call_failure_becomes_inline_error() {
    let dir = tempfile::tempdir().unwrap();
    let pdf = write_file(&dir, "atlas.pdf", "The atlas maps every island chain.");

    let completer = ScriptedCompleter::new(vec![Reply::Fail("boom")]);
    let mut session = build_session(completer.clone());
    session
        .load_documents(&EchoExtractor, &[pdf], 900)
        .unwrap();

    let answer = session.ask("atlas island").await.unwrap();
    assert_eq!(answer.text, "Error: boom");
    assert_eq!(completer.calls(), 1);
    assert!(!session.is_busy());
}

#[tokio::test]
async fn bad_file_is_skipped_and_the_rest_still_answer() {
    let dir = tempfile::tempdir().unwrap();
    let good = write_file(&dir, "good.pdf", "The anthem mentions golden fields.");
    let bad = write_file(&dir, "bad.pdf", "CORRUPT");

    let completer = ScriptedCompleter::new(vec![Reply::Text("Golden fields.")]);
    let mut session = build_session(completer.clone());
    session
        .load_documents(&EchoExtractor, &[good, bad], 900)
        .unwrap();

    assert_eq!(session.corpus().document_count(), 1);

    let answer = session.ask("golden anthem").await.unwrap();
    assert_eq!(answer.text, "Golden fields.");

    assert!(session
        .trace()
        .entries()
        .iter()
        .any(|e| e.message.contains("[ERROR] Failed to parse bad.pdf")));
}

#[tokio::test]
async fn passages_carry_global_indices_across_documents() {
    let dir = tempfile::tempdir().unwrap();
    let first = write_file(&dir, "first.pdf", "Alpha beta gamma.");
    let second = write_file(&dir, "second.pdf", "The lighthouse keeper kept a journal.");

    let completer = ScriptedCompleter::new(vec![Reply::Text("A journal.")]);
    let mut session = build_session(completer.clone());
    session
        .load_documents(&EchoExtractor, &[first, second], 900)
        .unwrap();

    let answer = session.ask("lighthouse keeper journal").await.unwrap();

    // The second document's only chunk sits at global index 1.
    assert_eq!(answer.passages.len(), 1);
    assert_eq!(answer.passages[0].index, 1);
}

#[tokio::test]
async fn session_answers_questions_back_to_back() {
    let dir = tempfile::tempdir().unwrap();
    let pdf = write_file(&dir, "manual.pdf", "Press the red button to start the engine.");

    let completer = ScriptedCompleter::new(vec![
        Reply::Text("Press the red button."),
        Reply::Text("It starts the engine."),
    ]);
    let mut session = build_session(completer.clone());
    session
        .load_documents(&EchoExtractor, &[pdf], 900)
        .unwrap();

    let first = session.ask("red button?").await.unwrap();
    assert_eq!(first.text, "Press the red button.");
    assert!(!session.is_busy());

    let second = session.ask("engine start?").await.unwrap();
    assert_eq!(second.text, "It starts the engine.");
    assert_eq!(completer.calls(), 2);
}

#[tokio::test]
async fn empty_inputs_are_rejected_before_any_call() {
    let completer = ScriptedCompleter::new(vec![]);
    let mut session = build_session(completer.clone());

    assert_eq!(session.ask("anything?").await, Err(AskError::EmptyCorpus));

    let dir = tempfile::tempdir().unwrap();
    let pdf = write_file(&dir, "doc.pdf", "Some content here.");
    session
        .load_documents(&EchoExtractor, &[pdf], 900)
        .unwrap();

    assert_eq!(session.ask("   ").await, Err(AskError::EmptyQuestion));
    assert_eq!(completer.calls(), 0);
}
