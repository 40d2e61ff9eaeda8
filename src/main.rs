//! # docchat CLI
//!
//! The `docchat` binary answers questions about local PDF documents from
//! the command line. Documents are ingested fresh on every invocation;
//! nothing is persisted between runs.
//!
//! ## Usage
//!
//! ```bash
//! docchat --config ./docchat.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `docchat ask --file <pdf>... "<question>"` | Ingest PDFs and answer one question |
//! | `docchat chat --file <pdf>...` | Ingest PDFs, then answer questions interactively |
//! | `docchat chunks --file <pdf>...` | Ingest and print chunk counts, no API calls |
//! | `docchat summarize --file <pdf>` | Print a model-written summary of one PDF |
//!
//! ## Examples
//!
//! ```bash
//! # One-shot question over two reports
//! docchat ask --file q1.pdf --file q2.pdf "How did revenue change?"
//!
//! # Interactive session; exit, quit, or EOF ends it
//! docchat chat --file handbook.pdf
//!
//! # Inspect how a document chunks without spending tokens
//! docchat chunks --file handbook.pdf
//!
//! # Short summary, with the diagnostic trace on stderr
//! docchat summarize --file handbook.pdf --show-trace
//! ```
//!
//! `ask`, `chat`, and `summarize` need `OPENAI_API_KEY` in the environment;
//! `chunks` never contacts the API.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio::io::AsyncBufReadExt;

use docchat::answer::AnswerSynthesizer;
use docchat::completion::{Completer, OpenAiCompleter};
use docchat::config::{self, Config};
use docchat::extract::PdfExtractor;
use docchat::ingest::ingest_documents;
use docchat::models::Answer;
use docchat::retrieve::{KeywordStrategy, ModelRankStrategy, Retriever};
use docchat::session::ChatSession;
use docchat::summarize::summarize_document;
use docchat::trace::Trace;

/// docchat: ask questions about your PDF documents from the command line.
#[derive(Parser)]
#[command(
    name = "docchat",
    about = "Ask questions about local PDF documents using an OpenAI-compatible chat API",
    version
)]
struct Cli {
    /// Path to configuration file (TOML). Missing file means defaults.
    #[arg(long, global = true, default_value = "docchat.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ingest PDFs and answer a single question.
    Ask {
        /// PDF file to ingest (repeatable).
        #[arg(short = 'f', long = "file", required = true)]
        files: Vec<PathBuf>,

        /// The question to answer.
        question: String,

        /// Dump the session trace to stderr after answering.
        #[arg(long)]
        show_trace: bool,
    },

    /// Ingest PDFs, then answer questions interactively.
    ///
    /// Reads one question per line from stdin; `exit`, `quit`, or EOF ends
    /// the session. Empty lines are ignored.
    Chat {
        /// PDF file to ingest (repeatable).
        #[arg(short = 'f', long = "file", required = true)]
        files: Vec<PathBuf>,

        /// Dump the session trace to stderr when the session ends.
        #[arg(long)]
        show_trace: bool,
    },

    /// Ingest PDFs and print chunk counts without contacting the API.
    Chunks {
        /// PDF file to ingest (repeatable).
        #[arg(short = 'f', long = "file", required = true)]
        files: Vec<PathBuf>,
    },

    /// Print a model-written summary of one PDF.
    Summarize {
        /// PDF file to summarize.
        #[arg(short = 'f', long = "file")]
        file: PathBuf,

        /// Dump the session trace to stderr after summarizing.
        #[arg(long)]
        show_trace: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Ask {
            files,
            question,
            show_trace,
        } => run_ask(&cfg, &files, &question, show_trace).await,
        Commands::Chat { files, show_trace } => run_chat(&cfg, &files, show_trace).await,
        Commands::Chunks { files } => run_chunks(&cfg, &files),
        Commands::Summarize { file, show_trace } => run_summarize(&cfg, &file, show_trace).await,
    }
}

/// Wire a session from config: production completer behind both the
/// model-ranked retrieval fallback and the answer synthesizer.
fn build_session(cfg: &Config, completer: Arc<dyn Completer>) -> ChatSession {
    let retriever = Retriever::new(
        vec![
            Box::new(KeywordStrategy::new(cfg.retrieval.keyword_limit)),
            Box::new(ModelRankStrategy::new(
                completer.clone(),
                cfg.model.name.clone(),
            )),
        ],
        cfg.retrieval.window,
    );
    let synthesizer = AnswerSynthesizer::new(completer, cfg.model.name.clone());
    ChatSession::new(retriever, synthesizer)
}

fn production_completer(cfg: &Config) -> Result<Arc<dyn Completer>> {
    let completer = OpenAiCompleter::new(&cfg.model.base_url, cfg.model.request_timeout_secs)?;
    Ok(Arc::new(completer))
}

async fn run_ask(cfg: &Config, files: &[PathBuf], question: &str, show_trace: bool) -> Result<()> {
    let mut session = build_session(cfg, production_completer(cfg)?);
    session.load_documents(&PdfExtractor, files, cfg.chunking.max_chars)?;

    let result = session.ask(question).await;
    if let Ok(answer) = &result {
        print_answer(answer);
    }
    if show_trace {
        dump_trace(session.trace());
    }
    result?;
    Ok(())
}

async fn run_chat(cfg: &Config, files: &[PathBuf], show_trace: bool) -> Result<()> {
    let mut session = build_session(cfg, production_completer(cfg)?);
    session.load_documents(&PdfExtractor, files, cfg.chunking.max_chars)?;

    println!(
        "Loaded {} document(s), {} chunks. Ask away.",
        session.corpus().document_count(),
        session.corpus().total_chunks()
    );

    let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("docchat> ");
        std::io::stdout().flush()?;

        let line = match lines.next_line().await? {
            Some(line) => line,
            None => break,
        };
        let question = line.trim();
        if question.is_empty() {
            continue;
        }
        if question == "exit" || question == "quit" {
            break;
        }

        match session.ask(question).await {
            Ok(answer) => print_answer(&answer),
            Err(err) => eprintln!("Error: {}", err),
        }
    }

    if show_trace {
        dump_trace(session.trace());
    }
    Ok(())
}

fn run_chunks(cfg: &Config, files: &[PathBuf]) -> Result<()> {
    let mut trace = Trace::new();
    let corpus = ingest_documents(&PdfExtractor, files, cfg.chunking.max_chars, &mut trace)?;

    for doc in corpus.documents() {
        println!("{}: {} chunks", doc.name, doc.chunks.len());
    }
    println!("total: {} chunks", corpus.total_chunks());
    Ok(())
}

async fn run_summarize(cfg: &Config, file: &PathBuf, show_trace: bool) -> Result<()> {
    let completer = production_completer(cfg)?;
    let mut trace = Trace::new();
    let corpus = ingest_documents(
        &PdfExtractor,
        std::slice::from_ref(file),
        cfg.chunking.max_chars,
        &mut trace,
    )?;

    let result = match corpus.documents().next() {
        Some(doc) => {
            summarize_document(
                completer.as_ref(),
                &cfg.model.name,
                doc.name,
                doc.chunks,
                &mut trace,
            )
            .await
        }
        None => Err(anyhow::anyhow!(
            "{} could not be processed",
            file.display()
        )),
    };

    if show_trace {
        dump_trace(&trace);
    }

    let summary = result.with_context(|| format!("failed to summarize {}", file.display()))?;
    println!("{}", summary);
    Ok(())
}

fn print_answer(answer: &Answer) {
    println!("{}", answer.text);
    if !answer.passages.is_empty() {
        println!();
        println!("Context passages:");
        for passage in &answer.passages {
            let first_line = passage.text.lines().next().unwrap_or("");
            println!("  [{}] {}", passage.index, first_line);
        }
    }
}

fn dump_trace(trace: &Trace) {
    for entry in trace.entries() {
        eprintln!("{}", entry);
    }
}
