//! # DocQA: answers from your own documents
//!
//! Usage:
//!   docqa chunks notes.md                     # Show how a document is chunked
//!   docqa search a.txt b.md -q "leave policy" # Rank chunks without calling a model
//!   docqa ask hr.md -q "How many leave days?" # One cited answer
//!   docqa chat hr.md --export chat.md         # Interactive session
//!   docqa providers                           # Provider chain and credentials
//!   docqa config                              # Effective config, keys masked

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use docqa_agent::{Conversation, DocQa};
use docqa_core::DocQaConfig;
use docqa_core::types::AnswerResult;
use docqa_knowledge::intake::mime_for_name;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "docqa",
    version,
    about = "📚 DocQA — answers strictly from your documents, with cited sources"
)]
struct Cli {
    /// Config file (default: ~/.docqa/config.toml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the chunks produced for a document
    Chunks {
        file: String,
    },
    /// Rank indexed chunks for a query
    Search {
        #[arg(required = true)]
        files: Vec<String>,
        #[arg(short, long)]
        query: String,
        /// Number of chunks (default: retrieval.top_k)
        #[arg(short = 'k', long)]
        top_k: Option<usize>,
    },
    /// Ask a single question
    Ask {
        #[arg(required = true)]
        files: Vec<String>,
        #[arg(short, long)]
        query: String,
        /// Provider to try first (deepseek, kimi)
        #[arg(short, long)]
        model: Option<String>,
    },
    /// Interactive question loop
    Chat {
        files: Vec<String>,
        #[arg(short, long)]
        model: Option<String>,
        /// Write the conversation on exit (.md, .json or .txt)
        #[arg(long)]
        export: Option<String>,
    },
    /// Show the provider chain
    Providers,
    /// Show the effective configuration
    Config,
}

fn expand_path(p: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(p).to_string())
}

fn load_config(path: Option<&str>) -> Result<DocQaConfig> {
    let config = match path {
        Some(p) => DocQaConfig::load_from(&expand_path(p))?,
        None => DocQaConfig::load()?,
    };
    tracing::debug!(
        "Config: chunk_size={} overlap={} top_k={} providers={:?}",
        config.documents.chunk_size,
        config.documents.chunk_overlap,
        config.retrieval.top_k,
        config.providers.default_order
    );
    Ok(config)
}

fn ingest_file(qa: &DocQa, path: &str) -> Result<usize> {
    let path = expand_path(path);
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .map(String::from)
        .with_context(|| format!("not a file path: {}", path.display()))?;
    let bytes = std::fs::read(&path).with_context(|| format!("failed to read {}", path.display()))?;
    let count = qa.ingest(&bytes, &name, mime_for_name(&name))?;
    Ok(count)
}

fn ingest_all(qa: &DocQa, files: &[String]) -> Result<()> {
    for file in files {
        let count = ingest_file(qa, file)?;
        println!("📄 {file}: {count} chunks");
    }
    Ok(())
}

fn print_answer(result: &AnswerResult) {
    println!("\n{}\n", result.response_text);
    if !result.source_documents.is_empty() {
        println!("📎 Sources: {}", result.source_documents.join(", "));
    }
    println!("🤖 Model: {}", result.model_used);
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "docqa=debug,docqa_agent=debug,docqa_knowledge=debug,docqa_providers=debug,docqa_core=debug"
    } else {
        "docqa=info,docqa_agent=info,docqa_knowledge=info,docqa_providers=warn,docqa_core=warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_target(false)
        .init();

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Config => {
            println!("{}", toml::to_string_pretty(&config.masked())?);
        }
        Command::Providers => {
            let unused = docqa_providers::unused_providers(&config);
            let qa = DocQa::new(config)?;
            println!("🔌 Provider chain (default order):");
            for (i, (id, name, ready)) in qa.chain().availability().into_iter().enumerate() {
                let status = if ready { "✅ key found" } else { "❌ no key" };
                println!("  {}. {name} ({id}) — {status}", i + 1);
            }
            if !unused.is_empty() {
                println!("   Not in providers.default_order: {}", unused.join(", "));
            }
        }
        Command::Chunks { file } => {
            let qa = DocQa::new(config)?;
            ingest_file(&qa, &file)?;
            for chunk in qa.index().all_chunks() {
                println!(
                    "── {} [{}/{}] {} chars",
                    chunk.id,
                    chunk.chunk_index + 1,
                    chunk.total_chunks,
                    chunk.text.chars().count()
                );
                println!("{}\n", chunk.text);
            }
        }
        Command::Search { files, query, top_k } => {
            let top_k = top_k.unwrap_or(config.retrieval.top_k);
            let qa = DocQa::new(config)?;
            ingest_all(&qa, &files)?;
            let retrieval = qa.search(&query, top_k);
            if retrieval.fallback {
                println!("⚠️ No lexical match; showing opening chunks of each document");
            }
            for (rank, scored) in retrieval.chunks.iter().enumerate() {
                let preview: String = scored.chunk.text.chars().take(120).collect();
                println!("{:>2}. [{}] {} — {}", rank + 1, scored.score, scored.chunk.id, preview);
            }
        }
        Command::Ask { files, query, model } => {
            let qa = DocQa::new(config)?;
            ingest_all(&qa, &files)?;
            let result = qa.answer(&query, model.as_deref(), &[]).await?;
            print_answer(&result);
        }
        Command::Chat { files, model, export } => {
            let history_window = config.retrieval.history_window;
            let mut conversation = Conversation::new(config.conversation.max_history);
            let qa = DocQa::new(config)?;
            ingest_all(&qa, &files)?;
            println!("💬 Ask about your documents. Commands: /docs, /remove <name>, /reset, /quit");

            let mut lines = BufReader::new(tokio::io::stdin()).lines();
            while let Some(line) = lines.next_line().await? {
                let question = match handle_line(&qa, &mut conversation, &line) {
                    ReplAction::Quit => break,
                    ReplAction::Handled => continue,
                    ReplAction::Ask(question) => question,
                };

                match qa
                    .answer(question, model.as_deref(), conversation.recent(history_window))
                    .await
                {
                    Ok(result) => {
                        print_answer(&result);
                        conversation.push_exchange(question, &result);
                    }
                    Err(e) => eprintln!("❌ {e}"),
                }
            }

            if let Some(path) = export {
                write_export(&conversation, &expand_path(&path))?;
                println!("💾 Saved conversation to {path}");
            }
        }
    }

    Ok(())
}

/// What the chat loop should do with one input line.
#[derive(Debug, PartialEq, Eq)]
enum ReplAction<'a> {
    Quit,
    Handled,
    Ask(&'a str),
}

/// Run slash commands in place; anything else is a question.
fn handle_line<'a>(qa: &DocQa, conversation: &mut Conversation, line: &'a str) -> ReplAction<'a> {
    let line = line.trim();
    match line {
        "" => ReplAction::Handled,
        "/quit" | "/exit" => ReplAction::Quit,
        "/reset" => {
            conversation.clear();
            qa.reset();
            println!("🧹 Conversation and documents cleared");
            ReplAction::Handled
        }
        "/docs" => {
            for doc in qa.documents() {
                println!("  {} — {} chunks, {} bytes", doc.name, doc.chunk_count, doc.size_bytes);
            }
            ReplAction::Handled
        }
        _ => match line.strip_prefix("/remove ") {
            Some(name) => {
                let name = name.trim();
                if qa.remove_document(name) {
                    println!("🗑️ Removed {name}");
                } else {
                    println!("⚠️ No document named {name}");
                }
                ReplAction::Handled
            }
            None => ReplAction::Ask(line),
        },
    }
}

fn write_export(conversation: &Conversation, path: &Path) -> Result<()> {
    conversation
        .export_to(path)
        .with_context(|| format!("failed to export conversation to {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> (DocQa, Conversation) {
        let qa = DocQa::new(DocQaConfig::default()).unwrap();
        qa.ingest(b"Annual leave is 20 days.", "hr.txt", "text/plain").unwrap();
        let mut conversation = Conversation::new(20);
        conversation.push_exchange(
            "leave?",
            &AnswerResult {
                response_text: "20 days".into(),
                source_documents: vec!["hr.txt".into()],
                model_used: "DeepSeek".into(),
            },
        );
        (qa, conversation)
    }

    #[test]
    fn test_reset_clears_conversation_and_index() {
        let (qa, mut conversation) = session();
        assert_eq!(handle_line(&qa, &mut conversation, "/reset"), ReplAction::Handled);
        assert!(conversation.is_empty());
        assert!(qa.list_documents().is_empty());
        assert!(qa.documents().is_empty());
    }

    #[test]
    fn test_remove_and_questions() {
        let (qa, mut conversation) = session();
        assert_eq!(handle_line(&qa, &mut conversation, "/remove hr.txt"), ReplAction::Handled);
        assert!(qa.list_documents().is_empty());
        assert!(!conversation.is_empty());

        assert_eq!(handle_line(&qa, &mut conversation, "  how long?  "), ReplAction::Ask("how long?"));
        assert_eq!(handle_line(&qa, &mut conversation, "   "), ReplAction::Handled);
        assert_eq!(handle_line(&qa, &mut conversation, "/quit"), ReplAction::Quit);
    }
}
