//! Muse CLI: journal extraction and prompt engine.
//!
//! Usage:
//!   muse add "entry text" [--draft] [--db path]
//!   muse extract "entry text"
//!   muse prompts [--tone cozy|neutral] [--count n]
//!   muse suggest
//!   muse blacklist <add|remove|list|clear> [word]
//!   muse use <prompt-id>

use clap::{Parser, Subcommand};
use muse::{
    ExtractedMetadata, LexiconTagger, MuseEngine, RelativeDateParser, SqliteStore, Tone,
};
use std::path::PathBuf;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Parser)]
#[command(
    name = "muse",
    version,
    about = "Journal metadata extraction and personalized writing prompts"
)]
struct Cli {
    /// Path to SQLite database file
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Save a journal entry and extract its metadata
    Add {
        /// Entry text
        text: String,
        /// Save as a draft (drafts never feed prompt windows)
        #[arg(long)]
        draft: bool,
    },
    /// Extract metadata from text without saving anything
    Extract {
        /// Entry text
        text: String,
    },
    /// Generate writing prompts from recent entries
    Prompts {
        /// Rendering tone (cozy or neutral)
        #[arg(long, default_value = "cozy")]
        tone: String,
        /// Maximum number of prompts
        #[arg(long, default_value_t = 3)]
        count: usize,
    },
    /// Show topic suggestion chips
    Suggest,
    /// Manage the blocked-word list
    Blacklist {
        #[command(subcommand)]
        action: BlacklistAction,
    },
    /// Mark a prompt as permanently used
    Use {
        /// Prompt id
        id: Uuid,
    },
}

#[derive(Subcommand)]
enum BlacklistAction {
    /// Block a word from people and topics
    Add { word: String },
    /// Unblock a word
    Remove { word: String },
    /// List blocked words
    List,
    /// Remove every blocked word
    Clear,
}

/// Default database path (~/.local/share/muse/muse.db)
fn default_db_path() -> PathBuf {
    let data_dir = dirs::data_dir()
        .unwrap_or_else(|| dirs::home_dir().unwrap_or_default().join(".local/share"));
    let muse_dir = data_dir.join("muse");
    std::fs::create_dir_all(&muse_dir).ok();
    muse_dir.join("muse.db")
}

fn open_engine(db: Option<PathBuf>) -> Result<Arc<MuseEngine>, String> {
    let db_path = db.unwrap_or_else(default_db_path);
    let store =
        SqliteStore::open(&db_path).map_err(|e| format!("Failed to open database: {}", e))?;
    Ok(Arc::new(MuseEngine::with_store(
        Arc::new(LexiconTagger::new()),
        Arc::new(RelativeDateParser::new()),
        Arc::new(store),
    )))
}

/// Metadata for prompt generation: the most recent saved entry's cache, or
/// a fresh extraction of its content when no cache exists
async fn latest_metadata(engine: &MuseEngine) -> ExtractedMetadata {
    let recent = match engine.entries().recent(1, false) {
        Ok(entries) => entries,
        Err(_) => return ExtractedMetadata::default(),
    };
    match recent.into_iter().next() {
        Some(entry) => match entry.metadata {
            Some(metadata) => metadata,
            None => engine.extract(&entry.content).await,
        },
        None => ExtractedMetadata::default(),
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), String> {
    let engine = open_engine(cli.db)?;

    match cli.command {
        Commands::Add { text, draft } => {
            let entry = engine
                .save_entry(&text, draft)
                .map_err(|e| format!("Failed to save entry: {}", e))?;
            engine.extract_and_attach(entry.id).await;
            println!("{}", entry.id);
        }
        Commands::Extract { text } => {
            let metadata = engine.extract(&text).await;
            let json = serde_json::to_string_pretty(&metadata)
                .map_err(|e| format!("Failed to encode metadata: {}", e))?;
            println!("{json}");
        }
        Commands::Prompts { tone, count } => {
            let tone = Tone::parse(&tone)
                .ok_or_else(|| format!("Unknown tone '{tone}' (expected cozy or neutral)"))?;
            let metadata = latest_metadata(&engine).await;
            let prompts = engine.generate_prompts(&metadata, tone, count, None);
            if prompts.is_empty() {
                println!("No prompts available.");
            }
            for prompt in prompts {
                println!("{}  {}", prompt.id, prompt.text);
            }
        }
        Commands::Suggest => {
            let metadata = latest_metadata(&engine).await;
            for suggestion in engine.default_topic_suggestions(&metadata) {
                println!("{}", suggestion.word);
            }
        }
        Commands::Blacklist { action } => match action {
            BlacklistAction::Add { word } => engine
                .blacklist()
                .add(&word)
                .map_err(|e| format!("Failed to add word: {}", e))?,
            BlacklistAction::Remove { word } => {
                let removed = engine
                    .blacklist()
                    .remove(&word)
                    .map_err(|e| format!("Failed to remove word: {}", e))?;
                if !removed {
                    println!("'{word}' was not blocked.");
                }
            }
            BlacklistAction::List => {
                let words = engine
                    .blacklist()
                    .all()
                    .map_err(|e| format!("Failed to list words: {}", e))?;
                for word in words {
                    println!("{word}");
                }
            }
            BlacklistAction::Clear => engine
                .blacklist()
                .clear()
                .map_err(|e| format!("Failed to clear blacklist: {}", e))?,
        },
        Commands::Use { id } => engine.mark_prompt_as_used(id),
    }
    Ok(())
}
