use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use snip_core::config::{DEFAULT_B, DEFAULT_K1};
use snip_core::corpus::{load_corpus, load_stopwords};
use snip_core::{Bm25Params, DocId, IndexPaths, Normalizer, SearchEngine};
use tracing_subscriber::{fmt, EnvFilter};

use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "snip")]
#[command(about = "Keyword search over a movie catalog with TF-IDF and BM25", long_about = None)]
struct Cli {
    #[command(flatten)]
    config: Config,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct Config {
    /// Corpus JSON file ({"movies": [...]}), needed by `build`
    #[arg(long, global = true, env = "DB_FILE_PATH")]
    data: Option<PathBuf>,
    /// Whitespace-separated stopword list; the built-in English list is used when absent
    #[arg(long, global = true, env = "STOP_WORD_FILE_PATH")]
    stopwords: Option<PathBuf>,
    /// Index artifact file, its directory is created on build
    #[arg(long, global = true, env = "INDEX_PATH", default_value = "cache/inverted_index.bin")]
    index: PathBuf,
    /// BM25 term-frequency saturation
    #[arg(long, global = true, env = "BM25_K1", default_value_t = DEFAULT_K1, value_parser = parse_k1)]
    k1: f64,
    /// BM25 length normalization, 0 = none, 1 = full
    #[arg(long, global = true, env = "BM25_B", default_value_t = DEFAULT_B, value_parser = parse_b)]
    b: f64,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the inverted index from the corpus, replacing any existing one
    Build,
    #[command(flatten)]
    Query(QueryCommand),
}

/// Commands answered from the persisted index.
#[derive(Subcommand)]
enum QueryCommand {
    /// Documents sharing any token with the query (at most 5, unranked)
    Search {
        #[arg(required = true)]
        query: Vec<String>,
    },
    /// Documents ranked by BM25
    #[command(name = "bm25search")]
    Bm25search {
        #[arg(required = true)]
        query: Vec<String>,
        /// Maximum number of results
        #[arg(long, default_value_t = 5)]
        limit: usize,
    },
    /// Raw term frequency of a term in a document
    #[command(allow_negative_numbers = true)]
    Tf { doc_id: DocId, term: String },
    /// Inverse document frequency of a term
    Idf { term: String },
    /// TF-IDF of a term in a document
    #[command(allow_negative_numbers = true)]
    Tfidf { doc_id: DocId, term: String },
    /// BM25 term-frequency component
    #[command(name = "bm25tf", allow_negative_numbers = true)]
    Bm25tf {
        doc_id: DocId,
        term: String,
        /// Overrides the configured k1 for this call
        #[arg(long, value_parser = parse_k1)]
        override_k1: Option<f64>,
        /// Overrides the configured b for this call
        #[arg(long, value_parser = parse_b)]
        override_b: Option<f64>,
    },
    /// BM25 inverse document frequency of a term
    #[command(name = "bm25idf")]
    Bm25idf { term: String },
    /// Combined BM25 score of a term in a document
    #[command(name = "bm25", allow_negative_numbers = true)]
    Bm25 { doc_id: DocId, term: String },
}

fn main() -> Result<()> {
    // Settings in ./.env fill in variables the process environment leaves unset
    dotenvy::dotenv().ok();
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    let normalizer = match &cli.config.stopwords {
        Some(path) => Normalizer::with_stopwords(load_stopwords(path)?),
        None => Normalizer::english(),
    };
    let params = Bm25Params::new(cli.config.k1, cli.config.b)?;
    let paths = IndexPaths::new(&cli.config.index);

    match cli.command {
        Commands::Build => {
            let data = cli.config.data.context("--data or DB_FILE_PATH must be set to build the index")?;
            let corpus = load_corpus(&data)?;
            println!("Creating inverted index for {} documents", corpus.len());
            let mut engine = SearchEngine::new(normalizer, params, paths);
            engine.rebuild(&corpus)?;
            Ok(())
        }
        Commands::Query(command) => {
            let engine = SearchEngine::open(normalizer, params, paths)
                .context("failed to load index, run `snip build` first")?;
            run_query(&engine, command)
        }
    }
}

fn run_query(engine: &SearchEngine, command: QueryCommand) -> Result<()> {
    match command {
        QueryCommand::Search { query } => {
            let query = query.join(" ");
            let results = engine.search(&query)?;
            if results.is_empty() {
                println!("No movies found.");
            }
            for (i, doc) in results.iter().enumerate() {
                println!("{}. ({}) {}", i + 1, doc.id, doc.title);
            }
        }
        QueryCommand::Bm25search { query, limit } => {
            let query = query.join(" ");
            let results = engine.search_bm25(&query, limit)?;
            if results.is_empty() {
                println!("No movies found.");
            }
            for (i, r) in results.iter().enumerate() {
                println!("{}. ({}) {} - Score: {:.2}", i + 1, r.id, r.document.title, r.score);
            }
        }
        QueryCommand::Tf { doc_id, term } => {
            let tf = engine.term_frequency(doc_id, &term)?;
            println!("Term frequency of '{term}' in document {doc_id}: {tf}");
        }
        QueryCommand::Idf { term } => {
            let idf = engine.inverse_document_frequency(&term)?;
            println!("Inverse document frequency of '{term}': {idf:.2}");
        }
        QueryCommand::Tfidf { doc_id, term } => {
            let score = engine.tf_idf(doc_id, &term)?;
            println!("TF-IDF score of '{term}' in document {doc_id}: {score:.2}");
        }
        QueryCommand::Bm25tf { doc_id, term, override_k1, override_b } => {
            let score = engine.bm25_tf(doc_id, &term, override_k1, override_b)?;
            println!("BM25 TF score of '{term}' in document {doc_id}: {score:.2}");
        }
        QueryCommand::Bm25idf { term } => {
            let score = engine.bm25_idf(&term)?;
            println!("BM25 IDF score of '{term}': {score:.2}");
        }
        QueryCommand::Bm25 { doc_id, term } => {
            let score = engine.bm25(doc_id, &term)?;
            println!("BM25 score of '{term}' in document {doc_id}: {score:.2}");
        }
    }
    Ok(())
}

fn parse_k1(s: &str) -> std::result::Result<f64, String> {
    let k1: f64 = s.parse().map_err(|e| format!("{e}"))?;
    Bm25Params::new(k1, DEFAULT_B).map(|p| p.k1).map_err(|e| e.to_string())
}

fn parse_b(s: &str) -> std::result::Result<f64, String> {
    let b: f64 = s.parse().map_err(|e| format!("{e}"))?;
    Bm25Params::new(DEFAULT_K1, b).map(|p| p.b).map_err(|e| e.to_string())
}
