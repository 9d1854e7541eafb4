use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use searchcore::corpus::load_documents;
use searchcore::InvertedIndex;
use tracing_subscriber::{fmt, EnvFilter};

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

mod render;

const QUIT: &str = "0";
const PROMPT: &str = "Search for sonnets ('0' to quit)> ";

#[derive(Parser)]
#[command(name = "sonnets")]
#[command(about = "Search Shakespeare's sonnets for words they all contain", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every sonnet in the corpus
    List {
        /// Corpus JSON file or a directory of them
        #[arg(long, default_value = "./data/shakespeare_sonnets.json")]
        corpus: PathBuf,
    },
    /// Run a single query and print the matches
    Search {
        #[arg(long, default_value = "./data/shakespeare_sonnets.json")]
        corpus: PathBuf,
        /// Query words; every one must appear in a match
        #[arg(required = true)]
        query: Vec<String>,
    },
    /// Prompt for queries until '0' is entered
    Repl {
        #[arg(long, default_value = "./data/shakespeare_sonnets.json")]
        corpus: PathBuf,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).with_writer(io::stderr).init();
    let cli = Cli::parse();
    let stdout = io::stdout();

    match cli.command {
        Commands::List { corpus } => {
            let index = open_index(&corpus)?;
            let mut docs: Vec<_> = index.documents().iter().collect();
            docs.sort_by_key(|d| d.id());
            let mut out = stdout.lock();
            for doc in docs {
                writeln!(out, "{}", render::heading(doc))?;
            }
            Ok(())
        }
        Commands::Search { corpus, query } => {
            let index = open_index(&corpus)?;
            let query = query.join(" ");
            let hits = index.search(&query);
            write!(stdout.lock(), "{}", render::results(&query, &hits))?;
            Ok(())
        }
        Commands::Repl { corpus } => {
            let index = open_index(&corpus)?;
            run_repl(&index, io::stdin().lock(), stdout.lock())
        }
    }
}

fn open_index(corpus: &Path) -> Result<InvertedIndex> {
    let docs = load_documents(corpus).with_context(|| format!("loading corpus from {}", corpus.display()))?;
    let index = InvertedIndex::build(docs).context("building index")?;
    tracing::info!(num_docs = index.num_docs(), num_terms = index.num_terms(), "index ready");
    Ok(index)
}

/// Answer queries read from `input` until '0' or end of input.
fn run_repl<R: BufRead, W: Write>(index: &InvertedIndex, mut input: R, mut out: W) -> Result<()> {
    writeln!(out, "\nWelcome to Shakespeare Sonnets Search!")?;
    writeln!(out, "Type '{QUIT}' to quit.\n")?;

    let mut line = String::new();
    loop {
        write!(out, "{PROMPT}")?;
        out.flush()?;
        line.clear();
        if input.read_line(&mut line)? == 0 {
            writeln!(out)?;
            break;
        }
        let query = line.trim();
        if query == QUIT {
            writeln!(out, "Goodbye!")?;
            break;
        }
        let hits = index.search(query);
        writeln!(out, "{}", render::results(query, &hits))?;
    }
    Ok(())
}
