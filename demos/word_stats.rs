//! Prints word statistics for a text file (or stdin).
//!
//! ```text
//! cargo run --example word_stats -- book.txt --words
//! RUST_LOG=wordtree=trace cargo run --example word_stats -- book.txt
//! ```

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use wordtree::WordTree;

#[derive(Parser, Debug)]
#[command(name = "word_stats", about = "Count word frequencies with an AVL tree")]
struct Args {
    /// Text file to read; reads stdin when omitted
    input: Option<PathBuf>,

    /// List every word with its count
    #[arg(long)]
    words: bool,

    /// Remove a word before reporting (repeatable)
    #[arg(long = "remove", value_name = "WORD")]
    remove: Vec<String>,
}

fn init_logging() {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("wordtree=info,word_stats=info"));

    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().compact().with_writer(io::stderr));

    let _ = tracing::dispatcher::set_global_default(tracing::Dispatch::new(subscriber));
}

fn main() -> Result<()> {
    init_logging();
    let args = Args::parse();

    let mut tree = match &args.input {
        Some(path) => WordTree::from_path(path)
            .with_context(|| format!("failed to read words from {}", path.display()))?,
        None => WordTree::from_reader(io::stdin().lock()).context("failed to read words from stdin")?,
    };
    info!(distinct = tree.distinct_words(), "loaded word list");

    for word in &args.remove {
        if !tree.remove(word) {
            info!(%word, "word not present, nothing removed");
        }
    }

    if args.words {
        print!("{}", tree.listing());
    }
    print!("{}", tree.statistics());
    Ok(())
}
