use std::io::{self, Write};
use std::path::PathBuf;

use clap::Parser;

use tweet_threads::input::{load_tweets, load_tweets_from_path};
use tweet_threads::{ThreadReconstructor, ThreadingConfig};

#[derive(Parser, Debug)]
#[command(
    name = "reconstruct_timeline",
    about = "Rebuild threads from a flat tweet payload and print the timeline as JSON"
)]
struct Args {
    /// JSON file with a tweet array or `{"data": [...]}` envelope. Reads stdin when omitted.
    #[arg(long)]
    input: Option<PathBuf>,

    /// Override the reply walk depth limit (defaults to THREADING_MAX_WALK_DEPTH or 10).
    #[arg(long)]
    max_walk_depth: Option<usize>,

    /// Pretty-print the output.
    #[arg(long)]
    pretty: bool,

    /// Print every fallback taken during reconstruction to stderr.
    #[arg(long)]
    report: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();

    let args = Args::parse();

    let tweets = match &args.input {
        Some(path) => load_tweets_from_path(path)?,
        None => load_tweets(io::stdin().lock())?,
    };

    let mut config = ThreadingConfig::from_env();
    if let Some(depth) = args.max_walk_depth {
        config = config.with_max_walk_depth(depth);
    }

    let reconstruction = ThreadReconstructor::new(config).reconstruct(&tweets);
    log::info!(
        "{} tweets -> {} timeline items",
        tweets.len(),
        reconstruction.items.len()
    );

    if args.report {
        let mut stderr = io::stderr().lock();
        for degradation in &reconstruction.degradations {
            writeln!(stderr, "warning: {degradation}")?;
        }
    }

    let mut stdout = io::stdout().lock();
    if args.pretty {
        serde_json::to_writer_pretty(&mut stdout, &reconstruction.items)?;
    } else {
        serde_json::to_writer(&mut stdout, &reconstruction.items)?;
    }
    writeln!(stdout)?;

    Ok(())
}
