// ABOUTME: CLI for normalizing podcast feeds with castline-feed.
// ABOUTME: Fetches a feed from URL or file/stdin and prints the normalized JSON.

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{anyhow, bail, Result};
use castline_feed::{parse_and_normalize, NormalizeOptions, DEFAULT_MAX_EPISODES};
use clap::Parser;
use serde_json::{json, Value};

/// Normalize one or more RSS/Atom podcast feeds and output JSON.
#[derive(Parser, Debug)]
#[command(name = "castline-cli")]
#[command(about = "Normalize podcast feeds with castline and print JSON", long_about = None)]
struct Args {
    /// Feed URL(s) (http/https) or local file paths. Use "-" to read one feed from stdin.
    #[arg(required = true)]
    targets: Vec<String>,

    /// Maximum episodes kept per feed.
    #[arg(long, default_value_t = DEFAULT_MAX_EPISODES)]
    max_episodes: usize,

    /// Output compact JSON instead of pretty.
    #[arg(long, default_value_t = false)]
    compact: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    if args.max_episodes == 0 {
        bail!("--max-episodes must be greater than zero");
    }

    let opts = NormalizeOptions {
        max_episodes: args.max_episodes,
    };

    let results: Vec<Value> = args
        .targets
        .iter()
        .map(|target| {
            let outcome = load_bytes(target)
                .and_then(|bytes| parse_and_normalize(&bytes, &opts).map_err(anyhow::Error::new));
            match outcome {
                Ok(feed) => json!({ "target": target, "ok": true, "feed": feed, "error": null }),
                Err(err) => json!({ "target": target, "ok": false, "feed": null, "error": err.to_string() }),
            }
        })
        .collect();

    let output = render_output(results);

    if args.compact {
        println!("{}", serde_json::to_string(&output)?);
    } else {
        println!("{}", serde_json::to_string_pretty(&output)?);
    }

    Ok(())
}

fn is_ok(result: &Value) -> bool {
    result.get("ok").and_then(Value::as_bool) == Some(true)
}

/// A single successful target prints the feed itself; anything else prints
/// an envelope with per-target results and counts.
fn render_output(mut results: Vec<Value>) -> Value {
    if results.len() == 1 && is_ok(&results[0]) {
        let mut only = results.remove(0);
        return only["feed"].take();
    }

    let total = results.len();
    let parsed = results.iter().filter(|r| is_ok(r)).count();
    json!({
        "total_feeds": total,
        "parsed": parsed,
        "failed": total - parsed,
        "feeds": results
    })
}

fn load_bytes(target: &str) -> Result<Vec<u8>> {
    if target == "-" {
        let mut buf = Vec::new();
        io::stdin().read_to_end(&mut buf)?;
        return Ok(buf);
    }

    if target.starts_with("http://") || target.starts_with("https://") {
        let resp = reqwest::blocking::get(target)?.error_for_status()?;
        return Ok(resp.bytes()?.to_vec());
    }

    let path = PathBuf::from(target);
    if !path.exists() {
        return Err(anyhow!("file not found: {}", target));
    }
    Ok(fs::read(path)?)
}
