//! Seeds a running survey server with generated submissions, then prints the
//! tally it reports.
use anyhow::{Result, bail};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

const QUESTION_COUNT: usize = 11;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    #[arg(long, default_value = "http://localhost:1111")]
    url: String,

    #[arg(long, default_value_t = 10)]
    count: u32,
}

#[derive(Deserialize)]
struct Tally {
    yes: u64,
    no: u64,
}

#[derive(Deserialize)]
struct Aggregate {
    counts: Vec<Tally>,
}

/// Deterministic spread of yes/no/null so repeated runs are comparable.
fn answers(seed: u32) -> Vec<Option<bool>> {
    (0..QUESTION_COUNT as u32)
        .map(|question| match (seed + question) % 3 {
            0 => Some(true),
            1 => Some(false),
            _ => None,
        })
        .collect()
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let client = Client::new();

    let pb = ProgressBar::new(args.count as u64);
    pb.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
        )?
        .progress_chars("=> "),
    );

    for seed in 0..args.count {
        let res = client
            .post(format!("{}/api/submit", args.url))
            .json(&json!({ "answers": answers(seed) }))
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            pb.abandon_with_message("Submit failed");
            bail!("Submit failed with {status}: {}", res.text().await?);
        }

        pb.inc(1);
    }

    pb.finish_with_message("Done");

    let aggregate: Aggregate = client
        .get(format!("{}/api/aggregate", args.url))
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;

    println!("\n{:>3} {:>6} {:>6}", "#", "yes", "no");
    for (index, tally) in aggregate.counts.iter().enumerate() {
        println!("{index:>3} {:>6} {:>6}", tally.yes, tally.no);
    }

    Ok(())
}
