mod config;
mod output;

use std::fs;
use std::io::{self, BufRead, Read};

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use stacktoken_codec::Decoder;
use stacktoken_query::{decode_batch_base64, BatchOutcome, QueryResponse, ViewDecoder};
use stacktoken_types::{Answer, Question};
use tracing::info;

use config::{Cli, Command, Format};

/// Records from the command line, or one per non-empty stdin line.
fn read_records(args: Vec<String>) -> Result<Vec<String>> {
    if !args.is_empty() {
        return Ok(args);
    }
    let mut out = Vec::new();
    for line in io::stdin().lock().lines() {
        let line = line.context("read stdin")?;
        let line = line.trim();
        if !line.is_empty() {
            out.push(line.to_string());
        }
    }
    Ok(out)
}

fn read_response(path: &str) -> Result<QueryResponse> {
    let text = if path == "-" {
        let mut s = String::new();
        io::stdin()
            .read_to_string(&mut s)
            .context("read response from stdin")?;
        s
    } else {
        fs::read_to_string(path).with_context(|| format!("read response file {path}"))?
    };
    QueryResponse::from_json(&text).with_context(|| format!("parse response {path}"))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_lines(lines: Vec<String>) {
    for line in lines {
        println!("{line}");
    }
}

fn log_summary<T>(kind: &str, batch: &BatchOutcome<T>) {
    info!(
        kind,
        decoded = batch.records.len(),
        dropped = batch.failed.len(),
        "batch decoded"
    );
}

fn main() -> Result<()> {
    let _ = dotenv::dotenv();
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(cli.log_level)
        .with_writer(io::stderr)
        .init();

    let decoder = Decoder::new(cli.decode_options());
    let now = output::now();

    match cli.command {
        Command::Questions { records } => {
            let records = read_records(records)?;
            let batch: BatchOutcome<Question> = decode_batch_base64(&decoder, &records);
            log_summary("question", &batch);
            match cli.format {
                Format::Json => print_json(&batch)?,
                Format::Text => print_lines(output::question_batch_lines(&batch, cli.decimals, now)),
            }
        }

        Command::Answers { records } => {
            let records = read_records(records)?;
            let batch: BatchOutcome<Answer> = decode_batch_base64(&decoder, &records);
            log_summary("answer", &batch);
            match cli.format {
                Format::Json => print_json(&batch)?,
                Format::Text => print_lines(output::answer_batch_lines(&batch)),
            }
        }

        Command::View { name, response } => {
            let resp = read_response(&response)?;
            let out = ViewDecoder::new(decoder)
                .decode(name, &resp)
                .with_context(|| format!("decode {name}"))?;
            info!(view = %name, items = resp.return_data.len(), "view decoded");
            match cli.format {
                Format::Json => print_json(&out)?,
                Format::Text => print_lines(output::view_lines(&out, cli.decimals, now)),
            }
        }
    }

    Ok(())
}
