//! Flatten one attribute's mappings from a selection-stage JSON result into TSV:
//! `<accession>\t<extracted text>\t<term id>\t<label>`.

use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use mapping_evaluator::select::{flatten_select_results, load_select_results};

#[derive(Debug, Parser)]
#[command(name = "select_to_tsv", about = "Extract one attribute's mappings into TSV")]
struct Args {
    /// JSON file written by the selection stage
    select_result_file: PathBuf,
    /// Attribute to extract (e.g. `cell_line`, `tissue`)
    attr: String,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_target(false)
        .init();
    let args = Args::parse();

    let root = load_select_results(&args.select_result_file)
        .with_context(|| format!("reading {}", args.select_result_file.display()))?;
    let rows = flatten_select_results(&root, &args.attr)?;
    tracing::debug!(rows = rows.len(), attr = %args.attr, "flattened");

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    for row in &rows {
        writeln!(out, "{row}")?;
    }
    out.flush()?;
    Ok(())
}
