//! mapping-evaluator — binary entrypoint.
//! Loads config, mapping index, samples and ontology, then asks the scoring
//! endpoint to judge every (sample, candidate term) pair. Records go to stdout
//! as TSV; progress and timing go to stderr.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use mapping_evaluator::error::{EvalError, EXIT_FAILURE};
use mapping_evaluator::ontology::attributes::known_attribute_names;
use mapping_evaluator::samples::load_samples;
use mapping_evaluator::{
    run, AttributeSet, EvalConfig, EvalContext, HttpJudge, HttpJudgeOptions, MappingIndex,
    Ontology, RunOptions,
};

#[derive(Debug, Parser)]
#[command(
    name = "mapping-evaluator",
    version,
    about = "Evaluate ontology mapping results with an LLM judge"
)]
struct Cli {
    /// TSV of `<sample accession>\t<term id>` pairs to evaluate
    #[arg(short = 'r', long, alias = "evaluation_target_file")]
    evaluation_target_file: PathBuf,

    /// JSON array of sample records
    #[arg(short = 'b', long, alias = "biosample_json_file")]
    biosample_json_file: PathBuf,

    /// Evaluation config (JSON or TOML)
    #[arg(short = 'c', long, alias = "config_file", env = "MAPPING_EVAL_CONFIG")]
    config_file: PathBuf,

    /// Chat-completions URL of the scoring endpoint (e.g. llama.cpp server)
    #[arg(short = 'u', long, env = "MAPPING_EVAL_URL")]
    url: String,

    /// Max judgments in flight; output order is preserved
    #[arg(long, default_value_t = 1)]
    concurrency: usize,

    /// Model name sent with each request
    #[arg(long)]
    model: Option<String>,

    /// Per-request timeout in seconds (default: none)
    #[arg(long)]
    timeout_secs: Option<u64>,
}

/// Diagnostics go to stderr so stdout stays pure TSV.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .init();
}

async fn try_main(cli: Cli) -> anyhow::Result<()> {
    let cfg = EvalConfig::load_from_file(&cli.config_file)
        .map_err(EvalError::from)
        .with_context(|| format!("loading config {}", cli.config_file.display()))?;

    // Cheap inputs first so a typo'd path fails before the ontology load.
    let index = MappingIndex::load(&cli.evaluation_target_file).map_err(EvalError::from)?;
    let samples = load_samples(&cli.biosample_json_file).map_err(EvalError::from)?;

    let attributes = AttributeSet::resolve(&cfg.props_for_dump)
        .map_err(EvalError::from)
        .with_context(|| format!("known attributes: {}", known_attribute_names().join(", ")))?;

    let ontology = Ontology::load(&cfg.ontology_file).map_err(EvalError::from)?;

    let judge = HttpJudge::new(
        cli.url.as_str(),
        HttpJudgeOptions {
            timeout: cli.timeout_secs.map(Duration::from_secs),
            model: cli.model.clone(),
        },
    )
    .map_err(EvalError::from)?;

    let templates = cfg.templates();
    let ctx = EvalContext {
        ontology: &ontology,
        namespace: &cfg.base_uri,
        attributes: &attributes,
        templates: &templates,
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run(
        &ctx,
        &index,
        &samples,
        &judge,
        &mut out,
        RunOptions {
            concurrency: cli.concurrency,
        },
    )
    .await?;
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Load .env if present (MAPPING_EVAL_URL / MAPPING_EVAL_CONFIG / RUST_LOG).
    let _ = dotenvy::dotenv();
    init_tracing();

    let cli = Cli::parse();
    if let Err(err) = try_main(cli).await {
        let code = err
            .downcast_ref::<EvalError>()
            .map(EvalError::exit_code)
            .unwrap_or(EXIT_FAILURE);
        error!("{err:#}");
        std::process::exit(code);
    }
}
