// src/evaluate.rs
//! # Evaluation driver
//! samples × candidate terms → one TSV record per pair, streamed in input order.
//!
//! Policy: fail fast. The first error stops the run; records already written
//! stay written. With `concurrency > 1` several judgments are in flight at
//! once but records are still emitted in input order.

use std::collections::HashSet;
use std::fmt;
use std::io::Write;
use std::time::{Duration, Instant};

use futures::stream::{self, StreamExt};
use tracing::{debug, info};

use crate::error::EvalError;
use crate::judge::Judge;
use crate::mapping::MappingIndex;
use crate::ontology::{AttributeSet, Ontology};
use crate::prompt::{build_prompt, PromptTemplates};
use crate::samples::Sample;

/// Read-only inputs shared by every judgment.
#[derive(Debug, Clone, Copy)]
pub struct EvalContext<'a> {
    pub ontology: &'a Ontology,
    pub namespace: &'a str,
    pub attributes: &'a AttributeSet,
    pub templates: &'a PromptTemplates,
}

#[derive(Debug, Clone, Copy)]
pub struct RunOptions {
    /// Max judgments in flight. 1 = strictly sequential.
    pub concurrency: usize,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self { concurrency: 1 }
    }
}

/// One output row.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationRecord {
    pub accession: String,
    pub term_id: String,
    /// Empty for the "no term" candidate.
    pub label: String,
    pub verdict: String,
    pub confidence: f64,
}

impl fmt::Display for EvaluationRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\t{}\t{}\t{}\t{}",
            self.accession,
            self.term_id,
            self.label,
            self.verdict,
            format_confidence(self.confidence)
        )
    }
}

/// Shortest round-trip form, keeping a trailing `.0` on integral values (`1.0`).
pub fn format_confidence(c: f64) -> String {
    if c.is_finite() && c.fract() == 0.0 {
        format!("{c:.1}")
    } else {
        format!("{c}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunSummary {
    pub records: usize,
    pub elapsed: Duration,
}

/// A pair ready to be sent to the judge.
#[derive(Debug, Clone)]
pub struct PreparedPair<'s> {
    pub sample: &'s Sample,
    pub term_id: &'s str,
    pub label: String,
    pub prompt: String,
}

/// Resolve term context (if any) and render the prompt for one pair.
pub fn prepare<'s>(
    ctx: &EvalContext<'_>,
    sample: &'s Sample,
    term_id: &'s str,
) -> Result<PreparedPair<'s>, EvalError> {
    let (rendering, label) = if term_id.is_empty() {
        (String::new(), String::new())
    } else {
        (
            ctx.ontology.render(term_id, ctx.namespace, ctx.attributes)?,
            ctx.ontology.label_of(term_id, ctx.namespace)?,
        )
    };
    let prompt =
        build_prompt(sample, &rendering, ctx.templates).map_err(|source| EvalError::Serialize {
            accession: sample.accession.clone(),
            source,
        })?;
    Ok(PreparedPair {
        sample,
        term_id,
        label,
        prompt,
    })
}

/// Every sample id in the index must exist in the sample collection.
pub fn check_index_samples(index: &MappingIndex, samples: &[Sample]) -> Result<(), EvalError> {
    let known: HashSet<&str> = samples.iter().map(|s| s.accession.as_str()).collect();
    match index.sample_ids().find(|id| !known.contains(id)) {
        Some(missing) => Err(EvalError::UnknownSample {
            accession: missing.to_string(),
        }),
        None => Ok(()),
    }
}

pub async fn run<J, W>(
    ctx: &EvalContext<'_>,
    index: &MappingIndex,
    samples: &[Sample],
    judge: &J,
    out: &mut W,
    options: RunOptions,
) -> Result<RunSummary, EvalError>
where
    J: Judge + ?Sized,
    W: Write,
{
    info!(
        samples = samples.len(),
        candidates = index.total_candidates(),
        judge = judge.name(),
        concurrency = options.concurrency.max(1),
        "Performing evaluation..."
    );
    let started = Instant::now();

    check_index_samples(index, samples)?;

    // 1) (sample, term) pairs in output order; an unmapped sample becomes an error slot
    let pairs = samples.iter().flat_map(|sample| {
        match index.candidates(&sample.accession) {
            Some(terms) => terms
                .iter()
                .map(|t| Ok((sample, t.as_str())))
                .collect::<Vec<_>>(),
            None => vec![Err(EvalError::SampleNotMapped {
                accession: sample.accession.clone(),
            })],
        }
    });

    // 2) prepare + judge, at most `concurrency` in flight, results in order
    let results = stream::iter(pairs)
        .map(move |pair| async move {
            let (sample, term_id) = pair?;
            let prepared = prepare(ctx, sample, term_id)?;
            let judgment =
                judge
                    .judge(&prepared.prompt)
                    .await
                    .map_err(|source| EvalError::Judgment {
                        accession: sample.accession.clone(),
                        term_id: term_id.to_string(),
                        source,
                    })?;
            Ok::<_, EvalError>(EvaluationRecord {
                accession: sample.accession.clone(),
                term_id: term_id.to_string(),
                label: prepared.label,
                verdict: judgment.verdict,
                confidence: judgment.confidence,
            })
        })
        .buffered(options.concurrency.max(1));
    let mut results = std::pin::pin!(results);

    // 3) stream out, flushing per record
    let mut records = 0usize;
    while let Some(result) = results.next().await {
        let record = result?;
        writeln!(out, "{record}")?;
        out.flush()?;
        records += 1;
        debug!(accession = %record.accession, term_id = %record.term_id, "record written");
    }

    let elapsed = started.elapsed();
    info!(
        records,
        "Evaluation completed in {:.2} seconds",
        elapsed.as_secs_f64()
    );
    Ok(RunSummary { records, elapsed })
}
