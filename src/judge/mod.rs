//! Judgment client: prompt in, (verdict, confidence) out.
//!
//! `Judge` is the seam the evaluation driver talks to. `HttpJudge` calls a
//! chat-completions endpoint; `FixedJudge` answers with a constant.

pub mod http;

use std::future::Future;
use std::pin::Pin;

pub use http::{HttpJudge, HttpJudgeOptions};

#[derive(Debug, thiserror::Error)]
pub enum JudgeError {
    #[error("scoring endpoint request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("scoring endpoint returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("scoring endpoint response is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("scoring endpoint response is missing `{0}`")]
    MissingField(&'static str),
    #[error("scoring endpoint returned an unusable logprob: {0}")]
    InvalidLogprob(f64),
}

/// A verdict and the probability mass the model put on it.
#[derive(Debug, Clone, PartialEq)]
pub struct Judgment {
    /// Raw message content, normally `true` or `false`.
    pub verdict: String,
    pub logprob: f64,
    /// `exp(logprob)`, always in `(0, 1]`.
    pub confidence: f64,
}

impl Judgment {
    pub fn from_logprob(verdict: impl Into<String>, logprob: f64) -> Result<Self, JudgeError> {
        // exp() of anything outside (-inf, 0] leaves the (0, 1] range
        if !logprob.is_finite() || logprob > 0.0 {
            return Err(JudgeError::InvalidLogprob(logprob));
        }
        let confidence = logprob.exp();
        if confidence <= 0.0 {
            return Err(JudgeError::InvalidLogprob(logprob));
        }
        Ok(Self {
            verdict: verdict.into(),
            logprob,
            confidence,
        })
    }

    /// `Some(true/false)` when the verdict is a clean boolean token.
    pub fn as_bool(&self) -> Option<bool> {
        match self.verdict.trim() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        }
    }
}

pub type JudgeFuture<'a> = Pin<Box<dyn Future<Output = Result<Judgment, JudgeError>> + Send + 'a>>;

pub trait Judge: Send + Sync {
    /// Ask the model whether the prompt's candidate mapping is correct.
    fn judge<'a>(&'a self, prompt: &'a str) -> JudgeFuture<'a>;
    /// Short name for diagnostics.
    fn name(&self) -> &'static str;
}

/// Always answers with the same verdict and logprob. Used in tests.
#[derive(Debug, Clone)]
pub struct FixedJudge {
    pub verdict: String,
    pub logprob: f64,
}

impl FixedJudge {
    pub fn new(verdict: impl Into<String>, logprob: f64) -> Self {
        Self {
            verdict: verdict.into(),
            logprob,
        }
    }
}

impl Judge for FixedJudge {
    fn judge<'a>(&'a self, _prompt: &'a str) -> JudgeFuture<'a> {
        let out = Judgment::from_logprob(self.verdict.clone(), self.logprob);
        Box::pin(async move { out })
    }

    fn name(&self) -> &'static str {
        "fixed"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confidence_is_exp_of_logprob() {
        for lp in [0.0, -0.1, -1.0, -7.5, -30.0] {
            let j = Judgment::from_logprob("true", lp).unwrap();
            assert_eq!(j.confidence, lp.exp());
            assert!(j.confidence > 0.0 && j.confidence <= 1.0);
            assert!((j.confidence.ln() - lp).abs() < 1e-12);
        }
    }

    #[test]
    fn rejects_out_of_range_logprobs() {
        for lp in [0.5, f64::NAN, f64::NEG_INFINITY, f64::INFINITY, -1.0e6] {
            assert!(matches!(
                Judgment::from_logprob("true", lp),
                Err(JudgeError::InvalidLogprob(_))
            ));
        }
    }

    #[test]
    fn verdict_as_bool() {
        assert_eq!(Judgment::from_logprob("true", 0.0).unwrap().as_bool(), Some(true));
        assert_eq!(Judgment::from_logprob("false", 0.0).unwrap().as_bool(), Some(false));
        assert_eq!(Judgment::from_logprob("maybe", 0.0).unwrap().as_bool(), None);
    }

    #[tokio::test]
    async fn fixed_judge_answers_constant() {
        let judge = FixedJudge::new("false", -0.1);
        let j = judge.judge("anything").await.unwrap();
        assert_eq!(j.verdict, "false");
        assert_eq!(j.confidence, (-0.1f64).exp());
        assert_eq!(judge.name(), "fixed");
    }
}
