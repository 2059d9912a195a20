// src/judge/http.rs
//! Chat-completions judge (llama.cpp server or any OpenAI-compatible endpoint).
//!
//! One POST per prompt, no retries. The request pins the answer to a bare
//! JSON boolean with thinking disabled, so the first completion token is the
//! verdict and its logprob is the confidence.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{Judge, JudgeError, JudgeFuture, Judgment};

const USER_AGENT: &str = concat!("mapping-evaluator/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, Default)]
pub struct HttpJudgeOptions {
    /// Whole-request timeout. `None` keeps reqwest's default (no timeout).
    pub timeout: Option<Duration>,
    /// Sent as `model` when set; llama.cpp ignores it, hosted APIs need it.
    pub model: Option<String>,
}

pub struct HttpJudge {
    http: reqwest::Client,
    endpoint: String,
    model: Option<String>,
}

impl HttpJudge {
    pub fn new(endpoint: impl Into<String>, options: HttpJudgeOptions) -> Result<Self, JudgeError> {
        let mut builder = reqwest::Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = options.timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            http: builder.build()?,
            endpoint: endpoint.into(),
            model: options.model,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn judge_impl(&self, prompt: &str) -> Result<Judgment, JudgeError> {
        let req = ChatRequest::new(prompt, self.model.as_deref());
        let resp = self.http.post(&self.endpoint).json(&req).send().await?;

        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(JudgeError::Status {
                status: status.as_u16(),
                body,
            });
        }
        let judgment = parse_response(&body)?;
        debug!(
            verdict = %judgment.verdict,
            logprob = judgment.logprob,
            "judgment received"
        );
        if judgment.as_bool().is_none() {
            warn!(verdict = %judgment.verdict, "verdict is not a boolean token");
        }
        Ok(judgment)
    }
}

impl Judge for HttpJudge {
    fn judge<'a>(&'a self, prompt: &'a str) -> JudgeFuture<'a> {
        Box::pin(self.judge_impl(prompt))
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

// ------------------------------------------------------------
// Wire types
// ------------------------------------------------------------

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<&'a str>,
    messages: [ChatMessage<'a>; 1],
    chat_template_kwargs: ChatTemplateKwargs,
    response_format: ResponseFormat,
    logprobs: bool,
}

impl<'a> ChatRequest<'a> {
    fn new(prompt: &'a str, model: Option<&'a str>) -> Self {
        Self {
            model,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
            chat_template_kwargs: ChatTemplateKwargs {
                enable_thinking: false,
            },
            response_format: ResponseFormat {
                kind: "json_object",
                schema: JsonSchema { kind: "boolean" },
            },
            logprobs: true,
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatTemplateKwargs {
    enable_thinking: bool,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
    schema: JsonSchema,
}

#[derive(Debug, Serialize)]
struct JsonSchema {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Option<Vec<Choice>>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    #[serde(default)]
    message: Option<ChoiceMessage>,
    #[serde(default)]
    logprobs: Option<ChoiceLogprobs>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChoiceLogprobs {
    #[serde(default)]
    content: Option<Vec<TokenLogprob>>,
}

#[derive(Debug, Deserialize)]
struct TokenLogprob {
    #[serde(default)]
    logprob: Option<f64>,
}

/// Extract (verdict, confidence) from a chat-completions body.
pub(crate) fn parse_response(body: &str) -> Result<Judgment, JudgeError> {
    let resp: ChatResponse = serde_json::from_str(body)?;
    let choice = resp
        .choices
        .and_then(|c| c.into_iter().next())
        .ok_or(JudgeError::MissingField("choices[0]"))?;
    let verdict = choice
        .message
        .and_then(|m| m.content)
        .ok_or(JudgeError::MissingField("choices[0].message.content"))?;
    let logprob = choice
        .logprobs
        .and_then(|l| l.content)
        .and_then(|c| c.into_iter().next())
        .and_then(|t| t.logprob)
        .ok_or(JudgeError::MissingField(
            "choices[0].logprobs.content[0].logprob",
        ))?;
    Judgment::from_logprob(verdict, logprob)
}
