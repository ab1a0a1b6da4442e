/// Evaluation client — the one outbound call this application makes.
///
/// Builds the prompt from the five form answers, sends it with the fixed
/// system instruction and response schema to the provider, and parses the
/// JSON reply into an [`EvaluationResult`].
///
/// # Failure model
///
/// Every failure (missing credential, transport error, non-2xx status, empty
/// text, malformed or out-of-range JSON) surfaces as an `anyhow::Error`. The
/// caller does not distinguish between them; the view collapses all of them
/// into one generic message. There is no retry and no cache: identical inputs
/// always trigger a fresh call.
use std::time::Instant;

use anyhow::Result;

pub mod gemini;
pub mod prompts;
pub mod validation;

use crate::analytics::logger::{EvaluationEvent, EventLog};
use crate::evaluation::{EvaluationResult, StartupInput};
use gemini::GeminiClient;
use prompts::{build_prompt, response_schema, system_instruction};
use validation::parse_evaluation;

/// Anything that can turn a [`StartupInput`] into an [`EvaluationResult`].
///
/// The production implementation is [`GeminiClient`]; tests inject fakes.
pub trait Evaluator {
    fn evaluate(&self, input: &StartupInput) -> Result<EvaluationResult>;

    /// Model identifier recorded in the event log.
    fn model_name(&self) -> &str;
}

impl Evaluator for GeminiClient {
    fn evaluate(&self, input: &StartupInput) -> Result<EvaluationResult> {
        let text = self.generate(
            &system_instruction(),
            &build_prompt(input),
            &response_schema(),
        )?;
        parse_evaluation(&text)
    }

    fn model_name(&self) -> &str {
        GeminiClient::model_name(self)
    }
}

/// Run one evaluation and record its metadata in the event log.
///
/// Only call metadata is logged: never the idea text, never the critique.
pub fn run_evaluation(
    evaluator: &dyn Evaluator,
    input: &StartupInput,
    log: &EventLog,
) -> Result<EvaluationResult> {
    let start = Instant::now();
    let outcome = evaluator.evaluate(input);
    let latency_ms = start.elapsed().as_millis() as u64;

    let event = match &outcome {
        Ok(result) => EvaluationEvent::success(evaluator.model_name(), latency_ms, result),
        Err(e) => {
            eprintln!("evaluation failed after {latency_ms} ms: {e:#}");
            EvaluationEvent::failure(evaluator.model_name(), latency_ms, e)
        }
    };
    if let Err(e) = log.record(&event) {
        eprintln!("could not write event log: {e:#}");
    }

    outcome
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
