//! JSON API handlers.
//!
//! `/api/evaluate` is stateless: it runs the same evaluation pipeline as the
//! form but never touches the view controller.

use anyhow::Result;
use serde::Serialize;
use serde_json::json;

use super::{AppContext, Reply};
use crate::evaluation::StartupInput;
use crate::llm::run_evaluation;
use crate::view::GENERIC_ERROR;

/// Health API response.
#[derive(Debug, Serialize)]
struct HealthResponse<'a> {
    model: &'a str,
    api_key_configured: bool,
    log_enabled: bool,
}

/// `POST /api/evaluate` — body is a JSON [`StartupInput`].
///
/// `200` with the evaluation, `400` for unreadable or incomplete input,
/// `502` with the generic message when the provider call fails.
pub fn post_evaluate(ctx: &AppContext, body: &str) -> Result<Reply> {
    let input: StartupInput = match serde_json::from_str(body) {
        Ok(input) => input,
        Err(e) => {
            return Ok(Reply::json(
                400,
                &json!({ "error": format!("invalid JSON body: {e}") }),
            ));
        }
    };

    let blank = input.blank_fields();
    if !blank.is_empty() {
        return Ok(Reply::json(
            400,
            &json!({ "error": "missing required fields", "fields": blank }),
        ));
    }

    match run_evaluation(&*ctx.evaluator, &input, &ctx.log) {
        Ok(result) => Ok(Reply::json(200, &serde_json::to_value(&result)?)),
        Err(_) => Ok(Reply::json(502, &json!({ "error": GENERIC_ERROR }))),
    }
}

/// `GET /api/health` — provider and logging status.
pub fn get_health(ctx: &AppContext) -> Reply {
    let resp = HealthResponse {
        model: ctx.evaluator.model_name(),
        api_key_configured: ctx.api_key_configured,
        log_enabled: ctx.log.path().is_some(),
    };
    Reply::json(200, &json!(resp))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::logger::EventLog;
    use crate::evaluation::{EvaluationResult, ScoreItem, Verdict};
    use crate::llm::Evaluator;
    use crate::view::Phase;

    struct Echo;

    impl Evaluator for Echo {
        fn evaluate(&self, input: &StartupInput) -> Result<EvaluationResult> {
            if input.idea == "fail" {
                anyhow::bail!("quota exceeded");
            }
            Ok(EvaluationResult {
                scores: vec![ScoreItem { dimension: input.idea.clone(), score: 9.0 }],
                overall_verdict: Verdict::Proceed,
                brutal_truth: "b".to_string(),
                single_biggest_flaw: "s".to_string(),
                smart_pivots: vec!["p".to_string()],
                validation_plan: vec![],
            })
        }

        fn model_name(&self) -> &str {
            "echo"
        }
    }

    fn ctx() -> AppContext {
        AppContext::new(Box::new(Echo), EventLog::disabled(), false)
    }

    fn body(idea: &str) -> String {
        json!({
            "idea": idea,
            "targetUsers": "Y",
            "alternatives": "Z",
            "reasoning": "W",
            "background": "V"
        })
        .to_string()
    }

    #[test]
    fn evaluate_returns_camel_case_result() {
        let ctx = ctx();
        let reply = post_evaluate(&ctx, &body("Idea")).unwrap();
        assert_eq!(reply.status, 200);
        let value: serde_json::Value = serde_json::from_slice(&reply.body).unwrap();
        assert_eq!(value["overallVerdict"], "PROCEED");
        assert_eq!(value["scores"][0]["dimension"], "Idea");
        assert_eq!(ctx.view.phase(), Phase::Editing);
    }

    #[test]
    fn evaluate_rejects_blank_fields() {
        let reply = post_evaluate(&ctx(), r#"{"idea": "X"}"#).unwrap();
        assert_eq!(reply.status, 400);
        assert!(reply.body_text().contains("targetUsers"));
    }

    #[test]
    fn evaluate_rejects_bad_json() {
        let reply = post_evaluate(&ctx(), "idea=X").unwrap();
        assert_eq!(reply.status, 400);
    }

    #[test]
    fn provider_failure_is_generic() {
        let reply = post_evaluate(&ctx(), &body("fail")).unwrap();
        assert_eq!(reply.status, 502);
        let text = reply.body_text();
        assert!(text.contains(GENERIC_ERROR));
        assert!(!text.contains("quota"));
    }

    #[test]
    fn health_reports_model_and_key() {
        let reply = get_health(&ctx());
        let value: serde_json::Value = serde_json::from_slice(&reply.body).unwrap();
        assert_eq!(value["model"], "echo");
        assert_eq!(value["api_key_configured"], false);
        assert_eq!(value["log_enabled"], false);
    }
}
