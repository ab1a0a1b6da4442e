/// Parse-boundary checks for provider output.
///
/// The provider is asked for JSON matching a schema, but nothing on its side
/// guarantees it. Before a payload reaches the view it goes through:
///
/// 1. **Fence stripping** — some models wrap JSON in a Markdown code block.
/// 2. **Typed parse** — missing keys or a verdict outside PROCEED/PIVOT/DROP
///    fail here.
/// 3. **Range checks** — at least one score, every score finite and in 0..=10.
///
/// Dimension count and name uniqueness are not checked.
use std::sync::LazyLock;

use anyhow::{Context, Result, anyhow};
use regex::Regex;

use crate::evaluation::EvaluationResult;

/// Inclusive score bounds requested from the provider.
pub const SCORE_RANGE: std::ops::RangeInclusive<f64> = 0.0..=10.0;

static CODE_FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^```[A-Za-z]*\s*\n(.*?)\n?\s*```$").expect("valid code fence regex")
});

/// Remove a surrounding Markdown code fence, if any.
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    CODE_FENCE
        .captures(trimmed)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .unwrap_or(trimmed)
}

/// Parse provider text into a validated [`EvaluationResult`].
pub fn parse_evaluation(text: &str) -> Result<EvaluationResult> {
    let json = strip_code_fence(text);
    if json.is_empty() {
        return Err(anyhow!("provider returned empty output"));
    }

    let result: EvaluationResult =
        serde_json::from_str(json).context("provider output is not a valid evaluation")?;

    validate_evaluation(&result)?;
    Ok(result)
}

/// Range-check a parsed evaluation.
pub fn validate_evaluation(result: &EvaluationResult) -> Result<()> {
    check_has_scores(result)?;
    check_score_range(result)?;
    Ok(())
}

/// A result with no scores cannot be charted.
fn check_has_scores(result: &EvaluationResult) -> Result<()> {
    if result.scores.is_empty() {
        return Err(anyhow!("evaluation contains no scores"));
    }
    Ok(())
}

/// Every score must be a finite number inside [`SCORE_RANGE`].
fn check_score_range(result: &EvaluationResult) -> Result<()> {
    for item in &result.scores {
        if !item.score.is_finite() || !SCORE_RANGE.contains(&item.score) {
            return Err(anyhow!(
                "score for \"{}\" is out of range: {}",
                item.dimension,
                item.score
            ));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::Verdict;

    const VALID: &str = r#"{
        "scores": [
            {"dimension": "Problem Severity", "score": 7},
            {"dimension": "Timing", "score": 3.5}
        ],
        "overallVerdict": "PIVOT",
        "brutalTruth": "Nobody is asking for this.",
        "singleBiggestFlaw": "No distribution.",
        "smartPivots": ["Sell to labs directly"],
        "validationPlan": [{"week": 1, "focus": "Interviews", "actions": "Talk to 20 labs"}]
    }"#;

    #[test]
    fn parses_valid_payload() {
        let result = parse_evaluation(VALID).unwrap();
        assert_eq!(result.overall_verdict, Verdict::Pivot);
        assert_eq!(result.scores.len(), 2);
        assert_eq!(result.scores[1].score, 3.5);
        assert_eq!(result.validation_plan[0].focus, "Interviews");
    }

    #[test]
    fn accepts_fenced_payload() {
        let fenced = format!("```json\n{VALID}\n```");
        assert!(parse_evaluation(&fenced).is_ok());
        let bare_fence = format!("```\n{VALID}```");
        assert!(parse_evaluation(&bare_fence).is_ok());
    }

    #[test]
    fn strip_code_fence_leaves_plain_text() {
        assert_eq!(strip_code_fence("  {\"a\":1} \n"), "{\"a\":1}");
    }

    #[test]
    fn rejects_non_json() {
        assert!(parse_evaluation("The idea is great!").is_err());
        assert!(parse_evaluation("   ").is_err());
    }

    #[test]
    fn rejects_unknown_verdict() {
        let payload = VALID.replace("\"PIVOT\"", "\"MAYBE\"");
        assert!(parse_evaluation(&payload).is_err());
    }

    #[test]
    fn rejects_missing_required_key() {
        let payload = VALID.replace("\"brutalTruth\"", "\"brutal\"");
        assert!(parse_evaluation(&payload).is_err());
    }

    #[test]
    fn rejects_out_of_range_scores() {
        let high = VALID.replace("\"score\": 7", "\"score\": 11");
        let err = parse_evaluation(&high).unwrap_err();
        assert!(err.to_string().contains("Problem Severity"));

        let negative = VALID.replace("\"score\": 7", "\"score\": -1");
        assert!(parse_evaluation(&negative).is_err());
    }

    #[test]
    fn boundary_scores_are_accepted() {
        let payload = VALID
            .replace("\"score\": 7", "\"score\": 0")
            .replace("\"score\": 3.5", "\"score\": 10");
        assert!(parse_evaluation(&payload).is_ok());
    }

    #[test]
    fn rejects_empty_scores() {
        let payload = r#"{"scores": [], "overallVerdict": "DROP", "brutalTruth": "",
            "singleBiggestFlaw": "", "smartPivots": [], "validationPlan": []}"#;
        assert!(parse_evaluation(payload).is_err());
    }
}
