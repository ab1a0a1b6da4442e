//! Data model shared by the evaluation client, the view controller, and the
//! renderer.
//!
//! Field names serialize in camelCase so the same types read the provider's
//! JSON payload and back the `/api/evaluate` endpoint.

use serde::{Deserialize, Deserializer, Serialize};

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// The five free-text answers collected by the form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StartupInput {
    pub idea: String,
    pub target_users: String,
    pub alternatives: String,
    pub reasoning: String,
    pub background: String,
}

impl StartupInput {
    /// Field labels in form order, paired with their values.
    pub fn fields(&self) -> [(&'static str, &str); 5] {
        [
            ("idea", &self.idea),
            ("targetUsers", &self.target_users),
            ("alternatives", &self.alternatives),
            ("reasoning", &self.reasoning),
            ("background", &self.background),
        ]
    }

    /// Names of fields left empty. Whitespace counts as an answer, the same
    /// rule the browser applies to `required`.
    pub fn blank_fields(&self) -> Vec<&'static str> {
        self.fields()
            .into_iter()
            .filter(|(_, value)| value.is_empty())
            .map(|(name, _)| name)
            .collect()
    }

    /// `true` when every field carries some text.
    pub fn is_complete(&self) -> bool {
        self.blank_fields().is_empty()
    }
}

// ---------------------------------------------------------------------------
// Result
// ---------------------------------------------------------------------------

/// Top-line recommendation returned by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verdict {
    Proceed,
    Pivot,
    Drop,
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Proceed => write!(f, "PROCEED"),
            Self::Pivot => write!(f, "PIVOT"),
            Self::Drop => write!(f, "DROP"),
        }
    }
}

/// One scored evaluation dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreItem {
    pub dimension: String,
    pub score: f64,
}

/// One week of the validation plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanStep {
    #[serde(deserialize_with = "week_number")]
    pub week: u32,
    #[serde(default)]
    pub focus: String,
    #[serde(default)]
    pub actions: String,
}

/// Accept `3` as well as `3.0`; the provider types weeks as NUMBER.
fn week_number<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = f64::deserialize(deserializer)?;
    if raw.is_finite() && raw >= 0.0 && raw.fract() == 0.0 && raw <= f64::from(u32::MAX) {
        Ok(raw as u32)
    } else {
        Err(serde::de::Error::custom(format!(
            "week must be a non-negative whole number, got {raw}"
        )))
    }
}

/// Structured evaluation produced by the provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationResult {
    pub scores: Vec<ScoreItem>,
    pub overall_verdict: Verdict,
    pub brutal_truth: String,
    pub single_biggest_flaw: String,
    pub smart_pivots: Vec<String>,
    pub validation_plan: Vec<PlanStep>,
}

impl EvaluationResult {
    /// Mean of all dimension scores, or `None` when there are none.
    pub fn average_score(&self) -> Option<f64> {
        if self.scores.is_empty() {
            return None;
        }
        let total: f64 = self.scores.iter().map(|s| s.score).sum();
        Some(total / self.scores.len() as f64)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_input() -> StartupInput {
        StartupInput {
            idea: "X".to_string(),
            target_users: "Y".to_string(),
            alternatives: "Z".to_string(),
            reasoning: "W".to_string(),
            background: "V".to_string(),
        }
    }

    #[test]
    fn complete_input_has_no_blank_fields() {
        assert!(sample_input().is_complete());
    }

    #[test]
    fn only_empty_fields_are_blank() {
        let mut input = sample_input();
        input.reasoning.clear();
        input.background.clear();
        assert_eq!(input.blank_fields(), vec!["reasoning", "background"]);
        assert!(!input.is_complete());
    }

    #[test]
    fn whitespace_counts_as_an_answer() {
        let mut input = sample_input();
        input.idea = " ".to_string();
        assert!(input.blank_fields().is_empty());
        assert!(input.is_complete());
    }

    #[test]
    fn input_uses_camel_case_on_the_wire() {
        let json = serde_json::to_string(&sample_input()).unwrap();
        assert!(json.contains("\"targetUsers\":\"Y\""));
    }

    #[test]
    fn verdict_parses_uppercase_only() {
        let v: Verdict = serde_json::from_str("\"PIVOT\"").unwrap();
        assert_eq!(v, Verdict::Pivot);
        assert!(serde_json::from_str::<Verdict>("\"MAYBE\"").is_err());
        assert_eq!(Verdict::Drop.to_string(), "DROP");
    }

    #[test]
    fn plan_step_accepts_float_weeks() {
        let step: PlanStep = serde_json::from_str(r#"{"week": 3.0, "focus": "f"}"#).unwrap();
        assert_eq!(step.week, 3);
        assert!(serde_json::from_str::<PlanStep>(r#"{"week": 1.5}"#).is_err());
    }

    #[test]
    fn plan_step_tolerates_missing_text() {
        let step: PlanStep = serde_json::from_str(r#"{"week": 2}"#).unwrap();
        assert_eq!(step.week, 2);
        assert!(step.focus.is_empty());
        assert!(step.actions.is_empty());
    }

    #[test]
    fn average_score_handles_empty() {
        let mut result = EvaluationResult {
            scores: vec![],
            overall_verdict: Verdict::Drop,
            brutal_truth: String::new(),
            single_biggest_flaw: String::new(),
            smart_pivots: vec![],
            validation_plan: vec![],
        };
        assert_eq!(result.average_score(), None);

        result.scores = vec![
            ScoreItem { dimension: "Timing".to_string(), score: 6.0 },
            ScoreItem { dimension: "Defensibility".to_string(), score: 9.0 },
        ];
        assert_eq!(result.average_score(), Some(7.5));
    }
}
