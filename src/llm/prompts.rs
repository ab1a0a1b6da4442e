//! Prompt templates and the response schema for the evaluation call.
//!
//! The request is split into:
//!
//! - A **system instruction** (analyst persona, the ten scoring dimensions,
//!   output rules), identical for every call.
//! - A **user prompt** built by interpolating the five form answers into a
//!   fixed labelled template.
//! - A **response schema** in the provider's OpenAPI subset, sent alongside
//!   `responseMimeType: application/json` so the model replies with JSON.

use serde_json::{Value, json};

use crate::evaluation::StartupInput;

/// The ten dimensions the model is asked to score, in prompt order.
pub const DIMENSIONS: [&str; 10] = [
    "Problem Severity",
    "Market Reality",
    "Differentiation",
    "Technical Feasibility",
    "Distribution Strategy",
    "Defensibility",
    "Founder Leverage",
    "Monetization Clarity",
    "Timing",
    "Execution Risk",
];

/// Top-level keys the schema marks as required.
pub const REQUIRED_KEYS: [&str; 6] = [
    "scores",
    "overallVerdict",
    "brutalTruth",
    "singleBiggestFlaw",
    "smartPivots",
    "validationPlan",
];

const PERSONA: &str = "\
You are an elite startup analyst, venture partner, and technical co-founder.
Your role is to evaluate startup ideas with brutal honesty, grounded in real-world market dynamics.
You do NOT motivate, hype, or protect emotions.
You optimize for truth, leverage, and execution reality.
Assume the user is intelligent and prefers clarity over comfort.";

const OUTPUT_RULES: &str = "\
OUTPUT FORMAT:
You must strictly return a JSON object that matches the requested schema.
overallVerdict must be exactly PROCEED, PIVOT, or DROP.
Every score is a number from 0 to 10.
validationPlan covers the next 30 days, one entry per week.";

/// Build the fixed system instruction.
pub fn system_instruction() -> String {
    let framework: String = DIMENSIONS
        .iter()
        .enumerate()
        .map(|(i, name)| format!("{}. {name} (0-10)\n", i + 1))
        .collect();

    format!("{PERSONA}\n\nEVALUATION FRAMEWORK:\n{framework}\n{OUTPUT_RULES}")
}

/// Interpolate the form answers into the user prompt.
///
/// Values are trimmed of surrounding whitespace; the form already guarantees they are
/// non-empty.
pub fn build_prompt(input: &StartupInput) -> String {
    format!(
        "Startup Idea: {}\n\
         Target Users: {}\n\
         Current Alternatives: {}\n\
         Why You Think This Will Work: {}\n\
         Your Background: {}\n",
        input.idea.trim(),
        input.target_users.trim(),
        input.alternatives.trim(),
        input.reasoning.trim(),
        input.background.trim(),
    )
}

/// JSON schema for the structured response.
pub fn response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "scores": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "dimension": { "type": "STRING" },
                        "score": { "type": "NUMBER" }
                    },
                    "required": ["dimension", "score"]
                }
            },
            "overallVerdict": {
                "type": "STRING",
                "description": "Must be exactly PROCEED, PIVOT, or DROP"
            },
            "brutalTruth": { "type": "STRING" },
            "singleBiggestFlaw": { "type": "STRING" },
            "smartPivots": {
                "type": "ARRAY",
                "items": { "type": "STRING" }
            },
            "validationPlan": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "week": { "type": "NUMBER" },
                        "actions": { "type": "STRING" },
                        "focus": { "type": "STRING" }
                    }
                }
            }
        },
        "required": REQUIRED_KEYS
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
