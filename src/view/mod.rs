//! View controller: the single piece of mutable state behind the page.
//!
//! Three observable phases:
//!
//! ```text
//!   Editing --submit--> Loading --complete(Ok)--> Result
//!      ^                   |                         |
//!      +---complete(Err)---+                         |
//!      +--------------------------reset--------------+
//! ```
//!
//! A submission is refused while another is in flight. Input survives both
//! failure and reset.

use anyhow::Result;

use crate::evaluation::{EvaluationResult, StartupInput};

/// The one message shown for every evaluation failure.
pub const GENERIC_ERROR: &str = "Failed to analyze the idea. Ensure your API key is configured.";

/// Observable phase of the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Editing,
    Loading,
    Result,
}

/// Why a submission was not accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitRejection {
    /// A previous submission has not completed.
    InFlight,
    /// One or more fields are blank.
    Incomplete(Vec<&'static str>),
}

impl std::fmt::Display for SubmitRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InFlight => write!(f, "an evaluation is already running"),
            Self::Incomplete(fields) => write!(f, "please fill in: {}", fields.join(", ")),
        }
    }
}

impl std::error::Error for SubmitRejection {}

/// In-memory form and result state for one session.
#[derive(Debug, Clone, Default)]
pub struct ViewController {
    input: StartupInput,
    error: Option<String>,
    result: Option<EvaluationResult>,
    loading: bool,
}

impl ViewController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        if self.loading {
            Phase::Loading
        } else if self.result.is_some() {
            Phase::Result
        } else {
            Phase::Editing
        }
    }

    pub fn input(&self) -> &StartupInput {
        &self.input
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn result(&self) -> Option<&EvaluationResult> {
        self.result.as_ref()
    }

    /// Editing → Loading.
    ///
    /// The submitted values replace the form state even when rejected for
    /// being incomplete, so the user sees what they typed.
    pub fn submit(&mut self, input: StartupInput) -> Result<(), SubmitRejection> {
        if self.loading {
            return Err(SubmitRejection::InFlight);
        }

        let blank = input.blank_fields();
        self.input = input;
        if !blank.is_empty() {
            let rejection = SubmitRejection::Incomplete(blank);
            self.error = Some(rejection.to_string());
            return Err(rejection);
        }

        self.error = None;
        self.result = None;
        self.loading = true;
        Ok(())
    }

    /// Loading → Result on success, Loading → Editing on failure.
    ///
    /// Ignored unless a submission is in flight.
    pub fn complete(&mut self, outcome: Result<EvaluationResult>) {
        if !self.loading {
            return;
        }
        self.loading = false;

        match outcome {
            Ok(result) => {
                self.result = Some(result);
                self.error = None;
            }
            Err(_) => {
                self.result = None;
                self.error = Some(GENERIC_ERROR.to_string());
            }
        }
    }

    /// Result → Editing ("analyze new concept"). Keeps the previous answers.
    pub fn reset(&mut self) {
        if self.loading {
            return;
        }
        self.result = None;
        self.error = None;
    }

    /// Submit, evaluate, and complete in one step.
    pub fn run<F>(&mut self, input: StartupInput, evaluate: F) -> Result<(), SubmitRejection>
    where
        F: FnOnce(&StartupInput) -> Result<EvaluationResult>,
    {
        self.submit(input)?;
        let outcome = evaluate(&self.input);
        self.complete(outcome);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
