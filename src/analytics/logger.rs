use std::fs::{self, OpenOptions, create_dir_all};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::config::{APP_DIR, LoggingConfig};
use crate::evaluation::EvaluationResult;

// ---------------------------------------------------------------------------
// Evaluation event (JSONL log)
// ---------------------------------------------------------------------------

/// A single entry in the operational log
/// (`~/.founders-truth/evaluation-log.jsonl`).
///
/// Records call metadata only. Form answers and result text are never
/// written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationEvent {
    pub timestamp: String,
    pub model: String,
    pub success: bool,
    pub latency_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score_count: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verdict: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl EvaluationEvent {
    pub fn success(model: &str, latency_ms: u64, result: &EvaluationResult) -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339(),
            model: model.to_string(),
            success: true,
            latency_ms,
            score_count: Some(result.scores.len()),
            average_score: result.average_score(),
            verdict: Some(result.overall_verdict.to_string()),
            error: None,
        }
    }

    pub fn failure(model: &str, latency_ms: u64, error: &anyhow::Error) -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339(),
            model: model.to_string(),
            success: false,
            latency_ms,
            score_count: None,
            average_score: None,
            verdict: None,
            error: Some(format!("{error:#}")),
        }
    }
}

// ---------------------------------------------------------------------------
// Log handle
// ---------------------------------------------------------------------------

/// Append-only JSONL event log. A disabled log swallows every record.
#[derive(Debug, Clone)]
pub struct EventLog {
    path: Option<PathBuf>,
}

impl EventLog {
    /// Resolve the log location from config.
    pub fn from_config(config: &LoggingConfig) -> Self {
        if !config.enabled {
            return Self::disabled();
        }
        Self {
            path: config.path.clone().or_else(default_log_path),
        }
    }

    /// Log writing to an explicit file.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    pub fn disabled() -> Self {
        Self { path: None }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Append one event as a JSON line.
    pub fn record(&self, event: &EvaluationEvent) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        let json = serde_json::to_string(event)?;
        writeln!(file, "{json}")?;

        Ok(())
    }

    /// Read every event back.
    ///
    /// Silently skips malformed lines. Returns an empty vec if the log is
    /// disabled or missing.
    pub fn read_all(&self) -> Vec<EvaluationEvent> {
        let Some(path) = &self.path else {
            return Vec::new();
        };

        let Ok(file) = fs::File::open(path) else {
            return Vec::new();
        };

        BufReader::new(file)
            .lines()
            .map_while(Result::ok)
            .filter_map(|line| serde_json::from_str::<EvaluationEvent>(&line).ok())
            .collect()
    }
}

/// Default location: `~/.founders-truth/evaluation-log.jsonl`.
pub fn default_log_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(APP_DIR).join("evaluation-log.jsonl"))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
