//! CLI command implementations.
//!
//! Provides subcommand handlers for:
//! - `founders-truth serve` — run the web application
//! - `founders-truth health` — check config, credential, and event log
//! - `founders-truth config show|init|set` — configuration management

use anyhow::Result;
use colored::Colorize;

use crate::analytics::logger::{EvaluationEvent, EventLog};
use crate::config;
use crate::llm::gemini::GeminiClient;
use crate::web::{self, AppContext};

// ---------------------------------------------------------------------------
// founders-truth serve
// ---------------------------------------------------------------------------

/// Start the web application with the resolved config.
pub fn run_serve(addr: Option<String>, no_browser: bool) -> Result<()> {
    let mut cfg = config::load();
    if let Some(addr) = addr {
        cfg.server.addr = addr;
    }

    let client = GeminiClient::from_config(&cfg.provider);
    if !client.has_api_key() {
        eprintln!(
            "{} {}",
            "warning:".yellow().bold(),
            "no API key configured; evaluations will fail until GEMINI_API_KEY is set"
        );
    }

    let ctx = AppContext::new(
        Box::new(client),
        EventLog::from_config(&cfg.logging),
        cfg.provider.has_api_key(),
    );

    web::serve(&cfg.server.addr, ctx, cfg.server.open_browser && !no_browser)
}

// ---------------------------------------------------------------------------
// founders-truth health
// ---------------------------------------------------------------------------

/// Summary of the event log shown by `health`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LogSummary {
    pub total: usize,
    pub failures: usize,
    pub avg_latency_ms: Option<u64>,
}

/// Aggregate event-log entries.
pub fn summarize_events(events: &[EvaluationEvent]) -> LogSummary {
    let failures = events.iter().filter(|e| !e.success).count();
    let avg_latency_ms = if events.is_empty() {
        None
    } else {
        Some(events.iter().map(|e| e.latency_ms).sum::<u64>() / events.len() as u64)
    };

    LogSummary {
        total: events.len(),
        failures,
        avg_latency_ms,
    }
}

/// Check configuration health. Makes no provider call.
pub fn run_health() -> Result<()> {
    println!("{}", "FoundersTruth Health Check".bold().cyan());
    println!("{}", "=".repeat(40));

    let global_exists = config::global_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    let project_exists = config::project_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    let cfg = config::load();

    print_health_item(
        "Global config",
        global_exists,
        if global_exists {
            "~/.founders-truth/config.toml found"
        } else {
            "not found (run `founders-truth config init` to create)"
        },
    );
    print_health_item(
        "Project config",
        project_exists,
        if project_exists {
            ".founders-truth.toml found"
        } else {
            "none (optional)"
        },
    );

    let has_key = cfg.provider.has_api_key();
    print_health_item(
        "API key",
        has_key,
        if has_key {
            "configured"
        } else {
            "missing (set GEMINI_API_KEY)"
        },
    );
    print_health_item("Model", true, &cfg.provider.model);
    print_health_item("Endpoint", true, &cfg.provider.api_url);
    print_health_item(
        "Timeout",
        true,
        &if cfg.provider.timeout_ms == 0 {
            "transport default".to_string()
        } else {
            format!("{} ms", cfg.provider.timeout_ms)
        },
    );
    print_health_item("Listen address", true, &cfg.server.addr);

    let log = EventLog::from_config(&cfg.logging);
    match log.path() {
        None => print_health_item("Event log", true, "disabled"),
        Some(path) => {
            let summary = summarize_events(&log.read_all());
            let detail = match summary.avg_latency_ms {
                Some(avg) => format!(
                    "{} evaluations, {} failed, avg {avg} ms ({})",
                    summary.total,
                    summary.failures,
                    path.display()
                ),
                None => format!("empty ({})", path.display()),
            };
            print_health_item("Event log", summary.failures == 0, &detail);
        }
    }

    Ok(())
}

fn print_health_item(name: &str, ok: bool, detail: &str) {
    let status = if ok {
        "✓".green().bold()
    } else {
        "✗".red().bold()
    };
    println!("  {} {:<25} {}", status, name, detail.dimmed());
}

// ---------------------------------------------------------------------------
// founders-truth config show | init | set
// ---------------------------------------------------------------------------

/// Show the effective (merged) configuration as TOML.
pub fn run_config_show() -> Result<()> {
    let toml_str = config::show_effective_config()?;
    println!("{}", "Effective Configuration".bold().cyan());
    println!("{}", "=".repeat(50));
    println!();
    println!("{toml_str}");

    println!("{}", "Sources (highest priority last):".dimmed());
    println!("  {} built-in defaults", "·".dimmed());
    for (label, exists) in [
        (
            "~/.founders-truth/config.toml",
            config::global_config_file().is_some_and(|p| p.exists()),
        ),
        (
            ".founders-truth.toml",
            config::project_config_file().is_some_and(|p| p.exists()),
        ),
    ] {
        if exists {
            println!("  {} {}", "✓".green(), label.dimmed());
        } else {
            println!("  {} {} {}", "·".dimmed(), label.dimmed(), "(not found)".dimmed());
        }
    }
    println!(
        "  {} {}",
        "·".dimmed(),
        "FOUNDERS_TRUTH_* / GEMINI_API_KEY environment variables".dimmed()
    );

    Ok(())
}

/// Initialize a default config file at `~/.founders-truth/config.toml`.
pub fn run_config_init(force: bool) -> Result<()> {
    let path = config::init_config(force)?;
    println!(
        "{} Config written to {}",
        "✓".green().bold(),
        path.display()
    );
    Ok(())
}

/// Set a single configuration value in the global config file.
pub fn run_config_set(key: &str, value: &str) -> Result<()> {
    config::set_config_value(key, value)?;
    let shown = if key == "provider.api_key" { "********" } else { value };
    println!("{} Set {} = {}", "✓".green().bold(), key.bold(), shown);
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn event(success: bool, latency_ms: u64) -> EvaluationEvent {
        EvaluationEvent {
            timestamp: "2026-01-01T00:00:00Z".to_string(),
            model: "m".to_string(),
            success,
            latency_ms,
            score_count: None,
            average_score: None,
            verdict: None,
            error: None,
        }
    }

    #[test]
    fn summarize_empty_log() {
        assert_eq!(summarize_events(&[]), LogSummary::default());
    }

    #[test]
    fn summarize_counts_failures_and_latency() {
        let events = [event(true, 1000), event(false, 200), event(true, 300)];
        let summary = summarize_events(&events);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.failures, 1);
        assert_eq!(summary.avg_latency_ms, Some(500));
    }
}
