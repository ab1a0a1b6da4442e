//! Full-page HTML for the form and result views.
//!
//! The document is self-contained: inline CSS, one small script that
//! disables the submit button while the request is in flight, no external
//! assets.

use std::fmt::Write;

use super::{escape_html, radar_chart, rounded_average, score_band, verdict_badge};
use crate::evaluation::{EvaluationResult, StartupInput};
use crate::view::{Phase, ViewController};

/// Label shown on the submit button while a request is in flight.
pub const LOADING_LABEL: &str = "Analyzing Dynamics...";

/// One form field: name, label, placeholder, multi-line.
struct Field {
    name: &'static str,
    label: &'static str,
    placeholder: &'static str,
    multiline: bool,
}

const FIELDS: [Field; 5] = [
    Field {
        name: "idea",
        label: "Startup Idea",
        placeholder: "3-6 sentences explaining the core mechanics and value prop.",
        multiline: true,
    },
    Field {
        name: "targetUsers",
        label: "Target Users",
        placeholder: "Specific user segment",
        multiline: false,
    },
    Field {
        name: "alternatives",
        label: "Current Alternatives",
        placeholder: "What users do today instead",
        multiline: false,
    },
    Field {
        name: "reasoning",
        label: "Why This Works",
        placeholder: "Your core assumptions or secret insight",
        multiline: true,
    },
    Field {
        name: "background",
        label: "Your Background",
        placeholder: "Skills, domain expertise, unfair advantages",
        multiline: true,
    },
];

/// Render the page for the controller's current state.
pub fn render_page(view: &ViewController) -> String {
    let body = match (view.phase(), view.result()) {
        (Phase::Result, Some(result)) => render_result(result),
        (phase, _) => render_form(view.input(), view.error(), phase == Phase::Loading),
    };

    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>FoundersTruth</title>
<style>{STYLE}</style>
</head>
<body>
<div class="app">
<header>
  <div class="title-row">
    <h1>Founders<span class="accent">Truth</span></h1>
    <span class="tag">Elite Analysis Engine</span>
  </div>
  <p class="subtitle">Submit your concept for a brutal, high-fidelity venture analysis. We optimize for truth, not validation.</p>
</header>
{body}
<footer><p>Truth &gt; Comfort</p></footer>
</div>
<script>{SCRIPT}</script>
</body>
</html>
"##
    )
}

/// The input form, pre-filled with `input`.
fn render_form(input: &StartupInput, error: Option<&str>, loading: bool) -> String {
    let mut html = String::from(r#"<section class="card"><form id="evaluate-form" method="post" action="/evaluate">"#);

    for (field, (_, value)) in FIELDS.iter().zip(input.fields()) {
        let _ = write!(
            html,
            r#"<div class="field"><label for="{name}">{label}</label>"#,
            name = field.name,
            label = field.label,
        );
        if field.multiline {
            let _ = write!(
                html,
                r#"<textarea id="{name}" name="{name}" required placeholder="{placeholder}">{value}</textarea>"#,
                name = field.name,
                placeholder = escape_html(field.placeholder),
                value = escape_html(value),
            );
        } else {
            let _ = write!(
                html,
                r#"<input id="{name}" name="{name}" type="text" required placeholder="{placeholder}" value="{value}">"#,
                name = field.name,
                placeholder = escape_html(field.placeholder),
                value = escape_html(value),
            );
        }
        html.push_str("</div>");
    }

    if loading {
        let _ = write!(
            html,
            r#"<button type="submit" id="submit" disabled><span class="spinner"></span>{LOADING_LABEL}</button>"#
        );
    } else {
        html.push_str(r#"<button type="submit" id="submit">Run Evaluation</button>"#);
    }

    if let Some(error) = error {
        let _ = write!(html, r#"<p class="error">{}</p>"#, escape_html(error));
    }

    html.push_str("</form></section>");
    html
}

/// The read-only result view.
fn render_result(result: &EvaluationResult) -> String {
    let mut html = String::from(r#"<section class="result"><div class="column">"#);

    // Matrix: badge, chart, score rows
    let badge = verdict_badge(result.overall_verdict);
    let _ = write!(
        html,
        r#"<div class="card"><div class="card-head"><h3>Analysis Matrix</h3><span class="verdict {}">{}</span></div>"#,
        badge.css_class(),
        result.overall_verdict,
    );
    if let Some(avg) = result.average_score().map(rounded_average) {
        let _ = write!(
            html,
            r#"<p class="average {}">Average {avg}/10</p>"#,
            score_band(avg).css_class(),
        );
    }
    html.push_str(&radar_chart(&result.scores));
    html.push_str(r#"<div class="scores">"#);
    for item in &result.scores {
        let _ = write!(
            html,
            r#"<div class="score-row {}"><span class="dimension">{}</span><span class="score">{}/10</span></div>"#,
            score_band(item.score).css_class(),
            escape_html(&item.dimension),
            item.score,
        );
    }
    html.push_str("</div></div>");

    // Pivots
    html.push_str(r#"<div class="card"><h3>Smart Pivots</h3><ol class="pivots">"#);
    for pivot in &result.smart_pivots {
        let _ = write!(html, r#"<li class="pivot">{}</li>"#, escape_html(pivot));
    }
    html.push_str("</ol></div></div>");

    // Narrative and plan
    let _ = write!(
        html,
        r#"<div class="column"><div class="card"><h3>Brutal Truth</h3><p class="truth">&quot;{}&quot;</p></div>"#,
        escape_html(&result.brutal_truth)
    );
    let _ = write!(
        html,
        r#"<div class="card flaw"><h3>Single Biggest Flaw</h3><p>{}</p></div>"#,
        escape_html(&result.single_biggest_flaw)
    );

    html.push_str(r#"<div class="card"><h3>30-Day Validation Plan</h3>"#);
    for step in &result.validation_plan {
        let _ = write!(
            html,
            r#"<div class="plan-step"><div class="plan-head"><h4>Week {}</h4><span class="focus">{}</span></div><p>{}</p></div>"#,
            step.week,
            escape_html(&step.focus),
            escape_html(&step.actions),
        );
    }
    html.push_str("</div>");

    html.push_str(
        r#"<form method="post" action="/reset"><button type="submit" class="secondary">Analyze New Concept</button></form>"#,
    );
    html.push_str("</div></section>");
    html
}

const SCRIPT: &str = r#"
const form = document.getElementById('evaluate-form');
if (form) {
  form.addEventListener('submit', () => {
    const btn = document.getElementById('submit');
    btn.disabled = true;
    btn.innerHTML = '<span class="spinner"></span>Analyzing Dynamics...';
  });
}
"#;

const STYLE: &str = r#"
:root {
  --bg: #0a0a0a;
  --surface: #141414;
  --border: #262626;
  --text: #e5e5e5;
  --text-muted: #737373;
  --accent: #e11d48;
  --green: #10b981;
  --yellow: #f59e0b;
  --red: #f43f5e;
  --radius: 14px;
  --font: -apple-system, BlinkMacSystemFont, 'Segoe UI', Helvetica, Arial, sans-serif;
  --mono: 'SF Mono', 'Cascadia Code', 'Fira Code', monospace;
}
* { margin: 0; padding: 0; box-sizing: border-box; }
body { background: var(--bg); color: var(--text); font-family: var(--font); font-size: 15px; line-height: 1.6; }
.app { max-width: 960px; margin: 0 auto; padding: 48px 16px; }
header { margin-bottom: 40px; padding-bottom: 24px; border-bottom: 1px solid var(--border); }
.title-row { display: flex; align-items: center; justify-content: space-between; }
h1 { font-size: 28px; font-weight: 800; font-style: italic; text-transform: uppercase; color: #fff; }
h1 .accent { color: var(--accent); }
.tag { font-family: var(--mono); font-size: 11px; letter-spacing: 0.2em; text-transform: uppercase; color: var(--text-muted); }
.subtitle { margin-top: 12px; color: var(--text-muted); max-width: 640px; }
.card { background: var(--surface); border: 1px solid var(--border); border-radius: var(--radius); padding: 24px; margin-bottom: 24px; }
.card h3 { font-size: 11px; font-weight: 700; letter-spacing: 0.2em; text-transform: uppercase; color: var(--text-muted); margin-bottom: 12px; }
.card-head { display: flex; align-items: center; justify-content: space-between; }
.field { margin-bottom: 20px; }
label { display: block; font-size: 11px; font-weight: 700; letter-spacing: 0.2em; text-transform: uppercase; color: var(--text-muted); margin-bottom: 8px; }
input, textarea { width: 100%; background: #171717; color: var(--text); border: 1px solid var(--border); border-radius: 8px; padding: 14px; font: inherit; }
textarea { min-height: 90px; resize: vertical; }
input:focus, textarea:focus { outline: none; border-color: var(--accent); }
button { width: 100%; padding: 14px; border: none; border-radius: 8px; background: #fff; color: #000; font-weight: 700; letter-spacing: 0.2em; text-transform: uppercase; cursor: pointer; display: flex; align-items: center; justify-content: center; gap: 10px; }
button:disabled { opacity: 0.5; cursor: default; }
button.secondary { background: #262626; color: var(--text-muted); }
.spinner { width: 16px; height: 16px; border: 2px solid #000; border-top-color: transparent; border-radius: 50%; animation: spin 0.8s linear infinite; }
@keyframes spin { to { transform: rotate(360deg); } }
.error { color: var(--red); font-size: 14px; margin-top: 10px; }
.result { display: grid; grid-template-columns: 1fr 1fr; gap: 24px; }
@media (max-width: 760px) { .result { grid-template-columns: 1fr; } }
.verdict { padding: 4px 14px; border-radius: 999px; border: 1px solid; font-size: 13px; font-weight: 700; letter-spacing: 0.2em; }
.badge-favorable { color: var(--green); border-color: var(--green); background: rgba(16,185,129,0.1); }
.badge-warning { color: var(--yellow); border-color: var(--yellow); background: rgba(245,158,11,0.1); }
.badge-unfavorable { color: var(--red); border-color: var(--red); background: rgba(244,63,94,0.1); }
.average { font-family: var(--mono); font-size: 13px; margin-top: 8px; }
.radar { width: 100%; height: auto; margin: 16px 0; }
.radar-grid { fill: none; stroke: #404040; stroke-width: 1; }
.radar-spoke { stroke: #404040; stroke-width: 1; }
.radar-label { fill: #a3a3a3; font-size: 10px; }
.radar-area { fill: rgba(239,68,68,0.4); stroke: #ef4444; stroke-width: 2; }
.scores { display: grid; grid-template-columns: 1fr 1fr; gap: 8px 16px; font-size: 12px; }
.score-row { display: flex; justify-content: space-between; }
.score-row .dimension { color: var(--text-muted); }
.score { font-family: var(--mono); font-weight: 700; }
.band-favorable .score, .average.band-favorable { color: var(--green); }
.band-neutral .score, .average.band-neutral { color: var(--yellow); }
.band-unfavorable .score, .average.band-unfavorable { color: var(--red); }
.pivots { padding-left: 20px; }
.pivot { margin-bottom: 10px; font-size: 14px; }
.pivot::marker { color: var(--accent); font-weight: 700; }
.truth { font-size: 18px; font-style: italic; }
.flaw { border-color: rgba(225,29,72,0.3); background: rgba(76,5,25,0.2); }
.flaw h3 { color: var(--red); }
.plan-step { border-left: 1px solid var(--border); padding-left: 18px; margin-bottom: 20px; }
.plan-head { display: flex; justify-content: space-between; align-items: baseline; }
.plan-head h4 { font-size: 11px; letter-spacing: 0.2em; text-transform: uppercase; color: #a3a3a3; }
.focus { font-family: var(--mono); font-size: 10px; text-transform: uppercase; color: var(--text-muted); }
.plan-step p { font-size: 14px; color: #a3a3a3; }
footer { margin-top: 64px; padding-top: 24px; border-top: 1px solid #171717; text-align: center; font-family: var(--mono); font-size: 10px; color: #404040; }
"#;

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
