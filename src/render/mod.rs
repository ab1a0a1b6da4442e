//! Result renderer: pure mappings from evaluation data to markup.
//!
//! - [`score_band`] and [`verdict_badge`] are the display rules, kept apart
//!   from the HTML so they can be tested on their own.
//! - [`chart::radar_chart`] draws the spider chart as inline SVG.
//! - [`page::render_page`] assembles the full document for a view state.
//!
//! Values are rendered exactly as received: no reordering, no filtering.

pub mod chart;
pub mod page;

use crate::evaluation::Verdict;

pub use chart::radar_chart;
pub use page::render_page;

/// Lowest score shown as favorable.
pub const FAVORABLE_AT: f64 = 7.0;

/// Highest score shown as unfavorable.
pub const UNFAVORABLE_AT: f64 = 3.0;

/// Display band of a single score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBand {
    Favorable,
    Neutral,
    Unfavorable,
}

impl ScoreBand {
    pub fn css_class(self) -> &'static str {
        match self {
            Self::Favorable => "band-favorable",
            Self::Neutral => "band-neutral",
            Self::Unfavorable => "band-unfavorable",
        }
    }
}

/// `>= 7` favorable, `<= 3` unfavorable, anything else neutral.
pub fn score_band(score: f64) -> ScoreBand {
    if score >= FAVORABLE_AT {
        ScoreBand::Favorable
    } else if score <= UNFAVORABLE_AT {
        ScoreBand::Unfavorable
    } else {
        ScoreBand::Neutral
    }
}

/// Visual style of the verdict badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeStyle {
    Favorable,
    Warning,
    Unfavorable,
}

impl BadgeStyle {
    pub fn css_class(self) -> &'static str {
        match self {
            Self::Favorable => "badge-favorable",
            Self::Warning => "badge-warning",
            Self::Unfavorable => "badge-unfavorable",
        }
    }
}

pub fn verdict_badge(verdict: Verdict) -> BadgeStyle {
    match verdict {
        Verdict::Proceed => BadgeStyle::Favorable,
        Verdict::Pivot => BadgeStyle::Warning,
        Verdict::Drop => BadgeStyle::Unfavorable,
    }
}

/// Escape text for use in HTML element content and quoted attributes.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Mean score rounded to one decimal for the result header.
///
/// Individual scores are never rounded; only this derived figure is.
pub fn rounded_average(average: f64) -> f64 {
    (average * 10.0).round() / 10.0
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
