//! Inline SVG radar (spider) chart over the 0-10 score domain.

use std::f64::consts::{FRAC_PI_2, TAU};
use std::fmt::Write;

use super::escape_html;
use crate::evaluation::ScoreItem;

const SIZE: f64 = 400.0;
const CENTER: f64 = SIZE / 2.0;
const RADIUS: f64 = SIZE / 2.0 * 0.7;
const LABEL_GAP: f64 = 18.0;
const DOMAIN_MAX: f64 = 10.0;
const RINGS: [f64; 5] = [2.0, 4.0, 6.0, 8.0, 10.0];

/// Angle of spoke `i` of `n`, starting at twelve o'clock and going clockwise.
fn spoke_angle(i: usize, n: usize) -> f64 {
    -FRAC_PI_2 + TAU * i as f64 / n as f64
}

/// Point at `value` (0-10) along spoke `i` of `n`.
fn point(value: f64, i: usize, n: usize) -> (f64, f64) {
    let r = value.clamp(0.0, DOMAIN_MAX) / DOMAIN_MAX * RADIUS;
    let angle = spoke_angle(i, n);
    (CENTER + r * angle.cos(), CENTER + r * angle.sin())
}

fn polygon_points(values: impl Iterator<Item = f64>, n: usize) -> String {
    values
        .enumerate()
        .map(|(i, v)| {
            let (x, y) = point(v, i, n);
            format!("{x:.1},{y:.1}")
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Render the chart. Returns an empty string when there is nothing to plot.
pub fn radar_chart(scores: &[ScoreItem]) -> String {
    let n = scores.len();
    if n == 0 {
        return String::new();
    }

    let mut svg = String::new();
    let _ = write!(
        svg,
        r#"<svg class="radar" viewBox="0 0 {SIZE} {SIZE}" role="img" aria-label="Score radar chart">"#
    );

    for ring in RINGS {
        let _ = write!(
            svg,
            r#"<polygon class="radar-grid" points="{}"/>"#,
            polygon_points(std::iter::repeat_n(ring, n), n)
        );
    }

    for (i, item) in scores.iter().enumerate() {
        let (x, y) = point(DOMAIN_MAX, i, n);
        let _ = write!(
            svg,
            r#"<line class="radar-spoke" x1="{CENTER}" y1="{CENTER}" x2="{x:.1}" y2="{y:.1}"/>"#
        );

        let angle = spoke_angle(i, n);
        let lx = CENTER + (RADIUS + LABEL_GAP) * angle.cos();
        let ly = CENTER + (RADIUS + LABEL_GAP) * angle.sin();
        let anchor = if angle.cos().abs() < 0.2 {
            "middle"
        } else if angle.cos() > 0.0 {
            "start"
        } else {
            "end"
        };
        let _ = write!(
            svg,
            r#"<text class="radar-label" x="{lx:.1}" y="{ly:.1}" text-anchor="{anchor}" dominant-baseline="middle">{}</text>"#,
            escape_html(&item.dimension)
        );
    }

    let _ = write!(
        svg,
        r#"<polygon class="radar-area" points="{}"/>"#,
        polygon_points(scores.iter().map(|s| s.score), n)
    );
    svg.push_str("</svg>");
    svg
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
