//! HTML analytics report.
//!
//! Produces a self-contained HTML file with all CSS/JS inlined.

use anyhow::{Context, Result};
use std::path::Path;

use chrono::Utc;
use trigrade_core::model::RubricCriterion;
use trigrade_core::session::Session;
use trigrade_core::statistics::{ItemStats, MasteryRow, RubricRow};

/// Escape a string for safe HTML insertion.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

fn level_class(ratio: f64) -> &'static str {
    if ratio >= 0.8 {
        "pass"
    } else if ratio >= 0.5 {
        "warn"
    } else {
        "fail"
    }
}

/// Generate an HTML report of the session's analytics.
///
/// Sections with no underlying records show a short notice instead of a table.
pub fn generate_html(session: &Session) -> String {
    let mastery = session.mastery().unwrap_or_default();
    let items = session.item_analysis().unwrap_or_default();
    let rubric = session.rubric_table().unwrap_or_default();

    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"ko\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str("<title>trigrade analytics</title>\n");
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n");

    html.push_str("<header>\n");
    html.push_str("<h1>Triangle unit analytics</h1>\n");
    html.push_str(&format!(
        "<p class=\"meta\">{} students | {} quiz items | match mode: {} | {}</p>\n",
        session.roster().len(),
        session.quiz().len(),
        session.match_mode(),
        Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
    ));
    html.push_str("</header>\n");

    html.push_str("<section class=\"mastery\">\n");
    html.push_str("<h2>Mastery by topic</h2>\n");
    if mastery.is_empty() {
        html.push_str("<p class=\"empty\">No graded responses yet.</p>\n");
    } else {
        html.push_str(&mastery_table(session, &mastery));
        html.push_str(&generate_bar_chart(&mastery));
    }
    html.push_str("</section>\n");

    html.push_str("<section class=\"rubric\">\n");
    html.push_str("<h2>Rubric scores</h2>\n");
    if rubric.is_empty() {
        html.push_str("<p class=\"empty\">No rubric scores saved yet.</p>\n");
    } else {
        html.push_str(&rubric_table(&rubric));
    }
    html.push_str("</section>\n");

    html.push_str("<section class=\"items\">\n");
    html.push_str("<h2>Item analysis</h2>\n");
    if items.is_empty() {
        html.push_str("<p class=\"empty\">No graded responses yet.</p>\n");
    } else {
        html.push_str(&item_table(&items));
    }
    html.push_str("</section>\n");

    html.push_str("<script>\n");
    html.push_str(JS);
    html.push_str("</script>\n");

    html.push_str("</body>\n</html>");
    html
}

fn mastery_table(session: &Session, rows: &[MasteryRow]) -> String {
    let mut out = String::new();
    out.push_str("<table id=\"mastery\">\n");
    out.push_str("<thead><tr><th onclick=\"sortTable('mastery', 0)\">Student</th><th onclick=\"sortTable('mastery', 1)\">Name</th><th onclick=\"sortTable('mastery', 2)\">Topic</th><th>Correct</th><th onclick=\"sortTable('mastery', 4)\">Mastery</th></tr></thead>\n");
    out.push_str("<tbody>\n");
    for row in rows {
        let name = session
            .resolve_student(&row.student_id)
            .map(|s| s.name.as_str())
            .unwrap_or("");
        out.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{} ({})</td><td>{}/{}</td><td class=\"{}\">{:.1}%</td></tr>\n",
            html_escape(&row.student_id),
            html_escape(name),
            row.topic.label_ko(),
            row.topic.label(),
            row.correct,
            row.attempted,
            level_class(row.percent / 100.0),
            row.percent,
        ));
    }
    out.push_str("</tbody></table>\n");
    out
}

fn rubric_table(rows: &[RubricRow]) -> String {
    let mut out = String::new();
    out.push_str("<table id=\"rubric\">\n<thead><tr><th>Student</th><th>Task</th>");
    for criterion in RubricCriterion::ALL {
        out.push_str(&format!("<th>{}</th>", criterion.label_ko()));
    }
    out.push_str("<th>Sum</th></tr></thead>\n<tbody>\n");
    for row in rows {
        out.push_str(&format!(
            "<tr><td>{}</td><td>{}</td>",
            html_escape(&row.student_id),
            html_escape(&row.task_id)
        ));
        for criterion in RubricCriterion::ALL {
            out.push_str(&format!("<td>{}</td>", row.levels.get(criterion)));
        }
        out.push_str(&format!("<td><strong>{}</strong></td></tr>\n", row.sum));
    }
    out.push_str("</tbody></table>\n");
    out
}

fn item_table(items: &[ItemStats]) -> String {
    let mut out = String::new();
    out.push_str("<table id=\"items\">\n");
    out.push_str("<thead><tr><th onclick=\"sortTable('items', 0)\">Item</th><th onclick=\"sortTable('items', 1)\">Topic</th><th>Correct</th><th onclick=\"sortTable('items', 3)\">p</th></tr></thead>\n");
    out.push_str("<tbody>\n");
    for item in items {
        out.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}/{}</td><td class=\"{}\">{:.2}</td></tr>\n",
            html_escape(&item.item_id),
            item.topic.label_ko(),
            item.correct,
            item.attempts,
            level_class(item.p_value),
            item.p_value,
        ));
    }
    out.push_str("</tbody></table>\n");
    out
}

/// Write an HTML report to a file.
pub fn write_html_report(session: &Session, path: &Path) -> Result<()> {
    let html = generate_html(session);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, html)
        .with_context(|| format!("failed to write report to {}", path.display()))?;
    Ok(())
}

fn generate_bar_chart(rows: &[MasteryRow]) -> String {
    let bar_height = 22;
    let max_width = 400;
    let padding = 8;
    let label_width = 260;

    let total_height = rows.len() * (bar_height + padding) + padding;

    let mut svg = format!(
        "<svg width=\"{}\" height=\"{}\" xmlns=\"http://www.w3.org/2000/svg\">\n",
        label_width + max_width + 60,
        total_height
    );

    for (i, row) in rows.iter().enumerate() {
        let y = i * (bar_height + padding) + padding;
        let ratio = row.percent / 100.0;
        let width = (ratio * max_width as f64) as usize;

        let color = match level_class(ratio) {
            "pass" => "#22c55e",
            "warn" => "#eab308",
            _ => "#ef4444",
        };

        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-size=\"13\" fill=\"currentColor\" text-anchor=\"end\" dominant-baseline=\"middle\">{} · {}</text>\n",
            label_width - 10,
            y + bar_height / 2,
            html_escape(&row.student_id),
            row.topic.label_ko()
        ));
        svg.push_str(&format!(
            "  <rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{}\" rx=\"4\"/>\n",
            label_width, y, width, bar_height, color
        ));
        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-size=\"12\" fill=\"currentColor\" dominant-baseline=\"middle\">{:.1}%</text>\n",
            label_width + width + 8,
            y + bar_height / 2,
            row.percent
        ));
    }

    svg.push_str("</svg>\n");
    svg
}

const CSS: &str = r#"
:root { --bg: #fff; --fg: #1a1a1a; --border: #e5e7eb; --pass: #dcfce7; --warn: #fef9c3; --fail: #fde2e2; }
@media (prefers-color-scheme: dark) {
  :root { --bg: #111827; --fg: #f9fafb; --border: #374151; --pass: #064e3b; --warn: #713f12; --fail: #7f1d1d; }
}
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', 'Malgun Gothic', sans-serif; margin: 0; padding: 2rem; background: var(--bg); color: var(--fg); }
h1, h2 { margin-top: 2rem; }
.meta, .empty { color: #6b7280; }
table { border-collapse: collapse; width: 100%; margin: 1rem 0; }
th, td { border: 1px solid var(--border); padding: 0.5rem 1rem; text-align: left; }
th { background: var(--border); cursor: pointer; }
.pass { background: var(--pass); }
.warn { background: var(--warn); }
.fail { background: var(--fail); }
svg { margin: 1rem 0; }
"#;

const JS: &str = r#"
function sortTable(id, col) {
  const table = document.getElementById(id);
  const tbody = table.querySelector('tbody');
  const rows = Array.from(tbody.querySelectorAll('tr'));
  const asc = table.dataset.sortCol == col && table.dataset.sortDir == 'asc' ? false : true;
  rows.sort((a, b) => {
    const va = a.cells[col].textContent;
    const vb = b.cells[col].textContent;
    return asc ? va.localeCompare(vb, undefined, { numeric: true }) : vb.localeCompare(va, undefined, { numeric: true });
  });
  table.dataset.sortCol = col;
  table.dataset.sortDir = asc ? 'asc' : 'desc';
  rows.forEach(r => tbody.appendChild(r));
}
"#;
