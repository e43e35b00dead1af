//! The `trigrade analytics` command.

use anyhow::Result;
use comfy_table::{Cell, Table};
use serde::Serialize;

use trigrade_core::error::SessionError;
use trigrade_core::model::RubricCriterion;
use trigrade_core::session::Session;
use trigrade_core::statistics::{ItemStats, MasteryRow, RubricRow};

use super::{notice_or_fail, GlobalOpts, Workspace};

#[derive(Serialize)]
struct AnalyticsJson {
    mastery: Vec<MasteryRow>,
    rubric: Vec<RubricRow>,
    items: Vec<ItemStats>,
}

/// An empty view for informational conditions, an error otherwise.
fn or_empty<T>(view: Result<Vec<T>, SessionError>) -> Result<Vec<T>> {
    match view {
        Ok(rows) => Ok(rows),
        Err(e) if e.is_informational() => Ok(Vec::new()),
        Err(e) => Err(e.into()),
    }
}

pub fn execute(opts: &GlobalOpts, format: String) -> Result<()> {
    let ws = Workspace::load(opts)?;
    let session = ws.open()?;

    if format == "json" {
        let out = AnalyticsJson {
            mastery: or_empty(session.mastery())?,
            rubric: or_empty(session.rubric_table())?,
            items: or_empty(session.item_analysis())?,
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!("Mastery by topic");
    match session.mastery() {
        Ok(rows) => print_mastery(&session, &rows),
        Err(e) => notice_or_fail(e)?,
    }

    println!("\nRubric scores");
    match session.rubric_table() {
        Ok(rows) => print_rubric(&rows),
        Err(e) => notice_or_fail(e)?,
    }

    println!("\nItem analysis");
    match session.item_analysis() {
        Ok(items) => print_items(&items),
        Err(e) => notice_or_fail(e)?,
    }
    Ok(())
}

fn print_mastery(session: &Session, rows: &[MasteryRow]) {
    let mut table = Table::new();
    table.set_header(vec!["Student", "Name", "Topic", "Correct", "Mastery"]);
    for row in rows {
        let name = session
            .resolve_student(&row.student_id)
            .map(|s| s.name.clone())
            .unwrap_or_default();
        table.add_row(vec![
            Cell::new(&row.student_id),
            Cell::new(name),
            Cell::new(row.topic.label_ko()),
            Cell::new(format!("{}/{}", row.correct, row.attempted)),
            Cell::new(format!("{:.1}%", row.percent)),
        ]);
    }
    println!("{table}");
}

fn print_rubric(rows: &[RubricRow]) {
    let mut table = Table::new();
    let mut header = vec!["Student".to_string(), "Task".to_string()];
    header.extend(RubricCriterion::ALL.iter().map(|c| c.key().to_string()));
    header.push("Sum".to_string());
    table.set_header(header);
    for row in rows {
        let mut cells = vec![Cell::new(&row.student_id), Cell::new(&row.task_id)];
        cells.extend(RubricCriterion::ALL.iter().map(|c| Cell::new(row.levels.get(*c))));
        cells.push(Cell::new(row.sum));
        table.add_row(cells);
    }
    println!("{table}");
}

fn print_items(items: &[ItemStats]) {
    let mut table = Table::new();
    table.set_header(vec!["Item", "Topic", "Correct", "p"]);
    for item in items {
        table.add_row(vec![
            Cell::new(&item.item_id),
            Cell::new(item.topic.label_ko()),
            Cell::new(format!("{}/{}", item.correct, item.attempts)),
            Cell::new(format!("{:.2}", item.p_value)),
        ]);
    }
    println!("{table}");
}
