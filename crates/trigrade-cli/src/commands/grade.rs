//! The `trigrade grade` command.

use anyhow::Result;
use comfy_table::{Cell, Table};

use trigrade_core::grading::GradeSummary;

use super::{notice_or_fail, GlobalOpts, Workspace};

pub fn execute(opts: &GlobalOpts, student: Option<String>) -> Result<()> {
    let ws = Workspace::load(opts)?;
    let mut session = ws.open()?;

    let students: Vec<String> = match student {
        Some(s) => vec![s],
        None => session.roster().iter().map(|s| s.id.clone()).collect(),
    };

    let mut summaries = Vec::with_capacity(students.len());
    for s in &students {
        match session.grade_student(s) {
            Ok(summary) => summaries.push(summary),
            Err(e) => return notice_or_fail(e),
        }
    }
    ws.save(&session)?;
    print_summary(&summaries);
    Ok(())
}

fn print_summary(summaries: &[GradeSummary]) {
    let mut table = Table::new();
    table.set_header(vec!["Student", "Correct", "Score", "Ratio"]);
    for s in summaries {
        table.add_row(vec![
            Cell::new(&s.student_id),
            Cell::new(format!("{}/{}", s.correct_count(), s.records.len())),
            Cell::new(format!("{}/{}", s.total, s.max_total)),
            Cell::new(format!("{:.1}%", s.ratio() * 100.0)),
        ]);
    }
    println!("{table}");
}
