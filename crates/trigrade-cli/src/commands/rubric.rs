//! The `trigrade rubric` command.

use anyhow::Result;
use comfy_table::{Cell, Table};

use trigrade_core::model::{RubricCriterion, RubricLevels, MAX_LEVEL, MIN_LEVEL};
use trigrade_core::rubric::{level_descriptor, level_name, score_sheet, PERFORMANCE_TASKS};

use super::{GlobalOpts, Workspace};
use crate::RubricAction;

pub fn execute(opts: &GlobalOpts, action: RubricAction) -> Result<()> {
    match action {
        RubricAction::Save {
            student,
            task,
            concept,
            procedure,
            reasoning,
            communication,
            notes,
        } => {
            for level in [concept, procedure, reasoning, communication] {
                anyhow::ensure!(
                    (MIN_LEVEL..=MAX_LEVEL).contains(&level),
                    "rubric levels must be between {MIN_LEVEL} and {MAX_LEVEL}, got {level}"
                );
            }
            let ws = Workspace::load(opts)?;
            let mut session = ws.open()?;
            let levels = RubricLevels::new(concept, procedure, reasoning, communication);
            let record = session.save_rubric(&student, &task, levels, &notes)?;
            println!(
                "Saved {} / {}: sum {} (task worth {} pts)",
                record.student_id,
                record.task_id,
                record.criterion_sum(),
                record.task_points
            );
            ws.save(&session)?;
            Ok(())
        }
        RubricAction::Show { student, task } => {
            let ws = Workspace::load(opts)?;
            let session = ws.open()?;
            match session.rubric(&student, &task)? {
                Some(record) => {
                    let mut table = Table::new();
                    table.set_header(vec!["Criterion", "Level"]);
                    for row in score_sheet(record) {
                        table.add_row(vec![Cell::new(row.label), Cell::new(row.level)]);
                    }
                    println!("{} / {}", record.student_id, record.task_id);
                    println!("{table}");
                    if !record.notes.is_empty() {
                        println!("Notes: {}", record.notes);
                    }
                }
                None => println!("No rubric saved for {student} / {task}."),
            }
            Ok(())
        }
        RubricAction::Tasks => {
            for task in &PERFORMANCE_TASKS {
                println!(
                    "{} [{}] ({} pts)\n  {}\n",
                    task.id,
                    task.topic.label_ko(),
                    task.points,
                    task.prompt
                );
            }
            Ok(())
        }
        RubricAction::Levels => {
            let mut criteria = Table::new();
            criteria.set_header(vec!["Criterion", "Description"]);
            for c in RubricCriterion::ALL {
                criteria.add_row(vec![
                    Cell::new(format!("{} ({})", c.label_ko(), c.key())),
                    Cell::new(c.description()),
                ]);
            }
            println!("{criteria}");

            let mut levels = Table::new();
            levels.set_header(vec!["Level", "Name", "Descriptor"]);
            for level in (MIN_LEVEL..=MAX_LEVEL).rev() {
                levels.add_row(vec![
                    Cell::new(level),
                    Cell::new(level_name(level)),
                    Cell::new(level_descriptor(level)),
                ]);
            }
            println!("{levels}");
            Ok(())
        }
    }
}
