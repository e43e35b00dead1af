//! The `trigrade roster` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use trigrade_core::roster::load_roster;

use super::{GlobalOpts, Workspace};

pub fn execute(opts: &GlobalOpts, import: Option<PathBuf>) -> Result<()> {
    let ws = Workspace::load(opts)?;
    let mut session = ws.open()?;

    if let Some(path) = import {
        let roster = load_roster(&path)?;
        anyhow::ensure!(!roster.is_empty(), "no students found in {}", path.display());
        session.load_roster(roster);
        println!(
            "Imported {} students from {}",
            session.roster().len(),
            path.display()
        );
        ws.save(&session)?;
    }

    let mut table = Table::new();
    table.set_header(vec!["ID", "Name"]);
    for student in session.roster() {
        table.add_row(vec![Cell::new(&student.id), Cell::new(&student.name)]);
    }
    println!("{table}");
    Ok(())
}
