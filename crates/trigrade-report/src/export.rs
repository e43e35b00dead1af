//! CSV exports of session records.
//!
//! Every export starts with a UTF-8 byte-order mark unless disabled, so that
//! spreadsheet programs detect the encoding of Korean names.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use csv::Writer;

use trigrade_core::model::{ResponseRecord, RosterEntry, RubricCriterion, RubricRecord};
use trigrade_core::session::Session;

const BOM: &[u8] = b"\xEF\xBB\xBF";

pub const RESPONSES_FILE: &str = "responses.csv";
pub const RUBRIC_FILE: &str = "rubric.csv";
pub const ROSTER_FILE: &str = "roster.csv";

fn csv_writer<W: Write>(mut out: W, bom: bool) -> Result<Writer<W>> {
    if bom {
        out.write_all(BOM).context("failed to write byte-order mark")?;
    }
    Ok(Writer::from_writer(out))
}

/// Write response records as `student_id,item_id,answer,response,correct,score,topic`.
pub fn write_responses<'a, W: Write>(
    out: W,
    records: impl IntoIterator<Item = &'a ResponseRecord>,
    bom: bool,
) -> Result<()> {
    let mut wtr = csv_writer(out, bom)?;
    wtr.write_record([
        "student_id",
        "item_id",
        "answer",
        "response",
        "correct",
        "score",
        "topic",
    ])?;
    for r in records {
        let score = r.score.to_string();
        wtr.write_record([
            r.student_id.as_str(),
            r.item_id.as_str(),
            r.answer.as_str(),
            r.response.as_deref().unwrap_or_default(),
            if r.correct { "O" } else { "X" },
            score.as_str(),
            r.topic.key(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write rubric records, one column per criterion plus notes.
pub fn write_rubric<'a, W: Write>(
    out: W,
    records: impl IntoIterator<Item = &'a RubricRecord>,
    bom: bool,
) -> Result<()> {
    let mut wtr = csv_writer(out, bom)?;
    let mut header = vec!["student_id", "task_id"];
    header.extend(RubricCriterion::ALL.iter().map(|c| c.key()));
    header.push("notes");
    wtr.write_record(&header)?;

    for r in records {
        let mut row = vec![r.student_id.clone(), r.task_id.clone()];
        row.extend(RubricCriterion::ALL.iter().map(|c| r.levels.get(*c).to_string()));
        row.push(r.notes.clone());
        wtr.write_record(&row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write the roster in the importable `ID,이름` layout.
pub fn write_roster<W: Write>(out: W, roster: &[RosterEntry], bom: bool) -> Result<()> {
    let mut wtr = csv_writer(out, bom)?;
    wtr.write_record(["ID", "이름"])?;
    for s in roster {
        wtr.write_record([s.id.as_str(), s.name.as_str()])?;
    }
    wtr.flush()?;
    Ok(())
}

fn create(path: &Path) -> Result<std::fs::File> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::File::create(path).with_context(|| format!("failed to create {}", path.display()))
}

/// Write responses, rubric and roster CSVs into `dir`, returning the paths written.
///
/// Empty record sets still produce a header-only file.
pub fn export_csv(session: &Session, dir: &Path, bom: bool) -> Result<Vec<PathBuf>> {
    let responses = dir.join(RESPONSES_FILE);
    write_responses(create(&responses)?, session.responses(), bom)
        .with_context(|| format!("failed to export {}", responses.display()))?;

    let rubric = dir.join(RUBRIC_FILE);
    write_rubric(create(&rubric)?, session.rubric_scores(), bom)
        .with_context(|| format!("failed to export {}", rubric.display()))?;

    let roster = dir.join(ROSTER_FILE);
    write_roster(create(&roster)?, session.roster(), bom)
        .with_context(|| format!("failed to export {}", roster.display()))?;

    Ok(vec![responses, rubric, roster])
}
