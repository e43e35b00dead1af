//! The `trigrade answer` command.

use anyhow::{Context, Result};

use super::{notice_or_fail, GlobalOpts, Workspace};
use trigrade_core::error::SessionError;

/// Split `ITEM=VALUE`. The value may itself contain `=`.
fn parse_pair(raw: &str) -> Result<(&str, &str)> {
    let (item, value) = raw
        .split_once('=')
        .with_context(|| format!("expected ITEM=VALUE, got '{raw}'"))?;
    anyhow::ensure!(!item.trim().is_empty(), "missing item id in '{raw}'");
    Ok((item.trim(), value))
}

pub fn execute(opts: &GlobalOpts, student: String, responses: Vec<String>) -> Result<()> {
    let ws = Workspace::load(opts)?;
    let mut session = ws.open()?;
    if session.quiz().is_empty() {
        return notice_or_fail(SessionError::NoQuiz);
    }

    let student_id = session.resolve_student(&student)?.id.clone();
    for raw in &responses {
        let (item, value) = parse_pair(raw)?;
        session.submit(&student_id, item, value)?;
    }
    ws.save(&session)?;
    println!("Recorded {} answer(s) for {student_id}", responses.len());
    Ok(())
}
