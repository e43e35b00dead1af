//! The `trigrade quiz` command.

use anyhow::Result;

use super::{notice_or_fail, GlobalOpts, Workspace};
use trigrade_core::error::SessionError;

pub fn execute(opts: &GlobalOpts, answers: bool, format: String) -> Result<()> {
    let ws = Workspace::load(opts)?;
    let session = ws.open()?;
    let items = session.quiz();
    if items.is_empty() {
        return notice_or_fail(SessionError::NoQuiz);
    }

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(items)?);
        return Ok(());
    }

    for (n, item) in items.iter().enumerate() {
        println!(
            "{}. [{}] {} ({} pts)",
            n + 1,
            item.id,
            item.topic.label_ko(),
            item.points
        );
        println!("   {}", item.stem);
        for choice in &item.choices {
            println!("   - {choice}");
        }
        if answers {
            let mut line = format!("   answer: {}", item.answer);
            if !item.also_accepted.is_empty() {
                line.push_str(&format!(" (also: {})", item.also_accepted.join(", ")));
            }
            println!("{line}");
        }
    }
    Ok(())
}
