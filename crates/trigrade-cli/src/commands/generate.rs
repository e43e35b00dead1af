//! The `trigrade generate` command.

use anyhow::Result;

use trigrade_core::generator::QuizOptions;
use trigrade_core::model::Topic;

use super::{GlobalOpts, Workspace};

fn parse_topics(list: &str) -> Result<Vec<Topic>> {
    list.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(|t| t.parse::<Topic>().map_err(anyhow::Error::msg))
        .collect()
}

pub fn execute(
    opts: &GlobalOpts,
    seed: Option<u64>,
    count: Option<usize>,
    topics: Option<String>,
    varied: bool,
) -> Result<()> {
    let ws = Workspace::load(opts)?;
    let defaults = &ws.config.quiz;
    let options = QuizOptions {
        seed: seed.unwrap_or(defaults.seed),
        item_count: count.unwrap_or(defaults.item_count),
        topics: match topics {
            Some(list) => parse_topics(&list)?,
            None => defaults.topics.clone(),
        },
        varied_formats: varied || defaults.varied_formats,
    };

    let mut session = ws.open()?;
    let items = session.generate_quiz(options.clone())?;
    println!(
        "Generated {} items (seed {}, {} topic(s))",
        items.len(),
        options.seed,
        options.topics.len()
    );
    for item in items {
        println!("  {:<14} [{}] {}", item.id, item.kind, item.topic.label());
    }
    ws.save(&session)?;
    Ok(())
}
