//! Analytics over graded responses and rubric records.
//!
//! Every view is a pure projection recomputed from the full record set.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::{ResponseRecord, RubricLevels, RubricRecord, Topic};

/// Mean correctness of one student within one topic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MasteryRow {
    pub student_id: String,
    pub topic: Topic,
    pub attempted: usize,
    pub correct: usize,
    /// Correct rate x 100, rounded to one decimal place.
    pub percent: f64,
}

/// Graded outcome of one item across students.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemStats {
    pub item_id: String,
    pub topic: Topic,
    pub attempts: usize,
    pub correct: usize,
    /// Proportion correct (difficulty index), 0.0..=1.0.
    pub p_value: f64,
}

/// One (student, task) row of the rubric table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RubricRow {
    pub student_id: String,
    pub task_id: String,
    #[serde(flatten)]
    pub levels: RubricLevels,
    pub sum: u32,
}

/// One decimal place, ties to even (6.25 becomes 6.2).
fn round1(value: f64) -> f64 {
    (value * 10.0).round_ties_even() / 10.0
}

/// Group response records by (student, topic) and compute mastery percentages.
pub fn mastery_by_topic<'a>(
    records: impl IntoIterator<Item = &'a ResponseRecord>,
) -> Vec<MasteryRow> {
    let mut grouped: BTreeMap<(String, Topic), (usize, usize)> = BTreeMap::new();
    for r in records {
        let entry = grouped
            .entry((r.student_id.clone(), r.topic))
            .or_insert((0, 0));
        entry.0 += 1;
        if r.correct {
            entry.1 += 1;
        }
    }

    grouped
        .into_iter()
        .map(|((student_id, topic), (attempted, correct))| MasteryRow {
            student_id,
            topic,
            attempted,
            correct,
            percent: round1(correct as f64 / attempted.max(1) as f64 * 100.0),
        })
        .collect()
}

/// Proportion correct per item, ordered by item id.
pub fn item_analysis<'a>(records: impl IntoIterator<Item = &'a ResponseRecord>) -> Vec<ItemStats> {
    let mut grouped: BTreeMap<&str, (Topic, usize, usize)> = BTreeMap::new();
    for r in records {
        let entry = grouped.entry(r.item_id.as_str()).or_insert((r.topic, 0, 0));
        entry.1 += 1;
        if r.correct {
            entry.2 += 1;
        }
    }

    grouped
        .into_iter()
        .map(|(item_id, (topic, attempts, correct))| ItemStats {
            item_id: item_id.to_string(),
            topic,
            attempts,
            correct,
            p_value: correct as f64 / attempts.max(1) as f64,
        })
        .collect()
}

/// Flatten rubric records into one row per (student, task).
pub fn rubric_table<'a>(records: impl IntoIterator<Item = &'a RubricRecord>) -> Vec<RubricRow> {
    let mut rows: Vec<RubricRow> = records
        .into_iter()
        .map(|r| RubricRow {
            student_id: r.student_id.clone(),
            task_id: r.task_id.clone(),
            levels: r.levels,
            sum: r.criterion_sum(),
        })
        .collect();
    rows.sort_by(|a, b| (&a.student_id, &a.task_id).cmp(&(&b.student_id, &b.task_id)));
    rows
}
