//! Auto-grading of objective items.
//!
//! A response is correct when it equals the item's canonical answer (or one
//! of its accepted alternatives). Full points on a match, zero otherwise.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::model::{ObjectiveItem, ResponseRecord};

/// How submitted values are compared with answers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// Raw string equality: "45" and "45.0" are different answers.
    #[default]
    Exact,
    /// Trimmed comparison; values that both parse as numbers compare numerically.
    Numeric,
}

impl fmt::Display for MatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchMode::Exact => write!(f, "exact"),
            MatchMode::Numeric => write!(f, "numeric"),
        }
    }
}

impl FromStr for MatchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "exact" | "strict" => Ok(MatchMode::Exact),
            "numeric" | "normalized" => Ok(MatchMode::Numeric),
            other => Err(format!("unknown match mode: {other}")),
        }
    }
}

/// Compare one submitted value against one expected answer.
pub fn matches_answer(response: &str, answer: &str, mode: MatchMode) -> bool {
    match mode {
        MatchMode::Exact => response == answer,
        MatchMode::Numeric => {
            let (response, answer) = (response.trim(), answer.trim());
            match (response.parse::<f64>(), answer.parse::<f64>()) {
                (Ok(r), Ok(a)) => (r - a).abs() < 1e-9,
                _ => response == answer,
            }
        }
    }
}

/// Whether `response` is graded correct for `item`. A missing response is wrong.
pub fn is_correct(item: &ObjectiveItem, response: Option<&str>, mode: MatchMode) -> bool {
    match response {
        Some(value) => item
            .acceptable_answers()
            .any(|answer| matches_answer(value, answer, mode)),
        None => false,
    }
}

/// Grade one item for one student.
pub fn grade_item(
    student_id: &str,
    item: &ObjectiveItem,
    response: Option<&str>,
    mode: MatchMode,
) -> ResponseRecord {
    let correct = is_correct(item, response, mode);
    ResponseRecord {
        student_id: student_id.to_string(),
        item_id: item.id.clone(),
        response: response.map(str::to_string),
        correct,
        score: if correct { item.points } else { 0 },
        answer: item.answer.clone(),
        topic: item.topic,
    }
}

/// Outcome of grading one student's quiz.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradeSummary {
    pub student_id: String,
    pub total: u32,
    pub max_total: u32,
    /// One record per quiz item, in quiz order.
    pub records: Vec<ResponseRecord>,
}

impl GradeSummary {
    /// Score as a fraction of the maximum, 0.0 for an empty quiz.
    pub fn ratio(&self) -> f64 {
        if self.max_total == 0 {
            0.0
        } else {
            f64::from(self.total) / f64::from(self.max_total)
        }
    }

    pub fn correct_count(&self) -> usize {
        self.records.iter().filter(|r| r.correct).count()
    }
}

/// Grade every item of `items`, looking responses up through `response_for`.
pub fn grade_items<'a, F>(
    student_id: &str,
    items: &[ObjectiveItem],
    response_for: F,
    mode: MatchMode,
) -> GradeSummary
where
    F: Fn(&str) -> Option<&'a str>,
{
    let records: Vec<ResponseRecord> = items
        .iter()
        .map(|item| grade_item(student_id, item, response_for(&item.id), mode))
        .collect();
    GradeSummary {
        student_id: student_id.to_string(),
        total: records.iter().map(|r| r.score).sum(),
        max_total: items.iter().map(|i| i.points).sum(),
        records,
    }
}
