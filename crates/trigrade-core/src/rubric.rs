//! Performance task bank and rubric scoring.

use serde::Serialize;

use crate::model::{PerformanceTask, RubricCriterion, RubricRecord, Topic, MAX_LEVEL, MIN_LEVEL};

/// The fixed bank of performance tasks.
pub const PERFORMANCE_TASKS: [PerformanceTask; 3] = [
    PerformanceTask {
        id: "PT-1",
        topic: Topic::Congruence,
        prompt: "Triangles ABC and A'B'C' are given in the figure. Decide whether the stated \
                 conditions alone make the triangles congruent, and name any additional \
                 condition that would be needed. Write the conditions and your reasons in \
                 sentences or symbols.",
        points: 8,
    },
    PerformanceTask {
        id: "PT-2",
        topic: Topic::ExteriorAngle,
        prompt: "Use the relationship between an exterior angle and the remote interior \
                 angles to find the unknown x from the given angle measures, and state \
                 clearly the theorem you used.",
        points: 8,
    },
    PerformanceTask {
        id: "PT-3",
        topic: Topic::AngleSum,
        prompt: "Using the fact that the interior angles of a triangle sum to 180°, derive the \
                 formula for the interior angle sum of a polygon and explain it with an \
                 example.",
        points: 8,
    },
];

/// Look up a task by id (case-insensitive).
pub fn find_task(task_id: &str) -> Option<&'static PerformanceTask> {
    PERFORMANCE_TASKS
        .iter()
        .find(|t| t.id.eq_ignore_ascii_case(task_id.trim()))
}

/// Descriptor of a rubric level, shared by all criteria.
pub fn level_descriptor(level: u8) -> &'static str {
    match level.clamp(MIN_LEVEL, MAX_LEVEL) {
        4 => "Exemplary: understands concepts and principles deeply, applies them in varied \
              contexts, and gives complete justification.",
        3 => "Proficient: understands the key concepts, solves most problems accurately, and \
              gives reasonably clear grounds.",
        2 => "Developing: partial understanding of basic concepts and procedures, with some \
              errors in computation or justification.",
        _ => "Beginning: concept understanding and procedures are lacking; justification and \
              presentation are insufficient.",
    }
}

/// Short level name.
pub fn level_name(level: u8) -> &'static str {
    match level.clamp(MIN_LEVEL, MAX_LEVEL) {
        4 => "Exemplary",
        3 => "Proficient",
        2 => "Developing",
        _ => "Beginning",
    }
}

/// One line of a rubric score sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SheetRow {
    pub label: String,
    pub level: u32,
}

/// The per-criterion levels of a record followed by their unweighted sum.
pub fn score_sheet(record: &RubricRecord) -> Vec<SheetRow> {
    let mut rows: Vec<SheetRow> = RubricCriterion::ALL
        .iter()
        .map(|c| SheetRow {
            label: format!("{} ({})", c.label_ko(), c.key()),
            level: u32::from(record.levels.get(*c)),
        })
        .collect();
    rows.push(SheetRow {
        label: "Total (weight = 1)".to_string(),
        level: record.criterion_sum(),
    });
    rows
}
