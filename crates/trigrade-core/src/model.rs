//! Core data model types for trigrade.
//!
//! Objective items, performance tasks, roster entries, and the per-student
//! records (responses and rubric scores) that grading and analytics work on.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::SessionError;

/// One of the five topics of the triangle unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Topic {
    #[serde(rename = "triangle_angle_sum")]
    AngleSum,
    #[serde(rename = "exterior_angle")]
    ExteriorAngle,
    #[serde(rename = "triangle_types")]
    TriangleTypes,
    #[serde(rename = "congruence")]
    Congruence,
    #[serde(rename = "similarity_basic")]
    SimilarityBasic,
}

impl Topic {
    /// All topics, in syllabus order.
    pub const ALL: [Topic; 5] = [
        Topic::AngleSum,
        Topic::ExteriorAngle,
        Topic::TriangleTypes,
        Topic::Congruence,
        Topic::SimilarityBasic,
    ];

    /// Stable machine key, as used in exports and snapshots.
    pub fn key(&self) -> &'static str {
        match self {
            Topic::AngleSum => "triangle_angle_sum",
            Topic::ExteriorAngle => "exterior_angle",
            Topic::TriangleTypes => "triangle_types",
            Topic::Congruence => "congruence",
            Topic::SimilarityBasic => "similarity_basic",
        }
    }

    /// English display label.
    pub fn label(&self) -> &'static str {
        match self {
            Topic::AngleSum => "Angle sum",
            Topic::ExteriorAngle => "Exterior and interior angles",
            Topic::TriangleTypes => "Classifying triangles",
            Topic::Congruence => "Congruence criteria",
            Topic::SimilarityBasic => "Similarity basics",
        }
    }

    /// Korean display label used on classroom handouts.
    pub fn label_ko(&self) -> &'static str {
        match self {
            Topic::AngleSum => "각의 합",
            Topic::ExteriorAngle => "외각과 내각",
            Topic::TriangleTypes => "삼각형의 분류",
            Topic::Congruence => "합동조건",
            Topic::SimilarityBasic => "닮음 기초",
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Topic {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Some(topic) = Topic::ALL
            .iter()
            .find(|t| t.label_ko() == trimmed || t.label().eq_ignore_ascii_case(trimmed))
        {
            return Ok(*topic);
        }
        match trimmed.to_lowercase().replace('-', "_").as_str() {
            "triangle_angle_sum" | "angle_sum" | "sum" => Ok(Topic::AngleSum),
            "exterior_angle" | "exterior" => Ok(Topic::ExteriorAngle),
            "triangle_types" | "types" | "classification" => Ok(Topic::TriangleTypes),
            "congruence" => Ok(Topic::Congruence),
            "similarity_basic" | "similarity" => Ok(Topic::SimilarityBasic),
            other => Err(format!("unknown topic: {other}")),
        }
    }
}

/// How an objective item is answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemKind {
    #[serde(rename = "MCQ")]
    MultipleChoice,
    #[serde(rename = "NUM")]
    Numeric,
    #[serde(rename = "TF")]
    TrueFalse,
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemKind::MultipleChoice => write!(f, "MCQ"),
            ItemKind::Numeric => write!(f, "NUM"),
            ItemKind::TrueFalse => write!(f, "TF"),
        }
    }
}

/// An auto-generated, auto-gradable quiz question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectiveItem {
    /// Identifier derived from the template and its parameters.
    pub id: String,
    pub topic: Topic,
    /// Question text.
    pub stem: String,
    /// Answer choices in presentation order. Empty for numeric items.
    #[serde(default)]
    pub choices: Vec<String>,
    /// The canonical correct answer.
    pub answer: String,
    /// Further answers graded as correct besides `answer`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub also_accepted: Vec<String>,
    pub kind: ItemKind,
    pub points: u32,
}

impl ObjectiveItem {
    /// Whether the response must be one of `choices`.
    pub fn is_choice_based(&self) -> bool {
        !matches!(self.kind, ItemKind::Numeric)
    }

    /// The canonical answer followed by any additionally accepted answers.
    pub fn acceptable_answers(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.answer.as_str()).chain(self.also_accepted.iter().map(String::as_str))
    }
}

/// An open-ended task scored by hand with the rubric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PerformanceTask {
    pub id: &'static str,
    pub topic: Topic,
    pub prompt: &'static str,
    pub points: u32,
}

/// A student on the class roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub id: String,
    pub name: String,
}

impl RosterEntry {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Composite key of a per-student record: (student, item) or (student, task).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordKey {
    pub student_id: String,
    pub target_id: String,
}

impl RecordKey {
    /// Separator used in the string form of the key.
    pub const SEPARATOR: &'static str = "::";

    pub fn new(student_id: impl Into<String>, target_id: impl Into<String>) -> Self {
        Self {
            student_id: student_id.into(),
            target_id: target_id.into(),
        }
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.student_id, Self::SEPARATOR, self.target_id)
    }
}

impl FromStr for RecordKey {
    type Err = SessionError;

    /// Splits on the last separator: student ids may contain `::`, item and
    /// task ids never do.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.rsplit_once(Self::SEPARATOR) {
            Some((student, target)) if !student.is_empty() && !target.is_empty() => {
                Ok(RecordKey::new(student, target))
            }
            _ => Err(SessionError::InvalidKey(s.to_string())),
        }
    }
}

/// The graded outcome of one item for one student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseRecord {
    pub student_id: String,
    pub item_id: String,
    /// Raw submitted value; `None` if the student never answered.
    pub response: Option<String>,
    pub correct: bool,
    pub score: u32,
    /// Echo of the item's canonical answer.
    pub answer: String,
    pub topic: Topic,
}

/// One of the four fixed rubric dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RubricCriterion {
    Concept,
    Procedure,
    Reasoning,
    Communication,
}

impl RubricCriterion {
    pub const ALL: [RubricCriterion; 4] = [
        RubricCriterion::Concept,
        RubricCriterion::Procedure,
        RubricCriterion::Reasoning,
        RubricCriterion::Communication,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            RubricCriterion::Concept => "concept",
            RubricCriterion::Procedure => "procedure",
            RubricCriterion::Reasoning => "reasoning",
            RubricCriterion::Communication => "communication",
        }
    }

    pub fn label_ko(&self) -> &'static str {
        match self {
            RubricCriterion::Concept => "개념 이해",
            RubricCriterion::Procedure => "절차/계산",
            RubricCriterion::Reasoning => "추론/정당화",
            RubricCriterion::Communication => "의사소통",
        }
    }

    /// What the criterion looks for.
    pub fn description(&self) -> &'static str {
        match self {
            RubricCriterion::Concept => {
                "Understands triangle properties and congruence conditions"
            }
            RubricCriterion::Procedure => "Computes accurately with an appropriate procedure",
            RubricCriterion::Reasoning => "Gives reasons; explanations and proofs are valid",
            RubricCriterion::Communication => "Presents work clearly with correct notation",
        }
    }
}

impl fmt::Display for RubricCriterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Lowest rubric level.
pub const MIN_LEVEL: u8 = 1;
/// Highest rubric level.
pub const MAX_LEVEL: u8 = 4;

/// Levels awarded on the four rubric criteria, each in `MIN_LEVEL..=MAX_LEVEL`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawLevels")]
pub struct RubricLevels {
    concept: u8,
    procedure: u8,
    reasoning: u8,
    communication: u8,
}

#[derive(Deserialize)]
struct RawLevels {
    concept: u8,
    procedure: u8,
    reasoning: u8,
    communication: u8,
}

impl From<RawLevels> for RubricLevels {
    fn from(raw: RawLevels) -> Self {
        RubricLevels::new(raw.concept, raw.procedure, raw.reasoning, raw.communication)
    }
}

impl RubricLevels {
    /// Build a level set, clamping each level into range.
    pub fn new(concept: u8, procedure: u8, reasoning: u8, communication: u8) -> Self {
        let clamp = |level: u8| level.clamp(MIN_LEVEL, MAX_LEVEL);
        Self {
            concept: clamp(concept),
            procedure: clamp(procedure),
            reasoning: clamp(reasoning),
            communication: clamp(communication),
        }
    }

    pub fn get(&self, criterion: RubricCriterion) -> u8 {
        match criterion {
            RubricCriterion::Concept => self.concept,
            RubricCriterion::Procedure => self.procedure,
            RubricCriterion::Reasoning => self.reasoning,
            RubricCriterion::Communication => self.communication,
        }
    }

    /// Unweighted sum across the four criteria.
    pub fn sum(&self) -> u32 {
        RubricCriterion::ALL
            .iter()
            .map(|c| u32::from(self.get(*c)))
            .sum()
    }
}

impl Default for RubricLevels {
    fn default() -> Self {
        RubricLevels::new(3, 3, 3, 3)
    }
}

/// A rubric scoring of one performance task for one student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RubricRecord {
    pub student_id: String,
    pub task_id: String,
    #[serde(flatten)]
    pub levels: RubricLevels,
    /// Evidence notes.
    #[serde(default)]
    pub notes: String,
    /// The task's point value at the time of saving.
    pub task_points: u32,
}

impl RubricRecord {
    /// Sum of the four criterion levels, independent of `task_points`.
    pub fn criterion_sum(&self) -> u32 {
        self.levels.sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn topic_display_and_parse() {
        assert_eq!(Topic::AngleSum.to_string(), "triangle_angle_sum");
        assert_eq!("congruence".parse::<Topic>().unwrap(), Topic::Congruence);
        assert_eq!("angle-sum".parse::<Topic>().unwrap(), Topic::AngleSum);
        assert_eq!("닮음 기초".parse::<Topic>().unwrap(), Topic::SimilarityBasic);
        assert_eq!(
            "Classifying Triangles".parse::<Topic>().unwrap(),
            Topic::TriangleTypes
        );
        assert!("trigonometry".parse::<Topic>().is_err());
    }

    #[test]
    fn topic_serializes_as_key() {
        let json = serde_json::to_string(&Topic::ExteriorAngle).unwrap();
        assert_eq!(json, "\"exterior_angle\"");
        let kind = serde_json::to_string(&ItemKind::TrueFalse).unwrap();
        assert_eq!(kind, "\"TF\"");
    }

    #[test]
    fn record_key_string_form() {
        let key = RecordKey::new("S001", "AS-40-60");
        assert_eq!(key.to_string(), "S001::AS-40-60");
        assert_eq!("S001::AS-40-60".parse::<RecordKey>().unwrap(), key);
        assert!("S001".parse::<RecordKey>().is_err());
        assert!("::PT-1".parse::<RecordKey>().is_err());

        let nested = RecordKey::new("2-1::07", "PT-1");
        assert_eq!(nested.to_string().parse::<RecordKey>().unwrap(), nested);
    }

    #[test]
    fn rubric_levels_clamp_and_sum() {
        let levels = RubricLevels::new(0, 9, 2, 3);
        assert_eq!(levels.get(RubricCriterion::Concept), 1);
        assert_eq!(levels.get(RubricCriterion::Procedure), 4);
        assert_eq!(levels.sum(), 10);
        assert_eq!(RubricLevels::default().sum(), 12);
    }

    #[test]
    fn rubric_levels_clamp_when_deserialized() {
        let levels: RubricLevels = serde_json::from_str(
            r#"{"concept": 7, "procedure": 4, "reasoning": 2, "communication": 0}"#,
        )
        .unwrap();
        assert_eq!(levels, RubricLevels::new(4, 4, 2, 1));
    }

    #[test]
    fn acceptable_answers_lists_canonical_first() {
        let item = ObjectiveItem {
            id: "CG-1234".into(),
            topic: Topic::Congruence,
            stem: String::new(),
            choices: vec!["SSS".into(), "SAS".into(), "ASA".into(), "AAS".into()],
            answer: "ASA".into(),
            also_accepted: vec!["AAS".into()],
            kind: ItemKind::MultipleChoice,
            points: 2,
        };
        let answers: Vec<&str> = item.acceptable_answers().collect();
        assert_eq!(answers, vec!["ASA", "AAS"]);
        assert!(item.is_choice_based());
    }
}
