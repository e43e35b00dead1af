//! The single in-memory store behind every interaction.
//!
//! A [`Session`] owns the roster, the active quiz, raw submissions, graded
//! response records and rubric records. Records are keyed by
//! [`RecordKey`]; writing an existing key replaces the record.

use std::collections::{BTreeMap, HashSet};

use crate::error::SessionError;
use crate::generator::{generate_quiz, QuizOptions};
use crate::grading::{grade_items, GradeSummary, MatchMode};
use crate::model::{
    ObjectiveItem, RecordKey, ResponseRecord, RosterEntry, RubricLevels, RubricRecord,
};
use crate::roster::default_roster;
use crate::rubric::find_task;
use crate::statistics::{
    item_analysis, mastery_by_topic, rubric_table, ItemStats, MasteryRow, RubricRow,
};

/// All state of one classroom session.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub(crate) roster: Vec<RosterEntry>,
    pub(crate) quiz: Vec<ObjectiveItem>,
    pub(crate) quiz_options: Option<QuizOptions>,
    pub(crate) match_mode: MatchMode,
    pub(crate) submissions: BTreeMap<RecordKey, String>,
    pub(crate) responses: BTreeMap<RecordKey, ResponseRecord>,
    pub(crate) rubric_scores: BTreeMap<RecordKey, RubricRecord>,
}

impl Default for Session {
    fn default() -> Self {
        Session::new(MatchMode::default())
    }
}

impl Session {
    /// A fresh session with the sample roster and no quiz.
    pub fn new(match_mode: MatchMode) -> Self {
        Self {
            roster: default_roster(),
            quiz: Vec::new(),
            quiz_options: None,
            match_mode,
            submissions: BTreeMap::new(),
            responses: BTreeMap::new(),
            rubric_scores: BTreeMap::new(),
        }
    }

    pub fn roster(&self) -> &[RosterEntry] {
        &self.roster
    }

    pub fn quiz(&self) -> &[ObjectiveItem] {
        &self.quiz
    }

    pub fn quiz_options(&self) -> Option<&QuizOptions> {
        self.quiz_options.as_ref()
    }

    pub fn match_mode(&self) -> MatchMode {
        self.match_mode
    }

    pub fn set_match_mode(&mut self, mode: MatchMode) {
        self.match_mode = mode;
    }

    /// Replace the roster. Existing records are kept. A repeated student id
    /// keeps its first entry.
    pub fn load_roster(&mut self, mut roster: Vec<RosterEntry>) {
        let mut seen = HashSet::new();
        roster.retain(|entry| {
            let first = seen.insert(entry.id.clone());
            if !first {
                tracing::warn!(student = %entry.id, name = %entry.name, "duplicate student id in roster, keeping the first");
            }
            first
        });
        tracing::info!(students = roster.len(), "roster loaded");
        self.roster = roster;
    }

    /// Find a student by id, falling back to display name.
    pub fn resolve_student(&self, id_or_name: &str) -> Result<&RosterEntry, SessionError> {
        let needle = id_or_name.trim();
        self.roster
            .iter()
            .find(|s| s.id == needle)
            .or_else(|| self.roster.iter().find(|s| s.name == needle))
            .ok_or_else(|| SessionError::UnknownStudent(needle.to_string()))
    }

    pub fn item(&self, item_id: &str) -> Result<&ObjectiveItem, SessionError> {
        self.quiz
            .iter()
            .find(|i| i.id == item_id)
            .ok_or_else(|| SessionError::UnknownItem(item_id.to_string()))
    }

    /// Generate a new active quiz. Raw submissions for the previous quiz are
    /// discarded; graded records stay until overwritten.
    pub fn generate_quiz(&mut self, options: QuizOptions) -> Result<&[ObjectiveItem], SessionError> {
        let items = generate_quiz(&options)?;
        self.submissions.clear();
        self.quiz = items;
        self.quiz_options = Some(options);
        Ok(&self.quiz)
    }

    /// Store a student's raw answer to an item of the active quiz.
    pub fn submit(&mut self, student: &str, item_id: &str, value: &str) -> Result<(), SessionError> {
        let student_id = self.resolve_student(student)?.id.clone();
        let item = self.item(item_id)?;
        if item.is_choice_based() && !item.choices.iter().any(|c| c == value) {
            return Err(SessionError::InvalidChoice {
                item_id: item_id.to_string(),
                value: value.to_string(),
            });
        }
        tracing::debug!(student = %student_id, item = item_id, "response submitted");
        self.submissions
            .insert(RecordKey::new(student_id, item_id), value.to_string());
        Ok(())
    }

    /// The stored raw answer, if any.
    pub fn submission(&self, student_id: &str, item_id: &str) -> Option<&str> {
        self.submissions
            .get(&RecordKey::new(student_id, item_id))
            .map(String::as_str)
    }

    /// Grade a student's submissions against the active quiz, overwriting
    /// that student's response records for these items.
    pub fn grade_student(&mut self, student: &str) -> Result<GradeSummary, SessionError> {
        if self.quiz.is_empty() {
            return Err(SessionError::NoQuiz);
        }
        let student_id = self.resolve_student(student)?.id.clone();
        let summary = grade_items(
            &student_id,
            &self.quiz,
            |item_id| self.submission(&student_id, item_id),
            self.match_mode,
        );
        for record in &summary.records {
            self.responses.insert(
                RecordKey::new(record.student_id.clone(), record.item_id.clone()),
                record.clone(),
            );
        }
        tracing::info!(
            student = %student_id,
            total = summary.total,
            max = summary.max_total,
            "graded"
        );
        Ok(summary)
    }

    /// All response records, ordered by (student, item).
    pub fn responses(&self) -> impl Iterator<Item = &ResponseRecord> {
        self.responses.values()
    }

    /// Response records of one student.
    pub fn responses_for<'a>(
        &'a self,
        student_id: &'a str,
    ) -> impl Iterator<Item = &'a ResponseRecord> + 'a {
        self.responses
            .values()
            .filter(move |r| r.student_id == student_id)
    }

    /// Save a rubric scoring, replacing any record at the same (student, task).
    pub fn save_rubric(
        &mut self,
        student: &str,
        task_id: &str,
        levels: RubricLevels,
        notes: &str,
    ) -> Result<&RubricRecord, SessionError> {
        let student_id = self.resolve_student(student)?.id.clone();
        let task = find_task(task_id).ok_or_else(|| SessionError::UnknownTask(task_id.to_string()))?;
        let key = RecordKey::new(student_id.clone(), task.id);
        let record = RubricRecord {
            student_id,
            task_id: task.id.to_string(),
            levels,
            notes: notes.to_string(),
            task_points: task.points,
        };
        tracing::debug!(key = %key, sum = record.criterion_sum(), "rubric saved");
        self.rubric_scores.insert(key.clone(), record);
        Ok(&self.rubric_scores[&key])
    }

    pub fn rubric(&self, student: &str, task_id: &str) -> Result<Option<&RubricRecord>, SessionError> {
        let student_id = &self.resolve_student(student)?.id;
        let task = find_task(task_id).ok_or_else(|| SessionError::UnknownTask(task_id.to_string()))?;
        Ok(self.rubric_scores.get(&RecordKey::new(student_id.clone(), task.id)))
    }

    /// All rubric records, ordered by (student, task).
    pub fn rubric_scores(&self) -> impl Iterator<Item = &RubricRecord> {
        self.rubric_scores.values()
    }

    /// Mastery per (student, topic); informational error if nothing is graded.
    pub fn mastery(&self) -> Result<Vec<MasteryRow>, SessionError> {
        if self.responses.is_empty() {
            return Err(SessionError::NoResponses);
        }
        Ok(mastery_by_topic(self.responses.values()))
    }

    /// Proportion correct per item; informational error if nothing is graded.
    pub fn item_analysis(&self) -> Result<Vec<ItemStats>, SessionError> {
        if self.responses.is_empty() {
            return Err(SessionError::NoResponses);
        }
        Ok(item_analysis(self.responses.values()))
    }

    /// Rubric table; informational error if no rubric is saved.
    pub fn rubric_table(&self) -> Result<Vec<RubricRow>, SessionError> {
        if self.rubric_scores.is_empty() {
            return Err(SessionError::NoRubricScores);
        }
        Ok(rubric_table(self.rubric_scores.values()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Topic;

    fn session_with_quiz() -> Session {
        let mut session = Session::default();
        session.generate_quiz(QuizOptions::default()).unwrap();
        session
    }

    #[test]
    fn grading_without_quiz_is_informational() {
        let mut session = Session::default();
        let err = session.grade_student("S001").unwrap_err();
        assert_eq!(err, SessionError::NoQuiz);
        assert!(err.is_informational());
    }

    #[test]
    fn analytics_without_records_is_informational() {
        let session = Session::default();
        assert_eq!(session.mastery().unwrap_err(), SessionError::NoResponses);
        assert_eq!(session.rubric_table().unwrap_err(), SessionError::NoRubricScores);
    }

    #[test]
    fn duplicate_roster_ids_keep_first_entry() {
        let mut session = session_with_quiz();
        session.load_roster(vec![
            RosterEntry::new("S1", "Kim"),
            RosterEntry::new("S2", "Lee"),
            RosterEntry::new("S1", "Kim again"),
        ]);
        assert_eq!(session.roster().len(), 2);
        assert_eq!(session.resolve_student("S1").unwrap().name, "Kim");
        assert!(session.resolve_student("Kim again").is_err());
    }

    #[test]
    fn resolve_by_id_or_name() {
        let session = Session::default();
        assert_eq!(session.resolve_student("S002").unwrap().name, "김영희");
        assert_eq!(session.resolve_student("이민호").unwrap().id, "S003");
        assert!(matches!(
            session.resolve_student("S404"),
            Err(SessionError::UnknownStudent(_))
        ));
    }

    #[test]
    fn submit_rejects_values_outside_choices() {
        let mut session = session_with_quiz();
        let item = session.quiz()[0].clone();
        let err = session.submit("S001", &item.id, "not-a-choice").unwrap_err();
        assert!(matches!(err, SessionError::InvalidChoice { .. }));
        assert!(matches!(
            session.submit("S001", "XX-0", "1"),
            Err(SessionError::UnknownItem(_))
        ));
    }

    #[test]
    fn canonical_answers_earn_full_marks() {
        let mut session = session_with_quiz();
        let items = session.quiz().to_vec();
        for item in &items {
            session.submit("S001", &item.id, &item.answer).unwrap();
        }
        let summary = session.grade_student("S001").unwrap();
        let expected: u32 = items.iter().map(|i| i.points).sum();
        assert_eq!(summary.total, expected);
        assert_eq!(summary.max_total, expected);
        assert!(summary.records.iter().all(|r| r.correct));
    }

    #[test]
    fn grading_is_idempotent() {
        let mut session = session_with_quiz();
        let first_id = session.quiz()[0].id.clone();
        let answer = session.quiz()[0].answer.clone();
        session.submit("S002", &first_id, &answer).unwrap();

        let first = session.grade_student("S002").unwrap();
        let records_after_first: Vec<ResponseRecord> = session.responses().cloned().collect();
        let second = session.grade_student("S002").unwrap();
        let records_after_second: Vec<ResponseRecord> = session.responses().cloned().collect();

        assert_eq!(first, second);
        assert_eq!(records_after_first, records_after_second);
        assert_eq!(records_after_second.len(), session.quiz().len());
    }

    #[test]
    fn unanswered_items_score_zero() {
        let mut session = session_with_quiz();
        let summary = session.grade_student("S003").unwrap();
        assert_eq!(summary.total, 0);
        assert!(summary.records.iter().all(|r| r.response.is_none()));
    }

    #[test]
    fn rubric_save_overwrites_same_key() {
        let mut session = Session::default();
        let levels = RubricLevels::new(3, 4, 2, 3);
        session.save_rubric("S001", "PT-1", levels, "first").unwrap();
        session.save_rubric("S001", "PT-1", levels, "first").unwrap();
        assert_eq!(session.rubric_scores().count(), 1);

        let record = session.save_rubric("S001", "pt-1", levels, "revised").unwrap();
        assert_eq!(record.notes, "revised");
        assert_eq!(record.task_points, 8);
        assert_eq!(record.criterion_sum(), 12);
        assert_eq!(session.rubric_scores().count(), 1);
    }

    #[test]
    fn rubric_lookup_and_unknown_task() {
        let mut session = Session::default();
        assert!(session.rubric("S001", "PT-2").unwrap().is_none());
        session
            .save_rubric("홍길동", "PT-2", RubricLevels::default(), "")
            .unwrap();
        assert!(session.rubric("S001", "PT-2").unwrap().is_some());
        assert!(matches!(
            session.save_rubric("S001", "PT-7", RubricLevels::default(), ""),
            Err(SessionError::UnknownTask(_))
        ));
    }

    #[test]
    fn regenerating_clears_submissions_but_keeps_records() {
        let mut session = session_with_quiz();
        let item = session.quiz()[0].clone();
        session.submit("S001", &item.id, &item.answer).unwrap();
        session.grade_student("S001").unwrap();

        session
            .generate_quiz(QuizOptions {
                seed: 7,
                ..QuizOptions::default()
            })
            .unwrap();
        assert!(session.submission("S001", &item.id).is_none());
        assert!(session.responses().count() > 0);
    }

    #[test]
    fn mastery_reflects_grading() {
        let mut session = Session::default();
        session
            .generate_quiz(QuizOptions {
                topics: vec![Topic::AngleSum],
                item_count: 5,
                ..QuizOptions::default()
            })
            .unwrap();
        let items = session.quiz().to_vec();
        for item in items.iter().take(2) {
            session.submit("S001", &item.id, &item.answer).unwrap();
        }
        session.grade_student("S001").unwrap();
        let mastery = session.mastery().unwrap();
        assert_eq!(mastery.len(), 1);
        assert_eq!(mastery[0].topic, Topic::AngleSum);
        assert_eq!(mastery[0].percent, 40.0);
    }
}
