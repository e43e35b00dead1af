//! Library-level classroom scenarios across generation, grading, rubric
//! scoring, analytics, export and snapshot persistence.

use trigrade_core::generator::{QuizOptions, ITEM_POINTS};
use trigrade_core::grading::MatchMode;
use trigrade_core::model::{ItemKind, RubricLevels, Topic};
use trigrade_core::session::Session;
use trigrade_core::snapshot::SessionSnapshot;
use trigrade_report::export::write_responses;

fn answer_all(session: &mut Session, student: &str) {
    let items = session.quiz().to_vec();
    for item in &items {
        session.submit(student, &item.id, &item.answer).unwrap();
    }
}

#[test]
fn default_quiz_is_ten_mcq_items_with_answers_among_choices() {
    let mut session = Session::default();
    let items = session.generate_quiz(QuizOptions::default()).unwrap();
    assert_eq!(items.len(), 10);
    for item in items {
        assert_eq!(item.kind, ItemKind::MultipleChoice);
        assert!(!item.choices.is_empty());
        assert!(item.choices.contains(&item.answer), "{}", item.id);
        assert_eq!(item.points, ITEM_POINTS);
    }
}

#[test]
fn class_walkthrough() {
    let mut session = Session::default();
    session.generate_quiz(QuizOptions::default()).unwrap();

    answer_all(&mut session, "S001");
    let first = session.quiz()[0].clone();
    session.submit("S002", &first.id, &first.answer).unwrap();

    let s1 = session.grade_student("S001").unwrap();
    let s2 = session.grade_student("S002").unwrap();
    assert_eq!(s1.total, s1.max_total);
    assert_eq!(s2.total, ITEM_POINTS);

    session
        .save_rubric("S001", "PT-1", RubricLevels::new(3, 4, 2, 3), "")
        .unwrap();
    let table = session.rubric_table().unwrap();
    assert_eq!(table.len(), 1);
    assert_eq!(table[0].sum, 12);

    let mastery = session.mastery().unwrap();
    assert!(mastery
        .iter()
        .filter(|row| row.student_id == "S001")
        .all(|row| row.percent == 100.0));

    let items = session.item_analysis().unwrap();
    assert_eq!(items.len(), session.quiz().len());
    assert!(items.iter().all(|i| i.attempts == 2));

    let mut csv = Vec::new();
    write_responses(&mut csv, session.responses(), false).unwrap();
    assert_eq!(String::from_utf8(csv).unwrap().lines().count(), 21);
}

#[test]
fn snapshot_round_trip_preserves_records() {
    let mut session = Session::new(MatchMode::Numeric);
    session
        .generate_quiz(QuizOptions {
            seed: 3,
            item_count: 8,
            topics: vec![Topic::AngleSum, Topic::SimilarityBasic],
            varied_formats: true,
        })
        .unwrap();
    answer_all(&mut session, "S003");
    session.grade_student("S003").unwrap();
    session
        .save_rubric("S003", "PT-3", RubricLevels::default(), "derives (n-2)x180")
        .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    session.save(&path).unwrap();

    let restored = Session::from_snapshot(SessionSnapshot::load_json(&path).unwrap()).unwrap();
    assert_eq!(restored, session);
    assert_eq!(restored.match_mode(), MatchMode::Numeric);
    assert_eq!(restored.mastery().unwrap(), session.mastery().unwrap());
}

#[test]
fn numeric_mode_accepts_decimal_forms() {
    let options = QuizOptions {
        topics: vec![Topic::AngleSum],
        item_count: 5,
        varied_formats: true,
        ..QuizOptions::default()
    };

    for (mode, expected_correct) in [(MatchMode::Exact, 0), (MatchMode::Numeric, 5)] {
        let mut session = Session::new(mode);
        session.generate_quiz(options.clone()).unwrap();
        let items = session.quiz().to_vec();
        for item in &items {
            assert_eq!(item.kind, ItemKind::Numeric);
            session
                .submit("S001", &item.id, &format!("{}.0", item.answer))
                .unwrap();
        }
        let summary = session.grade_student("S001").unwrap();
        assert_eq!(summary.correct_count(), expected_correct, "{mode}");
    }
}
