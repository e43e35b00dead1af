//! Session snapshot document with JSON persistence.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::generator::QuizOptions;
use crate::grading::MatchMode;
use crate::model::{ObjectiveItem, RecordKey, ResponseRecord, RosterEntry, RubricRecord};
use crate::session::Session;

/// Current snapshot layout version.
pub const FORMAT_VERSION: u32 = 1;

/// Roster stored column-wise: `{"ID": [...], "name": [...]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentColumns {
    #[serde(rename = "ID")]
    pub ids: Vec<String>,
    #[serde(rename = "name")]
    pub names: Vec<String>,
}

impl StudentColumns {
    fn from_roster(roster: &[RosterEntry]) -> Self {
        Self {
            ids: roster.iter().map(|s| s.id.clone()).collect(),
            names: roster.iter().map(|s| s.name.clone()).collect(),
        }
    }

    /// Zip the columns back into entries. A missing name falls back to the id.
    fn into_roster(self) -> Vec<RosterEntry> {
        let mut names = self.names.into_iter();
        self.ids
            .into_iter()
            .map(|id| {
                let name = names.next().filter(|n| !n.is_empty()).unwrap_or_else(|| id.clone());
                RosterEntry::new(id, name)
            })
            .collect()
    }
}

/// Everything needed to restore a [`Session`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub format_version: u32,
    /// Unique snapshot identifier.
    pub id: Uuid,
    pub saved_at: DateTime<Utc>,
    /// Options the active quiz was generated with.
    #[serde(default)]
    pub generation: Option<QuizOptions>,
    #[serde(default)]
    pub match_mode: MatchMode,
    #[serde(default)]
    pub quiz_items: Vec<ObjectiveItem>,
    /// Raw answers keyed by `student::item`.
    #[serde(default)]
    pub submissions: BTreeMap<String, String>,
    /// Graded records keyed by `student::item`.
    #[serde(default)]
    pub responses: BTreeMap<String, ResponseRecord>,
    /// Rubric records keyed by `student::task`.
    #[serde(default)]
    pub rubric_scores: BTreeMap<String, RubricRecord>,
    pub students: StudentColumns,
}

fn keyed<V: Clone>(map: &BTreeMap<RecordKey, V>) -> BTreeMap<String, V> {
    map.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
}

fn unkeyed<V>(map: BTreeMap<String, V>) -> Result<BTreeMap<RecordKey, V>> {
    map.into_iter()
        .map(|(k, v)| Ok((k.parse::<RecordKey>()?, v)))
        .collect()
}

fn ensure_key_matches(key: &RecordKey, student_id: &str, target_id: &str) -> Result<()> {
    anyhow::ensure!(
        key.student_id == student_id && key.target_id == target_id,
        "record stored under {key} belongs to {}",
        RecordKey::new(student_id, target_id)
    );
    Ok(())
}

impl SessionSnapshot {
    /// Capture the current state of a session.
    pub fn capture(session: &Session) -> Self {
        Self {
            format_version: FORMAT_VERSION,
            id: Uuid::new_v4(),
            saved_at: Utc::now(),
            generation: session.quiz_options.clone(),
            match_mode: session.match_mode,
            quiz_items: session.quiz.clone(),
            submissions: keyed(&session.submissions),
            responses: keyed(&session.responses),
            rubric_scores: keyed(&session.rubric_scores),
            students: StudentColumns::from_roster(&session.roster),
        }
    }

    /// Rebuild the session this snapshot was captured from.
    pub fn restore(self) -> Result<Session> {
        anyhow::ensure!(
            self.format_version <= FORMAT_VERSION,
            "unsupported snapshot format version {} (newest known is {})",
            self.format_version,
            FORMAT_VERSION
        );
        let responses = unkeyed(self.responses).context("invalid response key")?;
        for (key, record) in &responses {
            ensure_key_matches(key, &record.student_id, &record.item_id)?;
        }
        let rubric_scores = unkeyed(self.rubric_scores).context("invalid rubric key")?;
        for (key, record) in &rubric_scores {
            ensure_key_matches(key, &record.student_id, &record.task_id)?;
        }
        Ok(Session {
            roster: self.students.into_roster(),
            quiz: self.quiz_items,
            quiz_options: self.generation,
            match_mode: self.match_mode,
            submissions: unkeyed(self.submissions).context("invalid submission key")?,
            responses,
            rubric_scores,
        })
    }

    /// Save the snapshot as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize session")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write session to {}", path.display()))?;
        tracing::debug!(path = %path.display(), id = %self.id, "session saved");
        Ok(())
    }

    /// Load a snapshot from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read session from {}", path.display()))?;
        let snapshot: SessionSnapshot =
            serde_json::from_str(&content).context("failed to parse session JSON")?;
        Ok(snapshot)
    }
}

impl Session {
    pub fn to_snapshot(&self) -> SessionSnapshot {
        SessionSnapshot::capture(self)
    }

    pub fn from_snapshot(snapshot: SessionSnapshot) -> Result<Self> {
        snapshot.restore()
    }

    /// Load a session file, or start a fresh session if it does not exist.
    pub fn load_or_default(path: &Path, match_mode: MatchMode) -> Result<Self> {
        if path.exists() {
            SessionSnapshot::load_json(path)?.restore()
        } else {
            tracing::debug!(path = %path.display(), "no session file, starting fresh");
            Ok(Session::new(match_mode))
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        self.to_snapshot().save_json(path)
    }
}
