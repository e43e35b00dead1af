//! Subcommand implementations.
//!
//! Every command that touches state loads the session snapshot, applies one
//! action and writes the snapshot back.

use std::path::PathBuf;

use anyhow::Result;

use trigrade_core::config::{load_config_from, TrigradeConfig};
use trigrade_core::error::SessionError;
use trigrade_core::session::Session;

pub mod analytics;
pub mod answer;
pub mod export;
pub mod generate;
pub mod grade;
pub mod init;
pub mod quiz;
pub mod roster;
pub mod rubric;

/// Options shared by every subcommand.
pub struct GlobalOpts {
    pub session: Option<PathBuf>,
    pub config: Option<PathBuf>,
}

/// Loaded configuration plus the resolved session file.
pub struct Workspace {
    pub config: TrigradeConfig,
    pub session_path: PathBuf,
}

impl Workspace {
    pub fn load(opts: &GlobalOpts) -> Result<Self> {
        let config = load_config_from(opts.config.as_deref())?;
        let session_path = opts
            .session
            .clone()
            .unwrap_or_else(|| config.session_path.clone());
        tracing::debug!(session = %session_path.display(), "using session file");
        Ok(Self {
            config,
            session_path,
        })
    }

    /// Load the session. A configured match mode replaces the stored one.
    pub fn open(&self) -> Result<Session> {
        let configured = self.config.grading.match_mode;
        let mut session =
            Session::load_or_default(&self.session_path, configured.unwrap_or_default())?;
        if let Some(mode) = configured {
            if session.match_mode() != mode {
                tracing::info!(from = %session.match_mode(), to = %mode, "applying configured match mode");
                session.set_match_mode(mode);
            }
        }
        Ok(session)
    }

    pub fn save(&self, session: &Session) -> Result<()> {
        session.save(&self.session_path)
    }
}

/// Print informational session conditions as a notice; propagate real errors.
pub fn notice_or_fail(err: SessionError) -> Result<()> {
    if err.is_informational() {
        println!("{}", notice(&err));
        Ok(())
    } else {
        Err(err.into())
    }
}

fn notice(err: &SessionError) -> String {
    match err {
        SessionError::NoQuiz => {
            "No quiz generated yet. Run `trigrade generate` first.".to_string()
        }
        SessionError::NoResponses => {
            "No graded responses yet. Run `trigrade grade` first.".to_string()
        }
        SessionError::NoRubricScores => {
            "No rubric scores saved yet. Use `trigrade rubric save`.".to_string()
        }
        other => other.to_string(),
    }
}
