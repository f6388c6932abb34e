//! Application state: the immutable poem dataset and the per-session store.
//!
//! This module owns:
//!   - the poem list (loaded once at startup, read-only afterwards)
//!   - the session map (by id, behind an RwLock)
//!   - the quiz configuration (default mode, choice count)
//!
//! Every transport-facing operation goes through a method here, so the
//! lock discipline lives in one place: one write-lock acquisition per
//! user interaction, nothing held across awaits.

use std::{collections::HashMap, sync::Arc};
use rand::thread_rng;
use tokio::sync::RwLock;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::config::QuizConfig;
use crate::dataset::{load_poems, DatasetError};
use crate::domain::{AnswerOutcome, PoemRecord, QuizMode, SessionState};
use crate::quiz::{self, Evaluation, Question, QuizError};
use crate::util::trunc_for_log;

#[derive(Clone)]
pub struct AppState {
    pub poems: Arc<Vec<PoemRecord>>,
    pub sessions: Arc<RwLock<HashMap<String, SessionState>>>,
    pub config: QuizConfig,
}

impl AppState {
    /// Build state from env: load config'd dataset and set up empty stores.
    /// Dataset failure propagates — startup cannot proceed without poems.
    #[instrument(level = "info", skip_all)]
    pub fn new(config: QuizConfig) -> Result<Self, DatasetError> {
        let poems = load_poems()?;
        Ok(Self::with_poems(config, poems))
    }

    /// Build state around an already-validated poem list (tests use this).
    pub fn with_poems(config: QuizConfig, poems: Vec<PoemRecord>) -> Self {
        let authors: std::collections::HashSet<&str> =
            poems.iter().map(|p| p.author.as_str()).collect();
        info!(
            target: "quiz",
            poems = poems.len(),
            authors = authors.len(),
            default_mode = ?config.default_mode,
            "Startup dataset inventory"
        );
        if poems.len() < config.choice_count {
            warn!(
                target: "quiz",
                poems = poems.len(),
                choice_count = config.choice_count,
                "Dataset smaller than the choice count; author mode will show fewer options"
            );
        }

        Self {
            poems: Arc::new(poems),
            sessions: Arc::new(RwLock::new(HashMap::new())),
            config,
        }
    }

    /// Create a fresh session; `mode` falls back to the configured default.
    #[instrument(level = "info", skip(self))]
    pub async fn create_session(&self, mode: Option<QuizMode>) -> (String, SessionState) {
        let id = Uuid::new_v4().to_string();
        let session = SessionState::new(mode.unwrap_or(self.config.default_mode));
        self.sessions.write().await.insert(id.clone(), session.clone());
        info!(target: "quiz", session = %id, mode = ?session.mode, "Session created");
        (id, session)
    }

    /// Read-only snapshot of a session.
    #[instrument(level = "debug", skip(self), fields(session = %id))]
    pub async fn session_snapshot(&self, id: &str) -> Result<SessionState, QuizError> {
        self.sessions
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| QuizError::UnknownSession(id.to_string()))
    }

    /// Switch the quiz mode. Drops the active question so the next render
    /// starts clean; score and progress are kept.
    #[instrument(level = "info", skip(self), fields(session = %id))]
    pub async fn set_mode(&self, id: &str, mode: QuizMode) -> Result<SessionState, QuizError> {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .get_mut(id)
            .ok_or_else(|| QuizError::UnknownSession(id.to_string()))?;
        if session.mode != mode {
            session.mode = mode;
            session.clear_question();
            info!(target: "quiz", session = %id, mode = ?mode, "Mode switched; question cleared");
        }
        Ok(session.clone())
    }

    /// Select and record the next question for a session.
    #[instrument(level = "info", skip(self), fields(session = %id))]
    pub async fn next_question(&self, id: &str) -> Result<(Question, SessionState), QuizError> {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .get_mut(id)
            .ok_or_else(|| QuizError::UnknownSession(id.to_string()))?;

        let q = quiz::next_question(session, &self.poems, self.config.choice_count, &mut thread_rng())?;
        session.current_poem_id = Some(q.poem_id);
        session.last_result = AnswerOutcome::Unanswered;
        info!(target: "quiz", session = %id, poem = q.poem_id, mode = ?q.mode, "Question served");
        Ok((q, session.clone()))
    }

    /// Evaluate a submitted answer against the session's active question.
    #[instrument(level = "info", skip(self, answer), fields(session = %id, answer_len = answer.len()))]
    pub async fn submit_answer(
        &self,
        id: &str,
        answer: &str,
    ) -> Result<(Evaluation, SessionState), QuizError> {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .get_mut(id)
            .ok_or_else(|| QuizError::UnknownSession(id.to_string()))?;

        let ev = quiz::evaluate(session, &self.poems, answer)?;
        info!(
            target: "quiz",
            session = %id,
            poem = ev.poem.id,
            outcome = ?ev.outcome,
            score = session.score,
            answered = session.answered_count,
            answer = %trunc_for_log(answer, 60),
            "Answer evaluated"
        );
        Ok((ev, session.clone()))
    }

    /// Reset score and progress for a session.
    #[instrument(level = "info", skip(self), fields(session = %id))]
    pub async fn reset_score(&self, id: &str) -> Result<SessionState, QuizError> {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .get_mut(id)
            .ok_or_else(|| QuizError::UnknownSession(id.to_string()))?;
        session.reset_score();
        info!(target: "quiz", session = %id, "Score reset");
        Ok(session.clone())
    }
}
