//! # hyakunin-backend
//!
//! Backend for a Hyakunin Isshu quiz: poems are served as questions
//! (guess the second half, or pick the author from a choice set), answers
//! are scored per session, and each reveal carries the poem's reading,
//! author bio and interpretation.
//!
//! The binary wires this into an Axum HTTP + WebSocket server; the quiz
//! core itself is plain synchronous code over an immutable dataset.

pub mod telemetry;
pub mod util;
pub mod domain;
pub mod config;
pub mod dataset;
pub mod quiz;
pub mod state;
pub mod protocol;
pub mod routes;

pub use config::QuizConfig;
pub use dataset::DatasetError;
pub use domain::{AnswerOutcome, PoemRecord, QuizMode, SessionState};
pub use quiz::{Evaluation, Question, QuizError};
pub use state::AppState;
