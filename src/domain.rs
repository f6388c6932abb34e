//! Domain models: poem records, quiz modes, per-session state.

use serde::{Deserialize, Serialize};

/// Which field of a poem the user is asked to guess.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuizMode {
  /// Prompt with the first half (上の句), user supplies the second half as free text.
  SecondHalf,
  /// Prompt with the full poem, user picks the author from a choice set.
  Author,
}
impl Default for QuizMode {
  fn default() -> Self { QuizMode::SecondHalf }
}

/// Result of the most recent submission, used only to drive the next render.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerOutcome {
  Correct,
  Incorrect,
  Unanswered,
}

/// One fixed entry of the Hyakunin Isshu dataset. Immutable after load.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PoemRecord {
  pub id: u32,
  pub author: String,
  /// 上の句 (opening lines).
  #[serde(rename = "upper")]
  pub first_half: String,
  /// 下の句 (closing lines); the answer in SecondHalf mode.
  #[serde(rename = "lower")]
  pub second_half: String,
  /// Kana reading of the first half.
  #[serde(rename = "reading_upper")]
  pub reading_first: String,
  /// Kana reading of the second half.
  #[serde(rename = "reading_lower")]
  pub reading_second: String,
  /// Biographical note about the author, shown after answering.
  pub author_info: String,
  /// Interpretation of the poem, shown after answering.
  #[serde(rename = "description")]
  pub explanation: String,
}

/// Transient quiz state for one user session. Created per session,
/// mutated in place by the evaluator, discarded with the process.
#[derive(Clone, Debug, Serialize)]
pub struct SessionState {
  pub mode: QuizMode,
  pub current_poem_id: Option<u32>,
  pub score: u32,
  pub answered_count: u32,
  pub last_result: AnswerOutcome,
}

impl SessionState {
  pub fn new(mode: QuizMode) -> Self {
    Self {
      mode,
      current_poem_id: None,
      score: 0,
      answered_count: 0,
      last_result: AnswerOutcome::Unanswered,
    }
  }

  /// Accuracy in percent; 0.0 before anything was answered.
  pub fn percentage(&self) -> f32 {
    if self.answered_count == 0 {
      0.0
    } else {
      self.score as f32 / self.answered_count as f32 * 100.0
    }
  }

  /// Drop the active question, e.g. when the mode changes mid-round.
  pub fn clear_question(&mut self) {
    self.current_poem_id = None;
    self.last_result = AnswerOutcome::Unanswered;
  }

  /// Reset score and progress; keeps the mode.
  pub fn reset_score(&mut self) {
    self.score = 0;
    self.answered_count = 0;
    self.clear_question();
  }
}
