//! Loading quiz configuration from TOML.
//!
//! See `QuizConfig` for the expected schema. Everything is optional; the
//! defaults match the original deployment (second-half mode, four options).

use serde::Deserialize;
use tracing::{info, error};

use crate::domain::QuizMode;

#[derive(Clone, Debug, Deserialize)]
pub struct QuizConfig {
  /// Mode a fresh session starts in when the client doesn't pick one.
  #[serde(default)]
  pub default_mode: QuizMode,
  /// Number of options presented in author mode (correct answer included).
  #[serde(default = "default_choice_count")]
  pub choice_count: usize,
}

fn default_choice_count() -> usize { 4 }

impl Default for QuizConfig {
  fn default() -> Self {
    Self {
      default_mode: QuizMode::default(),
      choice_count: default_choice_count(),
    }
  }
}

/// Attempt to load `QuizConfig` from QUIZ_CONFIG_PATH. On any parsing/IO error, returns None.
pub fn load_quiz_config_from_env() -> Option<QuizConfig> {
  let path = std::env::var("QUIZ_CONFIG_PATH").ok()?;
  match std::fs::read_to_string(&path) {
    Ok(s) => match toml::from_str::<QuizConfig>(&s) {
      Ok(cfg) => {
        info!(target: "hyakunin_backend", %path, "Loaded quiz config (TOML)");
        Some(cfg)
      }
      Err(e) => {
        error!(target: "hyakunin_backend", %path, error = %e, "Failed to parse TOML config");
        None
      }
    },
    Err(e) => {
      error!(target: "hyakunin_backend", %path, error = %e, "Failed to read TOML config file");
      None
    }
  }
}
